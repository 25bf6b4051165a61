// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ASN.1 types defined in RFC 3279.
//!
//! This covers explicitly specified elliptic curve domains and Diffie-Hellman
//! domain parameters. The PKCS #3 and ElGamal parameter structures, which
//! appear in the same position of a `SubjectPublicKeyInfo`, are defined here
//! as well.

use {
    crate::asn1int::UnsignedInteger,
    bcder::{
        decode::{Constructed, DecodeError, Source},
        encode::{self, PrimitiveContent, Values},
        BitString, Captured, ConstOid, Integer, Mode, OctetString, Oid, Tag,
    },
    std::{
        convert::Infallible,
        fmt::{Debug, Formatter},
    },
};

/// Prime finite field.
///
/// 1.2.840.10045.1.1
pub const OID_PRIME_FIELD: ConstOid = Oid(&[42, 134, 72, 206, 61, 1, 1]);

/// Characteristic two finite field.
///
/// 1.2.840.10045.1.2
pub const OID_CHARACTERISTIC_TWO_FIELD: ConstOid = Oid(&[42, 134, 72, 206, 61, 1, 2]);

/// X9.42 Diffie-Hellman public key.
///
/// 1.2.840.10046.2.1
pub const OID_DH_PUBLIC_NUMBER: ConstOid = Oid(&[42, 134, 72, 206, 62, 2, 1]);

/// PKCS #3 Diffie-Hellman key agreement.
///
/// 1.2.840.113549.1.3.1
pub const OID_DH_KEY_AGREEMENT: ConstOid = Oid(&[42, 134, 72, 134, 247, 13, 1, 3, 1]);

/// ElGamal encryption.
///
/// 1.3.14.7.2.1.1
pub const OID_ELGAMAL: ConstOid = Oid(&[43, 14, 7, 2, 1, 1]);

/// Explicitly specified elliptic curve domain.
///
/// ```ASN.1
/// ECParameters ::= SEQUENCE {
///   version   ECPVer,          -- version is always 1
///   fieldID   FieldID,         -- identifies the finite field over
///                              -- which the curve is defined
///   curve     Curve,           -- coefficients a and b of the
///                              -- elliptic curve
///   base      ECPoint,         -- specifies the base point P
///                              -- on the elliptic curve
///   order     INTEGER,         -- the order n of the base point
///   cofactor  INTEGER OPTIONAL -- The integer h = #E(Fq)/n
/// }
///
/// ECPVer ::= INTEGER {ecpVer1(1)}
///
/// ECPoint ::= OCTET STRING
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SpecifiedEcDomain {
    pub version: Integer,
    pub field_id: FieldId,
    pub curve: Curve,
    pub base: OctetString,
    pub order: UnsignedInteger,
    pub cofactor: Option<UnsignedInteger>,
}

impl SpecifiedEcDomain {
    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| Self::from_sequence(cons))
    }

    pub fn take_opt_from<S: Source>(
        cons: &mut Constructed<S>,
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        cons.take_opt_sequence(|cons| Self::from_sequence(cons))
    }

    fn from_sequence<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        let version = Integer::take_from(cons)?;
        let field_id = FieldId::take_from(cons)?;
        let curve = Curve::take_from(cons)?;
        let base = OctetString::take_from(cons)?;
        let order = UnsignedInteger::take_from(cons)?;
        let cofactor = UnsignedInteger::take_opt_from(cons)?;

        Ok(Self {
            version,
            field_id,
            curve,
            base,
            order,
            cofactor,
        })
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        encode::sequence((
            self.version.encode(),
            self.field_id.encode_ref(),
            self.curve.encode_ref(),
            self.base.encode_ref(),
            self.order.encode_ref(),
            self.cofactor.as_ref().map(|v| v.encode_ref()),
        ))
    }
}

/// Finite field identifier.
///
/// ```ASN.1
/// FieldID ::= SEQUENCE {
///   fieldType   OBJECT IDENTIFIER,
///   parameters  ANY DEFINED BY fieldType }
/// ```
#[derive(Clone)]
pub struct FieldId {
    pub field_type: Oid,
    pub parameters: Captured,
}

impl Debug for FieldId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("FieldId");
        s.field("field_type", &format_args!("{}", self.field_type));
        s.field(
            "parameters",
            &format_args!("{}", hex::encode(self.parameters.as_slice())),
        );
        s.finish()
    }
}

impl PartialEq for FieldId {
    fn eq(&self, other: &Self) -> bool {
        self.field_type == other.field_type
            && self.parameters.as_slice() == other.parameters.as_slice()
    }
}

impl Eq for FieldId {}

impl FieldId {
    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            let field_type = Oid::take_from(cons)?;
            let parameters = cons.capture_all()?;

            Ok(Self {
                field_type,
                parameters,
            })
        })
    }

    /// Construct a prime field identifier.
    pub fn prime_field(prime: &UnsignedInteger) -> Self {
        Self {
            field_type: Oid(OID_PRIME_FIELD.as_ref().into()),
            parameters: Captured::from_values(Mode::Der, prime.encode_ref()),
        }
    }

    /// Whether this identifies a prime field.
    pub fn is_prime_field(&self) -> bool {
        self.field_type == OID_PRIME_FIELD
    }

    /// Decode the prime of a prime field.
    ///
    /// ```ASN.1
    /// Prime-p ::= INTEGER -- Field of size p.
    /// ```
    pub fn prime(&self) -> Result<UnsignedInteger, DecodeError<Infallible>> {
        self.parameters
            .clone()
            .decode(|cons| UnsignedInteger::take_from(cons))
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        encode::sequence((self.field_type.encode_ref(), &self.parameters))
    }
}

/// Elliptic curve coefficients.
///
/// ```ASN.1
/// Curve ::= SEQUENCE {
///   a         FieldElement,
///   b         FieldElement,
///   seed      BIT STRING OPTIONAL }
///
/// FieldElement ::= OCTET STRING
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Curve {
    pub a: OctetString,
    pub b: OctetString,
    pub seed: Option<BitString>,
}

impl Curve {
    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            let a = OctetString::take_from(cons)?;
            let b = OctetString::take_from(cons)?;
            let seed = cons.take_opt_value_if(Tag::BIT_STRING, BitString::from_content)?;

            Ok(Self { a, b, seed })
        })
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        encode::sequence((
            self.a.encode_ref(),
            self.b.encode_ref(),
            self.seed.as_ref().map(|seed| seed.encode_ref()),
        ))
    }
}

/// X9.42 Diffie-Hellman domain parameters.
///
/// ```ASN.1
/// DomainParameters ::= SEQUENCE {
///   p       INTEGER, -- odd prime, p=jq +1
///   g       INTEGER, -- generator, g
///   q       INTEGER, -- factor of p-1
///   j       INTEGER OPTIONAL, -- subgroup factor, j>= 2
///   validationParms  ValidationParms OPTIONAL }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DomainParameters {
    pub p: UnsignedInteger,
    pub g: UnsignedInteger,
    pub q: UnsignedInteger,
    pub j: Option<UnsignedInteger>,
    pub validation_parms: Option<ValidationParms>,
}

impl DomainParameters {
    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            let p = UnsignedInteger::take_from(cons)?;
            let g = UnsignedInteger::take_from(cons)?;
            let q = UnsignedInteger::take_from(cons)?;
            let j = UnsignedInteger::take_opt_from(cons)?;
            let validation_parms = ValidationParms::take_opt_from(cons)?;

            Ok(Self {
                p,
                g,
                q,
                j,
                validation_parms,
            })
        })
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        encode::sequence((
            self.p.encode_ref(),
            self.g.encode_ref(),
            self.q.encode_ref(),
            self.j.as_ref().map(|j| j.encode_ref()),
            self.validation_parms.as_ref().map(|v| v.encode_ref()),
        ))
    }
}

/// ```ASN.1
/// ValidationParms ::= SEQUENCE {
///   seed          BIT STRING,
///   pgenCounter   INTEGER }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValidationParms {
    pub seed: BitString,
    pub pgen_counter: UnsignedInteger,
}

impl ValidationParms {
    pub fn take_opt_from<S: Source>(
        cons: &mut Constructed<S>,
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        cons.take_opt_sequence(|cons| {
            let seed = BitString::take_from(cons)?;
            let pgen_counter = UnsignedInteger::take_from(cons)?;

            Ok(Self { seed, pgen_counter })
        })
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        encode::sequence((self.seed.encode_ref(), self.pgen_counter.encode_ref()))
    }
}

/// PKCS #3 Diffie-Hellman parameters.
///
/// ```ASN.1
/// DHParameter ::= SEQUENCE {
///   prime INTEGER, -- p
///   base INTEGER, -- g
///   privateValueLength INTEGER OPTIONAL }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DhParameter {
    pub prime: UnsignedInteger,
    pub base: UnsignedInteger,
    pub private_value_length: Option<UnsignedInteger>,
}

impl DhParameter {
    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            let prime = UnsignedInteger::take_from(cons)?;
            let base = UnsignedInteger::take_from(cons)?;
            let private_value_length = UnsignedInteger::take_opt_from(cons)?;

            Ok(Self {
                prime,
                base,
                private_value_length,
            })
        })
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        encode::sequence((
            self.prime.encode_ref(),
            self.base.encode_ref(),
            self.private_value_length.as_ref().map(|v| v.encode_ref()),
        ))
    }
}

/// ElGamal parameters.
///
/// ```ASN.1
/// ElGamalParameter ::= SEQUENCE {
///   p  INTEGER,
///   g  INTEGER }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ElGamalParameter {
    pub p: UnsignedInteger,
    pub g: UnsignedInteger,
}

impl ElGamalParameter {
    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            let p = UnsignedInteger::take_from(cons)?;
            let g = UnsignedInteger::take_from(cons)?;

            Ok(Self { p, g })
        })
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        encode::sequence((self.p.encode_ref(), self.g.encode_ref()))
    }
}

#[cfg(test)]
mod test {
    use {super::*, crate::rfc5280::Certificate, crate::testutil::*};

    #[test]
    fn explicit_curve_parameters() {
        let cert = Constructed::decode(EXPLICIT_P256_DER, Mode::Der, Certificate::take_from).unwrap();
        let params = cert
            .tbs_certificate
            .subject_public_key_info
            .algorithm
            .parameters
            .unwrap();

        let domain = Captured::clone(&params)
            .decode(|cons| SpecifiedEcDomain::take_from(cons))
            .unwrap();

        assert_eq!(domain.version, Integer::from(1));
        assert!(domain.field_id.is_prime_field());
        assert_eq!(domain.field_id.prime().unwrap().bit_length(), 256);
        assert_eq!(domain.curve.a.to_bytes().len(), 32);
        assert_eq!(domain.curve.seed.as_ref().unwrap().octet_bytes().len(), 20);
        assert_eq!(domain.base.to_bytes().len(), 65);
        assert_eq!(domain.cofactor, Some(UnsignedInteger::from(1)));

        let mut encoded = Vec::new();
        domain
            .encode_ref()
            .write_encoded(Mode::Der, &mut encoded)
            .unwrap();
        assert_eq!(encoded, params.as_slice());
    }

    #[test]
    fn dh_domain_parameters() {
        let params = DomainParameters {
            p: UnsignedInteger::from(23),
            g: UnsignedInteger::from(5),
            q: UnsignedInteger::from(11),
            j: None,
            validation_parms: None,
        };

        let mut encoded = Vec::new();
        params
            .encode_ref()
            .write_encoded(Mode::Der, &mut encoded)
            .unwrap();
        assert_eq!(
            encoded,
            vec![0x30, 0x09, 0x02, 0x01, 23, 0x02, 0x01, 5, 0x02, 0x01, 11]
        );

        let decoded =
            Constructed::decode(encoded.as_slice(), Mode::Der, DomainParameters::take_from)
                .unwrap();
        assert_eq!(decoded, params);
    }
}
