// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Elliptic curve key decoding and encoding.
//!
//! Domain parameters are either referenced by name (see [NamedCurve]) or
//! spelled out as an explicit `SpecifiedECDomain`. Parameters obtained from
//! the named curve table remember their name and are encoded by name again.
//! Explicit parameters are always encoded explicitly, even when they happen
//! to match a registered curve.

use {
    crate::{
        asn1int::UnsignedInteger,
        curves::NamedCurve,
        rfc3279::{Curve, FieldId, SpecifiedEcDomain, OID_CHARACTERISTIC_TWO_FIELD},
        rfc5280::{AlgorithmIdentifier, AlgorithmParameter, SubjectPublicKeyInfo},
        rfc5480::{EcParameters, OID_EC_PUBLIC_KEY},
        rfc5915,
        rfc5958::{OneAsymmetricKey, Version},
        X509CodecError as Error,
    },
    bcder::{encode::Values, BitString, Integer, Mode, OctetString, Oid},
    bytes::Bytes,
    log::debug,
    std::convert::TryFrom,
};

/// A point on an elliptic curve, in SEC 1 octet string form.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EcPoint {
    /// The point at infinity.
    Infinity,

    /// Compressed form: the x coordinate and the parity of y.
    Compressed { y_is_odd: bool, x: Vec<u8> },

    /// Uncompressed form. Coordinates are padded to the field size.
    Uncompressed { x: Vec<u8>, y: Vec<u8> },
}

impl EcPoint {
    /// Decode a point whose coordinates are `field_size` bytes long.
    pub fn decode(data: &[u8], field_size: usize) -> Result<Self, Error> {
        match data.first() {
            Some(0x00) if data.len() == 1 => Ok(Self::Infinity),
            Some(prefix @ (0x02 | 0x03)) if data.len() == 1 + field_size => Ok(Self::Compressed {
                y_is_odd: *prefix == 0x03,
                x: data[1..].to_vec(),
            }),
            Some(0x04) if data.len() == 1 + 2 * field_size => Ok(Self::Uncompressed {
                x: data[1..1 + field_size].to_vec(),
                y: data[1 + field_size..].to_vec(),
            }),
            Some(prefix) => Err(Error::MalformedEncoding(format!(
                "invalid EC point: prefix {:#04x} with {} bytes for field size {}",
                prefix,
                data.len(),
                field_size
            ))),
            None => Err(Error::MalformedEncoding("empty EC point".into())),
        }
    }

    /// Encode the point to its octet string form.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Infinity => vec![0x00],
            Self::Compressed { y_is_odd, x } => {
                let mut res = Vec::with_capacity(x.len() + 1);
                res.push(if *y_is_odd { 0x03 } else { 0x02 });
                res.extend_from_slice(x);
                res
            }
            Self::Uncompressed { x, y } => {
                let mut res = Vec::with_capacity(x.len() + y.len() + 1);
                res.push(0x04);
                res.extend_from_slice(x);
                res.extend_from_slice(y);
                res
            }
        }
    }

    pub fn is_infinity(&self) -> bool {
        matches!(self, Self::Infinity)
    }
}

/// Remove the extra OCTET STRING wrapping some old encoders put around compressed points.
///
/// Matches data shaped like an OCTET STRING whose content is a compressed
/// point of a curve with `field_size` byte coordinates. Anything else,
/// including uncompressed points that happen to share that shape, is
/// returned unchanged.
pub fn unwrap_legacy_point(data: &[u8], field_size: usize) -> &[u8] {
    if data.len() > 2
        && data[0] == 0x04
        && data[1] as usize == data.len() - 2
        && (data[2] == 0x02 || data[2] == 0x03)
        && field_size >= data.len() - 3
    {
        debug!("unwrapping OCTET STRING encoded EC point");
        &data[2..]
    } else {
        data
    }
}

/// Decode the public point of a key, tolerating the legacy wrapped form.
pub fn decode_public_point(data: &[u8], field_size: usize) -> Result<EcPoint, Error> {
    EcPoint::decode(unwrap_legacy_point(data, field_size), field_size)
}

/// Elliptic curve domain parameters over a prime field.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EcDomainParameters {
    /// The registered curve these parameters were obtained from.
    ///
    /// Set only for parameters referenced by name.
    pub curve: Option<NamedCurve>,
    pub field_prime: UnsignedInteger,
    pub a: UnsignedInteger,
    pub b: UnsignedInteger,
    pub generator: EcPoint,
    pub order: UnsignedInteger,
    pub cofactor: Option<UnsignedInteger>,
    pub seed: Option<Bytes>,
}

impl EcDomainParameters {
    /// Size in bytes of a field element.
    pub fn field_size(&self) -> usize {
        (self.field_prime.bit_length() + 7) / 8
    }

    /// Size in bytes of a private scalar.
    pub fn scalar_size(&self) -> usize {
        (self.order.bit_length() + 7) / 8
    }

    /// The registered curve these parameters describe.
    ///
    /// Explicit parameters are matched against the curve table.
    pub fn resolve_curve(&self) -> Option<NamedCurve> {
        self.curve
            .or_else(|| NamedCurve::from_domain_parameters(self))
    }

    /// Resolve domain parameters from the ASN.1 parameters choice.
    pub fn from_ec_parameters(params: &EcParameters) -> Result<Self, Error> {
        match params {
            EcParameters::NamedCurve(oid) => {
                Ok(NamedCurve::try_from(oid)?.domain_parameters())
            }
            EcParameters::ImplicitCurve => Err(Error::UnrecognizedAlgorithm(
                "implicitly specified EC domain parameters".into(),
            )),
            EcParameters::SpecifiedCurve(domain) => Self::from_specified_domain(domain),
        }
    }

    fn from_specified_domain(domain: &SpecifiedEcDomain) -> Result<Self, Error> {
        if domain.field_id.field_type == OID_CHARACTERISTIC_TWO_FIELD {
            return Err(Error::UnrecognizedAlgorithm(
                "characteristic-two field EC domain parameters".into(),
            ));
        } else if !domain.field_id.is_prime_field() {
            return Err(Error::UnrecognizedAlgorithm(format!(
                "EC field type {}",
                domain.field_id.field_type
            )));
        }

        let field_prime = domain.field_id.prime()?;
        let field_size = (field_prime.bit_length() + 7) / 8;

        Ok(Self {
            curve: None,
            field_prime,
            a: UnsignedInteger::from_be_bytes(domain.curve.a.to_bytes()),
            b: UnsignedInteger::from_be_bytes(domain.curve.b.to_bytes()),
            generator: EcPoint::decode(domain.base.to_bytes().as_ref(), field_size)?,
            order: domain.order.clone(),
            cofactor: domain.cofactor.clone(),
            seed: domain.curve.seed.as_ref().map(|seed| seed.octet_bytes()),
        })
    }

    /// Resolve domain parameters from the parameters of an algorithm identifier.
    pub fn from_algorithm_parameter(param: &AlgorithmParameter) -> Result<Self, Error> {
        let params = bcder::Captured::clone(param).decode(|cons| EcParameters::take_from(cons))?;

        Self::from_ec_parameters(&params)
    }

    /// Convert to the ASN.1 parameters choice.
    pub fn to_ec_parameters(&self) -> EcParameters {
        if let Some(curve) = self.curve {
            return EcParameters::NamedCurve(curve.oid());
        }

        let field_size = self.field_size();

        EcParameters::SpecifiedCurve(Box::new(SpecifiedEcDomain {
            version: Integer::from(1),
            field_id: FieldId::prime_field(&self.field_prime),
            curve: Curve {
                a: OctetString::new(Bytes::from(self.a.to_be_bytes_padded(field_size))),
                b: OctetString::new(Bytes::from(self.b.to_be_bytes_padded(field_size))),
                seed: self.seed.clone().map(|seed| BitString::new(0, seed)),
            },
            base: OctetString::new(Bytes::from(self.generator.encode())),
            order: self.order.clone(),
            cofactor: self.cofactor.clone(),
        }))
    }

    /// Convert to an `ecPublicKey` algorithm identifier.
    pub fn to_algorithm_identifier(&self) -> AlgorithmIdentifier {
        let params = self.to_ec_parameters();

        AlgorithmIdentifier {
            algorithm: Oid(Bytes::copy_from_slice(OID_EC_PUBLIC_KEY.as_ref())),
            parameters: Some(AlgorithmParameter::from_values(params.encode_ref())),
        }
    }
}

fn require_ec_algorithm(algorithm: &AlgorithmIdentifier) -> Result<(), Error> {
    if algorithm.algorithm == OID_EC_PUBLIC_KEY {
        Ok(())
    } else {
        Err(Error::InvalidKeyType("EC"))
    }
}

/// An elliptic curve public key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EcPublicKey {
    pub parameters: EcDomainParameters,
    pub point: EcPoint,
}

impl EcPublicKey {
    /// Decode from a `SubjectPublicKeyInfo`.
    pub fn from_spki(spki: &SubjectPublicKeyInfo) -> Result<Self, Error> {
        require_ec_algorithm(&spki.algorithm)?;

        let param = spki.algorithm.parameters.as_ref().ok_or_else(|| {
            Error::MalformedEncoding("EC public key lacks domain parameters".into())
        })?;
        let parameters = EcDomainParameters::from_algorithm_parameter(param)?;

        let data = spki.subject_public_key.octet_bytes();
        let point = decode_public_point(data.as_ref(), parameters.field_size())?;

        Ok(Self { parameters, point })
    }

    /// Encode to a `SubjectPublicKeyInfo`.
    pub fn to_spki(&self) -> SubjectPublicKeyInfo {
        SubjectPublicKeyInfo {
            algorithm: self.parameters.to_algorithm_identifier(),
            subject_public_key: BitString::new(0, Bytes::from(self.point.encode())),
        }
    }

    /// Encode to a DER `SubjectPublicKeyInfo`.
    pub fn encode_der(&self) -> Vec<u8> {
        self.to_spki().encode_der()
    }
}

/// An elliptic curve private key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EcPrivateKey {
    pub parameters: EcDomainParameters,
    pub private_scalar: UnsignedInteger,
    pub public_point: Option<EcPoint>,
}

impl EcPrivateKey {
    /// Decode from a PKCS #8 `OneAsymmetricKey`.
    ///
    /// Domain parameters are taken from the algorithm identifier, falling
    /// back to the ones embedded in the `ECPrivateKey`.
    pub fn from_one_asymmetric_key(key: &OneAsymmetricKey) -> Result<Self, Error> {
        require_ec_algorithm(&key.private_key_algorithm)?;

        let inner = rfc5915::EcPrivateKey::try_from(&key.private_key)?;

        let parameters = match (&key.private_key_algorithm.parameters, &inner.parameters) {
            (Some(param), _) => EcDomainParameters::from_algorithm_parameter(param)?,
            (None, Some(params)) => EcDomainParameters::from_ec_parameters(params)?,
            (None, None) => {
                return Err(Error::MalformedEncoding(
                    "EC private key lacks domain parameters".into(),
                ))
            }
        };

        let public_data = inner
            .public_key
            .as_ref()
            .or(key.public_key.as_ref())
            .map(|bits| bits.octet_bytes());
        let public_point = public_data
            .map(|data| decode_public_point(data.as_ref(), parameters.field_size()))
            .transpose()?;

        Ok(Self {
            private_scalar: UnsignedInteger::from_be_bytes(inner.private_key.to_bytes()),
            parameters,
            public_point,
        })
    }

    /// Decode from PKCS #8 DER.
    pub fn from_pkcs8_der(data: &[u8]) -> Result<Self, Error> {
        let key = bcder::decode::Constructed::decode(data, Mode::Der, |cons| {
            OneAsymmetricKey::take_from(cons)
        })?;

        Self::from_one_asymmetric_key(&key)
    }

    /// Encode to a PKCS #8 `OneAsymmetricKey`.
    pub fn to_one_asymmetric_key(&self) -> OneAsymmetricKey {
        let inner = rfc5915::EcPrivateKey {
            version: Integer::from(1),
            private_key: OctetString::new(Bytes::from(
                self.private_scalar
                    .to_be_bytes_padded(self.parameters.scalar_size()),
            )),
            parameters: None,
            public_key: self
                .public_point
                .as_ref()
                .map(|point| BitString::new(0, Bytes::from(point.encode()))),
        };

        let mut inner_der = Vec::new();
        // Writes to a Vec are infallible.
        let _ = inner.encode_ref().write_encoded(Mode::Der, &mut inner_der);

        OneAsymmetricKey {
            version: Version::V1,
            private_key_algorithm: self.parameters.to_algorithm_identifier(),
            private_key: OctetString::new(Bytes::from(inner_der)),
            attributes: None,
            public_key: None,
        }
    }

    /// Encode to PKCS #8 DER.
    pub fn encode_pkcs8_der(&self) -> Vec<u8> {
        self.to_one_asymmetric_key().encode_der()
    }

    /// The public key, if the public point is known.
    pub fn public_key(&self) -> Option<EcPublicKey> {
        self.public_point.as_ref().map(|point| EcPublicKey {
            parameters: self.parameters.clone(),
            point: point.clone(),
        })
    }
}

#[cfg(test)]
mod test {
    use {
        super::*,
        crate::{rfc5280::Certificate, testutil::*},
        bcder::decode::Constructed,
    };

    fn spki(der: &[u8]) -> SubjectPublicKeyInfo {
        Constructed::decode(der, Mode::Der, Certificate::take_from)
            .unwrap()
            .tbs_certificate
            .subject_public_key_info
    }

    #[test]
    fn point_forms() {
        assert_eq!(EcPoint::decode(&[0x00], 32).unwrap(), EcPoint::Infinity);

        let mut compressed = vec![0x03];
        compressed.extend_from_slice(&[0x11; 32]);
        assert_eq!(
            EcPoint::decode(&compressed, 32).unwrap(),
            EcPoint::Compressed {
                y_is_odd: true,
                x: vec![0x11; 32]
            }
        );

        let mut uncompressed = vec![0x04];
        uncompressed.extend_from_slice(&[0x22; 48]);
        uncompressed.extend_from_slice(&[0x33; 48]);
        let point = EcPoint::decode(&uncompressed, 48).unwrap();
        assert_eq!(point.encode(), uncompressed);

        assert!(EcPoint::decode(&uncompressed, 32).is_err());
        assert!(EcPoint::decode(&[0x00, 0x00], 32).is_err());
        assert!(EcPoint::decode(&[], 32).is_err());
        assert!(EcPoint::decode(&[0x06; 65], 32).is_err());
    }

    #[test]
    fn legacy_wrapped_point() {
        let generator = NamedCurve::Secp256r1.domain_parameters().generator;
        let x = match &generator {
            EcPoint::Uncompressed { x, .. } => x.clone(),
            _ => panic!("generator should be uncompressed"),
        };

        let mut canonical = vec![0x03];
        canonical.extend_from_slice(&x);

        let mut wrapped = vec![0x04, canonical.len() as u8];
        wrapped.extend_from_slice(&canonical);

        assert_eq!(unwrap_legacy_point(&wrapped, 32), canonical.as_slice());
        assert_eq!(
            decode_public_point(&wrapped, 32).unwrap(),
            decode_public_point(&canonical, 32).unwrap()
        );

        let uncompressed = generator.encode();
        assert_eq!(unwrap_legacy_point(&uncompressed, 32), uncompressed.as_slice());
    }

    #[test]
    fn uncompressed_point_resembling_wrapped_form() {
        // An uncompressed P-256 point whose x starts with 0x3f 0x02 has the
        // outer shape of a wrapped compressed point.
        let mut data = vec![0x04, 0x3f, 0x02];
        data.extend_from_slice(&[0x11; 62]);
        assert_eq!(data.len(), 65);

        assert_eq!(unwrap_legacy_point(&data, 32), data.as_slice());

        let point = decode_public_point(&data, 32).unwrap();
        assert_eq!(
            point,
            EcPoint::Uncompressed {
                x: data[1..33].to_vec(),
                y: data[33..].to_vec(),
            }
        );
        assert_eq!(point.encode(), data);

        data[2] = 0x03;
        assert!(matches!(
            decode_public_point(&data, 32).unwrap(),
            EcPoint::Uncompressed { .. }
        ));
    }

    #[test]
    fn named_curve_public_keys() {
        let key = EcPublicKey::from_spki(&spki(INTERMEDIATE_P256_DER)).unwrap();
        assert_eq!(key.parameters.curve, Some(NamedCurve::Secp256r1));
        assert!(matches!(key.point, EcPoint::Uncompressed { .. }));
        assert_eq!(key.to_spki(), spki(INTERMEDIATE_P256_DER));

        let key = EcPublicKey::from_spki(&spki(LEAF_P384_DER)).unwrap();
        assert_eq!(key.parameters.curve, Some(NamedCurve::Secp384r1));
        assert_eq!(key.parameters.field_size(), 48);
    }

    #[test]
    fn explicit_curve_public_key() {
        let original = spki(EXPLICIT_P256_DER);
        let key = EcPublicKey::from_spki(&original).unwrap();

        assert_eq!(key.parameters.curve, None);
        assert_eq!(key.parameters.resolve_curve(), Some(NamedCurve::Secp256r1));
        assert_eq!(
            key.parameters.seed,
            NamedCurve::Secp256r1.domain_parameters().seed
        );

        // Explicit parameters stay explicit.
        assert_eq!(key.to_spki(), original);
    }

    #[test]
    fn wrong_key_type() {
        assert!(matches!(
            EcPublicKey::from_spki(&spki(ROOT_RSA_DER)),
            Err(Error::InvalidKeyType("EC"))
        ));
    }

    #[test]
    fn pkcs8_private_key() {
        let key = EcPrivateKey::from_pkcs8_der(INTERMEDIATE_KEY_PK8).unwrap();

        assert_eq!(key.parameters.curve, Some(NamedCurve::Secp256r1));
        assert!(key.private_scalar.bit_length() <= 256);
        assert_eq!(
            key.public_key().unwrap(),
            EcPublicKey::from_spki(&spki(INTERMEDIATE_P256_DER)).unwrap()
        );
        assert_eq!(key.encode_pkcs8_der(), INTERMEDIATE_KEY_PK8);
    }

    #[test]
    fn explicit_private_key_encoding() {
        let explicit = EcPublicKey::from_spki(&spki(EXPLICIT_P256_DER))
            .unwrap()
            .parameters;

        let key = EcPrivateKey {
            parameters: explicit.clone(),
            private_scalar: UnsignedInteger::from(42),
            public_point: None,
        };

        let decoded = EcPrivateKey::from_pkcs8_der(&key.encode_pkcs8_der()).unwrap();
        assert_eq!(decoded.parameters, explicit);
        assert_eq!(decoded.private_scalar, UnsignedInteger::from(42));
        assert!(decoded.public_point.is_none());
    }
}
