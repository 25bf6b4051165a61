// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ASN.1 primitives defined by RFC 5480.

use {
    crate::rfc3279::SpecifiedEcDomain,
    bcder::{
        decode::{Constructed, DecodeError, Source},
        encode::{PrimitiveContent, Values},
        ConstOid, Oid, Tag,
    },
};

/// Elliptic curve public key.
///
/// 1.2.840.10045.2.1
pub const OID_EC_PUBLIC_KEY: ConstOid = Oid(&[42, 134, 72, 206, 61, 2, 1]);

/// Elliptic curve parameters.
///
/// ```ASN.1
/// ECParameters ::= CHOICE {
///   namedCurve         OBJECT IDENTIFIER
///   implicitCurve      NULL
///   specifiedCurve     SpecifiedECDomain
///  }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EcParameters {
    NamedCurve(Oid),
    ImplicitCurve,
    SpecifiedCurve(Box<SpecifiedEcDomain>),
}

impl EcParameters {
    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        if let Some(oid) = Oid::take_opt_from(cons)? {
            Ok(Self::NamedCurve(oid))
        } else if let Some(domain) = SpecifiedEcDomain::take_opt_from(cons)? {
            Ok(Self::SpecifiedCurve(Box::new(domain)))
        } else {
            cons.take_primitive_if(Tag::NULL, |prim| prim.take_all())?;

            Ok(Self::ImplicitCurve)
        }
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        match self {
            Self::NamedCurve(oid) => (Some(oid.encode_ref()), None, None),
            Self::ImplicitCurve => (None, Some(().encode()), None),
            Self::SpecifiedCurve(domain) => (None, None, Some(domain.encode_ref())),
        }
    }
}

#[cfg(test)]
mod test {
    use {super::*, bcder::Mode};

    #[test]
    fn choice_alternatives() {
        let named = [0x06, 0x05, 43, 129, 4, 0, 34];
        let params = Constructed::decode(&named[..], Mode::Der, EcParameters::take_from).unwrap();
        assert!(matches!(&params, EcParameters::NamedCurve(oid) if oid.as_ref() == &named[2..]));

        let mut encoded = Vec::new();
        params
            .encode_ref()
            .write_encoded(Mode::Der, &mut encoded)
            .unwrap();
        assert_eq!(encoded, named);

        let implicit = [0x05, 0x00];
        let params =
            Constructed::decode(&implicit[..], Mode::Der, EcParameters::take_from).unwrap();
        assert_eq!(params, EcParameters::ImplicitCurve);

        assert!(
            Constructed::decode(&[0x02, 0x01, 0x01][..], Mode::Der, EcParameters::take_from)
                .is_err()
        );
    }
}
