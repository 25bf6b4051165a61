// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Numeric parameters of asymmetric keys.
//!
//! These functions flatten a [PublicKey] or [PrivateKey] into the plain
//! integers and domain parameters a cryptographic engine works with.

use crate::{
    asn1int::UnsignedInteger,
    ec::{EcDomainParameters, EcPoint, EcPrivateKey, EcPublicKey},
    keys::{
        DhDomainParameters, DhPrivateKey, DhPublicKey, ElGamalDomainParameters,
        ElGamalPrivateKey, ElGamalPublicKey, PrivateKey, PublicKey,
    },
    rfc3447::RsaPrivateKey,
    rfc8017::RsaPublicKey,
    X509CodecError as Error,
};

/// A public or private key.
#[derive(Clone, Copy, Debug)]
pub enum AsymmetricKey<'a> {
    Public(&'a PublicKey),
    Private(&'a PrivateKey),
}

impl<'a> From<&'a PublicKey> for AsymmetricKey<'a> {
    fn from(key: &'a PublicKey) -> Self {
        Self::Public(key)
    }
}

impl<'a> From<&'a PrivateKey> for AsymmetricKey<'a> {
    fn from(key: &'a PrivateKey) -> Self {
        Self::Private(key)
    }
}

/// The key specific value: public value `P` or the private scalar.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum KeyValue<P> {
    Public(P),
    Private(UnsignedInteger),
}

/// Chinese Remainder Theorem components of an RSA private key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RsaCrtParameters {
    pub public_exponent: UnsignedInteger,
    pub p: UnsignedInteger,
    pub q: UnsignedInteger,
    pub dp: UnsignedInteger,
    pub dq: UnsignedInteger,
    pub q_inv: UnsignedInteger,
}

/// RSA key parameters.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RsaKeyParameters {
    pub modulus: UnsignedInteger,
    /// Public exponent for public keys, private exponent for private keys.
    pub exponent: KeyValue<UnsignedInteger>,
    /// Populated for private keys carrying CRT components.
    pub crt: Option<RsaCrtParameters>,
}

/// Elliptic curve key parameters.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EcKeyParameters {
    pub domain: EcDomainParameters,
    pub value: KeyValue<EcPoint>,
}

/// Diffie-Hellman key parameters.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DhKeyParameters {
    pub domain: DhDomainParameters,
    pub value: KeyValue<UnsignedInteger>,
}

/// ElGamal key parameters.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ElGamalKeyParameters {
    pub domain: ElGamalDomainParameters,
    pub value: KeyValue<UnsignedInteger>,
}

/// Parameters of a key of any supported algorithm.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum KeyParameters {
    Rsa(RsaKeyParameters),
    Ec(EcKeyParameters),
    Dh(DhKeyParameters),
    ElGamal(ElGamalKeyParameters),
}

impl KeyParameters {
    /// Whether these parameters describe a private key.
    pub fn is_private(&self) -> bool {
        match self {
            Self::Rsa(p) => matches!(p.exponent, KeyValue::Private(_)),
            Self::Ec(p) => matches!(p.value, KeyValue::Private(_)),
            Self::Dh(p) => matches!(p.value, KeyValue::Private(_)),
            Self::ElGamal(p) => matches!(p.value, KeyValue::Private(_)),
        }
    }
}

fn rsa_public(key: &RsaPublicKey) -> RsaKeyParameters {
    RsaKeyParameters {
        modulus: key.modulus.clone(),
        exponent: KeyValue::Public(key.public_exponent.clone()),
        crt: None,
    }
}

fn rsa_private(key: &RsaPrivateKey) -> RsaKeyParameters {
    let crt = if key.has_crt_components() {
        Some(RsaCrtParameters {
            public_exponent: key.e.clone(),
            p: key.p.clone(),
            q: key.q.clone(),
            dp: key.dp.clone(),
            dq: key.dq.clone(),
            q_inv: key.q_inv.clone(),
        })
    } else {
        None
    };

    RsaKeyParameters {
        modulus: key.n.clone(),
        exponent: KeyValue::Private(key.d.clone()),
        crt,
    }
}

fn ec_public(key: &EcPublicKey) -> EcKeyParameters {
    EcKeyParameters {
        domain: key.parameters.clone(),
        value: KeyValue::Public(key.point.clone()),
    }
}

fn ec_private(key: &EcPrivateKey) -> EcKeyParameters {
    EcKeyParameters {
        domain: key.parameters.clone(),
        value: KeyValue::Private(key.private_scalar.clone()),
    }
}

fn dh_public(key: &DhPublicKey) -> DhKeyParameters {
    DhKeyParameters {
        domain: key.parameters.clone(),
        value: KeyValue::Public(key.y.clone()),
    }
}

fn dh_private(key: &DhPrivateKey) -> DhKeyParameters {
    DhKeyParameters {
        domain: key.parameters.clone(),
        value: KeyValue::Private(key.x.clone()),
    }
}

fn elgamal_public(key: &ElGamalPublicKey) -> ElGamalKeyParameters {
    ElGamalKeyParameters {
        domain: key.parameters.clone(),
        value: KeyValue::Public(key.y.clone()),
    }
}

fn elgamal_private(key: &ElGamalPrivateKey) -> ElGamalKeyParameters {
    ElGamalKeyParameters {
        domain: key.parameters.clone(),
        value: KeyValue::Private(key.x.clone()),
    }
}

/// Obtain the parameters of an RSA key.
pub fn rsa_key_parameters<'a>(key: impl Into<AsymmetricKey<'a>>) -> Result<RsaKeyParameters, Error> {
    match key.into() {
        AsymmetricKey::Public(PublicKey::Rsa(key)) => Ok(rsa_public(key)),
        AsymmetricKey::Private(PrivateKey::Rsa(key)) => Ok(rsa_private(key)),
        _ => Err(Error::InvalidKeyType("RSA")),
    }
}

/// Obtain the parameters of an elliptic curve key.
pub fn ec_key_parameters<'a>(key: impl Into<AsymmetricKey<'a>>) -> Result<EcKeyParameters, Error> {
    match key.into() {
        AsymmetricKey::Public(PublicKey::Ec(key)) => Ok(ec_public(key)),
        AsymmetricKey::Private(PrivateKey::Ec(key)) => Ok(ec_private(key)),
        _ => Err(Error::InvalidKeyType("EC")),
    }
}

/// Obtain the parameters of a Diffie-Hellman key.
pub fn dh_key_parameters<'a>(key: impl Into<AsymmetricKey<'a>>) -> Result<DhKeyParameters, Error> {
    match key.into() {
        AsymmetricKey::Public(PublicKey::Dh(key)) => Ok(dh_public(key)),
        AsymmetricKey::Private(PrivateKey::Dh(key)) => Ok(dh_private(key)),
        _ => Err(Error::InvalidKeyType("DH")),
    }
}

/// Obtain the parameters of an ElGamal key.
pub fn elgamal_key_parameters<'a>(
    key: impl Into<AsymmetricKey<'a>>,
) -> Result<ElGamalKeyParameters, Error> {
    match key.into() {
        AsymmetricKey::Public(PublicKey::ElGamal(key)) => Ok(elgamal_public(key)),
        AsymmetricKey::Private(PrivateKey::ElGamal(key)) => Ok(elgamal_private(key)),
        _ => Err(Error::InvalidKeyType("ElGamal")),
    }
}

/// Obtain the parameters of a key of any supported algorithm.
pub fn key_parameters<'a>(key: impl Into<AsymmetricKey<'a>>) -> KeyParameters {
    match key.into() {
        AsymmetricKey::Public(key) => match key {
            PublicKey::Rsa(key) => KeyParameters::Rsa(rsa_public(key)),
            PublicKey::Ec(key) => KeyParameters::Ec(ec_public(key)),
            PublicKey::Dh(key) => KeyParameters::Dh(dh_public(key)),
            PublicKey::ElGamal(key) => KeyParameters::ElGamal(elgamal_public(key)),
        },
        AsymmetricKey::Private(key) => match key {
            PrivateKey::Rsa(key) => KeyParameters::Rsa(rsa_private(key)),
            PrivateKey::Ec(key) => KeyParameters::Ec(ec_private(key)),
            PrivateKey::Dh(key) => KeyParameters::Dh(dh_private(key)),
            PrivateKey::ElGamal(key) => KeyParameters::ElGamal(elgamal_private(key)),
        },
    }
}

#[cfg(test)]
mod test {
    use {
        super::*,
        crate::{curves::NamedCurve, rfc5280::Certificate, testutil::*},
        bcder::{decode::Constructed, Mode},
    };

    fn certificate_key(der: &[u8]) -> PublicKey {
        let cert = Constructed::decode(der, Mode::Der, Certificate::take_from).unwrap();

        PublicKey::from_spki(&cert.tbs_certificate.subject_public_key_info).unwrap()
    }

    #[test]
    fn rsa_parameters() {
        let public = certificate_key(ROOT_RSA_DER);
        let private = PrivateKey::from_pkcs8_der(ROOT_KEY_PK8).unwrap();

        let public_params = rsa_key_parameters(&public).unwrap();
        assert_eq!(
            public_params.exponent,
            KeyValue::Public(UnsignedInteger::from(65537))
        );
        assert!(public_params.crt.is_none());

        let private_params = rsa_key_parameters(&private).unwrap();
        assert_eq!(private_params.modulus, public_params.modulus);
        assert!(matches!(private_params.exponent, KeyValue::Private(_)));

        let crt = private_params.crt.unwrap();
        assert_eq!(crt.public_exponent, UnsignedInteger::from(65537));
        assert_eq!(crt.p.bit_length(), 1024);
        assert_eq!(crt.q.bit_length(), 1024);

        assert!(matches!(
            ec_key_parameters(&public),
            Err(Error::InvalidKeyType("EC"))
        ));
        assert!(matches!(
            dh_key_parameters(&private),
            Err(Error::InvalidKeyType("DH"))
        ));
    }

    #[test]
    fn ec_parameters() {
        let public = certificate_key(INTERMEDIATE_P256_DER);
        let private = PrivateKey::from_pkcs8_der(INTERMEDIATE_KEY_PK8).unwrap();

        let public_params = ec_key_parameters(&public).unwrap();
        assert_eq!(public_params.domain.curve, Some(NamedCurve::Secp256r1));
        assert!(matches!(
            public_params.value,
            KeyValue::Public(EcPoint::Uncompressed { .. })
        ));

        let private_params = ec_key_parameters(AsymmetricKey::Private(&private)).unwrap();
        assert_eq!(private_params.domain, public_params.domain);
        assert!(matches!(private_params.value, KeyValue::Private(_)));

        assert!(matches!(
            rsa_key_parameters(&public),
            Err(Error::InvalidKeyType("RSA"))
        ));
        assert!(matches!(
            elgamal_key_parameters(&private),
            Err(Error::InvalidKeyType("ElGamal"))
        ));
    }

    #[test]
    fn dispatch() {
        let elgamal = PrivateKey::ElGamal(ElGamalPrivateKey {
            parameters: ElGamalDomainParameters {
                p: UnsignedInteger::from(23),
                g: UnsignedInteger::from(5),
            },
            x: UnsignedInteger::from(6),
        });

        let params = key_parameters(&elgamal);
        assert!(params.is_private());
        assert_eq!(
            params,
            KeyParameters::ElGamal(elgamal_key_parameters(&elgamal).unwrap())
        );

        let dh = PublicKey::Dh(DhPublicKey {
            parameters: DhDomainParameters {
                p: UnsignedInteger::from(23),
                g: UnsignedInteger::from(5),
                q: Some(UnsignedInteger::from(11)),
                j: None,
                private_value_length: None,
            },
            y: UnsignedInteger::from(8),
        });

        let params = key_parameters(&dh);
        assert!(!params.is_private());
        assert_eq!(params, KeyParameters::Dh(dh_key_parameters(&dh).unwrap()));

        let ec = certificate_key(LEAF_P384_DER);
        assert!(matches!(key_parameters(&ec), KeyParameters::Ec(_)));
    }
}
