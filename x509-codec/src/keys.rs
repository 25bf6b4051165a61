// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Public and private keys.
//!
//! [PublicKey] is decoded from a `SubjectPublicKeyInfo` and [PrivateKey]
//! from a PKCS #8 document. Both are closed over the key algorithms this
//! crate understands: RSA, elliptic curve, Diffie-Hellman and ElGamal.
//!
//! Diffie-Hellman parameters come in two flavors. X9.42 parameters
//! (`dhpublicnumber`) carry the subgroup order `q`. PKCS #3 parameters
//! (`dhKeyAgreement`) don't, but may carry a private value length. Which
//! flavor a [DhDomainParameters] encodes to follows from whether `q` is set.

use {
    crate::{
        algorithm::{KeyAlgorithm, SignatureAlgorithm, OID_RSA},
        asn1int::UnsignedInteger,
        ec::{EcPoint, EcPrivateKey, EcPublicKey},
        rfc3279::{
            DhParameter, DomainParameters, ElGamalParameter, OID_DH_KEY_AGREEMENT,
            OID_DH_PUBLIC_NUMBER, OID_ELGAMAL,
        },
        rfc3447::RsaPrivateKey,
        rfc5280::{AlgorithmIdentifier, AlgorithmParameter, SubjectPublicKeyInfo},
        rfc5958::{OneAsymmetricKey, Version},
        rfc8017::RsaPublicKey,
        X509CodecError as Error,
    },
    bcder::{
        decode::Constructed, encode::PrimitiveContent, encode::Values, BitString, ConstOid,
        Mode, OctetString, Oid,
    },
    bytes::Bytes,
    log::debug,
    ring::signature::UnparsedPublicKey,
};

fn to_oid(oid: ConstOid) -> Oid {
    Oid(Bytes::copy_from_slice(oid.as_ref()))
}

fn encode_integer(value: &UnsignedInteger) -> Bytes {
    let mut buffer = Vec::new();
    // Writes to a Vec are infallible.
    let _ = value.encode_ref().write_encoded(Mode::Der, &mut buffer);

    Bytes::from(buffer)
}

fn decode_integer(data: &[u8]) -> Result<UnsignedInteger, Error> {
    Ok(Constructed::decode(data, Mode::Der, |cons| {
        UnsignedInteger::take_from(cons)
    })?)
}

fn require_parameters(algorithm: &AlgorithmIdentifier) -> Result<&AlgorithmParameter, Error> {
    algorithm.parameters.as_ref().ok_or_else(|| {
        Error::MalformedEncoding(format!(
            "key algorithm {} lacks domain parameters",
            algorithm.algorithm
        ))
    })
}

/// Diffie-Hellman domain parameters.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DhDomainParameters {
    /// The prime modulus.
    pub p: UnsignedInteger,
    /// The generator.
    pub g: UnsignedInteger,
    /// Order of the subgroup generated by `g`. X9.42 only.
    pub q: Option<UnsignedInteger>,
    /// Subgroup factor. X9.42 only.
    pub j: Option<UnsignedInteger>,
    /// Length in bits of the private value. PKCS #3 only.
    pub private_value_length: Option<UnsignedInteger>,
}

impl DhDomainParameters {
    /// Decode from the algorithm identifier of a key.
    pub fn from_algorithm_identifier(algorithm: &AlgorithmIdentifier) -> Result<Self, Error> {
        let params = bcder::Captured::clone(require_parameters(algorithm)?);

        if algorithm.algorithm == OID_DH_PUBLIC_NUMBER {
            let params = params.decode(|cons| DomainParameters::take_from(cons))?;

            Ok(Self {
                p: params.p,
                g: params.g,
                q: Some(params.q),
                j: params.j,
                private_value_length: None,
            })
        } else if algorithm.algorithm == OID_DH_KEY_AGREEMENT {
            let params = params.decode(|cons| DhParameter::take_from(cons))?;

            Ok(Self {
                p: params.prime,
                g: params.base,
                q: None,
                j: None,
                private_value_length: params.private_value_length,
            })
        } else {
            Err(Error::InvalidKeyType("DH"))
        }
    }

    /// Convert to an algorithm identifier.
    pub fn to_algorithm_identifier(&self) -> AlgorithmIdentifier {
        if let Some(q) = &self.q {
            let params = DomainParameters {
                p: self.p.clone(),
                g: self.g.clone(),
                q: q.clone(),
                j: self.j.clone(),
                validation_parms: None,
            };

            AlgorithmIdentifier {
                algorithm: to_oid(OID_DH_PUBLIC_NUMBER),
                parameters: Some(AlgorithmParameter::from_values(params.encode_ref())),
            }
        } else {
            let params = DhParameter {
                prime: self.p.clone(),
                base: self.g.clone(),
                private_value_length: self.private_value_length.clone(),
            };

            AlgorithmIdentifier {
                algorithm: to_oid(OID_DH_KEY_AGREEMENT),
                parameters: Some(AlgorithmParameter::from_values(params.encode_ref())),
            }
        }
    }
}

/// A Diffie-Hellman public key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DhPublicKey {
    pub parameters: DhDomainParameters,
    pub y: UnsignedInteger,
}

/// A Diffie-Hellman private key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DhPrivateKey {
    pub parameters: DhDomainParameters,
    pub x: UnsignedInteger,
}

/// ElGamal domain parameters.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ElGamalDomainParameters {
    pub p: UnsignedInteger,
    pub g: UnsignedInteger,
}

impl ElGamalDomainParameters {
    /// Decode from the algorithm identifier of a key.
    pub fn from_algorithm_identifier(algorithm: &AlgorithmIdentifier) -> Result<Self, Error> {
        if algorithm.algorithm != OID_ELGAMAL {
            return Err(Error::InvalidKeyType("ElGamal"));
        }

        let params = bcder::Captured::clone(require_parameters(algorithm)?)
            .decode(|cons| ElGamalParameter::take_from(cons))?;

        Ok(Self {
            p: params.p,
            g: params.g,
        })
    }

    /// Convert to an algorithm identifier.
    pub fn to_algorithm_identifier(&self) -> AlgorithmIdentifier {
        let params = ElGamalParameter {
            p: self.p.clone(),
            g: self.g.clone(),
        };

        AlgorithmIdentifier {
            algorithm: to_oid(OID_ELGAMAL),
            parameters: Some(AlgorithmParameter::from_values(params.encode_ref())),
        }
    }
}

/// An ElGamal public key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ElGamalPublicKey {
    pub parameters: ElGamalDomainParameters,
    pub y: UnsignedInteger,
}

/// An ElGamal private key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ElGamalPrivateKey {
    pub parameters: ElGamalDomainParameters,
    pub x: UnsignedInteger,
}

/// A public key of any supported algorithm.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PublicKey {
    Rsa(RsaPublicKey),
    Ec(EcPublicKey),
    Dh(DhPublicKey),
    ElGamal(ElGamalPublicKey),
}

impl PublicKey {
    /// Decode a public key from a `SubjectPublicKeyInfo`.
    pub fn from_spki(spki: &SubjectPublicKeyInfo) -> Result<Self, Error> {
        let key_data = spki.subject_public_key.octet_bytes();

        match KeyAlgorithm::try_from(&spki.algorithm)? {
            KeyAlgorithm::Rsa => Ok(Self::Rsa(Constructed::decode(
                key_data.as_ref(),
                Mode::Der,
                |cons| RsaPublicKey::take_from(cons),
            )?)),
            KeyAlgorithm::Ec => Ok(Self::Ec(EcPublicKey::from_spki(spki)?)),
            KeyAlgorithm::Dh => Ok(Self::Dh(DhPublicKey {
                parameters: DhDomainParameters::from_algorithm_identifier(&spki.algorithm)?,
                y: decode_integer(key_data.as_ref())?,
            })),
            KeyAlgorithm::ElGamal => Ok(Self::ElGamal(ElGamalPublicKey {
                parameters: ElGamalDomainParameters::from_algorithm_identifier(&spki.algorithm)?,
                y: decode_integer(key_data.as_ref())?,
            })),
            KeyAlgorithm::Dsa => Err(Error::UnrecognizedAlgorithm("DSA public key".into())),
        }
    }

    /// Decode a public key from DER `SubjectPublicKeyInfo`.
    pub fn from_spki_der(data: &[u8]) -> Result<Self, Error> {
        let spki = Constructed::decode(data, Mode::Der, |cons| {
            SubjectPublicKeyInfo::take_from(cons)
        })?;

        Self::from_spki(&spki)
    }

    /// Encode to a `SubjectPublicKeyInfo`.
    pub fn to_spki(&self) -> SubjectPublicKeyInfo {
        match self {
            Self::Rsa(key) => SubjectPublicKeyInfo {
                algorithm: AlgorithmIdentifier::with_null_parameter(to_oid(OID_RSA)),
                subject_public_key: BitString::new(0, Bytes::from(key.encode_der())),
            },
            Self::Ec(key) => key.to_spki(),
            Self::Dh(key) => SubjectPublicKeyInfo {
                algorithm: key.parameters.to_algorithm_identifier(),
                subject_public_key: BitString::new(0, encode_integer(&key.y)),
            },
            Self::ElGamal(key) => SubjectPublicKeyInfo {
                algorithm: key.parameters.to_algorithm_identifier(),
                subject_public_key: BitString::new(0, encode_integer(&key.y)),
            },
        }
    }

    /// Encode to DER `SubjectPublicKeyInfo`.
    pub fn encode_der(&self) -> Vec<u8> {
        self.to_spki().encode_der()
    }

    /// The algorithm of this key.
    pub fn key_algorithm(&self) -> KeyAlgorithm {
        match self {
            Self::Rsa(_) => KeyAlgorithm::Rsa,
            Self::Ec(_) => KeyAlgorithm::Ec,
            Self::Dh(_) => KeyAlgorithm::Dh,
            Self::ElGamal(_) => KeyAlgorithm::ElGamal,
        }
    }

    /// Verify a signature over a message with this key.
    ///
    /// Fails with [Error::InvalidKeyType] if the key can't produce signatures
    /// of the given algorithm and with [Error::UnrecognizedAlgorithm] if no
    /// verification engine exists for the combination of algorithm and key.
    pub fn verify_signature(
        &self,
        algorithm: SignatureAlgorithm,
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), Error> {
        let expected = algorithm.key_algorithm();
        if expected != self.key_algorithm() {
            return Err(Error::InvalidKeyType(expected.name()));
        }

        let (engine, key_data) = match self {
            Self::Rsa(key) => (
                algorithm.rsa_verification_algorithm(key.modulus.bit_length())?,
                key.encode_der(),
            ),
            Self::Ec(key) => {
                let curve = key.parameters.resolve_curve().ok_or_else(|| {
                    Error::UnrecognizedAlgorithm(format!(
                        "{} over unregistered curve",
                        algorithm
                    ))
                })?;
                let engine = algorithm.ecdsa_verification_algorithm(curve)?;

                // The engine only accepts uncompressed points.
                if !matches!(key.point, EcPoint::Uncompressed { .. }) {
                    debug!("cannot verify with compressed or infinity EC point");
                    return Err(Error::InvalidSignature);
                }

                (engine, key.point.encode())
            }
            Self::Dh(_) | Self::ElGamal(_) => return Err(Error::InvalidKeyType(expected.name())),
        };

        UnparsedPublicKey::new(engine, key_data)
            .verify(message, signature)
            .map_err(|_| Error::InvalidSignature)
    }
}

impl From<RsaPublicKey> for PublicKey {
    fn from(key: RsaPublicKey) -> Self {
        Self::Rsa(key)
    }
}

impl From<EcPublicKey> for PublicKey {
    fn from(key: EcPublicKey) -> Self {
        Self::Ec(key)
    }
}

/// A private key of any supported algorithm.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PrivateKey {
    Rsa(RsaPrivateKey),
    Ec(EcPrivateKey),
    Dh(DhPrivateKey),
    ElGamal(ElGamalPrivateKey),
}

impl PrivateKey {
    /// Decode from a PKCS #8 `OneAsymmetricKey`.
    pub fn from_one_asymmetric_key(key: &OneAsymmetricKey) -> Result<Self, Error> {
        let algorithm = &key.private_key_algorithm;
        let key_data = key.private_key.to_bytes();

        match KeyAlgorithm::try_from(algorithm)? {
            KeyAlgorithm::Rsa => Ok(Self::Rsa(Constructed::decode(
                key_data.as_ref(),
                Mode::Der,
                |cons| RsaPrivateKey::take_from(cons),
            )?)),
            KeyAlgorithm::Ec => Ok(Self::Ec(EcPrivateKey::from_one_asymmetric_key(key)?)),
            KeyAlgorithm::Dh => Ok(Self::Dh(DhPrivateKey {
                parameters: DhDomainParameters::from_algorithm_identifier(algorithm)?,
                x: decode_integer(key_data.as_ref())?,
            })),
            KeyAlgorithm::ElGamal => Ok(Self::ElGamal(ElGamalPrivateKey {
                parameters: ElGamalDomainParameters::from_algorithm_identifier(algorithm)?,
                x: decode_integer(key_data.as_ref())?,
            })),
            KeyAlgorithm::Dsa => Err(Error::UnrecognizedAlgorithm("DSA private key".into())),
        }
    }

    /// Decode from PKCS #8 DER.
    pub fn from_pkcs8_der(data: &[u8]) -> Result<Self, Error> {
        let key = Constructed::decode(data, Mode::Der, |cons| OneAsymmetricKey::take_from(cons))?;

        Self::from_one_asymmetric_key(&key)
    }

    /// Decode from PEM armored PKCS #8.
    pub fn from_pkcs8_pem(data: impl AsRef<[u8]>) -> Result<Self, Error> {
        let pem = pem::parse(data.as_ref())?;

        if pem.tag != "PRIVATE KEY" {
            return Err(Error::MalformedEncoding(format!(
                "expected PRIVATE KEY PEM block; got {}",
                pem.tag
            )));
        }

        Self::from_pkcs8_der(&pem.contents)
    }

    /// Encode to a PKCS #8 `OneAsymmetricKey`.
    pub fn to_one_asymmetric_key(&self) -> OneAsymmetricKey {
        let (private_key_algorithm, private_key) = match self {
            Self::Rsa(key) => {
                let mut buffer = Vec::new();
                // Writes to a Vec are infallible.
                let _ = key.write_encoded(Mode::Der, &mut buffer);

                (
                    AlgorithmIdentifier::with_null_parameter(to_oid(OID_RSA)),
                    Bytes::from(buffer),
                )
            }
            Self::Ec(key) => return key.to_one_asymmetric_key(),
            Self::Dh(key) => (
                key.parameters.to_algorithm_identifier(),
                encode_integer(&key.x),
            ),
            Self::ElGamal(key) => (
                key.parameters.to_algorithm_identifier(),
                encode_integer(&key.x),
            ),
        };

        OneAsymmetricKey {
            version: Version::V1,
            private_key_algorithm,
            private_key: OctetString::new(private_key),
            attributes: None,
            public_key: None,
        }
    }

    /// Encode to PKCS #8 DER.
    pub fn encode_pkcs8_der(&self) -> Vec<u8> {
        self.to_one_asymmetric_key().encode_der()
    }

    /// The algorithm of this key.
    pub fn key_algorithm(&self) -> KeyAlgorithm {
        match self {
            Self::Rsa(_) => KeyAlgorithm::Rsa,
            Self::Ec(_) => KeyAlgorithm::Ec,
            Self::Dh(_) => KeyAlgorithm::Dh,
            Self::ElGamal(_) => KeyAlgorithm::ElGamal,
        }
    }

    /// The public half of this key, when it can be obtained without arithmetic.
    ///
    /// Always available for RSA. EC keys only know their public point if it
    /// was stored next to the private scalar. Diffie-Hellman and ElGamal keys
    /// never carry it.
    pub fn public_key(&self) -> Option<PublicKey> {
        match self {
            Self::Rsa(key) => Some(PublicKey::Rsa(key.public_key())),
            Self::Ec(key) => key.public_key().map(PublicKey::Ec),
            Self::Dh(_) | Self::ElGamal(_) => None,
        }
    }
}

#[cfg(test)]
mod test {
    use {
        super::*,
        crate::{curves::NamedCurve, rfc5280::Certificate, testutil::*},
        ring::{
            rand::SystemRandom,
            signature::{EcdsaKeyPair, KeyPair, ECDSA_P256_SHA256_ASN1_SIGNING},
        },
    };

    const DH_PKCS3_KEY: &[u8] = include_bytes!("testdata/dh-pkcs3-key.pk8");
    const DH_PKCS3_PUBLIC: &[u8] = include_bytes!("testdata/dh-pkcs3-public.der");
    const DH_X942_KEY: &[u8] = include_bytes!("testdata/dh-x942-key.pk8");
    const DH_X942_PUBLIC: &[u8] = include_bytes!("testdata/dh-x942-public.der");

    fn certificate_key(der: &[u8]) -> PublicKey {
        let cert = Constructed::decode(der, Mode::Der, Certificate::take_from).unwrap();

        PublicKey::from_spki(&cert.tbs_certificate.subject_public_key_info).unwrap()
    }

    #[test]
    fn rsa_keys() {
        let public = certificate_key(ROOT_RSA_DER);
        let rsa = match &public {
            PublicKey::Rsa(key) => key,
            _ => panic!("expected RSA key"),
        };
        assert_eq!(rsa.modulus.bit_length(), 2048);
        assert_eq!(rsa.public_exponent, UnsignedInteger::from(65537));

        let private = PrivateKey::from_pkcs8_der(ROOT_KEY_PK8).unwrap();
        assert_eq!(private.key_algorithm(), KeyAlgorithm::Rsa);
        assert_eq!(private.public_key(), Some(public.clone()));
        assert_eq!(private.encode_pkcs8_der(), ROOT_KEY_PK8);

        let cert = Constructed::decode(ROOT_RSA_DER, Mode::Der, Certificate::take_from).unwrap();
        assert_eq!(
            public.to_spki(),
            cert.tbs_certificate.subject_public_key_info
        );
    }

    #[test]
    fn pem_private_key() {
        let pem_data = pem::encode(&pem::Pem {
            tag: "PRIVATE KEY".to_string(),
            contents: INTERMEDIATE_KEY_PK8.to_vec(),
        });

        let key = PrivateKey::from_pkcs8_pem(&pem_data).unwrap();
        assert_eq!(key.key_algorithm(), KeyAlgorithm::Ec);
        assert_eq!(key.public_key(), Some(certificate_key(INTERMEDIATE_P256_DER)));

        let wrong_tag = pem::encode(&pem::Pem {
            tag: "CERTIFICATE".to_string(),
            contents: INTERMEDIATE_KEY_PK8.to_vec(),
        });
        assert!(PrivateKey::from_pkcs8_pem(&wrong_tag).is_err());
    }

    #[test]
    fn dh_keys() {
        let public = PublicKey::from_spki_der(DH_PKCS3_PUBLIC).unwrap();
        let private = PrivateKey::from_pkcs8_der(DH_PKCS3_KEY).unwrap();

        match (&public, &private) {
            (PublicKey::Dh(public), PrivateKey::Dh(private)) => {
                assert_eq!(public.parameters, private.parameters);
                assert!(public.parameters.q.is_none());
                assert_eq!(public.parameters.g, UnsignedInteger::from(2));
                assert_eq!(public.parameters.p.bit_length(), 1024);
            }
            _ => panic!("expected DH keys"),
        }
        assert_eq!(public.encode_der(), DH_PKCS3_PUBLIC);
        assert_eq!(private.encode_pkcs8_der(), DH_PKCS3_KEY);
        assert!(private.public_key().is_none());

        let public = PublicKey::from_spki_der(DH_X942_PUBLIC).unwrap();
        let private = PrivateKey::from_pkcs8_der(DH_X942_KEY).unwrap();

        match (&public, &private) {
            (PublicKey::Dh(public), PrivateKey::Dh(private)) => {
                assert_eq!(public.parameters, private.parameters);
                assert_eq!(public.parameters.q.as_ref().unwrap().bit_length(), 160);
                assert!(private.x.bit_length() <= 160);
            }
            _ => panic!("expected DH keys"),
        }
        assert_eq!(public.encode_der(), DH_X942_PUBLIC);
        assert_eq!(private.encode_pkcs8_der(), DH_X942_KEY);
    }

    #[test]
    fn elgamal_keys() {
        let parameters = ElGamalDomainParameters {
            p: UnsignedInteger::from(2357),
            g: UnsignedInteger::from(2),
        };

        let public = PublicKey::ElGamal(ElGamalPublicKey {
            parameters: parameters.clone(),
            y: UnsignedInteger::from(1185),
        });
        assert_eq!(PublicKey::from_spki_der(&public.encode_der()).unwrap(), public);

        let private = PrivateKey::ElGamal(ElGamalPrivateKey {
            parameters,
            x: UnsignedInteger::from(1751),
        });
        assert_eq!(
            PrivateKey::from_pkcs8_der(&private.encode_pkcs8_der()).unwrap(),
            private
        );
    }

    #[test]
    fn verify_ecdsa() {
        let rng = SystemRandom::new();
        let document = EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, &rng).unwrap();
        let pair =
            EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, document.as_ref()).unwrap();

        let public = PublicKey::Ec(EcPublicKey {
            parameters: NamedCurve::Secp256r1.domain_parameters(),
            point: EcPoint::decode(pair.public_key().as_ref(), 32).unwrap(),
        });

        let message = b"message to sign";
        let signature = pair.sign(&rng, message).unwrap();

        public
            .verify_signature(SignatureAlgorithm::EcdsaSha256, message, signature.as_ref())
            .unwrap();

        assert!(matches!(
            public.verify_signature(SignatureAlgorithm::EcdsaSha256, b"other", signature.as_ref()),
            Err(Error::InvalidSignature)
        ));
        assert!(matches!(
            public.verify_signature(SignatureAlgorithm::Sha256Rsa, message, signature.as_ref()),
            Err(Error::InvalidKeyType("RSA"))
        ));
        assert!(matches!(
            public.verify_signature(SignatureAlgorithm::EcdsaSha512, message, signature.as_ref()),
            Err(Error::UnrecognizedAlgorithm(_))
        ));

        // The private key decoded from PKCS #8 knows the same public point.
        let private = PrivateKey::from_pkcs8_der(document.as_ref()).unwrap();
        assert_eq!(private.public_key(), Some(public));
    }

    #[test]
    fn compressed_point_cannot_verify() {
        let key = match certificate_key(INTERMEDIATE_P256_DER) {
            PublicKey::Ec(key) => key,
            _ => panic!("expected EC key"),
        };
        let x = match &key.point {
            EcPoint::Uncompressed { x, .. } => x.clone(),
            _ => panic!("expected uncompressed point"),
        };

        let compressed = PublicKey::Ec(EcPublicKey {
            parameters: key.parameters,
            point: EcPoint::Compressed { y_is_odd: false, x },
        });

        assert!(matches!(
            compressed.verify_signature(SignatureAlgorithm::EcdsaSha256, b"data", &[0x30, 0x00]),
            Err(Error::InvalidSignature)
        ));
    }

    #[test]
    fn unsupported_key_algorithm() {
        let spki = SubjectPublicKeyInfo {
            algorithm: AlgorithmIdentifier::with_null_parameter(Oid(Bytes::from_static(&[
                42, 134, 72, 206, 56, 4, 1,
            ]))),
            subject_public_key: BitString::new(0, Bytes::from_static(&[0x02, 0x01, 0x01])),
        };

        assert!(matches!(
            PublicKey::from_spki(&spki),
            Err(Error::UnrecognizedAlgorithm(_))
        ));
    }
}
