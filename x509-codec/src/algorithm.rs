// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cryptographic algorithms commonly encountered in X.509 certificates.

use {
    crate::{
        curves::NamedCurve,
        rfc3279::{OID_DH_KEY_AGREEMENT, OID_DH_PUBLIC_NUMBER, OID_ELGAMAL},
        rfc5280::AlgorithmIdentifier,
        rfc5480::OID_EC_PUBLIC_KEY,
        X509CodecError as Error,
    },
    bcder::{ConstOid, Oid},
    bytes::Bytes,
    ring::{digest, signature},
    std::{
        convert::TryFrom,
        fmt::{Display, Formatter},
    },
};

/// SHA-1 digest algorithm.
///
/// 1.3.14.3.2.26
const OID_SHA1: ConstOid = Oid(&[43, 14, 3, 2, 26]);

/// SHA-256 digest algorithm.
///
/// 2.16.840.1.101.3.4.2.1
const OID_SHA256: ConstOid = Oid(&[96, 134, 72, 1, 101, 3, 4, 2, 1]);

/// SHA-384 digest algorithm.
///
/// 2.16.840.1.101.3.4.2.2
const OID_SHA384: ConstOid = Oid(&[96, 134, 72, 1, 101, 3, 4, 2, 2]);

/// SHA-512 digest algorithm.
///
/// 2.16.840.1.101.3.4.2.3
const OID_SHA512: ConstOid = Oid(&[96, 134, 72, 1, 101, 3, 4, 2, 3]);

/// RSA encryption.
///
/// 1.2.840.113549.1.1.1
pub const OID_RSA: ConstOid = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 1]);

/// RSA+MD5 encryption.
///
/// 1.2.840.113549.1.1.4
const OID_MD5_RSA: ConstOid = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 4]);

/// RSA+SHA-1 encryption.
///
/// 1.2.840.113549.1.1.5
const OID_SHA1_RSA: ConstOid = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 5]);

/// RSA+SHA-256 encryption.
///
/// 1.2.840.113549.1.1.11
const OID_SHA256_RSA: ConstOid = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 11]);

/// RSA+SHA-384 encryption.
///
/// 1.2.840.113549.1.1.12
const OID_SHA384_RSA: ConstOid = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 12]);

/// RSA+SHA-512 encryption.
///
/// 1.2.840.113549.1.1.13
const OID_SHA512_RSA: ConstOid = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 13]);

/// ECDSA with SHA-1.
///
/// 1.2.840.10045.4.1
const OID_ECDSA_SHA1: ConstOid = Oid(&[42, 134, 72, 206, 61, 4, 1]);

/// ECDSA with SHA-256.
///
/// 1.2.840.10045.4.3.2
const OID_ECDSA_SHA256: ConstOid = Oid(&[42, 134, 72, 206, 61, 4, 3, 2]);

/// ECDSA with SHA-384.
///
/// 1.2.840.10045.4.3.3
const OID_ECDSA_SHA384: ConstOid = Oid(&[42, 134, 72, 206, 61, 4, 3, 3]);

/// ECDSA with SHA-512.
///
/// 1.2.840.10045.4.3.4
const OID_ECDSA_SHA512: ConstOid = Oid(&[42, 134, 72, 206, 61, 4, 3, 4]);

/// DSA with SHA-1.
///
/// 1.2.840.10040.4.3
const OID_DSA_SHA1: ConstOid = Oid(&[42, 134, 72, 206, 56, 4, 3]);

fn to_oid(oid: ConstOid) -> Oid {
    Oid(Bytes::copy_from_slice(oid.as_ref()))
}

/// A hashing algorithm used for digesting data.
///
/// Instances can be converted to and from [Oid] via `From`/`Into`
/// implementations.
///
/// Instances can be converted into a [digest::Context] capable of computing
/// digests via `From`/`Into`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DigestAlgorithm {
    /// SHA-1.
    ///
    /// Corresponds to OID 1.3.14.3.2.26.
    Sha1,
    /// SHA-256.
    ///
    /// Corresponds to OID 2.16.840.1.101.3.4.2.1.
    Sha256,
    /// SHA-384.
    ///
    /// Corresponds to OID 2.16.840.1.101.3.4.2.2.
    Sha384,
    /// SHA-512.
    ///
    /// Corresponds to OID 2.16.840.1.101.3.4.2.3.
    Sha512,
}

impl From<DigestAlgorithm> for Oid {
    fn from(alg: DigestAlgorithm) -> Self {
        to_oid(match alg {
            DigestAlgorithm::Sha1 => OID_SHA1,
            DigestAlgorithm::Sha256 => OID_SHA256,
            DigestAlgorithm::Sha384 => OID_SHA384,
            DigestAlgorithm::Sha512 => OID_SHA512,
        })
    }
}

impl TryFrom<&Oid> for DigestAlgorithm {
    type Error = Error;

    fn try_from(v: &Oid) -> Result<Self, Self::Error> {
        if v == &OID_SHA1 {
            Ok(Self::Sha1)
        } else if v == &OID_SHA256 {
            Ok(Self::Sha256)
        } else if v == &OID_SHA384 {
            Ok(Self::Sha384)
        } else if v == &OID_SHA512 {
            Ok(Self::Sha512)
        } else {
            Err(Error::UnrecognizedAlgorithm(format!("digest {}", v)))
        }
    }
}

impl From<DigestAlgorithm> for digest::Context {
    fn from(alg: DigestAlgorithm) -> Self {
        digest::Context::new(match alg {
            DigestAlgorithm::Sha1 => &digest::SHA1_FOR_LEGACY_USE_ONLY,
            DigestAlgorithm::Sha256 => &digest::SHA256,
            DigestAlgorithm::Sha384 => &digest::SHA384,
            DigestAlgorithm::Sha512 => &digest::SHA512,
        })
    }
}

impl DigestAlgorithm {
    /// Obtain an object that can be used to digest content using this algorithm.
    pub fn digester(&self) -> digest::Context {
        digest::Context::from(*self)
    }

    /// Digest a buffer in one shot.
    pub fn digest_data(&self, data: &[u8]) -> Vec<u8> {
        let mut h = self.digester();
        h.update(data);
        h.finish().as_ref().to_vec()
    }
}

/// An algorithm used to digitally sign content.
///
/// Instances can be converted to/from [Oid] via `From`/`Into`.
///
/// Every algorithm has a canonical upper case name such as `SHA256WITHRSA`,
/// which is what [DefaultAliases] reports for its OID.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum SignatureAlgorithm {
    /// MD5 with RSA encryption.
    ///
    /// Corresponds to OID 1.2.840.113549.1.1.4.
    Md5Rsa,

    /// SHA-1 with RSA encryption.
    ///
    /// Corresponds to OID 1.2.840.113549.1.1.5.
    Sha1Rsa,

    /// SHA-256 with RSA encryption.
    ///
    /// Corresponds to OID 1.2.840.113549.1.1.11.
    Sha256Rsa,

    /// SHA-384 with RSA encryption.
    ///
    /// Corresponds to OID 1.2.840.113549.1.1.12.
    Sha384Rsa,

    /// SHA-512 with RSA encryption.
    ///
    /// Corresponds to OID 1.2.840.113549.1.1.13.
    Sha512Rsa,

    /// ECDSA with SHA-1.
    ///
    /// Corresponds to OID 1.2.840.10045.4.1.
    EcdsaSha1,

    /// ECDSA with SHA-256.
    ///
    /// Corresponds to OID 1.2.840.10045.4.3.2.
    EcdsaSha256,

    /// ECDSA with SHA-384.
    ///
    /// Corresponds to OID 1.2.840.10045.4.3.3.
    EcdsaSha384,

    /// ECDSA with SHA-512.
    ///
    /// Corresponds to OID 1.2.840.10045.4.3.4.
    EcdsaSha512,

    /// DSA with SHA-1.
    ///
    /// Corresponds to OID 1.2.840.10040.4.3.
    DsaSha1,
}

impl SignatureAlgorithm {
    pub const ALL: [SignatureAlgorithm; 10] = [
        Self::Md5Rsa,
        Self::Sha1Rsa,
        Self::Sha256Rsa,
        Self::Sha384Rsa,
        Self::Sha512Rsa,
        Self::EcdsaSha1,
        Self::EcdsaSha256,
        Self::EcdsaSha384,
        Self::EcdsaSha512,
        Self::DsaSha1,
    ];

    fn const_oid(self) -> ConstOid {
        match self {
            Self::Md5Rsa => OID_MD5_RSA,
            Self::Sha1Rsa => OID_SHA1_RSA,
            Self::Sha256Rsa => OID_SHA256_RSA,
            Self::Sha384Rsa => OID_SHA384_RSA,
            Self::Sha512Rsa => OID_SHA512_RSA,
            Self::EcdsaSha1 => OID_ECDSA_SHA1,
            Self::EcdsaSha256 => OID_ECDSA_SHA256,
            Self::EcdsaSha384 => OID_ECDSA_SHA384,
            Self::EcdsaSha512 => OID_ECDSA_SHA512,
            Self::DsaSha1 => OID_DSA_SHA1,
        }
    }

    /// The canonical name of this algorithm.
    pub fn name(self) -> &'static str {
        match self {
            Self::Md5Rsa => "MD5WITHRSA",
            Self::Sha1Rsa => "SHA1WITHRSA",
            Self::Sha256Rsa => "SHA256WITHRSA",
            Self::Sha384Rsa => "SHA384WITHRSA",
            Self::Sha512Rsa => "SHA512WITHRSA",
            Self::EcdsaSha1 => "SHA1WITHECDSA",
            Self::EcdsaSha256 => "SHA256WITHECDSA",
            Self::EcdsaSha384 => "SHA384WITHECDSA",
            Self::EcdsaSha512 => "SHA512WITHECDSA",
            Self::DsaSha1 => "SHA1WITHDSA",
        }
    }

    /// Resolve an algorithm from a name.
    ///
    /// Accepts canonical names in any letter case as well as the dotted
    /// form of the algorithm OID.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|alg| {
            alg.name().eq_ignore_ascii_case(name) || format!("{}", Oid::from(*alg)) == name
        })
    }

    /// The key algorithm that produces signatures of this type.
    pub fn key_algorithm(self) -> KeyAlgorithm {
        match self {
            Self::Md5Rsa | Self::Sha1Rsa | Self::Sha256Rsa | Self::Sha384Rsa | Self::Sha512Rsa => {
                KeyAlgorithm::Rsa
            }
            Self::EcdsaSha1 | Self::EcdsaSha256 | Self::EcdsaSha384 | Self::EcdsaSha512 => {
                KeyAlgorithm::Ec
            }
            Self::DsaSha1 => KeyAlgorithm::Dsa,
        }
    }

    /// The digest algorithm used by this signature algorithm.
    ///
    /// `None` for digests this crate cannot compute.
    pub fn digest_algorithm(self) -> Option<DigestAlgorithm> {
        match self {
            Self::Md5Rsa => None,
            Self::Sha1Rsa | Self::EcdsaSha1 | Self::DsaSha1 => Some(DigestAlgorithm::Sha1),
            Self::Sha256Rsa | Self::EcdsaSha256 => Some(DigestAlgorithm::Sha256),
            Self::Sha384Rsa | Self::EcdsaSha384 => Some(DigestAlgorithm::Sha384),
            Self::Sha512Rsa | Self::EcdsaSha512 => Some(DigestAlgorithm::Sha512),
        }
    }

    /// Obtain the verification engine for an RSA key of `modulus_bits` bits.
    ///
    /// Keys of 1024 to 2047 bits get the legacy engines, which exist for
    /// all digests but SHA-384.
    pub fn rsa_verification_algorithm(
        self,
        modulus_bits: usize,
    ) -> Result<&'static dyn signature::VerificationAlgorithm, Error> {
        let unsupported = || {
            Error::UnrecognizedAlgorithm(format!("{} with {} bit key", self.name(), modulus_bits))
        };

        if !(1024..=8192).contains(&modulus_bits) {
            return Err(unsupported());
        }

        match (self, modulus_bits >= 2048) {
            (Self::Sha1Rsa, true) => Ok(&signature::RSA_PKCS1_2048_8192_SHA1_FOR_LEGACY_USE_ONLY),
            (Self::Sha1Rsa, false) => Ok(&signature::RSA_PKCS1_1024_8192_SHA1_FOR_LEGACY_USE_ONLY),
            (Self::Sha256Rsa, true) => Ok(&signature::RSA_PKCS1_2048_8192_SHA256),
            (Self::Sha256Rsa, false) => {
                Ok(&signature::RSA_PKCS1_1024_8192_SHA256_FOR_LEGACY_USE_ONLY)
            }
            (Self::Sha384Rsa, true) => Ok(&signature::RSA_PKCS1_2048_8192_SHA384),
            (Self::Sha512Rsa, true) => Ok(&signature::RSA_PKCS1_2048_8192_SHA512),
            (Self::Sha512Rsa, false) => {
                Ok(&signature::RSA_PKCS1_1024_8192_SHA512_FOR_LEGACY_USE_ONLY)
            }
            (Self::Sha384Rsa, false) => Err(unsupported()),
            (alg, _) => Err(Error::UnrecognizedAlgorithm(alg.name().to_string())),
        }
    }

    /// Obtain the verification engine for an ECDSA key on `curve`.
    pub fn ecdsa_verification_algorithm(
        self,
        curve: NamedCurve,
    ) -> Result<&'static dyn signature::VerificationAlgorithm, Error> {
        match (self, curve) {
            (Self::EcdsaSha256, NamedCurve::Secp256r1) => Ok(&signature::ECDSA_P256_SHA256_ASN1),
            (Self::EcdsaSha384, NamedCurve::Secp256r1) => Ok(&signature::ECDSA_P256_SHA384_ASN1),
            (Self::EcdsaSha256, NamedCurve::Secp384r1) => Ok(&signature::ECDSA_P384_SHA256_ASN1),
            (Self::EcdsaSha384, NamedCurve::Secp384r1) => Ok(&signature::ECDSA_P384_SHA384_ASN1),
            (alg, curve) if alg.key_algorithm() == KeyAlgorithm::Ec => Err(
                Error::UnrecognizedAlgorithm(format!("{} on curve {}", alg.name(), curve)),
            ),
            (alg, _) => Err(Error::UnrecognizedAlgorithm(alg.name().to_string())),
        }
    }
}

impl Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl From<SignatureAlgorithm> for Oid {
    fn from(alg: SignatureAlgorithm) -> Self {
        to_oid(alg.const_oid())
    }
}

impl TryFrom<&Oid> for SignatureAlgorithm {
    type Error = Error;

    fn try_from(v: &Oid) -> Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|alg| v == &alg.const_oid())
            .ok_or_else(|| Error::UnrecognizedAlgorithm(format!("signature {}", v)))
    }
}

impl TryFrom<&AlgorithmIdentifier> for SignatureAlgorithm {
    type Error = Error;

    fn try_from(v: &AlgorithmIdentifier) -> Result<Self, Self::Error> {
        Self::try_from(&v.algorithm)
    }
}

/// Cryptographic algorithm of a public or private key.
///
/// Instances can be converted to/from the underlying ASN.1 type and
/// OIDs.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum KeyAlgorithm {
    /// RSA
    ///
    /// Corresponds to OID 1.2.840.113549.1.1.1.
    Rsa,

    /// Elliptic curve.
    ///
    /// Corresponds to OID 1.2.840.10045.2.1.
    Ec,

    /// DSA.
    ///
    /// Only appears as the key type of DSA signature algorithms. Keys of this
    /// type are not decoded.
    Dsa,

    /// Diffie-Hellman.
    ///
    /// Corresponds to OIDs 1.2.840.10046.2.1 (X9.42) and
    /// 1.2.840.113549.1.3.1 (PKCS #3).
    Dh,

    /// ElGamal.
    ///
    /// Corresponds to OID 1.3.14.7.2.1.1.
    ElGamal,
}

impl TryFrom<&Oid> for KeyAlgorithm {
    type Error = Error;

    fn try_from(v: &Oid) -> Result<Self, Self::Error> {
        if v == &OID_RSA {
            Ok(Self::Rsa)
        } else if v == &OID_EC_PUBLIC_KEY {
            Ok(Self::Ec)
        } else if v == &OID_DH_PUBLIC_NUMBER || v == &OID_DH_KEY_AGREEMENT {
            Ok(Self::Dh)
        } else if v == &OID_ELGAMAL {
            Ok(Self::ElGamal)
        } else {
            Err(Error::UnrecognizedAlgorithm(format!("key {}", v)))
        }
    }
}

impl TryFrom<&AlgorithmIdentifier> for KeyAlgorithm {
    type Error = Error;

    fn try_from(v: &AlgorithmIdentifier) -> Result<Self, Self::Error> {
        Self::try_from(&v.algorithm)
    }
}

impl KeyAlgorithm {
    /// Name of the algorithm.
    pub fn name(self) -> &'static str {
        match self {
            Self::Rsa => "RSA",
            Self::Ec => "EC",
            Self::Dsa => "DSA",
            Self::Dh => "DH",
            Self::ElGamal => "ElGamal",
        }
    }
}

/// Maps signature algorithm OIDs to display names.
///
/// Name lookups drive which verification engine handles a signature, so
/// an implementation can teach the crate about alternate OIDs for a known
/// algorithm by returning that algorithm's canonical name.
pub trait AlgorithmAliases {
    /// Obtain the name of the signature algorithm having the given OID.
    fn signature_algorithm_name(&self, oid: &Oid) -> Option<String>;
}

/// The built-in alias table.
///
/// Names every [SignatureAlgorithm] by its canonical name.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultAliases;

impl AlgorithmAliases for DefaultAliases {
    fn signature_algorithm_name(&self, oid: &Oid) -> Option<String> {
        SignatureAlgorithm::try_from(oid)
            .ok()
            .map(|alg| alg.name().to_string())
    }
}

/// Derive the name of a signature algorithm, falling back to the dotted OID.
pub fn signature_algorithm_name(aliases: &dyn AlgorithmAliases, oid: &Oid) -> String {
    aliases
        .signature_algorithm_name(oid)
        .unwrap_or_else(|| format!("{}", oid))
}

#[cfg(test)]
mod test {
    use super::*;

    struct LegacyAliases;

    impl AlgorithmAliases for LegacyAliases {
        fn signature_algorithm_name(&self, oid: &Oid) -> Option<String> {
            if oid.as_ref() == [43, 14, 3, 2, 29] {
                Some("sha1WithRSA".into())
            } else {
                DefaultAliases.signature_algorithm_name(oid)
            }
        }
    }

    #[test]
    fn signature_algorithm_oids() {
        for alg in SignatureAlgorithm::ALL {
            let oid = Oid::from(alg);
            assert_eq!(SignatureAlgorithm::try_from(&oid).unwrap(), alg);
            assert_eq!(SignatureAlgorithm::from_name(alg.name()), Some(alg));
            assert_eq!(
                SignatureAlgorithm::from_name(&format!("{}", oid)),
                Some(alg)
            );
        }

        assert_eq!(
            SignatureAlgorithm::from_name("sha256WithRSA"),
            Some(SignatureAlgorithm::Sha256Rsa)
        );
        assert!(SignatureAlgorithm::from_name("1.2.3.4").is_none());
    }

    #[test]
    fn alias_resolution() {
        let sha256_rsa = Oid::from(SignatureAlgorithm::Sha256Rsa);
        assert_eq!(
            signature_algorithm_name(&DefaultAliases, &sha256_rsa),
            "SHA256WITHRSA"
        );

        // OIW sha1WithRSASignature is only known through the custom table.
        let oiw = Oid(Bytes::from_static(&[43, 14, 3, 2, 29]));
        assert_eq!(signature_algorithm_name(&DefaultAliases, &oiw), "1.3.14.3.2.29");

        let name = signature_algorithm_name(&LegacyAliases, &oiw);
        assert_eq!(
            SignatureAlgorithm::from_name(&name),
            Some(SignatureAlgorithm::Sha1Rsa)
        );
    }

    #[test]
    fn key_algorithms() {
        assert_eq!(
            KeyAlgorithm::try_from(&to_oid(OID_DH_KEY_AGREEMENT)).unwrap(),
            KeyAlgorithm::Dh
        );
        assert_eq!(
            KeyAlgorithm::try_from(&to_oid(OID_DH_PUBLIC_NUMBER)).unwrap(),
            KeyAlgorithm::Dh
        );
        assert_eq!(
            KeyAlgorithm::try_from(&to_oid(OID_ELGAMAL)).unwrap(),
            KeyAlgorithm::ElGamal
        );
        assert!(KeyAlgorithm::try_from(&to_oid(OID_SHA256)).is_err());
    }

    #[test]
    fn verification_engines() {
        assert!(SignatureAlgorithm::Sha256Rsa
            .rsa_verification_algorithm(2048)
            .is_ok());
        assert!(SignatureAlgorithm::Sha384Rsa
            .rsa_verification_algorithm(4096)
            .is_ok());
        assert!(SignatureAlgorithm::EcdsaSha256
            .ecdsa_verification_algorithm(NamedCurve::Secp384r1)
            .is_ok());
        assert!(matches!(
            SignatureAlgorithm::EcdsaSha256.ecdsa_verification_algorithm(NamedCurve::Secp256k1),
            Err(Error::UnrecognizedAlgorithm(_))
        ));
        assert!(matches!(
            SignatureAlgorithm::Md5Rsa.rsa_verification_algorithm(2048),
            Err(Error::UnrecognizedAlgorithm(_))
        ));
        assert!(matches!(
            SignatureAlgorithm::EcdsaSha256.rsa_verification_algorithm(2048),
            Err(Error::UnrecognizedAlgorithm(_))
        ));
    }

    #[test]
    fn legacy_rsa_key_sizes() {
        for alg in [
            SignatureAlgorithm::Sha1Rsa,
            SignatureAlgorithm::Sha256Rsa,
            SignatureAlgorithm::Sha512Rsa,
        ] {
            assert!(alg.rsa_verification_algorithm(1024).is_ok(), "{}", alg);
            assert!(alg.rsa_verification_algorithm(2047).is_ok(), "{}", alg);
        }

        assert!(matches!(
            SignatureAlgorithm::Sha384Rsa.rsa_verification_algorithm(1024),
            Err(Error::UnrecognizedAlgorithm(_))
        ));
        assert!(matches!(
            SignatureAlgorithm::Sha256Rsa.rsa_verification_algorithm(512),
            Err(Error::UnrecognizedAlgorithm(_))
        ));
        assert!(matches!(
            SignatureAlgorithm::Sha256Rsa.rsa_verification_algorithm(16384),
            Err(Error::UnrecognizedAlgorithm(_))
        ));
    }

    #[test]
    fn digests() {
        assert_eq!(DigestAlgorithm::Sha256.digest_data(b"").len(), 32);
        assert_eq!(
            hex::encode(DigestAlgorithm::Sha1.digest_data(b"abc")),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }
}
