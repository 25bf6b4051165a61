// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decode, inspect and encode X.509 certificates, CRLs and certification paths.
//!
//! The entry point for untrusted input is [X509Decoder], which sniffs whether
//! a stream holds DER, PEM armored DER or a PKCS #7 `SignedData` bundle and
//! yields [X509Certificate] and [X509Crl] instances from it.
//!
//! Parsed certificates and CRLs are immutable views over the ASN.1 data
//! structures defined in this crate. They expose validity, principals,
//! extensions, public keys and signature verification.
//!
//! [CertificationPath] groups certificates into a chain and converts it
//! to and from the `PkiPath` encoding.
//!
//! Key material extracted from certificates and PKCS #8 documents can be
//! turned into plain numeric parameters via the functions in
//! [key_parameters].
//!
//! Low-level ASN.1 primitives are defined in modules having the name of the
//! RFC in which they are defined.

pub mod algorithm;
pub use algorithm::{AlgorithmAliases, DefaultAliases, KeyAlgorithm, SignatureAlgorithm};
pub mod asn1int;
pub mod asn1time;
pub mod certificate;
pub use certificate::{X500Principal, X509Certificate};
pub mod crl;
pub use crl::{RevokedCertificate, X509Crl};
pub mod curves;
pub use curves::NamedCurve;
pub mod decoder;
pub use decoder::X509Decoder;
pub mod ec;
pub use ec::{EcDomainParameters, EcPoint, EcPrivateKey, EcPublicKey};
pub mod extensions;
pub mod key_parameters;
pub use key_parameters::KeyParameters;
pub mod keys;
pub use keys::{PrivateKey, PublicKey};
pub mod path;
pub use path::CertificationPath;
pub mod rfc3279;
pub mod rfc3280;
pub mod rfc3447;
pub mod rfc4519;
pub mod rfc5280;
pub mod rfc5480;
pub mod rfc5652;
pub mod rfc5915;
pub mod rfc5958;
pub mod rfc8017;

#[cfg(test)]
mod testutil;

use {bcder::decode::DecodeError, std::convert::Infallible, thiserror::Error};

/// Errors related to X.509 certificate, CRL and key handling.
#[derive(Debug, Error)]
pub enum X509CodecError {
    #[error("malformed encoding: {0}")]
    MalformedEncoding(String),

    #[error("ASN.1 decode error: {0}")]
    Asn1Decode(DecodeError<Infallible>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PEM decode error: {0}")]
    PemDecode(pem::PemError),

    #[error("unrecognized algorithm: {0}")]
    UnrecognizedAlgorithm(String),

    #[error("key is not of the required type: expected {0}")]
    InvalidKeyType(&'static str),

    #[error("signature algorithm mismatch between certificate and to-be-signed data")]
    SignatureAlgorithmMismatch,

    #[error("signature verification failed")]
    InvalidSignature,

    #[error("certificate expired on {not_after}")]
    Expired {
        not_after: chrono::DateTime<chrono::Utc>,
    },

    #[error("certificate not valid until {not_before}")]
    NotYetValid {
        not_before: chrono::DateTime<chrono::Utc>,
    },

    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(String),
}

impl From<DecodeError<Infallible>> for X509CodecError {
    fn from(e: DecodeError<Infallible>) -> Self {
        Self::Asn1Decode(e)
    }
}

impl From<pem::PemError> for X509CodecError {
    fn from(e: pem::PemError) -> Self {
        Self::PemDecode(e)
    }
}

impl X509CodecError {
    /// Whether this error describes input that violates the ASN.1 grammar.
    pub fn is_malformed_encoding(&self) -> bool {
        matches!(
            self,
            Self::MalformedEncoding(_) | Self::Asn1Decode(_) | Self::PemDecode(_)
        )
    }
}
