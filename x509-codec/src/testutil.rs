// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixtures shared by unit tests.
//!
//! The certificates form a chain: an RSA root signs a P-256 intermediate,
//! which signs a P-384 leaf. The root also issues a CRL revoking the
//! intermediate's serial number.

use {
    crate::{X509Certificate, X509Crl},
    chrono::{DateTime, TimeZone, Utc},
};

pub const ROOT_RSA_DER: &[u8] = include_bytes!("testdata/root-rsa.der");
pub const ROOT_RSA_PEM: &[u8] = include_bytes!("testdata/root-rsa.pem");
pub const INTERMEDIATE_P256_DER: &[u8] = include_bytes!("testdata/intermediate-p256.der");
pub const INTERMEDIATE_P256_PEM: &[u8] = include_bytes!("testdata/intermediate-p256.pem");
pub const LEAF_P384_DER: &[u8] = include_bytes!("testdata/leaf-p384.der");
pub const LEAF_P384_PEM: &[u8] = include_bytes!("testdata/leaf-p384.pem");

/// Self-signed P-256 certificate with a critical private extension.
pub const CRITICAL_UNKNOWN_DER: &[u8] = include_bytes!("testdata/critical-unknown.der");
pub const CRITICAL_UNKNOWN_PEM: &[u8] = include_bytes!("testdata/critical-unknown.pem");

/// Self-signed P-256 certificate whose key carries explicit curve parameters.
pub const EXPLICIT_P256_DER: &[u8] = include_bytes!("testdata/explicit-p256.der");

/// Self-signed version 1 RSA certificate.
pub const V1_RSA_DER: &[u8] = include_bytes!("testdata/v1-rsa.der");

/// Self-signed certificates over the same 1024 bit RSA key, signed with
/// SHA-256 and SHA-384.
pub const RSA1024_SHA256_DER: &[u8] = include_bytes!("testdata/rsa1024-sha256.der");
pub const RSA1024_SHA384_DER: &[u8] = include_bytes!("testdata/rsa1024-sha384.der");

pub const ROOT_CRL_DER: &[u8] = include_bytes!("testdata/root-crl.der");
pub const ROOT_CRL_PEM: &[u8] = include_bytes!("testdata/root-crl.pem");

/// PKCS #7 bundle holding leaf, intermediate and root (in that order).
pub const CHAIN_P7B: &[u8] = include_bytes!("testdata/chain.p7b");
pub const CHAIN_INDEFINITE_P7B: &[u8] = include_bytes!("testdata/chain-indefinite.p7b");
pub const LEAF_P7B: &[u8] = include_bytes!("testdata/leaf.p7b");
pub const LEAF_INDEFINITE_P7B: &[u8] = include_bytes!("testdata/leaf-indefinite.p7b");

/// PKCS #7 bundle holding the root CRL and the root certificate.
pub const ROOT_CRL_P7B: &[u8] = include_bytes!("testdata/root-crl.p7b");
pub const ROOT_CRL_INDEFINITE_P7B: &[u8] = include_bytes!("testdata/root-crl-indefinite.p7b");

/// PKCS #8 RSA private key of the root certificate.
pub const ROOT_KEY_PK8: &[u8] = include_bytes!("testdata/root-key.pk8");

/// PKCS #8 P-256 private key of the intermediate certificate.
pub const INTERMEDIATE_KEY_PK8: &[u8] = include_bytes!("testdata/intermediate-key.pk8");

pub fn root_cert() -> X509Certificate {
    X509Certificate::from_der(ROOT_RSA_DER).unwrap()
}

pub fn intermediate_cert() -> X509Certificate {
    X509Certificate::from_der(INTERMEDIATE_P256_DER).unwrap()
}

pub fn leaf_cert() -> X509Certificate {
    X509Certificate::from_der(LEAF_P384_DER).unwrap()
}

pub fn root_crl() -> X509Crl {
    X509Crl::from_der(ROOT_CRL_DER).unwrap()
}

/// A UTC instant at midnight of the given day.
pub fn utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}
