// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Built-in table of named elliptic curves.
//!
//! Domain parameters come from SEC 2: Recommended Elliptic Curve Domain
//! Parameters. Only prime field curves are registered.

use {
    crate::{
        asn1int::UnsignedInteger,
        ec::{EcDomainParameters, EcPoint},
        X509CodecError as Error,
    },
    bcder::{ConstOid, Oid},
    bytes::Bytes,
    std::{
        convert::TryFrom,
        fmt::{Display, Formatter},
    },
};

/// NIST P-256 / secp256r1.
///
/// 1.2.840.10045.3.1.7
pub const OID_SECP256R1: ConstOid = Oid(&[42, 134, 72, 206, 61, 3, 1, 7]);

/// NIST P-384 / secp384r1.
///
/// 1.3.132.0.34
pub const OID_SECP384R1: ConstOid = Oid(&[43, 129, 4, 0, 34]);

/// NIST P-521 / secp521r1.
///
/// 1.3.132.0.35
pub const OID_SECP521R1: ConstOid = Oid(&[43, 129, 4, 0, 35]);

/// secp256k1.
///
/// 1.3.132.0.10
pub const OID_SECP256K1: ConstOid = Oid(&[43, 129, 4, 0, 10]);

/// A named elliptic curve with built-in domain parameters.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NamedCurve {
    Secp256r1,
    Secp384r1,
    Secp521r1,
    Secp256k1,
}

struct CurveConstants {
    p: &'static [u8],
    a: &'static [u8],
    b: &'static [u8],
    gx: &'static [u8],
    gy: &'static [u8],
    n: &'static [u8],
    seed: Option<&'static [u8]>,
}

impl NamedCurve {
    /// All registered curves.
    pub const ALL: [NamedCurve; 4] = [
        Self::Secp256r1,
        Self::Secp384r1,
        Self::Secp521r1,
        Self::Secp256k1,
    ];

    /// Resolve a curve from its object identifier.
    pub fn from_oid<T: AsRef<[u8]>>(oid: &Oid<T>) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|curve| curve.const_oid().as_ref() == oid.as_ref())
    }

    /// Resolve a curve from one of its common names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "secp256r1" | "prime256v1" | "P-256" => Some(Self::Secp256r1),
            "secp384r1" | "P-384" => Some(Self::Secp384r1),
            "secp521r1" | "P-521" => Some(Self::Secp521r1),
            "secp256k1" => Some(Self::Secp256k1),
            _ => None,
        }
    }

    fn const_oid(self) -> ConstOid {
        match self {
            Self::Secp256r1 => OID_SECP256R1,
            Self::Secp384r1 => OID_SECP384R1,
            Self::Secp521r1 => OID_SECP521R1,
            Self::Secp256k1 => OID_SECP256K1,
        }
    }

    /// The object identifier of this curve.
    pub fn oid(self) -> Oid {
        Oid(Bytes::copy_from_slice(self.const_oid().as_ref()))
    }

    /// The SEC 2 name of this curve.
    pub fn name(self) -> &'static str {
        match self {
            Self::Secp256r1 => "secp256r1",
            Self::Secp384r1 => "secp384r1",
            Self::Secp521r1 => "secp521r1",
            Self::Secp256k1 => "secp256k1",
        }
    }

    /// Size in bytes of a field element.
    pub fn field_size(self) -> usize {
        self.constants().p.len()
    }

    fn constants(self) -> CurveConstants {
        match self {
            Self::Secp256r1 => CurveConstants {
                p: SECP256R1_P,
                a: SECP256R1_A,
                b: SECP256R1_B,
                gx: SECP256R1_GX,
                gy: SECP256R1_GY,
                n: SECP256R1_N,
                seed: Some(SECP256R1_SEED),
            },
            Self::Secp384r1 => CurveConstants {
                p: SECP384R1_P,
                a: SECP384R1_A,
                b: SECP384R1_B,
                gx: SECP384R1_GX,
                gy: SECP384R1_GY,
                n: SECP384R1_N,
                seed: Some(SECP384R1_SEED),
            },
            Self::Secp521r1 => CurveConstants {
                p: SECP521R1_P,
                a: SECP521R1_A,
                b: SECP521R1_B,
                gx: SECP521R1_GX,
                gy: SECP521R1_GY,
                n: SECP521R1_N,
                seed: Some(SECP521R1_SEED),
            },
            Self::Secp256k1 => CurveConstants {
                p: SECP256K1_P,
                a: SECP256K1_A,
                b: SECP256K1_B,
                gx: SECP256K1_GX,
                gy: SECP256K1_GY,
                n: SECP256K1_N,
                seed: None,
            },
        }
    }

    /// Obtain the domain parameters of this curve.
    ///
    /// The returned parameters remember the curve they came from, which
    /// causes them to be encoded by name.
    pub fn domain_parameters(self) -> EcDomainParameters {
        let c = self.constants();
        let field_size = c.p.len();

        EcDomainParameters {
            curve: Some(self),
            field_prime: UnsignedInteger::from_be_bytes(c.p),
            a: UnsignedInteger::from_be_bytes(c.a),
            b: UnsignedInteger::from_be_bytes(c.b),
            generator: EcPoint::Uncompressed {
                x: pad(c.gx, field_size),
                y: pad(c.gy, field_size),
            },
            order: UnsignedInteger::from_be_bytes(c.n),
            cofactor: Some(UnsignedInteger::from(1)),
            seed: c.seed.map(Bytes::from_static),
        }
    }

    /// Find the registered curve having the same curve equation, generator and order.
    ///
    /// Curve names and seeds are not compared.
    pub fn from_domain_parameters(params: &EcDomainParameters) -> Option<Self> {
        Self::ALL.iter().copied().find(|curve| {
            let known = curve.domain_parameters();

            known.field_prime == params.field_prime
                && known.a == params.a
                && known.b == params.b
                && known.generator == params.generator
                && known.order == params.order
        })
    }
}

impl TryFrom<&Oid> for NamedCurve {
    type Error = Error;

    fn try_from(v: &Oid) -> Result<Self, Self::Error> {
        Self::from_oid(v).ok_or_else(|| Error::UnrecognizedAlgorithm(format!("named curve {}", v)))
    }
}

impl Display for NamedCurve {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn pad(data: &[u8], len: usize) -> Vec<u8> {
    UnsignedInteger::from_be_bytes(data).to_be_bytes_padded(len)
}

const SECP256R1_P: &[u8] = &[
    0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
];

const SECP256R1_A: &[u8] = &[
    0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfc,
];

const SECP256R1_B: &[u8] = &[
    0x5a, 0xc6, 0x35, 0xd8, 0xaa, 0x3a, 0x93, 0xe7, 0xb3, 0xeb, 0xbd, 0x55,
    0x76, 0x98, 0x86, 0xbc, 0x65, 0x1d, 0x06, 0xb0, 0xcc, 0x53, 0xb0, 0xf6,
    0x3b, 0xce, 0x3c, 0x3e, 0x27, 0xd2, 0x60, 0x4b,
];

const SECP256R1_GX: &[u8] = &[
    0x6b, 0x17, 0xd1, 0xf2, 0xe1, 0x2c, 0x42, 0x47, 0xf8, 0xbc, 0xe6, 0xe5,
    0x63, 0xa4, 0x40, 0xf2, 0x77, 0x03, 0x7d, 0x81, 0x2d, 0xeb, 0x33, 0xa0,
    0xf4, 0xa1, 0x39, 0x45, 0xd8, 0x98, 0xc2, 0x96,
];

const SECP256R1_GY: &[u8] = &[
    0x4f, 0xe3, 0x42, 0xe2, 0xfe, 0x1a, 0x7f, 0x9b, 0x8e, 0xe7, 0xeb, 0x4a,
    0x7c, 0x0f, 0x9e, 0x16, 0x2b, 0xce, 0x33, 0x57, 0x6b, 0x31, 0x5e, 0xce,
    0xcb, 0xb6, 0x40, 0x68, 0x37, 0xbf, 0x51, 0xf5,
];

const SECP256R1_N: &[u8] = &[
    0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xbc, 0xe6, 0xfa, 0xad, 0xa7, 0x17, 0x9e, 0x84,
    0xf3, 0xb9, 0xca, 0xc2, 0xfc, 0x63, 0x25, 0x51,
];

const SECP256R1_SEED: &[u8] = &[
    0xc4, 0x9d, 0x36, 0x08, 0x86, 0xe7, 0x04, 0x93, 0x6a, 0x66, 0x78, 0xe1,
    0x13, 0x9d, 0x26, 0xb7, 0x81, 0x9f, 0x7e, 0x90,
];

const SECP384R1_P: &[u8] = &[
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe, 0xff, 0xff, 0xff, 0xff,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff,
];

const SECP384R1_A: &[u8] = &[
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe, 0xff, 0xff, 0xff, 0xff,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xfc,
];

const SECP384R1_B: &[u8] = &[
    0xb3, 0x31, 0x2f, 0xa7, 0xe2, 0x3e, 0xe7, 0xe4, 0x98, 0x8e, 0x05, 0x6b,
    0xe3, 0xf8, 0x2d, 0x19, 0x18, 0x1d, 0x9c, 0x6e, 0xfe, 0x81, 0x41, 0x12,
    0x03, 0x14, 0x08, 0x8f, 0x50, 0x13, 0x87, 0x5a, 0xc6, 0x56, 0x39, 0x8d,
    0x8a, 0x2e, 0xd1, 0x9d, 0x2a, 0x85, 0xc8, 0xed, 0xd3, 0xec, 0x2a, 0xef,
];

const SECP384R1_GX: &[u8] = &[
    0xaa, 0x87, 0xca, 0x22, 0xbe, 0x8b, 0x05, 0x37, 0x8e, 0xb1, 0xc7, 0x1e,
    0xf3, 0x20, 0xad, 0x74, 0x6e, 0x1d, 0x3b, 0x62, 0x8b, 0xa7, 0x9b, 0x98,
    0x59, 0xf7, 0x41, 0xe0, 0x82, 0x54, 0x2a, 0x38, 0x55, 0x02, 0xf2, 0x5d,
    0xbf, 0x55, 0x29, 0x6c, 0x3a, 0x54, 0x5e, 0x38, 0x72, 0x76, 0x0a, 0xb7,
];

const SECP384R1_GY: &[u8] = &[
    0x36, 0x17, 0xde, 0x4a, 0x96, 0x26, 0x2c, 0x6f, 0x5d, 0x9e, 0x98, 0xbf,
    0x92, 0x92, 0xdc, 0x29, 0xf8, 0xf4, 0x1d, 0xbd, 0x28, 0x9a, 0x14, 0x7c,
    0xe9, 0xda, 0x31, 0x13, 0xb5, 0xf0, 0xb8, 0xc0, 0x0a, 0x60, 0xb1, 0xce,
    0x1d, 0x7e, 0x81, 0x9d, 0x7a, 0x43, 0x1d, 0x7c, 0x90, 0xea, 0x0e, 0x5f,
];

const SECP384R1_N: &[u8] = &[
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xc7, 0x63, 0x4d, 0x81, 0xf4, 0x37, 0x2d, 0xdf, 0x58, 0x1a, 0x0d, 0xb2,
    0x48, 0xb0, 0xa7, 0x7a, 0xec, 0xec, 0x19, 0x6a, 0xcc, 0xc5, 0x29, 0x73,
];

const SECP384R1_SEED: &[u8] = &[
    0xa3, 0x35, 0x92, 0x6a, 0xa3, 0x19, 0xa2, 0x7a, 0x1d, 0x00, 0x89, 0x6a,
    0x67, 0x73, 0xa4, 0x82, 0x7a, 0xcd, 0xac, 0x73,
];

const SECP521R1_P: &[u8] = &[
    0x01, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
];

const SECP521R1_A: &[u8] = &[
    0x01, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xfc,
];

const SECP521R1_B: &[u8] = &[
    0x00, 0x51, 0x95, 0x3e, 0xb9, 0x61, 0x8e, 0x1c, 0x9a, 0x1f, 0x92, 0x9a,
    0x21, 0xa0, 0xb6, 0x85, 0x40, 0xee, 0xa2, 0xda, 0x72, 0x5b, 0x99, 0xb3,
    0x15, 0xf3, 0xb8, 0xb4, 0x89, 0x91, 0x8e, 0xf1, 0x09, 0xe1, 0x56, 0x19,
    0x39, 0x51, 0xec, 0x7e, 0x93, 0x7b, 0x16, 0x52, 0xc0, 0xbd, 0x3b, 0xb1,
    0xbf, 0x07, 0x35, 0x73, 0xdf, 0x88, 0x3d, 0x2c, 0x34, 0xf1, 0xef, 0x45,
    0x1f, 0xd4, 0x6b, 0x50, 0x3f, 0x00,
];

const SECP521R1_GX: &[u8] = &[
    0x00, 0xc6, 0x85, 0x8e, 0x06, 0xb7, 0x04, 0x04, 0xe9, 0xcd, 0x9e, 0x3e,
    0xcb, 0x66, 0x23, 0x95, 0xb4, 0x42, 0x9c, 0x64, 0x81, 0x39, 0x05, 0x3f,
    0xb5, 0x21, 0xf8, 0x28, 0xaf, 0x60, 0x6b, 0x4d, 0x3d, 0xba, 0xa1, 0x4b,
    0x5e, 0x77, 0xef, 0xe7, 0x59, 0x28, 0xfe, 0x1d, 0xc1, 0x27, 0xa2, 0xff,
    0xa8, 0xde, 0x33, 0x48, 0xb3, 0xc1, 0x85, 0x6a, 0x42, 0x9b, 0xf9, 0x7e,
    0x7e, 0x31, 0xc2, 0xe5, 0xbd, 0x66,
];

const SECP521R1_GY: &[u8] = &[
    0x01, 0x18, 0x39, 0x29, 0x6a, 0x78, 0x9a, 0x3b, 0xc0, 0x04, 0x5c, 0x8a,
    0x5f, 0xb4, 0x2c, 0x7d, 0x1b, 0xd9, 0x98, 0xf5, 0x44, 0x49, 0x57, 0x9b,
    0x44, 0x68, 0x17, 0xaf, 0xbd, 0x17, 0x27, 0x3e, 0x66, 0x2c, 0x97, 0xee,
    0x72, 0x99, 0x5e, 0xf4, 0x26, 0x40, 0xc5, 0x50, 0xb9, 0x01, 0x3f, 0xad,
    0x07, 0x61, 0x35, 0x3c, 0x70, 0x86, 0xa2, 0x72, 0xc2, 0x40, 0x88, 0xbe,
    0x94, 0x76, 0x9f, 0xd1, 0x66, 0x50,
];

const SECP521R1_N: &[u8] = &[
    0x01, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfa, 0x51, 0x86,
    0x87, 0x83, 0xbf, 0x2f, 0x96, 0x6b, 0x7f, 0xcc, 0x01, 0x48, 0xf7, 0x09,
    0xa5, 0xd0, 0x3b, 0xb5, 0xc9, 0xb8, 0x89, 0x9c, 0x47, 0xae, 0xbb, 0x6f,
    0xb7, 0x1e, 0x91, 0x38, 0x64, 0x09,
];

const SECP521R1_SEED: &[u8] = &[
    0xd0, 0x9e, 0x88, 0x00, 0x29, 0x1c, 0xb8, 0x53, 0x96, 0xcc, 0x67, 0x17,
    0x39, 0x32, 0x84, 0xaa, 0xa0, 0xda, 0x64, 0xba,
];

const SECP256K1_P: &[u8] = &[
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xfe, 0xff, 0xff, 0xfc, 0x2f,
];

const SECP256K1_A: &[u8] = &[0x00];

const SECP256K1_B: &[u8] = &[0x07];

const SECP256K1_GX: &[u8] = &[
    0x79, 0xbe, 0x66, 0x7e, 0xf9, 0xdc, 0xbb, 0xac, 0x55, 0xa0, 0x62, 0x95,
    0xce, 0x87, 0x0b, 0x07, 0x02, 0x9b, 0xfc, 0xdb, 0x2d, 0xce, 0x28, 0xd9,
    0x59, 0xf2, 0x81, 0x5b, 0x16, 0xf8, 0x17, 0x98,
];

const SECP256K1_GY: &[u8] = &[
    0x48, 0x3a, 0xda, 0x77, 0x26, 0xa3, 0xc4, 0x65, 0x5d, 0xa4, 0xfb, 0xfc,
    0x0e, 0x11, 0x08, 0xa8, 0xfd, 0x17, 0xb4, 0x48, 0xa6, 0x85, 0x54, 0x19,
    0x9c, 0x47, 0xd0, 0x8f, 0xfb, 0x10, 0xd4, 0xb8,
];

const SECP256K1_N: &[u8] = &[
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xfe, 0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b,
    0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn oid_lookup() {
        for curve in NamedCurve::ALL {
            assert_eq!(NamedCurve::from_oid(&curve.oid()), Some(curve));
            assert_eq!(NamedCurve::from_name(curve.name()), Some(curve));
        }

        assert_eq!(NamedCurve::from_name("P-384"), Some(NamedCurve::Secp384r1));
        assert!(NamedCurve::from_oid(&Oid(Bytes::from_static(&[43, 129, 4, 0, 1]))).is_none());
    }

    #[test]
    fn field_sizes() {
        assert_eq!(NamedCurve::Secp256r1.field_size(), 32);
        assert_eq!(NamedCurve::Secp384r1.field_size(), 48);
        assert_eq!(NamedCurve::Secp521r1.field_size(), 66);
        assert_eq!(NamedCurve::Secp256k1.field_size(), 32);
    }

    #[test]
    fn domain_parameter_shapes() {
        for curve in NamedCurve::ALL {
            let params = curve.domain_parameters();
            let size = curve.field_size();

            assert_eq!(params.field_size(), size);
            assert_eq!(params.order.to_be_bytes_padded(size).len(), size);
            assert_eq!(params.generator.encode().len(), 1 + 2 * size);
            assert_eq!(NamedCurve::from_domain_parameters(&params), Some(curve));
        }

        let k1 = NamedCurve::Secp256k1.domain_parameters();
        assert!(k1.a.is_zero());
        assert_eq!(k1.b, UnsignedInteger::from(7));
        assert!(k1.seed.is_none());

        assert_eq!(NamedCurve::Secp521r1.domain_parameters().field_prime.bit_length(), 521);
    }

    #[test]
    fn order_lengths() {
        for (curve, bits) in [
            (NamedCurve::Secp256r1, 256),
            (NamedCurve::Secp384r1, 384),
            (NamedCurve::Secp521r1, 521),
            (NamedCurve::Secp256k1, 256),
        ] {
            assert_eq!(curve.domain_parameters().order.bit_length(), bits, "{}", curve);
        }
    }

    #[test]
    fn explicit_p521_matches_table() {
        let params = bcder::decode::Constructed::decode(
            &include_bytes!("testdata/secp521r1-explicit.der")[..],
            bcder::Mode::Der,
            |cons| crate::rfc5480::EcParameters::take_from(cons),
        )
        .unwrap();
        let params = EcDomainParameters::from_ec_parameters(&params).unwrap();

        assert_eq!(params.curve, None);
        assert_eq!(
            params.order,
            NamedCurve::Secp521r1.domain_parameters().order
        );
        assert_eq!(params.resolve_curve(), Some(NamedCurve::Secp521r1));
    }
}
