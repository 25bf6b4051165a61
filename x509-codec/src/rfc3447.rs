// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ASN.1 types defined in RFC 3447.

use {
    crate::{asn1int::UnsignedInteger, rfc8017::RsaPublicKey},
    bcder::{
        decode::{Constructed, DecodeError, Source},
        encode::{self, PrimitiveContent, Values},
        Mode,
    },
    std::{
        io::Write,
        ops::{Deref, DerefMut},
    },
};

/// Other prime info
///
/// ```asn.1
/// OtherPrimeInfo ::= SEQUENCE {
///     prime             INTEGER,  -- ri
///     exponent          INTEGER,  -- di
///     coefficient       INTEGER   -- ti
/// }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OtherPrimeInfo {
    pub ri: UnsignedInteger,
    pub di: UnsignedInteger,
    pub ti: UnsignedInteger,
}

impl OtherPrimeInfo {
    pub fn take_opt_from<S: Source>(
        cons: &mut Constructed<S>,
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        cons.take_opt_sequence(|cons| Self::from_sequence(cons))
    }

    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| Self::from_sequence(cons))
    }

    fn from_sequence<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        let ri = UnsignedInteger::take_from(cons)?;
        let di = UnsignedInteger::take_from(cons)?;
        let ti = UnsignedInteger::take_from(cons)?;

        Ok(Self { ri, di, ti })
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        encode::sequence((self.ri.encode_ref(), self.di.encode_ref(), self.ti.encode_ref()))
    }
}

impl Values for OtherPrimeInfo {
    fn encoded_len(&self, mode: Mode) -> usize {
        self.encode_ref().encoded_len(mode)
    }

    fn write_encoded<W: Write>(&self, mode: Mode, target: &mut W) -> Result<(), std::io::Error> {
        self.encode_ref().write_encoded(mode, target)
    }
}

/// ```asn.1
/// OtherPrimeInfos ::= SEQUENCE SIZE(1..MAX) OF OtherPrimeInfo
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OtherPrimeInfos(Vec<OtherPrimeInfo>);

impl Deref for OtherPrimeInfos {
    type Target = Vec<OtherPrimeInfo>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for OtherPrimeInfos {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl OtherPrimeInfos {
    pub fn take_opt_from<S: Source>(
        cons: &mut Constructed<S>,
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        cons.take_opt_sequence(|cons| Self::from_sequence(cons))
    }

    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| Self::from_sequence(cons))
    }

    pub fn from_sequence<S: Source>(
        cons: &mut Constructed<S>,
    ) -> Result<Self, DecodeError<S::Error>> {
        let mut vals = Vec::new();

        while let Some(info) = OtherPrimeInfo::take_opt_from(cons)? {
            vals.push(info);
        }

        Ok(Self(vals))
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        encode::sequence(&self.0)
    }
}

impl Values for OtherPrimeInfos {
    fn encoded_len(&self, mode: Mode) -> usize {
        self.encode_ref().encoded_len(mode)
    }

    fn write_encoded<W: Write>(&self, mode: Mode, target: &mut W) -> Result<(), std::io::Error> {
        self.encode_ref().write_encoded(mode, target)
    }
}

/// An RSA private key.
///
/// ```ASN.1
/// RSAPrivateKey ::= SEQUENCE {
///     version           Version,
///     modulus           INTEGER,  -- n
///     publicExponent    INTEGER,  -- e
///     privateExponent   INTEGER,  -- d
///     prime1            INTEGER,  -- p
///     prime2            INTEGER,  -- q
///     exponent1         INTEGER,  -- d mod (p-1)
///     exponent2         INTEGER,  -- d mod (q-1)
///     coefficient       INTEGER,  -- (inverse of q) mod p
///     otherPrimeInfos   OtherPrimeInfos OPTIONAL
/// }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RsaPrivateKey {
    pub version: UnsignedInteger,
    pub n: UnsignedInteger,
    pub e: UnsignedInteger,
    pub d: UnsignedInteger,
    pub p: UnsignedInteger,
    pub q: UnsignedInteger,
    pub dp: UnsignedInteger,
    pub dq: UnsignedInteger,
    pub q_inv: UnsignedInteger,
    pub other_prime_infos: Option<OtherPrimeInfos>,
}

impl RsaPrivateKey {
    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            let version = UnsignedInteger::take_from(cons)?;
            let n = UnsignedInteger::take_from(cons)?;
            let e = UnsignedInteger::take_from(cons)?;
            let d = UnsignedInteger::take_from(cons)?;
            let p = UnsignedInteger::take_from(cons)?;
            let q = UnsignedInteger::take_from(cons)?;
            let dp = UnsignedInteger::take_from(cons)?;
            let dq = UnsignedInteger::take_from(cons)?;
            let q_inv = UnsignedInteger::take_from(cons)?;
            let other_prime_infos = OtherPrimeInfos::take_opt_from(cons)?;

            Ok(Self {
                version,
                n,
                e,
                d,
                p,
                q,
                dp,
                dq,
                q_inv,
                other_prime_infos,
            })
        })
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        encode::sequence((
            self.version.encode_ref(),
            self.n.encode_ref(),
            self.e.encode_ref(),
            self.d.encode_ref(),
            self.p.encode_ref(),
            self.q.encode_ref(),
            self.dp.encode_ref(),
            self.dq.encode_ref(),
            self.q_inv.encode_ref(),
            self.other_prime_infos.as_ref().map(|x| x.encode_ref()),
        ))
    }
}

impl Values for RsaPrivateKey {
    fn encoded_len(&self, mode: Mode) -> usize {
        self.encode_ref().encoded_len(mode)
    }

    fn write_encoded<W: Write>(&self, mode: Mode, target: &mut W) -> Result<(), std::io::Error> {
        self.encode_ref().write_encoded(mode, target)
    }
}

impl RsaPrivateKey {
    /// The public half of this key.
    pub fn public_key(&self) -> RsaPublicKey {
        RsaPublicKey {
            modulus: self.n.clone(),
            public_exponent: self.e.clone(),
        }
    }

    /// Whether the Chinese Remainder Theorem components are populated.
    ///
    /// Some encoders emit zero for the CRT fields when only the modulus and
    /// private exponent are known.
    pub fn has_crt_components(&self) -> bool {
        !(self.p.is_zero() || self.q.is_zero())
    }
}
