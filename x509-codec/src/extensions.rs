// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interpretation of certificate and CRL extensions.
//!
//! Certificates, CRLs and CRL entries all carry an optional extension block.
//! The functions in this module operate on such a block. An absent block
//! behaves like an empty one. Nothing is cached: every query walks the
//! extension list again.

use {
    crate::{
        rfc3280::{take_general_names, GeneralNames},
        rfc5280::{
            take_extended_key_usage, BasicConstraints, Extensions, KeyUsage,
            OID_BASIC_CONSTRAINTS, OID_CRL_NUMBER, OID_CRL_REASON, OID_EXTENDED_KEY_USAGE,
            OID_KEY_USAGE,
        },
        X509CodecError as Error,
    },
    bcder::{BitString, ConstOid, Integer, Oid, Tag, Unsigned},
    std::fmt::{Display, Formatter},
};

/// Critical extensions this crate knows how to process.
pub const SUPPORTED_CRITICAL_EXTENSIONS: [ConstOid; 2] = [OID_BASIC_CONSTRAINTS, OID_KEY_USAGE];

/// Minimum number of entries in a decoded key usage vector.
///
/// `KeyUsage` defines nine named bits.
pub const KEY_USAGE_BITS: usize = 9;

/// OIDs of extensions marked critical.
pub fn critical_oids(extensions: Option<&Extensions>) -> Vec<Oid> {
    extensions
        .map(|exts| exts.iter_critical_oids().cloned().collect())
        .unwrap_or_default()
}

/// OIDs of extensions not marked critical.
pub fn non_critical_oids(extensions: Option<&Extensions>) -> Vec<Oid> {
    extensions
        .map(|exts| exts.iter_non_critical_oids().cloned().collect())
        .unwrap_or_default()
}

/// Whether a critical extension outside [SUPPORTED_CRITICAL_EXTENSIONS] is present.
pub fn has_unsupported_critical(extensions: Option<&Extensions>) -> bool {
    extensions
        .map(|exts| {
            exts.iter_critical_oids().any(|oid| {
                !SUPPORTED_CRITICAL_EXTENSIONS
                    .iter()
                    .any(|supported| oid == supported)
            })
        })
        .unwrap_or(false)
}

/// The raw `extnValue` octets of the extension with the given OID.
pub fn extension_value(extensions: Option<&Extensions>, oid: &Oid) -> Option<Vec<u8>> {
    extensions
        .and_then(|exts| exts.find(oid))
        .map(|ext| ext.value.to_bytes().to_vec())
}

/// Unpack a key usage bit string.
///
/// The vector holds one entry per significant bit, padded with `false` to
/// [KEY_USAGE_BITS] entries.
pub fn key_usage_bits(bits: &KeyUsage) -> Vec<bool> {
    let octets = bits.octet_bytes();
    let significant = (octets.len() * 8).saturating_sub(bits.unused() as usize);

    let mut res = (0..significant)
        .map(|i| octets[i / 8] & (0x80 >> (i % 8)) != 0)
        .collect::<Vec<_>>();

    if res.len() < KEY_USAGE_BITS {
        res.resize(KEY_USAGE_BITS, false);
    }

    res
}

/// Decode the key usage extension.
pub fn key_usage(extensions: Option<&Extensions>) -> Result<Option<Vec<bool>>, Error> {
    match extensions.and_then(|exts| exts.find(&OID_KEY_USAGE)) {
        Some(ext) => {
            let bits = ext.decode_value(|cons| BitString::take_from(cons))?;

            Ok(Some(key_usage_bits(&bits)))
        }
        None => Ok(None),
    }
}

/// Decode the basic constraints extension into a path length.
///
/// `-1` means the subject is not a CA. `i32::MAX` means a CA without
/// path length constraint. Constraints too large for an `i32` saturate.
pub fn basic_constraints(extensions: Option<&Extensions>) -> Result<i32, Error> {
    let ext = match extensions.and_then(|exts| exts.find(&OID_BASIC_CONSTRAINTS)) {
        Some(ext) => ext,
        None => return Ok(-1),
    };

    let constraints = ext.decode_value(|cons| BasicConstraints::take_from(cons))?;

    if !constraints.ca {
        return Ok(-1);
    }

    match constraints.path_len_constraint {
        None => Ok(i32::MAX),
        Some(len) => {
            if len.is_negative() {
                Err(Error::MalformedEncoding(
                    "negative basic constraints path length".into(),
                ))
            } else {
                Ok(crate::asn1int::integer_to_i64(&len)
                    .map(|v| v.min(i32::MAX as i64) as i32)
                    .unwrap_or(i32::MAX))
            }
        }
    }
}

/// Decode a `GeneralNames` extension such as subjectAltName.
pub fn general_names<T: AsRef<[u8]>>(
    extensions: Option<&Extensions>,
    oid: &Oid<T>,
) -> Result<Option<GeneralNames>, Error> {
    match extensions.and_then(|exts| exts.find(oid)) {
        Some(ext) => Ok(Some(ext.decode_value(|cons| take_general_names(cons))?)),
        None => Ok(None),
    }
}

/// Decode the extended key usage extension.
pub fn extended_key_usage(extensions: Option<&Extensions>) -> Result<Option<Vec<Oid>>, Error> {
    match extensions.and_then(|exts| exts.find(&OID_EXTENDED_KEY_USAGE)) {
        Some(ext) => Ok(Some(
            ext.decode_value(|cons| take_extended_key_usage(cons))?,
        )),
        None => Ok(None),
    }
}

/// Decode the CRL number extension.
pub fn crl_number(extensions: Option<&Extensions>) -> Result<Option<Integer>, Error> {
    match extensions.and_then(|exts| exts.find(&OID_CRL_NUMBER)) {
        Some(ext) => Ok(Some(ext.decode_value(|cons| Integer::take_from(cons))?)),
        None => Ok(None),
    }
}

/// Reason a certificate was revoked.
///
/// ```ASN.1
/// CRLReason ::= ENUMERATED {
///   unspecified             (0),
///   keyCompromise           (1),
///   cACompromise            (2),
///   affiliationChanged      (3),
///   superseded              (4),
///   cessationOfOperation    (5),
///   certificateHold         (6),
///        -- value 7 is not used
///   removeFromCRL           (8),
///   privilegeWithdrawn      (9),
///   aACompromise           (10) }
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CrlReason {
    Unspecified,
    KeyCompromise,
    CaCompromise,
    AffiliationChanged,
    Superseded,
    CessationOfOperation,
    CertificateHold,
    RemoveFromCrl,
    PrivilegeWithdrawn,
    AaCompromise,
}

impl CrlReason {
    /// Resolve from the ENUMERATED value.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Unspecified),
            1 => Some(Self::KeyCompromise),
            2 => Some(Self::CaCompromise),
            3 => Some(Self::AffiliationChanged),
            4 => Some(Self::Superseded),
            5 => Some(Self::CessationOfOperation),
            6 => Some(Self::CertificateHold),
            8 => Some(Self::RemoveFromCrl),
            9 => Some(Self::PrivilegeWithdrawn),
            10 => Some(Self::AaCompromise),
            _ => None,
        }
    }

    /// The ENUMERATED value.
    pub fn code(self) -> u8 {
        match self {
            Self::Unspecified => 0,
            Self::KeyCompromise => 1,
            Self::CaCompromise => 2,
            Self::AffiliationChanged => 3,
            Self::Superseded => 4,
            Self::CessationOfOperation => 5,
            Self::CertificateHold => 6,
            Self::RemoveFromCrl => 8,
            Self::PrivilegeWithdrawn => 9,
            Self::AaCompromise => 10,
        }
    }
}

impl Display for CrlReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Unspecified => "unspecified",
            Self::KeyCompromise => "keyCompromise",
            Self::CaCompromise => "cACompromise",
            Self::AffiliationChanged => "affiliationChanged",
            Self::Superseded => "superseded",
            Self::CessationOfOperation => "cessationOfOperation",
            Self::CertificateHold => "certificateHold",
            Self::RemoveFromCrl => "removeFromCRL",
            Self::PrivilegeWithdrawn => "privilegeWithdrawn",
            Self::AaCompromise => "aACompromise",
        })
    }
}

/// Decode the CRL reason extension of a CRL entry.
pub fn crl_reason(extensions: Option<&Extensions>) -> Result<Option<CrlReason>, Error> {
    let ext = match extensions.and_then(|exts| exts.find(&OID_CRL_REASON)) {
        Some(ext) => ext,
        None => return Ok(None),
    };

    let code = ext.decode_value(|cons| {
        cons.take_primitive_if(Tag::ENUMERATED, Unsigned::u8_from_primitive)
    })?;

    CrlReason::from_code(code)
        .map(Some)
        .ok_or_else(|| Error::MalformedEncoding(format!("invalid CRL reason code {}", code)))
}

#[cfg(test)]
mod test {
    use {
        super::*,
        crate::rfc5280::Extension,
        bcder::{encode::Values, Mode, OctetString},
        bytes::Bytes,
    };

    fn extension(oid: ConstOid, critical: bool, value: &'static [u8]) -> Extension {
        Extension {
            id: Oid(Bytes::copy_from_slice(oid.as_ref())),
            critical: if critical { Some(true) } else { None },
            value: OctetString::new(Bytes::from_static(value)),
        }
    }

    fn extensions(items: Vec<Extension>) -> Extensions {
        let mut exts = Extensions::default();
        exts.extend(items);
        exts
    }

    #[test]
    fn key_usage_padding() {
        // digitalSignature and keyEncipherment with 5 unused bits.
        let bits = BitString::new(5, Bytes::from_static(&[0xa0]));
        let usage = key_usage_bits(&bits);

        assert_eq!(usage.len(), 9);
        assert_eq!(
            usage,
            vec![true, false, true, false, false, false, false, false, false]
        );

        // decipherOnly needs a second octet.
        let bits = BitString::new(7, Bytes::from_static(&[0x00, 0x80]));
        let usage = key_usage_bits(&bits);
        assert_eq!(usage.len(), 9);
        assert!(usage[8]);

        // Longer strings are not truncated.
        let bits = BitString::new(0, Bytes::from_static(&[0xff, 0xff]));
        assert_eq!(key_usage_bits(&bits).len(), 16);
    }

    #[test]
    fn criticality() {
        let exts = extensions(vec![
            extension(OID_BASIC_CONSTRAINTS, true, &[0x30, 0x00]),
            extension(OID_KEY_USAGE, true, &[0x03, 0x02, 0x01, 0x06]),
            extension(OID_EXTENDED_KEY_USAGE, false, &[0x30, 0x00]),
        ]);

        assert_eq!(critical_oids(Some(&exts)).len(), 2);
        assert_eq!(
            non_critical_oids(Some(&exts)),
            vec![Oid(Bytes::copy_from_slice(OID_EXTENDED_KEY_USAGE.as_ref()))]
        );
        assert!(!has_unsupported_critical(Some(&exts)));

        let mut with_unknown = exts.clone();
        with_unknown.push(extension(Oid(&[43, 6, 1, 4, 1, 1]), true, &[0x05, 0x00]));
        assert!(has_unsupported_critical(Some(&with_unknown)));

        let mut noncritical_unknown = exts;
        noncritical_unknown.push(extension(Oid(&[43, 6, 1, 4, 1, 1]), false, &[0x05, 0x00]));
        assert!(!has_unsupported_critical(Some(&noncritical_unknown)));

        assert!(critical_oids(None).is_empty());
        assert!(!has_unsupported_critical(None));
    }

    #[test]
    fn path_lengths() {
        assert_eq!(basic_constraints(None).unwrap(), -1);

        let not_ca = extensions(vec![extension(OID_BASIC_CONSTRAINTS, true, &[0x30, 0x00])]);
        assert_eq!(basic_constraints(Some(&not_ca)).unwrap(), -1);

        let unlimited = extensions(vec![extension(
            OID_BASIC_CONSTRAINTS,
            true,
            &[0x30, 0x03, 0x01, 0x01, 0xff],
        )]);
        assert_eq!(basic_constraints(Some(&unlimited)).unwrap(), i32::MAX);

        let limited = extensions(vec![extension(
            OID_BASIC_CONSTRAINTS,
            true,
            &[0x30, 0x06, 0x01, 0x01, 0xff, 0x02, 0x01, 0x02],
        )]);
        assert_eq!(basic_constraints(Some(&limited)).unwrap(), 2);

        let garbage = extensions(vec![extension(OID_BASIC_CONSTRAINTS, true, &[0x04, 0x00])]);
        assert!(basic_constraints(Some(&garbage)).unwrap_err().is_malformed_encoding());
    }

    #[test]
    fn revocation_reasons() {
        let exts = extensions(vec![extension(OID_CRL_REASON, false, &[0x0a, 0x01, 0x04])]);
        assert_eq!(
            crl_reason(Some(&exts)).unwrap(),
            Some(CrlReason::Superseded)
        );
        assert_eq!(crl_reason(None).unwrap(), None);

        let bad = extensions(vec![extension(OID_CRL_REASON, false, &[0x0a, 0x01, 0x07])]);
        assert!(crl_reason(Some(&bad)).is_err());

        for code in 0..=10 {
            if let Some(reason) = CrlReason::from_code(code) {
                assert_eq!(reason.code(), code);
            }
        }
    }

    #[test]
    fn raw_values() {
        let exts = extensions(vec![extension(OID_CRL_NUMBER, false, &[0x02, 0x01, 0x07])]);

        let oid = Oid(Bytes::copy_from_slice(OID_CRL_NUMBER.as_ref()));
        assert_eq!(
            extension_value(Some(&exts), &oid),
            Some(vec![0x02, 0x01, 0x07])
        );
        assert_eq!(crl_number(Some(&exts)).unwrap(), Some(Integer::from(7u8)));

        let mut encoded = Vec::new();
        exts.encode_ref()
            .write_encoded(Mode::Der, &mut encoded)
            .unwrap();
        assert_eq!(encoded[0], 0x30);
    }
}
