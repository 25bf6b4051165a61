// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ASN.1 types defined in RFC 5652.
//!
//! Only the parts of Cryptographic Message Syntax needed to carry
//! certificates and CRLs are defined here: a `SignedData` is treated as a
//! container whose certificate and CRL sets are captured element by element.
//! Signer infos and encapsulated content are kept as opaque captures.

use {
    bcder::{
        decode::{Constructed, DecodeError, Source},
        encode::{self, PrimitiveContent, Values},
        Captured, ConstOid, Integer, Mode, Oid, Tag,
    },
    std::{
        fmt::{Debug, Formatter},
        io::Write,
        ops::{Deref, DerefMut},
    },
};

/// The signed-data content type.
///
/// 1.2.840.113549.1.7.2
pub const OID_ID_SIGNED_DATA: ConstOid = Oid(&[42, 134, 72, 134, 247, 13, 1, 7, 2]);

/// Content info.
///
/// ```ASN.1
/// ContentInfo ::= SEQUENCE {
///   contentType ContentType,
///   content [0] EXPLICIT ANY DEFINED BY contentType }
/// ```
#[derive(Clone)]
pub struct ContentInfo {
    pub content_type: Oid,
    pub content: Captured,
}

impl Debug for ContentInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("ContentInfo");
        s.field("content_type", &format_args!("{}", self.content_type));
        s.field("content", &format_args!("{}", hex::encode(self.content.as_slice())));
        s.finish()
    }
}

impl PartialEq for ContentInfo {
    fn eq(&self, other: &Self) -> bool {
        self.content_type == other.content_type
            && self.content.as_slice() == other.content.as_slice()
    }
}

impl Eq for ContentInfo {}

impl ContentInfo {
    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            let content_type = Oid::take_from(cons)?;
            let content = cons.take_constructed_if(Tag::CTX_0, |cons| cons.capture_all())?;

            Ok(Self {
                content_type,
                content,
            })
        })
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        encode::sequence((
            self.content_type.encode_ref(),
            encode::Constructed::new(Tag::CTX_0, &self.content),
        ))
    }
}

/// Attempt to decode a `ContentInfo` holding `SignedData`.
///
/// Resolves to `None` if the value is a SEQUENCE that doesn't start with the
/// signed-data content type, such as a bare certificate. The value is
/// consumed either way.
pub fn take_signed_data<S: Source>(
    cons: &mut Constructed<S>,
) -> Result<Option<SignedData>, DecodeError<S::Error>> {
    cons.take_sequence(|cons| match Oid::take_opt_from(cons)? {
        Some(oid) if oid == OID_ID_SIGNED_DATA => cons
            .take_constructed_if(Tag::CTX_0, |cons| SignedData::take_from(cons))
            .map(Some),
        _ => {
            cons.skip_all()?;
            Ok(None)
        }
    })
}

/// Signed data.
///
/// ```ASN.1
/// SignedData ::= SEQUENCE {
///   version CMSVersion,
///   digestAlgorithms DigestAlgorithmIdentifiers,
///   encapContentInfo EncapsulatedContentInfo,
///   certificates [0] IMPLICIT CertificateSet OPTIONAL,
///   crls [1] IMPLICIT RevocationInfoChoices OPTIONAL,
///   signerInfos SignerInfos }
/// ```
#[derive(Clone, Debug)]
pub struct SignedData {
    pub version: Integer,
    pub digest_algorithms: Captured,
    pub encap_content_info: Captured,
    pub certificates: Option<Vec<CertificateChoice>>,
    pub crls: Option<Vec<RevocationInfoChoice>>,
    pub signer_infos: Captured,
}

impl SignedData {
    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            let version = Integer::take_from(cons)?;
            let digest_algorithms = cons.capture_one()?;
            let encap_content_info = cons.capture_one()?;
            let certificates = cons.take_opt_constructed_if(Tag::CTX_0, |cons| {
                let mut certificates = Vec::new();

                while let Some(choice) = CertificateChoice::take_opt_from(cons)? {
                    certificates.push(choice);
                }

                Ok(certificates)
            })?;
            let crls = cons.take_opt_constructed_if(Tag::CTX_1, |cons| {
                let mut crls = Vec::new();

                while let Some(choice) = RevocationInfoChoice::take_opt_from(cons)? {
                    crls.push(choice);
                }

                Ok(crls)
            })?;
            let signer_infos = cons.capture_one()?;

            Ok(Self {
                version,
                digest_algorithms,
                encap_content_info,
                certificates,
                crls,
                signer_infos,
            })
        })
    }

    /// Encoded certificates carried by this instance.
    ///
    /// Choices other than plain certificates are not included.
    pub fn iter_certificates(&self) -> impl Iterator<Item = &Captured> {
        self.certificates
            .iter()
            .flat_map(|choices| choices.iter())
            .filter_map(|choice| match choice {
                CertificateChoice::Certificate(data) => Some(data),
                CertificateChoice::Other(_) => None,
            })
    }

    /// Encoded CRLs carried by this instance.
    ///
    /// Choices other than plain CRLs are not included.
    pub fn iter_crls(&self) -> impl Iterator<Item = &Captured> {
        self.crls
            .iter()
            .flat_map(|choices| choices.iter())
            .filter_map(|choice| match choice {
                RevocationInfoChoice::Crl(data) => Some(data),
                RevocationInfoChoice::Other(_) => None,
            })
    }
}

/// A member of a certificate set.
///
/// ```ASN.1
/// CertificateChoices ::= CHOICE {
///   certificate Certificate,
///   extendedCertificate [0] IMPLICIT ExtendedCertificate, -- Obsolete
///   v1AttrCert [1] IMPLICIT AttributeCertificateV1,       -- Obsolete
///   v2AttrCert [2] IMPLICIT AttributeCertificateV2,
///   other [3] IMPLICIT OtherCertificateFormat }
/// ```
///
/// Each member holds the complete encoding of the element, tag included.
#[derive(Clone, Debug)]
pub enum CertificateChoice {
    Certificate(Captured),
    Other(Captured),
}

impl CertificateChoice {
    pub fn take_opt_from<S: Source>(
        cons: &mut Constructed<S>,
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        Ok(take_opt_element(cons)?.map(|(universal, captured)| {
            if universal {
                Self::Certificate(captured)
            } else {
                Self::Other(captured)
            }
        }))
    }
}

/// A member of a revocation info set.
///
/// ```ASN.1
/// RevocationInfoChoice ::= CHOICE {
///   crl CertificateList,
///   other [1] IMPLICIT OtherRevocationInfoFormat }
/// ```
///
/// Each member holds the complete encoding of the element, tag included.
#[derive(Clone, Debug)]
pub enum RevocationInfoChoice {
    Crl(Captured),
    Other(Captured),
}

impl RevocationInfoChoice {
    pub fn take_opt_from<S: Source>(
        cons: &mut Constructed<S>,
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        Ok(take_opt_element(cons)?.map(|(universal, captured)| {
            if universal {
                Self::Crl(captured)
            } else {
                Self::Other(captured)
            }
        }))
    }
}

/// Capture the next constructed element, noting whether it is a plain SEQUENCE.
fn take_opt_element<S: Source>(
    cons: &mut Constructed<S>,
) -> Result<Option<(bool, Captured)>, DecodeError<S::Error>> {
    let mut found = None;

    let captured = cons.capture(|cons| {
        found = cons.take_opt_constructed(|tag, cons| {
            cons.skip_all()?;
            Ok(tag == Tag::SEQUENCE)
        })?;

        Ok(())
    })?;

    Ok(found.map(|universal| (universal, captured)))
}

/// A single attribute.
///
/// ```ASN.1
/// Attribute ::= SEQUENCE {
///   attrType OBJECT IDENTIFIER,
///   attrValues SET OF AttributeValue }
/// ```
#[derive(Clone, Eq, PartialEq)]
pub struct Attribute {
    pub typ: Oid,
    pub values: Vec<AttributeValue>,
}

impl Debug for Attribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("Attribute");
        s.field("type", &format_args!("{}", self.typ));
        s.field("values", &self.values);
        s.finish()
    }
}

impl Attribute {
    pub fn take_opt_from<S: Source>(
        cons: &mut Constructed<S>,
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        cons.take_opt_sequence(|cons| {
            let typ = Oid::take_from(cons)?;

            let values = cons.take_set(|cons| {
                let mut values = Vec::new();

                while let Some(value) = AttributeValue::take_opt_from(cons)? {
                    values.push(value);
                }

                Ok(values)
            })?;

            Ok(Self { typ, values })
        })
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        encode::sequence((self.typ.encode_ref(), encode::set(&self.values)))
    }

    pub fn encode(self) -> impl Values {
        encode::sequence((self.typ.encode(), encode::set(self.values)))
    }
}

#[derive(Clone)]
pub struct AttributeValue(Captured);

impl Debug for AttributeValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "{}",
            hex::encode(self.0.clone().into_bytes().as_ref())
        ))
    }
}

impl AttributeValue {
    /// Construct a new instance from captured data.
    pub fn new(captured: Captured) -> Self {
        Self(captured)
    }

    pub fn take_opt_from<S: Source>(
        cons: &mut Constructed<S>,
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        let captured = cons.capture_all()?;

        if captured.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Self(captured)))
        }
    }
}

impl Values for AttributeValue {
    fn encoded_len(&self, mode: Mode) -> usize {
        self.0.encoded_len(mode)
    }

    fn write_encoded<W: Write>(&self, mode: Mode, target: &mut W) -> Result<(), std::io::Error> {
        self.0.write_encoded(mode, target)
    }
}

impl Deref for AttributeValue {
    type Target = Captured;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for AttributeValue {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl PartialEq for AttributeValue {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_slice() == other.0.as_slice()
    }
}

impl Eq for AttributeValue {}

#[cfg(test)]
mod test {
    use {super::*, crate::testutil::*};

    fn signed_data(data: &[u8]) -> SignedData {
        Constructed::decode(data, Mode::Ber, |cons| take_signed_data(cons))
            .unwrap()
            .unwrap()
    }

    #[test]
    fn certificate_bundles() {
        for data in [CHAIN_P7B, CHAIN_INDEFINITE_P7B] {
            let signed_data = signed_data(data);

            assert_eq!(signed_data.version, Integer::from(1));
            assert!(signed_data.crls.is_none());
            assert_eq!(signed_data.digest_algorithms.as_slice()[0], 0x31);
            assert_eq!(signed_data.encap_content_info.as_slice()[0], 0x30);
            assert_eq!(signed_data.signer_infos.as_slice()[0], 0x31);

            let certs = signed_data.iter_certificates().collect::<Vec<_>>();
            assert_eq!(certs.len(), 3);
            assert_eq!(certs[0].as_slice(), LEAF_P384_DER);
            assert_eq!(certs[1].as_slice(), INTERMEDIATE_P256_DER);
            assert_eq!(certs[2].as_slice(), ROOT_RSA_DER);
        }
    }

    #[test]
    fn crl_bundles() {
        for data in [ROOT_CRL_P7B, ROOT_CRL_INDEFINITE_P7B] {
            let signed_data = signed_data(data);

            let crls = signed_data.iter_crls().collect::<Vec<_>>();
            assert_eq!(crls.len(), 1);
            assert_eq!(crls[0].as_slice(), ROOT_CRL_DER);
            assert_eq!(signed_data.iter_certificates().count(), 1);
        }
    }

    #[test]
    fn bare_certificate_is_not_signed_data() {
        let res = Constructed::decode(ROOT_RSA_DER, Mode::Der, |cons| take_signed_data(cons))
            .unwrap();
        assert!(res.is_none());
    }
}
