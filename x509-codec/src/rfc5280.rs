// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! ASN.1 types defined RFC 5280. */

use {
    crate::{asn1time::*, rfc3280::*},
    bcder::{
        decode::{Constructed, DecodeError, IntoSource, Source},
        encode,
        encode::{PrimitiveContent, Values},
        BitString, Captured, ConstOid, Integer, Mode, OctetString, Oid, Tag,
    },
    std::{
        convert::Infallible,
        fmt::{Debug, Formatter},
        io::Write,
        ops::{Deref, DerefMut},
    },
};

/// Subject key identifier extension.
///
/// 2.5.29.14
pub const OID_SUBJECT_KEY_IDENTIFIER: ConstOid = Oid(&[85, 29, 14]);

/// Key usage extension.
///
/// 2.5.29.15
pub const OID_KEY_USAGE: ConstOid = Oid(&[85, 29, 15]);

/// Subject alternative name extension.
///
/// 2.5.29.17
pub const OID_SUBJECT_ALT_NAME: ConstOid = Oid(&[85, 29, 17]);

/// Issuer alternative name extension.
///
/// 2.5.29.18
pub const OID_ISSUER_ALT_NAME: ConstOid = Oid(&[85, 29, 18]);

/// Basic constraints extension.
///
/// 2.5.29.19
pub const OID_BASIC_CONSTRAINTS: ConstOid = Oid(&[85, 29, 19]);

/// CRL number extension.
///
/// 2.5.29.20
pub const OID_CRL_NUMBER: ConstOid = Oid(&[85, 29, 20]);

/// CRL entry reason code extension.
///
/// 2.5.29.21
pub const OID_CRL_REASON: ConstOid = Oid(&[85, 29, 21]);

/// Authority key identifier extension.
///
/// 2.5.29.35
pub const OID_AUTHORITY_KEY_IDENTIFIER: ConstOid = Oid(&[85, 29, 35]);

/// Extended key usage extension.
///
/// 2.5.29.37
pub const OID_EXTENDED_KEY_USAGE: ConstOid = Oid(&[85, 29, 37]);

/// Algorithm identifier.
///
/// ```ASN.1
/// AlgorithmIdentifier  ::=  SEQUENCE  {
///   algorithm               OBJECT IDENTIFIER,
///   parameters              ANY DEFINED BY algorithm OPTIONAL  }
/// ```
#[derive(Clone, Eq, PartialEq)]
pub struct AlgorithmIdentifier {
    pub algorithm: Oid,
    pub parameters: Option<AlgorithmParameter>,
}

impl Debug for AlgorithmIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("AlgorithmIdentifier");
        s.field("algorithm", &format_args!("{}", self.algorithm));
        s.field("parameters", &self.parameters);
        s.finish()
    }
}

impl AlgorithmIdentifier {
    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| Self::take_sequence(cons))
    }

    pub fn take_opt_from<S: Source>(
        cons: &mut Constructed<S>,
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        cons.take_opt_sequence(|cons| Self::take_sequence(cons))
    }

    fn take_sequence<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        let algorithm = Oid::take_from(cons)?;
        let parameters = cons.capture_all()?;

        let parameters = if parameters.is_empty() {
            None
        } else {
            Some(AlgorithmParameter(parameters))
        };

        Ok(Self {
            algorithm,
            parameters,
        })
    }

    /// Construct an instance with an explicit NULL parameter.
    ///
    /// This is the form RSA algorithm identifiers take.
    pub fn with_null_parameter(algorithm: Oid) -> Self {
        Self {
            algorithm,
            parameters: Some(AlgorithmParameter(Captured::from_values(
                Mode::Der,
                ().encode_as(Tag::NULL),
            ))),
        }
    }

    /// Whether the parameters field is absent or an ASN.1 NULL.
    pub fn has_null_or_absent_parameters(&self) -> bool {
        match &self.parameters {
            None => true,
            Some(params) => params.as_slice() == [0x05, 0x00],
        }
    }

    fn encoded_values(&self) -> impl Values + '_ {
        // Parameters are emitted exactly as captured. Some algorithms need an
        // explicit NULL and others forbid it, so nothing is synthesized.
        encode::sequence((self.algorithm.encode_ref(), self.parameters.as_ref()))
    }
}

impl Values for AlgorithmIdentifier {
    fn encoded_len(&self, mode: Mode) -> usize {
        self.encoded_values().encoded_len(mode)
    }

    fn write_encoded<W: Write>(&self, mode: Mode, target: &mut W) -> Result<(), std::io::Error> {
        self.encoded_values().write_encoded(mode, target)
    }
}

/// A parameter for an algorithm.
///
/// This type doesn't exist in the ASN.1. We've implemented it to
/// make (de)serialization simpler.
#[derive(Clone, Debug)]
pub struct AlgorithmParameter(Captured);

impl AlgorithmParameter {
    /// Construct a new instance consisting of a single OID.
    pub fn from_oid(oid: Oid) -> Self {
        let captured = Captured::from_values(Mode::Der, oid.encode());

        Self(captured)
    }

    /// Construct a new instance from already encoded values.
    pub fn from_values(values: impl Values) -> Self {
        Self(Captured::from_values(Mode::Der, values))
    }

    /// Attempt to decode a single OID from the captured value.
    pub fn decode_oid(&self) -> Result<Oid, DecodeError<Infallible>> {
        self.0.clone().decode(|cons| Oid::take_from(cons))
    }
}

impl Deref for AlgorithmParameter {
    type Target = Captured;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq for AlgorithmParameter {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_slice() == other.0.as_slice()
    }
}

impl Eq for AlgorithmParameter {}

impl Values for AlgorithmParameter {
    fn encoded_len(&self, mode: Mode) -> usize {
        self.0.encoded_len(mode)
    }

    fn write_encoded<W: Write>(&self, mode: Mode, target: &mut W) -> Result<(), std::io::Error> {
        self.0.write_encoded(mode, target)
    }
}

/// An X.509 certificate.
///
/// This is the main data structure representing an X.509 certificate.
///
/// ```ASN.1
/// Certificate  ::=  SEQUENCE  {
///   tbsCertificate       TBSCertificate,
///   signatureAlgorithm   AlgorithmIdentifier,
///   signature            BIT STRING  }
/// ```
#[derive(Clone, Eq, PartialEq)]
pub struct Certificate {
    pub tbs_certificate: TbsCertificate,
    pub signature_algorithm: AlgorithmIdentifier,
    pub signature: BitString,
}

impl Debug for Certificate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("Certificate");
        s.field("tbs_certificate", &self.tbs_certificate);
        s.field("signature_algorithm", &self.signature_algorithm);
        s.field(
            "signature",
            &format_args!(
                "{} (unused {})",
                hex::encode(self.signature.octet_bytes()),
                self.signature.unused()
            ),
        );
        s.finish()
    }
}

impl Certificate {
    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| Self::from_sequence(cons))
    }

    pub fn from_sequence<S: Source>(
        cons: &mut Constructed<S>,
    ) -> Result<Self, DecodeError<S::Error>> {
        let tbs_certificate = TbsCertificate::take_from(cons)?;
        let signature_algorithm = AlgorithmIdentifier::take_from(cons)?;
        let signature = BitString::take_from(cons)?;

        Ok(Self {
            tbs_certificate,
            signature_algorithm,
            signature,
        })
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        encode::sequence((
            self.tbs_certificate.encode_ref(),
            &self.signature_algorithm,
            self.signature.encode_ref(),
        ))
    }

    /// Iterate over extensions defined on this certificate.
    pub fn iter_extensions(&self) -> impl Iterator<Item = &Extension> {
        self.tbs_certificate
            .extensions
            .iter()
            .flat_map(|x| x.iter())
    }
}

/// TBS Certificate.
///
/// This holds most of the metadata within an X.509 certificate.
///
/// ```ASN.1
/// TBSCertificate  ::=  SEQUENCE  {
///      version         [0]  Version DEFAULT v1,
///      serialNumber         CertificateSerialNumber,
///      signature            AlgorithmIdentifier,
///      issuer               Name,
///      validity             Validity,
///      subject              Name,
///      subjectPublicKeyInfo SubjectPublicKeyInfo,
///      issuerUniqueID  [1]  IMPLICIT UniqueIdentifier OPTIONAL,
///                           -- If present, version MUST be v2 or v3
///      subjectUniqueID [2]  IMPLICIT UniqueIdentifier OPTIONAL,
///                           -- If present, version MUST be v2 or v3
///      extensions      [3]  Extensions OPTIONAL
///                           -- If present, version MUST be v3 --  }
/// ```
#[derive(Clone)]
pub struct TbsCertificate {
    pub version: Option<Version>,
    pub serial_number: CertificateSerialNumber,
    pub signature: AlgorithmIdentifier,
    pub issuer: Name,
    pub validity: Validity,
    pub subject: Name,
    pub subject_public_key_info: SubjectPublicKeyInfo,
    pub issuer_unique_id: Option<UniqueIdentifier>,
    pub subject_unique_id: Option<UniqueIdentifier>,
    pub extensions: Option<Extensions>,

    /// Raw bytes this instance was constructed from.
    ///
    /// Not considered by equality comparisons.
    pub raw_data: Option<Vec<u8>>,
}

impl PartialEq for TbsCertificate {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.serial_number == other.serial_number
            && self.signature == other.signature
            && self.issuer == other.issuer
            && self.validity == other.validity
            && self.subject == other.subject
            && self.subject_public_key_info == other.subject_public_key_info
            && self.issuer_unique_id == other.issuer_unique_id
            && self.subject_unique_id == other.subject_unique_id
            && self.extensions == other.extensions
    }
}

impl Eq for TbsCertificate {}

impl Debug for TbsCertificate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("TbsCertificate");
        s.field("version", &self.version);
        s.field("serial_number", &self.serial_number);
        s.field("signature", &self.signature);
        s.field("issuer", &self.issuer);
        s.field("validity", &self.validity);
        s.field("subject", &self.subject);
        s.field("subject_public_key_info", &self.subject_public_key_info);
        s.field("issuer_unique_id", &self.issuer_unique_id);
        s.field("subject_unique_id", &self.subject_unique_id);
        s.field("extensions", &self.extensions);
        s.field(
            "raw_data",
            &format_args!("{:?}", self.raw_data.as_ref().map(hex::encode)),
        );
        s.finish()
    }
}

impl TbsCertificate {
    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        // The TbsCertificate data is what's signed by the issuing certificate. We
        // stash away the raw data so callers can compare it against the
        // re-encoded form.
        let mut res = None;

        let captured = cons.capture(|cons| {
            cons.take_sequence(|cons| {
                let version = cons.take_opt_constructed_if(Tag::CTX_0, Version::take_from)?;
                let serial_number = CertificateSerialNumber::take_from(cons)?;
                let signature = AlgorithmIdentifier::take_from(cons)?;
                let issuer = Name::take_from(cons)?;
                let validity = Validity::take_from(cons)?;
                let subject = Name::take_from(cons)?;
                let subject_public_key_info = SubjectPublicKeyInfo::take_from(cons)?;
                let issuer_unique_id = cons.take_opt_value_if(Tag::CTX_1, |content| {
                    BitString::from_content(content)
                })?;
                let subject_unique_id = cons.take_opt_value_if(Tag::CTX_2, |content| {
                    BitString::from_content(content)
                })?;
                let extensions =
                    cons.take_opt_constructed_if(Tag::CTX_3, |cons| Extensions::take_from(cons))?;

                res = Some(Self {
                    version,
                    serial_number,
                    signature,
                    issuer,
                    validity,
                    subject,
                    subject_public_key_info,
                    issuer_unique_id,
                    subject_unique_id,
                    extensions,
                    raw_data: None,
                });

                Ok(())
            })
        })?;

        let mut res = res.ok_or_else(|| cons.content_err("missing TBSCertificate"))?;
        res.raw_data = Some(captured.to_vec());

        Ok(res)
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        encode::sequence((
            self.version
                .as_ref()
                .map(|v| encode::Constructed::new(Tag::CTX_0, u8::from(*v).encode())),
            (&self.serial_number).encode(),
            &self.signature,
            self.issuer.encode_ref(),
            self.validity.encode_ref(),
            self.subject.encode_ref(),
            self.subject_public_key_info.encode_ref(),
            self.issuer_unique_id
                .as_ref()
                .map(|id| id.encode_ref_as(Tag::CTX_1)),
            self.subject_unique_id
                .as_ref()
                .map(|id| id.encode_ref_as(Tag::CTX_2)),
            self.extensions
                .as_ref()
                .map(|extensions| encode::Constructed::new(Tag::CTX_3, extensions.encode_ref())),
        ))
    }

    /// Encode this instance to DER.
    pub fn encode_der(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        // Writes to a Vec are infallible.
        let _ = self.encode_ref().write_encoded(Mode::Der, &mut buffer);

        buffer
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Version {
    V1 = 0,
    V2 = 1,
    V3 = 2,
}

impl Version {
    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        match cons.take_primitive_if(Tag::INTEGER, Integer::i8_from_primitive)? {
            0 => Ok(Self::V1),
            1 => Ok(Self::V2),
            2 => Ok(Self::V3),
            _ => Err(cons.content_err("unexpected Version value")),
        }
    }

    pub fn take_opt_from<S: Source>(
        cons: &mut Constructed<S>,
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        match cons.take_opt_primitive_if(Tag::INTEGER, Integer::i8_from_primitive)? {
            None => Ok(None),
            Some(0) => Ok(Some(Self::V1)),
            Some(1) => Ok(Some(Self::V2)),
            Some(2) => Ok(Some(Self::V3)),
            Some(_) => Err(cons.content_err("unexpected Version value")),
        }
    }

    pub fn encode(self) -> impl Values {
        u8::from(self).encode()
    }

    /// The human facing version number (1, 2 or 3).
    pub fn number(self) -> u8 {
        u8::from(self) + 1
    }
}

impl From<Version> for u8 {
    fn from(v: Version) -> Self {
        match v {
            Version::V1 => 0,
            Version::V2 => 1,
            Version::V3 => 2,
        }
    }
}

pub type CertificateSerialNumber = Integer;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Validity {
    pub not_before: Time,
    pub not_after: Time,
}

impl Validity {
    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            let not_before = Time::take_from(cons)?;
            let not_after = Time::take_from(cons)?;

            Ok(Self {
                not_before,
                not_after,
            })
        })
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        encode::sequence((self.not_before.encode_ref(), self.not_after.encode_ref()))
    }
}

pub type UniqueIdentifier = BitString;

/// Subject public key info.
///
/// ```ASN.1
/// SubjectPublicKeyInfo  ::=  SEQUENCE  {
///   algorithm            AlgorithmIdentifier,
///   subjectPublicKey     BIT STRING  }
/// ```
#[derive(Clone, Eq, PartialEq)]
pub struct SubjectPublicKeyInfo {
    pub algorithm: AlgorithmIdentifier,
    pub subject_public_key: BitString,
}

impl Debug for SubjectPublicKeyInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("SubjectPublicKeyInfo");
        s.field("algorithm", &self.algorithm);
        s.field(
            "subject_public_key",
            &format_args!(
                "{} (unused {})",
                hex::encode(self.subject_public_key.octet_bytes().as_ref()),
                self.subject_public_key.unused()
            ),
        );
        s.finish()
    }
}

impl SubjectPublicKeyInfo {
    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            let algorithm = AlgorithmIdentifier::take_from(cons)?;
            let subject_public_key = BitString::take_from(cons)?;

            Ok(Self {
                algorithm,
                subject_public_key,
            })
        })
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        encode::sequence((&self.algorithm, self.subject_public_key.encode_ref()))
    }

    /// Encode this instance to DER.
    pub fn encode_der(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        // Writes to a Vec are infallible.
        let _ = self.encode_ref().write_encoded(Mode::Der, &mut buffer);

        buffer
    }
}

/// Extensions
///
/// ```ASN.1
/// Extensions  ::=  SEQUENCE SIZE (1..MAX) OF Extension
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Extensions(Vec<Extension>);

impl Extensions {
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
        let mut extensions = Vec::new();

        while let Some(extension) = Extension::take_opt_from(cons)? {
            extensions.push(extension);
        }

        Ok(Self(extensions))
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        encode::sequence(&self.0)
    }

    /// Find the first extension having the given OID.
    pub fn find<T: AsRef<[u8]>>(&self, oid: &Oid<T>) -> Option<&Extension> {
        self.0
            .iter()
            .find(|ext| ext.id.as_ref() == oid.as_ref())
    }

    /// Iterate over the OIDs of extensions marked critical.
    pub fn iter_critical_oids(&self) -> impl Iterator<Item = &Oid> {
        self.0
            .iter()
            .filter(|ext| ext.is_critical())
            .map(|ext| &ext.id)
    }

    /// Iterate over the OIDs of extensions not marked critical.
    pub fn iter_non_critical_oids(&self) -> impl Iterator<Item = &Oid> {
        self.0
            .iter()
            .filter(|ext| !ext.is_critical())
            .map(|ext| &ext.id)
    }
}

impl Deref for Extensions {
    type Target = Vec<Extension>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Extensions {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Extension.
///
/// ```ASN.1
/// Extension  ::=  SEQUENCE  {
///      extnID      OBJECT IDENTIFIER,
///      critical    BOOLEAN DEFAULT FALSE,
///      extnValue   OCTET STRING
///                  -- contains the DER encoding of an ASN.1 value
///                  -- corresponding to the extension type identified
///                  -- by extnID
///      }
/// ```
#[derive(Clone, Eq, PartialEq)]
pub struct Extension {
    pub id: Oid,
    pub critical: Option<bool>,
    pub value: OctetString,
}

impl Debug for Extension {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("Extension");
        s.field("id", &format_args!("{}", self.id));
        s.field("critical", &self.critical);
        s.field(
            "value",
            &format_args!("{}", hex::encode(self.value.to_bytes().as_ref())),
        );
        s.finish()
    }
}

impl Extension {
    pub fn take_opt_from<S: Source>(
        cons: &mut Constructed<S>,
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        cons.take_opt_sequence(|cons| Self::from_sequence(cons))
    }

    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| Self::from_sequence(cons))
    }

    fn from_sequence<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        let id = Oid::take_from(cons)?;
        let critical = cons.take_opt_bool()?;
        let value = OctetString::take_from(cons)?;

        Ok(Self {
            id,
            critical,
            value,
        })
    }

    /// Whether the extension is marked critical.
    pub fn is_critical(&self) -> bool {
        self.critical == Some(true)
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        encode::sequence((
            self.id.encode_ref(),
            if self.is_critical() {
                Some(true.encode())
            } else {
                None
            },
            self.value.encode_ref(),
        ))
    }

    /// Decode the extension value with a function operating on its content.
    pub fn decode_value<F, T>(&self, op: F) -> Result<T, DecodeError<Infallible>>
    where
        F: FnOnce(
            &mut Constructed<<OctetString as IntoSource>::Source>,
        ) -> Result<T, DecodeError<Infallible>>,
    {
        Constructed::decode(self.value.clone().into_source(), Mode::Der, op)
    }
}

impl Values for Extension {
    fn encoded_len(&self, mode: Mode) -> usize {
        self.encode_ref().encoded_len(mode)
    }

    fn write_encoded<W: Write>(&self, mode: Mode, target: &mut W) -> Result<(), std::io::Error> {
        self.encode_ref().write_encoded(mode, target)
    }
}

/// Basic constraints.
///
/// ```ASN.1
/// BasicConstraints ::= SEQUENCE {
///   cA                      BOOLEAN DEFAULT FALSE,
///   pathLenConstraint       INTEGER (0..MAX) OPTIONAL }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BasicConstraints {
    pub ca: bool,
    pub path_len_constraint: Option<Integer>,
}

impl BasicConstraints {
    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            let ca = cons.take_opt_bool()?.unwrap_or(false);
            let path_len_constraint =
                cons.take_opt_primitive_if(Tag::INTEGER, Integer::from_primitive)?;

            Ok(Self {
                ca,
                path_len_constraint,
            })
        })
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        encode::sequence((
            if self.ca { Some(true.encode()) } else { None },
            self.path_len_constraint.as_ref().map(|v| v.encode()),
        ))
    }
}

/// Key usage.
///
/// ```ASN.1
/// KeyUsage ::= BIT STRING {
///   digitalSignature        (0),
///   nonRepudiation          (1),
///   keyEncipherment         (2),
///   dataEncipherment        (3),
///   keyAgreement            (4),
///   keyCertSign             (5),
///   cRLSign                 (6),
///   encipherOnly            (7),
///   decipherOnly            (8) }
/// ```
pub type KeyUsage = BitString;

/// Extended key usage.
///
/// ```ASN.1
/// ExtKeyUsageSyntax ::= SEQUENCE SIZE (1..MAX) OF KeyPurposeId
///
/// KeyPurposeId ::= OBJECT IDENTIFIER
/// ```
pub fn take_extended_key_usage<S: Source>(
    cons: &mut Constructed<S>,
) -> Result<Vec<Oid>, DecodeError<S::Error>> {
    cons.take_sequence(|cons| {
        let mut purposes = Vec::new();

        while let Some(oid) = cons.take_opt_primitive_if(Tag::OID, Oid::from_primitive)? {
            purposes.push(oid);
        }

        Ok(purposes)
    })
}

/// Certificate list.
///
/// ```ASN.1
/// CertificateList  ::=  SEQUENCE  {
///      tbsCertList          TBSCertList,
///      signatureAlgorithm   AlgorithmIdentifier,
///      signature            BIT STRING  }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CertificateList {
    pub tbs_cert_list: TbsCertList,
    pub signature_algorithm: AlgorithmIdentifier,
    pub signature: BitString,
}

impl CertificateList {
    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| Self::from_sequence(cons))
    }

    pub fn from_sequence<S: Source>(
        cons: &mut Constructed<S>,
    ) -> Result<Self, DecodeError<S::Error>> {
        let tbs_cert_list = TbsCertList::take_from(cons)?;
        let signature_algorithm = AlgorithmIdentifier::take_from(cons)?;
        let signature = BitString::take_from(cons)?;

        Ok(Self {
            tbs_cert_list,
            signature_algorithm,
            signature,
        })
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        encode::sequence((
            self.tbs_cert_list.encode_ref(),
            &self.signature_algorithm,
            self.signature.encode_ref(),
        ))
    }
}

/// Tbs Certificate list.
///
/// ```ASN.1
/// TBSCertList  ::=  SEQUENCE  {
///   version                 Version OPTIONAL,
///     -- if present, MUST be v2
///   signature               AlgorithmIdentifier,
///   issuer                  Name,
///   thisUpdate              Time,
///   nextUpdate              Time OPTIONAL,
///   revokedCertificates     SEQUENCE OF SEQUENCE  {
///     userCertificate         CertificateSerialNumber,
///     revocationDate          Time,
///     crlEntryExtensions      Extensions OPTIONAL
///                                 -- if present, MUST be v2
///  }  OPTIONAL,
///  crlExtensions           [0] Extensions OPTIONAL }
///                                -- if present, MUST be v2
/// ```
#[derive(Clone)]
pub struct TbsCertList {
    pub version: Option<Version>,
    pub signature: AlgorithmIdentifier,
    pub issuer: Name,
    pub this_update: Time,
    pub next_update: Option<Time>,
    pub revoked_certificates: Option<Vec<RevokedCertificate>>,
    pub crl_extensions: Option<Extensions>,

    /// Raw bytes this instance was constructed from.
    ///
    /// Not considered by equality comparisons.
    pub raw_data: Option<Vec<u8>>,
}

impl PartialEq for TbsCertList {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.signature == other.signature
            && self.issuer == other.issuer
            && self.this_update == other.this_update
            && self.next_update == other.next_update
            && self.revoked_certificates == other.revoked_certificates
            && self.crl_extensions == other.crl_extensions
    }
}

impl Eq for TbsCertList {}

impl Debug for TbsCertList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("TbsCertList");
        s.field("version", &self.version);
        s.field("signature", &self.signature);
        s.field("issuer", &self.issuer);
        s.field("this_update", &self.this_update);
        s.field("next_update", &self.next_update);
        s.field("revoked_certificates", &self.revoked_certificates);
        s.field("crl_extensions", &self.crl_extensions);
        s.finish()
    }
}

impl TbsCertList {
    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        let mut res = None;

        let captured = cons.capture(|cons| {
            cons.take_sequence(|cons| {
                let version = Version::take_opt_from(cons)?;
                let signature = AlgorithmIdentifier::take_from(cons)?;
                let issuer = Name::take_from(cons)?;
                let this_update = Time::take_from(cons)?;
                let next_update = Time::take_opt_from(cons)?;
                let revoked_certificates = cons.take_opt_sequence(|cons| {
                    let mut entries = Vec::new();

                    while let Some(entry) = RevokedCertificate::take_opt_from(cons)? {
                        entries.push(entry);
                    }

                    Ok(entries)
                })?;
                let crl_extensions =
                    cons.take_opt_constructed_if(Tag::CTX_0, |cons| Extensions::take_from(cons))?;

                res = Some(Self {
                    version,
                    signature,
                    issuer,
                    this_update,
                    next_update,
                    revoked_certificates,
                    crl_extensions,
                    raw_data: None,
                });

                Ok(())
            })
        })?;

        let mut res = res.ok_or_else(|| cons.content_err("missing TBSCertList"))?;
        res.raw_data = Some(captured.to_vec());

        Ok(res)
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        encode::sequence((
            self.version.map(|v| v.encode()),
            &self.signature,
            self.issuer.encode_ref(),
            self.this_update.encode_ref(),
            self.next_update.as_ref().map(|t| t.encode_ref()),
            self.revoked_certificates
                .as_ref()
                .map(|entries| encode::sequence(entries)),
            self.crl_extensions
                .as_ref()
                .map(|extensions| encode::Constructed::new(Tag::CTX_0, extensions.encode_ref())),
        ))
    }

    /// Encode this instance to DER.
    pub fn encode_der(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        // Writes to a Vec are infallible.
        let _ = self.encode_ref().write_encoded(Mode::Der, &mut buffer);

        buffer
    }
}

/// An entry in a certificate revocation list.
///
/// ```ASN.1
/// SEQUENCE  {
///   userCertificate         CertificateSerialNumber,
///   revocationDate          Time,
///   crlEntryExtensions      Extensions OPTIONAL }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RevokedCertificate {
    pub user_certificate: CertificateSerialNumber,
    pub revocation_date: Time,
    pub crl_entry_extensions: Option<Extensions>,
}

impl RevokedCertificate {
    pub fn take_opt_from<S: Source>(
        cons: &mut Constructed<S>,
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        cons.take_opt_sequence(|cons| {
            let user_certificate = Integer::take_from(cons)?;
            let revocation_date = Time::take_from(cons)?;
            let crl_entry_extensions = Extensions::take_opt_from(cons)?;

            Ok(Self {
                user_certificate,
                revocation_date,
                crl_entry_extensions,
            })
        })
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        encode::sequence((
            (&self.user_certificate).encode(),
            self.revocation_date.encode_ref(),
            self.crl_entry_extensions
                .as_ref()
                .map(|extensions| extensions.encode_ref()),
        ))
    }
}

impl Values for RevokedCertificate {
    fn encoded_len(&self, mode: Mode) -> usize {
        self.encode_ref().encoded_len(mode)
    }

    fn write_encoded<W: Write>(&self, mode: Mode, target: &mut W) -> Result<(), std::io::Error> {
        self.encode_ref().write_encoded(mode, target)
    }
}

#[cfg(test)]
mod test {
    use {super::*, crate::testutil::*};

    #[test]
    fn certificate_round_trip() {
        for der in [ROOT_RSA_DER, INTERMEDIATE_P256_DER, LEAF_P384_DER, V1_RSA_DER] {
            let cert = Constructed::decode(der, Mode::Der, Certificate::take_from).unwrap();

            let tbs_raw = cert.tbs_certificate.raw_data.clone().unwrap();
            assert_eq!(cert.tbs_certificate.encode_der(), tbs_raw);

            let mut encoded = Vec::new();
            cert.encode_ref()
                .write_encoded(Mode::Der, &mut encoded)
                .unwrap();
            assert_eq!(encoded, der);
        }
    }

    #[test]
    fn v1_certificate_has_no_version_field() {
        let cert = Constructed::decode(V1_RSA_DER, Mode::Der, Certificate::take_from).unwrap();

        assert_eq!(cert.tbs_certificate.version, None);
        assert!(cert.tbs_certificate.extensions.is_none());
    }

    #[test]
    fn algorithm_parameters_preserved() {
        let cert = Constructed::decode(ROOT_RSA_DER, Mode::Der, Certificate::take_from).unwrap();
        assert!(cert.signature_algorithm.has_null_or_absent_parameters());
        assert!(cert.signature_algorithm.parameters.is_some());

        let cert = Constructed::decode(LEAF_P384_DER, Mode::Der, Certificate::take_from).unwrap();
        assert!(cert.signature_algorithm.parameters.is_none());
    }

    #[test]
    fn extension_lookup() {
        let cert = Constructed::decode(LEAF_P384_DER, Mode::Der, Certificate::take_from).unwrap();
        let extensions = cert.tbs_certificate.extensions.as_ref().unwrap();

        let key_usage = extensions.find(&OID_KEY_USAGE).unwrap();
        assert!(key_usage.is_critical());

        assert!(extensions.find(&OID_BASIC_CONSTRAINTS).is_none());
        assert!(extensions
            .iter_critical_oids()
            .any(|oid| oid == &OID_KEY_USAGE));
        assert!(extensions
            .iter_non_critical_oids()
            .any(|oid| oid == &OID_SUBJECT_ALT_NAME));

        let eku = extensions
            .find(&OID_EXTENDED_KEY_USAGE)
            .unwrap()
            .decode_value(take_extended_key_usage)
            .unwrap();
        assert_eq!(eku.len(), 1);
        assert_eq!(format!("{}", eku[0]), "1.3.6.1.5.5.7.3.1");
    }

    #[test]
    fn basic_constraints_decoding() {
        let cert =
            Constructed::decode(INTERMEDIATE_P256_DER, Mode::Der, Certificate::take_from).unwrap();
        let extensions = cert.tbs_certificate.extensions.as_ref().unwrap();

        let bc = extensions
            .find(&OID_BASIC_CONSTRAINTS)
            .unwrap()
            .decode_value(BasicConstraints::take_from)
            .unwrap();
        assert!(bc.ca);
        assert_eq!(bc.path_len_constraint, Some(Integer::from(0)));

        let mut encoded = Vec::new();
        bc.encode_ref()
            .write_encoded(Mode::Der, &mut encoded)
            .unwrap();
        assert_eq!(encoded, vec![0x30, 0x06, 0x01, 0x01, 0xff, 0x02, 0x01, 0x00]);
    }

    #[test]
    fn crl_round_trip() {
        let crl = Constructed::decode(ROOT_CRL_DER, Mode::Der, CertificateList::take_from).unwrap();

        assert_eq!(crl.tbs_cert_list.version, Some(Version::V2));
        assert_eq!(
            crl.tbs_cert_list.raw_data.clone().unwrap(),
            crl.tbs_cert_list.encode_der()
        );

        let entries = crl.tbs_cert_list.revoked_certificates.as_ref().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].user_certificate, Integer::from(0x0200));
        assert!(entries[0].crl_entry_extensions.is_some());
        assert_eq!(entries[1].user_certificate, Integer::from(0x4004));
        assert!(entries[1].crl_entry_extensions.is_none());

        let mut encoded = Vec::new();
        crl.encode_ref()
            .write_encoded(Mode::Der, &mut encoded)
            .unwrap();
        assert_eq!(encoded, ROOT_CRL_DER);
    }
}
