// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ASN.1 types defined in RFC 3280.

use {
    crate::rfc4519::{
        attribute_short_name, OID_COMMON_NAME, OID_COUNTRY_NAME, OID_ORGANIZATION_NAME,
    },
    bcder::{
        decode::{Constructed, DecodeError, Source},
        encode::{self, PrimitiveContent, Values},
        string::{Ia5String, PrintableString, Utf8String},
        Captured, Mode, OctetString, Oid, Tag,
    },
    bytes::Bytes,
    std::{
        convert::Infallible,
        fmt::{Debug, Formatter},
        io::Write,
        ops::{Deref, DerefMut},
        str::FromStr,
    },
};

pub type GeneralNames = Vec<GeneralName>;

/// Decode a `GeneralNames` sequence.
///
/// ```ASN.1
/// GeneralNames ::= SEQUENCE SIZE (1..MAX) OF GeneralName
/// ```
pub fn take_general_names<S: Source>(
    cons: &mut Constructed<S>,
) -> Result<GeneralNames, DecodeError<S::Error>> {
    cons.take_sequence(|cons| {
        let mut names = Vec::new();

        while let Some(name) = GeneralName::take_opt_from(cons)? {
            names.push(name);
        }

        Ok(names)
    })
}

/// General name.
///
/// ```ASN.1
/// GeneralName ::= CHOICE {
///   otherName                       [0]     AnotherName,
///   rfc822Name                      [1]     IA5String,
///   dNSName                         [2]     IA5String,
///   x400Address                     [3]     ORAddress,
///   directoryName                   [4]     Name,
///   ediPartyName                    [5]     EDIPartyName,
///   uniformResourceIdentifier       [6]     IA5String,
///   iPAddress                       [7]     OCTET STRING,
///   registeredID                    [8]     OBJECT IDENTIFIER }
/// ```
///
/// The module uses implicit tagging, so every alternative except the
/// `directoryName` CHOICE replaces the universal tag of its type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GeneralName {
    OtherName(AnotherName),
    Rfc822Name(Ia5String),
    DnsName(Ia5String),
    X400Address(OrAddress),
    DirectoryName(Name),
    EdiPartyName(EdiPartyName),
    UniformResourceIdentifier(Ia5String),
    IpAddress(OctetString),
    RegisteredId(Oid),
}

impl GeneralName {
    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        match Self::take_opt_from(cons)? {
            Some(name) => Ok(name),
            None => Err(cons.content_err("missing GeneralName")),
        }
    }

    pub fn take_opt_from<S: Source>(
        cons: &mut Constructed<S>,
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        if let Some(name) =
            cons.take_opt_constructed_if(Tag::CTX_0, |cons| AnotherName::from_sequence(cons))?
        {
            Ok(Some(Self::OtherName(name)))
        } else if let Some(name) =
            cons.take_opt_value_if(Tag::CTX_1, |content| Ia5String::from_content(content))?
        {
            Ok(Some(Self::Rfc822Name(name)))
        } else if let Some(name) =
            cons.take_opt_value_if(Tag::CTX_2, |content| Ia5String::from_content(content))?
        {
            Ok(Some(Self::DnsName(name)))
        } else if let Some(name) =
            cons.take_opt_constructed_if(Tag::CTX_3, |cons| OrAddress::from_sequence(cons))?
        {
            Ok(Some(Self::X400Address(name)))
        } else if let Some(name) =
            cons.take_opt_constructed_if(Tag::CTX_4, |cons| Name::take_from(cons))?
        {
            Ok(Some(Self::DirectoryName(name)))
        } else if let Some(name) =
            cons.take_opt_constructed_if(Tag::CTX_5, |cons| EdiPartyName::from_sequence(cons))?
        {
            Ok(Some(Self::EdiPartyName(name)))
        } else if let Some(name) =
            cons.take_opt_value_if(Tag::CTX_6, |content| Ia5String::from_content(content))?
        {
            Ok(Some(Self::UniformResourceIdentifier(name)))
        } else if let Some(name) =
            cons.take_opt_value_if(Tag::ctx(7), |content| OctetString::from_content(content))?
        {
            Ok(Some(Self::IpAddress(name)))
        } else if let Some(name) =
            cons.take_opt_primitive_if(Tag::ctx(8), |prim| Oid::from_primitive(prim))?
        {
            Ok(Some(Self::RegisteredId(name)))
        } else {
            Ok(None)
        }
    }

    fn encode_dispatch<W: Write>(&self, mode: Mode, target: &mut W) -> Result<(), std::io::Error> {
        match self {
            Self::OtherName(name) => name.encode_ref_as(Tag::CTX_0).write_encoded(mode, target),
            Self::Rfc822Name(name) => name.encode_ref_as(Tag::CTX_1).write_encoded(mode, target),
            Self::DnsName(name) => name.encode_ref_as(Tag::CTX_2).write_encoded(mode, target),
            Self::X400Address(address) => address
                .encode_ref_as(Tag::CTX_3)
                .write_encoded(mode, target),
            Self::DirectoryName(name) => encode::Constructed::new(Tag::CTX_4, name.encode_ref())
                .write_encoded(mode, target),
            Self::EdiPartyName(name) => name.encode_ref_as(Tag::CTX_5).write_encoded(mode, target),
            Self::UniformResourceIdentifier(name) => {
                name.encode_ref_as(Tag::CTX_6).write_encoded(mode, target)
            }
            Self::IpAddress(address) => address
                .encode_ref_as(Tag::ctx(7))
                .write_encoded(mode, target),
            Self::RegisteredId(oid) => oid.encode_ref_as(Tag::ctx(8)).write_encoded(mode, target),
        }
    }
}

impl Values for GeneralName {
    fn encoded_len(&self, mode: Mode) -> usize {
        match self {
            Self::OtherName(name) => name.encode_ref_as(Tag::CTX_0).encoded_len(mode),
            Self::Rfc822Name(name) => name.encode_ref_as(Tag::CTX_1).encoded_len(mode),
            Self::DnsName(name) => name.encode_ref_as(Tag::CTX_2).encoded_len(mode),
            Self::X400Address(address) => address.encode_ref_as(Tag::CTX_3).encoded_len(mode),
            Self::DirectoryName(name) => {
                encode::Constructed::new(Tag::CTX_4, name.encode_ref()).encoded_len(mode)
            }
            Self::EdiPartyName(name) => name.encode_ref_as(Tag::CTX_5).encoded_len(mode),
            Self::UniformResourceIdentifier(name) => {
                name.encode_ref_as(Tag::CTX_6).encoded_len(mode)
            }
            Self::IpAddress(address) => address.encode_ref_as(Tag::ctx(7)).encoded_len(mode),
            Self::RegisteredId(oid) => oid.encode_ref_as(Tag::ctx(8)).encoded_len(mode),
        }
    }

    fn write_encoded<W: Write>(&self, mode: Mode, target: &mut W) -> Result<(), std::io::Error> {
        self.encode_dispatch(mode, target)
    }
}

impl std::fmt::Display for GeneralName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OtherName(name) => write!(f, "othername:{}", name.type_id),
            Self::Rfc822Name(name) => write!(f, "email:{}", name),
            Self::DnsName(name) => write!(f, "DNS:{}", name),
            Self::X400Address(_) => f.write_str("X400Name:<unsupported>"),
            Self::DirectoryName(name) => write!(f, "DirName:{}", name.rfc4514_string()),
            Self::EdiPartyName(_) => f.write_str("EdiPartyName:<unsupported>"),
            Self::UniformResourceIdentifier(uri) => write!(f, "URI:{}", uri),
            Self::IpAddress(address) => {
                let data = address.to_bytes();

                match data.len() {
                    4 => write!(f, "IP:{}.{}.{}.{}", data[0], data[1], data[2], data[3]),
                    16 => {
                        let mut addr = [0u8; 16];
                        addr.copy_from_slice(&data);
                        write!(f, "IP:{}", std::net::Ipv6Addr::from(addr))
                    }
                    _ => write!(f, "IP:{}", hex::encode(&data)),
                }
            }
            Self::RegisteredId(oid) => write!(f, "RID:{}", oid),
        }
    }
}

/// A reference to another name.
///
/// ```ASN.1
/// AnotherName ::= SEQUENCE {
///   type-id    OBJECT IDENTIFIER,
///   value      [0] EXPLICIT ANY DEFINED BY type-id }
/// ```
#[derive(Clone, Debug)]
pub struct AnotherName {
    pub type_id: Oid,
    pub value: Captured,
}

impl PartialEq for AnotherName {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.value.as_slice() == other.value.as_slice()
    }
}

impl Eq for AnotherName {}

impl AnotherName {
    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| Self::from_sequence(cons))
    }

    fn from_sequence<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        let type_id = Oid::take_from(cons)?;
        let value = cons.take_constructed_if(Tag::CTX_0, |cons| cons.capture_all())?;

        Ok(Self { type_id, value })
    }

    pub fn encode_ref_as(&self, tag: Tag) -> impl Values + '_ {
        encode::sequence_as(
            tag,
            (
                self.type_id.encode_ref(),
                encode::Constructed::new(Tag::CTX_0, &self.value),
            ),
        )
    }
}

/// An X.400 address.
///
/// The structure is retained as captured data and not interpreted.
#[derive(Clone, Debug)]
pub struct OrAddress(Captured);

impl PartialEq for OrAddress {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_slice() == other.0.as_slice()
    }
}

impl Eq for OrAddress {}

impl OrAddress {
    fn from_sequence<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        Ok(Self(cons.capture_all()?))
    }

    pub fn encode_ref_as(&self, tag: Tag) -> impl Values + '_ {
        encode::Constructed::new(tag, &self.0)
    }
}

/// EDI party name.
///
/// ```ASN.1
/// EDIPartyName ::= SEQUENCE {
///   nameAssigner            [0]     DirectoryString OPTIONAL,
///   partyName               [1]     DirectoryString }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EdiPartyName {
    pub name_assigner: Option<DirectoryString>,
    pub party_name: DirectoryString,
}

impl EdiPartyName {
    fn from_sequence<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        let name_assigner =
            cons.take_opt_constructed_if(Tag::CTX_0, |cons| DirectoryString::take_from(cons))?;
        let party_name =
            cons.take_constructed_if(Tag::CTX_1, |cons| DirectoryString::take_from(cons))?;

        Ok(Self {
            name_assigner,
            party_name,
        })
    }

    pub fn encode_ref_as(&self, tag: Tag) -> impl Values + '_ {
        encode::sequence_as(
            tag,
            (
                self.name_assigner
                    .as_ref()
                    .map(|name_assigner| encode::Constructed::new(Tag::CTX_0, name_assigner)),
                encode::Constructed::new(Tag::CTX_1, &self.party_name),
            ),
        )
    }
}

/// Directory string.
///
/// ```ASN.1
/// DirectoryString ::= CHOICE {
///       teletexString           TeletexString (SIZE (1..MAX)),
///       printableString         PrintableString (SIZE (1..MAX)),
///       universalString         UniversalString (SIZE (1..MAX)),
///       utf8String              UTF8String (SIZE (1..MAX)),
///       bmpString               BMPString (SIZE (1..MAX)) }
/// ```
///
/// The TeletexString, UniversalString and BMPString alternatives hold their
/// raw content octets.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DirectoryString {
    TeletexString(Bytes),
    PrintableString(PrintableString),
    UniversalString(Bytes),
    Utf8String(Utf8String),
    BmpString(Bytes),
}

impl DirectoryString {
    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        cons.take_value(|tag, content| {
            if tag == Tag::PRINTABLE_STRING {
                Ok(Self::PrintableString(PrintableString::from_content(
                    content,
                )?))
            } else if tag == Tag::UTF8_STRING {
                Ok(Self::Utf8String(Utf8String::from_content(content)?))
            } else if tag == Tag::TELETEX_STRING {
                Ok(Self::TeletexString(content.as_primitive()?.take_all()?))
            } else if tag == Tag::UNIVERSAL_STRING {
                Ok(Self::UniversalString(content.as_primitive()?.take_all()?))
            } else if tag == Tag::BMP_STRING {
                Ok(Self::BmpString(content.as_primitive()?.take_all()?))
            } else {
                Err(content.content_err("expected a DirectoryString"))
            }
        })
    }

    fn raw(&self) -> Option<(Tag, &Bytes)> {
        match self {
            Self::TeletexString(data) => Some((Tag::TELETEX_STRING, data)),
            Self::UniversalString(data) => Some((Tag::UNIVERSAL_STRING, data)),
            Self::BmpString(data) => Some((Tag::BMP_STRING, data)),
            Self::PrintableString(_) | Self::Utf8String(_) => None,
        }
    }
}

impl std::fmt::Display for DirectoryString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PrintableString(s) => write!(f, "{}", s),
            Self::Utf8String(s) => write!(f, "{}", s),
            // TeletexString content is treated as Latin-1.
            Self::TeletexString(data) => {
                f.write_str(&data.iter().map(|b| *b as char).collect::<String>())
            }
            Self::UniversalString(data) => f.write_str(
                &data
                    .chunks(4)
                    .map(|c| {
                        let v = c.iter().fold(0u32, |acc, b| (acc << 8) | *b as u32);
                        char::from_u32(v).unwrap_or(char::REPLACEMENT_CHARACTER)
                    })
                    .collect::<String>(),
            ),
            Self::BmpString(data) => {
                let units = data
                    .chunks(2)
                    .map(|c| c.iter().fold(0u16, |acc, b| (acc << 8) | *b as u16))
                    .collect::<Vec<_>>();
                f.write_str(&String::from_utf16_lossy(&units))
            }
        }
    }
}

impl Values for DirectoryString {
    fn encoded_len(&self, mode: Mode) -> usize {
        match self {
            Self::PrintableString(s) => s.encode_ref().encoded_len(mode),
            Self::Utf8String(s) => s.encode_ref().encoded_len(mode),
            _ => match self.raw() {
                Some((tag, data)) => OctetString::new(data.clone())
                    .encode_ref_as(tag)
                    .encoded_len(mode),
                None => 0,
            },
        }
    }

    fn write_encoded<W: Write>(&self, mode: Mode, target: &mut W) -> Result<(), std::io::Error> {
        match self {
            Self::PrintableString(s) => s.encode_ref().write_encoded(mode, target),
            Self::Utf8String(s) => s.encode_ref().write_encoded(mode, target),
            _ => match self.raw() {
                Some((tag, data)) => OctetString::new(data.clone())
                    .encode_ref_as(tag)
                    .write_encoded(mode, target),
                None => Ok(()),
            },
        }
    }
}

/// A distinguished name.
///
/// ```ASN.1
/// Name ::= CHOICE { -- only one possibility for now --
///   rdnSequence  RDNSequence }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Name {
    RdnSequence(RdnSequence),
}

impl Name {
    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        Ok(Self::RdnSequence(RdnSequence::take_from(cons)?))
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        match self {
            Self::RdnSequence(seq) => seq.encode_ref(),
        }
    }

    /// Encode this name to DER.
    ///
    /// Attribute values are retained as captured, and RDN sets are emitted
    /// in their original order, so the output is identical to the DER this
    /// instance was decoded from.
    pub fn encode_der(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        // Writes to a Vec are infallible.
        let _ = self.encode_ref().write_encoded(Mode::Der, &mut buffer);

        buffer
    }

    /// Iterate over all attributes in this Name.
    pub fn iter_attributes(&self) -> impl Iterator<Item = &AttributeTypeAndValue> {
        self.0.iter().flat_map(|rdn| rdn.iter())
    }

    /// Iterate over all attributes in this Name having a given OID.
    pub fn iter_by_oid<T: AsRef<[u8]>>(
        &self,
        oid: Oid<T>,
    ) -> impl Iterator<Item = &AttributeTypeAndValue> {
        self.iter_attributes()
            .filter(move |atv| atv.typ.as_ref() == oid.as_ref())
    }

    /// Iterate over all Common Name (CN) attributes.
    pub fn iter_common_name(&self) -> impl Iterator<Item = &AttributeTypeAndValue> {
        self.iter_by_oid(OID_COMMON_NAME)
    }

    /// Attempt to obtain the first string attribute having the given OID.
    pub fn find_first_attribute_string<T: AsRef<[u8]>>(
        &self,
        oid: Oid<T>,
    ) -> Result<Option<String>, DecodeError<Infallible>> {
        if let Some(atv) = self.iter_by_oid(oid).next() {
            Ok(Some(atv.to_string()?))
        } else {
            Ok(None)
        }
    }

    /// Render this name per RFC 4514.
    ///
    /// RDNs are emitted most specific first, i.e. in the reverse of their
    /// encoded order. Attributes without a registered short name are
    /// rendered as `<dotted OID>=#<hex DER>`.
    pub fn rfc4514_string(&self) -> String {
        self.0
            .iter()
            .rev()
            .map(|rdn| {
                rdn.iter()
                    .map(|atv| atv.rfc4514_string())
                    .collect::<Vec<_>>()
                    .join("+")
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Appends a PrintableString value for the given OID.
    ///
    /// The attribute will always be written to a new RDN.
    pub fn append_printable_string<T: AsRef<[u8]>>(
        &mut self,
        oid: Oid<T>,
        value: &str,
    ) -> Result<(), bcder::string::CharSetError> {
        let mut rdn = RelativeDistinguishedName::default();
        rdn.push(AttributeTypeAndValue::new_printable_string(oid, value)?);
        self.0.push(rdn);

        Ok(())
    }

    /// Appends a Utf8String value for the given OID.
    ///
    /// The attribute will always be written to a new RDN.
    pub fn append_utf8_string<T: AsRef<[u8]>>(
        &mut self,
        oid: Oid<T>,
        value: &str,
    ) -> Result<(), bcder::string::CharSetError> {
        let mut rdn = RelativeDistinguishedName::default();
        rdn.push(AttributeTypeAndValue::new_utf8_string(oid, value)?);
        self.0.push(rdn);

        Ok(())
    }

    /// Append a Country (C) attribute as a PrintableString.
    pub fn append_country(&mut self, value: &str) -> Result<(), bcder::string::CharSetError> {
        self.append_printable_string(OID_COUNTRY_NAME, value)
    }

    /// Append an Organization Name (O) attribute.
    pub fn append_organization_utf8_string(
        &mut self,
        value: &str,
    ) -> Result<(), bcder::string::CharSetError> {
        self.append_utf8_string(OID_ORGANIZATION_NAME, value)
    }

    /// Append a Common Name (CN) attribute.
    pub fn append_common_name_utf8_string(
        &mut self,
        value: &str,
    ) -> Result<(), bcder::string::CharSetError> {
        self.append_utf8_string(OID_COMMON_NAME, value)
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::RdnSequence(RdnSequence::default())
    }
}

impl Deref for Name {
    type Target = RdnSequence;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::RdnSequence(seq) => seq,
        }
    }
}

impl DerefMut for Name {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self {
            Self::RdnSequence(seq) => seq,
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RdnSequence(Vec<RelativeDistinguishedName>);

impl Deref for RdnSequence {
    type Target = Vec<RelativeDistinguishedName>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for RdnSequence {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl RdnSequence {
    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            let mut values = Vec::new();

            while let Some(value) = RelativeDistinguishedName::take_opt_from(cons)? {
                values.push(value);
            }

            Ok(Self(values))
        })
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        encode::sequence(&self.0)
    }
}

/// Relative distinguished name.
///
/// ```ASN.1
/// RelativeDistinguishedName ::=
///   SET OF AttributeTypeAndValue
/// ```
///
/// Members are kept in decode order. Encoding never re-sorts them, so a
/// name decoded from DER re-encodes to the same bytes.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RelativeDistinguishedName(Vec<AttributeTypeAndValue>);

impl Deref for RelativeDistinguishedName {
    type Target = Vec<AttributeTypeAndValue>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for RelativeDistinguishedName {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl RelativeDistinguishedName {
    pub fn take_opt_from<S: Source>(
        cons: &mut Constructed<S>,
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        cons.take_opt_set(|cons| {
            let mut values = Vec::new();

            while let Some(value) = AttributeTypeAndValue::take_opt_from(cons)? {
                values.push(value);
            }

            Ok(Self(values))
        })
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        encode::set(&self.0)
    }
}

impl Values for RelativeDistinguishedName {
    fn encoded_len(&self, mode: Mode) -> usize {
        self.encode_ref().encoded_len(mode)
    }

    fn write_encoded<W: Write>(&self, mode: Mode, target: &mut W) -> Result<(), std::io::Error> {
        self.encode_ref().write_encoded(mode, target)
    }
}

/// Attribute type and its value.
///
/// ```ASN.1
/// AttributeTypeAndValue ::= SEQUENCE {
///   type     AttributeType,
///   value    AttributeValue }
/// ```
#[derive(Clone)]
pub struct AttributeTypeAndValue {
    pub typ: AttributeType,
    pub value: AttributeValue,
}

impl Debug for AttributeTypeAndValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("AttributeTypeAndValue");
        s.field("type", &format_args!("{}", self.typ));
        s.field("value", &self.value);
        s.finish()
    }
}

impl AttributeTypeAndValue {
    pub fn take_opt_from<S: Source>(
        cons: &mut Constructed<S>,
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        cons.take_opt_sequence(|cons| {
            let typ = AttributeType::take_from(cons)?;
            let value = cons.capture_all()?;

            Ok(Self {
                typ,
                value: value.into(),
            })
        })
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        encode::sequence((self.typ.encode_ref(), self.value.deref()))
    }

    /// Attempt to coerce the stored value to a Rust string.
    pub fn to_string(&self) -> Result<String, DecodeError<Infallible>> {
        self.value.to_string()
    }

    /// Render as an RFC 4514 `type=value` pair.
    pub fn rfc4514_string(&self) -> String {
        match (attribute_short_name(&self.typ), self.value.to_string()) {
            (Some(name), Ok(value)) => format!("{}={}", name, escape_rfc4514(&value)),
            (None, _) | (_, Err(_)) => format!(
                "{}=#{}",
                self.typ,
                hex::encode(self.value.as_slice())
            ),
        }
    }

    /// Construct a new instance with a PrintableString given an OID and Rust string.
    pub fn new_printable_string<T: AsRef<[u8]>>(
        oid: Oid<T>,
        s: &str,
    ) -> Result<Self, bcder::string::CharSetError> {
        Ok(Self {
            typ: Oid(Bytes::copy_from_slice(oid.as_ref())),
            value: AttributeValue::new_printable_string(s)?,
        })
    }

    /// Construct a new instance with a Utf8String given an OID and Rust string.
    pub fn new_utf8_string<T: AsRef<[u8]>>(
        oid: Oid<T>,
        s: &str,
    ) -> Result<Self, bcder::string::CharSetError> {
        Ok(Self {
            typ: Oid(Bytes::copy_from_slice(oid.as_ref())),
            value: AttributeValue::new_utf8_string(s)?,
        })
    }
}

fn escape_rfc4514(value: &str) -> String {
    let mut res = String::with_capacity(value.len());
    let last = value.chars().count().saturating_sub(1);

    for (i, c) in value.chars().enumerate() {
        let leading = i == 0 && (c == ' ' || c == '#');
        let trailing = i == last && c == ' ';

        if leading || trailing || matches!(c, '"' | '+' | ',' | ';' | '<' | '>' | '\\') {
            res.push('\\');
        }
        res.push(c);
    }

    res
}

impl PartialEq for AttributeTypeAndValue {
    fn eq(&self, other: &Self) -> bool {
        self.typ == other.typ && self.value.as_slice() == other.value.as_slice()
    }
}

impl Eq for AttributeTypeAndValue {}

impl Values for AttributeTypeAndValue {
    fn encoded_len(&self, mode: Mode) -> usize {
        self.encode_ref().encoded_len(mode)
    }

    fn write_encoded<W: Write>(&self, mode: Mode, target: &mut W) -> Result<(), std::io::Error> {
        self.encode_ref().write_encoded(mode, target)
    }
}

pub type AttributeType = Oid;

#[derive(Clone)]
pub struct AttributeValue(Captured);

impl Debug for AttributeValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}", hex::encode(self.0.as_slice())))
    }
}

impl AttributeValue {
    /// Construct a new instance containing a PrintableString given a Rust string.
    pub fn new_printable_string(s: &str) -> Result<Self, bcder::string::CharSetError> {
        let ds = DirectoryString::PrintableString(PrintableString::from_str(s)?);

        Ok(Self(Captured::from_values(Mode::Der, ds)))
    }

    /// Construct a new instance containing a Utf8String given a Rust string.
    pub fn new_utf8_string(s: &str) -> Result<Self, bcder::string::CharSetError> {
        let ds = DirectoryString::Utf8String(Utf8String::from_str(s)?);

        Ok(Self(Captured::from_values(Mode::Der, ds)))
    }

    /// Attempt to convert the inner value to a Rust string.
    ///
    /// Any DirectoryString alternative as well as IA5String (used by
    /// email addresses and domain components) and NumericString are accepted.
    pub fn to_string(&self) -> Result<String, DecodeError<Infallible>> {
        self.0.clone().decode(|cons| {
            if let Some(s) = cons.take_opt_value_if(Tag::NUMERIC_STRING, |content| {
                bcder::NumericString::from_content(content)
            })? {
                Ok(s.to_string())
            } else if let Some(s) = cons.take_opt_value_if(Tag::IA5_STRING, |content| {
                Ia5String::from_content(content)
            })? {
                Ok(s.to_string())
            } else {
                Ok(DirectoryString::take_from(cons)?.to_string())
            }
        })
    }
}

impl Deref for AttributeValue {
    type Target = Captured;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Captured> for AttributeValue {
    fn from(v: Captured) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod test {
    use {super::*, crate::rfc4519::OID_DOMAIN_COMPONENT};

    fn encode<V: Values>(v: V) -> Vec<u8> {
        let mut buffer = Vec::new();
        v.write_encoded(Mode::Der, &mut buffer).unwrap();
        buffer
    }

    #[test]
    fn name_round_trip_preserves_set_order() {
        // A multi-valued RDN whose members are deliberately not in DER SET
        // order (CN sorts before OU by encoding, but appears after it).
        let mut rdn = RelativeDistinguishedName::default();
        rdn.push(
            AttributeTypeAndValue::new_utf8_string(crate::rfc4519::OID_ORGANIZATIONAL_UNIT_NAME, "zz")
                .unwrap(),
        );
        rdn.push(AttributeTypeAndValue::new_utf8_string(OID_COMMON_NAME, "a").unwrap());

        let mut name = Name::default();
        name.append_country("US").unwrap();
        name.push(rdn);

        let der = name.encode_der();
        let decoded = Constructed::decode(der.as_slice(), Mode::Der, Name::take_from).unwrap();

        assert_eq!(decoded, name);
        assert_eq!(decoded.encode_der(), der);
        assert_eq!(decoded.rfc4514_string(), "OU=zz+CN=a,C=US");
    }

    #[test]
    fn rfc4514_rendering() {
        let mut name = Name::default();
        name.append_country("US").unwrap();
        name.append_organization_utf8_string("Acme, Inc.").unwrap();
        name.append_common_name_utf8_string(" lead").unwrap();

        assert_eq!(name.rfc4514_string(), "CN=\\ lead,O=Acme\\, Inc.,C=US");

        assert_eq!(
            name.find_first_attribute_string(OID_COMMON_NAME).unwrap(),
            Some(" lead".to_string())
        );
        assert_eq!(
            name.find_first_attribute_string(OID_DOMAIN_COMPONENT).unwrap(),
            None
        );
    }

    #[test]
    fn general_name_implicit_tags() {
        // [2] IMPLICIT IA5String "codec.example"
        let mut dns = vec![0x82, 13];
        dns.extend_from_slice(b"codec.example");
        // [7] IMPLICIT OCTET STRING 192.0.2.1
        let ip = vec![0x87, 4, 192, 0, 2, 1];
        // [8] IMPLICIT OBJECT IDENTIFIER 2.5.4.3
        let rid = vec![0x88, 3, 85, 4, 3];

        let mut data = vec![0x30, (dns.len() + ip.len() + rid.len()) as u8];
        data.extend_from_slice(&dns);
        data.extend_from_slice(&ip);
        data.extend_from_slice(&rid);

        let names =
            Constructed::decode(data.as_slice(), Mode::Der, |cons| take_general_names(cons))
                .unwrap();

        assert_eq!(names.len(), 3);
        assert_eq!(names[0].to_string(), "DNS:codec.example");
        assert_eq!(names[1].to_string(), "IP:192.0.2.1");
        assert_eq!(names[2].to_string(), "RID:2.5.4.3");

        assert_eq!(encode(encode::sequence(&names)), data);
    }

    #[test]
    fn directory_name_is_explicit() {
        let mut name = Name::default();
        name.append_common_name_utf8_string("dir").unwrap();

        let general = GeneralName::DirectoryName(name.clone());
        let der = encode(&general);
        assert_eq!(der[0], 0xa4);
        assert_eq!(&der[2..], name.encode_der().as_slice());

        let decoded =
            Constructed::decode(der.as_slice(), Mode::Der, GeneralName::take_from).unwrap();
        assert_eq!(decoded, general);
    }

    #[test]
    fn bmp_directory_string() {
        let data = [0x1e, 0x04, 0x00, b'h', 0x00, b'i'];
        let value = Constructed::decode(&data[..], Mode::Der, DirectoryString::take_from).unwrap();

        assert_eq!(value.to_string(), "hi");
        assert_eq!(encode(&value), data.to_vec());
    }
}
