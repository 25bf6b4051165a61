// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Format-sniffing reader of certificates and CRLs.
//!
//! [X509Decoder] accepts a stream holding any of:
//!
//! * DER encoded certificates or CRLs, possibly concatenated.
//! * PEM armored DER, possibly mixed with other PEM blocks.
//! * A PKCS #7 `SignedData` bundle, either DER or BER with indefinite lengths.
//!
//! Bundles are decoded as a whole and their members handed out one at a time
//! on subsequent calls.

use {
    crate::{
        certificate::X509Certificate,
        crl::X509Crl,
        rfc5652::{take_signed_data, SignedData},
        X509CodecError as Error,
    },
    bcder::{decode::Constructed, Captured, Mode},
    log::{debug, warn},
    std::io::{BufRead, BufReader, Read},
};

/// PEM block labels holding a certificate.
pub const CERTIFICATE_PEM_TAGS: &[&str] = &["CERTIFICATE", "X509 CERTIFICATE"];

/// PEM block labels holding a CRL.
pub const CRL_PEM_TAGS: &[&str] = &["X509 CRL", "CRL"];

const SEQUENCE: u8 = 0x30;
const INDEFINITE_LENGTH: u8 = 0x80;

/// Maximum depth of nested indefinite length values.
const MAX_NESTING: usize = 32;

/// Progress through a decoded bundle.
#[derive(Clone, Debug)]
enum BundleState<T> {
    Idle,
    Draining { entries: Vec<T>, index: usize },
}

impl<T: Clone> BundleState<T> {
    /// Take the next bundle member, returning to idle once exhausted.
    fn advance(&mut self) -> Option<T> {
        if let Self::Draining { entries, index } = self {
            if let Some(entry) = entries.get(*index) {
                *index += 1;
                return Some(entry.clone());
            }
        }

        *self = Self::Idle;
        None
    }

    /// Start draining a freshly decoded bundle, yielding its first member.
    fn start(&mut self, entries: Vec<T>) -> Option<T> {
        *self = Self::Draining { entries, index: 0 };
        self.advance()
    }
}

/// An object kind the decoder can produce.
trait Decodable: Clone + Sized {
    const KIND: &'static str;
    const PEM_TAGS: &'static [&'static str];

    fn decode_der(data: &[u8]) -> Result<Self, Error>;

    fn decode_ber(data: &[u8]) -> Result<Self, Error>;

    /// Total number of members of this kind's set in the bundle.
    fn choice_count(signed: &SignedData) -> usize;

    fn bundle_members(signed: &SignedData) -> Vec<&Captured>;
}

impl Decodable for X509Certificate {
    const KIND: &'static str = "certificate";
    const PEM_TAGS: &'static [&'static str] = CERTIFICATE_PEM_TAGS;

    fn decode_der(data: &[u8]) -> Result<Self, Error> {
        X509Certificate::from_der(data)
    }

    fn decode_ber(data: &[u8]) -> Result<Self, Error> {
        X509Certificate::from_ber(data)
    }

    fn choice_count(signed: &SignedData) -> usize {
        signed.certificates.as_ref().map(|c| c.len()).unwrap_or(0)
    }

    fn bundle_members(signed: &SignedData) -> Vec<&Captured> {
        signed.iter_certificates().collect()
    }
}

impl Decodable for X509Crl {
    const KIND: &'static str = "CRL";
    const PEM_TAGS: &'static [&'static str] = CRL_PEM_TAGS;

    fn decode_der(data: &[u8]) -> Result<Self, Error> {
        X509Crl::from_der(data)
    }

    fn decode_ber(data: &[u8]) -> Result<Self, Error> {
        X509Crl::from_ber(data)
    }

    fn choice_count(signed: &SignedData) -> usize {
        signed.crls.as_ref().map(|c| c.len()).unwrap_or(0)
    }

    fn bundle_members(signed: &SignedData) -> Vec<&Captured> {
        signed.iter_crls().collect()
    }
}

/// Reads certificates and CRLs from a stream of unknown format.
///
/// The format is sniffed on every call that isn't served from a bundle, so
/// DER objects can be concatenated and PEM blocks can be interleaved with
/// unrelated blocks. Mixing DER and PEM within one stream isn't supported.
pub struct X509Decoder<R: Read> {
    reader: BufReader<R>,
    certificates: BundleState<X509Certificate>,
    crls: BundleState<X509Crl>,
}

impl<R: Read> X509Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            certificates: BundleState::Idle,
            crls: BundleState::Idle,
        }
    }

    /// Obtain the next certificate.
    ///
    /// `None` is returned once the stream holds no further certificates.
    pub fn next_certificate(&mut self) -> Result<Option<X509Certificate>, Error> {
        next_object(&mut self.reader, &mut self.certificates)
    }

    /// Obtain the next CRL.
    pub fn next_crl(&mut self) -> Result<Option<X509Crl>, Error> {
        next_object(&mut self.reader, &mut self.crls)
    }

    /// Read all remaining certificates.
    pub fn read_certificates(&mut self) -> Result<Vec<X509Certificate>, Error> {
        let mut res = Vec::new();

        while let Some(cert) = self.next_certificate()? {
            res.push(cert);
        }

        Ok(res)
    }

    /// Read all remaining CRLs.
    pub fn read_crls(&mut self) -> Result<Vec<X509Crl>, Error> {
        let mut res = Vec::new();

        while let Some(crl) = self.next_crl()? {
            res.push(crl);
        }

        Ok(res)
    }

    pub fn into_inner(self) -> BufReader<R> {
        self.reader
    }
}

impl<'a> X509Decoder<&'a [u8]> {
    /// Construct an instance reading from a byte slice.
    pub fn from_slice(data: &'a [u8]) -> Self {
        Self::new(data)
    }

    /// Decode every certificate in the given data.
    pub fn certificates_from_slice(data: &'a [u8]) -> Result<Vec<X509Certificate>, Error> {
        Self::from_slice(data).read_certificates()
    }

    /// Decode every CRL in the given data.
    pub fn crls_from_slice(data: &'a [u8]) -> Result<Vec<X509Crl>, Error> {
        Self::from_slice(data).read_crls()
    }
}

fn next_object<R: BufRead, T: Decodable>(
    reader: &mut R,
    state: &mut BundleState<T>,
) -> Result<Option<T>, Error> {
    if let Some(entry) = state.advance() {
        return Ok(Some(entry));
    }

    let first = match reader.fill_buf()?.first() {
        Some(b) => *b,
        None => return Ok(None),
    };

    if first != SEQUENCE {
        debug!("sniffed PEM input while looking for {}", T::KIND);
        return match read_pem_block(reader, T::PEM_TAGS)? {
            Some(data) => decode_object(&data, state),
            None => Ok(None),
        };
    }

    let mut element = Vec::new();
    read_element(reader, &mut element, 0)?;

    decode_object(&element, state)
}

/// Decode one complete element, unwrapping `SignedData` bundles.
fn decode_object<T: Decodable>(
    element: &[u8],
    state: &mut BundleState<T>,
) -> Result<Option<T>, Error> {
    let indefinite = element.get(1) == Some(&INDEFINITE_LENGTH);

    let signed = Constructed::decode(element, Mode::Ber, |cons| take_signed_data(cons))?;

    match signed {
        Some(signed) => {
            debug!(
                "sniffed {} SignedData bundle",
                if indefinite { "BER" } else { "DER" }
            );

            let members = T::bundle_members(&signed);
            let ignored = T::choice_count(&signed) - members.len();
            if ignored > 0 {
                warn!("ignoring {} non-{} members of bundle", ignored, T::KIND);
            }

            let entries = members
                .into_iter()
                .map(|captured| T::decode_ber(captured.as_slice()))
                .collect::<Result<Vec<_>, _>>()?;
            debug!("bundle holds {} {} entries", entries.len(), T::KIND);

            Ok(state.start(entries))
        }
        None if indefinite => {
            debug!("sniffed BER {}", T::KIND);
            T::decode_ber(element).map(Some)
        }
        None => {
            debug!("sniffed DER {}", T::KIND);
            T::decode_der(element).map(Some)
        }
    }
}

fn truncated(e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        Error::MalformedEncoding("truncated ASN.1 element".into())
    } else {
        Error::Io(e)
    }
}

fn read_byte<R: Read>(reader: &mut R, out: &mut Vec<u8>) -> Result<u8, Error> {
    let mut b = [0u8];
    reader.read_exact(&mut b).map_err(truncated)?;
    out.push(b[0]);

    Ok(b[0])
}

/// Copy exactly one TLV element from the stream into `out`.
///
/// Indefinite length values are followed down to their end-of-contents
/// marker, which is copied as well.
fn read_element<R: Read>(reader: &mut R, out: &mut Vec<u8>, depth: usize) -> Result<(), Error> {
    if depth > MAX_NESTING {
        return Err(Error::MalformedEncoding(
            "indefinite length values nested too deeply".into(),
        ));
    }

    let tag = read_byte(reader, out)?;
    if tag & 0x1f == 0x1f {
        while read_byte(reader, out)? & 0x80 != 0 {}
    }

    let first = read_byte(reader, out)?;

    if first == INDEFINITE_LENGTH {
        if tag & 0x20 == 0 {
            return Err(Error::MalformedEncoding(
                "indefinite length on primitive value".into(),
            ));
        }

        loop {
            let start = out.len();
            read_element(reader, out, depth + 1)?;

            if out[start..] == [0, 0] {
                return Ok(());
            }
        }
    }

    let length = if first & 0x80 == 0 {
        first as u64
    } else {
        let count = first & 0x7f;
        if count > 4 {
            return Err(Error::MalformedEncoding(format!(
                "unsupported length of {} octets",
                count
            )));
        }

        let mut length = 0u64;
        for _ in 0..count {
            length = (length << 8) | read_byte(reader, out)? as u64;
        }

        length
    };

    let read = reader.by_ref().take(length).read_to_end(out)?;
    if (read as u64) < length {
        return Err(Error::MalformedEncoding("truncated ASN.1 element".into()));
    }

    Ok(())
}

fn parse_marker<'a>(line: &'a str, kind: &str) -> Option<&'a str> {
    line.strip_prefix("-----")?
        .strip_prefix(kind)?
        .strip_prefix(' ')?
        .strip_suffix("-----")
}

/// Scan for the next PEM block having one of `tags` and decode its contents.
///
/// Blocks with other tags are skipped. Resolves to `None` if the stream ends
/// before a matching block starts.
fn read_pem_block<R: BufRead>(reader: &mut R, tags: &[&str]) -> Result<Option<Vec<u8>>, Error> {
    let mut line = Vec::new();
    let mut block: Option<(String, String)> = None;

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return match block {
                Some((tag, _)) => Err(Error::MalformedEncoding(format!(
                    "missing END marker for PEM block {}",
                    tag
                ))),
                None => Ok(None),
            };
        }

        let text = String::from_utf8_lossy(&line);
        let text = text.trim();

        match block.as_mut() {
            None => {
                if let Some(tag) = parse_marker(text, "BEGIN") {
                    if tags.contains(&tag) {
                        block = Some((tag.to_string(), String::new()));
                    } else {
                        warn!("skipping PEM block {}", tag);
                    }
                }
            }
            Some((tag, body)) => {
                if parse_marker(text, "END") == Some(tag.as_str()) {
                    let armored = format!(
                        "-----BEGIN {tag}-----\n{body}-----END {tag}-----\n",
                        tag = tag,
                        body = body
                    );

                    return Ok(Some(pem::parse(armored)?.contents));
                }

                body.push_str(text);
                body.push('\n');
            }
        }
    }
}
