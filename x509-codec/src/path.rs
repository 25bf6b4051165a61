// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Certification paths and their `PkiPath` encoding.

use {
    crate::{certificate::X509Certificate, decoder::X509Decoder, X509CodecError as Error},
    bcder::{
        decode::Constructed,
        encode::{self, Values},
        Captured, Mode,
    },
    std::io::Write,
};

/// Name of the `PkiPath` encoding.
///
/// ```ASN.1
/// PkiPath ::= SEQUENCE OF Certificate
/// ```
///
/// Certificates are ordered from the trust anchor to the end entity.
pub const PKI_PATH_ENCODING: &str = "PkiPath";

const ENCODINGS: &[&str] = &[PKI_PATH_ENCODING];

/// An already encoded element emitted verbatim.
struct RawElement<'a>(&'a [u8]);

impl<'a> Values for RawElement<'a> {
    fn encoded_len(&self, _: Mode) -> usize {
        self.0.len()
    }

    fn write_encoded<W: Write>(&self, _: Mode, target: &mut W) -> Result<(), std::io::Error> {
        target.write_all(self.0)
    }
}

/// An ordered chain of certificates, end entity first.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CertificationPath {
    certificates: Vec<X509Certificate>,
}

impl CertificationPath {
    /// Construct an instance from certificates ordered end entity first.
    pub fn new(certificates: Vec<X509Certificate>) -> Self {
        Self { certificates }
    }

    /// The encodings supported by [Self::from_encoded] and [Self::encoded].
    pub fn encodings() -> &'static [&'static str] {
        ENCODINGS
    }

    /// Decode a path serialized in the named encoding.
    pub fn from_encoded(data: impl AsRef<[u8]>, encoding: &str) -> Result<Self, Error> {
        if encoding != PKI_PATH_ENCODING {
            return Err(Error::UnsupportedEncoding(encoding.to_string()));
        }

        Self::from_pki_path(data)
    }

    /// Decode a `PkiPath`.
    pub fn from_pki_path(data: impl AsRef<[u8]>) -> Result<Self, Error> {
        let elements = Constructed::decode(data.as_ref(), Mode::Der, |cons| {
            cons.take_sequence(|cons| {
                let mut elements = Vec::new();

                loop {
                    let mut found = false;
                    let captured = cons.capture(|cons| {
                        found = cons.take_opt_sequence(|cons| cons.skip_all())?.is_some();
                        Ok(())
                    })?;

                    if !found {
                        break;
                    }

                    elements.push(captured);
                }

                Ok(elements)
            })
        })?;

        let certificates = elements
            .iter()
            .rev()
            .map(|element: &Captured| {
                X509Decoder::new(element.as_slice())
                    .next_certificate()?
                    .ok_or_else(|| Error::MalformedEncoding("empty PkiPath element".into()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { certificates })
    }

    /// Serialize this path in the named encoding.
    pub fn encoded(&self, encoding: &str) -> Result<Vec<u8>, Error> {
        if encoding != PKI_PATH_ENCODING {
            return Err(Error::UnsupportedEncoding(encoding.to_string()));
        }

        Ok(self.encode_pki_path())
    }

    /// Serialize this path as a `PkiPath`.
    ///
    /// Each certificate is emitted as the data it was constructed from.
    pub fn encode_pki_path(&self) -> Vec<u8> {
        let elements = self
            .certificates
            .iter()
            .rev()
            .map(|cert| RawElement(cert.constructed_data()))
            .collect::<Vec<_>>();

        let mut buffer = Vec::new();
        // Writes to a Vec are infallible.
        let _ = encode::sequence(&elements).write_encoded(Mode::Der, &mut buffer);

        buffer
    }

    /// The certificates, end entity first.
    pub fn certificates(&self) -> &[X509Certificate] {
        &self.certificates
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, X509Certificate> {
        self.certificates.iter()
    }
}

impl From<Vec<X509Certificate>> for CertificationPath {
    fn from(certificates: Vec<X509Certificate>) -> Self {
        Self::new(certificates)
    }
}

impl<'a> IntoIterator for &'a CertificationPath {
    type Item = &'a X509Certificate;
    type IntoIter = std::slice::Iter<'a, X509Certificate>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
