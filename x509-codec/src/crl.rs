// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Certificate revocation lists.

use {
    crate::{
        algorithm::{signature_algorithm_name, AlgorithmAliases, DefaultAliases},
        certificate::{verify_signed_structure, X500Principal, X509Certificate},
        decoder::CRL_PEM_TAGS,
        extensions::{self, CrlReason},
        keys::PublicKey,
        rfc3280::Name,
        rfc5280::{self, CertificateList, Extensions, Version},
        X509CodecError as Error,
    },
    bcder::{decode::Constructed, encode::Values, int::Integer, Mode, Oid},
    bytes::Bytes,
    chrono::{DateTime, Utc},
};

/// An immutable certificate revocation list that was parsed from data.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct X509Crl {
    original: Vec<u8>,
    inner: CertificateList,
}

impl X509Crl {
    /// Construct an instance by parsing DER encoded ASN.1 data.
    pub fn from_der(data: impl AsRef<[u8]>) -> Result<Self, Error> {
        let original = data.as_ref().to_vec();
        let inner = Constructed::decode(original.as_slice(), Mode::Der, |cons| {
            CertificateList::take_from(cons)
        })?;

        Ok(Self { original, inner })
    }

    /// Construct an instance by parsing BER encoded ASN.1 data.
    pub fn from_ber(data: impl AsRef<[u8]>) -> Result<Self, Error> {
        let original = data.as_ref().to_vec();
        let inner = Constructed::decode(original.as_slice(), Mode::Ber, |cons| {
            CertificateList::take_from(cons)
        })?;

        Ok(Self { original, inner })
    }

    /// Construct an instance from a `X509 CRL` or `CRL` PEM block.
    pub fn from_pem(data: impl AsRef<[u8]>) -> Result<Self, Error> {
        let data = pem::parse(data.as_ref())?;

        if !CRL_PEM_TAGS.contains(&data.tag.as_str()) {
            return Err(Error::MalformedEncoding(format!(
                "unexpected PEM block {}",
                data.tag
            )));
        }

        Self::from_der(data.contents)
    }

    /// The parsed ASN.1 certificate list.
    pub fn asn1(&self) -> &CertificateList {
        &self.inner
    }

    /// The data that was used to construct this instance.
    pub fn constructed_data(&self) -> &[u8] {
        &self.original
    }

    pub fn encode_der(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        // Writes to a Vec are infallible.
        let _ = self.inner.encode_ref().write_encoded(Mode::Der, &mut buffer);

        buffer
    }

    pub fn encode_pem(&self) -> String {
        pem::encode(&pem::Pem {
            tag: "X509 CRL".to_string(),
            contents: self.encode_der(),
        })
    }

    /// The CRL version: 1 or 2.
    pub fn version(&self) -> u8 {
        self.inner
            .tbs_cert_list
            .version
            .map(|v| v.number())
            .unwrap_or(1)
    }

    pub fn issuer_name(&self) -> &Name {
        &self.inner.tbs_cert_list.issuer
    }

    pub fn issuer_principal(&self) -> X500Principal {
        X500Principal::from_name(self.issuer_name())
    }

    pub fn this_update(&self) -> DateTime<Utc> {
        self.inner.tbs_cert_list.this_update.to_datetime()
    }

    pub fn next_update(&self) -> Option<DateTime<Utc>> {
        self.inner
            .tbs_cert_list
            .next_update
            .as_ref()
            .map(|t| t.to_datetime())
    }

    /// Iterate over the entries of this list, in encoded order.
    pub fn revoked_certificates(&self) -> impl Iterator<Item = RevokedCertificate<'_>> {
        self.inner
            .tbs_cert_list
            .revoked_certificates
            .iter()
            .flatten()
            .map(|entry| RevokedCertificate { entry })
    }

    /// Find the entry for a serial number.
    pub fn revoked_certificate(&self, serial: &Integer) -> Option<RevokedCertificate<'_>> {
        self.revoked_certificates()
            .find(|entry| entry.serial_number() == serial)
    }

    pub fn is_revoked(&self, serial: &Integer) -> bool {
        self.revoked_certificate(serial).is_some()
    }

    /// Whether this list revokes the certificate.
    ///
    /// Both the serial number and the issuer must match.
    pub fn is_certificate_revoked(&self, cert: &X509Certificate) -> bool {
        cert.issuer_name() == self.issuer_name() && self.is_revoked(cert.serial_number())
    }

    /// The DER encoding of the to-be-signed portion of the list.
    pub fn tbs_cert_list_der(&self) -> Vec<u8> {
        self.inner.tbs_cert_list.encode_der()
    }

    pub fn signature(&self) -> Bytes {
        self.inner.signature.octet_bytes()
    }

    pub fn signature_algorithm_oid(&self) -> &Oid {
        &self.inner.signature_algorithm.algorithm
    }

    pub fn signature_algorithm_name(&self) -> String {
        signature_algorithm_name(&DefaultAliases, self.signature_algorithm_oid())
    }

    // List level extensions only exist in v2.
    fn extensions(&self) -> Option<&Extensions> {
        match self.inner.tbs_cert_list.version {
            Some(Version::V2) => self.inner.tbs_cert_list.crl_extensions.as_ref(),
            _ => None,
        }
    }

    pub fn critical_extension_oids(&self) -> Vec<Oid> {
        extensions::critical_oids(self.extensions())
    }

    pub fn non_critical_extension_oids(&self) -> Vec<Oid> {
        extensions::non_critical_oids(self.extensions())
    }

    pub fn has_unsupported_critical_extension(&self) -> bool {
        extensions::has_unsupported_critical(self.extensions())
    }

    pub fn extension_value(&self, oid: &Oid) -> Option<Vec<u8>> {
        extensions::extension_value(self.extensions(), oid)
    }

    /// The value of the CRL number extension.
    pub fn crl_number(&self) -> Result<Option<Integer>, Error> {
        extensions::crl_number(self.extensions())
    }

    /// Verify that this list was signed by the given key.
    pub fn verify(&self, key: &PublicKey) -> Result<(), Error> {
        self.verify_with_aliases(key, &DefaultAliases)
    }

    pub fn verify_with_aliases(
        &self,
        key: &PublicKey,
        aliases: &dyn AlgorithmAliases,
    ) -> Result<(), Error> {
        verify_signed_structure(
            &self.inner.signature_algorithm,
            &self.inner.tbs_cert_list.signature,
            &self.tbs_cert_list_der(),
            &self.signature(),
            key,
            aliases,
        )
    }
}

/// A single entry of an [X509Crl].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RevokedCertificate<'a> {
    entry: &'a rfc5280::RevokedCertificate,
}

impl<'a> RevokedCertificate<'a> {
    pub fn asn1(&self) -> &'a rfc5280::RevokedCertificate {
        self.entry
    }

    pub fn serial_number(&self) -> &'a Integer {
        &self.entry.user_certificate
    }

    pub fn revocation_date(&self) -> DateTime<Utc> {
        self.entry.revocation_date.to_datetime()
    }

    fn extensions(&self) -> Option<&'a Extensions> {
        self.entry.crl_entry_extensions.as_ref()
    }

    pub fn critical_extension_oids(&self) -> Vec<Oid> {
        extensions::critical_oids(self.extensions())
    }

    pub fn non_critical_extension_oids(&self) -> Vec<Oid> {
        extensions::non_critical_oids(self.extensions())
    }

    pub fn has_unsupported_critical_extension(&self) -> bool {
        extensions::has_unsupported_critical(self.extensions())
    }

    pub fn extension_value(&self, oid: &Oid) -> Option<Vec<u8>> {
        extensions::extension_value(self.extensions(), oid)
    }

    /// The reason code, if the entry carries one.
    pub fn reason(&self) -> Result<Option<CrlReason>, Error> {
        extensions::crl_reason(self.extensions())
    }
}

#[cfg(test)]
mod test {
    use {
        super::*,
        crate::{asn1int::integer_to_i64, testutil::*},
    };

    fn serial(der: &[u8]) -> Integer {
        Constructed::decode(der, Mode::Der, |cons| Integer::take_from(cons)).unwrap()
    }

    #[test]
    fn parse_root_crl() {
        let crl = root_crl();

        assert_eq!(crl.constructed_data(), ROOT_CRL_DER);
        assert_eq!(crl.encode_der(), ROOT_CRL_DER);
        assert_eq!(crl.version(), 2);
        assert_eq!(crl.issuer_principal(), root_cert().subject_principal());
        assert_eq!(crl.this_update(), utc(2024, 1, 1));
        assert_eq!(crl.next_update(), Some(utc(2024, 2, 1)));
        assert_eq!(crl.signature_algorithm_name(), "SHA256WITHRSA");

        assert!(crl.critical_extension_oids().is_empty());
        assert_eq!(crl.non_critical_extension_oids().len(), 1);
        assert!(!crl.has_unsupported_critical_extension());
        assert_eq!(
            crl.crl_number().unwrap().as_ref().and_then(integer_to_i64),
            Some(7)
        );
    }

    #[test]
    fn pem() {
        let crl = X509Crl::from_pem(ROOT_CRL_PEM).unwrap();
        assert_eq!(crl, root_crl());

        let pem = crl.encode_pem();
        assert!(pem.starts_with("-----BEGIN X509 CRL-----"));
        assert_eq!(X509Crl::from_pem(&pem).unwrap(), crl);

        let short = pem.replace("X509 CRL", "CRL");
        assert_eq!(X509Crl::from_pem(&short).unwrap(), crl);

        assert!(X509Crl::from_pem(ROOT_RSA_PEM).is_err());
    }

    #[test]
    fn entries() {
        let crl = root_crl();
        let entries = crl.revoked_certificates().collect::<Vec<_>>();
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].serial_number(), &serial(&[2, 2, 0x02, 0x00]));
        assert_eq!(entries[0].revocation_date(), utc(2023, 12, 1));
        assert_eq!(entries[0].reason().unwrap(), Some(CrlReason::KeyCompromise));
        assert_eq!(entries[0].non_critical_extension_oids().len(), 1);
        assert!(!entries[0].has_unsupported_critical_extension());

        assert_eq!(entries[1].serial_number(), &serial(&[2, 2, 0x40, 0x04]));
        assert_eq!(entries[1].revocation_date(), utc(2023, 12, 15));
        assert_eq!(entries[1].reason().unwrap(), None);
        assert!(entries[1].critical_extension_oids().is_empty());

        assert!(crl.is_revoked(&serial(&[2, 2, 0x40, 0x04])));
        assert!(!crl.is_revoked(&serial(&[2, 2, 0x10, 0x01])));
        assert_eq!(
            crl.revoked_certificate(&serial(&[2, 2, 0x02, 0x00])),
            Some(entries[0])
        );
    }

    #[test]
    fn certificate_revocation() {
        let crl = root_crl();

        assert!(crl.is_certificate_revoked(&intermediate_cert()));
        assert!(!crl.is_certificate_revoked(&root_cert()));
        assert!(!crl.is_certificate_revoked(&leaf_cert()));
    }

    #[test]
    fn verification() {
        let crl = root_crl();

        crl.verify(&root_cert().public_key().unwrap()).unwrap();
        assert!(matches!(
            crl.verify(&intermediate_cert().public_key().unwrap()),
            Err(Error::InvalidKeyType("RSA"))
        ));

        let mut asn1 = crl.asn1().clone();
        asn1.tbs_cert_list.next_update = None;
        let mut buffer = Vec::new();
        asn1.encode_ref()
            .write_encoded(Mode::Der, &mut buffer)
            .unwrap();
        let altered = X509Crl::from_der(&buffer).unwrap();
        assert!(altered.next_update().is_none());
        assert!(matches!(
            altered.verify(&root_cert().public_key().unwrap()),
            Err(Error::InvalidSignature)
        ));
    }
}
