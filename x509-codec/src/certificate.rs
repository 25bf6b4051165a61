// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Defines high-level interface to X.509 certificates.

use {
    crate::{
        algorithm::{
            signature_algorithm_name, AlgorithmAliases, DefaultAliases, DigestAlgorithm,
            KeyAlgorithm, SignatureAlgorithm,
        },
        asn1int::integer_to_hex,
        decoder::CERTIFICATE_PEM_TAGS,
        extensions,
        keys::PublicKey,
        rfc3280::{GeneralNames, Name},
        rfc5280::{
            AlgorithmIdentifier, AlgorithmParameter, Certificate, Extensions,
            SubjectPublicKeyInfo, UniqueIdentifier, Version, OID_ISSUER_ALT_NAME,
            OID_SUBJECT_ALT_NAME,
        },
        X509CodecError as Error,
    },
    bcder::{decode::Constructed, encode::Values, int::Integer, Mode, Oid},
    bytes::Bytes,
    chrono::{DateTime, Utc},
    log::debug,
    std::{
        convert::TryFrom,
        fmt::{Display, Formatter},
    },
};

/// The canonical DER encoding of an X.500 distinguished name.
///
/// Instances are obtained from a certificate or CRL. The bytes are produced
/// by re-encoding the parsed [Name] and are identical to the encoded form
/// it was parsed from: attribute order within each RDN is retained.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct X500Principal {
    name: Name,
    encoded: Vec<u8>,
}

impl X500Principal {
    /// Construct an instance from a parsed [Name].
    pub fn from_name(name: &Name) -> Self {
        Self {
            name: name.clone(),
            encoded: name.encode_der(),
        }
    }

    /// Construct an instance by parsing DER encoded `Name` data.
    pub fn from_der(data: impl AsRef<[u8]>) -> Result<Self, Error> {
        let name = Constructed::decode(data.as_ref(), Mode::Der, |cons| Name::take_from(cons))?;

        Ok(Self::from_name(&name))
    }

    /// The DER encoding of this name.
    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }

    /// The parsed name.
    pub fn name(&self) -> &Name {
        &self.name
    }
}

impl Display for X500Principal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name.rfc4514_string())
    }
}

impl AsRef<[u8]> for X500Principal {
    fn as_ref(&self) -> &[u8] {
        &self.encoded
    }
}

/// Verify the signature of a signed ASN.1 structure.
///
/// The outer and inner algorithm identifiers must agree. The algorithm is
/// resolved through the name `aliases` assigns to the outer OID.
pub(crate) fn verify_signed_structure(
    outer: &AlgorithmIdentifier,
    inner: &AlgorithmIdentifier,
    tbs_der: &[u8],
    signature: &[u8],
    key: &PublicKey,
    aliases: &dyn AlgorithmAliases,
) -> Result<(), Error> {
    let name = signature_algorithm_name(aliases, &outer.algorithm);
    debug!(
        "signature algorithm {} resolved to {}",
        outer.algorithm, name
    );

    if outer != inner {
        return Err(Error::SignatureAlgorithmMismatch);
    }

    let algorithm =
        SignatureAlgorithm::from_name(&name).ok_or(Error::UnrecognizedAlgorithm(name))?;

    key.verify_signature(algorithm, tbs_der, signature)
}

/// An immutable X.509 certificate that was parsed from data.
///
/// A copy of the certificate's raw backing data is stored, facilitating
/// subsequent access. All other accessors read from the parsed ASN.1
/// [Certificate].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct X509Certificate {
    original: Vec<u8>,
    inner: Certificate,
}

impl X509Certificate {
    /// Construct an instance by parsing DER encoded ASN.1 data.
    ///
    /// A copy of this data will be stored in the instance and can be
    /// retrieved later via [Self::constructed_data].
    pub fn from_der(data: impl AsRef<[u8]>) -> Result<Self, Error> {
        let original = data.as_ref().to_vec();
        let inner =
            Constructed::decode(original.as_slice(), Mode::Der, |cons| Certificate::take_from(cons))?;

        Ok(Self { original, inner })
    }

    /// Construct an instance by parsing BER encoded ASN.1 data.
    ///
    /// X.509 certificates are likely (and should be) using DER encoding.
    /// However, certificates embedded in BER containers may use BER too.
    pub fn from_ber(data: impl AsRef<[u8]>) -> Result<Self, Error> {
        let original = data.as_ref().to_vec();
        let inner =
            Constructed::decode(original.as_slice(), Mode::Ber, |cons| Certificate::take_from(cons))?;

        Ok(Self { original, inner })
    }

    /// Construct an instance by parsing PEM encoded ASN.1 data.
    ///
    /// The data is a human readable string containing
    /// `-----BEGIN CERTIFICATE-----` or `-----BEGIN X509 CERTIFICATE-----`.
    pub fn from_pem(data: impl AsRef<[u8]>) -> Result<Self, Error> {
        let data = pem::parse(data.as_ref())?;

        if !CERTIFICATE_PEM_TAGS.contains(&data.tag.as_str()) {
            return Err(Error::MalformedEncoding(format!(
                "unexpected PEM block {}",
                data.tag
            )));
        }

        Self::from_der(data.contents)
    }

    /// Construct instances by parsing PEM with potentially multiple records.
    ///
    /// Blocks having a tag other than those in [CERTIFICATE_PEM_TAGS] are
    /// ignored.
    pub fn from_pem_multiple(data: impl AsRef<[u8]>) -> Result<Vec<Self>, Error> {
        pem::parse_many(data.as_ref())?
            .into_iter()
            .filter(|pem| CERTIFICATE_PEM_TAGS.contains(&pem.tag.as_str()))
            .map(|pem| Self::from_der(pem.contents))
            .collect::<Result<_, _>>()
    }

    /// The parsed ASN.1 certificate.
    pub fn asn1(&self) -> &Certificate {
        &self.inner
    }

    /// The data that was used to construct this instance.
    pub fn constructed_data(&self) -> &[u8] {
        &self.original
    }

    /// Encode the certificate data structure using DER encoding.
    ///
    /// This always serializes the internal ASN.1 data structure.
    pub fn encode_der(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        // Writes to a Vec are infallible.
        let _ = self.inner.encode_ref().write_encoded(Mode::Der, &mut buffer);

        buffer
    }

    /// Encode the certificate to a PEM string.
    ///
    /// The underlying binary data is DER encoded.
    pub fn encode_pem(&self) -> String {
        pem::encode(&pem::Pem {
            tag: "CERTIFICATE".to_string(),
            contents: self.encode_der(),
        })
    }

    /// The SHA-256 digest of the DER encoding of this certificate.
    pub fn sha256_fingerprint(&self) -> Vec<u8> {
        DigestAlgorithm::Sha256.digest_data(&self.encode_der())
    }

    /// The certificate version: 1, 2 or 3.
    pub fn version(&self) -> u8 {
        self.inner
            .tbs_certificate
            .version
            .map(|v| v.number())
            .unwrap_or(1)
    }

    /// Obtain the serial number as the ASN.1 [Integer] type.
    pub fn serial_number(&self) -> &Integer {
        &self.inner.tbs_certificate.serial_number
    }

    /// Obtain the certificate's subject, as its ASN.1 [Name] type.
    pub fn subject_name(&self) -> &Name {
        &self.inner.tbs_certificate.subject
    }

    /// Obtain the certificate's issuer, as its ASN.1 [Name] type.
    pub fn issuer_name(&self) -> &Name {
        &self.inner.tbs_certificate.issuer
    }

    pub fn subject_principal(&self) -> X500Principal {
        X500Principal::from_name(self.subject_name())
    }

    pub fn issuer_principal(&self) -> X500Principal {
        X500Principal::from_name(self.issuer_name())
    }

    /// Start of the validity window.
    pub fn not_before(&self) -> DateTime<Utc> {
        self.inner.tbs_certificate.validity.not_before.to_datetime()
    }

    /// End of the validity window.
    pub fn not_after(&self) -> DateTime<Utc> {
        self.inner.tbs_certificate.validity.not_after.to_datetime()
    }

    /// Check that an instant falls within the validity window.
    ///
    /// Both ends of the window are inclusive.
    pub fn check_validity_at(&self, instant: DateTime<Utc>) -> Result<(), Error> {
        let not_before = self.not_before();
        let not_after = self.not_after();

        if instant > not_after {
            Err(Error::Expired { not_after })
        } else if instant < not_before {
            Err(Error::NotYetValid { not_before })
        } else {
            Ok(())
        }
    }

    /// Check that the current time falls within the validity window.
    pub fn check_validity(&self) -> Result<(), Error> {
        self.check_validity_at(Utc::now())
    }

    pub fn issuer_unique_id(&self) -> Option<&UniqueIdentifier> {
        self.inner.tbs_certificate.issuer_unique_id.as_ref()
    }

    pub fn subject_unique_id(&self) -> Option<&UniqueIdentifier> {
        self.inner.tbs_certificate.subject_unique_id.as_ref()
    }

    /// The DER encoding of the to-be-signed portion of the certificate.
    pub fn tbs_certificate_der(&self) -> Vec<u8> {
        self.inner.tbs_certificate.encode_der()
    }

    /// The signature bytes.
    pub fn signature(&self) -> Bytes {
        self.inner.signature.octet_bytes()
    }

    pub fn signature_algorithm_oid(&self) -> &Oid {
        &self.inner.signature_algorithm.algorithm
    }

    /// Encoded parameters of the signature algorithm, if present.
    pub fn signature_algorithm_parameters(&self) -> Option<&AlgorithmParameter> {
        self.inner.signature_algorithm.parameters.as_ref()
    }

    /// The name of the signature algorithm per [DefaultAliases].
    ///
    /// Unknown algorithms are named by their dotted OID.
    pub fn signature_algorithm_name(&self) -> String {
        signature_algorithm_name(&DefaultAliases, self.signature_algorithm_oid())
    }

    pub fn public_key_info(&self) -> &SubjectPublicKeyInfo {
        &self.inner.tbs_certificate.subject_public_key_info
    }

    /// Attempt to resolve a known [KeyAlgorithm] of this certificate's public key.
    ///
    /// If this crate isn't aware of the OID associated with the key algorithm,
    /// `None` is returned.
    pub fn key_algorithm(&self) -> Option<KeyAlgorithm> {
        KeyAlgorithm::try_from(&self.public_key_info().algorithm).ok()
    }

    /// Obtain the raw data constituting this certificate's public key.
    pub fn public_key_data(&self) -> Bytes {
        self.public_key_info().subject_public_key.octet_bytes()
    }

    /// Decode the public key.
    ///
    /// Only RSA and elliptic curve keys are accepted.
    pub fn public_key(&self) -> Result<PublicKey, Error> {
        let spki = self.public_key_info();

        match self.key_algorithm() {
            Some(KeyAlgorithm::Rsa | KeyAlgorithm::Ec) => PublicKey::from_spki(spki),
            _ => Err(Error::UnrecognizedAlgorithm(format!(
                "certificate key algorithm {}",
                spki.algorithm.algorithm
            ))),
        }
    }

    // Extensions only exist in v3.
    fn extensions(&self) -> Option<&Extensions> {
        match self.inner.tbs_certificate.version {
            Some(Version::V3) => self.inner.tbs_certificate.extensions.as_ref(),
            _ => None,
        }
    }

    pub fn critical_extension_oids(&self) -> Vec<Oid> {
        extensions::critical_oids(self.extensions())
    }

    pub fn non_critical_extension_oids(&self) -> Vec<Oid> {
        extensions::non_critical_oids(self.extensions())
    }

    /// Whether a critical extension other than basic constraints and key usage is present.
    pub fn has_unsupported_critical_extension(&self) -> bool {
        extensions::has_unsupported_critical(self.extensions())
    }

    /// The raw value of the extension having the given OID.
    pub fn extension_value(&self, oid: &Oid) -> Option<Vec<u8>> {
        extensions::extension_value(self.extensions(), oid)
    }

    /// The key usage bits, padded to at least 9 entries.
    pub fn key_usage(&self) -> Result<Option<Vec<bool>>, Error> {
        extensions::key_usage(self.extensions())
    }

    /// The certification path length permitted below this certificate.
    ///
    /// `-1` if this isn't a CA certificate and `i32::MAX` if the length is
    /// unconstrained.
    pub fn basic_constraints(&self) -> Result<i32, Error> {
        extensions::basic_constraints(self.extensions())
    }

    pub fn extended_key_usage(&self) -> Result<Option<Vec<Oid>>, Error> {
        extensions::extended_key_usage(self.extensions())
    }

    pub fn subject_alternative_names(&self) -> Result<Option<GeneralNames>, Error> {
        extensions::general_names(self.extensions(), &OID_SUBJECT_ALT_NAME)
    }

    pub fn issuer_alternative_names(&self) -> Result<Option<GeneralNames>, Error> {
        extensions::general_names(self.extensions(), &OID_ISSUER_ALT_NAME)
    }

    /// Verify that this certificate was signed by the given key.
    pub fn verify(&self, key: &PublicKey) -> Result<(), Error> {
        self.verify_with_aliases(key, &DefaultAliases)
    }

    /// Verify that this certificate was signed by the given key.
    ///
    /// The signature algorithm is identified by the name `aliases` assigns
    /// to its OID.
    pub fn verify_with_aliases(
        &self,
        key: &PublicKey,
        aliases: &dyn AlgorithmAliases,
    ) -> Result<(), Error> {
        verify_signed_structure(
            &self.inner.signature_algorithm,
            &self.inner.tbs_certificate.signature,
            &self.tbs_certificate_der(),
            &self.signature(),
            key,
            aliases,
        )
    }

    /// Verify that another certificate, `issuer`, signed this certificate.
    ///
    /// If this is a self-signed certificate, you can pass `self` as the
    /// argument.
    pub fn verify_signed_by_certificate(&self, issuer: &X509Certificate) -> Result<(), Error> {
        self.verify(&issuer.public_key()?)
    }
}

impl Display for X509Certificate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Version: {}", self.version())?;
        writeln!(f, "Serial: {}", integer_to_hex(self.serial_number()))?;
        writeln!(f, "Issuer: {}", self.issuer_principal())?;
        writeln!(f, "Subject: {}", self.subject_principal())?;
        writeln!(f, "Not Before: {}", self.not_before().to_rfc3339())?;
        writeln!(f, "Not After: {}", self.not_after().to_rfc3339())?;
        writeln!(
            f,
            "Key Algorithm: {}",
            self.key_algorithm()
                .map(|alg| alg.name().to_string())
                .unwrap_or_else(|| format!("{}", self.public_key_info().algorithm.algorithm))
        )?;
        write!(f, "Signature Algorithm: {}", self.signature_algorithm_name())
    }
}

impl AsRef<Certificate> for X509Certificate {
    fn as_ref(&self) -> &Certificate {
        &self.inner
    }
}

impl From<X509Certificate> for Certificate {
    fn from(cert: X509Certificate) -> Self {
        cert.inner
    }
}

impl TryFrom<&Certificate> for X509Certificate {
    type Error = Error;

    fn try_from(cert: &Certificate) -> Result<Self, Self::Error> {
        let mut buffer = Vec::<u8>::new();
        cert.encode_ref().write_encoded(Mode::Der, &mut buffer)?;

        Self::from_der(buffer)
    }
}

#[cfg(test)]
mod test {
    use {
        super::*,
        crate::{
            rfc3280::GeneralName,
            rfc5280::{OID_AUTHORITY_KEY_IDENTIFIER, OID_SUBJECT_KEY_IDENTIFIER},
            testutil::*,
        },
        chrono::Duration,
    };

    struct NoAliases;

    impl AlgorithmAliases for NoAliases {
        fn signature_algorithm_name(&self, _: &Oid) -> Option<String> {
            None
        }
    }

    struct ForeignAliases;

    impl AlgorithmAliases for ForeignAliases {
        fn signature_algorithm_name(&self, _: &Oid) -> Option<String> {
            Some("GOST3411WITHGOST3410".into())
        }
    }

    #[test]
    fn der_round_trip() {
        for data in [ROOT_RSA_DER, INTERMEDIATE_P256_DER, LEAF_P384_DER, V1_RSA_DER] {
            let cert = X509Certificate::from_der(data).unwrap();
            assert_eq!(cert.constructed_data(), data);
            assert_eq!(cert.encode_der(), data);
        }
    }

    #[test]
    fn pem_and_der_agree() {
        let from_pem = X509Certificate::from_pem(LEAF_P384_PEM).unwrap();
        assert_eq!(from_pem, leaf_cert());

        let pem = leaf_cert().encode_pem();
        assert!(pem.starts_with("-----BEGIN CERTIFICATE-----"));
        assert_eq!(X509Certificate::from_pem(&pem).unwrap(), leaf_cert());

        let aliased = pem.replace("BEGIN CERTIFICATE", "BEGIN X509 CERTIFICATE").replace(
            "END CERTIFICATE",
            "END X509 CERTIFICATE",
        );
        assert_eq!(X509Certificate::from_pem(&aliased).unwrap(), leaf_cert());

        let mut many = Vec::new();
        many.extend_from_slice(ROOT_RSA_PEM);
        many.extend_from_slice(ROOT_CRL_PEM);
        many.extend_from_slice(INTERMEDIATE_P256_PEM);
        let certs = X509Certificate::from_pem_multiple(&many).unwrap();
        assert_eq!(certs, vec![root_cert(), intermediate_cert()]);

        assert!(X509Certificate::from_pem(ROOT_CRL_PEM).is_err());
    }

    #[test]
    fn basic_fields() {
        let cert = leaf_cert();

        assert_eq!(cert.version(), 3);
        assert_eq!(integer_to_hex(cert.serial_number()), "10:01");
        assert_eq!(cert.not_before(), utc(2022, 6, 1));
        assert_eq!(cert.not_after(), utc(2032, 6, 1));
        assert_eq!(cert.signature_algorithm_name(), "SHA256WITHECDSA");
        assert!(cert.signature_algorithm_parameters().is_none());
        assert_eq!(cert.key_algorithm(), Some(KeyAlgorithm::Ec));
        assert!(cert.issuer_unique_id().is_none());
        assert_eq!(
            cert.subject_principal().to_string(),
            "CN=codec.example,O=x509-codec,C=US"
        );
        assert_eq!(cert.issuer_principal(), intermediate_cert().subject_principal());

        let root = root_cert();
        assert_eq!(root.signature_algorithm_name(), "SHA256WITHRSA");
        assert_eq!(root.sha256_fingerprint().len(), 32);

        let v1 = X509Certificate::from_der(V1_RSA_DER).unwrap();
        assert_eq!(v1.version(), 1);
        assert!(v1.critical_extension_oids().is_empty());
        assert!(v1.non_critical_extension_oids().is_empty());
        assert_eq!(v1.key_usage().unwrap(), None);
        assert_eq!(v1.basic_constraints().unwrap(), -1);

        let rendered = format!("{}", cert);
        assert!(rendered.contains("Subject: CN=codec.example"));
        assert!(rendered.contains("Serial: 10:01"));
    }

    #[test]
    fn principal_bytes_match_encoding() {
        let cert = intermediate_cert();
        let principal = cert.subject_principal();

        let tbs = cert.tbs_certificate_der();
        let encoded = principal.encoded();
        assert!(tbs.windows(encoded.len()).any(|w| w == encoded));

        assert_eq!(X500Principal::from_der(encoded).unwrap(), principal);
    }

    #[test]
    fn validity_boundaries() {
        let cert = intermediate_cert();
        let not_before = utc(2021, 1, 1);
        let not_after = utc(2035, 1, 1);

        cert.check_validity_at(not_before).unwrap();
        cert.check_validity_at(not_after).unwrap();
        cert.check_validity_at(utc(2030, 5, 5)).unwrap();

        assert!(matches!(
            cert.check_validity_at(not_after + Duration::nanoseconds(1)),
            Err(Error::Expired { not_after: t }) if t == not_after
        ));
        assert!(matches!(
            cert.check_validity_at(not_before - Duration::nanoseconds(1)),
            Err(Error::NotYetValid { not_before: t }) if t == not_before
        ));
    }

    #[test]
    fn extension_accessors() {
        let root = root_cert();
        assert_eq!(root.critical_extension_oids().len(), 2);
        assert_eq!(root.non_critical_extension_oids().len(), 1);
        assert!(!root.has_unsupported_critical_extension());
        assert_eq!(root.basic_constraints().unwrap(), i32::MAX);
        assert_eq!(
            root.key_usage().unwrap().unwrap(),
            vec![false, false, false, false, false, true, true, false, false]
        );

        assert_eq!(intermediate_cert().basic_constraints().unwrap(), 0);

        let leaf = leaf_cert();
        assert_eq!(leaf.basic_constraints().unwrap(), -1);
        assert_eq!(
            leaf.key_usage().unwrap().unwrap(),
            vec![true, false, true, false, false, false, false, false, false]
        );
        let names = leaf.subject_alternative_names().unwrap().unwrap();
        assert!(names.iter().all(|n| matches!(n, GeneralName::DnsName(_))));
        assert_eq!(
            names.iter().map(|n| n.to_string()).collect::<Vec<_>>(),
            vec!["DNS:codec.example", "DNS:www.codec.example"]
        );
        assert!(leaf.issuer_alternative_names().unwrap().is_none());

        // id-kp-serverAuth
        let server_auth = Oid(Bytes::from_static(&[43, 6, 1, 5, 5, 7, 3, 1]));
        assert_eq!(
            leaf.extended_key_usage().unwrap().unwrap(),
            vec![server_auth]
        );

        let san = Oid(Bytes::copy_from_slice(OID_SUBJECT_ALT_NAME.as_ref()));
        assert_eq!(leaf.extension_value(&san).unwrap()[0], 0x30);

        let ski = Oid(Bytes::copy_from_slice(OID_SUBJECT_KEY_IDENTIFIER.as_ref()));
        assert_eq!(root.extension_value(&ski).unwrap()[0], 0x04);
        assert!(leaf.extension_value(&ski).is_none());

        let explicit = X509Certificate::from_der(EXPLICIT_P256_DER).unwrap();
        let aki = Oid(Bytes::copy_from_slice(OID_AUTHORITY_KEY_IDENTIFIER.as_ref()));
        assert!(explicit.extension_value(&aki).is_some());
        assert_eq!(explicit.basic_constraints().unwrap(), i32::MAX);

        let odd = X509Certificate::from_der(CRITICAL_UNKNOWN_DER).unwrap();
        assert_eq!(X509Certificate::from_pem(CRITICAL_UNKNOWN_PEM).unwrap(), odd);
        assert!(odd.has_unsupported_critical_extension());
        assert_eq!(odd.critical_extension_oids().len(), 2);
    }

    #[test]
    fn extensions_require_v3() {
        let v3 = X509Certificate::from_der(CRITICAL_UNKNOWN_DER).unwrap();
        assert_eq!(v3.version(), 3);

        let mut asn1 = v3.asn1().clone();
        asn1.tbs_certificate.version = Some(Version::V2);
        let v2 = X509Certificate::try_from(&asn1).unwrap();

        assert_eq!(v2.version(), 2);
        assert!(v2.asn1().tbs_certificate.extensions.is_some());
        assert!(v2.critical_extension_oids().is_empty());
        assert!(v2.non_critical_extension_oids().is_empty());
        assert!(!v2.has_unsupported_critical_extension());
        assert_eq!(v2.basic_constraints().unwrap(), -1);
        assert!(v2.key_usage().unwrap().is_none());

        let v1 = X509Certificate::from_der(V1_RSA_DER).unwrap();
        assert_eq!(v1.version(), 1);
        assert!(v1.critical_extension_oids().is_empty());
        assert!(v1.non_critical_extension_oids().is_empty());
    }

    #[test]
    fn public_keys() {
        assert!(matches!(root_cert().public_key().unwrap(), PublicKey::Rsa(_)));
        assert!(matches!(leaf_cert().public_key().unwrap(), PublicKey::Ec(_)));
        assert!(matches!(
            X509Certificate::from_der(EXPLICIT_P256_DER)
                .unwrap()
                .public_key()
                .unwrap(),
            PublicKey::Ec(_)
        ));
    }

    #[test]
    fn signature_verification() {
        let root = root_cert();
        let intermediate = intermediate_cert();
        let leaf = leaf_cert();

        root.verify_signed_by_certificate(&root).unwrap();
        intermediate.verify_signed_by_certificate(&root).unwrap();
        leaf.verify_signed_by_certificate(&intermediate).unwrap();

        // Explicit curve parameters matching P-256 are verifiable.
        let explicit = X509Certificate::from_der(EXPLICIT_P256_DER).unwrap();
        explicit.verify_signed_by_certificate(&explicit).unwrap();

        // Wrong key type.
        assert!(matches!(
            leaf.verify(&root.public_key().unwrap()),
            Err(Error::InvalidKeyType("EC"))
        ));

        // Right key type, wrong key.
        assert!(matches!(
            leaf.verify(&X509Certificate::from_pem(CRITICAL_UNKNOWN_PEM).unwrap().public_key().unwrap()),
            Err(Error::InvalidSignature)
        ));

        // Without an alias the dotted OID still resolves.
        intermediate
            .verify_with_aliases(&root.public_key().unwrap(), &NoAliases)
            .unwrap();

        assert!(matches!(
            intermediate.verify_with_aliases(&root.public_key().unwrap(), &ForeignAliases),
            Err(Error::UnrecognizedAlgorithm(name)) if name == "GOST3411WITHGOST3410"
        ));
    }

    #[test]
    fn short_rsa_keys() {
        let sha256 = X509Certificate::from_der(RSA1024_SHA256_DER).unwrap();
        let sha384 = X509Certificate::from_der(RSA1024_SHA384_DER).unwrap();

        match sha256.public_key().unwrap() {
            PublicKey::Rsa(key) => assert_eq!(key.modulus.bit_length(), 1024),
            key => panic!("unexpected key {:?}", key),
        }

        sha256.verify_signed_by_certificate(&sha256).unwrap();
        assert!(matches!(
            sha384.verify_signed_by_certificate(&sha384),
            Err(Error::UnrecognizedAlgorithm(_))
        ));

        let mut asn1 = sha256.asn1().clone();
        let mut signature = asn1.signature.octet_bytes().to_vec();
        signature[0] ^= 0x01;
        asn1.signature = bcder::BitString::new(0, Bytes::from(signature));
        assert!(matches!(
            X509Certificate::try_from(&asn1)
                .unwrap()
                .verify_signed_by_certificate(&sha256),
            Err(Error::InvalidSignature)
        ));
    }

    #[test]
    fn tampered_signature() {
        let root = root_cert();

        let mut asn1 = intermediate_cert().asn1().clone();
        let mut signature = asn1.signature.octet_bytes().to_vec();
        let last = signature.len() - 1;
        signature[last] ^= 0x01;
        asn1.signature = bcder::BitString::new(0, Bytes::from(signature));

        let tampered = X509Certificate::try_from(&asn1).unwrap();
        assert!(matches!(
            tampered.verify(&root.public_key().unwrap()),
            Err(Error::InvalidSignature)
        ));
    }

    #[test]
    fn algorithm_mismatch() {
        let root = root_cert();

        let mut asn1 = intermediate_cert().asn1().clone();
        asn1.signature_algorithm = AlgorithmIdentifier::with_null_parameter(Oid::from(
            SignatureAlgorithm::Sha384Rsa,
        ));

        let mismatched = X509Certificate::try_from(&asn1).unwrap();
        assert!(matches!(
            mismatched.verify(&root.public_key().unwrap()),
            Err(Error::SignatureAlgorithmMismatch)
        ));
    }
}
