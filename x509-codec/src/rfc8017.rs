// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ASN.1 primitives defined by RFC 8017.

use {
    crate::asn1int::UnsignedInteger,
    bcder::{
        decode::{Constructed, DecodeError, Source},
        encode::{self, PrimitiveContent, Values},
        Mode,
    },
};

/// RSA Public Key.
///
/// ```ASN.1
/// RSAPublicKey ::= SEQUENCE {
///   modulus           INTEGER,  -- n
///   publicExponent    INTEGER   -- e
/// }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RsaPublicKey {
    pub modulus: UnsignedInteger,
    pub public_exponent: UnsignedInteger,
}

impl RsaPublicKey {
    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            let modulus = UnsignedInteger::take_from(cons)?;
            let public_exponent = UnsignedInteger::take_from(cons)?;

            Ok(Self {
                modulus,
                public_exponent,
            })
        })
    }

    pub fn encode_ref(&self) -> impl Values + '_ {
        encode::sequence((
            self.modulus.encode_ref(),
            self.public_exponent.encode_ref(),
        ))
    }
}

impl RsaPublicKey {
    /// Encode this key to DER.
    ///
    /// This is the form signature engines expect RSA public keys in.
    pub fn encode_der(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        // Writes to a Vec are infallible.
        let _ = self.encode_ref().write_encoded(Mode::Der, &mut buffer);

        buffer
    }
}

#[cfg(test)]
mod test {
    use {super::*, crate::rfc5280::Certificate, crate::testutil::*};

    #[test]
    fn decode_certificate_key() {
        let cert = Constructed::decode(ROOT_RSA_DER, Mode::Der, Certificate::take_from).unwrap();
        let key_data = cert
            .tbs_certificate
            .subject_public_key_info
            .subject_public_key
            .octet_bytes();

        let key =
            Constructed::decode(key_data.as_ref(), Mode::Der, RsaPublicKey::take_from).unwrap();
        assert_eq!(key.modulus.bit_length(), 2048);
        assert_eq!(key.public_exponent.to_u64(), Some(65537));
        assert_eq!(key.encode_der(), key_data.as_ref());
    }
}
