// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Directory attribute types defined in RFC 4519.
//!
//! Principal rendering (see [crate::X500Principal]) uses the short names
//! registered here, following the RFC 4514 string representation.

use bcder::{ConstOid, Oid};

/// Common Name (CN)
///
/// 2.5.4.3
pub const OID_COMMON_NAME: ConstOid = Oid(&[85, 4, 3]);

/// Surname (SN)
///
/// 2.5.4.4
pub const OID_SURNAME: ConstOid = Oid(&[85, 4, 4]);

/// Serial Number
///
/// 2.5.4.5
pub const OID_SERIAL_NUMBER: ConstOid = Oid(&[85, 4, 5]);

/// Country Name (C)
///
/// 2.5.4.6
pub const OID_COUNTRY_NAME: ConstOid = Oid(&[85, 4, 6]);

/// Locality Name (L)
///
/// 2.5.4.7
pub const OID_LOCALITY_NAME: ConstOid = Oid(&[85, 4, 7]);

/// State or Province Name (ST)
///
/// 2.5.4.8
pub const OID_STATE_PROVINCE_NAME: ConstOid = Oid(&[85, 4, 8]);

/// Street Address (STREET)
///
/// 2.5.4.9
pub const OID_STREET_ADDRESS: ConstOid = Oid(&[85, 4, 9]);

/// Organization Name (O)
///
/// 2.5.4.10
pub const OID_ORGANIZATION_NAME: ConstOid = Oid(&[85, 4, 10]);

/// Organizational Unit Name (OU)
///
/// 2.5.4.11
pub const OID_ORGANIZATIONAL_UNIT_NAME: ConstOid = Oid(&[85, 4, 11]);

/// Title
///
/// 2.5.4.12
pub const OID_TITLE: ConstOid = Oid(&[85, 4, 12]);

/// Given Name
///
/// 2.5.4.42
pub const OID_GIVEN_NAME: ConstOid = Oid(&[85, 4, 42]);

/// Domain Component (DC)
///
/// 0.9.2342.19200300.100.1.25
pub const OID_DOMAIN_COMPONENT: ConstOid = Oid(&[9, 146, 38, 137, 147, 242, 44, 100, 1, 25]);

/// User ID (UID)
///
/// 0.9.2342.19200300.100.1.1
pub const OID_USER_ID: ConstOid = Oid(&[9, 146, 38, 137, 147, 242, 44, 100, 1, 1]);

/// Email address, from PKCS #9.
///
/// 1.2.840.113549.1.9.1
pub const OID_EMAIL_ADDRESS: ConstOid = Oid(&[42, 134, 72, 134, 247, 13, 1, 9, 1]);

const SHORT_NAMES: &[(ConstOid, &str)] = &[
    (OID_COMMON_NAME, "CN"),
    (OID_SURNAME, "SN"),
    (OID_SERIAL_NUMBER, "SERIALNUMBER"),
    (OID_COUNTRY_NAME, "C"),
    (OID_LOCALITY_NAME, "L"),
    (OID_STATE_PROVINCE_NAME, "ST"),
    (OID_STREET_ADDRESS, "STREET"),
    (OID_ORGANIZATION_NAME, "O"),
    (OID_ORGANIZATIONAL_UNIT_NAME, "OU"),
    (OID_TITLE, "T"),
    (OID_GIVEN_NAME, "GIVENNAME"),
    (OID_DOMAIN_COMPONENT, "DC"),
    (OID_USER_ID, "UID"),
    (OID_EMAIL_ADDRESS, "EMAILADDRESS"),
];

/// Resolve the conventional short name of a directory attribute type.
pub fn attribute_short_name(oid: &Oid) -> Option<&'static str> {
    SHORT_NAMES
        .iter()
        .find(|(candidate, _)| oid == candidate)
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn short_names() {
        let cn = Oid(bytes::Bytes::copy_from_slice(OID_COMMON_NAME.as_ref()));
        assert_eq!(attribute_short_name(&cn), Some("CN"));

        let dc = Oid(bytes::Bytes::copy_from_slice(OID_DOMAIN_COMPONENT.as_ref()));
        assert_eq!(attribute_short_name(&dc), Some("DC"));

        let unknown = Oid(bytes::Bytes::from_static(&[85, 4, 99]));
        assert_eq!(attribute_short_name(&unknown), None);
    }
}
