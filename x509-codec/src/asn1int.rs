// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ASN.1 primitives related to integer types.
//!
//! Key material uses arbitrarily large non-negative INTEGER values. bcder's
//! [Integer] type is signed and preserves the exact content octets, which is
//! what certificate serial numbers need. [UnsignedInteger] is the counterpart
//! used for key components: it stores the magnitude only and re-adds the
//! leading zero octet when encoding.

use {
    bcder::{
        decode::{Constructed, DecodeError, Primitive, Source},
        encode::PrimitiveContent,
        Integer, Mode, Tag,
    },
    bytes::Bytes,
    std::{
        fmt::{Debug, Formatter},
        io::Write,
    },
};

/// A non-negative arbitrary precision integer.
///
/// The stored bytes are the big-endian magnitude without redundant leading
/// zeros. Zero is represented by an empty buffer.
#[derive(Clone, Default, Eq, Hash, PartialEq)]
pub struct UnsignedInteger(Bytes);

impl Debug for UnsignedInteger {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("0x{}", hex::encode(&self.0)))
    }
}

impl UnsignedInteger {
    /// Construct an instance from big-endian magnitude bytes.
    ///
    /// Leading zero octets are stripped.
    pub fn from_be_bytes(data: impl AsRef<[u8]>) -> Self {
        let data = data.as_ref();
        let start = data.iter().position(|b| *b != 0).unwrap_or(data.len());

        Self(Bytes::copy_from_slice(&data[start..]))
    }

    pub fn take_from<S: Source>(cons: &mut Constructed<S>) -> Result<Self, DecodeError<S::Error>> {
        cons.take_primitive_if(Tag::INTEGER, Self::from_primitive)
    }

    pub fn take_opt_from<S: Source>(
        cons: &mut Constructed<S>,
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        cons.take_opt_primitive_if(Tag::INTEGER, Self::from_primitive)
    }

    pub fn from_primitive<S: Source>(
        prim: &mut Primitive<S>,
    ) -> Result<Self, DecodeError<S::Error>> {
        let data = prim.take_all()?;

        if data.is_empty() {
            return Err(prim.content_err("empty INTEGER"));
        }
        if data[0] & 0x80 != 0 {
            return Err(prim.content_err("negative INTEGER where unsigned value expected"));
        }

        Ok(Self::from_be_bytes(&data))
    }

    /// The big-endian magnitude bytes.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// The big-endian magnitude, left padded with zeros to `len` bytes.
    ///
    /// If the value needs more than `len` bytes, the unpadded magnitude is
    /// returned.
    pub fn to_be_bytes_padded(&self, len: usize) -> Vec<u8> {
        let mut res = vec![0u8; len.saturating_sub(self.0.len())];
        res.extend_from_slice(&self.0);
        res
    }

    /// Whether this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of significant bits in this value.
    pub fn bit_length(&self) -> usize {
        match self.0.first() {
            Some(first) => (self.0.len() - 1) * 8 + (8 - first.leading_zeros() as usize),
            None => 0,
        }
    }

    /// Attempt to convert the value into a `u64`.
    pub fn to_u64(&self) -> Option<u64> {
        if self.0.len() > 8 {
            None
        } else {
            Some(self.0.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64))
        }
    }

    fn needs_pad(&self) -> bool {
        matches!(self.0.first(), Some(b) if b & 0x80 != 0)
    }
}

impl From<u64> for UnsignedInteger {
    fn from(v: u64) -> Self {
        Self::from_be_bytes(v.to_be_bytes())
    }
}

impl PrimitiveContent for UnsignedInteger {
    const TAG: Tag = Tag::INTEGER;

    fn encoded_len(&self, _: Mode) -> usize {
        if self.0.is_empty() {
            1
        } else if self.needs_pad() {
            self.0.len() + 1
        } else {
            self.0.len()
        }
    }

    fn write_encoded<W: Write>(&self, _: Mode, target: &mut W) -> Result<(), std::io::Error> {
        if self.0.is_empty() || self.needs_pad() {
            target.write_all(&[0])?;
        }

        target.write_all(&self.0)
    }
}

/// Convert an ASN.1 [Integer] into an `i64`, if it fits.
pub fn integer_to_i64(value: &Integer) -> Option<i64> {
    let data = value.as_slice();

    if data.is_empty() || data.len() > 8 {
        return None;
    }

    let initial = if data[0] & 0x80 != 0 { -1i64 } else { 0i64 };

    Some(data.iter().fold(initial, |acc, b| (acc << 8) | *b as i64))
}

/// Render an ASN.1 [Integer] as colon delimited hex, the way serial numbers are usually shown.
pub fn integer_to_hex(value: &Integer) -> String {
    value
        .as_slice()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
mod test {
    use {super::*, bcder::encode::Values};

    fn der(value: &UnsignedInteger) -> Vec<u8> {
        let mut buffer = Vec::new();
        value
            .encode_ref()
            .write_encoded(Mode::Der, &mut buffer)
            .unwrap();
        buffer
    }

    #[test]
    fn unsigned_encoding() {
        assert_eq!(der(&UnsignedInteger::from(0)), vec![0x02, 0x01, 0x00]);
        assert_eq!(der(&UnsignedInteger::from(0x7f)), vec![0x02, 0x01, 0x7f]);
        assert_eq!(der(&UnsignedInteger::from(0x80)), vec![0x02, 0x02, 0x00, 0x80]);
        assert_eq!(
            der(&UnsignedInteger::from(65537)),
            vec![0x02, 0x03, 0x01, 0x00, 0x01]
        );
    }

    #[test]
    fn unsigned_decoding() {
        let value = Constructed::decode(&[0x02, 0x03, 0x00, 0xff, 0x01][..], Mode::Der, |cons| {
            UnsignedInteger::take_from(cons)
        })
        .unwrap();
        assert_eq!(value.as_slice(), &[0xff, 0x01]);
        assert_eq!(value.bit_length(), 16);
        assert_eq!(value.to_u64(), Some(0xff01));
        assert_eq!(value.to_be_bytes_padded(4), vec![0, 0, 0xff, 0x01]);

        assert!(Constructed::decode(&[0x02, 0x01, 0x80][..], Mode::Der, |cons| {
            UnsignedInteger::take_from(cons)
        })
        .is_err());
    }

    #[test]
    fn signed_conversion() {
        assert_eq!(integer_to_i64(&Integer::from(0)), Some(0));
        assert_eq!(integer_to_i64(&Integer::from(0x4004)), Some(0x4004));
        assert_eq!(integer_to_i64(&Integer::from(-2)), Some(-2));
        assert_eq!(integer_to_hex(&Integer::from(0x0200)), "02:00");
    }
}
