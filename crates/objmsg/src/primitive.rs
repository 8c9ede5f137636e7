// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Primitive codec table.
//!
//! A closed set of scalar and simple composite values with a dedicated,
//! self-describing encoding: one type tag byte followed by the value.
//!
//! | Variant    | Tag | Body                              |
//! |------------|-----|-----------------------------------|
//! | `Bool`     | 10  | 1 byte (0/1)                      |
//! | `U8`       | 11  | 1 byte                            |
//! | `Char`     | 12  | `u32` scalar value                |
//! | `F64`      | 13  | 8 bytes                           |
//! | `F32`      | 14  | 4 bytes                           |
//! | `I32`      | 15  | 4 bytes                           |
//! | `I64`      | 16  | 8 bytes                           |
//! | `I16`      | 17  | 2 bytes                           |
//! | `String`   | 18  | `u32` length + UTF-8 bytes        |
//! | `Bytes`    | 19  | `u32` length + raw bytes          |
//! | `I8`       | 20  | 1 byte                            |
//! | `U16`      | 21  | 2 bytes                           |
//! | `U32`      | 22  | 4 bytes                           |
//! | `U64`      | 23  | 8 bytes                           |
//! | `Duration` | 24  | `u64` seconds + `u32` nanoseconds |
//!
//! Multi-byte values are big-endian.

use crate::config::{
    LENGTH_PREFIX_SIZE, TAG_BOOL, TAG_BYTES, TAG_CHAR, TAG_DURATION, TAG_F32, TAG_F64, TAG_I16,
    TAG_I32, TAG_I64, TAG_I8, TAG_SIZE, TAG_STRING, TAG_U16, TAG_U32, TAG_U64, TAG_U8,
};
use crate::error::{PayloadError, PayloadResult};
use crate::ser::{Cursor, CursorMut};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

const NANOS_PER_SEC: u32 = 1_000_000_000;

/// A value handled by the primitive codec table.
///
/// Strings and byte buffers are reference counted so that copying a payload
/// for fan-out never duplicates their content.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Bool(bool),
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    Char(char),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
    String(Arc<str>),
    Bytes(Arc<[u8]>),
    Duration(Duration),
}

impl Primitive {
    /// Type tag written ahead of the value.
    pub fn tag(&self) -> u8 {
        match self {
            Self::Bool(_) => TAG_BOOL,
            Self::U8(_) => TAG_U8,
            Self::I8(_) => TAG_I8,
            Self::U16(_) => TAG_U16,
            Self::I16(_) => TAG_I16,
            Self::Char(_) => TAG_CHAR,
            Self::U32(_) => TAG_U32,
            Self::I32(_) => TAG_I32,
            Self::U64(_) => TAG_U64,
            Self::I64(_) => TAG_I64,
            Self::F32(_) => TAG_F32,
            Self::F64(_) => TAG_F64,
            Self::String(_) => TAG_STRING,
            Self::Bytes(_) => TAG_BYTES,
            Self::Duration(_) => TAG_DURATION,
        }
    }

    /// Human readable name of the variant, used in logs and errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::U8(_) => "u8",
            Self::I8(_) => "i8",
            Self::U16(_) => "u16",
            Self::I16(_) => "i16",
            Self::Char(_) => "char",
            Self::U32(_) => "u32",
            Self::I32(_) => "i32",
            Self::U64(_) => "u64",
            Self::I64(_) => "i64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Duration(_) => "duration",
        }
    }

    /// Exact number of bytes written by [`Primitive::write_to`], tag included.
    pub fn serialized_size(&self) -> usize {
        let body = match self {
            Self::Bool(_) | Self::U8(_) | Self::I8(_) => 1,
            Self::U16(_) | Self::I16(_) => 2,
            Self::Char(_) | Self::U32(_) | Self::I32(_) | Self::F32(_) => 4,
            Self::U64(_) | Self::I64(_) | Self::F64(_) => 8,
            Self::String(s) => LENGTH_PREFIX_SIZE + s.len(),
            Self::Bytes(b) => LENGTH_PREFIX_SIZE + b.len(),
            Self::Duration(_) => 8 + 4,
        };
        TAG_SIZE + body
    }

    /// Write the type tag followed by the value.
    pub fn write_to(&self, out: &mut CursorMut<'_>) -> PayloadResult<()> {
        out.write_u8(self.tag())?;
        match self {
            Self::Bool(v) => out.write_bool(*v),
            Self::U8(v) => out.write_u8(*v),
            Self::I8(v) => out.write_i8(*v),
            Self::U16(v) => out.write_u16(*v),
            Self::I16(v) => out.write_i16(*v),
            Self::Char(v) => out.write_u32(u32::from(*v)),
            Self::U32(v) => out.write_u32(*v),
            Self::I32(v) => out.write_i32(*v),
            Self::U64(v) => out.write_u64(*v),
            Self::I64(v) => out.write_i64(*v),
            Self::F32(v) => out.write_f32(*v),
            Self::F64(v) => out.write_f64(*v),
            Self::String(s) => out.write_len_prefixed(s.as_bytes()),
            Self::Bytes(b) => out.write_len_prefixed(b),
            Self::Duration(d) => {
                out.write_u64(d.as_secs())?;
                out.write_u32(d.subsec_nanos())
            }
        }
    }

    /// Read a type tag and the value it announces.
    pub fn read_from(input: &mut Cursor<'_>) -> PayloadResult<Self> {
        let tag = input.read_u8()?;
        let value = match tag {
            TAG_BOOL => Self::Bool(input.read_bool()?),
            TAG_U8 => Self::U8(input.read_u8()?),
            TAG_I8 => Self::I8(input.read_i8()?),
            TAG_U16 => Self::U16(input.read_u16()?),
            TAG_I16 => Self::I16(input.read_i16()?),
            TAG_CHAR => {
                let scalar = input.read_u32()?;
                let c = char::from_u32(scalar).ok_or_else(|| PayloadError::InvalidData {
                    reason: format!("invalid char scalar {:#X}", scalar),
                })?;
                Self::Char(c)
            }
            TAG_U32 => Self::U32(input.read_u32()?),
            TAG_I32 => Self::I32(input.read_i32()?),
            TAG_U64 => Self::U64(input.read_u64()?),
            TAG_I64 => Self::I64(input.read_i64()?),
            TAG_F32 => Self::F32(input.read_f32()?),
            TAG_F64 => Self::F64(input.read_f64()?),
            TAG_STRING => {
                let raw = input.read_len_prefixed()?;
                let s = std::str::from_utf8(raw).map_err(|e| PayloadError::InvalidData {
                    reason: format!("string is not valid UTF-8: {}", e),
                })?;
                Self::String(Arc::from(s))
            }
            TAG_BYTES => Self::Bytes(Arc::from(input.read_len_prefixed()?)),
            TAG_DURATION => {
                let secs = input.read_u64()?;
                let nanos = input.read_u32()?;
                if nanos >= NANOS_PER_SEC {
                    return Err(PayloadError::InvalidData {
                        reason: format!("duration nanoseconds out of range: {}", nanos),
                    });
                }
                Self::Duration(Duration::new(secs, nanos))
            }
            other => return Err(PayloadError::UnknownPrimitiveTag(other)),
        };
        Ok(value)
    }

    /// Get as string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Get as byte slice.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }
}

/// Generate `as_*` accessors and `From` conversions for `Copy` variants.
macro_rules! impl_scalar {
    ($($variant:ident => $type:ty, $getter:ident;)*) => {
        impl Primitive {
            $(
                /// Try to get the value if the variant matches exactly.
                pub fn $getter(&self) -> Option<$type> {
                    match self {
                        Self::$variant(v) => Some(*v),
                        _ => None,
                    }
                }
            )*
        }

        $(
            impl From<$type> for Primitive {
                fn from(v: $type) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_scalar! {
    Bool => bool, as_bool;
    U8 => u8, as_u8;
    I8 => i8, as_i8;
    U16 => u16, as_u16;
    I16 => i16, as_i16;
    Char => char, as_char;
    U32 => u32, as_u32;
    I32 => i32, as_i32;
    U64 => u64, as_u64;
    I64 => i64, as_i64;
    F32 => f32, as_f32;
    F64 => f64, as_f64;
    Duration => Duration, as_duration;
}

impl From<&str> for Primitive {
    fn from(v: &str) -> Self {
        Self::String(Arc::from(v))
    }
}

impl From<String> for Primitive {
    fn from(v: String) -> Self {
        Self::String(Arc::from(v))
    }
}

impl From<Arc<str>> for Primitive {
    fn from(v: Arc<str>) -> Self {
        Self::String(v)
    }
}

impl From<&[u8]> for Primitive {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(Arc::from(v))
    }
}

impl From<Vec<u8>> for Primitive {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(Arc::from(v))
    }
}

impl From<Arc<[u8]>> for Primitive {
    fn from(v: Arc<[u8]>) -> Self {
        Self::Bytes(v)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{}", v),
            Self::U8(v) => write!(f, "{}", v),
            Self::I8(v) => write!(f, "{}", v),
            Self::U16(v) => write!(f, "{}", v),
            Self::I16(v) => write!(f, "{}", v),
            Self::Char(v) => write!(f, "{:?}", v),
            Self::U32(v) => write!(f, "{}", v),
            Self::I32(v) => write!(f, "{}", v),
            Self::U64(v) => write!(f, "{}", v),
            Self::I64(v) => write!(f, "{}", v),
            Self::F32(v) => write!(f, "{}", v),
            Self::F64(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "{:?}", v),
            Self::Bytes(v) => write!(f, "{} bytes", v.len()),
            Self::Duration(v) => write!(f, "{:?}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodecLimits;

    fn encode(value: &Primitive) -> Vec<u8> {
        let mut buf = vec![0u8; value.serialized_size()];
        let mut out = CursorMut::new(&mut buf);
        value.write_to(&mut out).expect("encode primitive");
        assert_eq!(out.offset(), buf.len(), "{} size mismatch", value.type_name());
        buf
    }

    fn decode(bytes: &[u8]) -> Primitive {
        let mut input = Cursor::new(bytes);
        let value = Primitive::read_from(&mut input).expect("decode primitive");
        assert!(input.is_eof(), "decoder left trailing bytes");
        value
    }

    #[test]
    fn test_i32_layout() {
        let bytes = encode(&Primitive::from(42i32));
        assert_eq!(bytes, vec![TAG_I32, 0, 0, 0, 42]);
    }

    #[test]
    fn test_string_layout() {
        let bytes = encode(&Primitive::from("hello"));
        assert_eq!(bytes[0], TAG_STRING);
        assert_eq!(&bytes[1..5], &[0, 0, 0, 5]);
        assert_eq!(&bytes[5..], b"hello");
    }

    #[test]
    fn test_every_variant_roundtrips_with_exact_size() {
        let values = [
            Primitive::Bool(true),
            Primitive::U8(0xFE),
            Primitive::I8(-7),
            Primitive::U16(0xBEEF),
            Primitive::I16(-12_345),
            Primitive::Char('é'),
            Primitive::U32(u32::MAX),
            Primitive::I32(i32::MIN),
            Primitive::U64(u64::MAX - 1),
            Primitive::I64(-1),
            Primitive::F32(-0.25),
            Primitive::F64(std::f64::consts::E),
            Primitive::from(""),
            Primitive::from("grüße"),
            Primitive::from(vec![0u8, 1, 2, 255]),
            Primitive::from(Vec::<u8>::new()),
            Primitive::Duration(Duration::new(3, 999_999_999)),
        ];
        for value in values {
            assert_eq!(decode(&encode(&value)), value);
        }
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let mut input = Cursor::new(&[99u8, 0, 0]);
        assert!(matches!(
            Primitive::read_from(&mut input),
            Err(PayloadError::UnknownPrimitiveTag(99))
        ));
    }

    #[test]
    fn test_null_tag_is_not_a_primitive() {
        let mut input = Cursor::new(&[crate::config::TAG_NULL]);
        assert!(matches!(
            Primitive::read_from(&mut input),
            Err(PayloadError::UnknownPrimitiveTag(0))
        ));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let bytes = [TAG_STRING, 0, 0, 0, 2, 0xC3, 0x28];
        let mut input = Cursor::new(&bytes);
        assert!(matches!(
            Primitive::read_from(&mut input),
            Err(PayloadError::InvalidData { .. })
        ));
    }

    #[test]
    fn test_invalid_char_rejected() {
        let bytes = [TAG_CHAR, 0x00, 0x00, 0xD8, 0x00];
        let mut input = Cursor::new(&bytes);
        assert!(matches!(
            Primitive::read_from(&mut input),
            Err(PayloadError::InvalidData { .. })
        ));
    }

    #[test]
    fn test_duration_nanos_out_of_range() {
        let mut buf = vec![TAG_DURATION];
        buf.extend_from_slice(&1u64.to_be_bytes());
        buf.extend_from_slice(&NANOS_PER_SEC.to_be_bytes());
        let mut input = Cursor::new(&buf);
        assert!(matches!(
            Primitive::read_from(&mut input),
            Err(PayloadError::InvalidData { .. })
        ));
    }

    #[test]
    fn test_truncated_value() {
        let mut input = Cursor::new(&[TAG_I64, 0, 0, 0]);
        assert!(matches!(
            Primitive::read_from(&mut input),
            Err(PayloadError::ReadFailed { offset: 1, .. })
        ));
    }

    #[test]
    fn test_string_limit_enforced_on_read() {
        let bytes = encode(&Primitive::from("hello"));
        let mut input = Cursor::with_limits(&bytes, CodecLimits::new(4));
        assert!(Primitive::read_from(&mut input).is_err());
    }

    #[test]
    fn test_accessors() {
        let v = Primitive::from(42u32);
        assert_eq!(v.as_u32(), Some(42));
        assert_eq!(v.as_i32(), None);

        let v = Primitive::from("hello");
        assert_eq!(v.as_str(), Some("hello"));
        assert_eq!(v.as_bytes(), None);

        let v = Primitive::from(Duration::from_millis(1500));
        assert_eq!(v.as_duration(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_clone_shares_string_storage() {
        let v = Primitive::from("shared");
        let copy = v.clone();
        match (&v, &copy) {
            (Primitive::String(a), Primitive::String(b)) => assert!(Arc::ptr_eq(a, b)),
            _ => panic!("expected strings"),
        }
    }
}
