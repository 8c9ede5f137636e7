// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error type shared by the cursors, the codecs and the payload entity.
//!
//! Variants fall in three families:
//! - malformed input (decode side): the bytes cannot be turned back into a payload
//! - API misuse (caller side): the operation is not supported or not set up
//! - contract violation: a capability wrote a different number of bytes than it reported

use crate::codec::CodecError;
use std::fmt;

/// Error raised by payload encoding and decoding.
#[derive(Debug)]
pub enum PayloadError {
    // ========================================================================
    // Malformed input
    // ========================================================================
    /// Input ended before the value was complete.
    ReadFailed { offset: usize, reason: String },
    /// Payload discriminant is neither primitive (0) nor streamable (1).
    InvalidDiscriminant(u8),
    /// Primitive type tag is not part of the codec table.
    UnknownPrimitiveTag(u8),
    /// No reconstructor is registered for this wire id.
    UnknownTypeId(u16),
    /// Bytes are present but do not form a valid value (UTF-8, char, limits, trailing bytes).
    InvalidData { reason: String },
    /// Opaque object was encoded with another codec than the one used to decode it.
    CodecMismatch { expected: u8, found: u8 },

    // ========================================================================
    // API misuse
    // ========================================================================
    /// Output sink is smaller than what is being written.
    WriteFailed { offset: usize, reason: String },
    /// Operation does not apply to object payloads (raw array accessors).
    Unsupported(&'static str),
    /// Wire id already bound to another type.
    DuplicateTypeId { wire_id: u16, existing: &'static str },
    /// Wire id reserved by the crate.
    ReservedTypeId(u16),
    /// Requested type does not match the attached object.
    TypeMismatch { expected: &'static str },

    // ========================================================================
    // Serializer / contract
    // ========================================================================
    /// Fallback serializer failed.
    Codec(CodecError),
    /// Bytes written differ from the size reported beforehand.
    SizeMismatch { expected: usize, written: usize },
}

impl PayloadError {
    /// True when the error comes from bytes that could not be decoded.
    pub fn is_malformed_input(&self) -> bool {
        match self {
            PayloadError::ReadFailed { .. }
            | PayloadError::InvalidDiscriminant(_)
            | PayloadError::UnknownPrimitiveTag(_)
            | PayloadError::UnknownTypeId(_)
            | PayloadError::InvalidData { .. }
            | PayloadError::CodecMismatch { .. } => true,
            PayloadError::Codec(err) => err.is_decode(),
            _ => false,
        }
    }

    /// True when the caller used the API in a way it does not support.
    pub fn is_misuse(&self) -> bool {
        match self {
            PayloadError::WriteFailed { .. }
            | PayloadError::Unsupported(_)
            | PayloadError::DuplicateTypeId { .. }
            | PayloadError::ReservedTypeId(_)
            | PayloadError::TypeMismatch { .. } => true,
            PayloadError::Codec(err) => !err.is_decode(),
            _ => false,
        }
    }
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadError::ReadFailed { offset, reason } => {
                write!(f, "read failed at offset {}: {}", offset, reason)
            }
            PayloadError::InvalidDiscriminant(byte) => {
                write!(f, "invalid payload discriminant {:#04X}", byte)
            }
            PayloadError::UnknownPrimitiveTag(tag) => write!(f, "unknown primitive tag {}", tag),
            PayloadError::UnknownTypeId(id) => write!(f, "no type registered for wire id {}", id),
            PayloadError::InvalidData { reason } => write!(f, "invalid data: {}", reason),
            PayloadError::CodecMismatch { expected, found } => write!(
                f,
                "object encoded with codec {} cannot be decoded by codec {}",
                found, expected
            ),
            PayloadError::WriteFailed { offset, reason } => {
                write!(f, "write failed at offset {}: {}", offset, reason)
            }
            PayloadError::Unsupported(op) => {
                write!(f, "operation not supported by object payloads: {}", op)
            }
            PayloadError::DuplicateTypeId { wire_id, existing } => {
                write!(f, "wire id {} already registered for {}", wire_id, existing)
            }
            PayloadError::ReservedTypeId(id) => write!(f, "wire id {} is reserved", id),
            PayloadError::TypeMismatch { expected } => {
                write!(f, "attached object is not a {}", expected)
            }
            PayloadError::Codec(err) => write!(f, "{}", err),
            PayloadError::SizeMismatch { expected, written } => write!(
                f,
                "reported size {} but wrote {} bytes",
                expected, written
            ),
        }
    }
}

impl std::error::Error for PayloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PayloadError::Codec(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CodecError> for PayloadError {
    fn from(err: CodecError) -> Self {
        PayloadError::Codec(err)
    }
}

pub type PayloadResult<T> = core::result::Result<T, PayloadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_error_display_variants() {
        let err = PayloadError::WriteFailed {
            offset: 12,
            reason: "buffer too small".into(),
        };
        assert_eq!(err.to_string(), "write failed at offset 12: buffer too small");

        let err = PayloadError::ReadFailed {
            offset: 4,
            reason: "unexpected end of buffer".into(),
        };
        assert_eq!(err.to_string(), "read failed at offset 4: unexpected end of buffer");

        assert_eq!(
            PayloadError::InvalidDiscriminant(7).to_string(),
            "invalid payload discriminant 0x07"
        );
        assert_eq!(
            PayloadError::SizeMismatch {
                expected: 10,
                written: 9
            }
            .to_string(),
            "reported size 10 but wrote 9 bytes"
        );
    }

    #[test]
    fn test_payload_error_classification() {
        assert!(PayloadError::UnknownTypeId(9).is_malformed_input());
        assert!(!PayloadError::UnknownTypeId(9).is_misuse());

        assert!(PayloadError::Unsupported("array").is_misuse());
        assert!(!PayloadError::Unsupported("array").is_malformed_input());

        let contract = PayloadError::SizeMismatch {
            expected: 1,
            written: 2,
        };
        assert!(!contract.is_misuse());
        assert!(!contract.is_malformed_input());
    }

    #[test]
    fn test_codec_error_classification_follows_direction() {
        let decode: PayloadError = CodecError::Decode("bad json".into()).into();
        assert!(decode.is_malformed_input());
        assert!(std::error::Error::source(&decode).is_some());

        let encode: PayloadError = CodecError::Encode("not serializable".into()).into();
        assert!(encode.is_misuse());
    }
}
