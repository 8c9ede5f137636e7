// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! objmsg Global Configuration - Single Source of Truth
//!
//! This module centralizes ALL wire constants of the object payload format and
//! the runtime codec limits. **NEVER hardcode a tag or discriminant elsewhere!**
//!
//! # Architecture
//!
//! - **Level 1 (Static)**: Compile-time constants (discriminants, type tags, wire ids)
//! - **Level 2 (Dynamic)**: [`CodecLimits`] applied by the cursors at runtime
//!
//! # Exemple
//!
//! ```
//! use objmsg::config::{CodecLimits, DISCRIMINANT_PRIMITIVE, TAG_I32};
//!
//! assert_eq!(DISCRIMINANT_PRIMITIVE, 0);
//! assert_eq!(TAG_I32, 15);
//!
//! let limits = CodecLimits::default().with_max_length(4096);
//! assert_eq!(limits.max_length, 4096);
//! ```

// =======================================================================
// Payload discriminant (first byte of a non-empty payload)
// =======================================================================

/// Discriminant byte selecting the primitive codec path.
pub const DISCRIMINANT_PRIMITIVE: u8 = 0;

/// Discriminant byte selecting the capability/adapter path.
pub const DISCRIMINANT_STREAMABLE: u8 = 1;

/// Size of the discriminant on the wire.
pub const DISCRIMINANT_SIZE: usize = 1;

// =======================================================================
// Primitive type tags
//
// Tag 0 is reserved for "null" and is never emitted: a null value is the
// empty payload, which writes no bytes at all.
// =======================================================================

/// Reserved, never written.
pub const TAG_NULL: u8 = 0;
pub const TAG_BOOL: u8 = 10;
pub const TAG_U8: u8 = 11;
pub const TAG_CHAR: u8 = 12;
pub const TAG_F64: u8 = 13;
pub const TAG_F32: u8 = 14;
pub const TAG_I32: u8 = 15;
pub const TAG_I64: u8 = 16;
pub const TAG_I16: u8 = 17;
pub const TAG_STRING: u8 = 18;
pub const TAG_BYTES: u8 = 19;
pub const TAG_I8: u8 = 20;
pub const TAG_U16: u8 = 21;
pub const TAG_U32: u8 = 22;
pub const TAG_U64: u8 = 23;
pub const TAG_DURATION: u8 = 24;

/// Size of a primitive type tag on the wire.
pub const TAG_SIZE: usize = 1;

/// Size of the `u32` length prefix used by strings, byte buffers and opaque blobs.
pub const LENGTH_PREFIX_SIZE: usize = 4;

// =======================================================================
// Generic dispatch (capability path)
// =======================================================================

/// Size of the wire id written ahead of every capability object.
pub const WIRE_ID_SIZE: usize = 2;

/// Wire id reserved for [`crate::ObjectWrapper`]. Cannot be registered by applications.
pub const OBJECT_WRAPPER_WIRE_ID: u16 = 0xFFFF;

/// Size of the codec id written by the object wrapper.
pub const CODEC_ID_SIZE: usize = 1;

/// Codec id of [`crate::JsonCodec`].
pub const CODEC_ID_JSON: u8 = 1;

// =======================================================================
// Envelope contract
// =======================================================================

/// Message type advertised by object payloads to the surrounding envelope.
///
/// Matches the object-message slot of the envelope type table
/// (bytes = 0, nio = 1, empty = 2, object = 3).
pub const OBJ_MSG: u16 = 3;

// =======================================================================
// Runtime limits
// =======================================================================

/// Default upper bound for a single length-prefixed field (64 MiB).
pub const DEFAULT_MAX_LENGTH: usize = 64 * 1024 * 1024;

/// Decode limits enforced by [`crate::ser::Cursor`].
///
/// A length prefix larger than `max_length` is rejected before any byte of the
/// field is read. Encoding is not bounded by these limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecLimits {
    /// Largest accepted string/bytes/blob length, in bytes.
    pub max_length: usize,
}

impl CodecLimits {
    #[must_use]
    pub const fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    #[must_use]
    pub const fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Limits with no bound besides the `u32` range of the length prefix.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_length: u32::MAX as usize,
        }
    }
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LENGTH)
    }
}
