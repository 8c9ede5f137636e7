// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Pluggable fallback serialization for opaque objects.
//!
//! Objects that are neither primitives nor [`crate::Streamable`] are carried by
//! an [`crate::ObjectWrapper`], which turns them into bytes through an
//! [`ObjectCodec`]. [`JsonCodec`] is the default.
//!
//! # Example
//!
//! ```
//! use objmsg::{JsonCodec, ObjectCodec};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Ping { seq: u32 }
//!
//! let codec = JsonCodec;
//! let bytes = codec.encode(&Ping { seq: 1 }).unwrap();
//! assert_eq!(&bytes, br#"{"seq":1}"#);
//!
//! let decoded: Ping = codec.decode(&bytes).unwrap();
//! assert_eq!(decoded, Ping { seq: 1 });
//! ```
//!
//! # Implementing Custom Codecs
//!
//! A codec picks a stable `id()`; the id travels on the wire in front of the
//! encoded object so that the receiving side can refuse bytes it cannot read.
//! Ids `0..=15` are reserved for codecs shipped with this crate.

use crate::config::CODEC_ID_JSON;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// Error type for codec operations.
#[derive(Debug)]
pub enum CodecError {
    /// Failed to encode an object to bytes.
    Encode(Box<dyn std::error::Error + Send + Sync>),
    /// Failed to decode bytes to an object.
    Decode(Box<dyn std::error::Error + Send + Sync>),
}

impl CodecError {
    pub fn is_decode(&self) -> bool {
        matches!(self, CodecError::Decode(_))
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Encode(e) => write!(f, "encode error: {}", e),
            CodecError::Decode(e) => write!(f, "decode error: {}", e),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::Encode(e) => Some(e.as_ref()),
            CodecError::Decode(e) => Some(e.as_ref()),
        }
    }
}

/// Fallback object serialization format.
///
/// Codec instances are captured by the wrapper that uses them, hence the
/// `Clone + Send + Sync + 'static` bound.
pub trait ObjectCodec: Clone + Send + Sync + 'static {
    /// Stable identifier written on the wire ahead of the encoded object.
    fn id(&self) -> u8;

    /// Encode a serializable object to bytes.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, obj: &T) -> Result<Vec<u8>, CodecError>;

    /// Decode bytes to an object.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::Decode` if deserialization fails.
    fn decode<T: DeserializeOwned>(&self, buf: &[u8]) -> Result<T, CodecError>;
}

/// JSON codec using serde_json.
///
/// Human readable and self-delimiting, but not compact. Good default for
/// objects that are only occasionally sent.
#[derive(Clone, Default, Debug, Copy)]
pub struct JsonCodec;

impl ObjectCodec for JsonCodec {
    fn id(&self) -> u8 {
        CODEC_ID_JSON
    }

    fn encode<T: Serialize>(&self, obj: &T) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(obj).map_err(|e| CodecError::Encode(Box::new(e)))
    }

    fn decode<T: DeserializeOwned>(&self, buf: &[u8]) -> Result<T, CodecError> {
        serde_json::from_slice(buf).map_err(|e| CodecError::Decode(Box::new(e)))
    }
}
