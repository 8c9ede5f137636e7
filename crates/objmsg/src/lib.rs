// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # objmsg - Lazily encoded object payloads
//!
//! Payload entity for group-communication messages that carry a single
//! in-memory object instead of a raw byte array. The object is attached as-is
//! and only turned into bytes when the enclosing message is serialized.
//!
//! ## Quick Start
//!
//! ```rust
//! use objmsg::{ObjectPayload, PayloadResult, TypeRegistry};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Order { id: u64, symbol: String }
//!
//! fn main() -> PayloadResult<()> {
//!     let mut payload = ObjectPayload::new();
//!     payload.attach_object(Order { id: 7, symbol: "ACME".into() });
//!
//!     let bytes = payload.to_bytes()?;
//!     let received = ObjectPayload::from_bytes(&bytes, &TypeRegistry::new())?;
//!     let order = received.decode_object::<Order>()?;
//!     assert_eq!(order.as_deref(), Some(&Order { id: 7, symbol: "ACME".into() }));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                   ObjectPayload (attach / detach)                   |
//! |        discriminant: 0 = primitive, 1 = streamable / wrapped        |
//! +-------------------+-------------------------+-----------------------+
//! |  Primitive table  |  Streamable + registry  |  ObjectWrapper        |
//! |  tag + body       |  wire id + fields       |  0xFFFF + codec bytes |
//! +-------------------+-------------------------+-----------------------+
//! |                 Cursor / CursorMut (big-endian, bounded)            |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ObjectPayload`] | Holds at most one value, encodes it on demand |
//! | [`Primitive`] | Closed set of values with a fixed tag-based encoding |
//! | [`Streamable`] | Types that report their size and encode themselves |
//! | [`TypeRegistry`] | Wire id to type table used on the decode side |
//! | [`ObjectWrapper`] | Carries any serde object through an [`ObjectCodec`] |
//!
//! ## Modules Overview
//!
//! - [`payload`] - Payload entity and the [`MessagePayload`] seam
//! - [`primitive`] - Primitive codec table
//! - [`streamable`] - Size-aware capability and type registry
//! - [`wrapper`] / [`codec`] - Opaque object adapter and fallback codecs
//! - [`config`] - Wire constants and codec limits

pub mod codec;
pub mod config;
pub mod error;
pub mod payload;
pub mod primitive;
pub mod ser;
pub mod streamable;
pub mod wrapper;

pub use codec::{CodecError, JsonCodec, ObjectCodec};
pub use config::CodecLimits;
pub use error::{PayloadError, PayloadResult};
pub use payload::{MessagePayload, ObjectPayload, PayloadValue};
pub use primitive::Primitive;
pub use ser::{Cursor, CursorMut};
pub use streamable::{SizeStreamable, Streamable, StreamableObject, TypeRegistry};
pub use wrapper::ObjectWrapper;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
