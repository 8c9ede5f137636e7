// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Object payload entity.
//!
//! An [`ObjectPayload`] carries at most one value for a network message and
//! encodes it only when the message is serialized. The value is classified
//! once, when attached:
//!
//! - [`Primitive`]: written through the primitive codec table,
//! - [`StreamableObject`]: a type that sizes and encodes itself,
//! - [`ObjectWrapper`]: any serde object, encoded by a fallback codec.
//!
//! # Wire layout
//!
//! ```text
//! empty payload:      (nothing)
//! primitive:          [0][tag u8][body...]
//! streamable object:  [1][wire id u16][fields...]
//! wrapped object:     [1][0xFFFF][codec id u8][len u32][bytes...]
//! ```
//!
//! # Example
//!
//! ```
//! use objmsg::{ObjectPayload, TypeRegistry};
//!
//! let mut payload = ObjectPayload::new();
//! payload.attach(42i32);
//! assert_eq!(payload.encoded_size().unwrap(), 6);
//!
//! let bytes = payload.to_bytes().unwrap();
//! assert_eq!(bytes, vec![0, 15, 0, 0, 0, 42]);
//!
//! let decoded = ObjectPayload::from_bytes(&bytes, &TypeRegistry::new()).unwrap();
//! assert_eq!(decoded.primitive().and_then(|p| p.as_i32()), Some(42));
//! ```

use crate::codec::{JsonCodec, ObjectCodec};
use crate::config::{
    CodecLimits, DISCRIMINANT_PRIMITIVE, DISCRIMINANT_SIZE, DISCRIMINANT_STREAMABLE, OBJECT_WRAPPER_WIRE_ID,
    OBJ_MSG,
};
use crate::error::{PayloadError, PayloadResult};
use crate::primitive::Primitive;
use crate::ser::{Cursor, CursorMut};
use crate::streamable::{Streamable, StreamableObject, TypeRegistry};
use crate::wrapper::ObjectWrapper;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// PayloadValue
// ============================================================================

/// A classified payload value.
#[derive(Debug, Clone)]
pub enum PayloadValue {
    Primitive(Primitive),
    Streamable(StreamableObject),
    Wrapped(Arc<ObjectWrapper>),
}

impl PayloadValue {
    /// Classify a self-encoding object.
    ///
    /// Fails with `ReservedTypeId` if `T` claims the object wrapper's wire id.
    pub fn streamable<T: Streamable>(value: T) -> PayloadResult<Self> {
        StreamableObject::new(value).map(Self::Streamable)
    }

    /// Classify an arbitrary serde object, encoded as JSON.
    pub fn wrap<T>(value: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        Self::wrap_with(value, JsonCodec)
    }

    /// Classify an arbitrary serde object, encoded by `codec`.
    pub fn wrap_with<T, C>(value: T, codec: C) -> Self
    where
        T: Serialize + Send + Sync + 'static,
        C: ObjectCodec,
    {
        Self::Wrapped(Arc::new(ObjectWrapper::new(Arc::new(value), codec)))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(_))
    }

    /// True for both self-encoding and wrapped objects.
    pub fn is_streamable(&self) -> bool {
        !self.is_primitive()
    }

    fn discriminant(&self) -> u8 {
        if self.is_primitive() {
            DISCRIMINANT_PRIMITIVE
        } else {
            DISCRIMINANT_STREAMABLE
        }
    }

    /// Size of the value without the discriminant byte.
    pub fn serialized_size(&self) -> PayloadResult<usize> {
        match self {
            Self::Primitive(p) => Ok(p.serialized_size()),
            Self::Streamable(obj) => Ok(obj.serialized_size()),
            Self::Wrapped(wrapper) => wrapper.serialized_size(),
        }
    }

    pub fn write_to(&self, out: &mut CursorMut<'_>) -> PayloadResult<()> {
        match self {
            Self::Primitive(p) => p.write_to(out),
            Self::Streamable(obj) => obj.write_to(out),
            Self::Wrapped(wrapper) => wrapper.write_to(out),
        }
    }

    /// The attached object as a `T`. Wrapped objects are handed back
    /// unwrapped; primitives never match.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Self::Primitive(_) => None,
            Self::Streamable(obj) => obj.downcast::<T>(),
            Self::Wrapped(wrapper) => wrapper.downcast::<T>(),
        }
    }
}

macro_rules! impl_from_primitive {
    ($($type:ty),* $(,)?) => {
        $(
            impl From<$type> for PayloadValue {
                fn from(v: $type) -> Self {
                    Self::Primitive(Primitive::from(v))
                }
            }
        )*
    };
}

impl_from_primitive!(
    bool,
    u8,
    i8,
    u16,
    i16,
    char,
    u32,
    i32,
    u64,
    i64,
    f32,
    f64,
    Duration,
    &str,
    String,
    Arc<str>,
    &[u8],
    Vec<u8>,
    Arc<[u8]>,
);

impl From<Primitive> for PayloadValue {
    fn from(v: Primitive) -> Self {
        Self::Primitive(v)
    }
}

impl From<StreamableObject> for PayloadValue {
    fn from(v: StreamableObject) -> Self {
        Self::Streamable(v)
    }
}

impl From<ObjectWrapper> for PayloadValue {
    fn from(v: ObjectWrapper) -> Self {
        Self::Wrapped(Arc::new(v))
    }
}

impl From<Arc<ObjectWrapper>> for PayloadValue {
    fn from(v: Arc<ObjectWrapper>) -> Self {
        Self::Wrapped(v)
    }
}

impl fmt::Display for PayloadValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "{}", p),
            Self::Streamable(obj) => write!(f, "{:?}", obj.object()),
            Self::Wrapped(wrapper) => match wrapper.type_name() {
                Some(name) => write!(f, "{}", name),
                None => write!(f, "opaque object (codec {})", wrapper.codec_id()),
            },
        }
    }
}

// ============================================================================
// MessagePayload
// ============================================================================

/// What a message envelope needs from its payload.
pub trait MessagePayload: Send + Sync + fmt::Debug {
    /// Message type code announced in the envelope header.
    fn payload_type(&self) -> u16;

    fn has_payload(&self) -> bool;

    fn encoded_size(&self) -> PayloadResult<usize>;

    fn write_payload(&self, out: &mut CursorMut<'_>) -> PayloadResult<()>;

    /// Replace the current value with one decoded from `input`.
    fn read_payload(
        &mut self,
        input: &mut Cursor<'_>,
        registry: &TypeRegistry,
    ) -> PayloadResult<()>;

    /// Shallow copy sharing the attached value.
    fn copy_payload(&self) -> Box<dyn MessagePayload>;
}

// ============================================================================
// ObjectPayload
// ============================================================================

/// Holds at most one value and encodes it lazily.
///
/// Attached objects live behind `Arc` and are never deep-copied: `copy()`
/// and `clone()` share them with the original payload.
#[derive(Debug, Clone, Default)]
pub struct ObjectPayload {
    value: Option<PayloadValue>,
}

impl ObjectPayload {
    /// Message type code of object payloads.
    pub const PAYLOAD_TYPE: u16 = OBJ_MSG;

    /// Empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self { value: None }
    }

    pub fn with_value(value: impl Into<PayloadValue>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    /// Replace the current value. Classification happens here, once.
    pub fn attach(&mut self, value: impl Into<PayloadValue>) -> &mut Self {
        self.value = Some(value.into());
        self
    }

    /// Replace the current value, or empty the payload on `None`.
    pub fn set(&mut self, value: Option<PayloadValue>) -> &mut Self {
        self.value = value;
        self
    }

    /// Attach a self-encoding object. On error the current value is kept.
    pub fn attach_streamable<T: Streamable>(&mut self, value: T) -> PayloadResult<&mut Self> {
        let value = PayloadValue::streamable(value)?;
        Ok(self.attach(value))
    }

    /// Attach any serde object, encoded as JSON.
    pub fn attach_object<T>(&mut self, value: T) -> &mut Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        self.attach(PayloadValue::wrap(value))
    }

    pub fn attach_object_with<T, C>(&mut self, value: T, codec: C) -> &mut Self
    where
        T: Serialize + Send + Sync + 'static,
        C: ObjectCodec,
    {
        self.attach(PayloadValue::wrap_with(value, codec))
    }

    pub fn clear(&mut self) -> &mut Self {
        self.value = None;
        self
    }

    pub fn value(&self) -> Option<&PayloadValue> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<PayloadValue> {
        self.value
    }

    pub fn primitive(&self) -> Option<&Primitive> {
        match &self.value {
            Some(PayloadValue::Primitive(p)) => Some(p),
            _ => None,
        }
    }

    /// The attached object as a `T`, if it is one.
    ///
    /// Objects read from the wire through the fallback codec are not
    /// available here until decoded, see [`ObjectPayload::decode_object`].
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.value.as_ref().and_then(|v| v.downcast::<T>())
    }

    /// The attached object as a `T`, decoding wrapped bytes with JSON.
    ///
    /// Returns `Ok(None)` on an empty payload.
    pub fn decode_object<T>(&self) -> PayloadResult<Option<Arc<T>>>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        self.decode_object_with(&JsonCodec)
    }

    pub fn decode_object_with<T, C>(&self, codec: &C) -> PayloadResult<Option<Arc<T>>>
    where
        T: DeserializeOwned + Send + Sync + 'static,
        C: ObjectCodec,
    {
        let mismatch = || PayloadError::TypeMismatch {
            expected: std::any::type_name::<T>(),
        };
        match &self.value {
            None => Ok(None),
            Some(PayloadValue::Wrapped(wrapper)) => wrapper.get_with::<T, C>(codec).map(Some),
            Some(PayloadValue::Streamable(obj)) => obj.downcast::<T>().map(Some).ok_or_else(mismatch),
            Some(PayloadValue::Primitive(_)) => Err(mismatch()),
        }
    }

    pub fn has_payload(&self) -> bool {
        self.value.is_some()
    }

    /// Value of the discriminant that would be written. False when empty.
    pub fn is_streamable(&self) -> bool {
        self.value.as_ref().is_some_and(PayloadValue::is_streamable)
    }

    /// Object payloads never expose a raw byte array.
    pub fn has_array(&self) -> bool {
        false
    }

    pub fn array_offset(&self) -> usize {
        0
    }

    pub fn array(&self) -> PayloadResult<&[u8]> {
        Err(PayloadError::Unsupported("array"))
    }

    pub fn set_array(&mut self, _bytes: &[u8]) -> PayloadResult<()> {
        Err(PayloadError::Unsupported("set_array"))
    }

    /// Encoded size, or 0 if it cannot be computed.
    pub fn length(&self) -> usize {
        match self.encoded_size() {
            Ok(size) => size,
            Err(err) => {
                log::warn!("[objmsg] cannot size payload, reporting length 0: {}", err);
                0
            }
        }
    }

    /// Exact number of bytes [`ObjectPayload::write_to`] emits.
    ///
    /// Fails only when a wrapped object cannot be encoded.
    pub fn encoded_size(&self) -> PayloadResult<usize> {
        match &self.value {
            None => Ok(0),
            Some(value) => Ok(DISCRIMINANT_SIZE + value.serialized_size()?),
        }
    }

    pub fn write_to(&self, out: &mut CursorMut<'_>) -> PayloadResult<()> {
        let Some(value) = &self.value else {
            return Ok(());
        };
        out.write_u8(value.discriminant())?;
        value.write_to(out)
    }

    /// Decode a payload the envelope announced as present.
    pub fn read_from(input: &mut Cursor<'_>, registry: &TypeRegistry) -> PayloadResult<Self> {
        let value = match input.read_u8()? {
            DISCRIMINANT_PRIMITIVE => PayloadValue::Primitive(Primitive::read_from(input)?),
            DISCRIMINANT_STREAMABLE => {
                let wire_id = input.read_u16()?;
                if wire_id == OBJECT_WRAPPER_WIRE_ID {
                    PayloadValue::Wrapped(Arc::new(ObjectWrapper::read_from(input)?))
                } else {
                    PayloadValue::Streamable(registry.read(wire_id, input)?)
                }
            }
            other => {
                log::debug!("[objmsg] rejecting payload discriminant {}", other);
                return Err(PayloadError::InvalidDiscriminant(other));
            }
        };
        Ok(Self { value: Some(value) })
    }

    /// Shallow copy: the new payload shares the attached value.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Encode into a buffer of exactly [`ObjectPayload::encoded_size`] bytes.
    pub fn to_bytes(&self) -> PayloadResult<Vec<u8>> {
        let size = self.encoded_size()?;
        let mut buf = vec![0u8; size];
        let mut out = CursorMut::new(&mut buf);
        self.write_to(&mut out)?;
        let written = out.offset();
        if written != size {
            return Err(PayloadError::SizeMismatch {
                expected: size,
                written,
            });
        }
        log::trace!("[objmsg] encoded payload into {} bytes", size);
        Ok(buf)
    }

    /// Decode a whole buffer. An empty buffer is the empty payload.
    pub fn from_bytes(bytes: &[u8], registry: &TypeRegistry) -> PayloadResult<Self> {
        Self::from_bytes_with_limits(bytes, registry, CodecLimits::default())
    }

    /// [`ObjectPayload::from_bytes`] with explicit decode limits.
    pub fn from_bytes_with_limits(
        bytes: &[u8],
        registry: &TypeRegistry,
        limits: CodecLimits,
    ) -> PayloadResult<Self> {
        if bytes.is_empty() {
            return Ok(Self::new());
        }
        let mut input = Cursor::with_limits(bytes, limits);
        let payload = Self::read_from(&mut input, registry)?;
        if !input.is_eof() {
            return Err(PayloadError::InvalidData {
                reason: format!("{} trailing bytes after payload", input.remaining()),
            });
        }
        Ok(payload)
    }
}

impl MessagePayload for ObjectPayload {
    fn payload_type(&self) -> u16 {
        Self::PAYLOAD_TYPE
    }

    fn has_payload(&self) -> bool {
        ObjectPayload::has_payload(self)
    }

    fn encoded_size(&self) -> PayloadResult<usize> {
        ObjectPayload::encoded_size(self)
    }

    fn write_payload(&self, out: &mut CursorMut<'_>) -> PayloadResult<()> {
        self.write_to(out)
    }

    fn read_payload(
        &mut self,
        input: &mut Cursor<'_>,
        registry: &TypeRegistry,
    ) -> PayloadResult<()> {
        *self = Self::read_from(input, registry)?;
        Ok(())
    }

    fn copy_payload(&self) -> Box<dyn MessagePayload> {
        Box::new(self.copy())
    }
}

impl fmt::Display for ObjectPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "obj: {}", value),
            None => write!(f, "obj: null"),
        }
    }
}
