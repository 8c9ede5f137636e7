// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Opaque object adapter.
//!
//! Carries any `serde::Serialize` object on the capability path. The object is
//! encoded by an [`ObjectCodec`] the first time its size or bytes are needed,
//! and the bytes are cached so that a size query followed by a write (or one
//! write per destination) encodes only once.
//!
//! Wire layout, after the reserved wire id:
//!
//! ```text
//! +---------------+---------------+--------------------+
//! | codec id (u8) | length (u32)  | encoded object     |
//! +---------------+---------------+--------------------+
//! ```

use crate::codec::{CodecError, JsonCodec, ObjectCodec};
use crate::config::{CODEC_ID_SIZE, LENGTH_PREFIX_SIZE, OBJECT_WRAPPER_WIRE_ID, WIRE_ID_SIZE};
use crate::error::{PayloadError, PayloadResult};
use crate::ser::{Cursor, CursorMut};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

type Encoder = Box<dyn Fn() -> Result<Vec<u8>, CodecError> + Send + Sync>;

enum Source {
    /// Attached on this side; the object is still available.
    Local {
        object: Arc<dyn Any + Send + Sync>,
        type_name: &'static str,
        encode: Encoder,
        cache: Mutex<Option<Arc<[u8]>>>,
    },
    /// Read from the wire; only the encoded bytes are known.
    Remote { bytes: Arc<[u8]> },
}

/// Adapter granting the size-aware capability to arbitrary serde objects.
pub struct ObjectWrapper {
    codec_id: u8,
    source: Source,
}

impl ObjectWrapper {
    /// Wrap `object`, encoding it lazily with `codec`.
    pub fn new<T, C>(object: Arc<T>, codec: C) -> Self
    where
        T: Serialize + Send + Sync + 'static,
        C: ObjectCodec,
    {
        let codec_id = codec.id();
        let target = Arc::clone(&object);
        let encode: Encoder = Box::new(move || codec.encode(target.as_ref()));
        let object: Arc<dyn Any + Send + Sync> = object;
        Self {
            codec_id,
            source: Source::Local {
                object,
                type_name: std::any::type_name::<T>(),
                encode,
                cache: Mutex::new(None),
            },
        }
    }

    /// Wrap `object` with the default [`JsonCodec`].
    pub fn json<T>(object: Arc<T>) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        Self::new(object, JsonCodec)
    }

    pub fn codec_id(&self) -> u8 {
        self.codec_id
    }

    /// True if this wrapper was read from the wire and holds bytes only.
    pub fn is_remote(&self) -> bool {
        matches!(self.source, Source::Remote { .. })
    }

    /// Name of the wrapped type, when it was attached locally.
    pub fn type_name(&self) -> Option<&'static str> {
        match &self.source {
            Source::Local { type_name, .. } => Some(*type_name),
            Source::Remote { .. } => None,
        }
    }

    /// Encoded form of the object, computed at most once.
    pub fn encoded_bytes(&self) -> PayloadResult<Arc<[u8]>> {
        match &self.source {
            Source::Remote { bytes } => Ok(Arc::clone(bytes)),
            Source::Local {
                type_name,
                encode,
                cache,
                ..
            } => {
                let mut cache = cache.lock();
                if let Some(bytes) = cache.as_ref() {
                    return Ok(Arc::clone(bytes));
                }
                let bytes: Arc<[u8]> = Arc::from((**encode)()?);
                log::trace!(
                    "[wrapper] encoded {} with codec {} into {} bytes",
                    type_name,
                    self.codec_id,
                    bytes.len()
                );
                *cache = Some(Arc::clone(&bytes));
                Ok(bytes)
            }
        }
    }

    /// Wire id, codec id, length prefix and encoded object.
    pub fn serialized_size(&self) -> PayloadResult<usize> {
        let bytes = self.encoded_bytes()?;
        Ok(WIRE_ID_SIZE + CODEC_ID_SIZE + LENGTH_PREFIX_SIZE + bytes.len())
    }

    pub fn write_to(&self, out: &mut CursorMut<'_>) -> PayloadResult<()> {
        let bytes = self.encoded_bytes()?;
        out.write_u16(OBJECT_WRAPPER_WIRE_ID)?;
        out.write_u8(self.codec_id)?;
        out.write_len_prefixed(&bytes)
    }

    /// Read the fields that follow the reserved wire id.
    pub fn read_from(input: &mut Cursor<'_>) -> PayloadResult<Self> {
        let codec_id = input.read_u8()?;
        let bytes = Arc::from(input.read_len_prefixed()?);
        Ok(Self {
            codec_id,
            source: Source::Remote { bytes },
        })
    }

    /// The attached object if it is a `T`. Remote wrappers always return `None`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match &self.source {
            Source::Local { object, .. } => Arc::clone(object).downcast::<T>().ok(),
            Source::Remote { .. } => None,
        }
    }

    /// The object as a `T`, decoding remote bytes with [`JsonCodec`].
    pub fn get<T>(&self) -> PayloadResult<Arc<T>>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        self.get_with(&JsonCodec)
    }

    /// The object as a `T`, decoding remote bytes with `codec`.
    ///
    /// Local wrappers hand back the attached object without decoding.
    pub fn get_with<T, C>(&self, codec: &C) -> PayloadResult<Arc<T>>
    where
        T: DeserializeOwned + Send + Sync + 'static,
        C: ObjectCodec,
    {
        match &self.source {
            Source::Local { object, .. } => {
                Arc::clone(object)
                    .downcast::<T>()
                    .map_err(|_| PayloadError::TypeMismatch {
                        expected: std::any::type_name::<T>(),
                    })
            }
            Source::Remote { bytes } => {
                if codec.id() != self.codec_id {
                    return Err(PayloadError::CodecMismatch {
                        expected: codec.id(),
                        found: self.codec_id,
                    });
                }
                Ok(Arc::new(codec.decode::<T>(bytes)?))
            }
        }
    }
}

impl fmt::Debug for ObjectWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Source::Local { type_name, .. } => f
                .debug_struct("ObjectWrapper")
                .field("codec_id", &self.codec_id)
                .field("type", type_name)
                .finish(),
            Source::Remote { bytes } => f
                .debug_struct("ObjectWrapper")
                .field("codec_id", &self.codec_id)
                .field("encoded_len", &bytes.len())
                .finish(),
        }
    }
}
