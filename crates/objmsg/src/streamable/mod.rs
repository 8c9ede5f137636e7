// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Size-aware serializable capability.
//!
//! A type implementing [`Streamable`] knows its exact encoded size up front and
//! encodes/decodes its own fields. The generic dispatch layer writes a `u16`
//! wire id ahead of the fields so that the receiving side can pick the right
//! reconstructor from a [`TypeRegistry`].
//!
//! ```text
//! +----------------+---------------------------------------+
//! | wire id (u16)  | fields (serialized_size() bytes)      |
//! +----------------+---------------------------------------+
//! ```
//!
//! # Contract
//!
//! `write_to` must emit exactly `serialized_size()` bytes and `read_from` must
//! consume exactly that many. A mismatch misframes everything that follows in
//! the message; it is asserted in debug builds and never recovered from.

mod registry;

pub use registry::TypeRegistry;

use crate::config::{OBJECT_WRAPPER_WIRE_ID, WIRE_ID_SIZE};
use crate::error::{PayloadError, PayloadResult};
use crate::ser::{Cursor, CursorMut};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Object-safe half of the capability: size and encode.
pub trait SizeStreamable: Send + Sync + fmt::Debug {
    /// Exact number of bytes `write_to` emits.
    fn serialized_size(&self) -> usize;

    /// Encode the fields of `self`.
    fn write_to(&self, out: &mut CursorMut<'_>) -> PayloadResult<()>;
}

/// Static half of the capability: wire identity and reconstruction.
pub trait Streamable: SizeStreamable + Sized + 'static {
    /// Generic dispatch id written ahead of the fields.
    const WIRE_ID: u16;

    /// Rebuild a value from the bytes written by `write_to`.
    fn read_from(input: &mut Cursor<'_>) -> PayloadResult<Self>;
}

/// Type-erased handle to a capability object.
///
/// Cloning shares the underlying allocation.
#[derive(Clone)]
pub struct StreamableObject {
    wire_id: u16,
    type_name: &'static str,
    object: Arc<dyn SizeStreamable>,
    any: Arc<dyn Any + Send + Sync>,
}

impl StreamableObject {
    pub fn new<T: Streamable>(value: T) -> PayloadResult<Self> {
        Self::from_arc(Arc::new(value))
    }

    /// Wrap a shared object.
    ///
    /// `T::WIRE_ID` must not be [`OBJECT_WRAPPER_WIRE_ID`]: the receiving side
    /// would parse the fields as an opaque object.
    pub fn from_arc<T: Streamable>(value: Arc<T>) -> PayloadResult<Self> {
        if T::WIRE_ID == OBJECT_WRAPPER_WIRE_ID {
            log::warn!(
                "[streamable] {} uses reserved wire id {}",
                std::any::type_name::<T>(),
                T::WIRE_ID
            );
            return Err(PayloadError::ReservedTypeId(T::WIRE_ID));
        }
        let any: Arc<dyn Any + Send + Sync> = value.clone();
        Ok(Self {
            wire_id: T::WIRE_ID,
            type_name: std::any::type_name::<T>(),
            object: value,
            any,
        })
    }

    pub fn wire_id(&self) -> u16 {
        self.wire_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn object(&self) -> &dyn SizeStreamable {
        self.object.as_ref()
    }

    /// Shared handle to the concrete object, if it is a `T`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.any).downcast::<T>().ok()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.any.downcast_ref::<T>()
    }

    /// True if both handles point at the same object.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.any, &other.any)
    }

    /// Wire id plus fields.
    pub fn serialized_size(&self) -> usize {
        WIRE_ID_SIZE + self.object.serialized_size()
    }

    pub fn write_to(&self, out: &mut CursorMut<'_>) -> PayloadResult<()> {
        out.write_u16(self.wire_id)?;
        let start = out.offset();
        self.object.write_to(out)?;
        let written = out.offset() - start;
        debug_assert_eq!(
            written,
            self.object.serialized_size(),
            "{} reported {} bytes but wrote {}",
            self.type_name,
            self.object.serialized_size(),
            written
        );
        Ok(())
    }
}

impl fmt::Debug for StreamableObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamableObject")
            .field("wire_id", &self.wire_id)
            .field("object", &self.object)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Heartbeat {
        seq: u32,
        view: u16,
    }

    impl SizeStreamable for Heartbeat {
        fn serialized_size(&self) -> usize {
            4 + 2
        }

        fn write_to(&self, out: &mut CursorMut<'_>) -> PayloadResult<()> {
            out.write_u32(self.seq)?;
            out.write_u16(self.view)
        }
    }

    impl Streamable for Heartbeat {
        const WIRE_ID: u16 = 77;

        fn read_from(input: &mut Cursor<'_>) -> PayloadResult<Self> {
            Ok(Self {
                seq: input.read_u32()?,
                view: input.read_u16()?,
            })
        }
    }

    /// Reports one byte less than it writes.
    #[derive(Debug)]
    struct Liar;

    impl SizeStreamable for Liar {
        fn serialized_size(&self) -> usize {
            1
        }

        fn write_to(&self, out: &mut CursorMut<'_>) -> PayloadResult<()> {
            out.write_u16(0)
        }
    }

    impl Streamable for Liar {
        const WIRE_ID: u16 = 78;

        fn read_from(input: &mut Cursor<'_>) -> PayloadResult<Self> {
            input.read_u16()?;
            Ok(Liar)
        }
    }

    #[test]
    fn test_generic_layout_prefixes_wire_id() {
        let obj = StreamableObject::new(Heartbeat { seq: 1, view: 2 }).expect("heartbeat");
        assert_eq!(obj.serialized_size(), 8);

        let mut buf = vec![0u8; obj.serialized_size()];
        let mut out = CursorMut::new(&mut buf);
        obj.write_to(&mut out).expect("write");
        assert_eq!(out.offset(), 8);
        assert_eq!(buf, vec![0, 77, 0, 0, 0, 1, 0, 2]);
    }

    #[test]
    fn test_downcast_returns_shared_object() {
        let obj = StreamableObject::new(Heartbeat { seq: 9, view: 1 }).expect("heartbeat");
        let copy = obj.clone();
        assert!(obj.ptr_eq(&copy));

        let a = obj.downcast::<Heartbeat>().expect("heartbeat");
        let b = copy.downcast::<Heartbeat>().expect("heartbeat");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(obj.downcast_ref::<Heartbeat>().map(|h| h.seq), Some(9));
        assert!(obj.downcast::<Liar>().is_none());
        assert!(obj.type_name().ends_with("Heartbeat"));
    }

    #[derive(Debug)]
    struct Reserved;

    impl SizeStreamable for Reserved {
        fn serialized_size(&self) -> usize {
            0
        }

        fn write_to(&self, _out: &mut CursorMut<'_>) -> PayloadResult<()> {
            Ok(())
        }
    }

    impl Streamable for Reserved {
        const WIRE_ID: u16 = OBJECT_WRAPPER_WIRE_ID;

        fn read_from(_input: &mut Cursor<'_>) -> PayloadResult<Self> {
            Ok(Reserved)
        }
    }

    #[test]
    fn test_reserved_wire_id_rejected() {
        assert!(matches!(
            StreamableObject::new(Reserved),
            Err(PayloadError::ReservedTypeId(OBJECT_WRAPPER_WIRE_ID))
        ));
        assert!(StreamableObject::from_arc(Arc::new(Reserved)).is_err());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "reported 1 bytes but wrote 2")]
    fn test_size_contract_violation_is_fatal() {
        let obj = StreamableObject::new(Liar).expect("liar");
        let mut buf = vec![0u8; 16];
        let mut out = CursorMut::new(&mut buf);
        let _ = obj.write_to(&mut out);
    }
}
