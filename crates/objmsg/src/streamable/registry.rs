// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire id -> reconstructor table for capability objects.
//!
//! Registration happens once at startup; lookups happen on every decoded
//! capability payload and go through a sharded map without a global lock.

use super::{Streamable, StreamableObject};
use crate::config::OBJECT_WRAPPER_WIRE_ID;
use crate::error::{PayloadError, PayloadResult};
use crate::ser::Cursor;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::any::TypeId;
use std::fmt;
use std::sync::OnceLock;

type Reconstructor = fn(&mut Cursor<'_>) -> PayloadResult<StreamableObject>;

#[derive(Clone, Copy)]
struct Registration {
    type_id: TypeId,
    type_name: &'static str,
    read: Reconstructor,
}

fn reconstruct<T: Streamable>(input: &mut Cursor<'_>) -> PayloadResult<StreamableObject> {
    T::read_from(input).and_then(StreamableObject::new)
}

static GLOBAL_REGISTRY: OnceLock<TypeRegistry> = OnceLock::new();

/// Maps wire ids to the types that can be rebuilt from them.
pub struct TypeRegistry {
    entries: DashMap<u16, Registration>,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Process-wide registry, for applications that register their types once.
    pub fn global() -> &'static TypeRegistry {
        GLOBAL_REGISTRY.get_or_init(TypeRegistry::new)
    }

    /// Bind `T::WIRE_ID` to `T`.
    ///
    /// Registering the same type twice is a no-op. Binding an id that is
    /// already taken by another type, or the id reserved for the object
    /// wrapper, is rejected.
    pub fn register<T: Streamable>(&self) -> PayloadResult<()> {
        let wire_id = T::WIRE_ID;
        if wire_id == OBJECT_WRAPPER_WIRE_ID {
            return Err(PayloadError::ReservedTypeId(wire_id));
        }
        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();
        match self.entries.entry(wire_id) {
            Entry::Occupied(existing) => {
                let existing = *existing.get();
                if existing.type_id == type_id {
                    Ok(())
                } else {
                    log::warn!(
                        "[registry] wire id {} already bound to {}, refusing {}",
                        wire_id,
                        existing.type_name,
                        type_name
                    );
                    Err(PayloadError::DuplicateTypeId {
                        wire_id,
                        existing: existing.type_name,
                    })
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(Registration {
                    type_id,
                    type_name,
                    read: reconstruct::<T>,
                });
                log::debug!("[registry] wire id {} -> {}", wire_id, type_name);
                Ok(())
            }
        }
    }

    /// Builder-style [`TypeRegistry::register`].
    pub fn with<T: Streamable>(self) -> PayloadResult<Self> {
        self.register::<T>()?;
        Ok(self)
    }

    pub fn contains(&self, wire_id: u16) -> bool {
        self.entries.contains_key(&wire_id)
    }

    pub fn type_name(&self, wire_id: u16) -> Option<&'static str> {
        self.entries.get(&wire_id).map(|entry| entry.type_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rebuild the object announced by `wire_id` from `input`.
    pub fn read(&self, wire_id: u16, input: &mut Cursor<'_>) -> PayloadResult<StreamableObject> {
        let read = self
            .entries
            .get(&wire_id)
            .map(|entry| entry.read)
            .ok_or(PayloadError::UnknownTypeId(wire_id))?;
        read(input)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.entries.len())
            .finish()
    }
}
