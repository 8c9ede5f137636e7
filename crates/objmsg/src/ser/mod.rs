// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Byte-level sink and source used by every payload codec.

pub mod cursor;

pub use cursor::{Cursor, CursorMut};
