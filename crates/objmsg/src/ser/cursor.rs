// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Read/write cursors for payload buffers.
//!
//! All multi-byte values use network byte order (big-endian). Variable length
//! fields carry a `u32` length prefix. [`CodecLimits`] bounds that prefix when
//! decoding; encoding is bounded only by the `u32` range of the prefix.

use crate::config::{CodecLimits, LENGTH_PREFIX_SIZE};
use crate::error::{PayloadError, PayloadResult};

/// Generate write methods for fixed-width numeric types
///
/// Each generated method:
/// 1. Checks buffer bounds (returns `PayloadError::WriteFailed` if overflow)
/// 2. Converts value to big-endian bytes via `to_be_bytes()`
/// 3. Copies bytes to buffer
/// 4. Advances offset
macro_rules! impl_write_be {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self, value: $type) -> PayloadResult<()> {
            if self.offset + $size > self.buffer.len() {
                return Err(PayloadError::WriteFailed {
                    offset: self.offset,
                    reason: "buffer too small".into(),
                });
            }
            let bytes = value.to_be_bytes();
            self.buffer[self.offset..self.offset + $size].copy_from_slice(&bytes);
            self.offset += $size;
            Ok(())
        }
    };
}

/// Generate read methods for fixed-width numeric types
///
/// Each generated method:
/// 1. Checks buffer bounds (returns `PayloadError::ReadFailed` if overflow)
/// 2. Reads N bytes from buffer
/// 3. Converts bytes to value via `from_be_bytes()`
/// 4. Advances offset
macro_rules! impl_read_be {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self) -> PayloadResult<$type> {
            if self.offset + $size > self.buffer.len() {
                return Err(PayloadError::ReadFailed {
                    offset: self.offset,
                    reason: "unexpected end of buffer".into(),
                });
            }
            let mut bytes = [0u8; $size];
            bytes.copy_from_slice(&self.buffer[self.offset..self.offset + $size]);
            self.offset += $size;
            Ok(<$type>::from_be_bytes(bytes))
        }
    };
}

/// Generate common cursor methods (offset, remaining)
macro_rules! impl_cursor_common {
    () => {
        pub fn offset(&self) -> usize {
            self.offset
        }

        pub fn remaining(&self) -> usize {
            self.buffer.len().saturating_sub(self.offset)
        }
    };
}

/// Mutable cursor for writing (bounds-checked, fixed capacity)
///
/// The buffer is expected to be sized from a prior `encoded_size()` call, so a
/// `WriteFailed` error means the reported size was too small.
pub struct CursorMut<'a> {
    buffer: &'a mut [u8],
    offset: usize,
}

impl<'a> CursorMut<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    impl_write_be!(write_u8, u8, 1);
    impl_write_be!(write_i8, i8, 1);
    impl_write_be!(write_u16, u16, 2);
    impl_write_be!(write_i16, i16, 2);
    impl_write_be!(write_u32, u32, 4);
    impl_write_be!(write_i32, i32, 4);
    impl_write_be!(write_u64, u64, 8);
    impl_write_be!(write_i64, i64, 8);
    impl_write_be!(write_f32, f32, 4);
    impl_write_be!(write_f64, f64, 8);

    pub fn write_bool(&mut self, value: bool) -> PayloadResult<()> {
        self.write_u8(u8::from(value))
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> PayloadResult<()> {
        if self.offset + data.len() > self.buffer.len() {
            return Err(PayloadError::WriteFailed {
                offset: self.offset,
                reason: "buffer too small".into(),
            });
        }
        self.buffer[self.offset..self.offset + data.len()].copy_from_slice(data);
        self.offset += data.len();
        Ok(())
    }

    /// Write a `u32` length prefix followed by `data`.
    pub fn write_len_prefixed(&mut self, data: &[u8]) -> PayloadResult<()> {
        let len = u32::try_from(data.len()).map_err(|_| PayloadError::WriteFailed {
            offset: self.offset,
            reason: "field too long for u32 length prefix".into(),
        })?;
        if self.offset + LENGTH_PREFIX_SIZE + data.len() > self.buffer.len() {
            return Err(PayloadError::WriteFailed {
                offset: self.offset,
                reason: "buffer too small".into(),
            });
        }
        self.write_u32(len)?;
        self.write_bytes(data)
    }

    impl_cursor_common!();
}

/// Immutable cursor for reading (bounds-checked, zero-copy)
pub struct Cursor<'a> {
    buffer: &'a [u8],
    offset: usize,
    limits: CodecLimits,
}

impl<'a> Cursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self::with_limits(buffer, CodecLimits::default())
    }

    pub fn with_limits(buffer: &'a [u8], limits: CodecLimits) -> Self {
        Self {
            buffer,
            offset: 0,
            limits,
        }
    }

    impl_read_be!(read_u8, u8, 1);
    impl_read_be!(read_i8, i8, 1);
    impl_read_be!(read_u16, u16, 2);
    impl_read_be!(read_i16, i16, 2);
    impl_read_be!(read_u32, u32, 4);
    impl_read_be!(read_i32, i32, 4);
    impl_read_be!(read_u64, u64, 8);
    impl_read_be!(read_i64, i64, 8);
    impl_read_be!(read_f32, f32, 4);
    impl_read_be!(read_f64, f64, 8);

    /// Read a boolean; any byte other than 0 or 1 is rejected.
    pub fn read_bool(&mut self) -> PayloadResult<bool> {
        let offset = self.offset;
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(PayloadError::InvalidData {
                reason: format!("invalid bool byte {:#04X} at offset {}", other, offset),
            }),
        }
    }

    pub fn read_bytes(&mut self, len: usize) -> PayloadResult<&'a [u8]> {
        if self.offset + len > self.buffer.len() {
            return Err(PayloadError::ReadFailed {
                offset: self.offset,
                reason: "unexpected end of buffer".into(),
            });
        }
        let slice = &self.buffer[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    /// Read a `u32` length prefix and borrow the bytes that follow.
    pub fn read_len_prefixed(&mut self) -> PayloadResult<&'a [u8]> {
        let offset = self.offset;
        let len = self.read_u32()? as usize;
        if len > self.limits.max_length {
            return Err(PayloadError::InvalidData {
                reason: format!(
                    "length prefix {} at offset {} exceeds limit of {}",
                    len, offset, self.limits.max_length
                ),
            });
        }
        self.read_bytes(len)
    }

    impl_cursor_common!();

    pub fn limits(&self) -> CodecLimits {
        self.limits
    }

    pub fn is_eof(&self) -> bool {
        self.offset >= self.buffer.len()
    }
}
