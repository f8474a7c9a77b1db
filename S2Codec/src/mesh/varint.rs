//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2016 Arseny Kapoulkine (`meshoptimizer`, MIT)
//!
//! SPDX-License-Identifier: MIT
//!
//! Bounds-checked byte reading plus the vbyte and zigzag primitives shared
//! by the index and meshlet decoders.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// Forward-only reader over one region of a compressed stream.
///
/// Every read is checked against the region; running off the end is an
/// [`Error::UnexpectedEof`] tagged with the stream kind.
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    position: usize,
    format: &'static str,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8], format: &'static str) -> Self {
        Self {
            data,
            position: 0,
            format,
        }
    }

    #[inline]
    pub(crate) fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    #[inline]
    pub(crate) fn read_u8(&mut self) -> Result<u8> {
        let byte = *self.data.get(self.position).ok_or(Error::UnexpectedEof {
            format: self.format,
            offset: self.position,
        })?;
        self.position += 1;
        Ok(byte)
    }

    /// Borrow the next `len` bytes and advance past them.
    pub(crate) fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .position
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(Error::UnexpectedEof {
                format: self.format,
                offset: self.position,
            })?;
        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    /// Read a little-endian integer of `len` bytes (0..=4). Zero bytes reads as 0.
    pub(crate) fn read_uint_le(&mut self, len: usize) -> Result<u32> {
        if len == 0 {
            return Ok(0);
        }
        let bytes = self.take(len)?;
        Ok(LittleEndian::read_uint(bytes, len) as u32)
    }

    /// Read a vbyte: 7 payload bits per byte, high bit set means another byte
    /// follows, at most five bytes in total.
    pub(crate) fn read_vbyte(&mut self) -> Result<u32> {
        let lead = self.read_u8()?;
        if lead < 128 {
            return Ok(u32::from(lead));
        }

        let mut result = u32::from(lead & 127);
        let mut shift = 7;
        for _ in 0..4 {
            let group = self.read_u8()?;
            result |= u32::from(group & 127) << shift;
            shift += 7;
            if group < 128 {
                break;
            }
        }
        Ok(result)
    }
}

/// Map a zigzag-encoded value back to a signed delta (two's complement).
#[inline]
pub(crate) fn unzigzag32(v: u32) -> u32 {
    (v >> 1) ^ (v & 1).wrapping_neg()
}

/// Byte-sized zigzag decode used for vertex residuals.
#[inline]
pub(crate) fn unzigzag8(v: u8) -> u8 {
    (v >> 1) ^ (v & 1).wrapping_neg()
}
