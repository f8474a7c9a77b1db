//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2016 Arseny Kapoulkine (`meshoptimizer`, MIT)
//!
//! SPDX-License-Identifier: MIT
//!
//! Triangle index stream decoder.
//!
//! ## Stream layout
//!
//! ```text
//! [0xE0 | version] [1 code byte per triangle] [vbyte data ...] [16-byte codeaux table]
//! ```
//!
//! Each code byte describes one triangle relative to two small caches: a
//! 16-entry FIFO of recently emitted edges and a 16-entry FIFO of recently
//! emitted vertices. Vertices that are neither cached nor the next unseen id
//! are coded explicitly as zigzag deltas against the last explicit vertex.
//!
//! Version 1 streams reserve code nibbles 13 and 14 for `last - 1` / `last + 1`.

use byteorder::{ByteOrder, LittleEndian};

use super::varint::{ByteReader, unzigzag32};
use crate::error::{Error, Result};

const FORMAT: &str = "index";

/// Format nibble of the header byte (`0xE0 | version`).
pub const INDEX_HEADER: u8 = 0xe0;

/// Highest index stream version this decoder understands.
pub const MAX_INDEX_VERSION: u8 = 1;

const CODEAUX_SIZE: usize = 16;

/// Width of each decoded index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSize {
    /// 16-bit indices (values are truncated).
    U16,
    /// 32-bit indices.
    U32,
}

impl IndexSize {
    /// Size of one index in bytes.
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            IndexSize::U16 => 2,
            IndexSize::U32 => 4,
        }
    }
}

impl TryFrom<usize> for IndexSize {
    type Error = Error;

    fn try_from(size: usize) -> Result<Self> {
        match size {
            2 => Ok(IndexSize::U16),
            4 => Ok(IndexSize::U32),
            _ => Err(Error::InvalidIndexSize { size }),
        }
    }
}

/// Ring of recently produced vertex ids.
struct VertexFifo {
    slots: [u32; 16],
    offset: usize,
}

impl VertexFifo {
    fn new() -> Self {
        Self {
            slots: [0; 16],
            offset: 0,
        }
    }

    /// `back` = 1 is the most recently pushed entry.
    #[inline]
    fn get(&self, back: usize) -> u32 {
        self.slots[self.offset.wrapping_sub(back) & 15]
    }

    /// The slot is always written; the cursor only moves when `advance` is set.
    #[inline]
    fn push(&mut self, v: u32, advance: bool) {
        self.slots[self.offset] = v;
        self.offset = (self.offset + usize::from(advance)) & 15;
    }
}

/// Ring of recently produced directed edges.
struct EdgeFifo {
    slots: [(u32, u32); 16],
    offset: usize,
}

impl EdgeFifo {
    fn new() -> Self {
        Self {
            slots: [(0, 0); 16],
            offset: 0,
        }
    }

    #[inline]
    fn get(&self, back: usize) -> (u32, u32) {
        self.slots[self.offset.wrapping_sub(back) & 15]
    }

    #[inline]
    fn push(&mut self, a: u32, b: u32) {
        self.slots[self.offset] = (a, b);
        self.offset = (self.offset + 1) & 15;
    }
}

/// Per-call decoder state. Nothing survives past one [`decode_index_buffer`] call.
struct IndexDecoder<'a> {
    vertices: VertexFifo,
    edges: EdgeFifo,
    next: u32,
    last: u32,
    data: ByteReader<'a>,
}

impl<'a> IndexDecoder<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            vertices: VertexFifo::new(),
            edges: EdgeFifo::new(),
            next: 0,
            last: 0,
            data: ByteReader::new(data, FORMAT),
        }
    }

    /// Decode an explicitly coded vertex and make it the new delta base.
    fn read_explicit(&mut self) -> Result<u32> {
        let v = self.data.read_vbyte()?;
        self.last = self.last.wrapping_add(unzigzag32(v));
        Ok(self.last)
    }

    /// `0x00..=0xEF`: reuse a cached edge, resolve the third vertex from the code's low nibble.
    fn edge_triangle(&mut self, codetri: u8, fecmax: u8) -> Result<[u32; 3]> {
        let fe = usize::from(codetri >> 4);
        let (a, b) = self.edges.get(1 + fe);
        let fec = codetri & 15;

        let c = if fec < fecmax {
            let fresh = fec == 0;
            let c = if fresh {
                self.next
            } else {
                self.vertices.get(1 + usize::from(fec))
            };
            self.next = self.next.wrapping_add(u32::from(fresh));
            self.vertices.push(c, fresh);
            c
        } else {
            let c = if fec == 15 {
                self.read_explicit()?
            } else {
                // 13 => last - 1, 14 => last + 1
                let delta = i32::from(fec) - i32::from(fec ^ 3);
                self.last = self.last.wrapping_add(delta as u32);
                self.last
            };
            self.vertices.push(c, true);
            c
        };

        self.edges.push(c, b);
        self.edges.push(a, c);
        Ok([a, b, c])
    }

    /// `0xF0..=0xFD`: a restart with one fresh vertex plus two selectors from the codeaux table.
    fn table_triangle(&mut self, codeaux: u8) -> [u32; 3] {
        let feb = codeaux >> 4;
        let fec = codeaux & 15;

        let a = self.next;
        self.next = self.next.wrapping_add(1);

        let b = if feb == 0 {
            self.next
        } else {
            self.vertices.get(usize::from(feb))
        };
        self.next = self.next.wrapping_add(u32::from(feb == 0));

        let c = if fec == 0 {
            self.next
        } else {
            self.vertices.get(usize::from(fec))
        };
        self.next = self.next.wrapping_add(u32::from(fec == 0));

        self.vertices.push(a, true);
        self.vertices.push(b, feb == 0);
        self.vertices.push(c, fec == 0);
        self.push_triangle_edges(a, b, c);
        [a, b, c]
    }

    /// `0xFE` / `0xFF`: fully described triangle, selectors in the next data byte.
    fn free_triangle(&mut self, codetri: u8) -> Result<[u32; 3]> {
        let codeaux = self.data.read_u8()?;
        let fea = if codetri == 0xfe { 0 } else { 15 };
        let feb = codeaux >> 4;
        let fec = codeaux & 15;

        if codeaux == 0 {
            self.next = 0;
        }

        let mut a = if fea == 0 { self.take_next() } else { 0 };
        let mut b = if feb == 0 {
            self.take_next()
        } else {
            self.vertices.get(usize::from(feb))
        };
        let mut c = if fec == 0 {
            self.take_next()
        } else {
            self.vertices.get(usize::from(fec))
        };

        if fea == 15 {
            a = self.read_explicit()?;
        }
        if feb == 15 {
            b = self.read_explicit()?;
        }
        if fec == 15 {
            c = self.read_explicit()?;
        }

        self.vertices.push(a, true);
        self.vertices.push(b, feb == 0 || feb == 15);
        self.vertices.push(c, fec == 0 || fec == 15);
        self.push_triangle_edges(a, b, c);
        Ok([a, b, c])
    }

    #[inline]
    fn take_next(&mut self) -> u32 {
        let v = self.next;
        self.next = self.next.wrapping_add(1);
        v
    }

    #[inline]
    fn push_triangle_edges(&mut self, a: u32, b: u32, c: u32) {
        self.edges.push(b, a);
        self.edges.push(c, b);
        self.edges.push(a, c);
    }
}

/// Decode a compressed index stream into `index_count` little-endian indices
/// of `index_size` bytes each.
///
/// # Errors
///
/// - [`Error::InvalidIndexCount`] / [`Error::InvalidIndexSize`] for bad shape parameters
/// - [`Error::BufferTooShort`], [`Error::InvalidHeader`], [`Error::UnsupportedVersion`]
///   for a stream that cannot be this format
/// - [`Error::UnexpectedEof`] / [`Error::TrailingData`] when the vbyte data region
///   is not consumed exactly
///
/// # Example
///
/// ```
/// use s2codec::mesh::decode_index_buffer;
///
/// let stream = [
///     0xe0, 0xf0, 0x10, 0xfe, 0xff, 0xf0, 0x0c, 0xff, 0x02, 0x02, 0x02, 0x00, 0x76, 0x87,
///     0x56, 0x67, 0x78, 0xa9, 0x86, 0x65, 0x89, 0x68, 0x98, 0x01, 0x69, 0x00, 0x00,
/// ];
/// let bytes = decode_index_buffer(12, 2, &stream)?;
/// assert_eq!(bytes.len(), 24);
/// # Ok::<(), s2codec::Error>(())
/// ```
pub fn decode_index_buffer(index_count: usize, index_size: usize, buffer: &[u8]) -> Result<Vec<u8>> {
    if index_count % 3 != 0 {
        return Err(Error::InvalidIndexCount { count: index_count });
    }
    let size = IndexSize::try_from(index_size)?;

    let triangles = decode_triangles(index_count, buffer)?;

    let width = size.bytes();
    let mut output = vec![0u8; index_count * width];
    for (chunk, &index) in output.chunks_exact_mut(width).zip(&triangles) {
        match size {
            IndexSize::U16 => LittleEndian::write_u16(chunk, index as u16),
            IndexSize::U32 => LittleEndian::write_u32(chunk, index),
        }
    }
    Ok(output)
}

/// Decode a compressed index stream straight into 32-bit indices.
///
/// # Errors
///
/// Same as [`decode_index_buffer`].
pub fn decode_index_buffer_u32(index_count: usize, buffer: &[u8]) -> Result<Vec<u32>> {
    if index_count % 3 != 0 {
        return Err(Error::InvalidIndexCount { count: index_count });
    }
    decode_triangles(index_count, buffer)
}

fn decode_triangles(index_count: usize, buffer: &[u8]) -> Result<Vec<u32>> {
    tracing::debug!(
        "Index decode: {} indices from {} bytes",
        index_count,
        buffer.len()
    );

    if index_count == 0 {
        return Ok(Vec::new());
    }

    let triangle_count = index_count / 3;
    let data_offset = 1 + triangle_count;
    let needed = data_offset + CODEAUX_SIZE;
    if buffer.len() < needed {
        tracing::debug!("Index stream rejected: {} < {} bytes", buffer.len(), needed);
        return Err(Error::BufferTooShort {
            format: FORMAT,
            needed,
            actual: buffer.len(),
        });
    }

    let header = buffer[0];
    if header & 0xf0 != INDEX_HEADER {
        return Err(Error::InvalidHeader {
            format: FORMAT,
            expected: INDEX_HEADER,
            found: header,
        });
    }
    let version = header & 0x0f;
    if version > MAX_INDEX_VERSION {
        return Err(Error::UnsupportedVersion {
            format: FORMAT,
            version,
        });
    }

    let fecmax = if version >= 1 { 13 } else { 15 };
    let codes = &buffer[1..data_offset];
    let data = &buffer[data_offset..buffer.len() - CODEAUX_SIZE];
    let codeaux_table = &buffer[buffer.len() - CODEAUX_SIZE..];

    let mut decoder = IndexDecoder::new(data);
    let mut indices = Vec::with_capacity(index_count);

    for &codetri in codes {
        let triangle = if codetri < 0xf0 {
            decoder.edge_triangle(codetri, fecmax)?
        } else if codetri < 0xfe {
            decoder.table_triangle(codeaux_table[usize::from(codetri & 15)])
        } else {
            decoder.free_triangle(codetri)?
        };
        indices.extend_from_slice(&triangle);
    }

    if decoder.data.remaining() != 0 {
        return Err(Error::TrailingData {
            format: FORMAT,
            consumed: data_offset + decoder.data.position(),
            expected: buffer.len() - CODEAUX_SIZE,
        });
    }

    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const INDEX_DATA_V0: [u8; 27] = [
        0xe0, 0xf0, 0x10, 0xfe, 0xff, 0xf0, 0x0c, 0xff, 0x02, 0x02, 0x02, 0x00, 0x76, 0x87, 0x56,
        0x67, 0x78, 0xa9, 0x86, 0x65, 0x89, 0x68, 0x98, 0x01, 0x69, 0x00, 0x00,
    ];

    const INDEX_DATA_V1: [u8; 24] = [
        0xe1, 0xf0, 0x10, 0xfe, 0x1f, 0x3d, 0x00, 0x0a, 0x00, 0x76, 0x87, 0x56, 0x67, 0x78, 0xa9,
        0x86, 0x65, 0x89, 0x68, 0x98, 0x01, 0x69, 0x00, 0x00,
    ];

    fn decode_u32(count: usize, buffer: &[u8]) -> Vec<u32> {
        decode_index_buffer_u32(count, buffer).unwrap()
    }

    #[test]
    fn test_decode_v0() {
        assert_eq!(
            decode_u32(12, &INDEX_DATA_V0),
            vec![0, 1, 2, 2, 1, 3, 4, 6, 5, 7, 8, 9]
        );
    }

    #[test]
    fn test_decode_v1() {
        assert_eq!(
            decode_u32(15, &INDEX_DATA_V1),
            vec![0, 1, 2, 2, 1, 3, 0, 1, 2, 2, 1, 5, 2, 1, 4]
        );
    }

    #[test]
    fn test_v1_header_accepts_v0_codes() {
        let mut stream = INDEX_DATA_V0;
        stream[0] = 0xe1;
        assert_eq!(
            decode_u32(12, &stream),
            vec![0, 1, 2, 2, 1, 3, 4, 6, 5, 7, 8, 9]
        );
    }

    #[test]
    fn test_three_edges() {
        let stream = [
            0xe1, 0xf0, 0x20, 0x30, 0x40, 0x00, 0x76, 0x87, 0x56, 0x67, 0x78, 0xa9, 0x86, 0x65,
            0x89, 0x68, 0x98, 0x01, 0x69, 0x00, 0x00,
        ];
        assert_eq!(
            decode_u32(12, &stream),
            vec![0, 1, 2, 1, 0, 3, 2, 1, 4, 0, 2, 5]
        );
    }

    #[test]
    fn test_u16_output_layout() {
        let bytes = decode_index_buffer(12, 2, &INDEX_DATA_V0).unwrap();
        assert_eq!(bytes.len(), 24);
        assert_eq!(&bytes[..6], &[0, 0, 1, 0, 2, 0]);
        assert_eq!(&bytes[22..], &[9, 0]);
    }

    #[test]
    fn test_u32_output_layout() {
        let bytes = decode_index_buffer(12, 4, &INDEX_DATA_V0).unwrap();
        assert_eq!(bytes.len(), 48);
        assert_eq!(&bytes[44..], &[9, 0, 0, 0]);
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(matches!(
            decode_index_buffer(10, 4, &INDEX_DATA_V0),
            Err(Error::InvalidIndexCount { count: 10 })
        ));
        assert!(matches!(
            decode_index_buffer(12, 3, &INDEX_DATA_V0),
            Err(Error::InvalidIndexSize { size: 3 })
        ));
    }

    #[test]
    fn test_zero_indices() {
        assert!(decode_index_buffer(0, 2, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_header_errors() {
        let mut stream = INDEX_DATA_V0;
        stream[0] = 0xa0;
        assert!(matches!(
            decode_index_buffer(12, 4, &stream),
            Err(Error::InvalidHeader { found: 0xa0, .. })
        ));

        stream[0] = 0xe2;
        assert!(matches!(
            decode_index_buffer(12, 4, &stream),
            Err(Error::UnsupportedVersion { version: 2, .. })
        ));
    }

    #[test]
    fn test_too_short() {
        let err = decode_index_buffer(12, 4, &INDEX_DATA_V0[..20]).unwrap_err();
        assert!(matches!(
            err,
            Error::BufferTooShort {
                needed: 21,
                actual: 20,
                ..
            }
        ));
        assert!(err.is_malformed_input());
    }

    #[test]
    fn test_truncated_data_region() {
        // Drop the last vbyte data byte but keep the codeaux table intact.
        let mut stream = INDEX_DATA_V0[..10].to_vec();
        stream.extend_from_slice(&INDEX_DATA_V0[11..]);
        let err = decode_index_buffer(12, 4, &stream).unwrap_err();
        assert!(err.is_malformed_input());
    }

    #[test]
    fn test_trailing_data() {
        let mut stream = INDEX_DATA_V0[..11].to_vec();
        stream.push(0x00);
        stream.extend_from_slice(&INDEX_DATA_V0[11..]);
        assert!(matches!(
            decode_index_buffer(12, 4, &stream),
            Err(Error::TrailingData { consumed: 11, expected: 12, .. })
        ));
    }

    #[test]
    fn test_deterministic() {
        let first = decode_index_buffer(15, 4, &INDEX_DATA_V1).unwrap();
        let second = decode_index_buffer(15, 4, &INDEX_DATA_V1).unwrap();
        assert_eq!(first, second);
    }
}
