//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2016 Arseny Kapoulkine (`meshoptimizer`, MIT)
//!
//! SPDX-License-Identifier: MIT
//!
//! Meshlet stream decoder (vertex reference list plus micro-index triangles).
//!
//! ## Stream layout
//!
//! ```text
//! [data ...] [zero gap] [ctrl: 1 byte / 4 vertices] [codes: 1 nibble / triangle]
//! ```
//!
//! The two control tables sit at the end of the buffer and are padded in
//! front to at least 16 bytes together.

use byteorder::{ByteOrder, LittleEndian};

use super::varint::{ByteReader, unzigzag32};
use crate::error::{Error, Result};

const FORMAT: &str = "meshlet";

/// Maximum vertex and triangle count of one meshlet.
pub const MESHLET_MAX: usize = 256;

/// Output width of a meshlet vertex reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MeshletVertexSize {
    /// Little-endian `u16`.
    U16,
    /// Little-endian `u32`.
    #[default]
    U32,
}

impl TryFrom<usize> for MeshletVertexSize {
    type Error = usize;

    fn try_from(size: usize) -> std::result::Result<Self, usize> {
        match size {
            2 => Ok(Self::U16),
            4 => Ok(Self::U32),
            other => Err(other),
        }
    }
}

/// Output layout of a meshlet triangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MeshletTriangleSize {
    /// Three bytes `a, b, c`.
    Bytes3,
    /// One little-endian `u32`: `a | b << 8 | c << 16`.
    #[default]
    Packed4,
}

impl TryFrom<usize> for MeshletTriangleSize {
    type Error = usize;

    fn try_from(size: usize) -> std::result::Result<Self, usize> {
        match size {
            3 => Ok(Self::Bytes3),
            4 => Ok(Self::Packed4),
            other => Err(other),
        }
    }
}

/// Result of [`decode_meshlet`]: both arrays in their requested layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMeshlet {
    /// `vertex_count * vertex_size` bytes.
    pub vertices: Vec<u8>,
    /// `triangle_count * triangle_size` bytes.
    pub triangles: Vec<u8>,
}

/// Decode a meshlet into byte buffers of the requested element sizes.
///
/// # Errors
///
/// - [`Error::InvalidMeshletCounts`] / [`Error::InvalidMeshletSizes`] for bad shape parameters
/// - [`Error::BufferTooShort`], [`Error::UnexpectedEof`], [`Error::TrailingData`]
///   for a damaged stream
pub fn decode_meshlet(
    vertex_count: usize,
    vertex_size: usize,
    triangle_count: usize,
    triangle_size: usize,
    buffer: &[u8],
) -> Result<DecodedMeshlet> {
    let (Ok(vertex_layout), Ok(triangle_layout)) = (
        MeshletVertexSize::try_from(vertex_size),
        MeshletTriangleSize::try_from(triangle_size),
    ) else {
        return Err(Error::InvalidMeshletSizes {
            vertex_size,
            triangle_size,
        });
    };

    let (vertex_ids, packed_triangles) = decode_meshlet_raw(vertex_count, triangle_count, buffer)?;

    let vertices = match vertex_layout {
        MeshletVertexSize::U16 => {
            let mut out = vec![0u8; vertex_ids.len() * 2];
            for (chunk, &v) in out.chunks_exact_mut(2).zip(&vertex_ids) {
                LittleEndian::write_u16(chunk, v as u16);
            }
            out
        }
        MeshletVertexSize::U32 => {
            let mut out = vec![0u8; vertex_ids.len() * 4];
            LittleEndian::write_u32_into(&vertex_ids, &mut out);
            out
        }
    };

    let triangles = match triangle_layout {
        MeshletTriangleSize::Bytes3 => packed_triangles
            .iter()
            .flat_map(|&t| [t as u8, (t >> 8) as u8, (t >> 16) as u8])
            .collect(),
        MeshletTriangleSize::Packed4 => {
            let mut out = vec![0u8; packed_triangles.len() * 4];
            LittleEndian::write_u32_into(&packed_triangles, &mut out);
            out
        }
    };

    Ok(DecodedMeshlet {
        vertices,
        triangles,
    })
}

/// Decode a meshlet into vertex ids and packed triangles (`a | b << 8 | c << 16`).
///
/// # Errors
///
/// Same as [`decode_meshlet`], minus the size checks.
pub fn decode_meshlet_raw(
    vertex_count: usize,
    triangle_count: usize,
    buffer: &[u8],
) -> Result<(Vec<u32>, Vec<u32>)> {
    tracing::debug!(
        "Meshlet decode: {} vertices, {} triangles from {} bytes",
        vertex_count,
        triangle_count,
        buffer.len()
    );

    if vertex_count > MESHLET_MAX || triangle_count > MESHLET_MAX {
        return Err(Error::InvalidMeshletCounts {
            vertices: vertex_count,
            triangles: triangle_count,
        });
    }

    let codes_size = triangle_count.div_ceil(2);
    let ctrl_size = vertex_count.div_ceil(4);
    let gap_size = 16usize.saturating_sub(codes_size + ctrl_size);
    let needed = codes_size + ctrl_size + gap_size;
    if buffer.len() < needed {
        tracing::debug!("Meshlet stream rejected: {} < {} bytes", buffer.len(), needed);
        return Err(Error::BufferTooShort {
            format: FORMAT,
            needed,
            actual: buffer.len(),
        });
    }

    let end = buffer.len();
    let codes = &buffer[end - codes_size..];
    let ctrl = &buffer[end - codes_size - ctrl_size..end - codes_size];
    let bound = end - needed;

    // The reader stops at the gap, so the data stream can never run into the tables.
    let mut data = ByteReader::new(&buffer[..bound], FORMAT);
    let vertices = decode_vertices(&mut data, ctrl, vertex_count)?;
    let triangles = decode_triangles(&mut data, codes, triangle_count)?;

    if data.position() != bound {
        return Err(Error::TrailingData {
            format: FORMAT,
            consumed: data.position(),
            expected: bound,
        });
    }

    Ok((vertices, triangles))
}

fn decode_vertices(data: &mut ByteReader<'_>, ctrl: &[u8], count: usize) -> Result<Vec<u32>> {
    let mut vertices = Vec::with_capacity(count);
    let mut last = u32::MAX;

    for (group, &lengths) in ctrl.iter().enumerate() {
        for k in 0..4 {
            let length = if lengths == 0xff {
                4
            } else {
                usize::from(((lengths >> k) & 1) | ((lengths >> (k + 3)) & 2))
            };
            let delta = unzigzag32(data.read_uint_le(length)?);
            last = last.wrapping_add(delta).wrapping_add(1);

            if group * 4 + k < count {
                vertices.push(last);
            }
        }
    }

    Ok(vertices)
}

fn decode_triangles(data: &mut ByteReader<'_>, codes: &[u8], count: usize) -> Result<Vec<u32>> {
    let mut triangles = Vec::with_capacity(count);
    // Packed as `c | a << 8 | b << 16 | c << 24` so any edge is a 16-bit window.
    let mut fifo = [0u32; 3];
    let mut next = 0u32;

    let mut take_vertex = |data: &mut ByteReader<'_>, explicit: bool| -> Result<u32> {
        if explicit {
            Ok(u32::from(data.read_u8()?))
        } else {
            let v = next;
            next += 1;
            Ok(v)
        }
    };

    for i in 0..count {
        let code = (codes[i / 2] >> ((i & 1) * 4)) & 0x0f;

        let packed = if code < 12 {
            let edge = fifo[usize::from(code / 4)] >> ((code << 3) & 16);
            let c = take_vertex(data, code & 1 != 0)?;
            ((edge & 0xff) << 16) | (edge & 0xff00) | c | (c << 24)
        } else {
            let a = take_vertex(data, code > 12)?;
            let b = take_vertex(data, code > 13)?;
            let c = take_vertex(data, code > 14)?;
            c | (a << 8) | (b << 16) | (c << 24)
        };

        triangles.push((packed >> 8) & 0x00ff_ffff);
        fifo = [packed, fifo[0], fifo[1]];
    }

    Ok(triangles)
}
