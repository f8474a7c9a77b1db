//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2016 Arseny Kapoulkine (`meshoptimizer`, MIT)
//!
//! SPDX-License-Identifier: MIT
//!
//! Vertex attribute stream decoder.
//!
//! Vertices are decoded in blocks. Inside a block every byte lane of the
//! vertex (byte `k` of each vertex) is stored separately as 16-byte groups of
//! zigzag residuals, each group packed at 0, 2, 4 or 8 bits per residual. A
//! residual is a delta against the previous vertex's byte in the same lane;
//! the first block is predicted from the vertex stored at the end of the
//! stream.
//!
//! Two interchangeable implementations decode the groups:
//!
//! - [`VertexDecodePath::Scalar`] handles one residual at a time
//! - [`VertexDecodePath::Wide`] handles a whole group as one 128-bit word and
//!   four lanes per predictor step
//!
//! Both produce identical output for every input.

mod scalar;
mod wide;

use crate::error::{Error, Result};

const FORMAT: &str = "vertex";

/// Header byte of a version 0 vertex stream.
pub const VERTEX_HEADER: u8 = 0xa0;

const BLOCK_SIZE_BYTES: usize = 8192;
const BLOCK_MAX_SIZE: usize = 256;
const GROUP_SIZE: usize = 16;

/// Bytes that must remain in the stream before any group is decoded.
///
/// A group never reads more than this (8 selector bytes + 16 overflow bytes),
/// so group decoding needs no further bounds checks.
pub(crate) const GROUP_DECODE_LIMIT: usize = 24;

/// Which group decoder to run. Output is identical either way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VertexDecodePath {
    /// One residual at a time.
    Scalar,
    /// Word-parallel group and predictor arithmetic.
    #[default]
    Wide,
}

/// Decoded group of 16 residuals.
pub(crate) type Group = [u8; GROUP_SIZE];

fn block_vertex_count(vertex_size: usize) -> usize {
    BLOCK_MAX_SIZE.min((BLOCK_SIZE_BYTES / vertex_size) & !(GROUP_SIZE - 1))
}

/// Decode one byte lane of a block: a 2-bit class header followed by the groups.
///
/// `lane.len()` is the block vertex count rounded up to 16. `decode_group`
/// receives the stream from the group start (at least [`GROUP_DECODE_LIMIT`]
/// bytes long) and returns how many bytes it consumed.
pub(crate) fn decode_lane(
    data: &[u8],
    mut position: usize,
    lane: &mut [u8],
    decode_group: fn(&[u8], u8, &mut Group) -> usize,
) -> Result<usize> {
    let group_count = lane.len() / GROUP_SIZE;
    let header_size = group_count.div_ceil(4);

    let header_end = position + header_size;
    if header_end > data.len() {
        return Err(Error::UnexpectedEof {
            format: FORMAT,
            offset: data.len(),
        });
    }
    let header = &data[position..header_end];
    position = header_end;

    for (group_index, group) in lane.chunks_exact_mut(GROUP_SIZE).enumerate() {
        if data.len() - position < GROUP_DECODE_LIMIT {
            return Err(Error::UnexpectedEof {
                format: FORMAT,
                offset: position,
            });
        }

        let bitslog2 = (header[group_index / 4] >> ((group_index % 4) * 2)) & 3;
        let group: &mut Group = group.try_into().map_err(|_| Error::UnexpectedEof {
            format: FORMAT,
            offset: position,
        })?;
        position += decode_group(&data[position..], bitslog2, group);
    }

    Ok(position)
}

/// Decode `vertex_count` vertices of `vertex_size` bytes from a compressed
/// vertex stream using the default path.
///
/// # Errors
///
/// - [`Error::InvalidVertexSize`] unless `vertex_size` is a multiple of 4 in `4..=256`
/// - [`Error::InvalidVertexCount`] when the output size overflows `usize`
/// - [`Error::BufferTooShort`] / [`Error::UnexpectedEof`] when the stream runs out
/// - [`Error::InvalidHeader`] / [`Error::UnsupportedVersion`] for other stream kinds
///
/// # Example
///
/// ```
/// use s2codec::mesh::decode_vertex_buffer;
///
/// let mut stream = vec![0xa0, 0x00];
/// stream.extend_from_slice(&[0u8; 24]);
/// stream.extend_from_slice(&[0u8; 4]);
/// let vertices = decode_vertex_buffer(1, 4, &stream)?;
/// assert_eq!(vertices, vec![0, 0, 0, 0]);
/// # Ok::<(), s2codec::Error>(())
/// ```
pub fn decode_vertex_buffer(vertex_count: usize, vertex_size: usize, buffer: &[u8]) -> Result<Vec<u8>> {
    decode_vertex_buffer_with(vertex_count, vertex_size, buffer, VertexDecodePath::default())
}

/// Decode a compressed vertex stream with an explicit group decoder.
///
/// # Errors
///
/// Same as [`decode_vertex_buffer`].
pub fn decode_vertex_buffer_with(
    vertex_count: usize,
    vertex_size: usize,
    buffer: &[u8],
    path: VertexDecodePath,
) -> Result<Vec<u8>> {
    tracing::debug!(
        "Vertex decode ({:?}): {} x {} bytes from {} bytes",
        path,
        vertex_count,
        vertex_size,
        buffer.len()
    );

    if vertex_size == 0 || vertex_size > 256 || vertex_size % 4 != 0 {
        return Err(Error::InvalidVertexSize { size: vertex_size });
    }
    if vertex_count == 0 {
        return Ok(Vec::new());
    }

    let output_len = vertex_count
        .checked_mul(vertex_size)
        .ok_or(Error::InvalidVertexCount {
            count: vertex_count,
            size: vertex_size,
        })?;

    // Every lane of every block starts with at least one header byte.
    let block_size = block_vertex_count(vertex_size);
    let needed = 1 + vertex_size * vertex_count.div_ceil(block_size).max(1);
    if buffer.len() < needed {
        tracing::debug!("Vertex stream rejected: {} < {} bytes", buffer.len(), needed);
        return Err(Error::BufferTooShort {
            format: FORMAT,
            needed,
            actual: buffer.len(),
        });
    }

    let header = buffer[0];
    if header & 0xf0 != VERTEX_HEADER {
        return Err(Error::InvalidHeader {
            format: FORMAT,
            expected: VERTEX_HEADER,
            found: header,
        });
    }
    let version = header & 0x0f;
    if version != 0 {
        return Err(Error::UnsupportedVersion {
            format: FORMAT,
            version,
        });
    }

    let data = &buffer[1..];
    let mut last_vertex = data[data.len() - vertex_size..].to_vec();

    let mut output = vec![0u8; output_len];
    let mut position = 0;

    for (block_index, block) in output.chunks_mut(block_size * vertex_size).enumerate() {
        let count = block.len() / vertex_size;
        tracing::trace!(
            "Vertex block {}: {} vertices at offset {}",
            block_index,
            count,
            position
        );

        position = match path {
            VertexDecodePath::Scalar => {
                scalar::decode_block(data, position, count, vertex_size, &last_vertex, block)?
            }
            VertexDecodePath::Wide => {
                wide::decode_block(data, position, count, vertex_size, &last_vertex, block)?
            }
        };

        last_vertex.copy_from_slice(&block[(count - 1) * vertex_size..]);
    }

    Ok(output)
}
