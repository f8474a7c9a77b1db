//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2016 Arseny Kapoulkine (`meshoptimizer`, MIT)
//!
//! SPDX-License-Identifier: MIT
//!
//! Reference group decoder: one residual and one byte lane at a time.

use super::{GROUP_SIZE, Group, decode_lane};
use crate::error::Result;
use crate::mesh::varint::unzigzag8;

/// Unpack 16 residuals of `bits` width (2 or 4), most significant bits first.
///
/// An all-ones selector means the residual did not fit and is stored in the
/// overflow list that follows the selector bytes.
fn decode_packed(data: &[u8], bits: usize, group: &mut Group) -> usize {
    let header_size = GROUP_SIZE * bits / 8;
    let sentinel = (1u8 << bits) - 1;
    let mut overflow = header_size;

    for (i, value) in group.iter_mut().enumerate() {
        let byte = data[i * bits / 8];
        let shift = 8 - bits - (i * bits) % 8;
        let encoded = (byte >> shift) & sentinel;

        *value = if encoded == sentinel {
            let raw = data[overflow];
            overflow += 1;
            raw
        } else {
            encoded
        };
    }

    overflow
}

pub(super) fn decode_group(data: &[u8], bitslog2: u8, group: &mut Group) -> usize {
    match bitslog2 {
        0 => {
            group.fill(0);
            0
        }
        1 => decode_packed(data, 2, group),
        2 => decode_packed(data, 4, group),
        _ => {
            group.copy_from_slice(&data[..GROUP_SIZE]);
            GROUP_SIZE
        }
    }
}

/// Decode one block of `count` vertices into `block` (vertex-major).
pub(super) fn decode_block(
    data: &[u8],
    mut position: usize,
    count: usize,
    vertex_size: usize,
    last_vertex: &[u8],
    block: &mut [u8],
) -> Result<usize> {
    let mut lane = vec![0u8; count.next_multiple_of(GROUP_SIZE)];

    for k in 0..vertex_size {
        position = decode_lane(data, position, &mut lane, decode_group)?;

        let mut predicted = last_vertex[k];
        for (i, &residual) in lane[..count].iter().enumerate() {
            predicted = unzigzag8(residual).wrapping_add(predicted);
            block[i * vertex_size + k] = predicted;
        }
    }

    Ok(position)
}
