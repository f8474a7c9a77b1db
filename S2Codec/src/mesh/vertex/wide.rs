//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2016 Arseny Kapoulkine (`meshoptimizer`, MIT)
//!
//! SPDX-License-Identifier: MIT
//!
//! Word-parallel group decoder.
//!
//! A group is handled as a single `u128` (one residual per byte): selectors
//! are unpacked, sentinel lanes are found with a byte mask, and the overflow
//! bytes are gathered through a precomputed shuffle table. Zigzag decoding is
//! done on all 16 residuals at once and the rolling predictor advances four
//! byte lanes per step in a `u32`.

use super::{GROUP_SIZE, Group, decode_lane};
use crate::error::Result;

const ONES: u128 = u128::from_le_bytes([0x01; 16]);
const LOW7: u128 = u128::from_le_bytes([0x7f; 16]);

/// For every 8-lane sentinel mask: the overflow slot each set lane reads.
static SHUFFLE: [[u8; 8]; 256] = build_shuffle();

const fn build_shuffle() -> [[u8; 8]; 256] {
    let mut table = [[0u8; 8]; 256];
    let mut mask = 0;
    while mask < 256 {
        let mut rank = 0;
        let mut lane = 0;
        while lane < 8 {
            if mask & (1 << lane) != 0 {
                table[mask][lane] = rank;
                rank += 1;
            }
            lane += 1;
        }
        mask += 1;
    }
    table
}

/// Spread packed selectors (most significant first) into one byte per lane.
fn unpack_selectors(header: &[u8], bits: usize) -> u128 {
    let per_byte = 8 / bits;
    let field = (1u8 << bits) - 1;
    let mut lanes = [0u8; GROUP_SIZE];
    for (i, lane) in lanes.iter_mut().enumerate() {
        let shift = 8 - bits - (i % per_byte) * bits;
        *lane = (header[i / per_byte] >> shift) & field;
    }
    u128::from_le_bytes(lanes)
}

/// `0x01` in every lane whose selector has all `bits` bits set.
fn sentinel_lanes(selectors: u128, bits: usize) -> u128 {
    let mut all_set = selectors;
    for shift in 1..bits {
        all_set &= selectors >> shift;
    }
    all_set & ONES
}

/// One bit per lane, lane 0 in bit 0.
fn lane_bits(lanes: u128) -> u16 {
    lanes
        .to_le_bytes()
        .iter()
        .enumerate()
        .fold(0, |acc, (i, &b)| acc | (u16::from(b & 1) << i))
}

fn gather(overflow: &[u8], mask: u16) -> (u128, usize) {
    let low = (mask & 0xff) as usize;
    let high = (mask >> 8) as usize;
    let low_count = low.count_ones() as usize;

    let mut lanes = [0u8; GROUP_SIZE];
    for (lane, slot) in lanes[..8].iter_mut().zip(SHUFFLE[low]) {
        *lane = overflow[usize::from(slot)];
    }
    for (lane, slot) in lanes[8..].iter_mut().zip(SHUFFLE[high]) {
        *lane = overflow[low_count + usize::from(slot)];
    }
    (u128::from_le_bytes(lanes), low_count + high.count_ones() as usize)
}

fn decode_packed(data: &[u8], bits: usize) -> (u128, usize) {
    let header_size = GROUP_SIZE * bits / 8;
    let selectors = unpack_selectors(&data[..header_size], bits);
    let sentinels = sentinel_lanes(selectors, bits);

    let overflow = &data[header_size..header_size + GROUP_SIZE];
    let (gathered, used) = gather(overflow, lane_bits(sentinels));

    let select = sentinels * 0xff;
    ((selectors & !select) | (gathered & select), header_size + used)
}

/// Zigzag decode 16 bytes at once.
#[inline]
fn unzigzag_lanes(v: u128) -> u128 {
    let negate = (v & ONES) * 0xff;
    let magnitude = (v >> 1) & LOW7;
    negate ^ magnitude
}

/// Decode a group into zigzag-decoded deltas.
pub(super) fn decode_group(data: &[u8], bitslog2: u8, group: &mut Group) -> usize {
    let (residuals, used) = match bitslog2 {
        0 => (0, 0),
        1 => decode_packed(data, 2),
        2 => decode_packed(data, 4),
        _ => {
            let mut raw = [0u8; GROUP_SIZE];
            raw.copy_from_slice(&data[..GROUP_SIZE]);
            (u128::from_le_bytes(raw), GROUP_SIZE)
        }
    };
    *group = unzigzag_lanes(residuals).to_le_bytes();
    used
}

/// Add four byte lanes without carries between them.
#[inline]
fn add_bytes(a: u32, b: u32) -> u32 {
    ((a & 0x7f7f7f7f) + (b & 0x7f7f7f7f)) ^ ((a ^ b) & 0x80808080)
}

/// Decode one block four byte lanes at a time.
pub(super) fn decode_block(
    data: &[u8],
    mut position: usize,
    count: usize,
    vertex_size: usize,
    last_vertex: &[u8],
    block: &mut [u8],
) -> Result<usize> {
    let aligned = count.next_multiple_of(GROUP_SIZE);
    let mut lanes = vec![0u8; aligned * 4];

    for k in (0..vertex_size).step_by(4) {
        for lane in lanes.chunks_exact_mut(aligned) {
            position = decode_lane(data, position, lane, decode_group)?;
        }

        let mut predicted = u32::from_le_bytes([
            last_vertex[k],
            last_vertex[k + 1],
            last_vertex[k + 2],
            last_vertex[k + 3],
        ]);
        for i in 0..count {
            let delta = u32::from_le_bytes([
                lanes[i],
                lanes[aligned + i],
                lanes[2 * aligned + i],
                lanes[3 * aligned + i],
            ]);
            predicted = add_bytes(predicted, delta);
            let offset = i * vertex_size + k;
            block[offset..offset + 4].copy_from_slice(&predicted.to_le_bytes());
        }
    }

    Ok(position)
}
