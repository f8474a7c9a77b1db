//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2021 Sergii Kudlai (`bcdec`, MIT)
//!
//! SPDX-License-Identifier: MIT
//!
//! BC7 block decoder.
//!
//! The mode is the position of the lowest set bit of the first byte. Every
//! mode is described by a [`ModeInfo`] row and decoded by the same routine;
//! fields are read in this order after the mode bits:
//!
//! 1. partition, rotation, index selection
//! 2. color endpoints (channel-major), then alpha endpoints
//! 3. P-bits (one per endpoint, or one per subset)
//! 4. primary indices, then secondary indices

use super::block::Block;
use super::tables::{interpolate, is_anchor, subset_of, weights};
use crate::error::{Error, Result};

const FORMAT: &str = "BC7";

/// Field widths of one BC7 mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ModeInfo {
    pub subsets: usize,
    pub partition_bits: u32,
    pub rotation_bits: u32,
    pub index_selection_bits: u32,
    pub color_bits: u32,
    pub alpha_bits: u32,
    pub endpoint_pbits: bool,
    pub shared_pbits: bool,
    pub index_bits: u32,
    pub index2_bits: u32,
}

const fn mode(
    subsets: usize,
    partition_bits: u32,
    rotation_bits: u32,
    index_selection_bits: u32,
    color_bits: u32,
    alpha_bits: u32,
    endpoint_pbits: bool,
    shared_pbits: bool,
    index_bits: u32,
    index2_bits: u32,
) -> ModeInfo {
    ModeInfo {
        subsets,
        partition_bits,
        rotation_bits,
        index_selection_bits,
        color_bits,
        alpha_bits,
        endpoint_pbits,
        shared_pbits,
        index_bits,
        index2_bits,
    }
}

#[rustfmt::skip]
pub(crate) static MODES: [ModeInfo; 8] = [
    //   sub part rot isb  rgb  a  ep_p   sh_p   idx idx2
    mode(3,  4,   0,  0,   4,   0, true,  false, 3,  0),
    mode(2,  6,   0,  0,   6,   0, false, true,  3,  0),
    mode(3,  6,   0,  0,   5,   0, false, false, 2,  0),
    mode(2,  6,   0,  0,   7,   0, true,  false, 2,  0),
    mode(1,  0,   2,  1,   5,   6, false, false, 2,  3),
    mode(1,  0,   2,  0,   7,   8, false, false, 2,  2),
    mode(1,  0,   0,  0,   7,   7, true,  false, 4,  0),
    mode(2,  6,   0,  0,   5,   5, true,  false, 2,  0),
];

impl ModeInfo {
    fn has_pbits(&self) -> bool {
        self.endpoint_pbits || self.shared_pbits
    }

    /// Total declared field width including the mode prefix.
    pub(crate) fn total_bits(&self, mode: u32) -> u32 {
        let subsets = self.subsets as u32;
        let endpoints = 2 * subsets;
        let mut total = mode + 1;
        total += self.partition_bits + self.rotation_bits + self.index_selection_bits;
        total += endpoints * (3 * self.color_bits + self.alpha_bits);
        if self.endpoint_pbits {
            total += endpoints;
        }
        if self.shared_pbits {
            total += subsets;
        }
        total += 16 * self.index_bits - subsets;
        if self.index2_bits > 0 {
            total += 16 * self.index2_bits - 1;
        }
        total
    }
}

/// Expand a quantized component (plus optional P-bit) to 8 bits by bit replication.
#[inline]
fn unquantize(value: u32, bits: u32, pbit: Option<u32>) -> u16 {
    let (value, bits) = match pbit {
        Some(p) => ((value << 1) | p, bits + 1),
        None => (value, bits),
    };
    let shifted = value << (8 - bits);
    ((shifted | (shifted >> bits)) & 0xff) as u16
}

/// Decode one block into 16 RGBA pixels (row-major).
pub(crate) fn decode_block(bytes: &[u8; 16]) -> Result<[[u8; 4]; 16]> {
    let block = Block::from_bytes(bytes);
    let Some(mode) = (0..8).find(|&p| block.bit(p) == 1) else {
        return Err(Error::InvalidBlockMode {
            format: FORMAT,
            mode: bytes[0],
        });
    };

    let info = &MODES[mode as usize];
    let mut reader = block.reader();
    reader.skip(mode + 1);

    let partition = reader.read(info.partition_bits) as usize;
    let rotation = reader.read(info.rotation_bits) as usize;
    let index_selection = reader.read(info.index_selection_bits) != 0;

    let endpoint_count = 2 * info.subsets;
    let mut raw = [[0u32; 4]; 6];
    for channel in 0..3 {
        for endpoint in &mut raw[..endpoint_count] {
            endpoint[channel] = reader.read(info.color_bits);
        }
    }
    if info.alpha_bits > 0 {
        for endpoint in &mut raw[..endpoint_count] {
            endpoint[3] = reader.read(info.alpha_bits);
        }
    }

    let mut pbits = [0u32; 6];
    if info.endpoint_pbits {
        for p in &mut pbits[..endpoint_count] {
            *p = reader.read(1);
        }
    }
    if info.shared_pbits {
        for pair in pbits[..endpoint_count].chunks_exact_mut(2) {
            let p = reader.read(1);
            pair.fill(p);
        }
    }

    let mut endpoints = [[0u16; 4]; 6];
    for (e, endpoint) in endpoints[..endpoint_count].iter_mut().enumerate() {
        let pbit = info.has_pbits().then_some(pbits[e]);
        for channel in 0..3 {
            endpoint[channel] = unquantize(raw[e][channel], info.color_bits, pbit);
        }
        endpoint[3] = if info.alpha_bits > 0 {
            unquantize(raw[e][3], info.alpha_bits, pbit)
        } else {
            255
        };
    }

    let mut indices = [0u32; 16];
    for (pixel, index) in indices.iter_mut().enumerate() {
        let anchor = is_anchor(info.subsets, partition, pixel);
        *index = reader.read(info.index_bits - u32::from(anchor));
    }
    let mut indices2 = [0u32; 16];
    if info.index2_bits > 0 {
        for (pixel, index) in indices2.iter_mut().enumerate() {
            *index = reader.read(info.index2_bits - u32::from(pixel == 0));
        }
    }

    tracing::trace!(
        "BC7 mode {} partition {} rotation {} ({} bits)",
        mode,
        partition,
        rotation,
        reader.position()
    );

    let primary_weights = weights(info.index_bits);
    let secondary_weights = weights(info.index2_bits);

    let mut pixels = [[0u8; 4]; 16];
    for (pixel, out) in pixels.iter_mut().enumerate() {
        let subset = subset_of(info.subsets, partition, pixel);
        let e0 = endpoints[2 * subset];
        let e1 = endpoints[2 * subset + 1];

        let mut color_weight = primary_weights[indices[pixel] as usize];
        let mut alpha_weight = color_weight;
        if info.index2_bits > 0 {
            alpha_weight = secondary_weights[indices2[pixel] as usize];
            if index_selection {
                std::mem::swap(&mut color_weight, &mut alpha_weight);
            }
        }

        for channel in 0..3 {
            out[channel] = interpolate(e0[channel], e1[channel], color_weight) as u8;
        }
        out[3] = interpolate(e0[3], e1[3], alpha_weight) as u8;

        if rotation > 0 {
            out.swap(rotation - 1, 3);
        }
    }

    Ok(pixels)
}
