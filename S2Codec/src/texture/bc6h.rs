//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2021 Sergii Kudlai (`bcdec`, MIT)
//!
//! SPDX-License-Identifier: MIT
//!
//! BC6H (unsigned half float) block decoder with display-range output.
//!
//! The mode is 2 bits, or 5 bits when the first two are `0b10`/`0b11`. Each
//! of the 14 modes scatters its endpoint bits in a fixed order, listed here
//! as [`Field`] runs consumed sequentially right after the mode bits. Modes
//! with two regions follow the fields with a 5-bit partition id.
//!
//! Endpoints are named as in the format documentation: `W`/`X` for region 0,
//! `Y`/`Z` for region 1.

use super::block::Block;
use super::tables::{interpolate, is_anchor, subset_of, weights};
use crate::error::{Error, Result};

const FORMAT: &str = "BC6H";

const W: u8 = 0;
const X: u8 = 1;
const Y: u8 = 2;
const Z: u8 = 3;

const R: u8 = 0;
const G: u8 = 1;
const B: u8 = 2;

/// A run of endpoint bits: `width` bits go to `channel` of `endpoint` at bit `shift`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Field {
    endpoint: u8,
    channel: u8,
    shift: u8,
    width: u8,
    /// Stored most significant bit first.
    reversed: bool,
}

const fn seg(endpoint: u8, channel: u8, shift: u8, width: u8) -> Field {
    Field {
        endpoint,
        channel,
        shift,
        width,
        reversed: false,
    }
}

const fn rev(endpoint: u8, channel: u8, shift: u8, width: u8) -> Field {
    Field {
        endpoint,
        channel,
        shift,
        width,
        reversed: true,
    }
}

/// Layout and precision of one BC6H mode.
#[derive(Debug)]
pub(crate) struct ModeInfo {
    pub raw_mode: u8,
    pub header_bits: u32,
    /// Precision of the base endpoint `W`.
    pub endpoint_bits: u32,
    /// Precision of the other endpoints per channel (deltas when `transformed`).
    pub delta_bits: [u32; 3],
    pub transformed: bool,
    pub regions: usize,
    pub fields: &'static [Field],
}

impl ModeInfo {
    fn index_bits(&self) -> u32 {
        if self.regions == 2 { 3 } else { 4 }
    }

    fn partition_bits(&self) -> u32 {
        if self.regions == 2 { 5 } else { 0 }
    }

    /// Total declared field width including the mode prefix.
    pub(crate) fn total_bits(&self) -> u32 {
        let fields: u32 = self.fields.iter().map(|f| u32::from(f.width)).sum();
        let regions = self.regions as u32;
        self.header_bits + fields + self.partition_bits() + 16 * self.index_bits() - regions
    }
}

#[rustfmt::skip]
static MODES: [ModeInfo; 14] = [
    // mode 1 (0x00)
    ModeInfo {
        raw_mode: 0,
        header_bits: 2,
        endpoint_bits: 10,
        delta_bits: [5, 5, 5],
        transformed: true,
        regions: 2,
        fields: &[
            seg(Y, G, 4, 1), seg(Y, B, 4, 1), seg(Z, B, 4, 1), seg(W, R, 0, 10),
            seg(W, G, 0, 10), seg(W, B, 0, 10), seg(X, R, 0, 5), seg(Z, G, 4, 1),
            seg(Y, G, 0, 4), seg(X, G, 0, 5), seg(Z, B, 0, 1), seg(Z, G, 0, 4),
            seg(X, B, 0, 5), seg(Z, B, 1, 1), seg(Y, B, 0, 4), seg(Y, R, 0, 5),
            seg(Z, B, 2, 1), seg(Z, R, 0, 5), seg(Z, B, 3, 1),
        ],
    },
    // mode 2 (0x01)
    ModeInfo {
        raw_mode: 1,
        header_bits: 2,
        endpoint_bits: 7,
        delta_bits: [6, 6, 6],
        transformed: true,
        regions: 2,
        fields: &[
            seg(Y, G, 5, 1), seg(Z, G, 4, 1), seg(Z, G, 5, 1), seg(W, R, 0, 7),
            seg(Z, B, 0, 1), seg(Z, B, 1, 1), seg(Y, B, 4, 1), seg(W, G, 0, 7),
            seg(Y, B, 5, 1), seg(Z, B, 2, 1), seg(Y, G, 4, 1), seg(W, B, 0, 7),
            seg(Z, B, 3, 1), seg(Z, B, 5, 1), seg(Z, B, 4, 1), seg(X, R, 0, 6),
            seg(Y, G, 0, 4), seg(X, G, 0, 6), seg(Z, G, 0, 4), seg(X, B, 0, 6),
            seg(Y, B, 0, 4), seg(Y, R, 0, 6), seg(Z, R, 0, 6),
        ],
    },
    // mode 3 (0x02)
    ModeInfo {
        raw_mode: 2,
        header_bits: 5,
        endpoint_bits: 11,
        delta_bits: [5, 4, 4],
        transformed: true,
        regions: 2,
        fields: &[
            seg(W, R, 0, 10), seg(W, G, 0, 10), seg(W, B, 0, 10), seg(X, R, 0, 5),
            seg(W, R, 10, 1), seg(Y, G, 0, 4), seg(X, G, 0, 4), seg(W, G, 10, 1),
            seg(Z, B, 0, 1), seg(Z, G, 0, 4), seg(X, B, 0, 4), seg(W, B, 10, 1),
            seg(Z, B, 1, 1), seg(Y, B, 0, 4), seg(Y, R, 0, 5), seg(Z, B, 2, 1),
            seg(Z, R, 0, 5), seg(Z, B, 3, 1),
        ],
    },
    // mode 4 (0x06)
    ModeInfo {
        raw_mode: 6,
        header_bits: 5,
        endpoint_bits: 11,
        delta_bits: [4, 5, 4],
        transformed: true,
        regions: 2,
        fields: &[
            seg(W, R, 0, 10), seg(W, G, 0, 10), seg(W, B, 0, 10), seg(X, R, 0, 4),
            seg(W, R, 10, 1), seg(Z, G, 4, 1), seg(Y, G, 0, 4), seg(X, G, 0, 5),
            seg(W, G, 10, 1), seg(Z, G, 0, 4), seg(X, B, 0, 4), seg(W, B, 10, 1),
            seg(Z, B, 1, 1), seg(Y, B, 0, 4), seg(Y, R, 0, 4), seg(Z, B, 0, 1),
            seg(Z, B, 2, 1), seg(Z, R, 0, 4), seg(Y, G, 4, 1), seg(Z, B, 3, 1),
        ],
    },
    // mode 5 (0x0a)
    ModeInfo {
        raw_mode: 10,
        header_bits: 5,
        endpoint_bits: 11,
        delta_bits: [4, 4, 5],
        transformed: true,
        regions: 2,
        fields: &[
            seg(W, R, 0, 10), seg(W, G, 0, 10), seg(W, B, 0, 10), seg(X, R, 0, 4),
            seg(W, R, 10, 1), seg(Y, B, 4, 1), seg(Y, G, 0, 4), seg(X, G, 0, 4),
            seg(W, G, 10, 1), seg(Z, B, 0, 1), seg(Z, G, 0, 4), seg(X, B, 0, 5),
            seg(W, B, 10, 1), seg(Y, B, 0, 4), seg(Y, R, 0, 4), seg(Z, B, 1, 1),
            seg(Z, B, 2, 1), seg(Z, R, 0, 4), seg(Z, B, 4, 1), seg(Z, B, 3, 1),
        ],
    },
    // mode 6 (0x0e)
    ModeInfo {
        raw_mode: 14,
        header_bits: 5,
        endpoint_bits: 9,
        delta_bits: [5, 5, 5],
        transformed: true,
        regions: 2,
        fields: &[
            seg(W, R, 0, 9), seg(Y, B, 4, 1), seg(W, G, 0, 9), seg(Y, G, 4, 1),
            seg(W, B, 0, 9), seg(Z, B, 4, 1), seg(X, R, 0, 5), seg(Z, G, 4, 1),
            seg(Y, G, 0, 4), seg(X, G, 0, 5), seg(Z, B, 0, 1), seg(Z, G, 0, 4),
            seg(X, B, 0, 5), seg(Z, B, 1, 1), seg(Y, B, 0, 4), seg(Y, R, 0, 5),
            seg(Z, B, 2, 1), seg(Z, R, 0, 5), seg(Z, B, 3, 1),
        ],
    },
    // mode 7 (0x12)
    ModeInfo {
        raw_mode: 18,
        header_bits: 5,
        endpoint_bits: 8,
        delta_bits: [6, 5, 5],
        transformed: true,
        regions: 2,
        fields: &[
            seg(W, R, 0, 8), seg(Z, G, 4, 1), seg(Y, B, 4, 1), seg(W, G, 0, 8),
            seg(Z, B, 2, 1), seg(Y, G, 4, 1), seg(W, B, 0, 8), seg(Z, B, 3, 1),
            seg(Z, B, 4, 1), seg(X, R, 0, 6), seg(Y, G, 0, 4), seg(X, G, 0, 5),
            seg(Z, B, 0, 1), seg(Z, G, 0, 4), seg(X, B, 0, 5), seg(Z, B, 1, 1),
            seg(Y, B, 0, 4), seg(Y, R, 0, 6), seg(Z, R, 0, 6),
        ],
    },
    // mode 8 (0x16)
    ModeInfo {
        raw_mode: 22,
        header_bits: 5,
        endpoint_bits: 8,
        delta_bits: [5, 6, 5],
        transformed: true,
        regions: 2,
        fields: &[
            seg(W, R, 0, 8), seg(Z, B, 0, 1), seg(Y, B, 4, 1), seg(W, G, 0, 8),
            seg(Y, G, 5, 1), seg(Y, G, 4, 1), seg(W, B, 0, 8), seg(Z, G, 5, 1),
            seg(Z, B, 4, 1), seg(X, R, 0, 5), seg(Z, G, 4, 1), seg(Y, G, 0, 4),
            seg(X, G, 0, 6), seg(Z, G, 0, 4), seg(X, B, 0, 5), seg(Z, B, 1, 1),
            seg(Y, B, 0, 4), seg(Y, R, 0, 5), seg(Z, B, 2, 1), seg(Z, R, 0, 5),
            seg(Z, B, 3, 1),
        ],
    },
    // mode 9 (0x1a)
    ModeInfo {
        raw_mode: 26,
        header_bits: 5,
        endpoint_bits: 8,
        delta_bits: [5, 5, 6],
        transformed: true,
        regions: 2,
        fields: &[
            seg(W, R, 0, 8), seg(Z, B, 1, 1), seg(Y, B, 4, 1), seg(W, G, 0, 8),
            seg(Y, B, 5, 1), seg(Y, G, 4, 1), seg(W, B, 0, 8), seg(Z, B, 5, 1),
            seg(Z, B, 4, 1), seg(X, R, 0, 5), seg(Z, G, 4, 1), seg(Y, G, 0, 4),
            seg(X, G, 0, 5), seg(Z, B, 0, 1), seg(Z, G, 0, 4), seg(X, B, 0, 6),
            seg(Y, B, 0, 4), seg(Y, R, 0, 5), seg(Z, B, 2, 1), seg(Z, R, 0, 5),
            seg(Z, B, 3, 1),
        ],
    },
    // mode 10 (0x1e)
    ModeInfo {
        raw_mode: 30,
        header_bits: 5,
        endpoint_bits: 6,
        delta_bits: [6, 6, 6],
        transformed: false,
        regions: 2,
        fields: &[
            seg(W, R, 0, 6), seg(Z, G, 4, 1), seg(Z, B, 0, 1), seg(Z, B, 1, 1),
            seg(Y, B, 4, 1), seg(W, G, 0, 6), seg(Y, G, 5, 1), seg(Y, B, 5, 1),
            seg(Z, B, 2, 1), seg(Y, G, 4, 1), seg(W, B, 0, 6), seg(Z, G, 5, 1),
            seg(Z, B, 3, 1), seg(Z, B, 5, 1), seg(Z, B, 4, 1), seg(X, R, 0, 6),
            seg(Y, G, 0, 4), seg(X, G, 0, 6), seg(Z, G, 0, 4), seg(X, B, 0, 6),
            seg(Y, B, 0, 4), seg(Y, R, 0, 6), seg(Z, R, 0, 6),
        ],
    },
    // mode 11 (0x03)
    ModeInfo {
        raw_mode: 3,
        header_bits: 5,
        endpoint_bits: 10,
        delta_bits: [10, 10, 10],
        transformed: false,
        regions: 1,
        fields: &[
            seg(W, R, 0, 10), seg(W, G, 0, 10), seg(W, B, 0, 10), seg(X, R, 0, 10),
            seg(X, G, 0, 10), seg(X, B, 0, 10),
        ],
    },
    // mode 12 (0x07)
    ModeInfo {
        raw_mode: 7,
        header_bits: 5,
        endpoint_bits: 11,
        delta_bits: [9, 9, 9],
        transformed: true,
        regions: 1,
        fields: &[
            seg(W, R, 0, 10), seg(W, G, 0, 10), seg(W, B, 0, 10), seg(X, R, 0, 9),
            seg(W, R, 10, 1), seg(X, G, 0, 9), seg(W, G, 10, 1), seg(X, B, 0, 9),
            seg(W, B, 10, 1),
        ],
    },
    // mode 13 (0x0b)
    ModeInfo {
        raw_mode: 11,
        header_bits: 5,
        endpoint_bits: 12,
        delta_bits: [8, 8, 8],
        transformed: true,
        regions: 1,
        fields: &[
            seg(W, R, 0, 10), seg(W, G, 0, 10), seg(W, B, 0, 10), seg(X, R, 0, 8),
            rev(W, R, 10, 2), seg(X, G, 0, 8), rev(W, G, 10, 2), seg(X, B, 0, 8),
            rev(W, B, 10, 2),
        ],
    },
    // mode 14 (0x0f)
    ModeInfo {
        raw_mode: 15,
        header_bits: 5,
        endpoint_bits: 16,
        delta_bits: [4, 4, 4],
        transformed: true,
        regions: 1,
        fields: &[
            seg(W, R, 0, 10), seg(W, G, 0, 10), seg(W, B, 0, 10), seg(X, R, 0, 4),
            rev(W, R, 10, 6), seg(X, G, 0, 4), rev(W, G, 10, 6), seg(X, B, 0, 4),
            rev(W, B, 10, 6),
        ],
    },
];

fn mode_info(raw_mode: u8) -> Option<&'static ModeInfo> {
    MODES.iter().find(|m| m.raw_mode == raw_mode)
}

#[inline]
fn sign_extend(value: u32, bits: u32) -> u32 {
    let shift = 32 - bits;
    (((value << shift) as i32) >> shift) as u32
}

/// Expand an unsigned endpoint of `bits` precision to 16 bits.
#[inline]
fn unquantize(value: u32, bits: u32) -> u16 {
    if bits >= 15 {
        value as u16
    } else if value == 0 {
        0
    } else if value == (1 << bits) - 1 {
        0xffff
    } else {
        (((value << 16) + 0x8000) >> bits) as u16
    }
}

/// Map a 16-bit HDR component to a display byte.
///
/// A viewer approximation, not tone mapping: gamma 2.2, a fixed x4 exposure,
/// clamped, keeping the high byte.
#[inline]
pub(crate) fn to_display(value: u16) -> u8 {
    let f = f32::from(value) / 65535.0;
    let g = (f64::from(f).powf(f64::from(2.2_f32)) * 65535.0 * 4.0).min(65535.0);
    ((g as u16) >> 8) as u8
}

/// Decode one block into 16 RGBA pixels (row-major, alpha 255).
pub(crate) fn decode_block(bytes: &[u8; 16]) -> Result<[[u8; 4]; 16]> {
    let mut reader = Block::from_bytes(bytes).reader();

    let mut raw_mode = reader.read(2);
    if raw_mode > 1 {
        raw_mode |= reader.read(3) << 2;
    }
    let raw_mode = raw_mode as u8;
    let info = mode_info(raw_mode).ok_or(Error::InvalidBlockMode {
        format: FORMAT,
        mode: raw_mode,
    })?;

    let mut endpoints = [[0u32; 3]; 4];
    for field in info.fields {
        let width = u32::from(field.width);
        let value = if field.reversed {
            reader.read_reversed(width)
        } else {
            reader.read(width)
        };
        endpoints[usize::from(field.endpoint)][usize::from(field.channel)] |= value << field.shift;
    }
    let partition = reader.read(info.partition_bits()) as usize;

    let endpoint_count = 2 * info.regions;
    if info.transformed {
        let mask = (1u32 << info.endpoint_bits) - 1;
        let base = endpoints[0];
        for endpoint in &mut endpoints[1..endpoint_count] {
            for channel in 0..3 {
                let delta = sign_extend(endpoint[channel], info.delta_bits[channel]);
                endpoint[channel] = base[channel].wrapping_add(delta) & mask;
            }
        }
    }

    let mut unquantized = [[0u16; 3]; 4];
    for (out, endpoint) in unquantized.iter_mut().zip(&endpoints[..endpoint_count]) {
        for channel in 0..3 {
            out[channel] = unquantize(endpoint[channel], info.endpoint_bits);
        }
    }

    tracing::trace!(
        "BC6H mode {:#04x} partition {} ({} bits before indices)",
        raw_mode,
        partition,
        reader.position()
    );

    let index_bits = info.index_bits();
    let table = weights(index_bits);
    let mut pixels = [[0u8; 4]; 16];
    for (pixel, out) in pixels.iter_mut().enumerate() {
        let anchor = is_anchor(info.regions, partition, pixel);
        let weight = table[reader.read(index_bits - u32::from(anchor)) as usize];
        let region = subset_of(info.regions, partition, pixel);
        let e0 = unquantized[2 * region];
        let e1 = unquantized[2 * region + 1];

        for channel in 0..3 {
            out[channel] = to_display(interpolate(e0[channel], e1[channel], weight));
        }
        out[3] = 255;
    }

    Ok(pixels)
}
