//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2021 Sergii Kudlai (`bcdec`, MIT)
//!
//! SPDX-License-Identifier: MIT
//!
//! BPTC (BC6H / BC7) texture decoding to RGBA8.
//!
//! The stream is a headerless run of 16-byte blocks, row-major,
//! `ceil(width / 4) x ceil(height / 4)` of them. The format is chosen by the
//! caller from the texture's declared pixel format. Pixels of edge blocks
//! that fall outside the image are dropped.
//!
//! Optional normal map fix-ups run on every decoded pixel:
//!
//! - hemi-octahedron normal reconstruction (`hemi_oct_rb`)
//! - green channel inversion (`invert_green`)

mod bc6h;
mod bc7;
mod block;
pub mod png;
pub mod postprocess;
mod tables;

use rayon::prelude::*;

use crate::error::{Error, Result};

pub use block::BLOCK_BYTES;
pub use png::{rgba_to_png_bytes, write_png};

/// Block format of a BPTC texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BptcVariant {
    /// Unsigned half-float HDR blocks, converted to display range.
    Bc6h,
    /// 8-bit RGBA blocks.
    Bc7,
}

impl BptcVariant {
    /// Name used in errors and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bc6h => "BC6H",
            Self::Bc7 => "BC7",
        }
    }

    fn decode_block(self, bytes: &[u8; BLOCK_BYTES]) -> Result<[[u8; 4]; 16]> {
        match self {
            Self::Bc6h => bc6h::decode_block(bytes),
            Self::Bc7 => bc7::decode_block(bytes),
        }
    }
}

/// Per-call texture decode settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDecodeOptions {
    /// Block format of the stream.
    pub variant: BptcVariant,
    /// Rebuild normals from hemi-octahedron encoded R/G (blue moves to alpha).
    pub hemi_oct_rb: bool,
    /// Invert the green channel after any other fix-up.
    pub invert_green: bool,
}

impl TextureDecodeOptions {
    /// Plain decode of `variant` with no fix-ups.
    #[must_use]
    pub const fn new(variant: BptcVariant) -> Self {
        Self {
            variant,
            hemi_oct_rb: false,
            invert_green: false,
        }
    }

    /// Set hemi-octahedron normal reconstruction.
    #[must_use]
    pub const fn with_hemi_oct_rb(mut self, enabled: bool) -> Self {
        self.hemi_oct_rb = enabled;
        self
    }

    /// Set green channel inversion.
    #[must_use]
    pub const fn with_invert_green(mut self, enabled: bool) -> Self {
        self.invert_green = enabled;
        self
    }
}

/// Checked surface geometry for one decode call.
struct Surface {
    width: usize,
    height: usize,
    blocks_x: usize,
}

impl Surface {
    fn new(stream: &[u8], width: u32, height: u32, options: &TextureDecodeOptions) -> Result<Self> {
        let format = options.variant.name();
        tracing::debug!(
            "{} decode: {}x{} from {} bytes (hemi-oct: {}, invert green: {})",
            format,
            width,
            height,
            stream.len(),
            options.hemi_oct_rb,
            options.invert_green
        );

        let w = width as usize;
        let h = height as usize;
        let blocks_x = w.div_ceil(4);
        let blocks_y = h.div_ceil(4);

        let needed = blocks_x
            .checked_mul(blocks_y)
            .and_then(|blocks| blocks.checked_mul(BLOCK_BYTES));
        let output = w.checked_mul(h).and_then(|pixels| pixels.checked_mul(4));
        let (Some(needed), Some(_)) = (needed, output) else {
            return Err(Error::InvalidTextureDimensions { width, height });
        };

        if stream.len() < needed {
            tracing::debug!("{} stream rejected: {} < {} bytes", format, stream.len(), needed);
            return Err(Error::BufferTooShort {
                format,
                needed,
                actual: stream.len(),
            });
        }

        Ok(Self {
            width: w,
            height: h,
            blocks_x,
        })
    }

    fn output_len(&self) -> usize {
        self.width * self.height * 4
    }

    /// Bytes of output covered by one row of blocks.
    fn band_len(&self) -> usize {
        self.width * 4 * 4
    }

    /// Decode block row `by` into `band`, the (up to) four pixel rows it covers.
    fn decode_band(
        &self,
        stream: &[u8],
        by: usize,
        band: &mut [u8],
        options: &TextureDecodeOptions,
    ) -> Result<()> {
        let row_pitch = self.width * 4;
        let rows = (self.height - by * 4).min(4);
        let row_start = by * self.blocks_x * BLOCK_BYTES;
        let blocks = &stream[row_start..row_start + self.blocks_x * BLOCK_BYTES];

        for (bx, chunk) in blocks.chunks_exact(BLOCK_BYTES).enumerate() {
            let bytes: &[u8; BLOCK_BYTES] = chunk.try_into().map_err(|_| Error::BufferTooShort {
                format: options.variant.name(),
                needed: BLOCK_BYTES,
                actual: chunk.len(),
            })?;
            let mut pixels = options.variant.decode_block(bytes)?;

            for py in 0..rows {
                for px in 0..4 {
                    let fx = bx * 4 + px;
                    if fx >= self.width {
                        continue;
                    }
                    let pixel = &mut pixels[py * 4 + px];
                    postprocess::apply(pixel, options.hemi_oct_rb, options.invert_green);
                    let dst = py * row_pitch + fx * 4;
                    band[dst..dst + 4].copy_from_slice(pixel);
                }
            }
        }

        Ok(())
    }
}

/// Decode a BPTC stream into a `width * height * 4` byte RGBA8 surface.
///
/// # Errors
///
/// - [`Error::InvalidTextureDimensions`] when the surface size overflows
/// - [`Error::BufferTooShort`] when the stream holds fewer than
///   `16 * ceil(width / 4) * ceil(height / 4)` bytes
/// - [`Error::InvalidBlockMode`] for a block with a reserved mode
///
/// # Example
///
/// ```
/// use s2codec::texture::{BptcVariant, TextureDecodeOptions, decode_bptc};
///
/// // BC7 mode 6 block with every field zero
/// let mut block = [0u8; 16];
/// block[0] = 0x40;
/// let rgba = decode_bptc(&block, 4, 4, &TextureDecodeOptions::new(BptcVariant::Bc7))?;
/// assert_eq!(rgba.len(), 64);
/// assert!(rgba.iter().all(|&b| b == 0));
/// # Ok::<(), s2codec::Error>(())
/// ```
pub fn decode_bptc(
    stream: &[u8],
    width: u32,
    height: u32,
    options: &TextureDecodeOptions,
) -> Result<Vec<u8>> {
    let surface = Surface::new(stream, width, height, options)?;
    let mut rgba = vec![0u8; surface.output_len()];
    if rgba.is_empty() {
        return Ok(rgba);
    }

    for (by, band) in rgba.chunks_mut(surface.band_len()).enumerate() {
        surface.decode_band(stream, by, band, options)?;
    }

    Ok(rgba)
}

/// [`decode_bptc`] with block rows spread over the rayon thread pool.
///
/// Output is identical to the serial decoder.
///
/// # Errors
///
/// Same as [`decode_bptc`].
pub fn decode_bptc_par(
    stream: &[u8],
    width: u32,
    height: u32,
    options: &TextureDecodeOptions,
) -> Result<Vec<u8>> {
    let surface = Surface::new(stream, width, height, options)?;
    let mut rgba = vec![0u8; surface.output_len()];
    if rgba.is_empty() {
        return Ok(rgba);
    }

    rgba.par_chunks_mut(surface.band_len())
        .enumerate()
        .try_for_each(|(by, band)| surface.decode_band(stream, by, band, options))?;

    Ok(rgba)
}

/// Decode a BC6H stream without fix-ups.
///
/// # Errors
///
/// Same as [`decode_bptc`].
pub fn decode_bc6h(stream: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    decode_bptc(stream, width, height, &TextureDecodeOptions::new(BptcVariant::Bc6h))
}

/// Decode a BC7 stream without fix-ups.
///
/// # Errors
///
/// Same as [`decode_bptc`].
pub fn decode_bc7(stream: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    decode_bptc(stream, width, height, &TextureDecodeOptions::new(BptcVariant::Bc7))
}
