//! PNG export of decoded RGBA8 surfaces.

use std::path::Path;

use image::{ImageBuffer, RgbaImage};

use crate::error::{Error, Result};

/// Encode an RGBA8 surface (`width * height * 4` bytes) as PNG.
///
/// # Errors
/// Returns an error if the pixel buffer does not match the dimensions or
/// PNG encoding fails.
pub fn rgba_to_png_bytes(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>> {
    let img: RgbaImage =
        ImageBuffer::from_raw(width, height, rgba.to_vec()).ok_or(Error::ImageBufferFailed)?;

    let mut png_data = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png_data);
    img.write_with_encoder(encoder)
        .map_err(|e| Error::PngEncodeFailed {
            message: e.to_string(),
        })?;

    Ok(png_data)
}

/// Encode an RGBA8 surface as PNG and write it to `path`.
///
/// # Errors
/// Returns an error if encoding fails or the file cannot be written.
pub fn write_png<P: AsRef<Path>>(path: P, width: u32, height: u32, rgba: &[u8]) -> Result<()> {
    let png_data = rgba_to_png_bytes(width, height, rgba)?;
    std::fs::write(path, png_data)?;
    Ok(())
}
