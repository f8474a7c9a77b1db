//! Normal map fix-ups applied to decoded RGBA pixels.

use glam::Vec3;

/// Rebuild a unit normal from hemi-octahedron encoded R/G.
///
/// The former blue channel moves to alpha; RGB receive the normal remapped
/// from `[-1, 1]` to `[0, 255]`.
pub fn hemi_oct_normal(pixel: &mut [u8; 4]) {
    let r = f32::from(pixel[0]);
    let g = f32::from(pixel[1]);

    let x = (r + g) / 255.0 - 1.003922;
    let y = (r - g) / 255.0;
    let z = 1.0 - x.abs() - y.abs();
    // |x| + |y| + z == 1, so the length is never zero.
    let normal = Vec3::new(x, y, z);
    let normal = normal / normal.length();
    let encoded = (normal * 0.5 + Vec3::splat(0.5)) * 255.0;

    pixel[3] = pixel[2];
    pixel[0] = encoded.x as u8;
    pixel[1] = encoded.y as u8;
    pixel[2] = encoded.z as u8;
}

/// Flip the green channel (DirectX/OpenGL normal map convention swap).
#[inline]
pub fn invert_green(pixel: &mut [u8; 4]) {
    pixel[1] = !pixel[1];
}

/// Apply the selected fix-ups to one pixel, hemi-octahedron first.
#[inline]
pub(crate) fn apply(pixel: &mut [u8; 4], hemi_oct: bool, invert: bool) {
    if hemi_oct {
        hemi_oct_normal(pixel);
    }
    if invert {
        invert_green(pixel);
    }
}
