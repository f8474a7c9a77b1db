//! # S2Codec
//!
//! A pure-Rust codec layer for Source 2 compiled assets: the densely packed
//! buffers that a resource file hands over for geometry and textures.
//!
//! ## Supported Streams
//!
//! - **Index buffers** - meshoptimizer triangle index codec (`0xE0`, versions 0 and 1)
//! - **Vertex buffers** - meshoptimizer vertex codec (`0xA0`)
//! - **Meshlets** - meshoptimizer meshlet vertex/triangle codec
//! - **BC6H / BC7** - BPTC block textures to RGBA8, with normal map fix-ups
//!
//! Decoders are pure functions: they take a byte span plus shape parameters
//! and return a new buffer or an [`Error`]. They never read outside the span
//! and never panic on malformed input.
//!
//! ## Quick Start
//!
//! ### Decoding an Index Buffer
//!
//! ```
//! use s2codec::mesh::decode_index_buffer;
//!
//! let stream = [
//!     0xe0, 0xf0, 0x10, 0xfe, 0xff, 0xf0, 0x0c, 0xff, 0x02, 0x02, 0x02, 0x00, 0x76, 0x87,
//!     0x56, 0x67, 0x78, 0xa9, 0x86, 0x65, 0x89, 0x68, 0x98, 0x01, 0x69, 0x00, 0x00,
//! ];
//! let indices = decode_index_buffer(12, 4, &stream)?;
//! assert_eq!(&indices[..12], &[0, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0]);
//! # Ok::<(), s2codec::Error>(())
//! ```
//!
//! ### Decoding a Texture
//!
//! ```no_run
//! use s2codec::texture::{BptcVariant, TextureDecodeOptions, decode_bptc, write_png};
//!
//! let blocks = std::fs::read("normal_bc7.bin")?;
//! let options = TextureDecodeOptions::new(BptcVariant::Bc7).with_hemi_oct_rb(true);
//! let rgba = decode_bptc(&blocks, 1024, 1024, &options)?;
//! write_png("normal.png", 1024, 1024, &rgba)?;
//! # Ok::<(), s2codec::Error>(())
//! ```
//!
//! ### Using the Prelude
//!
//! ```
//! use s2codec::prelude::*;
//!
//! // Now you have access to:
//! // - decode_index_buffer, decode_vertex_buffer, decode_meshlet
//! // - decode_bptc, TextureDecodeOptions, BptcVariant
//! // - Error, Result, and more
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `s2codec` command-line binary

pub mod error;
pub mod mesh;
pub mod texture;

// Re-exports for convenience
pub use error::{Error, ErrorKind, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, ErrorKind, Result};

    // Mesh decoders
    pub use crate::mesh::{
        DecodedMeshlet, IndexSize, MeshletTriangleSize, MeshletVertexSize, VertexDecodePath,
        decode_index_buffer, decode_index_buffer_u32, decode_meshlet, decode_meshlet_raw,
        decode_vertex_buffer, decode_vertex_buffer_with,
    };

    // Texture decoders
    pub use crate::texture::{
        BptcVariant, TextureDecodeOptions, decode_bc6h, decode_bc7, decode_bptc, decode_bptc_par,
        rgba_to_png_bytes, write_png,
    };
}

/// Crate version, taken from `Cargo.toml` at build time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
