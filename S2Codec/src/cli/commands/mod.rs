//! CLI subcommands

pub mod definitions;
pub mod execute;
pub mod mesh;
pub mod texture;

use clap::Subcommand;
use std::path::PathBuf;

pub use definitions::TextureFormatArg;

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a compressed index buffer
    Index {
        /// Raw index stream (starts with 0xE0 / 0xE1)
        #[arg(short, long)]
        input: PathBuf,

        /// Number of indices (a multiple of 3)
        #[arg(short, long)]
        count: usize,

        /// Output index width in bytes (2 or 4)
        #[arg(long, default_value_t = 4)]
        index_size: usize,

        /// Write decoded indices here (prints a summary otherwise)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode a compressed vertex buffer
    Vertex {
        /// Raw vertex stream (starts with 0xA0)
        #[arg(short, long)]
        input: PathBuf,

        /// Number of vertices
        #[arg(short, long)]
        count: usize,

        /// Vertex stride in bytes (multiple of 4, at most 256)
        #[arg(short, long)]
        stride: usize,

        /// Use the scalar group decoder instead of the word-parallel one
        #[arg(long)]
        scalar: bool,

        /// Write decoded vertices here (prints a summary otherwise)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode a compressed meshlet
    Meshlet {
        /// Raw meshlet stream
        #[arg(short, long)]
        input: PathBuf,

        /// Number of vertex references (at most 256)
        #[arg(long)]
        vertices: usize,

        /// Number of triangles (at most 256)
        #[arg(long)]
        triangles: usize,

        /// Write `vertices.bin` (u32) and `triangles.bin` (3 bytes each) here
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Decode BC6H/BC7 blocks to PNG
    Texture {
        /// Raw block stream, or a DDS file (dimensions and format read from its header)
        #[arg(short, long)]
        input: PathBuf,

        /// Width in pixels (required for raw streams)
        #[arg(long)]
        width: Option<u32>,

        /// Height in pixels (required for raw streams)
        #[arg(long)]
        height: Option<u32>,

        /// Block format (required for raw streams)
        #[arg(short, long, value_enum)]
        format: Option<TextureFormatArg>,

        /// Rebuild normals from hemi-octahedron encoded R/G
        #[arg(long)]
        hemi_oct: bool,

        /// Invert the green channel
        #[arg(long)]
        invert_green: bool,

        /// Decode block rows in parallel
        #[arg(long)]
        parallel: bool,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },
}
