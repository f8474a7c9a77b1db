//! Command execution implementations

use super::Commands;
use super::{mesh, texture};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if reading the input, decoding or writing the output fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Index {
                input,
                count,
                index_size,
                output,
            } => mesh::index(input, *count, *index_size, output.as_deref()),
            Commands::Vertex {
                input,
                count,
                stride,
                scalar,
                output,
            } => mesh::vertex(input, *count, *stride, *scalar, output.as_deref()),
            Commands::Meshlet {
                input,
                vertices,
                triangles,
                output_dir,
            } => mesh::meshlet(input, *vertices, *triangles, output_dir.as_deref()),
            Commands::Texture {
                input,
                width,
                height,
                format,
                hemi_oct,
                invert_green,
                parallel,
                output,
                quiet,
            } => texture::execute(
                input,
                output,
                texture::TextureArgs {
                    width: *width,
                    height: *height,
                    format: *format,
                    hemi_oct: *hemi_oct,
                    invert_green: *invert_green,
                    parallel: *parallel,
                },
                !*quiet,
            ),
        }
    }
}
