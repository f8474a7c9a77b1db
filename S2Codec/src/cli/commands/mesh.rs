//! Mesh stream CLI commands
//!
//! Decode index, vertex and meshlet stream dumps to raw little-endian arrays.

use std::path::Path;

use anyhow::Context;
use byteorder::{ByteOrder, LittleEndian};

use crate::cli::progress::CUBE;
use crate::mesh::{
    VertexDecodePath, decode_index_buffer_u32, decode_meshlet, decode_meshlet_raw,
    decode_vertex_buffer_with, index::IndexSize,
};

fn read_input(input: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))
}

/// Decode an index stream.
pub fn index(input: &Path, count: usize, index_size: usize, output: Option<&Path>) -> anyhow::Result<()> {
    let stream = read_input(input)?;
    let size = IndexSize::try_from(index_size)?;
    let indices = decode_index_buffer_u32(count, &stream)?;

    let Some(output) = output else {
        let max = indices.iter().copied().max().unwrap_or(0);
        println!("{CUBE}Index stream: {}", input.display());
        println!("Stream size: {} bytes", stream.len());
        println!("Triangles:   {}", indices.len() / 3);
        println!("Max index:   {max}");
        for (i, tri) in indices.chunks_exact(3).take(8).enumerate() {
            println!("  [{i:3}] {} {} {}", tri[0], tri[1], tri[2]);
        }
        if indices.len() > 24 {
            println!("  ...");
        }
        return Ok(());
    };

    let mut bytes = vec![0u8; indices.len() * size.bytes()];
    match size {
        IndexSize::U16 => {
            for (chunk, &v) in bytes.chunks_exact_mut(2).zip(&indices) {
                LittleEndian::write_u16(chunk, v as u16);
            }
        }
        IndexSize::U32 => LittleEndian::write_u32_into(&indices, &mut bytes),
    }
    std::fs::write(output, &bytes)?;
    println!("Written {} indices to: {}", indices.len(), output.display());
    Ok(())
}

/// Decode a vertex stream.
pub fn vertex(
    input: &Path,
    count: usize,
    stride: usize,
    scalar: bool,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let stream = read_input(input)?;
    let path = if scalar {
        VertexDecodePath::Scalar
    } else {
        VertexDecodePath::Wide
    };
    let vertices = decode_vertex_buffer_with(count, stride, &stream, path)?;

    let Some(output) = output else {
        println!("{CUBE}Vertex stream: {}", input.display());
        println!("Stream size: {} bytes", stream.len());
        println!("Vertices:    {count} x {stride} bytes ({path:?} path)");
        for (i, vertex) in vertices.chunks_exact(stride).take(4).enumerate() {
            println!("  [{i:3}] {vertex:02x?}");
        }
        return Ok(());
    };

    std::fs::write(output, &vertices)?;
    println!("Written {} bytes to: {}", vertices.len(), output.display());
    Ok(())
}

/// Decode a meshlet stream.
pub fn meshlet(
    input: &Path,
    vertex_count: usize,
    triangle_count: usize,
    output_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let stream = read_input(input)?;

    let Some(output_dir) = output_dir else {
        let (vertices, triangles) = decode_meshlet_raw(vertex_count, triangle_count, &stream)?;
        println!("{CUBE}Meshlet stream: {}", input.display());
        println!("Vertices ({}): {vertices:?}", vertices.len());
        println!("Triangles ({}):", triangles.len());
        for (i, tri) in triangles.iter().enumerate() {
            println!(
                "  [{i:3}] {} {} {}",
                tri & 0xff,
                (tri >> 8) & 0xff,
                (tri >> 16) & 0xff
            );
        }
        return Ok(());
    };

    let decoded = decode_meshlet(vertex_count, 4, triangle_count, 3, &stream)?;
    std::fs::create_dir_all(output_dir)?;
    std::fs::write(output_dir.join("vertices.bin"), &decoded.vertices)?;
    std::fs::write(output_dir.join("triangles.bin"), &decoded.triangles)?;
    println!(
        "Written {vertex_count} vertices and {triangle_count} triangles to: {}",
        output_dir.display()
    );
    Ok(())
}
