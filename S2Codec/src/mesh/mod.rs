//! Mesh buffer decoders for meshoptimizer-compressed Source 2 geometry.
//!
//! Compiled models store their index and vertex buffers as compressed byte
//! streams. The decoders here turn those spans back into flat arrays ready for
//! mesh assembly:
//!
//! - [`decode_index_buffer`] for triangle index streams (`0xE0` header)
//! - [`decode_vertex_buffer`] for vertex attribute streams (`0xA0` header)
//! - [`decode_meshlet`] for meshlet vertex/triangle streams
//!
//! Every decoder is a pure function of its arguments. Calls share no state
//! and may run concurrently.

pub mod index;
pub mod meshlet;
mod varint;
pub mod vertex;

pub use index::{IndexSize, decode_index_buffer, decode_index_buffer_u32};
pub use meshlet::{
    DecodedMeshlet, MeshletTriangleSize, MeshletVertexSize, decode_meshlet, decode_meshlet_raw,
};
pub use vertex::{VertexDecodePath, decode_vertex_buffer, decode_vertex_buffer_with};
