//! Error types for `S2Codec`

use thiserror::Error;

/// Broad classification of an [`Error`].
///
/// Decoding is a pure function of its input, so none of these are retryable:
/// the only recovery from [`ErrorKind::MalformedInput`] is better input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller passed inconsistent shape parameters (counts, sizes, dimensions).
    InvalidArgument,
    /// The compressed stream itself is damaged, truncated or of an unknown format.
    MalformedInput,
    /// Reading or writing outside the codec (files, image encoding).
    Io,
}

/// The error type for `S2Codec` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Argument Errors ====================
    /// Index count is not a whole number of triangles.
    #[error("index count {count} is not a multiple of 3")]
    InvalidIndexCount {
        /// The requested index count.
        count: usize,
    },

    /// Index size is neither 2 nor 4 bytes.
    #[error("unsupported index size {size}, expected 2 or 4")]
    InvalidIndexSize {
        /// The requested index size in bytes.
        size: usize,
    },

    /// Vertex stride is zero, above 256, or not a multiple of 4.
    #[error("unsupported vertex size {size}, expected a multiple of 4 in 4..=256")]
    InvalidVertexSize {
        /// The requested vertex size in bytes.
        size: usize,
    },

    /// Vertex count times stride does not fit in memory.
    #[error("{count} vertices of {size} bytes overflow the output buffer")]
    InvalidVertexCount {
        /// The requested vertex count.
        count: usize,
        /// The requested vertex size in bytes.
        size: usize,
    },

    /// Meshlet vertex or triangle count exceeds the 256 limit.
    #[error("meshlet has {vertices} vertices and {triangles} triangles, at most 256 of each are allowed")]
    InvalidMeshletCounts {
        /// The requested vertex count.
        vertices: usize,
        /// The requested triangle count.
        triangles: usize,
    },

    /// Meshlet output element sizes are not supported.
    #[error("unsupported meshlet output sizes: vertex {vertex_size} (2 or 4), triangle {triangle_size} (3 or 4)")]
    InvalidMeshletSizes {
        /// The requested vertex index size in bytes.
        vertex_size: usize,
        /// The requested triangle size in bytes.
        triangle_size: usize,
    },

    /// Texture dimensions overflow the addressable output size.
    #[error("invalid texture dimensions {width}x{height}")]
    InvalidTextureDimensions {
        /// Texture width in pixels.
        width: u32,
        /// Texture height in pixels.
        height: u32,
    },

    // ==================== Malformed Input Errors ====================
    /// The buffer is shorter than the minimum its declared shape requires.
    #[error("{format} buffer too short: need at least {needed} bytes, got {actual}")]
    BufferTooShort {
        /// The stream kind being decoded.
        format: &'static str,
        /// Minimum number of bytes required.
        needed: usize,
        /// Number of bytes supplied.
        actual: usize,
    },

    /// The header byte does not identify the expected stream kind.
    #[error("invalid {format} header: expected {expected:#04x}, found {found:#04x}")]
    InvalidHeader {
        /// The stream kind being decoded.
        format: &'static str,
        /// The expected header (format nibble).
        expected: u8,
        /// The header byte found.
        found: u8,
    },

    /// The stream uses an encoding version this decoder does not support.
    #[error("unsupported {format} encoding version {version}")]
    UnsupportedVersion {
        /// The stream kind being decoded.
        format: &'static str,
        /// The version nibble found in the header.
        version: u8,
    },

    /// The stream ended while more data was required.
    #[error("unexpected end of {format} data at offset {offset}")]
    UnexpectedEof {
        /// The stream kind being decoded.
        format: &'static str,
        /// Offset at which the read was attempted.
        offset: usize,
    },

    /// Decoding finished without consuming exactly the declared data region.
    #[error("{format} data not fully consumed: stopped at {consumed}, expected {expected}")]
    TrailingData {
        /// The stream kind being decoded.
        format: &'static str,
        /// Offset where decoding stopped.
        consumed: usize,
        /// Offset where decoding should have stopped.
        expected: usize,
    },

    /// A compressed texture block carries a mode outside the format's enumerated set.
    #[error("invalid {format} block mode {mode:#04x}")]
    InvalidBlockMode {
        /// The block format.
        format: &'static str,
        /// The raw mode value read from the block.
        mode: u8,
    },

    // ==================== Image Export Errors ====================
    /// Failed to create image buffer from decoded pixels.
    #[error("failed to create image buffer from decoded pixels")]
    ImageBufferFailed,

    /// Failed to encode PNG image.
    #[error("failed to encode PNG: {message}")]
    PngEncodeFailed {
        /// Error message from the encoder.
        message: String,
    },
}

impl Error {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) | Error::ImageBufferFailed | Error::PngEncodeFailed { .. } => ErrorKind::Io,
            Error::InvalidIndexCount { .. }
            | Error::InvalidIndexSize { .. }
            | Error::InvalidVertexSize { .. }
            | Error::InvalidVertexCount { .. }
            | Error::InvalidMeshletCounts { .. }
            | Error::InvalidMeshletSizes { .. }
            | Error::InvalidTextureDimensions { .. } => ErrorKind::InvalidArgument,
            Error::BufferTooShort { .. }
            | Error::InvalidHeader { .. }
            | Error::UnsupportedVersion { .. }
            | Error::UnexpectedEof { .. }
            | Error::TrailingData { .. }
            | Error::InvalidBlockMode { .. } => ErrorKind::MalformedInput,
        }
    }

    /// Returns true if the compressed input itself is at fault.
    #[must_use]
    pub fn is_malformed_input(&self) -> bool {
        self.kind() == ErrorKind::MalformedInput
    }
}

/// A specialized Result type for `S2Codec` operations.
pub type Result<T> = std::result::Result<T, Error>;
