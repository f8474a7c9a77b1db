//! End-to-end checks of the public decoding API against known streams.

use pretty_assertions::assert_eq;
use s2codec::prelude::*;
use s2codec::texture::postprocess;
use tempfile::tempdir;

// =============================================================================
// Mesh streams
// =============================================================================

const INDEX_V0: [u8; 27] = [
    0xe0, 0xf0, 0x10, 0xfe, 0xff, 0xf0, 0x0c, 0xff, 0x02, 0x02, 0x02, 0x00, 0x76, 0x87, 0x56,
    0x67, 0x78, 0xa9, 0x86, 0x65, 0x89, 0x68, 0x98, 0x01, 0x69, 0x00, 0x00,
];

const INDEX_V1: [u8; 24] = [
    0xe1, 0xf0, 0x10, 0xfe, 0x1f, 0x3d, 0x00, 0x0a, 0x00, 0x76, 0x87, 0x56, 0x67, 0x78, 0xa9,
    0x86, 0x65, 0x89, 0x68, 0x98, 0x01, 0x69, 0x00, 0x00,
];

/// Four vertices of 12 bytes: two 16-bit attributes at offsets 0 and 8.
fn vertex_stream() -> Vec<u8> {
    let mut stream = vec![
        0xa0, 0x01, 0x3f, 0x00, 0x00, 0x00, 0x58, 0x57, 0x58, 0x01, 0x26, 0x00, 0x00, 0x00, 0x01,
        0x0c, 0x00, 0x00, 0x00, 0x58, 0x01, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
        0x3f, 0x00, 0x00, 0x00, 0x17, 0x18, 0x17, 0x01, 0x26, 0x00, 0x00, 0x00, 0x01, 0x0c, 0x00,
        0x00, 0x00, 0x17, 0x01, 0x08,
    ];
    stream.extend_from_slice(&[0; 38]);
    stream
}

const VERTEX_EXPECTED: [u8; 48] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, //
    44, 1, 0, 0, 0, 0, 0, 0, 244, 1, 0, 0, //
    0, 0, 44, 1, 0, 0, 0, 0, 0, 0, 244, 1, //
    44, 1, 44, 1, 0, 0, 0, 0, 244, 1, 244, 1,
];

/// Sixteen 4-byte vertices `[0, i, 2i, 8i]` mixing 2-bit, 4-bit and raw groups.
fn mixed_group_stream() -> Vec<u8> {
    let mut stream = vec![0xa0, 0x00, 0x01, 0x2a, 0xaa, 0xaa, 0xaa, 0x02, 0x04];
    stream.extend_from_slice(&[0x44; 7]);
    stream.extend_from_slice(&[0x03, 0x00]);
    stream.extend_from_slice(&[0x10; 16]);
    stream.extend_from_slice(&[0; 32]);
    stream
}

/// Sixteen 4-byte vertices `[4i, 5i, 6i, 7i]`, every lane 4-bit packed.
fn linear_stream() -> Vec<u8> {
    let mut stream = vec![0xa0];
    for selector in [0x88u8, 0xaa, 0xcc, 0xee] {
        stream.extend_from_slice(&[0x02, selector & 0x0f]);
        stream.extend_from_slice(&[selector; 7]);
    }
    stream.extend_from_slice(&[0; 32]);
    stream
}

fn small_meshlet() -> Vec<u8> {
    let mut buffer = vec![20, 14];
    buffer.extend_from_slice(&[0; 14]);
    buffer.extend_from_slice(&[0x09, 0x2c]);
    buffer
}

#[test]
fn test_index_streams() {
    assert_eq!(
        decode_index_buffer_u32(12, &INDEX_V0).unwrap(),
        vec![0, 1, 2, 2, 1, 3, 4, 6, 5, 7, 8, 9]
    );
    assert_eq!(
        decode_index_buffer_u32(15, &INDEX_V1).unwrap(),
        vec![0, 1, 2, 2, 1, 3, 0, 1, 2, 2, 1, 5, 2, 1, 4]
    );
}

#[test]
fn test_index_output_matches_u32_view() {
    for (count, stream) in [(12, &INDEX_V0[..]), (15, &INDEX_V1[..])] {
        let indices = decode_index_buffer_u32(count, stream).unwrap();
        let wide = decode_index_buffer(count, 4, stream).unwrap();
        let narrow = decode_index_buffer(count, 2, stream).unwrap();

        assert_eq!(wide.len(), count * 4);
        assert_eq!(narrow.len(), count * 2);
        for (i, &index) in indices.iter().enumerate() {
            assert_eq!(&wide[i * 4..i * 4 + 4], &index.to_le_bytes());
            assert_eq!(&narrow[i * 2..i * 2 + 2], &(index as u16).to_le_bytes());
        }
    }
}

#[test]
fn test_vertex_stream() {
    let stream = vertex_stream();
    assert_eq!(decode_vertex_buffer(4, 12, &stream).unwrap(), VERTEX_EXPECTED.to_vec());
}

#[test]
fn test_vertex_group_encodings() {
    let mixed = decode_vertex_buffer(16, 4, &mixed_group_stream()).unwrap();
    let expected: Vec<u8> = (0u8..16).flat_map(|i| [0, i, 2 * i, 8 * i]).collect();
    assert_eq!(mixed, expected);

    let linear = decode_vertex_buffer(16, 4, &linear_stream()).unwrap();
    let expected: Vec<u8> = (0u8..16).flat_map(|i| [4 * i, 5 * i, 6 * i, 7 * i]).collect();
    assert_eq!(linear, expected);
}

#[test]
fn test_vertex_paths_agree() {
    for (count, size, stream) in [
        (4, 12, vertex_stream()),
        (16, 4, mixed_group_stream()),
        (16, 4, linear_stream()),
    ] {
        let scalar = decode_vertex_buffer_with(count, size, &stream, VertexDecodePath::Scalar);
        let wide = decode_vertex_buffer_with(count, size, &stream, VertexDecodePath::Wide);
        assert_eq!(scalar.unwrap(), wide.unwrap());
    }
}

#[test]
fn test_vertex_truncated_stream() {
    let stream = vertex_stream();
    for len in [0, 1, 12, 40] {
        let err = decode_vertex_buffer(4, 12, &stream[..len]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput, "length {len}");
    }
}

#[test]
fn test_meshlet_stream() {
    let decoded = decode_meshlet(4, 4, 2, 4, &small_meshlet()).unwrap();
    assert_eq!(
        decoded.vertices,
        [10u32, 11, 12, 20]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect::<Vec<_>>()
    );
    assert_eq!(decoded.triangles, vec![0, 1, 2, 0, 2, 1, 3, 0]);
}

#[test]
fn test_decoders_are_deterministic() {
    assert_eq!(
        decode_index_buffer(15, 2, &INDEX_V1).unwrap(),
        decode_index_buffer(15, 2, &INDEX_V1).unwrap()
    );
    let stream = vertex_stream();
    assert_eq!(
        decode_vertex_buffer(4, 12, &stream).unwrap(),
        decode_vertex_buffer(4, 12, &stream).unwrap()
    );
    assert_eq!(
        decode_meshlet_raw(4, 2, &small_meshlet()).unwrap(),
        decode_meshlet_raw(4, 2, &small_meshlet()).unwrap()
    );
}

#[test]
fn test_argument_errors_are_classified() {
    let errors = [
        decode_index_buffer(4, 4, &INDEX_V0).unwrap_err(),
        decode_index_buffer(12, 8, &INDEX_V0).unwrap_err(),
        decode_vertex_buffer(4, 6, &vertex_stream()).unwrap_err(),
        decode_vertex_buffer(4, 260, &vertex_stream()).unwrap_err(),
        decode_vertex_buffer(usize::MAX, 4, &vertex_stream()).unwrap_err(),
        decode_meshlet(300, 4, 2, 4, &small_meshlet()).unwrap_err(),
        decode_meshlet(4, 1, 2, 4, &small_meshlet()).unwrap_err(),
    ];
    for err in errors {
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{err}");
        assert!(!err.is_malformed_input());
    }
}

// =============================================================================
// Textures
// =============================================================================

/// One block per BC7 mode with its decoded pixels (row-major RGBA).
const BC7_GOLDEN: [([u8; 16], [[u8; 4]; 16]); 8] = [
    // mode 0
    (
        [0xef, 0x96, 0xae, 0x04, 0x01, 0x3c, 0xaf, 0x61, 0x87, 0x38, 0xc4, 0x46, 0xf1, 0x58, 0xff, 0xcd],
        [
            [123, 140, 222, 255], [173, 20, 31, 255], [108, 199, 68, 255], [66, 0, 181, 255],
            [165, 39, 62, 255], [123, 140, 222, 255], [115, 231, 49, 255], [73, 32, 162, 255],
            [70, 141, 105, 255], [53, 130, 167, 255], [108, 199, 68, 255], [115, 231, 49, 255],
            [41, 123, 206, 255], [53, 130, 167, 255], [73, 32, 162, 255], [87, 97, 125, 255],
        ],
    ),
    // mode 1
    (
        [0x7e, 0xee, 0x97, 0xb8, 0x5f, 0xe0, 0xe6, 0x29, 0xaa, 0x45, 0x9d, 0x3d, 0xad, 0x2e, 0x85, 0x61],
        [
            [161, 75, 165, 255], [178, 109, 166, 255], [99, 204, 89, 255], [164, 223, 73, 255],
            [99, 204, 89, 255], [170, 92, 166, 255], [161, 75, 165, 255], [143, 217, 78, 255],
            [164, 223, 73, 255], [143, 40, 164, 255], [152, 57, 165, 255], [78, 197, 94, 255],
            [36, 185, 104, 255], [99, 204, 89, 255], [187, 126, 167, 255], [161, 75, 165, 255],
        ],
    ),
    // mode 2
    (
        [0xbc, 0x02, 0x76, 0x08, 0x2a, 0xc2, 0x3c, 0x76, 0x87, 0xed, 0xc7, 0xc7, 0x50, 0xfd, 0x8f, 0x31],
        [
            [8, 33, 99, 255], [70, 55, 139, 255], [70, 55, 139, 255], [70, 55, 139, 255],
            [66, 198, 231, 255], [66, 198, 231, 255], [198, 99, 222, 255], [198, 99, 222, 255],
            [116, 96, 24, 255], [116, 96, 24, 255], [115, 247, 123, 255], [136, 77, 182, 255],
            [116, 96, 24, 255], [132, 115, 24, 255], [66, 198, 231, 255], [8, 33, 99, 255],
        ],
    ),
    // mode 3
    (
        [0x28, 0x62, 0xa3, 0xa8, 0xad, 0xaa, 0x6e, 0x9f, 0x1c, 0xc4, 0x37, 0x7e, 0x30, 0x3e, 0x4b, 0xc2],
        [
            [177, 85, 15, 255], [149, 103, 203, 255], [172, 134, 74, 255], [80, 236, 110, 255],
            [182, 38, 248, 255], [162, 234, 196, 255], [113, 171, 155, 255], [177, 85, 15, 255],
            [162, 234, 196, 255], [149, 103, 203, 255], [177, 85, 15, 255], [113, 171, 155, 255],
            [149, 103, 203, 255], [177, 85, 15, 255], [80, 236, 110, 255], [162, 234, 196, 255],
        ],
    ),
    // mode 4
    (
        [0x10, 0x58, 0x64, 0xd6, 0xc2, 0xf4, 0x3a, 0xac, 0xf4, 0x51, 0x5c, 0x54, 0xb1, 0x2c, 0x32, 0xc8],
        [
            [198, 206, 107, 109], [16, 99, 8, 125], [138, 171, 75, 93], [198, 206, 107, 109],
            [76, 134, 40, 158], [138, 171, 75, 109], [138, 171, 75, 142], [138, 171, 75, 158],
            [76, 134, 40, 142], [76, 134, 40, 158], [16, 99, 8, 77], [16, 99, 8, 93],
            [198, 206, 107, 125], [76, 134, 40, 77], [76, 134, 40, 109], [198, 206, 107, 174],
        ],
    ),
    // mode 5
    (
        [0x60, 0xa7, 0x3d, 0x3e, 0x4b, 0x05, 0x88, 0x77, 0x89, 0x11, 0x96, 0xe4, 0xce, 0xb3, 0x9f, 0xd0],
        [
            [182, 241, 169, 78], [93, 221, 114, 133], [226, 241, 169, 78], [93, 179, 0, 247],
            [93, 241, 169, 78], [226, 199, 55, 192], [93, 241, 169, 78], [137, 241, 169, 78],
            [93, 179, 0, 247], [93, 199, 55, 192], [182, 241, 169, 78], [137, 221, 114, 133],
            [226, 199, 55, 192], [226, 241, 169, 78], [182, 179, 0, 247], [93, 221, 114, 133],
        ],
    ),
    // mode 6
    (
        [0x40, 0xd2, 0x5a, 0x92, 0xda, 0x3b, 0x46, 0xe0, 0x0a, 0x4b, 0x08, 0x9e, 0x38, 0xb2, 0xd9, 0xc8],
        [
            [119, 52, 175, 111], [73, 37, 247, 71], [177, 70, 86, 160], [110, 49, 189, 103],
            [148, 61, 131, 135], [73, 37, 247, 71], [205, 79, 42, 184], [157, 64, 117, 143],
            [148, 61, 131, 135], [102, 46, 203, 96], [93, 43, 216, 88], [177, 70, 86, 160],
            [157, 64, 117, 143], [194, 76, 59, 175], [148, 61, 131, 135], [185, 73, 72, 167],
        ],
    ),
    // mode 7
    (
        [0x80, 0xd7, 0x15, 0xcd, 0xc0, 0x29, 0x88, 0x09, 0xa1, 0x69, 0xec, 0x14, 0xe5, 0x76, 0xb1, 0xe2],
        [
            [130, 138, 35, 206], [109, 20, 12, 117], [48, 32, 105, 81], [89, 24, 43, 105],
            [16, 154, 8, 195], [72, 146, 21, 200], [48, 32, 105, 81], [68, 28, 74, 93],
            [186, 130, 48, 211], [72, 146, 21, 200], [89, 24, 43, 105], [89, 24, 43, 105],
            [130, 138, 35, 206], [186, 130, 48, 211], [16, 154, 8, 195], [89, 24, 43, 105],
        ],
    ),
];

/// One block per BC6H mode, keyed by its raw mode bits.
const BC6H_GOLDEN: [(u8, [u8; 16], [[u8; 4]; 16]); 14] = [
    (
        0x00,
        [0xac, 0xb7, 0x6b, 0xdb, 0xe5, 0xd1, 0x76, 0x1c, 0x7c, 0xac, 0xc2, 0xab, 0xe2, 0x6b, 0x3b, 0x47],
        [
            [164, 255, 255, 255], [162, 255, 255, 255], [160, 255, 255, 255], [163, 255, 255, 255],
            [159, 255, 255, 255], [163, 255, 255, 255], [162, 255, 255, 255], [160, 255, 255, 255],
            [161, 255, 255, 255], [159, 255, 255, 255], [161, 255, 255, 255], [161, 255, 255, 255],
            [160, 255, 255, 255], [158, 255, 255, 255], [161, 255, 255, 255], [163, 255, 255, 255],
        ],
    ),
    (
        0x01,
        [0x19, 0xdf, 0x7b, 0x87, 0x53, 0x73, 0x5e, 0x0d, 0x70, 0x4b, 0xad, 0xbe, 0x44, 0xbd, 0x04, 0xbb],
        [
            [255, 255, 255, 255], [255, 255, 255, 255], [255, 255, 255, 255], [255, 255, 255, 255],
            [255, 255, 255, 255], [255, 255, 255, 255], [255, 255, 250, 255], [88, 255, 110, 255],
            [255, 255, 255, 255], [255, 178, 121, 255], [255, 42, 132, 255], [255, 42, 132, 255],
            [255, 11, 138, 255], [255, 178, 121, 255], [8, 255, 100, 255], [255, 98, 126, 255],
        ],
    ),
    (
        0x02,
        [0xe2, 0xa7, 0xab, 0xd4, 0x7d, 0x89, 0x2c, 0x27, 0xc7, 0x3d, 0xba, 0x16, 0x50, 0x46, 0x20, 0x10],
        [
            [255, 20, 111, 255], [255, 20, 109, 255], [255, 20, 109, 255], [255, 20, 109, 255],
            [255, 20, 111, 255], [255, 20, 111, 255], [255, 20, 110, 255], [255, 20, 109, 255],
            [255, 20, 110, 255], [255, 20, 111, 255], [255, 20, 111, 255], [255, 20, 111, 255],
            [255, 20, 111, 255], [255, 20, 111, 255], [255, 20, 110, 255], [255, 20, 111, 255],
        ],
    ),
    (
        0x06,
        [0x66, 0xdd, 0x74, 0x67, 0x50, 0xeb, 0x69, 0x09, 0x9c, 0x9b, 0x8f, 0xe3, 0xb3, 0x4c, 0x33, 0xfb],
        [
            [110, 112, 248, 255], [111, 110, 248, 255], [109, 115, 249, 255], [110, 107, 248, 255],
            [109, 115, 249, 255], [112, 108, 246, 255], [113, 109, 244, 255], [111, 108, 247, 255],
            [111, 108, 247, 255], [111, 107, 247, 255], [112, 109, 245, 255], [111, 111, 248, 255],
            [112, 108, 246, 255], [109, 115, 249, 255], [109, 115, 249, 255], [109, 115, 249, 255],
        ],
    ),
    (
        0x0a,
        [0x8a, 0xbe, 0xad, 0x51, 0x05, 0xc1, 0xb2, 0x61, 0x43, 0x29, 0xf6, 0xd6, 0xa3, 0xbd, 0x70, 0xa1],
        [
            [46, 255, 90, 255], [46, 255, 87, 255], [46, 255, 88, 255], [46, 255, 88, 255],
            [46, 255, 91, 255], [46, 255, 91, 255], [46, 255, 90, 255], [46, 255, 87, 255],
            [46, 255, 91, 255], [46, 255, 91, 255], [46, 255, 90, 255], [46, 255, 90, 255],
            [46, 255, 91, 255], [46, 255, 90, 255], [46, 255, 90, 255], [46, 255, 91, 255],
        ],
    ),
    (
        0x0e,
        [0x6e, 0x40, 0xe5, 0x74, 0x2f, 0xa0, 0xc4, 0x62, 0x9c, 0xbd, 0x0d, 0xcd, 0xa7, 0xc1, 0x32, 0x8d],
        [
            [0, 255, 255, 255], [0, 255, 255, 255], [0, 255, 255, 255], [0, 255, 255, 255],
            [0, 255, 255, 255], [0, 255, 255, 255], [0, 255, 255, 255], [0, 255, 255, 255],
            [0, 255, 255, 255], [255, 255, 255, 255], [255, 255, 255, 255], [255, 255, 255, 255],
            [20, 255, 255, 255], [255, 255, 255, 255], [20, 255, 255, 255], [75, 255, 255, 255],
        ],
    ),
    (
        0x12,
        [0x52, 0xfa, 0x04, 0x3f, 0xdc, 0x5a, 0xfb, 0x96, 0xab, 0x38, 0x26, 0xe9, 0x32, 0xe5, 0xe4, 0x65],
        [
            [255, 0, 11, 255], [255, 0, 5, 255], [255, 0, 5, 255], [255, 0, 4, 255],
            [255, 0, 19, 255], [255, 0, 18, 255], [255, 0, 16, 255], [255, 0, 6, 255],
            [255, 0, 18, 255], [255, 0, 16, 255], [255, 0, 14, 255], [255, 0, 12, 255],
            [255, 0, 19, 255], [255, 0, 14, 255], [255, 0, 11, 255], [255, 0, 14, 255],
        ],
    ),
    (
        0x16,
        [0x56, 0x0b, 0x54, 0xe1, 0x8c, 0x7f, 0x63, 0xe4, 0x52, 0xb4, 0xb9, 0x32, 0xb8, 0x75, 0x6e, 0x92],
        [
            [93, 255, 175, 255], [88, 255, 179, 255], [78, 255, 187, 255], [83, 255, 183, 255],
            [98, 255, 171, 255], [103, 255, 167, 255], [69, 255, 195, 255], [74, 255, 191, 255],
            [127, 255, 180, 255], [125, 255, 154, 255], [126, 255, 169, 255], [126, 255, 175, 255],
            [126, 255, 175, 255], [127, 255, 180, 255], [127, 255, 180, 255], [127, 255, 180, 255],
        ],
    ),
    (
        0x1a,
        [0x1a, 0x81, 0xe5, 0x62, 0x20, 0x4e, 0x12, 0x84, 0x09, 0x46, 0x09, 0xd6, 0x86, 0x6d, 0x87, 0x20],
        [
            [0, 255, 30, 255], [0, 255, 27, 255], [0, 255, 33, 255], [1, 255, 35, 255],
            [1, 255, 36, 255], [1, 255, 36, 255], [0, 255, 27, 255], [3, 255, 24, 255],
            [1, 255, 36, 255], [3, 255, 24, 255], [3, 255, 24, 255], [1, 255, 10, 255],
            [2, 255, 18, 255], [1, 255, 8, 255], [2, 255, 18, 255], [1, 255, 8, 255],
        ],
    ),
    (
        0x1e,
        [0xde, 0x59, 0xa1, 0x2b, 0xc0, 0x09, 0xe2, 0x87, 0x03, 0x10, 0x03, 0xa2, 0x57, 0x73, 0x92, 0x62],
        [
            [39, 0, 92, 255], [39, 0, 92, 255], [0, 255, 172, 255], [5, 255, 132, 255],
            [144, 6, 77, 255], [255, 51, 45, 255], [255, 28, 56, 255], [18, 255, 98, 255],
            [226, 11, 70, 255], [255, 39, 50, 255], [82, 2, 85, 255], [5, 255, 132, 255],
            [82, 2, 85, 255], [255, 28, 56, 255], [39, 0, 92, 255], [226, 11, 70, 255],
        ],
    ),
    (
        0x03,
        [0x23, 0xc3, 0xa0, 0x90, 0x6a, 0xc0, 0x22, 0x13, 0x7b, 0x49, 0xa5, 0x10, 0x4b, 0xf1, 0x2b, 0xce],
        [
            [106, 72, 130, 255], [64, 69, 153, 255], [37, 66, 176, 255], [128, 73, 120, 255],
            [106, 72, 130, 255], [23, 65, 191, 255], [248, 80, 83, 255], [215, 78, 91, 255],
            [15, 63, 203, 255], [128, 73, 120, 255], [215, 78, 91, 255], [0, 58, 255, 255],
            [15, 63, 203, 255], [179, 76, 102, 255], [1, 59, 247, 255], [9, 62, 216, 255],
        ],
    ),
    (
        0x07,
        [0xe7, 0x1f, 0xfd, 0x5f, 0x6f, 0xf1, 0xc6, 0xfe, 0xf2, 0x00, 0xfb, 0x80, 0xd7, 0x6e, 0x1c, 0x0e],
        [
            [255, 255, 186, 255], [255, 0, 184, 255], [255, 255, 186, 255], [255, 255, 186, 255],
            [255, 63, 185, 255], [255, 0, 184, 255], [255, 255, 186, 255], [255, 204, 185, 255],
            [255, 255, 185, 255], [255, 18, 185, 255], [255, 4, 184, 255], [255, 255, 185, 255],
            [255, 37, 185, 255], [255, 255, 186, 255], [255, 4, 184, 255], [255, 255, 186, 255],
        ],
    ),
    (
        0x0b,
        [0xcb, 0x5c, 0x8f, 0x83, 0x0c, 0xc3, 0xa7, 0x3d, 0xa7, 0x5d, 0x51, 0x34, 0xe7, 0x18, 0xe8, 0x05],
        [
            [25, 255, 134, 255], [28, 255, 144, 255], [30, 255, 149, 255], [26, 255, 137, 255],
            [24, 255, 131, 255], [26, 255, 137, 255], [25, 255, 135, 255], [25, 255, 134, 255],
            [27, 255, 140, 255], [30, 255, 151, 255], [27, 255, 141, 255], [24, 255, 131, 255],
            [27, 255, 141, 255], [30, 255, 151, 255], [26, 255, 137, 255], [23, 255, 129, 255],
        ],
    ),
    (
        0x0f,
        [0xcf, 0x45, 0xf9, 0x4d, 0xd9, 0x25, 0xa1, 0x94, 0xa6, 0xd5, 0xf9, 0xd8, 0xb4, 0x13, 0xc5, 0xaa],
        [
            [255, 1, 64, 255], [255, 1, 64, 255], [255, 1, 64, 255], [255, 1, 64, 255],
            [255, 1, 64, 255], [255, 1, 64, 255], [255, 1, 64, 255], [255, 1, 64, 255],
            [255, 1, 64, 255], [255, 1, 64, 255], [255, 1, 64, 255], [255, 1, 64, 255],
            [255, 1, 64, 255], [255, 1, 64, 255], [255, 1, 64, 255], [255, 1, 64, 255],
        ],
    ),
];

fn flatten(pixels: &[[u8; 4]; 16]) -> Vec<u8> {
    pixels.iter().flatten().copied().collect()
}

#[test]
fn test_bc7_modes() {
    for (mode, (block, expected)) in BC7_GOLDEN.iter().enumerate() {
        assert_eq!(block[0].trailing_zeros() as usize, mode);
        let rgba = decode_bc7(block, 4, 4).unwrap();
        assert_eq!(rgba, flatten(expected), "mode {mode}");
    }
}

#[test]
fn test_bc6h_modes() {
    for (raw_mode, block, expected) in &BC6H_GOLDEN {
        let rgba = decode_bc6h(block, 4, 4).unwrap();
        assert_eq!(rgba, flatten(expected), "mode {raw_mode:#04x}");
    }
}

#[test]
fn test_bc6h_reserved_modes_fail() {
    for raw_mode in [0x13u8, 0x17, 0x1b, 0x1f] {
        let mut block = [0u8; 16];
        block[0] = raw_mode;
        let err = decode_bc6h(&block, 4, 4).unwrap_err();
        assert!(matches!(err, Error::InvalidBlockMode { mode, .. } if mode == raw_mode));
        assert!(err.is_malformed_input());
    }
}

/// Lay the BC7 golden blocks out as a 4x2 block grid.
fn bc7_grid() -> Vec<u8> {
    BC7_GOLDEN.iter().flat_map(|(block, _)| *block).collect()
}

#[test]
fn test_block_placement() {
    let rgba = decode_bc7(&bc7_grid(), 16, 8).unwrap();
    let row_pitch = 16 * 4;
    for (i, (_, expected)) in BC7_GOLDEN.iter().enumerate() {
        let (bx, by) = (i % 4, i / 4);
        for py in 0..4 {
            let start = (by * 4 + py) * row_pitch + bx * 16;
            let row: Vec<u8> = expected[py * 4..py * 4 + 4].iter().flatten().copied().collect();
            assert_eq!(&rgba[start..start + 16], &row[..], "block {i} row {py}");
        }
    }
}

#[test]
fn test_partial_blocks_are_clipped() {
    // 14x5 still needs the full 4x2 block grid, but only the covered pixels land.
    let full = decode_bc7(&bc7_grid(), 16, 8).unwrap();
    let clipped = decode_bc7(&bc7_grid(), 14, 5).unwrap();
    assert_eq!(clipped.len(), 14 * 5 * 4);
    for y in 0..5 {
        assert_eq!(
            &clipped[y * 56..(y + 1) * 56],
            &full[y * 64..y * 64 + 56],
            "row {y}"
        );
    }
}

#[test]
fn test_texture_too_short() {
    let grid = bc7_grid();
    let err = decode_bc7(&grid[..grid.len() - 1], 16, 8).unwrap_err();
    assert!(matches!(
        err,
        Error::BufferTooShort {
            needed: 128,
            actual: 127,
            ..
        }
    ));
}

#[test]
fn test_parallel_matches_serial() {
    let grid: Vec<u8> = (0..6).flat_map(|_| bc7_grid()).collect();
    let options = TextureDecodeOptions::new(BptcVariant::Bc7).with_invert_green(true);
    // 16x45 pixels: 4 blocks across, 12 block rows
    let serial = decode_bptc(&grid, 16, 45, &options).unwrap();
    let parallel = decode_bptc_par(&grid, 16, 45, &options).unwrap();
    assert_eq!(serial, parallel);

    let bc6h: Vec<u8> = BC6H_GOLDEN.iter().flat_map(|(_, block, _)| *block).collect();
    let options = TextureDecodeOptions::new(BptcVariant::Bc6h);
    assert_eq!(
        decode_bptc(&bc6h, 28, 8, &options).unwrap(),
        decode_bptc_par(&bc6h, 28, 8, &options).unwrap()
    );
}

#[test]
fn test_normal_map_fixups() {
    let (block, expected) = &BC7_GOLDEN[6];
    let options = TextureDecodeOptions::new(BptcVariant::Bc7)
        .with_hemi_oct_rb(true)
        .with_invert_green(true);
    let rgba = decode_bptc(block, 4, 4, &options).unwrap();

    for (pixel, decoded) in expected.iter().zip(rgba.chunks_exact(4)) {
        let mut fixed = *pixel;
        postprocess::hemi_oct_normal(&mut fixed);
        postprocess::invert_green(&mut fixed);
        assert_eq!(decoded, &fixed[..]);
        assert_eq!(decoded[3], pixel[2]);
    }
}

#[test]
fn test_png_round_trip() {
    let rgba = decode_bc7(&bc7_grid(), 16, 8).unwrap();
    let png = rgba_to_png_bytes(16, 8, &rgba).unwrap();

    let image = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (16, 8));
    assert_eq!(image.into_raw(), rgba);
}

#[test]
fn test_write_png() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bc6h.png");
    let rgba = decode_bc6h(&BC6H_GOLDEN[0].1, 4, 4).unwrap();
    write_png(&path, 4, 4, &rgba).unwrap();

    let image = image::open(&path).unwrap().to_rgba8();
    assert_eq!(image.into_raw(), rgba);
}
