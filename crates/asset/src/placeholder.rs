//! Built-in fallback mesh for when a model cannot be parsed.

use crate::mesh::{Geometry, ParseResult, VertexData};

/// Unit cube centred on the origin, untextured and using the default material.
pub fn placeholder_cube() -> ParseResult {
    #[rustfmt::skip]
    let position = vec![
        -0.5, -0.5, -0.5, // 0
         0.5, -0.5, -0.5, // 1
         0.5,  0.5, -0.5, // 2
        -0.5,  0.5, -0.5, // 3
        -0.5, -0.5,  0.5, // 4
         0.5, -0.5,  0.5, // 5
         0.5,  0.5,  0.5, // 6
        -0.5,  0.5,  0.5, // 7
    ];
    #[rustfmt::skip]
    let indices = vec![
        4, 5, 6, 4, 6, 7, // +Z
        1, 0, 3, 1, 3, 2, // -Z
        5, 1, 2, 5, 2, 6, // +X
        0, 4, 7, 0, 7, 3, // -X
        7, 6, 2, 7, 2, 3, // +Y
        0, 1, 5, 0, 5, 4, // -Y
    ];

    ParseResult {
        geometries: vec![Geometry {
            object: Some("placeholder".to_owned()),
            data: VertexData {
                position,
                ..Default::default()
            },
            indices,
            ..Default::default()
        }],
        material_libs: Vec::new(),
    }
}
