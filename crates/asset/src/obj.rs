//! OBJ geometry parser: positions (with optional inline colors), normals,
//! texture coordinates, polygonal faces, material libraries and the
//! `usemtl`/`o`/`g` boundaries that split the file into geometries.

use std::{
    collections::HashMap,
    io::BufRead,
    num::IntErrorKind,
    path::Path,
};

use crate::{
    error::{AssetError, ParseError},
    loader::read_source,
    mesh::{Geometry, ParseResult, VertexData},
    statement::{Statement, statements},
};

/// Load and parse an OBJ file from disk.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> Result<ParseResult, AssetError> {
    let path = path.as_ref();
    let text = read_source(path)?;
    parse_obj(&text).map_err(|source| AssetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load an OBJ mesh from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(mut reader: R) -> Result<ParseResult, AssetError> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|source| AssetError::UnreadableStream { source })?;
    parse_obj(&text).map_err(|source| AssetError::InvalidStream { source })
}

/// Parse OBJ text into geometries and referenced material libraries.
pub fn parse_obj(text: &str) -> Result<ParseResult, ParseError> {
    let mut parser = ObjParser::default();
    for stmt in statements(text) {
        parser.statement(&stmt)?;
    }
    let result = parser.finish();
    log::debug!(
        "Parsed OBJ: {} geometries, {} vertices, {} triangles, {} material libs",
        result.geometries.len(),
        result.vertex_count(),
        result.triangle_count(),
        result.material_libs.len()
    );
    Ok(result)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Directive {
    Position,
    Normal,
    TexCoord,
    Face,
    MaterialLib,
    UseMaterial,
    Object,
    Group,
    Unknown,
}

impl Directive {
    fn from_tag(tag: &str) -> Self {
        match tag {
            "v" => Self::Position,
            "vn" => Self::Normal,
            "vt" => Self::TexCoord,
            "f" => Self::Face,
            "mtllib" => Self::MaterialLib,
            "usemtl" => Self::UseMaterial,
            "o" => Self::Object,
            "g" => Self::Group,
            _ => Self::Unknown,
        }
    }
}

/// Resolved 0-based (position, texcoord, normal) indices of one face corner.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
struct Key(usize, Option<usize>, Option<usize>);

/// Raw attribute pools, shared by every geometry in the file.
#[derive(Default)]
struct Pools {
    positions: Vec<[f32; 3]>,
    /// Parallel to `positions`.
    colors: Vec<Option<[f32; 3]>>,
    normals: Vec<[f32; 3]>,
    texcoords: Vec<[f32; 2]>,
}

/// Names the next geometry will be tagged with.
#[derive(Clone, Debug, Default)]
struct Tags {
    material: Option<String>,
    object: Option<String>,
    groups: Vec<String>,
}

/// Accumulates one geometry. Created on its first face, so an open builder
/// always holds at least one triangle.
struct GeometryBuilder {
    tags: Tags,
    unique: HashMap<Key, u32>,
    vertices: Vec<Key>,
    indices: Vec<u32>,
}

impl GeometryBuilder {
    fn new(tags: Tags) -> Self {
        Self {
            tags,
            unique: HashMap::new(),
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    fn vertex(&mut self, key: Key, stmt: &Statement<'_>) -> Result<u32, ParseError> {
        if let Some(&idx) = self.unique.get(&key) {
            return Ok(idx);
        }
        let idx = u32::try_from(self.vertices.len()).map_err(|_| ParseError::TooManyVertices {
            line: stmt.line,
            directive: stmt.tag.to_owned(),
        })?;
        self.vertices.push(key);
        self.unique.insert(key, idx);
        Ok(idx)
    }

    fn add_face(&mut self, corners: &[Key], stmt: &Statement<'_>) -> Result<(), ParseError> {
        let corners = corners
            .iter()
            .map(|&key| self.vertex(key, stmt))
            .collect::<Result<Vec<_>, _>>()?;
        // Triangulate fan
        for tri in 1..(corners.len() - 1) {
            self.indices.push(corners[0]);
            self.indices.push(corners[tri]);
            self.indices.push(corners[tri + 1]);
        }
        Ok(())
    }

    fn finish(self, pools: &Pools) -> Geometry {
        let keys = &self.vertices;
        let position: Vec<f32> = keys.iter().flat_map(|k| pools.positions[k.0]).collect();

        let texcoord: Option<Vec<f32>> = keys
            .iter()
            .map(|k| k.1.map(|i| pools.texcoords[i]))
            .collect::<Option<Vec<_>>>()
            .map(|uvs| uvs.into_iter().flatten().collect());
        let normal: Option<Vec<f32>> = keys
            .iter()
            .map(|k| k.2.map(|i| pools.normals[i]))
            .collect::<Option<Vec<_>>>()
            .map(|ns| ns.into_iter().flatten().collect());
        let color: Option<Vec<f32>> = keys
            .iter()
            .map(|k| pools.colors[k.0])
            .collect::<Option<Vec<_>>>()
            .map(|cs| cs.into_iter().flatten().collect());

        Geometry {
            material: self.tags.material,
            object: self.tags.object,
            groups: self.tags.groups,
            data: VertexData {
                position,
                normal,
                texcoord,
                color,
            },
            indices: self.indices,
        }
    }
}

#[derive(Default)]
struct ObjParser {
    pools: Pools,
    tags: Tags,
    current: Option<GeometryBuilder>,
    result: ParseResult,
}

impl ObjParser {
    fn statement(&mut self, stmt: &Statement<'_>) -> Result<(), ParseError> {
        match Directive::from_tag(stmt.tag) {
            Directive::Position => {
                let values = stmt.floats(3)?;
                self.pools.positions.push([values[0], values[1], values[2]]);
                // x y z [w] or x y z r g b
                let color = (values.len() >= 6).then(|| [values[3], values[4], values[5]]);
                self.pools.colors.push(color);
            }
            Directive::Normal => {
                self.pools.normals.push(stmt.vec3()?);
            }
            Directive::TexCoord => {
                let values = stmt.floats(1)?;
                let v = values.get(1).copied().unwrap_or(0.0);
                self.pools.texcoords.push([values[0], v]);
            }
            Directive::Face => self.face(stmt)?,
            Directive::MaterialLib => {
                let before = self.result.material_libs.len();
                self.result
                    .material_libs
                    .extend(stmt.operands().map(str::to_owned));
                if self.result.material_libs.len() == before {
                    return Err(stmt.missing());
                }
            }
            Directive::UseMaterial => {
                let name = stmt.name()?;
                self.boundary(stmt);
                self.tags.material = Some(name.to_owned());
            }
            Directive::Object => {
                let name = stmt.name()?;
                self.boundary(stmt);
                self.tags.object = Some(name.to_owned());
            }
            Directive::Group => {
                self.boundary(stmt);
                self.tags.groups = stmt.operands().map(str::to_owned).collect();
            }
            Directive::Unknown => {
                log::trace!("Skipping unsupported OBJ directive '{}' on line {}", stmt.tag, stmt.line);
            }
        }
        Ok(())
    }

    /// Close the open geometry. Since builders only exist once a face was added,
    /// a boundary with nothing open simply retags the next geometry.
    fn boundary(&mut self, stmt: &Statement<'_>) {
        if let Some(builder) = self.current.take() {
            log::debug!(
                "Closing geometry with {} triangles at '{}' on line {}",
                builder.indices.len() / 3,
                stmt.tag,
                stmt.line
            );
            self.result.geometries.push(builder.finish(&self.pools));
        }
    }

    fn face(&mut self, stmt: &Statement<'_>) -> Result<(), ParseError> {
        let corners = stmt
            .operands()
            .map(|token| self.corner(token, stmt))
            .collect::<Result<Vec<_>, _>>()?;
        if corners.len() < 3 {
            return Err(ParseError::DegenerateFace {
                line: stmt.line,
                directive: stmt.tag.to_owned(),
                corners: corners.len(),
            });
        }
        let tags = &self.tags;
        self.current
            .get_or_insert_with(|| GeometryBuilder::new(tags.clone()))
            .add_face(&corners, stmt)
    }

    fn corner(&self, token: &str, stmt: &Statement<'_>) -> Result<Key, ParseError> {
        let mut split = token.split('/');
        let pos = split.next().unwrap_or_default();
        let pos_idx = resolve_index(pos, self.pools.positions.len(), stmt)?;

        let tex_idx = match split.next() {
            Some(value) if !value.is_empty() => {
                Some(resolve_index(value, self.pools.texcoords.len(), stmt)?)
            }
            _ => None,
        };

        let norm_idx = match split.next() {
            Some(value) if !value.is_empty() => {
                Some(resolve_index(value, self.pools.normals.len(), stmt)?)
            }
            _ => None,
        };

        Ok(Key(pos_idx, tex_idx, norm_idx))
    }

    fn finish(mut self) -> ParseResult {
        if let Some(builder) = self.current.take() {
            self.result.geometries.push(builder.finish(&self.pools));
        }
        self.result
    }
}

/// Resolve a 1-based (or negative, end-relative) OBJ index against a pool of
/// `len` entries, returning a 0-based index.
fn resolve_index(token: &str, len: usize, stmt: &Statement<'_>) -> Result<usize, ParseError> {
    let out_of_range = || ParseError::IndexOutOfRange {
        line: stmt.line,
        directive: stmt.tag.to_owned(),
        token: token.to_owned(),
        len,
    };
    // An integer too wide for i64 is still an index, just never a valid one.
    let raw = token.parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => out_of_range(),
        _ => stmt.malformed(token),
    })?;

    let one_based = if raw < 0 {
        i64::try_from(len)
            .ok()
            .and_then(|len| len.checked_add(raw + 1))
            .ok_or_else(out_of_range)?
    } else {
        raw
    };

    match usize::try_from(one_based) {
        Ok(idx) if idx >= 1 && idx <= len => Ok(idx - 1),
        _ => Err(out_of_range()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    const TRIANGLE: &str = r#"
        v 0.0 0.0 0.0
        v 1.0 0.0 0.0
        v 0.0 1.0 0.0
    "#;

    fn parse(src: &str) -> ParseResult {
        parse_obj(src).expect("valid OBJ")
    }

    fn assert_co_indexed(g: &Geometry) {
        let n = g.data.vertex_count();
        assert_eq!(g.data.position.len(), n * 3);
        if let Some(normal) = &g.data.normal {
            assert_eq!(normal.len(), n * 3);
        }
        if let Some(texcoord) = &g.data.texcoord {
            assert_eq!(texcoord.len(), n * 2);
        }
        if let Some(color) = &g.data.color {
            assert_eq!(color.len(), n * 3);
        }
        assert_eq!(g.indices.len() % 3, 0);
        assert!(g.indices.iter().all(|&i| (i as usize) < n));
    }

    #[test]
    fn load_from_reader() {
        let src = format!("{TRIANGLE}usemtl red\nf 1 2 3\n");
        let result = load_obj_from_reader(io::Cursor::new(src)).expect("parse from reader");
        assert_eq!(result.geometries.len(), 1);
        assert_eq!(result.geometries[0].material.as_deref(), Some("red"));
        assert_eq!(result.geometries[0].indices, vec![0, 1, 2]);
    }

    #[test]
    fn reader_errors_are_distinguished() {
        let err = load_obj_from_reader(io::Cursor::new(vec![b'v', b' ', 0xff, 0xfe])).unwrap_err();
        assert!(err.is_unreadable());
        assert!(matches!(err, AssetError::UnreadableStream { .. }));

        let err = load_obj_from_reader(io::Cursor::new("v 0 0 0\nf 1 1\n")).unwrap_err();
        assert!(!err.is_unreadable());
        assert!(matches!(
            err,
            AssetError::InvalidStream {
                source: ParseError::DegenerateFace { line: 2, .. }
            }
        ));
    }

    #[test]
    fn parse_simple_triangle() {
        let src = r#"
            v 0.0 0.0 0.0
            v 1.0 0.0 0.0
            v 0.0 1.0 0.0
            vn 0.0 0.0 1.0
            vt 0.0 0.0
            vt 1.0 0.0
            vt 0.0 1.0
            f 1/1/1 2/2/1 3/3/1
        "#;
        let result = parse(src);
        assert_eq!(result.geometries.len(), 1);
        let g = &result.geometries[0];
        assert_eq!(g.data.vertex_count(), 3);
        assert_eq!(g.indices, vec![0, 1, 2]);
        assert_eq!(g.data.normal(2), Some([0.0, 0.0, 1.0]));
        assert_eq!(g.data.texcoord(1), Some([1.0, 0.0]));
        assert_eq!(g.data.color, None);
        assert_eq!(g.material, None);
        assert!(g.is_valid());
        assert_co_indexed(g);
    }

    #[test]
    fn fan_triangulates_polygons() {
        let src = format!("{TRIANGLE}v 0 0 1\nv 1 1 1\nf 1 2 3 4 5\n");
        let g = &parse(&src).geometries[0];
        assert_eq!(g.triangle_count(), 3);
        assert_eq!(g.indices, vec![0, 1, 2, 0, 2, 3, 0, 3, 4]);
    }

    #[test]
    fn repeated_corners_share_output_vertices() {
        let src = format!("{TRIANGLE}v 1 1 0\nf 1 2 3\nf 3 2 4\n");
        let g = &parse(&src).geometries[0];
        assert_eq!(g.data.vertex_count(), 4);
        assert_eq!(g.indices, vec![0, 1, 2, 2, 1, 3]);
        assert_co_indexed(g);
    }

    #[test]
    fn differing_attribute_index_gets_distinct_vertex() {
        let src = format!("{TRIANGLE}vn 0 0 1\nvn 0 0 -1\nf 1//1 2//1 3//1\nf 1//2 2//1 3//1\n");
        let g = &parse(&src).geometries[0];
        assert_eq!(g.data.vertex_count(), 4);
        assert_eq!(g.indices, vec![0, 1, 2, 3, 1, 2]);
        assert_eq!(g.data.normal(3), Some([0.0, 0.0, -1.0]));
    }

    #[test]
    fn unspecified_texcoord_differs_from_first_texcoord() {
        let src = format!("{TRIANGLE}vt 0 0\nf 1 2 3\nf 1/1 2 3\n");
        let g = &parse(&src).geometries[0];
        assert_eq!(g.data.vertex_count(), 4);
        // vertex 0 has no texcoord, so the array is dropped entirely
        assert_eq!(g.data.texcoord, None);
    }

    #[test]
    fn negative_indices_resolve_against_current_pool() {
        let src = "v 0 0 0\nv 1 0 0\nv 2 0 0\nv 3 0 0\nv 4 0 0\nf -3 -2 -1\nv 9 9 9\n";
        let g = &parse(src).geometries[0];
        assert_eq!(g.data.positions().collect::<Vec<_>>(), vec![
            [2.0, 0.0, 0.0],
            [3.0, 0.0, 0.0],
            [4.0, 0.0, 0.0]
        ]);
    }

    #[test]
    fn resolve_negative_one_is_last() {
        let stmt = statements("f -1").next().unwrap();
        assert_eq!(resolve_index("-1", 5, &stmt), Ok(4));
        assert_eq!(resolve_index("-5", 5, &stmt), Ok(0));
        assert!(matches!(
            resolve_index("-6", 5, &stmt),
            Err(ParseError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn zero_index_is_out_of_range() {
        let err = parse_obj(&format!("{TRIANGLE}f 1 2 0\n")).unwrap_err();
        assert_eq!(err, ParseError::IndexOutOfRange {
            line: 5,
            directive: "f".into(),
            token: "0".into(),
            len: 3,
        });
    }

    #[test]
    fn index_past_pool_is_out_of_range() {
        let err = parse_obj(&format!("{TRIANGLE}f 1 2 99\n")).unwrap_err();
        assert!(matches!(err, ParseError::IndexOutOfRange { ref token, len: 3, .. } if token == "99"));
    }

    #[test]
    fn forward_reference_is_out_of_range() {
        let err = parse_obj("v 0 0 0\nv 1 0 0\nf 1 2 3\nv 0 1 0\n").unwrap_err();
        assert!(matches!(err, ParseError::IndexOutOfRange { line: 3, .. }));
    }

    #[test]
    fn texcoord_and_normal_indices_are_bounds_checked() {
        let err = parse_obj(&format!("{TRIANGLE}vt 0 0\nf 1/2 2/1 3/1\n")).unwrap_err();
        assert!(matches!(err, ParseError::IndexOutOfRange { len: 1, .. }));
        let err = parse_obj(&format!("{TRIANGLE}f 1//1 2 3\n")).unwrap_err();
        assert!(matches!(err, ParseError::IndexOutOfRange { len: 0, .. }));
    }

    #[test]
    fn oversized_index_is_out_of_range() {
        let err = parse_obj(&format!("{TRIANGLE}f 1 2 99999999999999999999\n")).unwrap_err();
        assert_eq!(err, ParseError::IndexOutOfRange {
            line: 5,
            directive: "f".into(),
            token: "99999999999999999999".into(),
            len: 3,
        });
        let err = parse_obj(&format!("{TRIANGLE}f 1 2 -99999999999999999999\n")).unwrap_err();
        assert!(matches!(err, ParseError::IndexOutOfRange { line: 5, len: 3, .. }));
    }

    #[test]
    fn two_corner_face_is_degenerate() {
        let err = parse_obj(&format!("{TRIANGLE}f 1 2\n")).unwrap_err();
        assert_eq!(err, ParseError::DegenerateFace {
            line: 5,
            directive: "f".into(),
            corners: 2
        });
    }

    #[test]
    fn malformed_numbers_are_reported() {
        let err = parse_obj("v 0 zero 0\n").unwrap_err();
        assert_eq!(err, ParseError::MalformedNumber {
            line: 1,
            directive: "v".into(),
            token: "zero".into(),
        });
        let err = parse_obj(&format!("{TRIANGLE}f 1 2 x\n")).unwrap_err();
        assert!(matches!(err, ParseError::MalformedNumber { line: 5, ref token, .. } if token == "x"));
    }

    #[test]
    fn short_position_is_missing_operand() {
        let err = parse_obj("v 1 2\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingOperand { line: 1, .. }));
    }

    #[test]
    fn homogeneous_weight_is_dropped() {
        let src = "v 1 2 3 0.5\nv 4 5 6 1\nv 7 8 9\nf 1 2 3\n";
        let g = &parse(src).geometries[0];
        assert_eq!(g.data.position(0), Some([1.0, 2.0, 3.0]));
        assert_eq!(g.data.color, None);
    }

    #[test]
    fn inline_colors_are_kept_when_complete() {
        let src = "v 0 0 0 1 0 0\nv 1 0 0 0 1 0\nv 0 1 0 0 0 1\nf 1 2 3\n";
        let g = &parse(src).geometries[0];
        assert_eq!(g.data.color(0), Some([1.0, 0.0, 0.0]));
        assert_eq!(g.data.color(2), Some([0.0, 0.0, 1.0]));
        assert_co_indexed(g);
    }

    #[test]
    fn partial_inline_colors_are_omitted() {
        let src = "v 0 0 0 1 0 0\nv 1 0 0 0 1 0\nv 0 1 0\nf 1 2 3\n";
        assert_eq!(parse(src).geometries[0].data.color, None);
    }

    #[test]
    fn colors_only_consider_vertices_used_by_the_geometry() {
        let src = "v 0 0 0 1 1 1\nv 1 0 0 1 1 1\nv 0 1 0 1 1 1\nv 5 5 5\nf 1 2 3\n";
        assert!(parse(src).geometries[0].data.color.is_some());
    }

    #[test]
    fn texcoord_keeps_two_components() {
        let src = format!("{TRIANGLE}vt 0.25 0.5 0.75\nvt 1\nf 1/1 2/2 3/1\n");
        let g = &parse(&src).geometries[0];
        assert_eq!(g.data.texcoord(0), Some([0.25, 0.5]));
        assert_eq!(g.data.texcoord(1), Some([1.0, 0.0]));
        assert_co_indexed(g);
    }

    #[test]
    fn usemtl_before_faces_retags_in_place() {
        let src = format!("{TRIANGLE}usemtl A\nusemtl B\nf 1 2 3\n");
        let result = parse(&src);
        assert_eq!(result.geometries.len(), 1);
        assert_eq!(result.geometries[0].material.as_deref(), Some("B"));
    }

    #[test]
    fn boundaries_split_geometries_in_order() {
        let src = format!(
            "{TRIANGLE}mtllib scene.mtl\no shelf\nusemtl wood\nf 1 2 3\nusemtl metal\nf 3 2 1\ng legs\nf 1 2 3\n"
        );
        let result = parse(&src);
        let tags: Vec<_> = result
            .geometries
            .iter()
            .map(|g| (g.object.as_deref(), g.material.as_deref(), g.groups.clone()))
            .collect();
        assert_eq!(tags, vec![
            (Some("shelf"), Some("wood"), vec![]),
            (Some("shelf"), Some("metal"), vec![]),
            (Some("shelf"), Some("metal"), vec!["legs".to_owned()]),
        ]);
        for g in &result.geometries {
            assert_co_indexed(g);
        }
    }

    #[test]
    fn each_geometry_has_its_own_vertex_cache() {
        let src = format!("{TRIANGLE}usemtl a\nf 1 2 3\nusemtl b\nf 1 2 3\n");
        let result = parse(&src);
        assert_eq!(result.geometries.len(), 2);
        for g in &result.geometries {
            assert_eq!(g.indices, vec![0, 1, 2]);
            assert_eq!(g.data.vertex_count(), 3);
        }
    }

    #[test]
    fn trailing_boundary_without_faces_is_not_emitted() {
        let src = format!("{TRIANGLE}f 1 2 3\nusemtl unused\no empty\n");
        assert_eq!(parse(&src).geometries.len(), 1);
    }

    #[test]
    fn material_libs_keep_order_and_duplicates() {
        let src = "mtllib a.mtl b.mtl\nmtllib a.mtl\n";
        let result = parse(src);
        assert_eq!(result.material_libs, vec!["a.mtl", "b.mtl", "a.mtl"]);
        assert!(result.geometries.is_empty());
    }

    #[test]
    fn unknown_directives_are_ignored() {
        let src = format!("{TRIANGLE}s off\nl 1 2\nvp 0.5\ncstype bezier\nf 1 2 3\n");
        assert_eq!(parse(&src).geometries.len(), 1);
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let src = "# cube\n\nv 0 0 0 # origin\nv 1 0 0\nv 0 1 0\n\nf 1 2 3 # tri\n";
        let g = &parse(src).geometries[0];
        assert_eq!(g.indices, vec![0, 1, 2]);
    }
}
