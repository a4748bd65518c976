//! CPU-side geometry produced by the OBJ parser.

/// Flat, co-indexed vertex attribute arrays: vertex `i` is
/// `position[3i..3i+3]`, `normal[3i..3i+3]`, `texcoord[2i..2i+2]`, `color[3i..3i+3]`.
///
/// Attributes the source did not provide for every vertex are `None` rather than
/// zero-filled. The parser always emits arrays of equal vertex count; accessors
/// return `None` for a vertex a hand-built array is too short to hold.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexData {
    pub position: Vec<f32>,
    pub normal: Option<Vec<f32>>,
    pub texcoord: Option<Vec<f32>>,
    pub color: Option<Vec<f32>>,
}

impl VertexData {
    pub fn vertex_count(&self) -> usize {
        self.position.len() / 3
    }

    pub fn position(&self, i: usize) -> Option<[f32; 3]> {
        triple(&self.position, i)
    }

    pub fn normal(&self, i: usize) -> Option<[f32; 3]> {
        self.normal.as_deref().and_then(|n| triple(n, i))
    }

    pub fn texcoord(&self, i: usize) -> Option<[f32; 2]> {
        self.texcoord
            .as_deref()
            .and_then(|t| t.chunks_exact(2).nth(i))
            .map(|t| [t[0], t[1]])
    }

    pub fn color(&self, i: usize) -> Option<[f32; 3]> {
        self.color.as_deref().and_then(|c| triple(c, i))
    }

    /// Iterate positions as triples.
    pub fn positions(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.position.chunks_exact(3).map(|p| [p[0], p[1], p[2]])
    }
}

fn triple(data: &[f32], i: usize) -> Option<[f32; 3]> {
    data.chunks_exact(3).nth(i).map(|p| [p[0], p[1], p[2]])
}

/// One draw-call worth of triangles sharing a material.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    /// `None` means the renderer's default material.
    pub material: Option<String>,
    pub object: Option<String>,
    pub groups: Vec<String>,
    pub data: VertexData,
    /// Triangle list into `data`.
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns `true` if both vertex and index buffers are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.data.position.is_empty() && !self.indices.is_empty()
    }

    /// Human-readable label: object, then groups, then material.
    pub fn label(&self) -> String {
        self.object
            .clone()
            .or_else(|| (!self.groups.is_empty()).then(|| self.groups.join(" ")))
            .or_else(|| self.material.clone())
            .unwrap_or_else(|| "<unnamed>".to_owned())
    }
}

/// Output of [`crate::obj::parse_obj`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParseResult {
    /// In the order the geometries were opened.
    pub geometries: Vec<Geometry>,
    /// `mtllib` file names as written; duplicates kept.
    pub material_libs: Vec<String>,
}

impl ParseResult {
    pub fn vertex_count(&self) -> usize {
        self.geometries.iter().map(|g| g.data.vertex_count()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.geometries.iter().map(Geometry::triangle_count).sum()
    }
}
