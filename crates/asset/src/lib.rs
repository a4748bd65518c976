//! Asset loading/parsers for Wavefront OBJ meshes and MTL material libraries.
//!
//! Text is parsed into co-indexed vertex arrays with triangle index streams
//! ([`mesh`]) and a name-keyed material map ([`material`]); [`model`] merges the
//! two into interleaved draw parts ready for upload.

pub mod bounds;
pub mod error;
pub mod loader;
pub mod material;
pub mod mesh;
pub mod model;
pub mod mtl;
pub mod obj;
pub mod placeholder;
mod statement;

pub use error::{AssetError, ParseError};
pub use loader::{LoadOptions, LoadedSources, MissingMaterials, load_model_sources};
pub use material::{MaterialMap, MaterialRecord};
pub use mesh::{Geometry, ParseResult, VertexData};
pub use model::{DrawPart, GpuVertex, Model};
