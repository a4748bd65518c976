//! Reading an OBJ file and the material libraries it references.

use std::{
    fs,
    path::{Path, PathBuf},
    thread,
};

use crate::{
    error::AssetError,
    material::MaterialMap,
    mesh::ParseResult,
    mtl::parse_mtl_sources,
    obj::load_obj_from_path,
};

/// What to do when a referenced material library cannot be read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingMaterials {
    /// Fail the whole load with [`AssetError::UnreadableSource`].
    #[default]
    Fail,
    /// Log a warning and continue without that library.
    Skip,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub missing_materials: MissingMaterials,
}

/// Parsed OBJ plus the merged materials of every library that was read.
#[derive(Clone, Debug)]
pub struct LoadedSources {
    pub mesh: ParseResult,
    pub materials: MaterialMap,
    /// Material libraries actually read, in request order.
    pub material_paths: Vec<PathBuf>,
}

/// Read a text source, tagging I/O failures with the path.
pub fn read_source(path: &Path) -> Result<String, AssetError> {
    fs::read_to_string(path).map_err(|source| AssetError::UnreadableSource {
        path: path.to_path_buf(),
        source,
    })
}

/// Load an OBJ file and every `mtllib` it names.
///
/// Library paths are relative to the OBJ file's directory. Libraries are read
/// concurrently but parsed as one text joined in request order, so a material
/// redefined by a later library wins.
pub fn load_model_sources(
    obj_path: impl AsRef<Path>,
    options: &LoadOptions,
) -> Result<LoadedSources, AssetError> {
    let obj_path = obj_path.as_ref();
    log::info!("Loading OBJ from {:?}", obj_path);
    let mesh = load_obj_from_path(obj_path)?;

    let base = obj_path.parent().unwrap_or_else(|| Path::new(""));
    let requested: Vec<PathBuf> = mesh.material_libs.iter().map(|lib| base.join(lib)).collect();

    let mut material_paths = Vec::with_capacity(requested.len());
    let mut sources = Vec::with_capacity(requested.len());
    for (path, text) in requested.iter().zip(read_all(&requested)) {
        match text {
            Ok(text) => {
                material_paths.push(path.clone());
                sources.push(text);
            }
            Err(err) if options.missing_materials == MissingMaterials::Skip => {
                log::warn!("Skipping material library {:?}: {}", path, io_reason(&err));
            }
            Err(err) => return Err(err),
        }
    }

    let materials = parse_mtl_sources(&sources).map_err(|err| {
        let (file, line) = locate(&sources, err.line());
        AssetError::Parse {
            path: material_paths[file].clone(),
            source: err.at_line(line),
        }
    })?;

    log::info!(
        "Loaded {} geometries ({} vertices, {} triangles) and {} materials from {} libraries",
        mesh.geometries.len(),
        mesh.vertex_count(),
        mesh.triangle_count(),
        materials.len(),
        material_paths.len()
    );

    Ok(LoadedSources {
        mesh,
        materials,
        material_paths,
    })
}

/// Read every path on its own scoped thread; results keep the order of `paths`.
fn read_all(paths: &[PathBuf]) -> Vec<Result<String, AssetError>> {
    thread::scope(|scope| {
        let handles: Vec<_> = paths
            .iter()
            .map(|path| scope.spawn(move || read_source(path)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    })
}

/// Map a line of the `"\n"`-joined sources back to (source index, local line).
fn locate<S: AsRef<str>>(sources: &[S], joined_line: usize) -> (usize, usize) {
    let mut first = 1;
    for (i, source) in sources.iter().enumerate() {
        let lines = source.as_ref().matches('\n').count() + 1;
        if joined_line < first + lines {
            return (i, joined_line - first + 1);
        }
        first += lines;
    }
    (sources.len().saturating_sub(1), joined_line)
}

fn io_reason(err: &AssetError) -> String {
    match err {
        AssetError::UnreadableSource { source, .. } => source.to_string(),
        other => other.to_string(),
    }
}
