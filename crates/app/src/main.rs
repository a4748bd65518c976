//! Entry point for objview: load an OBJ model with its materials and report
//! the draw parts a renderer would upload.

mod config;

use anyhow::{Context, Result};
use asset::{
    AssetError, MaterialMap, MaterialRecord, Model, load_model_sources,
    placeholder::placeholder_cube,
};

use crate::config::{AppConfig, OnParseError};

fn load_model(config: &AppConfig, default_material: &MaterialRecord) -> Result<Model> {
    match load_model_sources(&config.obj_path, &config.load_options()) {
        Ok(sources) => Ok(Model::from_sources(&sources, default_material)),
        Err(err @ AssetError::Parse { .. }) if config.on_parse_error == OnParseError::Placeholder => {
            log::error!("{:#}", anyhow::Error::from(err));
            log::warn!("Falling back to placeholder mesh.");
            Ok(Model::assemble(
                &placeholder_cube(),
                &MaterialMap::new(),
                default_material,
            ))
        }
        Err(err) => Err(err)
            .with_context(|| format!("Failed to load model {}", config.obj_path.display())),
    }
}

fn report(model: &Model) {
    for (i, part) in model.parts.iter().enumerate() {
        log::info!(
            "Part {} '{}': material='{}', vertices={}, triangles={}, opacity={:.2}",
            i,
            part.label,
            part.material.name,
            part.vertices.len(),
            part.triangle_count(),
            part.material.opacity
        );
    }

    if model.extents.is_empty() {
        log::warn!("Model has no geometry; nothing to frame.");
        return;
    }
    log::info!(
        "Extents: min={:?}, max={:?}, center={:?}, size={:?}",
        model.extents.min,
        model.extents.max,
        model.extents.center(),
        model.extents.size()
    );
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_args(std::env::args().skip(1))?;
    log::info!(
        "Starting objview. obj={}, missing_materials={:?}, on_parse_error={:?}",
        config.obj_path.display(),
        config.missing_materials,
        config.on_parse_error
    );

    let default_material = MaterialRecord::viewer_default();
    let model = load_model(&config, &default_material)?;
    report(&model);

    log::info!(
        "Ready: {} parts, {} vertices, {} triangles.",
        model.parts.len(),
        model.vertex_count(),
        model.triangle_count()
    );
    Ok(())
}
