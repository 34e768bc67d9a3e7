//! Scene file loading.

use std::path::Path;

use thiserror::Error;

use crate::parser::{parse_scene, ParseError};
use crate::scene::SceneDescription;

/// Errors that can occur while loading a scene.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Load a scene description from a scene file.
pub fn load_scene<P: AsRef<Path>>(path: P) -> LoadResult<SceneDescription> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let scene = load_scene_from_string(&content)?;

    log::info!(
        "Loaded {}: {} nodes, {} lights",
        path.display(),
        scene.node_count(),
        scene.light_count()
    );

    Ok(scene)
}

/// Load a scene description from in-memory text (useful for testing).
pub fn load_scene_from_string(content: &str) -> LoadResult<SceneDescription> {
    Ok(parse_scene(content)?)
}
