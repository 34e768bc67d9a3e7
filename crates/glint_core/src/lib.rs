//! glint core - scene descriptions and scene file loading.
//!
//! This crate provides:
//!
//! - **Scene descriptions**: `SceneDescription`, `NodeDescription` and the
//!   geometry, shader and texture variants a scene file can name
//! - **Scene files**: a parser for the block-structured scene format and
//!   loaders that read it from disk or from a string
//!
//! # Example
//!
//! ```ignore
//! use glint_core::load_scene;
//!
//! let scene = load_scene("scenes/demo.scene")?;
//! println!("Loaded {} nodes, {} lights", scene.node_count(), scene.light_count());
//! ```

pub mod loader;
pub mod parser;
pub mod scene;

// Re-export commonly used types
pub use loader::{load_scene, load_scene_from_string, LoadError, LoadResult};
pub use parser::{parse_scene, ParseError, ParseResult};
pub use scene::{
    CameraSettings, FrameSettings, GeometryDescription, LightDescription, NodeDescription,
    PlaneOrientation, SceneDescription, ShaderDescription, TextureDescription,
};
