//! Live 3D viewer for brainviz
//!
//! This crate ties the pipeline to the screen:
//! - [`controller`]: object-local rotation and bounded zoom from user input
//! - [`render_loop`]: frame composition from the latest published snapshot
//! - [`camera`]: the fixed camera and per-frame view state
//! - [`viewer`]: the winit window and event loop

pub mod camera;
pub mod controller;
pub mod render_loop;
pub mod viewer;

pub use camera::*;
pub use controller::*;
pub use render_loop::*;
pub use viewer::*;

use brainviz_core::{TriangleMesh, Vector3f};

/// Stand-in brain used when no model file is given: an ellipsoid inside the
/// electrode sphere, longer front to back than it is wide or tall
pub fn default_brain_mesh() -> TriangleMesh {
    TriangleMesh::ellipsoid(Vector3f::new(0.85, 0.7, 0.65), 48, 24)
}
