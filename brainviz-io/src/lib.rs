//! I/O operations for brainviz
//!
//! Loading of the anatomical model (Wavefront OBJ) and of electrode
//! layouts, plus the built-in headset montage.

pub mod obj;
pub mod layout;
pub mod error;

pub use error::*;
pub use layout::{epoc_layout, parse_layout, read_layout};
pub use obj::ObjReader;

use brainviz_core::{Error, MeshLoader, Result, TriangleMesh};
use std::path::Path;

/// Read a mesh, picking the loader from the file extension. With
/// `normalize_radius` the model is centered and fit to a sphere of that radius.
pub fn read_mesh<P: AsRef<Path>>(path: P, normalize_radius: Option<f32>) -> Result<TriangleMesh> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("obj") => ObjReader { normalize_radius }.load(path),
        _ => Err(Error::UnsupportedFormat(format!(
            "Unsupported mesh format: {:?}",
            path.extension()
        ))),
    }
}
