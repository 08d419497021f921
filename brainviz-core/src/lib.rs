//! Core data structures and traits for brainviz
//!
//! This crate provides the fundamental types shared by the acquisition,
//! localization and rendering sides of the live brain-activity viewer:
//! samples and electrode layouts, source snapshots, the whole-value
//! publication cell used between threads, and the orientation/zoom state
//! driven by user interaction.

pub mod point;
pub mod mesh;
pub mod sample;
pub mod snapshot;
pub mod published;
pub mod traits;
pub mod transform;
pub mod error;

pub use point::*;
pub use mesh::*;
pub use sample::*;
pub use snapshot::*;
pub use published::*;
pub use traits::*;
pub use transform::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3, Matrix3, Matrix4, UnitQuaternion, Unit};

/// Radius of the head sphere that electrodes, sources and the normalized
/// brain mesh live on, in scene units.
pub const HEAD_RADIUS: f32 = 1.0;
