//! # brainviz GPU
//!
//! Scene rendering for the live viewer using wgpu.
//!
//! Frames are described by [`scene::Frame`], an ordered list of draw
//! commands, and replayed against a [`scene::SceneRenderer`].
//! [`WgpuSceneRenderer`] is the windowed implementation:
//!
//! - a gradient background drawn without depth
//! - instanced octahedron markers for sources and electrodes
//! - the brain mesh, alpha-blended, depth-tested and never written to depth
//! - electrode labels painted with egui at their projected positions

pub mod device;
pub mod renderer;
pub mod scene;

pub use device::GpuContext;
pub use renderer::{octahedron, MeshVertex, SceneConfig, WgpuSceneRenderer};
pub use scene::*;
