//! Core traits for brainviz
//!
//! These are the seams between the live pipeline and the collaborators it
//! drives: the acquisition device, the source-localization solver and the
//! mesh loader.

use crate::{error::Result, mesh::TriangleMesh, point::Point3f, sample::*};
use std::path::Path;
use std::sync::Arc;

/// A continuously running acquisition device.
///
/// Implementations publish new samples from their own thread at the
/// device's native rate.
pub trait AcquisitionStream: Send + Sync {
    /// The most recent complete sample. Never blocks.
    fn current_sample(&self) -> Arc<Sample>;

    /// Electrode layout, fixed when the stream was created
    fn electrode_layout(&self) -> Arc<ElectrodeLayout>;
}

/// Inverse solver estimating the positions of activity sources
pub trait LocalizationEngine: Send {
    /// Number of sources this engine estimates
    fn source_count(&self) -> usize;

    /// Set the sample subsequent `localize` calls work on
    fn set_data(&mut self, sample: &Sample);

    /// Estimate the position of source `index` (`0..source_count()`)
    fn localize(&mut self, index: usize) -> Result<Point3f>;
}

/// Loads a renderable mesh from a file
pub trait MeshLoader {
    fn load(&self, path: &Path) -> Result<TriangleMesh>;
}
