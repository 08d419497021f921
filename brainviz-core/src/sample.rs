//! Acquisition samples and electrode layouts

use crate::error::{Error, Result};
use crate::point::*;
use serde::{Deserialize, Serialize};

/// One multi-channel reading from the acquisition device.
///
/// Samples are immutable once built; the acquisition side replaces the
/// current sample as a whole instead of editing channels in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Monotonic counter assigned by the producing stream
    pub sequence: u64,
    /// One value per electrode, in layout order (microvolts)
    pub values: Vec<f64>,
}

impl Sample {
    /// Create a sample
    pub fn new(sequence: u64, values: Vec<f64>) -> Self {
        Self { sequence, values }
    }

    /// An all-zero sample, published before the device delivers real data
    pub fn zeros(channels: usize) -> Self {
        Self::new(0, vec![0.0; channels])
    }

    /// Number of channels in this sample
    pub fn channel_count(&self) -> usize {
        self.values.len()
    }
}

/// A sensor on the scalp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Electrode {
    pub position: Point3f,
    pub label: String,
}

impl Electrode {
    pub fn new(label: impl Into<String>, position: Point3f) -> Self {
        Self {
            position,
            label: label.into(),
        }
    }
}

/// Ordered, fixed set of electrodes of an acquisition device
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElectrodeLayout {
    electrodes: Vec<Electrode>,
}

impl ElectrodeLayout {
    /// Build a layout, rejecting duplicate labels
    pub fn new(electrodes: Vec<Electrode>) -> Result<Self> {
        for (i, e) in electrodes.iter().enumerate() {
            if electrodes[..i].iter().any(|other| other.label == e.label) {
                return Err(Error::InvalidData(format!(
                    "duplicate electrode label '{}'",
                    e.label
                )));
            }
        }
        Ok(Self { electrodes })
    }

    /// Number of electrodes
    pub fn len(&self) -> usize {
        self.electrodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.electrodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Electrode> {
        self.electrodes.iter()
    }

    pub fn as_slice(&self) -> &[Electrode] {
        &self.electrodes
    }

    /// Index of the electrode with the given label
    pub fn position_of(&self, label: &str) -> Option<usize> {
        self.electrodes.iter().position(|e| e.label == label)
    }

    /// Check that a sample carries exactly one value per electrode
    pub fn check_sample(&self, sample: &Sample) -> Result<()> {
        if sample.channel_count() != self.len() {
            return Err(Error::InvalidData(format!(
                "sample has {} channels, layout has {} electrodes",
                sample.channel_count(),
                self.len()
            )));
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ElectrodeLayout {
    type Item = &'a Electrode;
    type IntoIter = std::slice::Iter<'a, Electrode>;

    fn into_iter(self) -> Self::IntoIter {
        self.electrodes.iter()
    }
}
