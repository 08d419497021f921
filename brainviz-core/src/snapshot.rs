//! Source-position snapshots published by the localization pipeline

use crate::point::*;
use serde::{Deserialize, Serialize};

/// How a source estimate in a snapshot was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstimateStatus {
    /// Computed in the cycle that produced the snapshot
    Fresh,
    /// Localization failed; the previously published position was carried over
    Stale,
    /// No position has ever been computed for this source
    Unknown,
}

/// Position estimate of one activity source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceEstimate {
    pub position: Point3f,
    pub status: EstimateStatus,
}

impl SourceEstimate {
    pub fn fresh(position: Point3f) -> Self {
        Self {
            position,
            status: EstimateStatus::Fresh,
        }
    }

    /// Sentinel for a source that has never been localized
    pub fn unknown() -> Self {
        Self {
            position: Point3f::origin(),
            status: EstimateStatus::Unknown,
        }
    }

    /// The same position, marked as carried over from an earlier cycle.
    /// A sentinel stays a sentinel.
    pub fn into_stale(self) -> Self {
        match self.status {
            EstimateStatus::Unknown => self,
            _ => Self {
                position: self.position,
                status: EstimateStatus::Stale,
            },
        }
    }

    pub fn is_known(&self) -> bool {
        self.status != EstimateStatus::Unknown
    }
}

/// Complete, immutable set of source estimates produced by one
/// orchestration cycle.
///
/// A snapshot always holds exactly one estimate per source. It is never
/// edited after construction; a new cycle builds a new snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSnapshot {
    cycle: u64,
    estimates: Vec<SourceEstimate>,
}

impl SourceSnapshot {
    /// Snapshot installed before the first cycle completes: every source unknown
    pub fn initial(source_count: usize) -> Self {
        Self {
            cycle: 0,
            estimates: vec![SourceEstimate::unknown(); source_count],
        }
    }

    pub fn new(cycle: u64, estimates: Vec<SourceEstimate>) -> Self {
        Self { cycle, estimates }
    }

    /// Cycle number that produced this snapshot (0 for the initial one)
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn len(&self) -> usize {
        self.estimates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }

    pub fn estimates(&self) -> &[SourceEstimate] {
        &self.estimates
    }

    pub fn get(&self, index: usize) -> Option<&SourceEstimate> {
        self.estimates.get(index)
    }

    /// Positions in source order
    pub fn positions(&self) -> impl Iterator<Item = Point3f> + '_ {
        self.estimates.iter().map(|e| e.position)
    }

    /// Number of estimates computed in this snapshot's own cycle
    pub fn fresh_count(&self) -> usize {
        self.estimates
            .iter()
            .filter(|e| e.status == EstimateStatus::Fresh)
            .count()
    }
}
