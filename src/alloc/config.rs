use serde::{Deserialize, Serialize};

use super::error::AllocatorError;
use super::node::NodeIndex;

/// Construction parameters for an [`Allocator`](super::Allocator).
///
/// `Copy` and serde-derived, matching the crate's other configuration
/// structs (e.g. the vertex-allocator's pool thresholds): small, declarative,
/// and safe to embed in a larger config blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocatorConfig {
    /// Total capacity of the managed index space, in abstract units.
    pub size: u32,
    /// Fixed upper bound on the number of simultaneously live nodes
    /// (allocated *and* free).
    pub max_allocs: u32,
}

impl AllocatorConfig {
    /// A reasonable general-purpose default: enough node slots for 128
    /// concurrent live+free runs, which is plenty for descriptor-pool-style
    /// workloads without reserving much metadata memory up front.
    pub const DEFAULT_MAX_ALLOCS: u32 = 128;

    pub fn new(size: u32) -> Self {
        Self {
            size,
            max_allocs: Self::DEFAULT_MAX_ALLOCS,
        }
    }

    pub fn with_max_allocs(mut self, max_allocs: u32) -> Self {
        self.max_allocs = max_allocs;
        self
    }

    pub(super) fn validate(self) -> Result<(), AllocatorError> {
        if self.size == 0 {
            return Err(AllocatorError::InvalidConfig {
                reason: "size must be at least 1",
            });
        }
        if self.max_allocs == 0 {
            return Err(AllocatorError::InvalidConfig {
                reason: "max_allocs must be at least 1",
            });
        }
        if self.max_allocs >= NodeIndex::UNUSED.0 {
            return Err(AllocatorError::InvalidConfig {
                reason: "max_allocs must be less than NodeIndex::UNUSED",
            });
        }
        Ok(())
    }
}
