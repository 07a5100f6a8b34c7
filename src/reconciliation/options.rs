//! Search limits and engine options

use serde::{Deserialize, Serialize};

use crate::types::*;

/// Bounds on a subset-sum search. The default is unlimited, which explores
/// every non-empty subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLimits {
    /// Largest subset size to try; larger subsets are never considered
    #[serde(default)]
    pub max_subset_size: Option<usize>,
    /// Maximum number of combinations to examine before giving up with
    /// `SearchLimitExceeded`
    #[serde(default)]
    pub max_combinations: Option<u64>,
}

impl SearchLimits {
    /// No limits
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Only consider subsets of at most `size` elements
    pub fn with_max_subset_size(mut self, size: usize) -> Self {
        self.max_subset_size = Some(size);
        self
    }

    /// Abort after `count` combinations have been examined
    pub fn with_max_combinations(mut self, count: u64) -> Self {
        self.max_combinations = Some(count);
        self
    }

    /// Reject limits that would make every search fail trivially
    pub fn validate(&self) -> ReconciliationResult<()> {
        if self.max_subset_size == Some(0) {
            return Err(ReconciliationError::Validation(
                "max_subset_size must be at least 1".to_string(),
            ));
        }
        if self.max_combinations == Some(0) {
            return Err(ReconciliationError::Validation(
                "max_combinations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Options for a reconciliation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationOptions {
    /// Limits applied to every search; the combination budget is shared
    /// across the whole run
    #[serde(default)]
    pub limits: SearchLimits,
    /// Maximum number of passes before giving up with `SearchLimitExceeded`
    #[serde(default)]
    pub max_passes: Option<usize>,
}

impl ReconciliationOptions {
    pub fn new(limits: SearchLimits) -> Self {
        Self {
            limits,
            max_passes: None,
        }
    }

    pub fn with_max_passes(mut self, passes: usize) -> Self {
        self.max_passes = Some(passes);
        self
    }

    pub fn validate(&self) -> ReconciliationResult<()> {
        self.limits.validate()?;
        if self.max_passes == Some(0) {
            return Err(ReconciliationError::Validation(
                "max_passes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
