//! Grouping constraints shared by the construction heuristics.

use crate::error::{GgaError, Result};

/// Hard constraints and thresholds used by compatibility tests and the
/// consolidation pass.
///
/// Similarity, agreement and disagreement values are expected to be ratios
/// in `[0, 1]`.
///
/// # Examples
///
/// ```
/// use u_gga::heuristic::GroupingConfig;
///
/// let config = GroupingConfig::default()
///     .with_min_similarity(0.4)
///     .with_max_group_size(10)
///     .with_min_group_size(2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupingConfig {
    /// Groups smaller than this are dissolved after construction when all
    /// their members can be rehomed. `1` disables the check.
    pub min_group_size: usize,

    /// Upper bound on the number of objects in one group.
    pub max_group_size: usize,

    /// An object joins a group only if its similarity to every member is at
    /// least this value.
    pub min_similarity: f64,

    /// An object joins a group only if its agreement with every member is
    /// at least this value.
    pub min_agreement: f64,

    /// An object never joins a group holding a member it disagrees with
    /// more than this value.
    pub max_disagreement: f64,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            min_group_size: 1,
            max_group_size: usize::MAX,
            min_similarity: 0.0,
            min_agreement: 0.0,
            max_disagreement: 1.0,
        }
    }
}

impl GroupingConfig {
    /// Sets the minimum group size (at least 1).
    pub fn with_min_group_size(mut self, n: usize) -> Self {
        self.min_group_size = n.max(1);
        self
    }

    /// Sets the maximum group size.
    pub fn with_max_group_size(mut self, n: usize) -> Self {
        self.max_group_size = n;
        self
    }

    /// Sets the minimum similarity to every member.
    pub fn with_min_similarity(mut self, threshold: f64) -> Self {
        self.min_similarity = threshold;
        self
    }

    /// Sets the minimum agreement with every member.
    pub fn with_min_agreement(mut self, threshold: f64) -> Self {
        self.min_agreement = threshold;
        self
    }

    /// Sets the maximum disagreement with any member.
    pub fn with_max_disagreement(mut self, threshold: f64) -> Self {
        self.max_disagreement = threshold;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.min_group_size == 0 {
            return Err("min_group_size must be at least 1".into());
        }
        if self.max_group_size == 0 {
            return Err("max_group_size must be at least 1".into());
        }
        if self.min_group_size > self.max_group_size {
            return Err(GgaError::InvalidParameter(format!(
                "min_group_size ({}) exceeds max_group_size ({})",
                self.min_group_size, self.max_group_size
            )));
        }
        for (name, value) in [
            ("min_similarity", self.min_similarity),
            ("min_agreement", self.min_agreement),
            ("max_disagreement", self.max_disagreement),
        ] {
            if !value.is_finite() {
                return Err(GgaError::InvalidParameter(format!("{name} must be finite")));
            }
        }
        Ok(())
    }
}
