//! Similarity-based compatibility test.

use super::config::GroupingConfig;
use super::types::Compatibility;
use crate::error::ObjectId;
use crate::groups::{Group, ObjectSet};

/// An object fits a group when, against every member:
///
/// - the parents differ (or either has none),
/// - similarity ≥ `min_similarity`,
/// - agreement ≥ `min_agreement`,
/// - disagreement ≤ `max_disagreement`,
///
/// and the group holds fewer than `max_group_size` objects.
///
/// Affinity is the average similarity to the members.
#[derive(Debug, Clone)]
pub struct SimilarityCompatibility {
    max_group_size: usize,
    min_similarity: f64,
    min_agreement: f64,
    max_disagreement: f64,
}

impl SimilarityCompatibility {
    pub fn from_config(config: &GroupingConfig) -> Self {
        Self {
            max_group_size: config.max_group_size,
            min_similarity: config.min_similarity,
            min_agreement: config.min_agreement,
            max_disagreement: config.max_disagreement,
        }
    }
}

impl Default for SimilarityCompatibility {
    fn default() -> Self {
        Self::from_config(&GroupingConfig::default())
    }
}

impl Compatibility for SimilarityCompatibility {
    fn is_compatible(&self, objects: &ObjectSet, group: &Group, object: ObjectId) -> bool {
        if group.len() >= self.max_group_size {
            return false;
        }
        group.objects().iter().all(|&member| {
            !objects.same_parent(object, member)
                && objects.similarity(object, member) >= self.min_similarity
                && objects.agreement(object, member) >= self.min_agreement
                && objects.disagreement(object, member) <= self.max_disagreement
        })
    }

    fn affinity(&self, objects: &ObjectSet, group: &Group, object: ObjectId) -> f64 {
        if group.is_empty() {
            return 0.0;
        }
        let total: f64 = group
            .objects()
            .iter()
            .map(|&member| objects.similarity(object, member))
            .sum();
        total / group.len() as f64
    }
}
