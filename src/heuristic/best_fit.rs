//! Best-fit construction heuristic.

use super::compatibility::SimilarityCompatibility;
use super::config::GroupingConfig;
use super::consolidate::consolidate;
use super::types::{Compatibility, GroupingHeuristic, Placement};
use crate::error::{ObjectId, Result};
use crate::groups::{GroupId, Groups, ObjectSet};
use crate::random::RandomSource;

/// Places each object into the compatible group with the highest affinity
/// (first in used order on ties), opening a new group when none fits.
///
/// With `constrained_first`, objects carrying the most disagreement links
/// are placed first; ties keep the random order.
#[derive(Debug, Clone)]
pub struct BestFit<C = SimilarityCompatibility> {
    compatibility: C,
    min_group_size: usize,
    constrained_first: bool,
}

impl BestFit<SimilarityCompatibility> {
    /// Best-fit over [`SimilarityCompatibility`] built from `config`.
    pub fn from_config(config: &GroupingConfig) -> Self {
        Self::new(
            SimilarityCompatibility::from_config(config),
            config.min_group_size,
        )
    }
}

impl<C: Compatibility> BestFit<C> {
    pub fn new(compatibility: C, min_group_size: usize) -> Self {
        Self {
            compatibility,
            min_group_size: min_group_size.max(1),
            constrained_first: false,
        }
    }

    pub fn with_constrained_first(mut self, enabled: bool) -> Self {
        self.constrained_first = enabled;
        self
    }

    pub fn compatibility(&self) -> &C {
        &self.compatibility
    }
}

impl<C: Compatibility> GroupingHeuristic for BestFit<C> {
    fn name(&self) -> &str {
        "BestFit"
    }

    fn build_order(&self, objects: &ObjectSet, pending: &mut [ObjectId], rng: &mut RandomSource) {
        rng.permute(pending);
        if self.constrained_first {
            // Stable: equally constrained objects keep their random order.
            pending.sort_by_key(|&o| std::cmp::Reverse(objects.get(o).disagreements.len()));
        }
    }

    fn find_group(&self, objects: &ObjectSet, groups: &Groups, object: ObjectId) -> Placement {
        let mut best: Option<(GroupId, f64)> = None;
        for group in groups.used_groups() {
            if !self.compatibility.is_compatible(objects, group, object) {
                continue;
            }
            let affinity = self.compatibility.affinity(objects, group, object);
            if best.map_or(true, |(_, a)| affinity > a) {
                best = Some((group.id(), affinity));
            }
        }
        best.map_or(Placement::NewGroup, |(g, _)| Placement::Existing(g))
    }

    fn post_run(&self, objects: &ObjectSet, groups: &mut Groups, opened: &[GroupId]) -> Result<()> {
        consolidate(
            objects,
            groups,
            opened,
            &self.compatibility,
            self.min_group_size,
        )?;
        Ok(())
    }
}
