//! First-fit construction heuristic.

use super::compatibility::SimilarityCompatibility;
use super::config::GroupingConfig;
use super::consolidate::consolidate;
use super::types::{Compatibility, GroupingHeuristic, Placement};
use crate::error::{ObjectId, Result};
use crate::groups::{GroupId, Groups, ObjectSet};

/// Places each object into the first compatible group of the used view,
/// opening a new group when none fits.
///
/// This is the classic grouping-GA heuristic (Falkenauer, 1998). Because
/// the used view is reordered by inversion, the same chromosome can lead
/// to different placements of reinserted objects.
#[derive(Debug, Clone)]
pub struct FirstFit<C = SimilarityCompatibility> {
    compatibility: C,
    min_group_size: usize,
}

impl FirstFit<SimilarityCompatibility> {
    /// First-fit over [`SimilarityCompatibility`] built from `config`.
    pub fn from_config(config: &GroupingConfig) -> Self {
        Self::new(
            SimilarityCompatibility::from_config(config),
            config.min_group_size,
        )
    }
}

impl<C: Compatibility> FirstFit<C> {
    pub fn new(compatibility: C, min_group_size: usize) -> Self {
        Self {
            compatibility,
            min_group_size: min_group_size.max(1),
        }
    }

    pub fn compatibility(&self) -> &C {
        &self.compatibility
    }
}

impl<C: Compatibility> GroupingHeuristic for FirstFit<C> {
    fn name(&self) -> &str {
        "FirstFit"
    }

    fn find_group(&self, objects: &ObjectSet, groups: &Groups, object: ObjectId) -> Placement {
        groups
            .used_groups()
            .find(|g| self.compatibility.is_compatible(objects, g, object))
            .map_or(Placement::NewGroup, |g| Placement::Existing(g.id()))
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
