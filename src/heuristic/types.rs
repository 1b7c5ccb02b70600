//! Core traits for construction heuristics.

use crate::error::{ObjectId, Result};
use crate::groups::{Group, GroupId, Groups, ObjectSet};
use crate::random::RandomSource;

/// Decision taken by a heuristic for one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Join this group (which must be in use).
    Existing(GroupId),
    /// No compatible group: open a new one.
    NewGroup,
}

/// Incremental constructor placing ungrouped objects one by one.
///
/// The heuristic decides the processing order and, for each object, where
/// it goes. The orchestration (reserving groups, inserting, bookkeeping) is
/// done by [`super::HeuristicRun`].
///
/// Methods take [`RandomSource`] directly, so the trait stays object-safe
/// and an instance can hold a `&dyn GroupingHeuristic`.
pub trait GroupingHeuristic: Send + Sync {
    /// Returns a human-readable name for this heuristic.
    fn name(&self) -> &str;

    /// Orders the objects waiting to be placed.
    ///
    /// The default is a uniformly random permutation.
    fn build_order(&self, _objects: &ObjectSet, pending: &mut [ObjectId], rng: &mut RandomSource) {
        rng.permute(pending);
    }

    /// Chooses a group for `object`.
    fn find_group(&self, objects: &ObjectSet, groups: &Groups, object: ObjectId) -> Placement;

    /// Cleanup pass run once every object is placed.
    ///
    /// `opened` lists the groups created during this run; implementations
    /// must leave every other group's original members where they are.
    fn post_run(
        &self,
        _objects: &ObjectSet,
        _groups: &mut Groups,
        _opened: &[GroupId],
    ) -> Result<()> {
        Ok(())
    }
}

/// Domain-specific test deciding whether an object may join a group.
pub trait Compatibility: Send + Sync {
    /// Whether `object` may be added to `group`.
    fn is_compatible(&self, objects: &ObjectSet, group: &Group, object: ObjectId) -> bool;

    /// How well `object` fits `group`; higher is better.
    ///
    /// The default gives every group the same affinity.
    fn affinity(&self, _objects: &ObjectSet, _group: &Group, _object: ObjectId) -> f64 {
        0.0
    }
}
