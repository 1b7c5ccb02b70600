//! Post-run consolidation of badly sized groups.

use super::types::Compatibility;
use crate::error::{ObjectId, Result};
use crate::groups::{GroupId, Groups, ObjectSet};

/// Dissolves weak groups among `candidates`:
///
/// - a group holding exactly one non-social object,
/// - a group smaller than `min_group_size`.
///
/// Every member of such a group is moved to its most affine compatible
/// group. A group is only dissolved when all of its members find a new
/// home; otherwise it is left untouched. The pass repeats until nothing
/// changes, at most once per candidate.
///
/// Returns the number of dissolved groups.
pub fn consolidate<C: Compatibility + ?Sized>(
    objects: &ObjectSet,
    groups: &mut Groups,
    candidates: &[GroupId],
    compatibility: &C,
    min_group_size: usize,
) -> Result<usize> {
    let mut pending: Vec<GroupId> = candidates.to_vec();
    pending.sort_unstable();
    pending.dedup();

    let mut dissolved = 0;
    for _ in 0..=pending.len() {
        let mut changed = false;
        let mut i = 0;
        while i < pending.len() {
            let g = pending[i];
            if !groups.is_used(g) || !is_weak(objects, groups, g, min_group_size) {
                i += 1;
                continue;
            }
            if try_dissolve(objects, groups, g, compatibility)? {
                tracing::trace!(group = g, "dissolved weak group");
                pending.swap_remove(i);
                dissolved += 1;
                changed = true;
            } else {
                i += 1;
            }
        }
        if !changed {
            break;
        }
    }
    Ok(dissolved)
}

fn is_weak(objects: &ObjectSet, groups: &Groups, g: GroupId, min_group_size: usize) -> bool {
    let group = groups.group(g);
    let lone_non_social = group.len() == 1 && !objects.get(group.objects()[0]).social;
    lone_non_social || group.len() < min_group_size
}

/// Moves every member of `g` elsewhere and releases it, or undoes the
/// moves if some member has nowhere to go.
fn try_dissolve<C: Compatibility + ?Sized>(
    objects: &ObjectSet,
    groups: &mut Groups,
    g: GroupId,
    compatibility: &C,
) -> Result<bool> {
    let members: Vec<ObjectId> = groups.group(g).objects().to_vec();
    let mut moved = Vec::with_capacity(members.len());

    for &object in &members {
        match best_target(objects, groups, g, object, compatibility) {
            Some(target) => {
                groups.move_object(object, target)?;
                moved.push(object);
            }
            None => {
                for &back in &moved {
                    groups.move_object(back, g)?;
                }
                return Ok(false);
            }
        }
    }

    groups.release_group(g)?;
    Ok(true)
}

fn best_target<C: Compatibility + ?Sized>(
    objects: &ObjectSet,
    groups: &Groups,
    exclude: GroupId,
    object: ObjectId,
    compatibility: &C,
) -> Option<GroupId> {
    let mut best: Option<(GroupId, f64)> = None;
    for group in groups.used_groups() {
        if group.id() == exclude || !compatibility.is_compatible(objects, group, object) {
            continue;
        }
        let affinity = compatibility.affinity(objects, group, object);
        if best.map_or(true, |(_, a)| affinity > a) {
            best = Some((group.id(), affinity));
        }
    }
    best.map(|(g, _)| g)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::Object;
    use crate::heuristic::{GroupingConfig, SimilarityCompatibility};

    fn build(objects: &ObjectSet, partition: &[&[ObjectId]]) -> (Groups, Vec<GroupId>) {
        let mut groups = Groups::new(objects.len(), objects.len());
        let mut ids = Vec::new();
        for members in partition {
            let g = groups.reserve_group().unwrap();
            for &o in *members {
                groups.insert_object(g, o).unwrap();
            }
            ids.push(g);
        }
        (groups, ids)
    }

    #[test]
    fn test_lone_non_social_moves_to_best_group() {
        let objects = ObjectSet::new(vec![
            Object::new(0).with_similarity(2, 0.1),
            Object::new(1).with_similarity(2, 0.9),
            Object::new(2).with_social(false),
        ])
        .unwrap();
        let (mut groups, ids) = build(&objects, &[&[0], &[1], &[2]]);
        let compat = SimilarityCompatibility::default();

        let dissolved = consolidate(&objects, &mut groups, &[ids[2]], &compat, 1).unwrap();
        assert_eq!(dissolved, 1);
        assert_eq!(groups.group_of(2), Some(ids[1]));
        assert!(groups.verify());
    }

    #[test]
    fn test_social_singleton_kept() {
        let objects = ObjectSet::new((0..2).map(Object::new).collect()).unwrap();
        let (mut groups, ids) = build(&objects, &[&[0], &[1]]);
        let compat = SimilarityCompatibility::default();
        let dissolved = consolidate(&objects, &mut groups, &ids, &compat, 1).unwrap();
        assert_eq!(dissolved, 0);
        assert_eq!(groups.num_used(), 2);
    }

    #[test]
    fn test_undersized_group_dissolved_when_rehomable() {
        let objects = ObjectSet::new((0..5).map(Object::new).collect()).unwrap();
        let (mut groups, ids) = build(&objects, &[&[0, 1, 2], &[3, 4]]);
        let compat = SimilarityCompatibility::default();
        let dissolved = consolidate(&objects, &mut groups, &[ids[1]], &compat, 3).unwrap();
        assert_eq!(dissolved, 1);
        assert_eq!(groups.canonical_partition(), vec![vec![0, 1, 2, 3, 4]]);
        assert!(groups.verify());
    }

    #[test]
    fn test_partial_rehoming_is_undone() {
        let objects = ObjectSet::new((0..4).map(Object::new).collect()).unwrap();
        let (mut groups, ids) = build(&objects, &[&[0, 1], &[2, 3]]);
        // Room for one more object only.
        let compat = SimilarityCompatibility::from_config(
            &GroupingConfig::default().with_max_group_size(3),
        );
        let dissolved = consolidate(&objects, &mut groups, &[ids[1]], &compat, 3).unwrap();
        assert_eq!(dissolved, 0);
        assert_eq!(groups.canonical_partition(), vec![vec![0, 1], vec![2, 3]]);
        assert!(groups.verify());
    }

    #[test]
    fn test_only_candidates_are_touched() {
        let objects = ObjectSet::new((0..3).map(Object::new).collect()).unwrap();
        let (mut groups, ids) = build(&objects, &[&[0], &[1], &[2]]);
        let compat = SimilarityCompatibility::default();
        let dissolved = consolidate(&objects, &mut groups, &[ids[0]], &compat, 2).unwrap();
        assert_eq!(dissolved, 1);
        // Group 0 was dissolved; 1 and 2 stay singletons even if undersized.
        assert_eq!(groups.num_used(), 2);
        assert!(groups.verify());
    }
}
