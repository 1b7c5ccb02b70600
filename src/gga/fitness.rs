//! Grouping quality criteria.
//!
//! Each criterion compares the average pairwise value of a relation inside
//! groups with its average across groups:
//!
//! | Criterion      | Relation       | Goal     |
//! |----------------|----------------|----------|
//! | `sim_j`        | similarity     | maximize |
//! | `agreement`    | agreement      | maximize |
//! | `disagreement` | disagreement   | minimize |
//!
//! Only pairs present in the sparse neighbor lists contribute. An object
//! without a group counts as being in a group of its own.

use super::config::ScalarWeights;
use crate::groups::{Groups, Neighbor, ObjectSet};

/// Criteria of one partition.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupingFitness {
    /// Intra/inter similarity ratio.
    pub sim_j: f64,
    /// Intra/inter agreement ratio.
    pub agreement: f64,
    /// Intra/inter disagreement ratio.
    pub disagreement: f64,
}

impl GroupingFitness {
    /// `w.sim_j * sim_j + w.agreement * agreement - w.disagreement * disagreement`
    ///
    /// Higher is better.
    pub fn scalar(&self, w: &ScalarWeights) -> f64 {
        w.sim_j * self.sim_j + w.agreement * self.agreement - w.disagreement * self.disagreement
    }
}

/// Smallest inter-group average used as a divisor.
///
/// Perfectly separated groups have an inter average of zero; dividing by
/// this floor instead keeps their ratio finite and above the ratio of any
/// partition whose inter average exceeds the floor.
pub const INTER_FLOOR: f64 = 1e-9;

/// Ratio of intra- to inter-group averages.
///
/// - both averages present: `intra / max(inter, INTER_FLOOR)`
/// - otherwise the present average (intra first)
/// - neither present: `0.0`
///
/// An average is absent when no pair of that kind exists.
///
/// # Examples
///
/// ```
/// use u_gga::gga::{ratio, INTER_FLOOR};
///
/// assert_eq!(ratio(Some(0.9), Some(0.1)), 9.0);
/// assert_eq!(ratio(Some(0.9), Some(0.0)), 0.9 / INTER_FLOOR);
/// assert_eq!(ratio(None, Some(0.3)), 0.3);
/// assert_eq!(ratio(None, None), 0.0);
/// ```
pub fn ratio(intra: Option<f64>, inter: Option<f64>) -> f64 {
    match (intra, inter) {
        (Some(a), Some(e)) => a / e.max(INTER_FLOOR),
        (Some(a), None) => a,
        (None, Some(e)) => e,
        (None, None) => 0.0,
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    intra_sum: f64,
    intra_count: usize,
    inter_sum: f64,
    inter_count: usize,
}

impl Accumulator {
    fn add(&mut self, same_group: bool, value: f64) {
        if same_group {
            self.intra_sum += value;
            self.intra_count += 1;
        } else {
            self.inter_sum += value;
            self.inter_count += 1;
        }
    }

    fn ratio(&self) -> f64 {
        let avg = |sum: f64, count: usize| (count > 0).then(|| sum / count as f64);
        ratio(
            avg(self.intra_sum, self.intra_count),
            avg(self.inter_sum, self.inter_count),
        )
    }
}

/// Computes the criteria of `groups` in one pass over the neighbor lists.
///
/// # Complexity
/// O(total number of neighbor entries)
pub fn evaluate_partition(objects: &ObjectSet, groups: &Groups) -> GroupingFitness {
    let mut sim = Accumulator::default();
    let mut agr = Accumulator::default();
    let mut dis = Accumulator::default();

    for object in objects.iter() {
        let home = groups.group_of(object.id);
        let feed = |acc: &mut Accumulator, list: &[Neighbor]| {
            for n in list {
                let same = home.is_some() && home == groups.group_of(n.id);
                acc.add(same, n.value);
            }
        };
        feed(&mut sim, &object.similarities);
        feed(&mut agr, &object.agreements);
        feed(&mut dis, &object.disagreements);
    }

    GroupingFitness {
        sim_j: sim.ratio(),
        agreement: agr.ratio(),
        disagreement: dis.ratio(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::Object;

    fn groups_of(n: usize, partition: &[&[usize]]) -> Groups {
        let mut groups = Groups::new(n, n);
        for members in partition {
            let g = groups.reserve_group().unwrap();
            for &o in *members {
                groups.insert_object(g, o).unwrap();
            }
        }
        groups
    }

    #[test]
    fn test_ratio_ladder() {
        assert!((ratio(Some(0.8), Some(0.2)) - 4.0).abs() < 1e-12);
        assert_eq!(ratio(Some(0.8), Some(0.0)), 0.8 / INTER_FLOOR);
        assert_eq!(ratio(Some(0.0), Some(0.0)), 0.0);
        assert_eq!(ratio(Some(0.8), None), 0.8);
        assert_eq!(ratio(None, Some(0.2)), 0.2);
        assert_eq!(ratio(None, None), 0.0);
    }

    #[test]
    fn test_similarity_ratio() {
        // 0-1 similar (0.9), 1-2 weakly similar (0.1).
        let objects = ObjectSet::new(vec![
            Object::new(0).with_similarity(1, 0.9),
            Object::new(1).with_similarity(0, 0.9).with_similarity(2, 0.1),
            Object::new(2).with_similarity(1, 0.1),
        ])
        .unwrap();
        let good = evaluate_partition(&objects, &groups_of(3, &[&[0, 1], &[2]]));
        assert!((good.sim_j - 9.0).abs() < 1e-12);

        let bad = evaluate_partition(&objects, &groups_of(3, &[&[0], &[1, 2]]));
        assert!((bad.sim_j - 0.1 / 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_separated_clusters_beat_any_mixed_partition() {
        // Two clusters of 10 with no similarity across them.
        let objects = ObjectSet::new(
            (0..20)
                .map(|i| {
                    let mut obj = Object::new(i);
                    for j in 0..20 {
                        if i != j {
                            let same = (i < 10) == (j < 10);
                            obj = obj.with_similarity(j, if same { 0.9 } else { 0.0 });
                        }
                    }
                    obj
                })
                .collect(),
        )
        .unwrap();
        let left: Vec<usize> = (0..10).collect();
        let right: Vec<usize> = (10..20).collect();
        let exact = evaluate_partition(&objects, &groups_of(20, &[&left[..], &right[..]]));

        let mut swapped_left: Vec<usize> = (1..10).collect();
        swapped_left.push(10);
        let mut swapped_right: Vec<usize> = (11..20).collect();
        swapped_right.push(0);
        let mixed =
            evaluate_partition(&objects, &groups_of(20, &[&swapped_left[..], &swapped_right[..]]));

        assert!(exact.sim_j.is_finite());
        assert!((exact.sim_j - 0.9 / INTER_FLOOR).abs() < 1e-3);
        assert!(
            exact.sim_j > mixed.sim_j,
            "exact {} vs mixed {}",
            exact.sim_j,
            mixed.sim_j
        );
    }

    #[test]
    fn test_only_intra_pairs() {
        let objects = ObjectSet::new(vec![
            Object::new(0).with_agreement(1, 0.6),
            Object::new(1).with_agreement(0, 0.4),
        ])
        .unwrap();
        let f = evaluate_partition(&objects, &groups_of(2, &[&[0, 1]]));
        assert!((f.agreement - 0.5).abs() < 1e-12);
        assert_eq!(f.sim_j, 0.0);
        assert_eq!(f.disagreement, 0.0);
    }

    #[test]
    fn test_only_inter_pairs() {
        let objects = ObjectSet::new(vec![
            Object::new(0).with_disagreement(1, 0.7),
            Object::new(1).with_disagreement(0, 0.7),
        ])
        .unwrap();
        let f = evaluate_partition(&objects, &groups_of(2, &[&[0], &[1]]));
        assert!((f.disagreement - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_unassigned_objects_count_as_inter() {
        let objects = ObjectSet::new(vec![
            Object::new(0).with_similarity(1, 0.5),
            Object::new(1).with_similarity(0, 0.5),
        ])
        .unwrap();
        let groups = Groups::new(2, 2);
        let f = evaluate_partition(&objects, &groups);
        assert!((f.sim_j - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_scalar_weights() {
        let f = GroupingFitness {
            sim_j: 4.0,
            agreement: 2.0,
            disagreement: 1.0,
        };
        assert!((f.scalar(&ScalarWeights::default()) - 5.0).abs() < 1e-12);
        let w = ScalarWeights {
            sim_j: 1.0,
            agreement: 0.0,
            disagreement: 3.0,
        };
        assert!((f.scalar(&w) - 1.0).abs() < 1e-12);
    }
}
