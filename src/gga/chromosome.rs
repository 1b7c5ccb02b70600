//! The grouping chromosome and its genetic operators.
//!
//! The genes are groups, not objects: operators move whole groups between
//! chromosomes and hand the objects they invalidate back to the
//! construction heuristic.
//!
//! # References
//!
//! - Falkenauer (1998), *Genetic Algorithms and Grouping Problems*

use super::config::CrossoverPairing;
use super::fitness::{evaluate_partition, GroupingFitness};
use super::types::{
    Chromosome, Constructible, CrossoverOutcome, Evaluable, GroupingContext, MutationOutcome,
    Recombinable, ThreadData,
};
use crate::error::{ObjectId, Result};
use crate::groups::{GroupId, Groups};
use crate::heuristic::run_heuristic;
use crate::random::RandomSource;
use tracing::trace;

/// A partition of the objects together with its cached criteria.
#[derive(Debug, Clone)]
pub struct GroupingChromosome {
    groups: Groups,
    fitness: Option<GroupingFitness>,
}

impl GroupingChromosome {
    /// Makes `self` an exact copy of `other`, reusing allocations.
    pub fn copy_from(&mut self, other: &Self) {
        self.clone_from(other);
    }

    /// Mutable access to the partition; drops the cached criteria.
    pub fn groups_mut(&mut self) -> &mut Groups {
        self.fitness = None;
        &mut self.groups
    }

    /// Copies every member of `members` into a newly reserved group.
    fn copy_group(&mut self, members: &[ObjectId]) -> Result<GroupId> {
        let g = self.groups.reserve_group()?;
        for &o in members {
            self.groups.insert_object(g, o)?;
        }
        Ok(g)
    }

    /// Places every unassigned object with the context heuristic.
    fn repair(&mut self, ctx: &GroupingContext<'_>, rng: &mut RandomSource) -> Result<usize> {
        let pending = self.groups.unassigned();
        if pending.is_empty() {
            return Ok(0);
        }
        let report = run_heuristic(ctx.heuristic, ctx.objects, &mut self.groups, pending, rng)?;
        Ok(report.placed)
    }
}

impl Evaluable for GroupingChromosome {
    fn evaluate(&mut self, ctx: &GroupingContext<'_>) {
        self.groups.compute_groups(ctx.objects);
        self.fitness = Some(evaluate_partition(ctx.objects, &self.groups));
    }

    fn fitness(&self) -> Option<&GroupingFitness> {
        self.fitness.as_ref()
    }
}

impl Constructible for GroupingChromosome {
    fn random_construct(
        &mut self,
        ctx: &GroupingContext<'_>,
        rng: &mut RandomSource,
    ) -> Result<()> {
        self.groups.clear();
        self.fitness = None;
        self.repair(ctx, rng)?;
        Ok(())
    }

    fn construct_from(
        &mut self,
        ctx: &GroupingContext<'_>,
        partition: &[Vec<ObjectId>],
        rng: &mut RandomSource,
    ) -> Result<()> {
        self.groups.clear();
        self.fitness = None;
        for members in partition.iter().filter(|m| !m.is_empty()) {
            self.copy_group(members)?;
        }
        let placed = self.repair(ctx, rng)?;
        trace!(groups = partition.len(), placed, "seeded chromosome");
        Ok(())
    }
}

impl Recombinable for GroupingChromosome {
    /// Group-injection crossover:
    ///
    /// 1. pick a group `g2` of `parent2` and a group `g1` of `parent1`
    ///    (per [`CrossoverPairing`]);
    /// 2. copy every group of `parent1` that shares no object with `g2`;
    /// 3. inject `g2`;
    /// 4. place the remaining objects with the heuristic.
    ///
    /// The outcome is flagged degenerate when `g1` and `g2` hold the same
    /// objects or a parent has no group (the child is a structural copy of
    /// `parent1`), and when no `parent1` group survives (the child is
    /// mostly rebuilt by the heuristic).
    fn crossover(
        &mut self,
        ctx: &GroupingContext<'_>,
        parent1: &Self,
        parent2: &Self,
        data: &mut ThreadData,
        rng: &mut RandomSource,
    ) -> Result<CrossoverOutcome> {
        self.groups.clear();
        self.fitness = None;

        let p1 = &parent1.groups;
        let p2 = &parent2.groups;
        if p1.num_used() == 0 || p2.num_used() == 0 {
            for group in p1.used_groups() {
                self.copy_group(group.objects())?;
            }
            let reinserted = self.repair(ctx, rng)?;
            trace!("crossover with an empty parent");
            return Ok(CrossoverOutcome {
                carried_groups: p1.num_used(),
                reinserted,
                degenerate: true,
            });
        }

        let g2 = p2.group(p2.used()[rng.next_index(p2.num_used())]);
        let g1 = match ctx.crossover_pairing {
            CrossoverPairing::Random => p1.group(p1.used()[rng.next_index(p1.num_used())]),
            CrossoverPairing::MaxOverlap => {
                let mut overlap = vec![0usize; p1.max_groups()];
                for &o in g2.objects() {
                    if let Some(g) = p1.group_of(o) {
                        overlap[g] += 1;
                    }
                }
                let mut best = p1.used()[0];
                for &g in p1.used() {
                    if overlap[g] > overlap[best] {
                        best = g;
                    }
                }
                p1.group(best)
            }
        };
        let identical = {
            let mut a = g1.objects().to_vec();
            let mut b = g2.objects().to_vec();
            a.sort_unstable();
            b.sort_unstable();
            a == b
        };

        data.reset_marks(ctx.num_objects());
        for &o in g2.objects() {
            data.marks[o] = true;
        }

        let mut carried = 0;
        for group in p1.used_groups() {
            if group.objects().iter().any(|&o| data.marks[o]) {
                continue;
            }
            self.copy_group(group.objects())?;
            carried += 1;
        }
        self.copy_group(g2.objects())?;

        let reinserted = self.repair(ctx, rng)?;
        let degenerate = identical || carried == 0;
        if degenerate {
            trace!(carried, identical, reinserted, "degenerate crossover");
        }
        Ok(CrossoverOutcome {
            carried_groups: carried,
            reinserted,
            degenerate,
        })
    }

    /// Destroys `max(min_groups, round(ratio * used))` random groups
    /// (clamped to the number of groups) and reinserts their objects.
    ///
    /// Groups that are not destroyed keep all their members.
    fn mutation(
        &mut self,
        ctx: &GroupingContext<'_>,
        rng: &mut RandomSource,
    ) -> Result<MutationOutcome> {
        self.fitness = None;
        let used = self.groups.num_used();
        if used == 0 {
            self.repair(ctx, rng)?;
            return Ok(MutationOutcome::default());
        }

        let requested = ((ctx.mutation_groups_ratio * used as f64).round() as usize)
            .max(ctx.mutation_min_groups)
            .max(1);
        let clamped = requested > used;
        let k = requested.min(used);
        if clamped {
            trace!(requested, used, "mutation clamped to available groups");
        }

        let mut positions = rng.permutation(used);
        positions.truncate(k);
        let victims: Vec<GroupId> = positions.iter().map(|&p| self.groups.used()[p]).collect();

        let mut removed = Vec::new();
        for g in victims {
            removed.extend(self.groups.delete_group(g)?);
        }
        self.repair(ctx, rng)?;

        Ok(MutationOutcome {
            deleted_groups: k,
            removed,
            clamped,
        })
    }

    /// Swaps two random positions of the group view.
    ///
    /// The partition (and therefore the fitness) is unchanged; only the
    /// order in which first-fit style heuristics scan groups moves.
    fn inversion(&mut self, rng: &mut RandomSource) {
        let used = self.groups.num_used();
        if used < 2 {
            return;
        }
        let i = rng.next_index(used);
        let j = (i + 1 + rng.next_index(used - 1)) % used;
        self.groups.swap_used(i, j);
    }
}

impl Chromosome for GroupingChromosome {
    fn new(ctx: &GroupingContext<'_>) -> Self {
        Self {
            groups: Groups::new(ctx.num_objects(), ctx.max_groups),
            fitness: None,
        }
    }

    fn groups(&self) -> &Groups {
        &self.groups
    }
}
