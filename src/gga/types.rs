//! Core traits for grouping chromosomes.

use super::config::CrossoverPairing;
use super::fitness::GroupingFitness;
use crate::error::{ObjectId, Result};
use crate::groups::{Groups, ObjectSet};
use crate::heuristic::GroupingHeuristic;
use crate::random::RandomSource;

/// Read-only data shared by every chromosome of an instance.
#[derive(Clone, Copy)]
pub struct GroupingContext<'a> {
    /// The objects to partition.
    pub objects: &'a ObjectSet,
    /// Heuristic used for every (re)construction.
    pub heuristic: &'a dyn GroupingHeuristic,
    /// Group capacity of each chromosome.
    pub max_groups: usize,
    /// Fraction of groups destroyed by one mutation.
    pub mutation_groups_ratio: f64,
    /// Minimum number of groups destroyed by one mutation.
    pub mutation_min_groups: usize,
    /// Group matching policy of crossover.
    pub crossover_pairing: CrossoverPairing,
}

impl<'a> GroupingContext<'a> {
    /// Context with default operator settings and one group slot per
    /// object.
    pub fn new(objects: &'a ObjectSet, heuristic: &'a dyn GroupingHeuristic) -> Self {
        Self {
            objects,
            heuristic,
            max_groups: objects.len(),
            mutation_groups_ratio: 0.1,
            mutation_min_groups: 1,
            crossover_pairing: CrossoverPairing::Random,
        }
    }

    pub fn num_objects(&self) -> usize {
        self.objects.len()
    }
}

impl std::fmt::Debug for GroupingContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupingContext")
            .field("objects", &self.objects.len())
            .field("heuristic", &self.heuristic.name())
            .field("max_groups", &self.max_groups)
            .field("mutation_groups_ratio", &self.mutation_groups_ratio)
            .field("mutation_min_groups", &self.mutation_min_groups)
            .field("crossover_pairing", &self.crossover_pairing)
            .finish()
    }
}

/// Scratch buffers reused across operator calls.
///
/// One instance per worker; nothing in it survives an operator call.
#[derive(Debug, Clone, Default)]
pub struct ThreadData {
    pub(crate) marks: Vec<bool>,
}

impl ThreadData {
    pub fn new(num_objects: usize) -> Self {
        Self {
            marks: vec![false; num_objects],
        }
    }

    /// Clears the object marks, resizing to `num_objects`.
    pub(crate) fn reset_marks(&mut self, num_objects: usize) {
        self.marks.clear();
        self.marks.resize(num_objects, false);
    }
}

/// What a crossover did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CrossoverOutcome {
    /// Parent-1 groups carried over unchanged.
    pub carried_groups: usize,
    /// Objects placed again by the heuristic.
    pub reinserted: usize,
    /// The selected groups were identical, a parent was empty, or no
    /// parent-1 group survived.
    pub degenerate: bool,
}

/// What a mutation did.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MutationOutcome {
    /// Number of destroyed groups.
    pub deleted_groups: usize,
    /// Objects of the destroyed groups, placed again by the heuristic.
    pub removed: Vec<ObjectId>,
    /// More groups were requested than the chromosome holds.
    pub clamped: bool,
}

/// A chromosome whose quality can be computed.
pub trait Evaluable {
    /// Computes criteria and group caches.
    fn evaluate(&mut self, ctx: &GroupingContext<'_>);

    /// Criteria of the last evaluation, `None` if stale.
    fn fitness(&self) -> Option<&GroupingFitness>;

    fn is_evaluated(&self) -> bool {
        self.fitness().is_some()
    }
}

/// A chromosome that can be built from scratch.
pub trait Constructible {
    /// Discards the current partition and places every object with the
    /// context heuristic.
    fn random_construct(&mut self, ctx: &GroupingContext<'_>, rng: &mut RandomSource)
        -> Result<()>;

    /// Rebuilds from `partition`, then places any object it leaves out
    /// with the context heuristic.
    fn construct_from(
        &mut self,
        ctx: &GroupingContext<'_>,
        partition: &[Vec<ObjectId>],
        rng: &mut RandomSource,
    ) -> Result<()>;
}

/// Grouping genetic operators.
pub trait Recombinable: Sized {
    /// Replaces `self` with a child of `parent1` and `parent2`.
    fn crossover(
        &mut self,
        ctx: &GroupingContext<'_>,
        parent1: &Self,
        parent2: &Self,
        data: &mut ThreadData,
        rng: &mut RandomSource,
    ) -> Result<CrossoverOutcome>;

    /// Destroys some groups and reinserts their objects.
    fn mutation(
        &mut self,
        ctx: &GroupingContext<'_>,
        rng: &mut RandomSource,
    ) -> Result<MutationOutcome>;

    /// Reorders the group view without changing the partition.
    fn inversion(&mut self, rng: &mut RandomSource);
}

/// A complete grouping chromosome.
///
/// # Examples
///
/// ```
/// use u_gga::gga::{Chromosome, Constructible, Evaluable, GroupingChromosome, GroupingContext};
/// use u_gga::groups::{Object, ObjectSet};
/// use u_gga::heuristic::{FirstFit, GroupingConfig};
/// use u_gga::random::RandomSource;
///
/// let objects = ObjectSet::new((0..5).map(Object::new).collect()).unwrap();
/// let heuristic = FirstFit::from_config(&GroupingConfig::default().with_max_group_size(2));
/// let ctx = GroupingContext::new(&objects, &heuristic);
///
/// let mut chromosome = GroupingChromosome::new(&ctx);
/// chromosome.random_construct(&ctx, &mut RandomSource::new(1)).unwrap();
/// chromosome.evaluate(&ctx);
/// assert!(chromosome.verify());
/// assert_eq!(chromosome.groups().num_used(), 3);
/// ```
pub trait Chromosome: Evaluable + Constructible + Recombinable + Clone + Send + Sync {
    /// An empty chromosome sized for `ctx`.
    fn new(ctx: &GroupingContext<'_>) -> Self;

    /// The partition.
    fn groups(&self) -> &Groups;

    /// Whether the partition is complete and consistent.
    fn verify(&self) -> bool {
        self.groups().verify()
    }
}
