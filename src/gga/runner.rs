//! GGA generational loop.
//!
//! [`Instance`] owns a population and drives it:
//! initialization → evaluation → ranking → selection → crossover →
//! mutation → inversion → repeat.
//!
//! The loop can be driven in three ways:
//!
//! - [`Instance::run`]: until the stop condition holds
//! - [`Instance::step`]: a configured number of generations per call
//! - [`Instance::run_one_generation`]: exactly one generation

use super::config::{GgaConfig, PrometheeParams, Ranking, StopCondition};
use super::fitness::GroupingFitness;
use super::selection::RankedPopulation;
use super::types::{Chromosome, GroupingContext, ThreadData};
use super::GroupingChromosome;
use crate::error::{GgaError, ObjectId, Result};
use crate::groups::ObjectSet;
use crate::heuristic::GroupingHeuristic;
use crate::promethee::{CriterionHandle, PrometheeKernel, SolutionHandle};
use crate::random::RandomSource;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Operator counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OperatorCounts {
    pub crossovers: usize,
    /// Crossovers that copied parent 1 or carried none of its groups.
    pub degenerate_crossovers: usize,
    pub mutations: usize,
    /// Mutations that asked for more groups than the chromosome had.
    pub clamped_mutations: usize,
    pub inversions: usize,
}

impl OperatorCounts {
    fn absorb(&mut self, other: &OperatorCounts) {
        self.crossovers += other.crossovers;
        self.degenerate_crossovers += other.degenerate_crossovers;
        self.mutations += other.mutations;
        self.clamped_mutations += other.clamped_mutations;
        self.inversions += other.inversions;
    }
}

/// Statistics of one generation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationStats {
    /// Generation number (1-based).
    pub generation: usize,
    /// Criteria of the best-ever chromosome after this generation.
    pub best: GroupingFitness,
    /// Whether this generation produced a new best chromosome.
    pub improved: bool,
    /// Consecutive generations without improvement.
    pub stagnation: usize,
    pub counts: OperatorCounts,
}

/// Result of a GGA run.
#[derive(Debug, Clone)]
pub struct GgaResult<C: Chromosome = GroupingChromosome> {
    /// The best chromosome found during the entire run.
    pub best: C,

    /// The best partition, each group sorted and groups sorted by first
    /// member.
    pub partition: Vec<Vec<ObjectId>>,

    /// Criteria of `best`.
    pub fitness: GroupingFitness,

    /// Total number of generations executed.
    pub generations: usize,

    /// Whether the run ended on the stagnation limit.
    pub stagnated: bool,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Criteria of the best-ever chromosome after initialization and after
    /// each generation.
    pub history: Vec<GroupingFitness>,

    /// Operator counters over the whole run.
    pub counts: OperatorCounts,
}

/// PROMETHEE kernel reused across generations.
#[derive(Debug, Clone)]
struct PrometheeRanking {
    kernel: PrometheeKernel,
    criteria: Vec<(CriterionHandle, fn(&GroupingFitness) -> f64)>,
}

impl PrometheeRanking {
    fn new(params: &PrometheeParams) -> Result<Self> {
        let mut kernel = PrometheeKernel::new().with_normalization(params.normalize);
        let mut criteria = Vec::new();
        for c in params.active() {
            let handle =
                kernel.add_criterion(c.name, c.direction, c.params.p, c.params.q, c.params.weight)?;
            criteria.push((handle, c.value));
        }
        Ok(Self { kernel, criteria })
    }

    fn register(&mut self, fitness: &GroupingFitness) -> Result<SolutionHandle> {
        let handle = self.kernel.new_solution();
        for &(criterion, value) in &self.criteria {
            self.kernel.assign(handle, criterion, value(fitness))?;
        }
        Ok(handle)
    }

    /// Ranks `fitness` with the best-ever chromosome (if any) registered
    /// first, so that it wins every tie. Returns whether a population
    /// member ranks strictly first.
    fn rank(
        &mut self,
        fitness: &[GroupingFitness],
        incumbent: Option<&GroupingFitness>,
    ) -> Result<(RankedPopulation, bool)> {
        self.kernel.clear_solutions();
        let incumbent = incumbent.map(|f| self.register(f)).transpose()?;
        let offset = usize::from(incumbent.is_some());
        let mut handles = Vec::with_capacity(fitness.len());
        for f in fitness {
            handles.push(self.register(f)?);
        }
        self.kernel.compute_promethee_ii()?;

        let ranked = self.kernel.ranked_handles()?;
        let improved = ranked.first().copied() != incumbent;
        let order: Vec<usize> = ranked
            .iter()
            .filter(|&&h| Some(h) != incumbent)
            .map(|h| h.index() - offset)
            .collect();
        let scores: Vec<f64> = handles
            .iter()
            .map(|&h| self.kernel.solution(h).map_or(0.0, |s| s.fi()))
            .collect();
        Ok((RankedPopulation::new(order, scores), improved))
    }
}

/// A GGA run over one set of objects.
///
/// # Examples
///
/// ```
/// use u_gga::gga::{GgaConfig, Instance};
/// use u_gga::groups::{Object, ObjectSet};
/// use u_gga::heuristic::{FirstFit, GroupingConfig};
///
/// let objects: Vec<Object> = (0..8)
///     .map(|i| {
///         let mut obj = Object::new(i);
///         for j in 0..8 {
///             if j != i {
///                 obj = obj.with_similarity(j, if i % 2 == j % 2 { 0.9 } else { 0.1 });
///             }
///         }
///         obj
///     })
///     .collect();
/// let objects = ObjectSet::new(objects).unwrap();
/// let heuristic = FirstFit::from_config(&GroupingConfig::default().with_min_similarity(0.5));
/// let config = GgaConfig::default()
///     .with_population_size(10)
///     .with_max_generations(5)
///     .with_seed(42);
///
/// let mut instance: Instance = Instance::new(&objects, &heuristic, config).unwrap();
/// let result = instance.run().unwrap();
/// assert_eq!(result.partition, vec![vec![0, 2, 4, 6], vec![1, 3, 5, 7]]);
/// ```
pub struct Instance<'a, C: Chromosome = GroupingChromosome> {
    objects: &'a ObjectSet,
    heuristic: &'a dyn GroupingHeuristic,
    config: GgaConfig,
    rng: RandomSource,
    data: ThreadData,
    promethee: Option<PrometheeRanking>,
    seeds: Vec<Vec<Vec<ObjectId>>>,
    population: Vec<C>,
    ranked: RankedPopulation,
    best: Option<C>,
    generation: usize,
    stagnation: usize,
    history: Vec<GroupingFitness>,
    counts: OperatorCounts,
    initialized: bool,
}

impl<'a, C: Chromosome> Instance<'a, C> {
    /// Creates an instance.
    ///
    /// # Errors
    ///
    /// - [`GgaError::MissingStopCondition`] if no stop condition is set
    /// - [`GgaError::InvalidParameter`] for any other invalid setting or an
    ///   empty object set
    pub fn new(
        objects: &'a ObjectSet,
        heuristic: &'a dyn GroupingHeuristic,
        config: GgaConfig,
    ) -> Result<Self> {
        config.validate()?;
        if objects.is_empty() {
            return Err("no objects to group".into());
        }
        let promethee = match &config.ranking {
            Ranking::Promethee(params) => Some(PrometheeRanking::new(params)?),
            Ranking::Scalar(_) => None,
        };
        Ok(Self {
            objects,
            heuristic,
            rng: RandomSource::from_seed_option(config.seed),
            data: ThreadData::new(objects.len()),
            promethee,
            seeds: Vec::new(),
            population: Vec::with_capacity(config.population_size),
            ranked: RankedPopulation::default(),
            best: None,
            generation: 0,
            stagnation: 0,
            history: Vec::new(),
            counts: OperatorCounts::default(),
            initialized: false,
            config,
        })
    }

    /// Partitions used to seed the initial population in incremental mode,
    /// one chromosome per partition (extra partitions are ignored).
    ///
    /// Objects missing from a partition are placed by the heuristic.
    pub fn with_seeds(mut self, seeds: Vec<Vec<Vec<ObjectId>>>) -> Self {
        self.seeds = seeds;
        self
    }

    fn context(&self) -> GroupingContext<'a> {
        GroupingContext {
            objects: self.objects,
            heuristic: self.heuristic,
            max_groups: self.config.max_groups.unwrap_or(self.objects.len()),
            mutation_groups_ratio: self.config.mutation_groups_ratio,
            mutation_min_groups: self.config.mutation_min_groups,
            crossover_pairing: self.config.crossover_pairing,
        }
    }

    fn check(&self, chromosome: &C, operation: &str) -> Result<()> {
        if self.config.verify && !chromosome.verify() {
            return Err(GgaError::InvariantViolation(format!(
                "invalid partition after {operation}"
            )));
        }
        Ok(())
    }

    /// Builds and evaluates the initial population.
    ///
    /// Calling it again restarts the run.
    pub fn init(&mut self) -> Result<()> {
        let ctx = self.context();
        if self.config.incremental && self.seeds.is_empty() {
            return Err("incremental mode needs at least one seed partition".into());
        }
        if !self.config.incremental && !self.seeds.is_empty() {
            warn!(
                seeds = self.seeds.len(),
                "seed partitions ignored outside incremental mode"
            );
        }

        let seeded = if self.config.incremental {
            self.seeds.len().min(self.config.population_size)
        } else {
            0
        };
        let mut population = Vec::with_capacity(self.config.population_size);
        for i in 0..self.config.population_size {
            let mut chromosome = C::new(&ctx);
            if i < seeded {
                chromosome.construct_from(&ctx, &self.seeds[i], &mut self.rng)?;
            } else {
                chromosome.random_construct(&ctx, &mut self.rng)?;
            }
            self.check(&chromosome, "construction")?;
            population.push(chromosome);
        }

        self.population = population;
        self.best = None;
        self.generation = 0;
        self.stagnation = 0;
        self.history.clear();
        self.counts = OperatorCounts::default();

        self.evaluate_population();
        self.rank_population()?;
        self.history.push(self.best_fitness());
        self.initialized = true;

        info!(
            objects = self.objects.len(),
            population = self.config.population_size,
            seeded,
            heuristic = self.heuristic.name(),
            "GGA initialized"
        );
        Ok(())
    }

    fn evaluate_population(&mut self) {
        let ctx = self.context();
        evaluate_all(&mut self.population, &ctx, self.config.parallel);
    }

    /// Orders the population and updates the best-ever chromosome.
    /// Returns whether it improved.
    fn rank_population(&mut self) -> Result<bool> {
        let fitness: Vec<GroupingFitness> = self
            .population
            .iter()
            .map(|c| {
                c.fitness().copied().ok_or_else(|| {
                    GgaError::InvariantViolation("chromosome ranked before evaluation".into())
                })
            })
            .collect::<Result<_>>()?;
        let incumbent = self.best.as_ref().and_then(|b| b.fitness().copied());

        let (ranked, improved) = match (&self.config.ranking, self.promethee.as_mut()) {
            (Ranking::Promethee(_), Some(promethee)) => {
                promethee.rank(&fitness, incumbent.as_ref())?
            }
            (Ranking::Scalar(w), _) => {
                let ranked =
                    RankedPopulation::from_scores(fitness.iter().map(|f| f.scalar(w)).collect());
                let improved = match (ranked.best(), incumbent) {
                    (Some(top), Some(best)) => ranked.score(top) > best.scalar(w),
                    _ => true,
                };
                (ranked, improved)
            }
            (Ranking::Promethee(_), None) => {
                return Err(GgaError::InvariantViolation(
                    "PROMETHEE ranking not initialized".into(),
                ))
            }
        };

        if improved {
            if let Some(top) = ranked.best() {
                self.best = Some(self.population[top].clone());
            }
        }
        self.ranked = ranked;
        Ok(improved)
    }

    fn best_fitness(&self) -> GroupingFitness {
        self.best
            .as_ref()
            .and_then(|b| b.fitness().copied())
            .unwrap_or_default()
    }

    /// Runs one generation, initializing first if needed.
    pub fn run_one_generation(&mut self) -> Result<GenerationStats> {
        if !self.initialized {
            self.init()?;
        }
        let ctx = self.context();
        let size = self.config.population_size;
        let mut counts = OperatorCounts::default();

        let mut next: Vec<C> = Vec::with_capacity(size);
        for &idx in self.ranked.order().iter().take(self.config.elitism) {
            next.push(self.population[idx].clone());
        }

        let mut child_index = 0;
        while next.len() < size {
            let (a, b) = self
                .config
                .selection
                .select_pair(&self.ranked, child_index, &mut self.rng);
            child_index += 1;

            let mut child = if self.rng.is_hit(self.config.crossover_rate) {
                let mut child = C::new(&ctx);
                let outcome = child.crossover(
                    &ctx,
                    &self.population[a],
                    &self.population[b],
                    &mut self.data,
                    &mut self.rng,
                )?;
                counts.crossovers += 1;
                if outcome.degenerate {
                    counts.degenerate_crossovers += 1;
                }
                self.check(&child, "crossover")?;
                child
            } else {
                self.population[a].clone()
            };

            if self.rng.is_hit(self.config.mutation_rate) {
                let outcome = child.mutation(&ctx, &mut self.rng)?;
                counts.mutations += 1;
                if outcome.clamped {
                    counts.clamped_mutations += 1;
                }
                self.check(&child, "mutation")?;
            }

            if self.rng.is_hit(self.config.inversion_rate) {
                child.inversion(&mut self.rng);
                counts.inversions += 1;
            }

            next.push(child);
        }

        self.population = next;
        self.evaluate_population();
        let improved = self.rank_population()?;

        self.generation += 1;
        if improved {
            self.stagnation = 0;
        } else {
            self.stagnation += 1;
        }
        let best = self.best_fitness();
        self.history.push(best);
        self.counts.absorb(&counts);

        debug!(
            generation = self.generation,
            sim_j = best.sim_j,
            agreement = best.agreement,
            disagreement = best.disagreement,
            improved,
            stagnation = self.stagnation,
            "generation done"
        );

        Ok(GenerationStats {
            generation: self.generation,
            best,
            improved,
            stagnation: self.stagnation,
            counts,
        })
    }

    /// Whether the configured stop condition holds.
    pub fn stop_condition(&self) -> bool {
        match self.config.stop {
            Some(StopCondition::MaxGenerations(n)) => self.generation >= n,
            Some(StopCondition::Stagnation(n)) => self.stagnation >= n,
            None => true,
        }
    }

    /// Runs up to `step_generations` generations, stopping early when the
    /// stop condition holds. Returns the stop condition.
    pub fn step(&mut self) -> Result<bool> {
        if !self.initialized {
            self.init()?;
        }
        for _ in 0..self.config.step_generations {
            if self.stop_condition() {
                break;
            }
            self.run_one_generation()?;
        }
        Ok(self.stop_condition())
    }

    /// Runs until the stop condition holds.
    pub fn run(&mut self) -> Result<GgaResult<C>> {
        self.run_with_cancel(None)
    }

    /// Runs with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the run stops
    /// before the next generation and returns the best chromosome found so
    /// far.
    pub fn run_with_cancel(&mut self, cancel: Option<Arc<AtomicBool>>) -> Result<GgaResult<C>> {
        if !self.initialized {
            self.init()?;
        }

        let mut cancelled = false;
        while !self.stop_condition() {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            self.run_one_generation()?;
        }

        let best = self.post_run()?.clone();
        let fitness = best.fitness().copied().unwrap_or_default();
        let stagnated = !cancelled && matches!(self.config.stop, Some(StopCondition::Stagnation(_)));

        info!(
            generations = self.generation,
            groups = best.groups().num_used(),
            sim_j = fitness.sim_j,
            agreement = fitness.agreement,
            disagreement = fitness.disagreement,
            cancelled,
            "GGA finished"
        );

        Ok(GgaResult {
            partition: best.groups().canonical_partition(),
            fitness,
            best,
            generations: self.generation,
            stagnated,
            cancelled,
            history: self.history.clone(),
            counts: self.counts,
        })
    }

    /// Final check of the best chromosome.
    ///
    /// # Errors
    ///
    /// [`GgaError::InvariantViolation`] if the instance was never
    /// initialized or the best partition is incomplete.
    pub fn post_run(&self) -> Result<&C> {
        let best = self.best.as_ref().ok_or_else(|| {
            GgaError::InvariantViolation("no best chromosome: instance not initialized".into())
        })?;
        if !best.verify() {
            return Err(GgaError::InvariantViolation(
                "best chromosome is not a valid partition".into(),
            ));
        }
        Ok(best)
    }

    /// Best-ever chromosome.
    pub fn best(&self) -> Option<&C> {
        self.best.as_ref()
    }

    pub fn population(&self) -> &[C] {
        &self.population
    }

    /// Ranking of the current population.
    pub fn ranked(&self) -> &RankedPopulation {
        &self.ranked
    }

    /// Number of generations run since initialization.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Consecutive generations without improvement.
    pub fn stagnation(&self) -> usize {
        self.stagnation
    }

    pub fn history(&self) -> &[GroupingFitness] {
        &self.history
    }

    pub fn counts(&self) -> OperatorCounts {
        self.counts
    }

    pub fn config(&self) -> &GgaConfig {
        &self.config
    }

    pub fn objects(&self) -> &'a ObjectSet {
        self.objects
    }
}

/// Evaluates every stale chromosome.
#[cfg(feature = "parallel")]
fn evaluate_all<C: Chromosome>(population: &mut [C], ctx: &GroupingContext<'_>, parallel: bool) {
    use rayon::prelude::*;

    if parallel {
        population
            .par_iter_mut()
            .filter(|c| !c.is_evaluated())
            .for_each(|c| c.evaluate(ctx));
    } else {
        for c in population.iter_mut().filter(|c| !c.is_evaluated()) {
            c.evaluate(ctx);
        }
    }
}

/// Evaluates every stale chromosome.
#[cfg(not(feature = "parallel"))]
fn evaluate_all<C: Chromosome>(population: &mut [C], ctx: &GroupingContext<'_>, _parallel: bool) {
    for c in population.iter_mut().filter(|c| !c.is_evaluated()) {
        c.evaluate(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gga::{Evaluable, ScalarWeights, Selection};
    use crate::groups::Object;
    use crate::heuristic::{BestFit, FirstFit, GroupingConfig};

    /// `n` objects, cluster `i * clusters / n`, intra similarity 0.9 and
    /// cross similarity 0.05.
    fn clustered(n: usize, clusters: usize) -> ObjectSet {
        let cluster = |i: usize| i * clusters / n;
        let objects = (0..n)
            .map(|i| {
                let mut obj = Object::new(i);
                for j in 0..n {
                    if j != i {
                        let same = cluster(i) == cluster(j);
                        obj = obj.with_similarity(j, if same { 0.9 } else { 0.05 });
                    }
                }
                obj
            })
            .collect();
        ObjectSet::new(objects).unwrap()
    }

    fn scalar() -> Ranking {
        Ranking::Scalar(ScalarWeights::default())
    }

    #[test]
    fn test_two_clusters_scalar() {
        let objects = clustered(20, 2);
        let heuristic = FirstFit::from_config(&GroupingConfig::default().with_min_similarity(0.5));
        let config = GgaConfig::default()
            .with_population_size(20)
            .with_max_generations(50)
            .with_ranking(scalar())
            .with_seed(42);

        let mut instance: Instance = Instance::new(&objects, &heuristic, config).unwrap();
        let result = instance.run().unwrap();

        assert_eq!(result.partition.len(), 2);
        assert_eq!(result.partition[0], (0..10).collect::<Vec<_>>());
        assert_eq!(result.partition[1], (10..20).collect::<Vec<_>>());
        assert!(result.fitness.sim_j > 5.0, "SimJ = {}", result.fitness.sim_j);
        assert_eq!(result.generations, 50);
        assert_eq!(result.history.len(), 51);
        assert!(!result.stagnated);
    }

    #[test]
    fn test_two_clusters_promethee() {
        let objects = clustered(20, 2);
        let heuristic = BestFit::from_config(&GroupingConfig::default().with_min_similarity(0.5));
        let config = GgaConfig::default()
            .with_population_size(20)
            .with_max_generations(50)
            .with_seed(7);

        let mut instance: Instance = Instance::new(&objects, &heuristic, config).unwrap();
        let result = instance.run().unwrap();
        assert_eq!(result.partition.len(), 2);
        assert!(result.fitness.sim_j > 5.0);
    }

    #[test]
    fn test_search_recovers_clusters_without_threshold() {
        // No similarity threshold: the heuristic fills groups up to 15, so
        // no initial chromosome is the two-cluster partition and only the
        // genetic operators can find it.
        let objects = clustered(20, 2);
        let heuristic = BestFit::from_config(&GroupingConfig::default().with_max_group_size(15));
        let target = vec![(0..10).collect::<Vec<_>>(), (10..20).collect::<Vec<_>>()];

        let mut recovered = 0;
        for ranking in [scalar(), Ranking::default()] {
            for seed in 1..=3 {
                let config = GgaConfig::default()
                    .with_population_size(20)
                    .with_max_generations(50)
                    .with_ranking(ranking.clone())
                    .with_seed(seed);
                let mut instance: Instance = Instance::new(&objects, &heuristic, config).unwrap();
                let result = instance.run().unwrap();

                assert!(result.history[0].sim_j < 18.0 - 1e-9);
                assert!(result.partition.iter().all(|g| g.len() <= 15));
                if result.partition == target {
                    assert!((result.fitness.sim_j - 18.0).abs() < 1e-9);
                    recovered += 1;
                }
            }
        }
        assert!(recovered >= 3, "recovered the clusters in {recovered} of 6 runs");
    }

    #[test]
    fn test_population_stays_valid() {
        let objects = clustered(15, 3);
        let heuristic = FirstFit::from_config(&GroupingConfig::default().with_max_group_size(4));
        let config = GgaConfig::default()
            .with_population_size(12)
            .with_max_generations(10)
            .with_mutation_rate(0.5)
            .with_inversion_rate(0.5)
            .with_verify(true)
            .with_seed(3);

        let mut instance: Instance = Instance::new(&objects, &heuristic, config).unwrap();
        instance.init().unwrap();
        while !instance.stop_condition() {
            let stats = instance.run_one_generation().unwrap();
            assert_eq!(stats.generation, instance.generation());
            assert_eq!(instance.population().len(), 12);
            for c in instance.population() {
                assert!(c.verify());
                assert!(c.is_evaluated());
                assert!(c.groups().used_groups().all(|g| g.len() <= 4));
            }
        }
        assert!(instance.post_run().is_ok());
    }

    #[test]
    fn test_scalar_best_never_degrades() {
        let objects = clustered(16, 4);
        let heuristic = FirstFit::from_config(&GroupingConfig::default().with_max_group_size(5));
        let weights = ScalarWeights::default();
        let config = GgaConfig::default()
            .with_population_size(16)
            .with_max_generations(30)
            .with_ranking(Ranking::Scalar(weights))
            .with_selection(Selection::Rank)
            .with_seed(11);

        let mut instance: Instance = Instance::new(&objects, &heuristic, config).unwrap();
        let result = instance.run().unwrap();
        for pair in result.history.windows(2) {
            assert!(pair[1].scalar(&weights) >= pair[0].scalar(&weights));
        }
        assert_eq!(result.fitness, *result.history.last().unwrap());
    }

    #[test]
    fn test_stagnation_stops_run() {
        // Every chromosome is the same two-cluster partition, so nothing
        // ever improves after initialization.
        let objects = clustered(10, 2);
        let heuristic = FirstFit::from_config(&GroupingConfig::default().with_min_similarity(0.5));
        for ranking in [scalar(), Ranking::default()] {
            let config = GgaConfig::default()
                .with_population_size(6)
                .with_stagnation_limit(5)
                .with_ranking(ranking)
                .with_seed(1);
            let mut instance: Instance = Instance::new(&objects, &heuristic, config).unwrap();
            let result = instance.run().unwrap();
            assert_eq!(result.generations, 5);
            assert!(result.stagnated);
        }
    }

    #[test]
    fn test_missing_stop_condition() {
        let objects = clustered(4, 2);
        let heuristic = FirstFit::from_config(&GroupingConfig::default());
        let result: Result<Instance> = Instance::new(&objects, &heuristic, GgaConfig::default());
        assert!(matches!(result, Err(GgaError::MissingStopCondition)));
    }

    #[test]
    fn test_empty_object_set() {
        let objects = ObjectSet::new(Vec::new()).unwrap();
        let heuristic = FirstFit::from_config(&GroupingConfig::default());
        let config = GgaConfig::default().with_max_generations(1);
        let result: Result<Instance> = Instance::new(&objects, &heuristic, config);
        assert!(matches!(result, Err(GgaError::InvalidParameter(_))));
    }

    #[test]
    fn test_step_mode() {
        let objects = clustered(8, 2);
        let heuristic = FirstFit::from_config(&GroupingConfig::default());
        let config = GgaConfig::default()
            .with_population_size(6)
            .with_max_generations(7)
            .with_step_generations(3)
            .with_seed(5);

        let mut instance: Instance = Instance::new(&objects, &heuristic, config).unwrap();
        assert!(!instance.step().unwrap());
        assert_eq!(instance.generation(), 3);
        assert!(!instance.step().unwrap());
        assert_eq!(instance.generation(), 6);
        assert!(instance.step().unwrap());
        assert_eq!(instance.generation(), 7);
        assert!(instance.step().unwrap());
        assert_eq!(instance.generation(), 7);
    }

    #[test]
    fn test_incremental_seeds_first_chromosomes() {
        let objects = clustered(6, 2);
        let heuristic = FirstFit::from_config(&GroupingConfig::default());
        let config = GgaConfig::default()
            .with_population_size(4)
            .with_max_generations(1)
            .with_incremental(true)
            .with_seed(2);
        let seed = vec![vec![0, 1], vec![2], vec![3, 4, 5]];

        let mut instance: Instance = Instance::new(&objects, &heuristic, config)
            .unwrap()
            .with_seeds(vec![seed.clone()]);
        instance.init().unwrap();
        assert_eq!(instance.population()[0].groups().canonical_partition(), seed);
    }

    #[test]
    fn test_incremental_requires_seeds() {
        let objects = clustered(4, 2);
        let heuristic = FirstFit::from_config(&GroupingConfig::default());
        let config = GgaConfig::default()
            .with_max_generations(1)
            .with_incremental(true);
        let mut instance: Instance = Instance::new(&objects, &heuristic, config).unwrap();
        assert!(matches!(
            instance.init(),
            Err(GgaError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_group_pool_exhausted() {
        let objects = clustered(6, 2);
        let heuristic = FirstFit::from_config(&GroupingConfig::default().with_min_similarity(0.5));
        let config = GgaConfig::default()
            .with_population_size(2)
            .with_max_generations(1)
            .with_max_groups(1);
        let mut instance: Instance = Instance::new(&objects, &heuristic, config).unwrap();
        assert!(matches!(
            instance.run(),
            Err(GgaError::GroupPoolExhausted { capacity: 1, .. })
        ));
    }

    #[test]
    fn test_cancelled_before_first_generation() {
        let objects = clustered(6, 2);
        let heuristic = FirstFit::from_config(&GroupingConfig::default());
        let config = GgaConfig::default()
            .with_population_size(4)
            .with_max_generations(100)
            .with_seed(8);
        let mut instance: Instance = Instance::new(&objects, &heuristic, config).unwrap();
        let result = instance
            .run_with_cancel(Some(Arc::new(AtomicBool::new(true))))
            .unwrap();
        assert!(result.cancelled);
        assert!(!result.stagnated);
        assert_eq!(result.generations, 0);
        assert!(result.best.verify());
    }

    #[test]
    fn test_post_run_before_init() {
        let objects = clustered(4, 2);
        let heuristic = FirstFit::from_config(&GroupingConfig::default());
        let config = GgaConfig::default().with_max_generations(1);
        let instance: Instance = Instance::new(&objects, &heuristic, config).unwrap();
        assert!(matches!(
            instance.post_run(),
            Err(GgaError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let objects = clustered(12, 3);
        let heuristic = FirstFit::from_config(&GroupingConfig::default().with_max_group_size(5));
        let config = GgaConfig::default()
            .with_population_size(10)
            .with_max_generations(8)
            .with_parallel(false)
            .with_seed(99);

        let run = || {
            let mut instance: Instance =
                Instance::new(&objects, &heuristic, config.clone()).unwrap();
            instance.run().unwrap()
        };
        let a = run();
        let b = run();
        assert_eq!(a.partition, b.partition);
        assert_eq!(a.history, b.history);
        assert_eq!(a.counts, b.counts);
    }
}
