//! GGA configuration.
//!
//! [`GgaConfig`] holds all parameters that control the generational loop.

use super::fitness::GroupingFitness;
use super::selection::Selection;
use crate::error::{GgaError, Result};
use crate::promethee::{Criterion, Direction};

/// When the generational loop stops.
///
/// Exactly one condition is configured; [`GgaConfig::validate`] fails with
/// [`GgaError::MissingStopCondition`] when none is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopCondition {
    /// Stop once this many generations have run.
    MaxGenerations(usize),
    /// Stop once the best chromosome has not improved for this many
    /// consecutive generations.
    Stagnation(usize),
}

/// Weights of the scalar fitness
/// `sim_j * SimJ + agreement * Agreement - disagreement * Disagreement`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScalarWeights {
    pub sim_j: f64,
    pub agreement: f64,
    pub disagreement: f64,
}

impl Default for ScalarWeights {
    fn default() -> Self {
        Self {
            sim_j: 1.0,
            agreement: 1.0,
            disagreement: 1.0,
        }
    }
}

/// Thresholds and weight of one PROMETHEE criterion.
///
/// A zero weight leaves the criterion out of the ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CriterionParams {
    /// Indifference threshold.
    pub p: f64,
    /// Preference threshold.
    pub q: f64,
    pub weight: f64,
}

impl CriterionParams {
    /// Creates criterion parameters from thresholds and a weight.
    pub fn new(p: f64, q: f64, weight: f64) -> Self {
        Self { p, q, weight }
    }
}

impl Default for CriterionParams {
    fn default() -> Self {
        Self {
            p: 0.05,
            q: 0.2,
            weight: 1.0,
        }
    }
}

/// PROMETHEE setup used to rank each generation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrometheeParams {
    pub sim_j: CriterionParams,
    pub agreement: CriterionParams,
    pub disagreement: CriterionParams,
    /// Scale criterion values by their largest magnitude in the generation,
    /// so that `p` and `q` are relative thresholds.
    pub normalize: bool,
}

impl Default for PrometheeParams {
    fn default() -> Self {
        Self {
            sim_j: CriterionParams::default(),
            agreement: CriterionParams::default(),
            disagreement: CriterionParams::default(),
            normalize: true,
        }
    }
}

impl PrometheeParams {
    /// Active criteria with the fitness component each one reads.
    pub(crate) fn active(&self) -> Vec<ActiveCriterion> {
        [
            ActiveCriterion {
                name: "SimJ",
                direction: Direction::Maximize,
                params: self.sim_j,
                value: |f| f.sim_j,
            },
            ActiveCriterion {
                name: "Agreement",
                direction: Direction::Maximize,
                params: self.agreement,
                value: |f| f.agreement,
            },
            ActiveCriterion {
                name: "Disagreement",
                direction: Direction::Minimize,
                params: self.disagreement,
                value: |f| f.disagreement,
            },
        ]
        .into_iter()
        .filter(|c| c.params.weight != 0.0)
        .collect()
    }

    fn validate(&self) -> Result<()> {
        let active = self.active();
        if active.is_empty() {
            return Err("at least one PROMETHEE criterion needs a positive weight".into());
        }
        for c in active {
            Criterion::new(c.name, c.direction, c.params.p, c.params.q, c.params.weight)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ActiveCriterion {
    pub(crate) name: &'static str,
    pub(crate) direction: Direction,
    pub(crate) params: CriterionParams,
    pub(crate) value: fn(&GroupingFitness) -> f64,
}

/// How chromosomes are ordered each generation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Ranking {
    /// Sort by the weighted scalar fitness (higher first).
    Scalar(ScalarWeights),
    /// Sort by PROMETHEE II net flow over SimJ, Agreement and Disagreement.
    Promethee(PrometheeParams),
}

impl Default for Ranking {
    fn default() -> Self {
        Ranking::Promethee(PrometheeParams::default())
    }
}

/// How crossover picks the parent-1 group matched with the injected
/// parent-2 group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrossoverPairing {
    /// Any group of parent 1.
    #[default]
    Random,
    /// The parent-1 group sharing the most objects with the injected group.
    MaxOverlap,
}

/// Configuration for the grouping genetic algorithm.
///
/// # Defaults
///
/// No stop condition is set: the caller must choose one.
///
/// ```
/// use u_gga::gga::{GgaConfig, StopCondition};
///
/// let config = GgaConfig::default();
/// assert!(config.validate().is_err());
///
/// let config = config.with_stop(StopCondition::MaxGenerations(100));
/// assert!(config.validate().is_ok());
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_gga::gga::{GgaConfig, Ranking, ScalarWeights, Selection, StopCondition};
///
/// let config = GgaConfig::default()
///     .with_population_size(40)
///     .with_stop(StopCondition::Stagnation(20))
///     .with_selection(Selection::Rank)
///     .with_ranking(Ranking::Scalar(ScalarWeights::default()))
///     .with_mutation_rate(0.2)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GgaConfig {
    /// Number of chromosomes in the population.
    pub population_size: usize,

    /// Stop condition; must be set.
    pub stop: Option<StopCondition>,

    /// Parent selection policy.
    pub selection: Selection,

    /// Generation ranking.
    pub ranking: Ranking,

    /// Number of best chromosomes copied unchanged to the next generation.
    pub elitism: usize,

    /// Probability of building a child by crossover (otherwise the first
    /// parent is cloned).
    pub crossover_rate: f64,

    /// Probability of mutating a child.
    pub mutation_rate: f64,

    /// Probability of applying inversion to a child.
    pub inversion_rate: f64,

    /// Fraction of a chromosome's groups destroyed by one mutation.
    pub mutation_groups_ratio: f64,

    /// Minimum number of groups destroyed by one mutation.
    pub mutation_min_groups: usize,

    /// Group matching policy of crossover.
    pub crossover_pairing: CrossoverPairing,

    /// Hard cap on the number of groups of a chromosome.
    ///
    /// `None` means one group per object, which can never be exhausted.
    pub max_groups: Option<usize>,

    /// Seed the initial population from existing partitions
    /// (see [`super::Instance::with_seeds`]).
    pub incremental: bool,

    /// Generations run by one call to [`super::Instance::step`].
    pub step_generations: usize,

    /// Whether to evaluate chromosomes in parallel (needs the `parallel`
    /// feature).
    pub parallel: bool,

    /// Check partition validity after every operator.
    pub verify: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GgaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            stop: None,
            selection: Selection::default(),
            ranking: Ranking::default(),
            elitism: 1,
            crossover_rate: 0.9,
            mutation_rate: 0.1,
            inversion_rate: 0.1,
            mutation_groups_ratio: 0.1,
            mutation_min_groups: 1,
            crossover_pairing: CrossoverPairing::default(),
            max_groups: None,
            incremental: false,
            step_generations: 1,
            parallel: true,
            verify: cfg!(debug_assertions),
            seed: None,
        }
    }
}

impl GgaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the stop condition.
    pub fn with_stop(mut self, stop: StopCondition) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Shorthand for `with_stop(StopCondition::MaxGenerations(n))`.
    pub fn with_max_generations(self, n: usize) -> Self {
        self.with_stop(StopCondition::MaxGenerations(n))
    }

    /// Shorthand for `with_stop(StopCondition::Stagnation(n))`.
    pub fn with_stagnation_limit(self, n: usize) -> Self {
        self.with_stop(StopCondition::Stagnation(n))
    }

    /// Sets the parent selection strategy.
    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Sets how each generation is ranked.
    pub fn with_ranking(mut self, ranking: Ranking) -> Self {
        self.ranking = ranking;
        self
    }

    /// Sets the number of elites copied unchanged.
    pub fn with_elitism(mut self, n: usize) -> Self {
        self.elitism = n;
        self
    }

    /// Sets the crossover rate (clamped to `[0, 1]`).
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate (clamped to `[0, 1]`).
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the inversion rate (clamped to `[0, 1]`).
    pub fn with_inversion_rate(mut self, rate: f64) -> Self {
        self.inversion_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the fraction of groups destroyed per mutation (clamped to `[0, 1]`).
    pub fn with_mutation_groups_ratio(mut self, ratio: f64) -> Self {
        self.mutation_groups_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Sets the minimum number of groups destroyed per mutation (at least 1).
    pub fn with_mutation_min_groups(mut self, n: usize) -> Self {
        self.mutation_min_groups = n.max(1);
        self
    }

    /// Sets how crossover matches groups.
    pub fn with_crossover_pairing(mut self, pairing: CrossoverPairing) -> Self {
        self.crossover_pairing = pairing;
        self
    }

    /// Sets the group pool capacity of each chromosome.
    pub fn with_max_groups(mut self, n: usize) -> Self {
        self.max_groups = Some(n);
        self
    }

    /// Enables seeding the population from existing partitions.
    pub fn with_incremental(mut self, incremental: bool) -> Self {
        self.incremental = incremental;
        self
    }

    /// Sets the number of generations run by one `step`.
    pub fn with_step_generations(mut self, n: usize) -> Self {
        self.step_generations = n;
        self
    }

    /// Enables parallel evaluation (needs the `parallel` feature).
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enables partition checks after every operator.
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err("population_size must be at least 2".into());
        }
        match self.stop {
            None => return Err(GgaError::MissingStopCondition),
            Some(StopCondition::MaxGenerations(0)) => {
                return Err("max generations must be at least 1".into())
            }
            Some(StopCondition::Stagnation(0)) => {
                return Err("stagnation limit must be at least 1".into())
            }
            Some(_) => {}
        }
        if self.elitism >= self.population_size {
            return Err("elitism too high: elites fill entire population".into());
        }
        if self.step_generations == 0 {
            return Err("step_generations must be at least 1".into());
        }
        if self.mutation_min_groups == 0 {
            return Err("mutation_min_groups must be at least 1".into());
        }
        if self.max_groups == Some(0) {
            return Err("max_groups must be positive or None".into());
        }
        if let Selection::Tournament(0) = self.selection {
            return Err("tournament size must be at least 1".into());
        }
        match &self.ranking {
            Ranking::Scalar(w) => {
                if ![w.sim_j, w.agreement, w.disagreement]
                    .iter()
                    .all(|v| v.is_finite())
                {
                    return Err("scalar weights must be finite".into());
                }
            }
            Ranking::Promethee(params) => params.validate()?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> GgaConfig {
        GgaConfig::default().with_max_generations(10)
    }

    #[test]
    fn test_default_config() {
        let config = GgaConfig::default();
        assert_eq!(config.population_size, 50);
        assert_eq!(config.stop, None);
        assert_eq!(config.selection, Selection::Tournament(3));
        assert_eq!(config.ranking, Ranking::Promethee(PrometheeParams::default()));
        assert_eq!(config.elitism, 1);
        assert!((config.crossover_rate - 0.9).abs() < 1e-10);
        assert!((config.mutation_rate - 0.1).abs() < 1e-10);
        assert_eq!(config.mutation_min_groups, 1);
        assert_eq!(config.crossover_pairing, CrossoverPairing::Random);
        assert!(config.max_groups.is_none());
        assert!(!config.incremental);
        assert_eq!(config.step_generations, 1);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_missing_stop_condition() {
        assert_eq!(
            GgaConfig::default().validate(),
            Err(GgaError::MissingStopCondition)
        );
    }

    #[test]
    fn test_builder_pattern() {
        let config = GgaConfig::default()
            .with_population_size(30)
            .with_stagnation_limit(15)
            .with_selection(Selection::ElitistPairing)
            .with_elitism(2)
            .with_crossover_rate(0.7)
            .with_mutation_rate(0.05)
            .with_inversion_rate(0.0)
            .with_mutation_groups_ratio(0.3)
            .with_crossover_pairing(CrossoverPairing::MaxOverlap)
            .with_max_groups(12)
            .with_step_generations(5)
            .with_parallel(false)
            .with_seed(42);

        assert_eq!(config.population_size, 30);
        assert_eq!(config.stop, Some(StopCondition::Stagnation(15)));
        assert_eq!(config.selection, Selection::ElitistPairing);
        assert_eq!(config.elitism, 2);
        assert!((config.crossover_rate - 0.7).abs() < 1e-10);
        assert!((config.mutation_groups_ratio - 0.3).abs() < 1e-10);
        assert_eq!(config.crossover_pairing, CrossoverPairing::MaxOverlap);
        assert_eq!(config.max_groups, Some(12));
        assert_eq!(config.step_generations, 5);
        assert!(!config.parallel);
        assert_eq!(config.seed, Some(42));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_clamp_rates() {
        let config = GgaConfig::default()
            .with_crossover_rate(-0.5)
            .with_mutation_rate(2.0)
            .with_inversion_rate(1.5)
            .with_mutation_groups_ratio(3.0)
            .with_mutation_min_groups(0);

        assert_eq!(config.crossover_rate, 0.0);
        assert_eq!(config.mutation_rate, 1.0);
        assert_eq!(config.inversion_rate, 1.0);
        assert_eq!(config.mutation_groups_ratio, 1.0);
        assert_eq!(config.mutation_min_groups, 1);
    }

    #[test]
    fn test_validate_population_too_small() {
        assert!(valid().with_population_size(1).validate().is_err());
    }

    #[test]
    fn test_validate_zero_limits() {
        assert!(GgaConfig::default()
            .with_max_generations(0)
            .validate()
            .is_err());
        assert!(GgaConfig::default()
            .with_stagnation_limit(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_elitism_too_high() {
        let config = valid().with_population_size(4).with_elitism(4);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_max_groups() {
        assert!(valid().with_max_groups(0).validate().is_err());
        assert!(valid().with_max_groups(1).validate().is_ok());
    }

    #[test]
    fn test_validate_promethee_thresholds() {
        let mut params = PrometheeParams::default();
        params.sim_j = CriterionParams::new(0.5, 0.1, 1.0);
        let config = valid().with_ranking(Ranking::Promethee(params));
        assert!(matches!(
            config.validate(),
            Err(GgaError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_promethee_zero_weight_disables_criterion() {
        let mut params = PrometheeParams::default();
        params.agreement.weight = 0.0;
        params.disagreement.weight = 0.0;
        assert_eq!(params.active().len(), 1);
        assert!(valid()
            .with_ranking(Ranking::Promethee(params.clone()))
            .validate()
            .is_ok());

        params.sim_j.weight = 0.0;
        assert!(valid()
            .with_ranking(Ranking::Promethee(params))
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_negative_weight() {
        let mut params = PrometheeParams::default();
        params.sim_j.weight = -1.0;
        assert!(valid()
            .with_ranking(Ranking::Promethee(params))
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_tournament_size() {
        assert!(valid()
            .with_selection(Selection::Tournament(0))
            .validate()
            .is_err());
    }
}
