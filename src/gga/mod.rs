//! Grouping Genetic Algorithm (GGA).
//!
//! A population of partitions evolves under group-oriented operators:
//! the genes of a [`GroupingChromosome`] are whole groups, and every
//! operator that breaks groups hands the displaced objects back to a
//! [`GroupingHeuristic`](crate::heuristic::GroupingHeuristic).
//!
//! # Operators
//!
//! - **Crossover**: inject one group of parent 2 into parent 1, drop the
//!   parent-1 groups it overlaps, reinsert the orphans
//! - **Mutation**: destroy a fraction of the groups, reinsert their objects
//! - **Inversion**: reorder the group view (affects first-fit placement)
//!
//! # Ranking
//!
//! Each generation is ordered either by a weighted scalar
//! ([`Ranking::Scalar`]) or by PROMETHEE II net flows over the three
//! grouping criteria ([`Ranking::Promethee`]). In the latter case the
//! best-ever chromosome is ranked together with the population and wins
//! ties, so it is only replaced by a strictly better chromosome.
//!
//! # Key Types
//!
//! - [`Chromosome`]: what the loop needs from a chromosome
//! - [`GgaConfig`]: population size, rates, stop condition, ranking
//! - [`Instance`]: owns the population and runs the loop
//! - [`GgaResult`]: best partition and run statistics
//!
//! # References
//!
//! - Falkenauer (1998), *Genetic Algorithms and Grouping Problems*
//! - Brans & Vincke (1985), "A Preference Ranking Organisation Method"

mod chromosome;
mod config;
mod fitness;
mod runner;
mod selection;
mod types;

pub use chromosome::GroupingChromosome;
pub use config::{
    CriterionParams, CrossoverPairing, GgaConfig, PrometheeParams, Ranking, ScalarWeights,
    StopCondition,
};
pub use fitness::{evaluate_partition, ratio, GroupingFitness, INTER_FLOOR};
pub use runner::{GenerationStats, GgaResult, Instance, OperatorCounts};
pub use selection::{RankedPopulation, Selection};
pub use types::{
    Chromosome, Constructible, CrossoverOutcome, Evaluable, GroupingContext, MutationOutcome,
    Recombinable, ThreadData,
};
