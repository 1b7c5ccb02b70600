//! Construction heuristics.
//!
//! A heuristic turns a list of ungrouped objects into group assignments,
//! one object at a time. The genetic operators rely on it for every
//! (re)construction: initial population, crossover repair and mutation.
//!
//! # Core Traits
//!
//! - [`GroupingHeuristic`]: processing order, placement decision, cleanup
//! - [`Compatibility`]: the domain test deciding whether an object may join
//!   a group
//!
//! # Provided Heuristics
//!
//! - [`FirstFit`]: first compatible group in used order
//! - [`BestFit`]: most affine compatible group
//!
//! Both dissolve weak groups after the run (see [`consolidate`]).
//!
//! # References
//!
//! - Falkenauer (1998), *Genetic Algorithms and Grouping Problems*

mod best_fit;
mod compatibility;
mod config;
mod consolidate;
mod first_fit;
mod run;
mod types;

pub use best_fit::BestFit;
pub use compatibility::SimilarityCompatibility;
pub use config::GroupingConfig;
pub use consolidate::consolidate;
pub use first_fit::FirstFit;
pub use run::{run_heuristic, HeuristicReport, HeuristicRun, HeuristicState};
pub use types::{Compatibility, GroupingHeuristic, Placement};
