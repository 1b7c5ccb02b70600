//! Grouping Genetic Algorithm with PROMETHEE II ranking.
//!
//! Partitions a set of objects into groups that maximize intra-group
//! similarity and agreement while minimizing intra-group disagreement:
//!
//! - **Random**: seeded [`random::RandomSource`] shared by every stochastic
//!   operator, so runs are reproducible.
//! - **PROMETHEE II**: multi-criteria outranking kernel used to rank each
//!   generation without collapsing the criteria into one number.
//! - **Groups**: objects, groups with cached aggregates, and a slot-pool
//!   partition with O(1) object→group lookup.
//! - **Heuristics**: first-fit and best-fit constructors that place
//!   ungrouped objects and consolidate weak groups.
//! - **GGA**: group-oriented crossover, mutation and inversion driven by a
//!   configurable generational loop.
//!
//! # Architecture
//!
//! The crate contains no domain-specific notion of what an object is:
//! callers describe objects only through sparse similarity, agreement and
//! disagreement lists, optional parent links and a `social` flag.
//!
//! # Features
//!
//! - `parallel`: evaluate chromosomes with rayon
//! - `serde`: derive `Serialize`/`Deserialize` for inputs and configuration
//!
//! # Logging
//!
//! Progress is reported through [`tracing`] events (`info` per run, `debug`
//! per generation, `trace` per operator). The crate never installs a
//! subscriber.

pub mod error;
pub mod gga;
pub mod groups;
pub mod heuristic;
pub mod promethee;
pub mod random;

pub use error::{GgaError, ObjectId, Result};
