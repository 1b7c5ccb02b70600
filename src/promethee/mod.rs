//! PROMETHEE II multi-criteria ranking.
//!
//! Ranks a set of solutions described by several weighted criteria. For
//! every ordered pair of solutions a preference degree per criterion is
//! computed with a linear preference function (indifference threshold `P`,
//! preference threshold `Q`), aggregated by weight into `Pi(a, b)`, and
//! turned into outranking flows:
//!
//! - `Fi+(a) = Σ_b Pi(a, b) / (n - 1)`
//! - `Fi-(a) = Σ_b Pi(b, a) / (n - 1)`
//! - `Fi(a)  = Fi+(a) - Fi-(a)`
//!
//! Solutions are sorted by descending `Fi`, ties broken by registration
//! order.
//!
//! # References
//!
//! - Brans & Vincke (1985), "A Preference Ranking Organisation Method"
//! - Brans & Mareschal (2005), "PROMETHEE Methods", in *Multiple Criteria
//!   Decision Analysis: State of the Art Surveys*

mod kernel;
mod types;

pub use kernel::PrometheeKernel;
pub use types::{
    linear_preference, Criterion, CriterionHandle, Direction, PromSolution, SolutionHandle,
};
