//! Criteria, solutions and handles of the PROMETHEE kernel.

use crate::error::{GgaError, Result};

/// Handle of a criterion registered in a [`super::PrometheeKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CriterionHandle(pub(crate) usize);

impl CriterionHandle {
    /// Registration index of the criterion.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle of a solution registered in a [`super::PrometheeKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SolutionHandle(pub(crate) usize);

impl SolutionHandle {
    /// Registration index of the solution (also its tie-break rank).
    pub fn index(self) -> usize {
        self.0
    }
}

/// Whether larger or smaller raw values are preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Maximize,
    Minimize,
}

impl Direction {
    /// Multiplier turning a raw difference into a "how much better" value.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Maximize => 1.0,
            Direction::Minimize => -1.0,
        }
    }
}

/// Linear preference function with an indifference plateau.
///
/// - `d <= p`: 0
/// - `p < d < q`: `(d - p) / (q - p)`
/// - `d >= q`: 1
///
/// ```
/// use u_gga::promethee::linear_preference;
///
/// assert_eq!(linear_preference(0.0, 1.0, 3.0), 0.0);
/// assert_eq!(linear_preference(2.0, 1.0, 3.0), 0.5);
/// assert_eq!(linear_preference(4.0, 1.0, 3.0), 1.0);
/// ```
pub fn linear_preference(d: f64, p: f64, q: f64) -> f64 {
    if d <= p {
        0.0
    } else if d >= q {
        1.0
    } else {
        (d - p) / (q - p)
    }
}

/// A weighted criterion with indifference (`p`) and preference (`q`)
/// thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    name: String,
    direction: Direction,
    p: f64,
    q: f64,
    weight: f64,
}

impl Criterion {
    /// Creates a criterion.
    ///
    /// Fails with [`GgaError::InvalidParameter`] unless `0 <= p <= q` and
    /// `weight > 0` (all finite).
    pub fn new(
        name: impl Into<String>,
        direction: Direction,
        p: f64,
        q: f64,
        weight: f64,
    ) -> Result<Self> {
        let name = name.into();
        if !(p.is_finite() && q.is_finite() && weight.is_finite()) {
            return Err(GgaError::InvalidParameter(format!(
                "criterion '{name}': thresholds and weight must be finite"
            )));
        }
        if p < 0.0 || p > q {
            return Err(GgaError::InvalidParameter(format!(
                "criterion '{name}': thresholds must satisfy 0 <= P <= Q (P={p}, Q={q})"
            )));
        }
        if weight <= 0.0 {
            return Err(GgaError::InvalidParameter(format!(
                "criterion '{name}': weight must be positive (got {weight})"
            )));
        }
        Ok(Self {
            name,
            direction,
            p,
            q,
            weight,
        })
    }

    /// Name used in error messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether larger values are better.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Indifference threshold.
    pub fn p(&self) -> f64 {
        self.p
    }

    /// Preference threshold.
    pub fn q(&self) -> f64 {
        self.q
    }

    /// Relative weight in the aggregated preference.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Degree to which value `a` is preferred over value `b`, in `[0, 1]`.
    pub fn preference(&self, a: f64, b: f64) -> f64 {
        let d = self.direction.sign() * (a - b);
        linear_preference(d, self.p, self.q)
    }
}

/// A candidate being ranked: one raw value per criterion plus the flows
/// written back by the kernel.
#[derive(Debug, Clone)]
pub struct PromSolution {
    pub(crate) handle: SolutionHandle,
    pub(crate) name: String,
    pub(crate) values: Vec<Option<f64>>,
    pub(crate) fi_plus: f64,
    pub(crate) fi_minus: f64,
}

impl PromSolution {
    pub(crate) fn new(handle: SolutionHandle, name: String, criteria: usize) -> Self {
        Self {
            handle,
            name,
            values: vec![None; criteria],
            fi_plus: 0.0,
            fi_minus: 0.0,
        }
    }

    /// Handle returned at registration.
    pub fn handle(&self) -> SolutionHandle {
        self.handle
    }

    /// Name given at registration (`#<index>` for anonymous solutions).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw value assigned for `criterion`, if any.
    pub fn value(&self, criterion: CriterionHandle) -> Option<f64> {
        self.values.get(criterion.0).copied().flatten()
    }

    /// Positive (outranking) flow.
    pub fn fi_plus(&self) -> f64 {
        self.fi_plus
    }

    /// Negative (outranked) flow.
    pub fn fi_minus(&self) -> f64 {
        self.fi_minus
    }

    /// Net flow `Fi+ - Fi-`.
    pub fn fi(&self) -> f64 {
        self.fi_plus - self.fi_minus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_preference_boundaries() {
        assert_eq!(linear_preference(1.0, 1.0, 3.0), 0.0);
        assert_eq!(linear_preference(3.0, 1.0, 3.0), 1.0);
        assert!((linear_preference(1.5, 1.0, 3.0) - 0.25).abs() < 1e-12);
        assert_eq!(linear_preference(-5.0, 1.0, 3.0), 0.0);
    }

    #[test]
    fn test_linear_preference_degenerate_thresholds() {
        // P == Q acts as a step at P.
        assert_eq!(linear_preference(0.0, 0.0, 0.0), 0.0);
        assert_eq!(linear_preference(1e-9, 0.0, 0.0), 1.0);
    }

    #[test]
    fn test_criterion_validation() {
        assert!(Criterion::new("c", Direction::Maximize, 1.0, 3.0, 1.0).is_ok());
        assert!(Criterion::new("c", Direction::Maximize, 2.0, 2.0, 1.0).is_ok());
        assert!(matches!(
            Criterion::new("c", Direction::Maximize, 3.0, 1.0, 1.0),
            Err(GgaError::InvalidParameter(_))
        ));
        assert!(matches!(
            Criterion::new("c", Direction::Maximize, -0.1, 1.0, 1.0),
            Err(GgaError::InvalidParameter(_))
        ));
        assert!(matches!(
            Criterion::new("c", Direction::Maximize, 0.0, 1.0, 0.0),
            Err(GgaError::InvalidParameter(_))
        ));
        assert!(matches!(
            Criterion::new("c", Direction::Maximize, 0.0, f64::NAN, 1.0),
            Err(GgaError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_minimize_direction_flips_preference() {
        let c = Criterion::new("cost", Direction::Minimize, 0.0, 1.0, 1.0).unwrap();
        assert_eq!(c.preference(2.0, 5.0), 1.0);
        assert_eq!(c.preference(5.0, 2.0), 0.0);
    }
}
