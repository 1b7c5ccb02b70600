//! PROMETHEE II ranking kernel.

use super::types::{Criterion, CriterionHandle, Direction, PromSolution, SolutionHandle};
use crate::error::{GgaError, Result};

/// Multi-criteria outranking engine.
///
/// Register criteria and solutions, assign every (solution, criterion)
/// value, then call [`compute_promethee_ii`](Self::compute_promethee_ii).
/// Solutions are ranked by descending net flow; equal flows keep
/// registration order, so the first-registered solution wins a tie.
///
/// # Complexity
/// O(n² · k) for n solutions and k criteria.
///
/// # Examples
///
/// ```
/// use u_gga::promethee::{Direction, PrometheeKernel};
///
/// let mut kernel = PrometheeKernel::new();
/// let quality = kernel.add_criterion("quality", Direction::Maximize, 1.0, 3.0, 1.0).unwrap();
/// let a = kernel.new_named_solution("a");
/// let b = kernel.new_named_solution("b");
/// kernel.assign(a, quality, 10.0).unwrap();
/// kernel.assign(b, quality, 14.0).unwrap();
/// kernel.compute_promethee_ii().unwrap();
///
/// assert_eq!(kernel.best_solution().unwrap().name(), "b");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PrometheeKernel {
    criteria: Vec<Criterion>,
    solutions: Vec<PromSolution>,
    normalize: bool,
    /// Aggregated preference `Pi(a, b)` at `a * n + b`.
    pi: Vec<f64>,
    ranking: Option<Vec<SolutionHandle>>,
}

impl PrometheeKernel {
    /// Creates an empty kernel without normalization.
    pub fn new() -> Self {
        Self::default()
    }

    /// Divides each criterion's values by the largest absolute value seen
    /// for that criterion before differencing.
    pub fn with_normalization(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Registers a criterion.
    ///
    /// Fails with [`GgaError::InvalidParameter`] unless `0 <= p <= q` and
    /// `weight > 0`.
    pub fn add_criterion(
        &mut self,
        name: impl Into<String>,
        direction: Direction,
        p: f64,
        q: f64,
        weight: f64,
    ) -> Result<CriterionHandle> {
        let criterion = Criterion::new(name, direction, p, q, weight)?;
        let handle = CriterionHandle(self.criteria.len());
        self.criteria.push(criterion);
        for sol in &mut self.solutions {
            sol.values.push(None);
        }
        self.ranking = None;
        Ok(handle)
    }

    /// Registers an anonymous solution.
    pub fn new_solution(&mut self) -> SolutionHandle {
        let name = format!("#{}", self.solutions.len());
        self.new_named_solution(name)
    }

    /// Registers a named solution.
    pub fn new_named_solution(&mut self, name: impl Into<String>) -> SolutionHandle {
        let handle = SolutionHandle(self.solutions.len());
        self.solutions
            .push(PromSolution::new(handle, name.into(), self.criteria.len()));
        self.ranking = None;
        handle
    }

    /// Records the raw value of `criterion` for `solution`.
    pub fn assign(
        &mut self,
        solution: SolutionHandle,
        criterion: CriterionHandle,
        value: f64,
    ) -> Result<()> {
        if criterion.0 >= self.criteria.len() {
            return Err(GgaError::UnknownHandle(format!("criterion {}", criterion.0)));
        }
        if !value.is_finite() {
            return Err(GgaError::InvalidParameter(format!(
                "value for criterion '{}' must be finite (got {value})",
                self.criteria[criterion.0].name()
            )));
        }
        let sol = self
            .solutions
            .get_mut(solution.0)
            .ok_or_else(|| GgaError::UnknownHandle(format!("solution {}", solution.0)))?;
        sol.values[criterion.0] = Some(value);
        self.ranking = None;
        Ok(())
    }

    /// Registered criteria, in registration order.
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// The solution behind `handle`, if registered.
    pub fn solution(&self, handle: SolutionHandle) -> Option<&PromSolution> {
        self.solutions.get(handle.0)
    }

    /// Number of registered solutions.
    pub fn solution_count(&self) -> usize {
        self.solutions.len()
    }

    /// Drops all solutions but keeps the criteria, so the kernel can be
    /// reused for the next batch.
    pub fn clear_solutions(&mut self) {
        self.solutions.clear();
        self.pi.clear();
        self.ranking = None;
    }

    /// Computes `Fi+`, `Fi-` and `Fi` for every solution and ranks them.
    pub fn compute_promethee_ii(&mut self) -> Result<()> {
        if self.criteria.is_empty() {
            return Err(GgaError::InvalidParameter(
                "at least one criterion is required".into(),
            ));
        }

        let n = self.solutions.len();
        let k = self.criteria.len();

        // Collect values criterion-major; every pair must be assigned.
        let mut values = vec![0.0; n * k];
        for (s, sol) in self.solutions.iter().enumerate() {
            for (c, value) in sol.values.iter().enumerate() {
                values[c * n + s] = value.ok_or(GgaError::MissingAssignment {
                    solution: s,
                    criterion: c,
                })?;
            }
        }

        if self.normalize {
            for c in 0..k {
                let column = &mut values[c * n..(c + 1) * n];
                let scale = column.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
                if scale > 0.0 {
                    column.iter_mut().for_each(|v| *v /= scale);
                }
            }
        }

        let total_weight: f64 = self.criteria.iter().map(Criterion::weight).sum();

        self.pi = vec![0.0; n * n];
        for a in 0..n {
            for b in 0..n {
                if a == b {
                    continue;
                }
                let weighted: f64 = self
                    .criteria
                    .iter()
                    .enumerate()
                    .map(|(c, crit)| crit.weight() * crit.preference(values[c * n + a], values[c * n + b]))
                    .sum();
                self.pi[a * n + b] = weighted / total_weight;
            }
        }

        let denom = n.saturating_sub(1) as f64;
        for a in 0..n {
            let (plus, minus) = if n > 1 {
                let plus: f64 = (0..n).map(|b| self.pi[a * n + b]).sum();
                let minus: f64 = (0..n).map(|b| self.pi[b * n + a]).sum();
                (plus / denom, minus / denom)
            } else {
                (0.0, 0.0)
            };
            self.solutions[a].fi_plus = plus;
            self.solutions[a].fi_minus = minus;
        }

        // Stable sort: equal net flows keep registration order.
        let mut order: Vec<SolutionHandle> = self.solutions.iter().map(|s| s.handle).collect();
        order.sort_by(|x, y| {
            self.solutions[y.0]
                .fi()
                .total_cmp(&self.solutions[x.0].fi())
        });
        self.ranking = Some(order);
        Ok(())
    }

    /// Whether the current ranking is up to date.
    pub fn is_computed(&self) -> bool {
        self.ranking.is_some()
    }

    /// Handles ordered best first.
    pub fn ranked_handles(&self) -> Result<&[SolutionHandle]> {
        self.ranking.as_deref().ok_or(GgaError::NotComputed)
    }

    /// Solutions ordered best first.
    pub fn ranked_solutions(&self) -> Result<Vec<&PromSolution>> {
        Ok(self
            .ranked_handles()?
            .iter()
            .map(|h| &self.solutions[h.0])
            .collect())
    }

    /// The solution with the highest net flow.
    pub fn best_solution(&self) -> Result<&PromSolution> {
        let first = self
            .ranked_handles()?
            .first()
            .ok_or_else(|| GgaError::InvalidParameter("kernel holds no solutions".into()))?;
        Ok(&self.solutions[first.0])
    }

    /// Aggregated preference `Pi(a, b)` of the last computation.
    pub fn preference_index(&self, a: SolutionHandle, b: SolutionHandle) -> Result<f64> {
        self.ranked_handles()?;
        let n = self.solutions.len();
        if a.0 >= n || b.0 >= n {
            return Err(GgaError::UnknownHandle(format!("solution {} or {}", a.0, b.0)));
        }
        Ok(self.pi[a.0 * n + b.0])
    }
}
