//! Parent selection.
//!
//! Selection works on a [`RankedPopulation`]: the order produced by the
//! generation ranking (scalar sort or PROMETHEE II) together with one score
//! per chromosome. Both assume **maximization** (higher score = better).
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Baker (1985), "Adaptive Selection Methods for Genetic Algorithms"

use crate::random::RandomSource;

/// A population ranked best-first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedPopulation {
    order: Vec<usize>,
    position: Vec<usize>,
    scores: Vec<f64>,
}

impl RankedPopulation {
    /// Builds a ranking from `scores` (indexed by chromosome) and the
    /// best-first `order`.
    ///
    /// # Panics
    /// Panics if `order` is not a permutation of `0..scores.len()`.
    pub fn new(order: Vec<usize>, scores: Vec<f64>) -> Self {
        assert_eq!(order.len(), scores.len(), "order and scores differ in length");
        let mut position = vec![usize::MAX; order.len()];
        for (rank, &idx) in order.iter().enumerate() {
            assert!(
                idx < order.len() && position[idx] == usize::MAX,
                "order is not a permutation"
            );
            position[idx] = rank;
        }
        Self {
            order,
            position,
            scores,
        }
    }

    /// Ranks by descending score; equal scores keep index order.
    pub fn from_scores(scores: Vec<f64>) -> Self {
        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
        Self::new(order, scores)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Chromosome indices, best first.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Rank of chromosome `idx` (0 = best).
    pub fn position(&self, idx: usize) -> usize {
        self.position[idx]
    }

    pub fn score(&self, idx: usize) -> f64 {
        self.scores[idx]
    }

    /// Index of the best chromosome.
    pub fn best(&self) -> Option<usize> {
        self.order.first().copied()
    }
}

/// Selection strategy for choosing parents.
///
/// # Examples
///
/// ```
/// use u_gga::gga::{RankedPopulation, Selection};
/// use u_gga::random::RandomSource;
///
/// let ranked = RankedPopulation::from_scores(vec![0.1, 0.9, 0.5]);
/// let mut rng = RandomSource::new(1);
/// let idx = Selection::Tournament(3).select(&ranked, &mut rng);
/// assert!(idx < 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Tournament selection: pick `k` chromosomes at random, keep the best
    /// ranked.
    ///
    /// # Complexity
    /// O(k) per selection
    Tournament(usize),

    /// Score-proportionate (roulette wheel) selection.
    ///
    /// Scores are shifted so the worst chromosome keeps a tiny weight.
    /// With PROMETHEE ranking the score is the net flow.
    ///
    /// # Complexity
    /// O(n) per selection
    Roulette,

    /// Linear rank selection: weight `n - rank`.
    ///
    /// # Complexity
    /// O(n) per selection
    Rank,

    /// Pairs the i-th child's first parent with the i-th best chromosome
    /// (cycling through the better half) and draws the second parent
    /// uniformly from the better half.
    ElitistPairing,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(3)
    }
}

impl Selection {
    /// Select a parent index.
    ///
    /// [`Selection::ElitistPairing`] used alone behaves as a uniform draw
    /// from the better half.
    ///
    /// # Panics
    /// Panics if `ranked` is empty.
    pub fn select(&self, ranked: &RankedPopulation, rng: &mut RandomSource) -> usize {
        assert!(!ranked.is_empty(), "cannot select from empty population");

        match self {
            Selection::Tournament(k) => tournament(ranked, *k, rng),
            Selection::Roulette => roulette(ranked, rng),
            Selection::Rank => rank(ranked, rng),
            Selection::ElitistPairing => ranked.order[rng.next_index(better_half(ranked))],
        }
    }

    /// Selects both parents of the `child`-th offspring of a generation.
    ///
    /// # Panics
    /// Panics if `ranked` is empty.
    pub fn select_pair(
        &self,
        ranked: &RankedPopulation,
        child: usize,
        rng: &mut RandomSource,
    ) -> (usize, usize) {
        match self {
            Selection::ElitistPairing => {
                assert!(!ranked.is_empty(), "cannot select from empty population");
                let half = better_half(ranked);
                let first = ranked.order[child % half];
                let mut second = ranked.order[rng.next_index(half)];
                if second == first && half > 1 {
                    // Shift to a different member of the better half.
                    let pos = (ranked.position(first) + 1 + rng.next_index(half - 1)) % half;
                    second = ranked.order[pos];
                }
                (first, second)
            }
            _ => (self.select(ranked, rng), self.select(ranked, rng)),
        }
    }
}

fn better_half(ranked: &RankedPopulation) -> usize {
    ranked.len().div_ceil(2).max(1)
}

fn tournament(ranked: &RankedPopulation, k: usize, rng: &mut RandomSource) -> usize {
    let k = k.max(1);
    let n = ranked.len();

    let mut best_idx = rng.next_index(n);
    for _ in 1..k {
        let idx = rng.next_index(n);
        if ranked.position(idx) < ranked.position(best_idx) {
            best_idx = idx;
        }
    }
    best_idx
}

/// weight_i = score_i - min_score + epsilon
fn roulette(ranked: &RankedPopulation, rng: &mut RandomSource) -> usize {
    let n = ranked.len();
    if n == 1 {
        return 0;
    }

    let min_score = ranked
        .scores
        .iter()
        .cloned()
        .filter(|s| s.is_finite())
        .fold(f64::INFINITY, f64::min);
    let epsilon = 1e-10;

    let weights: Vec<f64> = ranked
        .scores
        .iter()
        .map(|&s| {
            let w = s - min_score + epsilon;
            if w.is_finite() && w > 0.0 {
                w
            } else {
                epsilon
            }
        })
        .collect();

    let total: f64 = weights.iter().sum();
    if !(total > 0.0 && total.is_finite()) {
        return rng.next_index(n);
    }

    let threshold = rng.next_double() * total;
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }

    n - 1 // floating-point fallback
}

fn rank(ranked: &RankedPopulation, rng: &mut RandomSource) -> usize {
    let n = ranked.len();
    if n == 1 {
        return 0;
    }

    let total: f64 = (n * (n + 1)) as f64 / 2.0;
    let threshold = rng.next_double() * total;
    let mut cumulative = 0.0;

    for (rank, &idx) in ranked.order.iter().enumerate() {
        cumulative += (n - rank) as f64;
        if cumulative > threshold {
            return idx;
        }
    }

    ranked.order[n - 1]
}
