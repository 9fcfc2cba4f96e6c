//! Parent selection for the GA.
//!
//! Selection picks parents from the mating pool (the surviving, already
//! ranked part of the population). All strategies **maximize**: higher
//! fitness means a higher chance of being picked.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Baker (1985), "Adaptive Selection Methods for Genetic Algorithms"

use rand::Rng;

/// Selection strategy for choosing parents.
///
/// # Examples
///
/// ```
/// use u_stepopt::ga::Selection;
///
/// let sel = Selection::Roulette;
/// assert_eq!(Selection::default(), sel);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Fitness-proportionate (roulette wheel) selection.
    ///
    /// Weights are shifted by the pool minimum so negative fitness values
    /// (e.g. a cost expressed as negative profit) still work. The weakest
    /// member keeps a small positive weight.
    #[default]
    Roulette,

    /// Linear rank selection: the fittest of `n` gets weight `n`, the
    /// weakest weight `1`. Insensitive to fitness scaling.
    Rank,

    /// Tournament selection: pick `k` members at random, keep the fittest.
    Tournament(usize),
}

impl Selection {
    /// Picks a parent index from `fitness`, the fitness values of the
    /// mating pool in any order.
    ///
    /// # Panics
    /// Panics if `fitness` is empty.
    pub fn select<R: Rng>(&self, fitness: &[f64], rng: &mut R) -> usize {
        assert!(!fitness.is_empty(), "cannot select from empty mating pool");

        if fitness.len() == 1 {
            return 0;
        }
        match self {
            Selection::Roulette => roulette(fitness, rng),
            Selection::Rank => rank(fitness, rng),
            Selection::Tournament(k) => tournament(fitness, *k, rng),
        }
    }
}

fn roulette<R: Rng>(fitness: &[f64], rng: &mut R) -> usize {
    let n = fitness.len();
    let min = fitness.iter().copied().fold(f64::INFINITY, f64::min);
    let max = fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // 1% of the spread keeps the weakest member selectable
    let floor = ((max - min) * 0.01).max(1e-10);
    let weights: Vec<f64> = fitness
        .iter()
        .map(|&f| {
            let w = f - min + floor;
            if w.is_finite() && w > 0.0 {
                w
            } else {
                floor
            }
        })
        .collect();

    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return rng.random_range(0..n);
    }

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }
    n - 1
}

fn rank<R: Rng>(fitness: &[f64], rng: &mut R) -> usize {
    let n = fitness.len();

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| fitness[b].total_cmp(&fitness[a]));

    let total = (n * (n + 1)) as f64 / 2.0;
    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (position, &index) in order.iter().enumerate() {
        cumulative += (n - position) as f64;
        if cumulative > threshold {
            return index;
        }
    }
    order[n - 1]
}

fn tournament<R: Rng>(fitness: &[f64], k: usize, rng: &mut R) -> usize {
    let n = fitness.len();
    let mut best = rng.random_range(0..n);
    for _ in 1..k.max(1) {
        let candidate = rng.random_range(0..n);
        if fitness[candidate] > fitness[best] {
            best = candidate;
        }
    }
    best
}
