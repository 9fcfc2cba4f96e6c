//! Nominal convergence test shared by both strategies.
//!
//! The run is nominally converged when the top-ranked agents agree on
//! every coordinate: each of the `max(2, n / 4)` fittest agents must lie
//! within `threshold` relative deviation of their mean, per dimension.
//! This looks at coordinates, not at fitness stability.
//!
//! Agents sharing identical coordinates count once, so a parent and its
//! unmutated copy cannot settle the test on their own. A population with a
//! single distinct point is converged.

use crate::agent::Agent;

/// Below this magnitude the mean is treated as zero and the deviation is
/// measured in absolute terms.
const ZERO_MEAN: f64 = 1e-12;

/// Number of top-ranked agents that must agree for a population of `size`.
pub fn top_count(size: usize) -> usize {
    (size / 4).max(2).min(size)
}

/// Tests nominal convergence on agents ranked fittest first.
pub fn is_nominally_converged<A: Agent>(ranked: &[A], threshold: f64) -> bool {
    let top = top_count(ranked.len());
    if top == 0 {
        return false;
    }
    let mut leaders: Vec<&[f64]> = Vec::with_capacity(top);
    for agent in ranked {
        if leaders.len() == top {
            break;
        }
        let coords = agent.coordinates();
        if !leaders.contains(&coords) {
            leaders.push(coords);
        }
    }
    if leaders.len() < 2 {
        return true;
    }
    let count = leaders.len() as f64;
    let dimensions = leaders[0].len();

    (0..dimensions).all(|d| {
        let mean = leaders.iter().map(|c| c[d]).sum::<f64>() / count;
        leaders.iter().all(|c| {
            let x = c[d];
            let deviation = if mean.abs() < ZERO_MEAN {
                (x - mean).abs()
            } else {
                (x / mean - 1.0).abs()
            };
            deviation <= threshold
        })
    })
}
