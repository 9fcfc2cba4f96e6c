//! Behavior shared by GA individuals and PSO particles.

use crate::error::OptimizerError;
use std::cmp::Ordering;

/// A candidate solution living in the normalized cube.
///
/// Fitness is `None` until the agent has been evaluated in the generation
/// (or step) currently in flight. Higher fitness is better.
pub trait Agent {
    /// Normalized coordinates, one per dimension.
    fn coordinates(&self) -> &[f64];

    /// Fitness reported for the current coordinates, if any.
    fn fitness(&self) -> Option<f64>;

    fn is_evaluated(&self) -> bool {
        self.fitness().is_some()
    }

    /// Orders two agents by fitness.
    ///
    /// Returns `None` if either agent is unevaluated; unevaluated agents
    /// are never silently ordered.
    fn compare_fitness(&self, other: &Self) -> Option<Ordering>
    where
        Self: Sized,
    {
        match (self.fitness(), other.fitness()) {
            (Some(a), Some(b)) => Some(a.total_cmp(&b)),
            _ => None,
        }
    }
}

/// Rejects the unevaluated sentinel as a reported fitness.
pub(crate) fn check_reported(value: f64) -> Result<f64, OptimizerError> {
    if value.is_nan() {
        return Err(OptimizerError::UnevaluatedFitness);
    }
    Ok(value)
}

/// Sorts agents by descending fitness (fittest first).
///
/// Fails with [`OptimizerError::Unevaluated`] naming the first agent
/// without a fitness; the slice is left untouched in that case.
pub(crate) fn rank_descending<A: Agent>(agents: &mut [A]) -> Result<(), OptimizerError> {
    if let Some(index) = agents.iter().position(|a| !a.is_evaluated()) {
        return Err(OptimizerError::Unevaluated { index });
    }
    agents.sort_by(|a, b| b.compare_fitness(a).unwrap_or(Ordering::Equal));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stub {
        coords: Vec<f64>,
        fitness: Option<f64>,
    }

    impl Agent for Stub {
        fn coordinates(&self) -> &[f64] {
            &self.coords
        }
        fn fitness(&self) -> Option<f64> {
            self.fitness
        }
    }

    fn stub(f: Option<f64>) -> Stub {
        Stub {
            coords: vec![0.0],
            fitness: f,
        }
    }

    #[test]
    fn test_compare_unevaluated_fails() {
        assert_eq!(stub(Some(1.0)).compare_fitness(&stub(None)), None);
        assert_eq!(stub(None).compare_fitness(&stub(Some(1.0))), None);
        assert_eq!(
            stub(Some(2.0)).compare_fitness(&stub(Some(1.0))),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn test_rank_descending() {
        let mut agents = vec![stub(Some(1.0)), stub(Some(3.0)), stub(Some(2.0))];
        rank_descending(&mut agents).unwrap();
        let order: Vec<f64> = agents.iter().filter_map(|a| a.fitness).collect();
        assert_eq!(order, vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_rank_with_unevaluated_fails() {
        let mut agents = vec![stub(Some(1.0)), stub(None)];
        assert_eq!(
            rank_descending(&mut agents),
            Err(OptimizerError::Unevaluated { index: 1 })
        );
    }

    #[test]
    fn test_check_reported() {
        assert_eq!(check_reported(f64::NAN), Err(OptimizerError::UnevaluatedFitness));
        assert_eq!(check_reported(-2.5), Ok(-2.5));
        assert_eq!(check_reported(f64::NEG_INFINITY), Ok(f64::NEG_INFINITY));
    }
}
