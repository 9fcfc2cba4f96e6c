//! Caller-side scheduling around an [`Optimizer`].
//!
//! The optimizer itself has no notion of "the agent being evaluated now"
//! or of being paused. That state belongs to the caller and lives in a
//! [`StepCursor`]: the caller translates the agent at the cursor, runs its
//! simulation for as many frames as it needs, then hands the fitness to
//! [`StepCursor::advance`]. Pausing is just not calling `advance` for a
//! while; the cursor remembers where to resume.
//!
//! For synchronous fitness functions [`run`] and [`run_with_cancel`] drive
//! the whole loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::instrument;

use crate::error::OptimizerError;
use crate::optimizer::Optimizer;
use crate::problem::ProblemEncoding;

/// What the caller should do after a fitness report.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome<T> {
    /// Evaluate agent `next`.
    Continue { next: usize },

    /// The report was recorded but the cursor is paused; evaluate `next`
    /// once resumed.
    Paused { next: usize },

    /// The run is over. `best` is the fittest design found, decoded.
    Finished { converged: bool, best: Option<T> },
}

/// Position of the caller in the round-robin evaluation order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepCursor {
    index: usize,
    paused: bool,
}

impl StepCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Agent to evaluate next.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Decoded parameters of the agent at the cursor.
    pub fn current<P: ProblemEncoding>(
        &self,
        optimizer: &Optimizer<P>,
    ) -> Result<P::Params, OptimizerError> {
        optimizer.translate(self.index)
    }

    /// Reports the fitness of the agent at the cursor and moves on.
    ///
    /// The report is always recorded, even while paused, since the
    /// evaluation it belongs to has already happened. The run finishes as
    /// soon as the optimizer converges or reaches its generation limit.
    pub fn advance<P: ProblemEncoding>(
        &mut self,
        optimizer: &mut Optimizer<P>,
        fitness: f64,
    ) -> Result<StepOutcome<P::Params>, OptimizerError> {
        let converged = optimizer.record_fitness(self.index, fitness)?;
        if converged || optimizer.should_terminate() {
            return Ok(StepOutcome::Finished {
                converged,
                best: optimizer.translate_best(),
            });
        }

        self.index = (self.index + 1) % optimizer.size();
        if self.paused {
            Ok(StepOutcome::Paused { next: self.index })
        } else {
            Ok(StepOutcome::Continue { next: self.index })
        }
    }
}

/// Result of a blocking run.
#[derive(Debug, Clone)]
pub struct RunSummary<T> {
    /// Fittest design found, decoded.
    pub best: Option<T>,

    /// Fitness of `best`.
    pub best_fitness: Option<f64>,

    /// Whether the run stopped on nominal convergence.
    pub converged: bool,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Completed generations (GA) or steps (PSO).
    pub generations: usize,

    /// Fitness evaluations performed.
    pub evaluations: usize,
}

/// Runs a full optimization with a synchronous fitness function.
pub fn run<P, F>(optimizer: &mut Optimizer<P>, oracle: F) -> Result<RunSummary<P::Params>, OptimizerError>
where
    P: ProblemEncoding,
    F: FnMut(&P::Params) -> f64,
{
    run_with_cancel(optimizer, oracle, None)
}

/// Runs a full optimization with an optional cancellation token.
///
/// Starts a fresh run, then evaluates agents in round-robin order until the
/// optimizer converges, reaches its generation limit or `cancel` is set.
/// The flag is checked before each evaluation; a cancelled run keeps its
/// history through the last completed generation.
#[instrument(level = "debug", skip_all)]
pub fn run_with_cancel<P, F>(
    optimizer: &mut Optimizer<P>,
    mut oracle: F,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<RunSummary<P::Params>, OptimizerError>
where
    P: ProblemEncoding,
    F: FnMut(&P::Params) -> f64,
{
    optimizer.start_evolving();
    let mut cursor = StepCursor::new();
    let mut cancelled = false;

    loop {
        if let Some(ref flag) = cancel {
            if flag.load(Ordering::Relaxed) {
                cancelled = true;
                tracing::info!(evaluations = optimizer.evaluations(), "run cancelled");
                break;
            }
        }

        let params = cursor.current(optimizer)?;
        let fitness = oracle(&params);
        if let StepOutcome::Finished { .. } = cursor.advance(optimizer, fitness)? {
            break;
        }
    }

    Ok(RunSummary {
        best: optimizer.translate_best(),
        best_fitness: optimizer.fittest().map(|r| r.fitness),
        converged: optimizer.is_converged(),
        cancelled,
        generations: optimizer.generation(),
        evaluations: optimizer.evaluations(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::GaConfig;
    use crate::optimizer::{OptimizerConfig, Strategy};
    use crate::problem::VectorEncoding;
    use crate::pso::PsoConfig;
    use crate::space::ParameterSpace;

    fn optimizer(strategy: Strategy, max_generations: usize) -> Optimizer<VectorEncoding> {
        let encoding = VectorEncoding::new(ParameterSpace::uniform("x", 2, -1.0, 1.0).unwrap());
        let config = OptimizerConfig::default()
            .with_seed(11)
            .with_max_generations(max_generations)
            .with_convergence_threshold(1e-9);
        Optimizer::new(encoding, strategy, config).unwrap()
    }

    fn sphere(x: &Vec<f64>) -> f64 {
        -x.iter().map(|v| v * v).sum::<f64>()
    }

    #[test]
    fn test_cursor_wraps_round_robin() {
        let mut opt = optimizer(Strategy::Ga(GaConfig::default().with_population_size(3)), 4);
        opt.start_evolving();
        let mut cursor = StepCursor::new();
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(cursor.index());
            let f = sphere(&cursor.current(&opt).unwrap());
            cursor.advance(&mut opt, f).unwrap();
        }
        assert_eq!(seen, vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_paused_cursor_records_and_holds() {
        let mut opt = optimizer(Strategy::Pso(PsoConfig::default().with_swarm_size(4)), 4);
        opt.start_evolving();
        let mut cursor = StepCursor::new();
        cursor.pause();
        let outcome = cursor.advance(&mut opt, 1.0).unwrap();
        assert_eq!(outcome, StepOutcome::Paused { next: 1 });
        assert_eq!(opt.evaluations(), 1);

        cursor.resume();
        let outcome = cursor.advance(&mut opt, 1.0).unwrap();
        assert_eq!(outcome, StepOutcome::Continue { next: 2 });
    }

    #[test]
    fn test_finishes_at_generation_limit() {
        let mut opt = optimizer(Strategy::Ga(GaConfig::default().with_population_size(4)), 2);
        let summary = run(&mut opt, sphere).unwrap();
        assert!(!summary.cancelled);
        assert_eq!(summary.generations, 2);
        assert_eq!(summary.evaluations, 8);
        assert!(summary.best.is_some());
    }

    #[test]
    fn test_cancellation() {
        let mut opt = optimizer(Strategy::Pso(PsoConfig::default()), 50);
        let cancel = Arc::new(AtomicBool::new(true));
        let summary = run_with_cancel(&mut opt, sphere, Some(cancel)).unwrap();
        assert!(summary.cancelled);
        assert_eq!(summary.evaluations, 0);
        assert!(summary.best.is_none());
    }

    #[test]
    fn test_cancel_mid_run() {
        let mut opt = optimizer(Strategy::Ga(GaConfig::default().with_population_size(5)), 50);
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        let mut calls = 0;
        let summary = run_with_cancel(
            &mut opt,
            |x: &Vec<f64>| {
                calls += 1;
                if calls == 7 {
                    flag.store(true, Ordering::Relaxed);
                }
                sphere(x)
            },
            Some(cancel),
        )
        .unwrap();
        assert!(summary.cancelled);
        assert_eq!(summary.evaluations, 7);
        assert_eq!(summary.generations, 1);
    }
}
