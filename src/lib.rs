//! Stepwise black-box optimization for slow, externally simulated designs.
//!
//! Tunes the parameters of a solar installation (tilt angles, row spacing,
//! rack width, ...) when every fitness evaluation is a multi-frame
//! simulation run by the host application. The optimizer never calls a
//! fitness function itself; the caller drives it one evaluation at a time:
//!
//! 1. [`Optimizer::translate`](optimizer::Optimizer::translate) an agent
//!    into domain parameters,
//! 2. apply them and run the simulation,
//! 3. report the result with
//!    [`Optimizer::record_fitness`](optimizer::Optimizer::record_fitness).
//!
//! Two interchangeable strategies sit behind the same surface:
//!
//! - **Genetic Algorithm (GA)**: ranked survivors, roulette/rank/tournament
//!   selection, blend crossover, uniform mutation, and constraint
//!   handling that redraws offending children and rolls a generation back
//!   when that fails.
//! - **Particle Swarm Optimization (PSO)**: inertia-weighted velocity
//!   updates towards personal and global bests.
//!
//! The problem is injected as a [`ProblemEncoding`](problem::ProblemEncoding)
//! that maps normalized vectors in `[0, 1)^d` to domain parameters and
//! seeds the first agent from the caller's existing design.
//! [`encodings`] ships tilt-angle and array-layout encodings.

pub mod agent;
pub mod driver;
pub mod encodings;
pub mod error;
pub mod ga;
pub mod optimizer;
pub mod problem;
pub mod pso;
pub mod random;
pub mod space;

#[cfg(feature = "wasm")]
pub mod wasm;
