//! Real-valued Genetic Algorithm.
//!
//! Individuals carry genes in `[0, 1)`. A [`Population`] is advanced one
//! generation at a time by the [`Optimizer`](crate::optimizer::Optimizer)
//! once every individual has reported its fitness:
//!
//! 1. rank the evaluated generation, constraint-satisfying individuals
//!    first, and checkpoint it,
//! 2. keep the top `selection_rate` fraction and refill the rest with
//!    children of the feasible survivors ([`Selection`] + blend crossover
//!    or a jittered copy); a child that breaks a constraint is redrawn,
//! 3. roll back to the checkpoint if some child cannot be made feasible,
//! 4. otherwise mutate (global search only).
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
mod population;
mod selection;
mod types;

pub use config::GaConfig;
pub use population::Population;
pub use selection::Selection;
pub use types::Individual;
