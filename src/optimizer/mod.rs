//! Stepwise optimizer shared by the GA and PSO strategies.
//!
//! [`Optimizer`] exposes one capability set whatever the strategy:
//! [`start_evolving`](Optimizer::start_evolving),
//! [`translate`](Optimizer::translate),
//! [`record_fitness`](Optimizer::record_fitness),
//! [`should_terminate`](Optimizer::should_terminate) and
//! [`apply_fittest`](Optimizer::apply_fittest). The strategy is picked
//! with [`Strategy`]; the problem is injected as a
//! [`ProblemEncoding`](crate::problem::ProblemEncoding).

mod config;
pub mod convergence;
mod history;
mod runner;

pub use config::{OptimizerConfig, SearchMethod, Strategy};
pub use history::{AgentRecord, History};
pub use runner::Optimizer;
