//! Particle Swarm Optimization.
//!
//! A [`Swarm`] of [`Particle`]s is advanced one step at a time once every
//! particle has reported its fitness: particles are ranked, the global
//! best is refreshed, and (unless the swarm has converged) every particle
//! moves by the standard inertia / cognitive / social velocity update.
//!
//! # References
//!
//! - Kennedy & Eberhart (1995), "Particle Swarm Optimization"
//! - Shi & Eberhart (1998), "A Modified Particle Swarm Optimizer"

mod config;
mod swarm;
mod types;

pub use config::PsoConfig;
pub use swarm::Swarm;
pub use types::Particle;
