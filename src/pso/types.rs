//! PSO particle.

use crate::agent::{check_reported, Agent};
use crate::error::OptimizerError;
use crate::random::gaussian;
use rand::Rng;

/// A particle: position, velocity and the best position it has visited.
///
/// Positions start in `[0, 1)` but are not clamped after velocity
/// updates; they may drift outside the unit cube.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Particle {
    position: Vec<f64>,
    velocity: Vec<f64>,
    personal_best: Vec<f64>,
    personal_best_fitness: Option<f64>,
    fitness: Option<f64>,
}

impl Particle {
    /// Creates a particle at `position` with velocity `N(0,1) * vmax` per
    /// dimension.
    pub fn new<R: Rng>(position: Vec<f64>, vmax: f64, rng: &mut R) -> Self {
        let velocity = position.iter().map(|_| gaussian(rng) * vmax).collect();
        Self {
            personal_best: position.clone(),
            position,
            velocity,
            personal_best_fitness: None,
            fitness: None,
        }
    }

    pub fn position(&self) -> &[f64] {
        &self.position
    }

    pub fn velocity(&self) -> &[f64] {
        &self.velocity
    }

    pub fn personal_best(&self) -> &[f64] {
        &self.personal_best
    }

    pub fn personal_best_fitness(&self) -> Option<f64> {
        self.personal_best_fitness
    }

    /// Stores the fitness of the current position.
    ///
    /// When it strictly beats the personal best (or no personal best
    /// exists yet), the current position becomes the personal best.
    pub fn set_fitness(&mut self, fitness: f64) -> Result<(), OptimizerError> {
        let fitness = check_reported(fitness)?;
        self.fitness = Some(fitness);
        if self.personal_best_fitness.is_none_or(|best| fitness > best) {
            self.personal_best.clone_from(&self.position);
            self.personal_best_fitness = Some(fitness);
        }
        Ok(())
    }

    /// Forgets the current fitness and the personal best fitness; the
    /// personal best position is reset to the current position.
    pub fn reset(&mut self) {
        self.fitness = None;
        self.personal_best_fitness = None;
        self.personal_best.clone_from(&self.position);
    }

    /// Applies one velocity and position update.
    ///
    /// `v = w*v + c1*r1*(pbest - x) + c2*r2*(gbest - x); x += v`, with
    /// fresh `r1, r2` per dimension. The particle becomes unevaluated.
    pub(crate) fn advance<R: Rng>(
        &mut self,
        global_best: &[f64],
        inertia: f64,
        cognitive: f64,
        social: f64,
        rng: &mut R,
    ) {
        for i in 0..self.position.len() {
            let r1: f64 = rng.random_range(0.0..1.0);
            let r2: f64 = rng.random_range(0.0..1.0);
            self.velocity[i] = inertia * self.velocity[i]
                + cognitive * r1 * (self.personal_best[i] - self.position[i])
                + social * r2 * (global_best[i] - self.position[i]);
            self.position[i] += self.velocity[i];
        }
        self.fitness = None;
    }
}

impl Agent for Particle {
    fn coordinates(&self) -> &[f64] {
        &self.position
    }

    fn fitness(&self) -> Option<f64> {
        self.fitness
    }
}
