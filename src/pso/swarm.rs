//! Swarm: particle initialization, global-best tracking and movement.

use super::config::PsoConfig;
use super::types::Particle;
use crate::agent::{rank_descending, Agent};
use crate::error::OptimizerError;
use crate::optimizer::SearchMethod;
use crate::random::gaussian_in_unit;
use rand::Rng;

/// Fixed-size collection of [`Particle`]s plus the swarm's best position.
#[derive(Debug, Clone)]
pub struct Swarm {
    particles: Vec<Particle>,
    global_best: Option<Vec<f64>>,
    global_best_fitness: Option<f64>,
    inertia: f64,
    cognitive: f64,
    social: f64,
}

impl Swarm {
    /// Creates `config.swarm_size` particles in `dimensions` dimensions.
    ///
    /// Particle 0 starts at `seed` when given. Other positions are uniform
    /// in `[0, 1)^d` for [`SearchMethod::Global`], or Gaussian around
    /// particle 0 for [`SearchMethod::Local`].
    pub fn new<R: Rng>(
        config: &PsoConfig,
        dimensions: usize,
        seed: Option<&[f64]>,
        method: SearchMethod,
        rng: &mut R,
    ) -> Self {
        let first: Vec<f64> = match seed {
            Some(position) => position.to_vec(),
            None => (0..dimensions).map(|_| rng.random_range(0.0..1.0)).collect(),
        };

        let mut particles = Vec::with_capacity(config.swarm_size);
        for i in 0..config.swarm_size {
            let position = if i == 0 {
                first.clone()
            } else {
                match method {
                    SearchMethod::Global => {
                        (0..dimensions).map(|_| rng.random_range(0.0..1.0)).collect()
                    }
                    SearchMethod::Local { radius } => first
                        .iter()
                        .map(|&g| gaussian_in_unit(g, radius, rng))
                        .collect(),
                }
            };
            particles.push(Particle::new(position, config.vmax, rng));
        }

        Self {
            particles,
            global_best: None,
            global_best_fitness: None,
            inertia: config.inertia,
            cognitive: config.cognitive,
            social: config.social,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn global_best(&self) -> Option<&[f64]> {
        self.global_best.as_deref()
    }

    pub fn global_best_fitness(&self) -> Option<f64> {
        self.global_best_fitness
    }

    /// Stores the fitness of particle `index`, updating its personal best.
    pub fn set_fitness(&mut self, index: usize, fitness: f64) -> Result<(), OptimizerError> {
        let size = self.len();
        self.particles
            .get_mut(index)
            .ok_or(OptimizerError::IndexOutOfRange { index, size })?
            .set_fitness(fitness)
    }

    /// Clears every fitness, personal best fitness and the global best.
    pub fn reset(&mut self) {
        self.particles.iter_mut().for_each(Particle::reset);
        self.global_best = None;
        self.global_best_fitness = None;
    }

    /// Ranks the particles fittest first and refreshes the global best.
    ///
    /// The top particle's position replaces the global best unless the
    /// global best already has a strictly higher fitness, so the global
    /// best fitness never decreases.
    pub fn rank(&mut self) -> Result<(), OptimizerError> {
        rank_descending(&mut self.particles)?;

        let top = &self.particles[0];
        if let Some(fitness) = top.fitness() {
            if self.global_best_fitness.is_none_or(|best| fitness >= best) {
                self.global_best = Some(top.position().to_vec());
                self.global_best_fitness = Some(fitness);
            }
        }
        Ok(())
    }

    /// Moves every particle one step towards its personal best and the
    /// global best. Positions are not clamped.
    pub fn advance<R: Rng>(&mut self, rng: &mut R) {
        let Some(global_best) = self.global_best.clone() else {
            return;
        };
        for particle in &mut self.particles {
            particle.advance(&global_best, self.inertia, self.cognitive, self.social, rng);
        }
    }
}
