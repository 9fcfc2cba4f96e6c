//! GA individual.

use crate::agent::{check_reported, Agent};
use crate::error::OptimizerError;
use rand::Rng;

/// A chromosome of genes in `[0, 1)` with its fitness.
///
/// Fitness stays `None` until the individual is evaluated in the
/// generation in flight.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Individual {
    genes: Vec<f64>,
    fitness: Option<f64>,
}

impl Individual {
    /// Creates an unevaluated individual from explicit genes.
    pub fn new(genes: Vec<f64>) -> Self {
        Self {
            genes,
            fitness: None,
        }
    }

    /// Creates an unevaluated individual with every gene uniform in `[0, 1)`.
    pub fn random<R: Rng>(dimensions: usize, rng: &mut R) -> Self {
        Self::new((0..dimensions).map(|_| rng.random_range(0.0..1.0)).collect())
    }

    pub fn genes(&self) -> &[f64] {
        &self.genes
    }

    pub fn gene(&self, index: usize) -> f64 {
        self.genes[index]
    }

    /// Overwrites one gene and invalidates the fitness.
    pub fn set_gene(&mut self, index: usize, value: f64) {
        self.genes[index] = value;
        self.fitness = None;
    }

    /// Stores an evaluated fitness. NaN is rejected.
    pub fn set_fitness(&mut self, fitness: f64) -> Result<(), OptimizerError> {
        self.fitness = Some(check_reported(fitness)?);
        Ok(())
    }

    pub fn clear_fitness(&mut self) {
        self.fitness = None;
    }
}

impl Agent for Individual {
    fn coordinates(&self) -> &[f64] {
        &self.genes
    }

    fn fitness(&self) -> Option<f64> {
        self.fitness
    }
}
