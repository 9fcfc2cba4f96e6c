//! GA configuration.
//!
//! [`GaConfig`] holds the parameters specific to the genetic strategy.
//! Run-level settings (generation budget, convergence threshold, search
//! method, seed) live in [`OptimizerConfig`](crate::optimizer::OptimizerConfig).

use super::selection::Selection;
use crate::error::ConfigError;

/// Configuration for the Genetic Algorithm.
///
/// # Defaults
///
/// ```
/// use u_stepopt::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 20);
/// assert!((config.selection_rate - 0.5).abs() < 1e-12);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_stepopt::ga::{GaConfig, Selection};
///
/// let config = GaConfig::default()
///     .with_population_size(40)
///     .with_selection(Selection::Rank)
///     .with_mutation_rate(0.05);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GaConfig {
    /// Number of individuals evaluated per generation.
    ///
    /// Every individual costs one external simulation, so this is usually
    /// far smaller than for a cheap in-process objective.
    pub population_size: usize,

    /// Parent selection strategy.
    pub selection: Selection,

    /// Fraction of the ranked population that survives into the next
    /// generation and forms the mating pool (0.0–1.0).
    ///
    /// At least one individual always survives.
    pub selection_rate: f64,

    /// Probability that a child blends its two parents (0.0–1.0).
    ///
    /// Otherwise the child copies the fitter parent.
    pub crossover_rate: f64,

    /// Per-gene probability of being redrawn uniformly after evolution
    /// (0.0–1.0). Only used by global search.
    pub mutation_rate: f64,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            selection: Selection::default(),
            selection_rate: 0.5,
            crossover_rate: 0.5,
            mutation_rate: 0.1,
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_selection_rate(mut self, rate: f64) -> Self {
        self.selection_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Number of individuals that survive selection.
    pub fn survivor_count(&self) -> usize {
        ((self.population_size as f64 * self.selection_rate).round() as usize)
            .clamp(1, self.population_size.max(1))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptySize {
                name: "population_size",
            });
        }
        check_rate("selection_rate", self.selection_rate)?;
        check_rate("crossover_rate", self.crossover_rate)?;
        check_rate("mutation_rate", self.mutation_rate)?;
        Ok(())
    }
}

fn check_rate(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::RateOutOfRange { name, value });
    }
    Ok(())
}
