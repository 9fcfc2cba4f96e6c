//! Run-level configuration and strategy selection.

use crate::error::ConfigError;
use crate::ga::GaConfig;
use crate::pso::PsoConfig;

/// How the initial agents are spread.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchMethod {
    /// Agents cover the whole space uniformly; the GA mutates after
    /// every generation.
    #[default]
    Global,

    /// Agents are scattered around the first-born with Gaussian noise of
    /// standard deviation `radius` (in normalized units); the GA does not
    /// mutate.
    Local { radius: f64 },
}

impl SearchMethod {
    pub fn is_global(&self) -> bool {
        matches!(self, SearchMethod::Global)
    }
}

/// Search strategy, chosen by configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    Ga(GaConfig),
    Pso(PsoConfig),
}

impl Strategy {
    /// Number of agents evaluated per generation (GA) or step (PSO).
    pub fn size(&self) -> usize {
        match self {
            Strategy::Ga(c) => c.population_size,
            Strategy::Pso(c) => c.swarm_size,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Ga(_) => "ga",
            Strategy::Pso(_) => "pso",
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Strategy::Ga(c) => c.validate(),
            Strategy::Pso(c) => c.validate(),
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Ga(GaConfig::default())
    }
}

/// Settings shared by both strategies.
///
/// # Examples
///
/// ```
/// use u_stepopt::optimizer::{OptimizerConfig, SearchMethod};
///
/// let config = OptimizerConfig::default()
///     .with_max_generations(10)
///     .with_convergence_threshold(0.05)
///     .with_search_method(SearchMethod::Local { radius: 0.1 })
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OptimizerConfig {
    /// Generations (GA) or steps (PSO) before [`should_terminate`] fires.
    ///
    /// [`should_terminate`]: super::Optimizer::should_terminate
    pub max_generations: usize,

    /// Largest relative deviation from the top agents' mean coordinate
    /// still counted as converged.
    pub convergence_threshold: f64,

    /// Initial spread of the agents.
    pub search_method: SearchMethod,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_generations: 5,
            convergence_threshold: 0.01,
            search_method: SearchMethod::Global,
            seed: None,
        }
    }
}

impl OptimizerConfig {
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold;
        self
    }

    pub fn with_search_method(mut self, method: SearchMethod) -> Self {
        self.search_method = method;
        self
    }

    /// Shorthand for `with_search_method(SearchMethod::Local { radius })`.
    pub fn with_local_search(self, radius: f64) -> Self {
        self.with_search_method(SearchMethod::Local { radius })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_generations == 0 {
            return Err(ConfigError::ZeroGenerations);
        }
        if !(self.convergence_threshold.is_finite() && self.convergence_threshold > 0.0) {
            return Err(ConfigError::InvalidThreshold(self.convergence_threshold));
        }
        if let SearchMethod::Local { radius } = self.search_method {
            if !(radius.is_finite() && radius >= 0.0) {
                return Err(ConfigError::NegativeRadius(radius));
            }
        }
        Ok(())
    }
}
