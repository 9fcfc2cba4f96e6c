//! PSO configuration.

use crate::error::ConfigError;

/// Configuration for Particle Swarm Optimization.
///
/// # Examples
///
/// ```
/// use u_stepopt::pso::PsoConfig;
///
/// let config = PsoConfig::default()
///     .with_swarm_size(10)
///     .with_inertia(0.8)
///     .with_vmax(0.01);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PsoConfig {
    /// Number of particles evaluated per step.
    pub swarm_size: usize,

    /// Weight of the previous velocity.
    pub inertia: f64,

    /// Pull towards each particle's own best position.
    pub cognitive: f64,

    /// Pull towards the swarm's best position.
    pub social: f64,

    /// Scale of the initial Gaussian velocities, per dimension.
    pub vmax: f64,
}

impl Default for PsoConfig {
    fn default() -> Self {
        Self {
            swarm_size: 20,
            inertia: 0.8,
            cognitive: 0.1,
            social: 0.1,
            vmax: 0.01,
        }
    }
}

impl PsoConfig {
    pub fn with_swarm_size(mut self, n: usize) -> Self {
        self.swarm_size = n;
        self
    }

    pub fn with_inertia(mut self, w: f64) -> Self {
        self.inertia = w;
        self
    }

    pub fn with_cognitive(mut self, c1: f64) -> Self {
        self.cognitive = c1;
        self
    }

    pub fn with_social(mut self, c2: f64) -> Self {
        self.social = c2;
        self
    }

    pub fn with_vmax(mut self, vmax: f64) -> Self {
        self.vmax = vmax;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.swarm_size == 0 {
            return Err(ConfigError::EmptySize { name: "swarm_size" });
        }
        if !(self.vmax.is_finite() && self.vmax > 0.0) {
            return Err(ConfigError::NonPositive {
                name: "vmax",
                value: self.vmax,
            });
        }
        for (name, value) in [
            ("inertia", self.inertia),
            ("cognitive", self.cognitive),
            ("social", self.social),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        Ok(())
    }
}
