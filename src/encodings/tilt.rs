//! Per-rack tilt angle encoding.

use crate::error::ConfigError;
use crate::problem::ProblemEncoding;
use crate::space::{Dimension, ParameterSpace};

/// One tilt angle (degrees) per solar rack.
#[derive(Debug, Clone, PartialEq)]
pub struct TiltAngles {
    space: ParameterSpace,
}

impl TiltAngles {
    /// Creates an encoding for `racks` racks, each tilted within
    /// `[min_deg, max_deg]`.
    pub fn new(racks: usize, min_deg: f64, max_deg: f64) -> Result<Self, ConfigError> {
        if racks == 0 {
            return Err(ConfigError::EmptySize { name: "racks" });
        }
        let dims = (0..racks)
            .map(|i| Dimension::new(format!("tilt{i}"), min_deg, max_deg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            space: ParameterSpace::new(dims)?,
        })
    }

    /// Full range from facing down-slope to facing up-slope.
    pub fn full_range(racks: usize) -> Result<Self, ConfigError> {
        Self::new(racks, -90.0, 90.0)
    }

    pub fn racks(&self) -> usize {
        self.space.len()
    }
}

impl ProblemEncoding for TiltAngles {
    type Params = Vec<f64>;
    type Design = [f64];

    fn space(&self) -> &ParameterSpace {
        &self.space
    }

    fn decode(&self, genes: &[f64]) -> Vec<f64> {
        self.space.decode_all(genes)
    }

    fn seed_first_agent(&self, current_tilts: &[f64]) -> Result<Vec<f64>, ConfigError> {
        self.space.encode_all(current_tilts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_tilts() {
        let enc = TiltAngles::full_range(3).unwrap();
        assert_eq!(enc.racks(), 3);
        let tilts = enc.decode(&[0.0, 0.5, 1.0]);
        assert!((tilts[0] + 90.0).abs() < 1e-12);
        assert!(tilts[1].abs() < 1e-12);
        assert!((tilts[2] - 90.0).abs() < 1e-12);
    }

    #[test]
    fn test_seed_from_current_tilts() {
        let enc = TiltAngles::new(2, 0.0, 60.0).unwrap();
        let g = enc.seed_first_agent(&[15.0, 45.0]).unwrap();
        let back = enc.decode(&g);
        assert!((back[0] - 15.0).abs() < 1e-9);
        assert!((back[1] - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_degenerate_range() {
        assert!(matches!(
            TiltAngles::new(2, 30.0, 30.0),
            Err(ConfigError::InvalidBounds { .. })
        ));
        assert!(TiltAngles::new(0, 0.0, 30.0).is_err());
    }
}
