//! A single bounded decision variable.

use crate::error::ConfigError;
use crate::random::clamp_unit;

/// One decision variable with real bounds `[min, max]`.
///
/// Agents carry a normalized coordinate `g` per dimension; [`decode`]
/// maps it onto the real domain as `min + g * (max - min)`, rounded to the
/// nearest integer when the dimension is integer-valued.
///
/// [`decode`]: Dimension::decode
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimension {
    pub(crate) name: String,
    pub(crate) min: f64,
    pub(crate) max: f64,
    pub(crate) integer: bool,
}

impl Dimension {
    /// Creates a real-valued dimension.
    ///
    /// Fails with [`ConfigError::InvalidBounds`] unless `min < max`
    /// and both bounds are finite.
    pub fn new(name: impl Into<String>, min: f64, max: f64) -> Result<Self, ConfigError> {
        let name = name.into();
        if !(min.is_finite() && max.is_finite()) || min >= max {
            return Err(ConfigError::InvalidBounds { name, min, max });
        }
        Ok(Self {
            name,
            min,
            max,
            integer: false,
        })
    }

    /// Creates an integer-valued dimension. Decoded values are rounded.
    pub fn integer(name: impl Into<String>, min: i64, max: i64) -> Result<Self, ConfigError> {
        let mut dim = Self::new(name, min as f64, max as f64)?;
        dim.integer = true;
        Ok(dim)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn is_integer(&self) -> bool {
        self.integer
    }

    /// Width of the domain interval.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Maps a normalized coordinate to a domain value.
    ///
    /// Coordinates outside `[0, 1)` extrapolate linearly; swarm positions
    /// are allowed to leave the unit interval after a velocity update.
    pub fn decode(&self, g: f64) -> f64 {
        let x = self.min + g * self.span();
        if self.integer {
            x.round()
        } else {
            x
        }
    }

    /// Maps a domain value back to a normalized coordinate in `[0, 1)`.
    ///
    /// Out-of-range values are clamped.
    pub fn encode(&self, x: f64) -> f64 {
        clamp_unit((x - self.min) / self.span())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_endpoints() {
        let d = Dimension::new("tilt", -30.0, 60.0).unwrap();
        assert!((d.decode(0.0) - -30.0).abs() < 1e-12);
        assert!((d.decode(1.0) - 60.0).abs() < 1e-12);
        assert!((d.decode(0.5) - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_decode_extrapolates() {
        let d = Dimension::new("x", 0.0, 10.0).unwrap();
        assert!((d.decode(1.2) - 12.0).abs() < 1e-12);
        assert!((d.decode(-0.1) - -1.0).abs() < 1e-12);
    }

    #[test]
    fn test_integer_rounds() {
        let d = Dimension::integer("rows", 1, 5).unwrap();
        assert!(d.is_integer());
        assert_eq!(d.decode(0.0), 1.0);
        assert_eq!(d.decode(0.2), 2.0);
        assert_eq!(d.decode(0.49), 3.0);
        assert_eq!(d.decode(0.99), 5.0);
        assert_eq!(d.decode(1.0), 5.0);
    }

    #[test]
    fn test_integer_max_reachable_from_encode() {
        let d = Dimension::integer("rows", 1, 5).unwrap();
        assert_eq!(d.decode(d.encode(5.0)), 5.0);
        assert_eq!(d.decode(d.encode(3.0)), 3.0);
    }

    #[test]
    fn test_encode_inverse() {
        let d = Dimension::new("spacing", 2.0, 12.0).unwrap();
        let g = d.encode(7.0);
        assert!((g - 0.5).abs() < 1e-12);
        assert!((d.decode(g) - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_encode_clamps() {
        let d = Dimension::new("x", 0.0, 1.0).unwrap();
        assert_eq!(d.encode(-5.0), 0.0);
        let g = d.encode(5.0);
        assert!(g < 1.0 && g > 0.999);
    }

    #[test]
    fn test_equal_bounds_rejected() {
        let err = Dimension::new("tilt", 10.0, 10.0).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBounds { .. }));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        assert!(Dimension::new("tilt", 10.0, -10.0).is_err());
        assert!(Dimension::integer("rows", 3, 1).is_err());
    }

    #[test]
    fn test_non_finite_bounds_rejected() {
        assert!(Dimension::new("x", f64::NEG_INFINITY, 0.0).is_err());
        assert!(Dimension::new("x", 0.0, f64::NAN).is_err());
    }
}
