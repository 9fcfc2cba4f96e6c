//! Parameter space: per-dimension bounds and normalization.
//!
//! Every agent in the optimizer lives in the normalized cube `[0, 1)^d`.
//! A [`ParameterSpace`] holds one [`Dimension`] per coordinate and converts
//! between normalized vectors and domain values.

mod dimension;

pub use dimension::Dimension;

use crate::error::ConfigError;

/// Ordered collection of [`Dimension`]s.
///
/// # Examples
///
/// ```
/// use u_stepopt::space::{Dimension, ParameterSpace};
///
/// let space = ParameterSpace::new(vec![
///     Dimension::new("tilt", 0.0, 90.0).unwrap(),
///     Dimension::integer("rows", 1, 4).unwrap(),
/// ]).unwrap();
///
/// assert_eq!(space.decode_all(&[0.5, 0.0]), vec![45.0, 1.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterSpace {
    dimensions: Vec<Dimension>,
}

impl ParameterSpace {
    /// Creates a space from already-validated dimensions.
    ///
    /// Fails with [`ConfigError::NoDimensions`] when `dimensions` is empty.
    pub fn new(dimensions: Vec<Dimension>) -> Result<Self, ConfigError> {
        if dimensions.is_empty() {
            return Err(ConfigError::NoDimensions);
        }
        Ok(Self { dimensions })
    }

    /// Builds a space of `count` identical real dimensions named `{prefix}{i}`.
    pub fn uniform(prefix: &str, count: usize, min: f64, max: f64) -> Result<Self, ConfigError> {
        let dims = (0..count)
            .map(|i| Dimension::new(format!("{prefix}{i}"), min, max))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(dims)
    }

    /// Number of dimensions.
    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    /// Always `false` for a constructed space.
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn dimension(&self, index: usize) -> Option<&Dimension> {
        self.dimensions.get(index)
    }

    /// Decodes coordinate `g` of dimension `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn decode(&self, index: usize, g: f64) -> f64 {
        self.dimensions[index].decode(g)
    }

    /// Encodes domain value `x` of dimension `index`, clamped to `[0, 1)`.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn encode(&self, index: usize, x: f64) -> f64 {
        self.dimensions[index].encode(x)
    }

    /// Decodes a full normalized vector. Extra coordinates are ignored.
    pub fn decode_all(&self, genes: &[f64]) -> Vec<f64> {
        self.dimensions
            .iter()
            .zip(genes)
            .map(|(d, &g)| d.decode(g))
            .collect()
    }

    /// Encodes a full domain vector.
    ///
    /// Fails with [`ConfigError::DimensionMismatch`] if `values` does not
    /// have one entry per dimension.
    pub fn encode_all(&self, values: &[f64]) -> Result<Vec<f64>, ConfigError> {
        self.check_len(values.len())?;
        Ok(self
            .dimensions
            .iter()
            .zip(values)
            .map(|(d, &x)| d.encode(x))
            .collect())
    }

    /// Re-checks every dimension's bounds.
    ///
    /// Spaces built through [`Dimension::new`] are always valid; this
    /// catches spaces that were deserialized.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dimensions.is_empty() {
            return Err(ConfigError::NoDimensions);
        }
        for d in &self.dimensions {
            if !(d.min.is_finite() && d.max.is_finite()) || d.min >= d.max {
                return Err(ConfigError::InvalidBounds {
                    name: d.name.clone(),
                    min: d.min,
                    max: d.max,
                });
            }
        }
        Ok(())
    }

    pub(crate) fn check_len(&self, actual: usize) -> Result<(), ConfigError> {
        if actual != self.len() {
            return Err(ConfigError::DimensionMismatch {
                expected: self.len(),
                actual,
            });
        }
        Ok(())
    }
}
