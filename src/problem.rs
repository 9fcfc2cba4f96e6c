//! Problem encoding: the contract between the optimizer and a use case.
//!
//! The optimizer only ever sees normalized vectors. A [`ProblemEncoding`]
//! turns such a vector into whatever the caller applies to its model
//! (tilt angles, a row layout, ...) and encodes the caller's existing
//! design as the first agent.

use crate::error::ConfigError;
use crate::space::ParameterSpace;

/// Maps normalized agent vectors to domain parameters and back.
///
/// # Examples
///
/// ```
/// use u_stepopt::problem::{ProblemEncoding, VectorEncoding};
/// use u_stepopt::space::ParameterSpace;
///
/// let encoding = VectorEncoding::new(ParameterSpace::uniform("x", 2, 0.0, 10.0).unwrap());
/// assert_eq!(encoding.dimension_count(), 2);
/// assert_eq!(encoding.decode(&[0.5, 0.1]), vec![5.0, 1.0]);
/// ```
pub trait ProblemEncoding {
    /// Decoded parameters handed back to the caller.
    type Params: Clone;

    /// The caller's current design, used to seed the first agent.
    type Design: ?Sized;

    /// Bounds of every dimension.
    fn space(&self) -> &ParameterSpace;

    fn dimension_count(&self) -> usize {
        self.space().len()
    }

    /// Decodes a normalized vector.
    fn decode(&self, genes: &[f64]) -> Self::Params;

    /// Encodes the existing design as a normalized vector in `[0, 1)^d`.
    fn seed_first_agent(&self, existing: &Self::Design) -> Result<Vec<f64>, ConfigError>;
}

/// A predicate over decoded parameters. Returns `true` when satisfied.
pub type Constraint<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Identity encoding: parameters are the decoded values themselves.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VectorEncoding {
    space: ParameterSpace,
}

impl VectorEncoding {
    pub fn new(space: ParameterSpace) -> Self {
        Self { space }
    }
}

impl ProblemEncoding for VectorEncoding {
    type Params = Vec<f64>;
    type Design = [f64];

    fn space(&self) -> &ParameterSpace {
        &self.space
    }

    fn decode(&self, genes: &[f64]) -> Vec<f64> {
        self.space.decode_all(genes)
    }

    fn seed_first_agent(&self, existing: &[f64]) -> Result<Vec<f64>, ConfigError> {
        self.space.encode_all(existing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_encoding_seed() {
        let enc = VectorEncoding::new(ParameterSpace::uniform("x", 2, -1.0, 1.0).unwrap());
        let g = enc.seed_first_agent(&[0.0, 2.0]).unwrap();
        assert!((g[0] - 0.5).abs() < 1e-12);
        assert!(g[1] < 1.0);
        assert!(enc.seed_first_agent(&[0.0]).is_err());
    }
}
