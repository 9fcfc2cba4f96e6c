//! Array layout encoding: shared tilt, row spacing and rack width.
//!
//! Rows overlap when a rack's horizontal depth reaches the next row;
//! [`ArrayLayout::no_overlap`] turns that into a constraint for the GA.

use crate::error::ConfigError;
use crate::problem::{Constraint, ProblemEncoding};
use crate::space::{Dimension, ParameterSpace};

/// Decoded parameters of a rack array layout.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutParams {
    /// Tilt angle of every rack, in degrees.
    pub tilt_deg: f64,
    /// Distance between the leading edges of adjacent rows, in meters.
    pub row_spacing: f64,
    /// Number of panel rows stacked on each rack.
    pub panel_rows: u32,
}

impl LayoutParams {
    /// Horizontal depth of a rack given the height of one panel row.
    pub fn rack_depth(&self, panel_height: f64) -> f64 {
        self.panel_rows as f64 * panel_height * self.tilt_deg.to_radians().cos().abs()
    }
}

/// Tilt, row spacing and rack width (in panel rows) of a solar array.
///
/// Dimension 0 is the tilt angle, 1 the row spacing, 2 the integer
/// number of panel rows per rack.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLayout {
    space: ParameterSpace,
}

impl ArrayLayout {
    pub fn new(
        tilt_deg: (f64, f64),
        row_spacing: (f64, f64),
        panel_rows: (u32, u32),
    ) -> Result<Self, ConfigError> {
        let space = ParameterSpace::new(vec![
            Dimension::new("tilt", tilt_deg.0, tilt_deg.1)?,
            Dimension::new("row_spacing", row_spacing.0, row_spacing.1)?,
            Dimension::integer("panel_rows", panel_rows.0.into(), panel_rows.1.into())?,
        ])?;
        Ok(Self { space })
    }

    /// Rejects layouts whose racks overlap the next row.
    pub fn no_overlap(panel_height: f64) -> Constraint<LayoutParams> {
        Box::new(move |p: &LayoutParams| p.rack_depth(panel_height) < p.row_spacing)
    }
}

impl ProblemEncoding for ArrayLayout {
    type Params = LayoutParams;
    type Design = LayoutParams;

    fn space(&self) -> &ParameterSpace {
        &self.space
    }

    fn decode(&self, genes: &[f64]) -> LayoutParams {
        let values = self.space.decode_all(genes);
        LayoutParams {
            tilt_deg: values[0],
            row_spacing: values[1],
            panel_rows: values[2].max(0.0) as u32,
        }
    }

    fn seed_first_agent(&self, current: &LayoutParams) -> Result<Vec<f64>, ConfigError> {
        Ok(vec![
            self.space.encode(0, current.tilt_deg),
            self.space.encode(1, current.row_spacing),
            self.space.encode(2, current.panel_rows as f64),
        ])
    }
}
