//! Ready-made encodings for solar installation layout.
//!
//! - [`TiltAngles`]: one tilt angle per rack.
//! - [`ArrayLayout`]: shared tilt, row spacing and rack width for an array.
//!
//! Both work with either search strategy.

mod layout;
mod tilt;

pub use layout::{ArrayLayout, LayoutParams};
pub use tilt::TiltAngles;
