//! Turns geographic line strings into screen polygons for a given viewport.
//!
//! Paths are densified where their projected image curves, split at the
//! globe horizon and at the date line, and copied across repeated map
//! images. Output is deterministic for identical inputs.

pub mod config;
pub mod date_line;
pub mod error;
pub mod horizon;
pub mod interpolate;
pub mod polygon;
pub mod repeat;
pub mod tessellator;

pub use config::*;
pub use error::*;
pub use horizon::{HorizonCrossing, MAX_HORIZON_ITERATIONS, find_horizon};
pub use polygon::*;
pub use tessellator::*;
