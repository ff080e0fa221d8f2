//! Map projections: forward/inverse mapping between geographic coordinates
//! and screen pixels, visibility tests, silhouettes and view bounding boxes.
//!
//! Every projection is a stateless value; all view state lives in
//! [`Viewport`], which callers own and pass by reference.

pub mod bounding_box;
pub mod cylindrical;
pub mod error;
pub mod kind;
pub mod silhouette;
pub mod spherical;
pub mod strategy;
pub mod viewport;

pub use bounding_box::*;
pub use cylindrical::*;
pub use error::*;
pub use kind::*;
pub use silhouette::*;
pub use spherical::*;
pub use strategy::*;
pub use viewport::*;
