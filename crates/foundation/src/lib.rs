pub mod bounds;
pub mod line_string;
pub mod math;

// Foundation crate: small, well-tested geographic primitives only.
pub use bounds::*;
pub use line_string::*;
pub use math::*;
