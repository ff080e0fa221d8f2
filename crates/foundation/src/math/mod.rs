pub mod coordinate;
pub mod quaternion;
pub mod vec;

pub use coordinate::*;
pub use quaternion::*;
pub use vec::*;
