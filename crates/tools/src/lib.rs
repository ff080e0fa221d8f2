//! Scene files and JSON reports for the `atlas-project` command line tool.

pub mod report;
pub mod scene;

pub use report::*;
pub use scene::*;
