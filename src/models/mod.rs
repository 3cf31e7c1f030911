//! Snyk API model types.

mod org;
mod project;
mod target;

pub use org::*;
pub use project::*;
pub use target::*;
