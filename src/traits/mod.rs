//! Trait definitions for Snyk operations.
//!
//! Each entity type implements the traits it supports, encapsulating the
//! differences between the v1 API and the cursor-paginated REST API in
//! the implementations.

mod get;
mod list;

pub use get::Get;
pub use list::List;
