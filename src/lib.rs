//! Snyk project inventory export library.
//!
//! Queries a Snyk organization's monitored repositories ("targets"),
//! enumerates the scanned projects under each, enriches every project
//! with issue counts and (for source-control-backed origins) repository
//! settings, and writes one CSV row per project.
//!
//! # Quick Start
//!
//! ```no_run
//! use snyk_export::{export_org, ExportOptions, SnykClient};
//!
//! #[tokio::main]
//! async fn main() -> snyk_export::Result<()> {
//!     // Create client from environment variables
//!     let client = SnykClient::from_env()?;
//!
//!     let summary = export_org(
//!         &client,
//!         &ExportOptions {
//!             org_id: "1b48e2c4-6ca8-455f-a73f-d2f6f2a6b225".to_string(),
//!             integration: "github".to_string(),
//!             csv_file: None,
//!             tags: vec![],
//!         },
//!     )
//!     .await?;
//!
//!     println!("wrote {} rows", summary.rows_written);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Entity access is organized around two traits:
//!
//! - [`Get`] - fetch a single entity from the v1 API
//! - [`List`] - enumerate a cursor-paginated REST collection exhaustively
//!
//! Each entity type (like [`Target`] or [`ProjectDetail`]) implements the
//! traits supported by its endpoints. [`export_org`] and [`export_group`]
//! drive them: targets, then projects per target, then per-project
//! enrichment, with per-project failures logged and skipped rather than
//! aborting the run.
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `SNYK_TOKEN` (required) - Your Snyk API token
//! - `SNYK_API_V1_URL` (optional) - v1 base URL (defaults to `https://api.snyk.io/v1/`)
//! - `SNYK_API_REST_URL` (optional) - REST base URL (defaults to `https://api.snyk.io/rest/`)

pub mod cli;
mod client;
mod error;
mod export;
mod models;
mod output;
mod pagination;
mod traits;

// Re-export core types
pub use client::{SnykClient, REST_VERSION};
pub use error::{Result, SnykError};
pub use pagination::{fetch_all, CollectionDocument, Links, DEFAULT_LIMIT};

// Re-export traits
pub use traits::{Get, List};

// Re-export models
pub use models::{
    is_scm_origin,
    GroupRef,
    IssueCounts,
    Org,
    ProjectDetail,
    ProjectQuery,
    ProjectRef,
    ProjectSettings,
    ProjectSummary,
    ProjectSummaryAttributes,
    Target,
    TargetAttributes,
    TargetQuery,
    SCM_ORIGINS,
    TAG_SEPARATOR,
};

// Re-export export orchestration
pub use export::{
    enrich_project, export_group, export_org, schema, ExportOptions, ExportSummary, GroupSummary,
    OrgExportOutcome, ProjectRecord,
};

// Re-export the CSV writer for callers composing their own exports
pub use output::{escape_csv, write_csv};
