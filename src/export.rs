//! Export orchestration.
//!
//! Assembles one row per project from three API calls (REST listing, v1
//! detail, v1 settings) and writes one CSV file per organization. The
//! per-project enrichment step is the only place failures are caught and
//! skipped; pagination and org/target lookup failures propagate to the
//! caller, and in group mode each org runs inside its own failure
//! boundary so siblings still export.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::client::SnykClient;
use crate::error::Result;
use crate::models::{
    Org, ProjectDetail, ProjectQuery, ProjectRef, ProjectSettings, ProjectSummary, Target,
    TargetQuery,
};
use crate::output;
use crate::traits::{Get, List};

/// Fixed columns every export carries, in output order. Settings columns
/// follow these, alphabetically.
const BASE_COLUMNS: [&str; 11] = [
    "name",
    "browseUrl",
    "type",
    "testFrequency",
    "lastTestedDate",
    "origin",
    "issues_low",
    "issues_medium",
    "issues_high",
    "issues_critical",
    "repoName",
];

/// One fully enriched export row.
///
/// Settings are present if and only if the project's origin is a
/// recognized source-control platform; on key collision with a detail
/// field, the settings value wins.
#[derive(Debug, Clone)]
pub struct ProjectRecord {
    /// Allow-listed v1 detail fields plus issue counts.
    pub detail: ProjectDetail,
    /// Repository settings, for source-control-backed origins only.
    pub settings: Option<ProjectSettings>,
    /// Display name of the owning target.
    pub repo_name: String,
}

impl ProjectRecord {
    /// Render the cell for `column`, or `None` if this row has no value
    /// for it (the cell renders empty).
    #[must_use]
    pub fn value_for(&self, column: &str) -> Option<String> {
        if let Some(settings) = &self.settings {
            if let Some(value) = settings.get(column) {
                return Some(value_to_cell(value));
            }
        }
        self.base_value(column)
    }

    fn base_value(&self, column: &str) -> Option<String> {
        let detail = &self.detail;
        match column {
            "name" => Some(detail.name.clone()),
            "browseUrl" => detail.browse_url.clone(),
            "type" => detail.project_type.clone(),
            "testFrequency" => detail.test_frequency.clone(),
            "lastTestedDate" => detail
                .last_tested_date
                .map(|d| d.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
            "origin" => Some(detail.origin.clone()),
            "issues_low" => Some(detail.issue_counts.low.to_string()),
            "issues_medium" => Some(detail.issue_counts.medium.to_string()),
            "issues_high" => Some(detail.issue_counts.high.to_string()),
            "issues_critical" => Some(detail.issue_counts.critical.to_string()),
            "repoName" => Some(self.repo_name.clone()),
            _ => None,
        }
    }
}

fn value_to_cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Compute the export schema as the union of all rows' keys.
///
/// Base columns come first in a fixed order; settings columns follow,
/// alphabetically, regardless of which rows carry them. Rows missing a
/// column render an empty cell, so heterogeneous rows never produce a
/// column-count mismatch.
#[must_use]
pub fn schema(records: &[ProjectRecord]) -> Vec<String> {
    let mut extra: BTreeSet<&str> = BTreeSet::new();
    for record in records {
        if let Some(settings) = &record.settings {
            for (key, _) in settings.iter() {
                if !BASE_COLUMNS.contains(&key.as_str()) {
                    extra.insert(key.as_str());
                }
            }
        }
    }

    BASE_COLUMNS
        .iter()
        .copied()
        .chain(extra)
        .map(str::to_string)
        .collect()
}

/// Render records against a schema, padding missing cells with empties.
fn render_rows(records: &[ProjectRecord], schema: &[String]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|record| {
            schema
                .iter()
                .map(|column| record.value_for(column).unwrap_or_default())
                .collect()
        })
        .collect()
}

/// Fetch and merge everything the export needs for one project.
///
/// Issue counts ride along on the detail document; settings are fetched
/// only for source-control-backed origins. Any failure abandons the
/// whole record — the caller logs and moves on to the next project.
#[tracing::instrument(skip(client))]
pub async fn enrich_project(
    client: &SnykClient,
    project: ProjectRef,
    repo_name: &str,
) -> Result<ProjectRecord> {
    let detail = ProjectDetail::get(client, project.clone()).await?;

    let settings = if detail.has_scm_settings() {
        Some(<ProjectSettings as Get>::get(client, project).await?)
    } else {
        None
    };

    Ok(ProjectRecord {
        detail,
        settings,
        repo_name: repo_name.to_string(),
    })
}

/// What to export for one organization.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// The organization ID.
    pub org_id: String,
    /// Integration-name filter; "all" means unfiltered.
    pub integration: String,
    /// Destination file. Defaults to `output/{integration}_state.csv`.
    pub csv_file: Option<PathBuf>,
    /// Tag filters in `key=value` form.
    pub tags: Vec<String>,
}

/// Outcome of one organization's export.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Display name of the exported organization.
    pub org_name: String,
    /// Rows written to the file.
    pub rows_written: usize,
    /// Destination path, `None` when no rows were produced and no file
    /// was written.
    pub path: Option<PathBuf>,
}

/// Export one organization's project inventory to a CSV file.
///
/// Enumerates targets, then per target enumerates active projects and
/// enriches each one. A project whose enrichment fails is logged and
/// skipped; it contributes no row. If no rows at all were produced the
/// file is not written and the export still succeeds.
#[tracing::instrument(skip(client, options), fields(org_id = %options.org_id))]
pub async fn export_org(client: &SnykClient, options: &ExportOptions) -> Result<ExportSummary> {
    let org = Org::get(client, options.org_id.clone()).await?;

    info!("Getting all repos for {}", org.name);
    let query = TargetQuery::for_integration(&options.integration);
    let targets = Target::list_all(client, &options.org_id, &query).await?;

    info!(
        "Searching for projects from {} repo(s) in {}",
        targets.len(),
        org.name
    );

    let mut records = Vec::new();
    for target in &targets {
        let query = ProjectQuery {
            target_id: Some(target.id.clone()),
            tags: options.tags.clone(),
        };
        let projects = ProjectSummary::list_all(client, &options.org_id, &query).await?;

        for project in projects {
            let reference = ProjectRef::new(&options.org_id, &project.id);
            match enrich_project(client, reference, target.display_name()).await {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(
                        project_id = %project.id,
                        repo = target.display_name(),
                        error = %e,
                        "skipping project: enrichment failed"
                    );
                }
            }
        }
    }

    if records.is_empty() {
        info!("No projects found in {}, nothing to write", org.name);
        return Ok(ExportSummary {
            org_name: org.name,
            rows_written: 0,
            path: None,
        });
    }

    let path = options
        .csv_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("output/{}_state.csv", options.integration)));

    let header = schema(&records);
    let rows = render_rows(&records, &header);

    info!(
        "Saving {} projects data to {}",
        records.len(),
        path.display()
    );
    output::write_csv(&path, &header, &rows)?;

    Ok(ExportSummary {
        org_name: org.name,
        rows_written: records.len(),
        path: Some(path),
    })
}

/// Outcome of one organization within a group export.
#[derive(Debug)]
pub struct OrgExportOutcome {
    /// The member organization.
    pub org: Org,
    /// That org's export result; a failure here never blocked siblings.
    pub result: Result<ExportSummary>,
}

/// Results of a whole-group export.
#[derive(Debug)]
pub struct GroupSummary {
    /// Per-organization outcomes, in membership order.
    pub outcomes: Vec<OrgExportOutcome>,
}

impl GroupSummary {
    /// Names of organizations whose export failed.
    pub fn failed_orgs(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_err())
            .map(|o| o.org.name.as_str())
            .collect()
    }

    /// Whether every member org exported (or was an empty no-op).
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

/// Export every organization in a group, one CSV file per org.
///
/// Files are named `{out_dir}/{slug}_state.csv`. Each org runs inside
/// its own failure boundary: an org whose export fails is recorded in
/// the summary and the remaining orgs are still attempted.
#[tracing::instrument(skip(client, tags))]
pub async fn export_group(
    client: &SnykClient,
    group_id: &str,
    integration: &str,
    out_dir: &Path,
    tags: &[String],
) -> Result<GroupSummary> {
    let orgs = Org::in_group(client, group_id).await?;

    if orgs.is_empty() {
        warn!("No organizations found in group {group_id}");
        return Ok(GroupSummary {
            outcomes: Vec::new(),
        });
    }

    info!("Exporting {} organization(s) in group {group_id}", orgs.len());

    let mut outcomes = Vec::with_capacity(orgs.len());
    for org in orgs {
        let options = ExportOptions {
            org_id: org.id.clone(),
            integration: integration.to_string(),
            csv_file: Some(out_dir.join(format!("{}_state.csv", org.slug))),
            tags: tags.to_vec(),
        };

        let result = export_org(client, &options).await;
        if let Err(e) = &result {
            error!(org = %org.name, error = %e, "organization export failed");
        }
        outcomes.push(OrgExportOutcome { org, result });
    }

    Ok(GroupSummary { outcomes })
}
