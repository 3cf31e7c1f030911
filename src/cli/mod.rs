//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the
//! snyk-export binary. Scope conflicts (org vs. group, group vs. an
//! explicit output file) are rejected here, before any network call.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

/// Generate a CSV of projects in a Snyk organization (or a group's orgs).
#[derive(Parser, Debug)]
#[command(name = "snyk-export", about = "Export a Snyk project inventory to CSV", version)]
#[command(group(
    ArgGroup::new("scope")
        .required(true)
        .args(["org_id", "group_id"]),
))]
pub struct Cli {
    /// The organization ID from the org's settings panel.
    #[arg(long, value_name = "UUID")]
    pub org_id: Option<String>,

    /// Export every organization in this group, one file per org.
    #[arg(long, value_name = "UUID")]
    pub group_id: Option<String>,

    /// Integration name: bitbucket-cloud, github-enterprise, etc.
    #[arg(long, default_value = "all")]
    pub integration: String,

    /// Path of the CSV to write. Default: output/{integration}_state.csv.
    /// Group exports name their own files, so this conflicts with --group-id.
    #[arg(long, value_name = "PATH", conflicts_with = "group_id")]
    pub csv_file: Option<PathBuf>,

    /// Tag filters, each in key=value form.
    #[arg(long, value_name = "KEY=VALUE", num_args = 1.., value_parser = parse_tag)]
    pub tags: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn parse_tag(value: &str) -> Result<String, String> {
    match value.split_once('=') {
        Some((key, tag_value)) if !key.is_empty() && !tag_value.is_empty() => {
            Ok(value.to_string())
        }
        _ => Err(format!("tag '{value}' is not in key=value form")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_org_or_group_required() {
        assert!(Cli::try_parse_from(["snyk-export"]).is_err());
        assert!(Cli::try_parse_from(["snyk-export", "--org-id", "o-1"]).is_ok());
        assert!(Cli::try_parse_from(["snyk-export", "--group-id", "g-1"]).is_ok());
    }

    #[test]
    fn test_org_and_group_conflict() {
        let result =
            Cli::try_parse_from(["snyk-export", "--org-id", "o-1", "--group-id", "g-1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_group_conflicts_with_csv_file() {
        let result = Cli::try_parse_from([
            "snyk-export",
            "--group-id",
            "g-1",
            "--csv-file",
            "out.csv",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_integration_defaults_to_all() {
        let cli = Cli::try_parse_from(["snyk-export", "--org-id", "o-1"]).unwrap();
        assert_eq!(cli.integration, "all");
        assert!(cli.csv_file.is_none());
        assert!(cli.tags.is_empty());
    }

    #[test]
    fn test_tags_must_be_key_value() {
        let ok = Cli::try_parse_from([
            "snyk-export",
            "--org-id",
            "o-1",
            "--tags",
            "env=prod",
            "team=core",
        ])
        .unwrap();
        assert_eq!(ok.tags, vec!["env=prod", "team=core"]);

        let bad = Cli::try_parse_from(["snyk-export", "--org-id", "o-1", "--tags", "env"]);
        assert!(bad.is_err());
    }
}
