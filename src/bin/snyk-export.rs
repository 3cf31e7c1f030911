//! snyk-export CLI binary.
//!
//! Exports a Snyk organization's (or group's) project inventory to CSV.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use snyk_export::cli::Cli;
use snyk_export::{export_group, export_org, ExportOptions, SnykClient};
use tracing_subscriber::EnvFilter;

/// Directory group exports write their per-org files into.
const OUT_DIR: &str = "output";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let client = match SnykClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set SNYK_TOKEN environment variable");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(client: &SnykClient, cli: Cli) -> snyk_export::Result<()> {
    // clap enforces exactly one of org_id/group_id via the scope group.
    if let Some(group_id) = cli.group_id {
        let summary = export_group(
            client,
            &group_id,
            &cli.integration,
            Path::new(OUT_DIR),
            &cli.tags,
        )
        .await?;

        for outcome in &summary.outcomes {
            if let Ok(s) = &outcome.result {
                match &s.path {
                    Some(path) => {
                        println!("{}: {} project(s) -> {}", s.org_name, s.rows_written, path.display())
                    }
                    None => println!("{}: no projects, no file written", s.org_name),
                }
            }
        }

        if !summary.all_succeeded() {
            return Err(snyk_export::SnykError::ExportFailed(
                summary.failed_orgs().join(", "),
            ));
        }
        return Ok(());
    }

    let Some(org_id) = cli.org_id else {
        // clap's scope group makes this unreachable in practice.
        return Err(snyk_export::SnykError::InvalidArguments(
            "either --org-id or --group-id is required".to_string(),
        ));
    };

    let options = ExportOptions {
        org_id,
        integration: cli.integration,
        csv_file: cli.csv_file,
        tags: cli.tags,
    };

    let summary = export_org(client, &options).await?;
    match &summary.path {
        Some(path) => println!(
            "{}: {} project(s) -> {}",
            summary.org_name,
            summary.rows_written,
            path.display()
        ),
        None => println!("{}: no projects, no file written", summary.org_name),
    }

    Ok(())
}
