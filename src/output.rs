//! CSV file output (RFC 4180 compliant).
//!
//! A small delimited-file writer: one header row, one line per record,
//! `\n`-terminated, overwriting any existing file at the destination.

use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::error::Result;

/// Escapes a field for CSV according to RFC 4180.
pub fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Write a header row plus data rows to `output_path`.
///
/// Every row must already be padded to the header's width; parent
/// directories are created as needed.
pub fn write_csv(output_path: &Path, header: &[String], rows: &[Vec<String>]) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = std::fs::File::create(output_path)?;
    let mut writer = std::io::BufWriter::new(file);

    writeln!(writer, "{}", render_line(header))?;
    for row in rows {
        writeln!(writer, "{}", render_line(row))?;
    }

    writer.flush()?;
    info!("CSV saved to {}", output_path.display());
    Ok(())
}

fn render_line(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| escape_csv(f))
        .collect::<Vec<_>>()
        .join(",")
}
