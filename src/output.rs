use crate::result::HashReport;
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn format_report(report: &HashReport, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => report.to_string(),
        OutputFormat::Json => serde_json::to_string(report).context("Failed to encode report")?,
    })
}

/// Print to stdout, or append to `output_file` when given.
pub fn save_report(report: &HashReport, format: OutputFormat, output_file: Option<&str>) -> Result<()> {
    let output = format!("{}\n", format_report(report, format)?);

    if let Some(path) = output_file {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open output file {}", path))?;
        file.write_all(output.as_bytes())
            .with_context(|| format!("Failed to write to {}", path))?;
    } else {
        print!("{}", output);
    }

    Ok(())
}
