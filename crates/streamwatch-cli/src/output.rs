//! Output formatting utilities

use colored::*;
use serde::Serialize;
use streamwatch_detector::{AnomalyRecord, DetectorSnapshot};
use tabled::{Table, Tabled};

use crate::error::CliResult;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table format
    #[default]
    Table,
    /// JSON format
    Json,
}

/// One row of the anomaly table
#[derive(Debug, Tabled)]
pub struct AnomalyRow {
    #[tabled(rename = "Index")]
    pub index: u64,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl From<&AnomalyRecord> for AnomalyRow {
    fn from(record: &AnomalyRecord) -> Self {
        Self {
            index: record.index,
            value: format!("{:.4}", record.value),
        }
    }
}

/// Render the anomaly list as a table, or a dimmed placeholder when empty
pub fn render_anomaly_table(anomalies: &[AnomalyRecord]) -> String {
    if anomalies.is_empty() {
        return "No anomalies".dimmed().to_string();
    }
    let rows: Vec<AnomalyRow> = anomalies.iter().map(AnomalyRow::from).collect();
    Table::new(rows).to_string()
}

/// Run summary printed at the end of `simulate` and `replay`
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub samples: u64,
    pub output_dir: String,
    pub snapshot: DetectorSnapshot,
}

/// Print a run report in the specified format
pub fn print_report(report: &RunReport, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", render_anomaly_table(&report.snapshot.anomalies));
            print_success(&format!(
                "{} samples processed, {} anomalies, files in {}",
                report.samples,
                report.snapshot.anomaly_count(),
                report.output_dir
            ));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
    }
    Ok(())
}

/// Print a single serializable item as JSON
pub fn print_json<T: Serialize>(data: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_anomaly_row_formatting() {
        let row = AnomalyRow::from(&AnomalyRecord {
            index: 600,
            value: -20.0,
        });
        assert_eq!(row.index, 600);
        assert_eq!(row.value, "-20.0000");
    }

    #[test]
    fn test_table_lists_every_anomaly() {
        let table = render_anomaly_table(&[
            AnomalyRecord {
                index: 200,
                value: 20.0,
            },
            AnomalyRecord {
                index: 600,
                value: -20.0,
            },
        ]);
        assert!(table.contains("Index"));
        assert!(table.contains("200"));
        assert!(table.contains("-20.0000"));
    }

    #[test]
    fn test_empty_table_placeholder() {
        assert!(render_anomaly_table(&[]).contains("No anomalies"));
    }
}
