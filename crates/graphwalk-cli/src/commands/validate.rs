//! Dataset validation command.

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Color};
use graphwalk_engine::{Config, DatasetIssue, ValidationReport};
use serde::Serialize;

use crate::OutputFormat;
use crate::output::{self, Format, console_format};

/// Validation result output.
#[derive(Serialize)]
struct ValidationOutput<'a> {
    valid: bool,
    error_count: usize,
    warning_count: usize,
    errors: &'a [DatasetIssue],
    warnings: &'a [DatasetIssue],
}

impl<'a> From<&'a ValidationReport> for ValidationOutput<'a> {
    fn from(report: &'a ValidationReport) -> Self {
        Self {
            valid: report.is_valid(),
            error_count: report.errors.len(),
            warning_count: report.warnings.len(),
            errors: &report.errors,
            warnings: &report.warnings,
        }
    }
}

/// Run the validate command.
pub fn run(path: &Path, config: &Config, format: OutputFormat, quiet: bool) -> Result<()> {
    let report = super::read_dataset(path)?.validate_with(config.clone());
    let output = ValidationOutput::from(&report);

    match Format::from(format) {
        Format::Json => output::print_json(&output, quiet)?,
        Format::Table => {
            if !quiet {
                if output.valid {
                    println!("{}", console_format("✓ Dataset is valid", Color::Green));
                } else {
                    println!("{}", console_format("✗ Dataset has errors", Color::Red));
                }

                println!(
                    "\nErrors: {}, Warnings: {}\n",
                    output.error_count, output.warning_count
                );

                if !output.errors.is_empty() {
                    println!("Errors:\n{}\n", issue_table(output.errors, Color::Red));
                }
                if !output.warnings.is_empty() {
                    println!("Warnings:\n{}", issue_table(output.warnings, Color::Yellow));
                }
            }
        }
    }

    // Return error exit code if validation failed
    if !output.valid {
        std::process::exit(1);
    }

    Ok(())
}

fn issue_table(issues: &[DatasetIssue], color: Color) -> comfy_table::Table {
    let mut table = output::create_table();
    output::add_header(&mut table, &["Code", "Message", "Context"]);
    for issue in issues {
        table.add_row(vec![
            Cell::new(&issue.code).fg(color),
            Cell::new(&issue.message),
            Cell::new(issue.context.as_deref().unwrap_or("-")),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{fixtures, read_dataset};

    #[test]
    fn test_output_counts() {
        let (_dir, path) = fixtures::dataset(fixtures::SOCIAL);
        let report = read_dataset(&path).unwrap().validate();
        let output = ValidationOutput::from(&report);

        assert!(output.valid);
        assert_eq!(output.error_count, 0);
        // City is in no graph
        assert_eq!(output.warning_count, 1);

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["warnings"][0]["code"], "COLLECTION_OUTSIDE_GRAPHS");
        assert_eq!(json["warnings"][0]["context"], "City");
    }

    #[test]
    fn test_issue_table() {
        let issues = [DatasetIssue {
            code: "VERTEX_NOT_FOUND".into(),
            message: "vertex not found".into(),
            context: None,
        }];
        let rendered = issue_table(&issues, Color::Red).to_string();
        assert!(rendered.contains("VERTEX_NOT_FOUND"));
        assert!(rendered.contains('-'));
    }
}
