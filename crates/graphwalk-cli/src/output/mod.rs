//! Output formatting for CLI commands.

use comfy_table::{Cell, Color, ContentArrangement, Table};
use serde::Serialize;

/// Output format selection.
#[derive(Clone, Copy)]
pub enum Format {
    Table,
    Json,
}

impl From<crate::OutputFormat> for Format {
    fn from(f: crate::OutputFormat) -> Self {
        match f {
            crate::OutputFormat::Table => Format::Table,
            crate::OutputFormat::Json => Format::Json,
        }
    }
}

/// Print data as pretty JSON (respects quiet mode).
pub fn print_json<T: Serialize>(data: &T, quiet: bool) -> anyhow::Result<()> {
    if !quiet {
        println!("{}", serde_json::to_string_pretty(data)?);
    }
    Ok(())
}

/// Create a styled table with consistent formatting.
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
    table
}

/// Add a header row to a table.
pub fn add_header(table: &mut Table, headers: &[&str]) {
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
}

/// Build a key-value table (for info displays).
pub fn key_value_table(items: &[(&str, String)]) -> Table {
    let mut table = create_table();
    add_header(&mut table, &["Property", "Value"]);
    for (key, value) in items {
        table.add_row(vec![Cell::new(key).fg(Color::Green), Cell::new(value)]);
    }
    table
}

/// Format a string with ANSI color for console output.
pub fn console_format(text: &str, color: Color) -> String {
    match color {
        Color::Green => format!("\x1b[32m{}\x1b[0m", text),
        Color::Red => format!("\x1b[31m{}\x1b[0m", text),
        Color::Yellow => format!("\x1b[33m{}\x1b[0m", text),
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_value_table() {
        let table = key_value_table(&[("Graphs", "2".to_string()), ("Edges", "7".to_string())]);
        let rendered = table.to_string();
        assert!(rendered.contains("Property"));
        assert!(rendered.contains("Graphs"));
        assert!(rendered.contains('7'));
    }

    #[test]
    fn test_console_format() {
        assert_eq!(console_format("ok", Color::Green), "\x1b[32mok\x1b[0m");
        assert_eq!(console_format("plain", Color::Blue), "plain");
    }
}
