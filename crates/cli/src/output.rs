//! Output formatting utilities

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// YAML format (default)
    #[default]
    Yaml,
    /// JSON format
    Json,
    /// Table format
    Table,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Yaml => "yaml",
            OutputFormat::Json => "json",
            OutputFormat::Table => "table",
        }
    }
}

/// Encode a value as YAML or JSON
///
/// Table rendering is specific to each command.
pub fn encode<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    let encoded = match format {
        OutputFormat::Json => {
            let mut json = cpu_model_lib::input::to_json(value)?;
            json.push('\n');
            json
        }
        OutputFormat::Yaml | OutputFormat::Table => cpu_model_lib::input::to_yaml(value)?,
    };
    Ok(encoded)
}

/// Render rows as a rounded table
pub fn render_table<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Share of the eligible fleet as a whole percentage
fn coverage_percent(count: usize, total: usize) -> Option<u64> {
    if total == 0 {
        return None;
    }
    Some((count as f64 * 100.0 / total as f64).round() as u64)
}

/// Format a share of the eligible fleet as a percentage
pub fn format_coverage(count: usize, total: usize) -> String {
    match coverage_percent(count, total) {
        Some(percent) => format!("{}%", percent),
        None => "-".to_string(),
    }
}

/// Color coverage by the percentage as displayed
pub fn color_coverage(count: usize, total: usize) -> String {
    let formatted = format_coverage(count, total);
    match coverage_percent(count, total) {
        Some(percent) if percent >= 100 => formatted.green().to_string(),
        Some(percent) if percent >= 50 => formatted.yellow().to_string(),
        Some(_) => formatted.red().to_string(),
        None => formatted,
    }
}

/// Color a yes/no flag
pub fn color_flag(flag: bool) -> String {
    if flag {
        "yes".green().to_string()
    } else {
        "no".red().to_string()
    }
}
