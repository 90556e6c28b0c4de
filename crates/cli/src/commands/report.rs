//! Compatibility report command

use anyhow::Result;
use cpu_model_lib::{Aggregator, NodeRecord, Report};
use tabled::Tabled;

use crate::output::{color_coverage, encode, print_warning, render_table, OutputFormat};

/// Row for the models table
#[derive(Tabled)]
struct ModelRow {
    #[tabled(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "CPU Model")]
    model: String,
    #[tabled(rename = "Compatible Nodes")]
    compatible: usize,
    #[tabled(rename = "Host Model Nodes")]
    host_model: usize,
    #[tabled(rename = "Coverage")]
    coverage: String,
}

/// Aggregate the node list and render the ranked report
pub fn run(aggregator: &Aggregator, nodes: &[NodeRecord], format: OutputFormat) -> Result<String> {
    let report = aggregator.aggregate(nodes)?;
    render(&report, format)
}

fn render(report: &Report, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml | OutputFormat::Json => encode(report, format),
        OutputFormat::Table => {
            let mut out = String::new();
            if report.models.is_empty() {
                print_warning("No CPU model labels found on eligible nodes");
            } else {
                let rows: Vec<ModelRow> = report
                    .models
                    .iter()
                    .enumerate()
                    .map(|(i, s)| ModelRow {
                        rank: i + 1,
                        model: s.model.clone(),
                        compatible: s.compatible_node_count,
                        host_model: s.host_model_node_count,
                        coverage: color_coverage(s.compatible_node_count, report.total_node_count),
                    })
                    .collect();
                out.push_str(&render_table(rows));
                out.push('\n');
            }
            out.push_str(&format!(
                "\nEligible nodes: {} of {}\n",
                report.total_node_count, report.fleet_node_count
            ));
            if let Some(best) = report.best_match() {
                out.push_str(&format!(
                    "Best match: {} ({} compatible, {} host model)\n",
                    best.model, best.compatible_node_count, best.host_model_node_count
                ));
            }
            Ok(out)
        }
    }
}
