//! Per-node inspection of CPU model labels

use anyhow::{Context, Result};
use cpu_model_lib::{Aggregator, LabelKind, NodeRecord};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{color_flag, encode, print_warning, render_table, OutputFormat};

/// CPU model labels found on one node
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSummary {
    pub name: String,
    pub eligible: bool,
    pub host_models: Vec<String>,
    pub compatible_models: Vec<String>,
}

/// Row for the nodes table
#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "Node")]
    name: String,
    #[tabled(rename = "Eligible")]
    eligible: String,
    #[tabled(rename = "Host Model")]
    host_model: String,
    #[tabled(rename = "Compatible Models")]
    compatible: usize,
}

/// Summarize each node's eligibility and CPU model labels
///
/// Labels are classified on every node, eligible or not, so malformed
/// labels surface here even when the report would skip the node.
pub fn summarize(aggregator: &Aggregator, nodes: &[NodeRecord]) -> Result<Vec<NodeSummary>> {
    nodes
        .iter()
        .map(|node| -> Result<NodeSummary> {
            let facts = aggregator
                .classifier()
                .facts(node.labels())
                .with_context(|| format!("Node {} has invalid labels", node.name()))?;

            let (host, compatible): (Vec<_>, Vec<_>) = facts
                .into_iter()
                .partition(|fact| fact.kind == LabelKind::HostModel);

            Ok(NodeSummary {
                name: node.name().to_string(),
                eligible: aggregator.is_eligible(node),
                host_models: host.into_iter().map(|f| f.model).collect(),
                compatible_models: compatible.into_iter().map(|f| f.model).collect(),
            })
        })
        .collect()
}

/// Render the per-node summary
pub fn run(aggregator: &Aggregator, nodes: &[NodeRecord], format: OutputFormat) -> Result<String> {
    let summaries = summarize(aggregator, nodes)?;

    match format {
        OutputFormat::Yaml | OutputFormat::Json => encode(&summaries, format),
        OutputFormat::Table => {
            if summaries.is_empty() {
                print_warning("No nodes found");
                return Ok(String::new());
            }

            let rows: Vec<NodeRow> = summaries
                .iter()
                .map(|s| NodeRow {
                    name: s.name.clone(),
                    eligible: color_flag(s.eligible),
                    host_model: if s.host_models.is_empty() {
                        "-".to_string()
                    } else {
                        s.host_models.join(", ")
                    },
                    compatible: s.compatible_models.len(),
                })
                .collect();

            let eligible = summaries.iter().filter(|s| s.eligible).count();
            Ok(format!(
                "{}\n\nTotal: {} nodes, {} eligible\n",
                render_table(rows),
                summaries.len(),
                eligible
            ))
        }
    }
}
