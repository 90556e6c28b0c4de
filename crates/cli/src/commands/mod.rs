//! CLI command implementations

pub mod inspect;
pub mod report;

use anyhow::{Context, Result};
use cpu_model_lib::{input, NodeRecord};
use std::path::Path;
use tracing::debug;

/// Read the node list from a file, or from stdin when no path is given
pub fn load_nodes(path: Option<&Path>) -> Result<Vec<NodeRecord>> {
    let nodes = match path {
        Some(path) => input::read_node_list_file(path)
            .with_context(|| format!("Failed to load node list from {}", path.display()))?,
        None => input::read_node_list(std::io::stdin().lock())
            .context("Failed to load node list from stdin")?,
    };
    debug!(nodes = nodes.len(), "Loaded node list");
    Ok(nodes)
}
