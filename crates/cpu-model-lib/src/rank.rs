//! Best-match ordering of CPU models

use crate::models::ModelStats;
use std::cmp::Ordering;

/// Compare two models by how well they fit the fleet
///
/// Models supported by more nodes come first, then models that are the
/// host model on more nodes, then models in ascending name order.
pub fn best_match(a: &ModelStats, b: &ModelStats) -> Ordering {
    b.compatible_node_count
        .cmp(&a.compatible_node_count)
        .then_with(|| b.host_model_node_count.cmp(&a.host_model_node_count))
        .then_with(|| a.model.cmp(&b.model))
}

/// Order models best match first
pub fn rank(stats: impl IntoIterator<Item = ModelStats>) -> Vec<ModelStats> {
    let mut ranked: Vec<ModelStats> = stats.into_iter().collect();
    ranked.sort_by(best_match);
    ranked
}
