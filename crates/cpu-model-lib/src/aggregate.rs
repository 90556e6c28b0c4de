//! Aggregation of CPU model labels into per-model node counts
//!
//! Aggregation is a fold over the node list into a [`ModelTally`]. Tallies
//! of disjoint node partitions can be combined with [`ModelTally::merge`],
//! which yields the same counts as folding the whole list at once.

use crate::eligibility::Eligibility;
use crate::error::Result;
use crate::labels::{LabelClassifier, LabelFact, LabelKind};
use crate::models::{ModelStats, NodeRecord, Report};
use crate::rank::rank;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Unranked per-model counts accumulated over a set of nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelTally {
    models: BTreeMap<String, ModelStats>,
    eligible_nodes: usize,
    fleet_nodes: usize,
}

impl ModelTally {
    /// Count one label fact
    pub fn record(mut self, fact: LabelFact) -> Self {
        let stats = self
            .models
            .entry(fact.model)
            .or_insert_with_key(|model| ModelStats::new(model.clone()));
        match fact.kind {
            LabelKind::Compatible => stats.compatible_node_count += 1,
            LabelKind::HostModel => stats.host_model_node_count += 1,
        }
        self
    }

    /// Combine two tallies by adding their counts
    pub fn merge(mut self, other: ModelTally) -> Self {
        for (model, theirs) in other.models {
            let ours = self
                .models
                .entry(model)
                .or_insert_with_key(|model| ModelStats::new(model.clone()));
            ours.compatible_node_count += theirs.compatible_node_count;
            ours.host_model_node_count += theirs.host_model_node_count;
        }
        self.eligible_nodes += other.eligible_nodes;
        self.fleet_nodes += other.fleet_nodes;
        self
    }

    pub fn eligible_nodes(&self) -> usize {
        self.eligible_nodes
    }

    pub fn fleet_nodes(&self) -> usize {
        self.fleet_nodes
    }

    /// Number of distinct models observed
    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Rank the tally into a report
    pub fn into_report(self) -> Report {
        Report {
            models: rank(self.models.into_values()),
            total_node_count: self.eligible_nodes,
            fleet_node_count: self.fleet_nodes,
        }
    }
}

/// Builds compatibility reports from node lists
pub struct Aggregator {
    classifier: LabelClassifier,
    eligibility: Option<Box<dyn Eligibility>>,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(LabelClassifier::default())
    }
}

impl Aggregator {
    /// Create an aggregator that counts every node
    pub fn new(classifier: LabelClassifier) -> Self {
        Self {
            classifier,
            eligibility: None,
        }
    }

    /// Only count nodes accepted by the given predicate
    pub fn with_eligibility(mut self, eligibility: impl Eligibility + 'static) -> Self {
        self.eligibility = Some(Box::new(eligibility));
        self
    }

    pub fn classifier(&self) -> &LabelClassifier {
        &self.classifier
    }

    /// Whether a node passes the configured eligibility predicate
    pub fn is_eligible(&self, node: &NodeRecord) -> bool {
        is_eligible(self.eligibility.as_deref(), node)
    }

    /// Fold nodes into an unranked tally
    pub fn tally(&self, nodes: &[NodeRecord]) -> Result<ModelTally> {
        tally_nodes(&self.classifier, self.eligibility.as_deref(), nodes)
    }

    /// Aggregate and rank nodes into a report
    pub fn aggregate(&self, nodes: &[NodeRecord]) -> Result<Report> {
        let tally = self.tally(nodes)?;

        info!(
            event = "report_aggregated",
            fleet_nodes = tally.fleet_nodes(),
            eligible_nodes = tally.eligible_nodes(),
            models = tally.len(),
            "Aggregated cpu model labels"
        );

        Ok(tally.into_report())
    }
}

/// Aggregate nodes with the default label namespaces
///
/// With no filter every node is eligible.
pub fn aggregate(nodes: &[NodeRecord], filter: Option<&dyn Eligibility>) -> Result<Report> {
    let classifier = LabelClassifier::default();
    Ok(tally_nodes(&classifier, filter, nodes)?.into_report())
}

fn is_eligible(filter: Option<&dyn Eligibility>, node: &NodeRecord) -> bool {
    filter.map(|f| f.is_eligible(node)).unwrap_or(true)
}

fn tally_nodes(
    classifier: &LabelClassifier,
    filter: Option<&dyn Eligibility>,
    nodes: &[NodeRecord],
) -> Result<ModelTally> {
    nodes.iter().try_fold(ModelTally::default(), |mut tally, node| -> Result<ModelTally> {
        tally.fleet_nodes += 1;

        if !is_eligible(filter, node) {
            debug!(node = %node.name(), "Skipping ineligible node");
            return Ok(tally);
        }
        tally.eligible_nodes += 1;

        let facts = classifier.facts(node.labels())?;
        debug!(node = %node.name(), facts = facts.len(), "Classified node labels");

        Ok(facts.into_iter().fold(tally, ModelTally::record))
    })
}
