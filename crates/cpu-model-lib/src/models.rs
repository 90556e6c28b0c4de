//! Core data models for node lists and compatibility reports

use k8s_openapi::api::core::v1::Node;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A list of cluster nodes as produced by `kubectl get nodes -o yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<NodeRecord>,
}

/// A single cluster node
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeRecord {
    #[serde(default)]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: NodeMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeMetadata {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocatable: Option<BTreeMap<String, String>>,
}

impl NodeRecord {
    /// Create a node with the given name and labels and no status
    pub fn new<I, K, V>(name: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            kind: "Node".to_string(),
            metadata: NodeMetadata {
                name: name.into(),
                labels: labels
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            },
            status: None,
        }
    }

    /// Attach allocatable resource quantities
    pub fn with_allocatable<I, K, V>(mut self, allocatable: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.status = Some(NodeStatus {
            allocatable: Some(
                allocatable
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.metadata.labels
    }

    /// Allocatable resources, if the node reports any status at all
    pub fn allocatable(&self) -> Option<&BTreeMap<String, String>> {
        self.status.as_ref().and_then(|s| s.allocatable.as_ref())
    }
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        let allocatable = node
            .status
            .as_ref()
            .and_then(|s| s.allocatable.as_ref())
            .map(|a| {
                a.iter()
                    .map(|(k, q)| (k.clone(), q.0.clone()))
                    .collect::<BTreeMap<_, _>>()
            });

        Self {
            kind: "Node".to_string(),
            metadata: NodeMetadata {
                name: node.metadata.name.clone().unwrap_or_default(),
                labels: node.metadata.labels.clone().unwrap_or_default(),
            },
            status: allocatable.map(|a| NodeStatus {
                allocatable: Some(a),
            }),
        }
    }
}

/// Per-model node counts
///
/// Fields are declared in the order the legacy YAML report emitted them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStats {
    /// Nodes carrying the general compatibility label for this model
    #[serde(rename = "cpuModelCompatibleNodeCount")]
    pub compatible_node_count: usize,
    #[serde(rename = "cpuModelName")]
    pub model: String,
    /// Nodes reporting this model as their host model
    #[serde(rename = "hostModelCompatibleNodeCount")]
    pub host_model_node_count: usize,
}

impl ModelStats {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            compatible_node_count: 0,
            model: model.into(),
            host_model_node_count: 0,
        }
    }
}

/// Ranked compatibility report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    #[serde(rename = "cpuModelNodeInfo")]
    pub models: Vec<ModelStats>,
    /// Nodes that passed the eligibility filter
    #[serde(rename = "totalNodeCount")]
    pub total_node_count: usize,
    /// Nodes seen before filtering
    #[serde(skip)]
    pub fleet_node_count: usize,
}

impl Report {
    /// Look up a model entry by name
    pub fn get(&self, model: &str) -> Option<&ModelStats> {
        self.models.iter().find(|m| m.model == model)
    }

    /// The top-ranked model, if any were observed
    pub fn best_match(&self) -> Option<&ModelStats> {
        self.models.first()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
