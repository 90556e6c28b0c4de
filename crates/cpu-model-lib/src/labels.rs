//! CPU model label classification
//!
//! KubeVirt's node labeller advertises CPU models as node labels of the
//! form `<namespace>/<model>: "true"`. Two namespaces are recognized: one
//! for models the node can run, one for the node's own host model.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Label namespace for CPU models a node is compatible with
pub const CPU_MODEL_PREFIX: &str = "cpu-model.node.kubevirt.io/";

/// Label namespace for the node's native CPU model
pub const HOST_MODEL_PREFIX: &str = "host-model-cpu.node.kubevirt.io/";

/// Separator between namespace and model name
const SEPARATOR: char = '/';

/// Only labels with exactly this value are considered
const ENABLED_VALUE: &str = "true";

/// Which namespace a label belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LabelKind {
    Compatible,
    HostModel,
}

/// A CPU model fact derived from one label key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelFact {
    pub model: String,
    pub kind: LabelKind,
}

impl LabelFact {
    pub fn is_host_model(&self) -> bool {
        self.kind == LabelKind::HostModel
    }
}

/// How to treat keys such as `cpu-model.node.kubevirt.io/` with no model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyModelPolicy {
    /// Fail the run with a structural violation
    #[default]
    Reject,
    /// Ignore the label, as the legacy tool did
    Skip,
}

/// The pair of label prefixes identifying CPU model labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelNamespaces {
    pub cpu_model: String,
    pub host_model: String,
}

impl Default for LabelNamespaces {
    fn default() -> Self {
        Self {
            cpu_model: CPU_MODEL_PREFIX.to_string(),
            host_model: HOST_MODEL_PREFIX.to_string(),
        }
    }
}

/// Classifies node label keys into CPU model facts
#[derive(Debug, Clone, Default)]
pub struct LabelClassifier {
    namespaces: LabelNamespaces,
    empty_models: EmptyModelPolicy,
}

impl LabelClassifier {
    /// Create a classifier for the given namespaces
    ///
    /// Fails if either prefix contains the other, since a key could then
    /// match both namespaces.
    pub fn new(namespaces: LabelNamespaces) -> Result<Self> {
        let LabelNamespaces {
            cpu_model,
            host_model,
        } = &namespaces;
        if cpu_model.contains(host_model.as_str()) || host_model.contains(cpu_model.as_str()) {
            return Err(Error::OverlappingNamespaces {
                general: cpu_model.clone(),
                host: host_model.clone(),
            });
        }

        Ok(Self {
            namespaces,
            empty_models: EmptyModelPolicy::default(),
        })
    }

    /// Set the empty model name policy
    pub fn with_empty_model_policy(mut self, policy: EmptyModelPolicy) -> Self {
        self.empty_models = policy;
        self
    }

    pub fn namespaces(&self) -> &LabelNamespaces {
        &self.namespaces
    }

    /// Classify a single label key
    ///
    /// # Returns
    /// * `Ok(Some(fact))` for a CPU model label
    /// * `Ok(None)` for unrelated labels, and for empty model names under
    ///   [`EmptyModelPolicy::Skip`]
    /// * `Err` if a CPU model label does not split into `<prefix>/<model>`
    pub fn classify(&self, key: &str) -> Result<Option<LabelFact>> {
        let kind = if key.contains(self.namespaces.cpu_model.as_str()) {
            LabelKind::Compatible
        } else if key.contains(self.namespaces.host_model.as_str()) {
            LabelKind::HostModel
        } else {
            return Ok(None);
        };

        let mut segments = key.split(SEPARATOR);
        let model = match (segments.next(), segments.next(), segments.next()) {
            (Some(_), Some(model), None) => model,
            _ => {
                return Err(Error::MalformedLabel {
                    key: key.to_string(),
                })
            }
        };

        if model.is_empty() {
            return match self.empty_models {
                EmptyModelPolicy::Reject => Err(Error::EmptyModelName {
                    key: key.to_string(),
                }),
                EmptyModelPolicy::Skip => {
                    debug!(key = %key, "Skipping cpu model label without a model name");
                    Ok(None)
                }
            };
        }

        Ok(Some(LabelFact {
            model: model.to_string(),
            kind,
        }))
    }

    /// Classify every enabled label of a node, in key order
    ///
    /// Labels whose value is not exactly `"true"` are ignored.
    pub fn facts(&self, labels: &BTreeMap<String, String>) -> Result<Vec<LabelFact>> {
        let mut facts = Vec::new();
        for (key, value) in labels {
            if value != ENABLED_VALUE {
                continue;
            }
            if let Some(fact) = self.classify(key)? {
                facts.push(fact);
            }
        }
        Ok(facts)
    }
}
