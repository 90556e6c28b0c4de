//! Node eligibility predicates
//!
//! Decides which nodes count toward the fleet total. Nodes that cannot run
//! virtual machines would otherwise skew the report, so the default policy
//! requires a non-zero allocatable KVM device.

use crate::models::NodeRecord;
use serde::{Deserialize, Serialize};

/// Extended resource exposed by KubeVirt's device plugin on KVM-capable nodes
pub const KVM_DEVICE_RESOURCE: &str = "devices.kubevirt.io/kvm";

/// Predicate deciding whether a node is counted
pub trait Eligibility {
    fn is_eligible(&self, node: &NodeRecord) -> bool;
}

impl<F> Eligibility for F
where
    F: Fn(&NodeRecord) -> bool,
{
    fn is_eligible(&self, node: &NodeRecord) -> bool {
        self(node)
    }
}

/// Requires a non-zero allocatable quantity of a resource
///
/// Nodes without allocatable data, or without the resource, are ineligible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireAllocatable {
    pub resource: String,
}

impl RequireAllocatable {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
        }
    }
}

impl Default for RequireAllocatable {
    fn default() -> Self {
        Self::new(KVM_DEVICE_RESOURCE)
    }
}

impl Eligibility for RequireAllocatable {
    fn is_eligible(&self, node: &NodeRecord) -> bool {
        node.allocatable()
            .and_then(|a| a.get(&self.resource))
            .map(|quantity| !is_zero_quantity(quantity))
            .unwrap_or(false)
    }
}

/// Configurable eligibility policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EligibilityPolicy {
    /// Count every node
    All,
    /// Count only nodes with a non-zero allocatable resource
    Allocatable(RequireAllocatable),
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        EligibilityPolicy::Allocatable(RequireAllocatable::default())
    }
}

impl Eligibility for EligibilityPolicy {
    fn is_eligible(&self, node: &NodeRecord) -> bool {
        match self {
            EligibilityPolicy::All => true,
            EligibilityPolicy::Allocatable(require) => require.is_eligible(node),
        }
    }
}

/// Name of a policy as it appears in configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EligibilityMode {
    All,
    #[default]
    Allocatable,
}

impl EligibilityPolicy {
    /// Build a policy from its configured mode and resource name
    pub fn from_mode(mode: EligibilityMode, resource: impl Into<String>) -> Self {
        match mode {
            EligibilityMode::All => EligibilityPolicy::All,
            EligibilityMode::Allocatable => {
                EligibilityPolicy::Allocatable(RequireAllocatable::new(resource))
            }
        }
    }
}

/// A quantity is zero when it reads as an unsigned integer equal to zero
fn is_zero_quantity(quantity: &str) -> bool {
    quantity
        .trim()
        .parse::<u64>()
        .map(|n| n == 0)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_with_kvm(quantity: &str) -> NodeRecord {
        NodeRecord::new("n", Vec::<(String, String)>::new())
            .with_allocatable([(KVM_DEVICE_RESOURCE, quantity)])
    }

    #[test]
    fn test_require_allocatable() {
        let require = RequireAllocatable::default();
        assert!(require.is_eligible(&node_with_kvm("1k")));
        assert!(require.is_eligible(&node_with_kvm("110")));
        assert!(!require.is_eligible(&node_with_kvm("0")));
        assert!(!require.is_eligible(&node_with_kvm("00")));
        assert!(!require.is_eligible(&node_with_kvm(" 0 ")));
    }

    #[test]
    fn test_missing_resource_is_ineligible() {
        let require = RequireAllocatable::default();
        let bare = NodeRecord::new("bare", Vec::<(String, String)>::new());
        assert!(!require.is_eligible(&bare));

        let other = bare.clone().with_allocatable([("cpu", "4")]);
        assert!(!require.is_eligible(&other));
    }

    #[test]
    fn test_policy_all_counts_everything() {
        let bare = NodeRecord::new("bare", Vec::<(String, String)>::new());
        assert!(EligibilityPolicy::All.is_eligible(&bare));
        assert!(!EligibilityPolicy::default().is_eligible(&bare));
    }

    #[test]
    fn test_closure_predicate() {
        let named = |node: &NodeRecord| node.name().starts_with("gpu-");
        assert!(named.is_eligible(&NodeRecord::new("gpu-1", Vec::<(String, String)>::new())));
        assert!(!named.is_eligible(&NodeRecord::new("cpu-1", Vec::<(String, String)>::new())));
    }

    #[test]
    fn test_from_mode() {
        assert_eq!(
            EligibilityPolicy::from_mode(EligibilityMode::All, "ignored"),
            EligibilityPolicy::All
        );
        assert_eq!(
            EligibilityPolicy::from_mode(EligibilityMode::Allocatable, "example.com/dev"),
            EligibilityPolicy::Allocatable(RequireAllocatable::new("example.com/dev"))
        );
    }
}
