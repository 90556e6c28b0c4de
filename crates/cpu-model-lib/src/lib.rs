//! CPU model compatibility reporting for KubeVirt node fleets
//!
//! This crate provides the core functionality for:
//! - Classifying node labels into CPU model facts
//! - Filtering nodes by virtualization capability
//! - Folding facts into per-model node counts
//! - Ranking models by best fleet-wide match
//! - Decoding node lists and encoding reports

pub mod aggregate;
pub mod eligibility;
pub mod error;
pub mod input;
pub mod labels;
pub mod models;
pub mod rank;

pub use aggregate::{aggregate, Aggregator, ModelTally};
pub use eligibility::{
    Eligibility, EligibilityMode, EligibilityPolicy, RequireAllocatable, KVM_DEVICE_RESOURCE,
};
pub use error::{Error, ErrorKind, Result};
pub use labels::{
    EmptyModelPolicy, LabelClassifier, LabelFact, LabelKind, LabelNamespaces, CPU_MODEL_PREFIX,
    HOST_MODEL_PREFIX,
};
pub use models::*;
pub use rank::{best_match, rank};
