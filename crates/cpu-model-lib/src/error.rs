//! Error types for node list processing

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Broad category of a failure, used by callers deciding how to react
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The node list could not be read or decoded
    Input,
    /// A CPU model label key violates the `<prefix>/<model>` structure
    StructuralViolation,
    /// The classifier was configured with unusable namespaces
    Configuration,
    /// The report could not be encoded
    Output,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read node list: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to decode node list: {0}")]
    Decode(#[source] serde_yaml::Error),

    #[error("invalid cpu model label encountered [{key}]")]
    MalformedLabel { key: String },

    #[error("cpu model label has an empty model name [{key}]")]
    EmptyModelName { key: String },

    #[error("label namespaces overlap: {general:?} and {host:?}")]
    OverlappingNamespaces { general: String, host: String },

    #[error("failed to encode report as YAML: {0}")]
    EncodeYaml(#[source] serde_yaml::Error),

    #[error("failed to encode report as JSON: {0}")]
    EncodeJson(#[source] serde_json::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Read(_) | Error::Decode(_) => ErrorKind::Input,
            Error::MalformedLabel { .. } | Error::EmptyModelName { .. } => {
                ErrorKind::StructuralViolation
            }
            Error::OverlappingNamespaces { .. } => ErrorKind::Configuration,
            Error::EncodeYaml(_) | Error::EncodeJson(_) => ErrorKind::Output,
        }
    }

    /// The offending label key for structural violations
    pub fn label_key(&self) -> Option<&str> {
        match self {
            Error::MalformedLabel { key } | Error::EmptyModelName { key } => Some(key),
            _ => None,
        }
    }
}
