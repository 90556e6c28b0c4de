//! Decoding node lists and encoding reports
//!
//! Node lists are YAML documents in the shape produced by
//! `kubectl get nodes -o yaml`. JSON input is accepted as well.

use crate::error::{Error, Result};
use crate::models::{NodeList, NodeRecord, Report};
use serde::Serialize;
use std::io::Read;
use std::path::Path;

/// Read a complete node list from a reader
pub fn read_node_list(mut reader: impl Read) -> Result<Vec<NodeRecord>> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    parse_node_list(&buf)
}

/// Read a node list from a file
pub fn read_node_list_file(path: &Path) -> Result<Vec<NodeRecord>> {
    let file = std::fs::File::open(path)?;
    read_node_list(file)
}

/// Decode a node list document
///
/// An empty or null document is an empty node list.
pub fn parse_node_list(document: &str) -> Result<Vec<NodeRecord>> {
    if document.trim().is_empty() {
        return Ok(Vec::new());
    }
    let list: Option<NodeList> = serde_yaml::from_str(document).map_err(Error::Decode)?;
    Ok(list.map(|l| l.items).unwrap_or_default())
}

/// Encode a report as YAML
pub fn to_yaml<T: Serialize>(value: &T) -> Result<String> {
    serde_yaml::to_string(value).map_err(Error::EncodeYaml)
}

/// Encode a report as pretty-printed JSON
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Error::EncodeJson)
}

/// Decode a previously encoded YAML or JSON report
pub fn parse_report(document: &str) -> Result<Report> {
    serde_yaml::from_str(document).map_err(Error::Decode)
}
