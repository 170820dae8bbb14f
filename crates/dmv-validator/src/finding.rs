//! Finding types: one unit of parser or validator output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a finding. The discriminants give the report sort order:
/// errors surface before warnings, warnings before info notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error = 0,
    Warning = 1,
    Info = 2,
}

/// What kind of discrepancy a finding describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    MissingCluster,
    MissingAttribute,
    MissingCommand,
    MissingEvent,
    MissingFeature,
    UnexpectedValue,
    OutdatedRevision,
    MalformedEntry,
    UnknownDeviceType,
    NoEntries,
}

/// One conformance result. Location fields are filled as far as they are
/// known; a parse issue from a malformed header has none of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    /// Canonical id of the device type whose requirement produced this
    /// finding. Duplicate findings across device types are deliberate:
    /// each names its own requirement source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    pub message: String,
}

impl Finding {
    pub fn new(severity: Severity, category: Category, message: impl Into<String>) -> Self {
        Self {
            severity,
            category,
            endpoint: None,
            cluster: None,
            element: None,
            device_type: None,
            message: message.into(),
        }
    }

    pub fn error(category: Category, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, category, message)
    }

    pub fn warning(category: Category, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, category, message)
    }

    pub fn info(category: Category, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, category, message)
    }

    pub fn at_endpoint(mut self, endpoint: u16) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    pub fn in_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = Some(cluster.into());
        self
    }

    pub fn for_element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }

    pub fn from_device_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = Some(device_type.into());
        self
    }

    /// Stable key clustering related findings for display: one group per
    /// endpoint+cluster, with location-less findings under a run-level key.
    pub fn group_key(&self) -> String {
        match (self.endpoint, &self.cluster) {
            (Some(ep), Some(cluster)) => format!("endpoint {} / {}", ep, cluster),
            (Some(ep), None) => format!("endpoint {}", ep),
            _ => "log".to_string(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.group_key(), self.message)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}
