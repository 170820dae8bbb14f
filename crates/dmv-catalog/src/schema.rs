//! Serde entities matching the published catalog JSON shape.

use serde::{Deserialize, Serialize};

/// Everything one device type requires of a conforming endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceTypeRequirement {
    /// Numeric device type id as published, e.g. `22` for Root Node.
    pub id: u32,
    pub name: String,
    #[serde(default = "default_revision")]
    pub revision: u32,
    #[serde(default)]
    pub clusters: Vec<ClusterRequirement>,
}

/// One cluster a device type requires, with its required elements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterRequirement {
    /// Hex id string; canonicalized at load time.
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub side: ClusterSide,
    #[serde(default = "default_revision")]
    pub revision: u32,
    #[serde(default = "default_true")]
    pub mandatory: bool,
    #[serde(default)]
    pub attributes: Vec<ElementRequirement>,
    #[serde(default)]
    pub commands: Vec<ElementRequirement>,
    #[serde(default)]
    pub events: Vec<ElementRequirement>,
    #[serde(default)]
    pub features: Vec<ElementRequirement>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterSide {
    #[default]
    Server,
    Client,
}

/// One attribute/command/event/feature requirement. An absent `mandatory`
/// flag means mandatory; the catalog marks only the optional elements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementRequirement {
    pub id: String,
    pub name: String,
    #[serde(default = "default_true")]
    pub mandatory: bool,
}

fn default_revision() -> u32 {
    1
}

fn default_true() -> bool {
    true
}
