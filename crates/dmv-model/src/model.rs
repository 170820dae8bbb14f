//! The normalized device model handed from the builder to the validator.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use toolog::{LogEntry, Scalar, Value};

use crate::buckets;

/// One element stored in a cluster bucket: the label the log printed for it
/// plus its parsed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
    pub value: Value,
}

/// One cluster as exposed by one endpoint. All four maps are keyed by
/// canonical element id (`0x` + four uppercase hex digits).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterInstance {
    pub attributes: BTreeMap<String, Element>,
    pub events: BTreeMap<String, Element>,
    pub commands: BTreeMap<String, Element>,
    pub features: BTreeMap<String, Element>,
}

impl ClusterInstance {
    /// The revision this instance reports, if the log carried one.
    pub fn cluster_revision(&self) -> Option<i64> {
        self.features
            .get(buckets::CLUSTER_REVISION)
            .and_then(|e| e.value.as_scalar())
            .and_then(Scalar::as_int)
    }
}

/// One endpoint and the clusters it exposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub endpoint: u16,
    pub clusters: BTreeMap<String, ClusterInstance>,
}

/// The full normalized model. Endpoints keep first-appearance order from
/// the source log; duplicate endpoint numbers merge into one entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceModel {
    pub endpoints: Vec<Endpoint>,
}

impl DeviceModel {
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn endpoint(&self, number: u16) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.endpoint == number)
    }

    /// Reconstruct the entry sequence this model describes.
    ///
    /// Features serialize under their global attribute ids; derived
    /// command/event buckets are skipped because their source list
    /// attributes are kept in `attributes` and already carry them.
    pub fn to_entries(&self) -> Vec<LogEntry> {
        let mut entries = Vec::new();
        for ep in &self.endpoints {
            for (cluster_id, cluster) in &ep.clusters {
                for (id, element) in cluster.attributes.iter().chain(&cluster.features) {
                    entries.push(LogEntry {
                        endpoint: ep.endpoint,
                        cluster: cluster_id.clone(),
                        attribute: id.clone(),
                        data_version: 1,
                        name: element.name.clone(),
                        value: element.value.clone(),
                    });
                }
            }
        }
        entries
    }
}
