//! Fold ordered log entries into a [`DeviceModel`].

use std::collections::BTreeMap;
use toolog::{ids, LogEntry, Value};
use tracing::warn;

use crate::buckets::{self, Bucket};
use crate::model::{ClusterInstance, DeviceModel, Element, Endpoint};

/// Owns the model during construction. Endpoints merge by number,
/// re-encountered (endpoint, cluster, attribute) tuples are last-write-wins,
/// and a single bad entry never aborts the fold.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    model: DeviceModel,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a full entry sequence in one call.
    pub fn fold(entries: impl IntoIterator<Item = LogEntry>) -> DeviceModel {
        let mut builder = Self::new();
        for entry in entries {
            builder.push(entry);
        }
        builder.finish()
    }

    pub fn push(&mut self, entry: LogEntry) {
        let bucket = buckets::bucket_for(&entry.attribute);
        let cluster = self.cluster_mut(entry.endpoint, &entry.cluster);
        let element = Element {
            name: entry.name,
            value: entry.value,
        };

        match bucket {
            Bucket::Feature => {
                cluster.features.insert(entry.attribute, element);
            }
            Bucket::CommandList => {
                derive_ids(&mut cluster.commands, &element);
                cluster.attributes.insert(entry.attribute, element);
            }
            Bucket::EventList => {
                derive_ids(&mut cluster.events, &element);
                cluster.attributes.insert(entry.attribute, element);
            }
            Bucket::Attribute => {
                cluster.attributes.insert(entry.attribute, element);
            }
        }
    }

    pub fn finish(self) -> DeviceModel {
        self.model
    }

    fn cluster_mut(&mut self, endpoint: u16, cluster_id: &str) -> &mut ClusterInstance {
        let idx = match self.model.endpoints.iter().position(|e| e.endpoint == endpoint) {
            Some(i) => i,
            None => {
                self.model.endpoints.push(Endpoint {
                    endpoint,
                    clusters: BTreeMap::new(),
                });
                self.model.endpoints.len() - 1
            }
        };
        self.model.endpoints[idx]
            .clusters
            .entry(cluster_id.to_string())
            .or_default()
    }
}

/// Expand a global list attribute (AcceptedCommandList, EventList, ...)
/// into per-id bucket entries.
fn derive_ids(bucket: &mut BTreeMap<String, Element>, element: &Element) {
    let Value::ScalarList(items) = &element.value else {
        warn!(name = %element.name, "global list attribute is not a scalar list; skipping");
        return;
    };
    for item in items {
        let Some(id) = item.as_int().and_then(ids::canonical_id_from_int) else {
            warn!(name = %element.name, "list element is not a 16-bit id; skipping");
            continue;
        };
        bucket.insert(
            id,
            Element {
                name: element.name.clone(),
                value: Value::Scalar(item.clone()),
            },
        );
    }
}
