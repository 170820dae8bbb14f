//! Catalog loading, canonicalization, and structural validation.

use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use toolog::ids;

use crate::schema::{ClusterRequirement, DeviceTypeRequirement};

/// Fatal problems with the catalog itself. Unlike every other error class
/// in this system these do not degrade to findings: an inconsistent
/// catalog cannot be trusted to validate anything.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog could not be read: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog contains no device types")]
    Empty,
    #[error("device type `{device_type}`: invalid identifier `{id}`")]
    InvalidId { device_type: String, id: String },
    #[error("device type `{device_type}`: duplicate {kind} id `{id}`")]
    DuplicateId {
        device_type: String,
        kind: &'static str,
        id: String,
    },
    #[error("duplicate device type id `{0}`")]
    DuplicateDeviceType(String),
}

/// The loaded, validated, read-only requirements catalog, indexed by
/// canonical device type id.
#[derive(Debug, Clone)]
pub struct Catalog {
    device_types: Vec<DeviceTypeRequirement>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Parse and validate a catalog from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let requirements: Vec<DeviceTypeRequirement> = serde_json::from_str(json)?;
        Self::from_requirements(requirements)
    }

    /// Read, parse, and validate a catalog file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Validate already-deserialized requirements: canonicalize every id
    /// and reject duplicates. All-or-nothing; a catalog is never partially
    /// loaded.
    pub fn from_requirements(
        mut requirements: Vec<DeviceTypeRequirement>,
    ) -> Result<Self, CatalogError> {
        if requirements.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut index = HashMap::new();
        for (pos, device_type) in requirements.iter_mut().enumerate() {
            let label = device_type.name.clone();
            let canonical =
                ids::canonical_id_from_int(i64::from(device_type.id)).ok_or_else(|| {
                    CatalogError::InvalidId {
                        device_type: label.clone(),
                        id: device_type.id.to_string(),
                    }
                })?;

            let mut seen_clusters = Vec::new();
            for cluster in &mut device_type.clusters {
                canonicalize_cluster(cluster, &label)?;
                if seen_clusters.contains(&cluster.id) {
                    return Err(CatalogError::DuplicateId {
                        device_type: label.clone(),
                        kind: "cluster",
                        id: cluster.id.clone(),
                    });
                }
                seen_clusters.push(cluster.id.clone());
            }

            if index.insert(canonical.clone(), pos).is_some() {
                return Err(CatalogError::DuplicateDeviceType(canonical));
            }
        }

        Ok(Self {
            device_types: requirements,
            index,
        })
    }

    /// Look up a device type by canonical id, e.g. `0x0016`.
    pub fn device_type(&self, canonical_id: &str) -> Option<&DeviceTypeRequirement> {
        self.index
            .get(canonical_id)
            .map(|&pos| &self.device_types[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeviceTypeRequirement> {
        self.device_types.iter()
    }

    pub fn len(&self) -> usize {
        self.device_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.device_types.is_empty()
    }
}

fn canonicalize_cluster(
    cluster: &mut ClusterRequirement,
    device_type: &str,
) -> Result<(), CatalogError> {
    cluster.id = canonical(&cluster.id, device_type)?;
    let lists = [
        ("attribute", &mut cluster.attributes),
        ("command", &mut cluster.commands),
        ("event", &mut cluster.events),
        ("feature", &mut cluster.features),
    ];
    for (kind, elements) in lists {
        let mut seen = Vec::new();
        for element in elements.iter_mut() {
            element.id = canonical(&element.id, device_type)?;
            if seen.contains(&element.id) {
                return Err(CatalogError::DuplicateId {
                    device_type: device_type.to_string(),
                    kind,
                    id: element.id.clone(),
                });
            }
            seen.push(element.id.clone());
        }
    }
    Ok(())
}

fn canonical(raw: &str, device_type: &str) -> Result<String, CatalogError> {
    ids::canonical_id(raw).ok_or_else(|| CatalogError::InvalidId {
        device_type: device_type.to_string(),
        id: raw.to_string(),
    })
}
