//! Per-endpoint conformance validation.
//!
//! Each endpoint is validated independently: a missing device type
//! declaration stops that endpoint only. The catalog enumerates a minimum,
//! not an exact set, so model elements beyond the requirements never
//! produce findings.

use dmv_catalog::{Catalog, ClusterRequirement, DeviceTypeRequirement, ElementRequirement};
use dmv_model::{ClusterInstance, DeviceModel, Endpoint};
use toolog::{ids, Scalar, Value};
use tracing::debug;

use crate::finding::{Category, Finding, Severity};
use crate::report::{DeviceTypeRef, EndpointDeviceTypes};

/// The Descriptor cluster every endpoint must expose.
pub const DESCRIPTOR_CLUSTER: &str = "0x001D";
/// The Descriptor attribute declaring the endpoint's device types.
pub const DEVICE_TYPE_LIST: &str = "0x0000";

/// Raw validator output, before report assembly.
#[derive(Debug, Default)]
pub struct Validation {
    pub findings: Vec<Finding>,
    pub endpoints: Vec<EndpointDeviceTypes>,
    /// Presence checks performed (clusters plus mandatory elements).
    pub elements_checked: usize,
}

/// Cross-references a read-only model against a read-only catalog.
pub struct Validator<'a> {
    catalog: &'a Catalog,
}

impl<'a> Validator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn validate(&self, model: &DeviceModel) -> Validation {
        let mut run = Validation::default();
        for endpoint in &model.endpoints {
            self.validate_endpoint(endpoint, &mut run);
        }
        run
    }

    fn validate_endpoint(&self, endpoint: &Endpoint, run: &mut Validation) {
        let mut summary = EndpointDeviceTypes {
            endpoint: endpoint.endpoint,
            device_types: Vec::new(),
        };

        let Some(declared) = self.declared_device_types(endpoint, &mut run.findings) else {
            run.endpoints.push(summary);
            return;
        };
        debug!(endpoint = endpoint.endpoint, device_types = ?declared, "validating endpoint");

        for id in declared {
            match self.catalog.device_type(&id) {
                None => {
                    run.findings.push(
                        Finding::warning(
                            Category::UnknownDeviceType,
                            format!("device type `{}` is not in the requirements catalog", id),
                        )
                        .at_endpoint(endpoint.endpoint)
                        .from_device_type(id.clone()),
                    );
                    summary.device_types.push(DeviceTypeRef { id, name: None });
                }
                Some(requirement) => {
                    summary.device_types.push(DeviceTypeRef {
                        id: id.clone(),
                        name: Some(requirement.name.clone()),
                    });
                    self.check_device_type(endpoint, &id, requirement, run);
                }
            }
        }

        run.endpoints.push(summary);
    }

    /// Extract the declared device type ids from the Descriptor cluster.
    /// `None` means the declaration is absent or unusable; validation of
    /// this endpoint stops here.
    fn declared_device_types(
        &self,
        endpoint: &Endpoint,
        findings: &mut Vec<Finding>,
    ) -> Option<Vec<String>> {
        let missing_declaration = |element: Option<&str>| {
            let mut finding = Finding::error(
                Category::MissingCluster,
                "missing device type declaration (Descriptor DeviceTypeList)",
            )
            .at_endpoint(endpoint.endpoint)
            .in_cluster(DESCRIPTOR_CLUSTER);
            if let Some(element) = element {
                finding = finding.for_element(element);
            }
            finding
        };

        let Some(descriptor) = endpoint.clusters.get(DESCRIPTOR_CLUSTER) else {
            findings.push(missing_declaration(None));
            return None;
        };
        let Some(list) = descriptor.attributes.get(DEVICE_TYPE_LIST) else {
            findings.push(missing_declaration(Some(DEVICE_TYPE_LIST)));
            return None;
        };

        let Value::RecordList(records) = &list.value else {
            findings.push(
                Finding::warning(
                    Category::UnexpectedValue,
                    "DeviceTypeList is not a list of records",
                )
                .at_endpoint(endpoint.endpoint)
                .in_cluster(DESCRIPTOR_CLUSTER)
                .for_element(DEVICE_TYPE_LIST),
            );
            return None;
        };

        let mut declared = Vec::new();
        for record in records {
            match record
                .get("DeviceType")
                .and_then(Scalar::as_int)
                .and_then(ids::canonical_id_from_int)
            {
                Some(id) => declared.push(id),
                None => findings.push(
                    Finding::warning(
                        Category::UnexpectedValue,
                        "DeviceTypeList record has no integer DeviceType field",
                    )
                    .at_endpoint(endpoint.endpoint)
                    .in_cluster(DESCRIPTOR_CLUSTER)
                    .for_element(DEVICE_TYPE_LIST),
                ),
            }
        }
        Some(declared)
    }

    fn check_device_type(
        &self,
        endpoint: &Endpoint,
        device_type_id: &str,
        requirement: &DeviceTypeRequirement,
        run: &mut Validation,
    ) {
        for cluster_req in &requirement.clusters {
            run.elements_checked += 1;
            let Some(cluster) = endpoint.clusters.get(&cluster_req.id) else {
                if cluster_req.mandatory {
                    run.findings.push(
                        Finding::error(
                            Category::MissingCluster,
                            format!(
                                "cluster `{}` ({}) required by device type {} is missing",
                                cluster_req.id, cluster_req.name, requirement.name
                            ),
                        )
                        .at_endpoint(endpoint.endpoint)
                        .in_cluster(cluster_req.id.clone())
                        .from_device_type(device_type_id),
                    );
                }
                continue;
            };

            self.check_cluster(endpoint.endpoint, device_type_id, cluster_req, cluster, run);
        }
    }

    fn check_cluster(
        &self,
        endpoint: u16,
        device_type_id: &str,
        requirement: &ClusterRequirement,
        cluster: &ClusterInstance,
        run: &mut Validation,
    ) {
        let checks = [
            ("attribute", Category::MissingAttribute, &requirement.attributes, &cluster.attributes),
            ("command", Category::MissingCommand, &requirement.commands, &cluster.commands),
            ("event", Category::MissingEvent, &requirement.events, &cluster.events),
            ("feature", Category::MissingFeature, &requirement.features, &cluster.features),
        ];
        for (kind, category, required, bucket) in checks {
            for element in mandatory(required) {
                run.elements_checked += 1;
                if !bucket.contains_key(&element.id) {
                    run.findings.push(
                        Finding::error(
                            category,
                            format!(
                                "{} `{}` ({}) required by cluster {} is missing",
                                kind, element.id, element.name, requirement.name
                            ),
                        )
                        .at_endpoint(endpoint)
                        .in_cluster(requirement.id.clone())
                        .for_element(element.id.clone())
                        .from_device_type(device_type_id),
                    );
                }
            }
        }

        // Older revisions may still satisfy every mandatory element, so a
        // lower revision is a warning rather than an error.
        if let Some(revision) = cluster.cluster_revision() {
            if revision < i64::from(requirement.revision) {
                run.findings.push(
                    Finding::new(
                        Severity::Warning,
                        Category::OutdatedRevision,
                        format!(
                            "cluster {} reports revision {} but the catalog requires {}",
                            requirement.name, revision, requirement.revision
                        ),
                    )
                    .at_endpoint(endpoint)
                    .in_cluster(requirement.id.clone())
                    .from_device_type(device_type_id),
                );
            }
        }
    }
}

fn mandatory(elements: &[ElementRequirement]) -> impl Iterator<Item = &ElementRequirement> {
    elements.iter().filter(|e| e.mandatory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dmv_model::ModelBuilder;
    use toolog::{parse_log, LogEntry, Record};

    fn catalog() -> Catalog {
        Catalog::from_json(
            r#"[
                {
                    "id": 22,
                    "name": "Root Node",
                    "revision": 1,
                    "clusters": [
                        {
                            "id": "0x0028",
                            "name": "Basic Information",
                            "type": "server",
                            "revision": 2,
                            "features": [
                                {"id": "0xFFFC", "name": "FeatureMap"},
                                {"id": "0xFFFD", "name": "ClusterRevision"}
                            ]
                        }
                    ]
                },
                {
                    "id": 256,
                    "name": "On/Off Light",
                    "revision": 1,
                    "clusters": [
                        {
                            "id": "0x0006",
                            "name": "On/Off",
                            "type": "server",
                            "revision": 1,
                            "attributes": [{"id": "0x0000", "name": "OnOff"}],
                            "commands": [
                                {"id": "0x0000", "name": "Off"},
                                {"id": "0x0001", "name": "On"},
                                {"id": "0x0002", "name": "Toggle", "mandatory": false}
                            ]
                        }
                    ]
                }
            ]"#,
        )
        .unwrap()
    }

    fn device_type_entry(endpoint: u16, device_types: &[i64]) -> LogEntry {
        LogEntry {
            endpoint,
            cluster: DESCRIPTOR_CLUSTER.to_string(),
            attribute: DEVICE_TYPE_LIST.to_string(),
            data_version: 1,
            name: "DeviceTypeList".to_string(),
            value: Value::RecordList(
                device_types
                    .iter()
                    .map(|&dt| Record {
                        fields: vec![
                            ("DeviceType".to_string(), Scalar::Int(dt)),
                            ("Revision".to_string(), Scalar::Int(1)),
                        ],
                    })
                    .collect(),
            ),
        }
    }

    fn entry(endpoint: u16, cluster: &str, attribute: &str, name: &str, value: Value) -> LogEntry {
        LogEntry {
            endpoint,
            cluster: cluster.to_string(),
            attribute: attribute.to_string(),
            data_version: 1,
            name: name.to_string(),
            value,
        }
    }

    fn errors(run: &Validation) -> Vec<&Finding> {
        run.findings.iter().filter(|f| f.severity == Severity::Error).collect()
    }

    #[test]
    fn test_conformant_endpoint_has_no_errors() {
        let model = ModelBuilder::fold(vec![
            device_type_entry(0, &[22]),
            entry(0, "0x0028", "0xFFFC", "FeatureMap", Value::Scalar(Scalar::Int(0))),
            entry(0, "0x0028", "0xFFFD", "ClusterRevision", Value::Scalar(Scalar::Int(2))),
        ]);
        let catalog = catalog();
        let run = Validator::new(&catalog).validate(&model);
        assert!(errors(&run).is_empty(), "findings: {:?}", run.findings);
        assert_eq!(run.endpoints.len(), 1);
        assert_eq!(run.endpoints[0].device_types[0].id, "0x0016");
        assert_eq!(run.endpoints[0].device_types[0].name.as_deref(), Some("Root Node"));
        assert!(run.elements_checked >= 3);
    }

    #[test]
    fn test_missing_mandatory_cluster_is_one_error_per_device_type() {
        // Both device types declared; neither required cluster present.
        let model = ModelBuilder::fold(vec![device_type_entry(0, &[22, 256])]);
        let catalog = catalog();
        let run = Validator::new(&catalog).validate(&model);

        let missing: Vec<&Finding> = run
            .findings
            .iter()
            .filter(|f| f.category == Category::MissingCluster)
            .collect();
        assert_eq!(missing.len(), 2);
        assert_eq!(missing[0].device_type.as_deref(), Some("0x0016"));
        assert_eq!(missing[1].device_type.as_deref(), Some("0x0100"));
    }

    #[test]
    fn test_missing_mandatory_elements() {
        let model = ModelBuilder::fold(vec![
            device_type_entry(1, &[256]),
            entry(
                1,
                "0x0006",
                "0xFFF9",
                "AcceptedCommandList",
                Value::ScalarList(vec![Scalar::Int(0)]),
            ),
        ]);
        let catalog = catalog();
        let run = Validator::new(&catalog).validate(&model);
        let errs = errors(&run);

        // OnOff attribute and the On command are missing; Off is present
        // via AcceptedCommandList and Toggle is optional.
        assert_eq!(errs.len(), 2);
        assert!(errs.iter().any(|f| {
            f.category == Category::MissingAttribute && f.element.as_deref() == Some("0x0000")
        }));
        assert!(errs.iter().any(|f| {
            f.category == Category::MissingCommand && f.element.as_deref() == Some("0x0001")
        }));
    }

    #[test]
    fn test_unknown_device_type_is_a_warning_not_fatal() {
        let model = ModelBuilder::fold(vec![device_type_entry(0, &[0x9999, 22])]);
        let catalog = catalog();
        let run = Validator::new(&catalog).validate(&model);

        let unknown: Vec<&Finding> = run
            .findings
            .iter()
            .filter(|f| f.category == Category::UnknownDeviceType)
            .collect();
        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown[0].severity, Severity::Warning);
        // The known device type was still validated.
        assert!(run.findings.iter().any(|f| f.category == Category::MissingCluster));
        assert_eq!(run.endpoints[0].device_types.len(), 2);
        assert_eq!(run.endpoints[0].device_types[0].name, None);
    }

    #[test]
    fn test_missing_declaration_stops_only_that_endpoint() {
        let model = ModelBuilder::fold(vec![
            entry(0, "0x0006", "0x0000", "OnOff", Value::Scalar(Scalar::Int(1))),
            device_type_entry(1, &[22]),
        ]);
        let catalog = catalog();
        let run = Validator::new(&catalog).validate(&model);

        let declaration_errors: Vec<&Finding> = run
            .findings
            .iter()
            .filter(|f| f.message.contains("missing device type declaration"))
            .collect();
        assert_eq!(declaration_errors.len(), 1);
        assert_eq!(declaration_errors[0].endpoint, Some(0));
        // Endpoint 1 was validated independently.
        assert!(run
            .findings
            .iter()
            .any(|f| f.endpoint == Some(1) && f.category == Category::MissingCluster));
        assert_eq!(run.endpoints.len(), 2);
        assert!(run.endpoints[0].device_types.is_empty());
    }

    #[test]
    fn test_outdated_revision_is_a_warning() {
        let model = ModelBuilder::fold(vec![
            device_type_entry(0, &[22]),
            entry(0, "0x0028", "0xFFFC", "FeatureMap", Value::Scalar(Scalar::Int(0))),
            entry(0, "0x0028", "0xFFFD", "ClusterRevision", Value::Scalar(Scalar::Int(1))),
        ]);
        let catalog = catalog();
        let run = Validator::new(&catalog).validate(&model);

        assert!(errors(&run).is_empty());
        let outdated: Vec<&Finding> = run
            .findings
            .iter()
            .filter(|f| f.category == Category::OutdatedRevision)
            .collect();
        assert_eq!(outdated.len(), 1);
        assert_eq!(outdated[0].severity, Severity::Warning);
        assert!(outdated[0].message.contains("revision 1"));
    }

    #[test]
    fn test_extra_model_elements_are_not_errors() {
        let log = "\
[TOO] Endpoint: 0 Cluster: 0x001D Attribute 0x0000 DataVersion: 1
DeviceTypeList: 1 entries
[0]: {
  DeviceType: 22
  Revision: 1
}
[TOO] Endpoint: 0 Cluster: 0x0028 Attribute 0xFFFC DataVersion: 1
FeatureMap: 0x00000000
[TOO] Endpoint: 0 Cluster: 0x0028 Attribute 0xFFFD DataVersion: 1
ClusterRevision: 2
[TOO] Endpoint: 0 Cluster: 0x0028 Attribute 0x0005 DataVersion: 1
NodeLabel: extra attribute the catalog never mentions
[TOO] Endpoint: 0 Cluster: 0x0405 Attribute 0x0000 DataVersion: 1
MeasuredValue: 4931";
        let outcome = parse_log(log);
        assert!(outcome.issues.is_empty());
        let model = ModelBuilder::fold(outcome.entries);
        let catalog = catalog();
        let run = Validator::new(&catalog).validate(&model);
        assert!(errors(&run).is_empty(), "findings: {:?}", run.findings);
    }

    #[test]
    fn test_malformed_device_type_record_is_reported_and_skipped() {
        let model = ModelBuilder::fold(vec![entry(
            0,
            DESCRIPTOR_CLUSTER,
            DEVICE_TYPE_LIST,
            "DeviceTypeList",
            Value::RecordList(vec![
                Record {
                    fields: vec![("DeviceType".to_string(), Scalar::Text("garbage".into()))],
                },
                Record {
                    fields: vec![
                        ("DeviceType".to_string(), Scalar::Int(22)),
                        ("Revision".to_string(), Scalar::Int(1)),
                    ],
                },
            ]),
        )]);
        let catalog = catalog();
        let run = Validator::new(&catalog).validate(&model);

        assert!(run
            .findings
            .iter()
            .any(|f| f.category == Category::UnexpectedValue));
        assert_eq!(run.endpoints[0].device_types.len(), 1);
        assert_eq!(run.endpoints[0].device_types[0].id, "0x0016");
    }
}
