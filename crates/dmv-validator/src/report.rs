//! Report assembly: deterministic ordering, grouping, and summary counts.

use serde::{Deserialize, Serialize};

use crate::finding::{Finding, Severity};

/// One device type discovered on an endpoint. `name` is filled from the
/// catalog when the id matched a requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceTypeRef {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// The device types declared by one endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointDeviceTypes {
    pub endpoint: u16,
    pub device_types: Vec<DeviceTypeRef>,
}

/// Aggregate counters over a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub elements_checked: usize,
}

/// The final, immutable validation report: the exact shape handed to the
/// presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub findings: Vec<Finding>,
    pub summary: Summary,
    pub endpoints: Vec<EndpointDeviceTypes>,
}

impl Report {
    /// Findings clustered under their display key, in report order.
    /// Groups are contiguous because the key is the sort prefix.
    pub fn groups(&self) -> Vec<(String, Vec<&Finding>)> {
        let mut groups: Vec<(String, Vec<&Finding>)> = Vec::new();
        for finding in &self.findings {
            let key = finding.group_key();
            match groups.last_mut() {
                Some((last, members)) if *last == key => members.push(finding),
                _ => groups.push((key, vec![finding])),
            }
        }
        groups
    }

    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }
}

/// Accumulates findings and endpoint summaries, then produces the sorted
/// report in one shot.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    findings: Vec<Finding>,
    endpoints: Vec<EndpointDeviceTypes>,
    elements_checked: usize,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.findings.extend(findings);
    }

    pub fn set_endpoints(&mut self, endpoints: Vec<EndpointDeviceTypes>) {
        self.endpoints = endpoints;
    }

    pub fn record_elements_checked(&mut self, count: usize) {
        self.elements_checked += count;
    }

    /// Sort findings for stable output: endpoint ascending (run-level
    /// findings first), cluster id lexicographic, severity (errors before
    /// warnings before info), then insertion order via stable sort.
    pub fn build(mut self) -> Report {
        self.findings.sort_by(|a, b| {
            let a_key = (a.endpoint.map_or(-1, i32::from), a.cluster.as_deref().unwrap_or(""));
            let b_key = (b.endpoint.map_or(-1, i32::from), b.cluster.as_deref().unwrap_or(""));
            a_key.cmp(&b_key).then(a.severity.cmp(&b.severity))
        });

        let mut summary = Summary {
            elements_checked: self.elements_checked,
            ..Summary::default()
        };
        for finding in &self.findings {
            match finding.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Info => summary.infos += 1,
            }
        }

        Report {
            findings: self.findings,
            summary,
            endpoints: self.endpoints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::Category;

    #[test]
    fn test_sort_order_and_summary() {
        let mut builder = ReportBuilder::new();
        builder.push(
            Finding::warning(Category::OutdatedRevision, "old revision")
                .at_endpoint(1)
                .in_cluster("0x0006"),
        );
        builder.push(
            Finding::error(Category::MissingCluster, "cluster missing")
                .at_endpoint(1)
                .in_cluster("0x0006"),
        );
        builder.push(
            Finding::error(Category::MissingAttribute, "attribute missing")
                .at_endpoint(0)
                .in_cluster("0x0028"),
        );
        builder.push(Finding::error(Category::MalformedEntry, "bad header"));
        builder.record_elements_checked(5);

        let report = builder.build();
        assert_eq!(report.findings[0].category, Category::MalformedEntry);
        assert_eq!(report.findings[1].endpoint, Some(0));
        assert_eq!(report.findings[2].category, Category::MissingCluster);
        assert_eq!(report.findings[3].category, Category::OutdatedRevision);

        assert_eq!(report.summary.errors, 3);
        assert_eq!(report.summary.warnings, 1);
        assert_eq!(report.summary.infos, 0);
        assert_eq!(report.summary.elements_checked, 5);
        assert!(report.has_errors());
    }

    #[test]
    fn test_insertion_order_breaks_ties() {
        let mut builder = ReportBuilder::new();
        builder.push(
            Finding::error(Category::MissingCommand, "first").at_endpoint(0).in_cluster("0x0006"),
        );
        builder.push(
            Finding::error(Category::MissingCommand, "second").at_endpoint(0).in_cluster("0x0006"),
        );
        let report = builder.build();
        assert_eq!(report.findings[0].message, "first");
        assert_eq!(report.findings[1].message, "second");
    }

    #[test]
    fn test_groups_are_contiguous() {
        let mut builder = ReportBuilder::new();
        builder.push(Finding::error(Category::MissingCluster, "a").at_endpoint(0).in_cluster("0x0028"));
        builder.push(Finding::error(Category::MissingCluster, "b").at_endpoint(1).in_cluster("0x0006"));
        builder.push(Finding::warning(Category::OutdatedRevision, "c").at_endpoint(0).in_cluster("0x0028"));
        let report = builder.build();

        let groups = report.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "endpoint 0 / 0x0028");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "endpoint 1 / 0x0006");
    }

    #[test]
    fn test_report_serializes_round_trip() {
        let mut builder = ReportBuilder::new();
        builder.push(Finding::info(Category::NoEntries, "no entries found"));
        builder.set_endpoints(vec![]);
        let report = builder.build();

        let json = serde_json::to_string(&report).unwrap();
        let back: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
