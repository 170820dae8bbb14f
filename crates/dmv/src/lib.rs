//! Device data-model conformance: the full pipeline in one call.
//!
//! Wires the parsing, model-building, validation, and report-assembly
//! crates into a single pure function `(log text, catalog) -> report`.
//! No process-wide state, no I/O on the
//! validation path; independent runs can execute concurrently with zero
//! coordination.
//!
//! # Example
//!
//! ```no_run
//! use dmv::{validate_log, Catalog};
//!
//! let catalog = Catalog::from_file("data/element_requirements_1.4.1.json")?;
//! let report = validate_log(&std::fs::read_to_string("device_dump.txt")?, &catalog);
//! for finding in &report.findings {
//!     println!("{}", finding);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use tracing::debug;

pub use dmv_catalog::{Catalog, CatalogError, ClusterRequirement, DeviceTypeRequirement};
pub use dmv_model::{ClusterInstance, DeviceModel, Element, Endpoint, ModelBuilder};
pub use dmv_validator::{
    Category, DeviceTypeRef, EndpointDeviceTypes, Finding, Report, ReportBuilder, Severity,
    Summary, Validator,
};
pub use toolog::{parse_log, serialize_log, LogEntry, ParseIssue, Value};

/// A parsed model together with the blocks that had to be dropped.
#[derive(Debug, Clone)]
pub struct ParsedModel {
    pub model: DeviceModel,
    pub issues: Vec<ParseIssue>,
}

/// Parse raw TOO log text into a best-effort device model.
pub fn parse_device_model(text: &str) -> ParsedModel {
    let outcome = toolog::parse_log(text);
    ParsedModel {
        model: ModelBuilder::fold(outcome.entries),
        issues: outcome.issues,
    }
}

/// Run the full pipeline: parse, build, validate, assemble.
///
/// Parse issues degrade to malformed-entry findings; a log with zero TOO
/// blocks yields a single info-level "no entries found" finding. The one
/// fatal error class, a corrupt catalog, is rejected before this function
/// can be called ([`Catalog`] loading fails instead).
pub fn validate_log(text: &str, catalog: &Catalog) -> Report {
    let parsed = parse_device_model(text);
    debug!(
        endpoints = parsed.model.endpoints.len(),
        issues = parsed.issues.len(),
        "parsed device model"
    );

    let mut builder = ReportBuilder::new();
    for issue in parsed.issues {
        let mut finding = Finding::error(Category::MalformedEntry, issue.message);
        if let Some(endpoint) = issue.endpoint {
            finding = finding.at_endpoint(endpoint);
        }
        if let Some(cluster) = issue.cluster {
            finding = finding.in_cluster(cluster);
        }
        if let Some(attribute) = issue.attribute {
            finding = finding.for_element(attribute);
        }
        builder.push(finding);
    }

    if parsed.model.is_empty() {
        builder.push(Finding::info(Category::NoEntries, "no entries found"));
    } else {
        let run = Validator::new(catalog).validate(&parsed.model);
        builder.record_elements_checked(run.elements_checked);
        builder.set_endpoints(run.endpoints);
        builder.extend(run.findings);
    }

    builder.build()
}
