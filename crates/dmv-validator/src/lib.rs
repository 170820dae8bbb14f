//! Conformance validation and report assembly.
//!
//! Cross-references a read-only [`dmv_model::DeviceModel`] against a
//! read-only [`dmv_catalog::Catalog`] and assembles the findings into a
//! deterministic, serializable [`Report`]. Validation findings are the
//! expected primary output of the system, not failures of it: nothing in
//! this crate returns `Err` for a non-conformant device.

pub mod finding;
pub mod report;
pub mod validator;

pub use finding::{Category, Finding, Severity};
pub use report::{DeviceTypeRef, EndpointDeviceTypes, Report, ReportBuilder, Summary};
pub use validator::{Validation, Validator, DESCRIPTOR_CLUSTER, DEVICE_TYPE_LIST};
