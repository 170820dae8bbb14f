//! TOO log format: parser and serializer for chip-tool data-model dumps.
//!
//! A TOO log is a flattened dump of a device's data model. Each block starts
//! with a `[TOO] Endpoint: .. Cluster: .. Attribute .. DataVersion: ..`
//! header line followed by a value body (scalar, scalar list, or record
//! list). This crate turns raw log text into an ordered sequence of
//! [`LogEntry`] values, recovering from malformed blocks instead of
//! aborting the scan, and renders entries back to TOO text.

pub mod ast;
pub mod ids;
pub mod parser;
pub mod serializer;

pub use ast::{LogEntry, Record, Scalar, Value};
pub use ids::{canonical_id, canonical_id_from_int, format_id};
pub use parser::{parse_log, ParseIssue, ParseOutcome};
pub use serializer::{serialize_entry, serialize_log};
