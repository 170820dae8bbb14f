//! Render TOO entries back to log text.
//!
//! The output is accepted verbatim by [`crate::parser::parse_log`], so
//! well-formed entries round-trip exactly.

use crate::ast::{LogEntry, Value};

pub fn serialize_entry(entry: &LogEntry) -> String {
    let mut out = format!(
        "[TOO] Endpoint: {} Cluster: {} Attribute {} DataVersion: {}\n",
        entry.endpoint, entry.cluster, entry.attribute, entry.data_version
    );

    match &entry.value {
        Value::Scalar(s) => {
            out.push_str(&format!("{}: {}\n", entry.name, s));
        }
        Value::ScalarList(items) => {
            out.push_str(&format!("{}: {} entries\n", entry.name, items.len()));
            for (i, s) in items.iter().enumerate() {
                out.push_str(&format!("[{}]: {}\n", i, s));
            }
        }
        Value::RecordList(records) => {
            out.push_str(&format!("{}: {} entries\n", entry.name, records.len()));
            for (i, record) in records.iter().enumerate() {
                out.push_str(&format!("[{}]: {{\n", i));
                for (field, value) in &record.fields {
                    out.push_str(&format!("  {}: {}\n", field, value));
                }
                out.push_str("}\n");
            }
        }
    }

    out
}

pub fn serialize_log(entries: &[LogEntry]) -> String {
    entries.iter().map(serialize_entry).collect()
}
