use serde::{Deserialize, Serialize};
use std::fmt;

/// A single scalar from a TOO body line: integer if the raw text is decimal
/// or `0x`-prefixed hex, otherwise trimmed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Text(String),
}

impl Scalar {
    /// Classify a raw value string.
    pub fn parse(raw: &str) -> Scalar {
        let t = raw.trim();
        if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
            if !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()) {
                if let Ok(v) = i64::from_str_radix(hex, 16) {
                    return Scalar::Int(v);
                }
            }
        } else if let Ok(v) = t.parse::<i64>() {
            return Scalar::Int(v);
        }
        Scalar::Text(t.to_string())
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(v) => Some(*v),
            Scalar::Text(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One nested record inside a list value: an ordered field-name -> scalar
/// mapping, matching the `[i]: { Field: value ... }` body syntax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub fields: Vec<(String, Scalar)>,
}

impl Record {
    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }
}

/// The parsed body of a TOO block.
///
/// Lists are homogeneous: a body either holds bare scalars or nested
/// records, never a mix. Consumers match exhaustively on all three shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Value {
    Scalar(Scalar),
    ScalarList(Vec<Scalar>),
    RecordList(Vec<Record>),
}

impl Value {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_records(&self) -> Option<&[Record]> {
        match self {
            Value::RecordList(r) => Some(r),
            _ => None,
        }
    }
}

/// One fully parsed TOO block. Immutable once produced; source order is
/// preserved by the parser for deterministic output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub endpoint: u16,
    /// Canonical cluster id, e.g. `0x001D`.
    pub cluster: String,
    /// Canonical attribute id, e.g. `0x0000`.
    pub attribute: String,
    /// Informational only; not used for cross-referencing.
    pub data_version: u32,
    /// The label from the first body line, e.g. `DeviceTypeList`.
    pub name: String,
    pub value: Value,
}
