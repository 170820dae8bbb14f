//! Block tokenizer and value parser for TOO log text.
//!
//! The scan is recoverable by design: a malformed header or body poisons
//! only its own block. The offending block is reported as a [`ParseIssue`]
//! and the scan resumes at the next recognizable header, so one corrupt
//! block never hides the rest of the log.

use crate::ast::{LogEntry, Record, Scalar, Value};
use crate::ids;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

static HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\[TOO\]\s+Endpoint:\s*(\d+)\s+Cluster:\s*(0[xX][0-9A-Fa-f]+)\s+Attribute\s+(0[xX][0-9A-Fa-f]+)\s+DataVersion:\s*(\d+)\s*$",
    )
    .unwrap()
});

/// Why a single block could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("block has no value body")]
    EmptyBody,
    #[error("declared {declared} entries but parsed {found}")]
    CountMismatch { declared: usize, found: usize },
    #[error("record at element [{index}] is never closed")]
    UnterminatedRecord { index: usize },
    #[error("list mixes scalar and record elements")]
    MixedElements,
    #[error("unparsable body line: `{0}`")]
    UnparsableLine(String),
}

/// A recoverable problem scoped to one block of the log.
///
/// Location fields are filled as far as the block could be identified: a
/// malformed header leaves all three empty, a malformed body keeps the
/// endpoint/cluster/attribute from its (valid) header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseIssue {
    pub endpoint: Option<u16>,
    pub cluster: Option<String>,
    pub attribute: Option<String>,
    /// 1-based line number of the block's header in the input.
    pub line: usize,
    pub message: String,
}

/// Everything a scan produces: best-effort entries plus the issues for
/// every block that had to be dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    pub entries: Vec<LogEntry>,
    pub issues: Vec<ParseIssue>,
}

/// Scan raw log text into ordered TOO entries.
///
/// Lines before the first header are ignored. Input with zero header lines
/// yields an empty outcome, not an error.
pub fn parse_log(input: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();
    let lines: Vec<&str> = input.lines().collect();

    let header_lines: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.trim_start().starts_with("[TOO]"))
        .map(|(i, _)| i)
        .collect();

    if header_lines.is_empty() {
        debug!("no TOO headers in input");
        return outcome;
    }

    for (n, &start) in header_lines.iter().enumerate() {
        let end = header_lines.get(n + 1).copied().unwrap_or(lines.len());
        let header = lines[start].trim();

        let Some((endpoint, cluster, attribute, data_version)) = parse_header(header) else {
            warn!(line = start + 1, "skipping block with malformed TOO header");
            outcome.issues.push(ParseIssue {
                endpoint: None,
                cluster: None,
                attribute: None,
                line: start + 1,
                message: format!("malformed TOO header: `{}`", header),
            });
            continue;
        };

        match parse_body(&lines[start + 1..end]) {
            Ok((name, value)) => outcome.entries.push(LogEntry {
                endpoint,
                cluster,
                attribute,
                data_version,
                name,
                value,
            }),
            Err(err) => {
                warn!(
                    line = start + 1,
                    endpoint,
                    cluster = %cluster,
                    attribute = %attribute,
                    "dropping block: {err}"
                );
                outcome.issues.push(ParseIssue {
                    endpoint: Some(endpoint),
                    cluster: Some(cluster),
                    attribute: Some(attribute),
                    line: start + 1,
                    message: err.to_string(),
                });
            }
        }
    }

    outcome
}

fn parse_header(line: &str) -> Option<(u16, String, String, u32)> {
    let caps = HEADER.captures(line)?;
    let endpoint = caps[1].parse().ok()?;
    let cluster = ids::canonical_id(&caps[2])?;
    let attribute = ids::canonical_id(&caps[3])?;
    let data_version = caps[4].parse().ok()?;
    Some((endpoint, cluster, attribute, data_version))
}

fn parse_body(lines: &[&str]) -> Result<(String, Value), BlockError> {
    let body: Vec<&str> = lines.iter().copied().filter(|l| !l.trim().is_empty()).collect();
    let first = body.first().ok_or(BlockError::EmptyBody)?.trim();
    let (name, rest) = first
        .split_once(':')
        .ok_or_else(|| BlockError::UnparsableLine(first.to_string()))?;
    let name = name.trim().to_string();
    let rest = rest.trim();

    if let Some(declared) = declared_entry_count(rest) {
        let value = parse_elements(&body[1..], declared)?;
        return Ok((name, value));
    }

    // Single-scalar body. A brace here is record syntax outside a list.
    if rest.starts_with('{') {
        return Err(BlockError::UnparsableLine(first.to_string()));
    }
    if let Some(extra) = body.get(1) {
        return Err(BlockError::UnparsableLine(extra.trim().to_string()));
    }
    Ok((name, Value::Scalar(Scalar::parse(rest))))
}

fn declared_entry_count(rest: &str) -> Option<usize> {
    rest.strip_suffix(" entries")?.trim().parse().ok()
}

fn parse_elements(lines: &[&str], declared: usize) -> Result<Value, BlockError> {
    let mut scalars = Vec::new();
    let mut records = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();
        let rest = element_rest(line).ok_or_else(|| BlockError::UnparsableLine(line.to_string()))?;

        if rest == "{" {
            let opened_at = scalars.len() + records.len();
            let mut fields = Vec::new();
            loop {
                i += 1;
                let field = match lines.get(i) {
                    Some(l) => l.trim(),
                    None => return Err(BlockError::UnterminatedRecord { index: opened_at }),
                };
                if field == "}" {
                    break;
                }
                if field.starts_with('[') {
                    return Err(BlockError::UnterminatedRecord { index: opened_at });
                }
                let (k, v) = field
                    .split_once(':')
                    .ok_or_else(|| BlockError::UnparsableLine(field.to_string()))?;
                fields.push((k.trim().to_string(), Scalar::parse(v)));
            }
            records.push(Record { fields });
        } else if rest.starts_with('{') {
            return Err(BlockError::UnparsableLine(line.to_string()));
        } else {
            scalars.push(Scalar::parse(rest));
        }
        i += 1;
    }

    if !scalars.is_empty() && !records.is_empty() {
        return Err(BlockError::MixedElements);
    }
    let found = scalars.len() + records.len();
    if found != declared {
        return Err(BlockError::CountMismatch { declared, found });
    }
    if records.is_empty() {
        Ok(Value::ScalarList(scalars))
    } else {
        Ok(Value::RecordList(records))
    }
}

/// Strip the `[i]: ` element prefix, requiring a numeric index.
fn element_rest(line: &str) -> Option<&str> {
    let inner = line.strip_prefix('[')?;
    let (index, rest) = inner.split_once("]:")?;
    index.trim().parse::<usize>().ok()?;
    Some(rest.trim())
}
