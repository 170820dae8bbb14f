//! Canonical rendering of 16-bit data-model identifiers.
//!
//! Cluster, attribute, command, event, feature, and device-type ids all use
//! the same canonical form: `0x` followed by four uppercase hex digits
//! (`1d`, `0x1d`, and `29` all render as `0x001D`). The parser, the model
//! builder, and the catalog loader share these functions so ids compare as
//! plain strings everywhere.

/// Render a 16-bit id in canonical form.
pub fn format_id(id: u16) -> String {
    format!("0x{:04X}", id)
}

/// Canonicalize a raw id string.
///
/// `0x`-prefixed input is hex; digit-only input is decimal (TOO list bodies
/// print ids as decimal, e.g. ServerList `29` is cluster `0x001D`); anything
/// else is tried as bare hex. Returns `None` when the value does not fit in
/// 16 bits or does not parse at all.
pub fn canonical_id(raw: &str) -> Option<String> {
    let t = raw.trim();
    if t.is_empty() {
        return None;
    }
    let id = if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16).ok()?
    } else if t.chars().all(|c| c.is_ascii_digit()) {
        t.parse::<u16>().ok()?
    } else {
        u16::from_str_radix(t, 16).ok()?
    };
    Some(format_id(id))
}

/// Canonicalize an already-parsed integer id.
pub fn canonical_id_from_int(value: i64) -> Option<String> {
    u16::try_from(value).ok().map(format_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_input_is_zero_padded_and_uppercased() {
        assert_eq!(canonical_id("0x1d"), Some("0x001D".to_string()));
        assert_eq!(canonical_id("0x001D"), Some("0x001D".to_string()));
        assert_eq!(canonical_id("1D"), Some("0x001D".to_string()));
        assert_eq!(canonical_id("0xFFFC"), Some("0xFFFC".to_string()));
    }

    #[test]
    fn test_decimal_input() {
        assert_eq!(canonical_id("29"), Some("0x001D".to_string()));
        assert_eq!(canonical_id("1029"), Some("0x0405".to_string()));
        assert_eq!(canonical_id("22"), Some("0x0016".to_string()));
    }

    #[test]
    fn test_out_of_range_or_garbage() {
        assert_eq!(canonical_id("0x10000"), None);
        assert_eq!(canonical_id("65536"), None);
        assert_eq!(canonical_id(""), None);
        assert_eq!(canonical_id("not-an-id"), None);
    }

    #[test]
    fn test_from_int() {
        assert_eq!(canonical_id_from_int(256), Some("0x0100".to_string()));
        assert_eq!(canonical_id_from_int(-1), None);
        assert_eq!(canonical_id_from_int(0x1_0000), None);
    }
}
