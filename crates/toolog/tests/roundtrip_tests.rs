//! Round-trip tests: serialized entries must parse back unchanged.

use toolog::{parse_log, serialize_log, LogEntry, Record, Scalar, Value};

fn entry(
    endpoint: u16,
    cluster: &str,
    attribute: &str,
    name: &str,
    value: Value,
) -> LogEntry {
    LogEntry {
        endpoint,
        cluster: cluster.to_string(),
        attribute: attribute.to_string(),
        data_version: 1,
        name: name.to_string(),
        value,
    }
}

#[test]
fn test_entries_roundtrip() {
    let entries = vec![
        entry(
            0,
            "0x001D",
            "0x0000",
            "DeviceTypeList",
            Value::RecordList(vec![
                Record {
                    fields: vec![
                        ("DeviceType".to_string(), Scalar::Int(22)),
                        ("Revision".to_string(), Scalar::Int(1)),
                    ],
                },
                Record {
                    fields: vec![
                        ("DeviceType".to_string(), Scalar::Int(256)),
                        ("Revision".to_string(), Scalar::Int(1)),
                    ],
                },
            ]),
        ),
        entry(
            0,
            "0x001D",
            "0x0001",
            "ServerList",
            Value::ScalarList(vec![Scalar::Int(29), Scalar::Int(40), Scalar::Int(1029)]),
        ),
        entry(0, "0x0028", "0xFFFC", "FeatureMap", Value::Scalar(Scalar::Int(0))),
        entry(
            0,
            "0x0028",
            "0x0001",
            "VendorName",
            Value::Scalar(Scalar::Text("Test Vendor".to_string())),
        ),
        entry(1, "0x001D", "0x0003", "PartsList", Value::ScalarList(vec![])),
    ];

    let text = serialize_log(&entries);
    let outcome = parse_log(&text);

    assert!(outcome.issues.is_empty(), "issues: {:?}", outcome.issues);
    assert_eq!(outcome.entries, entries);
}

#[test]
fn test_roundtrip_is_stable_across_two_passes() {
    let entries = vec![entry(
        2,
        "0x0006",
        "0x0000",
        "OnOff",
        Value::Scalar(Scalar::Int(1)),
    )];
    let once = serialize_log(&parse_log(&serialize_log(&entries)).entries);
    let twice = serialize_log(&parse_log(&once).entries);
    assert_eq!(once, twice);
}
