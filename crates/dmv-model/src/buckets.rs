//! Well-known global attribute ids and the bucketing rule.
//!
//! Every cluster exposes a reserved high-id block of global attributes.
//! Two of them describe the cluster itself and land in the `features`
//! bucket; the global list attributes enumerate the cluster's command and
//! event ids, which is the only place the TOO log reveals them (the log
//! carries no per-entry event/command marker). This table is the single
//! source of that classification.

/// GeneratedCommandList: response command ids emitted by the cluster.
pub const GENERATED_COMMAND_LIST: &str = "0xFFF8";
/// AcceptedCommandList: request command ids the cluster accepts.
pub const ACCEPTED_COMMAND_LIST: &str = "0xFFF9";
/// EventList: event ids the cluster can emit.
pub const EVENT_LIST: &str = "0xFFFA";
/// AttributeList: the cluster's own attribute ids.
pub const ATTRIBUTE_LIST: &str = "0xFFFB";
/// FeatureMap: bitmap of optional feature sets the cluster implements.
pub const FEATURE_MAP: &str = "0xFFFC";
/// ClusterRevision: revision of the cluster definition implemented.
pub const CLUSTER_REVISION: &str = "0xFFFD";

/// Where an entry for a given attribute id belongs in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// Ordinary attribute.
    Attribute,
    /// Cluster-level feature (FeatureMap / ClusterRevision).
    Feature,
    /// List attribute whose elements are command ids.
    CommandList,
    /// List attribute whose elements are event ids.
    EventList,
}

pub fn bucket_for(attribute_id: &str) -> Bucket {
    match attribute_id {
        FEATURE_MAP | CLUSTER_REVISION => Bucket::Feature,
        GENERATED_COMMAND_LIST | ACCEPTED_COMMAND_LIST => Bucket::CommandList,
        EVENT_LIST => Bucket::EventList,
        _ => Bucket::Attribute,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucketing() {
        assert_eq!(bucket_for("0xFFFC"), Bucket::Feature);
        assert_eq!(bucket_for("0xFFFD"), Bucket::Feature);
        assert_eq!(bucket_for("0xFFF9"), Bucket::CommandList);
        assert_eq!(bucket_for("0xFFFA"), Bucket::EventList);
        assert_eq!(bucket_for("0xFFFB"), Bucket::Attribute);
        assert_eq!(bucket_for("0x0000"), Bucket::Attribute);
    }
}
