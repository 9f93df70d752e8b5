use crate::mapping::GroupMapping;
use clc_client::ServerId;
use std::collections::BTreeSet;

/// Every distinct server referenced by any group.
pub fn extract_servers(mapping: &GroupMapping) -> BTreeSet<ServerId> {
    mapping.values().flatten().cloned().collect()
}
