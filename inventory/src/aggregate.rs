use crate::{
    mapping::GroupMapping,
    walker::{
        GroupTreeWalker,
        WalkStats,
    },
};
use clc_client::{
    Datacenter,
    Provider,
    Scope,
};

/// Merged group mapping of all datacenters of one scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    pub mapping: GroupMapping,
    /// Datacenters whose tree contributed at least one group.
    pub contributing: Vec<Datacenter>,
    pub stats: WalkStats,
}

/// Walks every datacenter and merges the non-empty results with [`merge`].
pub async fn aggregate(provider: &dyn Provider, scope: &Scope, datacenters: &[Datacenter]) -> Aggregation {
    let mut results = Vec::with_capacity(datacenters.len());
    let mut contributing = Vec::new();
    let mut stats = WalkStats::default();

    for datacenter in datacenters {
        let (mapping, walk_stats) = GroupTreeWalker::new(provider, scope, datacenter)
            .walk_datacenter()
            .await;
        stats += walk_stats;
        match mapping {
            Some(mapping) => {
                results.push(mapping);
                contributing.push(datacenter.clone());
            }
            None => debug!(%datacenter, "datacenter has no groups with servers"),
        }
    }

    Aggregation {
        mapping: merge(results),
        contributing,
        stats,
    }
}

/// Concatenates the per-datacenter mappings key by key.
///
/// The inputs are sorted by content first, so the merged lists do not depend
/// on the order the datacenters were walked in. Duplicates are kept.
pub fn merge(mut mappings: Vec<GroupMapping>) -> GroupMapping {
    mappings.sort();
    let mut merged = GroupMapping::new();
    for mapping in mappings {
        merged.append_all(mapping);
    }
    merged
}
