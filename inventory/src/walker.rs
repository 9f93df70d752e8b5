use crate::mapping::GroupMapping;
use clc_client::{
    Datacenter,
    Group,
    Provider,
    Scope,
};
use futures::{
    future::BoxFuture,
    FutureExt as _,
};
use std::ops::AddAssign;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkStats {
    pub groups_visited: usize,
    /// `default` groups whose server list could not be read.
    pub unreadable_groups: usize,
    /// Failed attempts to list a datacenter's top groups or a group's subgroups.
    pub failed_listings: usize,
}

impl AddAssign for WalkStats {
    fn add_assign(&mut self, rhs: Self) {
        self.groups_visited += rhs.groups_visited;
        self.unreadable_groups += rhs.unreadable_groups;
        self.failed_listings += rhs.failed_listings;
    }
}

/// Collects `group → servers` for one datacenter by descending its group tree.
pub struct GroupTreeWalker<'a> {
    provider: &'a dyn Provider,
    scope: &'a Scope,
    datacenter: &'a Datacenter,
    stats: WalkStats,
}

impl<'a> GroupTreeWalker<'a> {
    pub fn new(provider: &'a dyn Provider, scope: &'a Scope, datacenter: &'a Datacenter) -> Self {
        Self {
            provider,
            scope,
            datacenter,
            stats: WalkStats::default(),
        }
    }

    /// Walks the whole tree of the datacenter.
    ///
    /// `None` when the tree produced no group with servers, including when
    /// its top groups could not be listed.
    #[instrument(level = "debug", skip_all, fields(scope = %self.scope, datacenter = %self.datacenter))]
    pub async fn walk_datacenter(mut self) -> (Option<GroupMapping>, WalkStats) {
        let groups = match self.provider.list_top_groups(self.scope, self.datacenter).await {
            Ok(groups) => groups,
            Err(err) => {
                warn!(datacenter = %self.datacenter, %err, "unable to list groups, skipping datacenter");
                self.stats.failed_listings += 1;
                return (None, self.stats);
            }
        };

        let mapping = self.walk(&groups).await;
        debug!(keys = mapping.len(), stats = ?self.stats, "datacenter walked");
        ((!mapping.is_empty()).then_some(mapping), self.stats)
    }

    /// Subgroups first, then the group itself. A later write under an
    /// already used key replaces the earlier one.
    pub fn walk<'b>(&'b mut self, groups: &'b [Group]) -> BoxFuture<'b, GroupMapping> {
        async move {
            let mut result = GroupMapping::new();
            for group in groups {
                self.stats.groups_visited += 1;

                let subgroups = match self.provider.list_subgroups(self.scope, group).await {
                    Ok(subgroups) => subgroups,
                    Err(err) => {
                        warn!(group = %group.name, %err, "unable to list subgroups");
                        self.stats.failed_listings += 1;
                        Vec::new()
                    }
                };
                if !subgroups.is_empty() {
                    let nested = self.walk(&subgroups).await;
                    result.overwrite_all(nested);
                }

                if !group.is_default() {
                    continue;
                }

                let servers = match self.provider.list_servers(self.scope, group).await {
                    Ok(servers) => servers,
                    Err(err) => {
                        debug!(group = %group.name, %err, "skipping unreadable group");
                        self.stats.unreadable_groups += 1;
                        continue;
                    }
                };

                if !servers.is_empty() {
                    trace!(group = %group.name, servers = servers.len(), "group recorded");
                    result.record_group(self.datacenter, &group.name, servers);
                }
            }
            result
        }
        .boxed()
    }
}
