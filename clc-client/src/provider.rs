use crate::{
    error::Result,
    model::{
        Datacenter,
        Group,
        Scope,
        ServerId,
        ServerRecord,
    },
};
use async_trait::async_trait;

/// Read-only view of a provider account hierarchy:
/// datacenters → nested server groups → servers.
///
/// Every call takes the [`Scope`] it operates in, so one provider value can
/// serve several account aliases.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn list_datacenters(&self, scope: &Scope) -> Result<Vec<Datacenter>>;

    /// Children of the datacenter's root group.
    async fn list_top_groups(&self, scope: &Scope, datacenter: &Datacenter) -> Result<Vec<Group>>;

    async fn list_subgroups(&self, _scope: &Scope, group: &Group) -> Result<Vec<Group>> {
        Ok(group.groups.clone())
    }

    /// Fails when the group cannot be read.
    async fn list_servers(&self, _scope: &Scope, group: &Group) -> Result<Vec<ServerId>> {
        group.server_ids()
    }

    async fn fetch_server_detail(&self, scope: &Scope, server: &ServerId) -> Result<ServerRecord>;
}
