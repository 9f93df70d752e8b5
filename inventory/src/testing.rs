//! Scriptable in-memory [`Provider`] for engine tests.

use async_trait::async_trait;
use clc_client::{
    Datacenter,
    Error,
    FailureKind,
    Group,
    GroupType,
    Provider,
    Result,
    Scope,
    ServerId,
    ServerRecord,
};
use serde_json::json;
use std::{
    collections::{
        HashMap,
        HashSet,
    },
    sync::atomic::{
        AtomicUsize,
        Ordering,
    },
};

pub fn ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Vec<ServerId> {
    ids.into_iter().map(ServerId::from).collect()
}

pub fn default_group(id: &str, name: &str) -> Group {
    Group::new(id, name, GroupType::Default)
}

pub fn container_group(id: &str, name: &str) -> Group {
    Group::new(id, name, GroupType::Other("container".to_string()))
}

pub fn server_record(name: &str, internal: &[&str]) -> serde_json::Value {
    let addresses: Vec<_> = internal.iter().map(|ip| json!({ "internal": ip })).collect();
    json!({
        "id": name,
        "name": name,
        "status": "active",
        "details": { "ipAddresses": addresses }
    })
}

fn failure(kind: FailureKind, what: &str) -> Error {
    match kind {
        FailureKind::Provider => Error::provider(format!("{what} is not accessible")),
        FailureKind::ApiFailure => Error::ApiFailure {
            status: 500,
            message: format!("{what} failed"),
        },
        FailureKind::MalformedRecord => Error::MalformedRecord(format!("{what} is garbled")),
    }
}

enum FakeServer {
    Record(serde_json::Value),
    Fail(FailureKind),
}

#[derive(Default)]
pub struct FakeProvider {
    datacenters: HashMap<Scope, Vec<Datacenter>>,
    trees: HashMap<(Scope, String), Vec<Group>>,
    failing_listings: HashSet<Scope>,
    failing_trees: HashSet<(Scope, String)>,
    unreadable_groups: HashSet<String>,
    failing_subgroups: HashSet<String>,
    servers: HashMap<(Scope, ServerId), FakeServer>,
    detail_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_datacenter(mut self, scope: &str, datacenter: &str, groups: Vec<Group>) -> Self {
        let scope = Scope::from(scope);
        self.datacenters
            .entry(scope.clone())
            .or_default()
            .push(Datacenter::new(datacenter, format!("{datacenter} datacenter")));
        self.trees.insert((scope, datacenter.to_string()), groups);
        self
    }

    pub fn with_failing_listing(mut self, scope: &str) -> Self {
        self.failing_listings.insert(Scope::from(scope));
        self
    }

    pub fn with_failing_tree(mut self, scope: &str, datacenter: &str) -> Self {
        self.failing_trees.insert((Scope::from(scope), datacenter.to_string()));
        self
    }

    pub fn with_failing_subgroups(mut self, group_id: &str) -> Self {
        self.failing_subgroups.insert(group_id.to_string());
        self
    }

    pub fn with_unreadable_group(mut self, group_id: &str) -> Self {
        self.unreadable_groups.insert(group_id.to_string());
        self
    }

    pub fn with_server(self, scope: &str, name: &str, internal: &[&str]) -> Self {
        self.with_server_record(scope, name, server_record(name, internal))
    }

    pub fn with_server_record(mut self, scope: &str, id: &str, record: serde_json::Value) -> Self {
        self.servers
            .insert((Scope::from(scope), ServerId::from(id)), FakeServer::Record(record));
        self
    }

    pub fn with_failing_server(mut self, scope: &str, id: &str, kind: FailureKind) -> Self {
        self.servers
            .insert((Scope::from(scope), ServerId::from(id)), FakeServer::Fail(kind));
        self
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for FakeProvider {
    async fn list_datacenters(&self, scope: &Scope) -> Result<Vec<Datacenter>> {
        if self.failing_listings.contains(scope) {
            return Err(failure(FailureKind::ApiFailure, &format!("datacenters of {scope}")));
        }
        Ok(self.datacenters.get(scope).cloned().unwrap_or_default())
    }

    async fn list_top_groups(&self, scope: &Scope, datacenter: &Datacenter) -> Result<Vec<Group>> {
        let key = (scope.clone(), datacenter.id.clone());
        if self.failing_trees.contains(&key) {
            return Err(failure(FailureKind::Provider, &format!("root group of {datacenter}")));
        }
        Ok(self.trees.get(&key).cloned().unwrap_or_default())
    }

    async fn list_subgroups(&self, _scope: &Scope, group: &Group) -> Result<Vec<Group>> {
        if self.failing_subgroups.contains(&group.id) {
            return Err(failure(FailureKind::Provider, &format!("subgroups of {}", group.name)));
        }
        Ok(group.groups.clone())
    }

    async fn list_servers(&self, _scope: &Scope, group: &Group) -> Result<Vec<ServerId>> {
        if self.unreadable_groups.contains(&group.id) {
            return Err(failure(FailureKind::Provider, &format!("group {}", group.name)));
        }
        group.server_ids()
    }

    async fn fetch_server_detail(&self, scope: &Scope, server: &ServerId) -> Result<ServerRecord> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        // Give the other requests of the batch a chance to start.
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        match self.servers.get(&(scope.clone(), server.clone())) {
            Some(FakeServer::Record(record)) => Ok(ServerRecord::new(record.clone())),
            Some(FakeServer::Fail(kind)) => Err(failure(*kind, &format!("server {server}"))),
            None => Err(failure(FailureKind::ApiFailure, &format!("server {server}"))),
        }
    }
}
