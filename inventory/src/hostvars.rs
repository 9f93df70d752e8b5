use clc_client::{
    Error,
    FailureKind,
    Provider,
    Scope,
    Server,
    ServerId,
    ServerRecord,
};
use futures::{
    stream,
    StreamExt as _,
};
use serde::Serialize;
use std::collections::{
    btree_map,
    BTreeMap,
    BTreeSet,
};
use strum::{
    Display,
    EnumIter,
};

/// Concurrent server detail requests per batch.
pub const DEFAULT_POOL_SIZE: usize = 25;

/// Variables of one host in the inventory's `_meta` section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostVar {
    #[serde(rename = "ipAddress")]
    pub ip_address: String,
    #[serde(rename = "clc_data")]
    pub record: ServerRecord,
}

/// Server display name → [`HostVar`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HostVars(BTreeMap<String, HostVar>);

impl HostVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Display names are not guaranteed unique; the most recent insert wins.
    pub fn insert_latest(&mut self, name: impl Into<String>, var: HostVar) -> Option<HostVar> {
        let name = name.into();
        let replaced = self.0.insert(name.clone(), var);
        if replaced.is_some() {
            debug!(host = %name, "host name seen twice, keeping the most recent one");
        }
        replaced
    }

    pub fn get(&self, name: &str) -> Option<&HostVar> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, HostVar> {
        self.0.iter()
    }
}

/// Why a server is absent from the host variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum SkipReason {
    NoAddress,
    Provider,
    ApiFailure,
    MalformedRecord,
}

impl From<FailureKind> for SkipReason {
    fn from(kind: FailureKind) -> Self {
        match kind {
            FailureKind::Provider => Self::Provider,
            FailureKind::ApiFailure => Self::ApiFailure,
            FailureKind::MalformedRecord => Self::MalformedRecord,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentReport {
    pub hostvars: HostVars,
    pub skipped: BTreeMap<SkipReason, usize>,
}

impl EnrichmentReport {
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }

    pub fn skipped(&self, reason: SkipReason) -> usize {
        self.skipped.get(&reason).copied().unwrap_or_default()
    }
}

type TaskOutcome = Result<(String, HostVar), SkipReason>;

/// Fetches the detail record of every server, at most `pool_size` at a time,
/// and folds the results into [`HostVars`].
///
/// A failing server is skipped and counted, it never fails the batch. All
/// requests have finished when this returns.
///
/// Tasks share nothing but the provider, which is `Sync` and is only read:
/// every task issues its own request and owns its outcome until the
/// sequential fold. With [`clc_client::ClcClient`] the requests go through a
/// shared connection pool that keeps no per-session state (no cookies, the
/// bearer token is fixed before the batch starts).
pub async fn enrich(
    provider: &dyn Provider,
    scope: &Scope,
    servers: &BTreeSet<ServerId>,
    pool_size: usize,
) -> EnrichmentReport {
    let pool_size = pool_size.max(1);
    debug!(%scope, servers = servers.len(), pool_size, "fetching server details");

    let mut outcomes: Vec<(usize, TaskOutcome)> = stream::iter(servers.iter().enumerate())
        .map(|(index, server)| async move { (index, resolve(provider, scope, server).await) })
        .buffer_unordered(pool_size)
        .collect()
        .await;

    // Fold in request order so that name collisions resolve the same way every run.
    outcomes.sort_by_key(|(index, _)| *index);

    let mut report = EnrichmentReport::default();
    for (_, outcome) in outcomes {
        match outcome {
            Ok((name, var)) => {
                report.hostvars.insert_latest(name, var);
            }
            Err(reason) => *report.skipped.entry(reason).or_default() += 1,
        }
    }
    report
}

async fn resolve(provider: &dyn Provider, scope: &Scope, id: &ServerId) -> TaskOutcome {
    let skip = |err: Error| {
        debug!(server = %id, %err, "skipping server");
        SkipReason::from(err.kind())
    };

    let record = provider.fetch_server_detail(scope, id).await.map_err(skip)?;
    let server = Server::from_record(id.clone(), record).map_err(skip)?;
    let ip_address = match server.primary_internal_address().map_err(skip)? {
        Some(address) => address.to_string(),
        None => {
            trace!(server = %id, "server has no address");
            return Err(SkipReason::NoAddress);
        }
    };

    let name = server.name.clone();
    Ok((
        name,
        HostVar {
            ip_address,
            record: server.into_record(),
        },
    ))
}
