use crate::{
    aggregate::aggregate,
    datacenters::DatacenterFilter,
    document::InventoryDocument,
    hostvars::{
        enrich,
        SkipReason,
        DEFAULT_POOL_SIZE,
    },
    servers::extract_servers,
    walker::WalkStats,
};
use clc_client::{
    Datacenter,
    Provider,
    Scope,
};
use std::collections::BTreeMap;

/// Result of one alias's pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeReport {
    pub scope: Scope,
    pub document: InventoryDocument,
    /// Datacenters left after filtering.
    pub datacenters: Vec<Datacenter>,
    pub walk: WalkStats,
    /// Distinct servers found in any group.
    pub servers: usize,
    pub skipped: BTreeMap<SkipReason, usize>,
    /// Set when the datacenters of the alias could not be listed.
    pub error: Option<String>,
}

impl ScopeReport {
    fn empty(scope: Scope) -> Self {
        Self {
            scope,
            document: InventoryDocument::default(),
            datacenters: Vec::new(),
            walk: WalkStats::default(),
            servers: 0,
            skipped: BTreeMap::new(),
            error: None,
        }
    }

    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }
}

/// Runs the inventory stages for one alias after the other.
pub struct Inventory<'a> {
    provider: &'a dyn Provider,
    filter: DatacenterFilter,
    pool_size: usize,
}

impl<'a> Inventory<'a> {
    pub fn new(provider: &'a dyn Provider) -> Self {
        Self {
            provider,
            filter: DatacenterFilter::allow_all(),
            pool_size: DEFAULT_POOL_SIZE,
        }
    }

    pub fn with_filter(mut self, filter: DatacenterFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// One report per scope, in the given order. Scopes are processed
    /// strictly one after the other and their results are not merged.
    pub async fn collect(&self, scopes: &[Scope]) -> Vec<ScopeReport> {
        let mut reports = Vec::with_capacity(scopes.len());
        for scope in scopes {
            reports.push(self.collect_scope(scope).await);
        }
        reports
    }

    #[instrument(level = "info", skip_all, fields(scope = %scope))]
    pub async fn collect_scope(&self, scope: &Scope) -> ScopeReport {
        let mut report = ScopeReport::empty(scope.clone());

        let datacenters = match self.provider.list_datacenters(scope).await {
            Ok(datacenters) => datacenters,
            Err(err) => {
                error!(%err, "unable to list datacenters");
                report.error = Some(err.to_string());
                return report;
            }
        };
        let datacenters = self.filter.apply(datacenters);
        info!(
            datacenters = %datacenters.iter().map(ToString::to_string).collect::<Vec<_>>().join(","),
            "walking group trees"
        );

        let aggregation = aggregate(self.provider, scope, &datacenters).await;
        let servers = extract_servers(&aggregation.mapping);
        let enrichment = enrich(self.provider, scope, &servers, self.pool_size).await;

        info!(
            contributing = %aggregation.contributing.iter().map(ToString::to_string).collect::<Vec<_>>().join(","),
            groups = aggregation.mapping.len(),
            servers = servers.len(),
            hosts = enrichment.hostvars.len(),
            skipped = enrichment.skipped_total(),
            unreadable_groups = aggregation.stats.unreadable_groups,
            failed_listings = aggregation.stats.failed_listings,
            "alias collected"
        );
        for (reason, count) in &enrichment.skipped {
            debug!(%reason, count, "servers skipped");
        }

        report.datacenters = datacenters;
        report.walk = aggregation.stats;
        report.servers = servers.len();
        report.skipped = enrichment.skipped;
        report.document = InventoryDocument::new(aggregation.mapping, enrichment.hostvars);
        report
    }
}
