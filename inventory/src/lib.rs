//! Inventory aggregation for CLC accounts.
//!
//! For every account alias the engine
//!
//! 1. narrows the datacenters with a [`DatacenterFilter`],
//! 2. walks each datacenter's group tree ([`GroupTreeWalker`]) and merges the
//!    per-datacenter results into one [`GroupMapping`] ([`aggregate`]),
//! 3. extracts the distinct servers referenced by any group ([`extract_servers`]),
//! 4. fetches their detail records with bounded concurrency and folds them into
//!    [`HostVars`] ([`enrich`]),
//!
//! and returns the result as an [`InventoryDocument`]. [`Inventory`] drives
//! these stages for a list of aliases, one alias at a time.
//!
//! Unreadable groups and failing servers never abort a run. They are left out
//! of the result and counted in the per-alias [`ScopeReport`].

#[macro_use]
extern crate tracing;

mod aggregate;
mod datacenters;
mod document;
mod hostvars;
mod mapping;
mod orchestrator;
mod servers;
mod walker;

#[cfg(test)]
mod testing;

pub use aggregate::{
    aggregate,
    merge,
    Aggregation,
};
pub use datacenters::DatacenterFilter;
pub use document::{
    GroupHosts,
    InventoryDocument,
    META_KEY,
};
pub use hostvars::{
    enrich,
    EnrichmentReport,
    HostVar,
    HostVars,
    SkipReason,
    DEFAULT_POOL_SIZE,
};
pub use mapping::{
    qualified_key,
    GroupMapping,
};
pub use orchestrator::{
    Inventory,
    ScopeReport,
};
pub use servers::extract_servers;
pub use walker::{
    GroupTreeWalker,
    WalkStats,
};
