//! Client side of the CLC v2 API as far as inventory discovery needs it.
//!
//! The [`Provider`] trait is the seam between the inventory engine and the
//! cloud: datacenters, their group trees, group memberships and per-server
//! detail records. [`ClcClient`] implements it over HTTP.

#[macro_use]
extern crate tracing;

mod error;
mod http;
mod model;
mod provider;

pub use error::{
    Error,
    FailureKind,
    Result,
};
pub use http::{
    ClcClient,
    Login,
    DEFAULT_API_URL,
};
pub use model::{
    Datacenter,
    Group,
    GroupType,
    IpAddress,
    Link,
    Scope,
    Server,
    ServerId,
    ServerRecord,
};
pub use provider::Provider;
