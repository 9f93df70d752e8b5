use crate::error::{
    Error,
    Result,
};
use derive_more::{
    Deref,
    Display,
    From,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::fmt;

/// Account alias selecting which datacenters, groups and servers are visible.
///
/// Passed explicitly into every provider call, there is no "current" alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Deref, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(String);

impl Scope {
    pub fn new(alias: impl Into<String>) -> Self {
        Self(alias.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Scope {
    fn from(alias: &str) -> Self {
        Self::new(alias)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Deref, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerId(String);

impl ServerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ServerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datacenter {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl Datacenter {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// The datacenter id is its namespace prefix, e.g. `WA1`.
impl fmt::Display for Datacenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Link {
    pub fn server(id: impl Into<String>) -> Self {
        Self {
            rel: "server".to_string(),
            href: None,
            id: Some(id.into()),
        }
    }
}

/// Only `default` groups hold servers directly, everything else is a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GroupType {
    Default,
    Other(String),
}

impl From<String> for GroupType {
    fn from(value: String) -> Self {
        if value == "default" {
            Self::Default
        } else {
            Self::Other(value)
        }
    }
}

impl From<GroupType> for String {
    fn from(value: GroupType) -> Self {
        match value {
            GroupType::Default => "default".to_string(),
            GroupType::Other(other) => other,
        }
    }
}

/// A server group as returned by `GET groups/{alias}/{id}`.
///
/// The API embeds the full subtree in `groups`. Member servers are the
/// `links` with `rel == "server"`; a record without `links` could not be
/// read in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: GroupType,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: GroupType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            groups: Vec::new(),
            links: Some(Vec::new()),
        }
    }

    pub fn with_subgroups(mut self, groups: impl IntoIterator<Item = Group>) -> Self {
        self.groups.extend(groups);
        self
    }

    pub fn with_servers<S: Into<String>>(mut self, servers: impl IntoIterator<Item = S>) -> Self {
        self.links
            .get_or_insert_with(Vec::new)
            .extend(servers.into_iter().map(Link::server));
        self
    }

    pub fn is_default(&self) -> bool {
        self.kind == GroupType::Default
    }

    /// Member server ids in the order the API listed them.
    pub fn server_ids(&self) -> Result<Vec<ServerId>> {
        let links = self
            .links
            .as_ref()
            .ok_or_else(|| Error::provider(format!("group {} ({}) is not readable", self.name, self.id)))?;
        Ok(links
            .iter()
            .filter(|link| link.rel == "server")
            .filter_map(|link| link.id.as_deref())
            .map(ServerId::from)
            .collect())
    }
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

/// Untouched server detail document, kept verbatim for the host variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerRecord(serde_json::Value);

impl ServerRecord {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IpAddress {
    #[serde(default)]
    pub internal: Option<String>,
    #[serde(default)]
    pub public: Option<String>,
}

#[derive(Deserialize)]
struct ServerFields {
    name: String,
    details: ServerDetails,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerDetails {
    ip_addresses: Vec<IpAddress>,
}

/// Typed view over a [`ServerRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct Server {
    pub id: ServerId,
    pub name: String,
    pub ip_addresses: Vec<IpAddress>,
    record: ServerRecord,
}

impl Server {
    pub fn from_record(id: ServerId, record: ServerRecord) -> Result<Self> {
        let fields = ServerFields::deserialize(record.as_value())
            .map_err(|err| Error::MalformedRecord(format!("server {id}: {err}")))?;
        Ok(Self {
            id,
            name: fields.name,
            ip_addresses: fields.details.ip_addresses,
            record,
        })
    }

    /// The internal address of the first entry in the address list.
    ///
    /// `Ok(None)` for a server without any address. An entry without an
    /// `internal` field is a malformed record.
    pub fn primary_internal_address(&self) -> Result<Option<&str>> {
        let Some(first) = self.ip_addresses.first() else {
            return Ok(None);
        };
        first
            .internal
            .as_deref()
            .map(Some)
            .ok_or_else(|| Error::MalformedRecord(format!("server {}: first address has no internal ip", self.id)))
    }

    pub fn record(&self) -> &ServerRecord {
        &self.record
    }

    pub fn into_record(self) -> ServerRecord {
        self.record
    }
}
