use crate::{
    hostvars::HostVars,
    mapping::GroupMapping,
};
use clc_client::ServerId;
use serde::Serialize;
use std::collections::BTreeMap;

/// Reserved top-level key of the host variables.
pub const META_KEY: &str = "_meta";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupHosts {
    pub hosts: Vec<ServerId>,
}

/// Dynamic inventory of one alias:
///
/// ```json
/// {
///   "webservers": { "hosts": ["WA1ABC01"] },
///   "WA1_webservers": { "hosts": ["WA1ABC01"] },
///   "_meta": { "WA1ABC01": { "ipAddress": "10.0.0.1", "clc_data": { ... } } }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventoryDocument {
    #[serde(flatten)]
    pub groups: BTreeMap<String, GroupHosts>,
    #[serde(rename = "_meta")]
    pub meta: HostVars,
}

impl InventoryDocument {
    pub fn new(mapping: GroupMapping, meta: HostVars) -> Self {
        let groups = mapping
            .into_iter()
            .filter(|(group, _)| {
                let reserved = group == META_KEY;
                if reserved {
                    warn!("a server group is named {META_KEY:?}, leaving it out of the inventory");
                }
                !reserved
            })
            .map(|(group, hosts)| (group, GroupHosts { hosts }))
            .collect();
        Self { groups, meta }
    }

    pub fn hosts(&self, group: &str) -> Option<&[ServerId]> {
        self.groups.get(group).map(|group| group.hosts.as_slice())
    }
}
