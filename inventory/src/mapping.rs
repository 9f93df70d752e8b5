use clc_client::{
    Datacenter,
    ServerId,
};
use std::collections::{
    btree_map,
    BTreeMap,
};

/// Group key → member servers.
///
/// A group's list is exactly what the provider returned for it; parents do
/// not inherit the members of their subgroups. Ordered by key, so two
/// mappings compare (and sort) by content.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct GroupMapping(BTreeMap<String, Vec<ServerId>>);

/// `<DATACENTER>_<group>`, with the datacenter upper-cased.
pub fn qualified_key(datacenter: &Datacenter, group: &str) -> String {
    format!("{}_{}", datacenter.to_string().to_uppercase(), group)
}

impl GroupMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&[ServerId]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &[ServerId]> {
        self.0.values().map(Vec::as_slice)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<ServerId>> {
        self.0.iter()
    }

    /// Stores `hosts` under `key`, replacing whatever was there.
    ///
    /// Conflict policy for same-named groups within one datacenter: the
    /// group visited last wins. Returns the replaced list.
    pub fn overwrite(&mut self, key: impl Into<String>, hosts: Vec<ServerId>) -> Option<Vec<ServerId>> {
        let key = key.into();
        let replaced = self.0.insert(key.clone(), hosts);
        if replaced.is_some() {
            debug!(group = %key, "group name seen twice, keeping the most recent one");
        }
        replaced
    }

    /// [`GroupMapping::overwrite`] for every entry of `other`.
    pub fn overwrite_all(&mut self, other: GroupMapping) {
        for (key, hosts) in other.0 {
            self.overwrite(key, hosts);
        }
    }

    /// Concatenates `hosts` to the list under `key`. Duplicates are kept.
    pub fn append(&mut self, key: impl Into<String>, hosts: Vec<ServerId>) {
        self.0.entry(key.into()).or_default().extend(hosts);
    }

    /// [`GroupMapping::append`] for every entry of `other`.
    pub fn append_all(&mut self, other: GroupMapping) {
        for (key, hosts) in other.0 {
            self.append(key, hosts);
        }
    }

    /// Records a readable group under its bare and its datacenter-qualified name.
    pub fn record_group(&mut self, datacenter: &Datacenter, name: &str, hosts: Vec<ServerId>) {
        self.overwrite(qualified_key(datacenter, name), hosts.clone());
        self.overwrite(name, hosts);
    }

    /// Number of memberships, counting a server once per group key.
    pub fn membership_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

impl IntoIterator for GroupMapping {
    type Item = (String, Vec<ServerId>);
    type IntoIter = btree_map::IntoIter<String, Vec<ServerId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<ServerId>)> for GroupMapping {
    fn from_iter<T: IntoIterator<Item = (K, Vec<ServerId>)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(key, hosts)| (key.into(), hosts)).collect())
    }
}
