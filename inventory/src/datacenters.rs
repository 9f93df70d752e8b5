use clc_client::Datacenter;
use std::collections::BTreeSet;

/// Case-insensitive datacenter allow-list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatacenterFilter {
    allowed: Option<BTreeSet<String>>,
}

impl DatacenterFilter {
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Parses a comma-separated list such as `"WA1,uc1"`.
    ///
    /// An unset or empty list lets every datacenter through. Entries are
    /// trimmed; blank entries match nothing.
    pub fn parse(list: Option<&str>) -> Self {
        let allowed = list.filter(|list| !list.is_empty()).map(|list| {
            list.split(',')
                .map(|entry| entry.trim().to_uppercase())
                .filter(|entry| !entry.is_empty())
                .collect()
        });
        Self { allowed }
    }

    pub fn is_configured(&self) -> bool {
        self.allowed.is_some()
    }

    pub fn allows(&self, datacenter: &Datacenter) -> bool {
        match &self.allowed {
            Some(allowed) => allowed.contains(&datacenter.to_string().to_uppercase()),
            None => true,
        }
    }

    /// Keeps the allowed datacenters, in their original order.
    pub fn apply(&self, datacenters: Vec<Datacenter>) -> Vec<Datacenter> {
        if !self.is_configured() {
            return datacenters;
        }
        datacenters
            .into_iter()
            .filter(|datacenter| {
                let allowed = self.allows(datacenter);
                if !allowed {
                    trace!(%datacenter, "datacenter filtered out");
                }
                allowed
            })
            .collect()
    }
}
