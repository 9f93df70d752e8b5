use crate::OutputFormat;
use clap::Parser;
use std::collections::HashMap;

/// Print the servers of every configured CLC account alias, grouped by
/// server group and datacenter.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Account alias to inventory. Repeat for several aliases; they are processed in order.
    #[arg(long = "alias", value_name = "ALIAS")]
    pub aliases: Vec<String>,

    /// Comma-separated, case-insensitive list of datacenters to include.
    #[arg(long, value_name = "DATACENTERS")]
    pub filter_datacenters: Option<String>,

    /// Number of concurrent server detail requests.
    #[arg(long, value_name = "COUNT")]
    pub hostvar_pool_size: Option<usize>,

    /// Base URL of the CLC v2 API.
    #[arg(long, value_name = "URL")]
    pub api_url: Option<url::Url>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::default())]
    pub format: OutputFormat,

    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long)]
    pub verbose: bool,
}

impl config::Source for Args {
    fn clone_into_box(&self) -> Box<dyn config::Source + Send + Sync> {
        Box::new((*self).clone())
    }

    fn collect(&self) -> Result<config::Map<String, config::Value>, config::ConfigError> {
        let mut cache = HashMap::<String, config::Value>::new();
        if !self.aliases.is_empty() {
            cache.insert("aliases".to_string(), self.aliases.clone().into());
        }
        if let Some(filter) = &self.filter_datacenters {
            cache.insert("filter_datacenters".to_string(), filter.clone().into());
        }
        if let Some(size) = self.hostvar_pool_size {
            cache.insert("hostvar_pool_size".to_string(), (size as u64).into());
        }
        if let Some(url) = &self.api_url {
            cache.insert("api_url".to_string(), url.to_string().into());
        }
        Ok(cache)
    }
}
