#[macro_use]
extern crate tracing;

mod app_config;
mod args;
mod credentials;
mod output_format;

use app_config::ENV_PREFIX;
pub use app_config::get_config_dir;
pub use args::Args;
use color_eyre::Result;
pub use credentials::Credentials;
pub use output_format::{
    OutputFormat,
    OutputFormatIter,
};
use serde::{
    Deserialize,
    Deserializer,
    Serialize,
};
use std::path::{
    Path,
    PathBuf,
};

pub const DEFAULT_HOSTVAR_POOL_SIZE: usize = 25;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing)]
    pub config_dir: PathBuf,
    pub api_url: url::Url,
    /// Account aliases, processed in this order.
    #[serde(default, deserialize_with = "comma_separated")]
    pub aliases: Vec<String>,
    /// Comma-separated, case-insensitive datacenter allow-list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_datacenters: Option<String>,
    #[serde(default, skip_serializing)]
    pub v2_api_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v2_api_username: Option<String>,
    #[serde(default, skip_serializing)]
    pub v2_api_passwd: Option<String>,
    #[serde(default = "default_pool_size")]
    pub hostvar_pool_size: usize,
}

const DEFAULT_CONFIG: &str = include_str!("default-config.yaml");

impl Default for Config {
    fn default() -> Self {
        serde_yml::from_str(DEFAULT_CONFIG).expect("Failed to parse default config")
    }
}

fn default_pool_size() -> usize {
    DEFAULT_HOSTVAR_POOL_SIZE
}

/// Accepts both a list and a comma-separated string, so that `CLC_ALIASES=a,b`
/// and a YAML sequence deserialize the same way.
fn comma_separated<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        String(String),
        List(Vec<String>),
    }

    let items = match StringOrList::deserialize(deserializer)? {
        StringOrList::String(value) => value.split(',').map(str::to_string).collect(),
        StringOrList::List(values) => values,
    };
    Ok(items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect())
}

impl Config {
    /// Layers, lowest precedence first: built-in defaults, `config.yaml` in
    /// the config dir, `CLC_*` environment variables, command-line args.
    pub fn new(args: Args) -> Result<Self, config::ConfigError> {
        let config_dir = get_config_dir();
        Self::load(args, &config_dir, config::Environment::with_prefix(ENV_PREFIX))
    }

    fn load(args: Args, config_dir: &Path, environment: config::Environment) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Yaml));

        let config_files = [("config.yaml", config::FileFormat::Yaml)];

        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
        }

        builder = builder.add_source(environment).add_source(args);

        let cfg: Self = builder.build()?.try_deserialize()?;
        debug!(
            api_url = %cfg.api_url,
            aliases = ?cfg.aliases,
            filter = ?cfg.filter_datacenters,
            pool = cfg.hostvar_pool_size,
            "configuration loaded"
        );

        Ok(cfg)
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn credentials(&self) -> Option<Credentials> {
        Credentials::resolve(self)
    }

    /// # Errors
    /// Returns an error for settings no run can succeed with.
    pub fn validate(&self) -> Result<()> {
        if self.hostvar_pool_size == 0 {
            return Err(eyre::eyre!("hostvar_pool_size must be at least 1"));
        }
        if !matches!(self.api_url.scheme(), "http" | "https") {
            return Err(eyre::eyre!("api_url must be an http(s) URL, got {}", self.api_url));
        }
        if self.aliases.is_empty() && !matches!(self.credentials(), Some(Credentials::Password { .. })) {
            return Err(eyre::eyre!(
                "no alias configured: set CLC_ALIASES or pass --alias, or provide CLC_V2_API_USERNAME and \
                 CLC_V2_API_PASSWD to use the login's account alias"
            ));
        }
        Ok(())
    }
}
