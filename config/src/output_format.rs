use serde::{
    Deserialize,
    Serialize,
};
use strum::{
    Display,
    EnumIter,
    EnumString,
};

/// How the collected inventory is written to stdout.
#[derive(
    Debug, Default, Clone, Copy, Display, EnumIter, EnumString, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum OutputFormat {
    /// Host name and address, each on its own line.
    #[default]
    Pairs,
    /// `Host`/`HostName` blocks for `~/.ssh/config`.
    SshConfig,
    /// The full inventory document per alias.
    Json,
}
