use eyre::{
    Context as _,
    Result,
};
use tracing_subscriber::{
    fmt,
    prelude::*,
    EnvFilter,
};

const CRATES: [&str; 4] = [
    "clc_inventory",
    "clc_inventory_config",
    "clc_inventory_engine",
    "clc_client",
];

/// Logs go to stderr, stdout carries the inventory. `RUST_LOG` overrides the
/// default levels.
pub fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives = CRATES.iter().map(|krate| format!("{krate}={level}")).collect::<Vec<_>>();
        EnvFilter::new(format!("warn,{}", directives.join(",")))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_filter(filter))
        .with(tracing_error::ErrorLayer::default())
        .try_init()
        .context("Failed to initialize tracing subscriber")
}
