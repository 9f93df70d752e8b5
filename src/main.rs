use clap::Parser;
use clc_inventory::{
    init_errors,
    init_logging,
    App,
};
use clc_inventory_config::Args;
use color_eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    init_errors()?;
    let args = Args::parse();
    init_logging(args.verbose)?;

    App::new(args)?.run().await
}
