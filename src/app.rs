use crate::output;
use clc_client::{
    ClcClient,
    Scope,
};
use clc_inventory_config::{
    Args,
    Config,
    Credentials,
    OutputFormat,
};
use clc_inventory_engine::{
    DatacenterFilter,
    Inventory,
};
use color_eyre::Result;
use eyre::Context as _;

pub struct App {
    config: Config,
    format: OutputFormat,
}

impl App {
    pub fn new(args: Args) -> Result<Self> {
        let format = args.format;
        let config = Config::new(args).context("Failed to load configuration")?;
        config.validate()?;
        Ok(Self { config, format })
    }

    /// Collects every configured alias and prints the result. Skipped
    /// servers and unreadable groups do not make the run fail.
    pub async fn run(self) -> Result<()> {
        let (client, scopes) = self.connect().await?;

        let filter = DatacenterFilter::parse(self.config.filter_datacenters.as_deref());
        if filter.is_configured() {
            info!(filter = ?self.config.filter_datacenters, "restricting datacenters");
        }

        let reports = Inventory::new(&client)
            .with_filter(filter)
            .with_pool_size(self.config.hostvar_pool_size)
            .collect(&scopes)
            .await;

        for report in &reports {
            match &report.error {
                Some(err) => warn!(alias = %report.scope, %err, "alias produced no inventory"),
                None if report.skipped_total() > 0 || report.walk.failed_listings > 0 => info!(
                    alias = %report.scope,
                    skipped_servers = report.skipped_total(),
                    unreadable_groups = report.walk.unreadable_groups,
                    failed_listings = report.walk.failed_listings,
                    "inventory is incomplete"
                ),
                None => {}
            }
        }

        let mut stdout = std::io::stdout().lock();
        output::write_reports(&mut stdout, self.format, &reports)
    }

    /// Builds an authenticated client and the ordered list of aliases.
    async fn connect(&self) -> Result<(ClcClient, Vec<Scope>)> {
        let client = ClcClient::new(self.config.api_url.clone());
        let mut scopes: Vec<Scope> = self.config.aliases.iter().map(|alias| Scope::new(alias.as_str())).collect();

        let client = match self.config.credentials() {
            Some(Credentials::Token { token }) => {
                debug!("authenticating with API token");
                client.with_bearer_token(token)
            }
            Some(Credentials::Password { username, password }) => {
                let (client, login) = client
                    .login(&username, &password)
                    .await
                    .wrap_err_with(|| format!("Failed to log in to {} as {username}", self.config.api_url))?;
                if scopes.is_empty() {
                    info!(alias = %login.account_alias, "no alias configured, using the account of the login");
                    scopes.push(login.account_alias);
                }
                client
            }
            None => {
                warn!("no CLC credentials configured, requests are sent unauthenticated");
                client
            }
        };

        Ok((client, scopes))
    }
}
