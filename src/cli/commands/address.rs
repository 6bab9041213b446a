use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::identity::{IdentityDeriver, Label};
use crate::node::PublicNode;
use crate::query::StateQuery;
use crate::utils::currency::format_units;
use clap::Args;
use std::sync::Arc;
use tracing::info;

/// Print the seed and address derived for a label
#[derive(Args)]
pub struct AddressCommand {
    /// Account label, e.g. Alice
    pub label: String,
}

impl AddressCommand {
    pub fn run(&self, config: &AppConfig) -> AppResult<()> {
        let identities = IdentityDeriver::from_config(config)?;
        let label = Label::new(self.label.as_str());
        let account = identities.account(&label);

        println!("Label:      {}", label);
        println!("Seed:       {}", identities.seed(&label));
        println!("Address:    {}", account.address());
        println!("Public key: {}", account.public_key_base58());
        Ok(())
    }
}

/// Print the balance of a labelled account
#[derive(Args)]
pub struct BalanceCommand {
    /// Account label, e.g. Alice
    pub label: String,

    /// Node URL (overrides configuration)
    #[arg(long)]
    pub node_url: Option<String>,
}

impl BalanceCommand {
    pub async fn run(&self, config: &AppConfig) -> AppResult<()> {
        let mut node_config = config.node.clone();
        if let Some(url) = &self.node_url {
            node_config.url = url.clone();
        }

        let identities = IdentityDeriver::from_config(config)?;
        let address = identities
            .account(&Label::new(self.label.as_str()))
            .address()
            .clone();

        info!("Querying balance of {} at {}", address, node_config.url);
        let query = StateQuery::new(Arc::new(PublicNode::new(&node_config)?));
        let balance = query.balance(&address).await?;

        println!(
            "{} ({}): {} lto ({} minor units)",
            self.label,
            address,
            format_units(balance, config.amounts.minor_units_per_unit),
            balance
        );
        Ok(())
    }
}
