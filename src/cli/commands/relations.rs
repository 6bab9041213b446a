use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::identity::{IdentityDeriver, Label};
use crate::node::PublicNode;
use crate::query::StateQuery;
use clap::Args;
use std::sync::Arc;

/// Show leasing, sponsoring and association state from one label to another
#[derive(Args)]
pub struct RelationsCommand {
    /// Sending side, e.g. Alice
    pub from: String,

    /// Receiving side, e.g. Bob
    pub to: String,
}

impl RelationsCommand {
    pub async fn run(&self, config: &AppConfig) -> AppResult<()> {
        let identities = IdentityDeriver::from_config(config)?;
        let from = identities.account(&Label::new(self.from.as_str())).address().clone();
        let to = identities.account(&Label::new(self.to.as_str())).address().clone();
        let query = StateQuery::new(Arc::new(PublicNode::new(&config.node)?));

        println!("{} ({}) -> {} ({})", self.from, from, self.to, to);

        match query.lease_between(&from, &to).await? {
            Some(lease) => println!("  leasing:     yes (lease {}, {} minor units)", lease.id, lease.amount),
            None => println!("  leasing:     no"),
        }

        let sponsoring = query.is_sponsoring(&from, &to).await?;
        println!("  sponsoring:  {}", if sponsoring { "yes" } else { "no" });

        let associations = query.associations(&from, &to, None).await?;
        if associations.is_empty() {
            println!("  associated:  no");
        } else {
            for association in associations {
                println!(
                    "  associated:  type {}{}",
                    association.association_type,
                    association
                        .hash
                        .map(|h| format!(", anchor {}", h))
                        .unwrap_or_default()
                );
            }
        }

        Ok(())
    }
}
