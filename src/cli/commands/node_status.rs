use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::node::PublicNode;
use crate::poller::Poller;
use clap::Args;
use std::time::Duration;
use tracing::{error, info};

/// Wait for the node to answer its liveness probe
#[derive(Args)]
pub struct NodeStatusCommand {
    /// Node URL (overrides configuration)
    #[arg(long)]
    pub node_url: Option<String>,

    /// Seconds to keep probing before giving up
    #[arg(long, default_value = "10")]
    pub timeout: u64,
}

impl NodeStatusCommand {
    pub async fn run(&self, config: &AppConfig) -> AppResult<()> {
        let mut node_config = config.node.clone();
        if let Some(url) = &self.node_url {
            node_config.url = url.clone();
        }

        info!("Probing node at {}", node_config.url);
        let node = PublicNode::new(&node_config)?;
        let poller = Poller::new(
            config.polling.interval(),
            Duration::from_secs(self.timeout),
        );

        match poller.wait_until_up(&node).await {
            Ok(()) => {
                println!("Node at {} is UP", node_config.url);
                Ok(())
            }
            Err(e) => {
                error!("Node did not come up: {}", e);
                println!("Node at {} is DOWN", node_config.url);
                println!("\nTroubleshooting tips:");
                println!("1. Check that the node is running");
                println!("2. Verify the node URL and port are correct");
                println!("3. Ensure the REST API is enabled on the node");
                Err(e.into())
            }
        }
    }
}
