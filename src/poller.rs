//! Fixed-interval polling against an eventually consistent node
//!
//! A broadcast accepted by the node is not immediately visible to its read
//! endpoints. [`Poller`] re-issues a query every `interval` until a check
//! passes or `timeout` has elapsed. Query errors end the loop at once; only
//! "not yet" answers are retried.

use crate::config::PollingConfig;
use crate::errors::{NodeResult, PollError};
use crate::node::{is_confirmed, NodeApi};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

/// Fixed-interval poll loop with a wait budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Poller {
    interval: Duration,
    timeout: Duration,
}

impl Default for Poller {
    fn default() -> Self {
        Self::from_config(&PollingConfig::default())
    }
}

impl Poller {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    pub fn from_config(config: &PollingConfig) -> Self {
        Self::new(config.interval(), config.timeout())
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `query` until `check` accepts its result
    ///
    /// Returns the accepted value, the first query error, or
    /// [`PollError::Timeout`] once the budget is spent. Never retries
    /// after an error.
    pub async fn poll_until<T, F, Fut, C>(
        &self,
        what: &str,
        mut query: F,
        check: C,
    ) -> Result<T, PollError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = NodeResult<T>>,
        C: Fn(&T) -> bool,
    {
        let started = Instant::now();
        let mut attempts: u64 = 0;

        loop {
            attempts += 1;
            let value = query().await?;
            if check(&value) {
                debug!(
                    "{} ready after {} attempts ({:?})",
                    what,
                    attempts,
                    started.elapsed()
                );
                return Ok(value);
            }

            let elapsed = started.elapsed();
            if elapsed >= self.timeout {
                return Err(PollError::Timeout {
                    what: what.to_string(),
                    waited_seconds: elapsed.as_secs(),
                });
            }

            debug!("{} not ready (attempt {}), retrying in {:?}", what, attempts, self.interval);
            sleep(self.interval).await;
        }
    }

    /// Wait until the node reports the transaction; returns its status body
    pub async fn wait_for_transaction<N>(&self, node: &N, id: &str) -> Result<Value, PollError>
    where
        N: NodeApi + ?Sized,
    {
        let info = self
            .poll_until(
                &format!("transaction {}", id),
                || node.transaction_info(id),
                is_confirmed,
            )
            .await?;
        info!("Transaction {} confirmed", id);
        Ok(info)
    }

    /// Wait until the node answers its root endpoint
    pub async fn wait_until_up<N>(&self, node: &N) -> Result<(), PollError>
    where
        N: NodeApi + ?Sized,
    {
        self.poll_until("node", || node.is_up(), |up| *up).await?;
        Ok(())
    }
}
