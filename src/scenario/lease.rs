//! Lease steps

use super::world::{check, ScenarioWorld};
use crate::errors::StepResult;
use crate::identity::Label;
use crate::ledger::{TransactionIntent, TransactionKind};
use tracing::info;

impl ScenarioWorld {
    /// Establish (or remove) a lease from `from` to `to`, acting only when needed
    pub(super) async fn ensure_leasing(
        &mut self,
        from: &Label,
        to: &Label,
        leasing: bool,
    ) -> StepResult<()> {
        let sender = self.account(from);
        let recipient = self.address(to);

        if leasing {
            if self.query.is_leasing(sender.address(), &recipient).await? {
                return Ok(());
            }
            let amount = self.config.amounts.default_lease;
            self.fund_for(from, TransactionKind::Lease, amount).await?;
            self.submitter
                .lease(&sender, &recipient, amount, &mut self.outcome)
                .await?;
        } else {
            let leases = self.query.leases_to(sender.address(), &recipient).await?;
            if leases.is_empty() {
                return Ok(());
            }
            info!("Cancelling {} leases from {} to {}", leases.len(), from, to);
            for lease in leases {
                self.fund_for(from, TransactionKind::CancelLease, 0).await?;
                let intent = TransactionIntent::CancelLease { lease_id: lease.id };
                self.submitter
                    .submit(&sender, intent, &mut self.outcome)
                    .await?;
            }
        }

        self.assert_leasing(from, to, leasing).await
    }

    pub(super) async fn assert_leasing(&self, from: &Label, to: &Label, leasing: bool) -> StepResult<()> {
        let actual = self
            .query
            .is_leasing(&self.address(from), &self.address(to))
            .await?;
        check(actual == leasing, || {
            format!(
                "{} is {}leasing to {}",
                from,
                if actual { "" } else { "not " },
                to
            )
        })
    }

    pub(super) async fn lease(&mut self, from: &Label, to: &Label, amount: &str) -> StepResult<()> {
        let amount = self.minor_units(amount)?;
        let sender = self.account(from);
        let recipient = self.address(to);
        self.submitter
            .lease(&sender, &recipient, amount, &mut self.outcome)
            .await?;
        Ok(())
    }

    pub(super) async fn cancel_lease(&mut self, from: &Label, to: &Label) -> StepResult<()> {
        let sender = self.account(from);
        let recipient = self.address(to);
        self.submitter
            .cancel_lease(&sender, &recipient, &self.query, &mut self.outcome)
            .await?;
        Ok(())
    }
}
