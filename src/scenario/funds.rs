//! Balance, transfer and anchor steps

use super::world::{check, ScenarioWorld};
use crate::errors::{StepError, StepResult};
use crate::identity::Label;
use crate::ledger::TransactionKind;
use crate::utils::currency::format_units;
use tracing::info;

impl ScenarioWorld {
    /// Top `user` up from the root account until it holds at least `minimum`
    pub async fn ensure_funds(&mut self, user: &Label, minimum: u64) -> StepResult<()> {
        let address = self.address(user);
        let balance = self.query.balance(&address).await?;
        if balance >= minimum {
            return Ok(());
        }

        let root = self.identities.root();
        if root.address() == &address {
            return Err(StepError::Assertion(format!(
                "root account {} holds {} and cannot fund itself",
                address,
                self.units(balance)
            )));
        }

        let shortfall = minimum - balance;
        info!("Funding {} ({}) with {}", user, address, self.units(shortfall));
        self.submitter
            .transfer(&root, &address, shortfall, &mut self.outcome)
            .await?;
        Ok(())
    }

    /// Make sure `user` can pay the fee for `kind` plus `extra`
    pub(super) async fn fund_for(
        &mut self,
        user: &Label,
        kind: TransactionKind,
        extra: u64,
    ) -> StepResult<()> {
        let needed = self.submitter.fee_for(kind).saturating_add(extra);
        self.ensure_funds(user, needed).await
    }

    pub(super) async fn assert_balance(&self, user: &Label, expected: u64) -> StepResult<()> {
        let balance = self.query.balance(&self.address(user)).await?;
        check(balance == expected, || {
            format!(
                "{} has {}, expected {}",
                user,
                self.units(balance),
                self.units(expected)
            )
        })
    }

    pub(super) async fn transfer(&mut self, from: &Label, to: &Label, amount: &str) -> StepResult<()> {
        let amount = self.minor_units(amount)?;
        let sender = self.account(from);
        let recipient = self.address(to);
        self.submitter
            .transfer(&sender, &recipient, amount, &mut self.outcome)
            .await?;
        Ok(())
    }

    pub(super) async fn anchor(&mut self, user: &Label, source: Option<&str>) -> StepResult<()> {
        let sender = self.account(user);
        self.submitter
            .anchor(&sender, source, &mut self.outcome)
            .await?;
        Ok(())
    }

    fn units(&self, minor: u64) -> String {
        format_units(minor, self.config.amounts.minor_units_per_unit)
    }
}
