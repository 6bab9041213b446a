//! Sponsorship steps

use super::world::{check, ScenarioWorld};
use crate::errors::StepResult;
use crate::identity::Label;
use crate::ledger::TransactionKind;

impl ScenarioWorld {
    /// Establish (or end) `sponsor` sponsoring `sponsored`, acting only when needed
    pub(super) async fn ensure_sponsoring(
        &mut self,
        sponsor: &Label,
        sponsored: &Label,
        sponsoring: bool,
    ) -> StepResult<()> {
        let sender = self.account(sponsor);
        let recipient = self.address(sponsored);

        if self.query.is_sponsoring(sender.address(), &recipient).await? == sponsoring {
            return Ok(());
        }

        if sponsoring {
            self.fund_for(sponsor, TransactionKind::Sponsorship, 0).await?;
            self.submitter
                .sponsor(&sender, &recipient, &mut self.outcome)
                .await?;
        } else {
            self.fund_for(sponsor, TransactionKind::CancelSponsorship, 0)
                .await?;
            self.submitter
                .cancel_sponsorship(&sender, &recipient, &mut self.outcome)
                .await?;
        }

        self.assert_sponsoring(sponsor, sponsored, sponsoring).await
    }

    pub(super) async fn assert_sponsoring(
        &self,
        sponsor: &Label,
        sponsored: &Label,
        sponsoring: bool,
    ) -> StepResult<()> {
        let actual = self
            .query
            .is_sponsoring(&self.address(sponsor), &self.address(sponsored))
            .await?;
        check(actual == sponsoring, || {
            format!(
                "{} is {}sponsoring {}",
                sponsor,
                if actual { "" } else { "not " },
                sponsored
            )
        })
    }

    pub(super) async fn sponsor(&mut self, sponsor: &Label, sponsored: &Label) -> StepResult<()> {
        let sender = self.account(sponsor);
        let recipient = self.address(sponsored);
        self.submitter
            .sponsor(&sender, &recipient, &mut self.outcome)
            .await?;
        Ok(())
    }

    pub(super) async fn cancel_sponsorship(
        &mut self,
        sponsor: &Label,
        sponsored: &Label,
    ) -> StepResult<()> {
        let sender = self.account(sponsor);
        let recipient = self.address(sponsored);
        self.submitter
            .cancel_sponsorship(&sender, &recipient, &mut self.outcome)
            .await?;
        Ok(())
    }
}
