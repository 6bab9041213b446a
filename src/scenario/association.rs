//! Association steps

use super::world::{check, ScenarioWorld};
use crate::errors::StepResult;
use crate::identity::Label;
use crate::ledger::{TransactionKind, DEFAULT_VERSION};
use crate::node::AssociationEntry;

impl ScenarioWorld {
    /// Active associations from `sender` to `party`, any type unless given
    pub async fn associations(
        &self,
        sender: &Label,
        party: &Label,
        association_type: Option<u64>,
    ) -> StepResult<Vec<AssociationEntry>> {
        Ok(self
            .query
            .associations(&self.address(sender), &self.address(party), association_type)
            .await?)
    }

    /// Establish (or revoke) an association of one type, acting only when needed
    pub(super) async fn ensure_association(
        &mut self,
        sender: &Label,
        party: &Label,
        association_type: u64,
        anchor: Option<&str>,
        associated: bool,
    ) -> StepResult<()> {
        let existing = self
            .associations(sender, party, Some(association_type))
            .await?;
        if existing.is_empty() != associated {
            return Ok(());
        }

        if associated {
            self.fund_for(sender, TransactionKind::Association, 0).await?;
            self.issue_association(sender, party, association_type, anchor, None)
                .await?;
        } else {
            self.fund_for(sender, TransactionKind::RevokeAssociation, 0)
                .await?;
            self.revoke_association(sender, party, association_type, None, None)
                .await?;
        }

        let now = self
            .associations(sender, party, Some(association_type))
            .await?;
        check(now.is_empty() != associated, || {
            if associated {
                format!("Failed to issue association from {} to {}", sender, party)
            } else {
                format!("Failed to revoke association from {} to {}", sender, party)
            }
        })
    }

    pub(super) async fn assert_associated(
        &self,
        sender: &Label,
        party: &Label,
        associated: bool,
    ) -> StepResult<()> {
        let found = self.associations(sender, party, None).await?;
        check(found.is_empty() != associated, || {
            if associated {
                format!(
                    "{} is not associated with {}",
                    self.address(sender),
                    self.address(party)
                )
            } else {
                format!("{} is still associated with {}: {:?}", sender, party, found)
            }
        })
    }

    pub(super) async fn issue_association(
        &mut self,
        sender: &Label,
        party: &Label,
        association_type: u64,
        anchor: Option<&str>,
        version: Option<u8>,
    ) -> StepResult<()> {
        let account = self.account(sender);
        let party = self.address(party);
        self.submitter
            .associate(
                &account,
                &party,
                association_type,
                anchor,
                version.unwrap_or(DEFAULT_VERSION),
                &mut self.outcome,
            )
            .await?;
        Ok(())
    }

    pub(super) async fn revoke_association(
        &mut self,
        sender: &Label,
        party: &Label,
        association_type: u64,
        anchor: Option<&str>,
        version: Option<u8>,
    ) -> StepResult<()> {
        let account = self.account(sender);
        let party = self.address(party);
        self.submitter
            .revoke_association(
                &account,
                &party,
                association_type,
                anchor,
                version.unwrap_or(DEFAULT_VERSION),
                &mut self.outcome,
            )
            .await?;
        Ok(())
    }
}
