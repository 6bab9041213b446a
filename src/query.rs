//! Single-shot reads of relationship state
//!
//! Every query fetches one list from the node and scans it linearly for the
//! counterpart address. There is no retry here; waiting for a transaction to
//! become visible is the poller's job.

use crate::errors::{QueryError, QueryResult};
use crate::ledger::Address;
use crate::node::{AssociationEntry, LeaseEntry, NodeApi};
use std::sync::Arc;
use tracing::debug;

/// First lease in `leases` whose recipient is `recipient`
pub fn find_lease<'a>(leases: &'a [LeaseEntry], recipient: &Address) -> Option<&'a LeaseEntry> {
    leases.iter().find(|lease| *recipient == lease.recipient)
}

/// Unrevoked outgoing associations with `party`, optionally of one type,
/// annotated with `sender`
pub fn active_associations(
    outgoing: Vec<AssociationEntry>,
    sender: &Address,
    party: &Address,
    association_type: Option<u64>,
) -> Vec<AssociationEntry> {
    outgoing
        .into_iter()
        .filter(|a| !a.is_revoked() && *party == a.party)
        .filter(|a| association_type.map_or(true, |t| a.association_type == t))
        .map(|mut a| {
            a.sender = Some(sender.to_string());
            a
        })
        .collect()
}

/// Read-only view of relationship state on a node
#[derive(Clone)]
pub struct StateQuery {
    node: Arc<dyn NodeApi>,
}

impl StateQuery {
    pub fn new(node: Arc<dyn NodeApi>) -> Self {
        Self { node }
    }

    /// Is `from` leasing to `to`?
    pub async fn is_leasing(&self, from: &Address, to: &Address) -> QueryResult<bool> {
        Ok(self.lease_between(from, to).await?.is_some())
    }

    /// The lease from `from` to `to`, if any
    pub async fn lease_between(
        &self,
        from: &Address,
        to: &Address,
    ) -> QueryResult<Option<LeaseEntry>> {
        let leases = self.node.lease_list(from.as_str()).await?;
        debug!("{} has {} leases", from, leases.len());
        Ok(find_lease(&leases, to).cloned())
    }

    /// Every lease from `from` to `to`
    pub async fn leases_to(&self, from: &Address, to: &Address) -> QueryResult<Vec<LeaseEntry>> {
        let leases = self.node.lease_list(from.as_str()).await?;
        Ok(leases
            .into_iter()
            .filter(|lease| *to == lease.recipient)
            .collect())
    }

    /// Id of the lease from `from` to `to`; a missing lease is an error
    pub async fn lease_id(&self, from: &Address, to: &Address) -> QueryResult<String> {
        self.lease_between(from, to)
            .await?
            .map(|lease| lease.id)
            .ok_or_else(|| QueryError::NotFound {
                relationship: "lease",
                from: from.to_string(),
                to: to.to_string(),
            })
    }

    /// Is `sponsor` listed among the sponsors of `sponsored`?
    pub async fn is_sponsoring(&self, sponsor: &Address, sponsored: &Address) -> QueryResult<bool> {
        let list = self.node.sponsorship_list(sponsored.as_str()).await?;
        debug!("{} has {} sponsors", sponsored, list.sponsor.len());
        Ok(list.sponsor.iter().any(|s| *sponsor == *s))
    }

    /// Active associations from `sender` to `party`
    pub async fn associations(
        &self,
        sender: &Address,
        party: &Address,
        association_type: Option<u64>,
    ) -> QueryResult<Vec<AssociationEntry>> {
        let status = self.node.association_status(sender.as_str()).await?;
        debug!("{} has {} outgoing associations", sender, status.outgoing.len());
        Ok(active_associations(
            status.outgoing,
            sender,
            party,
            association_type,
        ))
    }

    pub async fn is_associated(
        &self,
        sender: &Address,
        party: &Address,
        association_type: Option<u64>,
    ) -> QueryResult<bool> {
        Ok(!self
            .associations(sender, party, association_type)
            .await?
            .is_empty())
    }

    /// Balance in minor units
    pub async fn balance(&self, address: &Address) -> QueryResult<u64> {
        Ok(self.node.balance(address.as_str()).await?)
    }
}
