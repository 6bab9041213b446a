//! Build, sign, broadcast and confirm transactions
//!
//! [`Submitter::submit`] is the single write path. It records the outcome of
//! every attempt on the caller's [`OutcomeTracker`] right before returning,
//! whether the attempt succeeded or not, and passes errors back unchanged.

use crate::config::FeeConfig;
use crate::errors::{PollError, SubmitError, SubmitResult};
use crate::ledger::{
    Account, Address, TransactionIntent, TransactionKind, UnsignedTransaction, DEFAULT_VERSION,
};
use crate::node::{BroadcastReceipt, NodeApi};
use crate::outcome::OutcomeTracker;
use crate::poller::Poller;
use crate::query::StateQuery;
use rand::Rng;
use std::sync::Arc;
use tracing::{info, warn};

/// Characters used for generated anchor sources
const ANCHOR_ALPHABET: &[u8] = b"qwertyuioplkjhgfds";

/// Length of generated anchor sources
const ANCHOR_SOURCE_LENGTH: usize = 6;

/// Digest anchored for a human readable source string
pub fn anchor_digest(source: &str) -> Vec<u8> {
    crate::ledger::crypto::sha256(source.as_bytes()).to_vec()
}

/// Bytes sent for an association anchor
///
/// Base58 text is sent decoded, so the node reports back the same string;
/// anything else is sent as its UTF-8 bytes.
pub fn association_anchor(anchor: &str) -> Vec<u8> {
    bs58::decode(anchor)
        .into_vec()
        .unwrap_or_else(|_| anchor.as_bytes().to_vec())
}

/// Short random string to anchor when a step does not name one
pub fn random_anchor_source() -> String {
    let mut rng = rand::thread_rng();
    (0..ANCHOR_SOURCE_LENGTH)
        .map(|_| ANCHOR_ALPHABET[rng.gen_range(0..ANCHOR_ALPHABET.len())] as char)
        .collect()
}

/// Sends transactions for scenario steps
#[derive(Clone)]
pub struct Submitter {
    node: Arc<dyn NodeApi>,
    poller: Poller,
    fees: FeeConfig,
    chain_id: u8,
}

impl Submitter {
    pub fn new(node: Arc<dyn NodeApi>, poller: Poller, fees: FeeConfig, chain_id: u8) -> Self {
        Self {
            node,
            poller,
            fees,
            chain_id,
        }
    }

    /// Configured fee for a kind
    pub fn fee_for(&self, kind: TransactionKind) -> u64 {
        match kind {
            TransactionKind::Transfer => self.fees.transfer,
            TransactionKind::Anchor => self.fees.anchor,
            TransactionKind::Lease => self.fees.lease,
            TransactionKind::CancelLease => self.fees.cancel_lease,
            TransactionKind::Sponsorship => self.fees.sponsorship,
            TransactionKind::CancelSponsorship => self.fees.cancel_sponsorship,
            TransactionKind::Association => self.fees.association,
            TransactionKind::RevokeAssociation => self.fees.revoke_association,
        }
    }

    /// Submit at the default version
    pub async fn submit(
        &self,
        sender: &Account,
        intent: TransactionIntent,
        outcome: &mut OutcomeTracker,
    ) -> SubmitResult<BroadcastReceipt> {
        self.submit_versioned(sender, intent, DEFAULT_VERSION, outcome)
            .await
    }

    /// Submit at an explicit version and wait for confirmation
    pub async fn submit_versioned(
        &self,
        sender: &Account,
        intent: TransactionIntent,
        version: u8,
        outcome: &mut OutcomeTracker,
    ) -> SubmitResult<BroadcastReceipt> {
        let kind = intent.kind();
        let result = self.send_and_confirm(sender, intent, version).await;
        if let Err(e) = &result {
            warn!("{} from {} failed: {}", kind, sender.address(), e);
        }
        outcome.record(result)
    }

    async fn send_and_confirm(
        &self,
        sender: &Account,
        intent: TransactionIntent,
        version: u8,
    ) -> SubmitResult<BroadcastReceipt> {
        let kind = intent.kind();
        let unsigned =
            UnsignedTransaction::new(intent, self.fee_for(kind), version, self.chain_id)?;
        let signed = unsigned.sign(sender)?;

        let receipt = self
            .node
            .broadcast(&signed)
            .await
            .map_err(SubmitError::Rejected)?;
        info!(
            "Broadcast {} (v{}) from {} as {}",
            kind,
            version,
            sender.address(),
            receipt.id
        );

        let confirmation = self
            .poller
            .wait_for_transaction(self.node.as_ref(), &receipt.id)
            .await;
        match confirmation {
            Ok(_) => Ok(receipt),
            Err(PollError::Timeout { waited_seconds, .. }) => Err(SubmitError::ConfirmationTimeout {
                id: receipt.id,
                waited_seconds,
            }),
            Err(PollError::Node(source)) => Err(SubmitError::Confirmation {
                id: receipt.id,
                source,
            }),
        }
    }

    pub async fn transfer(
        &self,
        sender: &Account,
        recipient: &Address,
        amount: u64,
        outcome: &mut OutcomeTracker,
    ) -> SubmitResult<BroadcastReceipt> {
        let intent = TransactionIntent::Transfer {
            recipient: recipient.clone(),
            amount,
            attachment: Vec::new(),
        };
        self.submit(sender, intent, outcome).await
    }

    /// Anchor `sha256(source)`, generating a source when none is given
    pub async fn anchor(
        &self,
        sender: &Account,
        source: Option<&str>,
        outcome: &mut OutcomeTracker,
    ) -> SubmitResult<BroadcastReceipt> {
        let source = match source {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => random_anchor_source(),
        };
        let intent = TransactionIntent::Anchor {
            anchors: vec![anchor_digest(&source)],
        };
        self.submit(sender, intent, outcome).await
    }

    pub async fn lease(
        &self,
        sender: &Account,
        recipient: &Address,
        amount: u64,
        outcome: &mut OutcomeTracker,
    ) -> SubmitResult<BroadcastReceipt> {
        let intent = TransactionIntent::Lease {
            recipient: recipient.clone(),
            amount,
        };
        self.submit(sender, intent, outcome).await
    }

    /// Cancel the lease from `sender` to `recipient`, looking up its id first
    pub async fn cancel_lease(
        &self,
        sender: &Account,
        recipient: &Address,
        query: &StateQuery,
        outcome: &mut OutcomeTracker,
    ) -> SubmitResult<BroadcastReceipt> {
        let lease_id = match query.lease_id(sender.address(), recipient).await {
            Ok(id) => id,
            Err(e) => return outcome.record(Err(SubmitError::Lookup(e))),
        };
        let intent = TransactionIntent::CancelLease { lease_id };
        self.submit(sender, intent, outcome).await
    }

    pub async fn sponsor(
        &self,
        sponsor: &Account,
        sponsored: &Address,
        outcome: &mut OutcomeTracker,
    ) -> SubmitResult<BroadcastReceipt> {
        let intent = TransactionIntent::Sponsorship {
            recipient: sponsored.clone(),
        };
        self.submit(sponsor, intent, outcome).await
    }

    pub async fn cancel_sponsorship(
        &self,
        sponsor: &Account,
        sponsored: &Address,
        outcome: &mut OutcomeTracker,
    ) -> SubmitResult<BroadcastReceipt> {
        let intent = TransactionIntent::CancelSponsorship {
            recipient: sponsored.clone(),
        };
        self.submit(sponsor, intent, outcome).await
    }

    pub async fn associate(
        &self,
        sender: &Account,
        party: &Address,
        association_type: u64,
        anchor: Option<&str>,
        version: u8,
        outcome: &mut OutcomeTracker,
    ) -> SubmitResult<BroadcastReceipt> {
        let intent = TransactionIntent::Association {
            party: party.clone(),
            association_type,
            anchor: anchor.filter(|a| !a.is_empty()).map(association_anchor),
        };
        self.submit_versioned(sender, intent, version, outcome)
            .await
    }

    pub async fn revoke_association(
        &self,
        sender: &Account,
        party: &Address,
        association_type: u64,
        anchor: Option<&str>,
        version: u8,
        outcome: &mut OutcomeTracker,
    ) -> SubmitResult<BroadcastReceipt> {
        let intent = TransactionIntent::RevokeAssociation {
            party: party.clone(),
            association_type,
            anchor: anchor.filter(|a| !a.is_empty()).map(association_anchor),
        };
        self.submit_versioned(sender, intent, version, outcome)
            .await
    }
}
