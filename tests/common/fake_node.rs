//! In-memory ledger node
//!
//! Applies broadcast transactions to a small state model and answers the
//! same reads as the public HTTP API. Broadcasts are confirmed instantly
//! unless confirmation is switched off.
//!
//! Leased amounts stay in the sender's balance but cannot pay for anything
//! until the lease is cancelled.

use async_trait::async_trait;
use ledger_e2e::errors::{NodeError, NodeResult};
use ledger_e2e::ledger::crypto::sha256;
use ledger_e2e::ledger::{Address, SignedTransaction, TransactionIntent};
use ledger_e2e::node::{
    AssociationEntry, AssociationStatus, BroadcastReceipt, LeaseEntry, NodeApi, SponsorshipList,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct LedgerState {
    balances: HashMap<String, u64>,
    leases: Vec<LeaseEntry>,
    /// sponsored address -> sponsors
    sponsors: HashMap<String, Vec<String>>,
    /// sender address -> outgoing associations
    associations: HashMap<String, Vec<AssociationEntry>>,
    confirmed: HashMap<String, Value>,
    counter: u64,
}

impl LedgerState {
    /// Base58 of 32 bytes, shaped like real transaction ids
    fn next_id(&mut self) -> String {
        self.counter += 1;
        bs58::encode(sha256(format!("tx{}", self.counter).as_bytes())).into_string()
    }

    /// Sum of active leases sent by `sender`; these funds cannot be spent
    fn leased_out(&self, sender: &str) -> u64 {
        self.leases
            .iter()
            .filter(|l| l.sender.as_deref() == Some(sender))
            .map(|l| l.amount)
            .sum()
    }
}

pub struct FakeNode {
    state: Mutex<LedgerState>,
    broadcasts: AtomicUsize,
    confirm: AtomicBool,
    reads_fail: AtomicBool,
    up: AtomicBool,
}

impl Default for FakeNode {
    fn default() -> Self {
        Self::new()
    }
}

fn rejected(message: impl Into<String>) -> NodeError {
    NodeError::Rejected {
        operation: "broadcast".to_string(),
        status: 400,
        message: message.into(),
    }
}

impl FakeNode {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LedgerState::default()),
            broadcasts: AtomicUsize::new(0),
            confirm: AtomicBool::new(true),
            reads_fail: AtomicBool::new(false),
            up: AtomicBool::new(true),
        }
    }

    pub fn set_balance(&self, address: &Address, balance: u64) {
        let mut state = self.state.lock().unwrap();
        state.balances.insert(address.to_string(), balance);
    }

    pub fn balance_of(&self, address: &Address) -> u64 {
        let state = self.state.lock().unwrap();
        state.balances.get(address.as_str()).copied().unwrap_or(0)
    }

    /// Number of broadcasts received, accepted or not
    pub fn broadcast_count(&self) -> usize {
        self.broadcasts.load(Ordering::SeqCst)
    }

    /// Accept broadcasts but never report them as confirmed
    pub fn stop_confirming(&self) {
        self.confirm.store(false, Ordering::SeqCst);
    }

    /// Make every read endpoint fail as if the node were unreachable
    pub fn fail_reads(&self, fail: bool) {
        self.reads_fail.store(fail, Ordering::SeqCst);
    }

    pub fn set_up(&self, up: bool) {
        self.up.store(up, Ordering::SeqCst);
    }

    /// Confirm a transaction id that was held back
    pub fn confirm_now(&self, id: &str) {
        let mut state = self.state.lock().unwrap();
        state
            .confirmed
            .insert(id.to_string(), json!({ "id": id }));
    }

    /// Insert a lease directly, bypassing broadcast; returns its id
    pub fn add_lease(&self, sender: &Address, recipient: &Address, amount: u64) -> String {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.leases.push(LeaseEntry {
            id: id.clone(),
            sender: Some(sender.to_string()),
            recipient: recipient.to_string(),
            amount,
        });
        id
    }

    pub fn lease_count(&self) -> usize {
        self.state.lock().unwrap().leases.len()
    }

    fn check_reads(&self) -> NodeResult<()> {
        if self.reads_fail.load(Ordering::SeqCst) {
            Err(NodeError::ConnectionFailed(
                "fake node is unreachable".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn apply(state: &mut LedgerState, id: &str, tx: &SignedTransaction) -> NodeResult<()> {
        let sender = tx.sender().to_string();
        let balance = state.balances.get(&sender).copied().unwrap_or(0);
        let available = balance.saturating_sub(state.leased_out(&sender));
        let amount = tx.intent().amount();
        let required = tx.fee() + amount;
        if available < required {
            return Err(rejected(format!(
                "Insufficient funds: {} has {} available, needs {}",
                sender, available, required
            )));
        }

        match tx.intent() {
            TransactionIntent::Transfer { recipient, amount, .. } => {
                *state.balances.entry(recipient.to_string()).or_insert(0) += amount;
                state.balances.insert(sender, balance - tx.fee() - amount);
                return Ok(());
            }
            TransactionIntent::Anchor { .. } => {}
            TransactionIntent::Lease { recipient, amount } => {
                state.leases.push(LeaseEntry {
                    id: id.to_string(),
                    sender: Some(sender.clone()),
                    recipient: recipient.to_string(),
                    amount: *amount,
                });
            }
            TransactionIntent::CancelLease { lease_id } => {
                let position = state
                    .leases
                    .iter()
                    .position(|l| l.id == *lease_id && l.sender.as_deref() == Some(sender.as_str()))
                    .ok_or_else(|| rejected(format!("Lease {} not found", lease_id)))?;
                state.leases.remove(position);
            }
            TransactionIntent::Sponsorship { recipient } => {
                let sponsors = state.sponsors.entry(recipient.to_string()).or_default();
                if !sponsors.contains(&sender) {
                    sponsors.push(sender.clone());
                }
            }
            TransactionIntent::CancelSponsorship { recipient } => {
                let sponsors = state.sponsors.entry(recipient.to_string()).or_default();
                let position = sponsors
                    .iter()
                    .position(|s| *s == sender)
                    .ok_or_else(|| rejected("No sponsorship to cancel"))?;
                sponsors.remove(position);
            }
            TransactionIntent::Association {
                party,
                association_type,
                anchor,
            } => {
                state
                    .associations
                    .entry(sender.clone())
                    .or_default()
                    .push(AssociationEntry {
                        party: party.to_string(),
                        association_type: *association_type,
                        hash: anchor.as_ref().map(|a| bs58::encode(a).into_string()),
                        transaction_id: Some(id.to_string()),
                        revoke_transaction_id: None,
                        sender: None,
                    });
            }
            TransactionIntent::RevokeAssociation {
                party,
                association_type,
                ..
            } => {
                let entry = state
                    .associations
                    .entry(sender.clone())
                    .or_default()
                    .iter_mut()
                    .find(|a| {
                        a.revoke_transaction_id.is_none()
                            && *party == a.party
                            && a.association_type == *association_type
                    })
                    .ok_or_else(|| rejected("Association not found"))?;
                entry.revoke_transaction_id = Some(id.to_string());
            }
        }

        state.balances.insert(sender, balance - tx.fee());
        Ok(())
    }
}

#[async_trait]
impl NodeApi for FakeNode {
    async fn broadcast(&self, transaction: &SignedTransaction) -> NodeResult<BroadcastReceipt> {
        self.broadcasts.fetch_add(1, Ordering::SeqCst);
        if !transaction.verify() {
            return Err(rejected("Invalid signature"));
        }

        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        Self::apply(&mut state, &id, transaction)?;

        let mut body = transaction.to_json();
        body["id"] = json!(id);
        if self.confirm.load(Ordering::SeqCst) {
            state.confirmed.insert(id.clone(), body.clone());
        }
        Ok(BroadcastReceipt { id, body })
    }

    async fn transaction_info(&self, id: &str) -> NodeResult<Value> {
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        Ok(state
            .confirmed
            .get(id)
            .cloned()
            .unwrap_or_else(|| json!({ "error": 311, "message": "Transactions does not exist" })))
    }

    async fn lease_list(&self, address: &str) -> NodeResult<Vec<LeaseEntry>> {
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        Ok(state
            .leases
            .iter()
            .filter(|l| l.sender.as_deref() == Some(address) || l.recipient == address)
            .cloned()
            .collect())
    }

    async fn sponsorship_list(&self, address: &str) -> NodeResult<SponsorshipList> {
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        Ok(SponsorshipList {
            sponsor: state.sponsors.get(address).cloned().unwrap_or_default(),
        })
    }

    async fn association_status(&self, address: &str) -> NodeResult<AssociationStatus> {
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        Ok(AssociationStatus {
            outgoing: state.associations.get(address).cloned().unwrap_or_default(),
            incoming: Vec::new(),
        })
    }

    async fn balance(&self, address: &str) -> NodeResult<u64> {
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        Ok(state.balances.get(address).copied().unwrap_or(0))
    }

    async fn is_up(&self) -> NodeResult<bool> {
        Ok(self.up.load(Ordering::SeqCst))
    }
}
