use crate::errors::NodeResult;
use crate::ledger::SignedTransaction;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Node acknowledgement of an accepted broadcast
#[derive(Debug, Clone, PartialEq)]
pub struct BroadcastReceipt {
    /// Server assigned transaction id
    pub id: String,
    /// Transaction JSON as echoed back by the node
    pub body: Value,
}

/// One entry of `GET /leases/{address}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseEntry {
    pub id: String,
    #[serde(default)]
    pub sender: Option<String>,
    pub recipient: String,
    #[serde(default)]
    pub amount: u64,
}

/// Body of `GET /sponsorship/{address}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SponsorshipList {
    #[serde(default)]
    pub sponsor: Vec<String>,
}

/// One association as reported by `GET /associations/status/{address}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationEntry {
    pub party: String,
    #[serde(default)]
    pub association_type: u64,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub revoke_transaction_id: Option<String>,
    /// Filled in by queries, not by the node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

impl AssociationEntry {
    pub fn is_revoked(&self) -> bool {
        self.revoke_transaction_id.is_some()
    }
}

/// Body of `GET /associations/status/{address}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationStatus {
    #[serde(default)]
    pub outgoing: Vec<AssociationEntry>,
    #[serde(default)]
    pub incoming: Vec<AssociationEntry>,
}

/// Body of `GET /addresses/balance/{address}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub address: String,
    pub balance: u64,
}

/// Operations the scenarios need from a ledger node
///
/// [`crate::node::PublicNode`] implements this over HTTP; tests implement it
/// with an in-memory ledger.
#[async_trait]
pub trait NodeApi: Send + Sync {
    /// Submit a signed transaction
    async fn broadcast(&self, transaction: &SignedTransaction) -> NodeResult<BroadcastReceipt>;

    /// Raw status body for a transaction id; carries an `id` field once confirmed
    async fn transaction_info(&self, id: &str) -> NodeResult<Value>;

    async fn lease_list(&self, address: &str) -> NodeResult<Vec<LeaseEntry>>;

    async fn sponsorship_list(&self, address: &str) -> NodeResult<SponsorshipList>;

    async fn association_status(&self, address: &str) -> NodeResult<AssociationStatus>;

    async fn balance(&self, address: &str) -> NodeResult<u64>;

    /// Whether the node answers its root endpoint
    async fn is_up(&self) -> NodeResult<bool>;
}

/// Whether a transaction status body marks the transaction as confirmed
pub fn is_confirmed(info: &Value) -> bool {
    info.get("id").is_some()
}
