use crate::config::NodeConfig;
use crate::errors::{NodeError, NodeResult};
use crate::ledger::SignedTransaction;
use crate::node::api::{
    AssociationStatus, Balance, BroadcastReceipt, LeaseEntry, NodeApi, SponsorshipList,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Header carrying the node API key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// HTTP client for a node's public API
#[derive(Debug, Clone)]
pub struct PublicNode {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl PublicNode {
    pub fn new(config: &NodeConfig) -> NodeResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                NodeError::ConnectionFailed(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key().map(str::to_string),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_key(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> NodeResult<Response> {
        self.with_key(request).send().await.map_err(|e| {
            NodeError::ConnectionFailed(format!("{} to {} failed: {}", operation, self.base_url, e))
        })
    }

    /// GET a JSON body, treating non-success statuses as errors
    async fn get_json<T: DeserializeOwned>(&self, operation: &str, path: &str) -> NodeResult<T> {
        debug!("GET {}", path);
        let response = self.send(operation, self.http.get(self.url(path))).await?;
        let response = ensure_success(operation, response).await?;
        response.json::<T>().await.map_err(|e| {
            NodeError::DeserialisationFailed(format!("{} response: {}", operation, e))
        })
    }
}

/// Turn a non-2xx response into [`NodeError::Rejected`] with the node's message
async fn ensure_success(operation: &str, response: Response) -> NodeResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    Err(NodeError::Rejected {
        operation: operation.to_string(),
        status: status.as_u16(),
        message: error_message(&text),
    })
}

/// Pull `message` out of a node error body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl NodeApi for PublicNode {
    async fn broadcast(&self, transaction: &SignedTransaction) -> NodeResult<BroadcastReceipt> {
        let body = transaction.to_json();
        debug!("POST /transactions/broadcast ({})", transaction.kind());

        let response = self
            .send(
                "broadcast",
                self.http
                    .post(self.url("/transactions/broadcast"))
                    .json(&body),
            )
            .await?;
        let response = ensure_success("broadcast", response).await?;

        let echoed: Value = response.json().await.map_err(|e| {
            NodeError::DeserialisationFailed(format!("broadcast response: {}", e))
        })?;
        let id = echoed
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                NodeError::InvalidResponse("broadcast response has no transaction id".to_string())
            })?
            .to_string();

        Ok(BroadcastReceipt { id, body: echoed })
    }

    async fn transaction_info(&self, id: &str) -> NodeResult<Value> {
        let path = format!("/transactions/info/{}", id);
        debug!("GET {}", path);
        // Unknown transactions come back as a JSON error body, which callers
        // read as "not confirmed yet", so the status code is not checked here.
        let response = self
            .send("transaction info", self.http.get(self.url(&path)))
            .await?;
        let status = response.status();
        let text = response.text().await.map_err(|e| {
            NodeError::ConnectionFailed(format!("transaction info body: {}", e))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            NodeError::DeserialisationFailed(format!(
                "transaction info ({}) is not JSON: {}",
                status, e
            ))
        })
    }

    async fn lease_list(&self, address: &str) -> NodeResult<Vec<LeaseEntry>> {
        self.get_json("lease list", &format!("/leases/{}", address))
            .await
    }

    async fn sponsorship_list(&self, address: &str) -> NodeResult<SponsorshipList> {
        self.get_json("sponsorship list", &format!("/sponsorship/{}", address))
            .await
    }

    async fn association_status(&self, address: &str) -> NodeResult<AssociationStatus> {
        self.get_json(
            "association status",
            &format!("/associations/status/{}", address),
        )
        .await
    }

    async fn balance(&self, address: &str) -> NodeResult<u64> {
        let balance: Balance = self
            .get_json("balance", &format!("/addresses/balance/{}", address))
            .await?;
        Ok(balance.balance)
    }

    async fn is_up(&self) -> NodeResult<bool> {
        match self.with_key(self.http.get(self.url("/"))).send().await {
            Ok(response) => Ok(response.status() == StatusCode::OK),
            Err(e) => {
                debug!("Node at {} not reachable: {}", self.base_url, e);
                Ok(false)
            }
        }
    }
}
