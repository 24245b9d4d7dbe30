//! Destination bridge node client.
//!
//! The bridge node exposes a JSON-RPC 2.0 surface; every relay-side
//! operation goes through one request/response round trip here.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use crate::error::BridgeError;

/// JSON-RPC client for the destination bridge node.
pub struct BridgeClient {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

impl BridgeClient {
    /// Create a new client for the given bridge node URL.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Reset the genesis header on the destination chain.
    ///
    /// # Errors
    /// Returns an error on transport failure or a JSON-RPC error response.
    pub async fn reset_genesis(&self, header: &Value) -> Result<Value, BridgeError> {
        self.call("bridge_resetGenesisHeader", json!([header])).await
    }

    /// Submit a header to the destination chain.
    ///
    /// # Errors
    /// Returns an error on transport failure or a JSON-RPC error response.
    pub async fn relay_header(&self, header: &Value) -> Result<Value, BridgeError> {
        self.call("bridge_relayHeader", json!([header])).await
    }

    /// Redeem a transaction receipt on the destination chain.
    ///
    /// # Errors
    /// Returns an error on transport failure or a JSON-RPC error response.
    pub async fn redeem_receipt(&self, receipt: &Value) -> Result<Value, BridgeError> {
        self.call("bridge_redeemReceipt", json!([receipt])).await
    }

    /// Query the balance of the given account.
    ///
    /// # Errors
    /// Returns an error on transport failure or a JSON-RPC error response.
    pub async fn balance_of(&self, account: &str) -> Result<Value, BridgeError> {
        self.call("bridge_balanceOf", json!([account])).await
    }

    /// Transfer funds to the given account.
    ///
    /// # Errors
    /// Returns an error on transport failure or a JSON-RPC error response.
    pub async fn transfer(&self, to: &str, amount: u64) -> Result<Value, BridgeError> {
        self.call("bridge_transfer", json!([to, amount])).await
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, BridgeError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let res = self
            .client
            .post(self.base_url.clone())
            .json(&body)
            .send()
            .await?;

        match res.status() {
            StatusCode::OK => {
                let bytes = res.bytes().await?;
                let response: RpcResponse<T> =
                    serde_json::from_slice(&bytes).map_err(BridgeError::Json)?;
                if let Some(error) = response.error {
                    return Err(BridgeError::Rpc {
                        code: error.code,
                        message: error.message,
                    });
                }
                response.result.ok_or(BridgeError::MissingResult)
            }
            code => Err(BridgeError::Http {
                code,
                text: res.text().await?,
            }),
        }
    }
}
