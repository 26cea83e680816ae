//! Minimal Ethereum JSON-RPC transport.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use ballot_types::{Address, ChainId, TxHash};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::RpcError;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for one Ethereum JSON-RPC endpoint.
pub struct EthRpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

/// The part of a transaction receipt the client cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub success: bool,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    transaction_hash: TxHash,
    #[serde(default)]
    status: Option<String>,
}

impl EthRpcClient {
    /// Create a client targeting the given endpoint URL.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| RpcError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send a JSON-RPC request and return the `result` field.
    pub async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        tracing::trace!(method, id, "rpc request");

        let response = self.http.post(&self.url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(RpcError::Http(response.status().as_u16()));
        }
        let response: RpcResponse = response
            .json()
            .await
            .map_err(|e| RpcError::InvalidResponse(format!("invalid JSON response: {e}")))?;

        if let Some(err) = response.error {
            let data = err.data.and_then(|d| match d {
                Value::String(s) => Some(s),
                Value::Object(mut o) => o.remove("data").and_then(|v| v.as_str().map(String::from)),
                _ => None,
            });
            tracing::debug!(method, code = err.code, message = %err.message, "rpc error");
            return Err(RpcError::Node {
                code: err.code,
                message: err.message,
                data,
            });
        }
        Ok(response.result.unwrap_or(Value::Null))
    }

    /// `eth_call` against the latest block. Returns the raw return data.
    pub async fn call(&self, to: Address, data: &[u8]) -> Result<Vec<u8>, RpcError> {
        let params = json!([
            { "to": to, "data": format!("0x{}", hex::encode(data)) },
            "latest",
        ]);
        let result = self.request("eth_call", params).await?;
        decode_hex(&result)
    }

    /// `eth_sendTransaction`, signed by the node-side wallet.
    pub async fn send_transaction(
        &self,
        from: Address,
        to: Address,
        data: &[u8],
    ) -> Result<TxHash, RpcError> {
        let params = json!([{
            "from": from,
            "to": to,
            "data": format!("0x{}", hex::encode(data)),
        }]);
        let result = self.request("eth_sendTransaction", params).await?;
        serde_json::from_value(result)
            .map_err(|e| RpcError::InvalidResponse(format!("bad transaction hash: {e}")))
    }

    /// `None` while the transaction is still pending.
    pub async fn transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<Receipt>, RpcError> {
        let result = self
            .request("eth_getTransactionReceipt", json!([tx_hash]))
            .await?;
        if result.is_null() {
            return Ok(None);
        }
        let raw: RawReceipt = serde_json::from_value(result)
            .map_err(|e| RpcError::InvalidResponse(format!("bad receipt: {e}")))?;
        Ok(Some(Receipt {
            tx_hash: raw.transaction_hash,
            success: raw.status.as_deref() != Some("0x0"),
        }))
    }

    pub async fn chain_id(&self) -> Result<ChainId, RpcError> {
        let result = self.request("eth_chainId", json!([])).await?;
        parse_quantity(&result)
    }

    /// Accounts the node can sign for.
    pub async fn accounts(&self) -> Result<Vec<Address>, RpcError> {
        let result = self.request("eth_accounts", json!([])).await?;
        serde_json::from_value(result)
            .map_err(|e| RpcError::InvalidResponse(format!("bad account list: {e}")))
    }
}

fn decode_hex(value: &Value) -> Result<Vec<u8>, RpcError> {
    let text = value
        .as_str()
        .ok_or_else(|| RpcError::InvalidResponse(format!("expected hex string, got {value}")))?;
    hex::decode(text.trim_start_matches("0x"))
        .map_err(|e| RpcError::InvalidResponse(format!("bad hex data: {e}")))
}

fn parse_quantity(value: &Value) -> Result<u64, RpcError> {
    let text = value
        .as_str()
        .ok_or_else(|| RpcError::InvalidResponse(format!("expected quantity, got {value}")))?;
    u64::from_str_radix(text.trim_start_matches("0x"), 16)
        .map_err(|e| RpcError::InvalidResponse(format!("bad quantity {text}: {e}")))
}
