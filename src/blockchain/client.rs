//! LCD REST client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the node's LCD endpoint
//! - Query chain state (accounts, balances, transactions, contract state)
//! - Broadcast signed transactions and wait for inclusion
//! - Handle timeouts and node errors without retrying

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use cosmrs::tendermint::chain;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

use crate::blockchain::transaction::{AccountInfo, TxBuilder};
use crate::blockchain::types::{
    BlockchainError, BlockchainResult, Coin, Fee, TxResult, WasmMsg,
};
use crate::blockchain::wallet::Wallet;
use crate::config::NetworkConfig;
use crate::observability::metrics;

/// Operations the deployment driver needs from a chain.
///
/// [`LcdClient`] talks to a real node; tests substitute an in-memory chain.
#[allow(async_fn_in_trait)]
pub trait ChainClient {
    /// Sign `msgs` with `signer`, broadcast them, and return the included result.
    ///
    /// A transaction the chain refuses yields [`BlockchainError::Rejected`].
    async fn broadcast(
        &self,
        signer: &Wallet,
        msgs: Vec<WasmMsg>,
        fee: &Fee,
    ) -> BlockchainResult<TxResult>;

    /// Run a read-only smart query against a contract.
    async fn query_contract(&self, contract: &str, query: &Value) -> BlockchainResult<Value>;

    /// Bank balances of an address.
    async fn balance(&self, address: &str) -> BlockchainResult<Vec<Coin>>;
}

/// Error body returned by the LCD gateway.
#[derive(Debug, Deserialize)]
struct GatewayError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct TxResponseEnvelope {
    tx_response: TxResult,
}

#[derive(Debug, Deserialize)]
struct SmartQueryResponse {
    data: Value,
}

#[derive(Debug, Deserialize)]
struct BalancesResponse {
    #[serde(default)]
    balances: Vec<Coin>,
}

#[derive(Debug, Deserialize)]
struct NodeInfoResponse {
    default_node_info: NodeInfo,
}

#[derive(Debug, Deserialize)]
struct NodeInfo {
    network: String,
}

/// LCD client bound to a single endpoint.
#[derive(Clone)]
pub struct LcdClient {
    http: reqwest::Client,
    base_url: Url,
    chain_id: chain::Id,
    config: NetworkConfig,
}

impl LcdClient {
    /// Create a new client without touching the network.
    pub fn new(config: NetworkConfig) -> BlockchainResult<Self> {
        let invalid_url = |reason: String| BlockchainError::InvalidUrl {
            url: config.lcd_url.clone(),
            reason,
        };

        let mut base_url: Url = config
            .lcd_url
            .parse()
            .map_err(|e: url::ParseError| invalid_url(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid_url("cannot be a base URL".to_string()));
        }
        // Url::join drops the last segment unless the path ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let chain_id = config.chain_id.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid chain id '{}': {}", config.chain_id, e))
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.rpc_timeout_secs))
            .build()
            .map_err(|e| BlockchainError::Rpc(format!("HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            chain_id,
            config,
        })
    }

    /// Create a client and check that the node serves the configured chain.
    ///
    /// A failed check is logged rather than returned; the first real request
    /// will surface a broken endpoint.
    pub async fn connect(config: NetworkConfig) -> BlockchainResult<Self> {
        let client = Self::new(config)?;

        match client.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    lcd_url = %client.config.lcd_url,
                    chain_id = %client.config.chain_id,
                    "LCD client initialized"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "LCD client initialized but chain verification failed"
                );
            }
        }

        Ok(client)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let info: NodeInfoResponse = self
            .get_json("cosmos/base/tendermint/v1beta1/node_info")
            .await?
            .ok_or_else(|| BlockchainError::Rpc("node_info not served".to_string()))?;

        if info.default_node_info.network != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id.clone(),
                actual: info.default_node_info.network,
            });
        }
        Ok(())
    }

    /// Account number and sequence of an address.
    pub async fn account(&self, address: &str) -> BlockchainResult<AccountInfo> {
        let body: Value = self
            .get_json(&format!("cosmos/auth/v1beta1/accounts/{}", address))
            .await?
            .ok_or_else(|| {
                BlockchainError::Rpc(format!("Account {} not found on chain", address))
            })?;

        parse_account(&body)
    }

    /// Submit signed transaction bytes and return the transaction hash.
    ///
    /// Only the mempool check happens here; a non-zero check code is a
    /// rejection.
    pub async fn broadcast_tx(&self, tx_bytes: &[u8]) -> BlockchainResult<String> {
        let url = self.endpoint("cosmos/tx/v1beta1/txs")?;
        let request = json!({
            "tx_bytes": STANDARD.encode(tx_bytes),
            "mode": "BROADCAST_MODE_SYNC",
        });

        let response = self
            .http
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let envelope: TxResponseEnvelope = decode_response(response).await?;
        let result = envelope.tx_response;
        if !result.is_success() {
            return Err(BlockchainError::Rejected {
                code: result.code,
                log: result.raw_log,
            });
        }

        Ok(result.txhash)
    }

    /// Look up an included transaction. `None` while it is still pending.
    pub async fn get_tx(&self, txhash: &str) -> BlockchainResult<Option<TxResult>> {
        let envelope: Option<TxResponseEnvelope> = self
            .get_json(&format!("cosmos/tx/v1beta1/txs/{}", txhash))
            .await?;
        Ok(envelope.map(|e| e.tx_response))
    }

    /// Get the configured chain id.
    pub fn chain_id(&self) -> &chain::Id {
        &self.chain_id
    }

    /// Get the configuration.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> BlockchainResult<Url> {
        self.base_url.join(path).map_err(|e| BlockchainError::InvalidUrl {
            url: format!("{}{}", self.base_url, path),
            reason: e.to_string(),
        })
    }

    /// GET a JSON document; a 404 (or the gateway's "not found") maps to `None`.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> BlockchainResult<Option<T>> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        match decode_response(response).await {
            Ok(value) => Ok(Some(value)),
            Err(BlockchainError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> BlockchainError {
        if e.is_timeout() {
            BlockchainError::Timeout(self.config.rpc_timeout_secs)
        } else {
            BlockchainError::Rpc(e.to_string())
        }
    }
}

/// Decode a successful body, or turn the gateway's error body into an error.
async fn decode_response<T: DeserializeOwned>(response: reqwest::Response) -> BlockchainResult<T> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| BlockchainError::Rpc(format!("Reading response: {}", e)))?;

    if status.is_success() {
        return serde_json::from_str(&text)
            .map_err(|e| BlockchainError::Decode(format!("{}: {}", e, text)));
    }

    Err(gateway_error(status, text))
}

/// Classify a non-success response body.
fn gateway_error(status: StatusCode, text: String) -> BlockchainError {
    let gateway = serde_json::from_str::<GatewayError>(&text).ok();
    let message = match &gateway {
        Some(err) => format!("code {}: {}", err.code, err.message),
        None => text,
    };

    // grpc-gateway reports missing entries as 404 or as gRPC code 5 (NotFound).
    if status == StatusCode::NOT_FOUND || gateway.is_some_and(|err| err.code == 5) {
        return BlockchainError::NotFound(message);
    }
    BlockchainError::Rpc(format!("HTTP {}: {}", status.as_u16(), message))
}

/// Extract account number and sequence from an auth query body.
///
/// Vesting and module accounts nest the base account one level down.
fn parse_account(body: &Value) -> BlockchainResult<AccountInfo> {
    let account = &body["account"];
    let base = if account.get("account_number").is_some() {
        account
    } else if account["base_account"].is_object() {
        &account["base_account"]
    } else {
        &account["base_vesting_account"]["base_account"]
    };

    let field = |name: &str| -> BlockchainResult<u64> {
        match &base[name] {
            Value::String(raw) => raw
                .parse()
                .map_err(|e| BlockchainError::Decode(format!("account {}: {}", name, e))),
            Value::Number(n) => n
                .as_u64()
                .ok_or_else(|| BlockchainError::Decode(format!("account {}: {}", name, n))),
            // Fresh accounts omit a zero sequence.
            Value::Null if name == "sequence" => Ok(0),
            other => Err(BlockchainError::Decode(format!("account {}: {}", name, other))),
        }
    };

    Ok(AccountInfo {
        account_number: field("account_number")?,
        sequence: field("sequence")?,
    })
}

impl ChainClient for LcdClient {
    async fn broadcast(
        &self,
        signer: &Wallet,
        msgs: Vec<WasmMsg>,
        fee: &Fee,
    ) -> BlockchainResult<TxResult> {
        let kind = msgs.first().map(WasmMsg::kind).unwrap_or("empty");
        let builder = TxBuilder::new(self, signer);

        let outcome = async {
            let tx_bytes = builder.build(&msgs, fee).await?;
            let txhash = self.broadcast_tx(&tx_bytes).await?;
            tracing::info!(txhash = %txhash, kind = kind, "Transaction broadcast");

            let result = builder
                .wait_for_inclusion(&txhash, self.config.confirmation_timeout_secs)
                .await?;
            if !result.is_success() {
                return Err(BlockchainError::Rejected {
                    code: result.code,
                    log: result.raw_log,
                });
            }
            Ok::<_, BlockchainError>(result)
        }
        .await;

        metrics::record_broadcast(kind, outcome.is_ok());
        outcome
    }

    async fn query_contract(&self, contract: &str, query: &Value) -> BlockchainResult<Value> {
        let encoded = URL_SAFE.encode(query.to_string());
        let path = format!("cosmwasm/wasm/v1/contract/{}/smart/{}", contract, encoded);

        let outcome = match self.get_json::<SmartQueryResponse>(&path).await {
            Ok(Some(response)) => Ok(response.data),
            Ok(None) => Err(BlockchainError::Query(format!(
                "contract {} or queried entry not found",
                contract
            ))),
            Err(BlockchainError::Rpc(msg)) => Err(BlockchainError::Query(msg)),
            Err(e) => Err(e),
        };

        metrics::record_query(outcome.is_ok());
        outcome
    }

    async fn balance(&self, address: &str) -> BlockchainResult<Vec<Coin>> {
        let response: Option<BalancesResponse> = self
            .get_json(&format!("cosmos/bank/v1beta1/balances/{}", address))
            .await?;
        Ok(response.map(|r| r.balances).unwrap_or_default())
    }
}

impl std::fmt::Debug for LcdClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LcdClient")
            .field("lcd_url", &self.config.lcd_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
