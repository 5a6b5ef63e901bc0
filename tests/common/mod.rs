//! Shared utilities for integration tests: an in-memory chain running the
//! media contract rules, and a mock LCD HTTP server.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::extract::{Path as UrlPath, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use media_deployer::blockchain::types::TxEvent;
use media_deployer::blockchain::{
    BlockchainError, BlockchainResult, ChainClient, Coin, Fee, Identities, TxResult, Wallet,
    WasmMsg,
};
use media_deployer::config::NetworkConfig;
use media_deployer::deploy::msg::{ExecuteMsg, QueryMsg};

// BIP-39 test vectors, never used with real funds.
pub const DEPLOYER_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
pub const COUNTERPARTY_MNEMONIC: &str = "legal winner thank year wave sausage worth useful legal winner thank yellow";

pub fn identities() -> Identities {
    Identities {
        deployer: Wallet::from_mnemonic(DEPLOYER_MNEMONIC, "terra", 330).unwrap(),
        counterparty: Wallet::from_mnemonic(COUNTERPARTY_MNEMONIC, "terra", 330).unwrap(),
    }
}

pub fn test_fee() -> Fee {
    Fee {
        amount: Coin::new(1_000_000, "uluna"),
        gas_limit: 5_000_000,
    }
}

/// Write a minimal wasm module as `<dir>/<name>.wasm`.
pub fn write_artifact(dir: &Path, name: &str) {
    std::fs::write(dir.join(format!("{}.wasm", name)), b"\0asm\x01\0\0\0").unwrap();
}

#[derive(Debug, Default)]
struct MediaContract {
    minter: String,
    owners: HashMap<String, String>,
    asks: HashMap<String, Coin>,
    bids: HashMap<(String, String), Coin>,
}

#[derive(Debug, Default)]
struct ChainState {
    codes: HashMap<u64, Vec<u8>>,
    contracts: HashMap<String, MediaContract>,
    balances: HashMap<String, Vec<Coin>>,
    tx_count: u64,
    broadcasts: Vec<&'static str>,
}

/// In-memory chain hosting media contracts.
///
/// Bids at or above the ask move the token to the bidder.
#[derive(Debug, Default)]
pub struct MockChain {
    state: Mutex<ChainState>,
}

fn rejected(log: impl Into<String>) -> BlockchainError {
    BlockchainError::Rejected {
        code: 5,
        log: log.into(),
    }
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fund(&self, address: &str, coin: Coin) {
        self.state.lock().unwrap().balances.entry(address.to_string()).or_default().push(coin);
    }

    /// Kinds of every broadcast that reached the chain, accepted or not.
    pub fn broadcasts(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().broadcasts.clone()
    }

    fn apply(state: &mut ChainState, msg: WasmMsg) -> BlockchainResult<TxEvent> {
        match msg {
            WasmMsg::StoreCode { wasm_byte_code, .. } => {
                if wasm_byte_code.is_empty() {
                    return Err(rejected("empty wasm code"));
                }
                let code_id = state.codes.len() as u64 + 1;
                state.codes.insert(code_id, wasm_byte_code);
                Ok(TxEvent::new("store_code", &[("code_id", code_id.to_string().as_str())]))
            }
            WasmMsg::Instantiate { code_id, msg, .. } => {
                if !state.codes.contains_key(&code_id.0) {
                    return Err(rejected(format!("no such code: {}", code_id)));
                }
                let init: Value =
                    serde_json::from_slice(&msg).map_err(|e| rejected(e.to_string()))?;
                let minter = init["minter"]
                    .as_str()
                    .ok_or_else(|| rejected("missing field `minter`"))?
                    .to_string();

                let address = format!("terra1contract{}", state.contracts.len() + 1);
                state.contracts.insert(
                    address.clone(),
                    MediaContract {
                        minter,
                        ..Default::default()
                    },
                );
                Ok(TxEvent::new(
                    "instantiate",
                    &[("_contract_address", address.as_str()), ("code_id", code_id.to_string().as_str())],
                ))
            }
            WasmMsg::Execute {
                sender,
                contract,
                msg,
                ..
            } => {
                let contract_state = state
                    .contracts
                    .get_mut(&contract)
                    .ok_or_else(|| rejected(format!("no such contract: {}", contract)))?;
                let msg: ExecuteMsg =
                    serde_json::from_slice(&msg).map_err(|e| rejected(e.to_string()))?;
                let action = msg.action();

                match msg {
                    ExecuteMsg::Mint(mint) => {
                        if sender != contract_state.minter {
                            return Err(rejected("Unauthorized"));
                        }
                        if contract_state.owners.contains_key(&mint.base.token_id) {
                            return Err(rejected("token_id already claimed"));
                        }
                        contract_state.asks.insert(mint.base.token_id.clone(), mint.ask_amount);
                        contract_state.owners.insert(mint.base.token_id, mint.base.owner);
                    }
                    ExecuteMsg::SetBid {
                        token_id,
                        amount,
                        bidder,
                    } => {
                        if amount.amount == 0 {
                            return Err(rejected("InvalidBidAmount"));
                        }
                        let ask = contract_state
                            .asks
                            .get(&token_id)
                            .cloned()
                            .ok_or_else(|| rejected("media::state::Ask not found"))?;
                        contract_state
                            .bids
                            .insert((token_id.clone(), bidder.clone()), amount.clone());
                        if amount.denom == ask.denom && amount.amount >= ask.amount {
                            contract_state.owners.insert(token_id, bidder);
                        }
                    }
                    ExecuteMsg::AcceptBid { token_id, bidder } => {
                        if !contract_state.bids.contains_key(&(token_id.clone(), bidder.clone())) {
                            return Err(rejected("media::state::Bid not found"));
                        }
                        contract_state.owners.insert(token_id, bidder);
                    }
                }
                Ok(TxEvent::new("wasm", &[("_contract_address", contract.as_str()), ("action", action)]))
            }
        }
    }
}

impl ChainClient for MockChain {
    async fn broadcast(
        &self,
        _signer: &Wallet,
        msgs: Vec<WasmMsg>,
        _fee: &Fee,
    ) -> BlockchainResult<TxResult> {
        let mut state = self.state.lock().unwrap();
        state.tx_count += 1;
        let txhash = format!("{:064X}", state.tx_count);

        let mut events = Vec::new();
        for msg in msgs {
            state.broadcasts.push(msg.kind());
            events.push(Self::apply(&mut state, msg)?);
        }

        Ok(TxResult {
            txhash,
            height: state.tx_count,
            events,
            ..Default::default()
        })
    }

    async fn query_contract(&self, contract: &str, query: &Value) -> BlockchainResult<Value> {
        let state = self.state.lock().unwrap();
        let contract_state = state
            .contracts
            .get(contract)
            .ok_or_else(|| BlockchainError::Query(format!("no such contract: {}", contract)))?;
        let query: QueryMsg = serde_json::from_value(query.clone())
            .map_err(|e| BlockchainError::Query(e.to_string()))?;

        match query {
            QueryMsg::OwnerOf { token_id } => contract_state
                .owners
                .get(&token_id)
                .map(|owner| json!({"owner": owner, "approvals": []}))
                .ok_or_else(|| BlockchainError::Query("cw721_base::state::TokenInfo not found".into())),
            QueryMsg::CurrentAskForToken { token_id } => contract_state
                .asks
                .get(&token_id)
                .map(|ask| json!({"ask": {"amount": ask}}))
                .ok_or_else(|| BlockchainError::Query("media::state::Ask not found".into())),
            QueryMsg::BidForTokenBidder { token_id, bidder } => contract_state
                .bids
                .get(&(token_id, bidder.clone()))
                .map(|amount| json!({"bid": {"amount": amount, "bidder": bidder}}))
                .ok_or_else(|| BlockchainError::Query("media::state::Bid not found".into())),
        }
    }

    async fn balance(&self, address: &str) -> BlockchainResult<Vec<Coin>> {
        Ok(self.state.lock().unwrap().balances.get(address).cloned().unwrap_or_default())
    }
}

/// Knobs and observations of the mock LCD server.
#[derive(Debug, Default)]
pub struct LcdState {
    pub chain_id: String,
    /// Code returned by the mempool check.
    pub check_code: u32,
    /// Code returned once the transaction is included.
    pub deliver_code: u32,
    /// Lookups answered with 404 before the transaction shows up.
    pub pending_polls: u32,
    /// Never report the transaction as included.
    pub never_include: bool,
    /// Address reported by instantiate events.
    pub contract_address: String,
    /// Decoded `tx_bytes` lengths of every broadcast.
    pub broadcast_sizes: Vec<usize>,
    /// Decoded smart queries.
    pub queries: Vec<Value>,
    /// Lookups of the pending transaction so far.
    pub tx_lookups: u32,
}

impl LcdState {
    pub fn new(chain_id: &str) -> Self {
        Self {
            chain_id: chain_id.to_string(),
            ..Default::default()
        }
    }
}

pub type SharedLcdState = Arc<Mutex<LcdState>>;

fn not_found(message: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({"code": 5, "message": message, "details": []})))
}

async fn node_info(State(state): State<SharedLcdState>) -> (StatusCode, Json<Value>) {
    let chain_id = state.lock().unwrap().chain_id.clone();
    (StatusCode::OK, Json(json!({"default_node_info": {"network": chain_id}})))
}

async fn account(UrlPath(address): UrlPath<String>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "account": {
                "@type": "/cosmos.auth.v1beta1.BaseAccount",
                "address": address,
                "pub_key": null,
                "account_number": "1",
                "sequence": "0"
            }
        })),
    )
}

async fn broadcast(
    State(state): State<SharedLcdState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut state = state.lock().unwrap();
    let tx_bytes = body["tx_bytes"].as_str().unwrap_or_default();
    let decoded = base64::engine::general_purpose::STANDARD.decode(tx_bytes).unwrap_or_default();
    state.broadcast_sizes.push(decoded.len());

    let code = state.check_code;
    let raw_log = if code == 0 { "[]" } else { "insufficient fees" };
    (
        StatusCode::OK,
        Json(json!({
            "tx_response": {
                "txhash": format!("{:064X}", state.broadcast_sizes.len()),
                "height": "0",
                "code": code,
                "raw_log": raw_log
            }
        })),
    )
}

async fn get_tx(
    State(state): State<SharedLcdState>,
    UrlPath(hash): UrlPath<String>,
) -> (StatusCode, Json<Value>) {
    let mut state = state.lock().unwrap();
    state.tx_lookups += 1;
    if state.never_include || state.tx_lookups <= state.pending_polls {
        return not_found(&format!("tx not found: {}", hash));
    }
    state.tx_lookups = 0;

    let code = state.deliver_code;
    let raw_log = if code == 0 { "" } else { "out of gas" };
    (
        StatusCode::OK,
        Json(json!({
            "tx": {},
            "tx_response": {
                "txhash": hash,
                "height": "120",
                "code": code,
                "raw_log": raw_log,
                "logs": [],
                "events": [
                    {"type": "store_code", "attributes": [{"key": "code_id", "value": "7"}]},
                    {"type": "instantiate", "attributes": [
                        {"key": "_contract_address", "value": state.contract_address},
                        {"key": "code_id", "value": "7"}
                    ]}
                ]
            }
        })),
    )
}

async fn smart_query(
    State(state): State<SharedLcdState>,
    UrlPath((_contract, query)): UrlPath<(String, String)>,
) -> (StatusCode, Json<Value>) {
    let decoded = URL_SAFE.decode(query).unwrap_or_default();
    let query: Value = serde_json::from_slice(&decoded).unwrap_or(Value::Null);
    state.lock().unwrap().queries.push(query.clone());

    if query["owner_of"]["token_id"] == "uniqueid1" {
        (StatusCode::OK, Json(json!({"data": {"owner": "terra1owner", "approvals": []}})))
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"code": 2, "message": "cw721_base::state::TokenInfo not found: query wasm contract failed", "details": []})),
        )
    }
}

async fn balances(UrlPath(_address): UrlPath<String>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "balances": [{"denom": "uluna", "amount": "1000000000"}],
            "pagination": {"next_key": null, "total": "1"}
        })),
    )
}

/// Start a mock LCD endpoint on an ephemeral port.
pub async fn start_mock_lcd(state: SharedLcdState) -> SocketAddr {
    let app = Router::new()
        .route("/cosmos/base/tendermint/v1beta1/node_info", get(node_info))
        .route("/cosmos/auth/v1beta1/accounts/{address}", get(account))
        .route("/cosmos/tx/v1beta1/txs", post(broadcast))
        .route("/cosmos/tx/v1beta1/txs/{hash}", get(get_tx))
        .route("/cosmwasm/wasm/v1/contract/{contract}/smart/{query}", get(smart_query))
        .route("/cosmos/bank/v1beta1/balances/{address}", get(balances))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Network config pointing at a mock LCD endpoint, with fast polling.
pub fn lcd_config(addr: SocketAddr) -> NetworkConfig {
    NetworkConfig {
        lcd_url: format!("http://{}", addr),
        chain_id: "localterra".to_string(),
        rpc_timeout_secs: 5,
        confirmation_timeout_secs: 5,
        poll_interval_ms: 10,
        ..Default::default()
    }
}

/// Temporary artifact directory.
pub struct TestDir(tempfile::TempDir);

impl TestDir {
    pub fn empty() -> Self {
        Self(tempfile::tempdir().unwrap())
    }

    pub fn with_artifact(name: &str) -> Self {
        let dir = Self::empty();
        write_artifact(dir.path(), name);
        dir
    }

    pub fn path(&self) -> &Path {
        self.0.path()
    }
}
