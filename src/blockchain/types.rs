//! Chain-specific types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::FeeConfig;

/// Chain-assigned identifier of stored contract code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodeId(pub u64);

impl From<u64> for CodeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<CodeId> for u64 {
    fn from(id: CodeId) -> Self {
        id.0
    }
}

impl std::fmt::Display for CodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A native token amount. The amount travels as a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    #[serde(with = "amount_string")]
    pub amount: u128,
    pub denom: String,
}

impl Coin {
    pub fn new(amount: u128, denom: impl Into<String>) -> Self {
        Self {
            amount,
            denom: denom.into(),
        }
    }
}

impl std::fmt::Display for Coin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

mod amount_string {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(amount)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

/// Fee attached to a signed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fee {
    pub amount: Coin,
    pub gas_limit: u64,
}

impl From<&FeeConfig> for Fee {
    fn from(config: &FeeConfig) -> Self {
        Self {
            amount: Coin::new(u128::from(config.amount), config.denom.clone()),
            gas_limit: config.gas_limit,
        }
    }
}

/// A wasm module message, independent of its wire encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum WasmMsg {
    StoreCode {
        sender: String,
        wasm_byte_code: Vec<u8>,
    },
    Instantiate {
        sender: String,
        admin: Option<String>,
        code_id: CodeId,
        label: String,
        msg: Vec<u8>,
        funds: Vec<Coin>,
    },
    Execute {
        sender: String,
        contract: String,
        msg: Vec<u8>,
        funds: Vec<Coin>,
    },
}

impl WasmMsg {
    /// Short name used in logs and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            WasmMsg::StoreCode { .. } => "store_code",
            WasmMsg::Instantiate { .. } => "instantiate",
            WasmMsg::Execute { .. } => "execute",
        }
    }
}

/// Key/value pair attached to a transaction event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttribute {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

/// Event emitted while executing a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: Vec<EventAttribute>,
}

impl TxEvent {
    pub fn new(kind: impl Into<String>, attributes: &[(&str, &str)]) -> Self {
        Self {
            kind: kind.into(),
            attributes: attributes
                .iter()
                .map(|(key, value)| EventAttribute {
                    key: key.to_string(),
                    value: value.to_string(),
                })
                .collect(),
        }
    }
}

/// Per-message log of a transaction, as older nodes report them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLog {
    #[serde(default)]
    pub events: Vec<TxEvent>,
}

/// Outcome of a broadcast transaction, as reported by the chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResult {
    pub txhash: String,
    #[serde(default, with = "height_string")]
    pub height: u64,
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub raw_log: String,
    #[serde(default)]
    pub logs: Vec<MessageLog>,
    #[serde(default)]
    pub events: Vec<TxEvent>,
}

mod height_string {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(height: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(height)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Height {
            Text(String),
            Number(u64),
        }

        match Height::deserialize(deserializer)? {
            Height::Text(raw) => raw.parse().map_err(D::Error::custom),
            Height::Number(n) => Ok(n),
        }
    }
}

impl TxResult {
    /// Whether the chain executed the transaction successfully.
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Find the first value of `key` within events of type `event_type`.
    ///
    /// Per-message logs are searched first, then the flat event list that
    /// newer nodes report instead.
    pub fn attribute(&self, event_type: &str, key: &str) -> Option<&str> {
        self.logs
            .iter()
            .flat_map(|log| log.events.iter())
            .chain(self.events.iter())
            .filter(|event| event.kind == event_type)
            .flat_map(|event| event.attributes.iter())
            .find(|attr| attr.key == key)
            .map(|attr| attr.value.as_str())
    }

    /// Code id assigned by a store-code transaction.
    pub fn code_id(&self) -> Option<CodeId> {
        self.attribute("store_code", "code_id")?.parse().ok().map(CodeId)
    }

    /// Address assigned by an instantiate transaction.
    pub fn contract_address(&self) -> Option<&str> {
        self.attribute("instantiate", "_contract_address")
            .or_else(|| self.attribute("instantiate", "contract_address"))
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// HTTP connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// HTTP request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The node has no such entry (account, transaction, contract state).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transaction was not included within the expected time.
    #[error("Transaction {txhash} not included after {secs} seconds")]
    ConfirmationTimeout { txhash: String, secs: u64 },

    /// Transaction was rejected by the chain.
    #[error("Transaction rejected with code {code}: {log}")]
    Rejected { code: u32, log: String },

    /// Contract query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Invalid secret phrase or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Message or transaction could not be encoded or signed.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Node response could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: String, actual: String },

    /// Endpoint URL could not be parsed.
    #[error("Invalid LCD URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;
