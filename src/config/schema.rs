//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the deployer.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for a deployment run.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DeployConfig {
    /// LCD endpoint and chain identity.
    pub network: NetworkConfig,

    /// Fee attached to every signed transaction.
    pub fee: FeeConfig,

    /// Where the signing identities come from.
    pub wallets: WalletConfig,

    /// Location of the compiled contract.
    pub artifact: ArtifactConfig,

    /// Parameters of the demonstration transactions.
    pub demo: DemoConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Chain endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// LCD (REST) endpoint URL.
    pub lcd_url: String,

    /// Chain ID (e.g., "localterra", "pisco-1").
    pub chain_id: String,

    /// Bech32 prefix of account addresses.
    pub account_prefix: String,

    /// HTTP request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// How long to wait for a broadcast transaction to be included.
    pub confirmation_timeout_secs: u64,

    /// Polling interval while waiting for inclusion, in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            lcd_url: "http://localhost:1317".to_string(),
            chain_id: "localterra".to_string(),
            account_prefix: "terra".to_string(),
            rpc_timeout_secs: 10,
            confirmation_timeout_secs: 60,
            poll_interval_ms: 1000,
        }
    }
}

/// Transaction fee configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeeConfig {
    /// Gas limit for each transaction.
    pub gas_limit: u64,

    /// Fee amount in the smallest denomination.
    pub amount: u64,

    /// Fee denomination.
    pub denom: String,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            gas_limit: 5_000_000,
            amount: 1_000_000,
            denom: "uluna".to_string(),
        }
    }
}

/// Wallet configuration.
///
/// Secret phrases are never part of the file: only the names of the
/// environment variables that hold them.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Environment variable holding the deployer's secret phrase.
    pub deployer_mnemonic_env: String,

    /// Environment variable holding the counterparty's secret phrase.
    pub counterparty_mnemonic_env: String,

    /// BIP-44 coin type used for key derivation (330 for Terra).
    pub coin_type: u32,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            deployer_mnemonic_env: "DEPLOYER_MNEMONIC".to_string(),
            counterparty_mnemonic_env: "COUNTERPARTY_MNEMONIC".to_string(),
            coin_type: 330,
        }
    }
}

/// Compiled contract location.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Directory holding `<name>.wasm` files.
    pub dir: String,

    /// Contract name, without the `.wasm` extension.
    pub name: String,

    /// Label given to the instantiated contract.
    pub label: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: "artifacts".to_string(),
            name: "media".to_string(),
            label: "media".to_string(),
        }
    }
}

/// Demonstration workflow parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Collection name passed at instantiation.
    pub collection_name: String,

    /// Collection symbol passed at instantiation.
    pub collection_symbol: String,

    pub token_id: String,
    pub token_name: String,
    pub token_description: String,
    pub token_image: String,

    /// Ask amount recorded when minting.
    pub ask_amount: u64,

    /// Amount offered by the counterparty.
    pub bid_amount: u64,

    /// Denomination of ask and bid.
    pub denom: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            collection_name: "New Coin".to_string(),
            collection_symbol: "NC".to_string(),
            token_id: "uniqueid1".to_string(),
            token_name: "NFT".to_string(),
            token_description: "the description".to_string(),
            token_image: "https://picsum.photos/id/1025/200/300".to_string(),
            ask_amount: 10,
            // Below the ask, so ownership does not move.
            bid_amount: 5,
            denom: "uluna".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
