//! Wallet management and key derivation.
//!
//! # Security
//! - Secret phrases are read ONLY from environment variables
//! - Phrases and keys are never logged or serialized
//! - The phrase is dropped once the signing key is derived

use cosmrs::bip32::DerivationPath;
use cosmrs::crypto::secp256k1::SigningKey;
use cosmrs::crypto::PublicKey;

use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::config::{NetworkConfig, WalletConfig};

/// A signing identity derived from a BIP-39 secret phrase.
pub struct Wallet {
    /// Secp256k1 key at `m/44'/<coin_type>'/0'/0/0`.
    signing_key: SigningKey,
    /// Bech32 account address.
    address: String,
}

impl Wallet {
    /// Derive a wallet from a secret phrase.
    ///
    /// # Arguments
    /// * `phrase` - BIP-39 English mnemonic of 12 to 24 words
    /// * `prefix` - Bech32 address prefix (e.g. "terra")
    /// * `coin_type` - BIP-44 coin type (330 for Terra)
    pub fn from_mnemonic(phrase: &str, prefix: &str, coin_type: u32) -> BlockchainResult<Self> {
        let mnemonic = bip39::Mnemonic::parse_in(bip39::Language::English, phrase.trim())
            .map_err(|e| BlockchainError::Wallet(format!("Invalid secret phrase: {}", e)))?;
        let seed = mnemonic.to_seed("");

        let path: DerivationPath = format!("m/44'/{}'/0'/0/0", coin_type)
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid derivation path: {}", e)))?;

        let signing_key = SigningKey::derive_from_path(seed, &path)
            .map_err(|e| BlockchainError::Wallet(format!("Key derivation failed: {}", e)))?;

        let address = signing_key
            .public_key()
            .account_id(prefix)
            .map_err(|e| BlockchainError::Wallet(format!("Address derivation failed: {}", e)))?
            .to_string();

        tracing::debug!(address = %address, "Wallet derived");

        Ok(Self {
            signing_key,
            address,
        })
    }

    /// Load a wallet whose secret phrase is held in environment variable `var`.
    pub fn from_env(var: &str, prefix: &str, coin_type: u32) -> BlockchainResult<Self> {
        let phrase = std::env::var(var).map_err(|_| {
            BlockchainError::Wallet(format!("Environment variable {} not set", var))
        })?;

        Self::from_mnemonic(&phrase, prefix, coin_type)
    }

    /// Get the wallet's address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Get the wallet's public key.
    pub fn public_key(&self) -> PublicKey {
        self.signing_key.public_key()
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// The two actors of a deployment run.
#[derive(Debug)]
pub struct Identities {
    /// Uploads, instantiates, mints and signs every transaction.
    pub deployer: Wallet,
    /// Named as bidder in the demonstration bid.
    pub counterparty: Wallet,
}

impl Identities {
    /// Derive both identities from the environment variables named in config.
    pub fn from_env(wallets: &WalletConfig, network: &NetworkConfig) -> BlockchainResult<Self> {
        let deployer = Wallet::from_env(
            &wallets.deployer_mnemonic_env,
            &network.account_prefix,
            wallets.coin_type,
        )?;
        let counterparty = Wallet::from_env(
            &wallets.counterparty_mnemonic_env,
            &network.account_prefix,
            wallets.coin_type,
        )?;

        tracing::info!(
            deployer = %deployer.address(),
            counterparty = %counterparty.address(),
            "Identities loaded"
        );

        Ok(Self {
            deployer,
            counterparty,
        })
    }
}
