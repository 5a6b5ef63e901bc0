//! Transaction building, signing, and inclusion monitoring.
//!
//! # Responsibilities
//! - Map wasm messages onto their protobuf counterparts
//! - Build and sign single-signer transactions
//! - Wait for a broadcast transaction to be included in a block

use cosmrs::cosmwasm::{MsgExecuteContract, MsgInstantiateContract, MsgStoreCode};
use cosmrs::tendermint::chain;
use cosmrs::tx::{self, Msg, SignDoc, SignerInfo};
use cosmrs::{AccountId, Any};
use std::time::{Duration, Instant};
use tokio::time::{interval, timeout};

use crate::blockchain::client::LcdClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult, Coin, Fee, TxResult, WasmMsg};
use crate::blockchain::wallet::Wallet;
use crate::observability::metrics;

/// On-chain account state needed to sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountInfo {
    pub account_number: u64,
    pub sequence: u64,
}

/// Transaction builder bound to one client and one signer.
pub struct TxBuilder<'a> {
    client: &'a LcdClient,
    wallet: &'a Wallet,
}

impl<'a> TxBuilder<'a> {
    /// Create a new transaction builder.
    pub fn new(client: &'a LcdClient, wallet: &'a Wallet) -> Self {
        Self { client, wallet }
    }

    /// Build and sign a transaction carrying `msgs`.
    ///
    /// Account number and sequence are read from the chain right before
    /// signing.
    pub async fn build(&self, msgs: &[WasmMsg], fee: &Fee) -> BlockchainResult<Vec<u8>> {
        let account = self.client.account(self.wallet.address()).await?;

        tracing::debug!(
            signer = %self.wallet.address(),
            account_number = account.account_number,
            sequence = account.sequence,
            messages = msgs.len(),
            "Signing transaction"
        );

        sign_tx(self.wallet, msgs, fee, self.client.chain_id(), account)
    }

    /// Wait for a transaction to be included in a block.
    ///
    /// # Arguments
    /// * `txhash` - Hash returned by the broadcast
    /// * `timeout_secs` - Maximum time to wait for inclusion
    pub async fn wait_for_inclusion(
        &self,
        txhash: &str,
        timeout_secs: u64,
    ) -> BlockchainResult<TxResult> {
        let poll_interval = Duration::from_millis(self.client.config().poll_interval_ms);
        let started = Instant::now();

        let result = timeout(Duration::from_secs(timeout_secs), async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                match self.client.get_tx(txhash).await? {
                    Some(result) => return Ok(result),
                    None => tracing::debug!(txhash = %txhash, "Transaction pending"),
                }
            }
        })
        .await;

        match result {
            Ok(included) => {
                metrics::record_inclusion_latency(started.elapsed());
                included
            }
            Err(_) => Err(BlockchainError::ConfirmationTimeout {
                txhash: txhash.to_string(),
                secs: timeout_secs,
            }),
        }
    }
}

/// Encode and sign a transaction, returning the raw bytes to broadcast.
pub fn sign_tx(
    wallet: &Wallet,
    msgs: &[WasmMsg],
    fee: &Fee,
    chain_id: &chain::Id,
    account: AccountInfo,
) -> BlockchainResult<Vec<u8>> {
    let messages = msgs
        .iter()
        .map(to_any)
        .collect::<BlockchainResult<Vec<Any>>>()?;

    let body = tx::Body::new(messages, "", 0u32);
    let fee = tx::Fee::from_amount_and_gas(to_sdk_coin(&fee.amount)?, fee.gas_limit);
    let auth_info =
        SignerInfo::single_direct(Some(wallet.public_key()), account.sequence).auth_info(fee);

    let sign_doc = SignDoc::new(&body, &auth_info, chain_id, account.account_number)
        .map_err(|e| BlockchainError::Encoding(format!("Sign doc: {}", e)))?;
    let raw = sign_doc
        .sign(wallet.signing_key())
        .map_err(|e| BlockchainError::Encoding(format!("Signing failed: {}", e)))?;

    raw.to_bytes()
        .map_err(|e| BlockchainError::Encoding(format!("Serializing tx: {}", e)))
}

fn to_any(msg: &WasmMsg) -> BlockchainResult<Any> {
    let any = match msg {
        WasmMsg::StoreCode {
            sender,
            wasm_byte_code,
        } => MsgStoreCode {
            sender: parse_account_id(sender)?,
            wasm_byte_code: wasm_byte_code.clone(),
            instantiate_permission: None,
        }
        .to_any(),
        WasmMsg::Instantiate {
            sender,
            admin,
            code_id,
            label,
            msg,
            funds,
        } => MsgInstantiateContract {
            sender: parse_account_id(sender)?,
            admin: admin.as_deref().map(parse_account_id).transpose()?,
            code_id: code_id.0,
            label: Some(label.clone()),
            msg: msg.clone(),
            funds: funds.iter().map(to_sdk_coin).collect::<BlockchainResult<_>>()?,
        }
        .to_any(),
        WasmMsg::Execute {
            sender,
            contract,
            msg,
            funds,
        } => MsgExecuteContract {
            sender: parse_account_id(sender)?,
            contract: parse_account_id(contract)?,
            msg: msg.clone(),
            funds: funds.iter().map(to_sdk_coin).collect::<BlockchainResult<_>>()?,
        }
        .to_any(),
    };

    any.map_err(|e| BlockchainError::Encoding(format!("{} message: {}", msg.kind(), e)))
}

fn parse_account_id(address: &str) -> BlockchainResult<AccountId> {
    address
        .parse()
        .map_err(|e| BlockchainError::Encoding(format!("Invalid address '{}': {}", address, e)))
}

fn to_sdk_coin(coin: &Coin) -> BlockchainResult<cosmrs::Coin> {
    let denom = coin
        .denom
        .parse()
        .map_err(|e| BlockchainError::Encoding(format!("Invalid denom '{}': {}", coin.denom, e)))?;

    Ok(cosmrs::Coin {
        denom,
        amount: coin.amount,
    })
}
