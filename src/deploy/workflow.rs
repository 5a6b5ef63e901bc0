//! The demonstration sequence run by the binary.

use serde::Serialize;
use std::path::Path;

use crate::blockchain::{ChainClient, CodeId, Coin, Identities};
use crate::config::{ArtifactConfig, DemoConfig};
use crate::deploy::driver::Deployer;
use crate::deploy::error::DeployResult;
use crate::deploy::msg::{
    Ask, CurrentAskForTokenResponse, ExecuteMsg, InstantiateMsg, MintMsg, OwnerOfResponse,
    QueryMsg, TokenMint,
};

/// Balances of both identities at one point in the run.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceSnapshot {
    pub deployer: Vec<Coin>,
    pub counterparty: Vec<Coin>,
}

/// What a full run produced.
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentReport {
    pub deployer: String,
    pub counterparty: String,
    pub code_id: CodeId,
    pub contract_address: String,
    pub mint_txhash: String,
    pub bid_txhash: String,
    pub owner_after_mint: String,
    pub ask: Ask,
    pub owner_after_bid: String,
    pub balances_before: BalanceSnapshot,
    pub balances_after: BalanceSnapshot,
}

/// Read both identities' balances.
pub async fn snapshot_balances<C: ChainClient>(
    deployer: &Deployer<C>,
    identities: &Identities,
) -> DeployResult<BalanceSnapshot> {
    Ok(BalanceSnapshot {
        deployer: deployer.balance(identities.deployer.address()).await?,
        counterparty: deployer.balance(identities.counterparty.address()).await?,
    })
}

/// Store, instantiate, mint, and bid, in that order.
///
/// Every transaction is signed by the deployer identity; the counterparty
/// only appears as the bidder. The first failure aborts the run.
pub async fn run<C: ChainClient>(
    deployer: &mut Deployer<C>,
    identities: &Identities,
    artifact: &ArtifactConfig,
    demo: &DemoConfig,
) -> DeployResult<DeploymentReport> {
    let owner = &identities.deployer;
    let bidder = &identities.counterparty;

    let balances_before = snapshot_balances(deployer, identities).await?;
    tracing::info!(
        address = %owner.address(),
        balance = ?balances_before.deployer,
        "Deployer balance"
    );

    let code_id = deployer
        .store_artifact(owner, Path::new(&artifact.dir), &artifact.name)
        .await?;

    let init = InstantiateMsg {
        name: demo.collection_name.clone(),
        symbol: demo.collection_symbol.clone(),
        minter: owner.address().to_string(),
    };
    let instance = deployer.instantiate(owner, code_id, &init).await?;

    let mint = ExecuteMsg::Mint(MintMsg {
        ask_amount: Coin::new(u128::from(demo.ask_amount), demo.denom.clone()),
        base: TokenMint {
            token_id: demo.token_id.clone(),
            owner: owner.address().to_string(),
            name: demo.token_name.clone(),
            description: Some(demo.token_description.clone()),
            image: Some(demo.token_image.clone()),
        },
    });
    let minted = deployer.execute(owner, &mint).await?;

    let owner_of = QueryMsg::OwnerOf {
        token_id: demo.token_id.clone(),
    };
    let owner_after_mint: OwnerOfResponse = deployer.query(&owner_of).await?;
    let current_ask: CurrentAskForTokenResponse = deployer
        .query(&QueryMsg::CurrentAskForToken {
            token_id: demo.token_id.clone(),
        })
        .await?;
    tracing::info!(owner = %owner_after_mint.owner, ask = %current_ask.ask.amount, "Token minted");

    let bid = ExecuteMsg::SetBid {
        token_id: demo.token_id.clone(),
        amount: Coin::new(u128::from(demo.bid_amount), demo.denom.clone()),
        bidder: bidder.address().to_string(),
    };
    let bid_result = deployer.execute(owner, &bid).await?;

    let balances_after = snapshot_balances(deployer, identities).await?;
    let owner_after_bid: OwnerOfResponse = deployer.query(&owner_of).await?;
    tracing::info!(
        owner = %owner_after_bid.owner,
        transferred = owner_after_bid.owner != owner_after_mint.owner,
        "Bid placed"
    );

    Ok(DeploymentReport {
        deployer: owner.address().to_string(),
        counterparty: bidder.address().to_string(),
        code_id,
        contract_address: instance.address,
        mint_txhash: minted.txhash,
        bid_txhash: bid_result.txhash,
        owner_after_mint: owner_after_mint.owner,
        ask: current_ask.ask,
        owner_after_bid: owner_after_bid.owner,
        balances_before,
        balances_after,
    })
}
