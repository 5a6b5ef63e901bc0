//! Typed payloads of the media contract.
//!
//! Execute and query messages are externally tagged with snake_case keys,
//! so `ExecuteMsg::SetBid { .. }` serializes as `{"set_bid": {..}}`.

use serde::{Deserialize, Serialize};

use crate::blockchain::Coin;

/// Instantiation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstantiateMsg {
    pub name: String,
    pub symbol: String,
    pub minter: String,
}

/// Base token data accepted by the underlying cw721 mint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMint {
    pub token_id: String,
    pub owner: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintMsg {
    pub ask_amount: Coin,
    pub base: TokenMint,
}

/// State-changing calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    Mint(MintMsg),
    SetBid {
        token_id: String,
        amount: Coin,
        bidder: String,
    },
    AcceptBid {
        token_id: String,
        bidder: String,
    },
}

impl ExecuteMsg {
    /// The action key this message serializes under.
    pub fn action(&self) -> &'static str {
        match self {
            ExecuteMsg::Mint(_) => "mint",
            ExecuteMsg::SetBid { .. } => "set_bid",
            ExecuteMsg::AcceptBid { .. } => "accept_bid",
        }
    }
}

/// Read-only queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    OwnerOf { token_id: String },
    CurrentAskForToken { token_id: String },
    BidForTokenBidder { token_id: String, bidder: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerOfResponse {
    pub owner: String,
    #[serde(default)]
    pub approvals: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ask {
    pub amount: Coin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub amount: Coin,
    pub bidder: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAskForTokenResponse {
    pub ask: Ask,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidForTokenBidderResponse {
    pub bid: Bid,
}
