//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (secret phrases)
//!     → wallet.rs (key derivation, addresses)
//!     → transaction.rs (build, sign, wait for inclusion)
//!     → client.rs (LCD endpoint with timeouts, ChainClient seam)
//! ```
//!
//! # Security Constraints
//! - Secret phrases ONLY from environment variables
//! - Never log secret phrases or keys
//! - All HTTP calls have configurable timeouts
//! - No retries: a failed broadcast is reported, never resubmitted

pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{ChainClient, LcdClient};
pub use types::{BlockchainError, BlockchainResult, CodeId, Coin, Fee, TxResult, WasmMsg};
pub use wallet::{Identities, Wallet};
