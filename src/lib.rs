//! Deployment tool for the media NFT marketplace contract.
//!
//! Uploads the compiled contract to a CosmWasm chain through its LCD
//! endpoint, instantiates it, then mints a token and places a bid.

pub mod blockchain;
pub mod config;
pub mod deploy;
pub mod observability;

pub use config::schema::DeployConfig;
pub use deploy::Deployer;
