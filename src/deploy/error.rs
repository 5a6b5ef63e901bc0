//! Deployment step errors.

use std::path::PathBuf;
use thiserror::Error;

use crate::blockchain::BlockchainError;

/// Errors raised by the deployment driver, one kind per step.
#[derive(Debug, Error)]
pub enum DeployError {
    /// The compiled contract is not where it was expected.
    #[error("Artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),

    /// The artifact exists but could not be read.
    #[error("Reading artifact {}: {source}", .path.display())]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store-code transaction failed.
    #[error("Store code failed: {0}")]
    Broadcast(#[source] BlockchainError),

    /// Instantiate transaction failed.
    #[error("Instantiation failed: {0}")]
    Instantiation(#[source] BlockchainError),

    /// Execute transaction failed.
    #[error("Execution failed: {0}")]
    Execution(#[source] BlockchainError),

    /// Contract query failed.
    #[error("Query failed: {0}")]
    Query(#[source] BlockchainError),

    /// Balance lookup or identity derivation failed.
    #[error(transparent)]
    Chain(#[from] BlockchainError),

    /// A contract step was attempted before `instantiate` succeeded.
    #[error("No contract instantiated yet")]
    NotInstantiated,

    /// The chain accepted a transaction but its events lack an expected value.
    #[error("Transaction {txhash} has no {event}.{key} attribute")]
    MissingAttribute {
        txhash: String,
        event: &'static str,
        key: &'static str,
    },

    /// A payload could not be serialized, or a response decoded.
    #[error("Payload error: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Result type for deployment steps.
pub type DeployResult<T> = Result<T, DeployError>;
