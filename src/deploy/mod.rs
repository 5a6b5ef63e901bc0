//! Deployment subsystem.
//!
//! # Data Flow
//! ```text
//! artifacts/<name>.wasm
//!     → artifact.rs (read, checksum)
//!     → driver.rs store_artifact  → CodeId
//!     → driver.rs instantiate     → ContractInstance
//!     → driver.rs execute / query (typed payloads from msg.rs)
//!
//! workflow.rs strings the steps together for the binary.
//! ```
//!
//! # Design Decisions
//! - Each step's output is the next step's input; nothing is retried
//! - Execute and query fail fast with `NotInstantiated` before instantiation
//! - Chain failures are wrapped in the error kind of the step that hit them

pub mod artifact;
pub mod driver;
pub mod error;
pub mod msg;
pub mod workflow;

pub use artifact::Artifact;
pub use driver::{ContractInstance, Deployer};
pub use error::{DeployError, DeployResult};
pub use workflow::DeploymentReport;
