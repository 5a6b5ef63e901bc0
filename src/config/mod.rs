//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → DeployConfig (validated, immutable)
//!
//! Secret phrases:
//!     environment variables named in [wallets]
//!     → blockchain::wallet (never stored in config)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::DeployConfig;
pub use schema::NetworkConfig;
pub use schema::FeeConfig;
pub use schema::WalletConfig;
pub use schema::ArtifactConfig;
pub use schema::DemoConfig;
pub use schema::ObservabilityConfig;
