//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stderr via the fmt layer
//!     → whatever metrics recorder the embedding program installs
//! ```
//!
//! # Design Decisions
//! - Structured fields (txhash, code_id, contract) over interpolated text
//! - Secret phrases and keys never reach a log line
//! - Metrics are cheap no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
