//! # Broadcast Core - Scheduled Fan-out Transaction Broadcaster
//!
//! Repeatedly submits one signed transaction per loaded account at a
//! configurable cadence until stopped, recording every outcome and a
//! running success count.
//!
//! ## Modules
//!
//! - [`accounts`] - Account pool derived from raw private keys
//! - [`config`] - Configuration snapshot read by every cycle
//! - [`controller`] - Idle/Running state machine and cycle scheduler
//! - [`engine`] - Concurrent per-cycle submission
//! - [`error`] - Typed error handling with thiserror
//! - [`metrics`] - Bounded log sink and counters
//! - [`networks`] - Selectable network identities
//! - [`outcome`] - Outcome classification
//! - [`template`] - Per-cycle transaction parameters
//! - [`traits`] - Submission capability

pub mod accounts;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod networks;
pub mod outcome;
pub mod template;
pub mod traits;
pub(crate) mod utils;

pub use accounts::{parse_address, read_key_file, short_address, Account, AccountPool};
pub use config::{Configuration, DestinationMode, GasPolicy, DEFAULT_VALUE_WEI};
pub use controller::{KeyImport, Observation, RunController, RunState};
pub use error::{ConfigError, ErrorKind, SubmitError};
pub use metrics::{LogEntry, LogSink, MetricsSnapshot, Severity, LOG_CAPACITY};
pub use networks::{Network, NetworkRegistry};
pub use outcome::{classify, Outcome};
pub use template::{SubmissionRequest, TransactionTemplate};
pub use traits::Submitter;

pub use utils::{gwei_to_wei, setup_logger};
