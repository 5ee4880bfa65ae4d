//! # Core Error Types
//!
//! Centralized error definitions for the broadcast-core crate.
//! All errors implement `std::error::Error` and `std::fmt::Display`.

use std::fmt;
use thiserror::Error;

/// Configuration-related errors.
///
/// These block the Idle -> Running transition or reject a mutator call.
/// They are never fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("No private key loaded")]
    EmptyAccountPool,

    #[error("No destination address set for shared-target mode")]
    MissingDestination,

    #[error("Invalid destination address: '{address}'")]
    InvalidDestination { address: String },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Unknown network id {id}")]
    UnknownNetwork { id: u64 },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("I/O error reading {path}: {msg}")]
    IoError { path: String, msg: String },
}

/// Error categories a submission capability may fail with.
///
/// The set is closed: capabilities map whatever their transport surfaces
/// into one of these variants and the classifier never inspects free-form
/// messages beyond `Execution` and `Generic`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    /// The node accepted the request and rejected the transaction while
    /// executing or validating it (reverts, insufficient funds, nonce too low).
    #[error("Transaction execution failed: {details}")]
    Execution { details: String },

    #[error("{message}")]
    Generic { message: String },

    #[error("RPC request failed: {message}")]
    Rpc { message: String },

    #[error("HTTP request failed: {message}")]
    Transport { message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Signing failed: {message}")]
    Signer { message: String },
}

impl SubmitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SubmitError::Execution { .. } => ErrorKind::Execution,
            SubmitError::Generic { .. } => ErrorKind::Generic,
            SubmitError::Rpc { .. } => ErrorKind::Rpc,
            SubmitError::Transport { .. } => ErrorKind::Transport,
            SubmitError::Timeout => ErrorKind::Timeout,
            SubmitError::Signer { .. } => ErrorKind::Signer,
        }
    }
}

/// Category name of a failed attempt, as reported in outcomes and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum ErrorKind {
    Execution,
    Generic,
    Rpc,
    Transport,
    Timeout,
    Signer,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Execution => "TransactionExecutionError",
            ErrorKind::Generic => "Error",
            ErrorKind::Rpc => "RpcRequestError",
            ErrorKind::Transport => "HttpRequestError",
            ErrorKind::Timeout => "TimeoutError",
            ErrorKind::Signer => "SignerError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
