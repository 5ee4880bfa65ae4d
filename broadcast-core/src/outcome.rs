//! # Outcome Classifier
//!
//! Normalizes settled submissions into success/failure records. Classification
//! cannot fail.

use ethers::types::{Address, TxHash};
use serde::Serialize;

use crate::accounts::short_address;
use crate::error::{ErrorKind, SubmitError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Outcome {
    Success {
        address: Address,
        transaction_id: TxHash,
    },
    Failure {
        address: Address,
        kind: ErrorKind,
        detail: String,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn address(&self) -> Address {
        match self {
            Outcome::Success { address, .. } | Outcome::Failure { address, .. } => *address,
        }
    }

    /// Log line for this outcome: `0xAbCd...1234 <hash>` or
    /// `0xAbCd...1234 <Kind>: <detail>`.
    pub fn message(&self) -> String {
        match self {
            Outcome::Success {
                address,
                transaction_id,
            } => format!("{} {:#x}", short_address(address), transaction_id),
            Outcome::Failure {
                address,
                kind,
                detail,
            } => format!("{} {}: {}", short_address(address), kind, detail),
        }
    }
}

/// Map a settled submission to an outcome.
///
/// Only execution and generic errors carry a detail; every other category
/// reports its name alone.
pub fn classify(address: Address, result: Result<TxHash, SubmitError>) -> Outcome {
    match result {
        Ok(transaction_id) => Outcome::Success {
            address,
            transaction_id,
        },
        Err(err) => {
            let kind = err.kind();
            let detail = match err {
                SubmitError::Execution { details } => details,
                SubmitError::Generic { message } => message,
                _ => String::new(),
            };
            Outcome::Failure {
                address,
                kind,
                detail,
            }
        }
    }
}
