//! # Transaction Template Builder
//!
//! Turns one configuration snapshot into the parameter set shared by every
//! attempt of a cycle, then specializes it per account.

use ethers::types::{Address, Bytes, U256};

use crate::accounts::Account;
use crate::config::{Configuration, DestinationMode, GasPolicy};
use crate::error::ConfigError;
use crate::utils::gas::gwei_to_wei;

/// Parameters for one submission. At most one gas field is ever set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub chain_id: u64,
    pub to: Address,
    pub value: U256,
    pub data: Option<Bytes>,
    pub gas_price: Option<U256>,
    pub max_priority_fee_per_gas: Option<U256>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Destination {
    Own,
    Shared(Address),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GasField {
    Unset,
    Price(U256),
    PriorityFee(U256),
}

/// Per-cycle template built from a configuration snapshot.
#[derive(Debug, Clone)]
pub struct TransactionTemplate {
    chain_id: u64,
    destination: Destination,
    value: U256,
    data: Option<Bytes>,
    gas: GasField,
}

impl TransactionTemplate {
    pub fn from_config(config: &Configuration) -> Result<Self, ConfigError> {
        let destination = match config.mode {
            DestinationMode::SelfTransfer => Destination::Own,
            DestinationMode::SharedTarget => {
                Destination::Shared(config.target.ok_or(ConfigError::MissingDestination)?)
            }
        };

        let payload = config.payload.trim();
        let data = if payload.is_empty() {
            None
        } else {
            Some(Bytes::from(payload.as_bytes().to_vec()))
        };

        // amounts that truncate to 0 wei are no override
        let gas = match config.gas {
            GasPolicy::None => GasField::Unset,
            GasPolicy::TotalPrice(gwei) => match gwei_to_wei(gwei)? {
                wei if wei.is_zero() => GasField::Unset,
                wei => GasField::Price(wei),
            },
            GasPolicy::PriorityTip(gwei) => match gwei_to_wei(gwei)? {
                wei if wei.is_zero() => GasField::Unset,
                wei => GasField::PriorityFee(wei),
            },
        };

        Ok(Self {
            chain_id: config.chain_id(),
            destination,
            value: config.value,
            data,
            gas,
        })
    }

    pub fn request_for(&self, account: &Account) -> SubmissionRequest {
        let to = match self.destination {
            Destination::Own => account.address(),
            Destination::Shared(target) => target,
        };

        let (gas_price, max_priority_fee_per_gas) = match self.gas {
            GasField::Unset => (None, None),
            GasField::Price(price) => (Some(price), None),
            GasField::PriorityFee(tip) => (None, Some(tip)),
        };

        SubmissionRequest {
            chain_id: self.chain_id,
            to,
            value: self.value,
            data: self.data.clone(),
            gas_price,
            max_priority_fee_per_gas,
        }
    }
}
