//! # Broadcast Configuration
//!
//! The single configuration snapshot read at the start of every cycle.
//! Cycles receive a clone, never a reference.

use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;
use crate::networks::Network;
use crate::utils::gas::gwei_to_wei;

/// 0.001 ether
pub const DEFAULT_VALUE_WEI: u64 = 1_000_000_000_000_000;

/// Where each account sends its transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DestinationMode {
    /// Each account sends to its own address.
    #[default]
    #[serde(rename = "self")]
    SelfTransfer,
    /// Every account sends to one configured address.
    SharedTarget,
}

/// Gas override applied to every attempt. Amounts are in gwei.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GasPolicy {
    /// Network defaults for every fee field.
    #[default]
    None,
    /// Absolute gas price.
    TotalPrice(f64),
    /// Priority fee only, base fee left to the network.
    PriorityTip(f64),
}

impl GasPolicy {
    pub fn amount(&self) -> f64 {
        match self {
            GasPolicy::None => 0.0,
            GasPolicy::TotalPrice(gwei) | GasPolicy::PriorityTip(gwei) => *gwei,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        gwei_to_wei(self.amount()).map(|_| ())
    }
}

#[derive(Debug, Clone)]
pub struct Configuration {
    pub mode: DestinationMode,
    /// Shared target, only consulted in `SharedTarget` mode.
    pub target: Option<Address>,
    /// Raw inscription text, sent as UTF-8 bytes.
    pub payload: String,
    pub gas: GasPolicy,
    /// Transfer value in wei.
    pub value: U256,
    pub delay: Duration,
    pub network: Network,
}

impl Configuration {
    pub fn new(network: Network) -> Self {
        Self {
            mode: DestinationMode::default(),
            target: None,
            payload: String::new(),
            gas: GasPolicy::default(),
            value: U256::from(DEFAULT_VALUE_WEI),
            delay: Duration::ZERO,
            network,
        }
    }

    /// Checks that a cycle can be built from this snapshot.
    pub fn validate_destination(&self) -> Result<(), ConfigError> {
        match (self.mode, self.target) {
            (DestinationMode::SharedTarget, None) => Err(ConfigError::MissingDestination),
            _ => Ok(()),
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.network.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network() -> Network {
        Network::new(1, "Ethereum", "https://cloudflare-eth.com")
    }

    #[test]
    fn test_defaults() {
        let config = Configuration::new(network());
        assert_eq!(config.mode, DestinationMode::SelfTransfer);
        assert_eq!(config.gas, GasPolicy::None);
        assert_eq!(config.value, U256::exp10(15));
        assert_eq!(config.delay, Duration::ZERO);
        assert_eq!(config.chain_id(), 1);
    }

    #[test]
    fn test_shared_target_requires_address() {
        let mut config = Configuration::new(network());
        config.mode = DestinationMode::SharedTarget;
        assert_eq!(
            config.validate_destination(),
            Err(ConfigError::MissingDestination)
        );

        config.target = Some(Address::repeat_byte(0x11));
        assert!(config.validate_destination().is_ok());
    }

    #[test]
    fn test_gas_policy_validation() {
        assert!(GasPolicy::TotalPrice(10.0).validate().is_ok());
        assert!(GasPolicy::PriorityTip(-1.0).validate().is_err());
        assert!(GasPolicy::None.validate().is_ok());
    }

    #[test]
    fn test_destination_mode_serde_names() {
        let json = serde_json::to_string(&DestinationMode::SelfTransfer).unwrap();
        assert_eq!(json, "\"self\"");
        let mode: DestinationMode = serde_json::from_str("\"shared-target\"").unwrap();
        assert_eq!(mode, DestinationMode::SharedTarget);
    }
}
