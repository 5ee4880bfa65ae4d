//! # Network Registry
//!
//! Read-only set of selectable network identities. The registry is consulted
//! when the network is changed; the selected chain id then flows into every
//! transaction built afterwards.

use crate::error::ConfigError;
use serde::Serialize;

/// A selectable network identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Network {
    pub id: u64,
    pub name: String,
    pub default_rpc: String,
}

impl Network {
    pub fn new(id: u64, name: impl Into<String>, default_rpc: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            default_rpc: default_rpc.into(),
        }
    }
}

const BUILTIN: &[(u64, &str, &str)] = &[
    (1, "Ethereum", "https://cloudflare-eth.com"),
    (56, "BNB Smart Chain", "https://rpc.ankr.com/bsc"),
    (137, "Polygon", "https://polygon-rpc.com"),
    (42161, "Arbitrum One", "https://arb1.arbitrum.io/rpc"),
    (10, "OP Mainnet", "https://mainnet.optimism.io"),
    (8453, "Base", "https://mainnet.base.org"),
    (43114, "Avalanche", "https://api.avax.network/ext/bc/C/rpc"),
    (250, "Fantom", "https://rpc.ankr.com/fantom"),
    (324, "zkSync Era", "https://mainnet.era.zksync.io"),
    (59144, "Linea Mainnet", "https://rpc.linea.build"),
    (204, "opBNB", "https://opbnb-mainnet-rpc.bnbchain.org"),
    (1116, "Core Dao", "https://rpc.coredao.org"),
    (534352, "Scroll", "https://rpc.scroll.io"),
];

/// Ordered list of networks, first entry is the default selection.
#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    networks: Vec<Network>,
}

impl Default for NetworkRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl NetworkRegistry {
    /// Registry of the inscription-friendly mainnets.
    pub fn builtin() -> Self {
        Self {
            networks: BUILTIN
                .iter()
                .map(|(id, name, rpc)| Network::new(*id, *name, *rpc))
                .collect(),
        }
    }

    /// Add or replace a network. Replacing keeps the original position.
    pub fn with_network(mut self, network: Network) -> Self {
        match self.networks.iter_mut().find(|n| n.id == network.id) {
            Some(existing) => *existing = network,
            None => self.networks.push(network),
        }
        self
    }

    pub fn get(&self, id: u64) -> Result<&Network, ConfigError> {
        self.networks
            .iter()
            .find(|n| n.id == id)
            .ok_or(ConfigError::UnknownNetwork { id })
    }

    /// First registered network. Registries are never empty.
    pub fn default_network(&self) -> &Network {
        &self.networks[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Network> {
        self.networks.iter()
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}
