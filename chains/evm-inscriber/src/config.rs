use anyhow::{Context, Result};
use broadcast_core::{
    read_key_file, DestinationMode, GasPolicy, Network, NetworkRegistry, RunController,
    Submitter,
};
use config::{Config, Environment, File};
use ethers::utils::parse_ether;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GasMode {
    #[default]
    None,
    Total,
    Tip,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InscriberConfig {
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    pub rpc_url: Option<String>,
    #[serde(default = "default_key_file")]
    pub private_key_file: String,
    #[serde(default)]
    pub mode: DestinationMode,
    pub to_address: Option<String>,
    #[serde(default)]
    pub inscription: String,
    #[serde(default)]
    pub gas_mode: GasMode,
    #[serde(default)]
    pub gas_gwei: f64,
    #[serde(default = "default_value_ether")]
    pub value_ether: String,
    #[serde(default)]
    pub delay_ms: u64,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

fn default_chain_id() -> u64 {
    1
}

fn default_key_file() -> String {
    "pv.txt".to_string()
}

fn default_value_ether() -> String {
    "0.001".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Environment variable holding keys, overriding the key file.
pub const KEYS_ENV: &str = "PRIVATE_KEYS";

impl InscriberConfig {
    /// Load `path` (optional) overlaid with `INSCRIBER_*` environment variables.
    pub fn load(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("INSCRIBER").try_parsing(true))
            .build()?;

        settings.try_deserialize().map_err(|e| anyhow::anyhow!(e))
    }

    pub fn gas_policy(&self) -> GasPolicy {
        match self.gas_mode {
            GasMode::None => GasPolicy::None,
            GasMode::Total => GasPolicy::TotalPrice(self.gas_gwei),
            GasMode::Tip => GasPolicy::PriorityTip(self.gas_gwei),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Builtin networks plus the configured chain when it is not builtin.
    pub fn registry(&self) -> Result<NetworkRegistry> {
        let registry = NetworkRegistry::builtin();
        if registry.get(self.chain_id).is_ok() {
            return Ok(registry);
        }

        let rpc = self.rpc_url.clone().with_context(|| {
            format!(
                "chain {} is not a known network, rpc_url is required",
                self.chain_id
            )
        })?;
        Ok(registry.with_network(Network::new(self.chain_id, "Custom", rpc)))
    }

    pub fn rpc_url(&self, registry: &NetworkRegistry) -> Result<String> {
        match &self.rpc_url {
            Some(url) => Ok(url.clone()),
            None => Ok(registry.get(self.chain_id)?.default_rpc.clone()),
        }
    }

    /// Raw key text: `--keys` file, then `PRIVATE_KEYS`, then `private_key_file`.
    /// Commas are accepted as separators in the environment variable.
    pub fn load_keys(&self, override_path: Option<&str>) -> Result<String> {
        if let Some(path) = override_path {
            return Ok(read_key_file(path)?);
        }

        if let Ok(keys) = std::env::var(KEYS_ENV) {
            return Ok(keys.replace(',', "\n"));
        }

        Ok(read_key_file(&self.private_key_file)?)
    }

    /// Push every setting into the controller.
    pub async fn apply<S: Submitter + 'static>(&self, controller: &RunController<S>) -> Result<()> {
        controller.set_network(self.chain_id).await?;

        if let Some(address) = &self.to_address {
            if let Err(e) = controller.set_destination(address).await {
                warn!("Ignoring to_address: {}", e);
            }
        }
        controller.set_destination_mode(self.mode).await?;
        controller.set_payload(&self.inscription).await;
        controller.set_gas_policy(self.gas_policy()).await?;

        let value = parse_ether(&self.value_ether)
            .with_context(|| format!("Invalid value_ether: {}", self.value_ether))?;
        controller.set_value(value).await;
        controller.set_delay(self.delay_ms).await;

        Ok(())
    }
}
