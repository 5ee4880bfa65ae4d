//! # Run Controller
//!
//! Idle/Running state machine that owns the recurring cycle scheduler.
//!
//! Configuration, account pool, run state and the log sink live behind one
//! mutex. Cycles read a cloned snapshot at trigger time, and a separate gate
//! keeps at most one cycle in flight, across restarts included.

use ethers::types::{Address, U256};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn, Instrument};

use crate::accounts::{parse_address, AccountPool};
use crate::config::{Configuration, DestinationMode, GasPolicy};
use crate::engine;
use crate::error::ConfigError;
use crate::metrics::{LogEntry, LogSink, MetricsSnapshot, Severity};
use crate::networks::{Network, NetworkRegistry};
use crate::template::TransactionTemplate;
use crate::traits::Submitter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunState {
    Idle,
    Running,
}

/// Read-only view for display.
#[derive(Debug, Clone, Serialize)]
pub struct Observation {
    pub is_running: bool,
    pub success_count: u64,
    pub log_entries: Vec<LogEntry>,
}

/// Result of a key import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyImport {
    pub accepted: usize,
    pub rejected: usize,
}

struct Shared {
    config: Configuration,
    pool: AccountPool,
    state: RunState,
    sink: LogSink,
    /// Token of the armed scheduler, `Some` exactly while Running.
    scheduler: Option<CancellationToken>,
}

pub struct RunController<S: Submitter + 'static> {
    shared: Arc<Mutex<Shared>>,
    submitter: Arc<S>,
    registry: NetworkRegistry,
    cycle_gate: Arc<Mutex<()>>,
    shutdown: CancellationToken,
}

impl<S: Submitter + 'static> RunController<S> {
    pub fn new(submitter: S, registry: NetworkRegistry) -> Self {
        let config = Configuration::new(registry.default_network().clone());
        Self {
            shared: Arc::new(Mutex::new(Shared {
                config,
                pool: AccountPool::default(),
                state: RunState::Idle,
                sink: LogSink::new(),
                scheduler: None,
            })),
            submitter: Arc::new(submitter),
            registry,
            cycle_gate: Arc::new(Mutex::new(())),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn registry(&self) -> &NetworkRegistry {
        &self.registry
    }

    // --- configuration mutators, effective on the next cycle ---

    /// Replace the whole account pool.
    ///
    /// A Running controller refuses an import that yields no account and
    /// keeps its current pool.
    pub async fn set_keys(&self, raw: &str) -> Result<KeyImport, ConfigError> {
        let pool = AccountPool::parse(raw);
        let import = KeyImport {
            accepted: pool.len(),
            rejected: pool.rejected(),
        };

        let mut shared = self.shared.lock().await;
        if shared.state == RunState::Running && pool.is_empty() {
            let err = ConfigError::EmptyAccountPool;
            shared.sink.push(err.to_string(), Severity::Error);
            return Err(err);
        }
        shared.pool = pool;
        Ok(import)
    }

    /// Set the shared target. An invalid address leaves the previous one.
    pub async fn set_destination(&self, address: &str) -> Result<Address, ConfigError> {
        let address = parse_address(address)?;
        self.shared.lock().await.config.target = Some(address);
        Ok(address)
    }

    /// Switch destination mode. Switching a Running controller to
    /// shared-target requires a target to be set already.
    pub async fn set_destination_mode(&self, mode: DestinationMode) -> Result<(), ConfigError> {
        let mut shared = self.shared.lock().await;
        if shared.state == RunState::Running
            && mode == DestinationMode::SharedTarget
            && shared.config.target.is_none()
        {
            return Err(ConfigError::MissingDestination);
        }
        shared.config.mode = mode;
        Ok(())
    }

    pub async fn set_payload(&self, text: &str) {
        self.shared.lock().await.config.payload = text.trim().to_string();
    }

    pub async fn set_gas_policy(&self, policy: GasPolicy) -> Result<(), ConfigError> {
        policy.validate()?;
        self.shared.lock().await.config.gas = policy;
        Ok(())
    }

    pub async fn set_delay(&self, ms: u64) {
        self.shared.lock().await.config.delay = Duration::from_millis(ms);
    }

    pub async fn set_value(&self, wei: U256) {
        self.shared.lock().await.config.value = wei;
    }

    pub async fn set_network(&self, id: u64) -> Result<Network, ConfigError> {
        let network = self.registry.get(id)?.clone();
        self.shared.lock().await.config.network = network.clone();
        Ok(network)
    }

    // --- run state ---

    /// Idle -> Running.
    ///
    /// Rejected with one error log entry when the pool is empty or
    /// shared-target mode has no destination. Starting a Running controller
    /// is a no-op.
    pub async fn start(&self) -> Result<(), ConfigError> {
        let mut shared = self.shared.lock().await;
        if shared.state == RunState::Running {
            return Ok(());
        }

        let guard = if shared.pool.is_empty() {
            Err(ConfigError::EmptyAccountPool)
        } else {
            shared.config.validate_destination()
        };
        if let Err(e) = guard {
            shared.sink.push(e.to_string(), Severity::Error);
            return Err(e);
        }

        let token = self.shutdown.child_token();
        shared.scheduler = Some(token.clone());
        shared.state = RunState::Running;

        info!(
            "Started: {} account(s) on {} (chain {})",
            shared.pool.len(),
            shared.config.network.name,
            shared.config.chain_id()
        );

        let span = tracing::info_span!("scheduler", chain_id = shared.config.chain_id());
        tokio::spawn(
            schedule(
                Arc::clone(&self.shared),
                Arc::clone(&self.submitter),
                Arc::clone(&self.cycle_gate),
                token,
            )
            .instrument(span),
        );

        Ok(())
    }

    /// Running -> Idle. Prevents future cycles; an in-flight cycle still
    /// completes and logs its outcomes.
    pub async fn stop(&self) {
        let mut shared = self.shared.lock().await;
        if let Some(token) = shared.scheduler.take() {
            token.cancel();
            info!("Stopped.");
        }
        shared.state = RunState::Idle;
    }

    /// Wait until no cycle is in flight.
    pub async fn drain(&self) {
        let _idle = self.cycle_gate.lock().await;
    }

    pub async fn state(&self) -> RunState {
        self.shared.lock().await.state
    }

    pub async fn observe(&self) -> Observation {
        let shared = self.shared.lock().await;
        Observation {
            is_running: shared.state == RunState::Running,
            success_count: shared.sink.success_count(),
            log_entries: shared.sink.entries(),
        }
    }

    pub async fn clear_logs(&self) {
        self.shared.lock().await.sink.clear();
    }

    pub async fn metrics(&self) -> MetricsSnapshot {
        self.shared.lock().await.sink.snapshot()
    }

    pub async fn config(&self) -> Configuration {
        self.shared.lock().await.config.clone()
    }
}

impl<S: Submitter + 'static> Drop for RunController<S> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Scheduler body: wait the configured delay, run one cycle, repeat.
///
/// The delay is re-read before every wait and counts from the end of the
/// previous cycle, so cycles never overlap.
async fn schedule<S: Submitter + 'static>(
    shared: Arc<Mutex<Shared>>,
    submitter: Arc<S>,
    cycle_gate: Arc<Mutex<()>>,
    token: CancellationToken,
) {
    loop {
        let delay = shared.lock().await.config.delay;
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = sleep(delay) => {}
        }

        let _in_flight = cycle_gate.lock().await;

        let (template, accounts) = {
            let mut shared = shared.lock().await;
            // `stop` cancels under this lock: a cycle either snapshots
            // before it or never starts.
            if token.is_cancelled() {
                break;
            }
            match TransactionTemplate::from_config(&shared.config) {
                Ok(template) => (template, shared.pool.accounts()),
                Err(e) => {
                    warn!("Skipping cycle: {}", e);
                    shared.sink.push(e.to_string(), Severity::Error);
                    continue;
                }
            }
        };

        let outcomes = engine::run_cycle(submitter.as_ref(), &template, &accounts).await;

        let mut shared = shared.lock().await;
        for outcome in &outcomes {
            shared.sink.record(outcome);
        }
        shared.sink.finish_cycle();
    }
}
