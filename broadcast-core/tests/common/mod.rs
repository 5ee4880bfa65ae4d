#![allow(dead_code)]

use async_trait::async_trait;
use broadcast_core::{Account, AccountPool, SubmissionRequest, SubmitError, Submitter};
use ethers::types::{Address, TxHash};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::{sleep, Instant};

pub const KEYS: [&str; 4] = [
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
    "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
    "5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a",
    "0x7c852118294e51e653712a81e05800f419141751be58f605c371e15141b007a6",
];

pub fn keys(n: usize) -> String {
    KEYS[..n].join("\n")
}

pub fn addresses(n: usize) -> Vec<Address> {
    AccountPool::parse(&keys(n)).addresses()
}

#[derive(Default)]
struct State {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    failures: Mutex<HashMap<Address, SubmitError>>,
    latency: Mutex<HashMap<Address, Duration>>,
    requests: Mutex<Vec<SubmissionRequest>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

/// Scripted submission capability: per-address failures and latencies,
/// an optional gate holding every attempt, and in-flight accounting.
#[derive(Clone, Default)]
pub struct ScriptedSubmitter {
    state: Arc<State>,
}

impl ScriptedSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(self, address: Address, err: SubmitError) -> Self {
        self.state.failures.lock().unwrap().insert(address, err);
        self
    }

    pub fn latency(self, address: Address, latency: Duration) -> Self {
        self.state.latency.lock().unwrap().insert(address, latency);
        self
    }

    pub fn latency_all(self, addresses: &[Address], latency: Duration) -> Self {
        for address in addresses {
            self.state.latency.lock().unwrap().insert(*address, latency);
        }
        self
    }

    /// Hold every attempt until permits are added to the returned semaphore.
    pub fn gated(self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        *self.state.gate.lock().unwrap() = Some(Arc::clone(&gate));
        (self, gate)
    }

    pub fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.state.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<SubmissionRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Submitter for ScriptedSubmitter {
    async fn submit(
        &self,
        account: &Account,
        request: &SubmissionRequest,
    ) -> Result<TxHash, SubmitError> {
        let call = self.state.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let now = self.state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.state.requests.lock().unwrap().push(request.clone());

        let gate = self.state.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            let _permit = gate.acquire().await;
        }

        let latency = self
            .state
            .latency
            .lock()
            .unwrap()
            .get(&account.address())
            .copied();
        if let Some(latency) = latency {
            sleep(latency).await;
        }

        self.state.in_flight.fetch_sub(1, Ordering::SeqCst);

        let failure = self
            .state
            .failures
            .lock()
            .unwrap()
            .get(&account.address())
            .cloned();
        match failure {
            Some(err) => Err(err),
            None => Ok(TxHash::from_low_u64_be(call as u64)),
        }
    }
}

/// Poll `cond` until it holds or five seconds pass.
pub async fn wait_until<F: FnMut() -> bool>(mut cond: F) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "condition not met in time");
        sleep(Duration::from_millis(5)).await;
    }
}
