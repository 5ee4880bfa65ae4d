mod common;

use broadcast_core::engine::run_cycle;
use broadcast_core::{
    AccountPool, Configuration, ErrorKind, NetworkRegistry, Outcome, SubmitError,
    TransactionTemplate,
};
use common::{addresses, keys, ScriptedSubmitter};
use std::time::Duration;

fn template() -> TransactionTemplate {
    let config = Configuration::new(NetworkRegistry::builtin().default_network().clone());
    TransactionTemplate::from_config(&config).unwrap()
}

#[tokio::test]
async fn test_one_outcome_per_account_despite_failures() {
    let accounts = addresses(4);
    let submitter = ScriptedSubmitter::new()
        .fail(
            accounts[0],
            SubmitError::Generic {
                message: "replacement transaction underpriced".into(),
            },
        )
        .fail(
            accounts[3],
            SubmitError::Transport {
                message: "connection refused".into(),
            },
        );
    let pool = AccountPool::parse(&keys(4));

    let outcomes = run_cycle(&submitter, &template(), &pool.accounts()).await;

    assert_eq!(outcomes.len(), 4);
    assert_eq!(
        outcomes.iter().map(Outcome::address).collect::<Vec<_>>(),
        accounts
    );
    assert_eq!(
        outcomes[0],
        Outcome::Failure {
            address: accounts[0],
            kind: ErrorKind::Generic,
            detail: "replacement transaction underpriced".into(),
        }
    );
    assert!(outcomes[1].is_success());
    assert!(outcomes[2].is_success());
    assert_eq!(
        outcomes[3],
        Outcome::Failure {
            address: accounts[3],
            kind: ErrorKind::Transport,
            detail: String::new(),
        }
    );
}

#[tokio::test]
async fn test_attempts_are_dispatched_concurrently() {
    let accounts = addresses(4);
    let submitter = ScriptedSubmitter::new()
        .latency_all(&accounts, Duration::from_millis(50))
        .latency(accounts[0], Duration::from_millis(80));
    let pool = AccountPool::parse(&keys(4));

    let started = tokio::time::Instant::now();
    let outcomes = run_cycle(&submitter, &template(), &pool.accounts()).await;

    assert_eq!(outcomes.len(), 4);
    assert_eq!(submitter.max_in_flight(), 4);
    assert!(started.elapsed() < Duration::from_millis(200));
    assert_eq!(outcomes[0].address(), accounts[0]);
}

#[tokio::test]
async fn test_self_transfer_requests() {
    let accounts = addresses(2);
    let submitter = ScriptedSubmitter::new();
    let pool = AccountPool::parse(&keys(2));

    run_cycle(&submitter, &template(), &pool.accounts()).await;

    let mut targets: Vec<_> = submitter.requests().iter().map(|r| r.to).collect();
    targets.sort();
    let mut expected = accounts.clone();
    expected.sort();
    assert_eq!(targets, expected);
}
