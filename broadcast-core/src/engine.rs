//! # Broadcast Engine
//!
//! One cycle: one attempt per account, all dispatched together, all awaited.

use futures::future::join_all;
use std::time::Instant;
use tracing::debug;

use crate::accounts::Account;
use crate::outcome::{classify, Outcome};
use crate::template::TransactionTemplate;
use crate::traits::Submitter;

/// Submit one transaction per account and wait for every attempt to settle.
///
/// Outcomes come back in account order regardless of completion order. A
/// failed attempt never cancels or delays the others.
pub async fn run_cycle<S>(
    submitter: &S,
    template: &TransactionTemplate,
    accounts: &[Account],
) -> Vec<Outcome>
where
    S: Submitter + ?Sized,
{
    let start = Instant::now();

    let attempts = accounts.iter().map(|account| {
        let request = template.request_for(account);
        async move {
            let result = submitter.submit(account, &request).await;
            classify(account.address(), result)
        }
    });

    let outcomes = join_all(attempts).await;

    debug!(
        "Cycle settled: {} attempts in {}ms",
        outcomes.len(),
        start.elapsed().as_millis()
    );

    outcomes
}
