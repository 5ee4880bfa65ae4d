use async_trait::async_trait;
use ethers::types::TxHash;

use crate::accounts::Account;
use crate::error::SubmitError;
use crate::template::SubmissionRequest;

/// Signs and sends one transaction on behalf of an account.
///
/// Implementations are bound to a transport endpoint and are expected to
/// settle within a bounded time (network timeout). No retries are done by
/// the caller.
#[async_trait]
pub trait Submitter: Send + Sync {
    /// Submit the request and return the transaction hash.
    async fn submit(
        &self,
        account: &Account,
        request: &SubmissionRequest,
    ) -> Result<TxHash, SubmitError>;
}
