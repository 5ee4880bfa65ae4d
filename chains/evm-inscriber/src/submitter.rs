use anyhow::Result;
use async_trait::async_trait;
use broadcast_core::{Account, SubmissionRequest, SubmitError, Submitter};
use ethers::middleware::signer::SignerMiddlewareError;
use ethers::middleware::SignerMiddleware;
use ethers::prelude::*;
use ethers::types::transaction::eip2718::TypedTransaction;
use reqwest::Client;
use std::time::Duration;

/// Submission capability backed by an ethers provider.
///
/// Every attempt is signed with the account's own wallet and returns as soon
/// as the node accepts it; receipts are not awaited.
pub struct EthersSubmitter<M> {
    provider: M,
    timeout: Duration,
}

impl EthersSubmitter<Provider<Http>> {
    pub fn http(rpc_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let provider = Provider::new(Http::new_with_client(
            reqwest::Url::parse(rpc_url)?,
            client,
        ));
        Ok(Self { provider, timeout })
    }
}

impl EthersSubmitter<Provider<Ws>> {
    pub async fn ws(rpc_url: &str, timeout: Duration) -> Result<Self> {
        let provider = Provider::<Ws>::connect(rpc_url).await?;
        Ok(Self { provider, timeout })
    }
}

impl<M> EthersSubmitter<M>
where
    M: Middleware + Clone + 'static,
{
    async fn build_transaction(
        &self,
        account: &Account,
        request: &SubmissionRequest,
    ) -> Result<TypedTransaction, SubmitError> {
        if let Some(gas_price) = request.gas_price {
            let mut tx = TransactionRequest::new()
                .from(account.address())
                .to(request.to)
                .value(request.value)
                .gas_price(gas_price)
                .chain_id(request.chain_id);
            if let Some(data) = &request.data {
                tx = tx.data(data.clone());
            }
            return Ok(tx.into());
        }

        let mut tx = Eip1559TransactionRequest::new()
            .from(account.address())
            .to(request.to)
            .value(request.value)
            .chain_id(request.chain_id);
        if let Some(data) = &request.data {
            tx = tx.data(data.clone());
        }

        if let Some(tip) = request.max_priority_fee_per_gas {
            // tip on top of the network's base fee estimate
            let (max_fee, estimated_tip) = self
                .provider
                .estimate_eip1559_fees(None)
                .await
                .map_err(categorize)?;
            tx = tx
                .max_priority_fee_per_gas(tip)
                .max_fee_per_gas(max_fee.saturating_sub(estimated_tip).saturating_add(tip));
        }

        Ok(tx.into())
    }

    async fn send(&self, account: &Account, request: &SubmissionRequest) -> Result<TxHash, SubmitError> {
        let tx = self.build_transaction(account, request).await?;

        let wallet = account.signer().clone().with_chain_id(request.chain_id);
        let client = SignerMiddleware::new(self.provider.clone(), wallet);

        let pending = client
            .send_transaction(tx, None)
            .await
            .map_err(categorize_signer)?;

        Ok(pending.tx_hash())
    }
}

#[async_trait]
impl<M> Submitter for EthersSubmitter<M>
where
    M: Middleware + Clone + 'static,
{
    async fn submit(
        &self,
        account: &Account,
        request: &SubmissionRequest,
    ) -> Result<TxHash, SubmitError> {
        match tokio::time::timeout(self.timeout, self.send(account, request)).await {
            Ok(result) => result,
            Err(_) => Err(SubmitError::Timeout),
        }
    }
}

/// Map a middleware error onto the closed submission error categories.
///
/// A JSON-RPC error response means the node received the transaction and
/// refused it, which is reported as an execution error with its message.
pub fn categorize<E: MiddlewareError>(err: E) -> SubmitError {
    if let Some(response) = err.as_error_response() {
        return SubmitError::Execution {
            details: response.message.clone(),
        };
    }

    match err.as_provider_error() {
        Some(ProviderError::HTTPError(e)) if e.is_timeout() => SubmitError::Timeout,
        Some(ProviderError::HTTPError(e)) => SubmitError::Transport {
            message: e.to_string(),
        },
        Some(ProviderError::CustomError(message)) => SubmitError::Generic {
            message: message.clone(),
        },
        Some(other) => SubmitError::Rpc {
            message: other.to_string(),
        },
        None => SubmitError::Generic {
            message: err.to_string(),
        },
    }
}

fn categorize_signer<M: Middleware>(err: SignerMiddlewareError<M, LocalWallet>) -> SubmitError {
    match err {
        SignerMiddlewareError::SignerError(e) => SubmitError::Signer {
            message: e.to_string(),
        },
        SignerMiddlewareError::MiddlewareError(e) => categorize(e),
        other => SubmitError::Generic {
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use broadcast_core::{classify, ErrorKind, Outcome};
    use ethers::providers::{HttpClientError, JsonRpcError};

    #[test]
    fn test_json_rpc_error_is_execution() {
        let err = ProviderError::JsonRpcClientError(Box::new(HttpClientError::JsonRpcError(
            JsonRpcError {
                code: -32000,
                message: "insufficient funds for gas * price + value".to_string(),
                data: None,
            },
        )));

        assert_eq!(
            categorize(err),
            SubmitError::Execution {
                details: "insufficient funds for gas * price + value".to_string()
            }
        );
    }

    #[test]
    fn test_custom_error_is_generic() {
        let err = ProviderError::CustomError("nonce too low".to_string());
        let outcome = classify(Address::zero(), Err(categorize(err)));

        assert_eq!(
            outcome,
            Outcome::Failure {
                address: Address::zero(),
                kind: ErrorKind::Generic,
                detail: "nonce too low".to_string(),
            }
        );
    }

    #[test]
    fn test_other_provider_errors_are_rpc() {
        let err = ProviderError::UnsupportedRPC;
        assert_eq!(categorize(err).kind(), ErrorKind::Rpc);
    }

    #[test]
    fn test_signer_middleware_errors() {
        let err = SignerMiddlewareError::<Provider<Http>, LocalWallet>::MiddlewareError(
            ProviderError::CustomError("boom".to_string()),
        );
        assert_eq!(
            categorize_signer(err),
            SubmitError::Generic {
                message: "boom".to_string()
            }
        );

        let err = SignerMiddlewareError::<Provider<Http>, LocalWallet>::NonceMissing;
        assert_eq!(categorize_signer(err).kind(), ErrorKind::Generic);
    }

    #[test]
    fn test_http_submitter_rejects_bad_url() {
        assert!(EthersSubmitter::http("not a url", Duration::from_secs(1)).is_err());
        assert!(EthersSubmitter::http("http://127.0.0.1:8545", Duration::from_secs(1)).is_ok());
    }
}
