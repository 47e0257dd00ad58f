//! Remote read interface
//!
//! `ContractReader` is the single seam through which the engine touches the
//! chain: raw calldata in, raw return data out. `read()` layers typed
//! encode/decode on top and turns every failure into `VaultError::RemoteCall`.
//!
//! Transport failures are retried by `RetryingReader`; reverts and decode
//! errors are not, they are a property of the contract and fatal to the vault.

use alloy_primitives::{Address, Bytes};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolCall;
use alloy_transport::RpcError;
use async_trait::async_trait;
use eyre::{eyre, Result};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::{VaultError, VaultResult};

/// Why a raw call did not produce return data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallFailure {
    /// Network / node trouble, worth retrying
    #[error("transport error: {0}")]
    Transport(String),

    /// The node answered with an error (revert, missing method)
    #[error("call reverted: {0}")]
    Reverted(String),
}

impl CallFailure {
    pub fn is_transient(&self) -> bool {
        matches!(self, CallFailure::Transport(_))
    }
}

#[async_trait]
pub trait ContractReader: Send + Sync {
    /// eth_call `calldata` against `to` at the latest block
    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes, CallFailure>;
}

/// Encode `call`, send it to `to`, decode the return value
pub async fn read<C>(reader: &dyn ContractReader, to: Address, call: C) -> VaultResult<C::Return>
where
    C: SolCall + Send,
{
    let calldata = Bytes::from(call.abi_encode());
    trace!("eth_call {} on {}", C::SIGNATURE, to);

    let output = reader
        .call(to, calldata)
        .await
        .map_err(|e| VaultError::RemoteCall {
            contract: to,
            method: C::SIGNATURE,
            reason: e.to_string(),
        })?;

    C::abi_decode_returns(&output).map_err(|e| VaultError::RemoteCall {
        contract: to,
        method: C::SIGNATURE,
        reason: format!("undecodable return data: {}", e),
    })
}

// ============================================
// JSON-RPC READER
// ============================================

/// Single-attempt eth_call over HTTP
pub struct RpcReader {
    rpc_url: Url,
}

impl RpcReader {
    pub fn new(rpc_url: &str) -> Result<Self> {
        let rpc_url = Url::parse(rpc_url).map_err(|e| eyre!("Invalid RPC URL '{}': {}", rpc_url, e))?;
        Ok(Self { rpc_url })
    }
}

#[async_trait]
impl ContractReader for RpcReader {
    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes, CallFailure> {
        let provider = ProviderBuilder::new().connect_http(self.rpc_url.clone());

        let tx = TransactionRequest::default().to(to).input(calldata.into());

        match provider.call(tx).await {
            Ok(output) => Ok(output),
            Err(RpcError::ErrorResp(payload)) => Err(CallFailure::Reverted(payload.message.to_string())),
            Err(e) => Err(CallFailure::Transport(e.to_string())),
        }
    }
}

// ============================================
// RETRY WRAPPER
// ============================================

/// Retries transient failures a bounded number of times with linear backoff
pub struct RetryingReader<R> {
    inner: R,
    max_retries: u32,
    backoff: Duration,
}

impl<R: ContractReader> RetryingReader<R> {
    pub fn new(inner: R, max_retries: u32, backoff: Duration) -> Self {
        Self {
            inner,
            max_retries,
            backoff,
        }
    }
}

#[async_trait]
impl<R: ContractReader> ContractReader for RetryingReader<R> {
    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes, CallFailure> {
        let mut attempt = 0u32;
        loop {
            match self.inner.call(to, calldata.clone()).await {
                Err(failure) if failure.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    debug!(
                        "Transient failure calling {} (attempt {}/{}): {}",
                        to, attempt, self.max_retries, failure
                    );
                    tokio::time::sleep(self.backoff * attempt).await;
                }
                Err(failure) if failure.is_transient() => {
                    warn!("Giving up on {} after {} retries: {}", to, attempt, failure);
                    return Err(failure);
                }
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::interfaces::IYVault;
    use crate::test_support::{word, MockReader};
    use alloy_primitives::U256;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio_test::{assert_err, assert_ok};

    /// Fails with the given failure `failures` times, then answers
    struct FlakyReader {
        failures: u32,
        failure: CallFailure,
        calls: AtomicU32,
    }

    #[async_trait]
    impl ContractReader for FlakyReader {
        async fn call(&self, _to: Address, _calldata: Bytes) -> Result<Bytes, CallFailure> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(self.failure.clone())
            } else {
                Ok(Bytes::from(word(U256::from(7u64))))
            }
        }
    }

    #[tokio::test]
    async fn test_read_decodes_typed_value() {
        let vault = Address::repeat_byte(0x11);
        let mut mock = MockReader::new();
        mock.returns(vault, IYVault::balanceCall {}, word(U256::from(42u64)));

        let balance = read(&mock, vault, IYVault::balanceCall {}).await;
        assert_eq!(assert_ok!(balance), U256::from(42u64));
    }

    #[tokio::test]
    async fn test_read_maps_revert_to_remote_call_error() {
        let vault = Address::repeat_byte(0x11);
        let mock = MockReader::new();

        let err = assert_err!(read(&mock, vault, IYVault::availableCall {}).await);
        match err {
            VaultError::RemoteCall { contract, method, .. } => {
                assert_eq!(contract, vault);
                assert_eq!(method, "available()");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_read_rejects_short_return_data() {
        let vault = Address::repeat_byte(0x11);
        let mut mock = MockReader::new();
        mock.returns(vault, IYVault::balanceCall {}, vec![0u8; 3]);

        let err = assert_err!(read(&mock, vault, IYVault::balanceCall {}).await);
        assert_eq!(err.kind(), "RemoteCallError");
    }

    #[tokio::test]
    async fn test_retry_recovers_from_transport_errors() {
        let flaky = FlakyReader {
            failures: 2,
            failure: CallFailure::Transport("connection reset".into()),
            calls: AtomicU32::new(0),
        };
        let reader = RetryingReader::new(flaky, 3, Duration::from_millis(1));

        let out = reader.call(Address::ZERO, Bytes::new()).await;
        assert!(out.is_ok());
        assert_eq!(reader.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_budget() {
        let flaky = FlakyReader {
            failures: 10,
            failure: CallFailure::Transport("timeout".into()),
            calls: AtomicU32::new(0),
        };
        let reader = RetryingReader::new(flaky, 2, Duration::from_millis(1));

        let out = reader.call(Address::ZERO, Bytes::new()).await;
        assert!(matches!(out, Err(CallFailure::Transport(_))));
        assert_eq!(reader.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_never_repeats_a_revert() {
        let flaky = FlakyReader {
            failures: 1,
            failure: CallFailure::Reverted("execution reverted".into()),
            calls: AtomicU32::new(0),
        };
        let reader = RetryingReader::new(flaky, 5, Duration::from_millis(1));

        let out = reader.call(Address::ZERO, Bytes::new()).await;
        assert_eq!(out, Err(CallFailure::Reverted("execution reverted".into())));
        assert_eq!(reader.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_rpc_reader_rejects_bad_url() {
        assert!(RpcReader::new("not a url").is_err());
        assert!(RpcReader::new("https://eth.llamarpc.com").is_ok());
    }
}
