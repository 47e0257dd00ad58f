//! In-memory fakes shared by the unit tests

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use crate::contracts::{CallFailure, ContractReader};
use crate::error::{VaultError, VaultResult};
use crate::pricing::PriceQuoter;

/// ABI word holding an unsigned integer
pub(crate) fn word(value: U256) -> Vec<u8> {
    value.abi_encode()
}

pub(crate) fn word_address(value: Address) -> Vec<u8> {
    value.abi_encode()
}

/// Return data of a `uint256[]` function
pub(crate) fn encode_uints(values: &[U256]) -> Vec<u8> {
    values.to_vec().abi_encode()
}

/// Serves canned return data keyed by `(contract, calldata)`.
///
/// Anything not registered reverts, which is how a missing method looks on
/// chain.
#[derive(Default)]
pub(crate) struct MockReader {
    responses: HashMap<(Address, Bytes), Bytes>,
    delays: HashMap<Address, Duration>,
}

impl MockReader {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn returns<C: SolCall>(&mut self, to: Address, call: C, output: Vec<u8>) -> &mut Self {
        self.responses
            .insert((to, Bytes::from(call.abi_encode())), Bytes::from(output));
        self
    }

    /// Every call to `to` sleeps first
    pub(crate) fn delay(&mut self, to: Address, by: Duration) -> &mut Self {
        self.delays.insert(to, by);
        self
    }
}

#[async_trait]
impl ContractReader for MockReader {
    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes, CallFailure> {
        if let Some(delay) = self.delays.get(&to) {
            tokio::time::sleep(*delay).await;
        }
        self.responses
            .get(&(to, calldata))
            .cloned()
            .ok_or_else(|| CallFailure::Reverted("execution reverted".to_string()))
    }
}

/// Quoter with a fixed price list
#[derive(Default)]
pub(crate) struct FixedQuoter {
    prices: HashMap<Address, f64>,
}

impl FixedQuoter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_price(mut self, token: Address, price: f64) -> Self {
        self.prices.insert(token, price);
        self
    }
}

#[async_trait]
impl PriceQuoter for FixedQuoter {
    async fn quote_price(&self, token: Address, _reference: Address) -> VaultResult<f64> {
        self.prices
            .get(&token)
            .copied()
            .ok_or_else(|| VaultError::PriceUnavailable {
                token,
                reason: "no pool".to_string(),
            })
    }
}
