//! Price Discovery Service - Uniswap V2 Router
//!
//! Quotes one whole token against a reference token with `getAmountsOut`,
//! routing through WETH unless either side already is WETH.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::binding::TokenHandle;
use crate::contracts::interfaces::IUniswapV2Router;
use crate::contracts::units::{decimal_scale, to_f64};
use crate::contracts::{read, ContractReader};
use crate::error::{VaultError, VaultResult};

#[async_trait]
pub trait PriceQuoter: Send + Sync {
    /// Price of one `token` expressed in `reference` units
    async fn quote_price(&self, token: Address, reference: Address) -> VaultResult<f64>;
}

pub struct UniswapRouterQuoter {
    reader: Arc<dyn ContractReader>,
    router: Address,
    weth: Address,
}

impl UniswapRouterQuoter {
    pub fn new(reader: Arc<dyn ContractReader>, router: Address, weth: Address) -> Self {
        Self {
            reader,
            router,
            weth,
        }
    }

    /// Swap path used for a quote
    pub fn route(&self, token: Address, reference: Address) -> Vec<Address> {
        if token == self.weth || reference == self.weth {
            vec![token, reference]
        } else {
            vec![token, self.weth, reference]
        }
    }
}

#[async_trait]
impl PriceQuoter for UniswapRouterQuoter {
    async fn quote_price(&self, token: Address, reference: Address) -> VaultResult<f64> {
        if token == reference {
            return Ok(1.0);
        }

        let unavailable = |reason: String| VaultError::PriceUnavailable { token, reason };
        let reader = self.reader.as_ref();

        let decimals_in = TokenHandle { address: token }
            .decimals(reader)
            .await
            .map_err(|e| unavailable(e.to_string()))?;
        let decimals_out = TokenHandle { address: reference }
            .decimals(reader)
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let path = self.route(token, reference);
        let hops = path.len() - 1;
        let amount_in = U256::from(10u64).pow(U256::from(decimals_in));

        let amounts = read(
            reader,
            self.router,
            IUniswapV2Router::getAmountsOutCall {
                amountIn: amount_in,
                path,
            },
        )
        .await
        .map_err(|e| unavailable(e.to_string()))?;

        let amount_out = amounts
            .last()
            .copied()
            .ok_or_else(|| unavailable("router returned no amounts".to_string()))?;
        if amount_out.is_zero() {
            return Err(unavailable("no liquidity on route".to_string()));
        }

        let price = to_f64(amount_out) / decimal_scale(decimals_out);
        debug!("Quoted {} at {:.6} ({} hops)", token, price, hops);
        Ok(price)
    }
}
