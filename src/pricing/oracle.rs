//! Price Oracle Adapter
//!
//! Picks how a vault's deposit token is priced: a constant for stable
//! assets, the declared underlying for interest-bearing wrappers, otherwise
//! the deposit token itself through the price quoter.

use alloy_primitives::Address;
use std::sync::Arc;
use tracing::debug;

use super::quoter::PriceQuoter;
use crate::binding::{Capability, TokenHandle, VariantTables, VaultHandle};
use crate::contracts::ContractReader;
use crate::error::{VaultError, VaultResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    /// Exactly 1 reference unit
    Stable,
    /// Quote the vault's `underlying()`
    Underlying,
    /// Quote the deposit token
    DepositToken,
}

#[derive(Clone)]
pub struct PriceOracle {
    quoter: Arc<dyn PriceQuoter>,
    reference: Address,
    tables: Arc<VariantTables>,
}

impl PriceOracle {
    pub fn new(quoter: Arc<dyn PriceQuoter>, reference: Address, tables: Arc<VariantTables>) -> Self {
        Self {
            quoter,
            reference,
            tables,
        }
    }

    pub fn source_for(&self, vault_name: &str) -> PriceSource {
        if self.tables.is_wrapped_asset(vault_name) {
            PriceSource::Underlying
        } else if self.tables.is_stable_asset(vault_name) {
            PriceSource::Stable
        } else {
            PriceSource::DepositToken
        }
    }

    /// Price of one deposit token of the named vault
    pub async fn token_price(
        &self,
        reader: &dyn ContractReader,
        vault_name: &str,
        vault: &VaultHandle,
        token: &TokenHandle,
    ) -> VaultResult<f64> {
        let source = self.source_for(vault_name);
        debug!("Pricing {} via {:?}", vault_name, source);

        match source {
            PriceSource::Stable => Ok(1.0),
            PriceSource::Underlying => {
                if !vault.supports(Capability::Underlying) {
                    return Err(VaultError::PriceUnavailable {
                        token: token.address,
                        reason: format!("{} vault has no underlying()", vault.interface),
                    });
                }
                let underlying = vault.underlying(reader).await?;
                self.quote(underlying).await
            }
            PriceSource::DepositToken => self.quote(token.address).await,
        }
    }

    /// Quote any token against the reference unit
    pub async fn quote(&self, token: Address) -> VaultResult<f64> {
        self.quoter.quote_price(token, self.reference).await
    }
}
