//! Vault Record
//!
//! One bound vault/controller/strategy/token quadruple plus the derived
//! name and decimal scale. `describe()` turns it into a `MetricsRecord`.

use alloy_primitives::Address;
use tracing::debug;

use super::context::ChainContext;
use super::metrics::*;
use crate::binding::{
    Capability, ControllerHandle, GaugeHandle, GovernanceHandle, StrategyHandle, SwapHandle,
    TokenHandle, VaultHandle,
};
use crate::contracts::units::{decimal_scale, from_fixed18, to_f64};
use crate::error::{VaultError, VaultResult};
use crate::registry::VaultMetadata;

#[derive(Debug, Clone)]
pub struct VaultRecord {
    pub address: Address,
    pub vault: VaultHandle,
    pub controller: ControllerHandle,
    pub strategy: StrategyHandle,
    pub token: TokenHandle,
    pub is_wrapped: bool,
    pub is_delegated: bool,
    pub name: String,
    pub decimals: u8,
    scale: f64,
}

impl VaultRecord {
    /// Bind every contract, resolve the alias and read `decimals()` once
    pub async fn new(address: Address, meta: &VaultMetadata, ctx: &ChainContext) -> VaultResult<Self> {
        let vault = ctx.resolver.bind_vault(address);
        let controller = ctx.resolver.bind_controller(meta.controller)?;
        let strategy = ctx.resolver.bind_strategy(meta.strategy)?;
        let token = ctx.resolver.bind_token(meta.token);

        let name = ctx
            .tables()
            .alias(&address)
            .ok_or(VaultError::UnknownVault(address))?
            .to_string();

        let decimals = vault.decimals(ctx.reader.as_ref()).await?;

        debug!(
            "Bound {} ({}): vault={} strategy={} decimals={}",
            name, address, vault.interface, strategy.variant, decimals
        );

        Ok(Self {
            address,
            vault,
            controller,
            strategy,
            token,
            is_wrapped: meta.is_wrapped,
            is_delegated: meta.is_delegated,
            name,
            decimals,
            scale: decimal_scale(decimals),
        })
    }

    /// `10^decimals`, fixed at construction
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Compute this vault's metrics from live chain state.
    ///
    /// Optional sections run only when the bound handles carry the matching
    /// capability. Any failed read fails the whole record.
    pub async fn describe(&self, ctx: &ChainContext) -> VaultResult<MetricsRecord> {
        let reader = ctx.reader.as_ref();
        let mut record = MetricsRecord::new();

        // Base balances
        record.insert(VAULT_BALANCE, to_f64(self.vault.balance(reader).await?) / self.scale());
        record.insert(SHARE_PRICE, from_fixed18(self.vault.price_per_full_share(reader).await?));
        record.insert(VAULT_TOTAL, to_f64(self.vault.total_supply(reader).await?) / self.scale());
        record.insert(
            STRATEGY_BALANCE,
            to_f64(self.strategy.balance_of(reader).await?) / self.scale(),
        );

        if self.vault.supports(Capability::Available) {
            record.insert(AVAILABLE, to_f64(self.vault.available(reader).await?) / self.scale());
        }

        if self.vault.capabilities.contains_all(&[Capability::Min, Capability::Max]) {
            let min = self.vault.min(reader).await?;
            let max = self.vault.max(reader).await?;
            // A zero denominator leaves the buffer undefined
            if !max.is_zero() {
                record.insert(STRATEGY_BUFFER, to_f64(min) / to_f64(max));
            }
        }

        // Curve voter proxy: boost, CRV apy and claimable CRV
        if self.strategy.supports(Capability::Proxy) {
            let voter = self.strategy.voter(reader).await?;
            let swap = match ctx.tables().swap_override(&self.strategy.variant) {
                Some(address) => address,
                None => self.strategy.curve(reader).await?,
            };
            let gauge = GaugeHandle {
                address: self.strategy.gauge(reader).await?,
            };
            let swap = SwapHandle { address: swap };

            record.extend(ctx.curve.compute_boost(reader, &gauge, voter).await?);
            record.extend(ctx.curve.compute_apy(reader, &gauge, &swap).await?);
            record.insert(EARNED, from_fixed18(gauge.claimable_tokens(reader, voter).await?));
        }

        if self.strategy.supports(Capability::Earned) {
            record.insert(
                LIFETIME_EARNED,
                to_f64(self.strategy.earned(reader).await?) / self.scale(),
            );
        }

        // Overwrites any earlier `earned`
        if self.strategy.supports(Capability::Governance) {
            let gov = GovernanceHandle {
                address: self.strategy.gov(reader).await?,
            };
            let staker = self.strategy.address;
            record.insert(EARNED, from_fixed18(gov.earned(reader, staker).await?));
            record.insert(REWARD_RATE, from_fixed18(gov.reward_rate(reader).await?));
            record.insert(YGOV_BALANCE, from_fixed18(gov.balance_of(reader, staker).await?));
            record.insert(YGOV_TOTAL, from_fixed18(gov.total_supply(reader).await?));
        }

        if !record.contains(TOKEN_PRICE) {
            let price = ctx
                .oracle
                .token_price(reader, &self.name, &self.vault, &self.token)
                .await?;
            record.insert(TOKEN_PRICE, price);
        }

        let vault_balance = record.get(VAULT_BALANCE).unwrap_or_default();
        let token_price = record.get(TOKEN_PRICE).unwrap_or_default();
        record.insert(TVL, vault_balance * token_price);

        debug!("Described {} with {} fields", self.name, record.len());
        Ok(record)
    }
}
