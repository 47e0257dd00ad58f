//! Typed handles over bound contracts
//!
//! A handle is an address plus what the binding tables say it can do. No
//! network I/O happens until one of the read methods is awaited.

use alloy_primitives::{Address, U256};
use std::fmt;

use super::capabilities::{Capability, CapabilitySet};
use crate::contracts::interfaces::{
    ICurveGauge, ICurveSwap, IERC20, IVaultStrategy, IYVault, IYearnGovernance,
};
use crate::contracts::{read, ContractReader};
use crate::error::VaultResult;

/// Declared role of an address that must have a registered interface.
/// Vaults and tokens always bind, so they never appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractKind {
    Controller,
    Strategy,
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractKind::Controller => write!(f, "controller"),
            ContractKind::Strategy => write!(f, "strategy"),
        }
    }
}

// ============================================
// VAULT
// ============================================

#[derive(Debug, Clone, PartialEq)]
pub struct VaultHandle {
    pub address: Address,
    pub interface: String,
    pub capabilities: CapabilitySet,
}

impl VaultHandle {
    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(capability)
    }

    pub async fn decimals(&self, reader: &dyn ContractReader) -> VaultResult<u8> {
        read(reader, self.address, IYVault::decimalsCall {}).await
    }

    pub async fn balance(&self, reader: &dyn ContractReader) -> VaultResult<U256> {
        read(reader, self.address, IYVault::balanceCall {}).await
    }

    pub async fn price_per_full_share(&self, reader: &dyn ContractReader) -> VaultResult<U256> {
        read(reader, self.address, IYVault::getPricePerFullShareCall {}).await
    }

    pub async fn total_supply(&self, reader: &dyn ContractReader) -> VaultResult<U256> {
        read(reader, self.address, IYVault::totalSupplyCall {}).await
    }

    pub async fn available(&self, reader: &dyn ContractReader) -> VaultResult<U256> {
        read(reader, self.address, IYVault::availableCall {}).await
    }

    pub async fn min(&self, reader: &dyn ContractReader) -> VaultResult<U256> {
        read(reader, self.address, IYVault::minCall {}).await
    }

    pub async fn max(&self, reader: &dyn ContractReader) -> VaultResult<U256> {
        read(reader, self.address, IYVault::maxCall {}).await
    }

    pub async fn underlying(&self, reader: &dyn ContractReader) -> VaultResult<Address> {
        read(reader, self.address, IYVault::underlyingCall {}).await
    }
}

// ============================================
// CONTROLLER / TOKEN
// ============================================

/// Controllers are bound for validation only; no metric reads them
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerHandle {
    pub address: Address,
    pub interface: String,
}

/// Generic ERC20 deposit token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenHandle {
    pub address: Address,
}

impl TokenHandle {
    pub async fn decimals(&self, reader: &dyn ContractReader) -> VaultResult<u8> {
        read(reader, self.address, IERC20::decimalsCall {}).await
    }
}

// ============================================
// STRATEGY
// ============================================

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyHandle {
    pub address: Address,
    /// Interface name, doubles as the variant name for dispatch and overrides
    pub variant: String,
    pub capabilities: CapabilitySet,
}

impl StrategyHandle {
    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(capability)
    }

    pub async fn balance_of(&self, reader: &dyn ContractReader) -> VaultResult<U256> {
        read(reader, self.address, IVaultStrategy::balanceOfCall {}).await
    }

    pub async fn voter(&self, reader: &dyn ContractReader) -> VaultResult<Address> {
        read(reader, self.address, IVaultStrategy::voterCall {}).await
    }

    pub async fn curve(&self, reader: &dyn ContractReader) -> VaultResult<Address> {
        read(reader, self.address, IVaultStrategy::curveCall {}).await
    }

    pub async fn gauge(&self, reader: &dyn ContractReader) -> VaultResult<Address> {
        read(reader, self.address, IVaultStrategy::gaugeCall {}).await
    }

    pub async fn earned(&self, reader: &dyn ContractReader) -> VaultResult<U256> {
        read(reader, self.address, IVaultStrategy::earnedCall {}).await
    }

    pub async fn gov(&self, reader: &dyn ContractReader) -> VaultResult<Address> {
        read(reader, self.address, IVaultStrategy::govCall {}).await
    }
}

// ============================================
// CONTRACTS REACHED THROUGH A STRATEGY
// ============================================

/// Curve liquidity gauge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaugeHandle {
    pub address: Address,
}

impl GaugeHandle {
    pub async fn balance_of(&self, reader: &dyn ContractReader, account: Address) -> VaultResult<U256> {
        read(reader, self.address, ICurveGauge::balanceOfCall { account }).await
    }

    pub async fn total_supply(&self, reader: &dyn ContractReader) -> VaultResult<U256> {
        read(reader, self.address, ICurveGauge::totalSupplyCall {}).await
    }

    pub async fn working_balance(&self, reader: &dyn ContractReader, account: Address) -> VaultResult<U256> {
        read(reader, self.address, ICurveGauge::working_balancesCall { account }).await
    }

    pub async fn working_supply(&self, reader: &dyn ContractReader) -> VaultResult<U256> {
        read(reader, self.address, ICurveGauge::working_supplyCall {}).await
    }

    pub async fn inflation_rate(&self, reader: &dyn ContractReader) -> VaultResult<U256> {
        read(reader, self.address, ICurveGauge::inflation_rateCall {}).await
    }

    pub async fn claimable_tokens(&self, reader: &dyn ContractReader, account: Address) -> VaultResult<U256> {
        read(reader, self.address, ICurveGauge::claimable_tokensCall { account }).await
    }
}

/// Curve swap pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapHandle {
    pub address: Address,
}

impl SwapHandle {
    pub async fn virtual_price(&self, reader: &dyn ContractReader) -> VaultResult<U256> {
        read(reader, self.address, ICurveSwap::get_virtual_priceCall {}).await
    }
}

/// YFI governance staking pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GovernanceHandle {
    pub address: Address,
}

impl GovernanceHandle {
    pub async fn earned(&self, reader: &dyn ContractReader, account: Address) -> VaultResult<U256> {
        read(reader, self.address, IYearnGovernance::earnedCall { account }).await
    }

    pub async fn reward_rate(&self, reader: &dyn ContractReader) -> VaultResult<U256> {
        read(reader, self.address, IYearnGovernance::rewardRateCall {}).await
    }

    pub async fn balance_of(&self, reader: &dyn ContractReader, account: Address) -> VaultResult<U256> {
        read(reader, self.address, IYearnGovernance::balanceOfCall { account }).await
    }

    pub async fn total_supply(&self, reader: &dyn ContractReader) -> VaultResult<U256> {
        read(reader, self.address, IYearnGovernance::totalSupplyCall {}).await
    }
}
