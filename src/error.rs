//! Per-vault failure kinds
//!
//! Everything that can go wrong while binding, constructing or describing a
//! single vault. The registry loader is the only place these are caught.

use alloy_primitives::Address;
use std::time::Duration;
use thiserror::Error;

use crate::binding::ContractKind;

#[derive(Debug, Clone, Error)]
pub enum VaultError {
    /// No interface mapping for a controller or strategy address
    #[error("no {kind} interface registered for {address}")]
    UnknownVariant { address: Address, kind: ContractKind },

    /// Vault address missing from the alias table
    #[error("vault {0} has no alias")]
    UnknownVault(Address),

    /// A read call failed, reverted or returned undecodable data
    #[error("{method} on {contract} failed: {reason}")]
    RemoteCall {
        contract: Address,
        method: &'static str,
        reason: String,
    },

    /// Price discovery could not produce a quote
    #[error("no price for token {token}: {reason}")]
    PriceUnavailable { token: Address, reason: String },

    /// The per-vault pipeline ran past its deadline
    #[error("vault {vault} timed out after {after:?}")]
    Timeout { vault: Address, after: Duration },
}

impl VaultError {
    /// Short label used in logs and the failure table
    pub fn kind(&self) -> &'static str {
        match self {
            VaultError::UnknownVariant { .. } => "UnknownVariant",
            VaultError::UnknownVault(_) => "UnknownVault",
            VaultError::RemoteCall { .. } => "RemoteCallError",
            VaultError::PriceUnavailable { .. } => "PriceUnavailable",
            VaultError::Timeout { .. } => "Timeout",
        }
    }
}

pub type VaultResult<T> = Result<T, VaultError>;
