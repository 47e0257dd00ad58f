//! Contract binding: variant tables, capability sets and typed handles
//!
//! Different deployment eras of the same conceptual contract expose
//! different method surfaces. Which surface an address has is decided once,
//! here, from static tables; callers dispatch on the resulting capability
//! set instead of probing the chain.

mod capabilities;
mod handles;
mod resolver;
mod tables;

pub use capabilities::{Capability, CapabilitySet};
pub use handles::{
    ContractKind, ControllerHandle, GaugeHandle, GovernanceHandle, StrategyHandle, SwapHandle,
    TokenHandle, VaultHandle,
};
pub use resolver::ContractResolver;
pub use tables::{VariantTables, STANDARD_VAULT_INTERFACE};
#[cfg(test)]
pub use tables::GOVERNANCE_STRATEGY;
