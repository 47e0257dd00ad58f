//! Vault registry and the per-pass loader

mod loader;
mod source;

pub use loader::{LoadReport, VaultFailure, VaultLoader, VaultMetrics};
pub use source::{OnChainRegistry, RegistrySource, VaultMetadata};
