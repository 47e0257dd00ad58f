//! Contract Binding Resolver
//!
//! Turns `(address, kind)` into a capability-typed handle using the variant
//! tables. Vaults fall back to the standard interface; controllers and
//! strategies must be registered.

use alloy_primitives::Address;
use std::sync::Arc;
use tracing::trace;

use super::handles::{ContractKind, ControllerHandle, StrategyHandle, TokenHandle, VaultHandle};
use super::tables::{VariantTables, STANDARD_VAULT_INTERFACE};
use crate::error::{VaultError, VaultResult};

#[derive(Debug, Clone)]
pub struct ContractResolver {
    tables: Arc<VariantTables>,
}

impl ContractResolver {
    pub fn new(tables: Arc<VariantTables>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &VariantTables {
        &self.tables
    }

    pub fn bind_vault(&self, address: Address) -> VaultHandle {
        let interface = self
            .tables
            .vault_interfaces
            .get(&address)
            .map(String::as_str)
            .unwrap_or(STANDARD_VAULT_INTERFACE)
            .to_string();
        let capabilities = self.tables.capabilities_of(&interface);
        trace!("Bound vault {} as {} {}", address, interface, capabilities);

        VaultHandle {
            address,
            interface,
            capabilities,
        }
    }

    pub fn bind_controller(&self, address: Address) -> VaultResult<ControllerHandle> {
        let interface = self
            .tables
            .controller_interfaces
            .get(&address)
            .ok_or(VaultError::UnknownVariant {
                address,
                kind: ContractKind::Controller,
            })?
            .clone();

        Ok(ControllerHandle { address, interface })
    }

    pub fn bind_strategy(&self, address: Address) -> VaultResult<StrategyHandle> {
        let variant = self
            .tables
            .strategy_interfaces
            .get(&address)
            .ok_or(VaultError::UnknownVariant {
                address,
                kind: ContractKind::Strategy,
            })?
            .clone();
        let capabilities = self.tables.capabilities_of(&variant);
        trace!("Bound strategy {} as {} {}", address, variant, capabilities);

        Ok(StrategyHandle {
            address,
            variant,
            capabilities,
        })
    }

    pub fn bind_token(&self, address: Address) -> TokenHandle {
        TokenHandle { address }
    }
}
