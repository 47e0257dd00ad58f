//! Vault registry access

use alloy_primitives::Address;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::contracts::interfaces::IYRegistry;
use crate::contracts::{read, ContractReader};
use crate::error::VaultResult;

/// What the registry knows about one vault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VaultMetadata {
    pub controller: Address,
    pub token: Address,
    pub strategy: Address,
    pub is_wrapped: bool,
    pub is_delegated: bool,
}

#[async_trait]
pub trait RegistrySource: Send + Sync {
    async fn list_vault_addresses(&self) -> VaultResult<Vec<Address>>;

    async fn get_vault_metadata(&self, vault: Address) -> VaultResult<VaultMetadata>;
}

/// The deployed v1 registry contract
pub struct OnChainRegistry {
    address: Address,
    reader: Arc<dyn ContractReader>,
}

impl OnChainRegistry {
    pub fn new(address: Address, reader: Arc<dyn ContractReader>) -> Self {
        Self { address, reader }
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

#[async_trait]
impl RegistrySource for OnChainRegistry {
    async fn list_vault_addresses(&self) -> VaultResult<Vec<Address>> {
        let vaults = read(self.reader.as_ref(), self.address, IYRegistry::getVaultsCall {}).await?;
        debug!("Registry {} lists {} vaults", self.address, vaults.len());
        Ok(vaults)
    }

    async fn get_vault_metadata(&self, vault: Address) -> VaultResult<VaultMetadata> {
        let info = read(
            self.reader.as_ref(),
            self.address,
            IYRegistry::getVaultInfoCall { vault },
        )
        .await?;

        Ok(VaultMetadata {
            controller: info.controller,
            token: info.token,
            strategy: info.strategy,
            is_wrapped: info.isWrapped,
            is_delegated: info.isDelegated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::interfaces::YEARN_V1_REGISTRY;
    use crate::error::VaultError;
    use crate::test_support::MockReader;
    use alloy_sol_types::SolValue;

    #[tokio::test]
    async fn test_lists_vaults() {
        let vaults = vec![Address::repeat_byte(0x01), Address::repeat_byte(0x02)];
        let mut mock = MockReader::new();
        mock.returns(YEARN_V1_REGISTRY, IYRegistry::getVaultsCall {}, vaults.abi_encode());

        let registry = OnChainRegistry::new(YEARN_V1_REGISTRY, Arc::new(mock));
        assert_eq!(registry.list_vault_addresses().await.unwrap(), vaults);
    }

    #[tokio::test]
    async fn test_reads_vault_info() {
        let vault = Address::repeat_byte(0x01);
        let controller = Address::repeat_byte(0xC0);
        let token = Address::repeat_byte(0x70);
        let strategy = Address::repeat_byte(0x57);

        let mut mock = MockReader::new();
        mock.returns(
            YEARN_V1_REGISTRY,
            IYRegistry::getVaultInfoCall { vault },
            (controller, token, strategy, true, false).abi_encode_params(),
        );

        let registry = OnChainRegistry::new(YEARN_V1_REGISTRY, Arc::new(mock));
        let info = registry.get_vault_metadata(vault).await.unwrap();
        assert_eq!(
            info,
            VaultMetadata {
                controller,
                token,
                strategy,
                is_wrapped: true,
                is_delegated: false,
            }
        );
    }

    #[tokio::test]
    async fn test_registry_revert_is_remote_call_error() {
        let registry = OnChainRegistry::new(YEARN_V1_REGISTRY, Arc::new(MockReader::new()));
        let err = registry.list_vault_addresses().await.unwrap_err();
        assert_eq!(err.kind(), "RemoteCallError");
        assert!(matches!(err, VaultError::RemoteCall { .. }));
    }
}
