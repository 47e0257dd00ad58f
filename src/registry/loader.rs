//! Registry Loader
//!
//! Enumerates the registry, then runs bind -> construct -> describe for each
//! vault on a bounded concurrent pool. A vault that fails is logged and
//! reported; it never takes the rest of the pass down with it.

use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::source::RegistrySource;
use crate::error::{VaultError, VaultResult};
use crate::vault::metrics::TVL;
use crate::vault::{ChainContext, MetricsRecord, VaultRecord};

/// Metrics of one successfully described vault
#[derive(Debug, Clone, Serialize)]
pub struct VaultMetrics {
    pub address: Address,
    pub name: String,
    pub metrics: MetricsRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct VaultFailure {
    pub address: Address,
    pub kind: &'static str,
    pub reason: String,
}

impl VaultFailure {
    fn new(address: Address, error: &VaultError) -> Self {
        Self {
            address,
            kind: error.kind(),
            reason: error.to_string(),
        }
    }
}

/// Outcome of one aggregation pass
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub generated_at: DateTime<Utc>,
    pub elapsed_ms: u128,
    pub vaults: Vec<VaultMetrics>,
    pub failures: Vec<VaultFailure>,
}

impl LoadReport {
    pub fn total_tvl(&self) -> f64 {
        self.vaults
            .iter()
            .filter_map(|v| v.metrics.get(TVL))
            .sum()
    }
}

pub struct VaultLoader {
    ctx: Arc<ChainContext>,
    max_concurrency: usize,
    vault_timeout: Duration,
    show_progress: bool,
}

impl VaultLoader {
    pub fn new(ctx: Arc<ChainContext>, max_concurrency: usize, vault_timeout: Duration) -> Self {
        Self {
            ctx,
            max_concurrency: max_concurrency.max(1),
            vault_timeout,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Describe every vault the registry lists.
    ///
    /// Fails only if the vault list itself cannot be read.
    pub async fn describe_all(&self, registry: &dyn RegistrySource) -> VaultResult<LoadReport> {
        let started = Instant::now();
        let addresses = registry.list_vault_addresses().await?;
        info!("📋 Registry lists {} vaults", addresses.len());

        let progress = self.progress_bar(addresses.len());

        let results: Vec<(Address, VaultResult<VaultMetrics>)> = stream::iter(addresses)
            .map(|address| {
                let progress = progress.clone();
                async move {
                    let result = self.describe_one(registry, address).await;
                    progress.inc(1);
                    (address, result)
                }
            })
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;

        progress.finish_and_clear();

        let mut vaults = Vec::new();
        let mut failures = Vec::new();
        for (address, result) in results {
            match result {
                Ok(metrics) => vaults.push(metrics),
                Err(e) => {
                    warn!("Vault {} failed ({}): {}", address, e.kind(), e);
                    failures.push(VaultFailure::new(address, &e));
                }
            }
        }

        let elapsed = started.elapsed();
        info!(
            "✅ Described {} vaults, {} failed in {:?}",
            vaults.len(),
            failures.len(),
            elapsed
        );

        Ok(LoadReport {
            generated_at: Utc::now(),
            elapsed_ms: elapsed.as_millis(),
            vaults,
            failures,
        })
    }

    /// Construct records without describing them
    pub async fn load_vaults(
        &self,
        registry: &dyn RegistrySource,
    ) -> VaultResult<(Vec<VaultRecord>, Vec<VaultFailure>)> {
        let addresses = registry.list_vault_addresses().await?;

        let results: Vec<(Address, VaultResult<VaultRecord>)> = stream::iter(addresses)
            .map(|address| async move {
                let result = self.with_timeout(address, self.construct(registry, address)).await;
                (address, result)
            })
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;

        let mut records = Vec::new();
        let mut failures = Vec::new();
        for (address, result) in results {
            match result {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("Vault {} failed ({}): {}", address, e.kind(), e);
                    failures.push(VaultFailure::new(address, &e));
                }
            }
        }
        Ok((records, failures))
    }

    async fn describe_one(&self, registry: &dyn RegistrySource, address: Address) -> VaultResult<VaultMetrics> {
        self.with_timeout(address, async {
            let record = self.construct(registry, address).await?;
            let metrics = record.describe(&self.ctx).await?;
            debug!("{}: tvl {:?}", record.name, metrics.get(TVL));
            Ok(VaultMetrics {
                address,
                name: record.name,
                metrics,
            })
        })
        .await
    }

    async fn construct(&self, registry: &dyn RegistrySource, address: Address) -> VaultResult<VaultRecord> {
        let meta = registry.get_vault_metadata(address).await?;
        VaultRecord::new(address, &meta, &self.ctx).await
    }

    async fn with_timeout<T>(
        &self,
        vault: Address,
        work: impl std::future::Future<Output = VaultResult<T>>,
    ) -> VaultResult<T> {
        match tokio::time::timeout(self.vault_timeout, work).await {
            Ok(result) => result,
            Err(_) => Err(VaultError::Timeout {
                vault,
                after: self.vault_timeout,
            }),
        }
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} vaults ({elapsed})") {
            bar.set_style(style.progress_chars("=> "));
        }
        bar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::VariantTables;
    use crate::contracts::interfaces::{IVaultStrategy, IYVault, USDC};
    use crate::registry::VaultMetadata;
    use crate::test_support::{word, FixedQuoter, MockReader};
    use crate::vault::metrics::LIFETIME_EARNED;
    use alloy_primitives::{address, U256};
    use async_trait::async_trait;
    use std::collections::HashMap;

    const DAI_VAULT: Address = address!("ACd43E627e64355f1861cEC6d3a6688B31a6F952");
    const USDT_VAULT: Address = address!("2f08119C6f07c006695E079AAFc638b8789FAf18");
    const TUSD_VAULT: Address = address!("37d19d1c4E1fa9DC47bD1eA12f742a0887eDa74a");

    const CONTROLLER: Address = address!("9E65Ad11b299CA0Abefc2799dDB6314Ef2d91080");
    const DAI_STRATEGY: Address = address!("Aa880345A3147a1fC6889080401C791813ed08Dc");
    const USDT_STRATEGY: Address = address!("787C771035bDE631391ced5C083db424A4A64bD8");
    const TUSD_STRATEGY: Address = address!("1d91E3F77271ed069618b4BA06d19821BC2ed8b0");

    struct FakeRegistry {
        vaults: Vec<Address>,
        metadata: HashMap<Address, VaultMetadata>,
    }

    impl FakeRegistry {
        fn new() -> Self {
            Self {
                vaults: Vec::new(),
                metadata: HashMap::new(),
            }
        }

        fn with(mut self, vault: Address, strategy: Address) -> Self {
            self.vaults.push(vault);
            self.metadata.insert(
                vault,
                VaultMetadata {
                    controller: CONTROLLER,
                    token: Address::repeat_byte(0x70),
                    strategy,
                    is_wrapped: false,
                    is_delegated: false,
                },
            );
            self
        }
    }

    #[async_trait]
    impl RegistrySource for FakeRegistry {
        async fn list_vault_addresses(&self) -> VaultResult<Vec<Address>> {
            Ok(self.vaults.clone())
        }

        async fn get_vault_metadata(&self, vault: Address) -> VaultResult<VaultMetadata> {
            self.metadata.get(&vault).copied().ok_or_else(|| VaultError::RemoteCall {
                contract: vault,
                method: "getVaultInfo(address)",
                reason: "unknown vault".to_string(),
            })
        }
    }

    /// Minimal reads for a stable yVault with `balance` whole tokens
    fn stable_vault(mock: &mut MockReader, vault: Address, strategy: Address, balance: u64) {
        let one = U256::from(10u64).pow(U256::from(18u64));
        mock.returns(vault, IYVault::decimalsCall {}, word(U256::from(18u8)))
            .returns(vault, IYVault::balanceCall {}, word(U256::from(balance) * one))
            .returns(vault, IYVault::getPricePerFullShareCall {}, word(one))
            .returns(vault, IYVault::totalSupplyCall {}, word(U256::from(balance) * one))
            .returns(vault, IYVault::availableCall {}, word(U256::ZERO))
            .returns(vault, IYVault::minCall {}, word(U256::from(9_500u64)))
            .returns(vault, IYVault::maxCall {}, word(U256::from(10_000u64)))
            .returns(strategy, IVaultStrategy::balanceOfCall {}, word(U256::ZERO));
    }

    fn loader(mock: MockReader, timeout: Duration) -> VaultLoader {
        let ctx = ChainContext::new(
            Arc::new(mock),
            Arc::new(VariantTables::mainnet()),
            Arc::new(FixedQuoter::new()),
            USDC,
        );
        VaultLoader::new(Arc::new(ctx), 4, timeout)
    }

    fn sorted(mut addresses: Vec<Address>) -> Vec<Address> {
        addresses.sort();
        addresses
    }

    #[tokio::test]
    async fn test_describes_every_vault() {
        let mut mock = MockReader::new();
        stable_vault(&mut mock, DAI_VAULT, DAI_STRATEGY, 1_000);
        stable_vault(&mut mock, USDT_VAULT, USDT_STRATEGY, 250);
        // dForce strategies also report lifetime earnings
        mock.returns(
            USDT_STRATEGY,
            IVaultStrategy::earnedCall {},
            word(U256::from(5u64) * U256::from(10u64).pow(U256::from(18u64))),
        );
        let registry = FakeRegistry::new()
            .with(DAI_VAULT, DAI_STRATEGY)
            .with(USDT_VAULT, USDT_STRATEGY);

        let report = loader(mock, Duration::from_secs(5)).describe_all(&registry).await.unwrap();
        assert!(report.failures.is_empty(), "{:?}", report.failures);
        assert_eq!(
            sorted(report.vaults.iter().map(|v| v.address).collect()),
            sorted(vec![DAI_VAULT, USDT_VAULT])
        );
        assert_eq!(report.total_tvl(), 1_250.0);

        let usdt = report.vaults.iter().find(|v| v.address == USDT_VAULT).unwrap();
        assert_eq!(usdt.metrics.get(LIFETIME_EARNED), Some(5.0));
        let dai = report.vaults.iter().find(|v| v.address == DAI_VAULT).unwrap();
        assert!(!dai.metrics.contains(LIFETIME_EARNED));
    }

    #[tokio::test]
    async fn test_one_bad_vault_does_not_abort_pass() {
        let mut mock = MockReader::new();
        stable_vault(&mut mock, DAI_VAULT, DAI_STRATEGY, 1_000);
        // TUSD vault: strategy balance reverts
        stable_vault(&mut mock, TUSD_VAULT, Address::repeat_byte(0xEE), 10);
        let registry = FakeRegistry::new()
            .with(DAI_VAULT, DAI_STRATEGY)
            .with(TUSD_VAULT, TUSD_STRATEGY);

        let report = loader(mock, Duration::from_secs(5)).describe_all(&registry).await.unwrap();
        assert_eq!(report.vaults.len(), 1);
        assert_eq!(report.vaults[0].name, "DAI");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].address, TUSD_VAULT);
        assert_eq!(report.failures[0].kind, "RemoteCallError");
    }

    #[tokio::test]
    async fn test_unknown_variant_is_excluded() {
        let mut mock = MockReader::new();
        stable_vault(&mut mock, DAI_VAULT, DAI_STRATEGY, 1_000);
        let unregistered = Address::repeat_byte(0x5A);
        let registry = FakeRegistry::new()
            .with(DAI_VAULT, DAI_STRATEGY)
            .with(USDT_VAULT, unregistered);

        let report = loader(mock, Duration::from_secs(5)).describe_all(&registry).await.unwrap();
        assert_eq!(report.vaults.len(), 1);
        assert_eq!(report.failures[0].kind, "UnknownVariant");
        assert_eq!(report.failures[0].address, USDT_VAULT);
    }

    #[tokio::test]
    async fn test_slow_vault_times_out() {
        let mut mock = MockReader::new();
        stable_vault(&mut mock, DAI_VAULT, DAI_STRATEGY, 1_000);
        stable_vault(&mut mock, USDT_VAULT, USDT_STRATEGY, 250);
        mock.delay(USDT_VAULT, Duration::from_secs(30));
        let registry = FakeRegistry::new()
            .with(DAI_VAULT, DAI_STRATEGY)
            .with(USDT_VAULT, USDT_STRATEGY);

        let report = loader(mock, Duration::from_millis(200)).describe_all(&registry).await.unwrap();
        assert_eq!(report.vaults.len(), 1);
        assert_eq!(report.vaults[0].address, DAI_VAULT);
        assert_eq!(report.failures[0].kind, "Timeout");
    }

    #[tokio::test]
    async fn test_load_vaults_isolates_unknown_vault() {
        let mut mock = MockReader::new();
        stable_vault(&mut mock, DAI_VAULT, DAI_STRATEGY, 1_000);
        let stranger = Address::repeat_byte(0x42);
        let registry = FakeRegistry::new()
            .with(DAI_VAULT, DAI_STRATEGY)
            .with(stranger, DAI_STRATEGY);

        let (records, failures) = loader(mock, Duration::from_secs(5)).load_vaults(&registry).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "DAI");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, "UnknownVault");
    }

    #[tokio::test]
    async fn test_enumeration_failure_fails_pass() {
        struct BrokenRegistry;

        #[async_trait]
        impl RegistrySource for BrokenRegistry {
            async fn list_vault_addresses(&self) -> VaultResult<Vec<Address>> {
                Err(VaultError::RemoteCall {
                    contract: Address::ZERO,
                    method: "getVaults()",
                    reason: "execution reverted".to_string(),
                })
            }

            async fn get_vault_metadata(&self, vault: Address) -> VaultResult<VaultMetadata> {
                Err(VaultError::UnknownVault(vault))
            }
        }

        let result = loader(MockReader::new(), Duration::from_secs(5))
            .describe_all(&BrokenRegistry)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_report_serializes() {
        let mut mock = MockReader::new();
        stable_vault(&mut mock, DAI_VAULT, DAI_STRATEGY, 1_000);
        let registry = FakeRegistry::new().with(DAI_VAULT, DAI_STRATEGY);

        let report = loader(mock, Duration::from_secs(5)).describe_all(&registry).await.unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["vaults"][0]["name"], "DAI");
        assert_eq!(json["vaults"][0]["metrics"]["tvl"], 1_000.0);
    }
}
