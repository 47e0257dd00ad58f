//! Static lookup tables for the v1 vault deployment
//!
//! Address -> interface name, interface name -> capabilities, vault address
//! -> alias, strategy variant -> Curve swap override, and the price-source
//! allow-lists. Built once at startup (defaults below, optionally extended
//! from a TOML file) and then shared read-only.
//!
//! CRITICAL: All addresses are for Ethereum Mainnet.

use alloy_primitives::{address, Address};
use eyre::{eyre, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use super::capabilities::{Capability, CapabilitySet};

// ============================================
// INTERFACE NAMES
// ============================================

/// Generic vault interface used when no per-address override exists
pub const STANDARD_VAULT_INTERFACE: &str = "yVault";

/// Strategy variant that stakes in YFI governance
pub const GOVERNANCE_STRATEGY: &str = "StrategyYFIGovernance";

// ============================================
// DEFAULT TABLES
// ============================================

/// Vault address -> display alias
const VAULT_ALIASES: &[(Address, &str)] = &[
    (address!("29E240CFD7946BA20895a7a02eDb25C210f9f324"), "aLINK"),
    (address!("881b06da56BB5675c54E4Ed311c21E54C5025298"), "LINK"),
    (address!("597aD1e0c13Bfe8025993D9e79C69E1c0233522e"), "USDC"),
    (address!("5dbcF33D8c2E976c6b560249878e6F1491Bca25c"), "curve.fi/y"),
    (address!("37d19d1c4E1fa9DC47bD1eA12f742a0887eDa74a"), "TUSD"),
    (address!("ACd43E627e64355f1861cEC6d3a6688B31a6F952"), "DAI"),
    (address!("2f08119C6f07c006695E079AAFc638b8789FAf18"), "USDT"),
    (address!("BA2E7Fed597fd0E3e70f5130BcDbbFE06bB94fe1"), "YFI"),
    (address!("2994529C0652D127b7842094103715ec5299bBed"), "curve.fi/busd"),
    (address!("7Ff566E1d69DEfF32a7b244aE7276b9f90e9D0f6"), "curve.fi/sbtc"),
    (address!("e1237aA7f535b0CC33Fd973D66cBf830354D16c7"), "WETH"),
    (address!("9cA85572E6A3EbF24dEDd195623F188735A5179f"), "curve.fi/3pool"),
];

/// Vaults that do not speak the standard vault interface
const VAULT_INTERFACES: &[(Address, &str)] = &[
    (address!("29E240CFD7946BA20895a7a02eDb25C210f9f324"), "yDelegatedVault"), // aLINK
    (address!("881b06da56BB5675c54E4Ed311c21E54C5025298"), "yWrappedVault"),   // LINK
];

const CONTROLLER_INTERFACES: &[(Address, &str)] = &[
    (address!("2be5D998C95DE70D9A38b3d78e49751F10F9E88b"), "ControllerV1"),
    (address!("9E65Ad11b299CA0Abefc2799dDB6314Ef2d91080"), "ControllerV2"),
];

const STRATEGY_INTERFACES: &[(Address, &str)] = &[
    (address!("25fAcA21dd2Ad7eDB3a027d543e617496820d8d6"), "StrategyVaultUSDC"),
    (address!("A30d1D98C502378ad61Fe71BcDc3a808CF60b897"), "StrategyDForceUSDC"),
    (address!("1d91E3F77271ed069618b4BA06d19821BC2ed8b0"), "StrategyTUSDCurve"),
    (address!("Aa880345A3147a1fC6889080401C791813ed08Dc"), "StrategyDAICurve"),
    (address!("787C771035bDE631391ced5C083db424A4A64bD8"), "StrategyDForceUSDT"),
    (address!("40BD98e3ccE4F34c087a73DD3d05558733549afB"), "StrategyCreamYFI"),
    (address!("2EE856843bB65c244F527ad302d6d2853921727e"), "StrategyCurveYCRVVoter"),
    (address!("4FEeaecED575239b46d70b50E13532ECB62e4ea8"), "StrategyMKRVaultDAIDelegate"),
    (address!("395F93350D5102B6139Abfc84a7D6ee70488797C"), "StrategyYFIGovernance"),
    (address!("c999fb87AcA383A63D804A575396F65A55aa5aC8"), "StrategyCurveSBTC"),
    (address!("112570655b32A8c747845E0215ad139661e66E7F"), "StrategyCurveBUSDVoterProxy"),
    (address!("6D6c1AD13A5000148Aa087E7CbFb53D402c81341"), "StrategyCurveBTCVoterProxy"),
    (address!("07DB4B9b3951094B9E278D336aDf46a036295DE7"), "StrategyCurveYVoterProxy"),
    (address!("C59601F0CC49baa266891b7fc63d2D5FE097A79D"), "StrategyCurve3CrvVoterProxy"),
];

/// Strategies whose `curve()` points at the wrong swap
const SWAP_OVERRIDES: &[(&str, Address)] = &[
    ("StrategyCurveSBTC", address!("7fC77b5c7614E1533320Ea6DDc2Eb61fa00A9714")),
];

/// Interface name -> exposed optional methods
const INTERFACE_CAPABILITIES: &[(&str, &[Capability])] = &[
    ("yVault", &[Capability::Available, Capability::Min, Capability::Max]),
    ("yDelegatedVault", &[Capability::Underlying]),
    ("yWrappedVault", &[]),
    ("StrategyDForceUSDC", &[Capability::Earned]),
    ("StrategyDForceUSDT", &[Capability::Earned]),
    ("StrategyCurveSBTC", &[Capability::Proxy]),
    ("StrategyCurveBUSDVoterProxy", &[Capability::Proxy]),
    ("StrategyCurveBTCVoterProxy", &[Capability::Proxy]),
    ("StrategyCurveYVoterProxy", &[Capability::Proxy]),
    ("StrategyCurve3CrvVoterProxy", &[Capability::Proxy]),
    (GOVERNANCE_STRATEGY, &[Capability::Governance]),
];

/// Deposit tokens priced at exactly 1
const STABLE_ASSETS: &[&str] = &["USDC", "TUSD", "DAI", "USDT"];

/// Vaults over an interest-bearing wrapper, priced via `underlying()`
const WRAPPED_ASSETS: &[&str] = &["aLINK"];

// ============================================
// VARIANT TABLES
// ============================================

#[derive(Debug, Clone)]
pub struct VariantTables {
    pub vault_interfaces: HashMap<Address, String>,
    pub controller_interfaces: HashMap<Address, String>,
    pub strategy_interfaces: HashMap<Address, String>,
    pub capabilities: HashMap<String, CapabilitySet>,
    pub vault_aliases: HashMap<Address, String>,
    pub swap_overrides: HashMap<String, Address>,
    pub stable_assets: Vec<String>,
    pub wrapped_assets: Vec<String>,
}

impl VariantTables {
    /// Built-in v1 mainnet deployment
    pub fn mainnet() -> Self {
        let owned = |rows: &[(Address, &str)]| -> HashMap<Address, String> {
            rows.iter().map(|(a, n)| (*a, n.to_string())).collect()
        };

        Self {
            vault_interfaces: owned(VAULT_INTERFACES),
            controller_interfaces: owned(CONTROLLER_INTERFACES),
            strategy_interfaces: owned(STRATEGY_INTERFACES),
            capabilities: INTERFACE_CAPABILITIES
                .iter()
                .map(|(name, caps)| (name.to_string(), caps.iter().copied().collect()))
                .collect(),
            vault_aliases: owned(VAULT_ALIASES),
            swap_overrides: SWAP_OVERRIDES
                .iter()
                .map(|(name, a)| (name.to_string(), *a))
                .collect(),
            stable_assets: STABLE_ASSETS.iter().map(|s| s.to_string()).collect(),
            wrapped_assets: WRAPPED_ASSETS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Mainnet defaults extended by a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .map_err(|e| eyre!("Cannot read tables file {}: {}", path.as_ref().display(), e))?;
        let mut tables = Self::mainnet();
        tables.merge_toml(&content)?;
        Ok(tables)
    }

    /// Merge TOML overrides: map entries are added or replaced, lists
    /// replace the current list when present
    pub fn merge_toml(&mut self, content: &str) -> Result<()> {
        let file: TablesFile = toml::from_str(content)?;

        merge_addressed(&mut self.vault_interfaces, file.vault_interfaces)?;
        merge_addressed(&mut self.controller_interfaces, file.controller_interfaces)?;
        merge_addressed(&mut self.strategy_interfaces, file.strategy_interfaces)?;
        merge_addressed(&mut self.vault_aliases, file.vault_aliases)?;

        for (name, addr) in file.swap_overrides {
            self.swap_overrides.insert(name, parse_address(&addr)?);
        }
        self.capabilities.extend(file.capabilities);

        if let Some(stable) = file.stable_assets {
            self.stable_assets = stable;
        }
        if let Some(wrapped) = file.wrapped_assets {
            self.wrapped_assets = wrapped;
        }
        Ok(())
    }

    pub fn alias(&self, vault: &Address) -> Option<&str> {
        self.vault_aliases.get(vault).map(String::as_str)
    }

    /// Capabilities of an interface; unknown names expose nothing optional
    pub fn capabilities_of(&self, interface: &str) -> CapabilitySet {
        self.capabilities.get(interface).cloned().unwrap_or_default()
    }

    pub fn swap_override(&self, strategy_variant: &str) -> Option<Address> {
        self.swap_overrides.get(strategy_variant).copied()
    }

    pub fn is_stable_asset(&self, vault_name: &str) -> bool {
        self.stable_assets.iter().any(|s| s == vault_name)
    }

    pub fn is_wrapped_asset(&self, vault_name: &str) -> bool {
        self.wrapped_assets.iter().any(|s| s == vault_name)
    }

    /// One-line counts for the startup summary
    pub fn summary(&self) -> String {
        format!(
            "{} aliases, {} vault overrides, {} controllers, {} strategies, {} swap overrides",
            self.vault_aliases.len(),
            self.vault_interfaces.len(),
            self.controller_interfaces.len(),
            self.strategy_interfaces.len(),
            self.swap_overrides.len()
        )
    }
}

impl Default for VariantTables {
    fn default() -> Self {
        Self::mainnet()
    }
}

// ============================================
// TOML FILE FORMAT
// ============================================

/// On-disk form: addresses as strings, parsed during merge
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TablesFile {
    vault_interfaces: HashMap<String, String>,
    controller_interfaces: HashMap<String, String>,
    strategy_interfaces: HashMap<String, String>,
    vault_aliases: HashMap<String, String>,
    swap_overrides: HashMap<String, String>,
    capabilities: HashMap<String, CapabilitySet>,
    stable_assets: Option<Vec<String>>,
    wrapped_assets: Option<Vec<String>>,
}

fn parse_address(s: &str) -> Result<Address> {
    Address::from_str(s.trim()).map_err(|e| eyre!("Invalid address '{}' in tables file: {}", s, e))
}

fn merge_addressed(target: &mut HashMap<Address, String>, rows: HashMap<String, String>) -> Result<()> {
    for (addr, name) in rows {
        target.insert(parse_address(&addr)?, name);
    }
    Ok(())
}
