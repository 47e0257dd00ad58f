//! Runtime Configuration
//!
//! Settings for one aggregation pass: where to read the chain, which
//! registry to enumerate, how prices are quoted and how hard the loader may
//! push the RPC endpoint.

use alloy_primitives::Address;
use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::contracts::interfaces::{UNISWAP_V2_ROUTER, USDC, WETH, YEARN_V1_REGISTRY};

// ============================================
// MAIN CONFIGURATION
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // ========== Network Settings ==========
    /// Archive or full node JSON-RPC endpoint
    pub rpc_url: String,

    /// Retries for a transport-level failure of a single call
    pub rpc_max_retries: u32,

    /// Base backoff between retries, multiplied by the attempt number
    pub rpc_retry_backoff_ms: u64,

    // ========== Registry ==========
    /// v1 vault registry contract
    pub registry_address: String,

    /// TOML file extending the built-in variant tables
    pub variant_tables_path: Option<String>,

    // ========== Pricing ==========
    /// Token every price is expressed in (USDC)
    pub reference_token: String,

    pub uniswap_router: String,
    pub weth: String,

    // ========== Loader ==========
    /// Vaults described in parallel
    pub max_concurrency: usize,

    /// Deadline for bind + describe of a single vault
    pub vault_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        Ok(Self {
            // Network
            rpc_url: env::var("RPC_URL").unwrap_or(defaults.rpc_url),
            rpc_max_retries: env::var("RPC_MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.rpc_max_retries),
            rpc_retry_backoff_ms: env::var("RPC_RETRY_BACKOFF_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.rpc_retry_backoff_ms),

            // Registry
            registry_address: env::var("REGISTRY_ADDRESS").unwrap_or(defaults.registry_address),
            variant_tables_path: env::var("VARIANT_TABLES_PATH").ok().filter(|s| !s.is_empty()),

            // Pricing
            reference_token: env::var("REFERENCE_TOKEN").unwrap_or(defaults.reference_token),
            uniswap_router: env::var("UNISWAP_ROUTER").unwrap_or(defaults.uniswap_router),
            weth: env::var("WETH_ADDRESS").unwrap_or(defaults.weth),

            // Loader
            max_concurrency: env::var("MAX_CONCURRENCY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_concurrency),
            vault_timeout_secs: env::var("VAULT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.vault_timeout_secs),
        })
    }

    /// Load configuration from a TOML file; missing keys take defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| eyre!("Failed to read config {}: {}", path.display(), e))?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rpc_url.is_empty() || self.rpc_url.contains("YOUR_API_KEY") {
            return Err(eyre!("Invalid RPC_URL - please set a valid node URL"));
        }

        self.registry()?;
        self.reference()?;
        self.router()?;
        self.weth()?;

        if self.max_concurrency == 0 {
            return Err(eyre!("MAX_CONCURRENCY must be at least 1"));
        }
        if self.vault_timeout_secs == 0 {
            return Err(eyre!("VAULT_TIMEOUT_SECS must be at least 1"));
        }
        if self.rpc_max_retries > 10 {
            return Err(eyre!(
                "RPC_MAX_RETRIES > 10 hides a dead endpoint (currently {})",
                self.rpc_max_retries
            ));
        }

        Ok(())
    }

    pub fn registry(&self) -> Result<Address> {
        parse_address("REGISTRY_ADDRESS", &self.registry_address)
    }

    pub fn reference(&self) -> Result<Address> {
        parse_address("REFERENCE_TOKEN", &self.reference_token)
    }

    pub fn router(&self) -> Result<Address> {
        parse_address("UNISWAP_ROUTER", &self.uniswap_router)
    }

    pub fn weth(&self) -> Result<Address> {
        parse_address("WETH_ADDRESS", &self.weth)
    }

    pub fn vault_timeout(&self) -> Duration {
        Duration::from_secs(self.vault_timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.rpc_retry_backoff_ms)
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("╔════════════════════════════════════════════════════════════╗");
        println!("║              VAULT METRICS - CONFIGURATION                 ║");
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ NETWORK                                                    ║");
        println!("║ • RPC:             {:<40} ║", redact(&self.rpc_url));
        println!("║ • Retries:         {:<40} ║",
            format!("{} (backoff {}ms)", self.rpc_max_retries, self.rpc_retry_backoff_ms)
        );
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ REGISTRY                                                   ║");
        println!("║ • Address:         {:<40} ║", shorten(&self.registry_address));
        println!("║ • Extra Tables:    {:<40} ║",
            self.variant_tables_path.as_deref().unwrap_or("✗ Built-in only")
        );
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ PRICING                                                    ║");
        println!("║ • Reference:       {:<40} ║", shorten(&self.reference_token));
        println!("║ • Router:          {:<40} ║", shorten(&self.uniswap_router));
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ LOADER                                                     ║");
        println!("║ • Concurrency:     {:<40} ║", self.max_concurrency);
        println!("║ • Vault Timeout:   {:<40} ║", format!("{}s", self.vault_timeout_secs));
        println!("╚════════════════════════════════════════════════════════════╝");
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: "https://eth.llamarpc.com".to_string(),
            rpc_max_retries: 3,
            rpc_retry_backoff_ms: 250,
            registry_address: YEARN_V1_REGISTRY.to_string(),
            variant_tables_path: None,
            reference_token: USDC.to_string(),
            uniswap_router: UNISWAP_V2_ROUTER.to_string(),
            weth: WETH.to_string(),
            max_concurrency: 8,
            vault_timeout_secs: 30,
        }
    }
}

fn parse_address(key: &str, value: &str) -> Result<Address> {
    Address::from_str(value.trim()).map_err(|e| eyre!("Invalid {} '{}': {}", key, value, e))
}

/// Drop the path of an RPC URL, API keys usually live there
fn redact(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) => format!("{}://{}", parsed.scheme(), parsed.host_str().unwrap_or("?")),
        Err(_) => "(invalid)".to_string(),
    }
}

fn shorten(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() > 14 {
        let head: String = chars[..8].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        address.to_string()
    }
}
