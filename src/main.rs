//! Vault Metrics - v1 yield vault aggregation
//!
//! Run with: cargo run -- [--json]
//!
//! One pass: enumerate the registry, bind and describe every vault, print
//! the metrics (table or JSON) and the vaults that failed.

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use console::{style, Term};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod binding;
mod config;
mod contracts;
mod error;
mod pricing;
mod registry;
#[cfg(test)]
mod test_support;
mod vault;

use binding::VariantTables;
use config::Config;
use contracts::{ContractReader, RetryingReader, RpcReader};
use pricing::{PriceQuoter, UniswapRouterQuoter};
use registry::{LoadReport, OnChainRegistry, VaultFailure, VaultLoader};
use vault::metrics::{SHARE_PRICE, TOKEN_PRICE, TVL, VAULT_BALANCE};
use vault::{ChainContext, VaultRecord};

#[derive(Parser)]
#[command(name = "vault-metrics")]
#[command(about = "Balances, share price, boost, APY and TVL for every v1 vault")]
struct Cli {
    /// TOML config file (defaults to environment variables)
    #[arg(short, long)]
    config: Option<String>,

    /// TOML file extending the built-in variant tables
    #[arg(long)]
    tables: Option<String>,

    /// Print the report as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Override MAX_CONCURRENCY
    #[arg(long)]
    concurrency: Option<usize>,

    /// Bind every vault and print its interfaces without reading metrics
    #[arg(long)]
    bind_only: bool,
}

fn print_banner() {
    println!();
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!("{}", style(" 🏦 VAULT METRICS - v1 Vault Aggregator").cyan().bold());
    println!(
        "{}",
        style("    Registry | Capability Binding | Boost & APY | TVL").cyan()
    );
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!();
}

fn print_report(report: &LoadReport) {
    let mut vaults: Vec<_> = report.vaults.iter().collect();
    vaults.sort_by(|a, b| {
        let tvl = |v: &&registry::VaultMetrics| v.metrics.get(TVL).unwrap_or_default();
        tvl(b).total_cmp(&tvl(a))
    });

    println!(
        "{}",
        style(format!(
            "{:<16} {:>16} {:>12} {:>14} {:>18}",
            "VAULT", "BALANCE", "SHARE PRICE", "TOKEN PRICE", "TVL"
        ))
        .bold()
    );
    for v in &vaults {
        let get = |key: &str| v.metrics.get(key).unwrap_or_default();
        println!(
            "{:<16} {:>16.4} {:>12.6} {:>14.4} {:>18.2}",
            v.name,
            get(VAULT_BALANCE),
            get(SHARE_PRICE),
            get(TOKEN_PRICE),
            get(TVL)
        );

        // Everything beyond the base columns, one indented line each
        for (key, value) in v.metrics.iter() {
            if ![VAULT_BALANCE, SHARE_PRICE, TOKEN_PRICE, TVL].contains(&key) {
                println!("    {}", style(format!("{:<20} {:.6}", key, value)).dim());
            }
        }
    }

    println!();
    println!(
        "{} {} vaults, total TVL {:.2}",
        style("✓").green(),
        report.vaults.len(),
        report.total_tvl()
    );

    if !report.failures.is_empty() {
        println!();
        println!("{}", style(format!("✗ {} vaults failed", report.failures.len())).red().bold());
        for failure in &report.failures {
            println!(
                "  {} {:<18} {}",
                failure.address,
                style(failure.kind).yellow(),
                failure.reason
            );
        }
    }
}

fn print_bindings(records: &[VaultRecord], failures: &[VaultFailure]) {
    for record in records {
        println!(
            "{:<16} {} {:<16} {}",
            style(&record.name).bold(),
            record.address,
            record.vault.interface,
            record.vault.capabilities
        );
        println!(
            "    controller {} ({})",
            record.controller.address, record.controller.interface
        );
        println!(
            "    strategy   {} ({}) {}",
            record.strategy.address, record.strategy.variant, record.strategy.capabilities
        );
        println!(
            "    token      {} decimals {} wrapped={} delegated={}",
            record.token.address, record.decimals, record.is_wrapped, record.is_delegated
        );
    }
    for failure in failures {
        println!("{} {} {}", style("✗").red(), failure.address, failure.reason);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vault_metrics=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(concurrency) = cli.concurrency {
        config.max_concurrency = concurrency;
    }
    if let Some(path) = &cli.tables {
        config.variant_tables_path = Some(path.clone());
    }

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        error!("Please check your .env file");
        return Err(e);
    }

    if !cli.json {
        print_banner();
        config.print_summary();
        println!();
    }

    // Variant tables
    let tables = match &config.variant_tables_path {
        Some(path) => VariantTables::from_file(path)?,
        None => VariantTables::mainnet(),
    };
    info!("Variant tables: {}", tables.summary());
    let tables = Arc::new(tables);

    // Chain access
    let reader: Arc<dyn ContractReader> = Arc::new(RetryingReader::new(
        RpcReader::new(&config.rpc_url)?,
        config.rpc_max_retries,
        config.retry_backoff(),
    ));
    let reference = config.reference()?;
    let quoter: Arc<dyn PriceQuoter> = Arc::new(UniswapRouterQuoter::new(
        reader.clone(),
        config.router()?,
        config.weth()?,
    ));
    let ctx = Arc::new(ChainContext::new(reader.clone(), tables, quoter, reference));

    let registry = OnChainRegistry::new(config.registry()?, reader);
    let loader = VaultLoader::new(ctx, config.max_concurrency, config.vault_timeout())
        .with_progress(!cli.json && Term::stderr().is_term());

    info!("Reading registry {}", registry.address());

    if cli.bind_only {
        let (records, failures) = loader
            .load_vaults(&registry)
            .await
            .map_err(|e| eyre!("Registry enumeration failed: {}", e))?;
        print_bindings(&records, &failures);
        return Ok(());
    }

    let report = loader
        .describe_all(&registry)
        .await
        .map_err(|e| eyre!("Registry enumeration failed: {}", e))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}
