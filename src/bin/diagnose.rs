//! Diagnostic tool - Check effective settings
//!
//! Run with: cargo run --bin diagnose

use std::env;
use std::path::Path;

/// Keep `head` and `tail` characters of anything longer than `max`
fn elide(text: &str, max: usize, head: usize, tail: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max {
        return text.to_string();
    }
    let start: String = chars[..head].iter().collect();
    let end: String = chars[chars.len() - tail..].iter().collect();
    format!("{}...{}", start, end)
}

fn main() {
    println!("🔍 VAULT METRICS DIAGNOSTIC CHECK\n");

    // Load .env
    dotenvy::dotenv().ok();

    println!("═══════════════════════════════════════════════════");
    println!("                  CONFIGURATION                     ");
    println!("═══════════════════════════════════════════════════\n");

    let checks = [
        ("REGISTRY_ADDRESS", "0x3eE41C098f9666ed2eA246f4D2558010e59d63A0", "v1 vault registry"),
        ("REFERENCE_TOKEN", "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", "Unit all prices are quoted in"),
        ("UNISWAP_ROUTER", "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D", "Router used for quotes"),
        ("WETH_ADDRESS", "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2", "Intermediate hop for quotes"),
        ("MAX_CONCURRENCY", "8", "Vaults described in parallel"),
        ("VAULT_TIMEOUT_SECS", "30", "Deadline per vault"),
        ("RPC_MAX_RETRIES", "3", "Retries on transport failure"),
        ("RPC_RETRY_BACKOFF_MS", "250", "Base retry backoff"),
    ];

    for (key, default, desc) in checks {
        let value = env::var(key).unwrap_or_else(|_| default.to_string());
        let is_default = env::var(key).is_err();
        let marker = if is_default { "(default)" } else { "(from .env)" };
        println!("  {}: {} {}", key, value, marker);
        println!("    └─ {}\n", desc);
    }

    // RPC check
    let rpc = env::var("RPC_URL").unwrap_or_else(|_| "NOT SET".to_string());
    let rpc_display = elide(&rpc, 50, 30, 15);
    println!("  RPC_URL: {}", rpc_display);

    println!("\n═══════════════════════════════════════════════════");
    println!("                  VARIANT TABLES                    ");
    println!("═══════════════════════════════════════════════════\n");

    match env::var("VARIANT_TABLES_PATH") {
        Ok(path) if Path::new(&path).is_file() => {
            println!("  VARIANT_TABLES_PATH: {} ✅ found", path);
            println!("     → Merged over the built-in mainnet tables");
        }
        Ok(path) => {
            println!("  VARIANT_TABLES_PATH: {} ❌ missing", path);
            println!("     → The main binary will refuse to start");
        }
        Err(_) => {
            println!("  VARIANT_TABLES_PATH: not set");
            println!("     → Built-in mainnet tables only");
        }
    }

    println!("\n═══════════════════════════════════════════════════");
    println!("                     STATUS                         ");
    println!("═══════════════════════════════════════════════════\n");

    if rpc == "NOT SET" {
        println!("  ⚠️  RPC_URL not set, falling back to a public endpoint");
        println!("     Public endpoints rate-limit; expect Timeout failures");
    } else if rpc.contains("YOUR_API_KEY") {
        println!("  ❌ RPC_URL still contains the YOUR_API_KEY placeholder");
    } else {
        println!("  ✅ RPC_URL configured");
    }

    let concurrency: usize = env::var("MAX_CONCURRENCY")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8);
    if concurrency > 32 {
        println!("\n  ⚠️  MAX_CONCURRENCY = {} is aggressive for a shared node", concurrency);
    }

    println!("\n✅ Diagnostic complete!\n");
}
