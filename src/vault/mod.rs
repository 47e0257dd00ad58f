//! Per-vault aggregation

mod context;
pub mod metrics;
mod record;

pub use context::ChainContext;
pub use metrics::MetricsRecord;
pub use record::VaultRecord;
