use alloy_primitives::Address;
use std::sync::Arc;

use crate::binding::{ContractResolver, VariantTables};
use crate::contracts::ContractReader;
use crate::pricing::{CurveCalculator, PriceOracle, PriceQuoter};

/// Everything a vault pipeline needs to talk to the chain.
///
/// Read-only and shared across all vaults of a pass.
#[derive(Clone)]
pub struct ChainContext {
    pub reader: Arc<dyn ContractReader>,
    pub resolver: ContractResolver,
    pub oracle: PriceOracle,
    pub curve: CurveCalculator,
}

impl ChainContext {
    pub fn new(
        reader: Arc<dyn ContractReader>,
        tables: Arc<VariantTables>,
        quoter: Arc<dyn PriceQuoter>,
        reference: Address,
    ) -> Self {
        Self {
            reader,
            resolver: ContractResolver::new(tables.clone()),
            oracle: PriceOracle::new(quoter.clone(), reference, tables),
            curve: CurveCalculator::new(quoter, reference),
        }
    }

    pub fn tables(&self) -> &VariantTables {
        self.resolver.tables()
    }
}
