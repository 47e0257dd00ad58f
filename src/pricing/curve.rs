//! Curve gauge boost and CRV APY
//!
//! Used for strategies that stake through a voter proxy. Reads are split
//! from the math so the formulas can be checked without a chain.
//!
//! Gauge accounting: a depositor's working balance is
//! `min(0.4 * balance + 0.6 * total * veCRV / veCRV_total, balance)`,
//! so boost ranges from 1.0 (no veCRV) to 2.5.

use alloy_primitives::Address;
use std::sync::Arc;

use super::quoter::PriceQuoter;
use crate::binding::{GaugeHandle, SwapHandle};
use crate::contracts::interfaces::{
    IGaugeController, IVotingEscrow, CRV, CURVE_GAUGE_CONTROLLER, CURVE_VOTING_ESCROW,
};
use crate::contracts::units::from_fixed18;
use crate::contracts::{read, ContractReader};
use crate::error::VaultResult;

pub const SECONDS_PER_YEAR: f64 = 31_536_000.0;

/// Share of an unboosted deposit that counts towards working supply
const TOKENLESS_PRODUCTION: f64 = 0.4;

/// Ordered metric fields produced by a calculator
pub type Fields = Vec<(&'static str, f64)>;

// ============================================
// BOOST
// ============================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoostInputs {
    pub gauge_balance: f64,
    pub gauge_total: f64,
    pub working_balance: f64,
    pub working_total: f64,
    pub vecrv_balance: f64,
    pub vecrv_total: f64,
}

impl BoostInputs {
    pub fn boost(&self) -> f64 {
        if self.gauge_balance > 0.0 {
            self.working_balance / (TOKENLESS_PRODUCTION * self.gauge_balance)
        } else {
            1.0
        }
    }

    /// veCRV needed for the full 2.5x on the current deposit
    pub fn min_vecrv(&self) -> f64 {
        if self.gauge_total > 0.0 {
            self.vecrv_total * self.gauge_balance / self.gauge_total
        } else {
            0.0
        }
    }

    /// Boost the deposit would get holding `min_vecrv`, with the rest of the
    /// working supply unchanged
    pub fn max_boost(&self) -> f64 {
        let gb = self.gauge_balance;
        if gb <= 0.0 || self.vecrv_total <= 0.0 {
            return 1.0;
        }

        let boosted = TOKENLESS_PRODUCTION * gb
            + (1.0 - TOKENLESS_PRODUCTION) * self.gauge_total * self.min_vecrv() / self.vecrv_total;
        let lim = boosted.min(gb);
        let boosted_supply = self.working_total + lim - self.working_balance;

        let noboost_lim = TOKENLESS_PRODUCTION * gb;
        let noboost_supply = self.working_total + noboost_lim - self.working_balance;

        if boosted_supply <= 0.0 || noboost_supply <= 0.0 {
            return 1.0;
        }
        (lim / boosted_supply) / (noboost_lim / noboost_supply)
    }

    pub fn fields(&self) -> Fields {
        vec![
            ("gauge balance", self.gauge_balance),
            ("gauge total", self.gauge_total),
            ("vecrv balance", self.vecrv_balance),
            ("vecrv total", self.vecrv_total),
            ("working balance", self.working_balance),
            ("working total", self.working_total),
            ("boost", self.boost()),
            ("max boost", self.max_boost()),
            ("min vecrv", self.min_vecrv()),
        ]
    }
}

// ============================================
// APY
// ============================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApyInputs {
    pub crv_price: f64,
    pub relative_weight: f64,
    pub inflation_rate: f64,
    pub virtual_price: f64,
    pub working_total: f64,
}

impl ApyInputs {
    /// CRV per year per reference unit of unboosted LP
    pub fn reward_rate(&self) -> f64 {
        let denominator = self.working_total * self.virtual_price;
        if denominator <= 0.0 {
            return 0.0;
        }
        self.inflation_rate * self.relative_weight * SECONDS_PER_YEAR * TOKENLESS_PRODUCTION
            / denominator
    }

    pub fn apy(&self) -> f64 {
        self.reward_rate() * self.crv_price
    }

    pub fn fields(&self) -> Fields {
        vec![
            ("crv price", self.crv_price),
            ("relative weight", self.relative_weight),
            ("inflation rate", self.inflation_rate),
            ("virtual price", self.virtual_price),
            ("crv reward rate", self.reward_rate()),
            ("crv apy", self.apy()),
        ]
    }
}

// ============================================
// CALCULATOR
// ============================================

#[derive(Clone)]
pub struct CurveCalculator {
    quoter: Arc<dyn PriceQuoter>,
    reference: Address,
    crv: Address,
    voting_escrow: Address,
    gauge_controller: Address,
}

impl CurveCalculator {
    pub fn new(quoter: Arc<dyn PriceQuoter>, reference: Address) -> Self {
        Self {
            quoter,
            reference,
            crv: CRV,
            voting_escrow: CURVE_VOTING_ESCROW,
            gauge_controller: CURVE_GAUGE_CONTROLLER,
        }
    }

    pub async fn compute_boost(
        &self,
        reader: &dyn ContractReader,
        gauge: &GaugeHandle,
        voter: Address,
    ) -> VaultResult<Fields> {
        let inputs = BoostInputs {
            gauge_balance: from_fixed18(gauge.balance_of(reader, voter).await?),
            gauge_total: from_fixed18(gauge.total_supply(reader).await?),
            working_balance: from_fixed18(gauge.working_balance(reader, voter).await?),
            working_total: from_fixed18(gauge.working_supply(reader).await?),
            vecrv_balance: from_fixed18(
                read(reader, self.voting_escrow, IVotingEscrow::balanceOfCall { account: voter }).await?,
            ),
            vecrv_total: from_fixed18(
                read(reader, self.voting_escrow, IVotingEscrow::totalSupplyCall {}).await?,
            ),
        };
        Ok(inputs.fields())
    }

    pub async fn compute_apy(
        &self,
        reader: &dyn ContractReader,
        gauge: &GaugeHandle,
        swap: &SwapHandle,
    ) -> VaultResult<Fields> {
        let relative_weight = read(
            reader,
            self.gauge_controller,
            IGaugeController::gauge_relative_weightCall {
                gauge: gauge.address,
            },
        )
        .await?;

        let inputs = ApyInputs {
            crv_price: self.quoter.quote_price(self.crv, self.reference).await?,
            relative_weight: from_fixed18(relative_weight),
            inflation_rate: from_fixed18(gauge.inflation_rate(reader).await?),
            virtual_price: from_fixed18(swap.virtual_price(reader).await?),
            working_total: from_fixed18(gauge.working_supply(reader).await?),
        };
        Ok(inputs.fields())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> BoostInputs {
        BoostInputs {
            gauge_balance: 1_000.0,
            gauge_total: 10_000.0,
            working_balance: 1_000.0,
            working_total: 5_000.0,
            vecrv_balance: 50.0,
            vecrv_total: 1_000.0,
        }
    }

    #[test]
    fn test_boost_from_working_balance() {
        // working == balance means full 2.5x
        assert!((inputs().boost() - 2.5).abs() < 1e-12);

        let unboosted = BoostInputs {
            working_balance: 400.0,
            ..inputs()
        };
        assert!((unboosted.boost() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_min_vecrv_is_pro_rata() {
        // 10% of the gauge needs 10% of veCRV
        assert!((inputs().min_vecrv() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_max_boost_math() {
        let unboosted = BoostInputs {
            working_balance: 400.0,
            ..inputs()
        };
        // lim = 1000, supply 5600; noboost 400 / 5000
        let expected = (1_000.0 / 5_600.0) / (400.0 / 5_000.0);
        assert!((unboosted.max_boost() - expected).abs() < 1e-12);
        assert!(unboosted.max_boost() <= 2.5);
    }

    #[test]
    fn test_empty_gauge_is_neutral() {
        let empty = BoostInputs {
            gauge_balance: 0.0,
            gauge_total: 0.0,
            working_balance: 0.0,
            working_total: 0.0,
            vecrv_balance: 0.0,
            vecrv_total: 0.0,
        };
        assert_eq!(empty.boost(), 1.0);
        assert_eq!(empty.max_boost(), 1.0);
        assert_eq!(empty.min_vecrv(), 0.0);
    }

    #[test]
    fn test_boost_fields_order() {
        let keys: Vec<&str> = inputs().fields().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys.first(), Some(&"gauge balance"));
        assert!(keys.contains(&"boost"));
        assert!(keys.contains(&"max boost"));
    }

    #[test]
    fn test_apy() {
        let apy = ApyInputs {
            crv_price: 2.0,
            relative_weight: 0.1,
            inflation_rate: 10.0,
            virtual_price: 1.0,
            working_total: SECONDS_PER_YEAR,
        };
        // 10 * 0.1 * year * 0.4 / year = 0.4 CRV per LP-year
        assert!((apy.reward_rate() - 0.4).abs() < 1e-12);
        assert!((apy.apy() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_apy_without_working_supply() {
        let apy = ApyInputs {
            crv_price: 2.0,
            relative_weight: 0.1,
            inflation_rate: 10.0,
            virtual_price: 1.0,
            working_total: 0.0,
        };
        assert_eq!(apy.reward_rate(), 0.0);
        assert_eq!(apy.apy(), 0.0);
    }
}
