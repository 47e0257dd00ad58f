//! Fixed-point integer -> float conversions

use alloy_primitives::U256;

/// 10^decimals as a float divisor
pub fn decimal_scale(decimals: u8) -> f64 {
    10f64.powi(decimals as i32)
}

/// Lossy but full-range conversion (no u128 truncation)
pub fn to_f64(value: U256) -> f64 {
    value.to_string().parse().unwrap_or(f64::INFINITY)
}

/// Value with 18 implied decimals
pub fn from_fixed18(value: U256) -> f64 {
    to_f64(value) / 1e18
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaling() {
        let thousand = U256::from(1000u64) * U256::from(10u64).pow(U256::from(18u64));
        assert_eq!(from_fixed18(thousand), 1000.0);
        assert_eq!(to_f64(U256::from(1_000_000u64)) / decimal_scale(6), 1.0);
    }

    #[test]
    fn test_values_above_u128_do_not_panic() {
        let huge = U256::MAX;
        assert!(to_f64(huge) > 1e76);
    }
}
