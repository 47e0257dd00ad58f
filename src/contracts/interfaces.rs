//! Solidity interfaces for every contract the engine reads
//!
//! All calls are view-only. Mainnet addresses of the fixed infrastructure
//! contracts live here too.

use alloy_primitives::{address, Address};
use alloy_sol_types::sol;

// ============================================
// FIXED INFRASTRUCTURE (Ethereum Mainnet)
// ============================================

/// v1 vault registry (registry.ychad.eth)
pub const YEARN_V1_REGISTRY: Address = address!("3eE41C098f9666ed2eA246f4D2558010e59d63A0");

/// Uniswap V2 Router02 - price discovery via getAmountsOut
pub const UNISWAP_V2_ROUTER: Address = address!("7a250d5630B4cF539739dF2C5dAcb4c659F2488D");

pub const WETH: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
pub const USDC: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

/// CRV reward token
pub const CRV: Address = address!("D533a949740bb3306d119CC777fa900bA034cd52");

/// veCRV voting escrow
pub const CURVE_VOTING_ESCROW: Address = address!("5f3b5DfEb7B28CDbD7FAba78963EE202a494e2A2");

/// Curve gauge controller (relative gauge weights)
pub const CURVE_GAUGE_CONTROLLER: Address = address!("2F50D538606Fa9EDD2B11E2446BEb18C9D5846bB");

// ============================================
// SOLIDITY INTERFACES
// ============================================

sol! {
    /// v1 vault. Older deployments lack available/min/max, delegated
    /// vaults add underlying.
    #[derive(Debug)]
    interface IYVault {
        function balance() external view returns (uint256);
        function getPricePerFullShare() external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function decimals() external view returns (uint8);
        function available() external view returns (uint256);
        function min() external view returns (uint256);
        function max() external view returns (uint256);
        function underlying() external view returns (address);
    }

    /// Union of the v1 strategy surfaces
    #[derive(Debug)]
    interface IVaultStrategy {
        function balanceOf() external view returns (uint256);
        function proxy() external view returns (address);
        function voter() external view returns (address);
        function curve() external view returns (address);
        function gauge() external view returns (address);
        function earned() external view returns (uint256);
        function gov() external view returns (address);
    }

    #[derive(Debug)]
    interface IERC20 {
        function decimals() external view returns (uint8);
    }

    /// Curve liquidity gauge
    #[derive(Debug)]
    interface ICurveGauge {
        function balanceOf(address account) external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function working_balances(address account) external view returns (uint256);
        function working_supply() external view returns (uint256);
        function inflation_rate() external view returns (uint256);
        /// Not marked view on-chain, but safe through eth_call
        function claimable_tokens(address account) external returns (uint256);
    }

    #[derive(Debug)]
    interface IVotingEscrow {
        function balanceOf(address account) external view returns (uint256);
        function totalSupply() external view returns (uint256);
    }

    #[derive(Debug)]
    interface IGaugeController {
        function gauge_relative_weight(address gauge) external view returns (uint256);
    }

    #[derive(Debug)]
    interface ICurveSwap {
        function get_virtual_price() external view returns (uint256);
    }

    /// YFI governance staking (ygov)
    #[derive(Debug)]
    interface IYearnGovernance {
        function earned(address account) external view returns (uint256);
        function rewardRate() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function totalSupply() external view returns (uint256);
    }

    #[derive(Debug)]
    interface IYRegistry {
        function getVaults() external view returns (address[] memory);
        function getVaultInfo(address vault) external view returns (
            address controller,
            address token,
            address strategy,
            bool isWrapped,
            bool isDelegated
        );
    }

    #[derive(Debug)]
    interface IUniswapV2Router {
        function getAmountsOut(uint256 amountIn, address[] memory path)
            external view returns (uint256[] memory amounts);
    }
}
