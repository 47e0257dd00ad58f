//! Token pricing and Curve yield math

mod curve;
mod oracle;
mod quoter;

pub use curve::CurveCalculator;
pub use oracle::{PriceOracle, PriceSource};
pub use quoter::{PriceQuoter, UniswapRouterQuoter};
