//! Ratio engine for solvency, liquidity, asset quality and profitability

pub mod math;
mod derived;
mod engine;

pub use derived::DerivedRatios;
pub use engine::{compute_ratios, EnrichedRecord};
pub use math::{period_average, safe_divide};
