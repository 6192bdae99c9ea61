//! CAMELS pillar and composite ratings

pub mod scheme;
mod pillar;
mod composite;

pub use scheme::{
    Boundary, Direction, MetricUnit, Pillar, PillarWeights, RatingScheme, ThresholdTable, Weighting,
    CANONICAL_SCHEME_VERSION,
};
pub use pillar::{
    rate_asset_quality, rate_capital, rate_earnings, rate_liquidity, rate_metric, DetailedRatings,
    PillarRating, RatingStatus,
};
pub use composite::{composite, composite_of, CompositeRating};
