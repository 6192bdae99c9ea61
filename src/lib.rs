//! CAMELS supervisory ratios and ratings for bank financial statements
//!
//! A [`FinancialRecord`] holds the raw line items of one bank-period. The
//! ratio engine turns it into [`DerivedRatios`]; the rating engine rates the
//! Capital, Asset quality, Earnings and Liquidity pillars from those ratios
//! and combines them into a composite 1-5 rating.
//!
//! ```
//! use camels_rating::{analyze, FinancialRecord, RatingScheme};
//!
//! let record = FinancialRecord {
//!     car_regulatory: Some(14.0),
//!     npls_mn: Some(80.0),
//!     gross_loans: Some(1000.0),
//!     ..FinancialRecord::new("Banque Alpha")
//! };
//! let analysis = analyze(record, None, &RatingScheme::default());
//! assert_eq!(analysis.report.detailed_ratings.capital.rating, Some(2));
//! assert_eq!(analysis.report.detailed_ratings.asset_quality.rating, Some(3));
//! ```

pub mod error;
pub mod record;
pub mod ratios;
pub mod rating;
pub mod report;
pub mod extraction;
pub mod jobs;
pub mod loader;

pub use error::{CamelsError, Result};
pub use record::FinancialRecord;
pub use ratios::{compute_ratios, DerivedRatios, EnrichedRecord};
pub use rating::{CompositeRating, DetailedRatings, PillarRating, RatingScheme, RatingStatus};
pub use report::{analyze, analyze_batch, BankAnalysis, RatingReport};
