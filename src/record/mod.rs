//! Typed financial statement records

mod data;

pub use data::FinancialRecord;
pub(crate) use data::{default_currency, default_unknown};
