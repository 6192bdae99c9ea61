//! Statement extraction seam
//!
//! Turning a scanned or digital statement into figures is delegated to an
//! external model. This module defines the boundary: the [`StatementExtractor`]
//! trait, the payload shape the model is asked to return, and the parsing of
//! its free-text reply.

use std::fs;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::error::{CamelsError, Result};
use crate::record::{default_currency, default_unknown, FinancialRecord};

/// Produces structured figures from a statement document
pub trait StatementExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<ExtractedStatement>;
}

/// Payload returned by the extraction model
///
/// Reported ratios (`npl_ratio_reported`, `roe_reported`, ...) arrive as
/// percentages and are converted to fractions by [`into_record`](Self::into_record).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExtractedStatement {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub fiscal_year: Option<i32>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(flatten)]
    pub figures: FinancialRecord,
}

impl ExtractedStatement {
    /// Normalise the payload into a record ready for the ratio engine
    pub fn into_record(self, source_file: Option<String>) -> FinancialRecord {
        let mut record = self.figures;

        record.bank_name = self.name.filter(|s| !s.trim().is_empty()).unwrap_or_else(default_unknown);
        record.country = self.country.filter(|s| !s.trim().is_empty()).unwrap_or_else(default_unknown);
        record.currency = self.currency.filter(|s| !s.trim().is_empty()).unwrap_or_else(default_currency);
        record.fiscal_year = self.fiscal_year;
        record.source_file = source_file;

        record.npl_ratio_reported = percent_to_fraction(record.npl_ratio_reported);
        record.coverage_ratio_reported = percent_to_fraction(record.coverage_ratio_reported);
        record.roe_reported = percent_to_fraction(record.roe_reported);
        record.roa_reported = percent_to_fraction(record.roa_reported);
        record.cost_income_reported = percent_to_fraction(record.cost_income_reported);

        record
    }
}

// A reported zero is treated as not reported
fn percent_to_fraction(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0).map(|v| v / 100.0)
}

/// Pull the JSON object out of a model reply and parse it
///
/// Prefers a ```` ```json ```` fenced block, then any fenced block, then the
/// whole reply.
pub fn parse_extraction_response(text: &str) -> Result<ExtractedStatement> {
    let json = extract_json_block(text);
    if json.is_empty() {
        return Err(CamelsError::Extraction("empty extraction response".into()));
    }
    debug!("parsing {} bytes of extraction JSON", json.len());
    Ok(serde_json::from_str(json)?)
}

fn extract_json_block(text: &str) -> &str {
    if let Some(body) = fenced(text, "```json") {
        return body;
    }
    if let Some(body) = fenced(text, "```") {
        return body;
    }
    text.trim()
}

fn fenced<'a>(text: &'a str, opener: &str) -> Option<&'a str> {
    let start = text.find(opener)? + opener.len();
    let rest = &text[start..];
    let end = rest.find("```").unwrap_or(rest.len());
    Some(rest[..end].trim())
}

/// Reads a pre-extracted payload (or saved model reply) from disk
#[derive(Debug, Clone, Default)]
pub struct JsonFileExtractor;

impl StatementExtractor for JsonFileExtractor {
    fn extract(&self, path: &Path) -> Result<ExtractedStatement> {
        let text = fs::read_to_string(path)?;
        parse_extraction_response(&text).map_err(|e| match e {
            CamelsError::Json(err) => CamelsError::Extraction(format!("{}: {}", path.display(), err)),
            other => other,
        })
    }
}
