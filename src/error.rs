//! Error type for the I/O edges of the crate
//!
//! The ratio and rating engines never fail; missing data is reported through
//! absent ratios and "Insufficient data" statuses. Errors only arise while
//! loading inputs, parsing extraction payloads, and tracking jobs.

use thiserror::Error;

use crate::jobs::JobId;

#[derive(Debug, Error)]
pub enum CamelsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Invalid rating scheme: {0}")]
    InvalidScheme(String),

    #[error("Unknown job: {0}")]
    JobNotFound(JobId),
}

pub type Result<T> = std::result::Result<T, CamelsError>;
