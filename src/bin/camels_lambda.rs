//! AWS Lambda entry point
//!
//! Accepts `{"current": {...}, "previous": {...}?, "scheme": {...}?}` and
//! returns the full analysis.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::info;
use serde::Deserialize;

use camels_rating::{analyze, BankAnalysis, FinancialRecord, RatingScheme};

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    current: FinancialRecord,
    #[serde(default)]
    previous: Option<FinancialRecord>,
    #[serde(default)]
    scheme: Option<RatingScheme>,
}

async fn handler(event: LambdaEvent<AnalyzeRequest>) -> Result<BankAnalysis, Error> {
    let (request, context) = event.into_parts();
    info!("request {}: analyzing {}", context.request_id, request.current.bank_name);

    let scheme = request.scheme.unwrap_or_default();
    scheme.validate()?;

    Ok(analyze(request.current, request.previous.as_ref(), &scheme))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
