//! Ratio engine: raw statement figures to CAMELS ratios
//!
//! The engine is a pure function of the current record and, optionally, the
//! prior-period record of the same bank. It never fails: missing figures
//! produce missing ratios.

use log::debug;
use serde::Serialize;

use super::derived::DerivedRatios;
use super::math::{period_average, safe_divide, sum_present};
use crate::record::FinancialRecord;

/// A statement together with the ratios computed from it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: FinancialRecord,
    #[serde(flatten)]
    pub ratios: DerivedRatios,
}

impl EnrichedRecord {
    /// Compute ratios for `record` and attach them
    pub fn new(record: FinancialRecord, previous: Option<&FinancialRecord>) -> Self {
        let ratios = compute_ratios(&record, previous);
        Self { record, ratios }
    }
}

/// Compute every derived ratio for `current`
///
/// `previous` supplies the prior-period balances for the asset, equity and
/// gross loan averages.
pub fn compute_ratios(current: &FinancialRecord, previous: Option<&FinancialRecord>) -> DerivedRatios {
    let bank = current;

    let avg_assets = period_average(bank.total_assets, previous.and_then(|p| p.total_assets));
    let avg_equity = period_average(bank.total_equity, previous.and_then(|p| p.total_equity));
    let avg_gross_loans = period_average(bank.gross_loans, previous.and_then(|p| p.gross_loans));

    if previous.is_none() {
        debug!("{}: no prior period, averages use current balances", bank.bank_name);
    }

    let mut out = DerivedRatios {
        avg_assets,
        avg_equity,
        avg_gross_loans,
        ..Default::default()
    };

    // Averages are plain numbers; zero means "no usable balance"
    let avg_assets = Some(avg_assets);
    let avg_equity = Some(avg_equity);
    let avg_gross_loans = Some(avg_gross_loans);

    // ========== Solvency ==========
    out.equity_assets = safe_divide(bank.total_equity, bank.total_assets);

    // ========== Liquidity ==========
    out.cash_reserves_assets = safe_divide(bank.cash_reserves_requirements, bank.total_assets);
    out.liquid_assets_assets = safe_divide(Some(bank.liquid_assets()), bank.total_assets);
    out.gross_loans_deposits = safe_divide(bank.gross_loans, bank.deposits);

    // ========== Asset quality ==========
    let npls = bank.npls_mn.unwrap_or(0.0);
    let foreclosed = bank.foreclosed_assets.unwrap_or(0.0);
    let problem_assets = npls + foreclosed;
    if bank.npls_mn.is_some() || bank.foreclosed_assets.is_some() {
        out.problem_assets = Some(problem_assets);
    }

    // Provisions are booked as a negative contra-asset, so the reserve is
    // their negation when no explicit LLR was extracted
    let provisions = bank.loan_loss_provisions.unwrap_or(0.0);
    let mut llr = bank.llr_mn.unwrap_or(0.0);
    if llr == 0.0 && provisions != 0.0 {
        llr = -provisions;
    }
    if bank.llr_mn.is_some() || bank.loan_loss_provisions.is_some() {
        out.llr = Some(llr);
    }

    let npa_denominator = sum_present(&[bank.gross_loans, bank.foreclosed_assets]);
    out.npa_ratio = safe_divide(Some(problem_assets), Some(npa_denominator));
    out.npl_ratio = safe_divide(bank.npls_mn, bank.gross_loans);
    out.llr_avg_loan = safe_divide(Some(llr), avg_gross_loans);

    // Coverage is only meaningful against a positive NPL stock
    out.coverage_ratio = if npls > 0.0 {
        safe_divide(Some(llr), Some(npls))
    } else {
        None
    };

    out.oler = safe_divide(Some(problem_assets - llr), bank.total_equity);

    // ========== Profitability ==========
    out.net_interest_margin = safe_divide(bank.net_interest_income, avg_assets);

    // Either leg of the spread counts as zero when unknown
    let yield_on_assets = safe_divide(bank.interest_income, bank.total_assets);
    let cost_of_liabilities = safe_divide(bank.interest_expenses, bank.total_liabilities);
    out.net_interest_spread = Some(yield_on_assets.unwrap_or(0.0) - cost_of_liabilities.unwrap_or(0.0));

    let non_interest_income = bank.non_interest_income();
    out.non_interest_income = non_interest_income;
    out.non_interest_income_assets = safe_divide(Some(non_interest_income), avg_assets);

    let earning_assets = sum_present(&[bank.gross_loans, bank.investment_securities]);
    out.interest_earning_assets_yield = safe_divide(bank.interest_income, Some(earning_assets));
    out.cost_of_funds = cost_of_liabilities;
    out.opex_assets = safe_divide(bank.operating_expenses, avg_assets);

    let total_income = bank.net_interest_income.unwrap_or(0.0) + non_interest_income;
    out.cost_to_income = safe_divide(bank.operating_expenses, Some(total_income));

    // ========== DuPont ==========
    out.net_interest_income_assets = safe_divide(bank.net_interest_income, avg_assets);
    out.non_interest_income_assets_dupont = safe_divide(Some(non_interest_income), avg_assets);
    out.opex_assets_dupont = safe_divide(bank.operating_expenses, avg_assets);
    out.provision_expenses_assets = safe_divide(bank.provision_expenses, avg_assets);
    out.non_op_assets = safe_divide(bank.non_operating_profit_loss, avg_assets);
    out.tax_expenses_assets = safe_divide(bank.income_tax, avg_assets);
    out.assets_equity = safe_divide(avg_assets, avg_equity);

    // ROAA = a + b - c - d + e - f
    let roaa = sum_present(&[
        out.net_interest_income_assets,
        out.non_interest_income_assets_dupont,
        out.opex_assets_dupont.map(|v| -v),
        out.provision_expenses_assets.map(|v| -v),
        out.non_op_assets,
        out.tax_expenses_assets.map(|v| -v),
    ]);
    out.roaa = Some(roaa);
    out.roae = Some(roaa * out.assets_equity.unwrap_or(0.0));

    debug!(
        "{}: roaa={:.6} roae={:.6} npl_ratio={:?} loans/deposits={:?}",
        bank.bank_name, roaa, roaa * out.assets_equity.unwrap_or(0.0), out.npl_ratio, out.gross_loans_deposits
    );

    out
}
