//! Raw statement line items as extracted from a bank's financial statements

use serde::{Deserialize, Serialize};

use crate::ratios::math::sum_present;

pub(crate) fn default_unknown() -> String { "Unknown".to_string() }
pub(crate) fn default_currency() -> String { "XOF".to_string() }

/// One bank-period of balance sheet and income statement figures
///
/// Every line item is optional: a missing figure is a distinct state from a
/// reported zero and is carried through the ratio engine as "unknown".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialRecord {
    // Statement identity
    pub bank_name: String,
    pub country: String,
    pub fiscal_year: Option<i32>,
    /// ISO currency code of all monetary line items
    pub currency: String,
    /// Location of the source document, if any
    pub source_file: Option<String>,

    // Assets
    pub total_assets: Option<f64>,
    pub cash_reserves_requirements: Option<f64>,
    pub due_from_banks: Option<f64>,
    pub investment_securities: Option<f64>,
    pub gross_loans: Option<f64>,
    pub loan_loss_provisions: Option<f64>,
    pub foreclosed_assets: Option<f64>,
    pub investment_in_subs_affiliates: Option<f64>,
    pub other_assets: Option<f64>,
    pub fixed_assets: Option<f64>,

    // Liabilities
    pub deposits: Option<f64>,
    pub interbank_liabilities: Option<f64>,
    pub other_liabilities: Option<f64>,
    pub total_liabilities: Option<f64>,

    // Equity
    pub paid_in_capital: Option<f64>,
    pub reserves: Option<f64>,
    pub retained_earnings: Option<f64>,
    pub net_profit: Option<f64>,
    pub total_equity: Option<f64>,

    // Income statement
    pub interest_income: Option<f64>,
    pub interest_expenses: Option<f64>,
    pub net_interest_income: Option<f64>,
    pub non_interest_income_commissions: Option<f64>,
    pub net_income_investment: Option<f64>,
    pub other_net_income: Option<f64>,
    pub operating_expenses: Option<f64>,
    pub operating_profit: Option<f64>,
    pub provision_expenses: Option<f64>,
    pub non_operating_profit_loss: Option<f64>,
    pub income_tax: Option<f64>,
    pub net_income: Option<f64>,

    // Regulatory capital, in percent (14.0 = 14%)
    pub car_regulatory: Option<f64>,
    pub car_bank_reported: Option<f64>,

    // Asset quality, in millions
    pub problem_assets_mn: Option<f64>,
    pub npls_mn: Option<f64>,
    pub llr_mn: Option<f64>,

    // FX
    pub fx_rate_period_end: Option<f64>,
    pub fx_rate_period_avg: Option<f64>,

    // Ratios published by the bank itself, as fractions (0.05 = 5%).
    // Kept for reconciliation, never used by the rating engine.
    pub npl_ratio_reported: Option<f64>,
    pub coverage_ratio_reported: Option<f64>,
    pub roe_reported: Option<f64>,
    pub roa_reported: Option<f64>,
    pub cost_income_reported: Option<f64>,
}

impl Default for FinancialRecord {
    fn default() -> Self {
        Self {
            bank_name: default_unknown(),
            country: default_unknown(),
            fiscal_year: None,
            currency: default_currency(),
            source_file: None,
            total_assets: None,
            cash_reserves_requirements: None,
            due_from_banks: None,
            investment_securities: None,
            gross_loans: None,
            loan_loss_provisions: None,
            foreclosed_assets: None,
            investment_in_subs_affiliates: None,
            other_assets: None,
            fixed_assets: None,
            deposits: None,
            interbank_liabilities: None,
            other_liabilities: None,
            total_liabilities: None,
            paid_in_capital: None,
            reserves: None,
            retained_earnings: None,
            net_profit: None,
            total_equity: None,
            interest_income: None,
            interest_expenses: None,
            net_interest_income: None,
            non_interest_income_commissions: None,
            net_income_investment: None,
            other_net_income: None,
            operating_expenses: None,
            operating_profit: None,
            provision_expenses: None,
            non_operating_profit_loss: None,
            income_tax: None,
            net_income: None,
            car_regulatory: None,
            car_bank_reported: None,
            problem_assets_mn: None,
            npls_mn: None,
            llr_mn: None,
            fx_rate_period_end: None,
            fx_rate_period_avg: None,
            npl_ratio_reported: None,
            coverage_ratio_reported: None,
            roe_reported: None,
            roa_reported: None,
            cost_income_reported: None,
        }
    }
}

impl FinancialRecord {
    /// Empty record for the given bank, all line items absent
    pub fn new(bank_name: impl Into<String>) -> Self {
        Self {
            bank_name: bank_name.into(),
            ..Default::default()
        }
    }

    /// Builder-style setter for the fiscal year
    pub fn with_fiscal_year(mut self, year: i32) -> Self {
        self.fiscal_year = Some(year);
        self
    }

    /// Non-interest income: commissions + investment income + other income
    /// Absent components count as zero.
    pub fn non_interest_income(&self) -> f64 {
        sum_present(&[
            self.non_interest_income_commissions,
            self.net_income_investment,
            self.other_net_income,
        ])
    }

    /// Liquid assets: cash reserves + due from banks + investment securities
    pub fn liquid_assets(&self) -> f64 {
        sum_present(&[
            self.cash_reserves_requirements,
            self.due_from_banks,
            self.investment_securities,
        ])
    }
}
