use approx::assert_relative_eq;
use camels_rating::jobs::{JobStatus, JobStore};
use camels_rating::extraction::JsonFileExtractor;
use camels_rating::rating::{composite_of, Pillar, PillarWeights, Weighting};
use camels_rating::ratios::{period_average, safe_divide};
use camels_rating::{analyze, compute_ratios, FinancialRecord, PillarRating, RatingScheme, RatingStatus};

fn full_statement() -> FinancialRecord {
    serde_json::from_str(
        r#"{
            "bank_name": "Banque Sahel",
            "country": "Niger",
            "fiscal_year": 2023,
            "total_assets": 2500,
            "cash_reserves_requirements": 180,
            "due_from_banks": 120,
            "investment_securities": 400,
            "gross_loans": 1500,
            "loan_loss_provisions": -90,
            "foreclosed_assets": 25,
            "deposits": 1900,
            "total_liabilities": 2200,
            "total_equity": 300,
            "interest_income": 210,
            "interest_expenses": 85,
            "net_interest_income": 125,
            "non_interest_income_commissions": 40,
            "net_income_investment": 10,
            "other_net_income": 5,
            "operating_expenses": 95,
            "provision_expenses": 20,
            "non_operating_profit_loss": 2,
            "income_tax": 12,
            "car_regulatory": 12.5,
            "npls_mn": 105
        }"#,
    )
    .expect("valid statement")
}

#[test]
fn never_fails_on_sparse_records() {
    let sparse = [
        FinancialRecord::default(),
        FinancialRecord { total_assets: Some(0.0), ..Default::default() },
        FinancialRecord { npls_mn: Some(-1.0), llr_mn: Some(0.0), ..Default::default() },
        FinancialRecord { total_equity: Some(-50.0), total_assets: Some(100.0), ..Default::default() },
    ];
    for record in &sparse {
        let ratios = compute_ratios(record, Some(record));
        assert!(ratios.roaa.is_some());
        let analysis = analyze(record.clone(), None, &RatingScheme::default());
        assert!(analysis.report.camels_rating.composite_rating.is_some());
    }
}

#[test]
fn safe_divide_contract() {
    assert_eq!(safe_divide(Some(3.0), Some(4.0)), Some(0.75));
    assert_eq!(safe_divide(Some(0.0), Some(4.0)), None);
    assert_eq!(safe_divide(Some(3.0), Some(0.0)), None);
    assert_eq!(safe_divide(None, Some(4.0)), None);
    assert_eq!(safe_divide(Some(3.0), None), None);
}

#[test]
fn averaging_rule() {
    assert_eq!(period_average(Some(0.0), Some(200.0)), 100.0);
    assert_eq!(period_average(None, Some(200.0)), 100.0);
    assert_eq!(period_average(Some(300.0), Some(200.0)), 250.0);
    assert_eq!(period_average(Some(300.0), None), 300.0);
}

#[test]
fn reference_examples() {
    let record = FinancialRecord {
        total_assets: Some(1000.0),
        total_equity: Some(150.0),
        npls_mn: Some(80.0),
        gross_loans: Some(1000.0),
        car_regulatory: Some(14.0),
        ..Default::default()
    };
    let analysis = analyze(record, None, &RatingScheme::default());

    assert_eq!(analysis.bank.ratios.equity_assets, Some(0.15));
    assert_eq!(analysis.bank.ratios.npl_ratio, Some(0.08));

    let detail = &analysis.report.detailed_ratings;
    assert_eq!(detail.asset_quality.rating, Some(3));
    assert_eq!(detail.asset_quality.status, RatingStatus::Fair);
    assert_eq!(detail.capital.rating, Some(2));
    assert_eq!(detail.capital.status, RatingStatus::Satisfactory);

    let low_capital = analyze(
        FinancialRecord { car_regulatory: Some(9.0), ..Default::default() },
        None,
        &RatingScheme::default(),
    );
    assert_eq!(low_capital.report.detailed_ratings.capital.rating, Some(4));
    assert_eq!(low_capital.report.detailed_ratings.capital.status, RatingStatus::Marginal);

    let no_capital = analyze(FinancialRecord::default(), None, &RatingScheme::default());
    assert_eq!(no_capital.report.detailed_ratings.capital.rating, None);
    assert_eq!(no_capital.report.detailed_ratings.capital.status.as_str(), "Insufficient data");
}

#[test]
fn composite_over_three_of_four() {
    let pillars = [
        (Pillar::Capital, Some(2)),
        (Pillar::AssetQuality, Some(3)),
        (Pillar::Earnings, Some(4)),
        (Pillar::Liquidity, None),
    ]
    .map(|(pillar, rating)| match rating {
        Some(r) => PillarRating {
            pillar,
            rating: Some(r),
            status: RatingStatus::from_rating(r),
            metric: "metric",
            value: Some(1.0),
            benchmark: None,
        },
        None => PillarRating::insufficient(pillar, "metric"),
    });

    let result = composite_of(&pillars, Weighting::Equal, &PillarWeights::default());
    assert_eq!(result.composite_rating, Some(3));
    assert_eq!(result.status, RatingStatus::Fair);
}

#[test]
fn coverage_defined_only_for_positive_npls() {
    let base = full_statement();
    assert!(compute_ratios(&base, None).coverage_ratio.is_some());

    for npls in [None, Some(0.0), Some(-10.0)] {
        let record = FinancialRecord { npls_mn: npls, ..base.clone() };
        assert!(compute_ratios(&record, None).coverage_ratio.is_none());
    }
}

#[test]
fn full_statement_analysis() {
    let analysis = analyze(full_statement(), None, &RatingScheme::default());
    let ratios = &analysis.bank.ratios;

    assert_relative_eq!(ratios.equity_assets.unwrap(), 0.12);
    assert_relative_eq!(ratios.liquid_assets_assets.unwrap(), 700.0 / 2500.0);
    assert_relative_eq!(ratios.gross_loans_deposits.unwrap(), 1500.0 / 1900.0);
    assert_relative_eq!(ratios.npl_ratio.unwrap(), 0.07);
    assert_relative_eq!(ratios.coverage_ratio.unwrap(), 90.0 / 105.0);
    assert_relative_eq!(ratios.oler.unwrap(), 40.0 / 300.0);

    // (125 + 55 - 95 - 20 + 2 - 12) / 2500 = 0.022
    assert_relative_eq!(ratios.roaa.unwrap(), 0.022, epsilon = 1e-12);
    assert_relative_eq!(ratios.roae.unwrap(), 0.022 * 2500.0 / 300.0, epsilon = 1e-12);

    let detail = &analysis.report.detailed_ratings;
    assert_eq!(detail.capital.rating, Some(2));
    assert_eq!(detail.asset_quality.rating, Some(3));
    assert_eq!(detail.earnings.rating, Some(1));
    assert_eq!(detail.liquidity.rating, Some(2));
    // (2 + 3 + 1 + 2) / 4 = 2
    assert_eq!(analysis.report.camels_rating.composite_rating, Some(2));

    let weighted = analyze(full_statement(), None, &RatingScheme::weighted());
    // (0.5 + 0.75 + 0.2 + 0.3) / 0.85 = 2.06
    assert_eq!(weighted.report.camels_rating.composite_rating, Some(2));
}

#[test]
fn idempotent_analysis() {
    let record = full_statement();
    let first = compute_ratios(&record, None);
    let second = compute_ratios(&record, None);
    assert_eq!(first, second);

    let a = analyze(record.clone(), None, &RatingScheme::default());
    let b = analyze(record, None, &RatingScheme::default());
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn job_from_saved_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sahel_2023.json");
    std::fs::write(
        &path,
        "```json\n{\"name\": \"Banque Sahel\", \"car_regulatory\": 16, \"gross_loans\": 500, \"deposits\": 1000}\n```",
    )
    .unwrap();

    let store = JobStore::new();
    let id = store.create(&path);
    store.run(id, &JsonFileExtractor, &RatingScheme::default()).expect("job runs");

    let job = store.get(id).unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    let analysis = job.result.unwrap();
    assert_eq!(analysis.bank.record.bank_name, "Banque Sahel");
    assert_eq!(analysis.report.detailed_ratings.capital.rating, Some(1));
    assert_eq!(analysis.report.detailed_ratings.liquidity.rating, Some(1));
}
