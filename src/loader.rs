//! Loading statements and rating schemes from disk

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use log::{debug, info};

use crate::error::Result;
use crate::rating::RatingScheme;
use crate::record::FinancialRecord;

/// Load statements from a CSV file with one row per bank-period
///
/// Column names match the [`FinancialRecord`] field names; missing columns
/// and empty cells are read as absent figures.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<FinancialRecord>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let records = load_records_from_reader(file)?;
    info!("Loaded {} statements from {}", records.len(), path.display());
    Ok(records)
}

/// Load statements from any CSV reader
pub fn load_records_from_reader<R: Read>(reader: R) -> Result<Vec<FinancialRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in rdr.deserialize() {
        let record: FinancialRecord = row?;
        records.push(record);
    }
    Ok(records)
}

/// Load a single statement from a JSON file
pub fn load_record_json<P: AsRef<Path>>(path: P) -> Result<FinancialRecord> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Load and validate a rating scheme from a JSON file
pub fn load_scheme<P: AsRef<Path>>(path: P) -> Result<RatingScheme> {
    let text = fs::read_to_string(path)?;
    let scheme: RatingScheme = serde_json::from_str(&text)?;
    scheme.validate()?;
    debug!("Using rating scheme {}", scheme.version);
    Ok(scheme)
}

fn bank_key(record: &FinancialRecord) -> String {
    record.bank_name.trim().to_lowercase()
}

/// For each record, the index of the same bank's previous fiscal year
///
/// Banks are matched on a case-insensitive name; records without a fiscal
/// year never get a prior period.
pub fn prior_period_indices(records: &[FinancialRecord]) -> Vec<Option<usize>> {
    let mut by_period: HashMap<(String, i32), usize> = HashMap::new();
    for (idx, record) in records.iter().enumerate() {
        if let Some(year) = record.fiscal_year {
            by_period.entry((bank_key(record), year)).or_insert(idx);
        }
    }

    records
        .iter()
        .map(|record| {
            let year = record.fiscal_year?;
            by_period.get(&(bank_key(record), year - 1)).copied()
        })
        .collect()
}

/// Pair each record with its prior period, if loaded
pub fn pair_with_prior_periods(records: &[FinancialRecord]) -> Vec<(&FinancialRecord, Option<&FinancialRecord>)> {
    prior_period_indices(records)
        .into_iter()
        .zip(records)
        .map(|(prev, record)| (record, prev.map(|i| &records[i])))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CamelsError;
    use std::io::Write;

    const SAMPLE_CSV: &str = "\
bank_name,country,fiscal_year,total_assets,total_equity,gross_loans,deposits,npls_mn,car_regulatory
Banque Alpha,Senegal,2022,800,130,500,700,20,
Banque Alpha,Senegal,2023,1000,150,600,750,30,14.5
Banque Beta,Mali,2023,  400 ,50,,380,,11
";

    #[test]
    fn test_load_from_reader() {
        let records = load_records_from_reader(SAMPLE_CSV.as_bytes()).expect("valid csv");

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].bank_name, "Banque Alpha");
        assert_eq!(records[0].car_regulatory, None);
        assert_eq!(records[1].car_regulatory, Some(14.5));
        assert_eq!(records[2].total_assets, Some(400.0));
        assert_eq!(records[2].gross_loans, None);
        // Columns not in the file keep their defaults
        assert_eq!(records[2].currency, "XOF");
        assert_eq!(records[2].interest_income, None);
    }

    #[test]
    fn test_bad_number_is_an_error() {
        let csv = "bank_name,total_assets\nBanque Gamma,lots\n";
        let err = load_records_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, CamelsError::Csv(_)));
    }

    #[test]
    fn test_prior_period_pairing() {
        let records = load_records_from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(prior_period_indices(&records), vec![None, Some(0), None]);

        let pairs = pair_with_prior_periods(&records);
        assert_eq!(pairs[1].1.map(|p| p.fiscal_year), Some(Some(2022)));
        assert!(pairs[2].1.is_none());
    }

    #[test]
    fn test_pairing_ignores_case_and_missing_years() {
        let records = vec![
            FinancialRecord::new("ORABANK ").with_fiscal_year(2021),
            FinancialRecord::new("Orabank").with_fiscal_year(2022),
            FinancialRecord::new("Orabank"),
        ];
        assert_eq!(prior_period_indices(&records), vec![None, Some(0), None]);
    }

    #[test]
    fn test_load_files() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("banks.csv");
        fs::write(&csv_path, SAMPLE_CSV).unwrap();
        assert_eq!(load_records(&csv_path).unwrap().len(), 3);

        let json_path = dir.path().join("bank.json");
        let mut f = File::create(&json_path).unwrap();
        write!(f, r#"{{"bank_name": "Banque Delta", "deposits": 90}}"#).unwrap();
        let record = load_record_json(&json_path).unwrap();
        assert_eq!(record.deposits, Some(90.0));

        let scheme_path = dir.path().join("scheme.json");
        fs::write(&scheme_path, r#"{"version": "camels-v1-weighted", "weighting": "weighted"}"#).unwrap();
        let scheme = load_scheme(&scheme_path).unwrap();
        assert_eq!(scheme.version, "camels-v1-weighted");

        fs::write(&scheme_path, r#"{"version": ""}"#).unwrap();
        assert!(matches!(load_scheme(&scheme_path), Err(CamelsError::InvalidScheme(_))));
    }
}
