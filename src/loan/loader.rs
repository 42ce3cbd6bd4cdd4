//! Load loan tapes from CSV or JSON
//!
//! This is an adapter for the command line; the projection engine itself
//! only ever sees `Loan` values.

use super::{Loan, LoanId};
use crate::error::TapeError;
use csv::Reader;
use log::info;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Raw CSV row; every cell is read as text and coerced afterwards
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(default, alias = "loan_id", alias = "LoanID", alias = "ID")]
    id: Option<String>,
    #[serde(default, alias = "balance", alias = "current_balance", alias = "Balance")]
    opening_balance: Option<String>,
    #[serde(default, alias = "rate", alias = "interest_rate", alias = "Rate")]
    annual_rate: Option<String>,
    #[serde(default, alias = "maturity", alias = "original_term")]
    maturity_months: Option<String>,
    #[serde(default, alias = "seasoning", alias = "age")]
    months_elapsed: Option<String>,
    #[serde(default)]
    monthly_rate: Option<String>,
    #[serde(default, alias = "term", alias = "remaining_months")]
    remaining_term: Option<String>,
    #[serde(default, alias = "payment")]
    monthly_payment: Option<String>,
    #[serde(default, alias = "PD")]
    pd: Option<String>,
    #[serde(default, alias = "LGD")]
    lgd: Option<String>,
}

impl CsvRow {
    fn to_loan(self, row_number: usize) -> Loan {
        let id = match self.id.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => match text.parse::<i64>() {
                Ok(n) => LoanId::Int(n),
                Err(_) => LoanId::Text(text.to_string()),
            },
            _ => LoanId::Int(row_number as i64),
        };

        Loan {
            id,
            opening_balance: parse_cell(self.opening_balance.as_deref()).unwrap_or(0.0),
            annual_rate: parse_cell(self.annual_rate.as_deref()),
            maturity_months: parse_cell(self.maturity_months.as_deref()),
            months_elapsed: parse_cell(self.months_elapsed.as_deref()),
            monthly_rate: parse_cell(self.monthly_rate.as_deref()),
            remaining_term: parse_cell(self.remaining_term.as_deref()).map(to_term),
            monthly_payment: parse_cell(self.monthly_payment.as_deref()),
            pd: parse_cell(self.pd.as_deref()),
            lgd: parse_cell(self.lgd.as_deref()),
        }
    }
}

/// Parse a numeric cell
///
/// Blank -> None. Currency symbols, thousands separators and underscores are
/// stripped; a trailing `%` divides by 100. Anything still unparseable is 0.
fn parse_cell(cell: Option<&str>) -> Option<f64> {
    let text = cell?.trim();
    if text.is_empty() {
        return None;
    }

    let is_percent = text.ends_with('%');
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '_' | '%' | ' '))
        .collect();

    let value = match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    };

    Some(if is_percent { value / 100.0 } else { value })
}

fn to_term(value: f64) -> u32 {
    if value <= 0.0 {
        0
    } else {
        value.round().min(u32::MAX as f64) as u32
    }
}

fn check_unique(loans: &[Loan]) -> Result<(), TapeError> {
    let mut seen = HashSet::with_capacity(loans.len());
    for loan in loans {
        let key = loan.id.key();
        if !seen.insert(key.clone()) {
            return Err(TapeError::DuplicateLoanId { id: key });
        }
    }
    Ok(())
}

/// Load loans from a CSV reader (header row required)
pub fn load_loans_from_csv_reader<R: Read>(reader: R) -> Result<Vec<Loan>, TapeError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut loans = Vec::new();

    for (index, result) in csv_reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        loans.push(row.to_loan(index + 1));
    }

    check_unique(&loans)?;
    Ok(loans)
}

/// Load loans from a JSON array of loan records
pub fn load_loans_from_json_reader<R: Read>(reader: R) -> Result<Vec<Loan>, TapeError> {
    let loans: Vec<Loan> = serde_json::from_reader(reader)?;
    check_unique(&loans)?;
    Ok(loans)
}

/// Load a tape from disk, choosing the format by file extension
pub fn load_loans<P: AsRef<Path>>(path: P) -> Result<Vec<Loan>, TapeError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let loans = match extension.as_deref() {
        Some("csv") => load_loans_from_csv_reader(File::open(path)?)?,
        Some("json") => load_loans_from_json_reader(File::open(path)?)?,
        _ => {
            return Err(TapeError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    info!("Loaded {} loans from {}", loans.len(), path.display());
    Ok(loans)
}
