//! Tabular export of projection results

use crate::error::TapeError;
use crate::projection::{LoanMonth, ProjectionResult};
use csv::Writer;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Per-loan long-table row
#[derive(Debug, Serialize)]
struct LoanRow<'a> {
    loan_id: &'a str,
    month: u32,
    opening_balance: f64,
    interest: f64,
    scheduled_principal: f64,
    prepayment: f64,
    default: f64,
    recovery: f64,
    servicing_fee: f64,
    ending_balance: f64,
}

impl<'a> LoanRow<'a> {
    fn new(loan_id: &'a str, row: &LoanMonth) -> Self {
        Self {
            loan_id,
            month: row.month,
            opening_balance: row.opening_balance,
            interest: row.interest,
            scheduled_principal: row.scheduled_principal,
            prepayment: row.prepayment,
            default: row.default,
            recovery: row.recovery,
            servicing_fee: row.servicing_fee,
            ending_balance: row.ending_balance,
        }
    }
}

/// Write the monthly portfolio table as CSV
pub fn write_monthly_csv<W: Write>(result: &ProjectionResult, writer: W) -> Result<(), TapeError> {
    let mut csv_writer = Writer::from_writer(writer);
    for agg in &result.monthly {
        csv_writer.serialize(agg)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write every loan's rows as one long CSV table ordered by loan id, then month
pub fn write_loans_csv<W: Write>(result: &ProjectionResult, writer: W) -> Result<(), TapeError> {
    let mut csv_writer = Writer::from_writer(writer);
    for (loan_id, rows) in &result.by_loan {
        for row in rows {
            csv_writer.serialize(LoanRow::new(loan_id, row))?;
        }
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_monthly_csv_path<P: AsRef<Path>>(result: &ProjectionResult, path: P) -> Result<(), TapeError> {
    write_monthly_csv(result, File::create(path)?)
}

pub fn write_loans_csv_path<P: AsRef<Path>>(result: &ProjectionResult, path: P) -> Result<(), TapeError> {
    write_loans_csv(result, File::create(path)?)
}
