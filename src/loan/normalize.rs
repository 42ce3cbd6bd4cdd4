//! Fill in derived loan fields so the engine can assume complete records
//!
//! Rules:
//! - monthly rate: supplied value, else annual rate / 12. The annual rate is read
//!   as a percentage when it is greater than 1 (12 -> 0.12), as a fraction otherwise.
//! - remaining term: supplied value, else round(maturity - elapsed) with maturity
//!   defaulting to 60 and elapsed to 0, floored at 1 month.
//! - monthly payment: supplied value, else the level payment for rate/term/balance.
//!
//! Non-finite numbers resolve to 0 throughout.

use super::data::{Loan, NormalizedLoan};
use crate::projection::amortization::pmt;

/// Maturity assumed when the tape does not carry one
pub const DEFAULT_MATURITY_MONTHS: f64 = 60.0;

/// Replace NaN and infinities with 0
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Interpret an annual rate that may be a percentage or a fraction
///
/// Values above 1 are percentages and are divided by 100. Missing or
/// non-finite values resolve to 0.
pub fn parse_annual_rate(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => {
            if v > 1.0 {
                v / 100.0
            } else {
                v
            }
        }
        _ => 0.0,
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn derive_remaining_term(loan: &Loan) -> u32 {
    let maturity = finite(loan.maturity_months).unwrap_or(DEFAULT_MATURITY_MONTHS);
    let elapsed = finite(loan.months_elapsed).unwrap_or(0.0);
    let term = (maturity - elapsed).round();
    if term < 1.0 {
        1
    } else {
        term.min(u32::MAX as f64) as u32
    }
}

/// Normalize a single loan without touching the input record
pub fn normalize_loan(loan: &Loan) -> NormalizedLoan {
    let opening_balance = finite_or_zero(loan.opening_balance);

    let monthly_rate = match loan.monthly_rate {
        Some(rate) => finite_or_zero(rate),
        None => parse_annual_rate(loan.annual_rate) / 12.0,
    };

    let remaining_term = loan
        .remaining_term
        .unwrap_or_else(|| derive_remaining_term(loan));

    let monthly_payment = match loan.monthly_payment {
        Some(payment) => finite_or_zero(payment),
        None => finite_or_zero(pmt(monthly_rate, remaining_term, opening_balance)),
    };

    NormalizedLoan {
        id: loan.id.clone(),
        opening_balance,
        monthly_rate,
        remaining_term,
        monthly_payment,
        pd: loan.pd.map(finite_or_zero),
        lgd: loan.lgd.map(finite_or_zero),
    }
}

/// Normalize a whole tape; an empty tape yields an empty vector
pub fn normalize_loans(loans: &[Loan]) -> Vec<NormalizedLoan> {
    loans.iter().map(normalize_loan).collect()
}
