//! Loan data structures matching the loan tape format

use serde::{Deserialize, Serialize};
use std::fmt;

/// Loan identifier as it appears on the tape
///
/// Tapes carry either numeric or textual ids. Both collapse to the same
/// string key in projection output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoanId {
    Int(i64),
    Text(String),
}

impl LoanId {
    /// String-normalized key used in per-loan output
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoanId::Int(id) => write!(f, "{}", id),
            LoanId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for LoanId {
    fn from(id: i64) -> Self {
        LoanId::Int(id)
    }
}

impl From<i32> for LoanId {
    fn from(id: i32) -> Self {
        LoanId::Int(id as i64)
    }
}

impl From<u32> for LoanId {
    fn from(id: u32) -> Self {
        LoanId::Int(id as i64)
    }
}

impl From<&str> for LoanId {
    fn from(id: &str) -> Self {
        LoanId::Text(id.to_string())
    }
}

impl From<String> for LoanId {
    fn from(id: String) -> Self {
        LoanId::Text(id)
    }
}

/// A raw loan record from the tape
///
/// Any of the derived fields may be missing; see [`crate::loan::normalize_loan`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    /// Unique loan identifier
    pub id: LoanId,

    /// Outstanding principal at projection start
    pub opening_balance: f64,

    /// Annual interest rate, either a fraction (0.12) or a percentage (12)
    #[serde(default)]
    pub annual_rate: Option<f64>,

    /// Original maturity in months
    #[serde(default)]
    pub maturity_months: Option<f64>,

    /// Months elapsed since origination
    #[serde(default)]
    pub months_elapsed: Option<f64>,

    /// Monthly interest rate as a fraction
    #[serde(default)]
    pub monthly_rate: Option<f64>,

    /// Remaining term in months
    #[serde(default)]
    pub remaining_term: Option<u32>,

    /// Level monthly payment
    #[serde(default)]
    pub monthly_payment: Option<f64>,

    /// Loan-level annual probability of default (overrides portfolio PD)
    #[serde(default)]
    pub pd: Option<f64>,

    /// Loan-level loss given default (overrides portfolio LGD)
    #[serde(default)]
    pub lgd: Option<f64>,
}

impl Loan {
    /// Create a loan with only an id and balance; everything else is derived
    pub fn new(id: impl Into<LoanId>, opening_balance: f64) -> Self {
        Self {
            id: id.into(),
            opening_balance,
            annual_rate: None,
            maturity_months: None,
            months_elapsed: None,
            monthly_rate: None,
            remaining_term: None,
            monthly_payment: None,
            pd: None,
            lgd: None,
        }
    }

    pub fn with_annual_rate(mut self, rate: f64) -> Self {
        self.annual_rate = Some(rate);
        self
    }

    pub fn with_monthly_rate(mut self, rate: f64) -> Self {
        self.monthly_rate = Some(rate);
        self
    }

    pub fn with_remaining_term(mut self, months: u32) -> Self {
        self.remaining_term = Some(months);
        self
    }

    pub fn with_maturity(mut self, maturity_months: f64, months_elapsed: f64) -> Self {
        self.maturity_months = Some(maturity_months);
        self.months_elapsed = Some(months_elapsed);
        self
    }

    pub fn with_monthly_payment(mut self, payment: f64) -> Self {
        self.monthly_payment = Some(payment);
        self
    }

    /// Attach loan-level PD/LGD overrides
    pub fn with_risk(mut self, pd: f64, lgd: f64) -> Self {
        self.pd = Some(pd);
        self.lgd = Some(lgd);
        self
    }
}

/// A loan with every derived field filled in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLoan {
    pub id: LoanId,
    pub opening_balance: f64,
    pub monthly_rate: f64,
    pub remaining_term: u32,
    pub monthly_payment: f64,
    pub pd: Option<f64>,
    pub lgd: Option<f64>,
}

impl NormalizedLoan {
    /// Annualized nominal rate implied by the monthly rate
    pub fn annual_rate(&self) -> f64 {
        self.monthly_rate * 12.0
    }
}
