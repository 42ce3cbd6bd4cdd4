//! Loan records, tape normalization and tape loading

mod data;
mod normalize;
mod profile;
pub mod loader;

pub use data::{Loan, LoanId, NormalizedLoan};
pub use normalize::{normalize_loan, normalize_loans, parse_annual_rate, finite_or_zero};
pub use profile::PortfolioProfile;
pub use loader::{load_loans, load_loans_from_csv_reader, load_loans_from_json_reader};
