//! Loan Projection - Deterministic cashflow engine for amortizing loan portfolios
//!
//! This library provides:
//! - Loan tape normalization (derived rate, term and level payment)
//! - Amortization and hazard-rate conversion primitives
//! - Month-by-month loan simulation with defaults, prepayments, servicing and lagged recoveries
//! - Portfolio aggregation, summary statistics and holder yield
//! - Stress scenario runs and CSV/JSON export

pub mod error;
pub mod loan;
pub mod assumptions;
pub mod projection;
pub mod scenario;
pub mod report;

// Re-export commonly used types
pub use error::TapeError;
pub use loan::{Loan, LoanId, NormalizedLoan, PortfolioProfile};
pub use assumptions::RiskAssumptions;
pub use projection::{
    project_cashflows, LoanMonth, MonthAgg, ProjectionConfig, ProjectionEngine, ProjectionResult,
};
pub use scenario::{Scenario, ScenarioRunner};
