//! Projection engine for loan-level and portfolio-level cashflows

pub mod amortization;
mod state;
mod engine;
mod cashflows;
mod aggregate;
mod pricing;

pub use state::{LoanState, BALANCE_EPSILON};
pub use engine::{ProjectionEngine, ProjectionConfig, project_cashflows, DEFAULT_PROJECTION_MONTHS};
pub use cashflows::{LoanMonth, MonthAgg, ProjectionResult, ProjectionSummary};
pub use aggregate::aggregate_month;
pub use pricing::{holder_yield, present_value};
