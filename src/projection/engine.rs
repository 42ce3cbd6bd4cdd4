//! Core projection engine for monthly loan cashflow projections

use super::aggregate::aggregate_month;
use super::cashflows::{LoanMonth, ProjectionResult};
use super::state::LoanState;
use crate::assumptions::RiskAssumptions;
use crate::loan::{normalize_loans, Loan, NormalizedLoan};
use log::{debug, warn};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Horizon used when the caller does not pick one
pub const DEFAULT_PROJECTION_MONTHS: u32 = 60;

/// Configuration for a projection run
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Number of months to project
    pub months: u32,

    /// Portfolio-level stress assumptions
    pub assumptions: RiskAssumptions,

    /// Advance loans within a month on the rayon pool
    pub parallel: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            months: DEFAULT_PROJECTION_MONTHS,
            assumptions: RiskAssumptions::default(),
            parallel: true,
        }
    }
}

/// Main projection engine
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Normalize a raw tape and project it
    pub fn project(&self, loans: &[Loan]) -> ProjectionResult {
        self.project_normalized(&normalize_loans(loans))
    }

    /// Project an already-normalized tape
    ///
    /// Months run strictly in order; within a month every loan advances
    /// independently and the totals are reduced afterwards.
    pub fn project_normalized(&self, loans: &[NormalizedLoan]) -> ProjectionResult {
        let months = self.config.months;
        let assumptions = self.config.assumptions.sanitized();
        let lag = assumptions.recovery_lag_months;
        let smm = assumptions.monthly_smm();
        let servicing_rate = assumptions.monthly_servicing_rate();

        debug!(
            "Projecting {} loans over {} months (parallel: {})",
            loans.len(),
            months,
            self.config.parallel
        );

        let mut states: Vec<LoanState> = loans
            .iter()
            .map(|loan| LoanState::from_loan(loan, assumptions.loan_risk(loan), months, lag))
            .collect();

        for (loan, state) in loans.iter().zip(&states) {
            if !state.is_active() {
                warn!("Loan {} starts terminated (balance {}, term {})", loan.id, loan.opening_balance, loan.remaining_term);
            }
        }

        let mut series: Vec<Vec<LoanMonth>> = vec![Vec::with_capacity(months as usize); loans.len()];
        let mut monthly = Vec::with_capacity(months as usize);

        for month in 1..=months {
            let rows: Vec<LoanMonth> = if self.config.parallel {
                states
                    .par_iter_mut()
                    .map(|state| state.step(month, smm, servicing_rate))
                    .collect()
            } else {
                states
                    .iter_mut()
                    .map(|state| state.step(month, smm, servicing_rate))
                    .collect()
            };

            // Every loan has been advanced; the live balance is final for this month
            let ending_balance: f64 = states.iter().map(|s| s.balance).sum();
            monthly.push(aggregate_month(month, &rows, ending_balance));

            for (loan_rows, row) in series.iter_mut().zip(rows) {
                loan_rows.push(row);
            }
        }

        let mut by_loan = BTreeMap::new();
        for (loan, rows) in loans.iter().zip(series) {
            if by_loan.insert(loan.id.key(), rows).is_some() {
                warn!("Duplicate loan id {}; later loan replaces earlier rows", loan.id);
            }
        }

        let initial_balance = loans.iter().map(|l| l.opening_balance.max(0.0)).sum();

        debug!("Projection complete: {} months, {} loans", monthly.len(), by_loan.len());

        ProjectionResult {
            monthly,
            by_loan,
            initial_balance,
        }
    }
}

/// Project a tape with explicit portfolio parameters
///
/// Convenience wrapper over [`ProjectionEngine`] mirroring the flat parameter list
/// used by callers that do not build a config.
pub fn project_cashflows(
    loans: &[Loan],
    months: u32,
    pd_annual: f64,
    lgd: f64,
    cpr_annual: f64,
    servicing_bps_pa: f64,
    recovery_lag_months: u32,
) -> ProjectionResult {
    let config = ProjectionConfig {
        months,
        assumptions: RiskAssumptions {
            pd_annual,
            lgd,
            cpr_annual,
            servicing_bps_pa,
            recovery_lag_months,
        },
        parallel: false,
    };
    ProjectionEngine::new(config).project(loans)
}
