//! Cashflow output structures for projections

use super::pricing::{holder_yield, present_value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One loan's cashflows for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanMonth {
    pub month: u32,
    pub opening_balance: f64,
    pub interest: f64,
    pub scheduled_principal: f64,
    pub prepayment: f64,
    pub default: f64,
    pub recovery: f64,
    pub servicing_fee: f64,
    pub ending_balance: f64,
}

impl LoanMonth {
    /// Empty row for a loan that no longer amortizes
    pub fn zero(month: u32) -> Self {
        Self {
            month,
            opening_balance: 0.0,
            interest: 0.0,
            scheduled_principal: 0.0,
            prepayment: 0.0,
            default: 0.0,
            recovery: 0.0,
            servicing_fee: 0.0,
            ending_balance: 0.0,
        }
    }

    /// Cash reaching the holder from this loan in this month
    pub fn net_cash(&self) -> f64 {
        self.interest + self.scheduled_principal + self.prepayment + self.recovery - self.servicing_fee
    }
}

/// Portfolio totals for one month
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthAgg {
    pub month: u32,
    pub interest_collected: f64,
    pub scheduled_principal: f64,
    pub prepayments: f64,
    pub defaults: f64,
    pub recoveries: f64,
    pub servicing_fee: f64,

    /// Interest + principal + prepayments + recoveries - servicing
    pub net_cash_to_bank: f64,

    /// Sum of every loan's balance after the month's update
    pub ending_balance: f64,
}

/// Complete projection result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Portfolio totals, months 1..N in order
    pub monthly: Vec<MonthAgg>,

    /// Per-loan rows keyed by string-normalized loan id
    pub by_loan: BTreeMap<String, Vec<LoanMonth>>,

    /// Sum of opening balances of the projected loans
    pub initial_balance: f64,
}

impl ProjectionResult {
    /// Rows for a single loan
    pub fn loan(&self, id: &str) -> Option<&[LoanMonth]> {
        self.by_loan.get(id).map(Vec::as_slice)
    }

    /// Monthly net cash series
    pub fn net_cashflows(&self) -> Vec<f64> {
        self.monthly.iter().map(|m| m.net_cash_to_bank).collect()
    }

    /// Annualized yield to a holder who buys the pool at par
    ///
    /// Solved on the monthly rate that discounts net cash back to the initial balance.
    pub fn holder_yield(&self) -> Option<f64> {
        holder_yield(self.initial_balance, &self.net_cashflows(), 12)
    }

    /// Present value of the net cash stream at a monthly-compounded annual rate
    pub fn present_value(&self, annual_rate: f64) -> f64 {
        present_value(&self.net_cashflows(), annual_rate / 12.0)
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let total_interest: f64 = self.monthly.iter().map(|m| m.interest_collected).sum();
        let total_scheduled_principal: f64 = self.monthly.iter().map(|m| m.scheduled_principal).sum();
        let total_prepayments: f64 = self.monthly.iter().map(|m| m.prepayments).sum();
        let total_defaults: f64 = self.monthly.iter().map(|m| m.defaults).sum();
        let total_recoveries: f64 = self.monthly.iter().map(|m| m.recoveries).sum();
        let total_servicing: f64 = self.monthly.iter().map(|m| m.servicing_fee).sum();
        let total_net_cash: f64 = self.monthly.iter().map(|m| m.net_cash_to_bank).sum();

        let final_balance = self
            .monthly
            .last()
            .map(|m| m.ending_balance)
            .unwrap_or(self.initial_balance);

        let pool_factor = if self.initial_balance > 0.0 {
            final_balance / self.initial_balance
        } else {
            0.0
        };

        ProjectionSummary {
            total_months: self.monthly.len() as u32,
            loan_count: self.by_loan.len(),
            initial_balance: self.initial_balance,
            total_interest,
            total_scheduled_principal,
            total_prepayments,
            total_defaults,
            total_recoveries,
            total_servicing,
            total_net_cash,
            net_credit_loss: total_defaults - total_recoveries,
            final_balance,
            pool_factor,
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_months: u32,
    pub loan_count: usize,
    pub initial_balance: f64,
    pub total_interest: f64,
    pub total_scheduled_principal: f64,
    pub total_prepayments: f64,
    pub total_defaults: f64,
    pub total_recoveries: f64,
    pub total_servicing: f64,
    pub total_net_cash: f64,
    pub net_credit_loss: f64,
    pub final_balance: f64,
    pub pool_factor: f64,
}
