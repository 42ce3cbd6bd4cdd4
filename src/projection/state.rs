//! Per-loan simulation state

use super::cashflows::LoanMonth;
use crate::assumptions::LoanRisk;
use crate::loan::NormalizedLoan;

/// Balance at or below which a loan is considered paid off
pub const BALANCE_EPSILON: f64 = 1e-8;

/// Mutable state of one loan during a projection run
///
/// Owned exclusively by the engine; one value per loan, stored contiguously.
#[derive(Debug, Clone)]
pub struct LoanState {
    /// Current outstanding balance
    pub balance: f64,

    /// Monthly interest rate
    pub monthly_rate: f64,

    /// Scheduled level payment
    pub monthly_payment: f64,

    /// Months left on the schedule
    pub months_remaining: u32,

    /// Monthly default hazard and severity for this loan
    pub risk: LoanRisk,

    /// Lag between default and recovery, in months
    recovery_lag: u32,

    /// Pending recovery cash indexed by absolute projection month
    recoveries: Vec<f64>,
}

impl LoanState {
    /// Initialize state at projection start
    ///
    /// The recovery schedule only spans the horizon; cash landing later is never read.
    pub fn from_loan(loan: &NormalizedLoan, risk: LoanRisk, months: u32, recovery_lag: u32) -> Self {
        let slots = months as usize + 1;
        Self {
            balance: loan.opening_balance,
            monthly_rate: loan.monthly_rate,
            monthly_payment: loan.monthly_payment,
            months_remaining: loan.remaining_term,
            risk,
            recovery_lag,
            recoveries: vec![0.0; slots],
        }
    }

    /// Whether the loan still amortizes
    pub fn is_active(&self) -> bool {
        self.balance > BALANCE_EPSILON && self.months_remaining > 0
    }

    /// Recovery cash still waiting to land
    pub fn pending_recoveries(&self) -> f64 {
        self.recoveries.iter().sum()
    }

    /// Recoveries falling past the horizon are dropped
    fn schedule_recovery(&mut self, month: u32, amount: f64) {
        let Some(target) = month.checked_add(self.recovery_lag) else {
            return;
        };
        if let Some(slot) = self.recoveries.get_mut(target as usize) {
            *slot += amount;
        }
    }

    fn take_recovery(&mut self, month: u32) -> f64 {
        self.recoveries
            .get_mut(month as usize)
            .map(std::mem::take)
            .unwrap_or(0.0)
    }

    /// Advance one month and return the loan's cashflows for it
    ///
    /// Terminated loans stay terminated: their balance is pinned to zero and the
    /// row is empty apart from recoveries of earlier defaults.
    pub fn step(&mut self, month: u32, monthly_smm: f64, monthly_servicing_rate: f64) -> LoanMonth {
        if !self.is_active() {
            self.balance = 0.0;
            self.months_remaining = 0;
            let mut row = LoanMonth::zero(month);
            row.recovery = self.take_recovery(month);
            return row;
        }

        let opening = self.balance;
        let rate = self.monthly_rate;

        // Never pay more than clears the balance
        let payment = self.monthly_payment.min(opening * (1.0 + rate) + BALANCE_EPSILON);
        let interest = opening * rate;
        let scheduled_principal = (payment - interest).clamp(0.0, opening);
        let after_scheduled = opening - scheduled_principal;

        let default = (after_scheduled * self.risk.monthly_pd).min(after_scheduled);
        let after_default = after_scheduled - default;

        let prepayment = (after_default * monthly_smm).min(after_default);
        let ending_balance = after_default - prepayment;

        let servicing_fee = opening * monthly_servicing_rate;

        // Schedule before collecting so a zero lag recovers in the same month
        if default > 0.0 {
            self.schedule_recovery(month, default * (1.0 - self.risk.lgd));
        }
        let recovery = self.take_recovery(month);

        self.balance = ending_balance;
        self.months_remaining = self.months_remaining.saturating_sub(1);

        LoanMonth {
            month,
            opening_balance: opening,
            interest,
            scheduled_principal,
            prepayment,
            default,
            recovery,
            servicing_fee,
            ending_balance,
        }
    }
}
