//! Balance-weighted tape statistics

use super::NormalizedLoan;
use serde::Serialize;

/// Summary of a normalized tape
#[derive(Debug, Clone, Default, Serialize)]
pub struct PortfolioProfile {
    pub loan_count: usize,
    pub total_balance: f64,

    /// Balance-weighted annual coupon
    pub weighted_avg_rate: f64,

    /// Balance-weighted remaining term in months
    pub weighted_avg_term: f64,

    /// Balance-weighted PD over loans carrying their own PD
    pub weighted_pd: Option<f64>,

    /// Balance-weighted LGD over loans carrying their own LGD
    pub weighted_lgd: Option<f64>,
}

impl PortfolioProfile {
    pub fn from_loans(loans: &[NormalizedLoan]) -> Self {
        let mut profile = Self {
            loan_count: loans.len(),
            ..Default::default()
        };

        let mut rate_sum = 0.0;
        let mut term_sum = 0.0;
        let (mut pd_sum, mut pd_weight) = (0.0, 0.0);
        let (mut lgd_sum, mut lgd_weight) = (0.0, 0.0);

        for loan in loans {
            let balance = loan.opening_balance.max(0.0);
            profile.total_balance += balance;
            rate_sum += balance * loan.annual_rate();
            term_sum += balance * loan.remaining_term as f64;

            if let Some(pd) = loan.pd {
                pd_sum += balance * pd;
                pd_weight += balance;
            }
            if let Some(lgd) = loan.lgd {
                lgd_sum += balance * lgd;
                lgd_weight += balance;
            }
        }

        if profile.total_balance > 0.0 {
            profile.weighted_avg_rate = rate_sum / profile.total_balance;
            profile.weighted_avg_term = term_sum / profile.total_balance;
        }
        profile.weighted_pd = (pd_weight > 0.0).then(|| pd_sum / pd_weight);
        profile.weighted_lgd = (lgd_weight > 0.0).then(|| lgd_sum / lgd_weight);

        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::{normalize_loans, Loan};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_weighted_averages() {
        let loans = normalize_loans(&[
            Loan::new(1, 30_000.0).with_annual_rate(0.06).with_remaining_term(12).with_risk(0.02, 0.5),
            Loan::new(2, 10_000.0).with_annual_rate(0.10).with_remaining_term(36),
        ]);
        let profile = PortfolioProfile::from_loans(&loans);

        assert_eq!(profile.loan_count, 2);
        assert_abs_diff_eq!(profile.total_balance, 40_000.0);
        assert_abs_diff_eq!(profile.weighted_avg_rate, 0.07, epsilon = 1e-12);
        assert_abs_diff_eq!(profile.weighted_avg_term, 18.0, epsilon = 1e-12);
        assert_abs_diff_eq!(profile.weighted_pd.unwrap(), 0.02, epsilon = 1e-12);
        assert_abs_diff_eq!(profile.weighted_lgd.unwrap(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_tape_profile() {
        let profile = PortfolioProfile::from_loans(&[]);
        assert_eq!(profile.loan_count, 0);
        assert_eq!(profile.weighted_avg_rate, 0.0);
        assert!(profile.weighted_pd.is_none());
    }
}
