//! Portfolio-level monthly totals

use super::cashflows::{LoanMonth, MonthAgg};

impl MonthAgg {
    /// Empty totals for a month
    pub fn new(month: u32) -> Self {
        Self {
            month,
            ..Default::default()
        }
    }

    /// Add one loan's row for this month
    pub fn add(&mut self, row: &LoanMonth) {
        self.interest_collected += row.interest;
        self.scheduled_principal += row.scheduled_principal;
        self.prepayments += row.prepayment;
        self.defaults += row.default;
        self.recoveries += row.recovery;
        self.servicing_fee += row.servicing_fee;
    }

    /// Close the month once every loan has been advanced
    ///
    /// Defaults are a loss and never count as cash.
    pub fn finish(&mut self, ending_balance: f64) {
        self.net_cash_to_bank = self.interest_collected
            + self.scheduled_principal
            + self.prepayments
            + self.recoveries
            - self.servicing_fee;
        self.ending_balance = ending_balance;
    }
}

/// Sum a month's loan rows into portfolio totals
///
/// `ending_balance` is the live sum of loan balances after the month's update.
pub fn aggregate_month(month: u32, rows: &[LoanMonth], ending_balance: f64) -> MonthAgg {
    let mut agg = MonthAgg::new(month);
    for row in rows {
        agg.add(row);
    }
    agg.finish(ending_balance);
    agg
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn row(interest: f64, principal: f64, prepay: f64, default: f64, recovery: f64, fee: f64) -> LoanMonth {
        LoanMonth {
            month: 3,
            opening_balance: 1_000.0,
            interest,
            scheduled_principal: principal,
            prepayment: prepay,
            default,
            recovery,
            servicing_fee: fee,
            ending_balance: 0.0,
        }
    }

    #[test]
    fn test_sums_and_net_cash() {
        let rows = vec![
            row(10.0, 100.0, 20.0, 5.0, 0.0, 1.0),
            row(8.0, 50.0, 0.0, 0.0, 3.0, 0.5),
            LoanMonth::zero(3),
        ];
        let agg = aggregate_month(3, &rows, 1_234.5);

        assert_eq!(agg.month, 3);
        assert_abs_diff_eq!(agg.interest_collected, 18.0);
        assert_abs_diff_eq!(agg.scheduled_principal, 150.0);
        assert_abs_diff_eq!(agg.prepayments, 20.0);
        assert_abs_diff_eq!(agg.defaults, 5.0);
        assert_abs_diff_eq!(agg.recoveries, 3.0);
        assert_abs_diff_eq!(agg.servicing_fee, 1.5);
        // Defaults excluded from cash
        assert_abs_diff_eq!(agg.net_cash_to_bank, 18.0 + 150.0 + 20.0 + 3.0 - 1.5);
        assert_eq!(agg.ending_balance, 1_234.5);
    }

    #[test]
    fn test_no_rows() {
        let agg = aggregate_month(1, &[], 0.0);
        assert_eq!(agg, MonthAgg::new(1));
    }
}
