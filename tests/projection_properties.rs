//! End-to-end checks of projection invariants on realistic tapes

use approx::assert_abs_diff_eq;
use loan_projection::{
    loan::normalize_loans, project_cashflows, Loan, ProjectionConfig, ProjectionEngine,
    RiskAssumptions,
};

fn mixed_tape() -> Vec<Loan> {
    vec![
        Loan::new(1, 250_000.0).with_annual_rate(6.5).with_maturity(360.0, 24.0),
        Loan::new(2, 18_000.0).with_annual_rate(0.099).with_remaining_term(36),
        Loan::new("C-3", 42_500.0).with_monthly_rate(0.0075).with_remaining_term(6).with_risk(0.08, 0.6),
        Loan::new(4, 9_999.0).with_remaining_term(18),
        Loan::new(5, 0.0).with_annual_rate(7.0).with_remaining_term(12),
    ]
}

#[test]
fn zero_rate_payment_is_balance_over_term() {
    let loans = normalize_loans(&[
        Loan::new(1, 12_000.0).with_remaining_term(24),
        Loan::new(2, 7_777.0).with_monthly_rate(0.0).with_remaining_term(7),
    ]);
    for loan in &loans {
        assert_abs_diff_eq!(
            loan.monthly_payment,
            loan.opening_balance / loan.remaining_term as f64,
            epsilon = 1e-9
        );
    }
}

#[test]
fn no_stress_means_pure_amortization() {
    let result = project_cashflows(&mixed_tape(), 48, 0.0, 0.725, 0.0, 100.0, 12);

    for rows in result.by_loan.values() {
        for row in rows {
            assert_eq!(row.default, 0.0);
            assert_eq!(row.prepayment, 0.0);
            assert_abs_diff_eq!(
                row.ending_balance,
                row.opening_balance - row.scheduled_principal,
                epsilon = 1e-9
            );
        }
    }
}

#[test]
fn every_loan_has_full_horizon() {
    let months = 40;
    let result = project_cashflows(&mixed_tape(), months, 0.025, 0.725, 0.22, 100.0, 12);

    assert_eq!(result.monthly.len(), months as usize);
    assert_eq!(result.by_loan.len(), 5);
    for rows in result.by_loan.values() {
        assert_eq!(rows.len(), months as usize);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.month, i as u32 + 1);
        }
    }
    for (i, agg) in result.monthly.iter().enumerate() {
        assert_eq!(agg.month, i as u32 + 1);
    }
    assert!(result.loan("C-3").is_some());
}

#[test]
fn amounts_are_never_negative() {
    let result = project_cashflows(&mixed_tape(), 120, 0.10, 0.5, 0.30, 150.0, 3);

    for rows in result.by_loan.values() {
        for row in rows {
            assert!(row.scheduled_principal >= 0.0);
            assert!(row.default >= 0.0);
            assert!(row.prepayment >= 0.0);
            assert!(row.recovery >= 0.0);
            assert!(row.servicing_fee >= 0.0);
            assert!(row.ending_balance >= 0.0);
        }
    }
}

#[test]
fn recoveries_conserve_defaults() {
    let lgd = 0.6;
    let lag = 5;
    // Six month loan, horizon well past its last default plus the lag
    let loans = vec![Loan::new(1, 50_000.0).with_monthly_rate(0.01).with_remaining_term(6)];

    let short = project_cashflows(&loans, 8, 0.2, lgd, 0.1, 0.0, lag);
    let rows = short.loan("1").unwrap();
    let defaults: f64 = rows.iter().map(|r| r.default).sum();
    let recoveries: f64 = rows.iter().map(|r| r.recovery).sum();
    assert!(recoveries <= defaults * (1.0 - lgd) + 1e-9);
    assert!(recoveries < defaults * (1.0 - lgd));

    let full = project_cashflows(&loans, 6 + lag, 0.2, lgd, 0.1, 0.0, lag);
    let rows = full.loan("1").unwrap();
    let defaults: f64 = rows.iter().map(|r| r.default).sum();
    let recoveries: f64 = rows.iter().map(|r| r.recovery).sum();
    assert_abs_diff_eq!(recoveries, defaults * (1.0 - lgd), epsilon = 1e-6);
}

#[test]
fn terminated_loans_stay_terminated() {
    let loans = vec![Loan::new(1, 10_000.0).with_monthly_rate(0.01).with_remaining_term(6)];
    let result = project_cashflows(&loans, 24, 0.0, 0.0, 0.0, 100.0, 0);
    let rows = result.loan("1").unwrap();

    let terminated_at = rows
        .iter()
        .position(|r| r.ending_balance <= 1e-8)
        .expect("loan should pay off");
    assert_eq!(terminated_at, 5);

    for row in &rows[terminated_at + 1..] {
        assert_eq!(row.opening_balance, 0.0);
        assert_eq!(row.interest, 0.0);
        assert_eq!(row.scheduled_principal, 0.0);
        assert_eq!(row.servicing_fee, 0.0);
        assert_eq!(row.recovery, 0.0);
        assert_eq!(row.ending_balance, 0.0);
    }
}

#[test]
fn terminated_loans_still_collect_pending_recoveries() {
    let lgd = 0.6;
    let lag = 4;
    let loans = vec![Loan::new(1, 10_000.0).with_monthly_rate(0.01).with_remaining_term(6)];
    let result = project_cashflows(&loans, 6 + lag + 4, 0.2, lgd, 0.0, 100.0, lag);
    let rows = result.loan("1").unwrap();

    // Paid down early or at the end of its six month term
    let terminated_at = rows
        .iter()
        .position(|r| r.ending_balance <= 1e-8)
        .unwrap_or(5)
        .min(5);
    assert!(terminated_at >= 1);

    let after = &rows[terminated_at + 1..];
    for row in after {
        assert_eq!(row.opening_balance, 0.0);
        assert_eq!(row.interest, 0.0);
        assert_eq!(row.scheduled_principal, 0.0);
        assert_eq!(row.prepayment, 0.0);
        assert_eq!(row.default, 0.0);
        assert_eq!(row.servicing_fee, 0.0);
        assert_eq!(row.ending_balance, 0.0);
        assert!(row.recovery >= 0.0);
    }
    assert!(after.iter().map(|r| r.recovery).sum::<f64>() > 0.0);

    let defaults: f64 = rows.iter().map(|r| r.default).sum();
    let recoveries: f64 = rows.iter().map(|r| r.recovery).sum();
    assert_abs_diff_eq!(recoveries, defaults * (1.0 - lgd), epsilon = 1e-6);
}

#[test]
fn huge_recovery_lag_projects_without_recoveries() {
    let loans = vec![Loan::new(1, 1_000.0).with_monthly_rate(0.01).with_remaining_term(12)];
    let result = project_cashflows(&loans, 12, 0.1, 0.5, 0.0, 0.0, u32::MAX);

    assert_eq!(result.monthly.len(), 12);
    assert!(result.monthly.iter().map(|m| m.defaults).sum::<f64>() > 0.0);
    assert!(result.monthly.iter().all(|m| m.recoveries == 0.0));
}

#[test]
fn aggregates_equal_loan_sums() {
    let result = ProjectionEngine::new(ProjectionConfig {
        months: 72,
        assumptions: RiskAssumptions {
            recovery_lag_months: 4,
            ..Default::default()
        },
        parallel: true,
    })
    .project(&mixed_tape());

    for (t, agg) in result.monthly.iter().enumerate() {
        let sum = |f: fn(&loan_projection::LoanMonth) -> f64| -> f64 {
            result.by_loan.values().map(|rows| f(&rows[t])).sum()
        };
        assert_abs_diff_eq!(agg.interest_collected, sum(|r| r.interest), epsilon = 1e-6);
        assert_abs_diff_eq!(agg.scheduled_principal, sum(|r| r.scheduled_principal), epsilon = 1e-6);
        assert_abs_diff_eq!(agg.prepayments, sum(|r| r.prepayment), epsilon = 1e-6);
        assert_abs_diff_eq!(agg.defaults, sum(|r| r.default), epsilon = 1e-6);
        assert_abs_diff_eq!(agg.recoveries, sum(|r| r.recovery), epsilon = 1e-6);
        assert_abs_diff_eq!(agg.servicing_fee, sum(|r| r.servicing_fee), epsilon = 1e-6);
        assert_abs_diff_eq!(agg.ending_balance, sum(|r| r.ending_balance), epsilon = 1e-6);
        assert_abs_diff_eq!(
            agg.net_cash_to_bank,
            agg.interest_collected + agg.scheduled_principal + agg.prepayments + agg.recoveries
                - agg.servicing_fee,
            epsilon = 1e-6
        );
    }
}

#[test]
fn single_loan_level_payment_scenario() {
    let loans = vec![Loan::new(1, 120_000.0).with_monthly_rate(0.01).with_remaining_term(12)];
    let normalized = normalize_loans(&loans);
    assert_abs_diff_eq!(normalized[0].monthly_payment, 10_661.85, epsilon = 0.01);

    let result = project_cashflows(&loans, 12, 0.0, 0.725, 0.0, 0.0, 12);
    let rows = result.loan("1").unwrap();
    assert_abs_diff_eq!(rows[0].interest, 1_200.0, epsilon = 1e-9);
    assert_abs_diff_eq!(rows[11].ending_balance, 0.0, epsilon = 1e-6);

    let summary = result.summary();
    assert_abs_diff_eq!(summary.total_scheduled_principal, 120_000.0, epsilon = 1e-6);
    // Buying at par returns the coupon
    assert_abs_diff_eq!(result.holder_yield().unwrap(), 1.01_f64.powi(12) - 1.0, epsilon = 1e-6);
}

#[test]
fn loan_level_override_only_affects_that_loan() {
    let loans = vec![
        Loan::new("A", 100_000.0).with_monthly_rate(0.005).with_remaining_term(60).with_risk(0.05, 0.4),
        Loan::new("B", 100_000.0).with_monthly_rate(0.005).with_remaining_term(60),
    ];
    let result = project_cashflows(&loans, 36, 0.0, 0.725, 0.1, 50.0, 6);

    let a = result.loan("A").unwrap();
    let b = result.loan("B").unwrap();
    assert!(a.iter().map(|r| r.default).sum::<f64>() > 0.0);
    assert!(a.iter().map(|r| r.recovery).sum::<f64>() > 0.0);
    assert!(b.iter().all(|r| r.default == 0.0 && r.recovery == 0.0));

    for (t, agg) in result.monthly.iter().enumerate() {
        assert_abs_diff_eq!(agg.defaults, a[t].default + b[t].default, epsilon = 1e-9);
        assert_abs_diff_eq!(agg.recoveries, a[t].recovery + b[t].recovery, epsilon = 1e-9);
        assert_abs_diff_eq!(agg.interest_collected, a[t].interest + b[t].interest, epsilon = 1e-9);
        assert_abs_diff_eq!(agg.ending_balance, a[t].ending_balance + b[t].ending_balance, epsilon = 1e-6);
    }
}

#[test]
fn zero_lag_recovers_in_default_month() {
    let loans = vec![Loan::new(1, 10_000.0).with_monthly_rate(0.01).with_remaining_term(24)];
    let lgd = 0.7;
    let result = project_cashflows(&loans, 12, 0.3, lgd, 0.0, 0.0, 0);

    for row in result.loan("1").unwrap() {
        assert!(row.default > 0.0);
        assert_abs_diff_eq!(row.recovery, row.default * (1.0 - lgd), epsilon = 1e-9);
    }
}

#[test]
fn caller_tape_is_not_mutated() {
    let loans = mixed_tape();
    let before = serde_json::to_string(&loans).unwrap();
    let _ = project_cashflows(&loans, 12, 0.025, 0.725, 0.22, 100.0, 12);
    assert_eq!(serde_json::to_string(&loans).unwrap(), before);
}
