//! Loan Projection CLI
//!
//! Command-line interface for projecting loan tape cashflows

use anyhow::{Context, Result};
use clap::Parser;
use loan_projection::{
    loan::{load_loans, normalize_loans},
    projection::DEFAULT_PROJECTION_MONTHS,
    report::{write_loans_csv_path, write_monthly_csv_path},
    PortfolioProfile, ProjectionConfig, ProjectionEngine, ProjectionResult, RiskAssumptions,
    Scenario, ScenarioRunner,
};
use log::info;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "loan_projection", version, about = "Project monthly cashflows for a loan tape")]
struct Args {
    /// Loan tape (.csv or .json)
    tape: PathBuf,

    /// Projection horizon in months
    #[arg(long, default_value_t = DEFAULT_PROJECTION_MONTHS)]
    months: u32,

    /// JSON file with portfolio assumptions (missing keys take defaults)
    #[arg(long)]
    assumptions: Option<PathBuf>,

    /// Annual probability of default
    #[arg(long)]
    pd: Option<f64>,

    /// Loss given default
    #[arg(long)]
    lgd: Option<f64>,

    /// Annual constant prepayment rate
    #[arg(long)]
    cpr: Option<f64>,

    /// Servicing fee in basis points per annum
    #[arg(long)]
    servicing_bps: Option<f64>,

    /// Months between default and recovery
    #[arg(long)]
    recovery_lag: Option<u32>,

    /// Write the monthly portfolio table to this CSV
    #[arg(long)]
    monthly_out: Option<PathBuf>,

    /// Write the per-loan table to this CSV
    #[arg(long)]
    loans_out: Option<PathBuf>,

    /// Print results as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Advance loans on a single thread
    #[arg(long)]
    sequential: bool,

    /// Run the Base/Adverse/Severe stress ladder
    #[arg(long)]
    stress: bool,
}

impl Args {
    /// Flags override the assumptions file, which overrides defaults
    fn risk_assumptions(&self) -> Result<RiskAssumptions> {
        let mut assumptions = match &self.assumptions {
            Some(path) => RiskAssumptions::from_json_path(path)
                .with_context(|| format!("reading assumptions from {}", path.display()))?,
            None => RiskAssumptions::default(),
        };

        if let Some(pd) = self.pd {
            assumptions.pd_annual = pd;
        }
        if let Some(lgd) = self.lgd {
            assumptions.lgd = lgd;
        }
        if let Some(cpr) = self.cpr {
            assumptions.cpr_annual = cpr;
        }
        if let Some(bps) = self.servicing_bps {
            assumptions.servicing_bps_pa = bps;
        }
        if let Some(lag) = self.recovery_lag {
            assumptions.recovery_lag_months = lag;
        }

        Ok(assumptions)
    }
}

#[derive(Serialize)]
struct ScenarioOutput<'a> {
    scenario: &'a Scenario,
    summary: loan_projection::projection::ProjectionSummary,
    holder_yield: Option<f64>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let start = Instant::now();

    let loans = load_loans(&args.tape)
        .with_context(|| format!("loading loan tape {}", args.tape.display()))?;
    let assumptions = args.risk_assumptions()?;
    info!("Assumptions: {:?}", assumptions);

    if args.stress {
        return run_stress(&args, &loans, &assumptions);
    }

    let config = ProjectionConfig {
        months: args.months,
        assumptions,
        parallel: !args.sequential,
    };
    let result = ProjectionEngine::new(config).project(&loans);
    info!("Projected {} loans in {:?}", loans.len(), start.elapsed());

    if let Some(path) = &args.monthly_out {
        write_monthly_csv_path(&result, path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Monthly table written to {}", path.display());
    }
    if let Some(path) = &args.loans_out {
        write_loans_csv_path(&result, path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Loan table written to {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let profile = PortfolioProfile::from_loans(&normalize_loans(&loans));
        print_report(&profile, &result);
    }

    Ok(())
}

fn run_stress(args: &Args, loans: &[loan_projection::Loan], base: &RiskAssumptions) -> Result<()> {
    let runner = ScenarioRunner::new(loans, args.months);
    let results = runner.run_scenarios(&Scenario::standard_ladder(base));

    if args.json {
        let output: Vec<ScenarioOutput> = results
            .iter()
            .map(|(scenario, result)| ScenarioOutput {
                scenario,
                summary: result.summary(),
                holder_yield: result.holder_yield(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{:<10} {:>8} {:>8} {:>8} {:>16} {:>16} {:>16} {:>10}",
        "Scenario", "PD", "LGD", "CPR", "Defaults", "Net Loss", "Net Cash", "Yield");
    println!("{}", "-".repeat(100));
    for (scenario, result) in &results {
        let summary = result.summary();
        let a = &scenario.assumptions;
        println!("{:<10} {:>8.4} {:>8.4} {:>8.4} {:>16.2} {:>16.2} {:>16.2} {:>10}",
            scenario.name,
            a.pd_annual,
            a.lgd,
            a.cpr_annual,
            summary.total_defaults,
            summary.net_credit_loss,
            summary.total_net_cash,
            format_rate(result.holder_yield()),
        );
    }
    Ok(())
}

fn format_rate(rate: Option<f64>) -> String {
    rate.map(|r| format!("{:.3}%", r * 100.0))
        .unwrap_or_else(|| "n/a".to_string())
}

fn print_report(profile: &PortfolioProfile, result: &ProjectionResult) {
    println!("Loan Projection v{}", env!("CARGO_PKG_VERSION"));
    println!("======================\n");

    println!("Tape:");
    println!("  Loans: {}", profile.loan_count);
    println!("  Total Balance: {:.2}", profile.total_balance);
    println!("  WAC: {:.4}%", profile.weighted_avg_rate * 100.0);
    println!("  WAM: {:.1} months", profile.weighted_avg_term);
    println!();

    println!("{:>5} {:>14} {:>14} {:>14} {:>12} {:>12} {:>10} {:>14} {:>16}",
        "Month", "Interest", "Principal", "Prepay", "Default", "Recovery", "Servicing", "Net Cash", "End Balance");
    println!("{}", "-".repeat(120));

    for m in result.monthly.iter().take(24) {
        println!("{:>5} {:>14.2} {:>14.2} {:>14.2} {:>12.2} {:>12.2} {:>10.2} {:>14.2} {:>16.2}",
            m.month,
            m.interest_collected,
            m.scheduled_principal,
            m.prepayments,
            m.defaults,
            m.recoveries,
            m.servicing_fee,
            m.net_cash_to_bank,
            m.ending_balance,
        );
    }
    if result.monthly.len() > 24 {
        println!("... ({} more months)", result.monthly.len() - 24);
    }

    let summary = result.summary();
    println!("\nSummary:");
    println!("  Total Months: {}", summary.total_months);
    println!("  Total Interest: {:.2}", summary.total_interest);
    println!("  Total Principal: {:.2}", summary.total_scheduled_principal);
    println!("  Total Prepayments: {:.2}", summary.total_prepayments);
    println!("  Total Defaults: {:.2}", summary.total_defaults);
    println!("  Total Recoveries: {:.2}", summary.total_recoveries);
    println!("  Net Credit Loss: {:.2}", summary.net_credit_loss);
    println!("  Total Net Cash: {:.2}", summary.total_net_cash);
    println!("  Final Balance: {:.2} (pool factor {:.4})", summary.final_balance, summary.pool_factor);
    println!("  Holder Yield: {}", format_rate(result.holder_yield()));
}
