//! Scenario runner for stress projections
//!
//! Normalizes the tape once, then runs many projections with different
//! portfolio assumptions.

use crate::assumptions::RiskAssumptions;
use crate::loan::{normalize_loans, Loan, NormalizedLoan};
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};
use rayon::prelude::*;
use serde::Serialize;

/// A named set of portfolio assumptions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    pub name: String,
    pub assumptions: RiskAssumptions,
}

impl Scenario {
    pub fn new(name: impl Into<String>, assumptions: RiskAssumptions) -> Self {
        Self {
            name: name.into(),
            assumptions,
        }
    }

    /// Derive a stressed scenario from a base
    ///
    /// PD and CPR are scaled, LGD is shifted; results are clamped to [0, 1].
    /// Loan-level PD/LGD overrides are left untouched.
    pub fn stressed(
        name: impl Into<String>,
        base: &RiskAssumptions,
        pd_multiplier: f64,
        lgd_add: f64,
        cpr_multiplier: f64,
    ) -> Self {
        let assumptions = RiskAssumptions {
            pd_annual: base.pd_annual * pd_multiplier,
            lgd: base.lgd + lgd_add,
            cpr_annual: base.cpr_annual * cpr_multiplier,
            ..base.clone()
        }
        .sanitized();
        Self::new(name, assumptions)
    }

    /// Base, Adverse and Severe scenarios around a base assumption set
    pub fn standard_ladder(base: &RiskAssumptions) -> Vec<Scenario> {
        vec![
            Scenario::new("Base", base.sanitized()),
            Scenario::stressed("Adverse", base, 2.0, 0.10, 0.5),
            Scenario::stressed("Severe", base, 4.0, 0.20, 0.25),
        ]
    }
}

/// Pre-normalized tape for repeated projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(&loans, 60);
/// let results = runner.run_scenarios(&Scenario::standard_ladder(&RiskAssumptions::default()));
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    loans: Vec<NormalizedLoan>,
    months: u32,
}

impl ScenarioRunner {
    pub fn new(loans: &[Loan], months: u32) -> Self {
        Self {
            loans: normalize_loans(loans),
            months,
        }
    }

    /// Normalized loans shared by every run
    pub fn loans(&self) -> &[NormalizedLoan] {
        &self.loans
    }

    /// Run one projection with the given assumptions
    pub fn run(&self, assumptions: &RiskAssumptions) -> ProjectionResult {
        let config = ProjectionConfig {
            months: self.months,
            assumptions: assumptions.clone(),
            // Scenarios already run in parallel
            parallel: false,
        };
        ProjectionEngine::new(config).project_normalized(&self.loans)
    }

    /// Run every scenario; results keep the input order
    pub fn run_scenarios(&self, scenarios: &[Scenario]) -> Vec<(Scenario, ProjectionResult)> {
        scenarios
            .par_iter()
            .map(|scenario| (scenario.clone(), self.run(&scenario.assumptions)))
            .collect()
    }
}
