//! Portfolio-level credit and prepayment assumptions

use crate::error::TapeError;
use crate::loan::{finite_or_zero, NormalizedLoan};
use crate::projection::amortization::{annual_pd_to_monthly, cpr_to_smm, servicing_bps_to_monthly};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

pub const DEFAULT_PD_ANNUAL: f64 = 0.025;
pub const DEFAULT_LGD: f64 = 0.725;
pub const DEFAULT_CPR_ANNUAL: f64 = 0.22;
pub const DEFAULT_SERVICING_BPS_PA: f64 = 100.0;
pub const DEFAULT_RECOVERY_LAG_MONTHS: u32 = 12;

fn default_pd_annual() -> f64 { DEFAULT_PD_ANNUAL }
fn default_lgd() -> f64 { DEFAULT_LGD }
fn default_cpr_annual() -> f64 { DEFAULT_CPR_ANNUAL }
fn default_servicing_bps_pa() -> f64 { DEFAULT_SERVICING_BPS_PA }
fn default_recovery_lag_months() -> u32 { DEFAULT_RECOVERY_LAG_MONTHS }

/// Stress assumptions applied to every loan lacking its own overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssumptions {
    /// Annual probability of default
    #[serde(default = "default_pd_annual")]
    pub pd_annual: f64,

    /// Loss given default (0..1)
    #[serde(default = "default_lgd")]
    pub lgd: f64,

    /// Annual constant prepayment rate
    #[serde(default = "default_cpr_annual")]
    pub cpr_annual: f64,

    /// Servicing fee in basis points per annum on the opening balance
    #[serde(default = "default_servicing_bps_pa")]
    pub servicing_bps_pa: f64,

    /// Months between a default and its recovery cash
    #[serde(default = "default_recovery_lag_months")]
    pub recovery_lag_months: u32,
}

impl Default for RiskAssumptions {
    fn default() -> Self {
        Self {
            pd_annual: DEFAULT_PD_ANNUAL,
            lgd: DEFAULT_LGD,
            cpr_annual: DEFAULT_CPR_ANNUAL,
            servicing_bps_pa: DEFAULT_SERVICING_BPS_PA,
            recovery_lag_months: DEFAULT_RECOVERY_LAG_MONTHS,
        }
    }
}

/// Clamp a probability-like input into [0, 1], mapping non-finite values to 0
pub(crate) fn unit_interval(value: f64) -> f64 {
    finite_or_zero(value).clamp(0.0, 1.0)
}

impl RiskAssumptions {
    /// Assumptions with no defaults, prepayments or servicing
    pub fn zero_stress() -> Self {
        Self {
            pd_annual: 0.0,
            lgd: 0.0,
            cpr_annual: 0.0,
            servicing_bps_pa: 0.0,
            recovery_lag_months: 0,
        }
    }

    /// Load a (possibly partial) JSON assumptions file; missing keys take defaults
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, TapeError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    /// Copy with every field forced into its valid range
    pub fn sanitized(&self) -> Self {
        Self {
            pd_annual: unit_interval(self.pd_annual),
            lgd: unit_interval(self.lgd),
            cpr_annual: unit_interval(self.cpr_annual),
            servicing_bps_pa: finite_or_zero(self.servicing_bps_pa).max(0.0),
            recovery_lag_months: self.recovery_lag_months,
        }
    }

    /// Monthly SMM implied by the annual CPR
    pub fn monthly_smm(&self) -> f64 {
        cpr_to_smm(unit_interval(self.cpr_annual))
    }

    /// Monthly servicing rate implied by the bps figure
    pub fn monthly_servicing_rate(&self) -> f64 {
        servicing_bps_to_monthly(finite_or_zero(self.servicing_bps_pa).max(0.0))
    }

    /// Resolve the monthly hazard and LGD for one loan, honoring its overrides
    pub fn loan_risk(&self, loan: &NormalizedLoan) -> LoanRisk {
        let pd_annual = unit_interval(loan.pd.unwrap_or(self.pd_annual));
        let lgd = unit_interval(loan.lgd.unwrap_or(self.lgd));
        LoanRisk {
            monthly_pd: annual_pd_to_monthly(pd_annual),
            lgd,
        }
    }
}

/// Per-loan monthly default hazard and severity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanRisk {
    pub monthly_pd: f64,
    pub lgd: f64,
}
