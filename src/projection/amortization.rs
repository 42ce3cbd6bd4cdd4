//! Level-payment and rate-conversion primitives

/// Level payment that fully amortizes `pv` over `nper` months at `rate`
///
/// `pv * r * (1+r)^n / ((1+r)^n - 1)`, or `pv / max(n, 1)` when the rate is zero.
pub fn pmt(rate: f64, nper: u32, pv: f64) -> f64 {
    let n = nper.max(1);
    if rate == 0.0 {
        return pv / n as f64;
    }
    let growth = (1.0 + rate).powi(n as i32);
    pv * rate * growth / (growth - 1.0)
}

/// Constant monthly hazard consistent with an annual cumulative default probability
///
/// q_monthly = 1 - (1 - pd_annual)^(1/12)
pub fn annual_pd_to_monthly(pd_annual: f64) -> f64 {
    annual_to_monthly(pd_annual)
}

/// Single monthly mortality from an annual constant prepayment rate
///
/// SMM = 1 - (1 - CPR)^(1/12)
pub fn cpr_to_smm(cpr_annual: f64) -> f64 {
    annual_to_monthly(cpr_annual)
}

/// Monthly servicing rate from basis points per annum
pub fn servicing_bps_to_monthly(bps_pa: f64) -> f64 {
    (bps_pa / 10_000.0) / 12.0
}

fn annual_to_monthly(annual: f64) -> f64 {
    1.0 - (1.0 - annual).powf(1.0 / 12.0)
}
