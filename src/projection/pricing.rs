//! Discounting and holder yield of the projected net cash stream

/// Bisection iterations before giving up
const YIELD_MAX_ITER: u32 = 200;

/// Price tolerance for the yield search
const YIELD_TOL: f64 = 1e-9;

/// Monthly rates the search never goes beyond
const MIN_PERIODIC_RATE: f64 = -0.99;
const MAX_PERIODIC_RATE: f64 = 10.0;

/// Present value of flows received at the end of periods 1..N
pub fn present_value(cashflows: &[f64], periodic_rate: f64) -> f64 {
    let mut discount = 1.0;
    let mut pv = 0.0;
    for &cf in cashflows {
        discount /= 1.0 + periodic_rate;
        pv += cf * discount;
    }
    pv
}

/// Annualized yield that prices `cashflows` (end of periods 1..N) at `price`
///
/// A holder paying a positive price for a stream of mostly positive cash has a
/// single sign change, so the periodic rate is bracketed and bisected on the
/// price error. Returns `None` when there is nothing to price or no bracket exists.
pub fn holder_yield(price: f64, cashflows: &[f64], periods_per_year: u32) -> Option<f64> {
    if price.is_nan() || price <= 0.0 || cashflows.iter().all(|&cf| cf <= 0.0) {
        return None;
    }

    let error = |rate: f64| present_value(cashflows, rate) - price;
    let (mut lo, mut hi) = bracket(&error)?;

    for _ in 0..YIELD_MAX_ITER {
        let mid = 0.5 * (lo + hi);
        let err_mid = error(mid);

        if err_mid.abs() < YIELD_TOL || hi - lo < 1e-14 {
            return Some((1.0 + mid).powi(periods_per_year as i32) - 1.0);
        }

        // Price falls as the rate rises
        if err_mid > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    None
}

/// Find [lo, hi] with the price error positive at lo and non-positive at hi
fn bracket(error: &impl Fn(f64) -> f64) -> Option<(f64, f64)> {
    let mut lo = 0.0;
    let mut hi = 0.01;

    // Losses push the yield below zero
    while error(lo) <= 0.0 {
        hi = lo;
        lo = 0.5 * (lo + MIN_PERIODIC_RATE);
        if lo - MIN_PERIODIC_RATE < 1e-6 {
            return None;
        }
    }

    while error(hi) > 0.0 {
        lo = hi;
        hi *= 2.0;
        if hi > MAX_PERIODIC_RATE {
            return None;
        }
    }

    Some((lo, hi))
}
