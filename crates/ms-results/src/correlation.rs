//! Empirical power number of a four-blade paddle in an unbaffled vessel
//! (Furukawa et al., Int. J. Chem. Eng. 2012, 106496), used to sanity-check
//! simulated power numbers.
//!
//! Lengths are scaled by the vessel diameter, so `D = 1`.

use crate::dataset::{DatasetRow, RowOutcome};
use ms_core::{CaseId, ParameterSet, Real};
use serde::Serialize;
use std::f64::consts::PI;

const BLADES: Real = 4.0;

/// `Np0` for blade height `b`, impeller diameter `d`, liquid depth `h`,
/// impeller Reynolds number `re` and blade angle `theta` (radians).
///
/// `None` outside the correlation's domain (`0 < d < 1`, positive `b`, `h`,
/// `re`, `sin θ`) or when the result is not finite.
pub fn unbaffled_power_number(b: Real, d: Real, h: Real, re: Real, theta: Real) -> Option<Real> {
    let sin = theta.sin();
    if !(d > 0.0 && d < 1.0 && b > 0.0 && h > 0.0 && re > 0.0 && sin > 0.0) {
        return None;
    }
    let np = BLADES;
    let ln = (1.0 / d).ln();

    let eta = 0.711 * (0.157 + (np * ln).powf(0.611)) / (np.powf(0.52) * (1.0 - d * d));
    let beta = 2.0 * ln / (1.0 / d - d);
    let gamma = (eta * ln / (beta / d).powi(5)).cbrt();
    let x = gamma * np.powf(0.7) * b * sin.powf(1.6) / h;

    let ct = ((1.96 * x.powf(1.19)).powf(-7.8) + 0.25_f64.powf(-7.8)).powf(-1.0 / 7.8);
    let ctr = 23.8 * d.powf(-3.24) * (b * sin).powf(-1.18) * x.powf(-0.74);
    let cl = 0.215 * eta * np * (d / h) * (1.0 - d * d)
        + 1.83 * (b * sin / h) * (np / 2.0 * sin).cbrt();
    let m = ((0.71 * x.powf(0.373)).powf(-7.8) + 0.333_f64.powf(-7.8)).powf(-1.0 / 7.8);

    let ff = 0.0151 * d * ct.powf(0.308);
    let re_g = PI * eta * ln / (4.0 * d / beta) * re;

    let f = cl / re_g + ct * ((ctr / re_g + re_g).recip() + (ff / ct).powf(1.0 / m)).powf(m);
    let np0 = 1.2 * PI.powi(4) * beta * beta / (8.0 * d.powi(3) / h) * f;

    np0.is_finite().then_some(np0)
}

/// Correlation inputs derived from a case's design variables.
pub fn correlation_for(params: &ParameterSet) -> Option<Real> {
    let d = params.impeller_diameter();
    let b = d / params.dw;
    unbaffled_power_number(b, d, params.ht, params.re, params.theta)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Deviation {
    pub case: CaseId,
    pub simulated: Real,
    pub correlation: Real,
    /// `(simulated - correlation) / correlation`
    pub relative: Real,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompareReport {
    pub deviations: Vec<Deviation>,
    /// Successful rows the correlation does not cover.
    pub out_of_domain: usize,
    pub failures: usize,
    pub mean_abs_relative: Option<Real>,
    pub max_abs_relative: Option<Real>,
}

pub fn compare(rows: &[DatasetRow]) -> CompareReport {
    let mut deviations = Vec::new();
    let mut out_of_domain = 0;
    let mut failures = 0;

    for row in rows {
        let (Some(params), RowOutcome::PowerNumber(simulated)) = (row.parameters, row.outcome)
        else {
            failures += 1;
            continue;
        };
        match correlation_for(&params) {
            Some(correlation) => deviations.push(Deviation {
                case: row.case,
                simulated,
                correlation,
                relative: (simulated - correlation) / correlation,
            }),
            None => out_of_domain += 1,
        }
    }

    let abs: Vec<Real> = deviations.iter().map(|d| d.relative.abs()).collect();
    let mean_abs_relative = (!abs.is_empty()).then(|| abs.iter().sum::<Real>() / abs.len() as Real);
    let max_abs_relative = abs.iter().copied().reduce(Real::max);

    CompareReport {
        deviations,
        out_of_domain,
        failures,
        mean_abs_relative,
        max_abs_relative,
    }
}
