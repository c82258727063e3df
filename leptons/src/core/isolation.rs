//! Weighted combination of tracker and calorimeter isolation sums.

use crate::core::types::Muon;

/// Blend weights for the combined isolation.
///
/// `alpha` weighs calorimeter against tracker isolation, `beta` weighs ECAL
/// against HCAL inside the calorimeter term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsolationWeights {
    pub alpha: f64,
    pub beta: f64,
}

/// Combined isolation, optionally divided by the candidate's transverse momentum.
pub fn isolation(muon: &Muon, weights: IsolationWeights, relative: bool) -> f64 {
    let iso = absolute_isolation(muon, weights);
    if relative {
        relative_isolation(iso, muon.pt)
    } else {
        iso
    }
}

/// `alpha * ((1+beta)/2 * ecal + (1-beta)/2 * hcal) + (1-alpha) * track`.
pub fn absolute_isolation(muon: &Muon, weights: IsolationWeights) -> f64 {
    let IsolationWeights { alpha, beta } = weights;
    let calo = (1.0 + beta) / 2.0 * muon.ecal_iso + (1.0 - beta) / 2.0 * muon.hcal_iso;
    alpha * calo + (1.0 - alpha) * muon.track_iso
}

/// `iso / pt`, with `pt == 0` mapped to an infinity carrying the sign of `iso`
/// (positive when `iso` is zero).
pub fn relative_isolation(iso: f64, pt: f64) -> f64 {
    if pt == 0.0 {
        return if iso < 0.0 {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    iso / pt
}
