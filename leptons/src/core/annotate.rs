//! Per-candidate user-data computation.

use tracing::warn;

use crate::core::displacement::{ReferencePoints, candidate_displacement};
use crate::core::error::ModuleResult;
use crate::core::isolation::{IsolationWeights, isolation};
use crate::core::types::{Muon, MuonUserData, UserIsolation};

/// Event-invariant parameters of the annotation.
#[derive(Debug, Clone, Copy)]
pub struct AnnotationParams<'a> {
    pub weights: IsolationWeights,
    pub hlt_path: &'a str,
}

/// `1.0` if any trigger object matched to `muon` fired `hlt_path`, else `0.0`.
pub fn hlt_bit(muon: &Muon, hlt_path: &str) -> f64 {
    if muon.trigger_object_matches_by_path(hlt_path).next().is_some() {
        1.0
    } else {
        0.0
    }
}

/// Copy `muons` and annotate every copy. The output has the same length and
/// order as the input; the input is not modified.
pub fn annotate_muons(
    muons: &[Muon],
    params: AnnotationParams<'_>,
    refs: ReferencePoints<'_>,
) -> ModuleResult<Vec<Muon>> {
    let mut annotated = muons.to_vec();
    for (index, muon) in annotated.iter_mut().enumerate() {
        annotate_muon(index, muon, params, refs)?;
    }
    Ok(annotated)
}

/// Attach isolation and user data to one candidate, replacing any values left
/// by a previous annotation.
pub fn annotate_muon(
    index: usize,
    muon: &mut Muon,
    params: AnnotationParams<'_>,
    refs: ReferencePoints<'_>,
) -> ModuleResult<()> {
    let iso = isolation(muon, params.weights, false);
    if muon.pt == 0.0 {
        warn!(
            candidate = index,
            iso, "zero transverse momentum, relative isolation set to infinity"
        );
    }
    let displacement = candidate_displacement(index, muon.track.as_ref(), refs)?;

    muon.user_isolation = Some(UserIsolation {
        absolute: iso,
        relative: isolation(muon, params.weights, true),
    });
    muon.user_data = Some(MuonUserData {
        dxy_from_bs: displacement.from_beam_spot.dxy,
        dz_from_bs: displacement.from_beam_spot.dz,
        dxy_from_pv: displacement.from_primary_vertex.dxy,
        dz_from_pv: displacement.from_primary_vertex.dz,
        hlt_bit: hlt_bit(muon, params.hlt_path),
    });
    Ok(())
}
