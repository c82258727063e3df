//! Reconstructed objects exchanged through the event store.
//!
//! Field names follow the event-file JSON layout (camelCase). The two output
//! records on [`Muon`] keep the historical user-variable names on the wire.

use serde::{Deserialize, Serialize};

/// A position in cm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Momentum in GeV.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Momentum {
    pub px: f64,
    pub py: f64,
    pub pz: f64,
}

/// Estimated average collision point of the event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BeamSpot {
    pub position: Point3,
}

/// Reconstructed primary vertex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Point3,
    #[serde(default)]
    pub ndof: f64,
    #[serde(default)]
    pub chi2: f64,
}

/// Reconstructed track, described by its reference point and the momentum at
/// that point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub vertex: Point3,
    pub momentum: Momentum,
}

impl Track {
    /// Transverse momentum.
    pub fn pt(&self) -> f64 {
        self.momentum.px.hypot(self.momentum.py)
    }

    /// Signed transverse impact parameter with respect to `point`.
    pub fn dxy(&self, point: &Point3) -> f64 {
        let Momentum { px, py, .. } = self.momentum;
        (-(self.vertex.x - point.x) * py + (self.vertex.y - point.y) * px) / self.pt()
    }

    /// Longitudinal impact parameter with respect to `point`.
    pub fn dz(&self, point: &Point3) -> f64 {
        let Momentum { px, py, pz } = self.momentum;
        let pt = self.pt();
        (self.vertex.z - point.z)
            - ((self.vertex.x - point.x) * px + (self.vertex.y - point.y) * py) / pt * pz / pt
    }
}

/// Trigger object matched to a candidate, with the paths it fired.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerObjectMatch {
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    pub paths: Vec<String>,
}

/// Weighted isolation values attached by the user-data producer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserIsolation {
    #[serde(rename = "User1Iso", with = "crate::serde_utils::extended_f64")]
    pub absolute: f64,
    /// Infinite when the candidate has zero transverse momentum.
    #[serde(rename = "User2Iso", with = "crate::serde_utils::extended_f64")]
    pub relative: f64,
}

/// Displacement and trigger variables attached by the user-data producer.
///
/// Displacements of extreme tracks can overflow, so they share the
/// non-finite encoding of [`UserIsolation`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MuonUserData {
    #[serde(rename = "zDau_dxyFromBS", with = "crate::serde_utils::extended_f64")]
    pub dxy_from_bs: f64,
    #[serde(rename = "zDau_dzFromBS", with = "crate::serde_utils::extended_f64")]
    pub dz_from_bs: f64,
    #[serde(rename = "zDau_dxyFromPV", with = "crate::serde_utils::extended_f64")]
    pub dxy_from_pv: f64,
    #[serde(rename = "zDau_dzFromPV", with = "crate::serde_utils::extended_f64")]
    pub dz_from_pv: f64,
    #[serde(rename = "zDau_HLTBit")]
    pub hlt_bit: f64,
}

/// Muon candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Muon {
    pub pt: f64,
    #[serde(default)]
    pub eta: f64,
    #[serde(default)]
    pub phi: f64,
    #[serde(default)]
    pub charge: i32,
    pub track_iso: f64,
    pub ecal_iso: f64,
    pub hcal_iso: f64,
    /// Inner track; absent for candidates without a reconstructed track.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<Track>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trigger_matches: Vec<TriggerObjectMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_isolation: Option<UserIsolation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<MuonUserData>,
}

impl Muon {
    /// Trigger objects matched to this muon that fired `path`.
    pub fn trigger_object_matches_by_path<'a>(
        &'a self,
        path: &'a str,
    ) -> impl Iterator<Item = &'a TriggerObjectMatch> + 'a {
        self.trigger_matches
            .iter()
            .filter(move |object| object.paths.iter().any(|fired| fired == path))
    }
}

/// Electron-like or tau-like candidate. Only collection sizes are consumed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lepton {
    pub pt: f64,
    #[serde(default)]
    pub eta: f64,
    #[serde(default)]
    pub phi: f64,
    #[serde(default)]
    pub charge: i32,
}
