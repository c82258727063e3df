//! Producer attaching isolation, impact-parameter and trigger variables to
//! muon candidates.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::annotate::{AnnotationParams, annotate_muons};
use crate::core::displacement::ReferencePoints;
use crate::core::error::ModuleResult;
use crate::core::event::{EventSink, EventStore, Product};
use crate::core::isolation::IsolationWeights;
use crate::core::types::Muon;

/// Configuration of a `MuonUserData` module instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MuonUserDataConfig {
    /// Label of the produced muon collection.
    pub label: String,
    /// Input muon collection.
    pub src: String,
    pub beam_spot: String,
    pub primary_vertices: String,
    /// Calorimeter versus tracker weight.
    pub alpha: f64,
    /// ECAL versus HCAL weight.
    pub beta: f64,
    /// Trigger path whose matches set the HLT bit.
    pub hlt_path: String,
}

impl MuonUserDataConfig {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("label", &self.label),
            ("src", &self.src),
            ("beamSpot", &self.beam_spot),
            ("primaryVertices", &self.primary_vertices),
            ("hltPath", &self.hlt_path),
        ] {
            if value.trim().is_empty() {
                bail!("{field} must be non-empty");
            }
        }
        for (field, input) in [
            ("src", &self.src),
            ("beamSpot", &self.beam_spot),
            ("primaryVertices", &self.primary_vertices),
        ] {
            if *input == self.label {
                bail!("label '{}' must differ from {field}", self.label);
            }
        }
        if !self.alpha.is_finite() {
            bail!("alpha must be finite, got {}", self.alpha);
        }
        if !self.beta.is_finite() {
            bail!("beta must be finite, got {}", self.beta);
        }
        Ok(())
    }
}

/// Copies the `src` muons, annotates each copy, and puts the result under
/// `label`.
#[derive(Debug, Clone)]
pub struct MuonUserDataProducer {
    config: MuonUserDataConfig,
}

impl MuonUserDataProducer {
    pub fn new(config: MuonUserDataConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MuonUserDataConfig {
        &self.config
    }

    /// Annotated copy of the input muons of one event.
    pub fn produce<S: EventStore + ?Sized>(&self, event: &S) -> ModuleResult<Vec<Muon>> {
        let cfg = &self.config;
        let muons = event.muons(&cfg.src)?;
        let beam_spot = event.beam_spot(&cfg.beam_spot)?;
        let primary_vertices = event.vertices(&cfg.primary_vertices)?;
        debug!(
            src = %cfg.src,
            muons = muons.len(),
            vertices = primary_vertices.len(),
            "annotating muons"
        );
        let params = AnnotationParams {
            weights: IsolationWeights {
                alpha: cfg.alpha,
                beta: cfg.beta,
            },
            hlt_path: &cfg.hlt_path,
        };
        let refs = ReferencePoints {
            beam_spot,
            primary_vertices,
        };
        annotate_muons(muons, params, refs)
    }

    /// Produce and put the annotated collection. Returns its size.
    pub fn produce_into<E: EventStore + EventSink>(&self, event: &mut E) -> ModuleResult<usize> {
        let annotated = self.produce(&*event)?;
        let count = annotated.len();
        event.put(&self.config.label, Product::Muons(annotated));
        Ok(count)
    }
}
