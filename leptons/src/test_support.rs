//! Test-only helpers for building candidates, events and configurations.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::event::{Event, EventId, EventStore, Product};
use crate::core::types::{
    BeamSpot, Lepton, Momentum, Muon, Point3, Track, TriggerObjectMatch, Vertex,
};
use crate::io::config::{PathConfig, write_config};
use crate::io::event_file::write_events;
use crate::modules::ModuleConfig;
use crate::modules::lepton_count::LeptonCountConfig;
use crate::modules::muon_user_data::MuonUserDataConfig;

/// Untracked muon with fixed isolation sums.
pub fn muon(pt: f64) -> Muon {
    Muon {
        pt,
        eta: 0.4,
        phi: 1.1,
        charge: -1,
        track_iso: 1.5,
        ecal_iso: 2.5,
        hcal_iso: 0.5,
        ..Muon::default()
    }
}

/// Muon whose inner track runs along +x from `(0, y, z)`.
pub fn tracked_muon(pt: f64, y: f64, z: f64) -> Muon {
    Muon {
        track: Some(Track {
            vertex: Point3::new(0.0, y, z),
            momentum: Momentum {
                px: pt,
                py: 0.0,
                pz: 0.0,
            },
        }),
        ..muon(pt)
    }
}

/// Attach a trigger match that fired `path`.
pub fn with_trigger(mut muon: Muon, path: &str) -> Muon {
    muon.trigger_matches.push(TriggerObjectMatch {
        pt: muon.pt,
        eta: muon.eta,
        phi: muon.phi,
        paths: vec![path.to_string()],
    });
    muon
}

/// `n` leptons with increasing pt.
pub fn leptons(n: usize) -> Vec<Lepton> {
    (0..n)
        .map(|i| Lepton {
            pt: 10.0 + i as f64,
            ..Lepton::default()
        })
        .collect()
}

pub fn vertex(x: f64, y: f64, z: f64) -> Vertex {
    Vertex {
        position: Point3::new(x, y, z),
        ndof: 12.0,
        chi2: 9.5,
    }
}

pub fn event_id(event: u64) -> EventId {
    EventId {
        run: 1,
        lumi: 1,
        event,
    }
}

/// Event with two muons (tracked and triggered, then untracked), two electrons, one
/// tau, a beam spot at the origin and two primary vertices.
pub fn sample_event() -> Event {
    Event::new(event_id(1))
        .with_product(
            "selectedPatMuons",
            Product::Muons(vec![
                with_trigger(tracked_muon(40.0, 0.25, 0.5), "HLT_Mu9"),
                muon(25.0),
            ]),
        )
        .with_product("selectedPatElectrons", Product::Electrons(leptons(2)))
        .with_product("selectedPatTaus", Product::Taus(leptons(1)))
        .with_product("offlineBeamSpot", Product::BeamSpot(BeamSpot::default()))
        .with_product(
            "offlinePrimaryVertices",
            Product::Vertices(vec![vertex(0.0, 0.0, 0.25), vertex(0.0, 0.0, -4.0)]),
        )
}

pub fn user_data_config() -> MuonUserDataConfig {
    MuonUserDataConfig {
        label: "userDataMuons".to_string(),
        src: "selectedPatMuons".to_string(),
        beam_spot: "offlineBeamSpot".to_string(),
        primary_vertices: "offlinePrimaryVertices".to_string(),
        alpha: 0.75,
        beta: -0.75,
        hlt_path: "HLT_Mu9".to_string(),
    }
}

pub fn count_config(
    count_electrons: bool,
    count_muons: bool,
    count_taus: bool,
    min_number: u32,
    max_number: u32,
) -> LeptonCountConfig {
    LeptonCountConfig {
        label: "countLeptons".to_string(),
        electron_source: "selectedPatElectrons".to_string(),
        muon_source: "selectedPatMuons".to_string(),
        tau_source: "selectedPatTaus".to_string(),
        count_electrons,
        count_muons,
        count_taus,
        min_number,
        max_number,
    }
}

/// Path running the user-data producer, then a count filter on its output.
pub fn path_config(min_number: u32, max_number: u32) -> PathConfig {
    let mut count = count_config(true, true, false, min_number, max_number);
    count.muon_source = "userDataMuons".to_string();
    PathConfig {
        modules: vec![
            ModuleConfig::MuonUserData(user_data_config()),
            ModuleConfig::LeptonCount(count),
        ],
        ..PathConfig::default()
    }
}

/// Event store wrapper that records every label looked up.
pub struct RecordingStore {
    inner: Event,
    requested: RefCell<Vec<String>>,
}

impl RecordingStore {
    pub fn new(inner: Event) -> Self {
        Self {
            inner,
            requested: RefCell::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl EventStore for RecordingStore {
    fn product(&self, label: &str) -> Option<&Product> {
        self.requested.borrow_mut().push(label.to_string());
        self.inner.product(label)
    }
}

/// Temporary directory holding config and event files.
pub struct TestDir {
    dir: tempfile::TempDir,
}

impl TestDir {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_config(&self, name: &str, config: &PathConfig) -> Result<PathBuf> {
        let path = self.path().join(name);
        write_config(&path, config)?;
        Ok(path)
    }

    pub fn write_events(&self, name: &str, events: &[Event]) -> Result<PathBuf> {
        let path = self.path().join(name);
        write_events(&path, events)?;
        Ok(path)
    }
}
