//! Event filter on the number of reconstructed leptons.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::count::{CountFlags, CountRange, LeptonCounts};
use crate::core::error::ModuleResult;
use crate::core::event::EventStore;

/// Configuration of a `LeptonCount` module instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LeptonCountConfig {
    pub label: String,
    pub electron_source: String,
    pub muon_source: String,
    pub tau_source: String,
    pub count_electrons: bool,
    pub count_muons: bool,
    pub count_taus: bool,
    pub min_number: u32,
    pub max_number: u32,
}

impl LeptonCountConfig {
    pub fn validate(&self) -> Result<()> {
        if self.label.trim().is_empty() {
            bail!("label must be non-empty");
        }
        for (enabled, field, value) in [
            (self.count_electrons, "electronSource", &self.electron_source),
            (self.count_muons, "muonSource", &self.muon_source),
            (self.count_taus, "tauSource", &self.tau_source),
        ] {
            if enabled && value.trim().is_empty() {
                bail!("{field} must be non-empty when counted");
            }
        }
        if self.min_number > self.max_number {
            bail!(
                "minNumber {} exceeds maxNumber {}",
                self.min_number,
                self.max_number
            );
        }
        Ok(())
    }

    pub fn flags(&self) -> CountFlags {
        CountFlags {
            electrons: self.count_electrons,
            muons: self.count_muons,
            taus: self.count_taus,
        }
    }

    pub fn range(&self) -> CountRange {
        CountRange {
            min: self.min_number,
            max: self.max_number,
        }
    }
}

/// Accepts an event iff the number of counted leptons lies in
/// `[minNumber, maxNumber]`.
#[derive(Debug, Clone)]
pub struct LeptonCountFilter {
    config: LeptonCountConfig,
}

impl LeptonCountFilter {
    pub fn new(config: LeptonCountConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LeptonCountConfig {
        &self.config
    }

    /// Sizes of the enabled collections. Disabled collections are not looked up.
    pub fn count<S: EventStore + ?Sized>(&self, event: &S) -> ModuleResult<LeptonCounts> {
        let cfg = &self.config;
        let flags = cfg.flags();
        let electrons = if flags.electrons {
            Some(event.electrons(&cfg.electron_source)?.len())
        } else {
            None
        };
        let muons = if flags.muons {
            Some(event.muons(&cfg.muon_source)?.len())
        } else {
            None
        };
        let taus = if flags.taus {
            Some(event.taus(&cfg.tau_source)?.len())
        } else {
            None
        };
        Ok(LeptonCounts {
            electrons,
            muons,
            taus,
        })
    }

    pub fn filter<S: EventStore + ?Sized>(&self, event: &S) -> ModuleResult<bool> {
        let counts = self.count(event)?;
        let total = counts.total();
        let accepted = self.config.range().accepts(&counts);
        debug!(
            label = %self.config.label,
            ?counts,
            total,
            accepted,
            "lepton count"
        );
        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::count::lepton_count_decision;
    use crate::core::error::ModuleError;
    use crate::core::event::{Event, Product};
    use crate::test_support::{RecordingStore, count_config, leptons, muon};

    fn event(electrons: usize, muons: usize, taus: usize) -> Event {
        Event::default()
            .with_product("selectedPatElectrons", Product::Electrons(leptons(electrons)))
            .with_product(
                "selectedPatMuons",
                Product::Muons((0..muons).map(|i| muon(10.0 + i as f64)).collect()),
            )
            .with_product("selectedPatTaus", Product::Taus(leptons(taus)))
    }

    #[test]
    fn accepts_totals_inside_range() {
        let filter = LeptonCountFilter::new(count_config(true, true, false, 2, 3)).expect("filter");
        assert!(filter.filter(&event(2, 1, 4)).expect("filter"));
        assert!(filter.filter(&event(1, 1, 0)).expect("filter"));
        assert!(!filter.filter(&event(3, 1, 0)).expect("filter"));
        assert!(!filter.filter(&event(0, 1, 9)).expect("filter"));
    }

    #[test]
    fn agrees_with_slice_decision() {
        let cfg = count_config(true, false, true, 1, 2);
        let filter = LeptonCountFilter::new(cfg.clone()).expect("filter");
        for (e, m, t) in [(0, 0, 0), (1, 5, 0), (1, 0, 1), (2, 2, 1)] {
            let expected = lepton_count_decision(
                &leptons(e),
                &vec![(); m],
                &leptons(t),
                cfg.flags(),
                cfg.range(),
            );
            assert_eq!(filter.filter(&event(e, m, t)).expect("filter"), expected);
        }
    }

    #[test]
    fn disabled_collections_are_never_looked_up() {
        let filter = LeptonCountFilter::new(count_config(false, true, false, 0, 1)).expect("filter");
        let store = RecordingStore::new(
            Event::default().with_product("selectedPatMuons", Product::Muons(vec![muon(30.0)])),
        );
        assert!(filter.filter(&store).expect("filter"));
        assert_eq!(store.requested(), vec!["selectedPatMuons".to_string()]);
    }

    #[test]
    fn missing_enabled_collection_is_an_error() {
        let filter = LeptonCountFilter::new(count_config(true, true, true, 0, 5)).expect("filter");
        let mut event = event(1, 1, 1);
        event.products.remove("selectedPatTaus");
        let err = filter.filter(&event).expect_err("should fail");
        assert_eq!(
            err,
            ModuleError::MissingProduct {
                label: "selectedPatTaus".to_string()
            }
        );
    }

    #[test]
    fn validate_rejects_inverted_range() {
        let err = count_config(true, true, true, 4, 2)
            .validate()
            .expect_err("inverted");
        assert!(err.to_string().contains("minNumber 4 exceeds maxNumber 2"));
    }

    #[test]
    fn validate_allows_blank_source_when_not_counted() {
        let mut cfg = count_config(true, true, false, 0, 1);
        cfg.tau_source = String::new();
        cfg.validate().expect("valid");
        cfg.count_taus = true;
        assert!(cfg.validate().is_err());
    }
}
