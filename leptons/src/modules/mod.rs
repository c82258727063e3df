//! Module instances that run once per event.

pub mod lepton_count;
pub mod muon_user_data;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::error::ModuleResult;
use crate::core::event::Event;
use lepton_count::{LeptonCountConfig, LeptonCountFilter};
use muon_user_data::{MuonUserDataConfig, MuonUserDataProducer};

/// One `[[modules]]` entry of the path configuration, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ModuleConfig {
    MuonUserData(MuonUserDataConfig),
    LeptonCount(LeptonCountConfig),
}

impl ModuleConfig {
    pub fn label(&self) -> &str {
        match self {
            ModuleConfig::MuonUserData(cfg) => &cfg.label,
            ModuleConfig::LeptonCount(cfg) => &cfg.label,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ModuleConfig::MuonUserData(_) => "MuonUserData",
            ModuleConfig::LeptonCount(_) => "LeptonCount",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            ModuleConfig::MuonUserData(cfg) => cfg.validate(),
            ModuleConfig::LeptonCount(cfg) => cfg.validate(),
        }
    }
}

/// Result of running one module on one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleOutcome {
    /// A producer put a collection of `count` items.
    Produced { count: usize },
    /// A filter accepted the event.
    Accepted,
    /// A filter rejected the event.
    Rejected,
}

/// A constructed, validated module.
#[derive(Debug, Clone)]
pub enum Module {
    MuonUserData(MuonUserDataProducer),
    LeptonCount(LeptonCountFilter),
}

impl Module {
    pub fn from_config(config: &ModuleConfig) -> Result<Self> {
        let module = match config {
            ModuleConfig::MuonUserData(cfg) => {
                Module::MuonUserData(MuonUserDataProducer::new(cfg.clone())?)
            }
            ModuleConfig::LeptonCount(cfg) => {
                Module::LeptonCount(LeptonCountFilter::new(cfg.clone())?)
            }
        };
        Ok(module)
    }

    /// Build every module, failing on the first invalid configuration.
    pub fn build_all(configs: &[ModuleConfig]) -> Result<Vec<Module>> {
        configs
            .iter()
            .map(|cfg| {
                Module::from_config(cfg)
                    .with_context(|| format!("module '{}' ({})", cfg.label(), cfg.type_name()))
            })
            .collect()
    }

    pub fn label(&self) -> &str {
        match self {
            Module::MuonUserData(producer) => &producer.config().label,
            Module::LeptonCount(filter) => &filter.config().label,
        }
    }

    pub fn is_filter(&self) -> bool {
        matches!(self, Module::LeptonCount(_))
    }

    pub fn process(&self, event: &mut Event) -> ModuleResult<ModuleOutcome> {
        match self {
            Module::MuonUserData(producer) => {
                let count = producer.produce_into(event)?;
                Ok(ModuleOutcome::Produced { count })
            }
            Module::LeptonCount(filter) => {
                if filter.filter(event)? {
                    Ok(ModuleOutcome::Accepted)
                } else {
                    Ok(ModuleOutcome::Rejected)
                }
            }
        }
    }
}
