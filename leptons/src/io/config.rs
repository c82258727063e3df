//! Path configuration stored as TOML (default `leptons.toml`).

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::modules::ModuleConfig;
use crate::modules::lepton_count::LeptonCountConfig;
use crate::modules::muon_user_data::MuonUserDataConfig;

/// What the path does when a module fails on an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorPolicy {
    /// Stop the run at the first failing event.
    #[default]
    Abort,
    /// Log the failure, drop the event, and continue.
    SkipEvent,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ProcessConfig {
    /// Process name, reported in logs.
    pub name: String,
    pub on_error: ErrorPolicy,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            name: "LEPTONS".to_string(),
            on_error: ErrorPolicy::Abort,
        }
    }
}

/// Path configuration (TOML): process settings plus the modules to run for
/// every event, in order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathConfig {
    #[serde(default)]
    pub process: ProcessConfig,
    pub modules: Vec<ModuleConfig>,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            process: ProcessConfig::default(),
            modules: vec![
                ModuleConfig::MuonUserData(MuonUserDataConfig {
                    label: "userDataMuons".to_string(),
                    src: "selectedPatMuons".to_string(),
                    beam_spot: "offlineBeamSpot".to_string(),
                    primary_vertices: "offlinePrimaryVertices".to_string(),
                    alpha: 0.75,
                    beta: -0.75,
                    hlt_path: "HLT_Mu9".to_string(),
                }),
                ModuleConfig::LeptonCount(LeptonCountConfig {
                    label: "countLeptons".to_string(),
                    electron_source: "selectedPatElectrons".to_string(),
                    muon_source: "userDataMuons".to_string(),
                    tau_source: "selectedPatTaus".to_string(),
                    count_electrons: false,
                    count_muons: true,
                    count_taus: false,
                    min_number: 2,
                    max_number: 2,
                }),
            ],
        }
    }
}

impl PathConfig {
    pub fn validate(&self) -> Result<()> {
        if self.process.name.trim().is_empty() {
            return Err(anyhow!("process.name must be non-empty"));
        }
        if self.modules.is_empty() {
            return Err(anyhow!("modules must list at least one module"));
        }
        let mut seen = HashSet::new();
        for (index, module) in self.modules.iter().enumerate() {
            module
                .validate()
                .with_context(|| format!("modules[{index}] ({})", module.type_name()))?;
            if !seen.insert(module.label()) {
                return Err(anyhow!("duplicate module label '{}'", module.label()));
            }
        }
        Ok(())
    }
}

/// Load and validate config from a TOML file.
pub fn load_config(path: &Path) -> Result<PathConfig> {
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: PathConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &PathConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"
[process]
name = "ZMuMu"
onError = "skipEvent"

[[modules]]
type = "MuonUserData"
label = "userDataMuons"
src = "selectedPatMuons"
beamSpot = "offlineBeamSpot"
primaryVertices = "offlinePrimaryVertices"
alpha = 0.0
beta = -0.75
hltPath = "HLT_Mu11"

[[modules]]
type = "LeptonCount"
label = "countLeptons"
electronSource = "selectedPatElectrons"
muonSource = "userDataMuons"
tauSource = "selectedPatTaus"
countElectrons = true
countMuons = true
countTaus = false
minNumber = 2
maxNumber = 3
"#;

    #[test]
    fn parses_documented_layout() {
        let cfg: PathConfig = toml::from_str(EXAMPLE).expect("parse");
        cfg.validate().expect("valid");
        assert_eq!(cfg.process.name, "ZMuMu");
        assert_eq!(cfg.process.on_error, ErrorPolicy::SkipEvent);
        assert_eq!(cfg.modules.len(), 2);
        match &cfg.modules[0] {
            ModuleConfig::MuonUserData(m) => {
                assert_eq!(m.alpha, 0.0);
                assert_eq!(m.hlt_path, "HLT_Mu11");
            }
            other => panic!("unexpected module {other:?}"),
        }
        match &cfg.modules[1] {
            ModuleConfig::LeptonCount(f) => {
                assert!(f.count_electrons && f.count_muons && !f.count_taus);
                assert_eq!((f.min_number, f.max_number), (2, 3));
            }
            other => panic!("unexpected module {other:?}"),
        }
    }

    #[test]
    fn process_section_is_optional() {
        let body = EXAMPLE
            .split_once("[[modules]]")
            .map(|(_, rest)| format!("[[modules]]{rest}"))
            .expect("modules");
        let cfg: PathConfig = toml::from_str(&body).expect("parse");
        assert_eq!(cfg.process, ProcessConfig::default());
    }

    #[test]
    fn negative_count_is_rejected_at_parse_time() {
        let body = EXAMPLE.replace("minNumber = 2", "minNumber = -1");
        assert!(toml::from_str::<PathConfig>(&body).is_err());
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let body = EXAMPLE.replace("label = \"countLeptons\"", "label = \"userDataMuons\"");
        let cfg: PathConfig = toml::from_str(&body).expect("parse");
        let err = cfg.validate().expect_err("duplicate");
        assert!(err.to_string().contains("duplicate module label 'userDataMuons'"));
    }

    #[test]
    fn empty_module_list_is_rejected() {
        let cfg = PathConfig {
            modules: Vec::new(),
            ..PathConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn load_reports_inverted_range_with_path() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("leptons.toml");
        fs::write(&path, EXAMPLE.replace("maxNumber = 3", "maxNumber = 1")).expect("write");
        let err = load_config(&path).expect_err("invalid");
        let message = format!("{err:#}");
        assert!(message.contains("leptons.toml"));
        assert!(message.contains("minNumber 2 exceeds maxNumber 1"));
    }

    #[test]
    fn load_missing_file_fails() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = load_config(&temp.path().join("missing.toml")).expect_err("missing");
        assert!(err.to_string().contains("read"));
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("leptons.toml");
        let cfg = PathConfig::default();
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }
}
