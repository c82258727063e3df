//! Per-event muon user-data producer and lepton-count filter.
//!
//! Reads a path configuration (`leptons.toml`) and an event file, runs the
//! configured modules over every event, and writes the augmented events back.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use leptons::exit_codes;
use leptons::io::config::{PathConfig, load_config, write_config};
use leptons::io::event_file::{load_events, write_events};
use leptons::logging;
use leptons::modules::ModuleConfig;
use leptons::path::{EventOutcome, EventReport, ModulePath};

const DEFAULT_CONFIG: &str = "leptons.toml";

#[derive(Parser)]
#[command(
    name = "leptons",
    version,
    about = "Muon user-data producer and lepton-count event filter"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default path configuration if missing.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },
    /// Check the path configuration (labels, weights, count range).
    Validate {
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },
    /// Run the configured modules over every event of an event file.
    Run {
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
        /// Input event file (JSON).
        #[arg(long)]
        events: PathBuf,
        /// Write processed events (accepted and rejected) to this file.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    logging::init();
    let code = match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::INVALID
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init { force, config } => cmd_init(&config, force),
        Command::Validate { config } => cmd_validate(&config),
        Command::Run {
            config,
            events,
            output,
        } => cmd_run(&config, &events, output.as_deref()),
    }
}

fn cmd_init(config_path: &Path, force: bool) -> Result<i32> {
    if !force && config_path.exists() {
        println!("init: {} exists (use --force to overwrite)", config_path.display());
        return Ok(exit_codes::OK);
    }
    write_config(config_path, &PathConfig::default())
        .with_context(|| format!("write {}", config_path.display()))?;
    println!("init: wrote {}", config_path.display());
    Ok(exit_codes::OK)
}

fn cmd_validate(config_path: &Path) -> Result<i32> {
    let cfg = load_config(config_path)?;
    for module in &cfg.modules {
        println!("validate: {} {}", module.type_name(), describe(module));
    }
    println!("validate: ok modules={}", cfg.modules.len());
    Ok(exit_codes::OK)
}

fn cmd_run(config_path: &Path, events_path: &Path, output: Option<&Path>) -> Result<i32> {
    let cfg = load_config(config_path)?;
    let path = ModulePath::from_config(&cfg)?;
    let events = load_events(events_path)?;
    debug!(events = events.len(), modules = path.modules().len(), "running path");

    let result = path.run(events, print_report)?;

    let summary = &result.summary;
    println!(
        "summary: read={} accepted={} rejected={} failed={}",
        summary.read, summary.accepted, summary.rejected, summary.failed
    );
    for filter in &summary.filters {
        println!(
            "filter: {} passed={}/{}",
            filter.label, filter.passed, filter.visited
        );
    }
    if let Some(output) = output {
        write_events(output, &result.events)
            .with_context(|| format!("write {}", output.display()))?;
        println!("output: {} events={}", output.display(), result.events.len());
    }

    if summary.failed > 0 {
        return Ok(exit_codes::EVENTS_FAILED);
    }
    Ok(exit_codes::OK)
}

fn print_report(report: &EventReport) {
    match &report.outcome {
        EventOutcome::Accepted => println!("event: {} accepted", report.id),
        EventOutcome::Rejected { by } => println!("event: {} rejected by={}", report.id, by),
        EventOutcome::Failed { module, error } => {
            println!("event: {} failed module={} error={}", report.id, module, error)
        }
    }
}

fn describe(module: &ModuleConfig) -> String {
    match module {
        ModuleConfig::MuonUserData(cfg) => format!(
            "label={} src={} alpha={} beta={} hltPath={}",
            cfg.label, cfg.src, cfg.alpha, cfg.beta, cfg.hlt_path
        ),
        ModuleConfig::LeptonCount(cfg) => format!(
            "label={} range=[{}, {}] electrons={} muons={} taus={}",
            cfg.label,
            cfg.min_number,
            cfg.max_number,
            cfg.count_electrons,
            cfg.count_muons,
            cfg.count_taus
        ),
    }
}
