//! Event file load/save helpers with schema validation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use jsonschema::validator_for;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::core::event::Event;

pub const V1_SCHEMA: &str = include_str!("../../../schemas/event_file/v1.schema.json");

/// On-disk layout of an event file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventFile {
    pub events: Vec<Event>,
}

/// Load events from disk, validating against the bundled schema first.
pub fn load_events(path: &Path) -> Result<Vec<Event>> {
    debug!(path = %path.display(), "loading events");
    let contents =
        fs::read_to_string(path).with_context(|| format!("read events {}", path.display()))?;
    let events = parse_events(&contents).with_context(|| format!("load {}", path.display()))?;
    debug!(count = events.len(), "events loaded");
    Ok(events)
}

/// Parse and validate an event file body.
pub fn parse_events(contents: &str) -> Result<Vec<Event>> {
    let value: Value = serde_json::from_str(contents).context("parse events json")?;
    validate_schema(&value)?;
    let file: EventFile = serde_json::from_value(value).context("deserialize events")?;
    Ok(file.events)
}

/// Atomically write events to disk (temp file + rename).
pub fn write_events(path: &Path, events: &[Event]) -> Result<()> {
    debug!(path = %path.display(), count = events.len(), "writing events");
    let file = EventFile {
        events: events.to_vec(),
    };
    let mut buf = serde_json::to_string_pretty(&file).context("serialize events")?;
    buf.push('\n');
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, buf)
        .with_context(|| format!("write temp events {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace events {}", path.display()))?;
    Ok(())
}

fn validate_schema(instance: &Value) -> Result<()> {
    let schema: Value = serde_json::from_str(V1_SCHEMA).context("parse event file schema")?;
    let compiled = validator_for(&schema).map_err(|err| anyhow!("invalid schema: {}", err))?;
    if !compiled.is_valid(instance) {
        let messages = compiled
            .iter_errors(instance)
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        return Err(anyhow!(
            "event file schema validation failed: {}",
            messages.join("; ")
        ));
    }
    Ok(())
}
