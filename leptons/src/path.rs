//! Run the configured modules over a sequence of events.
//!
//! Modules run in configuration order. A producer puts its product into the
//! event; a filter that rejects ends the path for that event, so later modules
//! do not run. Module failures are handled per [`ErrorPolicy`].

use anyhow::Result;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::error::ModuleError;
use crate::core::event::{Event, EventId};
use crate::io::config::{ErrorPolicy, PathConfig};
use crate::modules::{Module, ModuleOutcome};

/// A module failed while processing an event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("module '{module}' failed on event {event}")]
pub struct EventError {
    pub event: EventId,
    pub module: String,
    #[source]
    pub source: ModuleError,
}

/// Path decision for one successfully processed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathDecision {
    Accepted,
    Rejected { by: String },
}

/// What happened to one event, as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Accepted,
    Rejected { by: String },
    /// Skipped under [`ErrorPolicy::SkipEvent`]; not part of the output.
    Failed { module: String, error: String },
}

impl From<PathDecision> for EventOutcome {
    fn from(decision: PathDecision) -> Self {
        match decision {
            PathDecision::Accepted => EventOutcome::Accepted,
            PathDecision::Rejected { by } => EventOutcome::Rejected { by },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventReport {
    pub id: EventId,
    pub outcome: EventOutcome,
}

/// Per-filter counters, in path order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterStats {
    pub label: String,
    /// Events that reached the filter without an earlier rejection.
    pub visited: u64,
    pub passed: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSummary {
    pub read: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub failed: u64,
    pub filters: Vec<FilterStats>,
}

/// Events that completed the path (accepted or rejected) plus counters.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    pub events: Vec<Event>,
    pub summary: PathSummary,
}

/// Validated, ready-to-run sequence of modules.
#[derive(Debug, Clone)]
pub struct ModulePath {
    process_name: String,
    on_error: ErrorPolicy,
    modules: Vec<Module>,
}

impl ModulePath {
    pub fn from_config(config: &PathConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            process_name: config.process.name.clone(),
            on_error: config.process.on_error,
            modules: Module::build_all(&config.modules)?,
        })
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Run every module on one event.
    pub fn process_event(&self, event: &mut Event) -> Result<PathDecision, EventError> {
        let mut filters = self.empty_filter_stats();
        self.process_with_stats(event, &mut filters)
    }

    /// Process all events in order, calling `on_event` after each one.
    ///
    /// Under [`ErrorPolicy::Abort`] the first failing event ends the run with
    /// its error. Under [`ErrorPolicy::SkipEvent`] failed events are reported
    /// and dropped from the output.
    pub fn run<F: FnMut(&EventReport)>(
        &self,
        events: Vec<Event>,
        mut on_event: F,
    ) -> Result<RunOutput> {
        info!(
            process = %self.process_name,
            events = events.len(),
            modules = self.modules.len(),
            "starting path"
        );
        let mut summary = PathSummary {
            filters: self.empty_filter_stats(),
            ..PathSummary::default()
        };
        let mut output = Vec::with_capacity(events.len());

        for mut event in events {
            summary.read += 1;
            let decision = match self.process_with_stats(&mut event, &mut summary.filters) {
                Ok(decision) => decision,
                Err(err) if self.on_error == ErrorPolicy::SkipEvent => {
                    warn!(event = %err.event, module = %err.module, error = %err.source, "skipping failed event");
                    summary.failed += 1;
                    on_event(&EventReport {
                        id: err.event,
                        outcome: EventOutcome::Failed {
                            module: err.module,
                            error: err.source.to_string(),
                        },
                    });
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            match decision {
                PathDecision::Accepted => summary.accepted += 1,
                PathDecision::Rejected { .. } => summary.rejected += 1,
            }
            event.accepted = Some(decision == PathDecision::Accepted);
            on_event(&EventReport {
                id: event.id,
                outcome: decision.into(),
            });
            output.push(event);
        }

        info!(
            process = %self.process_name,
            read = summary.read,
            accepted = summary.accepted,
            rejected = summary.rejected,
            failed = summary.failed,
            "path finished"
        );
        Ok(RunOutput {
            events: output,
            summary,
        })
    }

    fn empty_filter_stats(&self) -> Vec<FilterStats> {
        self.modules
            .iter()
            .filter(|module| module.is_filter())
            .map(|module| FilterStats {
                label: module.label().to_string(),
                visited: 0,
                passed: 0,
            })
            .collect()
    }

    fn process_with_stats(
        &self,
        event: &mut Event,
        filters: &mut [FilterStats],
    ) -> Result<PathDecision, EventError> {
        let mut stats = filters.iter_mut();
        for module in &self.modules {
            let outcome = module.process(event).map_err(|source| EventError {
                event: event.id,
                module: module.label().to_string(),
                source,
            })?;
            debug!(event = %event.id, module = module.label(), ?outcome, "module done");
            match outcome {
                ModuleOutcome::Produced { .. } => {}
                ModuleOutcome::Accepted | ModuleOutcome::Rejected => {
                    let accepted = outcome == ModuleOutcome::Accepted;
                    if let Some(stat) = stats.next() {
                        stat.visited += 1;
                        stat.passed += u64::from(accepted);
                    }
                    if !accepted {
                        return Ok(PathDecision::Rejected {
                            by: module.label().to_string(),
                        });
                    }
                }
            }
        }
        Ok(PathDecision::Accepted)
    }
}
