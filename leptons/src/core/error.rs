//! Errors raised while processing a single event.

use thiserror::Error;

use crate::core::event::ProductKind;

/// Fatal per-event error. Processing of the event stops; the path policy
/// decides whether the whole run aborts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModuleError {
    #[error("missing required input '{label}'")]
    MissingProduct { label: String },

    #[error("input '{label}' holds {found}, expected {expected}")]
    WrongProductType {
        label: String,
        expected: ProductKind,
        found: ProductKind,
    },

    #[error("candidate {candidate} has a track but the primary vertex collection is empty")]
    EmptyVertexCollection { candidate: usize },

    #[error("candidate {candidate} has a track with zero transverse momentum")]
    DegenerateTrack { candidate: usize },
}

pub type ModuleResult<T> = Result<T, ModuleError>;
