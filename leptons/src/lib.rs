//! Per-event muon user-data producer and lepton-count filter.
//!
//! Two modules run once per recorded collision event: one annotates muon
//! candidates with isolation, impact-parameter and trigger-match variables,
//! the other accepts or rejects the event by counting leptons. The crate keeps
//! the same split throughout:
//!
//! - **[`core`]**: Pure, deterministic logic (isolation, displacement, counting)
//!   and the in-memory event store. No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config files, event files).
//!
//! [`modules`] binds the core computations to labelled event products, and
//! [`path`] runs a configured sequence of modules over every event.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod modules;
pub mod path;
pub mod serde_utils;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
