//! I/O helpers for `leptons` commands.

pub mod config;
pub mod event_file;
