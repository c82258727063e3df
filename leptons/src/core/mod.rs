//! Deterministic, pure logic shared by the modules.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod annotate;
pub mod count;
pub mod displacement;
pub mod error;
pub mod event;
pub mod isolation;
pub mod types;
