//! Testing infrastructure for chronicle.
//!
//! Builders for change and ticket records with sensible defaults, so tests
//! only spell out the fields that matter to them. Property-test strategies
//! live in `proptest_generators` and are only compiled for unit tests
//! (proptest is a dev-dependency).

pub mod helpers;

#[cfg(test)]
pub mod proptest_generators;

pub use helpers::{ts, ChangeBuilder, TicketBuilder};
