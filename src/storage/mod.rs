//! Core data structures and snapshot storage.
//!
//! This module holds the merged entry model shared by the builder and the
//! readers, and the snapshot format used to persist it between runs.

pub mod entry;
pub mod snapshot;

pub use entry::{Distribution, LexiconEntry, MorphologyStats, SampleForm, UNKNOWN_PART_OF_SPEECH};
