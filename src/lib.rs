//! # Lexicon - Dictionary Build & Retrieval Engine
//!
//! This crate builds and serves a cross-referenced lexicon: a structured
//! dictionary enriched with per-headword grammatical statistics drawn from a
//! morphologically tagged corpus.
//!
//! ## Features
//!
//! - **Dictionary parsing**: Stream an XML dictionary into articles with definitions, etymology and cross references
//! - **Morphology decoding**: Turn fixed-width positional codes into typed grammatical features
//! - **Corpus aggregation**: Fold corpus files in parallel into per-lemma feature distributions
//! - **Merging**: Join both sources by diacritic-insensitive normalized keys
//! - **Lookup & search**: Exact id, headword and transliteration lookups plus weighted ranked search
//! - **Snapshots**: Deterministic JSON snapshots so the build runs once per source revision
//!
//! ## Quick Start
//!
//! ### Building a Lexicon
//!
//! ```no_run
//! use lexicon::builder::{BuilderConfig, LexiconBuilder};
//!
//! # fn main() -> lexicon::Result<()> {
//! let config = BuilderConfig {
//!     dictionary_path: "strongsgreek.xml".to_string(),
//!     corpus_path: "morphgnt/".to_string(),
//!     snapshot_path: "lexicon.json".to_string(),
//!     ..BuilderConfig::default()
//! };
//! let report = LexiconBuilder::build_snapshot(&config, None)?;
//! println!("{} entries, {} with corpus data", report.entries, report.entries_with_corpus_data);
//! # Ok(())
//! # }
//! ```
//!
//! ### Querying a Snapshot
//!
//! ```no_run
//! use lexicon::readers::LexiconReader;
//!
//! # fn main() -> lexicon::Result<()> {
//! let reader = LexiconReader::from_snapshot_file("lexicon.json")?;
//! if let Some(entry) = reader.lookup_by_id("G25") {
//!     println!("{}: {}", entry.headword, entry.morphology_summary());
//! }
//! for hit in reader.search("love", 5) {
//!     println!("{} {}", hit.score, hit.entry.id);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **Builder modules**: [`builder`] for parsing, aggregation, merging and the build pipeline
//! - **Morphology**: [`morphology`] for part-of-speech labels and code decoding
//! - **Storage & core types**: [`storage`] for the entry model and snapshot format
//! - **Reader modules**: [`readers`] for indices, search and the query service
//! - **Utilities**: [`utils`] for key normalization, file discovery and progress reporting
//!
//! ## Error Handling
//!
//! All fallible operations return a [`Result<T>`] type, where errors are represented by
//! [`LexiconError`]. The crate uses the `snafu` library for ergonomic error handling with
//! context and backtraces. Lookups that find nothing return `None` or an empty list.

pub mod builder;
pub mod error;
pub mod morphology;
pub mod readers;
pub mod storage;
pub mod utils;

// Re-export commonly used types for convenience
pub use builder::{BuildReport, BuilderConfig, LexiconBuilder};
pub use readers::{DefinitionFormat, LexiconHandle, LexiconIndex, LexiconReader, LexiconStats, SearchHit};
pub use storage::{LexiconEntry, MorphologyStats, SampleForm};

// Re-export error types for convenience
pub use error::{LexiconError, Result, snafu};
