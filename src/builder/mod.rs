//! Builder module for lexicon creation
//!
//! This module contains everything that turns raw sources into a lexicon:
//! the dictionary parser, the corpus aggregator, the merger, and the
//! pipeline that chains them and publishes snapshots.

pub mod corpus_aggregator;
pub mod dictionary_parser;
pub mod lexicon_builder;
pub mod merger;

// Re-export commonly used types for convenience
pub use corpus_aggregator::{
    decode_corpus_line, AggregationReport, CorpusAggregator, CorpusRecord, CorpusStats, LemmaStats,
};
pub use dictionary_parser::{DictionaryArticle, DictionaryParser, ParseReport};
pub use lexicon_builder::{BuildReport, BuilderConfig, LexiconBuilder, DEFAULT_ID_PREFIX};
pub use merger::{merge, MergeReport};
