//! Readers over a built lexicon.
//!
//! Immutable lookup indices with ranked search, and the query service that
//! consumers hold on to.

pub mod lexicon_index;
pub mod lexicon_reader;

pub use lexicon_index::{
    LexiconIndex, SearchHit, SCORE_DEFINITION_PRIMARY, SCORE_DEFINITION_SECONDARY, SCORE_DERIVATION,
    SCORE_HEADWORD, SCORE_ID, SCORE_TRANSLITERATION,
};
pub use lexicon_reader::{DefinitionFormat, LexiconHandle, LexiconReader, LexiconStats};
