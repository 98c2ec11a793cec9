//! In-memory indices over a merged entry set, and ranked search.
//!
//! A [`LexiconIndex`] owns its entries and three lookup maps:
//!
//! - primary: normalized id → entry
//! - lemma: normalized headword → entries sharing it (homographs)
//! - transliteration: case-folded romanization → entries
//!
//! All of them are built in one pass and never change afterwards, so an
//! index can be shared across threads without locking.
//!
//! # Ranking
//!
//! [`LexiconIndex::search`] scores every entry independently and sums the
//! weights of all fields that match:
//!
//! | Field | Match | Weight |
//! |-------|-------|--------|
//! | id | equal, with or without prefix | [`SCORE_ID`] |
//! | headword | normalized contains | [`SCORE_HEADWORD`] |
//! | transliteration | contains | [`SCORE_TRANSLITERATION`] |
//! | primary definition | contains | [`SCORE_DEFINITION_PRIMARY`] |
//! | secondary definition | contains | [`SCORE_DEFINITION_SECONDARY`] |
//! | derivation | contains | [`SCORE_DERIVATION`] |
//!
//! Text comparisons are case-insensitive. Hits are sorted by descending
//! score with a stable sort, so equal scores keep entry-set order.

use std::collections::HashMap;

use log::debug;

use crate::builder::DEFAULT_ID_PREFIX;
use crate::storage::LexiconEntry;
use crate::utils::{normalize_id, normalize_key, normalize_transliteration};
use crate::{LexiconError, Result};

pub const SCORE_ID: u32 = 100;
pub const SCORE_HEADWORD: u32 = 50;
pub const SCORE_TRANSLITERATION: u32 = 40;
pub const SCORE_DEFINITION_PRIMARY: u32 = 20;
pub const SCORE_DEFINITION_SECONDARY: u32 = 15;
pub const SCORE_DERIVATION: u32 = 5;

/// A search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit<'a> {
    pub entry: &'a LexiconEntry,
    pub score: u32,
}

/// Lowercased copies of the searchable fields of one entry.
#[derive(Debug, Default)]
struct SearchFields {
    id: String,
    headword: String,
    transliteration: String,
    definition_primary: String,
    definition_secondary: String,
    derivation: String,
}

fn lowercase(value: &Option<String>) -> String {
    value.as_deref().map(str::to_lowercase).unwrap_or_default()
}

/// Query forms compared against [`SearchFields`].
struct PreparedQuery {
    id: String,
    key: String,
    text: String,
}

#[derive(Debug)]
pub struct LexiconIndex {
    entries: Vec<LexiconEntry>,
    id_prefix: String,
    by_id: HashMap<String, usize>,
    by_lemma: HashMap<String, Vec<usize>>,
    by_transliteration: HashMap<String, Vec<usize>>,
    search_fields: Vec<SearchFields>,
}

impl LexiconIndex {
    /// Indexes `entries` with the default identifier prefix.
    pub fn new(entries: Vec<LexiconEntry>) -> Result<Self> {
        Self::with_id_prefix(entries, DEFAULT_ID_PREFIX)
    }

    /// Indexes `entries`.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateIdentifier` if two entries normalize to the same id.
    pub fn with_id_prefix(entries: Vec<LexiconEntry>, id_prefix: &str) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(entries.len());
        let mut by_lemma: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_transliteration: HashMap<String, Vec<usize>> = HashMap::new();
        let mut search_fields = Vec::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            let id = normalize_id(&entry.id, id_prefix);
            if by_id.insert(id.clone(), index).is_some() {
                return Err(LexiconError::duplicate_identifier(entry.id.clone()));
            }

            let headword = normalize_key(&entry.headword);
            if !headword.is_empty() {
                by_lemma.entry(headword.clone()).or_default().push(index);
            }
            if let Some(transliteration) = entry.transliteration.as_deref() {
                let transliteration = normalize_transliteration(transliteration);
                if !transliteration.is_empty() {
                    by_transliteration.entry(transliteration).or_default().push(index);
                }
            }

            search_fields.push(SearchFields {
                id,
                headword,
                transliteration: lowercase(&entry.transliteration),
                definition_primary: lowercase(&entry.definition_primary),
                definition_secondary: lowercase(&entry.definition_secondary),
                derivation: lowercase(&entry.derivation),
            });
        }

        debug!(
            "Indexed {} entries ({} lemma keys, {} transliteration keys)",
            entries.len(),
            by_lemma.len(),
            by_transliteration.len()
        );
        Ok(Self {
            entries,
            id_prefix: id_prefix.to_string(),
            by_id,
            by_lemma,
            by_transliteration,
            search_fields,
        })
    }

    /// All entries in entry-set order.
    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn id_prefix(&self) -> &str {
        &self.id_prefix
    }

    /// Finds an entry by id. `25`, `g25` and `G0025` all find `G25`.
    pub fn get(&self, id: &str) -> Option<&LexiconEntry> {
        let id = normalize_id(id, &self.id_prefix);
        self.by_id.get(&id).map(|index| &self.entries[*index])
    }

    /// Entries whose headword normalizes to the same key as `text`.
    pub fn find_by_headword(&self, text: &str) -> Vec<&LexiconEntry> {
        self.entries_at(self.by_lemma.get(&normalize_key(text)))
    }

    /// Entries whose transliteration equals `text`, ignoring case.
    pub fn find_by_transliteration(&self, text: &str) -> Vec<&LexiconEntry> {
        self.entries_at(self.by_transliteration.get(&normalize_transliteration(text)))
    }

    fn entries_at(&self, indices: Option<&Vec<usize>>) -> Vec<&LexiconEntry> {
        indices
            .map(|indices| indices.iter().map(|index| &self.entries[*index]).collect())
            .unwrap_or_default()
    }

    /// Ranks entries against `query` and returns at most `limit` hits.
    ///
    /// A blank query matches nothing.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit<'_>> {
        let text = query.trim().to_lowercase();
        if text.is_empty() || limit == 0 {
            return Vec::new();
        }
        let query = PreparedQuery {
            id: normalize_id(&text, &self.id_prefix),
            key: normalize_key(&text),
            text,
        };

        let mut hits: Vec<SearchHit> = self
            .entries
            .iter()
            .zip(&self.search_fields)
            .filter_map(|(entry, fields)| {
                let score = Self::score(fields, &query);
                (score > 0).then_some(SearchHit { entry, score })
            })
            .collect();
        hits.sort_by(|a, b| b.score.cmp(&a.score));
        hits.truncate(limit);
        hits
    }

    fn score(fields: &SearchFields, query: &PreparedQuery) -> u32 {
        let mut score = 0;
        if fields.id == query.id {
            score += SCORE_ID;
        }
        if !query.key.is_empty() && fields.headword.contains(&query.key) {
            score += SCORE_HEADWORD;
        }
        let text = query.text.as_str();
        if fields.transliteration.contains(text) {
            score += SCORE_TRANSLITERATION;
        }
        if fields.definition_primary.contains(text) {
            score += SCORE_DEFINITION_PRIMARY;
        }
        if fields.definition_secondary.contains(text) {
            score += SCORE_DEFINITION_SECONDARY;
        }
        if fields.derivation.contains(text) {
            score += SCORE_DERIVATION;
        }
        score
    }
}
