//! Read-only query service over a lexicon snapshot.
//!
//! [`LexiconReader`] is the object handed to consumers (web handlers, the
//! CLI, study tools). It is cheap to clone and shares one immutable
//! [`LexiconIndex`]. "Not found" is always a value (`None` or an empty
//! list), never an error.
//!
//! [`LexiconHandle`] holds the current reader for a long-running service and
//! lets a rebuild publish a new one atomically: queries already holding the
//! old reader finish against it undisturbed.
//!
//! # Examples
//!
//! ```no_run
//! use lexicon::readers::{LexiconHandle, LexiconReader};
//!
//! # fn main() -> lexicon::Result<()> {
//! let handle = LexiconHandle::new(LexiconReader::from_snapshot_file("lexicon.json")?);
//!
//! let reader = handle.current();
//! if let Some(entry) = reader.lookup_by_id("G25") {
//!     println!("{} {}", entry.id, entry.headword);
//! }
//! for hit in reader.search("love", 10) {
//!     println!("{:>4} {}", hit.score, hit.entry.id);
//! }
//!
//! handle.swap(LexiconReader::from_snapshot_file("lexicon-new.json")?);
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Arc, RwLock};

use serde::Serialize;

use super::lexicon_index::{LexiconIndex, SearchHit};
use crate::builder::{BuilderConfig, DEFAULT_ID_PREFIX};
use crate::storage::entry::non_empty;
use crate::storage::{snapshot, LexiconEntry, SampleForm};
use crate::Result;

/// Length of the fallback short definition when there is no sentence break.
const SHORT_DEFINITION_CHARS: usize = 100;

/// Which definition text [`LexiconReader::definition`] renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefinitionFormat {
    Primary,
    Secondary,
    /// Both definitions, one labelled line each
    #[default]
    Both,
    /// First sentence of the primary definition, or the secondary one
    Short,
}

impl std::str::FromStr for DefinitionFormat {
    type Err = crate::LexiconError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "primary" => Ok(Self::Primary),
            "secondary" => Ok(Self::Secondary),
            "both" => Ok(Self::Both),
            "short" => Ok(Self::Short),
            other => Err(crate::LexiconError::invalid_parameter(format!(
                "Unknown definition format: {}",
                other
            ))),
        }
    }
}

/// Aggregate figures over the whole entry set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LexiconStats {
    pub total_entries: usize,
    pub entries_with_corpus_data: usize,
    /// Sorted and deduplicated
    pub distinct_parts_of_speech: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct LexiconReader {
    index: Arc<LexiconIndex>,
}

impl LexiconReader {
    pub fn new(index: LexiconIndex) -> Self {
        Self { index: Arc::new(index) }
    }

    /// Builds a reader from a plain entry set, rebuilding every index.
    pub fn from_entries(entries: Vec<LexiconEntry>, id_prefix: &str) -> Result<Self> {
        Ok(Self::new(LexiconIndex::with_id_prefix(entries, id_prefix)?))
    }

    /// Loads a snapshot built with the default id prefix.
    pub fn from_snapshot_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_snapshot_file_with_prefix(path, DEFAULT_ID_PREFIX)
    }

    /// Loads a snapshot and indexes it with `id_prefix`, which must match the
    /// prefix the snapshot was built with.
    pub fn from_snapshot_file_with_prefix<P: AsRef<Path>>(path: P, id_prefix: &str) -> Result<Self> {
        Self::from_entries(snapshot::load_from_file(path)?, id_prefix)
    }

    /// Loads the snapshot named by a build configuration.
    pub fn from_config(config: &BuilderConfig) -> Result<Self> {
        Self::from_snapshot_file_with_prefix(&config.snapshot_path, &config.id_prefix)
    }

    pub fn index(&self) -> &LexiconIndex {
        &self.index
    }

    pub fn lookup_by_id(&self, id: &str) -> Option<&LexiconEntry> {
        self.index.get(id)
    }

    pub fn lookup_by_headword(&self, text: &str) -> Vec<&LexiconEntry> {
        self.index.find_by_headword(text)
    }

    pub fn lookup_by_transliteration(&self, text: &str) -> Vec<&LexiconEntry> {
        self.index.find_by_transliteration(text)
    }

    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit<'_>> {
        self.index.search(query, limit)
    }

    pub fn stats(&self) -> LexiconStats {
        let entries = self.index.entries();
        let parts_of_speech: BTreeSet<&str> = entries.iter().map(|e| e.part_of_speech_or_unknown()).collect();
        LexiconStats {
            total_entries: entries.len(),
            entries_with_corpus_data: entries.iter().filter(|e| e.has_corpus_data()).count(),
            distinct_parts_of_speech: parts_of_speech.into_iter().map(str::to_string).collect(),
        }
    }

    /// Tries `text` as an id, then as a headword, then as a transliteration.
    pub fn resolve(&self, text: &str) -> Vec<&LexiconEntry> {
        if let Some(entry) = self.lookup_by_id(text) {
            return vec![entry];
        }
        let entries = self.lookup_by_headword(text);
        if !entries.is_empty() {
            return entries;
        }
        self.lookup_by_transliteration(text)
    }

    /// The first `limit` entries in entry-set order.
    pub fn entries(&self, limit: usize) -> &[LexiconEntry] {
        let entries = self.index.entries();
        &entries[..limit.min(entries.len())]
    }

    /// Renders a definition of entry `id`.
    ///
    /// Returns `None` if the entry does not exist or has no text for `format`.
    pub fn definition(&self, id: &str, format: DefinitionFormat) -> Option<String> {
        let entry = self.lookup_by_id(id)?;
        let primary = non_empty(&entry.definition_primary);
        let secondary = non_empty(&entry.definition_secondary);
        match format {
            DefinitionFormat::Primary => primary.map(str::to_string),
            DefinitionFormat::Secondary => secondary.map(str::to_string),
            DefinitionFormat::Both => {
                let mut lines = Vec::new();
                if let Some(primary) = primary {
                    lines.push(format!("Primary: {}", primary));
                }
                if let Some(secondary) = secondary {
                    lines.push(format!("Secondary: {}", secondary));
                }
                (!lines.is_empty()).then(|| lines.join("\n"))
            }
            DefinitionFormat::Short => match primary {
                Some(primary) => Some(short_definition(primary)),
                None => secondary.map(str::to_string),
            },
        }
    }

    /// Entries referenced by entry `id`. Dangling references are skipped.
    pub fn cross_references(&self, id: &str) -> Vec<&LexiconEntry> {
        self.lookup_by_id(id)
            .map(|entry| entry.cross_refs.iter().filter_map(|r| self.lookup_by_id(r)).collect())
            .unwrap_or_default()
    }

    pub fn sample_forms(&self, id: &str) -> &[SampleForm] {
        self.lookup_by_id(id)
            .and_then(|entry| entry.morphology.as_ref())
            .map(|stats| stats.sample_forms.as_slice())
            .unwrap_or_default()
    }

    pub fn morphology_summary(&self, id: &str) -> Option<String> {
        self.lookup_by_id(id).map(|entry| entry.morphology_summary())
    }
}

fn short_definition(text: &str) -> String {
    match text.split_once('.') {
        Some((sentence, _)) => sentence.trim().to_string(),
        None => text.chars().take(SHORT_DEFINITION_CHARS).collect::<String>().trim().to_string(),
    }
}

/// Shared slot holding the reader currently being served.
#[derive(Debug)]
pub struct LexiconHandle {
    current: RwLock<Arc<LexiconReader>>,
}

impl LexiconHandle {
    pub fn new(reader: LexiconReader) -> Self {
        Self {
            current: RwLock::new(Arc::new(reader)),
        }
    }

    /// The reader to use for one query or request.
    pub fn current(&self) -> Arc<LexiconReader> {
        let guard = self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Publishes a new reader and returns the previous one.
    pub fn swap(&self, reader: LexiconReader) -> Arc<LexiconReader> {
        let mut guard = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *guard, Arc::new(reader))
    }
}
