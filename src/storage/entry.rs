//! Lexicon entry and corpus statistics records.
//!
//! A [`LexiconEntry`] is the unit the whole engine produces and serves: a
//! dictionary article merged with whatever the corpus taught us about the
//! headword. Entries are built once per source revision and never mutated
//! afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::morphology::{Dimension, FeatureSet};

/// Part-of-speech label used when the corpus never saw the headword.
pub const UNKNOWN_PART_OF_SPEECH: &str = "Unknown";

/// Occurrence count per feature value for one grammatical dimension.
pub type Distribution = BTreeMap<String, u64>;

/// An observed surface form with its raw code and decoded features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleForm {
    /// Surface form with trailing punctuation removed
    pub word: String,
    /// Raw morphology code of the first occurrence of this form
    pub morph: String,
    /// Decoded features of that occurrence
    pub parsed: FeatureSet,
}

/// Corpus-derived statistics for a single headword.
///
/// For every dimension the sum of its distribution never exceeds
/// `total_occurrences`; not every occurrence carries every feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorphologyStats {
    /// Number of corpus lines mapped to this headword
    pub total_occurrences: u64,
    #[serde(default)]
    pub tenses: Distribution,
    #[serde(default)]
    pub voices: Distribution,
    #[serde(default)]
    pub moods: Distribution,
    #[serde(default)]
    pub cases: Distribution,
    #[serde(default)]
    pub numbers: Distribution,
    #[serde(default)]
    pub genders: Distribution,
    #[serde(default)]
    pub persons: Distribution,
    /// First distinct surface forms seen, in corpus order
    #[serde(default)]
    pub sample_forms: Vec<SampleForm>,
}

impl MorphologyStats {
    pub fn distribution(&self, dimension: Dimension) -> &Distribution {
        match dimension {
            Dimension::Tense => &self.tenses,
            Dimension::Voice => &self.voices,
            Dimension::Mood => &self.moods,
            Dimension::Case => &self.cases,
            Dimension::Number => &self.numbers,
            Dimension::Gender => &self.genders,
            Dimension::Person => &self.persons,
        }
    }

    pub fn distribution_mut(&mut self, dimension: Dimension) -> &mut Distribution {
        match dimension {
            Dimension::Tense => &mut self.tenses,
            Dimension::Voice => &mut self.voices,
            Dimension::Mood => &mut self.moods,
            Dimension::Case => &mut self.cases,
            Dimension::Number => &mut self.numbers,
            Dimension::Gender => &mut self.genders,
            Dimension::Person => &mut self.persons,
        }
    }

    /// Counts one occurrence of every feature in `features`.
    pub fn record_features(&mut self, features: &FeatureSet) {
        for (dimension, value) in features.features() {
            *self.distribution_mut(dimension).entry(value.to_string()).or_insert(0) += 1;
        }
    }

    /// Adds another set of counters into this one. Sample forms are not touched.
    pub fn add_counts(&mut self, other: &MorphologyStats) {
        self.total_occurrences += other.total_occurrences;
        for dimension in Dimension::ALL {
            let target = self.distribution_mut(dimension);
            for (value, count) in other.distribution(dimension) {
                *target.entry(value.clone()).or_insert(0) += count;
            }
        }
    }

    /// Most frequent values of a dimension, highest count first.
    ///
    /// Equal counts keep alphabetical order.
    pub fn top(&self, dimension: Dimension, limit: usize) -> Vec<(&str, u64)> {
        let mut values: Vec<(&str, u64)> = self
            .distribution(dimension)
            .iter()
            .map(|(value, count)| (value.as_str(), *count))
            .collect();
        values.sort_by(|a, b| b.1.cmp(&a.1));
        values.truncate(limit);
        values
    }

    fn format_top(&self, dimension: Dimension, limit: usize) -> String {
        self.top(dimension, limit)
            .iter()
            .map(|(value, count)| format!("{} ({})", value, count))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Human-readable multi-line summary of the statistics.
    pub fn summary(&self) -> String {
        let mut lines = vec![format!("Occurs {} times in the corpus", self.total_occurrences)];
        let sections = [
            (Dimension::Tense, "Common tenses", 3),
            (Dimension::Voice, "Voices", usize::MAX),
            (Dimension::Case, "Common cases", 3),
            (Dimension::Number, "Number", usize::MAX),
            (Dimension::Gender, "Gender", usize::MAX),
        ];
        for (dimension, title, limit) in sections {
            if !self.distribution(dimension).is_empty() {
                lines.push(format!("{}: {}", title, self.format_top(dimension, limit)));
            }
        }
        lines.join("\n")
    }
}

/// A dictionary article merged with its corpus statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconEntry {
    /// Unique identifier, e.g. `G25`
    pub id: String,
    /// Native-script dictionary form
    pub headword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transliteration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    /// Most frequent raw corpus POS tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition_primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition_secondary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derivation: Option<String>,
    /// Referenced entry ids; may name entries absent from the lexicon
    #[serde(default)]
    pub cross_refs: Vec<String>,
    /// `None` when the headword never occurs in the corpus
    #[serde(default)]
    pub morphology: Option<MorphologyStats>,
}

impl LexiconEntry {
    pub fn has_corpus_data(&self) -> bool {
        self.morphology.is_some()
    }

    pub fn part_of_speech_or_unknown(&self) -> &str {
        self.part_of_speech.as_deref().unwrap_or(UNKNOWN_PART_OF_SPEECH)
    }

    /// Morphology summary, or a note that the headword never occurs.
    pub fn morphology_summary(&self) -> String {
        match &self.morphology {
            Some(stats) => stats.summary(),
            None => "This word does not occur in the corpus.".to_string(),
        }
    }

    /// Renders the entry as a plain-text document for external semantic indexing.
    pub fn document_text(&self) -> String {
        let mut parts = vec![
            format!(
                "{}: {} ({})",
                self.id,
                self.headword,
                self.transliteration.as_deref().unwrap_or_default()
            ),
            format!("Part of Speech: {}", self.part_of_speech_or_unknown()),
        ];
        if let Some(definition) = non_empty(&self.definition_primary) {
            parts.push(format!("\nDefinition: {}", definition));
        }
        if let Some(definition) = non_empty(&self.definition_secondary) {
            parts.push(format!("Usage: {}", definition));
        }
        if let Some(derivation) = non_empty(&self.derivation) {
            parts.push(format!("\nEtymology: {}", derivation));
        }
        if let Some(stats) = &self.morphology {
            parts.push(format!("\nOccurrences in corpus: {}", stats.total_occurrences));
            if !stats.tenses.is_empty() {
                parts.push(format!("Common tenses: {}", stats.format_top(Dimension::Tense, 3)));
            }
            if !stats.cases.is_empty() {
                parts.push(format!("Common cases: {}", stats.format_top(Dimension::Case, 3)));
            }
        }
        parts.join("\n")
    }
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
