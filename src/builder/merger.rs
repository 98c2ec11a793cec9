//! Joins dictionary articles with corpus statistics.
//!
//! The dictionary is the authoritative entry set: every article yields
//! exactly one [`LexiconEntry`], in article order. Corpus statistics whose
//! lemma matches no headword are dropped.

use log::{debug, info};

use crate::builder::corpus_aggregator::CorpusStats;
use crate::builder::dictionary_parser::DictionaryArticle;
use crate::morphology::pos_label;
use crate::storage::{LexiconEntry, UNKNOWN_PART_OF_SPEECH};
use crate::utils::normalize_key;

/// Counters collected while merging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub entries: usize,
    pub entries_with_corpus_data: usize,
    pub unmatched_lemmas: usize,
}

/// Merges `articles` with `corpus`, consuming both.
///
/// Homographs share a normalized key, so every article with that key gets a
/// copy of the same statistics.
pub fn merge(articles: Vec<DictionaryArticle>, corpus: &CorpusStats) -> (Vec<LexiconEntry>, MergeReport) {
    let mut report = MergeReport::default();
    let mut matched_keys = std::collections::HashSet::new();
    let mut entries = Vec::with_capacity(articles.len());

    for article in articles {
        let key = normalize_key(&article.headword);
        let mut entry = LexiconEntry {
            id: article.id,
            headword: article.headword,
            transliteration: article.transliteration,
            beta_code: article.beta_code,
            pronunciation: article.pronunciation,
            part_of_speech: Some(UNKNOWN_PART_OF_SPEECH.to_string()),
            pos_code: None,
            definition_primary: article.definition_primary,
            definition_secondary: article.definition_secondary,
            derivation: article.derivation,
            cross_refs: article.cross_refs,
            morphology: None,
        };

        if let Some(lemma) = corpus.get(&key) {
            if let Some(pos_tag) = lemma.most_frequent_pos() {
                entry.part_of_speech = Some(pos_label(pos_tag));
                entry.pos_code = Some(pos_tag.to_string());
            }
            entry.morphology = Some(lemma.stats.clone());
            report.entries_with_corpus_data += 1;
            matched_keys.insert(key);
        } else {
            debug!("No corpus data for {} ({})", entry.id, entry.headword);
        }
        entries.push(entry);
    }

    report.entries = entries.len();
    report.unmatched_lemmas = corpus.len() - matched_keys.len();
    info!(
        "Merged {} entries, {} with corpus data ({} corpus lemmas unmatched)",
        report.entries, report.entries_with_corpus_data, report.unmatched_lemmas
    );
    (entries, report)
}
