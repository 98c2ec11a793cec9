//! Lexicon build pipeline.
//!
//! This module drives a full build: parse the dictionary, aggregate the
//! corpus, merge the two, index the merged entries and optionally publish a
//! snapshot.
//!
//! # Build stages
//!
//! 1. **Dictionary**: `DictionaryParser` reads the article file
//! 2. **Corpus**: `CorpusAggregator` folds every corpus file into per-lemma statistics
//! 3. **Merge**: articles are joined with statistics by normalized headword
//! 4. **Index**: `LexiconIndex` rejects duplicate identifiers and builds the lookup maps
//! 5. **Snapshot**: the entry set is written only if every earlier stage succeeded
//!
//! A missing dictionary or corpus source is logged and treated as empty.
//! Duplicate identifiers abort the build before anything is written.
//!
//! # Examples
//!
//! ## Basic Build
//!
//! ```no_run
//! use lexicon::builder::{BuilderConfig, LexiconBuilder};
//!
//! # fn main() -> lexicon::Result<()> {
//! let mut config = BuilderConfig::default();
//! config.dictionary_path = "/data/strongsgreek.xml".to_string();
//! config.corpus_path = "/data/morphgnt".to_string();
//! config.snapshot_path = "/data/lexicon.json".to_string();
//!
//! let report = LexiconBuilder::build_snapshot(&config, None)?;
//! println!("{} entries", report.entries);
//! # Ok(())
//! # }
//! ```
//!
//! ## JSON Configuration
//!
//! ```no_run
//! use lexicon::builder::{BuilderConfig, LexiconBuilder};
//!
//! # fn main() -> lexicon::Result<()> {
//! let config = BuilderConfig::from_json_file("lexicon.json")?;
//! let (index, report) = LexiconBuilder::build_with_config(&config, None)?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use log::*;
use serde::{Deserialize, Serialize};

use crate::builder::corpus_aggregator::{AggregationReport, CorpusAggregator, CorpusStats};
use crate::builder::dictionary_parser::{DictionaryArticle, DictionaryParser, ParseReport};
use crate::builder::merger::merge;
use crate::readers::LexiconIndex;
use crate::storage::snapshot;
use crate::utils::progress_report::ProgressReportFn;
use crate::utils::string_from_file;
use crate::{LexiconError, Result};

/// Identifier prefix used when none is configured.
pub const DEFAULT_ID_PREFIX: &str = "G";

/// Configuration for building a lexicon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Path to the dictionary XML file
    pub dictionary_path: String,
    /// Corpus file, or a directory of corpus files
    pub corpus_path: String,
    /// Regex matched against file names when `corpus_path` is a directory
    pub corpus_file_pattern: String,
    /// Where `build_snapshot` writes the merged entries
    pub snapshot_path: String,
    /// Letter prepended to numeric dictionary identifiers
    pub id_prefix: String,
    /// `language` attribute value of same-language cross references
    pub cross_ref_language: String,
    /// Distinct surface forms kept per lemma
    pub sample_form_cap: usize,
    /// Aggregate corpus files in parallel
    pub parallel: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        BuilderConfig {
            dictionary_path: String::new(),
            corpus_path: String::new(),
            corpus_file_pattern: r"-morphgnt\.txt$".to_string(),
            snapshot_path: String::new(),
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            cross_ref_language: "GREEK".to_string(),
            sample_form_cap: 10,
            parallel: true,
        }
    }
}

impl BuilderConfig {
    /// Loads a configuration from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = string_from_file(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Counters describing a finished build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub articles_parsed: usize,
    pub articles_skipped: usize,
    pub files_processed: usize,
    pub files_skipped: usize,
    pub lines_read: usize,
    pub malformed_lines: usize,
    pub distinct_lemmas: usize,
    pub entries: usize,
    pub entries_with_corpus_data: usize,
}

/// Runs the build pipeline.
pub struct LexiconBuilder;

impl LexiconBuilder {
    /// Builds an in-memory index from the configured sources.
    ///
    /// # Errors
    ///
    /// Fails with `DuplicateIdentifier` if two articles share an id, or
    /// `UserInterrupted` if the progress callback cancels.
    pub fn build_with_config(
        config: &BuilderConfig,
        prog_rpt: Option<ProgressReportFn>,
    ) -> Result<(LexiconIndex, BuildReport)> {
        let (articles, parse_report) = Self::load_dictionary(config)?;
        let (corpus, aggregation_report) = Self::load_corpus(config, prog_rpt)?;

        let (entries, merge_report) = merge(articles, &corpus);
        let index = LexiconIndex::with_id_prefix(entries, &config.id_prefix)?;

        let report = BuildReport {
            articles_parsed: parse_report.articles_parsed,
            articles_skipped: parse_report.articles_skipped,
            files_processed: aggregation_report.files_processed,
            files_skipped: aggregation_report.files_skipped,
            lines_read: aggregation_report.lines_read,
            malformed_lines: aggregation_report.malformed_lines,
            distinct_lemmas: aggregation_report.distinct_lemmas,
            entries: merge_report.entries,
            entries_with_corpus_data: merge_report.entries_with_corpus_data,
        };
        info!("Build finished: {:?}", report);
        Ok((index, report))
    }

    /// Builds and writes a snapshot to `config.snapshot_path`.
    pub fn build_snapshot(config: &BuilderConfig, prog_rpt: Option<ProgressReportFn>) -> Result<BuildReport> {
        if config.snapshot_path.is_empty() {
            return Err(LexiconError::invalid_parameter("Snapshot path cannot be empty"));
        }
        let (index, report) = Self::build_with_config(config, prog_rpt)?;
        snapshot::save_to_file(index.entries(), &config.snapshot_path)?;
        Ok(report)
    }

    fn load_dictionary(config: &BuilderConfig) -> Result<(Vec<DictionaryArticle>, ParseReport)> {
        let parser = DictionaryParser::from_config(config);
        match parser.parse_file(&config.dictionary_path) {
            Err(e) if e.is_source_not_found() => {
                warn!("Dictionary source not found ({}); building without articles", e);
                Ok((Vec::new(), ParseReport::default()))
            }
            result => result,
        }
    }

    fn load_corpus(
        config: &BuilderConfig,
        prog_rpt: Option<ProgressReportFn>,
    ) -> Result<(CorpusStats, AggregationReport)> {
        let aggregator = CorpusAggregator::from_config(config)?;
        match aggregator.aggregate_path(&config.corpus_path, prog_rpt) {
            Err(e) if e.is_source_not_found() => {
                warn!("Corpus source not found ({}); building without corpus statistics", e);
                Ok((CorpusStats::new(config.sample_form_cap), AggregationReport::default()))
            }
            result => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const DICTIONARY: &str = r#"<entries>
<entry strongs="25"><greek unicode="ἀγαπάω" translit="agapáō"/><strongs_def>to love</strongs_def></entry>
<entry strongs="1"><greek unicode="Α" translit="A"/></entry>
</entries>"#;

    #[test]
    fn test_config_defaults_and_partial_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"dictionary_path": "dict.xml", "parallel": false}"#).unwrap();

        let config = BuilderConfig::from_json_file(&path).unwrap();
        assert_eq!(config.dictionary_path, "dict.xml");
        assert!(!config.parallel);
        assert_eq!(config.id_prefix, "G");
        assert_eq!(config.sample_form_cap, 10);
        assert_eq!(config.corpus_file_pattern, r"-morphgnt\.txt$");
    }

    #[test]
    fn test_missing_sources_build_empty_lexicon() {
        let config = BuilderConfig {
            dictionary_path: "/nonexistent/dict.xml".to_string(),
            corpus_path: "/nonexistent/corpus".to_string(),
            ..BuilderConfig::default()
        };
        let (index, report) = LexiconBuilder::build_with_config(&config, None).unwrap();
        assert!(index.is_empty());
        assert_eq!(report, BuildReport::default());
    }

    #[test]
    fn test_missing_corpus_keeps_dictionary() {
        let dir = tempfile::tempdir().unwrap();
        let dictionary_path = dir.path().join("dict.xml");
        fs::write(&dictionary_path, DICTIONARY).unwrap();
        let config = BuilderConfig {
            dictionary_path: dictionary_path.display().to_string(),
            corpus_path: dir.path().join("absent").display().to_string(),
            ..BuilderConfig::default()
        };
        let (index, report) = LexiconBuilder::build_with_config(&config, None).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(report.articles_parsed, 2);
        assert_eq!(report.entries_with_corpus_data, 0);
    }

    #[test]
    fn test_duplicate_ids_abort_before_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let dictionary_path = dir.path().join("dict.xml");
        fs::write(
            &dictionary_path,
            r#"<entries>
<entry strongs="25"><greek unicode="ἀγαπάω"/></entry>
<entry strongs="0025"><greek unicode="ἀγάπη"/></entry>
</entries>"#,
        )
        .unwrap();
        let snapshot_path = dir.path().join("lexicon.json");
        let config = BuilderConfig {
            dictionary_path: dictionary_path.display().to_string(),
            snapshot_path: snapshot_path.display().to_string(),
            ..BuilderConfig::default()
        };
        let err = LexiconBuilder::build_snapshot(&config, None).unwrap_err();
        assert!(err.is_duplicate_identifier());
        assert!(!snapshot_path.exists());
    }

    #[test]
    fn test_snapshot_path_is_required() {
        let err = LexiconBuilder::build_snapshot(&BuilderConfig::default(), None).unwrap_err();
        assert!(matches!(err, LexiconError::InvalidParameter { .. }));
    }
}
