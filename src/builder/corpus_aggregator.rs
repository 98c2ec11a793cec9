//! Per-lemma morphology statistics over a tagged corpus.
//!
//! Each corpus line is one token:
//!
//! ```text
//! REFERENCE POS_TAG MORPH_CODE SURFACE_FORM NORMALIZED_FORM LEMMA [LEMMA_FULL]
//! 040316 V- 3AAI-S-- ἠγάπησεν ἠγάπησεν ἠγάπησε(ν) ἀγαπάω
//! ```
//!
//! Lines are keyed by the normalized lemma (the last lemma column present)
//! and folded into a [`CorpusStats`] map. The fold is associative, so every
//! corpus file is aggregated on its own (in parallel with rayon) and the
//! partial maps are merged afterwards in sorted file order. Merging in a
//! fixed order keeps first-encountered tie-breaks and sample lists stable
//! regardless of thread scheduling.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{debug, info, warn};
use rayon::prelude::*;
use regex::Regex;

use crate::builder::BuilderConfig;
use crate::morphology::{decode, FeatureSet};
use crate::storage::{MorphologyStats, SampleForm};
use crate::utils::{clean_surface_form, normalize_key, resolve_source_files, ProgressReportFn, ProgressState};
use crate::{LexiconError, Result};

/// Minimum number of whitespace-separated columns in a usable corpus line.
pub const CORPUS_MIN_FIELDS: usize = 6;

/// One decoded corpus line, borrowing from the line text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorpusRecord<'a> {
    pub reference: &'a str,
    pub pos_tag: &'a str,
    pub morph_code: &'a str,
    pub surface_form: &'a str,
    pub normalized_form: &'a str,
    /// `LEMMA_FULL` when the line has it, `LEMMA` otherwise
    pub lemma: &'a str,
}

/// Splits a corpus line into its columns.
///
/// All knowledge of the column layout lives here.
pub fn decode_corpus_line(line: &str) -> Result<CorpusRecord<'_>> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < CORPUS_MIN_FIELDS {
        return Err(LexiconError::malformed_record(format!(
            "Expected at least {} fields, found {}",
            CORPUS_MIN_FIELDS,
            fields.len()
        )));
    }
    Ok(CorpusRecord {
        reference: fields[0],
        pos_tag: fields[1],
        morph_code: fields[2],
        surface_form: fields[3],
        normalized_form: fields[4],
        lemma: fields.get(6).copied().unwrap_or(fields[5]),
    })
}

/// Everything accumulated for one normalized lemma.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LemmaStats {
    /// Lemma text as first seen in the corpus
    pub lemma: String,
    pub stats: MorphologyStats,
    /// Occurrences per raw POS tag, in first-encountered order
    pub pos_counts: IndexMap<String, u64>,
}

impl LemmaStats {
    fn new(lemma: &str) -> Self {
        Self {
            lemma: lemma.to_string(),
            ..Self::default()
        }
    }

    fn record(&mut self, record: &CorpusRecord, features: FeatureSet, sample_form_cap: usize) {
        self.stats.total_occurrences += 1;
        self.stats.record_features(&features);
        *self.pos_counts.entry(record.pos_tag.to_string()).or_insert(0) += 1;

        let word = clean_surface_form(record.surface_form);
        if word.is_empty() || self.stats.sample_forms.len() >= sample_form_cap {
            return;
        }
        if !self.stats.sample_forms.iter().any(|form| form.word == word) {
            self.stats.sample_forms.push(SampleForm {
                word: word.to_string(),
                morph: record.morph_code.to_string(),
                parsed: features,
            });
        }
    }

    /// Folds a later partial result into this one.
    fn merge(&mut self, other: LemmaStats, sample_form_cap: usize) {
        self.stats.add_counts(&other.stats);
        for (pos_tag, count) in other.pos_counts {
            *self.pos_counts.entry(pos_tag).or_insert(0) += count;
        }
        for form in other.stats.sample_forms {
            if self.stats.sample_forms.len() >= sample_form_cap {
                break;
            }
            if !self.stats.sample_forms.iter().any(|f| f.word == form.word) {
                self.stats.sample_forms.push(form);
            }
        }
    }

    /// Raw POS tag seen most often. Equal counts go to the tag seen first.
    pub fn most_frequent_pos(&self) -> Option<&str> {
        let mut best: Option<(&str, u64)> = None;
        for (pos_tag, count) in &self.pos_counts {
            if best.is_none_or(|(_, best_count)| *count > best_count) {
                best = Some((pos_tag.as_str(), *count));
            }
        }
        best.map(|(pos_tag, _)| pos_tag)
    }
}

/// Normalized lemma key to accumulated statistics, in first-encountered order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusStats {
    lemmas: IndexMap<String, LemmaStats>,
    sample_form_cap: usize,
}

impl CorpusStats {
    pub fn new(sample_form_cap: usize) -> Self {
        Self {
            lemmas: IndexMap::new(),
            sample_form_cap,
        }
    }

    pub fn len(&self) -> usize {
        self.lemmas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lemmas.is_empty()
    }

    /// Looks up statistics by an already normalized key.
    pub fn get(&self, key: &str) -> Option<&LemmaStats> {
        self.lemmas.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &LemmaStats)> {
        self.lemmas.iter()
    }

    /// Accumulates one decoded line.
    pub fn add_record(&mut self, record: &CorpusRecord) -> Result<()> {
        let key = normalize_key(record.lemma);
        if key.is_empty() {
            return Err(LexiconError::malformed_record(format!("Empty lemma in {}", record.reference)));
        }
        let features = decode(record.pos_tag, record.morph_code);
        let sample_form_cap = self.sample_form_cap;
        self.lemmas
            .entry(key)
            .or_insert_with(|| LemmaStats::new(record.lemma))
            .record(record, features, sample_form_cap);
        Ok(())
    }

    /// Folds statistics gathered from a later source into this map.
    ///
    /// Counters are summed; keys new to this map keep `other`'s order after
    /// the existing ones.
    pub fn merge(&mut self, other: CorpusStats) {
        let sample_form_cap = self.sample_form_cap;
        for (key, stats) in other.lemmas {
            match self.lemmas.get_mut(&key) {
                Some(existing) => existing.merge(stats, sample_form_cap),
                None => {
                    let mut stats = stats;
                    stats.stats.sample_forms.truncate(sample_form_cap);
                    self.lemmas.insert(key, stats);
                }
            }
        }
    }
}

/// Counters collected while aggregating the corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationReport {
    pub files_processed: usize,
    pub files_skipped: usize,
    pub lines_read: usize,
    pub malformed_lines: usize,
    pub distinct_lemmas: usize,
}

impl AggregationReport {
    fn add(&mut self, other: &AggregationReport) {
        self.files_processed += other.files_processed;
        self.files_skipped += other.files_skipped;
        self.lines_read += other.lines_read;
        self.malformed_lines += other.malformed_lines;
    }
}

/// Streams corpus sources into [`CorpusStats`].
#[derive(Debug, Clone)]
pub struct CorpusAggregator {
    file_pattern: Regex,
    sample_form_cap: usize,
    parallel: bool,
}

impl CorpusAggregator {
    /// Creates an aggregator.
    ///
    /// # Arguments
    ///
    /// * `file_pattern` - Regex matched against file names when a corpus path is a directory
    /// * `sample_form_cap` - Maximum number of distinct surface forms kept per lemma
    /// * `parallel` - Aggregate files on the rayon thread pool
    pub fn new(file_pattern: &str, sample_form_cap: usize, parallel: bool) -> Result<Self> {
        Ok(Self {
            file_pattern: Regex::new(file_pattern)?,
            sample_form_cap,
            parallel,
        })
    }

    pub fn from_config(config: &BuilderConfig) -> Result<Self> {
        Self::new(&config.corpus_file_pattern, config.sample_form_cap, config.parallel)
    }

    /// Aggregates in-memory corpus text.
    pub fn aggregate_str(&self, text: &str) -> (CorpusStats, AggregationReport) {
        let mut stats = CorpusStats::new(self.sample_form_cap);
        let mut report = AggregationReport::default();
        for (index, line) in text.lines().enumerate() {
            self.add_line(&mut stats, &mut report, line, index + 1);
        }
        report.distinct_lemmas = stats.len();
        (stats, report)
    }

    /// Aggregates one corpus stream. Lines that are not valid UTF-8 count as malformed.
    pub fn aggregate_reader<R: BufRead>(&self, reader: R) -> Result<(CorpusStats, AggregationReport)> {
        let mut stats = CorpusStats::new(self.sample_form_cap);
        let mut report = AggregationReport::default();
        for (index, line) in reader.split(b'\n').enumerate() {
            let line = line?;
            match std::str::from_utf8(&line) {
                Ok(line) => self.add_line(&mut stats, &mut report, line, index + 1),
                Err(e) => {
                    report.lines_read += 1;
                    report.malformed_lines += 1;
                    debug!("Skipping corpus line {}: {}", index + 1, e);
                }
            }
        }
        report.distinct_lemmas = stats.len();
        Ok((stats, report))
    }

    /// Aggregates a single corpus file.
    pub fn aggregate_file<P: AsRef<Path>>(&self, path: P) -> Result<(CorpusStats, AggregationReport)> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(LexiconError::source_not_found(path.display().to_string()));
        }
        let reader = BufReader::new(File::open(path)?);
        let (stats, mut report) = self.aggregate_reader(reader)?;
        report.files_processed = 1;
        debug!(
            "Aggregated {}: {} lines, {} lemmas",
            path.display(),
            report.lines_read,
            stats.len()
        );
        Ok((stats, report))
    }

    /// Aggregates a list of corpus files and merges the results in list order.
    ///
    /// A file that cannot be read is logged and skipped. The progress
    /// callback sees one step per merged file and may cancel the build.
    pub fn aggregate_files(
        &self,
        files: &[PathBuf],
        prog_rpt: Option<ProgressReportFn>,
    ) -> Result<(CorpusStats, AggregationReport)> {
        let partials: Vec<Result<(CorpusStats, AggregationReport)>> = if self.parallel {
            files.par_iter().map(|path| self.aggregate_file(path)).collect()
        } else {
            files.iter().map(|path| self.aggregate_file(path)).collect()
        };

        let mut progress_state = ProgressState::new("CorpusAggregator::aggregate_files", files.len() as u64, 5, prog_rpt);
        let mut stats = CorpusStats::new(self.sample_form_cap);
        let mut report = AggregationReport::default();
        for (index, (path, partial)) in files.iter().zip(partials).enumerate() {
            match partial {
                Ok((partial_stats, partial_report)) => {
                    stats.merge(partial_stats);
                    report.add(&partial_report);
                }
                Err(e) => {
                    warn!("Skipping corpus file {}: {}", path.display(), e);
                    report.files_skipped += 1;
                }
            }
            if progress_state.report(index as u64) {
                info!("Corpus aggregation cancelled by user");
                return Err(LexiconError::user_interrupted());
            }
        }
        report.distinct_lemmas = stats.len();
        Ok((stats, report))
    }

    /// Aggregates a corpus file, or every matching file in a directory.
    ///
    /// # Errors
    ///
    /// Returns `SourceNotFound` when `path` does not exist.
    pub fn aggregate_path<P: AsRef<Path>>(
        &self,
        path: P,
        prog_rpt: Option<ProgressReportFn>,
    ) -> Result<(CorpusStats, AggregationReport)> {
        let path = path.as_ref();
        let files = resolve_source_files(path, &self.file_pattern)?;
        info!("Aggregating {} corpus file(s) from {}", files.len(), path.display());
        let (stats, report) = self.aggregate_files(&files, prog_rpt)?;
        info!(
            "Aggregated {} lines from {} files into {} lemmas ({} malformed lines)",
            report.lines_read, report.files_processed, report.distinct_lemmas, report.malformed_lines
        );
        Ok((stats, report))
    }

    fn add_line(&self, stats: &mut CorpusStats, report: &mut AggregationReport, line: &str, line_no: usize) {
        if line.trim().is_empty() {
            return;
        }
        report.lines_read += 1;
        let result = decode_corpus_line(line).and_then(|record| stats.add_record(&record));
        if let Err(e) = result {
            report.malformed_lines += 1;
            debug!("Skipping corpus line {}: {}", line_no, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const AGAPAO_LINES: &str = "\
040316 V- 3AAI-S-- ἠγάπησεν ἠγάπησεν ἠγάπησε(ν) ἀγαπάω
040335 V- 3PAI-S-- ἀγαπᾷ. ἀγαπᾷ ἀγαπᾷ ἀγαπάω
041321 V- 3PAI-S-- ἀγαπᾷ, ἀγαπᾷ ἀγαπᾷ ἀγαπάω
";

    fn aggregator(cap: usize, parallel: bool) -> CorpusAggregator {
        CorpusAggregator::new(r"-morphgnt\.txt$", cap, parallel).unwrap()
    }

    #[test]
    fn test_decode_corpus_line() {
        let record = decode_corpus_line("040316 V- 3AAI-S-- ἠγάπησεν ἠγάπησεν ἠγάπησε(ν) ἀγαπάω").unwrap();
        assert_eq!(record.pos_tag, "V-");
        assert_eq!(record.morph_code, "3AAI-S--");
        assert_eq!(record.lemma, "ἀγαπάω");

        let record = decode_corpus_line("010101 N- ----NSF- Βίβλος Βίβλος βίβλος").unwrap();
        assert_eq!(record.lemma, "βίβλος");

        let err = decode_corpus_line("010101 N- ----NSF- Βίβλος").unwrap_err();
        assert!(err.is_malformed_record());
    }

    #[test]
    fn test_counts_and_samples() {
        let (stats, report) = aggregator(10, false).aggregate_str(AGAPAO_LINES);
        assert_eq!(report.lines_read, 3);
        assert_eq!(report.malformed_lines, 0);
        assert_eq!(report.distinct_lemmas, 1);

        let lemma = stats.get(&normalize_key("ἀγαπάω")).unwrap();
        assert_eq!(lemma.stats.total_occurrences, 3);
        assert_eq!(lemma.stats.tenses.get("Present"), Some(&2));
        assert_eq!(lemma.stats.tenses.get("Aorist"), Some(&1));
        let words: Vec<&str> = lemma.stats.sample_forms.iter().map(|f| f.word.as_str()).collect();
        assert_eq!(words, vec!["ἠγάπησεν", "ἀγαπᾷ"]);
        assert_eq!(lemma.stats.sample_forms[1].morph, "3PAI-S--");
        assert_eq!(lemma.most_frequent_pos(), Some("V-"));
    }

    #[test]
    fn test_malformed_lines_are_counted() {
        let text = "010101 N- ----NSF-\n\n010102 N- ----NSF- Βίβλος Βίβλος βίβλος\n";
        let (stats, report) = aggregator(10, false).aggregate_str(text);
        assert_eq!(report.lines_read, 2);
        assert_eq!(report.malformed_lines, 1);
        assert_eq!(stats.len(), 1);
    }

    #[test]
    fn test_sample_forms_are_capped_first_seen() {
        let text = "\
1 N- ----NSM- λόγος x λόγος
2 N- ----GSM- λόγου x λόγος
3 N- ----DSM- λόγῳ x λόγος
4 N- ----ASM- λόγον x λόγος
";
        let (stats, _) = aggregator(2, false).aggregate_str(text);
        let lemma = stats.get("λογος").unwrap();
        assert_eq!(lemma.stats.total_occurrences, 4);
        let words: Vec<&str> = lemma.stats.sample_forms.iter().map(|f| f.word.as_str()).collect();
        assert_eq!(words, vec!["λόγος", "λόγου"]);
    }

    #[test]
    fn test_pos_tie_goes_to_first_encountered() {
        let text = "\
1 D- -------- ἐγγύς x ἐγγύς
2 P- -------- ἐγγύς x ἐγγύς
";
        let (stats, _) = aggregator(10, false).aggregate_str(text);
        assert_eq!(stats.get("εγγυς").unwrap().most_frequent_pos(), Some("D-"));
    }

    #[test]
    fn test_merge_matches_sequential_fold() {
        let lines: Vec<&str> = AGAPAO_LINES.lines().collect();
        let agg = aggregator(10, false);
        let (whole, _) = agg.aggregate_str(AGAPAO_LINES);
        let (mut first, _) = agg.aggregate_str(lines[0]);
        let (second, _) = agg.aggregate_str(&lines[1..].join("\n"));
        first.merge(second);
        assert_eq!(first, whole);
    }

    #[test]
    fn test_parallel_and_sequential_files_agree() {
        let dir = tempfile::tempdir().unwrap();
        let lines: Vec<&str> = AGAPAO_LINES.lines().collect();
        fs::write(dir.path().join("61-Mt-morphgnt.txt"), lines[0]).unwrap();
        fs::write(dir.path().join("62-Mk-morphgnt.txt"), lines[1..].join("\n")).unwrap();
        fs::write(dir.path().join("notes.txt"), "1 2 3 4 5 6").unwrap();

        let (parallel, report) = aggregator(10, true).aggregate_path(dir.path(), None).unwrap();
        let (sequential, _) = aggregator(10, false).aggregate_path(dir.path(), None).unwrap();
        assert_eq!(parallel, sequential);
        assert_eq!(report.files_processed, 2);
        assert_eq!(report.lines_read, 3);

        let (whole, _) = aggregator(10, false).aggregate_str(AGAPAO_LINES);
        assert_eq!(parallel, whole);
    }

    #[test]
    fn test_missing_corpus_path() {
        let err = aggregator(10, true).aggregate_path("/nonexistent/corpus", None).unwrap_err();
        assert!(err.is_source_not_found());
    }

    fn cancel_immediately(_state: &mut ProgressState) -> bool {
        true
    }

    #[test]
    fn test_progress_callback_can_cancel() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("61-Mt-morphgnt.txt"), AGAPAO_LINES).unwrap();
        let result = aggregator(10, true).aggregate_path(dir.path(), Some(cancel_immediately));
        assert!(matches!(result, Err(LexiconError::UserInterrupted { .. })));
    }
}
