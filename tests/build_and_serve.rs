use std::fs;
use std::path::Path;

use lexicon::builder::{BuilderConfig, LexiconBuilder};
use lexicon::morphology::Dimension;
use lexicon::readers::{LexiconReader, SCORE_TRANSLITERATION};
use lexicon::storage::snapshot;

const DICTIONARY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<strongsdictionary>
<entries>
  <entry strongs="00025">
    <greek BETA="A)GAPA/W" unicode="ἀγαπάω" translit="agapaō"/>
    <pronunciation strongs="ag-ap-ah'-o"/>
    <strongs_derivation>perhaps from ἄγαν (much) [or compare <strongsref language="HEBREW" strongs="05689"/>];</strongs_derivation>
    <strongs_def>to love (in a social or moral sense)</strongs_def>
    <kjv_def>(be-)love(-ed). Compare <strongsref language="GREEK" strongs="5368"/>.</kjv_def>
  </entry>
  <entry strongs="00026">
    <greek BETA="A)GA/PH" unicode="ἀγάπη" translit="agápē"/>
    <strongs_derivation>from <strongsref language="GREEK" strongs="25"/></strongs_derivation>
    <strongs_def>love, i.e. affection or benevolence; specially (plural) a love-feast</strongs_def>
    <kjv_def>(feast of) charity(-ably), dear, love.</kjv_def>
    <see language="GREEK" strongs="25"/>
  </entry>
  <entry strongs="05368">
    <greek BETA="FILE/W" unicode="φιλέω" translit="philéō"/>
    <strongs_def>to be a friend to (fond of [an individual or an object])</strongs_def>
    <kjv_def>kiss, love.</kjv_def>
  </entry>
  <entry strongs="">
    <greek unicode="ἄνευ" translit="áneu"/>
  </entry>
  <entry strongs="00003">
    <greek BETA="*)ABADDW/N" unicode="Ἀβαδδών" translit="Abaddṓn"/>
    <strongs_def>a destroying angel</strongs_def>
    <kjv_def>Abaddon.</kjv_def>
  </entry>
</entries>
</strongsdictionary>
"#;

const MATTHEW: &str = "\
010543 V- 2PAI-P-- ἀγαπᾶτε ἀγαπᾶτε ἀγαπᾶτε ἀγαπάω
010546 V- 2PAS-P-- ἀγαπήσητε ἀγαπήσητε ἀγαπήσητε ἀγαπάω
010101 N- ----NSF- Βίβλος Βίβλος βίβλος βίβλος
";

const MARK: &str = "\
041221 V- 3AAI-S-- ἠγάπησεν, ἠγάπησεν ἠγάπησε(ν) ἀγαπάω
041222 N- ----NSF- ἀγάπη. ἀγάπη ἀγάπη ἀγάπη
041223 X-
";

fn write_sources(dir: &Path) -> BuilderConfig {
    let corpus_dir = dir.join("corpus");
    fs::create_dir_all(&corpus_dir).unwrap();
    fs::write(corpus_dir.join("61-Mt-morphgnt.txt"), MATTHEW).unwrap();
    fs::write(corpus_dir.join("62-Mk-morphgnt.txt"), MARK).unwrap();
    fs::write(corpus_dir.join("README.txt"), "not a corpus file").unwrap();
    let dictionary_path = dir.join("strongsgreek.xml");
    fs::write(&dictionary_path, DICTIONARY).unwrap();

    BuilderConfig {
        dictionary_path: dictionary_path.display().to_string(),
        corpus_path: corpus_dir.display().to_string(),
        snapshot_path: dir.join("out").join("lexicon.json").display().to_string(),
        ..BuilderConfig::default()
    }
}

#[test]
fn build_snapshot_and_query_agapao() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_sources(dir.path());

    let report = LexiconBuilder::build_snapshot(&config, None).unwrap();
    assert_eq!(report.articles_parsed, 4);
    assert_eq!(report.articles_skipped, 1);
    assert_eq!(report.files_processed, 2);
    assert_eq!(report.lines_read, 6);
    assert_eq!(report.malformed_lines, 1);
    assert_eq!(report.entries, 4);
    assert_eq!(report.entries_with_corpus_data, 2);

    let reader = LexiconReader::from_snapshot_file(&config.snapshot_path).unwrap();
    let entry = reader.lookup_by_id("G25").unwrap();
    assert_eq!(entry.headword, "ἀγαπάω");
    assert_eq!(entry.transliteration.as_deref(), Some("agapaō"));
    assert_eq!(entry.part_of_speech.as_deref(), Some("Verb"));
    assert_eq!(entry.cross_refs, vec!["G5368".to_string()]);

    let morphology = entry.morphology.as_ref().unwrap();
    assert_eq!(morphology.total_occurrences, 3);
    assert_eq!(morphology.tenses.len(), 2);
    assert_eq!(morphology.tenses.get("Present"), Some(&2));
    assert_eq!(morphology.tenses.get("Aorist"), Some(&1));
    let words: Vec<&str> = morphology.sample_forms.iter().map(|f| f.word.as_str()).collect();
    assert_eq!(words, vec!["ἀγαπᾶτε", "ἀγαπήσητε", "ἠγάπησεν"]);
    for dimension in Dimension::ALL {
        let sum: u64 = morphology.distribution(dimension).values().sum();
        assert!(sum <= morphology.total_occurrences);
    }

    let hits = reader.search("agap", 10);
    let hit = hits.iter().find(|h| h.entry.id == "G25").unwrap();
    assert!(hit.score >= SCORE_TRANSLITERATION);
}

#[test]
fn every_article_is_merged_once() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_sources(dir.path());
    let (index, _) = LexiconBuilder::build_with_config(&config, None).unwrap();

    let ids: Vec<&str> = index.entries().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["G25", "G26", "G5368", "G3"]);

    let phileo = index.get("G5368").unwrap();
    assert!(phileo.morphology.is_none());
    assert_eq!(phileo.part_of_speech.as_deref(), Some("Unknown"));

    let agape = index.get("G26").unwrap();
    assert_eq!(agape.morphology.as_ref().unwrap().total_occurrences, 1);
    assert_eq!(agape.morphology.as_ref().unwrap().sample_forms[0].word, "ἀγάπη");
    assert_eq!(agape.cross_refs, vec!["G25".to_string()]);
}

#[test]
fn rebuilds_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_sources(dir.path());

    LexiconBuilder::build_snapshot(&config, None).unwrap();
    let first = fs::read(&config.snapshot_path).unwrap();

    let sequential = BuilderConfig { parallel: false, ..config.clone() };
    LexiconBuilder::build_snapshot(&sequential, None).unwrap();
    let second = fs::read(&config.snapshot_path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn loaded_snapshot_matches_fresh_build() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_sources(dir.path());
    let (index, _) = LexiconBuilder::build_with_config(&config, None).unwrap();

    let bytes = snapshot::save(index.entries()).unwrap();
    let loaded = LexiconReader::from_entries(snapshot::load(&bytes).unwrap(), "G").unwrap();
    assert_eq!(loaded.index().entries(), index.entries());

    let fresh = LexiconReader::new(index);
    for query in ["love", "agap", "G3", "ἀγάπ"] {
        let expected: Vec<(&str, u32)> = fresh.search(query, 10).into_iter().map(|h| (h.entry.id.as_str(), h.score)).collect();
        let actual: Vec<(&str, u32)> = loaded.search(query, 10).into_iter().map(|h| (h.entry.id.as_str(), h.score)).collect();
        assert_eq!(expected, actual, "{}", query);
    }
    assert_eq!(fresh.stats(), loaded.stats());
}

#[test]
fn id_match_ranks_above_secondary_definition_match() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_sources(dir.path());
    let (index, _) = LexiconBuilder::build_with_config(&config, None).unwrap();
    let reader = LexiconReader::new(index);

    let hits = reader.search("love", 10);
    let ranked: Vec<&str> = hits.iter().map(|h| h.entry.id.as_str()).collect();
    assert_eq!(ranked, vec!["G25", "G26", "G5368"]);

    let hits = reader.search("g3", 10);
    assert_eq!(hits[0].entry.id, "G3");
    assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn stats_report_entry_set() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_sources(dir.path());
    let (index, _) = LexiconBuilder::build_with_config(&config, None).unwrap();
    let stats = LexiconReader::new(index).stats();

    assert_eq!(stats.total_entries, 4);
    assert_eq!(stats.entries_with_corpus_data, 2);
    assert_eq!(
        stats.distinct_parts_of_speech,
        vec!["Noun".to_string(), "Unknown".to_string(), "Verb".to_string()]
    );
}

#[test]
fn snapshot_reload_keeps_configured_id_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let config = BuilderConfig { id_prefix: "H".to_string(), ..write_sources(dir.path()) };

    LexiconBuilder::build_snapshot(&config, None).unwrap();
    let (index, _) = LexiconBuilder::build_with_config(&config, None).unwrap();
    let fresh = LexiconReader::new(index);
    let loaded = LexiconReader::from_config(&config).unwrap();

    assert_eq!(fresh.lookup_by_id("25").map(|e| e.id.as_str()), Some("H25"));
    assert_eq!(loaded.lookup_by_id("25").map(|e| e.id.as_str()), Some("H25"));
    assert_eq!(loaded.lookup_by_id("h0025").map(|e| e.id.as_str()), Some("H25"));
    for query in ["25", "H3", "love"] {
        let expected: Vec<(&str, u32)> = fresh.search(query, 10).into_iter().map(|h| (h.entry.id.as_str(), h.score)).collect();
        let actual: Vec<(&str, u32)> = loaded.search(query, 10).into_iter().map(|h| (h.entry.id.as_str(), h.score)).collect();
        assert!(!actual.is_empty(), "{}", query);
        assert_eq!(expected, actual, "{}", query);
    }

    let reloaded = LexiconReader::from_snapshot_file_with_prefix(&config.snapshot_path, "H").unwrap();
    assert_eq!(reloaded.index().entries(), fresh.index().entries());
}
