//! Snapshot persistence for merged lexicon entries.
//!
//! A snapshot is a JSON object mapping each entry id to the full entry record,
//! in entry-set order. Saving the same entries twice yields identical bytes,
//! and loading a snapshot gives back exactly the entries that were saved.
//!
//! # Examples
//!
//! ```
//! use lexicon::storage::{snapshot, LexiconEntry};
//!
//! # fn main() -> lexicon::Result<()> {
//! let entries = vec![LexiconEntry { id: "G1".into(), headword: "Α".into(), ..Default::default() }];
//! let bytes = snapshot::save(&entries)?;
//! assert_eq!(snapshot::load(&bytes)?, entries);
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::io::Write;
use std::path::Path;

use indexmap::IndexMap;
use log::info;

use super::entry::LexiconEntry;
use crate::{LexiconError, Result};

/// Serializes entries into snapshot bytes.
///
/// Fails with `DuplicateIdentifier` if two entries share an id.
pub fn save(entries: &[LexiconEntry]) -> Result<Vec<u8>> {
    let mut by_id: IndexMap<&str, &LexiconEntry> = IndexMap::with_capacity(entries.len());
    for entry in entries {
        if by_id.insert(entry.id.as_str(), entry).is_some() {
            return Err(LexiconError::duplicate_identifier(entry.id.clone()));
        }
    }
    let mut bytes = serde_json::to_vec_pretty(&by_id)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Deserializes snapshot bytes back into entries, in their saved order.
pub fn load(bytes: &[u8]) -> Result<Vec<LexiconEntry>> {
    let by_id: IndexMap<String, LexiconEntry> = serde_json::from_slice(bytes)?;
    let mut entries = Vec::with_capacity(by_id.len());
    for (id, entry) in by_id {
        if id != entry.id {
            return Err(LexiconError::invalid_data_format(format!(
                "Snapshot key {} does not match entry id {}",
                id, entry.id
            )));
        }
        entries.push(entry);
    }
    Ok(entries)
}

/// Writes a snapshot file, replacing it atomically via a sibling temp file.
pub fn save_to_file<P: AsRef<Path>>(entries: &[LexiconEntry], path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = save(entries)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;
    info!("Saved snapshot with {} entries to {}", entries.len(), path.display());
    Ok(())
}

/// Reads a snapshot file.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<LexiconEntry>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LexiconError::source_not_found(path.display().to_string()));
    }
    let bytes = fs::read(path)?;
    let entries = load(&bytes)?;
    info!("Loaded snapshot with {} entries from {}", entries.len(), path.display());
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morphology::decode;
    use crate::storage::entry::{MorphologyStats, SampleForm};

    fn sample_entries() -> Vec<LexiconEntry> {
        let mut stats = MorphologyStats { total_occurrences: 2, ..Default::default() };
        let parsed = decode("V-", "3PAI-S--");
        stats.record_features(&parsed);
        stats.sample_forms.push(SampleForm {
            word: "ἀγαπᾷ".to_string(),
            morph: "3PAI-S--".to_string(),
            parsed,
        });
        vec![
            LexiconEntry {
                id: "G25".to_string(),
                headword: "ἀγαπάω".to_string(),
                transliteration: Some("agapaō".to_string()),
                part_of_speech: Some("Verb".to_string()),
                pos_code: Some("V-".to_string()),
                definition_primary: Some("to love".to_string()),
                cross_refs: vec!["G5368".to_string()],
                morphology: Some(stats),
                ..Default::default()
            },
            LexiconEntry {
                id: "G1".to_string(),
                headword: "Α".to_string(),
                part_of_speech: Some("Unknown".to_string()),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_round_trip_preserves_entries_and_order() {
        let entries = sample_entries();
        let bytes = save(&entries).unwrap();
        let loaded = load(&bytes).unwrap();
        assert_eq!(loaded, entries);
        assert_eq!(loaded[0].id, "G25");
    }

    #[test]
    fn test_save_is_deterministic() {
        let entries = sample_entries();
        assert_eq!(save(&entries).unwrap(), save(&entries.clone()).unwrap());
    }

    #[test]
    fn test_missing_morphology_is_null() {
        let bytes = save(&sample_entries()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(value["G1"]["morphology"].is_null());
        assert_eq!(value["G25"]["morphology"]["tenses"]["Present"], 1);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let mut entries = sample_entries();
        entries.push(entries[0].clone());
        let err = save(&entries).unwrap_err();
        assert!(err.is_duplicate_identifier());
    }

    #[test]
    fn test_mismatched_key_is_rejected() {
        let json = r#"{"G2": {"id": "G3", "headword": "x"}}"#;
        assert!(load(json.as_bytes()).is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("lexicon.json");
        let entries = sample_entries();
        save_to_file(&entries, &path).unwrap();
        assert_eq!(load_from_file(&path).unwrap(), entries);
        assert!(load_from_file(dir.path().join("absent.json")).unwrap_err().is_source_not_found());
    }
}
