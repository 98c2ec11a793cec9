//! File discovery and reading helpers for source data.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

use crate::{LexiconError, Result};

/// Reads a whole file into a string.
///
/// Returns `SourceNotFound` if the path does not exist.
pub fn string_from_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LexiconError::source_not_found(path.display().to_string()));
    }
    let mut reader = BufReader::new(File::open(path)?);
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    Ok(content)
}

/// Scan a directory for files matching the given regex pattern
///
/// # Arguments
/// * `target_dir` - The directory to scan
/// * `pattern` - A regex pattern to match file names against
/// * `recursive` - Whether to scan subdirectories recursively
///
/// # Returns
/// The matching file paths sorted lexicographically, so callers that fold
/// over them get the same order on every platform.
pub fn scan_dir<P: AsRef<Path>>(target_dir: P, pattern: &Regex, recursive: bool) -> Result<Vec<PathBuf>> {
    let walker = if recursive {
        WalkDir::new(&target_dir).follow_links(true).into_iter()
    } else {
        WalkDir::new(&target_dir).follow_links(true).max_depth(1).into_iter()
    };

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry
            .file_name()
            .to_str()
            .ok_or_else(|| LexiconError::invalid_data_format("Invalid file name encoding"))?;
        if pattern.is_match(file_name) {
            files.push(entry.path().to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Resolves a corpus location to the ordered list of files to read.
///
/// A file is used as-is. A directory is scanned (non-recursively) for names
/// matching `pattern`. A missing path yields `SourceNotFound`.
pub fn resolve_source_files<P: AsRef<Path>>(path: P, pattern: &Regex) -> Result<Vec<PathBuf>> {
    let path = path.as_ref();
    if path.is_file() {
        Ok(vec![path.to_path_buf()])
    } else if path.is_dir() {
        scan_dir(path, pattern, false)
    } else {
        Err(LexiconError::source_not_found(path.display().to_string()))
    }
}
