//! Helpers shared by the build pipeline.
//!
//! Key normalization for cross-source matching, source file discovery and
//! progress reporting.

pub mod io_utils;
pub mod normalize;
pub mod progress_report;

pub use io_utils::{resolve_source_files, scan_dir, string_from_file};
pub use normalize::{
    clean_surface_form, is_boundary_punctuation, normalize_id, normalize_key, normalize_transliteration,
    SURFACE_FORM_TRAILING_PUNCTUATION,
};
pub use progress_report::{ProgressReportFn, ProgressState};
