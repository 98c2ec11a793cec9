//! Build progress and cancellation.
//!
//! Corpus aggregation reports at corpus-file granularity. Steps are taken
//! during the ordered merge of per-file partial statistics, under the
//! `"CorpusAggregator::aggregate_files"` state id: `total` is the number of
//! matched corpus files and `current` is the zero-based position of the file
//! just merged, in sorted file order. The reporter is called every
//! `report_interval_percent` of the files and always for the last one. A
//! reporter returning `true` stops the build with `UserInterrupted` before a
//! snapshot is written.
//!
//! # Examples
//!
//! ```
//! use lexicon::utils::{ProgressState, ProgressReportFn};
//!
//! fn my_reporter(state: &mut ProgressState) -> bool {
//!     println!("{}: {}/{}", state.state_id, state.current, state.total);
//!     false // Return true to cancel the operation
//! }
//!
//! let mut progress = ProgressState::new("aggregating", 100, 10, Some(my_reporter));
//! for i in 0..100 {
//!     if progress.report(i) {
//!         // Operation was cancelled
//!         break;
//!     }
//! }
//! ```

/// Function type for progress reporting callbacks.
///
/// The function receives a mutable reference to the progress state and
/// returns `true` to cancel the operation, or `false` to continue.
pub type ProgressReportFn = fn(&mut ProgressState) -> bool;

/// State information for progress reporting.
pub struct ProgressState {
    /// Identifier for this progress state (e.g., "parsing", "aggregating")
    pub state_id: String,
    /// Total number of items to process
    pub total: u64,
    /// Current item being processed
    pub current: u64,
    /// Last item at which progress was reported
    pub last: u64,
    /// Number of items between progress reports
    pub report_interval: u64,
    /// Optional reporter function to call
    pub reporter: Option<ProgressReportFn>,
}

impl ProgressState {
    /// Creates a new progress state.
    ///
    /// # Arguments
    ///
    /// * `state_id` - Identifier for this progress state
    /// * `total` - Total number of items to process
    /// * `report_interval_percent` - Percentage of items between reports (0-100)
    /// * `reporter` - Optional reporter function
    pub fn new(state_id: &str, total: u64, report_interval_percent: u64, reporter: Option<ProgressReportFn>) -> Self {
        Self {
            state_id: state_id.to_string(),
            total,
            current: 0,
            last: 0,
            report_interval: total * report_interval_percent / 100,
            reporter,
        }
    }

    /// Reports progress for the current item.
    ///
    /// Returns `true` if the operation should be cancelled, `false` otherwise.
    pub fn report(&mut self, current: u64) -> bool {
        let Some(reporter) = self.reporter else {
            return false;
        };
        let is_last = current + 1 >= self.total;
        if current.saturating_sub(self.last) >= self.report_interval || is_last {
            self.current = current;
            let cancelled = reporter(self);
            self.last = current;
            return cancelled;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cancel_at_half(state: &mut ProgressState) -> bool {
        state.current >= state.total / 2
    }

    fn never_cancel(_state: &mut ProgressState) -> bool {
        false
    }

    #[test]
    fn test_no_reporter_never_cancels() {
        let mut progress = ProgressState::new("idle", 10, 10, None);
        assert!((0..10).all(|i| !progress.report(i)));
    }

    #[test]
    fn test_reporter_can_cancel() {
        let mut progress = ProgressState::new("cancel", 10, 10, Some(cancel_at_half));
        let stopped_at = (0..10).find(|i| progress.report(*i));
        assert_eq!(stopped_at, Some(5));
    }

    #[test]
    fn test_empty_total_does_not_underflow() {
        let mut progress = ProgressState::new("empty", 0, 10, Some(never_cancel));
        assert!(!progress.report(0));
    }
}
