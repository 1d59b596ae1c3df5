//! Progress reporting module

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter for multi-source runs
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
    quiet: bool,
    fragments: usize,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new(quiet: bool) -> Self {
        Self {
            progress_bar: None,
            quiet,
            fragments: 0,
        }
    }

    /// Show a bar when more than one source is processed
    pub fn init_sources(&mut self, total_sources: u64) {
        if self.quiet || total_sources < 2 {
            return;
        }

        let pb = ProgressBar::new(total_sources);
        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} sources {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));

        self.progress_bar = Some(pb);
    }

    /// Record a finished source and how many fragments it produced
    pub fn source_completed(&mut self, name: &str, fragments: usize) {
        self.fragments += fragments;
        if let Some(pb) = &self.progress_bar {
            pb.set_message(format!("{name}: {fragments} fragments"));
            pb.inc(1);
        }
    }

    /// Fragments seen so far across all sources
    pub fn total_fragments(&self) -> usize {
        self.fragments
    }

    /// Finish progress reporting
    pub fn finish(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("{} fragments", self.fragments));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_without_bar() {
        let mut reporter = ProgressReporter::new(true);
        reporter.init_sources(3);
        reporter.source_completed("a.txt", 4);
        reporter.source_completed("b.txt", 2);
        reporter.finish();
        assert_eq!(reporter.total_fragments(), 6);
    }

    #[test]
    fn test_single_source_has_no_bar() {
        let mut reporter = ProgressReporter::new(false);
        reporter.init_sources(1);
        assert!(reporter.progress_bar.is_none());
    }
}
