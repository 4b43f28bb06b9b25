#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal plumbing for the housing gap pipeline.
//!
//! [`TerminalProgress`] renders [`ProgressCallback`] updates from the
//! housing normalizer and the per-year runner. [`init_logger`] routes
//! `log` output through `indicatif-log-bridge` so log lines do not tear
//! the bars while they redraw.

use std::time::Duration;

use housing_gap_normalize::progress::ProgressCallback;
use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

const ROWS_TEMPLATE: &str = "  {msg} {wide_bar:.cyan/dim} {pos}/{len} rows {percent}% [{eta}]";
const YEARS_TEMPLATE: &str = "{msg} {wide_bar:.green/dim} {pos}/{len} years [{elapsed_precise}]";

/// A terminal progress bar driven through [`ProgressCallback`].
pub struct TerminalProgress {
    bar: ProgressBar,
    /// Applied once the row count is known.
    counted: Option<ProgressStyle>,
}

impl TerminalProgress {
    /// Bar over raw table rows. Spins until the normalizer reports the
    /// row count.
    #[must_use]
    pub fn rows_bar(multi: &MultiProgress, message: &str) -> Self {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());

        Self {
            bar,
            counted: Some(bar_style(ROWS_TEMPLATE)),
        }
    }

    /// Bar over snapshot years; the count is known up front.
    #[must_use]
    pub fn years_bar(multi: &MultiProgress, years: usize) -> Self {
        let bar = multi.add(ProgressBar::new(years as u64));
        bar.set_style(bar_style(YEARS_TEMPLATE));
        Self { bar, counted: None }
    }
}

fn bar_style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}

impl ProgressCallback for TerminalProgress {
    fn set_total(&self, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(0);
        if let Some(style) = &self.counted {
            self.bar.set_style(style.clone());
        }
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}

/// Installs the global logger behind `indicatif-log-bridge`.
///
/// Returns the [`MultiProgress`] every bar must be added to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok(); // already set in tests

    log::set_max_level(level);

    multi
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hidden() -> MultiProgress {
        MultiProgress::with_draw_target(indicatif::ProgressDrawTarget::hidden())
    }

    #[test]
    fn rows_bar_takes_length_from_set_total() {
        let bar = TerminalProgress::rows_bar(&hidden(), "Cleaning");
        assert_eq!(bar.bar.length(), None);

        bar.set_total(40);
        bar.inc(3);
        assert_eq!(bar.bar.length(), Some(40));
        assert_eq!(bar.bar.position(), 3);

        bar.finish("done".to_string());
        assert!(bar.bar.is_finished());
    }

    #[test]
    fn years_bar_counts_years() {
        let bar = TerminalProgress::years_bar(&hidden(), 11);
        bar.set_message("Year 2011".to_string());
        bar.inc(1);
        assert_eq!(bar.bar.length(), Some(11));
        assert_eq!(bar.bar.position(), 1);
        assert_eq!(bar.bar.message(), "Year 2011");
    }
}
