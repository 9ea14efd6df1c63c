//! Terminal progress display for sample data downloads

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::LazyLock;

static DOWNLOAD_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{msg}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{bytes}}/{{total_bytes}} ({{eta}})"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static UNKNOWN_SIZE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_spinner()
        .template("{spinner} {msg} {bytes}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
});

/// Renders download progress callbacks as a progress bar
///
/// The bar is created lazily on the first callback, once the total size is
/// known, and finishes as soon as the downloaded byte count reaches the
/// total. Downloads without a known size show a byte-counting spinner.
pub struct DownloadProgress {
    label: String,
    visible: bool,
    bar: Option<ProgressBar>,
}

impl DownloadProgress {
    /// Create a progress display with the given label
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            visible: true,
            bar: None,
        }
    }

    /// Create a progress tracker that never draws
    pub fn hidden() -> Self {
        Self {
            label: String::new(),
            visible: false,
            bar: None,
        }
    }

    /// Report the cumulative byte count
    pub fn update(&mut self, downloaded: u64, total: Option<u64>) {
        let bar = self
            .bar
            .get_or_insert_with(|| Self::create_bar(&self.label, self.visible, total));

        if bar.is_finished() {
            return;
        }

        match total {
            Some(total) if downloaded >= total => {
                bar.set_position(total);
                bar.finish();
            }
            _ => bar.set_position(downloaded),
        }
    }

    /// Finish the display, e.g. for downloads of unknown size
    pub fn finish(&self) {
        if let Some(bar) = &self.bar
            && !bar.is_finished()
        {
            bar.finish();
        }
    }

    /// Bytes reported so far, `None` before the first callback
    pub fn position(&self) -> Option<u64> {
        self.bar.as_ref().map(ProgressBar::position)
    }

    /// Whether the display has finished
    pub fn is_finished(&self) -> bool {
        self.bar.as_ref().is_some_and(ProgressBar::is_finished)
    }

    fn create_bar(label: &str, visible: bool, total: Option<u64>) -> ProgressBar {
        let bar = match total {
            Some(total) => {
                let bar = ProgressBar::new(total);
                bar.set_style(DOWNLOAD_STYLE.clone());
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(UNKNOWN_SIZE_STYLE.clone());
                bar
            }
        };
        if !visible {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        bar.set_message(label.to_string());
        bar
    }
}
