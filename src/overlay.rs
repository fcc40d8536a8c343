const ENABLE_LOGS: bool = true;

use crate::log_info;

/// View-side surface for translated subtitles, implemented by the embedding
/// shell (browser overlay, desktop window, ...). All methods are
/// fire-and-forget from the pipeline's point of view.
pub trait OverlayPresenter: Send + Sync {
    /// Render `text`, or hide the overlay when `text` is empty.
    fn display(&self, text: &str);

    /// Apply the user-configured font size and vertical position, both in
    /// percent of the shell's baseline.
    fn set_style(&self, size_percent: u32, position_percent: u32);

    /// Transient out-of-band message, e.g. the quota warning.
    fn notice(&self, message: &str);
}

/// Presenter that writes everything to the log. Useful for headless runs and
/// as a stand-in while an embedding has no overlay yet.
pub struct LogPresenter;

impl OverlayPresenter for LogPresenter {
    fn display(&self, text: &str) {
        if text.is_empty() {
            log_info!("overlay hidden");
        } else {
            log_info!("overlay: {text}");
        }
    }

    fn set_style(&self, size_percent: u32, position_percent: u32) {
        log_info!("overlay style: size {size_percent}%, position {position_percent}%");
    }

    fn notice(&self, message: &str) {
        log_info!("notice: {message}");
    }
}
