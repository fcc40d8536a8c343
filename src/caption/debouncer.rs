use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;

use crate::log_info;
use crate::overlay::OverlayPresenter;
use crate::translate::Translator;

use super::state::CaptionState;

const ENABLE_LOGS: bool = true;

/// How long a caption mutation must stay unchanged before it is submitted.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(100);

const PREVIEW_CHARS: usize = 50;

/// Collapses the burst of DOM mutations a caption line produces into a single
/// translation, and only while the video is paused. Each new mutation cancels
/// the pending quiet-period timer; once a submission is in flight it runs to
/// completion and its result is discarded if playback resumed in the
/// meantime.
#[derive(Clone)]
pub struct CaptionDebouncer {
    state: Arc<Mutex<CaptionState>>,
    translator: Translator,
    presenter: Arc<dyn OverlayPresenter>,
    pending: Arc<Mutex<Option<CancellationToken>>>,
}

impl CaptionDebouncer {
    pub fn new(translator: Translator, presenter: Arc<dyn OverlayPresenter>) -> Self {
        Self {
            state: Arc::new(Mutex::new(CaptionState::new())),
            translator,
            presenter,
            pending: Arc::new(Mutex::new(None)),
        }
    }

    /// Feeds one caption mutation into the debouncer. While playing this only
    /// records the text and keeps the overlay hidden; while paused it starts
    /// (or restarts) the quiet-period timer.
    pub async fn observe(&self, text: &str) {
        self.cancel_pending().await;

        let paused = {
            let mut state = self.state.lock().await;
            state.record_caption(text);
            state.paused
        };
        if !paused {
            self.presenter.display("");
            return;
        }

        let token = CancellationToken::new();
        *self.pending.lock().await = Some(token.clone());

        let this = self.clone();
        let observed = text.to_string();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = sleep(DEBOUNCE_WINDOW) => {
                    this.submit_settled(observed).await;
                }
            }
        });
    }

    /// Pause handler. Replays the last caption through the debounce window so
    /// a line that appeared while playing still gets translated.
    pub async fn on_pause(&self) {
        let last = {
            let mut state = self.state.lock().await;
            state.on_pause();
            state.last_caption.clone()
        };
        log_info!("Video paused - showing translation");
        if !last.is_empty() {
            self.observe(&last).await;
        }
    }

    /// Play handler. Drops any pending timer, hides the overlay and bumps the
    /// pause epoch so in-flight results from the previous pause are ignored.
    pub async fn on_play(&self) {
        self.cancel_pending().await;
        {
            let mut state = self.state.lock().await;
            state.on_play();
        }
        log_info!("Video playing - hiding translation");
        self.presenter.display("");
    }

    pub async fn is_paused(&self) -> bool {
        self.state.lock().await.paused
    }

    async fn submit_settled(&self, observed: String) {
        let (candidate, epoch) = {
            let mut state = self.state.lock().await;
            let candidate = if observed.is_empty() {
                state.last_caption.clone()
            } else {
                observed
            };
            if candidate.is_empty() {
                if !state.last_submitted.is_empty() {
                    state.last_submitted.clear();
                    drop(state);
                    self.presenter.display("");
                }
                return;
            }
            if candidate == state.last_submitted {
                return;
            }
            state.last_submitted = candidate.clone();
            (candidate, state.pause_epoch)
        };

        log_info!("Processing subtitle (paused): {}", preview(&candidate));
        let translated = self.translator.translate(&candidate).await;

        let state = self.state.lock().await;
        if state.paused && state.pause_epoch == epoch {
            log_info!("Translation result: {}", preview(&translated));
            self.presenter.display(&translated);
        } else {
            log_info!("Dropping stale translation result, playback resumed");
        }
    }

    async fn cancel_pending(&self) {
        if let Some(token) = self.pending.lock().await.take() {
            token.cancel();
        }
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        text.to_string()
    } else {
        let cut: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    }
}
