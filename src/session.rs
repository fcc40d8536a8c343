use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::caption::CaptionDebouncer;
use crate::log_info;
use crate::overlay::OverlayPresenter;
use crate::providers::{GoogleTranslate, MyMemory, TranslationProvider};
use crate::quota::{QuotaStore, QuotaTracker};
use crate::settings::{Settings, SettingsStore};
use crate::translate::Translator;

const ENABLE_LOGS: bool = true;

/// Wires one video's translation pipeline together: both providers, the
/// translator, the caption debouncer and a watcher that re-applies overlay
/// styling when settings change. Must be created inside a Tokio runtime.
pub struct SubtitleSession {
    session_id: String,
    settings: Arc<SettingsStore>,
    translator: Translator,
    debouncer: CaptionDebouncer,
    quota: Arc<QuotaTracker>,
    style_watcher: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl SubtitleSession {
    pub fn new(
        settings: Arc<SettingsStore>,
        presenter: Arc<dyn OverlayPresenter>,
        quota_store: Arc<dyn QuotaStore>,
    ) -> Result<Self> {
        let session_id = Uuid::new_v4().to_string();

        let http = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        let quota = Arc::new(QuotaTracker::new(quota_store));
        let free: Arc<dyn TranslationProvider> =
            Arc::new(MyMemory::new(http.clone(), settings.clone()));
        let paid: Arc<dyn TranslationProvider> =
            Arc::new(GoogleTranslate::new(http, settings.clone(), quota.clone()));

        let translator = Translator::new(settings.clone(), free, paid, presenter.clone());
        let debouncer = CaptionDebouncer::new(translator.clone(), presenter.clone());

        let initial = settings.snapshot();
        presenter.set_style(initial.sinhala_size, initial.sinhala_position);

        let cancel_token = CancellationToken::new();
        let style_watcher = tokio::spawn(style_watch_loop(
            session_id.clone(),
            settings.subscribe(),
            presenter,
            cancel_token.clone(),
        ));

        log_info!("Subtitle session {} started", session_id);

        Ok(Self {
            session_id,
            settings,
            translator,
            debouncer,
            quota,
            style_watcher: Some(style_watcher),
            cancel_token: Some(cancel_token),
        })
    }

    pub fn id(&self) -> &str {
        &self.session_id
    }

    pub fn settings(&self) -> &Arc<SettingsStore> {
        &self.settings
    }

    /// Entry point for caption mutations and play/pause events.
    pub fn debouncer(&self) -> &CaptionDebouncer {
        &self.debouncer
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn quota(&self) -> &Arc<QuotaTracker> {
        &self.quota
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        if let Some(handle) = self.style_watcher.take() {
            handle.await.context("style watcher task failed to join")?;
        }
        log_info!("Subtitle session {} stopped", self.session_id);
        Ok(())
    }
}

async fn style_watch_loop(
    session_id: String,
    mut rx: watch::Receiver<Settings>,
    presenter: Arc<dyn OverlayPresenter>,
    cancel_token: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => {
                log_info!("Style watcher shutting down for session {}", session_id);
                break;
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = rx.borrow_and_update().clone();
                log_info!(
                    "Applying subtitle style for session {}: size {}%, position {}%",
                    session_id,
                    snapshot.sinhala_size,
                    snapshot.sinhala_position
                );
                presenter.set_style(snapshot.sinhala_size, snapshot.sinhala_position);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quota::MemoryQuotaStore;

    #[derive(Default)]
    struct StyleRecorder {
        styles: std::sync::Mutex<Vec<(u32, u32)>>,
    }

    impl StyleRecorder {
        fn styles(&self) -> Vec<(u32, u32)> {
            self.styles.lock().unwrap().clone()
        }
    }

    impl OverlayPresenter for StyleRecorder {
        fn display(&self, _text: &str) {}

        fn set_style(&self, size_percent: u32, position_percent: u32) {
            self.styles
                .lock()
                .unwrap()
                .push((size_percent, position_percent));
        }

        fn notice(&self, _message: &str) {}
    }

    async fn run_pending() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn applies_style_on_start_and_on_settings_change() {
        let settings = Arc::new(SettingsStore::ephemeral(Settings::default()));
        let presenter = Arc::new(StyleRecorder::default());
        let store: Arc<dyn QuotaStore> = Arc::new(MemoryQuotaStore::new());
        let mut session =
            SubtitleSession::new(settings.clone(), presenter.clone(), store).unwrap();
        assert!(!session.id().is_empty());

        let mut changed = Settings::default();
        changed.sinhala_size = 80;
        changed.sinhala_position = 20;
        settings.update(changed).unwrap();
        run_pending().await;

        assert_eq!(presenter.styles(), vec![(120, 10), (80, 20)]);

        session.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn shutdown_stops_the_style_watcher() {
        let settings = Arc::new(SettingsStore::ephemeral(Settings::default()));
        let presenter = Arc::new(StyleRecorder::default());
        let store: Arc<dyn QuotaStore> = Arc::new(MemoryQuotaStore::new());
        let mut session =
            SubtitleSession::new(settings.clone(), presenter.clone(), store).unwrap();

        session.shutdown().await.unwrap();

        let mut changed = Settings::default();
        changed.sinhala_size = 60;
        settings.update(changed).unwrap();
        run_pending().await;

        // Only the initial style application is left.
        assert_eq!(presenter.styles(), vec![(120, 10)]);
    }
}
