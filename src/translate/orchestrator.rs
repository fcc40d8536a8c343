use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::overlay::OverlayPresenter;
use crate::providers::{TranslateError, TranslationProvider};
use crate::settings::{SettingsStore, TranslationService};
use crate::{log_error, log_info, log_warn};

use super::cache::TranslationCache;
use super::rate::{RateGate, RATE_LIMIT_COOLDOWN};

const ENABLE_LOGS: bool = true;

/// Shown while the rate-limit cooldown is active and no similar cached line
/// exists ("translation is waiting").
pub const WAITING_PLACEHOLDER: &str = "⏳ පරිවර්තනය රැඳී සිටී...";
/// Shown when a request just failed with a rate limit ("API limit, please
/// wait").
pub const RATE_LIMITED_PLACEHOLDER: &str = "⏳ API සීමාව, රැඳී සිටින්න...";
/// One-time notice emitted when the paid service runs out of quota.
pub const QUOTA_EXCEEDED_NOTICE: &str =
    "⚠️ Google Translate quota exceeded - switched to free service";

/// Routes each caption line through cache, rate gate and the configured
/// provider, degrading to cached lookups or placeholders when the providers
/// are unavailable. Never returns an error: worst case the original English
/// text comes back unchanged.
#[derive(Clone)]
pub struct Translator {
    settings: Arc<SettingsStore>,
    free: Arc<dyn TranslationProvider>,
    paid: Arc<dyn TranslationProvider>,
    presenter: Arc<dyn OverlayPresenter>,
    cache: Arc<Mutex<TranslationCache>>,
    rate: Arc<Mutex<RateGate>>,
    quota_exhausted: Arc<AtomicBool>,
}

impl Translator {
    pub fn new(
        settings: Arc<SettingsStore>,
        free: Arc<dyn TranslationProvider>,
        paid: Arc<dyn TranslationProvider>,
        presenter: Arc<dyn OverlayPresenter>,
    ) -> Self {
        Self {
            settings,
            free,
            paid,
            presenter,
            cache: Arc::new(Mutex::new(TranslationCache::new())),
            rate: Arc::new(Mutex::new(RateGate::new())),
            quota_exhausted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Translates one caption line. Checks the cache first, then waits out the
    /// request spacing while holding the gate so concurrent submissions space
    /// against each other, then calls the selected provider.
    pub async fn translate(&self, text: &str) -> String {
        {
            let cache = self.cache.lock().await;
            if let Some(hit) = cache.get(text) {
                return hit.to_string();
            }
        }

        let cooldown_remaining = {
            let mut gate = self.rate.lock().await;
            let now = Instant::now();
            if gate.in_cooldown(now) {
                gate.cooldown_remaining(now)
            } else {
                if gate.clear_elapsed_cooldown(now) {
                    log_info!("Rate limit cooldown ended, resuming translations");
                }
                gate.acquire_slot().await;
                None
            }
        };
        if let Some(remaining) = cooldown_remaining {
            log_info!(
                "Rate limit cooldown active, {}s remaining",
                remaining.as_secs()
            );
            return self.degraded(text, WAITING_PLACEHOLDER).await;
        }

        let snapshot = self.settings.snapshot();
        let use_paid = snapshot.service == TranslationService::Google
            && snapshot.has_api_key()
            && !self.quota_exhausted.load(Ordering::Relaxed);

        let result = if use_paid {
            match self.paid.translate(text).await {
                Err(TranslateError::QuotaExceeded) => {
                    self.mark_quota_exhausted();
                    self.free.translate(text).await
                }
                // Credential disappeared between the selection check and the
                // call. Serve the line through the free provider.
                Err(TranslateError::MissingCredential) => self.free.translate(text).await,
                other => other,
            }
        } else {
            self.free.translate(text).await
        };

        match result {
            Ok(translated) => {
                let mut cache = self.cache.lock().await;
                cache.put(text.to_string(), translated.clone());
                translated
            }
            Err(TranslateError::RateLimited) => {
                {
                    let mut gate = self.rate.lock().await;
                    gate.begin_cooldown(Instant::now());
                }
                log_warn!(
                    "Provider rate limited, pausing requests for {}s",
                    RATE_LIMIT_COOLDOWN.as_secs()
                );
                self.degraded(text, RATE_LIMITED_PLACEHOLDER).await
            }
            Err(err) => {
                log_error!("Translation failed: {}", err);
                text.to_string()
            }
        }
    }

    /// True once the paid service has reported an exhausted quota. The flag is
    /// sticky for the lifetime of the session.
    pub fn quota_exhausted(&self) -> bool {
        self.quota_exhausted.load(Ordering::Relaxed)
    }

    async fn degraded(&self, text: &str, placeholder: &str) -> String {
        let cache = self.cache.lock().await;
        cache
            .find_similar(text)
            .map(|hit| hit.to_string())
            .unwrap_or_else(|| placeholder.to_string())
    }

    fn mark_quota_exhausted(&self) {
        if !self.quota_exhausted.swap(true, Ordering::Relaxed) {
            log_warn!("Google Translate quota exhausted, switching to the free service");
            self.presenter.notice(QUOTA_EXCEEDED_NOTICE);
        }
    }
}
