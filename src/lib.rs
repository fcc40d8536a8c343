//! Pause-gated subtitle translation for streaming video.
//!
//! Caption mutations from the player feed a debouncer that only submits
//! text while the video is paused; translations come from a free service
//! with an optional paid fallback and render through an overlay presenter.

pub mod caption;
pub mod overlay;
pub mod providers;
pub mod quota;
pub mod session;
pub mod settings;
pub mod translate;
mod utils;

pub use caption::{CaptionDebouncer, CaptionState, DEBOUNCE_WINDOW};
pub use overlay::{LogPresenter, OverlayPresenter};
pub use providers::{GoogleTranslate, MyMemory, TranslateError, TranslationProvider};
pub use quota::{
    JsonQuotaStore, MemoryQuotaStore, QuotaStore, QuotaTracker, QuotaUsage,
    DEFAULT_DAILY_CHAR_LIMIT, MONTHLY_CHAR_LIMIT,
};
pub use session::SubtitleSession;
pub use settings::{Settings, SettingsStore, TranslationService};
pub use translate::{
    TranslationCache, Translator, MIN_REQUEST_SPACING, QUOTA_EXCEEDED_NOTICE,
    RATE_LIMITED_PLACEHOLDER, RATE_LIMIT_COOLDOWN, WAITING_PLACEHOLDER,
};

/// Initializes logging from the `RUST_LOG` env var, defaulting to info level.
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}
