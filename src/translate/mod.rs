pub mod cache;
pub mod orchestrator;
pub mod rate;

pub use cache::{TranslationCache, MAX_CACHE_ENTRIES};
pub use orchestrator::{
    Translator, QUOTA_EXCEEDED_NOTICE, RATE_LIMITED_PLACEHOLDER, WAITING_PLACEHOLDER,
};
pub use rate::{RateGate, MIN_REQUEST_SPACING, RATE_LIMIT_COOLDOWN};
