use async_trait::async_trait;
use thiserror::Error;

pub mod google;
pub mod mymemory;

pub use google::GoogleTranslate;
pub use mymemory::MyMemory;

/// Classification of a failed provider call. Policy for each kind (cooldown,
/// fallback, pass-through) lives in the orchestrator.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// HTTP 429 or an equivalent in-payload signal.
    #[error("provider rate limited the request")]
    RateLimited,
    /// The paid provider's allowance is exhausted for this billing window.
    #[error("translation quota exceeded")]
    QuotaExceeded,
    /// The paid provider was invoked without a configured API key.
    #[error("no API credential configured")]
    MissingCredential,
    /// Any other non-success outcome, transport failures included.
    #[error("provider error: {0}")]
    ProviderError(String),
    /// The response decoded but did not have the expected shape.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

/// One translation backend. Implementations perform a single call and classify
/// their own failures into [`TranslateError`].
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    async fn translate(&self, text: &str) -> Result<String, TranslateError>;
}

/// True when `text` contains at least one character in the Sinhala Unicode
/// block (U+0D80..=U+0DFF).
pub fn contains_sinhala(text: &str) -> bool {
    text.chars().any(|ch| ('\u{0D80}'..='\u{0DFF}').contains(&ch))
}
