use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::quota::QuotaTracker;
use crate::settings::SettingsStore;

use super::{TranslateError, TranslationProvider};

const ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";
const SOURCE_LANG: &str = "en";
const TARGET_LANG: &str = "si";

/// Paid provider (Google Cloud Translation v2). Requires an API key from the
/// settings; successful calls report character usage to the quota tracker.
pub struct GoogleTranslate {
    http: reqwest::Client,
    settings: Arc<SettingsStore>,
    quota: Arc<QuotaTracker>,
}

impl GoogleTranslate {
    pub fn new(
        http: reqwest::Client,
        settings: Arc<SettingsStore>,
        quota: Arc<QuotaTracker>,
    ) -> Self {
        Self {
            http,
            settings,
            quota,
        }
    }
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    target: &'a str,
    source: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslationList,
}

#[derive(Debug, Deserialize)]
struct TranslationList {
    translations: Vec<TranslationItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslationItem {
    translated_text: String,
}

#[async_trait]
impl TranslationProvider for GoogleTranslate {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        let snapshot = self.settings.snapshot();
        let api_key = snapshot.api_key.trim();
        if api_key.is_empty() {
            return Err(TranslateError::MissingCredential);
        }

        let body = TranslateRequest {
            q: text,
            target: TARGET_LANG,
            source: SOURCE_LANG,
        };
        let response = self
            .http
            .post(ENDPOINT)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                TranslateError::ProviderError(format!("Google Translate request failed: {err}"))
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::FORBIDDEN
            || status == reqwest::StatusCode::TOO_MANY_REQUESTS
        {
            return Err(TranslateError::QuotaExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if body.to_ascii_lowercase().contains("quota") {
                return Err(TranslateError::QuotaExceeded);
            }
            return Err(TranslateError::ProviderError(format!(
                "Google Translate API error: {}",
                status.as_u16()
            )));
        }

        let payload: TranslateResponse = response
            .json()
            .await
            .map_err(|err| TranslateError::MalformedResponse(err.to_string()))?;

        let translation = payload
            .data
            .translations
            .into_iter()
            .next()
            .ok_or_else(|| TranslateError::MalformedResponse("empty translations list".into()))?
            .translated_text;

        // Accounting never delays the result.
        self.quota.record_usage(text.chars().count() as u64);

        Ok(translation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quota::MemoryQuotaStore;
    use crate::settings::Settings;

    #[test]
    fn request_body_matches_the_wire_format() {
        let body = TranslateRequest {
            q: "Hello",
            target: TARGET_LANG,
            source: SOURCE_LANG,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"q": "Hello", "target": "si", "source": "en"})
        );
    }

    #[test]
    fn extracts_the_first_translation() {
        let payload: TranslateResponse = serde_json::from_str(
            r#"{"data":{"translations":[{"translatedText":"ආයුබෝවන් ලෝකය"},{"translatedText":"ignored"}]}}"#,
        )
        .unwrap();
        assert_eq!(
            payload.data.translations[0].translated_text,
            "ආයුබෝවන් ලෝකය"
        );
    }

    #[tokio::test]
    async fn missing_credential_fails_without_a_network_attempt() {
        let settings = Arc::new(SettingsStore::ephemeral(Settings::default()));
        let quota = Arc::new(QuotaTracker::new(Arc::new(MemoryQuotaStore::new())));
        let google = GoogleTranslate::new(reqwest::Client::new(), settings, quota);

        let err = google.translate("Hello").await.unwrap_err();
        assert!(matches!(err, TranslateError::MissingCredential));
    }
}
