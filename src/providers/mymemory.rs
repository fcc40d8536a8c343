use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::settings::SettingsStore;

use super::{contains_sinhala, TranslateError, TranslationProvider};

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

const ENDPOINT: &str = "https://api.mymemory.translated.net/get";
const LANG_PAIR: &str = "en|si";
/// MyMemory rejects queries longer than 500 characters.
const MAX_QUERY_CHARS: usize = 500;

/// Free provider. A contact email in the settings raises the daily request
/// allowance, so it is appended to the query when present.
pub struct MyMemory {
    http: reqwest::Client,
    settings: Arc<SettingsStore>,
}

impl MyMemory {
    pub fn new(http: reqwest::Client, settings: Arc<SettingsStore>) -> Self {
        Self { http, settings }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryResponse {
    response_status: i64,
    response_data: Option<MyMemoryData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryData {
    translated_text: Option<String>,
}

#[async_trait]
impl TranslationProvider for MyMemory {
    fn name(&self) -> &'static str {
        "mymemory"
    }

    async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        let query = truncate_query(text);
        let snapshot = self.settings.snapshot();
        let email = snapshot.user_email.trim();
        if !email.is_empty() {
            log_info!("using MyMemory with a contact email for the higher daily allowance");
        }
        let url = request_url(query, (!email.is_empty()).then_some(email));

        let response = self.http.get(&url).send().await.map_err(|err| {
            TranslateError::ProviderError(format!("MyMemory request failed: {err}"))
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TranslateError::RateLimited);
        }
        if !status.is_success() {
            return Err(TranslateError::ProviderError(format!(
                "MyMemory error: {}",
                status.as_u16()
            )));
        }

        let payload: MyMemoryResponse = response
            .json()
            .await
            .map_err(|err| TranslateError::MalformedResponse(err.to_string()))?;

        // Status checks come before payload extraction: rate-limited answers
        // often ship without a usable responseData.
        if payload.response_status == 429 {
            return Err(TranslateError::RateLimited);
        }
        if payload.response_status != 200 {
            return Err(TranslateError::ProviderError(format!(
                "MyMemory API error: {}",
                payload.response_status
            )));
        }

        let translation = payload
            .response_data
            .and_then(|data| data.translated_text)
            .ok_or_else(|| {
                TranslateError::MalformedResponse("missing responseData.translatedText".into())
            })?;

        // MyMemory signals an untranslatable pair by echoing English back.
        // Treat that as a no-op and return the source instead of erroring.
        if !contains_sinhala(&translation) {
            log_warn!("MyMemory returned no Sinhala text, passing the source through");
            return Ok(query.to_string());
        }

        Ok(translation)
    }
}

fn truncate_query(text: &str) -> &str {
    match text.char_indices().nth(MAX_QUERY_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn request_url(query: &str, contact_email: Option<&str>) -> String {
    let mut url = format!(
        "{ENDPOINT}?q={}&langpair={LANG_PAIR}",
        urlencoding::encode(query)
    );
    if let Some(email) = contact_email {
        url.push_str("&de=");
        url.push_str(&urlencoding::encode(email));
    }
    url
}
