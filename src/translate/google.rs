use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::TranslationBackend;
use crate::error::{Result, VoxError};

/// Google's public `translate_a/single` endpoint
pub struct GoogleTranslateBackend {
    client: Client,
    endpoint: String,
}

impl GoogleTranslateBackend {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TranslationBackend for GoogleTranslateBackend {
    async fn translate_chunk(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String> {
        let url = format!("{}/translate_a/single", self.endpoint);
        debug!("Sending translation request to: {}", url);

        let response = self
            .client
            .post(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", source_language),
                ("tl", target_language),
                ("dt", "t"),
            ])
            .form(&[("q", text)])
            .send()
            .await
            .map_err(|e| VoxError::TranslationFailure(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(VoxError::TranslationFailure(format!(
                "Google Translate error {}: {}",
                status, error_text
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| VoxError::TranslationFailure(format!("Failed to parse response: {}", e)))?;

        parse_response(&body)
    }

    fn name(&self) -> &'static str {
        "google"
    }
}

/// The response is a nested array; element 0 holds `[translated, original, ...]`
/// per sentence.
fn parse_response(body: &Value) -> Result<String> {
    let sentences = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| VoxError::TranslationFailure("Unexpected response shape".to_string()))?;

    let translation: String = sentences
        .iter()
        .filter_map(|sentence| sentence.get(0).and_then(Value::as_str))
        .collect();

    if translation.trim().is_empty() {
        return Err(VoxError::TranslationFailure("Empty translation received".to_string()));
    }

    Ok(translation)
}
