use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::TranslationBackend;
use crate::error::{Result, VoxError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
    pub done: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResult {
    pub text: String,
}

/// Translation through a local Ollama model
pub struct OllamaBackend {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaBackend {
    pub fn new(endpoint: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl TranslationBackend for OllamaBackend {
    async fn translate_chunk(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: build_prompt(text, source_language, target_language),
            stream: false,
            format: "json".to_string(),
        };

        let url = format!("{}/api/generate", self.endpoint);
        debug!("Sending translation request to: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| VoxError::TranslationFailure(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(VoxError::TranslationFailure(format!(
                "Ollama API error {}: {}",
                status, error_text
            )));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| VoxError::TranslationFailure(format!("Failed to parse response: {}", e)))?;

        debug!("Raw Ollama response: {}", generated.response);
        extract_translation(&generated.response)
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}

fn build_prompt(text: &str, source_language: &str, target_language: &str) -> String {
    let source_name = language_code_to_name(source_language);
    let target_name = language_code_to_name(target_language);

    format!(
        "You are a professional translator.\n\
         \n\
         Translate the text below from {} to {} ONLY (language code: {}).\n\
         Return ONLY the translation in JSON format as {{\"text\":\"your {} translation here\"}}.\n\
         Do not include any explanations, alternatives, or text in other languages.\n\
         \n\
         [Text to translate]\n\
         {}\n",
        source_name, target_name, target_language, target_name, text
    )
}

/// Take the `text` field of a JSON answer, or the cleaned raw answer
fn extract_translation(raw: &str) -> Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(VoxError::TranslationFailure("Empty translation received".to_string()));
    }

    if let Ok(result) = serde_json::from_str::<TranslationResult>(raw) {
        return Ok(result.text.trim().to_string());
    }

    let cleaned = raw
        .trim_start_matches("Translation:")
        .trim()
        .trim_matches('"')
        .trim()
        .to_string();

    if cleaned.is_empty() {
        return Err(VoxError::TranslationFailure("Empty translation received".to_string()));
    }
    Ok(cleaned)
}

/// Convert language code to full language name for clearer prompts
fn language_code_to_name(code: &str) -> String {
    match code.to_lowercase().as_str() {
        "en" => "English",
        "ru" => "Russian",
        "ja" => "Japanese",
        "ko" => "Korean",
        "zh" => "Chinese",
        "fr" => "French",
        "de" => "German",
        "es" => "Spanish",
        "it" => "Italian",
        "pt" => "Portuguese",
        "pl" => "Polish",
        "nl" => "Dutch",
        "tr" => "Turkish",
        "uk" => "Ukrainian",
        "ar" => "Arabic",
        "hi" => "Hindi",
        _ => return code.to_string(),
    }
    .to_string()
}
