// Machine translation
//
// A TranslationBackend performs one provider request. The Translator on top
// of it keeps every request under the provider's size limit by chunking the
// text, sends the chunks strictly in order, and stops at the first failure.
//
// - Google: public translate endpoint (default)
// - Ollama: local LLM with a JSON response format

pub mod google;
pub mod ollama;

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

use crate::chunk::{self, ChunkBoundary};
use crate::config::{TranslateConfig, TranslationProvider};
use crate::error::{Result, VoxError};

/// One request to a translation provider
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    async fn translate_chunk(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String>;

    /// Provider name for logs
    fn name(&self) -> &'static str;
}

/// Chunking, fail-fast translator over a backend
pub struct Translator {
    backend: Box<dyn TranslationBackend>,
    max_chars_per_request: usize,
    boundary: ChunkBoundary,
}

impl Translator {
    pub fn new(
        backend: Box<dyn TranslationBackend>,
        max_chars_per_request: usize,
        boundary: ChunkBoundary,
    ) -> Self {
        Self {
            backend,
            max_chars_per_request,
            boundary,
        }
    }

    /// Translate `text`, one backend request per chunk, joined with single spaces.
    pub async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String> {
        let chunks = chunk::split_with(text, self.max_chars_per_request, self.boundary)?;
        let total = chunks.len();

        info!(
            "Translating {} chars in {} chunk(s) from {} to {} via {}",
            text.chars().count(),
            total,
            source_language,
            target_language,
            self.backend.name()
        );

        let mut parts = Vec::with_capacity(total);
        for (idx, chunk) in chunks.iter().enumerate() {
            if self.boundary == ChunkBoundary::Word && chunk.trim().is_empty() {
                debug!("Chunk {}/{} is whitespace only, keeping it untranslated", idx + 1, total);
                parts.push(chunk.to_string());
                continue;
            }

            debug!("Translating chunk {}/{} ({} chars)", idx + 1, total, chunk.chars().count());

            let part = self
                .backend
                .translate_chunk(chunk, source_language, target_language)
                .await
                .map_err(|e| {
                    let reason = match e {
                        VoxError::TranslationFailure(msg) => msg,
                        other => other.to_string(),
                    };
                    VoxError::TranslationFailure(format!("chunk {}/{}: {}", idx + 1, total, reason))
                })?;
            parts.push(part);
        }

        Ok(parts.join(" "))
    }
}

/// Factory for creating translators from configuration
pub struct TranslatorFactory;

impl TranslatorFactory {
    pub fn create_backend(config: &TranslateConfig) -> Result<Box<dyn TranslationBackend>> {
        let timeout = Duration::from_secs(config.timeout_secs);
        Ok(match config.provider {
            TranslationProvider::Google => {
                Box::new(google::GoogleTranslateBackend::new(&config.endpoint, timeout)?)
            }
            TranslationProvider::Ollama => {
                Box::new(ollama::OllamaBackend::new(&config.endpoint, &config.model, timeout)?)
            }
        })
    }

    pub fn create(config: &TranslateConfig) -> Result<Translator> {
        Ok(Self::with_backend(Self::create_backend(config)?, config))
    }

    /// Translator over `backend` with the configured size limit and chunking
    pub fn with_backend(backend: Box<dyn TranslationBackend>, config: &TranslateConfig) -> Translator {
        Translator::new(backend, config.max_chars_per_request, config.chunking)
    }
}
