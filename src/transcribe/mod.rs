// Speech recognition adapters
//
// - WhisperCpp: whisper.cpp command line tool
// - OpenAI: OpenAI Whisper Python command line tool
//
// Both write a JSON result next to the audio file (inside the run's
// workspace) which is reduced to plain transcript text.

pub mod common;
pub mod openai;
pub mod whisper_cpp;

use async_trait::async_trait;
use std::path::Path;

pub use common::*;
use crate::config::{TranscriberConfig, TranscriberEngine};
use crate::error::Result;

/// Speech-to-text capability
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Recognize the speech in a PCM WAV file.
    ///
    /// Fails with `RecognitionFailure` when nothing was recognized and with
    /// `RecognitionService` when the engine itself failed.
    async fn transcribe(&self, audio_path: &Path, language: &str) -> Result<String>;

    /// Engine name for logs
    fn name(&self) -> &'static str;
}

/// Factory for creating transcriber instances
pub struct TranscriberFactory;

impl TranscriberFactory {
    pub fn create(config: TranscriberConfig) -> Box<dyn Transcriber> {
        match config.engine {
            TranscriberEngine::WhisperCpp => Box::new(whisper_cpp::WhisperCppTranscriber::new(config)),
            TranscriberEngine::OpenaiWhisper => Box::new(openai::OpenAIWhisperTranscriber::new(config)),
        }
    }
}
