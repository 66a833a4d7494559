// Text-to-speech adapters

pub mod espeak;

use async_trait::async_trait;
use std::path::PathBuf;

use crate::config::SynthesisConfig;
use crate::error::Result;
use crate::workspace::Workspace;

/// Text-to-speech capability
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Render `text` with `voice` into an audio file inside `workspace`.
    ///
    /// Fails with `SynthesisFailure` when the engine cannot render the
    /// text/voice combination.
    async fn synthesize(&self, text: &str, voice: &str, workspace: &Workspace) -> Result<PathBuf>;
}

pub struct SynthesizerFactory;

impl SynthesizerFactory {
    pub fn create(config: SynthesisConfig) -> Box<dyn Synthesizer> {
        Box::new(espeak::EspeakSynthesizer::new(config))
    }
}
