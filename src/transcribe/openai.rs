// OpenAI Whisper Python command line tool

use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::info;

use super::common::{read_recognizer_json, require_speech, run_recognizer, OpenAIWhisperOutput, TranscriptText};
use super::Transcriber;
use crate::config::TranscriberConfig;
use crate::error::{Result, VoxError};

pub struct OpenAIWhisperTranscriber {
    config: TranscriberConfig,
}

impl OpenAIWhisperTranscriber {
    pub fn new(config: TranscriberConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Transcriber for OpenAIWhisperTranscriber {
    async fn transcribe(&self, audio_path: &Path, language: &str) -> Result<String> {
        info!("Transcribing {} with OpenAI Whisper", audio_path.display());

        let output_dir = audio_path
            .parent()
            .ok_or_else(|| VoxError::RecognitionService("Audio file has no parent directory".to_string()))?;
        let stem = audio_path
            .file_stem()
            .ok_or_else(|| VoxError::RecognitionService("Invalid audio filename".to_string()))?
            .to_string_lossy();

        let mut cmd = Command::new(&self.config.binary_path);
        cmd.arg(audio_path)
            .arg("--model").arg(&self.config.model)
            .arg("--output_dir").arg(output_dir)
            .arg("--output_format").arg("json")
            .arg("--language").arg(language);

        run_recognizer(&mut cmd, "whisper").await?;

        let json_path = output_dir.join(format!("{}.json", stem));
        let output: OpenAIWhisperOutput = read_recognizer_json(&json_path).await?;

        if let Some(detected) = &output.language {
            info!("OpenAI Whisper detected language: {}", detected);
        }

        require_speech(output.transcript_text(), audio_path)
    }

    fn name(&self) -> &'static str {
        "openai-whisper"
    }
}
