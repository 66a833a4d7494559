use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::info;

use super::common::{read_recognizer_json, require_speech, run_recognizer, TranscriptText, WhisperCppOutput};
use super::Transcriber;
use crate::config::{expand_home, TranscriberConfig};
use crate::error::{Result, VoxError};

/// whisper.cpp command line transcriber
pub struct WhisperCppTranscriber {
    config: TranscriberConfig,
}

impl WhisperCppTranscriber {
    pub fn new(config: TranscriberConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Transcriber for WhisperCppTranscriber {
    async fn transcribe(&self, audio_path: &Path, language: &str) -> Result<String> {
        info!("Transcribing {} with whisper.cpp", audio_path.display());

        let model = expand_home(&self.config.model)?;
        let stem = audio_path
            .file_stem()
            .ok_or_else(|| VoxError::RecognitionService("Invalid audio filename".to_string()))?
            .to_string_lossy();
        // whisper.cpp appends ".json" to the prefix
        let prefix = audio_path.with_file_name(format!("{}.transcript", stem));

        let mut cmd = Command::new(&self.config.binary_path);
        cmd.arg("-m").arg(&model)
            .arg("-f").arg(audio_path)
            .arg("-l").arg(language)
            .arg("-oj")
            .arg("-of").arg(&prefix)
            .arg("-np");

        run_recognizer(&mut cmd, "whisper.cpp").await?;

        let json_path = prefix.with_file_name(format!("{}.transcript.json", stem));
        let output: WhisperCppOutput = read_recognizer_json(&json_path).await?;

        if let Some(result) = &output.result {
            info!("whisper.cpp detected language: {}", result.language);
        }

        require_speech(output.transcript_text(), audio_path)
    }

    fn name(&self) -> &'static str {
        "whisper.cpp"
    }
}
