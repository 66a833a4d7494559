use std::path::Path;
use std::process::Stdio;

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::debug;

use crate::error::{Result, VoxError};

/// whisper.cpp `-oj` output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperCppOutput {
    pub result: Option<WhisperCppResult>,
    pub transcription: Vec<WhisperCppSegment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperCppResult {
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperCppSegment {
    pub text: String,
}

/// OpenAI Whisper `--output_format json` output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIWhisperOutput {
    pub text: String,
    pub language: Option<String>,
}

/// Converts an engine-specific result into plain transcript text
pub trait TranscriptText {
    fn transcript_text(&self) -> String;
}

impl TranscriptText for WhisperCppOutput {
    fn transcript_text(&self) -> String {
        self.transcription
            .iter()
            .map(|seg| seg.text.trim())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl TranscriptText for OpenAIWhisperOutput {
    fn transcript_text(&self) -> String {
        self.text.trim().to_string()
    }
}

/// Accept a transcript only if it contains recognized speech
pub fn require_speech(text: String, audio_path: &Path) -> Result<String> {
    if text.trim().is_empty() {
        return Err(VoxError::RecognitionFailure(format!(
            "no speech recognized in {}",
            audio_path.display()
        )));
    }
    Ok(text)
}

/// Run a recognizer process; spawn failures and non-zero exits are service errors
pub async fn run_recognizer(command: &mut Command, name: &str) -> Result<()> {
    debug!("Executing {}: {:?}", name, command);

    let output = command
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| VoxError::RecognitionService(format!("Failed to execute {}: {}", name, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(VoxError::RecognitionService(format!(
            "{} failed: {}",
            name,
            stderr.trim()
        )));
    }

    Ok(())
}

/// Read and decode the JSON file a recognizer wrote
pub async fn read_recognizer_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let json_content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| VoxError::RecognitionService(format!("Failed to read output {}: {}", path.display(), e)))?;

    serde_json::from_str(&json_content)
        .map_err(|e| VoxError::RecognitionService(format!("Failed to parse recognizer JSON: {}", e)))
}
