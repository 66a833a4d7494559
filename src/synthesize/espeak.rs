use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info};

use super::Synthesizer;
use crate::config::SynthesisConfig;
use crate::error::{Result, VoxError};
use crate::workspace::Workspace;

/// espeak-ng command line synthesizer
pub struct EspeakSynthesizer {
    config: SynthesisConfig,
}

impl EspeakSynthesizer {
    pub fn new(config: SynthesisConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Synthesizer for EspeakSynthesizer {
    async fn synthesize(&self, text: &str, voice: &str, workspace: &Workspace) -> Result<PathBuf> {
        let text_path = workspace.file("translated_text.txt");
        let speech_path = workspace.file("translated_speech.wav");

        // Long texts exceed argv limits, so the text goes through a file
        fs::write(&text_path, text).await?;

        info!("Synthesizing {} chars with voice '{}'", text.chars().count(), voice);

        let mut cmd = Command::new(&self.config.binary_path);
        cmd.arg("-v").arg(voice);
        if let Some(rate) = self.config.rate {
            cmd.arg("-s").arg(rate.to_string());
        }
        cmd.arg("-w").arg(&speech_path)
            .arg("-f").arg(&text_path)
            .stdin(Stdio::null());

        debug!("Executing espeak-ng: {:?}", cmd);

        let output = cmd
            .output()
            .await
            .map_err(|e| VoxError::SynthesisFailure(format!("Failed to execute espeak-ng: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VoxError::SynthesisFailure(format!(
                "espeak-ng failed for voice '{}': {}",
                voice,
                stderr.trim()
            )));
        }

        match fs::metadata(&speech_path).await {
            Ok(meta) if meta.len() > 0 => {}
            _ => {
                return Err(VoxError::SynthesisFailure(format!(
                    "espeak-ng produced no audio for voice '{}'",
                    voice
                )));
            }
        }

        info!("Speech written to {}", speech_path.display());
        Ok(speech_path)
    }
}
