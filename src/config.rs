use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::chunk::ChunkBoundary;
use crate::error::{Result, VoxError};
use crate::overlay::OverlayStyle;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub transcriber: TranscriberConfig,
    pub translate: TranslateConfig,
    pub synthesis: SynthesisConfig,
    pub media: MediaConfig,
    pub overlay: OverlayStyle,
    pub workspace: WorkspaceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory final videos are written to; a leading `~` is the home directory
    pub directory: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriberConfig {
    /// Speech recognition engine
    pub engine: TranscriberEngine,
    /// Path to the recognizer binary (whisper-cli or whisper)
    pub binary_path: String,
    /// Model file (whisper.cpp) or model name (OpenAI whisper)
    pub model: String,
    /// Spoken language of the input video
    pub language: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriberEngine {
    /// whisper.cpp command line tool
    WhisperCpp,
    /// OpenAI Whisper Python command line tool
    OpenaiWhisper,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// Translation backend
    pub provider: TranslationProvider,
    /// Endpoint URL of the backend
    pub endpoint: String,
    /// LLM model, only used by Ollama
    pub model: String,
    /// Source language code
    pub source_language: String,
    /// Target language code
    pub target_language: String,
    /// Provider-side request size limit in characters
    pub max_chars_per_request: usize,
    /// Where chunks are cut when the text exceeds the request limit
    pub chunking: ChunkBoundary,
    /// HTTP timeout per request in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    Google,
    Ollama,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Path to espeak-ng
    pub binary_path: String,
    /// Voice name; defaults to the translation target language
    pub voice: Option<String>,
    /// Speaking rate in words per minute
    pub rate: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    pub binary_path: String,
    /// Video codec used when re-encoding
    pub video_codec: String,
    /// Audio codec used for the replaced audio track
    pub audio_codec: String,
    /// Sample rate of the extracted PCM track (whisper.cpp wants 16 kHz)
    pub audio_sample_rate: u32,
    /// Channel count of the extracted PCM track
    pub audio_channels: u32,
    /// Additional encoding options appended before the output path
    /// Common options: ["-preset", "medium", "-crf", "23", "-pix_fmt", "yuv420p"]
    pub extra_options: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Parent directory for per-run workspaces; system temp dir when unset
    pub root: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "~/Desktop/VideoTranslatorOutput".to_string(),
        }
    }
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            engine: TranscriberEngine::WhisperCpp,
            binary_path: "whisper-cli".to_string(),
            model: "~/.voxdub/models/ggml-base.bin".to_string(),
            language: "en".to_string(),
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::Google,
            endpoint: "https://translate.googleapis.com".to_string(),
            model: "llama3.2:3b".to_string(),
            source_language: "en".to_string(),
            target_language: "ru".to_string(),
            max_chars_per_request: 4999,
            chunking: ChunkBoundary::Fixed,
            timeout_secs: 300,
        }
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            binary_path: "espeak-ng".to_string(),
            voice: None,
            rate: None,
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            binary_path: "ffmpeg".to_string(),
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            audio_sample_rate: 16000,
            audio_channels: 1,
            extra_options: vec![],
        }
    }
}

impl OutputConfig {
    /// Output directory with `~` expanded
    pub fn resolved_dir(&self) -> Result<PathBuf> {
        expand_home(&self.directory)
    }
}

impl SynthesisConfig {
    /// Voice to use when rendering text in `language`
    pub fn voice_for<'a>(&'a self, language: &'a str) -> &'a str {
        self.voice.as_deref().unwrap_or(language)
    }
}

/// Expand a leading `~` to the current user's home directory.
pub fn expand_home(path: &str) -> Result<PathBuf> {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => rest,
        _ => return Ok(PathBuf::from(path)),
    };

    let home = dirs::home_dir()
        .ok_or_else(|| VoxError::Config("Cannot determine home directory".to_string()))?;
    let rest = rest.trim_start_matches(['/', '\\']);

    Ok(if rest.is_empty() { home } else { home.join(rest) })
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| VoxError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| VoxError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| VoxError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.translate.max_chars_per_request == 0 {
            return Err(VoxError::Config(
                "translate.max_chars_per_request must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.overlay.vertical_position) {
            return Err(VoxError::Config(
                "overlay.vertical_position must be between 0.0 and 1.0".to_string(),
            ));
        }
        Ok(())
    }
}
