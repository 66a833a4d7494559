// Media processing on top of ffmpeg
//
// - Commands: argument builders for the ffmpeg invocations the pipeline uses
// - Processor: the ffmpeg-backed implementation of MediaProcessor

pub mod commands;
pub mod processor;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub use commands::*;
pub use processor::*;

use crate::config::MediaConfig;
use crate::error::Result;

/// What a media file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
    Subtitle,
}

/// A media file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAsset {
    pub path: PathBuf,
    pub kind: MediaKind,
}

impl MediaAsset {
    pub fn video<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into(), kind: MediaKind::Video }
    }

    pub fn audio<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into(), kind: MediaKind::Audio }
    }

    pub fn subtitle<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into(), kind: MediaKind::Subtitle }
    }
}

/// Video and audio operations the pipeline delegates to an external tool
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaProcessor: Send + Sync {
    /// Extract the audio track as 16-bit PCM WAV
    async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> Result<()>;

    /// Write a copy of the video whose audio track is replaced by `audio_path`
    async fn replace_audio(
        &self,
        video_path: &Path,
        audio_path: &Path,
        output_path: &Path,
    ) -> Result<()>;

    /// Burn the overlays described by a filter script into the video
    async fn overlay_subtitles(
        &self,
        video_path: &Path,
        filter_script: &Path,
        output_path: &Path,
    ) -> Result<()>;

    /// Check if the media processor is available
    async fn check_availability(&self) -> Result<()>;
}

/// Factory for creating media processor instances
pub struct MediaProcessorFactory;

impl MediaProcessorFactory {
    /// Create the default media processor implementation (FFmpeg-based)
    pub fn create_processor(config: MediaConfig) -> Box<dyn MediaProcessor> {
        Box::new(processor::FfmpegProcessor::new(config))
    }
}
