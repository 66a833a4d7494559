use async_trait::async_trait;
use std::path::Path;
use tracing::info;

use super::{MediaCommandBuilder, MediaProcessor};
use crate::config::MediaConfig;
use crate::error::{Result, VoxError};

/// ffmpeg-backed media processor
pub struct FfmpegProcessor {
    config: MediaConfig,
    command_builder: MediaCommandBuilder,
}

impl FfmpegProcessor {
    pub fn new(config: MediaConfig) -> Self {
        let command_builder = MediaCommandBuilder::new(&config.binary_path);

        Self {
            config,
            command_builder,
        }
    }
}

#[async_trait]
impl MediaProcessor for FfmpegProcessor {
    async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> Result<()> {
        info!("Extracting audio from {} to {}", video_path.display(), audio_path.display());

        self.command_builder
            .extract_audio(
                video_path,
                audio_path,
                self.config.audio_sample_rate,
                self.config.audio_channels,
            )
            .execute()
            .await?;

        info!("Audio extraction completed");
        Ok(())
    }

    async fn replace_audio(
        &self,
        video_path: &Path,
        audio_path: &Path,
        output_path: &Path,
    ) -> Result<()> {
        info!(
            "Replacing audio of {} with {} -> {}",
            video_path.display(),
            audio_path.display(),
            output_path.display()
        );

        self.command_builder
            .replace_audio(
                video_path,
                audio_path,
                output_path,
                &self.config.video_codec,
                &self.config.audio_codec,
                &self.config.extra_options,
            )
            .execute()
            .await?;

        info!("Audio replacement completed");
        Ok(())
    }

    async fn overlay_subtitles(
        &self,
        video_path: &Path,
        filter_script: &Path,
        output_path: &Path,
    ) -> Result<()> {
        info!("Burning subtitles into {} -> {}", video_path.display(), output_path.display());

        self.command_builder
            .overlay_subtitles(
                video_path,
                filter_script,
                output_path,
                &self.config.video_codec,
                &self.config.extra_options,
            )
            .execute()
            .await?;

        info!("Subtitle overlay completed");
        Ok(())
    }

    async fn check_availability(&self) -> Result<()> {
        let stdout = self
            .command_builder
            .version_check()
            .run()
            .await
            .map_err(|e| VoxError::Media(format!("Media processor not found: {}", e)))?;

        let version = stdout.lines().next().unwrap_or("unknown version");
        info!("Media processor is available: {}", version);
        Ok(())
    }
}
