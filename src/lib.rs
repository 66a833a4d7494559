//! Voxdub - Video Speech Translation Pipeline
//!
//! Replaces the spoken track of a video with a machine-translated,
//! synthesized one, burns SRT subtitles into a video, or both, by driving
//! whisper, a translation provider, espeak-ng and ffmpeg.

pub mod chunk;
pub mod cli;
pub mod config;
pub mod error;
pub mod media;
pub mod overlay;
pub mod subtitle;
pub mod synthesize;
pub mod transcribe;
pub mod translate;
pub mod workflow;
pub mod workspace;
