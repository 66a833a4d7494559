/*!
 * Integration tests for configuration files
 */

use anyhow::Result;
use assert_fs::prelude::*;

use voxdub::chunk::ChunkBoundary;
use voxdub::config::{Config, TranscriberEngine, TranslationProvider};
use voxdub::error::VoxError;

use crate::common;

#[test]
fn test_default_config_round_trips_through_file() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.child("config.toml");

    Config::default().save_to_file(path.path())?;
    let loaded = Config::from_file(path.path())?;

    assert_eq!(loaded.translate.max_chars_per_request, 4999);
    assert_eq!(loaded.translate.source_language, "en");
    assert_eq!(loaded.translate.target_language, "ru");
    assert_eq!(loaded.translate.provider, TranslationProvider::Google);
    assert_eq!(loaded.translate.chunking, ChunkBoundary::Fixed);
    assert_eq!(loaded.output.directory, "~/Desktop/VideoTranslatorOutput");
    Ok(())
}

#[test]
fn test_partial_config_keeps_defaults() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.child("config.toml");
    path.write_str(
        r#"
[transcriber]
engine = "openai_whisper"

[translate]
provider = "ollama"
target_language = "de"
chunking = "word"
"#,
    )?;

    let config = Config::from_file(path.path())?;

    assert_eq!(config.transcriber.engine, TranscriberEngine::OpenaiWhisper);
    assert_eq!(config.translate.provider, TranslationProvider::Ollama);
    assert_eq!(config.translate.target_language, "de");
    assert_eq!(config.translate.chunking, ChunkBoundary::Word);
    assert_eq!(config.translate.max_chars_per_request, 4999);
    assert_eq!(config.media.binary_path, "ffmpeg");
    Ok(())
}

#[test]
fn test_malformed_config_is_toml_error() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.child("config.toml");
    path.write_str("[translate\nprovider = \"google\"\n")?;

    let result = Config::from_file(path.path());

    assert!(matches!(result, Err(VoxError::Toml(_))));
    Ok(())
}

#[test]
fn test_invalid_config_is_rejected() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.child("config.toml");
    path.write_str("[translate]\nmax_chars_per_request = 0\n")?;

    let result = Config::from_file(path.path());

    assert!(matches!(result, Err(VoxError::Config(_))));
    Ok(())
}
