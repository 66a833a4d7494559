use std::path::PathBuf;

use thiserror::Error;

use crate::workflow::Stage;

#[derive(Error, Debug)]
pub enum VoxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No speech recognized: {0}")]
    RecognitionFailure(String),

    #[error("Speech recognition service error: {0}")]
    RecognitionService(String),

    #[error("Translation error: {0}")]
    TranslationFailure(String),

    #[error("Speech synthesis error: {0}")]
    SynthesisFailure(String),

    #[error("Subtitle parse error: {0}")]
    SubtitleParse(String),

    #[error("Media processing error: {0}")]
    Media(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    InputNotFound(String),

    #[error("Unsupported operation '{0}'. Valid operations: translate, subtitle, translate-subtitle")]
    UnsupportedOperation(String),

    #[error("Run aborted: {0}")]
    Aborted(String),

    #[error("{stage} failed for {}: {source}", input.display())]
    Stage {
        stage: Stage,
        input: PathBuf,
        #[source]
        source: Box<VoxError>,
    },
}

impl VoxError {
    /// Wrap an error with the pipeline stage and input it occurred on.
    pub fn in_stage(self, stage: Stage, input: impl Into<PathBuf>) -> Self {
        Self::Stage {
            stage,
            input: input.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with stage wrappers removed.
    pub fn root_cause(&self) -> &VoxError {
        match self {
            Self::Stage { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Stage the error was raised in, if it has been wrapped.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, VoxError>;
