//! Pipeline orchestration.
//!
//! A run moves through the stages of one of two machines:
//!
//! - translate: extracting audio → transcribing → translating →
//!   synthesizing → remuxing → writing output
//! - subtitles: parsing subtitles → compositing → writing output
//!
//! The combined operation runs the translate machine to completion and feeds
//! its output video into the subtitle machine. A stage starts only after the
//! previous one succeeded; the first failure ends the run. Every run owns one
//! [`Workspace`], released exactly once however the run ends, and results are
//! moved into the output directory only when complete.

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use serde::Serialize;
use tokio::fs;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{Result, VoxError};
use crate::media::{MediaAsset, MediaProcessor, MediaProcessorFactory};
use crate::overlay::OverlayPlan;
use crate::subtitle::load_srt;
use crate::synthesize::{Synthesizer, SynthesizerFactory};
use crate::transcribe::{require_speech, Transcriber, TranscriberFactory};
use crate::translate::{Translator, TranslatorFactory};
use crate::workspace::Workspace;

const TRANSLATED_SUFFIX: &str = "_translated";
const SUBTITLED_SUFFIX: &str = "_with_subs";
const DEFAULT_EXTENSION: &str = "mp4";

/// What a run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Translate,
    AddSubtitles,
    TranslateAndAddSubtitles,
}

impl Operation {
    pub fn needs_subtitles(&self) -> bool {
        matches!(self, Self::AddSubtitles | Self::TranslateAndAddSubtitles)
    }
}

impl FromStr for Operation {
    type Err = VoxError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "translate" => Ok(Self::Translate),
            "subtitle" | "subtitles" | "add-subtitles" => Ok(Self::AddSubtitles),
            "translate-subtitle" | "translate-subtitles" | "translate-and-add-subtitles" => {
                Ok(Self::TranslateAndAddSubtitles)
            }
            _ => Err(VoxError::UnsupportedOperation(s.to_string())),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Translate => "translate",
            Self::AddSubtitles => "subtitle",
            Self::TranslateAndAddSubtitles => "translate-subtitle",
        })
    }
}

/// Pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ExtractingAudio,
    Transcribing,
    Translating,
    Synthesizing,
    Remuxing,
    ParsingSubtitles,
    Compositing,
    WritingOutput,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ExtractingAudio => "extracting audio",
            Self::Transcribing => "transcribing",
            Self::Translating => "translating",
            Self::Synthesizing => "synthesizing",
            Self::Remuxing => "remuxing",
            Self::ParsingSubtitles => "parsing subtitles",
            Self::Compositing => "compositing",
            Self::WritingOutput => "writing output",
        })
    }
}

/// Where a run currently is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running(Stage),
    Done,
    Failed(String),
}

/// Records stage transitions and mirrors them on a progress bar
#[derive(Debug)]
pub struct StageTracker {
    state: RunState,
    history: Vec<Stage>,
    progress: ProgressBar,
}

impl StageTracker {
    pub fn new(progress: ProgressBar) -> Self {
        Self {
            state: RunState::Idle,
            history: Vec::new(),
            progress,
        }
    }

    fn enter(&mut self, stage: Stage) {
        info!("Stage: {}", stage);
        self.state = RunState::Running(stage);
        self.history.push(stage);
        self.progress.set_message(stage.to_string());
        self.progress.tick();
    }

    fn finish(&mut self) {
        self.state = RunState::Done;
        self.progress.finish_with_message("done");
    }

    fn fail(&mut self, error: &VoxError) {
        self.state = RunState::Failed(error.to_string());
        self.progress.abandon_with_message("failed");
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn history(&self) -> &[Stage] {
        &self.history
    }
}

/// One invocation of the pipeline
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub video: MediaAsset,
    pub subtitles: Option<MediaAsset>,
    pub operation: Operation,
}

impl PipelineRequest {
    pub fn new<P: Into<PathBuf>>(video: P, subtitles: Option<PathBuf>, operation: Operation) -> Self {
        Self {
            video: MediaAsset::video(video),
            subtitles: subtitles.map(MediaAsset::subtitle),
            operation,
        }
    }

    /// Check that every input the operation needs exists
    pub fn validate(&self) -> Result<()> {
        if !self.video.path.is_file() {
            return Err(VoxError::InputNotFound(self.video.path.display().to_string()));
        }

        if self.operation.needs_subtitles() {
            let subtitles = self.subtitle_path()?;
            if !subtitles.is_file() {
                return Err(VoxError::InputNotFound(subtitles.display().to_string()));
            }
        }

        Ok(())
    }

    fn subtitle_path(&self) -> Result<&Path> {
        self.subtitles.as_ref().map(|asset| asset.path.as_path()).ok_or_else(|| {
            VoxError::InputNotFound(format!(
                "operation '{}' requires a subtitle file",
                self.operation
            ))
        })
    }
}

/// Final result of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct OutputAsset {
    pub path: PathBuf,
    pub operation: Operation,
    pub run_id: Uuid,
    pub stages: Vec<Stage>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// `{stem}{suffix}.{ext}` for the given video
pub fn output_file_name(video: &Path, suffix: &str) -> Result<String> {
    let stem = video
        .file_stem()
        .ok_or_else(|| VoxError::Config(format!("Invalid video filename: {}", video.display())))?
        .to_string_lossy();
    let extension = video
        .extension()
        .map(|ext| ext.to_string_lossy())
        .unwrap_or(DEFAULT_EXTENSION.into());

    Ok(format!("{}{}.{}", stem, suffix, extension))
}

/// External capabilities the workflow drives
pub struct Components {
    pub transcriber: Box<dyn Transcriber>,
    pub translator: Translator,
    pub synthesizer: Box<dyn Synthesizer>,
    pub media: Box<dyn MediaProcessor>,
}

impl Components {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            transcriber: TranscriberFactory::create(config.transcriber.clone()),
            translator: TranslatorFactory::create(&config.translate)?,
            synthesizer: SynthesizerFactory::create(config.synthesis.clone()),
            media: MediaProcessorFactory::create_processor(config.media.clone()),
        })
    }
}

pub struct Workflow {
    config: Config,
    output_dir: PathBuf,
    transcriber: Box<dyn Transcriber>,
    translator: Translator,
    synthesizer: Box<dyn Synthesizer>,
    media: Box<dyn MediaProcessor>,
    progress: ProgressBar,
}

impl Workflow {
    pub fn new(config: Config) -> Result<Self> {
        let components = Components::from_config(&config)?;
        Self::from_parts(config, components)
    }

    pub fn from_parts(config: Config, components: Components) -> Result<Self> {
        config.validate()?;
        let output_dir = config.output.resolved_dir()?;

        Ok(Self {
            config,
            output_dir,
            transcriber: components.transcriber,
            translator: components.translator,
            synthesizer: components.synthesizer,
            media: components.media,
            progress: ProgressBar::hidden(),
        })
    }

    /// Report stage changes on `progress`
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create the output directory. Idempotent.
    pub async fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).await?;
        Ok(())
    }

    /// Check the external tools the workflow shells out to
    pub async fn check_dependencies(&self) -> Result<()> {
        self.media.check_availability().await
    }

    /// Run one request to completion or to its first failure
    pub async fn run(&self, request: &PipelineRequest) -> Result<OutputAsset> {
        let run_id = Uuid::new_v4();
        let span = info_span!("run", id = %run_id, video = %request.video.path.display());
        self.run_with_id(request, run_id).instrument(span).await
    }

    async fn run_with_id(&self, request: &PipelineRequest, run_id: Uuid) -> Result<OutputAsset> {
        let started_at = Utc::now();
        info!("Starting {} for {}", request.operation, request.video.path.display());

        request.validate()?;
        self.prepare().await?;

        let mut workspace = Workspace::create(&self.config.workspace, run_id)?;
        let mut tracker = StageTracker::new(self.progress.clone());

        let result = self.execute(request, &mut workspace, &mut tracker).await;

        if let Err(e) = workspace.release() {
            warn!("Workspace cleanup incomplete: {}", e);
        }

        match result {
            Ok(path) => {
                tracker.finish();
                info!("Output written to {}", path.display());
                Ok(OutputAsset {
                    path,
                    operation: request.operation,
                    run_id,
                    stages: tracker.history().to_vec(),
                    started_at,
                    finished_at: Utc::now(),
                })
            }
            Err(e) => {
                tracker.fail(&e);
                warn!("Run failed: {}", e);
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        request: &PipelineRequest,
        workspace: &mut Workspace,
        tracker: &mut StageTracker,
    ) -> Result<PathBuf> {
        let video = request.video.path.as_path();

        match request.operation {
            Operation::Translate => self.translate_video(video, workspace, tracker).await,
            Operation::AddSubtitles => {
                let subtitles = request.subtitle_path()?;
                self.subtitle_video(video, subtitles, workspace, tracker).await
            }
            Operation::TranslateAndAddSubtitles => {
                let subtitles = request.subtitle_path()?;
                let translated = self.translate_video(video, workspace, tracker).await?;
                self.subtitle_video(&translated, subtitles, workspace, tracker).await
            }
        }
    }

    async fn translate_video(
        &self,
        video: &Path,
        workspace: &mut Workspace,
        tracker: &mut StageTracker,
    ) -> Result<PathBuf> {
        let output_name = output_file_name(video, TRANSLATED_SUFFIX)?;
        let translate = &self.config.translate;
        let audio = MediaAsset::audio(workspace.file("extracted_audio.wav"));
        let audio_path = audio.path.as_path();

        run_stage(tracker, Stage::ExtractingAudio, video, self.media.extract_audio(video, audio_path))
            .await?;

        let transcript = run_stage(tracker, Stage::Transcribing, video, async {
            let text = self.transcriber.transcribe(audio_path, &self.config.transcriber.language).await?;
            require_speech(text, audio_path)
        })
        .await?;
        info!("Transcript has {} chars", transcript.chars().count());

        let translated = run_stage(
            tracker,
            Stage::Translating,
            video,
            self.translator.translate(&transcript, &translate.source_language, &translate.target_language),
        )
        .await?;

        let voice = self.config.synthesis.voice_for(&translate.target_language);
        let speech = run_stage(
            tracker,
            Stage::Synthesizing,
            video,
            self.synthesizer.synthesize(&translated, voice, workspace),
        )
        .await?;

        let remuxed = workspace.file(&output_name);
        run_stage(
            tracker,
            Stage::Remuxing,
            video,
            self.media.replace_audio(video, &speech, &remuxed),
        )
        .await?;

        tracker.enter(Stage::WritingOutput);
        promote(&remuxed, &self.output_dir.join(&output_name), workspace)
            .await
            .map_err(|e| e.in_stage(Stage::WritingOutput, video))
    }

    async fn subtitle_video(
        &self,
        video: &Path,
        subtitles: &Path,
        workspace: &mut Workspace,
        tracker: &mut StageTracker,
    ) -> Result<PathBuf> {
        let output_name = output_file_name(video, SUBTITLED_SUFFIX)?;

        let entries = run_stage(tracker, Stage::ParsingSubtitles, subtitles, load_srt(subtitles)).await?;

        let composited = workspace.file(&output_name);
        let plan = run_stage(tracker, Stage::Compositing, video, async {
            let plan = OverlayPlan::build(&entries, &self.config.overlay, workspace).await?;
            self.media
                .overlay_subtitles(video, &plan.filter_script, &composited)
                .await?;
            Ok(plan)
        })
        .await?;
        info!("Composited {} subtitle overlays", plan.len());

        tracker.enter(Stage::WritingOutput);
        promote(&composited, &self.output_dir.join(&output_name), workspace)
            .await
            .map_err(|e| e.in_stage(Stage::WritingOutput, video))
    }

    /// Extract a video's audio track to `audio_path`
    pub async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> Result<()> {
        if !video_path.is_file() {
            return Err(VoxError::InputNotFound(video_path.display().to_string()));
        }
        self.media.extract_audio(video_path, audio_path).await
    }

    /// Transcribe a PCM WAV file
    pub async fn transcribe_audio(&self, audio_path: &Path, language: &str) -> Result<String> {
        if !audio_path.is_file() {
            return Err(VoxError::InputNotFound(audio_path.display().to_string()));
        }
        let text = self.transcriber.transcribe(audio_path, language).await?;
        require_speech(text, audio_path)
    }

    /// Translate free text with the configured backend and chunking
    pub async fn translate_text(&self, text: &str) -> Result<String> {
        let translate = &self.config.translate;
        self.translator
            .translate(text, &translate.source_language, &translate.target_language)
            .await
    }
}

const VIDEO_EXTENSIONS: [&str; 7] = ["mp4", "avi", "mov", "mkv", "wmv", "flv", "webm"];

/// Video files below `input_dir`, sorted by path
pub fn find_videos(input_dir: &Path) -> Result<Vec<PathBuf>> {
    if !input_dir.is_dir() {
        return Err(VoxError::InputNotFound(format!(
            "{} is not a directory",
            input_dir.display()
        )));
    }

    let mut videos: Vec<PathBuf> = WalkDir::new(input_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        })
        .collect();
    videos.sort();

    Ok(videos)
}

/// One request per video below `input_dir`. Subtitle operations use the
/// sibling `{stem}.srt`.
pub fn batch_requests(input_dir: &Path, operation: Operation) -> Result<Vec<PipelineRequest>> {
    let videos = find_videos(input_dir)?;
    info!("Found {} video files in {}", videos.len(), input_dir.display());

    Ok(videos
        .into_iter()
        .map(|video| {
            let subtitles = operation
                .needs_subtitles()
                .then(|| video.with_extension("srt"));
            PipelineRequest::new(video, subtitles, operation)
        })
        .collect())
}

/// Run `requests` with at most `jobs` in flight. Results come back in
/// request order, one per request; a task that panicked yields `Aborted`.
pub async fn run_batch(
    workflow: Arc<Workflow>,
    requests: Vec<PipelineRequest>,
    jobs: usize,
) -> Vec<(PathBuf, Result<OutputAsset>)> {
    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
    let videos: Vec<PathBuf> = requests.iter().map(|r| r.video.path.clone()).collect();
    let mut outcomes: Vec<Option<Result<OutputAsset>>> = videos.iter().map(|_| None).collect();
    let mut tasks = JoinSet::new();

    for (idx, request) in requests.into_iter().enumerate() {
        let workflow = Arc::clone(&workflow);
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let result = match semaphore.acquire_owned().await {
                Ok(_permit) => workflow.run(&request).await,
                Err(e) => Err(VoxError::Aborted(format!("batch scheduler closed: {}", e))),
            };
            (idx, result)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((idx, result)) => outcomes[idx] = Some(result),
            Err(e) => warn!("Batch task aborted: {}", e),
        }
    }

    videos
        .into_iter()
        .zip(outcomes)
        .map(|(video, outcome)| {
            let result = outcome.unwrap_or_else(|| {
                Err(VoxError::Aborted(format!(
                    "processing of {} panicked or was cancelled",
                    video.display()
                )))
            });
            (video, result)
        })
        .collect()
}

async fn run_stage<T>(
    tracker: &mut StageTracker,
    stage: Stage,
    input: &Path,
    operation: impl Future<Output = Result<T>>,
) -> Result<T> {
    tracker.enter(stage);
    operation.await.map_err(|e| e.in_stage(stage, input))
}

/// Move a finished file from the workspace to `destination`.
///
/// A rename is atomic. When the workspace is on another filesystem the file
/// is copied to a hidden sibling of `destination` first, so the final name
/// only ever refers to a complete file.
async fn promote(source: &Path, destination: &Path, workspace: &mut Workspace) -> Result<PathBuf> {
    match fs::rename(source, destination).await {
        Ok(()) => Ok(destination.to_path_buf()),
        Err(e) => {
            debug!("Rename into output directory failed ({}), copying instead", e);
            copy_into_place(source, destination, workspace).await
        }
    }
}

async fn copy_into_place(source: &Path, destination: &Path, workspace: &mut Workspace) -> Result<PathBuf> {
    let file_name = destination
        .file_name()
        .ok_or_else(|| VoxError::Config(format!("Invalid output path: {}", destination.display())))?
        .to_string_lossy();
    let partial = destination.with_file_name(format!(".{}.partial", file_name));
    workspace.track(&partial);

    fs::copy(source, &partial).await?;
    fs::rename(&partial, destination).await?;

    Ok(destination.to_path_buf())
}
