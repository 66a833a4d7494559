//! Voxdub - Video Speech Translation Pipeline
//!
//! Command line entry point: loads configuration, sets up logging and runs
//! the requested pipeline command.

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use voxdub::cli::{Args, Commands};
use voxdub::config::Config;
use voxdub::error::VoxError;
use voxdub::workflow::{self, Operation, PipelineRequest, Workflow};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;
    info!("Starting Voxdub - Video Speech Translation Pipeline");

    // Load configuration
    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            // Try to load config.toml from current directory first
            if Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    match args.command {
        Commands::Process {
            input,
            subtitles,
            operation,
            output_dir,
            source_lang,
            target_lang,
            json,
        } => {
            let operation = parse_operation(&operation)?;
            apply_overrides(&mut config, output_dir.as_deref(), source_lang, target_lang);

            let spinner = create_spinner(&input);
            let workflow = Workflow::new(config)?.with_progress(spinner);
            workflow.check_dependencies().await?;

            let request = PipelineRequest::new(input, subtitles, operation);
            let output = workflow.run(&request).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{}", output.path.display());
            }
        }
        Commands::Batch {
            input_dir,
            operation,
            jobs,
            output_dir,
        } => {
            let operation = parse_operation(&operation)?;
            apply_overrides(&mut config, output_dir.as_deref(), None, None);

            let workflow = Arc::new(Workflow::new(config)?);
            workflow.check_dependencies().await?;

            let requests = workflow::batch_requests(&input_dir, operation)?;
            let total = requests.len();
            info!("Processing {} videos with {} job(s)", total, jobs.max(1));

            let results = workflow::run_batch(workflow, requests, jobs).await;

            let mut failed = 0;
            for (video, result) in &results {
                match result {
                    Ok(output) => info!("{} -> {}", video.display(), output.path.display()),
                    Err(e) => {
                        failed += 1;
                        error!("Failed to process {}: {}", video.display(), e);
                    }
                }
            }

            info!("Batch finished: {} succeeded, {} failed", results.len() - failed, failed);
            if failed > 0 {
                anyhow::bail!("{} of {} videos failed", failed, total);
            }
        }
        Commands::Extract { input, output } => {
            info!("Extracting audio from: {}", input.display());
            let workflow = Workflow::new(config)?;
            workflow.extract_audio(&input, &output).await?;
            info!("Audio extracted to: {}", output.display());
        }
        Commands::Transcribe { input, language } => {
            info!("Transcribing audio file: {}", input.display());
            let workflow = Workflow::new(config)?;
            let language = language.unwrap_or_else(|| workflow.config().transcriber.language.clone());
            let transcript = workflow.transcribe_audio(&input, &language).await?;
            println!("{}", transcript);
        }
        Commands::TranslateText {
            input,
            output,
            source_lang,
            target_lang,
        } => {
            info!("Translating text file: {}", input.display());
            apply_overrides(&mut config, None, source_lang, target_lang);

            let text = tokio::fs::read_to_string(&input)
                .await
                .map_err(|_| VoxError::InputNotFound(input.display().to_string()))?;
            let workflow = Workflow::new(config)?;
            let translated = workflow.translate_text(&text).await?;

            match output {
                Some(path) => {
                    tokio::fs::write(&path, &translated).await?;
                    info!("Translation written to: {}", path.display());
                }
                None => println!("{}", translated),
            }
        }
        Commands::Config { output } => {
            Config::default().save_to_file(&output)?;
            println!("Default configuration written to {}", output.display());
        }
    }

    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".voxdub").join("log");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = rolling::daily(&log_dir, "voxdub.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Console goes to stderr so stdout only carries results
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!(
        "Logging initialized - console: {}, file: {}",
        log_level,
        log_dir.join("voxdub.log").display()
    );

    Ok(())
}

/// Parse an operation selector from the command line
fn parse_operation(operation: &str) -> Result<Operation> {
    Ok(operation.parse::<Operation>()?)
}

/// Command line flags take precedence over the configuration file
fn apply_overrides(
    config: &mut Config,
    output_dir: Option<&Path>,
    source_lang: Option<String>,
    target_lang: Option<String>,
) {
    if let Some(dir) = output_dir {
        config.output.directory = dir.to_string_lossy().to_string();
    }
    if let Some(lang) = source_lang {
        config.transcriber.language = lang.clone();
        config.translate.source_language = lang;
    }
    if let Some(lang) = target_lang {
        config.translate.target_language = lang;
    }
}

fn create_spinner(input: &Path) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {prefix}: {msg} [{elapsed}]") {
        spinner.set_style(style);
    }
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    spinner.set_prefix(name);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
