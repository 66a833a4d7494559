use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate the speech of a video and/or burn subtitles into it
    Process {
        /// Input video file
        #[arg(short, long)]
        input: PathBuf,

        /// SRT subtitle file (required by the subtitle operations)
        #[arg(short, long)]
        subtitles: Option<PathBuf>,

        /// Operation: translate, subtitle, translate-subtitle
        #[arg(long, default_value = "translate")]
        operation: String,

        /// Output directory for processed files
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Language spoken in the video
        #[arg(long)]
        source_lang: Option<String>,

        /// Language to translate into
        #[arg(short, long)]
        target_lang: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Process all video files in a directory
    Batch {
        /// Input directory containing video files
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Operation: translate, subtitle, translate-subtitle
        #[arg(long, default_value = "translate")]
        operation: String,

        /// Number of videos processed concurrently
        #[arg(short, long, default_value = "1")]
        jobs: usize,

        /// Output directory for processed files
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Extract audio from video file
    Extract {
        /// Input video file
        #[arg(short, long)]
        input: PathBuf,

        /// Output audio file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Transcribe a WAV file and print the transcript
    Transcribe {
        /// Input audio file
        #[arg(short, long)]
        input: PathBuf,

        /// Spoken language
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Translate a text file
    TranslateText {
        /// Input text file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Language of the input text
        #[arg(long)]
        source_lang: Option<String>,

        /// Language to translate into
        #[arg(short, long)]
        target_lang: Option<String>,
    },

    /// Write the default configuration to a file
    Config {
        /// Output TOML file
        #[arg(short, long, default_value = "config.toml")]
        output: PathBuf,
    },
}
