use std::fmt;
use std::path::Path;
use std::time::Duration;

use tokio::fs;
use tracing::info;

use crate::error::{Result, VoxError};

/// One timed subtitle cue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    /// Position in the file, starting at 1
    pub index: usize,
    pub text: String,
    pub start_ms: u64,
    pub end_ms: u64,
}

impl SubtitleEntry {
    pub fn new(index: usize, text: impl Into<String>, start_ms: u64, end_ms: u64) -> Result<Self> {
        if end_ms <= start_ms {
            return Err(VoxError::SubtitleParse(format!(
                "entry {}: end {} is not after start {}",
                index,
                format_srt_time(end_ms),
                format_srt_time(start_ms)
            )));
        }

        Ok(Self {
            index,
            text: text.into(),
            start_ms,
            end_ms,
        })
    }

    pub fn start(&self) -> Duration {
        Duration::from_millis(self.start_ms)
    }

    pub fn end(&self) -> Duration {
        Duration::from_millis(self.end_ms)
    }

    pub fn start_secs(&self) -> f64 {
        self.start().as_secs_f64()
    }

    pub fn end_secs(&self) -> f64 {
        self.end().as_secs_f64()
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{} --> {}", format_srt_time(self.start_ms), format_srt_time(self.end_ms))?;
        writeln!(f, "{}", self.text)
    }
}

/// Read and parse an SRT file
pub async fn load_srt<P: AsRef<Path>>(path: P) -> Result<Vec<SubtitleEntry>> {
    let path = path.as_ref();
    info!("Parsing subtitle file: {}", path.display());

    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(VoxError::InputNotFound(path.display().to_string()));
        }
        Err(e) => return Err(VoxError::Io(e)),
    };

    let entries = parse_srt(&content)?;
    info!("Parsed {} subtitle entries", entries.len());
    Ok(entries)
}

/// Parse SRT content; entries keep file order.
pub fn parse_srt(content: &str) -> Result<Vec<SubtitleEntry>> {
    let content = content.trim_start_matches('\u{feff}').replace("\r\n", "\n");
    let mut entries = Vec::new();

    for block in content.split("\n\n").map(str::trim).filter(|b| !b.is_empty()) {
        let index = entries.len() + 1;
        let mut lines = block.lines();

        let mut timing = lines.next().unwrap_or_default();
        if !timing.contains("-->") {
            timing = lines.next().ok_or_else(|| {
                VoxError::SubtitleParse(format!("entry {}: missing timing line", index))
            })?;
        }

        let (start_ms, end_ms) = parse_timing_line(timing)
            .map_err(|e| VoxError::SubtitleParse(format!("entry {}: {}", index, e)))?;

        let text = lines.map(str::trim).collect::<Vec<_>>().join("\n");
        if text.trim().is_empty() {
            return Err(VoxError::SubtitleParse(format!("entry {}: empty text", index)));
        }

        entries.push(SubtitleEntry::new(index, text, start_ms, end_ms)?);
    }

    Ok(entries)
}

fn parse_timing_line(line: &str) -> std::result::Result<(u64, u64), String> {
    let (start, end) = line
        .split_once("-->")
        .ok_or_else(|| format!("invalid timing line '{}'", line))?;

    // Anything after the end timestamp (e.g. position hints) is ignored
    let end = end.split_whitespace().next().unwrap_or_default();

    Ok((parse_timestamp(start.trim())?, parse_timestamp(end)?))
}

/// Parse `HH:MM:SS,mmm` (or `HH:MM:SS.mmm`) into milliseconds
pub fn parse_timestamp(timestamp: &str) -> std::result::Result<u64, String> {
    let parts: Vec<&str> = timestamp.split([':', ',', '.']).collect();
    if parts.len() != 4 {
        return Err(format!("invalid timestamp '{}'", timestamp));
    }

    let mut values = [0u64; 4];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .parse()
            .map_err(|_| format!("invalid timestamp '{}'", timestamp))?;
    }
    let [hours, minutes, seconds, millis] = values;

    if minutes >= 60 || seconds >= 60 || millis >= 1000 {
        return Err(format!("out of range timestamp '{}'", timestamp));
    }

    Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
}

/// Format milliseconds as an SRT timestamp (HH:MM:SS,mmm)
pub fn format_srt_time(total_milliseconds: u64) -> String {
    let hours = total_milliseconds / 3_600_000;
    let minutes = (total_milliseconds % 3_600_000) / 60_000;
    let secs = (total_milliseconds % 60_000) / 1_000;
    let millis = total_milliseconds % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}
