//! Timed text overlays rendered with ffmpeg's `drawtext` filter.
//!
//! Every subtitle entry becomes its own `drawtext` instance, enabled only
//! while `start <= t < end`. Entries are independent: overlapping cues are
//! drawn on top of each other. Text goes through `textfile=` so cue text
//! never needs filtergraph escaping.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::error::Result;
use crate::subtitle::SubtitleEntry;
use crate::workspace::Workspace;

/// Appearance of burned-in subtitles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    pub font_size: u32,
    /// ffmpeg color name or hex (`white`, `0xFFFFFF`)
    pub font_color: String,
    /// Background box color
    pub box_color: String,
    /// Padding around the text inside the box, in pixels
    pub box_border: u32,
    /// Font family, or a path to a font file
    pub font: Option<String>,
    /// Top edge of the text as a fraction of frame height
    pub vertical_position: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            font_size: 28,
            font_color: "white".to_string(),
            box_color: "black".to_string(),
            box_border: 4,
            font: None,
            vertical_position: 0.7,
        }
    }
}

impl OverlayStyle {
    fn font_option(&self) -> Option<String> {
        let font = self.font.as_deref()?;
        let is_file = font.contains('/') || font.contains('\\') || font.contains('.');
        Some(if is_file {
            format!("fontfile='{}'", escape_quoted(font))
        } else {
            format!("font='{}'", escape_quoted(font))
        })
    }

    /// `drawtext` filter for one entry whose text is stored in `textfile`
    pub fn drawtext(&self, textfile: &Path, entry: &SubtitleEntry) -> String {
        let mut options = Vec::new();
        if let Some(font) = self.font_option() {
            options.push(font);
        }
        options.push(format!("textfile='{}'", escape_quoted(&textfile.to_string_lossy())));
        // Cue text is literal; `%` and `\` must not be expanded
        options.push("expansion=none".to_string());
        options.push(format!("fontsize={}", self.font_size));
        options.push(format!("fontcolor={}", self.font_color));
        options.push("box=1".to_string());
        options.push(format!("boxcolor={}", self.box_color));
        options.push(format!("boxborderw={}", self.box_border));
        options.push("x=(w-text_w)/2".to_string());
        options.push(format!("y=h*{}", self.vertical_position));
        options.push(format!(
            "enable='gte(t,{:.3})*lt(t,{:.3})'",
            entry.start_secs(),
            entry.end_secs()
        ));

        format!("drawtext={}", options.join(":"))
    }
}

/// Filter script and text files prepared for one compositing pass
#[derive(Debug, Clone)]
pub struct OverlayPlan {
    pub filter_script: PathBuf,
    pub entries: usize,
}

impl OverlayPlan {
    /// Write the per-entry text files and the filter script into `workspace`.
    pub async fn build(
        entries: &[SubtitleEntry],
        style: &OverlayStyle,
        workspace: &Workspace,
    ) -> Result<Self> {
        let text_dir = workspace.subdir("overlay")?;
        let mut filters = Vec::with_capacity(entries.len());

        for (position, entry) in entries.iter().enumerate() {
            let textfile = text_dir.join(format!("entry_{:05}.txt", position + 1));
            fs::write(&textfile, &entry.text).await?;
            filters.push(style.drawtext(&textfile, entry));
        }

        let script = if filters.is_empty() {
            "null".to_string()
        } else {
            filters.join(",")
        };

        let filter_script = workspace.file("overlay.filter");
        fs::write(&filter_script, &script).await?;
        debug!("Wrote overlay filter script with {} entries", filters.len());

        Ok(Self {
            filter_script,
            entries: entries.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }
}

/// Escape a value placed inside single quotes in a filtergraph.
fn escape_quoted(value: &str) -> String {
    value.replace('\\', "/").replace('\'', r"'\''")
}
