/*!
 * Integration tests for loading SRT files and turning them into overlays
 */

use anyhow::Result;
use uuid::Uuid;

use voxdub::error::VoxError;
use voxdub::overlay::{OverlayPlan, OverlayStyle};
use voxdub::subtitle::load_srt;
use voxdub::workspace::Workspace;

use crate::common;

#[tokio::test]
async fn test_load_srt_keeps_file_order_and_timing() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(&dir, "movie.srt", common::SAMPLE_SRT)?;

    let entries = load_srt(&path).await?;

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].text, "This is a test subtitle.");
    assert_eq!((entries[1].start_ms, entries[1].end_ms), (5_000, 8_500));
    assert_eq!(entries[2].text, "Line one\nLine two");
    assert!((entries[1].end_secs() - 8.5).abs() < f64::EPSILON);
    Ok(())
}

#[tokio::test]
async fn test_load_srt_accepts_windows_line_endings_and_bom() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let content = format!("\u{feff}{}", common::SAMPLE_SRT.replace('\n', "\r\n"));
    let path = common::create_test_file(&dir, "windows.srt", &content)?;

    let entries = load_srt(&path).await?;

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[2].text, "Line one\nLine two");
    Ok(())
}

#[tokio::test]
async fn test_load_srt_missing_file_is_input_not_found() -> Result<()> {
    let dir = common::create_temp_dir()?;

    let result = load_srt(dir.path().join("absent.srt")).await;

    assert!(matches!(result, Err(VoxError::InputNotFound(_))));
    Ok(())
}

#[tokio::test]
async fn test_load_srt_rejects_backwards_entry() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        &dir,
        "bad.srt",
        "1\n00:00:01,000 --> 00:00:02,000\nfine\n\n2\n00:00:05,000 --> 00:00:05,000\nzero length\n",
    )?;

    let result = load_srt(&path).await;

    assert!(matches!(result, Err(VoxError::SubtitleParse(msg)) if msg.contains("entry 2")));
    Ok(())
}

#[tokio::test]
async fn test_overlay_plan_has_one_filter_per_entry() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(&dir, "movie.srt", common::SAMPLE_SRT)?;
    let work_root = common::create_temp_dir()?;
    let workspace = Workspace::create(&common::workspace_config(&work_root), Uuid::new_v4())?;

    let entries = load_srt(&path).await?;
    let plan = OverlayPlan::build(&entries, &OverlayStyle::default(), &workspace).await?;

    assert_eq!(plan.len(), 3);
    let script = std::fs::read_to_string(&plan.filter_script)?;
    assert_eq!(script.matches("drawtext=").count(), 3);
    assert!(script.contains("enable='gte(t,5.000)*lt(t,8.500)'"));
    // Every overlay renders its cue text literally, including "100%"
    assert_eq!(script.matches("expansion=none").count(), 3);
    assert!(!script.contains("100%"));

    workspace.release()?;
    Ok(())
}
