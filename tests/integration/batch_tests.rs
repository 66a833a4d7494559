/*!
 * Integration tests for batch input discovery
 */

use anyhow::Result;
use assert_fs::prelude::*;

use voxdub::workflow::{batch_requests, find_videos, Operation};

use crate::common;

#[test]
fn test_find_videos_walks_subdirectories() -> Result<()> {
    let dir = common::create_temp_dir()?;
    dir.child("a.mp4").touch()?;
    dir.child("b.WEBM").touch()?;
    dir.child("notes.txt").touch()?;
    dir.child("a.srt").touch()?;
    dir.child("season2").create_dir_all()?;
    dir.child("season2/c.mov").touch()?;

    let videos = find_videos(dir.path())?;

    let names: Vec<_> = videos
        .iter()
        .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        names,
        vec![
            std::path::PathBuf::from("a.mp4"),
            std::path::PathBuf::from("b.WEBM"),
            std::path::PathBuf::from("season2/c.mov"),
        ]
    );
    Ok(())
}

#[test]
fn test_subtitle_batch_pairs_sibling_srt() -> Result<()> {
    let dir = common::create_temp_dir()?;
    dir.child("talk.mkv").touch()?;

    let requests = batch_requests(dir.path(), Operation::TranslateAndAddSubtitles)?;

    assert_eq!(requests.len(), 1);
    let subtitles = requests[0].subtitles.as_ref().map(|s| s.path.clone());
    assert_eq!(subtitles, Some(dir.path().join("talk.srt")));
    // The sibling is missing, so the request is rejected before any stage runs
    assert!(requests[0].validate().is_err());
    Ok(())
}
