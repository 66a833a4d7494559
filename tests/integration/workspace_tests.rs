/*!
 * Integration tests for per-run scratch workspaces
 */

use anyhow::Result;
use assert_fs::prelude::*;
use uuid::Uuid;

use voxdub::workspace::Workspace;

use crate::common;

#[test]
fn test_release_removes_directory_and_tracked_files() -> Result<()> {
    let root = common::create_temp_dir()?;
    let elsewhere = common::create_temp_dir()?;
    let partial = elsewhere.child(".clip_translated.mp4.partial");
    partial.write_str("half")?;

    let mut workspace = Workspace::create(&common::workspace_config(&root), Uuid::new_v4())?;
    std::fs::write(workspace.file("extracted_audio.wav"), b"pcm")?;
    let nested = workspace.subdir("overlay")?;
    std::fs::write(nested.join("entry_00001.txt"), "hi")?;
    workspace.track(partial.path());
    let dir = workspace.path().to_path_buf();

    workspace.release()?;

    assert!(!dir.exists());
    assert!(!partial.path().exists());
    assert_eq!(std::fs::read_dir(root.path())?.count(), 0);
    Ok(())
}

#[test]
fn test_drop_cleans_up_unreleased_workspace() -> Result<()> {
    let root = common::create_temp_dir()?;

    let dir = {
        let workspace = Workspace::create(&common::workspace_config(&root), Uuid::new_v4())?;
        std::fs::write(workspace.file("translated_speech.wav"), b"wav")?;
        workspace.path().to_path_buf()
    };

    assert!(!dir.exists());
    Ok(())
}

#[test]
fn test_workspaces_for_different_runs_are_distinct() -> Result<()> {
    let root = common::create_temp_dir()?;
    let config = common::workspace_config(&root);

    let a = Workspace::create(&config, Uuid::new_v4())?;
    let b = Workspace::create(&config, Uuid::new_v4())?;

    assert_ne!(a.path(), b.path());
    assert_ne!(a.file("extracted_audio.wav"), b.file("extracted_audio.wav"));

    a.release()?;
    assert!(b.path().exists());
    b.release()?;
    Ok(())
}
