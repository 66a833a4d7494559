/*!
 * Common test utilities for the voxdub test suite
 */

use anyhow::Result;
use assert_fs::prelude::*;
use assert_fs::TempDir;

use voxdub::config::WorkspaceConfig;

pub const SAMPLE_SRT: &str = "1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.

2
00:00:05,000 --> 00:00:08,500
It's a \"quoted\" line: 100% sure.

3
00:00:09,000 --> 00:00:12,000
Line one
Line two
";

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Writes `content` to `name` below `dir` and returns the path
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> Result<std::path::PathBuf> {
    let child = dir.child(name);
    child.write_str(content)?;
    Ok(child.path().to_path_buf())
}

/// Workspace configuration rooted at a test directory
pub fn workspace_config(dir: &TempDir) -> WorkspaceConfig {
    WorkspaceConfig {
        root: Some(dir.path().to_path_buf()),
    }
}
