//! Thin wrappers around the system `git` binary.
//!
//! Output of successful commands is discarded. A failing command is turned into
//! an error carrying its exit status and stderr.

use std::{path::Path, process::Output};

use anyhow::{bail, Context, Result};
use tokio::process::Command;
use tracing::{debug, instrument, warn};

#[cfg(test)]
#[path = "git_tests.rs"]
mod git_tests;

/// A command operating on the working tree at `dir` without relying on git's
/// repository discovery.
fn in_work_tree(dir: &Path) -> Command {
    let mut cmd = Command::new("git");
    cmd.arg("--work-tree")
        .arg(dir)
        .arg("--git-dir")
        .arg(dir.join(".git"));
    cmd
}

async fn run(mut cmd: Command, what: &str) -> Result<Output> {
    cmd.kill_on_drop(true);
    cmd.output()
        .await
        .with_context(|| format!("Failed to spawn git {}", what))
}

fn ensure_success(output: Output, what: &str, dir: &Path) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    warn!(
        command = what,
        dir = %dir.display(),
        status = %output.status,
        stderr = %stderr.trim(),
        "git command failed"
    );
    bail!(
        "git {} failed for {} ({}): {}",
        what,
        dir.display(),
        output.status,
        stderr.trim()
    )
}

/// Whether `dir` already holds a git working tree.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub(crate) async fn is_work_tree(dir: &Path) -> Result<bool> {
    let mut cmd = in_work_tree(dir);
    cmd.arg("status");

    let output = run(cmd, "status").await?;
    debug!(status = %output.status, "Probed working tree");
    Ok(output.status.success())
}

#[instrument(skip_all, fields(%url, dir = %dir.display()))]
pub(crate) async fn clone(url: &str, dir: &Path) -> Result<()> {
    let mut cmd = Command::new("git");
    cmd.arg("clone").arg(url).arg(dir);

    let output = run(cmd, "clone").await?;
    ensure_success(output, "clone", dir)
}

#[instrument(skip_all, fields(dir = %dir.display()))]
pub(crate) async fn fetch_all(dir: &Path) -> Result<()> {
    let mut cmd = in_work_tree(dir);
    cmd.arg("fetch").arg("--all").arg("--prune");

    let output = run(cmd, "fetch").await?;
    ensure_success(output, "fetch", dir)
}

#[instrument(skip_all, fields(dir = %dir.display()))]
pub(crate) async fn pull(dir: &Path) -> Result<()> {
    let mut cmd = in_work_tree(dir);
    cmd.arg("pull");

    let output = run(cmd, "pull").await?;
    ensure_success(output, "pull", dir)
}
