use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

pub(crate) fn git(cwd: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

pub(crate) fn commit(repo: &Path, message: &str) {
    git(
        repo,
        &[
            "-c",
            "user.name=Mirror Test",
            "-c",
            "user.email=mirror@example.com",
            "-c",
            "commit.gpgsign=false",
            "commit",
            "-q",
            "--allow-empty",
            "-m",
            message,
        ],
    );
}

/// Creates a repository with a single commit to act as the remote.
pub(crate) fn create_upstream(root: &Path, name: &str) -> PathBuf {
    let path = root.join(name);
    fs::create_dir_all(&path).unwrap();
    git(&path, &["init", "-q"]);
    commit(&path, "initial");
    path
}

pub(crate) fn last_commit_message(repo: &Path) -> String {
    git(repo, &["log", "-1", "--format=%s"])
}
