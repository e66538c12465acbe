//! Shared test utilities for integration tests.
//!
//! Provides helpers for creating temporary git repositories with a
//! predictable history.

#![allow(dead_code)]

use anyhow::Result;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Author name configured in every test repository.
pub const AUTHOR_NAME: &str = "Test User";

/// Author email configured in every test repository.
pub const AUTHOR_EMAIL: &str = "test@example.com";

/// Runs git in `repo_path` and returns trimmed stdout.
///
/// # Errors
///
/// Returns error if git cannot be spawned or exits unsuccessfully
pub fn git(repo_path: &Path, args: &[&str]) -> Result<String> {
    run_git(repo_path, args, None)
}

/// Runs git with author and committer dates pinned to `seconds` since the epoch.
///
/// # Errors
///
/// Returns error if git cannot be spawned or exits unsuccessfully
pub fn git_at(repo_path: &Path, args: &[&str], seconds: i64) -> Result<String> {
    run_git(repo_path, args, Some(seconds))
}

fn run_git(repo_path: &Path, args: &[&str], seconds: Option<i64>) -> Result<String> {
    let mut command = Command::new("git");
    command
        .args(args)
        .current_dir(repo_path)
        .env("GIT_CONFIG_NOSYSTEM", "1");

    if let Some(seconds) = seconds {
        let date = format!("@{seconds} +0000");
        command
            .env("GIT_AUTHOR_DATE", &date)
            .env("GIT_COMMITTER_DATE", &date);
    }

    let output = command.output()?;

    if !output.status.success() {
        anyhow::bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
    }

    Ok(String::from_utf8(output.stdout)?.trim().to_string())
}

/// Creates temporary git repository with test configuration.
///
/// The repository is on branch `main` with no commits.
///
/// # Errors
///
/// Returns error if git commands fail or directory creation fails
pub fn create_test_repo() -> Result<TempDir> {
    let dir = TempDir::new()?;
    let path = dir.path();

    git(path, &["init", "-q"])?;
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"])?;
    git(path, &["config", "user.name", AUTHOR_NAME])?;
    git(path, &["config", "user.email", AUTHOR_EMAIL])?;
    git(path, &["config", "commit.gpgsign", "false"])?;

    Ok(dir)
}

/// Writes a file, stages it and commits with `message`.
///
/// # Returns
///
/// Full commit hash as string
///
/// # Errors
///
/// Returns error if write, add or commit fails
pub fn commit_file(repo_path: &Path, file: &str, content: &str, message: &str) -> Result<String> {
    std::fs::write(repo_path.join(file), content)?;
    git(repo_path, &["add", file])?;
    git(repo_path, &["commit", "-q", "-m", message])?;
    git(repo_path, &["rev-parse", "HEAD"])
}

/// Creates repository with `count` linear commits titled `commit 0` .. `commit {count-1}`.
///
/// # Returns
///
/// Temporary directory and commit hashes, oldest first
///
/// # Errors
///
/// Returns error if any git command fails
pub fn create_repo_with_history(count: usize) -> Result<(TempDir, Vec<String>)> {
    let dir = create_test_repo()?;
    let mut hashes = Vec::with_capacity(count);

    for i in 0..count {
        let hash = commit_file(
            dir.path(),
            "history.txt",
            &format!("revision {i}\n"),
            &format!("commit {i}"),
        )?;
        hashes.push(hash);
    }

    Ok((dir, hashes))
}

/// Commits an empty change titled `message` at a fixed time.
///
/// # Returns
///
/// Full commit hash as string
///
/// # Errors
///
/// Returns error if commit fails
pub fn commit_at(repo_path: &Path, message: &str, seconds: i64) -> Result<String> {
    git_at(
        repo_path,
        &["commit", "-q", "--allow-empty", "-m", message],
        seconds,
    )?;
    git(repo_path, &["rev-parse", "HEAD"])
}

/// Merges `branch` into the current branch with a merge commit at a fixed time.
///
/// # Returns
///
/// Merge commit hash as string
///
/// # Errors
///
/// Returns error if merge fails
pub fn merge_at(repo_path: &Path, branch: &str, seconds: i64) -> Result<String> {
    let message = format!("merge {branch}");
    git_at(
        repo_path,
        &["merge", "-q", "--no-ff", "-m", &message, branch],
        seconds,
    )?;
    git(repo_path, &["rev-parse", "HEAD"])
}

/// Lists hashes git itself reports for `args`, one per line.
///
/// # Errors
///
/// Returns error if git fails
pub fn git_hashes(repo_path: &Path, args: &[&str]) -> Result<Vec<String>> {
    Ok(git(repo_path, args)?
        .lines()
        .map(str::to_string)
        .collect())
}
