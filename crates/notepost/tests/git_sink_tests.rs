//! Integration tests for committing and pushing the cursor file.
//!
//! These shell out to the `git` CLI against throwaway repositories.

use std::path::Path;
use std::process::Command;

use notepost::progress::{CursorFile, GitCommitter, GitSink, ProgressSink};

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git must be installed");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// A bare remote and a clone of it with one initial commit pushed.
fn repo_with_remote(root: &Path) -> std::path::PathBuf {
    let remote = root.join("remote.git");
    std::fs::create_dir_all(&remote).unwrap();
    git(&remote, &["init", "--bare", "--quiet"]);

    git(root, &["clone", "--quiet", "remote.git", "work"]);
    let work = root.join("work");
    std::fs::write(work.join("notes.txt"), "hello\n").unwrap();
    git(&work, &["add", "notes.txt"]);
    git(
        &work,
        &[
            "-c",
            "user.name=test",
            "-c",
            "user.email=test@example.com",
            "commit",
            "--quiet",
            "-m",
            "initial",
        ],
    );
    git(&work, &["push", "--quiet", "origin", "HEAD"]);
    work
}

fn committer() -> GitCommitter {
    GitCommitter::new("origin").with_author("notepost-test", "notepost@example.com")
}

#[tokio::test]
async fn test_git_sink_commits_and_pushes_cursor() {
    let root = tempfile::tempdir().unwrap();
    let work = repo_with_remote(root.path());
    std::fs::write(work.join("scratch.txt"), "unrelated").unwrap();

    let file = CursorFile::new(work.join("cursor.txt"));
    let sink = GitSink::new(file.clone(), committer());
    sink.persist(15).await.unwrap();

    assert_eq!(file.read(), 15);

    let remote = root.path().join("remote.git");
    let log = git(&remote, &["log", "--format=%s", "-n", "1"]);
    assert_eq!(log.trim(), "chore(progress): advance cursor to 15");

    let files = git(&remote, &["show", "--name-only", "--format=", "HEAD"]);
    assert_eq!(files.trim(), "cursor.txt");

    // The unrelated file is neither staged nor committed
    let status = git(&work, &["status", "--porcelain"]);
    assert!(status.contains("?? scratch.txt"));
}

#[tokio::test]
async fn test_unchanged_cursor_is_not_committed() {
    let root = tempfile::tempdir().unwrap();
    let work = repo_with_remote(root.path());

    let sink = GitSink::new(CursorFile::new(work.join("cursor.txt")), committer());
    sink.persist(3).await.unwrap();
    sink.persist(3).await.unwrap();

    let count = git(&work, &["rev-list", "--count", "HEAD"]);
    assert_eq!(count.trim(), "2");
}

#[tokio::test]
async fn test_push_failure_is_an_error() {
    let root = tempfile::tempdir().unwrap();
    let work = root.path().join("lonely");
    std::fs::create_dir_all(&work).unwrap();
    git(&work, &["init", "--quiet"]);

    let sink = GitSink::new(CursorFile::new(work.join("cursor.txt")), committer());
    let err = sink.persist(1).await.unwrap_err();

    assert!(err.to_string().contains("git push failed"));
}
