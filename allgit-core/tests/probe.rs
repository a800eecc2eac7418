//! Status probe against real repositories built in temporary directories

use std::path::Path;
use std::process::Command;

use allgit_core::{get_repository_data, GitBackend, SystemGit};

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", "Testing")
        .env("GIT_AUTHOR_EMAIL", "test@testing.com")
        .env("GIT_COMMITTER_NAME", "Testing")
        .env("GIT_COMMITTER_EMAIL", "test@testing.com")
        .output()
        .expect("git should be installed");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn commit_file(dir: &Path, name: &str, message: &str) {
    std::fs::write(dir.join(name), name).unwrap();
    git(dir, &["add", name]);
    git(dir, &["commit", "-q", "-m", message]);
}

fn init(dir: &Path) {
    std::fs::create_dir_all(dir).unwrap();
    git(dir, &["init", "-q"]);
}

#[tokio::test]
async fn test_no_remote() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = tmp.path().join("repo");
    init(&repo);

    let data = get_repository_data(&repo).await.unwrap();

    assert_eq!(data.path, repo);
    assert!(["main", "master"].contains(&data.branch.as_str()), "{}", data.branch);
    assert!(data.working_changes.is_empty());
    assert!(data.local_changes.is_empty());
    assert!(data.remote_changes.is_empty());
}

#[tokio::test]
async fn test_clone_without_changes() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = tmp.path().join("repo");
    init(&repo);
    commit_file(&repo, "file1.txt", "commit 1");
    commit_file(&repo, "file2.txt", "commit 2");
    git(tmp.path(), &["clone", "-q", "repo", "clone"]);

    let clone = tmp.path().join("clone");
    let data = get_repository_data(&clone).await.unwrap();

    assert_eq!(data.path, clone);
    assert!(["main", "master"].contains(&data.branch.as_str()), "{}", data.branch);
    assert!(data.is_clean());
}

#[tokio::test]
async fn test_complete() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = tmp.path().join("repo");
    let clone = tmp.path().join("clone");

    init(&repo);
    commit_file(&repo, "base.txt", "base");
    git(tmp.path(), &["clone", "-q", "repo", "clone"]);

    // commits only in the origin
    commit_file(&repo, "file1.txt", "commit 1");
    commit_file(&repo, "file2.txt", "commit 2");
    git(&clone, &["fetch", "-q"]);

    // commits only in the clone
    commit_file(&clone, "file3.txt", "commit 3");
    commit_file(&clone, "file4.txt", "commit 4");

    // working changes in the clone
    std::fs::write(clone.join("file5.txt"), "file5").unwrap();
    std::fs::write(clone.join("file6.txt"), "file6").unwrap();
    git(&clone, &["add", "file6.txt"]);

    let data = get_repository_data(&clone).await.unwrap();

    assert_eq!(data.path, clone);
    assert!(["main", "master"].contains(&data.branch.as_str()), "{}", data.branch);
    assert_eq!(data.working_changes, vec!["A  file6.txt", "?? file5.txt"]);

    assert_eq!(data.local_changes.len(), 2);
    assert!(data.local_changes[0].starts_with("commit "), "{}", data.local_changes[0]);
    assert!(data.local_changes[0].contains("commit 3"), "{}", data.local_changes[0]);
    assert!(data.local_changes[1].starts_with("commit "), "{}", data.local_changes[1]);
    assert!(data.local_changes[1].contains("commit 4"), "{}", data.local_changes[1]);

    assert_eq!(data.remote_changes.len(), 2);
    assert!(data.remote_changes[0].starts_with("commit "), "{}", data.remote_changes[0]);
    assert!(data.remote_changes[0].contains("commit 1"), "{}", data.remote_changes[0]);
    assert!(data.remote_changes[1].starts_with("commit "), "{}", data.remote_changes[1]);
    assert!(data.remote_changes[1].contains("commit 2"), "{}", data.remote_changes[1]);
}

#[tokio::test]
async fn test_detached_head() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = tmp.path().join("repo");
    init(&repo);
    commit_file(&repo, "file1.txt", "commit 1");
    commit_file(&repo, "file2.txt", "commit 2");

    let hashes = git(&repo, &["log", "--pretty=format:%H"]);
    let first = hashes.lines().last().unwrap().trim().to_string();
    git(&repo, &["checkout", "-q", "--detach", &first]);

    let data = get_repository_data(&repo).await.unwrap();
    assert!(data.branch.starts_with("HEAD detached at "), "{}", data.branch);
    assert!(data.is_clean());

    std::fs::write(repo.join("file3.txt"), "file3").unwrap();

    let after = get_repository_data(&repo).await.unwrap();
    assert_eq!(after.branch, data.branch);
    assert_eq!(after.working_changes, vec!["?? file3.txt"]);
    assert!(after.local_changes.is_empty());
    assert!(after.remote_changes.is_empty());
}

#[tokio::test]
async fn test_pull_through_backend() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = tmp.path().join("repo");
    init(&repo);
    commit_file(&repo, "base.txt", "base");
    git(tmp.path(), &["clone", "-q", "repo", "clone"]);
    commit_file(&repo, "file1.txt", "commit 1");

    let clone = tmp.path().join("clone");
    git(&clone, &["fetch", "-q"]);

    let backend = SystemGit::new();
    let before = backend.repository_data(&clone).await.unwrap();
    assert_eq!(before.remote_changes.len(), 1);

    backend.execute("git pull", &clone).await.unwrap();

    let after = backend.repository_data(&clone).await.unwrap();
    assert!(after.is_clean());
    assert!(clone.join("file1.txt").exists());
}

#[tokio::test]
async fn test_unborn_branch_with_upstream() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = tmp.path().join("repo");
    let clone = tmp.path().join("clone");

    std::fs::create_dir_all(&repo).unwrap();
    git(&repo, &["init", "-q", "-b", "main"]);
    git(tmp.path(), &["-c", "init.defaultBranch=main", "clone", "-q", "repo", "clone"]);

    // the origin gains history after the clone was made empty
    commit_file(&repo, "file1.txt", "commit 1");
    git(&clone, &["fetch", "-q"]);

    let backend = SystemGit::new();
    let data = backend.repository_data(&clone).await.unwrap();

    assert_eq!(data.branch, "main");
    assert!(data.working_changes.is_empty());
    assert!(data.local_changes.is_empty());
    assert_eq!(data.remote_changes.len(), 1);
    assert!(data.remote_changes[0].starts_with("commit "), "{}", data.remote_changes[0]);
    assert!(data.remote_changes[0].contains("commit 1"), "{}", data.remote_changes[0]);

    backend.execute("git pull", &clone).await.unwrap();

    let after = backend.repository_data(&clone).await.unwrap();
    assert!(after.is_clean());
    assert!(clone.join("file1.txt").exists());
}
