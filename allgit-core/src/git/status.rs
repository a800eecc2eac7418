//! Per-repository status snapshot

use std::path::{Path, PathBuf};

use super::command::GitCommandRunner;
use crate::GitResult;

const BRANCH_COMMAND: &str = "git branch --show-current";
const HEAD_HASH_COMMAND: &str = "git rev-parse --short HEAD";
const STATUS_COMMAND: &str = "git status --porcelain=v1 --untracked-files=normal";
const UPSTREAM_COMMAND: &str = "git rev-parse --abbrev-ref --symbolic-full-name @{upstream}";
const LOCAL_CHANGES_COMMAND: &str = r#"git log --reverse --format="commit %h %s" @{upstream}..HEAD"#;
const REMOTE_CHANGES_COMMAND: &str = r#"git log --reverse --format="commit %h %s" HEAD..@{upstream}"#;
const HEAD_COMMAND: &str = "git rev-parse --verify -q HEAD";
const UPSTREAM_LOG_COMMAND: &str = r#"git log --reverse --format="commit %h %s" @{upstream}"#;

/// Branch and pending changes for one repository at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryData {
    /// Repository root
    pub path: PathBuf,
    /// Short branch name, or `HEAD detached at <hash>`
    pub branch: String,
    /// Porcelain status lines (`XY filename`), in git's order
    pub working_changes: Vec<String>,
    /// Commits on the branch that its upstream lacks, oldest first
    pub local_changes: Vec<String>,
    /// Commits on the upstream that the branch lacks, oldest first
    pub remote_changes: Vec<String>,
}

impl RepositoryData {
    pub fn new(
        path: impl Into<PathBuf>,
        branch: impl Into<String>,
        working_changes: Vec<String>,
        local_changes: Vec<String>,
        remote_changes: Vec<String>,
    ) -> Self {
        Self {
            path: path.into(),
            branch: branch.into(),
            working_changes,
            local_changes,
            remote_changes,
        }
    }

    /// True when the working tree is clean and the branch matches its upstream
    pub fn is_clean(&self) -> bool {
        self.working_changes.is_empty()
            && self.local_changes.is_empty()
            && self.remote_changes.is_empty()
    }
}

/// Read-only status probe built on a [`GitCommandRunner`]
#[derive(Debug, Clone, Default)]
pub struct StatusProbe {
    runner: GitCommandRunner,
}

impl StatusProbe {
    pub fn new(runner: GitCommandRunner) -> Self {
        Self { runner }
    }

    /// Gather branch, working changes and ahead/behind commits
    ///
    /// The first failing command aborts the probe. A branch without an
    /// upstream is not a failure; both commit lists are simply empty. An
    /// unborn branch has no local commits, so every upstream commit is remote.
    pub async fn probe(&self, path: &Path) -> GitResult<RepositoryData> {
        let branch = self.branch(path).await?;
        let working_changes = lines(&self.runner.execute(STATUS_COMMAND, path).await?);

        let (local_changes, remote_changes) = if !self.succeeds(UPSTREAM_COMMAND, path).await? {
            (Vec::new(), Vec::new())
        } else if self.succeeds(HEAD_COMMAND, path).await? {
            (
                lines(&self.runner.execute(LOCAL_CHANGES_COMMAND, path).await?),
                lines(&self.runner.execute(REMOTE_CHANGES_COMMAND, path).await?),
            )
        } else {
            (
                Vec::new(),
                lines(&self.runner.execute(UPSTREAM_LOG_COMMAND, path).await?),
            )
        };

        Ok(RepositoryData {
            path: path.to_path_buf(),
            branch,
            working_changes,
            local_changes,
            remote_changes,
        })
    }

    async fn branch(&self, path: &Path) -> GitResult<String> {
        let branch = self.runner.execute(BRANCH_COMMAND, path).await?;
        let branch = branch.trim();
        if !branch.is_empty() {
            return Ok(branch.to_string());
        }

        let hash = self.runner.execute(HEAD_HASH_COMMAND, path).await?;
        Ok(format!("HEAD detached at {}", hash.trim()))
    }

    /// Whether a yes/no query exits zero
    async fn succeeds(&self, command: &str, path: &Path) -> GitResult<bool> {
        match self.runner.execute(command, path).await {
            Ok(_) => Ok(true),
            // git could not be started at all
            Err(e) if e.returncode == -1 => Err(e),
            Err(_) => Ok(false),
        }
    }
}

/// Probe `path` with the default runner
pub async fn get_repository_data(path: &Path) -> GitResult<RepositoryData> {
    StatusProbe::default().probe(path).await
}

fn lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
