//! Backend abstraction over how git is reached

use std::path::Path;

use async_trait::async_trait;

use super::command::GitCommandRunner;
use super::status::{RepositoryData, StatusProbe};
use crate::config::Config;
use crate::GitResult;

/// The git operations the refresh coordinator depends on
#[async_trait]
pub trait GitBackend: Send + Sync {
    /// Take a status snapshot of the repository at `path`
    async fn repository_data(&self, path: &Path) -> GitResult<RepositoryData>;

    /// Run a command line such as `git pull` in the repository at `path`
    async fn execute(&self, command: &str, path: &Path) -> GitResult<String>;
}

/// Backend that invokes the git executable
#[derive(Debug, Clone, Default)]
pub struct SystemGit {
    runner: GitCommandRunner,
    probe: StatusProbe,
}

impl SystemGit {
    /// Create a backend using `git` from PATH
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend honoring the configured executable
    pub fn from_config(config: &Config) -> Self {
        let runner = GitCommandRunner::new().with_git_path(&config.git.path);
        Self {
            probe: StatusProbe::new(runner.clone()),
            runner,
        }
    }

    pub fn runner(&self) -> &GitCommandRunner {
        &self.runner
    }
}

#[async_trait]
impl GitBackend for SystemGit {
    async fn repository_data(&self, path: &Path) -> GitResult<RepositoryData> {
        self.probe.probe(path).await
    }

    async fn execute(&self, command: &str, path: &Path) -> GitResult<String> {
        self.runner.execute(command, path).await
    }
}
