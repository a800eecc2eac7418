//! Allgit Core - repository discovery and status refresh for allgit
//!
//! This crate finds git repositories under a root directory, probes each one
//! for its branch and pending changes by invoking the `git` binary, and
//! coordinates concurrent refreshes, pulls and pushes across all of them.

pub mod config;
pub mod error;
pub mod git;
pub mod refresh;

pub use config::{Config, GitConfig, RefreshConfig};
pub use error::{Error, GitError, GitResult, Result};
pub use git::{
    execute_git_command, generate_repos, get_repository_data, GitBackend, GitCommandRunner,
    RepositoryData, SystemGit,
};
pub use refresh::{
    badges, ErrorDetail, RefreshCoordinator, Row, RowState, RowUpdate, SelectionView, TableRow,
};
