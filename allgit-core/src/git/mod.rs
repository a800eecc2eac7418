//! Git operations for allgit
//!
//! This module provides repository discovery, command execution and
//! per-repository status probing.

mod backend;
mod command;
mod scanner;
mod status;

pub use backend::{GitBackend, SystemGit};
pub use command::{execute_git_command, split_command_line, GitCommandRunner};
pub use scanner::{generate_repos, GIT_MARKER};
pub use status::{get_repository_data, RepositoryData, StatusProbe};
