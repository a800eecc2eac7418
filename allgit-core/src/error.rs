//! Error types for allgit

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for allgit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Result type for a single git invocation
pub type GitResult<T> = std::result::Result<T, GitError>;

/// Error type for allgit operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A git command failed
    #[error(transparent)]
    Git(#[from] GitError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

/// A git command that exited unsuccessfully in one repository
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Error executing '{command}' in '{}': {output}", .repository_path.display())]
pub struct GitError {
    /// Repository the command ran in
    pub repository_path: PathBuf,
    /// The command line as it was requested
    pub command: String,
    /// Process exit code; -1 when the process never ran or was killed by a signal
    pub returncode: i32,
    /// Captured output
    pub output: String,
}

impl GitError {
    pub fn new(
        repository_path: impl Into<PathBuf>,
        command: impl Into<String>,
        returncode: i32,
        output: impl Into<String>,
    ) -> Self {
        Self {
            repository_path: repository_path.into(),
            command: command.into(),
            returncode,
            output: output.into(),
        }
    }
}
