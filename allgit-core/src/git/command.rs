//! Running a single git command line in a repository

use std::path::Path;
use std::process::{Output, Stdio};

use tokio::process::Command;
use tracing::debug;

use crate::{GitError, GitResult};

/// Executes git command lines with a configurable executable
#[derive(Debug, Clone)]
pub struct GitCommandRunner {
    /// Replaces a leading `git` token
    git_path: String,
}

impl Default for GitCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCommandRunner {
    /// Create a runner using `git` from PATH
    pub fn new() -> Self {
        Self {
            git_path: "git".to_string(),
        }
    }

    /// Set a custom path to the git executable
    pub fn with_git_path(mut self, path: impl Into<String>) -> Self {
        self.git_path = path.into();
        self
    }

    /// Get the configured git executable
    pub fn git_path(&self) -> &str {
        &self.git_path
    }

    /// Run `command` with `repository_path` as the working directory
    ///
    /// Returns the captured stdout on success. A non-zero exit, or a process
    /// that could not be started at all, becomes a [`GitError`] carrying the
    /// command text exactly as given.
    pub async fn execute(&self, command: &str, repository_path: &Path) -> GitResult<String> {
        let tokens = split_command_line(command);
        let Some((program, args)) = tokens.split_first() else {
            return Err(GitError::new(repository_path, command, -1, "Empty command"));
        };

        let program = if program == "git" {
            self.git_path.as_str()
        } else {
            program.as_str()
        };

        debug!(repo = %repository_path.display(), command, "Running git command");

        let output = match non_interactive(Command::new(program))
            .args(args)
            .current_dir(repository_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                let workdir_exists = tokio::fs::metadata(repository_path)
                    .await
                    .is_ok_and(|m| m.is_dir());
                let message = if e.kind() == std::io::ErrorKind::NotFound && workdir_exists {
                    format!("Executable '{}' not found. Is git installed?", program)
                } else {
                    e.to_string()
                };
                return Err(GitError::new(repository_path, command, -1, message));
            }
        };

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(GitError::new(
                repository_path,
                command,
                output.status.code().unwrap_or(-1),
                combined_output(&output),
            ))
        }
    }
}

/// Run a command line with the default runner
pub async fn execute_git_command(command: &str, repository_path: &Path) -> GitResult<String> {
    GitCommandRunner::new().execute(command, repository_path).await
}

/// Make credential prompts fail instead of reading from the terminal
///
/// An ssh command already chosen through the environment is left alone.
fn non_interactive(mut cmd: Command) -> Command {
    cmd.env("GIT_TERMINAL_PROMPT", "0");
    if std::env::var_os("GIT_SSH_COMMAND").is_none() && std::env::var_os("GIT_SSH").is_none() {
        cmd.env("GIT_SSH_COMMAND", "ssh -o BatchMode=yes");
    }
    cmd
}

fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    match (stdout.trim(), stderr.trim()) {
        ("", err) => err.to_string(),
        (out, "") => out.to_string(),
        (out, err) => format!("{}\n{}", out, err),
    }
}

/// Split a command line into arguments
///
/// Whitespace separates arguments except inside single or double quotes;
/// the quotes themselves are removed. No other shell syntax is recognized.
pub fn split_command_line(command: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for c in command.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    args.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_token {
        args.push(current);
    }

    args
}
