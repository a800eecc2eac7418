//! Per-repository row state
//!
//! Every discovered repository gets one row. A row starts `Pending`, moves to
//! `Ready` or `Error` when its probe resolves, returns to `Pending` on
//! refresh, and an `Error` row can be cleared to `Neutral` without probing.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::git::RepositoryData;
use crate::GitError;

/// Lifecycle phase of a row, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowPhase {
    Pending,
    Ready,
    Error,
    Neutral,
}

impl RowPhase {
    /// Check whether moving from this phase to `next` is allowed
    pub fn can_transition_to(&self, next: RowPhase) -> bool {
        use RowPhase::*;

        matches!(
            (self, next),
            (Pending, Ready)
                | (Pending, Error)
                | (Ready, Pending)
                | (Error, Pending)
                | (Error, Neutral)
                | (Neutral, Pending)
                // a failed pull or push lands a ready row in error
                | (Ready, Error)
        )
    }

    pub fn description(&self) -> &'static str {
        match self {
            RowPhase::Pending => "pending",
            RowPhase::Ready => "ready",
            RowPhase::Error => "error",
            RowPhase::Neutral => "neutral",
        }
    }
}

impl fmt::Display for RowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// State of one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowState {
    /// Waiting for a probe to resolve
    Pending,
    /// Latest snapshot
    Ready(RepositoryData),
    /// The probe or an operator command failed
    Error(GitError),
    /// An error that the operator cleared
    Neutral,
}

impl RowState {
    pub fn phase(&self) -> RowPhase {
        match self {
            RowState::Pending => RowPhase::Pending,
            RowState::Ready(_) => RowPhase::Ready,
            RowState::Error(_) => RowPhase::Error,
            RowState::Neutral => RowPhase::Neutral,
        }
    }
}

/// One repository tracked by the coordinator
#[derive(Debug, Clone)]
pub struct Row {
    /// Repository root
    pub path: PathBuf,
    /// Name shown in the table
    pub name: String,
    /// Current state
    pub state: RowState,
    /// A probe, pull or push is in flight
    pub busy: bool,
}

impl Row {
    pub fn new(root: &Path, path: PathBuf) -> Self {
        Self {
            name: display_name(root, &path),
            path,
            state: RowState::Pending,
            busy: false,
        }
    }

    /// Name, branch-or-marker and badge columns for this row
    pub fn table_row(&self) -> TableRow {
        match &self.state {
            RowState::Ready(data) => TableRow {
                name: self.name.clone(),
                branch: data.branch.clone(),
                badge: badges(data),
            },
            RowState::Error(_) => TableRow {
                name: format!("!! {} !!", self.name),
                branch: String::new(),
                badge: String::new(),
            },
            RowState::Pending | RowState::Neutral => TableRow {
                name: self.name.clone(),
                branch: String::new(),
                badge: String::new(),
            },
        }
    }
}

/// Display columns for one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub name: String,
    pub branch: String,
    pub badge: String,
}

impl TableRow {
    pub fn new(name: impl Into<String>, branch: impl Into<String>, badge: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            branch: branch.into(),
            badge: badge.into(),
        }
    }
}

/// Summarize pending work as `Δ<working> ↑<ahead> ↓<behind>`
///
/// Counts of zero are omitted; a clean repository yields an empty string.
pub fn badges(data: &RepositoryData) -> String {
    let mut parts = Vec::with_capacity(3);

    if !data.working_changes.is_empty() {
        parts.push(format!("Δ{}", data.working_changes.len()));
    }
    if !data.local_changes.is_empty() {
        parts.push(format!("↑{}", data.local_changes.len()));
    }
    if !data.remote_changes.is_empty() {
        parts.push(format!("↓{}", data.remote_changes.len()));
    }

    parts.join(" ")
}

/// Name a repository relative to the scan root
///
/// The root itself is named after its own directory.
pub fn display_name(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(relative) if relative.as_os_str().is_empty() => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
        Ok(relative) => relative.display().to_string(),
        Err(_) => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(working: usize, local: usize, remote: usize) -> RepositoryData {
        let items = |prefix: &str, n: usize| (0..n).map(|i| format!("{}{}", prefix, i)).collect();
        RepositoryData::new(
            "/r",
            "main",
            items("w", working),
            items("l", local),
            items("r", remote),
        )
    }

    #[test]
    fn test_badges() {
        assert_eq!(badges(&data(0, 0, 0)), "");
        assert_eq!(badges(&data(2, 0, 0)), "Δ2");
        assert_eq!(badges(&data(0, 2, 0)), "↑2");
        assert_eq!(badges(&data(0, 0, 2)), "↓2");
        assert_eq!(badges(&data(3, 3, 3)), "Δ3 ↑3 ↓3");
        assert_eq!(badges(&data(1, 0, 12)), "Δ1 ↓12");
    }

    #[test]
    fn test_display_name() {
        let root = Path::new("/work");
        assert_eq!(display_name(root, Path::new("/work/repo1")), "repo1");
        assert_eq!(
            display_name(root, Path::new("/work/collection/repo2")),
            Path::new("collection").join("repo2").display().to_string()
        );
        assert_eq!(display_name(root, Path::new("/work")), "work");
        assert_eq!(display_name(root, Path::new("/elsewhere/x")), "/elsewhere/x");
    }

    #[test]
    fn test_table_row_by_state() {
        let mut row = Row::new(Path::new("/work"), PathBuf::from("/work/repo1"));
        assert_eq!(row.table_row(), TableRow::new("repo1", "", ""));

        row.state = RowState::Ready(data(2, 0, 1));
        assert_eq!(row.table_row(), TableRow::new("repo1", "main", "Δ2 ↓1"));

        row.state = RowState::Error(GitError::new("/work/repo1", "git status", 128, "fatal"));
        assert_eq!(row.table_row(), TableRow::new("!! repo1 !!", "", ""));

        row.state = RowState::Neutral;
        assert_eq!(row.table_row(), TableRow::new("repo1", "", ""));
    }

    #[test]
    fn test_phase_transitions() {
        assert!(RowPhase::Pending.can_transition_to(RowPhase::Ready));
        assert!(RowPhase::Pending.can_transition_to(RowPhase::Error));
        assert!(RowPhase::Ready.can_transition_to(RowPhase::Pending));
        assert!(RowPhase::Error.can_transition_to(RowPhase::Neutral));
        assert!(RowPhase::Error.can_transition_to(RowPhase::Pending));

        assert!(!RowPhase::Ready.can_transition_to(RowPhase::Neutral));
        assert!(!RowPhase::Neutral.can_transition_to(RowPhase::Ready));
        assert!(!RowPhase::Pending.can_transition_to(RowPhase::Neutral));
    }
}
