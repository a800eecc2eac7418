//! What the detail panes show for the selected row

use super::row::{Row, RowState};

/// Detail of a failed command, for the error pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    /// Display name of the repository
    pub repository: String,
    pub returncode: i32,
    pub command: String,
    pub output: String,
}

/// Content of the detail panes for the current selection
///
/// Exactly one variant applies; panes a variant does not mention are empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionView {
    /// Nothing to show
    #[default]
    Empty,
    /// Error pane only
    Error(ErrorDetail),
    /// Working, local and remote panes
    Changes {
        working: Vec<String>,
        local: Vec<String>,
        remote: Vec<String>,
    },
}

impl SelectionView {
    pub fn for_row(row: &Row) -> Self {
        match &row.state {
            RowState::Ready(data) => SelectionView::Changes {
                working: data.working_changes.clone(),
                local: data.local_changes.clone(),
                remote: data.remote_changes.clone(),
            },
            RowState::Error(err) => SelectionView::Error(ErrorDetail {
                repository: row.name.clone(),
                returncode: err.returncode,
                command: err.command.clone(),
                output: err.output.clone(),
            }),
            RowState::Pending | RowState::Neutral => SelectionView::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SelectionView::Empty)
    }
}
