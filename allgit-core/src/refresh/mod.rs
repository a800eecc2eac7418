//! Row state and concurrent refresh coordination

mod coordinator;
mod row;
mod view;

pub use coordinator::{RefreshCoordinator, RowOutcome, RowUpdate, PULL_COMMAND, PUSH_COMMAND};
pub use row::{badges, display_name, Row, RowPhase, RowState, TableRow};
pub use view::{ErrorDetail, SelectionView};
