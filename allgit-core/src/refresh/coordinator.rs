//! Refresh coordinator
//!
//! Owns one row per discovered repository and keeps them current:
//! 1. Launches one independent probe task per row
//! 2. Merges each result into its row as it arrives, in any order
//! 3. Runs operator commands (refresh, pull, push, clear errors)
//!
//! Tasks never touch row state. They post a [`RowUpdate`] to a channel and
//! the coordinator applies it, so the coordinator is the only mutator.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, info, warn};

use super::row::{Row, RowState, TableRow};
use super::view::SelectionView;
use crate::config::Config;
use crate::git::{generate_repos, GitBackend, RepositoryData};
use crate::{Error, GitResult, Result};

/// Command line used to pull the selected repository
pub const PULL_COMMAND: &str = "git pull";

/// Command line used to push the selected repository
pub const PUSH_COMMAND: &str = "git push";

/// Result posted by a background task for one row
#[derive(Debug)]
pub struct RowUpdate {
    /// Index of the row the task ran for
    pub row: usize,
    pub outcome: RowOutcome,
}

/// What a background task produced
#[derive(Debug)]
pub enum RowOutcome {
    /// A status probe finished
    Probed(GitResult<RepositoryData>),
    /// A pull or push finished
    Executed {
        command: &'static str,
        result: GitResult<String>,
    },
}

/// Concurrent status refresh across a fixed set of repositories
///
/// Methods that launch work spawn tokio tasks and must be called from
/// within a tokio runtime.
pub struct RefreshCoordinator {
    root: PathBuf,
    rows: Vec<Row>,
    selected: usize,
    /// Set by clear-errors; the detail panes stay blank until the selection
    /// moves or the selected row changes
    panes_cleared: bool,
    status: String,
    backend: Arc<dyn GitBackend>,
    limiter: Option<Arc<Semaphore>>,
    updates_tx: mpsc::UnboundedSender<RowUpdate>,
    updates_rx: mpsc::UnboundedReceiver<RowUpdate>,
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("root", &self.root)
            .field("rows", &self.rows.len())
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

impl RefreshCoordinator {
    /// Create a coordinator for an already discovered set of repositories
    ///
    /// All rows start pending; call [`start`](Self::start) to probe them.
    pub fn new(root: impl Into<PathBuf>, repositories: Vec<PathBuf>, backend: Arc<dyn GitBackend>) -> Self {
        let root = root.into();
        let rows = repositories
            .into_iter()
            .map(|path| Row::new(&root, path))
            .collect();
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();

        Self {
            root,
            rows,
            selected: 0,
            panes_cleared: false,
            status: String::new(),
            backend,
            limiter: None,
            updates_tx,
            updates_rx,
        }
    }

    /// Bound the number of probes running at once
    ///
    /// Pull and push are never held back by the bound, so a hung command
    /// cannot starve other rows of probes.
    pub fn with_probe_limit(mut self, limit: Option<usize>) -> Self {
        self.limiter = limit.map(|n| Arc::new(Semaphore::new(n.max(1))));
        self
    }

    /// Scan `root` once and create a coordinator for what was found
    pub async fn discover(
        root: impl Into<PathBuf>,
        backend: Arc<dyn GitBackend>,
        config: &Config,
    ) -> Result<Self> {
        let root = root.into();
        let scan_root = root.clone();
        let repositories = tokio::task::spawn_blocking(move || generate_repos(&scan_root))
            .await
            .map_err(|e| Error::Other(format!("Repository scan panicked: {}", e)))??;

        info!(root = %root.display(), count = repositories.len(), "Discovered repositories");

        Ok(Self::new(root, repositories, backend).with_probe_limit(config.probe_limit()))
    }

    /// Launch the initial probe for every row
    pub fn start(&mut self) {
        self.refresh_all();
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Name, branch-or-marker and badge for every row, in row order
    pub fn table(&self) -> Vec<TableRow> {
        self.rows.iter().map(Row::table_row).collect()
    }

    /// Last operator-facing status line
    pub fn status_message(&self) -> &str {
        &self.status
    }

    /// True when no task is in flight for any row
    pub fn is_idle(&self) -> bool {
        self.rows.iter().all(|row| !row.busy)
    }

    pub fn has_errors(&self) -> bool {
        self.rows
            .iter()
            .any(|row| matches!(row.state, RowState::Error(_)))
    }

    pub fn selected_index(&self) -> Option<usize> {
        (!self.rows.is_empty()).then_some(self.selected)
    }

    pub fn selected_row(&self) -> Option<&Row> {
        self.rows.get(self.selected)
    }

    /// Move the cursor; out of range indices clamp to the last row
    pub fn select(&mut self, index: usize) {
        if self.rows.is_empty() {
            return;
        }

        let index = index.min(self.rows.len() - 1);
        if index != self.selected {
            self.selected = index;
            self.panes_cleared = false;
        }
    }

    pub fn select_next(&mut self) {
        self.select(self.selected.saturating_add(1));
    }

    pub fn select_previous(&mut self) {
        self.select(self.selected.saturating_sub(1));
    }

    /// What the detail panes show for the current selection
    pub fn selection_view(&self) -> SelectionView {
        if self.panes_cleared {
            return SelectionView::Empty;
        }

        self.selected_row()
            .map(SelectionView::for_row)
            .unwrap_or_default()
    }

    /// Re-probe the selected row
    ///
    /// Returns false when there is no selection or the row is busy.
    pub fn refresh_selected(&mut self) -> bool {
        let Some(row) = self.rows.get(self.selected) else {
            return false;
        };

        if row.busy {
            debug!(repo = %row.name, "Refresh ignored, row is busy");
            return false;
        }

        self.status = format!("Refreshing {}...", row.name);
        self.launch_probe(self.selected);
        true
    }

    /// Re-probe every row that is not already busy, without rescanning
    ///
    /// Returns how many probes were launched.
    pub fn refresh_all(&mut self) -> usize {
        let idle: Vec<usize> = (0..self.rows.len())
            .filter(|&index| !self.rows[index].busy)
            .collect();

        for &index in &idle {
            self.launch_probe(index);
        }

        info!(launched = idle.len(), total = self.rows.len(), "Refreshing repositories");
        self.status = format!("Refreshing {} repositories...", idle.len());
        idle.len()
    }

    /// Pull the selected row if its upstream has commits it lacks
    ///
    /// Returns whether `git pull` was issued.
    pub fn pull_selected(&mut self) -> bool {
        self.run_selected(PULL_COMMAND, |data| !data.remote_changes.is_empty())
    }

    /// Push the selected row if it has commits its upstream lacks
    ///
    /// Returns whether `git push` was issued.
    pub fn push_selected(&mut self) -> bool {
        self.run_selected(PUSH_COMMAND, |data| !data.local_changes.is_empty())
    }

    /// Turn every error row neutral without probing it again
    ///
    /// Returns how many rows were cleared.
    pub fn clear_errors(&mut self) -> usize {
        let mut cleared = 0;

        for row in self.rows.iter_mut() {
            if matches!(row.state, RowState::Error(_)) {
                row.state = RowState::Neutral;
                cleared += 1;
            }
        }

        self.panes_cleared = true;
        self.status = format!("Cleared {} error(s)", cleared);
        info!(cleared, "Cleared errors");
        cleared
    }

    /// Wait for the next task result
    pub async fn next_update(&mut self) -> Option<RowUpdate> {
        self.updates_rx.recv().await
    }

    /// Merge a task result into its row
    pub fn apply(&mut self, update: RowUpdate) {
        let index = update.row;
        let Some(row) = self.rows.get_mut(index) else {
            warn!(row = index, "Dropping update for unknown row");
            return;
        };

        match update.outcome {
            RowOutcome::Probed(result) => {
                row.busy = false;
                let next = match result {
                    Ok(data) => {
                        debug!(repo = %row.name, branch = %data.branch, "Probe complete");
                        RowState::Ready(data)
                    }
                    Err(err) => {
                        warn!(repo = %row.name, error = %err, "Probe failed");
                        RowState::Error(err)
                    }
                };
                set_state(row, next);
            }
            RowOutcome::Executed { command, result } => match result {
                Ok(_) => {
                    info!(repo = %row.name, command, "Command succeeded");
                    self.status = format!("'{}' succeeded in {}", command, row.name);
                    row.busy = false;
                    self.launch_probe(index);
                }
                Err(err) => {
                    warn!(repo = %row.name, error = %err, "Command failed");
                    self.status = format!("'{}' failed in {}", command, row.name);
                    row.busy = false;
                    set_state(row, RowState::Error(err));
                }
            },
        }

        if index == self.selected {
            self.panes_cleared = false;
        }
    }

    /// Apply results until no row has a task in flight
    pub async fn wait_idle(&mut self) {
        while !self.is_idle() {
            match self.next_update().await {
                Some(update) => self.apply(update),
                None => break,
            }
        }
    }

    fn run_selected(
        &mut self,
        command: &'static str,
        has_work: impl Fn(&RepositoryData) -> bool,
    ) -> bool {
        let Some(row) = self.rows.get_mut(self.selected) else {
            return false;
        };

        let ready = match &row.state {
            RowState::Ready(data) => has_work(data),
            _ => false,
        };

        if !ready || row.busy {
            self.status = format!("'{}' not needed for {}", command, row.name);
            debug!(repo = %row.name, command, busy = row.busy, "Command not issued");
            return false;
        }

        row.busy = true;
        self.status = format!("Running '{}' in {}...", command, row.name);
        info!(repo = %row.name, command, "Running command");

        let path = row.path.clone();
        let index = self.selected;
        self.spawn_task(index, false, move |backend| async move {
            let result = backend.execute(command, &path).await;
            RowOutcome::Executed { command, result }
        });
        true
    }

    fn launch_probe(&mut self, index: usize) {
        let row = &mut self.rows[index];
        row.busy = true;
        set_state(row, RowState::Pending);

        let path = row.path.clone();
        self.spawn_task(index, true, move |backend| async move {
            RowOutcome::Probed(backend.repository_data(&path).await)
        });
    }

    fn spawn_task<F, Fut>(&self, index: usize, limited: bool, task: F)
    where
        F: FnOnce(Arc<dyn GitBackend>) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = RowOutcome> + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let limiter = self.limiter.clone().filter(|_| limited);
        let tx = self.updates_tx.clone();

        tokio::spawn(async move {
            let _permit = match limiter {
                Some(semaphore) => semaphore.acquire_owned().await.ok(),
                None => None,
            };

            let outcome = task(backend).await;
            // the receiver lives as long as the coordinator
            let _ = tx.send(RowUpdate { row: index, outcome });
        });
    }
}

fn set_state(row: &mut Row, next: RowState) {
    let (from, to) = (row.state.phase(), next.phase());
    if from != to && !from.can_transition_to(to) {
        warn!(repo = %row.name, %from, %to, "Unexpected row transition");
    }
    row.state = next;
}
