//! Non-interactive status listing

use allgit_core::{RefreshCoordinator, RowState};

/// Rendered result of one listing run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Listing {
    /// One aligned line per row, in row order
    pub lines: Vec<String>,
    /// Repository, return code, command and output for each failed row
    pub errors: Vec<String>,
    /// False when any row ended in error
    pub clean: bool,
}

/// Probe every repository, print one line per row and report whether all succeeded
pub async fn run(coordinator: RefreshCoordinator) -> bool {
    let listing = collect(coordinator).await;

    for line in &listing.lines {
        println!("{}", line);
    }
    for line in &listing.errors {
        eprintln!("{}", line);
    }

    listing.clean
}

/// Probe every repository and render the table without printing it
pub async fn collect(mut coordinator: RefreshCoordinator) -> Listing {
    coordinator.start();
    coordinator.wait_idle().await;

    let table = coordinator.table();
    let name_width = table.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);
    let branch_width = table.iter().map(|r| r.branch.chars().count()).max().unwrap_or(0);

    let lines = table
        .iter()
        .map(|row| {
            format!(
                "{:<name_width$}  {:<branch_width$}  {}",
                row.name, row.branch, row.badge
            )
            .trim_end()
            .to_string()
        })
        .collect();

    let mut errors = Vec::new();
    for row in coordinator.rows() {
        if let RowState::Error(err) = &row.state {
            errors.push(String::new());
            errors.push(format!("{} ({})", row.name, err.returncode));
            errors.push(err.command.clone());
            errors.push(err.output.clone());
        }
    }

    Listing {
        lines,
        errors,
        clean: !coordinator.has_errors(),
    }
}
