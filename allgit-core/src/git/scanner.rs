//! Repository discovery

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::Result;

/// Entry that marks a directory as a repository root
pub const GIT_MARKER: &str = ".git";

/// Find every repository at or below `root`
///
/// A directory qualifies when it directly contains a `.git` entry; once it
/// qualifies nothing beneath it is scanned, so results never nest. Symlinked
/// directories are not followed. Subdirectories that cannot be read are
/// logged and skipped; only an unreadable `root` is an error.
pub fn generate_repos(root: &Path) -> Result<Vec<PathBuf>> {
    let mut repos = Vec::new();
    let mut walker = WalkDir::new(root).follow_links(false).into_iter();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(io::Error::from(e).into()),
            Err(e) => {
                warn!(path = ?e.path(), error = %e, "Skipping unreadable directory");
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        if entry.file_name() == GIT_MARKER {
            walker.skip_current_dir();
        } else if is_repository(entry.path()) {
            debug!(repo = %entry.path().display(), "Found repository");
            repos.push(entry.into_path());
            walker.skip_current_dir();
        }
    }

    repos.sort();
    Ok(repos)
}

fn is_repository(dir: &Path) -> bool {
    dir.join(GIT_MARKER).exists()
}
