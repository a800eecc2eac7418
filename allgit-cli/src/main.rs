//! Allgit CLI - git status dashboard for every repository under a directory
//!
//! Scans a root directory for repositories, probes them all concurrently and
//! shows the results in a terminal table with pull/push/refresh commands.

mod list;
mod logging;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use allgit_core::{Config, RefreshCoordinator, SystemGit};
use anyhow::Context;
use clap::Parser;

/// Show the git status of every repository under a directory
#[derive(Parser, Debug)]
#[command(name = "allgit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to scan for repositories (defaults to the current directory)
    root: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to the git executable (overrides config and env)
    #[arg(long, env = "ALLGIT_GIT_PATH")]
    git_path: Option<String>,

    /// Maximum number of repositories probed at once, 0 for no limit
    #[arg(long, env = "ALLGIT_MAX_CONCURRENT_PROBES")]
    max_concurrent_probes: Option<usize>,

    /// Print the status table once and exit instead of starting the dashboard
    #[arg(short, long)]
    list: bool,

    /// Show the effective configuration and exit
    #[arg(long)]
    show_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let interactive = !cli.list && !cli.show_config;
    logging::init(cli.verbose, interactive)?;

    let config = Config::load_with_overrides(cli.git_path.clone(), cli.max_concurrent_probes)?;

    if cli.verbose {
        tracing::info!(
            git_path = %config.git.path,
            max_concurrent_probes = config.refresh.max_concurrent_probes,
            "Configuration loaded"
        );
    }

    if cli.show_config {
        print_config(&config);
        return Ok(());
    }

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to determine the current directory")?,
    };
    let root = root
        .canonicalize()
        .with_context(|| format!("Cannot access {}", root.display()))?;
    if !root.is_dir() {
        anyhow::bail!("{} is not a directory", root.display());
    }

    let backend = Arc::new(SystemGit::from_config(&config));
    let coordinator = RefreshCoordinator::discover(&root, backend, &config).await?;

    if cli.list {
        let clean = list::run(coordinator).await;
        if !clean {
            std::process::exit(1);
        }
        Ok(())
    } else {
        ui::run(coordinator).await
    }
}

fn print_config(config: &Config) {
    println!("Allgit Configuration");
    println!("====================");
    println!();
    println!("Git Settings:");
    println!("  path: {}", config.git.path);
    println!();
    println!("Refresh Settings:");
    match config.probe_limit() {
        Some(limit) => println!("  max_concurrent_probes: {}", limit),
        None => println!("  max_concurrent_probes: 0 (unlimited)"),
    }
    println!();
    if let Some(path) = Config::default_config_path() {
        println!("Config file: {}", path.display());
        if path.exists() {
            println!("  (exists)");
        } else {
            println!("  (not found - using defaults)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_root_defaults_to_none() {
        let cli = Cli::try_parse_from(["allgit"]).unwrap();
        assert!(cli.root.is_none());
        assert!(!cli.list);
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "allgit",
            "/src",
            "--list",
            "--git-path",
            "/opt/git",
            "--max-concurrent-probes",
            "3",
        ])
        .unwrap();

        assert_eq!(cli.root, Some(PathBuf::from("/src")));
        assert!(cli.list);
        assert_eq!(cli.git_path.as_deref(), Some("/opt/git"));
        assert_eq!(cli.max_concurrent_probes, Some(3));
    }
}
