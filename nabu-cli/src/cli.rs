//! Command-line interface orchestration for the nabu engine.
//!
//! Offers the three subcommands from §6: `build` populates the fingerprint
//! store from a manifest of PDFs, `score` compares a manifest of query PDFs
//! against the store, and `cluster` is reserved (out of core scope, per §1's
//! Non-goals) and always returns a not-yet-implemented error.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::thread;

use clap::{Args, Parser, Subcommand};
use nabu_core::driver::{BuildConfig, BuildSummary, ScoreConfig, run_build, run_score};
use nabu_core::error::NabuError;
use thiserror::Error;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "nabu", about = "Structural PDF fingerprinting and similarity engine.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands (§6).
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Populate the fingerprint store from every PDF named in a manifest.
    Build(BuildArgs),
    /// Score each PDF in a manifest against the fingerprint store.
    Score(ScoreArgs),
    /// Reserved: hierarchical clustering of stored fingerprints.
    Cluster,
}

/// Flags shared by `build` and `score` for locating persisted state.
#[derive(Debug, Args, Clone)]
pub struct StorageArgs {
    /// Directory holding the default `graph.sqlite`/`jobs.sqlite`/`raw.sqlite`
    /// files, used when the more specific flags below are absent.
    #[arg(long)]
    pub dbdir: Option<PathBuf>,

    /// Fingerprint store file. Defaults to `<dbdir>/graph.sqlite`.
    #[arg(long)]
    pub graphdb: Option<PathBuf>,

    /// Job ledger file. Defaults to `<dbdir>/jobs.sqlite`.
    #[arg(long)]
    pub jobdb: Option<PathBuf>,

    /// Worker count. Defaults to `max(2, 2*cpus/3)`, mirroring the original
    /// tool's default (§10.4).
    #[arg(long)]
    pub procs: Option<usize>,

    /// Object-tree extraction backend.
    #[arg(long, default_value = "pdfminer")]
    pub parser: String,
}

/// Options accepted by the `build` command.
#[derive(Debug, Args, Clone)]
pub struct BuildArgs {
    /// Manifest of PDFs to process.
    pub manifest: PathBuf,

    #[command(flatten)]
    pub storage: StorageArgs,

    /// Per-worker task batch size.
    #[arg(long, default_value_t = 1)]
    pub chunk: usize,

    /// Ignore the job ledger's completed set and reprocess everything.
    #[arg(long)]
    pub update: bool,

    /// Also persist each document's raw object tree (§10.6).
    #[arg(long)]
    pub keep_raw_tree: bool,

    /// Raw-tree store file, used only with `--keep-raw-tree`. Defaults to
    /// `<dbdir>/raw.sqlite`.
    #[arg(long)]
    pub rawdb: Option<PathBuf>,
}

/// Options accepted by the `score` command.
#[derive(Debug, Args, Clone)]
pub struct ScoreArgs {
    /// Manifest of query PDFs to score against the store.
    pub manifest: PathBuf,

    #[command(flatten)]
    pub storage: StorageArgs,

    /// Canberra distance cutoff; `0.0` reports every candidate.
    #[arg(long, default_value_t = 0.0)]
    pub thresh: f64,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Core library orchestration failed.
    #[error(transparent)]
    Core(#[from] NabuError),
    /// `cluster` was invoked; it is reserved and unimplemented.
    #[error("`cluster` is reserved and not yet implemented")]
    ClusterNotImplemented,
}

fn default_procs() -> usize {
    let cpus = thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(2);
    (2 * cpus / 3).max(2)
}

fn resolve_path(dbdir: Option<&Path>, explicit: Option<&Path>, file_name: &str) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match dbdir {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

impl BuildArgs {
    fn into_config(self) -> BuildConfig {
        let dbdir = self.storage.dbdir.clone();
        BuildConfig {
            manifest: self.manifest,
            procs: self.storage.procs.unwrap_or_else(default_procs),
            chunk: self.chunk,
            parser: self.storage.parser,
            update: self.update,
            graphdb: resolve_path(dbdir.as_deref(), self.storage.graphdb.as_deref(), "graph.sqlite"),
            jobdb: resolve_path(dbdir.as_deref(), self.storage.jobdb.as_deref(), "jobs.sqlite"),
            keep_raw_tree: self.keep_raw_tree,
            rawdb: resolve_path(dbdir.as_deref(), self.rawdb.as_deref(), "raw.sqlite"),
        }
    }
}

impl ScoreArgs {
    fn into_config(self) -> ScoreConfig {
        let dbdir = self.storage.dbdir.clone();
        ScoreConfig {
            manifest: self.manifest,
            procs: self.storage.procs.unwrap_or_else(default_procs),
            graphdb: resolve_path(dbdir.as_deref(), self.storage.graphdb.as_deref(), "graph.sqlite"),
            parser: self.storage.parser,
            threshold: self.thresh,
        }
    }
}

/// Outcome of running a CLI command, rendered by [`crate::main`].
pub enum Outcome {
    /// `build` finished; carries its summary counts.
    Built(BuildSummary),
    /// `score` finished; its CSV rows were already streamed to `out`.
    Scored,
}

/// Executes the CLI command represented by `cli`, writing `score`'s CSV
/// output to `out` as it is produced.
///
/// # Errors
/// Returns [`CliError`] when parsing or execution fails.
pub fn run_cli(cli: Cli, out: &mut (dyn std::io::Write + Send)) -> Result<Outcome, CliError> {
    match cli.command {
        Command::Build(args) => {
            let summary = run_build(&args.into_config())?;
            Ok(Outcome::Built(summary))
        }
        Command::Score(args) => {
            run_score(&args.into_config(), out)?;
            Ok(Outcome::Scored)
        }
        Command::Cluster => Err(CliError::ClusterNotImplemented),
    }
}

/// Renders a `build` summary to `writer` in human-readable text.
///
/// # Errors
/// Returns [`std::io::Error`] if writing to the supplied writer fails.
pub fn render_build_summary(summary: &BuildSummary, mut writer: impl std::io::Write) -> std::io::Result<()> {
    writeln!(writer, "processed: {}", summary.total)?;
    writeln!(writer, "stored: {}", summary.stored)?;
    writeln!(writer, "skipped: {}", summary.skipped)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{BuildArgs, Cli, Command, ScoreArgs, StorageArgs, resolve_path};
    use clap::Parser;
    use rstest::rstest;
    use std::path::PathBuf;

    fn storage(dbdir: Option<&str>) -> StorageArgs {
        StorageArgs {
            dbdir: dbdir.map(PathBuf::from),
            graphdb: None,
            jobdb: None,
            procs: None,
            parser: "pdfminer".to_string(),
        }
    }

    #[rstest]
    #[case(Some("/data"), None, "graph.sqlite", PathBuf::from("/data/graph.sqlite"))]
    #[case(None, Some("/explicit/g.sqlite"), "graph.sqlite", PathBuf::from("/explicit/g.sqlite"))]
    #[case(None, None, "graph.sqlite", PathBuf::from("graph.sqlite"))]
    fn resolve_path_prefers_explicit_then_dbdir_then_bare_name(
        #[case] dbdir: Option<&str>,
        #[case] explicit: Option<&str>,
        #[case] name: &str,
        #[case] expected: PathBuf,
    ) {
        let dbdir = dbdir.map(PathBuf::from);
        let explicit = explicit.map(PathBuf::from);
        let resolved = resolve_path(dbdir.as_deref(), explicit.as_deref(), name);
        assert_eq!(resolved, expected);
    }

    #[test]
    fn build_args_compose_storage_paths_under_dbdir() {
        let args = BuildArgs {
            manifest: PathBuf::from("manifest.txt"),
            storage: storage(Some("/var/nabu")),
            chunk: 1,
            update: false,
            keep_raw_tree: false,
            rawdb: None,
        };
        let config = args.into_config();
        assert_eq!(config.graphdb, PathBuf::from("/var/nabu/graph.sqlite"));
        assert_eq!(config.jobdb, PathBuf::from("/var/nabu/jobs.sqlite"));
    }

    #[test]
    fn score_args_compose_storage_paths_under_dbdir() {
        let args = ScoreArgs {
            manifest: PathBuf::from("manifest.txt"),
            storage: storage(Some("/var/nabu")),
            thresh: 0.0,
        };
        let config = args.into_config();
        assert_eq!(config.graphdb, PathBuf::from("/var/nabu/graph.sqlite"));
    }

    #[test]
    fn clap_parses_build_with_flags() {
        let cli = Cli::parse_from([
            "nabu",
            "build",
            "manifest.txt",
            "--procs",
            "4",
            "--update",
        ]);
        match cli.command {
            Command::Build(args) => {
                assert_eq!(args.manifest, PathBuf::from("manifest.txt"));
                assert_eq!(args.storage.procs, Some(4));
                assert!(args.update);
            }
            other => panic!("expected Build, got {other:?}"),
        }
    }

    #[test]
    fn clap_rejects_missing_manifest() {
        let result = Cli::try_parse_from(["nabu", "build"]);
        assert!(result.is_err());
    }
}
