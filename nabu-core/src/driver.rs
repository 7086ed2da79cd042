//! The parallel build/score driver (C8): §4.8's work-stealing dispatch over
//! a manifest of PDFs, and the partitioned fan-out used during scoring.
//!
//! CPU-bound parse/adapt/fingerprint work runs on a dedicated [`rayon`]
//! thread pool sized by `--procs`; the ledger and the fingerprint store
//! stay on the single driver thread for writes (build) or get one handle
//! per partition (score), matching §5's "store handle not shared, ledger
//! single-writer" resource model. `ctrlc` observes a user interrupt and
//! flips a shared flag that `try_for_each` checks between documents, which
//! is this driver's expression of "drain, don't abort mid-task".

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use rayon::prelude::*;

use crate::error::{NabuError, NabuErrorCode, Result};
use crate::fingerprint::build_fingerprint;
use crate::ledger::JobLedger;
use crate::manifest::read_manifest;
use crate::netsimile::canberra_distance;
use crate::parser::get_parser;
use crate::store::{FingerprintStore, RawTreeStore, digest};

/// Inputs to a `build` run (§6).
#[derive(Clone, Debug)]
pub struct BuildConfig {
    /// Path to the line-oriented manifest of PDFs to process.
    pub manifest: PathBuf,
    /// Worker count (`--procs`).
    pub procs: usize,
    /// Per-worker task batch size (`--chunk`), mirrored into the progress
    /// log but not into thread lifecycle (see [`crate::driver`] module docs).
    pub chunk: usize,
    /// `--parser` registry name.
    pub parser: String,
    /// `--update`: ignore the ledger's completed set.
    pub update: bool,
    /// Fingerprint store file.
    pub graphdb: PathBuf,
    /// Job ledger file.
    pub jobdb: PathBuf,
    /// `--keep-raw-tree`: also persist each document's raw object tree.
    pub keep_raw_tree: bool,
    /// Raw-tree store file, used only when `keep_raw_tree` is set.
    pub rawdb: PathBuf,
}

/// Outcome of a `build` run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Number of documents dispatched (after ledger-based filtering).
    pub total: usize,
    /// Number of documents whose fingerprint was stored.
    pub stored: usize,
    /// Number of documents skipped (parse or graph failure).
    pub skipped: usize,
}

enum WorkerOutcome {
    Stored { path: String },
    /// Parsing succeeded but the graph or store stage failed; still marked
    /// complete in the ledger, matching the original's `if pdf.parsed:` gate.
    SkippedAfterParse { path: String, reason: String },
    /// Parsing itself failed; left unmarked so the next run retries it.
    ParseFailed { path: String, reason: String },
    Crashed { path: String, message: String },
}

fn process_one(
    path: &Path,
    parser_name: &str,
    graphdb: &Path,
    raw_tree: Option<&Path>,
) -> WorkerOutcome {
    let path_display = path.to_string_lossy().into_owned();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> Result<()> {
        let parser = get_parser(parser_name)?;
        let doc = parser.parse(path)?;
        let record = build_fingerprint(&doc)?;
        let store = FingerprintStore::open(graphdb)?;
        store.put(&record)?;
        if let Some(rawdb) = raw_tree {
            let raw_store = RawTreeStore::open(rawdb)?;
            raw_store.put(&doc.id, &doc.root)?;
        }
        Ok(())
    }));

    match outcome {
        Ok(Ok(())) => WorkerOutcome::Stored { path: path_display },
        Ok(Err(err)) if matches!(err.code(), NabuErrorCode::Input | NabuErrorCode::Parse) => {
            WorkerOutcome::ParseFailed {
                path: path_display,
                reason: err.to_string(),
            }
        }
        Ok(Err(err)) => WorkerOutcome::SkippedAfterParse {
            path: path_display,
            reason: err.to_string(),
        },
        Err(_) => WorkerOutcome::Crashed {
            path: path_display,
            message: "panic while processing document".to_string(),
        },
    }
}

fn compute_job_id(manifest: &Path, action: &str) -> String {
    let absolute = std::path::absolute(manifest).unwrap_or_else(|_| manifest.to_path_buf());
    digest(&format!("{}{action}", absolute.display()))
}

fn build_worker_pool(procs: usize) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(procs.max(1))
        .build()
        .map_err(|source| NabuError::Input {
            message: format!("could not build worker pool: {source}"),
        })
}

/// Run a `build` action: populate the fingerprint store from every PDF in
/// `config.manifest` not already marked complete in the job ledger (unless
/// `config.update` is set).
///
/// # Errors
/// Returns [`NabuError::Input`] if the manifest cannot be read, `--parser`
/// names an unknown parser, or the worker pool cannot be built — the only
/// cases that escalate to a process exit per §7.
pub fn run_build(config: &BuildConfig) -> Result<BuildSummary> {
    let todo = read_manifest(&config.manifest)?;
    get_parser(&config.parser)?;

    let job_id = compute_job_id(&config.manifest, "build");
    let ledger = match JobLedger::open(&config.jobdb) {
        Ok(ledger) => Some(ledger),
        Err(err) => {
            tracing::warn!(error = %err, "could not open job ledger; continuing without resumption");
            None
        }
    };

    let already_done = if config.update {
        std::collections::HashSet::new()
    } else {
        ledger
            .as_ref()
            .and_then(|ledger| ledger.completed(&job_id).ok())
            .unwrap_or_default()
    };

    let todo: Vec<PathBuf> = todo
        .into_iter()
        .filter(|path| !already_done.contains(&path.to_string_lossy().into_owned()))
        .collect();
    let total = todo.len();

    let cancelled = Arc::new(AtomicBool::new(false));
    let cancel_handle = Arc::clone(&cancelled);
    if ctrlc::set_handler(move || {
        cancel_handle.store(true, Ordering::SeqCst);
        tracing::info!("interrupt received, draining in-flight work");
    })
    .is_err()
    {
        tracing::warn!("could not install interrupt handler; Ctrl-C will not drain gracefully");
    }

    let pool = build_worker_pool(config.procs)?;
    let (tx, rx) = crossbeam_channel::unbounded::<WorkerOutcome>();

    let consumer = thread::spawn(move || {
        let mut stored = 0usize;
        let mut skipped = 0usize;
        let mut processed = 0usize;
        for outcome in rx {
            processed += 1;
            match outcome {
                WorkerOutcome::Stored { path } => {
                    stored += 1;
                    if let Some(ledger) = &ledger {
                        if let Err(err) = ledger.mark(&job_id, &path) {
                            tracing::warn!(error = %err, path, "failed to mark ledger");
                        }
                    }
                    tracing::info!(processed, total, path, "document stored");
                }
                WorkerOutcome::SkippedAfterParse { path, reason } => {
                    skipped += 1;
                    tracing::warn!(path, reason, "document parsed but not stored");
                    if let Some(ledger) = &ledger {
                        if let Err(err) = ledger.mark(&job_id, &path) {
                            tracing::warn!(error = %err, path, "failed to mark ledger");
                        }
                    }
                }
                WorkerOutcome::ParseFailed { path, reason } => {
                    skipped += 1;
                    tracing::warn!(path, reason, "document failed to parse; will retry next run");
                }
                WorkerOutcome::Crashed { path, message } => {
                    tracing::error!(path, message, "worker crashed; task dropped, will retry next run");
                }
            }
        }
        (stored, skipped)
    });

    let graphdb = config.graphdb.clone();
    let parser_name = config.parser.clone();
    let rawdb = config.keep_raw_tree.then(|| config.rawdb.clone());
    pool.install(|| {
        let _ignored_early_exit = todo.par_iter().try_for_each(|path| {
            if cancelled.load(Ordering::Relaxed) {
                return Err(());
            }
            let outcome = process_one(path, &parser_name, &graphdb, rawdb.as_deref());
            drop(tx.send(outcome));
            Ok(())
        });
    });
    drop(tx);

    let (stored, skipped) = consumer.join().unwrap_or((0, 0));
    Ok(BuildSummary {
        total,
        stored,
        skipped,
    })
}

/// Inputs to a `score` action (§6).
#[derive(Clone, Debug)]
pub struct ScoreConfig {
    /// Manifest of query PDFs.
    pub manifest: PathBuf,
    /// Worker count (`--procs`) used to fan out the partitioned scan.
    pub procs: usize,
    /// Fingerprint store file to score against.
    pub graphdb: PathBuf,
    /// `--parser` registry name.
    pub parser: String,
    /// Canberra distance cutoff; `0.0` means "report all".
    pub threshold: f64,
}

fn write_line(out: &Mutex<&mut (dyn std::io::Write + Send)>, line: &str) {
    if let Ok(mut writer) = out.lock() {
        drop(writer.write_all(line.as_bytes()));
    }
}

/// Run a `score` action: for each query PDF in `config.manifest`, partition
/// the store's structural families across `config.procs` workers and emit
/// CSV matches (`subject,family,candidate,score`) to `out`.
///
/// # Errors
/// Returns [`NabuError::Input`] if the manifest cannot be read, `--parser`
/// names an unknown parser, or the worker pool cannot be built.
pub fn run_score(config: &ScoreConfig, out: &mut (dyn std::io::Write + Send)) -> Result<()> {
    use std::io::Write as _;

    let queries = read_manifest(&config.manifest)?;
    get_parser(&config.parser)?;

    writeln!(out, "subject,family,candidate,score").map_err(|source| NabuError::Input {
        message: format!("could not write CSV header: {source}"),
    })?;

    let pool = build_worker_pool(config.procs)?;
    let out = Mutex::new(out);
    let procs = config.procs.max(1);

    for query_path in &queries {
        let parser = get_parser(&config.parser)?;
        let doc = match parser.parse(query_path) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!(error = %err, path = %query_path.display(), "query parse failed, skipping");
                continue;
            }
        };
        let record = match build_fingerprint(&doc) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(error = %err, path = %query_path.display(), "query fingerprinting failed, skipping");
                continue;
            }
        };

        let store = match FingerprintStore::open(&config.graphdb) {
            Ok(store) => store,
            Err(err) => {
                tracing::warn!(error = %err, "could not open store for family listing, skipping query");
                continue;
            }
        };
        let families = store.distinct_edge_digests()?;
        drop(store);

        let partition_size = families.len().div_ceil(procs).max(1);
        let partitions: Vec<&[String]> = families.chunks(partition_size).collect();

        let subject = &record.document_id;
        let query_signature = &record.signature;
        let graphdb = &config.graphdb;
        let threshold = config.threshold;
        let out_ref = &out;

        pool.install(|| {
            partitions.par_iter().for_each(|partition| {
                score_partition(partition, graphdb, subject, query_signature, threshold, out_ref);
            });
        });
    }

    Ok(())
}

fn score_partition(
    partition: &[String],
    graphdb: &Path,
    subject: &str,
    query_signature: &[f64],
    threshold: f64,
    out: &Mutex<&mut (dyn std::io::Write + Send)>,
) {
    let Ok(store) = FingerprintStore::open(graphdb) else {
        return;
    };
    for family in partition {
        let Ok(Some((candidate, signature))) = store.get_family_signature(family) else {
            continue;
        };
        let distance = canberra_distance(query_signature, &signature);
        if threshold > 0.0 && distance > threshold {
            continue;
        }
        write_line(out, &format!("{subject},{family},{candidate},{distance:.6}\n"));
    }
}
