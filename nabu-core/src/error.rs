//! Error types for the nabu core library.
//!
//! Defines the error taxonomy from the driver design and a convenient result
//! alias. Cancellation is deliberately absent from [`NabuError`]: a user
//! interrupt is not an error, it is a signal the driver observes out of band
//! (see [`crate::driver`]).

use std::{fmt, path::PathBuf, sync::Arc};

use thiserror::Error;

/// Stable codes describing [`NabuError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum NabuErrorCode {
    /// Manifest unreadable or parser name unknown.
    Input,
    /// A single document failed to parse.
    Parse,
    /// The object-graph adapter could not produce a usable graph.
    Graph,
    /// Store or ledger I/O failed.
    Store,
    /// A worker task panicked or returned an uncaught error.
    WorkerCrash,
}

impl NabuErrorCode {
    /// Return the stable machine-readable representation of this error code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Input => "NABU_INPUT",
            Self::Parse => "NABU_PARSE",
            Self::Graph => "NABU_GRAPH",
            Self::Store => "NABU_STORE",
            Self::WorkerCrash => "NABU_WORKER_CRASH",
        }
    }
}

impl fmt::Display for NabuErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error produced by the nabu core library.
///
/// Only [`NabuError::Input`] and a store failure observed at startup are
/// escalated to a process exit by the driver; every other variant is logged
/// and the affected document is skipped (see the error-handling design).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum NabuError {
    /// Manifest unreadable or `--parser` named an unknown parser.
    #[error("input error: {message}")]
    Input {
        /// Human-readable detail.
        message: String,
    },
    /// A document failed to parse; the worker continues with the next task.
    #[error("failed to parse {path}: {message}")]
    Parse {
        /// Path of the offending document.
        path: PathBuf,
        /// Human-readable detail.
        message: String,
    },
    /// The adapter could not find a root, or produced an empty graph.
    #[error("could not build a graph for {path}: {message}")]
    Graph {
        /// Path of the offending document.
        path: PathBuf,
        /// Human-readable detail.
        message: String,
    },
    /// Store or ledger I/O failed.
    #[error("store error: {source}")]
    Store {
        /// Underlying SQLite failure.
        #[source]
        source: Arc<rusqlite::Error>,
    },
    /// A worker task panicked or returned an uncaught error.
    #[error("worker crashed on {path}: {message}")]
    WorkerCrash {
        /// Path of the document being processed when the worker crashed.
        path: PathBuf,
        /// Human-readable detail.
        message: String,
    },
}

impl NabuError {
    /// Retrieve the stable [`NabuErrorCode`] for this error.
    pub const fn code(&self) -> NabuErrorCode {
        match self {
            Self::Input { .. } => NabuErrorCode::Input,
            Self::Parse { .. } => NabuErrorCode::Parse,
            Self::Graph { .. } => NabuErrorCode::Graph,
            Self::Store { .. } => NabuErrorCode::Store,
            Self::WorkerCrash { .. } => NabuErrorCode::WorkerCrash,
        }
    }

    /// True if this error is fatal to the whole run (only `Input`, per the
    /// propagation policy: init errors escalate, per-document errors don't).
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Input { .. })
    }
}

impl From<rusqlite::Error> for NabuError {
    fn from(source: rusqlite::Error) -> Self {
        Self::Store {
            source: Arc::new(source),
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, NabuError>;
