//! Error types for the conversion orchestrator.
//!
//! Every failure the library can report is a [`ConvertError`] variant. The
//! taxonomy follows the request lifecycle: validation errors are reported
//! before any resource is allocated, resource and process errors carry the
//! OS-reported reason, and `OutOfMemory` collapses all context into the
//! absent-narrative sentinel that callers must check first.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::format::{ResultFormat, SourceFormat};

/// Result type for the library's fallible internals.
pub type ConvertResult<T> = Result<T, ConvertError>;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// The (source format, result format) pair has no known engine.
    #[error("Unable to convert from \"{source_format}\" to \"{result_format}\".")]
    UnsupportedFormatPair {
        source_format: SourceFormat,
        result_format: ResultFormat,
    },

    /// The run budget permits fewer than the two runs convergence needs.
    #[error("Argument max_runs is {max_runs}, but must be >= 2.")]
    InvalidRunBudget { max_runs: u32 },

    /// The workspace directory could not be created.
    #[error("Unable to create temporary directory under \"{}\": {source}.", base.display())]
    WorkspaceCreate { base: PathBuf, source: io::Error },

    /// Workspace teardown failed; the message names the path that survived.
    #[error("{message}")]
    WorkspaceRemove { message: String },

    #[error("Unable to read file \"{}\": {source}.", path.display())]
    FileRead { path: PathBuf, source: io::Error },

    #[error("Unable to write {len} bytes to file \"{}\": {source}.", path.display())]
    FileWrite {
        path: PathBuf,
        len: usize,
        source: io::Error,
    },

    /// The engine executable could not be started at all.
    #[error("Unable to run command \"{command}\": {source}.")]
    SpawnFailed { command: String, source: io::Error },

    /// Always fatal to the request; the engine is never re-run.
    #[error("Command \"{command}\" was terminated by signal {signal}.")]
    KilledBySignal { command: String, signal: i32 },

    /// Always fatal to the request; the engine is never re-run.
    #[error("Command \"{command}\" terminated with exit status {status}.")]
    NonZeroExit { command: String, status: i32 },

    /// The engine reported success but left no result document behind.
    #[error("Result file \"{}\" was not produced by \"{command}\".", path.display())]
    MissingResultFile { command: String, path: PathBuf },

    /// Every run succeeded, yet the auxiliary file kept changing.
    #[error("Output didn't stabilize after {max_runs} runs.")]
    NotStabilized { max_runs: u32 },

    /// Allocation failure. Distinct from all other kinds: the caller-visible
    /// outcome degrades to an absent narrative instead of a message.
    #[error("Out of memory.")]
    OutOfMemory,
}
