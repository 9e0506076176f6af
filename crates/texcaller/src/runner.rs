//! Synchronous engine invocation.
//!
//! All platform process handling is behind one narrow operation: spawn the
//! engine with a fixed argument list inside the workspace, detached from the
//! caller's standard streams, wait for it, and classify the termination.
//! Retry policy lives in the convergence loop, never here.

use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use tracing::debug;

use crate::error::{ConvertError, ConvertResult};
use crate::workspace::SOURCE_FILE;

/// Fixed, restricted argument set: non-interactive, halt on the first
/// error, file:line error reporting, shell escape disabled.
const ENGINE_ARGS: [&str; 4] = [
    "-interaction=batchmode",
    "-halt-on-error",
    "-file-line-error",
    "-no-shell-escape",
];

/// Classification of a single engine invocation.
#[derive(Debug)]
pub(crate) enum RunOutcome {
    Success,
    NonZeroExit(i32),
    KilledBySignal(i32),
    SpawnFailed(io::Error),
}

/// Run `command` inside `workdir` and wait for it to finish.
///
/// Standard input, output and error are all disconnected: the engine must
/// never block on or pollute the caller's streams.
pub(crate) fn run_engine(command: &str, workdir: &Path) -> RunOutcome {
    let status = Command::new(command)
        .args(ENGINE_ARGS)
        .arg(SOURCE_FILE)
        .current_dir(workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    let outcome = match status {
        Err(source) => RunOutcome::SpawnFailed(source),
        Ok(status) if status.success() => RunOutcome::Success,
        Ok(status) => match status.code() {
            Some(code) => RunOutcome::NonZeroExit(code),
            None => RunOutcome::KilledBySignal(termination_signal(status)),
        },
    };
    debug!(command, ?outcome, "engine run finished");
    outcome
}

#[cfg(unix)]
fn termination_signal(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status.signal().unwrap_or(0)
}

#[cfg(not(unix))]
fn termination_signal(_status: ExitStatus) -> i32 {
    0
}

impl RunOutcome {
    /// Fold the classification into the request-level error taxonomy.
    pub(crate) fn into_result(self, command: &str) -> ConvertResult<()> {
        match self {
            RunOutcome::Success => Ok(()),
            RunOutcome::NonZeroExit(status) => Err(ConvertError::NonZeroExit {
                command: command.to_string(),
                status,
            }),
            RunOutcome::KilledBySignal(signal) => Err(ConvertError::KilledBySignal {
                command: command.to_string(),
                signal,
            }),
            RunOutcome::SpawnFailed(source) => Err(ConvertError::SpawnFailed {
                command: command.to_string(),
                source,
            }),
        }
    }
}
