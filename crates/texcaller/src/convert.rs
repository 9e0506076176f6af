//! The conversion orchestrator.
//!
//! One synchronous call per request: validate, acquire a workspace, write
//! the source, drive the engine until the auxiliary file stops changing,
//! and tear the workspace down on every exit path. Convergence is a pure
//! fixed-point search over the auxiliary file's bytes; there is no backoff,
//! no partial success, and a hard engine failure is never retried.

use tracing::{debug, warn};

use crate::error::{ConvertError, ConvertResult};
use crate::format::{engine_command, ResultFormat, SourceFormat};
use crate::fsio;
use crate::runner::run_engine;
use crate::workspace::Workspace;

/// One conversion request. The source bytes stay owned by the caller.
#[derive(Debug, Clone, Copy)]
pub struct ConversionRequest<'a> {
    pub source: &'a [u8],
    pub source_format: SourceFormat,
    pub result_format: ResultFormat,
    /// Maximum number of engine invocations before declaring
    /// non-convergence. Must be at least 2.
    pub max_runs: u32,
}

impl<'a> ConversionRequest<'a> {
    pub fn new(
        source: &'a [u8],
        source_format: SourceFormat,
        result_format: ResultFormat,
        max_runs: u32,
    ) -> Self {
        ConversionRequest {
            source,
            source_format,
            result_format,
            max_runs,
        }
    }
}

/// Externally visible result of a conversion.
///
/// `OutOfMemory` is deliberately distinct from `Failed`: it means no
/// diagnostic narrative could be produced at all, and callers must check
/// for it before interpreting anything else.
#[derive(Debug)]
pub enum ConversionOutcome {
    /// The engine converged; `info` summarizes the conversion and carries
    /// the engine log.
    Converted { result: Vec<u8>, info: String },
    /// The request failed; `info` explains why.
    Failed { info: String },
    /// Allocation failure; no diagnostics available.
    OutOfMemory,
}

impl ConversionOutcome {
    pub fn result(&self) -> Option<&[u8]> {
        match self {
            ConversionOutcome::Converted { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn info(&self) -> Option<&str> {
        match self {
            ConversionOutcome::Converted { info, .. } => Some(info),
            ConversionOutcome::Failed { info } => Some(info),
            ConversionOutcome::OutOfMemory => None,
        }
    }
}

/// Convert a TeX or LaTeX source document to DVI or PDF.
///
/// Blocks the calling thread for the whole request: workspace setup, every
/// engine run, and teardown. Holds no process-wide state, so independent
/// concurrent calls are safe; each gets its own uniquely named workspace.
/// A hung engine blocks indefinitely; there is no timeout.
pub fn convert(request: &ConversionRequest<'_>) -> ConversionOutcome {
    // Validation happens before any filesystem or process resource exists,
    // so these failures carry no log and need no teardown.
    let command = match engine_command(request.source_format, request.result_format) {
        Ok(command) => command,
        Err(err) => return ConversionOutcome::Failed {
            info: err.to_string(),
        },
    };
    if request.max_runs < 2 {
        let err = ConvertError::InvalidRunBudget {
            max_runs: request.max_runs,
        };
        return ConversionOutcome::Failed {
            info: err.to_string(),
        };
    }

    let workspace = match Workspace::acquire(request.result_format) {
        Ok(workspace) => workspace,
        Err(err) => {
            return ConversionOutcome::Failed {
                info: err.to_string(),
            }
        }
    };

    let converged = run_to_fixed_point(request, command, &workspace);
    finish(converged, workspace)
}

/// Drive the engine until the stabilization artifact stops changing or the
/// run budget is exhausted.
fn run_to_fixed_point(
    request: &ConversionRequest<'_>,
    command: &str,
    workspace: &Workspace,
) -> ConvertResult<(Vec<u8>, String)> {
    fsio::write_all(workspace.source_file(), request.source)?;

    let mut previous: Option<Vec<u8>> = None;
    for run in 1..=request.max_runs {
        run_engine(command, workspace.dir()).into_result(command)?;

        // An absent artifact is valid, and equal absence counts as stable:
        // an engine that never writes one converges on the first run.
        let artifact = fsio::read_if_exists(workspace.aux_file())?;
        if artifact == previous {
            debug!(run, command, "stabilization artifact reached fixed point");
            let result = match fsio::read_if_exists(workspace.result_file())? {
                Some(bytes) => bytes,
                None => {
                    return Err(ConvertError::MissingResultFile {
                        command: command.to_string(),
                        path: workspace.result_file().to_path_buf(),
                    })
                }
            };
            let info = format!(
                "Generated {} ({} bytes) from {} ({} bytes) after {} runs.",
                request.result_format,
                result.len(),
                request.source_format,
                request.source.len(),
                run
            );
            return Ok((result, info));
        }
        debug!(run, command, "stabilization artifact changed, running again");
        previous = artifact;
    }

    Err(ConvertError::NotStabilized {
        max_runs: request.max_runs,
    })
}

/// Assemble the diagnostic narrative and tear the workspace down.
///
/// The engine log is informational context on success and failure alike.
/// A teardown failure overrides everything: the result bytes are discarded
/// and the teardown error becomes the narrative, because surfacing a
/// resource leak outranks returning the document.
fn finish(
    converged: ConvertResult<(Vec<u8>, String)>,
    workspace: Workspace,
) -> ConversionOutcome {
    let log = fsio::read_if_exists(workspace.log_file())
        .ok()
        .flatten()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned());

    let outcome = match converged {
        Ok((result, mut info)) => {
            append_log(&mut info, log);
            ConversionOutcome::Converted { result, info }
        }
        Err(ConvertError::OutOfMemory) => ConversionOutcome::OutOfMemory,
        Err(err) => {
            let mut info = err.to_string();
            append_log(&mut info, log);
            ConversionOutcome::Failed { info }
        }
    };

    match workspace.release() {
        Ok(()) => outcome,
        Err(err) => {
            warn!(%err, "workspace teardown failed, discarding result");
            ConversionOutcome::Failed {
                info: err.to_string(),
            }
        }
    }
}

fn append_log(info: &mut String, log: Option<String>) {
    if let Some(log) = log {
        info.push_str("\n\n");
        info.push_str(&log);
    }
}
