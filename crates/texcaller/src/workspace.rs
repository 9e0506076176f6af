//! Scoped workspace directory for a single conversion request.
//!
//! Each request gets a uniquely named directory under the base temp dir
//! (`TMPDIR` override, else the platform default) holding the four fixed
//! files the engine knows about. Teardown is guaranteed: [`Workspace::release`]
//! removes the tree explicitly and reports what went wrong, and the `Drop`
//! backstop catches every path that never reaches `release`.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{ConvertError, ConvertResult};
use crate::format::ResultFormat;

/// Fixed file name the engine reads its input from.
pub(crate) const SOURCE_FILE: &str = "texput.tex";
/// Auxiliary file whose byte-equality across runs signals convergence.
pub(crate) const AUX_FILE: &str = "texput.aux";
pub(crate) const LOG_FILE: &str = "texput.log";

const DIR_PREFIX: &str = "texcaller-";

#[derive(Debug)]
pub(crate) struct Workspace {
    dir: PathBuf,
    source_file: PathBuf,
    aux_file: PathBuf,
    log_file: PathBuf,
    result_file: PathBuf,
    released: bool,
}

impl Workspace {
    /// Create the workspace directory and derive the in-workspace paths.
    pub(crate) fn acquire(result_format: ResultFormat) -> ConvertResult<Self> {
        Self::acquire_in(&base_temp_dir(), result_format)
    }

    fn acquire_in(base: &Path, result_format: ResultFormat) -> ConvertResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix(DIR_PREFIX)
            .tempdir_in(base)
            .map_err(|source| ConvertError::WorkspaceCreate {
                base: base.to_path_buf(),
                source,
            })?
            .keep();
        debug!(dir = %dir.display(), "workspace acquired");
        Ok(Workspace {
            source_file: dir.join(SOURCE_FILE),
            aux_file: dir.join(AUX_FILE),
            log_file: dir.join(LOG_FILE),
            result_file: dir.join(result_format.file_name()),
            dir,
            released: false,
        })
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    pub(crate) fn source_file(&self) -> &Path {
        &self.source_file
    }

    pub(crate) fn aux_file(&self) -> &Path {
        &self.aux_file
    }

    pub(crate) fn log_file(&self) -> &Path {
        &self.log_file
    }

    pub(crate) fn result_file(&self) -> &Path {
        &self.result_file
    }

    /// Remove the directory and everything under it.
    ///
    /// Consumes the workspace so teardown runs exactly once per request.
    pub(crate) fn release(mut self) -> ConvertResult<()> {
        self.released = true;
        let result = remove_dir_tree(&self.dir);
        debug!(dir = %self.dir.display(), ok = result.is_ok(), "workspace released");
        result
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if !self.released {
            if let Err(err) = remove_dir_tree(&self.dir) {
                warn!(dir = %self.dir.display(), %err, "workspace leaked during unwind");
            }
        }
    }
}

/// Base directory for workspaces: `TMPDIR` when set and non-empty,
/// the platform default otherwise.
///
/// `std::env::temp_dir` passes an empty `TMPDIR` through as an empty
/// path, so the fallback is explicit here.
fn base_temp_dir() -> PathBuf {
    resolve_base(env::var_os("TMPDIR"))
}

fn resolve_base(tmpdir: Option<std::ffi::OsString>) -> PathBuf {
    match tmpdir {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => default_temp_dir(),
    }
}

#[cfg(unix)]
fn default_temp_dir() -> PathBuf {
    PathBuf::from("/tmp")
}

#[cfg(not(unix))]
fn default_temp_dir() -> PathBuf {
    env::temp_dir()
}

/// Remove `dir` recursively, best-effort.
///
/// Individual entry failures do not abort the traversal; the first one is
/// retained and reported. A failure of the final directory removal
/// supersedes any retained entry-level error. Missing entries are
/// tolerated throughout.
fn remove_dir_tree(dir: &Path) -> ConvertResult<()> {
    let mut first_error: Option<String> = None;
    let mut record = |message: String| {
        if first_error.is_none() {
            first_error = Some(message);
        }
    };

    match fs::read_dir(dir) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => record(format!(
            "Unable to read directory entries of \"{}\": {}.",
            dir.display(),
            err
        )),
        Ok(entries) => {
            for entry in entries {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        record(format!(
                            "Unable to read directory entries of \"{}\": {}.",
                            dir.display(),
                            err
                        ));
                        continue;
                    }
                };
                let path = entry.path();
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                if is_dir {
                    if let Err(err) = remove_dir_tree(&path) {
                        record(err.to_string());
                    }
                } else {
                    match fs::remove_file(&path) {
                        Ok(()) => {}
                        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                        Err(err) => record(format!(
                            "Unable to remove file \"{}\": {}.",
                            path.display(),
                            err
                        )),
                    }
                }
            }
        }
    }

    match fs::remove_dir(dir) {
        Ok(()) => match first_error {
            None => Ok(()),
            Some(message) => Err(ConvertError::WorkspaceRemove { message }),
        },
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(ConvertError::WorkspaceRemove {
            message: format!("Unable to remove directory \"{}\": {}.", dir.display(), err),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_creates_unique_dirs_and_release_removes_them() {
        let base = tempfile::tempdir().unwrap();

        let first = Workspace::acquire_in(base.path(), ResultFormat::Pdf).unwrap();
        let second = Workspace::acquire_in(base.path(), ResultFormat::Pdf).unwrap();
        assert_ne!(first.dir(), second.dir());
        assert!(first.dir().starts_with(base.path()));
        assert!(first.dir().is_dir());
        assert_eq!(first.source_file(), first.dir().join(SOURCE_FILE));
        assert_eq!(first.aux_file(), first.dir().join(AUX_FILE));
        assert_eq!(first.result_file(), first.dir().join("texput.pdf"));

        let first_dir = first.dir().to_path_buf();
        first.release().unwrap();
        second.release().unwrap();
        assert!(!first_dir.exists());
        assert_eq!(fs::read_dir(base.path()).unwrap().count(), 0);
    }

    #[test]
    fn dvi_requests_derive_a_dvi_result_path() {
        let base = tempfile::tempdir().unwrap();
        let workspace = Workspace::acquire_in(base.path(), ResultFormat::Dvi).unwrap();
        assert_eq!(workspace.result_file(), workspace.dir().join("texput.dvi"));
        workspace.release().unwrap();
    }

    #[test]
    fn acquire_in_a_missing_base_reports_the_base() {
        let base = tempfile::tempdir().unwrap();
        let gone = base.path().join("never-created");
        let err = Workspace::acquire_in(&gone, ResultFormat::Pdf).unwrap_err();
        assert!(matches!(err, ConvertError::WorkspaceCreate { .. }));
        assert!(err.to_string().contains("never-created"));
    }

    #[test]
    fn release_removes_nested_engine_droppings() {
        let base = tempfile::tempdir().unwrap();
        let workspace = Workspace::acquire_in(base.path(), ResultFormat::Pdf).unwrap();
        let sub = workspace.dir().join("fonts").join("cache");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("entry"), b"x").unwrap();
        fs::write(workspace.dir().join(LOG_FILE), b"log").unwrap();

        let dir = workspace.dir().to_path_buf();
        workspace.release().unwrap();
        assert!(!dir.exists());
    }

    #[test]
    fn drop_backstop_removes_an_unreleased_workspace() {
        let base = tempfile::tempdir().unwrap();
        let dir = {
            let workspace = Workspace::acquire_in(base.path(), ResultFormat::Pdf).unwrap();
            workspace.dir().to_path_buf()
        };
        assert!(!dir.exists());
    }

    #[test]
    fn tmpdir_override_wins_when_set_and_non_empty() {
        assert_eq!(
            resolve_base(Some("/var/texcaller".into())),
            PathBuf::from("/var/texcaller")
        );
    }

    #[test]
    fn empty_or_unset_tmpdir_falls_back_to_platform_default() {
        assert_eq!(resolve_base(Some("".into())), default_temp_dir());
        assert_eq!(resolve_base(None), default_temp_dir());
        assert!(!resolve_base(None).as_os_str().is_empty());
    }

    #[test]
    fn removing_a_missing_tree_is_not_an_error() {
        let base = tempfile::tempdir().unwrap();
        let gone = base.path().join("never-created");
        assert!(remove_dir_tree(&gone).is_ok());
    }
}
