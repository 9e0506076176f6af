//! Whole-file reads and writes with precise failure reporting.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::error::{ConvertError, ConvertResult};

/// Read the complete content of `path`.
///
/// The buffer is reserved up front so an allocation failure surfaces as
/// [`ConvertError::OutOfMemory`] instead of aborting the process.
pub(crate) fn read_all(path: &Path) -> ConvertResult<Vec<u8>> {
    let read_err = |source: io::Error| ConvertError::FileRead {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(read_err)?;
    let len = file.metadata().map_err(read_err)?.len() as usize;
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| ConvertError::OutOfMemory)?;
    file.read_to_end(&mut buffer).map_err(read_err)?;
    Ok(buffer)
}

/// Like [`read_all`], but a missing file is `None` rather than an error.
///
/// This is the single seam where "file does not exist" is non-fatal: the
/// stabilization artifact and the engine log are both legitimately absent.
pub(crate) fn read_if_exists(path: &Path) -> ConvertResult<Option<Vec<u8>>> {
    match read_all(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(ConvertError::FileRead { ref source, .. })
            if source.kind() == io::ErrorKind::NotFound =>
        {
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Create or truncate `path` and write the full buffer.
pub(crate) fn write_all(path: &Path, bytes: &[u8]) -> ConvertResult<()> {
    let write_err = |source: io::Error| ConvertError::FileWrite {
        path: path.to_path_buf(),
        len: bytes.len(),
        source,
    };
    let mut file = File::create(path).map_err(write_err)?;
    file.write_all(bytes).map_err(write_err)?;
    file.flush().map_err(write_err)?;
    Ok(())
}
