//! Output writing for cvtex.
//! Persists the rendered document at the requested path.

use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Writes the rendered document, creating parent directories as needed and
/// replacing any existing file.
pub fn write_output<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    let write_error = |source| Error::OutputWriteError { path: path.display().to_string(), source };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, content).map_err(write_error)?;
    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
