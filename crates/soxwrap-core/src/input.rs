//! Source-input resolution
//!
//! Operations accept a path, an owned temporary file (typically the output
//! of a previous operation), or a list of paths for concatenation. The
//! alternatives are a tagged enum resolved to absolute paths at the
//! operation boundary, so nothing downstream inspects kinds at runtime.

use crate::error::SoxError;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A source for an operation.
#[derive(Debug)]
pub enum AudioSource {
    /// A file on disk, relative or absolute.
    Path(PathBuf),
    /// An owned temp file; deleted when the source is dropped.
    Handle(NamedTempFile),
    /// Multiple files, accepted only by concatenation.
    List(Vec<PathBuf>),
}

impl AudioSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        AudioSource::Path(path.into())
    }

    pub fn list<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        AudioSource::List(paths.into_iter().map(Into::into).collect())
    }

    /// Absolute path of a single-file source.
    pub fn resolve(&self) -> Result<PathBuf, SoxError> {
        match self {
            AudioSource::Path(p) => Ok(absolute(p)?),
            AudioSource::Handle(f) => Ok(absolute(f.path())?),
            AudioSource::List(_) => Err(SoxError::UnsupportedInput {
                expected: "a single file path or handle",
            }),
        }
    }

    /// Absolute paths of a list source.
    pub fn resolve_list(&self) -> Result<Vec<PathBuf>, SoxError> {
        match self {
            AudioSource::List(paths) => {
                let mut resolved = Vec::with_capacity(paths.len());
                for p in paths {
                    resolved.push(absolute(p)?);
                }
                Ok(resolved)
            }
            _ => Err(SoxError::UnsupportedInput {
                expected: "a list of file paths",
            }),
        }
    }

    /// Name used in error messages and logs.
    pub fn basename(&self) -> String {
        match self {
            AudioSource::Path(p) => file_name_of(p),
            AudioSource::Handle(f) => file_name_of(f.path()),
            AudioSource::List(paths) => format!("{} files", paths.len()),
        }
    }

    /// Delete the underlying file(s). Backs the `gc` option; called only
    /// after a successful operation.
    pub fn discard(self) -> std::io::Result<()> {
        match self {
            AudioSource::Path(p) => std::fs::remove_file(p),
            AudioSource::Handle(f) => f.close(),
            AudioSource::List(paths) => {
                for p in paths {
                    std::fs::remove_file(p)?;
                }
                Ok(())
            }
        }
    }
}

impl From<NamedTempFile> for AudioSource {
    fn from(file: NamedTempFile) -> Self {
        AudioSource::Handle(file)
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

// Unlike canonicalize, this does not require the file to exist yet.
fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
