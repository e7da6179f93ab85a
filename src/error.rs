use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between loading the library and
/// finishing the export.
///
/// `NotFound`, a library-level `Parse` and `UnsupportedFormat` are fatal;
/// per-track `Parse`/`Io`/`NotRegularFile` and `PlaylistNotFound` are
/// logged by the caller and the surrounding loop continues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("library file not found: {0}")]
    NotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("source is not a regular file: {0}")]
    NotRegularFile(PathBuf),

    #[error("no playlist named {0:?} in the library")]
    PlaylistNotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
