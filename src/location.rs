use crate::error::{Error, Result};
use crate::export::ExportSettings;

/// Turn a track's raw percent-encoded `file://` URI into a filesystem
/// path. Pure function of the input and the run settings; a decode
/// failure is a per-track `Parse` error, the caller skips the track.
pub fn resolve_location(raw: &str, settings: &ExportSettings) -> Result<String> {
    let decoded = urlencoding::decode(raw)
        .map_err(|e| Error::Parse(format!("undecodable location {raw:?}: {e}")))?;

    let mut path = trim_location_prefix(&decoded).to_string();

    if let Some(new_root) = &settings.new_music_path {
        if let Some(original_root) = &settings.original_music_path {
            path = path.replacen(original_root.as_str(), new_root.as_str(), 1);
        }
    }

    Ok(normalize_separators(path))
}

/// Strip the URI scheme prefix iTunes writes in front of every location.
/// Windows paths carry a drive letter, so the slash after the authority
/// goes too; elsewhere it is the filesystem root and stays.
pub fn trim_location_prefix(path: &str) -> &str {
    #[cfg(windows)]
    {
        path.strip_prefix("file://localhost/").unwrap_or(path)
    }
    #[cfg(not(windows))]
    {
        path.strip_prefix("file://localhost").unwrap_or(path)
    }
}

#[cfg(windows)]
fn normalize_separators(path: String) -> String {
    path.replace('/', "\\")
}

#[cfg(not(windows))]
fn normalize_separators(path: String) -> String {
    path
}
