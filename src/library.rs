use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Library;

/// Read and decode a library XML export.
///
/// Distinguishes a missing file (`NotFound`) from an unreadable one (`Io`)
/// and from a structurally broken one (`Parse`); all three are fatal to
/// the run. On success the playlist indexes are built and the track
/// location fixup has been applied.
pub fn load_library<P: AsRef<Path>>(path: P) -> Result<Library> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let mut library: Library = plist::from_reader(BufReader::new(file))
        .map_err(|e| Error::Parse(format!("invalid library plist {}: {e}", path.display())))?;

    // iTunes does not percent-encode `+` in Location, so a decoder that
    // treats `+` as an escaped space would corrupt the path. Re-escape it
    // before anything downstream decodes the URI.
    for track in library.tracks.values_mut() {
        if track.location.contains('+') {
            track.location = track.location.replace('+', "%2B");
        }
    }

    library.build_indexes();
    debug!(
        tracks = library.tracks.len(),
        playlists = library.playlists.len(),
        "library loaded"
    );

    Ok(library)
}
