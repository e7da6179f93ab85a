use std::fs::{self, File};
use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::copier::{copy_track, CopyPolicy};
use crate::error::Result;
use crate::location::resolve_location;
use crate::models::{Library, Playlist};
use crate::writers::PlaylistFormat;

/// Everything one export run needs, built once from the CLI and the
/// loaded library and threaded through resolver, copier and writers.
#[derive(Debug, Clone, Default)]
pub struct ExportSettings {
    pub format: PlaylistFormat,
    pub output_path: PathBuf,
    pub copy_policy: CopyPolicy,
    /// Music root to replace in resolved locations, usually the decoded
    /// library `Music Folder`.
    pub original_music_path: Option<String>,
    /// Replacement music root. `None` leaves locations alone.
    pub new_music_path: Option<String>,
    /// Mirror the library's playlist-folder tree as output
    /// subdirectories.
    pub nest_folders: bool,
    /// Resolved selection, in export order.
    pub playlists: Vec<Playlist>,
}

/// Write one playlist file per selected, non-folder playlist.
///
/// Per-track problems (undecodable location, failed copy, failed entry
/// write) are logged and the track is dropped from the playlist body.
/// Failing to open an output file or to write a header or footer aborts
/// the whole run; a half-specified export is worse than a loud stop.
pub fn export_playlists(settings: &ExportSettings, library: &Library) -> Result<()> {
    let start = Instant::now();

    for playlist in &settings.playlists {
        if playlist.folder {
            debug!("skipping folder {:?}", playlist.name);
            continue;
        }
        info!("exporting playlist {:?}", playlist.name);

        let mut out_dir = settings.output_path.clone();
        if settings.nest_folders {
            for folder in library.folder_chain(playlist) {
                out_dir.push(folder);
            }
        }
        fs::create_dir_all(&out_dir)?;

        let out_path = out_dir.join(format!(
            "{}.{}",
            playlist.safe_name(),
            settings.format.extension()
        ));

        // Truncates any previous export. The handle closes on every exit
        // path below, error or not.
        let mut file = File::create(&out_path)?;
        let writer = settings.format.writer();

        writer.header(&mut file, playlist)?;

        for track in playlist.tracks(library) {
            let source = match resolve_location(&track.location, settings) {
                Ok(path) => path,
                Err(e) => {
                    warn!("skipping track {:?}: {e}", track.name);
                    continue;
                }
            };

            let entry_path = match copy_track(settings, library, playlist, track, &source) {
                Ok(path) => path,
                Err(e) => {
                    warn!("unable to copy {source}: {e}");
                    continue;
                }
            };

            if let Err(e) = writer.entry(&mut file, track, &entry_path.to_string_lossy()) {
                warn!("unable to write entry for {:?}: {e}", track.name);
            }
        }

        writer.footer(&mut file)?;
    }

    info!("export complete in {:.2?}", start.elapsed());
    Ok(())
}
