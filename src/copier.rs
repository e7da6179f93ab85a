use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::export::ExportSettings;
use crate::models::{Library, Playlist, Track};

/// Layout for duplicating media files next to the playlist files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyPolicy {
    /// Leave the files where they are; playlist entries point at the
    /// (possibly remapped) source path.
    #[default]
    None,
    /// One directory per playlist under the output path.
    Playlist,
    /// `<artist>/<album>` tree under the output path.
    Itunes,
    /// Everything directly into the output path.
    Flat,
}

impl FromStr for CopyPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "NONE" => Ok(CopyPolicy::None),
            "PLAYLIST" => Ok(CopyPolicy::Playlist),
            "ITUNES" => Ok(CopyPolicy::Itunes),
            "FLAT" => Ok(CopyPolicy::Flat),
            _ => Err(Error::UnsupportedFormat(format!("copy policy {s:?}"))),
        }
    }
}

/// Copy one resolved track according to the run's copy policy and return
/// the path the playlist entry should reference. With `CopyPolicy::None`
/// this is the source path untouched.
pub fn copy_track(
    settings: &ExportSettings,
    library: &Library,
    playlist: &Playlist,
    track: &Track,
    source: &str,
) -> Result<PathBuf> {
    let dest_dir = match settings.copy_policy {
        CopyPolicy::None => return Ok(PathBuf::from(source)),
        CopyPolicy::Playlist => {
            let mut dir = settings.output_path.clone();
            if settings.nest_folders {
                for folder in library.folder_chain(playlist) {
                    dir.push(folder);
                }
            }
            dir.push(playlist.safe_name());
            dir
        }
        CopyPolicy::Itunes => settings.output_path.join(&track.artist).join(&track.album),
        CopyPolicy::Flat => settings.output_path.clone(),
    };

    let basename = Path::new(source)
        .file_name()
        .ok_or_else(|| Error::Parse(format!("location {source:?} has no file name")))?;
    let dest = dest_dir.join(basename);

    copy_file(Path::new(source), &dest)?;
    Ok(dest)
}

/// Byte-for-byte copy with a durability flush. A destination that already
/// exists counts as done, so re-running an export does not re-copy.
fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    let meta = fs::metadata(src)?;
    if !meta.is_file() {
        return Err(Error::NotRegularFile(src.to_path_buf()));
    }

    if dest.exists() {
        return Ok(());
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut reader = File::open(src)?;
    let mut writer = File::create(dest)?;
    io::copy(&mut reader, &mut writer)?;
    writer.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn source_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path
    }

    fn playlist(name: &str) -> Playlist {
        Playlist {
            name: name.to_string(),
            ..Playlist::default()
        }
    }

    #[test]
    fn playlist_policy_copies_into_a_playlist_directory() {
        let src_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let source = source_file(src_dir.path(), "song.mp3", b"some unique bytes");

        let settings = ExportSettings {
            output_path: out_dir.path().to_path_buf(),
            copy_policy: CopyPolicy::Playlist,
            ..ExportSettings::default()
        };
        let library = Library::default();

        let dest = copy_track(
            &settings,
            &library,
            &playlist("MyPlaylist"),
            &Track::default(),
            source.to_str().unwrap(),
        )
        .unwrap();

        assert_eq!(dest, out_dir.path().join("MyPlaylist").join("song.mp3"));
        assert_eq!(fs::read(&dest).unwrap(), b"some unique bytes");
    }

    #[test]
    fn second_copy_is_a_no_op() {
        let src_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let source = source_file(src_dir.path(), "song.mp3", b"original");

        let settings = ExportSettings {
            output_path: out_dir.path().to_path_buf(),
            copy_policy: CopyPolicy::Flat,
            ..ExportSettings::default()
        };
        let library = Library::default();
        let track = Track::default();
        let pl = playlist("P");

        let dest = copy_track(&settings, &library, &pl, &track, source.to_str().unwrap()).unwrap();

        // Change the destination, run again: the copy must not clobber it.
        fs::write(&dest, b"modified").unwrap();
        let dest_again =
            copy_track(&settings, &library, &pl, &track, source.to_str().unwrap()).unwrap();
        assert_eq!(dest_again, dest);
        assert_eq!(fs::read(&dest).unwrap(), b"modified");
    }

    #[test]
    fn itunes_policy_builds_an_artist_album_tree() {
        let src_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let source = source_file(src_dir.path(), "song.mp3", b"x");

        let settings = ExportSettings {
            output_path: out_dir.path().to_path_buf(),
            copy_policy: CopyPolicy::Itunes,
            ..ExportSettings::default()
        };
        let track = Track {
            artist: "Artist".to_string(),
            album: "Album".to_string(),
            ..Track::default()
        };

        let dest = copy_track(
            &settings,
            &Library::default(),
            &playlist("P"),
            &track,
            source.to_str().unwrap(),
        )
        .unwrap();
        assert_eq!(
            dest,
            out_dir.path().join("Artist").join("Album").join("song.mp3")
        );
        assert!(dest.is_file());
    }

    #[test]
    fn directory_source_is_rejected() {
        let src_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();

        let settings = ExportSettings {
            output_path: out_dir.path().to_path_buf(),
            copy_policy: CopyPolicy::Flat,
            ..ExportSettings::default()
        };

        let err = copy_track(
            &settings,
            &Library::default(),
            &playlist("P"),
            &Track::default(),
            src_dir.path().to_str().unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::NotRegularFile(_)));
    }

    #[test]
    fn none_policy_returns_the_source_untouched() {
        let settings = ExportSettings::default();
        let dest = copy_track(
            &settings,
            &Library::default(),
            &playlist("P"),
            &Track::default(),
            "/music/song.mp3",
        )
        .unwrap();
        assert_eq!(dest, PathBuf::from("/music/song.mp3"));
    }

    #[test]
    fn copy_policy_parses_case_insensitively() {
        assert_eq!("playlist".parse::<CopyPolicy>().unwrap(), CopyPolicy::Playlist);
        assert!("SHUFFLE".parse::<CopyPolicy>().is_err());
    }
}
