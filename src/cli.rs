use std::path::PathBuf;

use clap::Parser;

use crate::copier::CopyPolicy;
use crate::error::{Error, Result};
use crate::export::ExportSettings;
use crate::location::trim_location_prefix;
use crate::models::{Library, Playlist};
use crate::select::{Include, SelectionPolicy};
use crate::writers::PlaylistFormat;

#[derive(Debug, Parser)]
#[command(
    name = "playlift",
    version,
    about = "Export iTunes/Music.app playlists to M3U, WPL or ZPL files"
)]
pub struct Cli {
    /// Path to the iTunes Music Library XML file (platform default when
    /// omitted)
    #[arg(long)]
    pub library: Option<PathBuf>,

    /// Directory the playlist files are written to
    #[arg(long, default_value = ".")]
    pub output: PathBuf,

    /// Playlist file format: M3U, EXT (extended M3U), WPL or ZPL
    #[arg(long, default_value = "M3U")]
    pub format: PlaylistFormat,

    /// Copy the referenced media files: NONE, PLAYLIST, ITUNES or FLAT
    #[arg(long, default_value = "NONE")]
    pub copy: CopyPolicy,

    /// Include every user-defined playlist
    #[arg(long)]
    pub include_all: bool,

    /// Include every playlist, iTunes built-ins included
    #[arg(long)]
    pub include_all_with_builtin: bool,

    /// Include playlists whose name matches this regular expression
    #[arg(long, value_name = "PATTERN")]
    pub include_regex: Option<String>,

    /// Include a playlist by exact name (repeatable)
    #[arg(long, value_name = "NAME")]
    pub include: Vec<String>,

    /// Exclude a playlist by exact name, after inclusion (repeatable)
    #[arg(long, value_name = "NAME")]
    pub exclude: Vec<String>,

    /// New base path for the music files, replacing the library's music
    /// folder in every entry
    #[arg(long, value_name = "PATH")]
    pub music_path: Option<String>,

    /// Override the base path that --music-path replaces
    #[arg(long, value_name = "PATH")]
    pub music_path_orig: Option<String>,

    /// Mirror the library's playlist folders as output subdirectories
    #[arg(long)]
    pub nested: bool,
}

impl Cli {
    /// First matching inclusion mode wins; the rest are ignored.
    pub fn selection_policy(&self) -> SelectionPolicy {
        let include = if self.include_all {
            Include::All
        } else if self.include_all_with_builtin {
            Include::AllWithBuiltin
        } else if let Some(pattern) = &self.include_regex {
            Include::Regex(pattern.clone())
        } else if !self.include.is_empty() {
            Include::Names(self.include.clone())
        } else {
            Include::None
        };

        SelectionPolicy {
            include,
            exclude: self.exclude.clone(),
        }
    }

    /// Assemble the run settings. When `--music-path` is given without
    /// `--music-path-orig`, the root to replace is the library's own
    /// `Music Folder`, decoded and trimmed like any track location.
    pub fn export_settings(
        &self,
        library: &Library,
        playlists: Vec<Playlist>,
    ) -> Result<ExportSettings> {
        let original_music_path = match (&self.music_path, &self.music_path_orig) {
            (None, _) => None,
            (Some(_), Some(orig)) => Some(orig.clone()),
            (Some(_), None) => {
                let decoded = urlencoding::decode(&library.music_folder).map_err(|e| {
                    Error::Parse(format!(
                        "undecodable Music Folder {:?}: {e}",
                        library.music_folder
                    ))
                })?;
                Some(trim_location_prefix(&decoded).to_string())
            }
        };

        Ok(ExportSettings {
            format: self.format,
            output_path: self.output.clone(),
            copy_policy: self.copy,
            original_music_path,
            new_music_path: self.music_path.clone(),
            nest_folders: self.nested,
            playlists,
        })
    }
}
