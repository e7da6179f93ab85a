use std::collections::HashMap;

use serde::Deserialize;

/// In-memory form of an iTunes/Music.app library XML export.
///
/// Every field is `#[serde(default)]` because the XML omits keys freely;
/// unknown keys (artwork counts, sort names, smart criteria blobs, ...)
/// are ignored by the deserializer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Library {
    #[serde(rename = "Major Version")]
    pub major_version: i64,
    #[serde(rename = "Minor Version")]
    pub minor_version: i64,
    #[serde(rename = "Application Version")]
    pub application_version: String,
    #[serde(rename = "Features")]
    pub features: i64,
    #[serde(rename = "Show Content Ratings")]
    pub show_content_ratings: bool,
    #[serde(rename = "Music Folder")]
    pub music_folder: String,
    #[serde(rename = "Library Persistent ID")]
    pub persistent_id: String,
    #[serde(rename = "Tracks")]
    pub tracks: HashMap<String, Track>,
    #[serde(rename = "Playlists")]
    pub playlists: Vec<Playlist>,

    // Built once after decode, never serialized.
    #[serde(skip)]
    name_index: HashMap<String, usize>,
    #[serde(skip)]
    pid_index: HashMap<String, usize>,
}

impl Library {
    /// Build the name and persistent-id lookup indexes over `playlists`.
    /// Later entries win on a name collision.
    pub fn build_indexes(&mut self) {
        self.name_index.clear();
        self.pid_index.clear();
        for (i, playlist) in self.playlists.iter().enumerate() {
            self.name_index.insert(playlist.name.clone(), i);
            self.pid_index.insert(playlist.persistent_id.clone(), i);
        }
    }

    pub fn playlist_by_name(&self, name: &str) -> Option<&Playlist> {
        self.name_index.get(name).map(|&i| &self.playlists[i])
    }

    pub fn playlist_by_persistent_id(&self, pid: &str) -> Option<&Playlist> {
        self.pid_index.get(pid).map(|&i| &self.playlists[i])
    }

    /// Track ids are numeric but the plist keys the `Tracks` dict by their
    /// string form.
    pub fn track_by_id(&self, id: i64) -> Option<&Track> {
        self.tracks.get(&id.to_string())
    }

    /// Safe names of the playlist's ancestor folders, outermost first.
    /// A dangling parent id ends the walk; a chain deeper than
    /// `MAX_FOLDER_DEPTH` (a cycle in a malformed library would loop
    /// forever) abandons the nesting entirely.
    pub fn folder_chain(&self, playlist: &Playlist) -> Vec<String> {
        let mut chain = Vec::new();
        let mut parent = playlist.parent_persistent_id.as_deref();
        while let Some(pid) = parent {
            if chain.len() >= MAX_FOLDER_DEPTH {
                tracing::warn!(
                    playlist = %playlist.name,
                    "folder chain exceeds {MAX_FOLDER_DEPTH} levels, ignoring nesting"
                );
                return Vec::new();
            }
            match self.playlist_by_persistent_id(pid) {
                Some(ancestor) => {
                    chain.push(ancestor.safe_name());
                    parent = ancestor.parent_persistent_id.as_deref();
                }
                None => break,
            }
        }
        chain.reverse();
        chain
    }
}

/// Deeper than any folder tree iTunes will produce.
const MAX_FOLDER_DEPTH: usize = 16;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Track {
    #[serde(rename = "Track ID")]
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Artist")]
    pub artist: String,
    #[serde(rename = "Album Artist")]
    pub album_artist: String,
    #[serde(rename = "Composer")]
    pub composer: String,
    #[serde(rename = "Album")]
    pub album: String,
    #[serde(rename = "Genre")]
    pub genre: String,
    #[serde(rename = "Kind")]
    pub kind: String,
    #[serde(rename = "Size")]
    pub size: i64,
    /// Duration in milliseconds.
    #[serde(rename = "Total Time")]
    pub total_time: i64,
    #[serde(rename = "Track Number")]
    pub track_number: i64,
    #[serde(rename = "Track Count")]
    pub track_count: i64,
    #[serde(rename = "Disc Number")]
    pub disc_number: i64,
    #[serde(rename = "Disc Count")]
    pub disc_count: i64,
    #[serde(rename = "Year")]
    pub year: i64,
    #[serde(rename = "Bit Rate")]
    pub bit_rate: i64,
    #[serde(rename = "Sample Rate")]
    pub sample_rate: i64,
    #[serde(rename = "Play Count")]
    pub play_count: i64,
    #[serde(rename = "Skip Count")]
    pub skip_count: i64,
    #[serde(rename = "Rating")]
    pub rating: i64,
    #[serde(rename = "Persistent ID")]
    pub persistent_id: String,
    #[serde(rename = "Track Type")]
    pub track_type: String,
    /// Percent-encoded `file://` URI. See `library::load_library` for the
    /// `+` fixup applied right after decode.
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Comments")]
    pub comments: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Playlist {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Playlist ID")]
    pub id: i64,
    #[serde(rename = "Playlist Persistent ID")]
    pub persistent_id: String,
    #[serde(rename = "Parent Persistent ID")]
    pub parent_persistent_id: Option<String>,
    /// 0 for user-created playlists; anything else marks a built-in like
    /// "Music" or "Recently Added".
    #[serde(rename = "Distinguished Kind")]
    pub distinguished_kind: i64,
    #[serde(rename = "Master")]
    pub master: bool,
    #[serde(rename = "Visible")]
    pub visible: bool,
    #[serde(rename = "Folder")]
    pub folder: bool,
    #[serde(rename = "Playlist Items")]
    pub items: Vec<PlaylistItem>,
}

impl Playlist {
    /// Materialize the playlist's tracks in item order. Items whose track
    /// id is missing from the library are dropped without comment; stale
    /// libraries are common and one dangling reference should not sink a
    /// playlist.
    pub fn tracks<'a>(&self, library: &'a Library) -> Vec<&'a Track> {
        self.items
            .iter()
            .filter_map(|item| library.track_by_id(item.track_id))
            .collect()
    }

    /// Playlist name with filesystem-illegal characters replaced, used for
    /// output file and directory names.
    pub fn safe_name(&self) -> String {
        self.name
            .chars()
            .map(|c| match c {
                '[' | ']' | '\\' | ':' | '/' | '*' | '?' | '<' | '>' | '|' => '_',
                c => c,
            })
            .collect()
    }

    pub fn is_builtin(&self) -> bool {
        self.distinguished_kind != 0
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlaylistItem {
    #[serde(rename = "Track ID")]
    pub track_id: i64,
}
