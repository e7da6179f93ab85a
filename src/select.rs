use regex::Regex;
use tracing::warn;

use crate::error::Error;
use crate::models::{Library, Playlist};

/// Which playlists to pull out of the library. Exactly one inclusion mode
/// is active per run; the exclusion list applies afterwards no matter
/// which mode produced the set.
#[derive(Debug, Clone)]
pub enum Include {
    /// Every user-created playlist (distinguished kind 0, name not
    /// "Library").
    All,
    /// Every playlist, built-ins included.
    AllWithBuiltin,
    /// Playlists whose name matches the pattern (unanchored).
    Regex(String),
    /// Exact names, in the caller's order.
    Names(Vec<String>),
    /// No inclusion mode was requested.
    None,
}

#[derive(Debug, Clone)]
pub struct SelectionPolicy {
    pub include: Include,
    pub exclude: Vec<String>,
}

/// Resolve the policy against the library. Unmatched names and invalid
/// regex patterns are reported but never fail the run; the result just
/// omits them.
pub fn select_playlists(library: &Library, policy: &SelectionPolicy) -> Vec<Playlist> {
    let included: Vec<Playlist> = match &policy.include {
        Include::All => library
            .playlists
            .iter()
            .filter(|p| !p.is_builtin() && p.name != "Library")
            .cloned()
            .collect(),
        Include::AllWithBuiltin => library.playlists.clone(),
        Include::Regex(pattern) => match Regex::new(pattern) {
            Ok(re) => library
                .playlists
                .iter()
                .filter(|p| re.is_match(&p.name))
                .cloned()
                .collect(),
            Err(e) => {
                warn!("invalid playlist pattern {pattern:?}: {e}");
                Vec::new()
            }
        },
        Include::Names(names) => names
            .iter()
            .filter_map(|name| match library.playlist_by_name(name) {
                Some(playlist) => Some(playlist.clone()),
                None => {
                    warn!("{}", Error::PlaylistNotFound(name.clone()));
                    None
                }
            })
            .collect(),
        Include::None => Vec::new(),
    };

    included
        .into_iter()
        .filter(|p| !policy.exclude.iter().any(|name| *name == p.name))
        .collect()
}
