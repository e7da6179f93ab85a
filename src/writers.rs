use std::io::{self, Write};
use std::str::FromStr;

use chrono::Local;

use crate::error::Error;
use crate::models::{Playlist, Track};

/// Output schema for the playlist files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaylistFormat {
    /// Plain M3U, one path per line.
    #[default]
    M3u,
    /// Extended M3U with `#EXTINF` metadata lines.
    Ext,
    /// Windows Media Player playlist (smil).
    Wpl,
    /// Zune playlist; WPL plus a generator tag.
    Zpl,
}

impl PlaylistFormat {
    pub fn extension(self) -> &'static str {
        match self {
            PlaylistFormat::M3u | PlaylistFormat::Ext => "m3u",
            PlaylistFormat::Wpl => "wpl",
            PlaylistFormat::Zpl => "zpl",
        }
    }

    /// Strategy dispatch: every format maps to one header/entry/footer
    /// triple. The match is exhaustive, so an unhandled format cannot
    /// slip through to export time.
    pub fn writer(self) -> &'static dyn FormatWriter {
        match self {
            PlaylistFormat::M3u => &M3uWriter,
            PlaylistFormat::Ext => &ExtWriter,
            PlaylistFormat::Wpl => &WplWriter,
            PlaylistFormat::Zpl => &ZplWriter,
        }
    }
}

impl FromStr for PlaylistFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_uppercase().as_str() {
            "M3U" => Ok(PlaylistFormat::M3u),
            "EXT" => Ok(PlaylistFormat::Ext),
            "WPL" => Ok(PlaylistFormat::Wpl),
            "ZPL" => Ok(PlaylistFormat::Zpl),
            _ => Err(Error::UnsupportedFormat(format!("playlist format {s:?}"))),
        }
    }
}

/// One output format = one implementation. The orchestrator calls
/// `header` once, `entry` per track and `footer` once, in that order.
pub trait FormatWriter {
    fn header(&self, w: &mut dyn Write, playlist: &Playlist) -> io::Result<()>;
    fn entry(&self, w: &mut dyn Write, track: &Track, location: &str) -> io::Result<()>;
    fn footer(&self, _w: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }
}

struct M3uWriter;

impl FormatWriter for M3uWriter {
    fn header(&self, w: &mut dyn Write, playlist: &Playlist) -> io::Result<()> {
        writeln!(
            w,
            "# Playlist '{}' exported {} by playlift v{}",
            playlist.name,
            Local::now().format("%Y-%m-%d %-I:%M%p"),
            env!("CARGO_PKG_VERSION"),
        )
    }

    fn entry(&self, w: &mut dyn Write, _track: &Track, location: &str) -> io::Result<()> {
        writeln!(w, "{location}")
    }
}

struct ExtWriter;

impl FormatWriter for ExtWriter {
    fn header(&self, w: &mut dyn Write, _playlist: &Playlist) -> io::Result<()> {
        writeln!(w, "#EXTM3U")
    }

    fn entry(&self, w: &mut dyn Write, track: &Track, location: &str) -> io::Result<()> {
        writeln!(
            w,
            "#EXTINF:{},{} - {}",
            track.total_time / 1000,
            track.artist,
            track.name
        )?;
        writeln!(w, "{location}")
    }
}

fn smil_header(w: &mut dyn Write, prologue: &str, extra_head: &str, playlist: &Playlist) -> io::Result<()> {
    write!(
        w,
        "{prologue}\n<smil>\n  <head>\n{extra_head}    <author />\n    <title>{}</title>\n  </head>\n  <body>\n    <seq>\n",
        playlist.name
    )
}

fn smil_entry(w: &mut dyn Write, location: &str) -> io::Result<()> {
    writeln!(w, "      <media src=\"{location}\"></media>")
}

fn smil_footer(w: &mut dyn Write) -> io::Result<()> {
    write!(w, "    </seq>\n  </body>\n</smil>\n")
}

struct WplWriter;

impl FormatWriter for WplWriter {
    fn header(&self, w: &mut dyn Write, playlist: &Playlist) -> io::Result<()> {
        smil_header(w, "<?wpl version=\"1.0\"?>", "", playlist)
    }

    fn entry(&self, w: &mut dyn Write, _track: &Track, location: &str) -> io::Result<()> {
        smil_entry(w, location)
    }

    fn footer(&self, w: &mut dyn Write) -> io::Result<()> {
        smil_footer(w)
    }
}

struct ZplWriter;

impl FormatWriter for ZplWriter {
    fn header(&self, w: &mut dyn Write, playlist: &Playlist) -> io::Result<()> {
        smil_header(
            w,
            "<?zpl version=\"1.0\"?>",
            "    <meta name=\"Generator\" content=\"Zune -- 1.3.5728.0\" />\n",
            playlist,
        )
    }

    fn entry(&self, w: &mut dyn Write, _track: &Track, location: &str) -> io::Result<()> {
        smil_entry(w, location)
    }

    fn footer(&self, w: &mut dyn Write) -> io::Result<()> {
        smil_footer(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist(name: &str) -> Playlist {
        Playlist {
            name: name.to_string(),
            ..Playlist::default()
        }
    }

    fn track(artist: &str, name: &str, total_time: i64) -> Track {
        Track {
            artist: artist.to_string(),
            name: name.to_string(),
            total_time,
            ..Track::default()
        }
    }

    fn render(format: PlaylistFormat, playlist: &Playlist, tracks: &[(&Track, &str)]) -> String {
        let writer = format.writer();
        let mut buf = Vec::new();
        writer.header(&mut buf, playlist).unwrap();
        for &(track, location) in tracks {
            writer.entry(&mut buf, track, location).unwrap();
        }
        writer.footer(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn m3u_writes_a_comment_header_and_bare_paths() {
        let t = track("Somebody", "Song", 1000);
        let out = render(PlaylistFormat::M3u, &playlist("Road Trip"), &[(&t, "/music/song.mp3")]);

        let mut lines = out.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("# Playlist 'Road Trip' exported "));
        assert!(header.contains("by playlift v"));
        assert_eq!(lines.next(), Some("/music/song.mp3"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn ext_writes_extinf_metadata() {
        let t = track("Somebody", "Song", 215_000);
        let out = render(PlaylistFormat::Ext, &playlist("P"), &[(&t, "/music/song.mp3")]);
        assert_eq!(out, "#EXTM3U\n#EXTINF:215,Somebody - Song\n/music/song.mp3\n");
    }

    #[test]
    fn wpl_writes_a_smil_document() {
        let t = track("A", "B", 0);
        let out = render(PlaylistFormat::Wpl, &playlist("My List"), &[(&t, "C:/m/song.mp3")]);
        let expected = [
            "<?wpl version=\"1.0\"?>",
            "<smil>",
            "  <head>",
            "    <author />",
            "    <title>My List</title>",
            "  </head>",
            "  <body>",
            "    <seq>",
            "      <media src=\"C:/m/song.mp3\"></media>",
            "    </seq>",
            "  </body>",
            "</smil>",
        ]
        .join("\n")
            + "\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn zpl_adds_a_generator_tag() {
        let t = track("A", "B", 0);
        let out = render(PlaylistFormat::Zpl, &playlist("My List"), &[(&t, "song.mp3")]);
        assert!(out.starts_with("<?zpl version=\"1.0\"?>"));
        assert!(out.contains("<meta name=\"Generator\" content=\"Zune -- 1.3.5728.0\" />"));
        assert!(out.contains("<media src=\"song.mp3\"></media>"));
    }

    #[test]
    fn extensions_match_the_format() {
        assert_eq!(PlaylistFormat::M3u.extension(), "m3u");
        assert_eq!(PlaylistFormat::Ext.extension(), "m3u");
        assert_eq!(PlaylistFormat::Wpl.extension(), "wpl");
        assert_eq!(PlaylistFormat::Zpl.extension(), "zpl");
    }

    #[test]
    fn unknown_format_fails_to_parse() {
        assert!(matches!(
            "PLS".parse::<PlaylistFormat>(),
            Err(Error::UnsupportedFormat(_))
        ));
        assert_eq!("wpl".parse::<PlaylistFormat>().unwrap(), PlaylistFormat::Wpl);
    }
}
