use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::spotify::SpotifyAlbum;

static ARTIST_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"spotify(?:\.com/(?:intl-[a-zA-Z-]+/)?artist/|:artist:)([a-zA-Z0-9]+)")
        .expect("artist url pattern is valid")
});

/// Pull the artist id out of a Spotify profile link.
///
/// Matches anywhere in the string, so tracking query parameters and
/// `open.`/`play.` host prefixes don't matter.
pub fn extract_artist_id(url: &str) -> Option<String> {
    ARTIST_URL_PATTERN
        .captures(url)
        .map(|caps| caps[1].to_string())
}

/// Drop albums whose name (case-insensitively) was already seen.
/// The first album with a given name wins and order is preserved.
pub fn dedup_albums(albums: Vec<SpotifyAlbum>) -> Vec<SpotifyAlbum> {
    let mut seen = HashSet::new();
    albums
        .into_iter()
        .filter(|album| seen.insert(album.name.to_lowercase()))
        .collect()
}
