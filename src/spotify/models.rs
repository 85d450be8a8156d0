use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotifyTrack {
    /// Absent for local files and tracks Spotify can't resolve.
    pub id: Option<String>,
    pub name: String,
    /// First credited artist.
    pub artist: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotifyAlbum {
    pub id: String,
    pub name: String,
    pub release_date: Option<String>,
}

#[cfg(test)]
impl SpotifyTrack {
    pub fn mock(id: &str, name: &str, artist: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            name: name.to_string(),
            artist: artist.to_string(),
        }
    }
}

#[cfg(test)]
impl SpotifyAlbum {
    pub fn mock(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            release_date: None,
        }
    }
}
