pub mod compare;
pub mod config;
pub mod error;
pub mod lineup;
pub mod spotify;

pub use compare::{diff_playlists, PlaylistDiff};
pub use config::Config;
pub use error::{AppError, Result};
pub use lineup::{BuildOptions, LineupPlaylistBuilder, LineupReport, LineupScraper};
pub use spotify::{PublicSpotifyClient, SpotifyAlbum, SpotifyClient, SpotifyTrack};
