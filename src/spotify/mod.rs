pub mod catalog;
pub mod client;
pub mod models;

pub use client::{PublicSpotifyClient, SpotifyClient};
pub use models::{SpotifyAlbum, SpotifyTrack};
