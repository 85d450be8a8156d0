use rspotify::{
    model::{Country, Market, PlayableId, PlaylistId, TrackId, UserId},
    prelude::*,
    scopes, AuthCodeSpotify, ClientCredsSpotify, Credentials, OAuth,
};
use std::io::{self, Write};
use tracing::info;
use url::Url;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::spotify::catalog;
use crate::spotify::models::SpotifyTrack;

/// Spotify rejects add-items requests with more than this many URIs.
pub const ADD_ITEMS_BATCH_SIZE: usize = 100;

/// Client acting on behalf of a user, needed to create and fill playlists.
pub struct SpotifyClient {
    client: AuthCodeSpotify,
    user_id: String,
}

impl SpotifyClient {
    pub async fn new(config: &Config) -> Result<Self> {
        let creds = Credentials::new(&config.spotify_client_id, &config.spotify_client_secret);

        let oauth = OAuth {
            redirect_uri: config.spotify_redirect_uri.clone(),
            scopes: scopes!("playlist-modify-public"),
            ..Default::default()
        };

        let client = AuthCodeSpotify::new(creds, oauth);

        let auth_url = client.get_authorize_url(false)?;
        println!("\nOpen this URL in your browser to authorize Spotify:");
        println!("{}\n", auth_url);

        print!("Enter the URL you were redirected to: ");
        io::stdout().flush()?;

        let mut redirect_url = String::new();
        io::stdin().read_line(&mut redirect_url)?;

        let code = client
            .parse_response_code(redirect_url.trim())
            .ok_or_else(|| AppError::Auth("Failed to parse authorization code".into()))?;

        client.request_token(&code).await?;

        let user_id = match &config.spotify_username {
            Some(username) => username.clone(),
            None => {
                let user = client.current_user().await?;
                user.id.id().to_string()
            }
        };

        info!("Successfully authenticated as Spotify user: {}", user_id);

        Ok(Self { client, user_id })
    }

    /// The underlying API handle, for read-only catalog lookups.
    pub fn api(&self) -> &AuthCodeSpotify {
        &self.client
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Create a playlist owned by the configured user and return its id.
    pub async fn create_playlist(
        &self,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<String> {
        let user_id = UserId::from_id(&self.user_id)?;

        let playlist = self
            .client
            .user_playlist_create(user_id, name, Some(public), Some(false), Some(description))
            .await?;

        info!("Created Spotify playlist: {} ({})", name, playlist.id.id());
        Ok(playlist.id.id().to_string())
    }

    /// Append one batch of track URIs. Callers split on [`ADD_ITEMS_BATCH_SIZE`].
    pub async fn add_tracks_to_playlist(&self, playlist_id: &str, track_uris: &[String]) -> Result<()> {
        if track_uris.is_empty() {
            return Ok(());
        }

        check_batch_size(track_uris.len())?;

        let playlist_id = PlaylistId::from_id(playlist_id)?;
        let items = track_uris
            .iter()
            .map(|uri| TrackId::from_id_or_uri(uri).map(PlayableId::Track))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        self.client
            .playlist_add_items(playlist_id, items, None)
            .await?;

        Ok(())
    }
}

fn check_batch_size(size: usize) -> Result<()> {
    if size > ADD_ITEMS_BATCH_SIZE {
        return Err(AppError::BatchTooLarge {
            size,
            max: ADD_ITEMS_BATCH_SIZE,
        });
    }
    Ok(())
}

/// Client for reading public catalog data using client credentials.
/// Does not require user authentication - only app credentials.
pub struct PublicSpotifyClient {
    client: ClientCredsSpotify,
}

impl PublicSpotifyClient {
    pub async fn new(config: &Config) -> Result<Self> {
        let creds = Credentials::new(&config.spotify_client_id, &config.spotify_client_secret);
        let client = ClientCredsSpotify::new(creds);

        client.request_token().await?;
        info!("Authenticated with Spotify using client credentials");

        Ok(Self { client })
    }

    pub fn api(&self) -> &ClientCredsSpotify {
        &self.client
    }

    /// Fetch the tracks of a playlist given as URL, URI or bare id.
    pub async fn get_playlist_tracks(&self, playlist_ref: &str) -> Result<Vec<SpotifyTrack>> {
        let playlist_id = parse_playlist_ref(playlist_ref)?;
        let id = PlaylistId::from_id(&playlist_id)?;
        catalog::fetch_playlist_tracks(&self.client, &id).await
    }
}

/// Extract a playlist id from any of the forms users paste.
/// Supports formats:
/// - https://open.spotify.com/playlist/37i9dQZF1E8NC99vGqLsaH
/// - https://open.spotify.com/playlist/37i9dQZF1E8NC99vGqLsaH?si=...
/// - spotify:playlist:37i9dQZF1E8NC99vGqLsaH
/// - 37i9dQZF1E8NC99vGqLsaH
pub fn parse_playlist_ref(input: &str) -> Result<String> {
    let input = input.trim();

    if let Some(id) = input.strip_prefix("spotify:playlist:") {
        return validate_id(id);
    }

    if !input.contains("://") {
        return validate_id(input);
    }

    let url = Url::parse(input).map_err(|e| AppError::Config(format!("Invalid URL: {}", e)))?;

    let path_segments: Vec<&str> = url
        .path_segments()
        .ok_or_else(|| AppError::Config("Invalid Spotify URL".into()))?
        .filter(|segment| !segment.is_empty())
        .collect();

    // Localised links look like /intl-nl/playlist/{id}
    let segments = match path_segments.first() {
        Some(first) if first.starts_with("intl-") => &path_segments[1..],
        _ => &path_segments[..],
    };

    if segments.len() >= 2 && segments[0] == "playlist" {
        validate_id(segments[1])
    } else {
        Err(AppError::Config(
            "URL does not appear to be a Spotify playlist URL".into(),
        ))
    }
}

fn validate_id(id: &str) -> Result<String> {
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(id.to_string())
    } else {
        Err(AppError::Config(format!("Invalid playlist id: {:?}", id)))
    }
}

/// Parse an ISO 3166-1 alpha-2 code such as `NL` into a catalog market.
pub fn parse_market(code: &str) -> Result<Market> {
    let code = code.trim().to_uppercase();
    let country: Country = serde_json::from_value(serde_json::Value::String(code.clone()))
        .map_err(|_| AppError::Config(format!("Unknown market country code: {}", code)))?;
    Ok(Market::Country(country))
}
