use crate::error::{AppError, Result};

const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8080/callback";

#[derive(Debug, Clone)]
pub struct Config {
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub spotify_redirect_uri: String,
    /// Owner of created playlists. Falls back to the authenticated user.
    pub spotify_username: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let spotify_client_id = std::env::var("SPOTIFY_CLIENT_ID")
            .map_err(|_| AppError::Config("SPOTIFY_CLIENT_ID not set".into()))?;

        let spotify_client_secret = std::env::var("SPOTIFY_CLIENT_SECRET")
            .map_err(|_| AppError::Config("SPOTIFY_CLIENT_SECRET not set".into()))?;

        // spotipy-style name is still honoured for existing .env files
        let spotify_redirect_uri = std::env::var("SPOTIFY_REDIRECT_URI")
            .or_else(|_| std::env::var("SPOTIPY_REDIRECT_URI"))
            .unwrap_or_else(|_| DEFAULT_REDIRECT_URI.to_string());

        let spotify_username = std::env::var("SPOTIFY_USERNAME")
            .ok()
            .filter(|name| !name.trim().is_empty());

        Ok(Self {
            spotify_client_id,
            spotify_client_secret,
            spotify_redirect_uri,
            spotify_username,
        })
    }

    pub fn get_missing_config(&self) -> Vec<String> {
        let mut missing = Vec::new();

        if self.spotify_client_id.is_empty() {
            missing.push("SPOTIFY_CLIENT_ID".to_string());
        }
        if self.spotify_client_secret.is_empty() {
            missing.push("SPOTIFY_CLIENT_SECRET".to_string());
        }
        if self.spotify_redirect_uri.is_empty() {
            missing.push("SPOTIFY_REDIRECT_URI".to_string());
        }

        missing
    }

    pub fn validate_spotify_config(&self) -> bool {
        !self.spotify_client_id.is_empty() && !self.spotify_client_secret.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(id: &str, secret: &str) -> Config {
        Config {
            spotify_client_id: id.to_string(),
            spotify_client_secret: secret.to_string(),
            spotify_redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            spotify_username: None,
        }
    }

    #[test]
    fn test_complete_config_has_nothing_missing() {
        let config = config("id", "secret");
        assert!(config.get_missing_config().is_empty());
        assert!(config.validate_spotify_config());
    }

    #[test]
    fn test_empty_credentials_are_reported() {
        let config = config("", "");
        assert_eq!(
            config.get_missing_config(),
            vec!["SPOTIFY_CLIENT_ID".to_string(), "SPOTIFY_CLIENT_SECRET".to_string()]
        );
        assert!(!config.validate_spotify_config());
    }
}
