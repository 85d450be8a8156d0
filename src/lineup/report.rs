use chrono::{DateTime, Local};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;
use crate::spotify::SpotifyAlbum;

const RESULTS_DIR: &str = "lineup_results";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineupReport {
    pub lineup_url: String,
    pub playlist_name: String,
    pub playlist_id: Option<String>,
    pub dry_run: bool,
    pub started_at: DateTime<Local>,
    pub artists_found: usize,
    pub albums: Vec<AlbumPick>,
    pub artists_without_link: Vec<String>,
    pub artists_without_album: Vec<String>,
    pub total_tracks: usize,
    pub tracks_added: usize,
}

/// The album chosen as an artist's latest release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumPick {
    pub artist: String,
    pub album: String,
    pub release_date: Option<String>,
    pub track_count: usize,
}

impl LineupReport {
    pub fn new(lineup_url: String, playlist_name: String, dry_run: bool) -> Self {
        Self {
            lineup_url,
            playlist_name,
            playlist_id: None,
            dry_run,
            started_at: Local::now(),
            artists_found: 0,
            albums: Vec::new(),
            artists_without_link: Vec::new(),
            artists_without_album: Vec::new(),
            total_tracks: 0,
            tracks_added: 0,
        }
    }

    pub fn record_album(&mut self, artist: &str, album: &SpotifyAlbum, track_count: usize) {
        self.albums.push(AlbumPick {
            artist: artist.to_string(),
            album: album.name.clone(),
            release_date: album.release_date.clone(),
            track_count,
        });
        self.total_tracks += track_count;
    }

    pub fn coverage(&self) -> f64 {
        if self.artists_found == 0 {
            return 0.0;
        }
        (self.albums.len() as f64 / self.artists_found as f64) * 100.0
    }

    /// Write the report as pretty JSON into `dir`, named by start time.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;

        let timestamp = self.started_at.format("%Y%m%d_%H%M%S");
        let filename = dir.join(format!("lineup_{}.json", timestamp));
        let json = serde_json::to_string_pretty(self)?;

        fs::write(&filename, json)?;

        info!("Lineup report saved to: {}", filename.display());
        Ok(filename)
    }

    pub fn save(&self) -> Result<PathBuf> {
        self.save_to(Path::new(RESULTS_DIR))
    }

    pub fn print_summary(&self) {
        println!();
        println!("{}", "=".repeat(60));
        println!("{}", "LINEUP SUMMARY".bold());
        println!("{}", "=".repeat(60));
        println!("Artists found: {}", self.artists_found);
        println!(
            "Artists with a latest album: {} ({:.1}%)",
            self.albums.len().to_string().green(),
            self.coverage()
        );
        println!(
            "Without Spotify link: {}",
            self.artists_without_link.len().to_string().yellow()
        );
        println!(
            "Without albums: {}",
            self.artists_without_album.len().to_string().red()
        );
        println!("Tracks collected: {}", self.total_tracks);
        if self.dry_run {
            println!("{}", "Dry run: no playlist was created".yellow());
        } else {
            println!("Tracks added: {}", self.tracks_added);
            if let Some(id) = &self.playlist_id {
                println!("Playlist: https://open.spotify.com/playlist/{}", id);
            }
        }
        println!("{}", "=".repeat(60));
    }
}
