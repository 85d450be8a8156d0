use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rspotify::{
    model::{AlbumId, ArtistId, Market},
    prelude::*,
    AuthCodeSpotify, ClientCredsSpotify,
};
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::lineup::albums::{dedup_albums, extract_artist_id};
use crate::lineup::report::LineupReport;
use crate::lineup::scrape::LineupScraper;
use crate::spotify::catalog;
use crate::spotify::client::ADD_ITEMS_BATCH_SIZE;
use crate::spotify::{PublicSpotifyClient, SpotifyAlbum, SpotifyClient};

pub const DEFAULT_PLAYLIST_NAME: &str = "Lowlands 2025 Latest Albums";
pub const DEFAULT_PLAYLIST_DESCRIPTION: &str =
    "Songs from the latest album of each Lowlands 2025 artist.";

/// An artist's latest album with its track URIs.
type LatestAlbum = (SpotifyAlbum, Vec<String>);

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub playlist_name: String,
    pub description: String,
    pub market: Market,
    pub dry_run: bool,
}

/// Scrapes a lineup and turns it into a playlist of each act's latest album.
///
/// Catalog reads go through `C`; playlist writes need a user client, which
/// is absent in dry runs.
pub struct LineupPlaylistBuilder<C: BaseClient> {
    scraper: LineupScraper,
    catalog: C,
    writer: Option<SpotifyClient>,
}

impl LineupPlaylistBuilder<AuthCodeSpotify> {
    pub fn new(scraper: LineupScraper, spotify_client: SpotifyClient) -> Self {
        Self {
            scraper,
            catalog: spotify_client.api().clone(),
            writer: Some(spotify_client),
        }
    }
}

impl LineupPlaylistBuilder<ClientCredsSpotify> {
    pub fn read_only(scraper: LineupScraper, public_client: &PublicSpotifyClient) -> Self {
        Self {
            scraper,
            catalog: public_client.api().clone(),
            writer: None,
        }
    }
}

impl<C: BaseClient> LineupPlaylistBuilder<C> {
    pub async fn run(&self, options: &BuildOptions) -> Result<LineupReport> {
        let mut report = LineupReport::new(
            self.scraper.lineup_url().to_string(),
            options.playlist_name.clone(),
            options.dry_run,
        );

        let artists = self.scraper.fetch_artists().await?;
        report.artists_found = artists.len();

        if artists.is_empty() {
            println!("{}", "No artists found. Exiting.".yellow());
            return Ok(report);
        }

        let mut all_tracks: Vec<String> = Vec::new();

        for artist in &artists {
            let Some(spotify_url) = artist.spotify_url.as_deref() else {
                println!("No Spotify link for {}", artist.name);
                report.artists_without_link.push(artist.name.clone());
                continue;
            };

            println!(
                "\n{} {}",
                "Fetching latest album for:".cyan(),
                artist.name
            );

            let Some(artist_id) = extract_artist_id(spotify_url) else {
                warn!("No artist id in Spotify link for {}: {}", artist.name, spotify_url);
                report.artists_without_album.push(artist.name.clone());
                continue;
            };

            match self
                .latest_album_tracks(&artist_id, options.market.clone())
                .await
            {
                Some((album, tracks)) => {
                    report.record_album(&artist.name, &album, tracks.len());
                    all_tracks.extend(tracks);
                }
                None => report.artists_without_album.push(artist.name.clone()),
            }
        }

        if all_tracks.is_empty() {
            println!("{}", "No songs found. Exiting.".yellow());
            return Ok(report);
        }

        if options.dry_run {
            println!(
                "\n{}",
                format!(
                    "Dry run: would create \"{}\" with {} tracks",
                    options.playlist_name,
                    all_tracks.len()
                )
                .yellow()
            );
            return Ok(report);
        }

        let writer = self.writer.as_ref().ok_or_else(|| {
            AppError::Auth("Creating a playlist requires a user-authorized client".into())
        })?;

        info!("Creating playlist {:?} for {}", options.playlist_name, writer.user_id());
        let playlist_id = writer
            .create_playlist(&options.playlist_name, &options.description, true)
            .await?;
        report.playlist_id = Some(playlist_id.clone());

        report.tracks_added = add_tracks_in_batches(writer, &playlist_id, &all_tracks).await?;
        println!("{}", "Playlist created successfully!".green());

        Ok(report)
    }

    /// The latest album and its track URIs, or `None` if there's nothing to add.
    ///
    /// Lookup failures are logged and treated as "no tracks" so one bad
    /// artist never stops the run.
    async fn latest_album_tracks(
        &self,
        artist_id: &str,
        market: Market,
    ) -> Option<LatestAlbum> {
        let lookup = self.fetch_latest_album(artist_id, market).await;
        skip_failed_lookup(artist_id, lookup)
    }

    async fn fetch_latest_album(
        &self,
        artist_id: &str,
        market: Market,
    ) -> Result<Option<LatestAlbum>> {
        let artist_id = ArtistId::from_id(artist_id)?;
        let albums = catalog::fetch_artist_albums(&self.catalog, &artist_id, market).await?;

        let Some(latest) = dedup_albums(albums).into_iter().next() else {
            println!("{}", "No albums found.".red());
            return Ok(None);
        };

        match &latest.release_date {
            Some(date) => println!("Latest album: {} ({})", latest.name, date),
            None => println!("Latest album: {}", latest.name),
        }

        let album_id = AlbumId::from_id(&latest.id)?;
        let tracks = catalog::fetch_album_track_uris(&self.catalog, &album_id).await?;

        if tracks.is_empty() {
            warn!("Album {} has no playable tracks", latest.name);
            return Ok(None);
        }

        Ok(Some((latest, tracks)))
    }
}

fn skip_failed_lookup(artist_id: &str, lookup: Result<Option<LatestAlbum>>) -> Option<LatestAlbum> {
    match lookup {
        Ok(found) => found,
        Err(e) => {
            println!("{}", format!("Error fetching latest album: {}", e).red());
            warn!("Latest album lookup failed for artist {}: {}", artist_id, e);
            None
        }
    }
}

async fn add_tracks_in_batches(
    writer: &SpotifyClient,
    playlist_id: &str,
    track_uris: &[String],
) -> Result<usize> {
    let pb = ProgressBar::new(track_uris.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {spinner:.green} [{bar:30.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let mut added = 0;
    for batch in track_batches(track_uris) {
        writer.add_tracks_to_playlist(playlist_id, batch).await?;
        added += batch.len();
        pb.inc(batch.len() as u64);
        pb.println(format!(
            "Added {} tracks to playlist ({}/{})",
            batch.len(),
            added,
            track_uris.len()
        ));
    }

    pb.finish_and_clear();
    info!("Added {} tracks to playlist {}", added, playlist_id);
    println!("{}", "All songs added successfully!".green());

    Ok(added)
}

fn track_batches(track_uris: &[String]) -> std::slice::Chunks<'_, String> {
    track_uris.chunks(ADD_ITEMS_BATCH_SIZE)
}
