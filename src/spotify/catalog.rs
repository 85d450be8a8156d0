//! Read-only catalog lookups shared by both authentication flavours.
//!
//! Everything here is generic over [`BaseClient`], so the same paging code
//! serves the client-credentials and the authorization-code clients.

use rspotify::{
    model::{AlbumId, AlbumType, ArtistId, Market, PlayableItem, PlaylistId, PlaylistItem},
    prelude::*,
};
use tracing::{debug, info};

use crate::error::Result;
use crate::spotify::models::{SpotifyAlbum, SpotifyTrack};

const PLAYLIST_PAGE_LIMIT: u32 = 100;
const ALBUM_TRACKS_PAGE_LIMIT: u32 = 50;

/// How many of an artist's albums are considered when looking for the latest.
pub const ARTIST_ALBUMS_LIMIT: u32 = 10;

/// Fetch every item of a playlist, page by page, until an empty page comes back.
///
/// Items without a track payload are skipped. Tracks without an id (local
/// files) are kept with `id: None`.
pub async fn fetch_playlist_tracks<C: BaseClient>(
    client: &C,
    playlist_id: &PlaylistId<'_>,
) -> Result<Vec<SpotifyTrack>> {
    let mut tracks = Vec::new();
    let mut offset = 0;

    loop {
        let page = client
            .playlist_items_manual(
                playlist_id.clone_static(),
                None,
                None,
                Some(PLAYLIST_PAGE_LIMIT),
                Some(offset),
            )
            .await?;

        if page.items.is_empty() {
            break;
        }

        tracks.extend(page.items.iter().filter_map(track_from_item));

        offset += page.items.len() as u32;

        if page.next.is_none() {
            break;
        }
    }

    info!("Fetched {} tracks from playlist {}", tracks.len(), playlist_id.id());
    Ok(tracks)
}

/// Map a playlist entry to a track record.
///
/// Entries without a track payload and non-track entries (episodes) give
/// `None`. Local files are kept with `id: None`.
fn track_from_item(item: &PlaylistItem) -> Option<SpotifyTrack> {
    match &item.track {
        Some(PlayableItem::Track(track)) => {
            if track.id.is_none() {
                debug!("Keeping local track without id: {}", track.name);
            }
            Some(SpotifyTrack {
                id: track.id.as_ref().map(|id| id.id().to_string()),
                name: track.name.clone(),
                artist: track
                    .artists
                    .first()
                    .map(|a| a.name.clone())
                    .unwrap_or_default(),
            })
        }
        Some(_) => {
            debug!("Skipping non-track playlist item");
            None
        }
        None => {
            debug!("Skipping unavailable playlist item");
            None
        }
    }
}

/// First page of an artist's albums (singles and compilations excluded),
/// newest first as returned by the API.
pub async fn fetch_artist_albums<C: BaseClient>(
    client: &C,
    artist_id: &ArtistId<'_>,
    market: Market,
) -> Result<Vec<SpotifyAlbum>> {
    let page = client
        .artist_albums_manual(
            artist_id.clone_static(),
            [AlbumType::Album],
            Some(market),
            Some(ARTIST_ALBUMS_LIMIT),
            Some(0),
        )
        .await?;

    let albums = page
        .items
        .into_iter()
        .filter_map(|album| {
            let id = album.id?;
            Some(SpotifyAlbum {
                id: id.id().to_string(),
                name: album.name,
                release_date: album.release_date,
            })
        })
        .collect::<Vec<_>>();

    debug!("Artist {} has {} albums", artist_id.id(), albums.len());
    Ok(albums)
}

/// Track URIs of an album in disc order, following pagination.
pub async fn fetch_album_track_uris<C: BaseClient>(
    client: &C,
    album_id: &AlbumId<'_>,
) -> Result<Vec<String>> {
    let mut uris = Vec::new();
    let mut offset = 0;

    loop {
        let page = client
            .album_track_manual(
                album_id.clone_static(),
                None,
                Some(ALBUM_TRACKS_PAGE_LIMIT),
                Some(offset),
            )
            .await?;

        if page.items.is_empty() {
            break;
        }

        uris.extend(
            page.items
                .iter()
                .filter_map(|track| track.id.as_ref().map(|id| id.uri())),
        );

        offset += page.items.len() as u32;

        if page.next.is_none() {
            break;
        }
    }

    Ok(uris)
}
