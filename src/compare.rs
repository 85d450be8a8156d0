use colored::Colorize;
use serde::Serialize;
use std::collections::HashSet;

use crate::spotify::SpotifyTrack;

/// Tracks present in exactly one of two playlists, keyed by track id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlaylistDiff {
    pub only_in_a: Vec<SpotifyTrack>,
    pub only_in_b: Vec<SpotifyTrack>,
}

impl PlaylistDiff {
    pub fn is_identical(&self) -> bool {
        self.only_in_a.is_empty() && self.only_in_b.is_empty()
    }
}

/// Compare two track lists by id.
///
/// Tracks with a missing or empty id never take part. A repeated id keeps its
/// first occurrence, so neither side of the result contains duplicates and
/// both follow the order the tracks first appeared in their playlist.
pub fn diff_playlists(a: &[SpotifyTrack], b: &[SpotifyTrack]) -> PlaylistDiff {
    let a_unique = unique_by_id(a);
    let b_unique = unique_by_id(b);

    let a_ids: HashSet<&str> = a_unique.iter().map(|(id, _)| *id).collect();
    let b_ids: HashSet<&str> = b_unique.iter().map(|(id, _)| *id).collect();

    let only_in_a = a_unique
        .iter()
        .filter(|(id, _)| !b_ids.contains(id))
        .map(|(_, track)| (*track).clone())
        .collect();

    let only_in_b = b_unique
        .iter()
        .filter(|(id, _)| !a_ids.contains(id))
        .map(|(_, track)| (*track).clone())
        .collect();

    PlaylistDiff {
        only_in_a,
        only_in_b,
    }
}

fn unique_by_id(tracks: &[SpotifyTrack]) -> Vec<(&str, &SpotifyTrack)> {
    let mut seen = HashSet::new();

    tracks
        .iter()
        .filter_map(|track| {
            let id = track.id.as_deref().filter(|id| !id.is_empty())?;
            seen.insert(id).then_some((id, track))
        })
        .collect()
}

pub fn print_diff(diff: &PlaylistDiff) {
    print_side("A", &diff.only_in_a);
    print_side("B", &diff.only_in_b);

    if diff.is_identical() {
        println!("\n{}", "Both playlists contain the same tracks".green());
    }
}

fn print_side(label: &str, tracks: &[SpotifyTrack]) {
    println!(
        "\n{}",
        format!("Tracks only in Playlist {} ({}):", label, tracks.len())
            .cyan()
            .bold()
    );
    for track in tracks {
        println!("- {}", format_track(track));
    }
}

pub fn format_track(track: &SpotifyTrack) -> String {
    format!("{} by {}", track.name, track.artist)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_track(name: &str) -> SpotifyTrack {
        SpotifyTrack {
            id: None,
            name: name.to_string(),
            artist: "Someone".to_string(),
        }
    }

    #[test]
    fn test_track_only_in_a() {
        let a = vec![SpotifyTrack::mock("1", "X", "A")];
        let b = vec![];

        let diff = diff_playlists(&a, &b);

        assert_eq!(diff.only_in_a, vec![SpotifyTrack::mock("1", "X", "A")]);
        assert!(diff.only_in_b.is_empty());
    }

    #[test]
    fn test_shared_tracks_are_excluded() {
        let a = vec![
            SpotifyTrack::mock("1", "One", "Artist"),
            SpotifyTrack::mock("2", "Two", "Artist"),
            SpotifyTrack::mock("3", "Three", "Artist"),
        ];
        let b = vec![
            SpotifyTrack::mock("4", "Four", "Artist"),
            SpotifyTrack::mock("2", "Two", "Artist"),
        ];

        let diff = diff_playlists(&a, &b);

        let a_ids: Vec<_> = diff.only_in_a.iter().map(|t| t.id.as_deref()).collect();
        let b_ids: Vec<_> = diff.only_in_b.iter().map(|t| t.id.as_deref()).collect();
        assert_eq!(a_ids, vec![Some("1"), Some("3")]);
        assert_eq!(b_ids, vec![Some("4")]);
    }

    #[test]
    fn test_tracks_without_id_are_ignored() {
        let empty_id = SpotifyTrack::mock("", "Blank", "Artist");

        let a = vec![local_track("Local demo"), empty_id];
        let b = vec![local_track("Another local file")];

        let diff = diff_playlists(&a, &b);

        assert!(diff.is_identical());
    }

    #[test]
    fn test_duplicate_ids_keep_first_occurrence() {
        let a = vec![
            SpotifyTrack::mock("7", "Seven", "First"),
            SpotifyTrack::mock("8", "Eight", "Artist"),
            SpotifyTrack::mock("7", "Seven (again)", "Second"),
        ];

        let diff = diff_playlists(&a, &[]);

        assert_eq!(diff.only_in_a.len(), 2);
        assert_eq!(diff.only_in_a[0].name, "Seven");
        assert_eq!(diff.only_in_a[1].name, "Eight");
    }

    #[test]
    fn test_same_track_set_in_different_order_is_identical() {
        let a = vec![
            SpotifyTrack::mock("1", "One", "Artist"),
            SpotifyTrack::mock("2", "Two", "Artist"),
        ];
        let b = vec![
            SpotifyTrack::mock("2", "Two", "Artist"),
            SpotifyTrack::mock("1", "One", "Artist"),
        ];

        assert!(diff_playlists(&a, &b).is_identical());
    }

    #[test]
    fn test_format_track() {
        let track = SpotifyTrack::mock("1", "Bohemian Rhapsody", "Queen");
        assert_eq!(format_track(&track), "Bohemian Rhapsody by Queen");
    }
}
