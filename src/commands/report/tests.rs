use rusqlite::Connection;

use super::chart;
use super::chart::bar_label;
use super::run::{load_ranked_songs, top_songs};
use crate::model::{RankedSong, SongRecord};
use crate::storage;

fn song(title: &str, streams: f64) -> RankedSong {
    RankedSong {
        song: title.to_string(),
        artist: "Artist".to_string(),
        streams,
    }
}

fn record(rank: i64, title: &str, artist: &str, streams: f64) -> SongRecord {
    SongRecord {
        rank,
        song: title.to_string(),
        artist: artist.to_string(),
        streams,
        release_year: "2020".to_string(),
        date: "2020-01-01".to_string(),
        scraping_date: "2026-08-27".to_string(),
    }
}

#[test]
fn top_songs_sorts_descending() {
    let songs = vec![song("a", 5.0), song("b", 3.8), song("c", 7.2), song("d", 1.0)];

    let ranked = top_songs(songs, 10);
    let streams: Vec<f64> = ranked.iter().map(|song| song.streams).collect();
    assert_eq!(streams, vec![7.2, 5.0, 3.8, 1.0]);
}

#[test]
fn top_songs_breaks_ties_by_original_order() {
    let songs = vec![song("first", 2.0), song("second", 2.0), song("third", 3.0)];

    let ranked = top_songs(songs, 10);
    assert_eq!(ranked[0].song, "third");
    assert_eq!(ranked[1].song, "first");
    assert_eq!(ranked[2].song, "second");
}

#[test]
fn top_songs_truncates_to_top_n() {
    let songs = (0..15).map(|i| song(&format!("s{i}"), i as f64)).collect();
    assert_eq!(top_songs(songs, 10).len(), 10);
}

#[test]
fn persisted_rows_round_trip_through_the_reporter() {
    let mut connection = Connection::open_in_memory().unwrap();
    storage::ensure_songs_table(&connection, "most_streamed_songs").unwrap();

    let records = vec![
        record(1, "Song A", "Artist A", 3.8),
        record(2, "Song B", "Artist B", 2.5),
    ];
    storage::insert_songs(&mut connection, "most_streamed_songs", &records).unwrap();

    let songs = load_ranked_songs(&connection, "most_streamed_songs").unwrap();
    assert_eq!(songs.len(), 2);
    assert_eq!(songs[0].song, "Song A");
    assert_eq!(songs[0].artist, "Artist A");
    assert_eq!(songs[0].streams, 3.8);
    assert_eq!(songs[1].song, "Song B");
    assert_eq!(songs[1].streams, 2.5);
}

#[test]
fn reporter_drops_rows_whose_stream_count_is_still_not_numeric() {
    let connection = Connection::open_in_memory().unwrap();
    storage::ensure_songs_table(&connection, "most_streamed_songs").unwrap();

    // REAL affinity converts "4.5" on insert; "not a number" stays text.
    connection
        .execute(
            "INSERT INTO most_streamed_songs VALUES(1, 'A', 'B', '4.5', 2020, 'd', 's')",
            [],
        )
        .unwrap();
    connection
        .execute(
            "INSERT INTO most_streamed_songs VALUES(2, 'C', 'D', 'not a number', 2020, 'd', 's')",
            [],
        )
        .unwrap();

    let songs = load_ranked_songs(&connection, "most_streamed_songs").unwrap();
    assert_eq!(songs.len(), 1);
    assert_eq!(songs[0].song, "A");
    assert_eq!(songs[0].streams, 4.5);
}

#[test]
fn chart_renders_a_single_bar_to_a_png() {
    let path = std::env::temp_dir().join(format!("streamchart_chart_{}.png", std::process::id()));
    let _ = std::fs::remove_file(&path);

    chart::render(&[song("Song A", 3.8)], &path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn chart_rejects_an_empty_dataset_without_writing_a_file() {
    let path = std::env::temp_dir().join(format!("streamchart_empty_{}.png", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let err = chart::render(&[], &path).unwrap_err();
    assert!(err.to_string().contains("no rows"));
    assert!(!path.exists());
}

#[test]
fn bar_label_joins_song_and_artist() {
    assert_eq!(
        bar_label(&song("Shape of You", 4.0)),
        "Shape of You - Artist"
    );
}
