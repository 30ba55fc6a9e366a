use anyhow::{Context, Result};
use rusqlite::Connection;
use rusqlite::types::Value;
use tracing::{error, info, warn};

use crate::cli::ReportArgs;
use crate::model::RankedSong;
use crate::storage;

use super::chart;

pub fn run(args: ReportArgs) -> Result<()> {
    let connection = storage::open_database(&args.db_path)?;
    let songs = load_ranked_songs(&connection, &args.table_name)?;
    drop(connection);

    let top = top_songs(songs, args.top_n);
    info!(rows = top.len(), top_n = args.top_n, "ranked persisted rows");

    if let Err(err) = chart::render(&top, &args.output_image_path) {
        // The rows that were about to be charted are the diagnostic that
        // matters when rendering breaks; persistence is already durable.
        error!(rows = top.len(), "chart rendering failed");
        for song in top.iter().take(5) {
            error!(song = %song.song, artist = %song.artist, streams = song.streams, "head row");
        }
        return Err(err);
    }

    info!(path = %args.output_image_path.display(), "wrote chart");
    Ok(())
}

/// Reads every persisted row, re-checking that the stream count is numeric.
/// The column round-trips through storage, so a value that was inserted as
/// text (or mangled by an earlier run) is coerced here and dropped if it
/// still fails.
pub(crate) fn load_ranked_songs(connection: &Connection, table_name: &str) -> Result<Vec<RankedSong>> {
    storage::validate_table_name(table_name)?;

    let mut statement = connection
        .prepare(&format!("SELECT song, artist, streams FROM {table_name}"))
        .with_context(|| format!("failed to read back table {table_name}"))?;

    let mut rows = statement.query([]).context("failed to query songs")?;
    let mut songs = Vec::new();

    while let Some(row) = rows.next()? {
        let song: String = row.get(0)?;
        let artist: String = row.get(1)?;
        let raw: Value = row.get(2)?;

        match coerce_stream_value(&raw) {
            Some(streams) => songs.push(RankedSong { song, artist, streams }),
            None => warn!(song = %song, value = ?raw, "dropping row with non-numeric stream count"),
        }
    }

    Ok(songs)
}

/// Stable descending sort, so ties keep their original row order.
pub(crate) fn top_songs(mut songs: Vec<RankedSong>, top_n: usize) -> Vec<RankedSong> {
    songs.sort_by(|a, b| b.streams.total_cmp(&a.streams));
    songs.truncate(top_n);
    songs
}

fn coerce_stream_value(value: &Value) -> Option<f64> {
    let streams = match value {
        Value::Real(v) => *v,
        Value::Integer(v) => *v as f64,
        Value::Text(v) => v.trim().parse::<f64>().ok()?,
        Value::Null | Value::Blob(_) => return None,
    };
    streams.is_finite().then_some(streams)
}
