use std::path::Path;

use anyhow::{Context, Result, bail};
use rusqlite::{Connection, params};
use tracing::info;

use crate::model::SongRecord;

pub fn open_database(path: &Path) -> Result<Connection> {
    let connection = Connection::open(path)
        .with_context(|| format!("failed to open database {}", path.display()))?;
    configure_connection(&connection)?;
    Ok(connection)
}

pub fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    Ok(())
}

/// Table names are interpolated into DDL and queries, so they are restricted
/// to identifier characters before any SQL is assembled.
pub fn validate_table_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !valid_start || !valid_rest {
        bail!("invalid table name: {name:?}");
    }
    Ok(())
}

/// Idempotent: safe to call on every run, including against an existing table.
pub fn ensure_songs_table(connection: &Connection, table_name: &str) -> Result<()> {
    validate_table_name(table_name)?;

    connection
        .execute_batch(&format!(
            "
            CREATE TABLE IF NOT EXISTS {table_name} (
              rank INTEGER,
              song TEXT,
              artist TEXT,
              streams REAL,
              release_year INTEGER,
              date TEXT,
              scraping_date TEXT
            );
            "
        ))
        .with_context(|| format!("failed to ensure table {table_name}"))?;

    Ok(())
}

/// Inserts every record inside a single transaction. Any failure rolls the
/// whole run's writes back, so the table never holds a partial run.
pub fn insert_songs(
    connection: &mut Connection,
    table_name: &str,
    records: &[SongRecord],
) -> Result<usize> {
    validate_table_name(table_name)?;

    let tx = connection
        .transaction()
        .context("failed to begin insert transaction")?;

    let mut inserted = 0_usize;
    {
        let mut statement = tx
            .prepare(&format!(
                "INSERT INTO {table_name} VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7)"
            ))
            .with_context(|| format!("failed to prepare insert into {table_name}"))?;

        for record in records {
            statement
                .execute(params![
                    record.rank,
                    record.song,
                    record.artist,
                    record.streams,
                    record.release_year,
                    record.date,
                    record.scraping_date,
                ])
                .with_context(|| format!("failed to insert row for {:?}", record.song))?;
            inserted += 1;
        }
    }

    tx.commit().context("failed to commit insert transaction")?;

    info!(rows = inserted, table = table_name, "committed run");
    Ok(inserted)
}

pub fn count_rows(connection: &Connection, sql: &str) -> Result<i64> {
    connection
        .query_row(sql, [], |row| row.get::<_, i64>(0))
        .with_context(|| format!("failed to count rows: {sql}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(rank: i64, song: &str) -> SongRecord {
        SongRecord {
            rank,
            song: song.to_string(),
            artist: "Artist".to_string(),
            streams: 1.0,
            release_year: "2020".to_string(),
            date: "2020-01-01".to_string(),
            scraping_date: "2026-08-27".to_string(),
        }
    }

    #[test]
    fn table_names_are_restricted_to_identifiers() {
        assert!(validate_table_name("most_streamed_songs").is_ok());
        assert!(validate_table_name("_songs2").is_ok());
        assert!(validate_table_name("songs; DROP TABLE x").is_err());
        assert!(validate_table_name("2songs").is_err());
        assert!(validate_table_name("").is_err());
    }

    #[test]
    fn ensure_songs_table_is_idempotent() {
        let mut connection = Connection::open_in_memory().unwrap();
        ensure_songs_table(&connection, "most_streamed_songs").unwrap();
        ensure_songs_table(&connection, "most_streamed_songs").unwrap();

        let inserted =
            insert_songs(&mut connection, "most_streamed_songs", &[record(1, "A")]).unwrap();
        assert_eq!(inserted, 1);
    }

    #[test]
    fn inserts_append_rather_than_replace() {
        let mut connection = Connection::open_in_memory().unwrap();
        ensure_songs_table(&connection, "most_streamed_songs").unwrap();

        insert_songs(&mut connection, "most_streamed_songs", &[record(1, "A")]).unwrap();
        insert_songs(&mut connection, "most_streamed_songs", &[record(1, "A")]).unwrap();

        let rows =
            count_rows(&connection, "SELECT COUNT(*) FROM most_streamed_songs").unwrap();
        assert_eq!(rows, 2);
    }

    #[test]
    fn release_year_passthrough_keeps_non_numeric_text() {
        let mut connection = Connection::open_in_memory().unwrap();
        ensure_songs_table(&connection, "most_streamed_songs").unwrap();

        let mut entry = record(1, "A");
        entry.release_year = "2020 (remix)".to_string();
        insert_songs(&mut connection, "most_streamed_songs", &[entry]).unwrap();

        let stored: String = connection
            .query_row("SELECT release_year FROM most_streamed_songs", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(stored, "2020 (remix)");
    }
}
