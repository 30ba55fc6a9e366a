use anyhow::{Context, Result, bail};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::model::{DroppedRowDiagnostic, RawTable, SongRecord};

/// Fixed positional layout of the source table: rank, song, artist, streams,
/// release year, date.
pub(crate) const EXPECTED_COLUMN_COUNT: usize = 6;

const STREAMS_COLUMN: usize = 3;
const SONG_COLUMN: usize = 1;
const ARTIST_COLUMN: usize = 2;
const RANK_COLUMN: usize = 0;
const RELEASE_YEAR_COLUMN: usize = 4;
const DATE_COLUMN: usize = 5;

#[derive(Debug)]
pub(crate) struct NormalizeOutcome {
    pub records: Vec<SongRecord>,
    pub dropped: Vec<DroppedRowDiagnostic>,
}

pub(crate) struct Normalizer {
    /// Greedy bracketed-annotation pattern, matching the source rule `\[.*\]`.
    annotation: Regex,
    citation: Regex,
    non_numeric: Regex,
}

impl Normalizer {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            annotation: Regex::new(r"\[.*\]").context("failed to compile annotation regex")?,
            citation: Regex::new(r"\[\d+\]").context("failed to compile citation regex")?,
            non_numeric: Regex::new(r"[^\d.]").context("failed to compile non-numeric regex")?,
        })
    }

    /// Applies the cleaning rules in order: schema check, annotation
    /// stripping, stream-count parsing, row dropping, capture-date stamp.
    ///
    /// Rows whose stream count cannot be parsed are dropped and reported;
    /// a table that does not match the expected shape at all is fatal.
    pub(crate) fn normalize(
        &self,
        table: &RawTable,
        scraping_date: &str,
    ) -> Result<NormalizeOutcome> {
        check_schema(table)?;

        let streams_column = self.locate_streams_column(table)?;

        let mut records = Vec::with_capacity(table.rows.len());
        let mut dropped = Vec::new();

        for (index, row) in table.rows.iter().enumerate() {
            let source_row = index + 1;
            let song = self.strip_annotations(&row[SONG_COLUMN]);
            let artist = self.strip_annotations(&row[ARTIST_COLUMN]);
            let raw_streams = &row[streams_column];

            let Some(streams) = self.parse_stream_count(raw_streams) else {
                warn!(
                    source_row,
                    song = %song,
                    raw_streams = %raw_streams,
                    "dropping row with unparseable stream count"
                );
                dropped.push(DroppedRowDiagnostic {
                    source_row,
                    song,
                    raw_streams: raw_streams.clone(),
                });
                continue;
            };

            records.push(SongRecord {
                rank: parse_rank(&row[RANK_COLUMN], source_row),
                song,
                artist,
                streams,
                release_year: row[RELEASE_YEAR_COLUMN].clone(),
                date: row[DATE_COLUMN].clone(),
                scraping_date: scraping_date.to_string(),
            });
        }

        info!(
            rows = records.len(),
            dropped = dropped.len(),
            scraping_date,
            "normalized table"
        );

        Ok(NormalizeOutcome { records, dropped })
    }

    pub(crate) fn strip_annotations(&self, value: &str) -> String {
        self.annotation.replace_all(value, "").trim().to_string()
    }

    /// `"3.8 billion[12]"` -> `3.8`; anything that does not survive the
    /// cleaning steps as a finite non-negative number is missing.
    pub(crate) fn parse_stream_count(&self, raw: &str) -> Option<f64> {
        let value = raw.replace(" billion", "");
        let value = self.citation.replace_all(&value, "");
        let value = self.non_numeric.replace_all(&value, "");

        let parsed = value.parse::<f64>().ok()?;
        (parsed.is_finite() && parsed >= 0.0).then_some(parsed)
    }

    /// The streams column is expected at its fixed position; scanning every
    /// column for the "billion" token is the fallback for layout drift. No
    /// match anywhere means the metric is gone and the run cannot proceed.
    fn locate_streams_column(&self, table: &RawTable) -> Result<usize> {
        let contains_billion =
            |column: usize| table.rows.iter().any(|row| row[column].contains("billion"));

        if contains_billion(STREAMS_COLUMN) {
            return Ok(STREAMS_COLUMN);
        }

        for column in 0..EXPECTED_COLUMN_COUNT {
            if contains_billion(column) {
                debug!(column, "located stream counts outside the expected column");
                return Ok(column);
            }
        }

        bail!("no column contains a 'billion' stream count; source layout has changed");
    }
}

fn check_schema(table: &RawTable) -> Result<()> {
    if table.headers.len() != EXPECTED_COLUMN_COUNT {
        bail!(
            "schema mismatch: expected {EXPECTED_COLUMN_COUNT} columns, header has {} ({:?})",
            table.headers.len(),
            table.headers
        );
    }

    for (index, row) in table.rows.iter().enumerate() {
        if row.len() != EXPECTED_COLUMN_COUNT {
            bail!(
                "schema mismatch: expected {EXPECTED_COLUMN_COUNT} columns, data row {} has {}",
                index + 1,
                row.len()
            );
        }
    }

    Ok(())
}

/// Rank is the source ordering position; when the cell is not a clean
/// integer the row's own position stands in for it.
fn parse_rank(raw: &str, source_row: usize) -> i64 {
    match raw.trim().parse::<i64>() {
        Ok(rank) => rank,
        Err(_) => {
            debug!(raw, source_row, "rank cell is not an integer, using row position");
            source_row as i64
        }
    }
}
