use serde::Serialize;

/// One table lifted out of the page markup: the header row plus every
/// data row, as whitespace-collapsed cell text in source order.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// One normalized chart entry, ready for insertion.
///
/// `release_year` and `date` are passed through from the source table
/// unmodified; SQLite column affinity turns clean years into integers on
/// insert and leaves anything else as text.
#[derive(Debug, Clone, PartialEq)]
pub struct SongRecord {
    pub rank: i64,
    pub song: String,
    pub artist: String,
    pub streams: f64,
    pub release_year: String,
    pub date: String,
    pub scraping_date: String,
}

/// Reporter-side projection of a persisted row.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedSong {
    pub song: String,
    pub artist: String,
    pub streams: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DroppedRowDiagnostic {
    /// 1-based position within the source table's data rows.
    pub source_row: usize,
    pub song: String,
    pub raw_streams: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScrapeRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub generated_at: String,
    pub source_url: String,
    pub source_sha256: String,
    pub scraping_date: String,
    pub db_path: String,
    pub table_name: String,
    pub rows_extracted: usize,
    pub rows_dropped: usize,
    pub rows_inserted: usize,
    pub dropped_rows: Vec<DroppedRowDiagnostic>,
}
