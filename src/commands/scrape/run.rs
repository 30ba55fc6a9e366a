use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use tracing::info;

use crate::cli::ScrapeArgs;
use crate::model::{DroppedRowDiagnostic, ScrapeRunManifest};
use crate::storage;
use crate::util::{
    now_utc_string, sha256_hex, utc_compact_string, utc_date_string, write_json_pretty,
};

use super::extract::extract_first_wikitable;
use super::fetch::fetch_html;
use super::normalize::Normalizer;

pub(crate) struct IngestStats {
    pub rows_extracted: usize,
    pub rows_inserted: usize,
    pub dropped: Vec<DroppedRowDiagnostic>,
}

pub fn run(args: ScrapeArgs) -> Result<()> {
    let started_ts = Utc::now();
    let run_id = format!("run-{}", utc_compact_string(started_ts));
    let scraping_date = utc_date_string(started_ts);

    info!(run_id = %run_id, source_url = %args.source_url, "starting scrape");

    let html = fetch_html(&args.source_url)?;
    let source_sha256 = sha256_hex(html.as_bytes());

    let mut connection = storage::open_database(&args.db_path)?;
    let stats = ingest_document(&html, &mut connection, &args.table_name, &scraping_date)?;

    if let Some(manifest_path) = &args.manifest_path {
        let manifest = ScrapeRunManifest {
            manifest_version: 1,
            run_id: run_id.clone(),
            generated_at: now_utc_string(),
            source_url: args.source_url.clone(),
            source_sha256,
            scraping_date: scraping_date.clone(),
            db_path: args.db_path.display().to_string(),
            table_name: args.table_name.clone(),
            rows_extracted: stats.rows_extracted,
            rows_dropped: stats.dropped.len(),
            rows_inserted: stats.rows_inserted,
            dropped_rows: stats.dropped.clone(),
        };
        write_json_pretty(manifest_path, &manifest)?;
        info!(path = %manifest_path.display(), "wrote scrape run manifest");
    }

    info!(
        run_id = %run_id,
        rows_inserted = stats.rows_inserted,
        rows_dropped = stats.dropped.len(),
        db_path = %args.db_path.display(),
        "scrape completed"
    );

    Ok(())
}

/// Extract, normalize and persist one fetched document. The store side runs
/// as a single transaction, so a failed insert leaves the table untouched.
pub(crate) fn ingest_document(
    html: &str,
    connection: &mut Connection,
    table_name: &str,
    scraping_date: &str,
) -> Result<IngestStats> {
    let table = extract_first_wikitable(html)?;
    let rows_extracted = table.rows.len();

    let normalizer = Normalizer::new()?;
    let outcome = normalizer.normalize(&table, scraping_date)?;

    storage::ensure_songs_table(connection, table_name)?;
    let rows_inserted = storage::insert_songs(connection, table_name, &outcome.records)?;

    Ok(IngestStats {
        rows_extracted,
        rows_inserted,
        dropped: outcome.dropped,
    })
}
