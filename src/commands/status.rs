use anyhow::Result;
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::storage;

pub fn run(args: StatusArgs) -> Result<()> {
    if !args.db_path.exists() {
        warn!(path = %args.db_path.display(), "database missing; nothing scraped yet");
        return Ok(());
    }

    storage::validate_table_name(&args.table_name)?;
    let connection = storage::open_database(&args.db_path)?;

    let table = &args.table_name;
    let rows =
        storage::count_rows(&connection, &format!("SELECT COUNT(*) FROM {table}")).unwrap_or(0);
    let runs = storage::count_rows(
        &connection,
        &format!("SELECT COUNT(DISTINCT scraping_date) FROM {table}"),
    )
    .unwrap_or(0);
    let latest: Option<String> = connection
        .query_row(
            &format!("SELECT MAX(scraping_date) FROM {table}"),
            [],
            |row| row.get(0),
        )
        .unwrap_or(None);

    info!(
        path = %args.db_path.display(),
        table = %args.table_name,
        rows,
        runs,
        latest_scraping_date = %latest.unwrap_or_default(),
        "database status"
    );

    Ok(())
}
