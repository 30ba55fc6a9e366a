use anyhow::{Result, anyhow, bail};
use scraper::{ElementRef, Html, Selector};
use tracing::{error, info};

use crate::model::RawTable;

/// Locates the first `table.wikitable` in the page and lifts it into rows of
/// cell text. The first row is treated as the header row.
///
/// A page without any wikitable, and a wikitable without data rows, are both
/// fatal: the page layout has changed and continuing would persist garbage.
pub(crate) fn extract_first_wikitable(html: &str) -> Result<RawTable> {
    let document = Html::parse_document(html);

    let table_selector = Selector::parse("table.wikitable")
        .map_err(|err| anyhow!("failed to compile table selector: {err}"))?;

    let Some(table) = document.select(&table_selector).next() else {
        bail!("no wikitable found on the page");
    };

    match table_to_rows(table) {
        Ok(raw) => {
            info!(
                columns = raw.headers.len(),
                rows = raw.rows.len(),
                "extracted first wikitable"
            );
            Ok(raw)
        }
        Err(err) => {
            // Deliberate full dump: when the upstream layout changes, the
            // offending markup is the thing worth having in the log.
            error!(table_html = %table.html(), "could not convert wikitable to rows");
            Err(err)
        }
    }
}

fn table_to_rows(table: ElementRef<'_>) -> Result<RawTable> {
    let row_selector =
        Selector::parse("tr").map_err(|err| anyhow!("failed to compile row selector: {err}"))?;
    let cell_selector = Selector::parse("th, td")
        .map_err(|err| anyhow!("failed to compile cell selector: {err}"))?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for row in table.select(&row_selector) {
        let cells: Vec<String> = row
            .select(&cell_selector)
            .map(|cell| collapse_whitespace(&cell.text().collect::<String>()))
            .collect();
        if !cells.is_empty() {
            rows.push(cells);
        }
    }

    if rows.len() < 2 {
        bail!("wikitable has no data rows");
    }

    let headers = rows.remove(0);
    Ok(RawTable { headers, rows })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
