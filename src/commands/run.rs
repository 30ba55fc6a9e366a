use anyhow::Result;

use crate::cli::{ReportArgs, RunArgs, ScrapeArgs};
use crate::commands::{report, scrape};

/// Single-shot pipeline: scrape into the database, then render the chart
/// from what the database now holds. Reporting runs only after the scrape
/// has committed, so a report failure never loses persisted data.
pub fn run(args: RunArgs) -> Result<()> {
    scrape::run(ScrapeArgs {
        source_url: args.source_url,
        db_path: args.db_path.clone(),
        table_name: args.table_name.clone(),
        manifest_path: args.manifest_path,
    })?;

    report::run(ReportArgs {
        db_path: args.db_path,
        table_name: args.table_name,
        output_image_path: args.output_image_path,
        top_n: args.top_n,
    })
}
