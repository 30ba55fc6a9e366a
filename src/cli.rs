use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub const DEFAULT_SOURCE_URL: &str =
    "https://en.wikipedia.org/wiki/List_of_most-streamed_songs_on_Spotify";

#[derive(Parser, Debug)]
#[command(
    name = "streamchart",
    version,
    about = "Scrape the most-streamed Spotify songs table into SQLite and chart the top entries"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Full pipeline: scrape into the database, then render the chart.
    Run(RunArgs),
    /// Fetch, extract, normalize and persist the source table.
    Scrape(ScrapeArgs),
    /// Reload persisted rows, rank them and render the chart.
    Report(ReportArgs),
    /// Summarize what the database currently holds.
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ScrapeArgs {
    #[arg(long, default_value = DEFAULT_SOURCE_URL)]
    pub source_url: String,

    #[arg(long, default_value = "spotify_streams.db")]
    pub db_path: PathBuf,

    #[arg(long, default_value = "most_streamed_songs")]
    pub table_name: String,

    /// Write a JSON run manifest (source hash, row counts, dropped rows) here.
    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    #[arg(long, default_value = "spotify_streams.db")]
    pub db_path: PathBuf,

    #[arg(long, default_value = "most_streamed_songs")]
    pub table_name: String,

    #[arg(long, default_value = "top10_songs.png")]
    pub output_image_path: PathBuf,

    #[arg(long, default_value_t = 10)]
    pub top_n: usize,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[arg(long, default_value = DEFAULT_SOURCE_URL)]
    pub source_url: String,

    #[arg(long, default_value = "spotify_streams.db")]
    pub db_path: PathBuf,

    #[arg(long, default_value = "most_streamed_songs")]
    pub table_name: String,

    #[arg(long, default_value = "top10_songs.png")]
    pub output_image_path: PathBuf,

    #[arg(long, default_value_t = 10)]
    pub top_n: usize,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = "spotify_streams.db")]
    pub db_path: PathBuf,

    #[arg(long, default_value = "most_streamed_songs")]
    pub table_name: String,
}
