pub mod report;
pub mod run;
pub mod scrape;
pub mod status;
