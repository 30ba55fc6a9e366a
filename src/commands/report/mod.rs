mod chart;
mod run;
#[cfg(test)]
mod tests;

pub use run::run;
