mod extract;
mod fetch;
mod normalize;
mod run;

pub use run::run;
