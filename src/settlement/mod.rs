pub mod aggregator;
pub mod minimizer;
pub mod suggester;
