pub mod aggregator;
pub mod policy;
