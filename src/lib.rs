pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::http::{DownstreamEndpoints, HttpIntegration};
pub use config::{toml_config::ServiceConfig, CliConfig};
pub use core::aggregator::{Aggregator, ExecutionPath};
pub use core::policy::{FailurePolicies, FailurePolicy, PathPolicy, SourcePolicy};
pub use domain::model::{CompositeResult, Product, ProductId, Recommendation, Review, Source};
pub use utils::error::{CompositeError, Result, SourceError};
pub use utils::monitor::RequestMetrics;
