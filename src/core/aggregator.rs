use crate::core::policy::{FailurePolicies, FailurePolicy, PathPolicy, SourcePolicy};
use crate::domain::model::{CompositeResult, Product, ProductId, Recommendation, Review, Source};
use crate::domain::ports::{AsyncIntegration, BlockingIntegration, Fetched};
use crate::utils::error::SourceError;
use crate::utils::monitor::RequestMetrics;
use futures::TryStreamExt;
use std::future::Future;
use std::sync::Arc;

/// Which of the two execution models a request runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPath {
    /// Sequential, on the caller's thread. Latency is the sum of the three calls.
    Blocking,
    /// Concurrent join. Latency is roughly the slowest call.
    NonBlocking,
}

/// Fans a product id out to the three downstream sources and combines the results.
pub struct Aggregator<I> {
    integration: I,
    metrics: Arc<RequestMetrics>,
    policies: FailurePolicies,
    service_address: String,
}

impl<I> Aggregator<I> {
    pub fn new(integration: I, metrics: Arc<RequestMetrics>, service_address: impl Into<String>) -> Self {
        Self {
            integration,
            metrics,
            policies: FailurePolicies::default(),
            service_address: service_address.into(),
        }
    }

    pub fn with_policies(mut self, policies: FailurePolicies) -> Self {
        self.policies = policies;
        self
    }

    pub fn metrics(&self) -> &RequestMetrics {
        &self.metrics
    }

    pub fn service_address(&self) -> &str {
        &self.service_address
    }

    pub fn policy(&self, path: ExecutionPath) -> &PathPolicy {
        match path {
            ExecutionPath::Blocking => &self.policies.blocking,
            ExecutionPath::NonBlocking => &self.policies.non_blocking,
        }
    }

    fn compose(
        &self,
        product: Option<Product>,
        recommendations: Option<Vec<Recommendation>>,
        reviews: Option<Vec<Review>>,
    ) -> CompositeResult {
        CompositeResult::new(product, recommendations, reviews, self.service_address.as_str())
    }
}

/// Applies a source's failure policy to one downstream outcome.
fn resolve<T>(
    path: ExecutionPath,
    source: Source,
    outcome: Result<Option<T>, SourceError>,
    policy: SourcePolicy,
) -> Result<Option<T>, SourceError> {
    let error = match outcome {
        Ok(value) => return Ok(value),
        Err(error) => error,
    };

    match policy.for_error(&error) {
        FailurePolicy::TolerateAndNull => {
            // 略過這個欄位，繼續組合其他資料
            tracing::debug!("Call to {} failed ({:?}): {}", source, path, error);
            Ok(None)
        }
        FailurePolicy::AbortRequest => {
            if path == ExecutionPath::Blocking && !error.is_status() {
                tracing::error!("{} error: {}", source, error);
            }
            Err(error)
        }
    }
}

impl<I> Aggregator<I> {
    fn resolve_field<T>(
        &self,
        path: ExecutionPath,
        source: Source,
        outcome: Result<Option<T>, SourceError>,
    ) -> Result<Option<T>, SourceError> {
        resolve(path, source, outcome, self.policy(path).for_source(source))
    }

    /// One sequential call: a non-2xx status arrives inside `Fetched`.
    fn blocking_field<T>(
        &self,
        source: Source,
        fetch: impl FnOnce() -> Result<Fetched<T>, SourceError>,
    ) -> Result<Option<T>, SourceError> {
        let outcome = fetch().and_then(|fetched| fetched.into_result(source));
        self.resolve_field(ExecutionPath::Blocking, source, outcome)
    }

    /// One branch of the concurrent join.
    async fn joined_field<T>(
        &self,
        source: Source,
        call: impl Future<Output = Result<T, SourceError>>,
    ) -> Result<Option<T>, SourceError> {
        let outcome = call.await.map(Some);
        self.resolve_field(ExecutionPath::NonBlocking, source, outcome)
    }
}

impl<I: BlockingIntegration> Aggregator<I> {
    /// Calls product, recommendations and reviews one after the other.
    ///
    /// No metrics are recorded on this path.
    pub fn aggregate_blocking(&self, id: ProductId) -> Result<CompositeResult, SourceError> {
        // 1. First get the product information
        let product = self.blocking_field(Source::Product, || self.integration.get_product(id))?;

        // 2. Recommendations
        let recommendations = self.blocking_field(Source::Recommendations, || {
            self.integration.get_recommendations(id)
        })?;

        // 3. Reviews
        let reviews = self.blocking_field(Source::Reviews, || self.integration.get_reviews(id))?;

        Ok(self.compose(product, recommendations, reviews))
    }
}

impl<I: AsyncIntegration> Aggregator<I> {
    /// Issues all three calls concurrently and joins them.
    ///
    /// Nothing happens until the returned future is first polled; that poll
    /// marks the request in flight. Dropping the future before it finishes
    /// leaves the in-flight counter incremented.
    pub async fn aggregate_async(&self, id: ProductId) -> Result<CompositeResult, SourceError> {
        tracing::trace!("### Called: /async/{}", id);
        self.metrics.log_start_request();

        // Collection streams are buffered into ordered vectors before the join.
        let product = self.joined_field(Source::Product, self.integration.get_product_async(id));
        let recommendations = self.joined_field(
            Source::Recommendations,
            self.integration
                .get_recommendations_async(id)
                .try_collect::<Vec<_>>(),
        );
        let reviews = self.joined_field(
            Source::Reviews,
            self.integration.get_reviews_async(id).try_collect::<Vec<_>>(),
        );

        // The first aborting error drops the remaining calls.
        match tokio::try_join!(product, recommendations, reviews) {
            Ok((product, recommendations, reviews)) => {
                self.metrics.log_end_request();
                Ok(self.compose(product, recommendations, reviews))
            }
            Err(error) => {
                self.metrics.log_end_request_with_error(&error);
                Err(error)
            }
        }
    }
}
