use crate::domain::model::{Product, ProductId, Recommendation, Review, Source};
use crate::utils::error::SourceError;
use async_trait::async_trait;
use futures::stream::BoxStream;
use reqwest::StatusCode;

/// Outcome of a blocking downstream call: the status plus the body when there was one.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub status: StatusCode,
    pub body: Option<T>,
}

impl<T> Fetched<T> {
    pub fn ok(body: T) -> Self {
        Self {
            status: StatusCode::OK,
            body: Some(body),
        }
    }

    pub fn with_status(status: StatusCode) -> Self {
        Self { status, body: None }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// 2xx keeps the (possibly empty) body, anything else becomes a status error.
    pub fn into_result(self, downstream: Source) -> Result<Option<T>, SourceError> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(SourceError::Status {
                downstream,
                status: self.status,
            })
        }
    }
}

/// Blocking capability set. Non-2xx statuses come back inside `Fetched`;
/// only transport-level failures are returned as errors.
pub trait BlockingIntegration: Send + Sync {
    fn get_product(&self, id: ProductId) -> Result<Fetched<Product>, SourceError>;
    fn get_recommendations(&self, id: ProductId) -> Result<Fetched<Vec<Recommendation>>, SourceError>;
    fn get_reviews(&self, id: ProductId) -> Result<Fetched<Vec<Review>>, SourceError>;
}

/// Non-blocking capability set. Every failure, non-2xx included, is
/// delivered through the future or stream as an error.
#[async_trait]
pub trait AsyncIntegration: Send + Sync {
    async fn get_product_async(&self, id: ProductId) -> Result<Product, SourceError>;
    fn get_recommendations_async(
        &self,
        id: ProductId,
    ) -> BoxStream<'static, Result<Recommendation, SourceError>>;
    fn get_reviews_async(&self, id: ProductId) -> BoxStream<'static, Result<Review, SourceError>>;
}
