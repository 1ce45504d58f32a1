use crate::domain::model::{Product, ProductId, Recommendation, Review, Source};
use crate::domain::ports::{AsyncIntegration, BlockingIntegration, Fetched};
use crate::utils::error::{Result, SourceError};
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::OnceLock;
use std::time::Duration;

/// Base URLs of the three downstream services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownstreamEndpoints {
    pub product_url: String,
    pub recommendation_url: String,
    pub review_url: String,
}

impl DownstreamEndpoints {
    fn base(&self, source: Source) -> &str {
        let url = match source {
            Source::Product => &self.product_url,
            Source::Recommendations => &self.recommendation_url,
            Source::Reviews => &self.review_url,
        };
        url.trim_end_matches('/')
    }

    /// `GET {product}/product/{id}`, `GET {recommendation}/recommendation?productId={id}`, ...
    pub fn url(&self, source: Source, id: ProductId) -> String {
        match source {
            Source::Product => format!("{}/product/{}", self.base(source), id),
            Source::Recommendations | Source::Reviews => {
                format!("{}/{}?productId={}", self.base(source), source.label(), id)
            }
        }
    }
}

/// reqwest-backed client for the product, recommendation and review services.
pub struct HttpIntegration {
    endpoints: DownstreamEndpoints,
    client: Client,
    timeout: Duration,
    // 阻塞客戶端必須在非 async 執行緒上建立，所以延遲到第一次呼叫
    blocking: OnceLock<reqwest::blocking::Client>,
}

impl HttpIntegration {
    pub fn new(endpoints: DownstreamEndpoints, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoints,
            client,
            timeout,
            blocking: OnceLock::new(),
        })
    }

    fn blocking_client(&self, source: Source) -> std::result::Result<&reqwest::blocking::Client, SourceError> {
        if let Some(client) = self.blocking.get() {
            return Ok(client);
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| SourceError::transport(source, e))?;
        Ok(self.blocking.get_or_init(|| client))
    }

    fn fetch_blocking<T: DeserializeOwned>(
        &self,
        source: Source,
        id: ProductId,
    ) -> std::result::Result<Fetched<T>, SourceError> {
        let url = self.endpoints.url(source, id);
        tracing::debug!("Making blocking request to: {}", url);

        let response = self
            .blocking_client(source)?
            .get(&url)
            .send()
            .map_err(|e| SourceError::transport(source, e))?;

        let status = response.status();
        tracing::debug!("{} response status: {}", source, status);
        if !status.is_success() {
            return Ok(Fetched::with_status(status));
        }

        // 2xx 但沒有內容 (例如 204) 視為欄位不存在
        let bytes = response
            .bytes()
            .map_err(|e| SourceError::transport(source, e))?;
        if bytes.is_empty() {
            return Ok(Fetched { status, body: None });
        }

        let body = serde_json::from_slice::<T>(&bytes).map_err(|e| SourceError::transport(source, e))?;
        Ok(Fetched {
            status,
            body: Some(body),
        })
    }

    fn request(&self, source: Source, id: ProductId) -> RequestBuilder {
        let url = self.endpoints.url(source, id);
        tracing::debug!("Making async request to: {}", url);
        self.client.get(url)
    }
}

async fn send_and_decode<T: DeserializeOwned>(
    source: Source,
    request: RequestBuilder,
) -> std::result::Result<T, SourceError> {
    let response = request
        .send()
        .await
        .map_err(|e| SourceError::transport(source, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            downstream: source,
            status,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| SourceError::transport(source, e))
}

/// The body is a JSON array; items are emitted in array order.
fn item_stream<T: DeserializeOwned + Send + 'static>(
    source: Source,
    request: RequestBuilder,
) -> BoxStream<'static, std::result::Result<T, SourceError>> {
    stream::once(send_and_decode::<Vec<T>>(source, request))
        .map_ok(|items| stream::iter(items.into_iter().map(Ok::<T, SourceError>)))
        .try_flatten()
        .boxed()
}

impl BlockingIntegration for HttpIntegration {
    fn get_product(&self, id: ProductId) -> std::result::Result<Fetched<Product>, SourceError> {
        self.fetch_blocking(Source::Product, id)
    }

    fn get_recommendations(
        &self,
        id: ProductId,
    ) -> std::result::Result<Fetched<Vec<Recommendation>>, SourceError> {
        self.fetch_blocking(Source::Recommendations, id)
    }

    fn get_reviews(&self, id: ProductId) -> std::result::Result<Fetched<Vec<Review>>, SourceError> {
        self.fetch_blocking(Source::Reviews, id)
    }
}

#[async_trait]
impl AsyncIntegration for HttpIntegration {
    async fn get_product_async(&self, id: ProductId) -> std::result::Result<Product, SourceError> {
        send_and_decode(Source::Product, self.request(Source::Product, id)).await
    }

    fn get_recommendations_async(
        &self,
        id: ProductId,
    ) -> BoxStream<'static, std::result::Result<Recommendation, SourceError>> {
        item_stream(Source::Recommendations, self.request(Source::Recommendations, id))
    }

    fn get_reviews_async(&self, id: ProductId) -> BoxStream<'static, std::result::Result<Review, SourceError>> {
        item_stream(Source::Reviews, self.request(Source::Reviews, id))
    }
}
