//! HTTP routes for the composite service.
//!
//! - `GET /` liveness greeting
//! - `GET /{id}` composite built on the blocking path
//! - `GET /async/{id}` composite built on the non-blocking path

use crate::core::aggregator::Aggregator;
use crate::domain::model::{CompositeResult, Greeting, ProductId};
use crate::domain::ports::{AsyncIntegration, BlockingIntegration};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tracing::error;

pub fn router<I>(aggregator: Arc<Aggregator<I>>) -> Router
where
    I: BlockingIntegration + AsyncIntegration + 'static,
{
    Router::new()
        .route("/", get(greeting))
        .route("/{id}", get(composite_blocking::<I>))
        .route("/async/{id}", get(composite_async::<I>))
        .with_state(aggregator)
}

async fn greeting() -> Json<Greeting> {
    Json(Greeting::now())
}

/// Partial composites are still a 200; only an aborted request becomes a 500.
async fn composite_blocking<I>(
    State(aggregator): State<Arc<Aggregator<I>>>,
    Path(id): Path<ProductId>,
) -> Result<Json<CompositeResult>, StatusCode>
where
    I: BlockingIntegration + 'static,
{
    // 阻塞呼叫放到專用執行緒，避免卡住 runtime
    match tokio::task::spawn_blocking(move || aggregator.aggregate_blocking(id)).await {
        Ok(Ok(composite)) => Ok(Json(composite)),
        Ok(Err(e)) => {
            error!("Composite request for {} failed: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
        Err(e) => {
            error!("Composite worker for {} panicked: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn composite_async<I>(
    State(aggregator): State<Arc<Aggregator<I>>>,
    Path(id): Path<ProductId>,
) -> Result<Json<CompositeResult>, StatusCode>
where
    I: AsyncIntegration + 'static,
{
    aggregator
        .aggregate_async(id)
        .await
        .map(Json)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}
