//! News proxy web adapter.
//!
//! Relays market headlines from a [`NewsPort`] as JSON so browser clients
//! never see the upstream API key.

mod error;
mod handlers;

pub use error::WebError;
pub use handlers::*;

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use log::info;
use std::sync::Arc;
use std::time::Instant;

use crate::domain::news::PROXY_ARTICLE_LIMIT;
use crate::ports::news_port::NewsPort;

pub const DEFAULT_CATEGORY: &str = "general";
/// Log target for the one-line-per-request access log.
pub const REQUEST_LOG_TARGET: &str = "finsight::web::access";

pub struct AppState {
    pub news: Arc<dyn NewsPort>,
    pub news_limit: usize,
    pub default_category: String,
}

impl AppState {
    pub fn new(news: Arc<dyn NewsPort>) -> Self {
        Self {
            news,
            news_limit: PROXY_ARTICLE_LIMIT,
            default_category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/news", get(handlers::news))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(log_request))
        .with_state(Arc::new(state))
}

async fn log_request(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();
    let response = next.run(request).await;
    info!(
        target: REQUEST_LOG_TARGET,
        "{method} {path} -> {} in {}ms",
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}
