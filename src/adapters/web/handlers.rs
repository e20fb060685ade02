//! HTTP request handlers for the news proxy.

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use log::{info, warn};
use serde::Deserialize;
use std::sync::Arc;

use crate::domain::news::{NewsArticle, take_top};

use super::{AppState, WebError};

pub const WELCOME_TEXT: &str = "Finsight news proxy is running.";

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub category: Option<String>,
}

pub async fn home() -> &'static str {
    WELCOME_TEXT
}

pub async fn news(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NewsQuery>,
) -> Result<Json<Vec<NewsArticle>>, WebError> {
    let category = query
        .category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| state.default_category.clone());

    match state.news.fetch_news(&category).await {
        Ok(articles) => {
            let articles = take_top(articles, state.news_limit);
            info!("relayed {} {category} articles", articles.len());
            Ok(Json(articles))
        }
        Err(err) => {
            warn!("news fetch for {category} failed: {err}");
            Err(err.into())
        }
    }
}

pub async fn not_found() -> impl IntoResponse {
    WebError::not_found("Not found")
}
