//! News provider port trait.

use async_trait::async_trait;

use crate::domain::error::FinsightError;
use crate::domain::news::NewsArticle;

#[async_trait]
pub trait NewsPort: Send + Sync {
    /// Articles for `category`, newest first as the provider orders them.
    async fn fetch_news(&self, category: &str) -> Result<Vec<NewsArticle>, FinsightError>;
}
