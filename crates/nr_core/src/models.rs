use async_trait::async_trait;
use std::fmt;
use crate::types::{Analysis, ArticleText};
use crate::Result;

#[async_trait]
pub trait InferenceModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Summarize an article. `Ok(None)` means the service answered without
    /// a usable summary.
    async fn summarize(&self, article: &ArticleText) -> Result<Option<String>>;

    /// Classify sentiment and summarize in one call
    async fn sentiment_and_summary(&self, article: &ArticleText) -> Result<Analysis>;
}
