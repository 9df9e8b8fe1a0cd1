use async_trait::async_trait;
use crate::types::{
    ArticleDraft, CommunityArticle, CommunityDraft, NewsArticle, Sentiment, WeatherReport,
};
use crate::Result;

#[async_trait]
pub trait ArticleStorage: Send + Sync {
    /// Insert a new article and return it with its assigned id
    async fn add_article(&self, draft: &ArticleDraft) -> Result<NewsArticle>;

    async fn get_article(&self, id: i64) -> Result<Option<NewsArticle>>;

    /// First article (lowest id) whose headline matches exactly
    async fn find_by_headline(&self, headline: &str) -> Result<Option<NewsArticle>>;

    /// All articles, newest first
    async fn list_articles(&self) -> Result<Vec<NewsArticle>>;

    /// Replace the editable fields. Returns `None` when the article does not exist.
    async fn update_article(&self, id: i64, draft: &ArticleDraft) -> Result<Option<NewsArticle>>;

    /// Store AI output on an article. Returns `None` when the article does not exist.
    async fn set_enrichment(
        &self,
        id: i64,
        ai_summary: &str,
        sentiment: Sentiment,
    ) -> Result<Option<NewsArticle>>;

    /// Returns whether a row was removed
    async fn delete_article(&self, id: i64) -> Result<bool>;
}

#[async_trait]
pub trait CommunityStorage: Send + Sync {
    async fn add_community_article(&self, draft: &CommunityDraft) -> Result<CommunityArticle>;

    async fn get_community_article(&self, id: i64) -> Result<Option<CommunityArticle>>;

    async fn list_community_articles(&self) -> Result<Vec<CommunityArticle>>;

    async fn update_community_article(
        &self,
        id: i64,
        draft: &CommunityDraft,
    ) -> Result<Option<CommunityArticle>>;

    async fn delete_community_article(&self, id: i64) -> Result<bool>;
}

#[async_trait]
pub trait WeatherStorage: Send + Sync {
    /// Replace the stored report with a fresher one
    async fn store_weather(&self, report: &WeatherReport) -> Result<()>;

    async fn latest_weather(&self) -> Result<Option<WeatherReport>>;
}

/// Everything the web application persists.
pub trait Storage: ArticleStorage + CommunityStorage + WeatherStorage {}

impl<T> Storage for T where T: ArticleStorage + CommunityStorage + WeatherStorage {}
