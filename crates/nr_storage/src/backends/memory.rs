use async_trait::async_trait;
use chrono::Utc;
use nr_core::{
    ArticleDraft, ArticleStorage, CommunityArticle, CommunityDraft, CommunityStorage, NewsArticle,
    Result, Sentiment, WeatherReport, WeatherStorage,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::StorageBackend;

#[derive(Default)]
pub struct MemoryStore {
    articles: Vec<NewsArticle>,
    community: Vec<CommunityArticle>,
    weather: Option<WeatherReport>,
    next_article_id: i64,
    next_community_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn add_article(&mut self, draft: &ArticleDraft) -> NewsArticle {
        self.next_article_id += 1;
        let article = NewsArticle {
            id: self.next_article_id,
            headline: draft.headline.clone(),
            summary: draft.summary.clone(),
            link: draft.link.clone(),
            ai_summary: None,
            sentiment: None,
            created_at: Utc::now(),
        };
        self.articles.push(article.clone());
        article
    }

    fn article_mut(&mut self, id: i64) -> Option<&mut NewsArticle> {
        self.articles.iter_mut().find(|a| a.id == id)
    }

    fn add_community(&mut self, draft: &CommunityDraft) -> CommunityArticle {
        self.next_community_id += 1;
        let article = CommunityArticle {
            id: self.next_community_id,
            username: draft.username.clone(),
            title: draft.title.clone(),
            content: draft.content.clone(),
            link: draft.link.clone(),
            author: draft.author.clone(),
            created_at: Utc::now(),
        };
        self.community.push(article.clone());
        article
    }
}

/// Process-local storage. Contents are lost on restart.
pub struct MemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(MemoryStore::new())),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for MemoryStorage {
    fn name() -> &'static str {
        "memory"
    }

    fn get_error_message() -> &'static str {
        "Memory storage should be available"
    }
}

#[async_trait]
impl ArticleStorage for MemoryStorage {
    async fn add_article(&self, draft: &ArticleDraft) -> Result<NewsArticle> {
        let mut store = self.store.write().await;
        Ok(store.add_article(draft))
    }

    async fn get_article(&self, id: i64) -> Result<Option<NewsArticle>> {
        let store = self.store.read().await;
        Ok(store.articles.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_headline(&self, headline: &str) -> Result<Option<NewsArticle>> {
        let store = self.store.read().await;
        Ok(store.articles.iter().find(|a| a.headline == headline).cloned())
    }

    async fn list_articles(&self) -> Result<Vec<NewsArticle>> {
        let store = self.store.read().await;
        Ok(store.articles.iter().rev().cloned().collect())
    }

    async fn update_article(&self, id: i64, draft: &ArticleDraft) -> Result<Option<NewsArticle>> {
        let mut store = self.store.write().await;
        Ok(store.article_mut(id).map(|article| {
            article.headline = draft.headline.clone();
            article.summary = draft.summary.clone();
            article.link = draft.link.clone();
            article.clone()
        }))
    }

    async fn set_enrichment(
        &self,
        id: i64,
        ai_summary: &str,
        sentiment: Sentiment,
    ) -> Result<Option<NewsArticle>> {
        let mut store = self.store.write().await;
        Ok(store.article_mut(id).map(|article| {
            article.ai_summary = Some(ai_summary.to_string());
            article.sentiment = Some(sentiment);
            article.clone()
        }))
    }

    async fn delete_article(&self, id: i64) -> Result<bool> {
        let mut store = self.store.write().await;
        let before = store.articles.len();
        store.articles.retain(|a| a.id != id);
        Ok(store.articles.len() != before)
    }
}

#[async_trait]
impl CommunityStorage for MemoryStorage {
    async fn add_community_article(&self, draft: &CommunityDraft) -> Result<CommunityArticle> {
        let mut store = self.store.write().await;
        Ok(store.add_community(draft))
    }

    async fn get_community_article(&self, id: i64) -> Result<Option<CommunityArticle>> {
        let store = self.store.read().await;
        Ok(store.community.iter().find(|a| a.id == id).cloned())
    }

    async fn list_community_articles(&self) -> Result<Vec<CommunityArticle>> {
        let store = self.store.read().await;
        Ok(store.community.iter().rev().cloned().collect())
    }

    async fn update_community_article(
        &self,
        id: i64,
        draft: &CommunityDraft,
    ) -> Result<Option<CommunityArticle>> {
        let mut store = self.store.write().await;
        Ok(store.community.iter_mut().find(|a| a.id == id).map(|article| {
            article.username = draft.username.clone();
            article.title = draft.title.clone();
            article.content = draft.content.clone();
            article.link = draft.link.clone();
            article.author = draft.author.clone();
            article.clone()
        }))
    }

    async fn delete_community_article(&self, id: i64) -> Result<bool> {
        let mut store = self.store.write().await;
        let before = store.community.len();
        store.community.retain(|a| a.id != id);
        Ok(store.community.len() != before)
    }
}

#[async_trait]
impl WeatherStorage for MemoryStorage {
    async fn store_weather(&self, report: &WeatherReport) -> Result<()> {
        let mut store = self.store.write().await;
        store.weather = Some(report.clone());
        Ok(())
    }

    async fn latest_weather(&self) -> Result<Option<WeatherReport>> {
        let store = self.store.read().await;
        Ok(store.weather.clone())
    }
}
