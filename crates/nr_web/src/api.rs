use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use nr_core::{ArticleText, NewsArticle};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;
use crate::error::{ApiError, ARTICLE_NOT_FOUND};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AiRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SentimentResponse {
    pub sentiment: String,
    pub summary: String,
    pub ai_summary: String,
}

fn article_text(payload: Result<Json<AiRequest>, JsonRejection>) -> Result<ArticleText, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let title = request.title.map(|t| t.trim().to_string()).unwrap_or_default();
    let content = request.content.map(|c| c.trim().to_string()).unwrap_or_default();
    if title.is_empty() || content.is_empty() {
        return Err(ApiError::BadRequest("Title and content are required".to_string()));
    }
    Ok(ArticleText { title, content })
}

pub async fn summary(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AiRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let article = article_text(payload)?;

    let summary = state
        .inference_model
        .summarize(&article)
        .await
        .map_err(|source| ApiError::Upstream {
            message: "Failed to generate summary",
            source,
        })?
        .filter(|s| !s.trim().is_empty())
        .ok_or(ApiError::IncompleteResponse)?;

    Ok(Json(json!({ "summary": summary })))
}

pub async fn sentiment_and_summary(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AiRequest>, JsonRejection>,
) -> Result<Json<SentimentResponse>, ApiError> {
    let article = article_text(payload)?;

    let analysis = state
        .inference_model
        .sentiment_and_summary(&article)
        .await
        .map_err(|source| ApiError::Upstream {
            message: "Failed to generate sentiment and summary",
            source,
        })?;

    let (Some(summary), Some(sentiment)) = (
        analysis.summary.filter(|s| !s.trim().is_empty()),
        analysis.sentiment,
    ) else {
        return Err(ApiError::IncompleteResponse);
    };

    let existing = state
        .storage
        .find_by_headline(&article.title)
        .await?
        .ok_or(ApiError::NotFound(ARTICLE_NOT_FOUND))?;

    let updated = state
        .storage
        .set_enrichment(existing.id, &summary, sentiment)
        .await?
        .ok_or(ApiError::NotFound(ARTICLE_NOT_FOUND))?;
    info!("🧠 Stored {} sentiment for article {}", sentiment, updated.id);

    Ok(Json(SentimentResponse {
        sentiment: sentiment.to_string(),
        summary: summary.clone(),
        ai_summary: summary,
    }))
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<NewsArticle>>, ApiError> {
    Ok(Json(state.storage.list_articles().await?))
}

pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<NewsArticle>, ApiError> {
    state
        .storage
        .get_article(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(ARTICLE_NOT_FOUND))
}
