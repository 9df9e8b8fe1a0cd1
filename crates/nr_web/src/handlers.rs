use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use nr_core::{ArticleDraft, CommunityDraft, Error, IndexEntry, NewsArticle};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use crate::error::{form_message, PageError, ARTICLE_NOT_FOUND};
use crate::flash::{self, Flash, FlashLevel};
use crate::{views, AppState};

pub const SEARCH_LIMIT: usize = 50;

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a search term.";
pub const NO_RESULTS_MESSAGE: &str = "No articles found for your search.";
pub const WEATHER_UPDATED_MESSAGE: &str = "Weather updated successfully!";
pub const WEATHER_FAILED_MESSAGE: &str = "Failed to update weather data";

#[derive(Debug, Deserialize)]
pub struct ArticleForm {
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub link: Option<String>,
}

impl ArticleForm {
    fn draft(&self) -> nr_core::Result<ArticleDraft> {
        ArticleDraft::new(
            self.headline.as_deref(),
            self.summary.as_deref(),
            self.link.as_deref(),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct CommunityForm {
    pub username: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub link: Option<String>,
    pub author: Option<String>,
}

impl CommunityForm {
    fn draft(&self) -> nr_core::Result<CommunityDraft> {
        CommunityDraft::new(
            self.username.as_deref(),
            self.title.as_deref(),
            self.content.as_deref(),
            self.link.as_deref(),
            self.author.as_deref(),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

/// 302 to the home page.
fn redirect_home() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}

fn is_form_error(e: &Error) -> bool {
    matches!(e, Error::Validation(_) | Error::InvalidUrl(_))
}

/// Keep the search index in step with a write. The store stays authoritative,
/// so failures only get logged.
async fn reindex(state: &AppState, article: &NewsArticle) {
    if let Err(e) = state.index.index_article(&IndexEntry::from(article)).await {
        warn!("Failed to index article {}: {}", article.id, e);
    }
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, PageError> {
    let (jar, flashes) = flash::take(jar);

    let articles = state.storage.list_articles().await?;
    let community = state.storage.list_community_articles().await?;
    let weather = state.storage.latest_weather().await?;

    let page = views::index_page(&articles, &community, weather.as_ref(), &flashes);
    Ok((jar, Html(page)))
}

pub async fn add_article(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ArticleForm>,
) -> Result<impl IntoResponse, PageError> {
    let draft = match form.draft() {
        Ok(draft) => draft,
        Err(e) if is_form_error(&e) => {
            let jar = flash::push(jar, FlashLevel::Error, form_message(&e));
            return Ok((jar, redirect_home()));
        }
        Err(e) => return Err(e.into()),
    };

    let article = state.storage.add_article(&draft).await?;
    reindex(&state, &article).await;
    info!("📰 Added article {}: {}", article.id, article.headline);

    let jar = flash::push(jar, FlashLevel::Success, "Article added successfully!");
    Ok((jar, redirect_home()))
}

pub async fn edit_article_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, PageError> {
    let article = state
        .storage
        .get_article(id)
        .await?
        .ok_or(PageError::NotFound(ARTICLE_NOT_FOUND))?;
    Ok(Html(views::edit_article_page(&article)))
}

pub async fn edit_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    jar: CookieJar,
    Form(form): Form<ArticleForm>,
) -> Result<impl IntoResponse, PageError> {
    let draft = match form.draft() {
        Ok(draft) => draft,
        Err(e) if is_form_error(&e) => {
            let jar = flash::push(jar, FlashLevel::Error, form_message(&e));
            return Ok((jar, redirect_home()));
        }
        Err(e) => return Err(e.into()),
    };

    let article = state
        .storage
        .update_article(id, &draft)
        .await?
        .ok_or(PageError::NotFound(ARTICLE_NOT_FOUND))?;
    reindex(&state, &article).await;
    info!("📝 Updated article {}", article.id);

    let jar = flash::push(jar, FlashLevel::Success, "Article updated successfully!");
    Ok((jar, redirect_home()))
}

pub async fn delete_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> Result<impl IntoResponse, PageError> {
    if !state.storage.delete_article(id).await? {
        return Err(PageError::NotFound(ARTICLE_NOT_FOUND));
    }
    if let Err(e) = state.index.remove_article(id).await {
        warn!("Failed to remove article {} from the search index: {}", id, e);
    }
    info!("🗑️ Deleted article {}", id);

    let jar = flash::push(jar, FlashLevel::Success, "Article deleted.");
    Ok((jar, redirect_home()))
}

pub async fn add_community_article(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<CommunityForm>,
) -> Result<impl IntoResponse, PageError> {
    let draft = match form.draft() {
        Ok(draft) => draft,
        Err(e) if is_form_error(&e) => {
            let jar = flash::push(jar, FlashLevel::Error, form_message(&e));
            return Ok((jar, redirect_home()));
        }
        Err(e) => return Err(e.into()),
    };

    let article = state.storage.add_community_article(&draft).await?;
    info!("🗣️ {} submitted community article {}", article.username, article.id);

    let jar = flash::push(jar, FlashLevel::Success, "Community article submitted!");
    Ok((jar, redirect_home()))
}

pub async fn edit_community_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, PageError> {
    let article = state
        .storage
        .get_community_article(id)
        .await?
        .ok_or(PageError::NotFound(ARTICLE_NOT_FOUND))?;
    Ok(Html(views::edit_community_page(&article)))
}

pub async fn edit_community_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    jar: CookieJar,
    Form(form): Form<CommunityForm>,
) -> Result<impl IntoResponse, PageError> {
    let draft = match form.draft() {
        Ok(draft) => draft,
        Err(e) if is_form_error(&e) => {
            let jar = flash::push(jar, FlashLevel::Error, form_message(&e));
            return Ok((jar, redirect_home()));
        }
        Err(e) => return Err(e.into()),
    };

    state
        .storage
        .update_community_article(id, &draft)
        .await?
        .ok_or(PageError::NotFound(ARTICLE_NOT_FOUND))?;

    let jar = flash::push(jar, FlashLevel::Success, "Community article updated!");
    Ok((jar, redirect_home()))
}

pub async fn delete_community_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> Result<impl IntoResponse, PageError> {
    if !state.storage.delete_community_article(id).await? {
        return Err(PageError::NotFound(ARTICLE_NOT_FOUND));
    }

    let jar = flash::push(jar, FlashLevel::Success, "Community article deleted.");
    Ok((jar, redirect_home()))
}

pub async fn update_weather(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    let result = async {
        let report = state.weather.fetch_current().await?;
        state.storage.store_weather(&report).await?;
        Ok::<_, Error>(report)
    }
    .await;

    let jar = match result {
        Ok(report) => {
            info!(
                "🌤️ Weather updated from {}: {:.1}°C in {}",
                state.weather.name(),
                report.temperature,
                report.location
            );
            flash::push(jar, FlashLevel::Success, WEATHER_UPDATED_MESSAGE)
        }
        Err(e) => {
            warn!("Weather update from {} failed: {}", state.weather.name(), e);
            flash::push(jar, FlashLevel::Error, WEATHER_FAILED_MESSAGE)
        }
    };
    (jar, redirect_home())
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, PageError> {
    let query = params.query.unwrap_or_default();
    let query = query.trim();

    if query.is_empty() {
        let notice = Flash::new(FlashLevel::Warning, EMPTY_QUERY_MESSAGE);
        return Ok(Html(views::search_page(query, &[], &[notice])));
    }

    let hits = state.index.search(query, SEARCH_LIMIT).await?;
    let mut results = Vec::with_capacity(hits.len());
    for hit in hits {
        match state.storage.get_article(hit.id).await? {
            Some(article) => results.push(article),
            None => debug!("Skipping stale index entry {}", hit.id),
        }
    }

    let notices = if results.is_empty() {
        vec![Flash::new(FlashLevel::Info, NO_RESULTS_MESSAGE)]
    } else {
        Vec::new()
    };
    Ok(Html(views::search_page(query, &results, &notices)))
}
