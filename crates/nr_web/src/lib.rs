use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod flash;
pub mod handlers;
pub mod state;
pub mod views;

pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::index))
        .route("/add", post(handlers::add_article))
        .route("/edit/:id", get(handlers::edit_article_form).post(handlers::edit_article))
        .route("/delete/:id", post(handlers::delete_article))
        .route("/add_community", post(handlers::add_community_article))
        .route("/community/:id/edit", get(handlers::edit_community_form))
        .route("/edit_community/:id", post(handlers::edit_community_article))
        .route("/delete_community/:id", post(handlers::delete_community_article))
        .route("/update_weather", post(handlers::update_weather))
        .route("/search", get(handlers::search))
        .route("/api/summary", post(api::summary))
        .route("/api/sentiment-and-summary", post(api::sentiment_and_summary))
        .route("/api/articles", get(api::list_articles))
        .route("/api/articles/:id", get(api::get_article))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use nr_core::{Error, NewsArticle, Result};
    pub use crate::{create_app, AppState};
}
