use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use nr_core::Error;
use serde_json::json;
use crate::views;

pub const INCOMPLETE_AI_RESPONSE: &str = "Incomplete AI response";
pub const ARTICLE_NOT_FOUND: &str = "Article not found";

/// Errors of the JSON API. The body is always `{"error": <message>}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(&'static str),
    IncompleteResponse,
    Upstream { message: &'static str, source: Error },
    Internal(Error),
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self::Internal(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message.to_string()),
            Self::IncompleteResponse => {
                tracing::warn!("AI service returned an incomplete response");
                (StatusCode::INTERNAL_SERVER_ERROR, INCOMPLETE_AI_RESPONSE.to_string())
            }
            Self::Upstream { message, source } => {
                tracing::error!("{}: {}", message, source);
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
            Self::Internal(e) => {
                tracing::error!("Request failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Errors of the HTML pages.
#[derive(Debug)]
pub enum PageError {
    NotFound(&'static str),
    Internal(Error),
}

impl From<Error> for PageError {
    fn from(e: Error) -> Self {
        Self::Internal(e)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Html(views::error_page("Not Found", message)),
            )
                .into_response(),
            Self::Internal(e) => {
                tracing::error!("Page failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(views::error_page("Error", "Something went wrong. Please try again.")),
                )
                    .into_response()
            }
        }
    }
}

/// Message shown to the user for a rejected form.
pub fn form_message(e: &Error) -> String {
    match e {
        Error::Validation(message) => message.clone(),
        Error::InvalidUrl(link) => format!("Invalid link: {}", link),
        other => other.to_string(),
    }
}
