use std::time::Duration;

pub mod models;

pub const DEFAULT_MODEL: &str = "deepseek";
pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "deepseek-chat";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    /// Which model implementation to use: "deepseek" or "dummy"
    pub model_name: Option<String>,
    /// Base URL of an OpenAI-compatible chat completions API
    pub model_url: Option<String>,
    /// Model identifier sent upstream
    pub chat_model: Option<String>,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model_name: None,
            model_url: None,
            chat_model: None,
            timeout: Duration::from_secs(30),
        }
    }
}

pub mod prelude {
    pub use super::Config;
    pub use super::models::create_model;
    pub use nr_core::{Analysis, ArticleText, Error, InferenceModel, Result, Sentiment};
}

pub use models::create_model;
