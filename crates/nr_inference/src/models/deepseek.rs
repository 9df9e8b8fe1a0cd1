use async_trait::async_trait;
use nr_core::{Analysis, ArticleText, Error, InferenceModel, Result, Sentiment};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use crate::{Config, DEFAULT_BASE_URL, DEFAULT_CHAT_MODEL};

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

#[derive(Deserialize)]
struct RawAnalysis {
    summary: Option<String>,
    sentiment: Option<String>,
}

const SYSTEM_PROMPT: &str = "You are a news editor. Answer concisely and never invent facts.";

/// Client for the DeepSeek chat completions API (or any OpenAI-compatible endpoint).
pub struct DeepSeekModel {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
    chat_model: String,
}

impl DeepSeekModel {
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::Inference("DeepSeek API key is required".to_string()))?;

        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client: Arc::new(client),
            api_key,
            base_url: config
                .model_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            chat_model: config
                .chat_model
                .clone()
                .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
        })
    }

    async fn chat(&self, prompt: String, json_reply: bool) -> Result<Option<String>> {
        let request = ChatRequest {
            model: self.chat_model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt,
                },
            ],
            temperature: 0.2,
            response_format: json_reply.then(|| ResponseFormat {
                kind: "json_object".to_string(),
            }),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<ChatResponse>()
            .await?;

        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty()))
    }
}

impl fmt::Debug for DeepSeekModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeepSeekModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("chat_model", &self.chat_model)
            .finish()
    }
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read a sentiment/summary reply. Accepts a JSON object (optionally inside a
/// code fence) or `Sentiment:` / `Summary:` lines. Unrecognised parts are
/// left empty.
pub(crate) fn parse_analysis(reply: &str) -> Analysis {
    let body = strip_code_fence(reply);

    let raw = serde_json::from_str::<RawAnalysis>(body).unwrap_or_else(|_| {
        let mut raw = RawAnalysis {
            summary: None,
            sentiment: None,
        };
        for line in body.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            match key.trim().to_ascii_lowercase().as_str() {
                "sentiment" => raw.sentiment = Some(value.to_string()),
                "summary" => raw.summary = Some(value.to_string()),
                _ => {}
            }
        }
        raw
    });

    let sentiment = non_empty(raw.sentiment).and_then(|label| match label.parse::<Sentiment>() {
        Ok(sentiment) => Some(sentiment),
        Err(e) => {
            tracing::warn!("Discarding sentiment label from model: {}", e);
            None
        }
    });

    Analysis {
        summary: non_empty(raw.summary),
        sentiment,
    }
}

#[async_trait]
impl InferenceModel for DeepSeekModel {
    fn name(&self) -> &str {
        "DeepSeek"
    }

    async fn summarize(&self, article: &ArticleText) -> Result<Option<String>> {
        let prompt = format!(
            "Summarize the following news article in two or three sentences.\n\nTitle: {}\n\nContent: {}\n\nSummary:",
            article.title, article.content
        );
        let summary = self.chat(prompt, false).await?;
        tracing::debug!("DeepSeek summary for {:?}: {:?}", article.title, summary);
        Ok(summary)
    }

    async fn sentiment_and_summary(&self, article: &ArticleText) -> Result<Analysis> {
        let prompt = format!(
            "Classify the overall sentiment of the following news article as Positive, Negative or Neutral \
             and summarize it in two or three sentences. Reply with a JSON object of the form \
             {{\"sentiment\": \"Positive\", \"summary\": \"...\"}}.\n\nTitle: {}\n\nContent: {}",
            article.title, article.content
        );

        let Some(reply) = self.chat(prompt, true).await? else {
            return Ok(Analysis::default());
        };
        Ok(parse_analysis(&reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_requires_api_key() {
        let result = DeepSeekModel::new(&Config::default());
        assert_eq!(
            result.unwrap_err().to_string(),
            "Inference error: DeepSeek API key is required"
        );

        let config = Config {
            api_key: Some("test-key".to_string()),
            model_url: Some("http://localhost:9999/v1/".to_string()),
            ..Config::default()
        };
        let model = DeepSeekModel::new(&config).unwrap();
        assert_eq!(model.base_url, "http://localhost:9999/v1");
        assert!(!format!("{:?}", model).contains("test-key"));
    }

    #[test]
    fn test_parse_analysis_json() {
        let analysis = parse_analysis(r#"{"sentiment": "positive", "summary": " Markets rallied. "}"#);
        assert_eq!(analysis.sentiment, Some(Sentiment::Positive));
        assert_eq!(analysis.summary.as_deref(), Some("Markets rallied."));
    }

    #[test]
    fn test_parse_analysis_fenced_json() {
        let reply = "```json\n{\"sentiment\": \"Negative\", \"summary\": \"Storm damage.\"}\n```";
        let analysis = parse_analysis(reply);
        assert_eq!(analysis.sentiment, Some(Sentiment::Negative));
        assert_eq!(analysis.summary.as_deref(), Some("Storm damage."));
    }

    #[test]
    fn test_parse_analysis_labelled_lines() {
        let analysis = parse_analysis("Sentiment: Neutral\nSummary: Council met on Tuesday.");
        assert_eq!(analysis.sentiment, Some(Sentiment::Neutral));
        assert_eq!(analysis.summary.as_deref(), Some("Council met on Tuesday."));
    }

    #[test]
    fn test_parse_analysis_incomplete() {
        let analysis = parse_analysis(r#"{"sentiment": "bittersweet", "summary": "Mixed news."}"#);
        assert_eq!(analysis.sentiment, None);
        assert_eq!(analysis.summary.as_deref(), Some("Mixed news."));

        assert_eq!(parse_analysis("no idea"), Analysis::default());
    }
}
