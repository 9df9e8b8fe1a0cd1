//! DeepSeekModel against a mock chat completions server.

use nr_core::{ArticleText, InferenceModel, Sentiment};
use nr_inference::models::DeepSeekModel;
use nr_inference::Config;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn model_for(server: &MockServer) -> DeepSeekModel {
    let config = Config {
        api_key: Some("test-key".to_string()),
        model_url: Some(format!("{}/v1", server.uri())),
        ..Config::default()
    };
    DeepSeekModel::new(&config).unwrap()
}

fn completion(content: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content }, "finish_reason": "stop" }
        ]
    })
}

fn article() -> ArticleText {
    ArticleText {
        title: "Test Title".to_string(),
        content: "Test content of the article.".to_string(),
    }
}

#[tokio::test]
async fn test_summarize_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({ "model": "deepseek-chat" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            serde_json::json!("  This is a mock summary.  "),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let summary = model_for(&mock_server).summarize(&article()).await.unwrap();
    assert_eq!(summary.as_deref(), Some("This is a mock summary."));
}

#[tokio::test]
async fn test_summarize_without_content_is_incomplete() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(serde_json::Value::Null)))
        .mount(&mock_server)
        .await;

    let summary = model_for(&mock_server).summarize(&article()).await.unwrap();
    assert_eq!(summary, None);
}

#[tokio::test]
async fn test_summarize_upstream_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let result = model_for(&mock_server).summarize(&article()).await;
    assert!(matches!(result, Err(nr_core::Error::Http(_))));
}

#[tokio::test]
async fn test_sentiment_and_summary_requests_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(serde_json::json!({ "response_format": { "type": "json_object" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(serde_json::json!(
            "{\"sentiment\": \"Positive\", \"summary\": \"This is a mock AI summary.\"}"
        ))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let analysis = model_for(&mock_server)
        .sentiment_and_summary(&article())
        .await
        .unwrap();
    assert_eq!(analysis.sentiment, Some(Sentiment::Positive));
    assert_eq!(analysis.summary.as_deref(), Some("This is a mock AI summary."));
}

#[tokio::test]
async fn test_sentiment_and_summary_empty_choices() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })))
        .mount(&mock_server)
        .await;

    let analysis = model_for(&mock_server)
        .sentiment_and_summary(&article())
        .await
        .unwrap();
    assert_eq!(analysis.summary, None);
    assert_eq!(analysis.sentiment, None);
}
