use std::fmt;
use nr_core::search::query_terms;
use nr_core::{Analysis, ArticleText, InferenceModel, Result, Sentiment};
use crate::Config;

const POSITIVE_WORDS: &[&str] = &[
    "win", "wins", "growth", "success", "celebrate", "record", "improve", "improves", "rally",
    "hope", "good", "great", "gain", "gains", "recovery", "breakthrough",
];
const NEGATIVE_WORDS: &[&str] = &[
    "loss", "losses", "crisis", "fall", "falls", "death", "dead", "crash", "fear", "bad",
    "decline", "storm", "war", "fire", "scandal", "collapse",
];

/// Offline model for development: extractive summaries and a word-list sentiment.
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub async fn new(_config: Option<Config>) -> Result<Self> {
        Ok(Self)
    }

    fn first_words(content: &str) -> Option<String> {
        // Take first 20 words and join them
        let words: Vec<&str> = content.split_whitespace().take(20).collect();
        (!words.is_empty()).then(|| words.join(" "))
    }

    fn classify(text: &str) -> Sentiment {
        let (mut positive, mut negative) = (0, 0);
        for term in query_terms(text) {
            if POSITIVE_WORDS.contains(&term.as_str()) {
                positive += 1;
            } else if NEGATIVE_WORDS.contains(&term.as_str()) {
                negative += 1;
            }
        }
        match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => Sentiment::Positive,
            std::cmp::Ordering::Less => Sentiment::Negative,
            std::cmp::Ordering::Equal => Sentiment::Neutral,
        }
    }
}

#[async_trait::async_trait]
impl InferenceModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn summarize(&self, article: &ArticleText) -> Result<Option<String>> {
        Ok(Self::first_words(&article.content))
    }

    async fn sentiment_and_summary(&self, article: &ArticleText) -> Result<Analysis> {
        let summary = Self::first_words(&article.content);
        let sentiment = summary
            .as_ref()
            .map(|_| Self::classify(&format!("{} {}", article.title, article.content)));
        Ok(Analysis { summary, sentiment })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(title: &str, content: &str) -> ArticleText {
        ArticleText {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_dummy_model() {
        let model = DummyModel::new(None).await.unwrap();

        let article = text(
            "Test Article",
            "This is a test article. It has multiple sentences. This is the third sentence.",
        );
        let summary = model.summarize(&article).await.unwrap().unwrap();
        assert!(summary.contains("This is a test article"));

        let analysis = model.sentiment_and_summary(&article).await.unwrap();
        assert_eq!(analysis.sentiment, Some(Sentiment::Neutral));
        assert!(analysis.summary.is_some());
    }

    #[tokio::test]
    async fn test_dummy_model_sentiment_and_empty_content() {
        let model = DummyModel::new(None).await.unwrap();

        let analysis = model
            .sentiment_and_summary(&text("Record growth", "Exports hit a record as the recovery gains pace."))
            .await
            .unwrap();
        assert_eq!(analysis.sentiment, Some(Sentiment::Positive));

        let analysis = model
            .sentiment_and_summary(&text("Storm", "The storm caused losses and fear."))
            .await
            .unwrap();
        assert_eq!(analysis.sentiment, Some(Sentiment::Negative));

        assert_eq!(model.summarize(&text("Empty", "   ")).await.unwrap(), None);
        assert_eq!(model.sentiment_and_summary(&text("Empty", "")).await.unwrap(), Analysis::default());
    }
}
