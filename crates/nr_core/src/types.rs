use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// A site-authored news article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: i64,
    pub headline: String,
    pub summary: String,
    pub link: String,
    pub ai_summary: Option<String>,
    pub sentiment: Option<Sentiment>,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating or replacing the editable fields of a
/// [`NewsArticle`]. AI enrichment fields are never touched through a draft.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleDraft {
    pub headline: String,
    pub summary: String,
    pub link: String,
}

impl ArticleDraft {
    pub fn new(headline: Option<&str>, summary: Option<&str>, link: Option<&str>) -> Result<Self> {
        let headline = required(headline);
        let link = required(link);
        let (Some(headline), Some(link)) = (headline, link) else {
            return Err(Error::Validation("Headline and link are required.".to_string()));
        };

        Ok(Self {
            headline,
            summary: summary.map(str::trim).unwrap_or_default().to_string(),
            link: parse_link(&link)?,
        })
    }
}

/// A community-submitted article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityArticle {
    pub id: i64,
    pub username: String,
    pub title: String,
    pub content: String,
    pub link: Option<String>,
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommunityDraft {
    pub username: String,
    pub title: String,
    pub content: String,
    pub link: Option<String>,
    pub author: Option<String>,
}

impl CommunityDraft {
    pub fn new(
        username: Option<&str>,
        title: Option<&str>,
        content: Option<&str>,
        link: Option<&str>,
        author: Option<&str>,
    ) -> Result<Self> {
        let (Some(username), Some(title), Some(content)) =
            (required(username), required(title), required(content))
        else {
            return Err(Error::Validation(
                "Username, title and content are required.".to_string(),
            ));
        };

        let link = match required(link) {
            Some(link) => Some(parse_link(&link)?),
            None => None,
        };

        Ok(Self {
            username,
            title,
            content,
            link,
            author: required(author),
        })
    }
}

fn required(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Only http(s) links are rendered into pages.
fn parse_link(link: &str) -> Result<String> {
    let url = url::Url::parse(link).map_err(|e| Error::InvalidUrl(format!("{}: {}", link, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(link.to_string()),
        other => Err(Error::InvalidUrl(format!("{}: unsupported scheme {}", link, other))),
    }
}

/// Sentiment label attached to an article by the AI service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            "neutral" => Ok(Self::Neutral),
            other => Err(Error::Inference(format!("Unknown sentiment label: {}", other))),
        }
    }
}

/// Projection of a [`NewsArticle`] kept in the full-text index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: i64,
    pub headline: String,
    pub summary: String,
}

impl From<&NewsArticle> for IndexEntry {
    fn from(article: &NewsArticle) -> Self {
        Self {
            id: article.id,
            headline: article.headline.clone(),
            summary: article.summary.clone(),
        }
    }
}

/// Text handed to the AI service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleText {
    pub title: String,
    pub content: String,
}

/// Combined AI output. Either field may be missing when the upstream reply
/// is incomplete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub summary: Option<String>,
    pub sentiment: Option<Sentiment>,
}

/// Weather condition categories mapped from WMO codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    HeavyRain,
    Snow,
    Sleet,
    Thunderstorm,
}

impl WeatherCondition {
    /// See: https://open-meteo.com/en/docs#weathervariables
    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            0 => Self::Clear,
            1..=2 => Self::PartlyCloudy,
            3 => Self::Cloudy,
            45 | 48 => Self::Fog,
            51 | 53 | 55 => Self::Drizzle,
            56 | 57 | 66 | 67 => Self::Sleet,
            61 | 63 | 80 => Self::Rain,
            65 | 81 | 82 => Self::HeavyRain,
            71 | 73 | 75 | 77 | 85 | 86 => Self::Snow,
            95 | 96 | 99 => Self::Thunderstorm,
            _ => Self::Clear,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::Snow => "Snow",
            Self::Sleet => "Sleet",
            Self::Thunderstorm => "Thunderstorm",
        }
    }
}

impl FromStr for WeatherCondition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        serde_json::from_value(serde_json::Value::String(s.to_string()))
            .map_err(|_| Error::Weather(format!("Unknown weather condition: {}", s)))
    }
}

/// Current conditions at the configured location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub condition: WeatherCondition,
    pub fetched_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_draft_requires_headline_and_link() {
        let err = ArticleDraft::new(Some("  "), Some("Summary"), Some("http://example.com")).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = ArticleDraft::new(Some("Headline"), None, None).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Headline and link are required.");

        let draft = ArticleDraft::new(Some(" Headline "), None, Some("http://example.com")).unwrap();
        assert_eq!(draft.headline, "Headline");
        assert_eq!(draft.summary, "");
    }

    #[test]
    fn test_article_draft_rejects_relative_link() {
        let err = ArticleDraft::new(Some("Headline"), None, Some("not a url")).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_drafts_reject_script_links() {
        for link in ["javascript:alert(document.cookie)", "data:text/html,<b>x</b>", "JavaScript:alert(1)"] {
            let err = ArticleDraft::new(Some("Headline"), None, Some(link)).unwrap_err();
            assert!(matches!(err, Error::InvalidUrl(_)), "accepted {}", link);

            let err = CommunityDraft::new(Some("User"), Some("Title"), Some("Content"), Some(link), None)
                .unwrap_err();
            assert!(matches!(err, Error::InvalidUrl(_)), "accepted {}", link);
        }
        assert!(ArticleDraft::new(Some("Headline"), None, Some("https://example.com/a")).is_ok());
    }

    #[test]
    fn test_community_draft_optional_fields() {
        let draft = CommunityDraft::new(
            Some("TestUser"),
            Some("Title"),
            Some("Content"),
            Some(""),
            None,
        )
        .unwrap();
        assert_eq!(draft.link, None);
        assert_eq!(draft.author, None);

        let err = CommunityDraft::new(Some("TestUser"), None, Some("Content"), None, None).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_sentiment_parsing() {
        assert_eq!("Positive".parse::<Sentiment>().unwrap(), Sentiment::Positive);
        assert_eq!(" negative ".parse::<Sentiment>().unwrap(), Sentiment::Negative);
        assert_eq!("NEUTRAL".parse::<Sentiment>().unwrap(), Sentiment::Neutral);
        assert!("ecstatic".parse::<Sentiment>().is_err());
        assert_eq!(serde_json::to_string(&Sentiment::Positive).unwrap(), "\"Positive\"");
    }

    #[test]
    fn test_wmo_code_mapping() {
        assert_eq!(WeatherCondition::from_wmo_code(0), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::from_wmo_code(2), WeatherCondition::PartlyCloudy);
        assert_eq!(WeatherCondition::from_wmo_code(48), WeatherCondition::Fog);
        assert_eq!(WeatherCondition::from_wmo_code(66), WeatherCondition::Sleet);
        assert_eq!(WeatherCondition::from_wmo_code(82), WeatherCondition::HeavyRain);
        assert_eq!(WeatherCondition::from_wmo_code(96), WeatherCondition::Thunderstorm);
        assert_eq!(WeatherCondition::from_wmo_code(-1), WeatherCondition::Clear);
    }

    #[test]
    fn test_weather_condition_round_trips_through_label() {
        let label = serde_json::to_value(WeatherCondition::PartlyCloudy).unwrap();
        assert_eq!(label, "partly_cloudy");
        assert_eq!(
            "partly_cloudy".parse::<WeatherCondition>().unwrap(),
            WeatherCondition::PartlyCloudy
        );
    }
}
