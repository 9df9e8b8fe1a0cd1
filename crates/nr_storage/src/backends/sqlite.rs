use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nr_core::{
    ArticleDraft, ArticleStorage, CommunityArticle, CommunityDraft, CommunityStorage, Error,
    NewsArticle, Result, Sentiment, WeatherCondition, WeatherReport, WeatherStorage,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::{Path, PathBuf};
use crate::search::SqliteSearchIndex;
use crate::StorageBackend;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS news_articles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        headline TEXT NOT NULL,
        summary TEXT NOT NULL DEFAULT '',
        link TEXT NOT NULL,
        ai_summary TEXT,
        sentiment TEXT,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_news_articles_headline ON news_articles (headline)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS community_articles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        link TEXT,
        author TEXT,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS weather_reports (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        location TEXT NOT NULL,
        latitude REAL NOT NULL,
        longitude REAL NOT NULL,
        temperature REAL NOT NULL,
        feels_like REAL NOT NULL,
        humidity INTEGER NOT NULL,
        wind_speed REAL NOT NULL,
        condition TEXT NOT NULL,
        fetched_at TEXT NOT NULL
    )
    "#,
    // Add future migrations here
];

const ARTICLE_COLUMNS: &str = "id, headline, summary, link, ai_summary, sentiment, created_at";
const COMMUNITY_COLUMNS: &str = "id, username, title, content, link, author, created_at";

pub struct SQLiteStorage {
    pool: SqlitePool,
    db_path: PathBuf,
}

impl StorageBackend for SQLiteStorage {
    fn name() -> &'static str {
        "sqlite"
    }

    fn get_error_message() -> &'static str {
        "SQLite database should be writable at the configured path (default ./news.db)"
    }
}

impl SQLiteStorage {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| Error::Database(format!("Failed to connect to database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Database(format!("Failed to run migration {}: {}", i, e)))?;
        }

        tracing::debug!("Opened SQLite database at {}", db_path.display());

        Ok(Self {
            pool,
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    /// Full-text index living in the same database file
    pub async fn search_index(&self) -> Result<SqliteSearchIndex> {
        SqliteSearchIndex::new(self.pool.clone()).await
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Database(format!("Failed to parse date: {}", e)))
}

fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(name)
        .map_err(|e| Error::Database(format!("Failed to read column {}: {}", name, e)))
}

fn row_to_article(row: &SqliteRow) -> Result<NewsArticle> {
    let sentiment: Option<String> = column(row, "sentiment")?;
    Ok(NewsArticle {
        id: column(row, "id")?,
        headline: column(row, "headline")?,
        summary: column(row, "summary")?,
        link: column(row, "link")?,
        ai_summary: column(row, "ai_summary")?,
        sentiment: sentiment.and_then(|s| s.parse::<Sentiment>().ok()),
        created_at: parse_timestamp(&column::<String>(row, "created_at")?)?,
    })
}

fn row_to_community(row: &SqliteRow) -> Result<CommunityArticle> {
    Ok(CommunityArticle {
        id: column(row, "id")?,
        username: column(row, "username")?,
        title: column(row, "title")?,
        content: column(row, "content")?,
        link: column(row, "link")?,
        author: column(row, "author")?,
        created_at: parse_timestamp(&column::<String>(row, "created_at")?)?,
    })
}

fn row_to_weather(row: &SqliteRow) -> Result<WeatherReport> {
    let humidity: i64 = column(row, "humidity")?;
    Ok(WeatherReport {
        location: column(row, "location")?,
        latitude: column(row, "latitude")?,
        longitude: column(row, "longitude")?,
        temperature: column(row, "temperature")?,
        feels_like: column(row, "feels_like")?,
        humidity: humidity.clamp(0, 100) as u8,
        wind_speed: column(row, "wind_speed")?,
        condition: column::<String>(row, "condition")?.parse::<WeatherCondition>()?,
        fetched_at: parse_timestamp(&column::<String>(row, "fetched_at")?)?,
    })
}

#[async_trait]
impl ArticleStorage for SQLiteStorage {
    async fn add_article(&self, draft: &ArticleDraft) -> Result<NewsArticle> {
        let result = sqlx::query(
            r#"
            INSERT INTO news_articles (headline, summary, link, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&draft.headline)
        .bind(&draft.summary)
        .bind(&draft.link)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to store article: {}", e)))?;

        let id = result.last_insert_rowid();
        self.get_article(id)
            .await?
            .ok_or_else(|| Error::Storage(format!("Article {} vanished after insert", id)))
    }

    async fn get_article(&self, id: i64) -> Result<Option<NewsArticle>> {
        let row = sqlx::query(&format!("SELECT {} FROM news_articles WHERE id = ?", ARTICLE_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to get article {}: {}", id, e)))?;

        row.as_ref().map(row_to_article).transpose()
    }

    async fn find_by_headline(&self, headline: &str) -> Result<Option<NewsArticle>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM news_articles WHERE headline = ? ORDER BY id LIMIT 1",
            ARTICLE_COLUMNS
        ))
        .bind(headline)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to find article by headline: {}", e)))?;

        row.as_ref().map(row_to_article).transpose()
    }

    async fn list_articles(&self) -> Result<Vec<NewsArticle>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM news_articles ORDER BY created_at DESC, id DESC",
            ARTICLE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to list articles: {}", e)))?;

        rows.iter().map(row_to_article).collect()
    }

    async fn update_article(&self, id: i64, draft: &ArticleDraft) -> Result<Option<NewsArticle>> {
        let result = sqlx::query(
            r#"
            UPDATE news_articles SET headline = ?, summary = ?, link = ?
            WHERE id = ?
            "#,
        )
        .bind(&draft.headline)
        .bind(&draft.summary)
        .bind(&draft.link)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to update article {}: {}", id, e)))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_article(id).await
    }

    async fn set_enrichment(
        &self,
        id: i64,
        ai_summary: &str,
        sentiment: Sentiment,
    ) -> Result<Option<NewsArticle>> {
        let result = sqlx::query("UPDATE news_articles SET ai_summary = ?, sentiment = ? WHERE id = ?")
            .bind(ai_summary)
            .bind(sentiment.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to enrich article {}: {}", id, e)))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_article(id).await
    }

    async fn delete_article(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM news_articles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to delete article {}: {}", id, e)))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CommunityStorage for SQLiteStorage {
    async fn add_community_article(&self, draft: &CommunityDraft) -> Result<CommunityArticle> {
        let result = sqlx::query(
            r#"
            INSERT INTO community_articles (username, title, content, link, author, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&draft.username)
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(draft.link.as_deref())
        .bind(draft.author.as_deref())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to store community article: {}", e)))?;

        let id = result.last_insert_rowid();
        self.get_community_article(id)
            .await?
            .ok_or_else(|| Error::Storage(format!("Community article {} vanished after insert", id)))
    }

    async fn get_community_article(&self, id: i64) -> Result<Option<CommunityArticle>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM community_articles WHERE id = ?",
            COMMUNITY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get community article {}: {}", id, e)))?;

        row.as_ref().map(row_to_community).transpose()
    }

    async fn list_community_articles(&self) -> Result<Vec<CommunityArticle>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM community_articles ORDER BY created_at DESC, id DESC",
            COMMUNITY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to list community articles: {}", e)))?;

        rows.iter().map(row_to_community).collect()
    }

    async fn update_community_article(
        &self,
        id: i64,
        draft: &CommunityDraft,
    ) -> Result<Option<CommunityArticle>> {
        let result = sqlx::query(
            r#"
            UPDATE community_articles
            SET username = ?, title = ?, content = ?, link = ?, author = ?
            WHERE id = ?
            "#,
        )
        .bind(&draft.username)
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(draft.link.as_deref())
        .bind(draft.author.as_deref())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to update community article {}: {}", id, e)))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_community_article(id).await
    }

    async fn delete_community_article(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM community_articles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to delete community article {}: {}", id, e)))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl WeatherStorage for SQLiteStorage {
    async fn store_weather(&self, report: &WeatherReport) -> Result<()> {
        let condition = serde_json::to_value(report.condition)?;

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO weather_reports
            (id, location, latitude, longitude, temperature, feels_like, humidity, wind_speed, condition, fetched_at)
            VALUES (1, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&report.location)
        .bind(report.latitude)
        .bind(report.longitude)
        .bind(report.temperature)
        .bind(report.feels_like)
        .bind(i64::from(report.humidity))
        .bind(report.wind_speed)
        .bind(condition.as_str().unwrap_or("clear"))
        .bind(report.fetched_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to store weather: {}", e)))?;

        Ok(())
    }

    async fn latest_weather(&self) -> Result<Option<WeatherReport>> {
        let row = sqlx::query("SELECT * FROM weather_reports WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to load weather: {}", e)))?;

        row.as_ref().map(row_to_weather).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn draft(headline: &str) -> ArticleDraft {
        ArticleDraft::new(Some(headline), Some("Summary"), Some("http://example.com/test")).unwrap()
    }

    #[tokio::test]
    async fn test_sqlite_storage() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let storage = SQLiteStorage::new_with_path(&db_path).await.unwrap();
        assert_eq!(storage.get_db_path(), db_path.as_path());

        let article = storage.add_article(&draft("New Article")).await.unwrap();
        let found = storage.find_by_headline("New Article").await.unwrap().unwrap();
        assert_eq!(found, article);
        assert_eq!(found.ai_summary, None);

        let updated = storage.update_article(article.id, &draft("Updated")).await.unwrap().unwrap();
        assert_eq!(updated.headline, "Updated");
        assert_eq!(updated.summary, "Summary");
        assert_eq!(updated.created_at, article.created_at);

        let enriched = storage
            .set_enrichment(article.id, "Short version", Sentiment::Positive)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(enriched.ai_summary.as_deref(), Some("Short version"));
        assert_eq!(enriched.sentiment, Some(Sentiment::Positive));

        assert!(storage.delete_article(article.id).await.unwrap());
        assert!(storage.get_article(article.id).await.unwrap().is_none());
        assert!(storage.set_enrichment(article.id, "x", Sentiment::Neutral).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sqlite_storage_reopens_existing_database() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("nested").join("news.db");

        {
            let storage = SQLiteStorage::new_with_path(&db_path).await.unwrap();
            storage.add_article(&draft("Persisted")).await.unwrap();
        }

        let storage = SQLiteStorage::new_with_path(&db_path).await.unwrap();
        let articles = storage.list_articles().await.unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].headline, "Persisted");
    }

    #[tokio::test]
    async fn test_sqlite_community_articles() {
        let temp_dir = tempdir().unwrap();
        let storage = SQLiteStorage::new_with_path(&temp_dir.path().join("test.db")).await.unwrap();

        let draft = CommunityDraft::new(
            Some("TestUser"),
            Some("New Community Article"),
            Some("Community content"),
            Some("http://example.com"),
            Some("Test Author"),
        )
        .unwrap();
        let added = storage.add_community_article(&draft).await.unwrap();
        let found = storage.get_community_article(added.id).await.unwrap().unwrap();
        assert_eq!(found.title, "New Community Article");
        assert_eq!(found.id, added.id);
        assert_eq!(found.author.as_deref(), Some("Test Author"));

        let edited = CommunityDraft::new(Some("TestUser"), Some("Edited"), Some("Body"), None, None).unwrap();
        let updated = storage.update_community_article(added.id, &edited).await.unwrap().unwrap();
        assert_eq!(updated.title, "Edited");
        assert_eq!(updated.link, None);

        assert!(storage.delete_community_article(added.id).await.unwrap());
        assert!(storage.list_community_articles().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_weather_keeps_latest_report() {
        let temp_dir = tempdir().unwrap();
        let storage = SQLiteStorage::new_with_path(&temp_dir.path().join("test.db")).await.unwrap();
        assert!(storage.latest_weather().await.unwrap().is_none());

        let mut report = WeatherReport {
            location: "Buenos Aires".to_string(),
            latitude: -34.6,
            longitude: -58.38,
            temperature: 21.5,
            feels_like: 20.0,
            humidity: 60,
            wind_speed: 12.0,
            condition: WeatherCondition::PartlyCloudy,
            fetched_at: Utc::now(),
        };
        storage.store_weather(&report).await.unwrap();

        report.temperature = 25.0;
        report.condition = WeatherCondition::Thunderstorm;
        storage.store_weather(&report).await.unwrap();

        let latest = storage.latest_weather().await.unwrap().unwrap();
        assert_eq!(latest.temperature, 25.0);
        assert_eq!(latest.condition, WeatherCondition::Thunderstorm);
        assert_eq!(latest.humidity, 60);
    }
}
