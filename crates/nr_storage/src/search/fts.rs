use async_trait::async_trait;
use nr_core::search::query_terms;
use nr_core::{ArticleIndex, Error, IndexEntry, Result};
use sqlx::sqlite::SqlitePool;
use sqlx::Row;

const CREATE_INDEX: &str = r#"
    CREATE VIRTUAL TABLE IF NOT EXISTS article_search USING fts5(
        headline,
        summary,
        tokenize = 'unicode61'
    )
"#;

/// SQLite FTS5 index. The FTS rowid is the article id.
pub struct SqliteSearchIndex {
    pool: SqlitePool,
}

impl SqliteSearchIndex {
    pub async fn new(pool: SqlitePool) -> Result<Self> {
        sqlx::query(CREATE_INDEX)
            .execute(&pool)
            .await
            .map_err(|e| Error::Search(format!("Failed to create search index: {}", e)))?;
        Ok(Self { pool })
    }
}

/// Quote every term so user input never reaches the FTS5 query syntax.
fn match_expression(query: &str) -> Option<String> {
    let terms = query_terms(query);
    if terms.is_empty() {
        return None;
    }
    Some(
        terms
            .iter()
            .map(|t| format!("\"{}\"", t))
            .collect::<Vec<_>>()
            .join(" "),
    )
}

#[async_trait]
impl ArticleIndex for SqliteSearchIndex {
    async fn index_article(&self, entry: &IndexEntry) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Error::Search(format!("Failed to open index transaction: {}", e)))?;

        sqlx::query("DELETE FROM article_search WHERE rowid = ?")
            .bind(entry.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::Search(format!("Failed to replace index entry {}: {}", entry.id, e)))?;

        sqlx::query("INSERT INTO article_search (rowid, headline, summary) VALUES (?, ?, ?)")
            .bind(entry.id)
            .bind(&entry.headline)
            .bind(&entry.summary)
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::Search(format!("Failed to index article {}: {}", entry.id, e)))?;

        tx.commit()
            .await
            .map_err(|e| Error::Search(format!("Failed to commit index entry {}: {}", entry.id, e)))
    }

    async fn remove_article(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM article_search WHERE rowid = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Search(format!("Failed to remove index entry {}: {}", id, e)))?;
        Ok(())
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<IndexEntry>> {
        let Some(expression) = match_expression(query) else {
            return Ok(Vec::new());
        };

        let rows = sqlx::query(
            r#"
            SELECT rowid, headline, summary FROM article_search
            WHERE article_search MATCH ?
            ORDER BY rank
            LIMIT ?
            "#,
        )
        .bind(&expression)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Search(format!("Search for {:?} failed: {}", query, e)))?;

        rows.iter()
            .map(|row| {
                Ok(IndexEntry {
                    id: row.try_get("rowid").map_err(|e| Error::Search(e.to_string()))?,
                    headline: row.try_get("headline").map_err(|e| Error::Search(e.to_string()))?,
                    summary: row.try_get("summary").map_err(|e| Error::Search(e.to_string()))?,
                })
            })
            .collect()
    }

    async fn rebuild(&self, entries: &[IndexEntry]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Error::Search(format!("Failed to open index transaction: {}", e)))?;

        sqlx::query("DELETE FROM article_search")
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::Search(format!("Failed to clear search index: {}", e)))?;

        for entry in entries {
            sqlx::query("INSERT INTO article_search (rowid, headline, summary) VALUES (?, ?, ?)")
                .bind(entry.id)
                .bind(&entry.headline)
                .bind(&entry.summary)
                .execute(&mut *tx)
                .await
                .map_err(|e| Error::Search(format!("Failed to index article {}: {}", entry.id, e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| Error::Search(format!("Failed to commit rebuilt index: {}", e)))?;

        tracing::info!("🔎 Rebuilt search index with {} articles", entries.len());
        Ok(())
    }
}
