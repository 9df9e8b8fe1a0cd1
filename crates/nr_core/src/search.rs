use async_trait::async_trait;
use crate::types::IndexEntry;
use crate::Result;

/// Full-text index over news articles. Entries are projections written
/// explicitly after each store write and may lag behind the store.
#[async_trait]
pub trait ArticleIndex: Send + Sync {
    /// Insert or replace the entry for `entry.id`
    async fn index_article(&self, entry: &IndexEntry) -> Result<()>;

    async fn remove_article(&self, id: i64) -> Result<()>;

    /// Entries matching every term of `query`
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<IndexEntry>>;

    /// Drop all entries and index `entries` from scratch
    async fn rebuild(&self, entries: &[IndexEntry]) -> Result<()>;
}

/// Split a user query into lowercase search terms.
pub fn query_terms(query: &str) -> Vec<String> {
    query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_terms() {
        assert_eq!(query_terms("Test"), vec!["test"]);
        assert_eq!(query_terms("  \"Rust\" AND   news! "), vec!["rust", "and", "news"]);
        assert!(query_terms(" * ").is_empty());
    }
}
