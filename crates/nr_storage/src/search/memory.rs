use async_trait::async_trait;
use nr_core::search::query_terms;
use nr_core::{ArticleIndex, IndexEntry, Result};
use std::collections::{BTreeMap, HashSet};
use tokio::sync::RwLock;

/// Token-matching index used with the memory backend.
#[derive(Default)]
pub struct MemorySearchIndex {
    entries: RwLock<BTreeMap<i64, IndexEntry>>,
}

impl MemorySearchIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(entry: &IndexEntry, terms: &[String]) -> bool {
    let tokens: HashSet<String> = query_terms(&entry.headline)
        .into_iter()
        .chain(query_terms(&entry.summary))
        .collect();
    terms.iter().all(|t| tokens.contains(t))
}

#[async_trait]
impl ArticleIndex for MemorySearchIndex {
    async fn index_article(&self, entry: &IndexEntry) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn remove_article(&self, id: i64) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.remove(&id);
        Ok(())
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<IndexEntry>> {
        let terms = query_terms(query);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let entries = self.entries.read().await;
        Ok(entries
            .values()
            .filter(|entry| matches(entry, &terms))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn rebuild(&self, new_entries: &[IndexEntry]) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.clear();
        entries.extend(new_entries.iter().map(|e| (e.id, e.clone())));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, headline: &str, summary: &str) -> IndexEntry {
        IndexEntry {
            id,
            headline: headline.to_string(),
            summary: summary.to_string(),
        }
    }

    #[tokio::test]
    async fn test_memory_index_matches_whole_words() {
        let index = MemorySearchIndex::new();
        index.index_article(&entry(1, "Test Article", "Test summary for search")).await.unwrap();
        index.index_article(&entry(2, "Testing times", "Markets fall")).await.unwrap();

        let hits = index.search("test", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].headline, "Test Article");

        assert_eq!(index.search("markets testing", 10).await.unwrap()[0].id, 2);
        assert!(index.search("NoMatch", 10).await.unwrap().is_empty());
        assert!(index.search("   ", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_index_remove_and_rebuild() {
        let index = MemorySearchIndex::new();
        index.index_article(&entry(1, "Rust news", "")).await.unwrap();
        index.remove_article(1).await.unwrap();
        assert!(index.search("rust", 10).await.unwrap().is_empty());

        index.rebuild(&[entry(7, "Rust again", "")]).await.unwrap();
        assert_eq!(index.search("rust", 10).await.unwrap()[0].id, 7);
    }
}
