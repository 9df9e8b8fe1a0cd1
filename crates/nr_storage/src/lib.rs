use nr_core::{ArticleIndex, Error, IndexEntry, Result, Storage};
use std::path::Path;
use std::sync::Arc;

pub mod backends;
pub mod search;

pub use backends::MemoryStorage;
pub use search::MemorySearchIndex;

#[cfg(feature = "sqlite")]
pub use backends::SQLiteStorage;
#[cfg(feature = "sqlite")]
pub use search::SqliteSearchIndex;

pub trait StorageBackend: Send + Sync {
    fn name() -> &'static str;
    fn get_error_message() -> &'static str;
}

/// A store together with the full-text index kept alongside it.
#[derive(Clone)]
pub struct Backend {
    pub storage: Arc<dyn Storage>,
    pub index: Arc<dyn ArticleIndex>,
}

impl Backend {
    /// Re-index every stored article. Returns the number of entries written.
    pub async fn reindex(&self) -> Result<usize> {
        let entries: Vec<IndexEntry> = self
            .storage
            .list_articles()
            .await?
            .iter()
            .map(IndexEntry::from)
            .collect();
        self.index.rebuild(&entries).await?;
        Ok(entries.len())
    }
}

/// Open the backend named `kind` ("sqlite" or "memory").
pub async fn create_backend(kind: &str, db_path: &Path) -> Result<Backend> {
    match kind {
        "memory" => {
            tracing::info!("🏦 Using {} storage", MemoryStorage::name());
            Ok(Backend {
                storage: Arc::new(MemoryStorage::new()),
                index: Arc::new(MemorySearchIndex::new()),
            })
        }
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let storage = SQLiteStorage::new_with_path(db_path).await.map_err(|e| {
                tracing::error!("{}", SQLiteStorage::get_error_message());
                e
            })?;
            let index = storage.search_index().await?;
            tracing::info!(
                "🏦 Using {} storage at {}",
                SQLiteStorage::name(),
                storage.get_db_path().display()
            );
            Ok(Backend {
                storage: Arc::new(storage),
                index: Arc::new(index),
            })
        }
        other => Err(Error::Storage(format!(
            "Unknown storage backend: {} (expected sqlite or memory)",
            other
        ))),
    }
}

pub mod prelude {
    pub use super::{create_backend, Backend, MemorySearchIndex, MemoryStorage, StorageBackend};

    #[cfg(feature = "sqlite")]
    pub use super::{SQLiteStorage, SqliteSearchIndex};
}

#[cfg(test)]
mod tests {
    use super::*;
    use nr_core::ArticleDraft;

    #[tokio::test]
    async fn test_create_backend_rejects_unknown_kind() {
        let result = create_backend("chroma", Path::new("unused.db")).await;
        assert!(matches!(result, Err(Error::Storage(_))));
    }

    #[tokio::test]
    async fn test_reindex_projects_stored_articles() {
        let backend = create_backend("memory", Path::new("unused.db")).await.unwrap();
        let draft = ArticleDraft::new(Some("Indexed later"), Some("Body"), Some("http://example.com")).unwrap();
        backend.storage.add_article(&draft).await.unwrap();
        assert!(backend.index.search("indexed", 10).await.unwrap().is_empty());

        assert_eq!(backend.reindex().await.unwrap(), 1);
        assert_eq!(backend.index.search("indexed", 10).await.unwrap().len(), 1);
    }
}
