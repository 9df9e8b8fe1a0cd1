pub mod memory;

#[cfg(feature = "sqlite")]
pub mod fts;

pub use memory::MemorySearchIndex;

#[cfg(feature = "sqlite")]
pub use fts::SqliteSearchIndex;
