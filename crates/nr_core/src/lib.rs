pub mod error;
pub mod models;
pub mod search;
pub mod storage;
pub mod types;
pub mod weather;

pub use error::{Error, Result};
pub use models::InferenceModel;
pub use search::ArticleIndex;
pub use storage::{ArticleStorage, CommunityStorage, Storage, WeatherStorage};
pub use types::*;
pub use weather::WeatherSource;
