use std::sync::Arc;
use nr_core::{ArticleIndex, InferenceModel, Storage, WeatherSource};
use nr_storage::Backend;

/// Collaborators shared by every request.
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub index: Arc<dyn ArticleIndex>,
    pub inference_model: Arc<dyn InferenceModel>,
    pub weather: Arc<dyn WeatherSource>,
}

impl AppState {
    pub fn new(
        backend: Backend,
        inference_model: Arc<dyn InferenceModel>,
        weather: Arc<dyn WeatherSource>,
    ) -> Self {
        Self {
            storage: backend.storage,
            index: backend.index,
            inference_model,
            weather,
        }
    }
}
