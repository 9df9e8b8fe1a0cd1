use std::sync::Arc;
use nr_core::{Error, InferenceModel, Result};
use crate::{Config, DEFAULT_MODEL};

pub mod deepseek;
pub mod dummy;

pub use deepseek::DeepSeekModel;
pub use dummy::DummyModel;

pub async fn create_model(config: Option<Config>) -> Result<Arc<dyn InferenceModel>> {
    let config = config.unwrap_or_default();
    let model_name = config
        .model_name
        .clone()
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    match model_name.as_str() {
        "deepseek" => Ok(Arc::new(DeepSeekModel::new(&config)?)),
        "dummy" => Ok(Arc::new(DummyModel::new(Some(config)).await?)),
        other => Err(Error::Inference(format!(
            "Unknown inference model: {} (available: deepseek, dummy)",
            other
        ))),
    }
}
