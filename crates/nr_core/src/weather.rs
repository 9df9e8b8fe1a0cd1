use async_trait::async_trait;
use crate::types::WeatherReport;
use crate::Result;

#[async_trait]
pub trait WeatherSource: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch current conditions for the configured location
    async fn fetch_current(&self) -> Result<WeatherReport>;
}
