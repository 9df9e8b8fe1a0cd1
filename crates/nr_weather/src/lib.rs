//! Current weather via the Open-Meteo forecast API.

use std::time::Duration;

pub mod provider;

pub use provider::OpenMeteoProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";

#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// Display name for the location
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            location: "Buenos Aires".to_string(),
            latitude: -34.6037,
            longitude: -58.3816,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}
