use async_trait::async_trait;
use chrono::Utc;
use nr_core::{Error, Result, WeatherCondition, WeatherReport, WeatherSource};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use crate::WeatherConfig;

const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,apparent_temperature,weather_code,wind_speed_10m";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<CurrentBlock>,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    apparent_temperature: f64,
    weather_code: i32,
    wind_speed_10m: f64,
}

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    client: Arc<Client>,
    config: WeatherConfig,
}

impl OpenMeteoProvider {
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client: Arc::new(client),
            config,
        })
    }

    fn to_report(&self, current: CurrentBlock) -> WeatherReport {
        WeatherReport {
            location: self.config.location.clone(),
            latitude: self.config.latitude,
            longitude: self.config.longitude,
            temperature: current.temperature_2m,
            feels_like: current.apparent_temperature,
            humidity: current.relative_humidity_2m.round().clamp(0.0, 100.0) as u8,
            wind_speed: current.wind_speed_10m,
            condition: WeatherCondition::from_wmo_code(current.weather_code),
            fetched_at: Utc::now(),
        }
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoProvider {
    fn name(&self) -> &str {
        "Open-Meteo"
    }

    async fn fetch_current(&self) -> Result<WeatherReport> {
        let url = format!("{}/v1/forecast", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(url)
            .query(&[
                ("latitude", self.config.latitude.to_string()),
                ("longitude", self.config.longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<ForecastResponse>()
            .await?;

        let current = response
            .current
            .ok_or_else(|| Error::Weather("Forecast response has no current conditions".to_string()))?;

        let report = self.to_report(current);
        tracing::debug!(
            "Weather for {}: {:.1}°C {}",
            report.location,
            report.temperature,
            report.condition.description()
        );
        Ok(report)
    }
}
