//! OpenMeteoProvider against a mock forecast server.

use nr_core::{WeatherCondition, WeatherSource};
use nr_weather::{OpenMeteoProvider, WeatherConfig};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer) -> OpenMeteoProvider {
    let config = WeatherConfig {
        location: "Córdoba".to_string(),
        latitude: -31.42,
        longitude: -64.18,
        base_url: server.uri(),
        ..WeatherConfig::default()
    };
    OpenMeteoProvider::new(config).unwrap()
}

#[tokio::test]
async fn test_fetch_current_weather() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "-31.42"))
        .and(query_param("longitude", "-64.18"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": -31.42,
            "longitude": -64.18,
            "current": {
                "time": "2026-10-17T12:00",
                "interval": 900,
                "temperature_2m": 23.4,
                "relative_humidity_2m": 57,
                "apparent_temperature": 22.9,
                "weather_code": 61,
                "wind_speed_10m": 14.2
            }
        })))
        .mount(&mock_server)
        .await;

    let report = provider_for(&mock_server).fetch_current().await.unwrap();
    assert_eq!(report.location, "Córdoba");
    assert_eq!(report.temperature, 23.4);
    assert_eq!(report.feels_like, 22.9);
    assert_eq!(report.humidity, 57);
    assert_eq!(report.wind_speed, 14.2);
    assert_eq!(report.condition, WeatherCondition::Rain);
}

#[tokio::test]
async fn test_fetch_current_weather_missing_block() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": -31.42,
            "longitude": -64.18
        })))
        .mount(&mock_server)
        .await;

    let result = provider_for(&mock_server).fetch_current().await;
    assert!(matches!(result, Err(nr_core::Error::Weather(_))));
}

#[tokio::test]
async fn test_fetch_current_weather_upstream_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let result = provider_for(&mock_server).fetch_current().await;
    assert!(matches!(result, Err(nr_core::Error::Http(_))));
}
