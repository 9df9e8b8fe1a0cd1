use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use nr_core::WeatherSource;
use nr_storage::{create_backend, Backend};
use nr_weather::{OpenMeteoProvider, WeatherConfig};
use nr_web::{create_app, AppState};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Newsroom: articles, search, weather and AI summaries", long_about = None)]
pub struct Cli {
    /// Storage backend: sqlite or memory
    #[arg(long, env = "NEWSROOM_STORAGE", default_value = "sqlite")]
    storage: String,
    /// SQLite database file
    #[arg(long, env = "NEWSROOM_DATABASE", default_value = "news.db")]
    database: PathBuf,
    #[arg(long, env = "NEWSROOM_MODEL", default_value = "deepseek", help = "Model to use for inference. Available models: deepseek (default), dummy")]
    model: String,
    #[arg(long, env = "DEEPSEEK_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    /// Base URL of an OpenAI-compatible chat completions API
    #[arg(long, env = "NEWSROOM_MODEL_URL")]
    model_url: Option<String>,
    /// Upstream model identifier, e.g. deepseek-chat
    #[arg(long, env = "NEWSROOM_CHAT_MODEL")]
    chat_model: Option<String>,
    /// Timeout for AI requests, in seconds
    #[arg(long, env = "NEWSROOM_AI_TIMEOUT", default_value_t = 30)]
    ai_timeout: u64,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the web application
    Serve {
        #[arg(long, env = "NEWSROOM_BIND", default_value = "127.0.0.1:5000")]
        bind: SocketAddr,
        #[command(flatten)]
        weather: WeatherArgs,
    },
    /// Rebuild the search index from stored articles
    Reindex,
    /// Fetch and store current weather once
    Weather {
        #[command(flatten)]
        weather: WeatherArgs,
    },
}

#[derive(Args, Debug)]
struct WeatherArgs {
    #[arg(long, env = "NEWSROOM_LOCATION", default_value = "Buenos Aires")]
    location: String,
    #[arg(long, env = "NEWSROOM_LATITUDE", default_value_t = -34.6037, allow_hyphen_values = true)]
    latitude: f64,
    #[arg(long, env = "NEWSROOM_LONGITUDE", default_value_t = -58.3816, allow_hyphen_values = true)]
    longitude: f64,
    #[arg(long, env = "NEWSROOM_WEATHER_URL", default_value = nr_weather::DEFAULT_BASE_URL)]
    weather_url: String,
}

impl WeatherArgs {
    fn provider(&self) -> nr_core::Result<OpenMeteoProvider> {
        OpenMeteoProvider::new(WeatherConfig {
            location: self.location.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            base_url: self.weather_url.clone(),
            ..WeatherConfig::default()
        })
    }
}

async fn serve(cli: &Cli, backend: Backend, bind: SocketAddr, weather: &WeatherArgs) -> anyhow::Result<()> {
    let indexed = backend.reindex().await.context("failed to build search index")?;
    info!("🔎 Search index ready ({} articles)", indexed);

    let config = nr_inference::Config {
        api_key: cli.api_key.clone(),
        model_name: Some(cli.model.clone()),
        model_url: cli.model_url.clone(),
        chat_model: cli.chat_model.clone(),
        timeout: Duration::from_secs(cli.ai_timeout),
    };
    let inference = nr_inference::create_model(Some(config))
        .await
        .context("failed to initialize inference model")?;
    info!("🧠 Inference model initialized successfully (using {})", inference.name());

    let weather: Arc<dyn WeatherSource> = Arc::new(weather.provider()?);
    info!("🌤️ Weather provider: {}", weather.name());

    let app = create_app(AppState::new(backend, inference, weather));
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {}", bind))?;
    info!("🚀 Listening on http://{}", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    info!("💾 Opening {} storage...", cli.storage);
    let backend = create_backend(&cli.storage, &cli.database).await?;

    match &cli.command {
        Commands::Serve { bind, weather } => serve(&cli, backend, *bind, weather).await?,
        Commands::Reindex => {
            let count = backend.reindex().await?;
            info!("✨ Reindexed {} articles", count);
        }
        Commands::Weather { weather } => {
            let report = weather.provider()?.fetch_current().await?;
            backend.storage.store_weather(&report).await?;
            println!(
                "{}: {:.1}°C (feels like {:.1}°C), {}, humidity {}%, wind {:.1} km/h",
                report.location,
                report.temperature,
                report.feels_like,
                report.condition.description(),
                report.humidity,
                report.wind_speed
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["nr", "--model", "dummy", "serve", "--latitude", "-31.4"]).unwrap();
        assert_eq!(cli.storage, "sqlite");
        assert_eq!(cli.model, "dummy");
        match cli.command {
            Commands::Serve { bind, weather } => {
                assert_eq!(bind.port(), 5000);
                assert_eq!(weather.latitude, -31.4);
                assert_eq!(weather.location, "Buenos Aires");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
