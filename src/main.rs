use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use candle_core::Device;
use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use agro_advisor::{
    router, weather::OPENWEATHER_URL, AppState, ModelBundle, ServerConfig, WeatherClient,
};

/// HTTP API for crop recommendation, yield prediction and fertilizer dosing
#[derive(Parser, Debug)]
#[command(name = "agro-advisor", version)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value = "5000")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Directory holding the trained artifacts
    #[arg(long, env = "AGRO_MODELS_DIR", default_value = "models")]
    models_dir: PathBuf,

    /// Training run whose artifacts are served
    #[arg(long, env = "AGRO_RUN_ID", default_value = "1")]
    run_id: u32,

    /// OpenWeatherMap API key
    #[arg(long, env = "OPENWEATHER_API_KEY")]
    weather_api_key: Option<String>,

    /// Current-weather endpoint
    #[arg(long, env = "AGRO_WEATHER_URL", default_value = OPENWEATHER_URL)]
    weather_url: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: Level,
}

impl From<Cli> for ServerConfig {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            models_dir: cli.models_dir,
            run_id: cli.run_id,
            weather_url: cli.weather_url,
            weather_api_key: cli.weather_api_key,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_target(false)
        .compact()
        .init();

    let config = ServerConfig::from(cli);
    info!("Crop advisor v{}", env!("CARGO_PKG_VERSION"));
    info!("  Models dir: {:?}", config.models_dir);
    info!("  Run id:     {}", config.run_id);

    let bundle = match ModelBundle::load(&config.models_dir, config.run_id, Device::Cpu) {
        Ok(bundle) => bundle,
        Err(e) => {
            error!("Error: {e}");
            std::process::exit(1);
        }
    };

    if config.weather_api_key.is_none() {
        tracing::warn!("OPENWEATHER_API_KEY is not set; /weather requests will fail");
    }
    let weather = WeatherClient::new(config.weather_url.clone(), config.weather_api_key.clone())?;

    let app = router(AppState::new(bundle, weather));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
