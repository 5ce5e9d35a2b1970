use std::path::PathBuf;
use std::sync::Arc;

use crate::bundle::ModelBundle;
use crate::weather::WeatherClient;

/// Server configuration, filled from the command line and environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the trained artifacts
    pub models_dir: PathBuf,
    /// Selects which training run's artifacts to load
    pub run_id: u32,
    pub weather_url: String,
    pub weather_api_key: Option<String>,
}

/// Shared application state, loaded once at startup
pub struct AppState {
    pub bundle: ModelBundle,
    pub weather: WeatherClient,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(bundle: ModelBundle, weather: WeatherClient) -> SharedState {
        Arc::new(Self { bundle, weather })
    }
}
