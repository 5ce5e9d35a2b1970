pub mod error;
pub mod types;
pub mod vec_ops;
pub mod encoder;
pub mod fertilizer;
pub mod forest;
pub mod model;
pub mod bundle;
pub mod embedder;
pub mod search;
pub mod forecast;
pub mod weather_types;
pub mod weather;

pub use bundle::{ArtifactPaths, ModelBundle};
pub use error::{AppError, ArtifactError};
pub use fertilizer::optimize_fertilizer;
pub use forecast::predict_yield;
pub use search::recommend_crop;
pub use weather::WeatherClient;

pub mod state;
pub use state::{AppState, ServerConfig, SharedState};
pub mod api;
pub use api::router;
