use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures while loading the model artifacts at startup.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("{artifact} file '{}' not found. Run the training step first.", .path.display())]
    NotFound { artifact: &'static str, path: PathBuf },

    #[error("failed to read {artifact} file '{}': {source}", .path.display())]
    Io {
        artifact: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {artifact}: {source}")]
    Json {
        artifact: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode {artifact}: {source}")]
    Bincode {
        artifact: &'static str,
        #[source]
        source: bincode::Error,
    },

    #[error("failed to build {artifact}: {source}")]
    Tensor {
        artifact: &'static str,
        #[source]
        source: candle_core::Error,
    },

    #[error("invalid {artifact}: {reason}")]
    Invalid { artifact: &'static str, reason: String },
}

pub type ArtifactResult<T> = Result<T, ArtifactError>;

/// Failures while serving a single request. Every variant is reported to the
/// client as a 500 with `{"error": message}`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("{0}")]
    Upstream(String),
}

impl From<candle_core::Error> for AppError {
    fn from(e: candle_core::Error) -> Self {
        AppError::Inference(e.to_string())
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        tracing::error!("request failed: {message}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": message })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_file_and_remediation() {
        let err = ArtifactError::NotFound {
            artifact: "LSTM model",
            path: PathBuf::from("models/lstm_run1.safetensors"),
        };
        let msg = err.to_string();
        assert!(msg.contains("LSTM model"));
        assert!(msg.contains("models/lstm_run1.safetensors"));
        assert!(msg.contains("training step"));
    }

    #[test]
    fn every_app_error_is_a_500() {
        let resp = AppError::Upstream("API Error: city not found".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
