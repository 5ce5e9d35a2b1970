use candle_core::Module;

use crate::bundle::ModelBundle;
use crate::embedder::feature_tensor;
use crate::error::AppError;
use crate::types::{FeatureVector, YieldEstimate};

/// Yield estimate from the LSTM, treating the readings as a one-step
/// sequence.
pub fn predict_yield(
    bundle: &ModelBundle,
    features: &FeatureVector,
) -> Result<YieldEstimate, AppError> {
    let sequence = feature_tensor(features, &bundle.device)?.unsqueeze(1)?;
    let out = bundle.lstm.forward(&sequence)?;
    let value = out
        .flatten_all()?
        .to_vec1::<f32>()?
        .first()
        .copied()
        .ok_or_else(|| AppError::Inference("yield model produced no output".into()))?;

    Ok(YieldEstimate { value })
}
