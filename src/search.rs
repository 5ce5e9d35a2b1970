use tracing::debug;

use crate::bundle::ModelBundle;
use crate::embedder::embed;
use crate::error::AppError;
use crate::types::{CropRecommendation, FeatureVector};
use crate::vec_ops::top_k;

pub const TOP_CROPS: usize = 3;

/// Top three crops for the given readings, most probable first.
///
/// `season` is accepted for parity with the fertilizer table but does not
/// influence the ranking.
pub fn recommend_crop(
    bundle: &ModelBundle,
    features: &FeatureVector,
    season: &str,
) -> Result<CropRecommendation, AppError> {
    debug!("recommending crops for season {season}");

    let embedding = embed(&bundle.embedding_predictor, features, &bundle.device)?;
    let probs = bundle.rf_classifier.predict_proba(&embedding);

    let mut crops = Vec::with_capacity(TOP_CROPS);
    let mut scores = Vec::with_capacity(TOP_CROPS);
    for (idx, prob) in top_k(&probs, TOP_CROPS) {
        let crop = bundle.label_encoder.inverse_transform(idx).ok_or_else(|| {
            AppError::Inference(format!("class index {idx} has no label"))
        })?;
        crops.push(crop.to_string());
        scores.push(prob);
    }

    Ok(CropRecommendation { crops, probs: scores })
}
