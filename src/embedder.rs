use candle_core::{Device, Module, Tensor};

use crate::model::EmbeddingPredictor;
use crate::types::{FeatureVector, FEATURE_DIM};

/// `(1, 7)` input row for the feed-forward models.
pub fn feature_tensor(features: &FeatureVector, device: &Device) -> candle_core::Result<Tensor> {
    Tensor::from_slice(&features.to_array(), (1, FEATURE_DIM), device)
}

pub fn embed(
    model: &EmbeddingPredictor,
    features: &FeatureVector,
    device: &Device,
) -> candle_core::Result<Vec<f32>> {
    let input = feature_tensor(features, device)?;
    model.forward(&input)?.squeeze(0)?.to_vec1()
}
