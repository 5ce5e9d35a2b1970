#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;

use agro_advisor::{
    encoder::LabelEncoder,
    fertilizer::{FertilizerTable, NutrientTargets},
    forest::{DecisionTree, RandomForest},
    model::{EMBEDDING_HIDDEN, GCN_HIDDEN, LSTM_HIDDEN},
    types::FEATURE_DIM,
    ArtifactPaths,
};
use candle_core::{DType, Device, Tensor};

pub const CROPS: [&str; 5] = ["apple", "banana", "chickpea", "maize", "rice"];
pub const YIELD_BIAS: f32 = 4.2;

fn tensor(data: Vec<f32>, shape: &[usize]) -> Tensor {
    Tensor::from_vec(data, shape, &Device::Cpu).unwrap()
}

fn zeros(shape: &[usize]) -> Tensor {
    Tensor::zeros(shape, DType::F32, &Device::Cpu).unwrap()
}

fn save(tensors: HashMap<String, Tensor>, path: &Path) {
    candle_core::safetensors::save(&tensors, path).unwrap();
}

fn leaf(value: Vec<f32>) -> DecisionTree {
    DecisionTree {
        children_left: vec![-1],
        children_right: vec![-1],
        feature: vec![-2],
        threshold: vec![-2.0],
        value: vec![value],
    }
}

/// Writes a complete, tiny artifact set for `run_id` into `dir`.
///
/// The embedding's first slot equals the nitrogen reading (for N >= 0), so the
/// forest prefers apple/banana when N <= 50 and rice/maize above that.
pub fn write_artifacts(dir: &Path, run_id: u32) {
    let paths = ArtifactPaths::new(dir, run_id);
    let n = CROPS.len();

    LabelEncoder::new(CROPS.iter().map(|c| c.to_string()).collect())
        .unwrap()
        .save(&paths.label_encoder)
        .unwrap();

    let mut table = FertilizerTable::default();
    table.crops.entry("rice".into()).or_default().insert(
        "kharif".into(),
        NutrientTargets { nitrogen: 80.0, phosphorus: 40.0, potassium: 40.0 },
    );
    table.save_bin(&paths.fertilizer_data).unwrap();

    let mut w1 = vec![0.0f32; EMBEDDING_HIDDEN * FEATURE_DIM];
    w1[0] = 1.0;
    let mut w2 = vec![0.0f32; n * EMBEDDING_HIDDEN];
    w2[0] = 1.0;
    save(
        HashMap::from([
            ("fc1.weight".to_string(), tensor(w1, &[EMBEDDING_HIDDEN, FEATURE_DIM])),
            ("fc1.bias".to_string(), zeros(&[EMBEDDING_HIDDEN])),
            ("fc2.weight".to_string(), tensor(w2, &[n, EMBEDDING_HIDDEN])),
            ("fc2.bias".to_string(), zeros(&[n])),
        ]),
        &paths.embedding_predictor,
    );

    let h = LSTM_HIDDEN;
    save(
        HashMap::from([
            ("lstm.weight_ih_l0".to_string(), zeros(&[4 * h, FEATURE_DIM])),
            ("lstm.weight_hh_l0".to_string(), zeros(&[4 * h, h])),
            ("lstm.bias_ih_l0".to_string(), zeros(&[4 * h])),
            ("lstm.bias_hh_l0".to_string(), zeros(&[4 * h])),
            ("fc.weight".to_string(), tensor(vec![0.5; h], &[1, h])),
            ("fc.bias".to_string(), tensor(vec![YIELD_BIAS], &[1])),
        ]),
        &paths.lstm,
    );

    save(
        HashMap::from([
            ("conv1.lin.weight".to_string(), zeros(&[GCN_HIDDEN, FEATURE_DIM])),
            ("conv1.bias".to_string(), zeros(&[GCN_HIDDEN])),
            ("conv2.lin.weight".to_string(), zeros(&[n, GCN_HIDDEN])),
            ("conv2.bias".to_string(), zeros(&[n])),
        ]),
        &paths.gcn,
    );

    let split = DecisionTree {
        children_left: vec![1, -1, -1],
        children_right: vec![2, -1, -1],
        feature: vec![0, -2, -2],
        threshold: vec![50.0, -2.0, -2.0],
        value: vec![
            vec![5.0, 4.0, 3.0, 4.0, 4.0],
            vec![5.0, 3.0, 1.0, 1.0, 0.0],
            vec![0.0, 1.0, 2.0, 3.0, 4.0],
        ],
    };
    RandomForest {
        n_features: n,
        n_classes: n,
        trees: vec![split, leaf(vec![2.0; 5])],
    }
    .save(&paths.rf_classifier)
    .unwrap();
}
