mod common;

use std::fs;

use agro_advisor::{
    forecast::predict_yield, recommend_crop, types::FeatureVector, ArtifactError, ArtifactPaths,
    ModelBundle,
};
use candle_core::{Device, Module};

fn features(nitrogen: f64) -> FeatureVector {
    FeatureVector {
        nitrogen,
        phosphorus: 42.0,
        potassium: 43.0,
        temperature: 20.8,
        humidity: 82.0,
        ph: 6.5,
        rainfall: 202.9,
    }
}

#[test]
fn loads_complete_artifact_set() {
    let dir = tempfile::tempdir().unwrap();
    common::write_artifacts(dir.path(), 1);

    let bundle = ModelBundle::load(dir.path(), 1, Device::Cpu).unwrap();
    assert_eq!(bundle.run_id, 1);
    assert_eq!(bundle.label_encoder.len(), common::CROPS.len());
    assert_eq!(bundle.fertilizer_data.len(), 1);
    assert!(bundle.fertilizer_data.lookup("rice", "kharif").is_some());
    assert_eq!(bundle.rf_classifier.trees.len(), 2);
}

#[test]
fn each_missing_artifact_is_reported_by_name() {
    let dir = tempfile::tempdir().unwrap();
    common::write_artifacts(dir.path(), 2);
    let paths = ArtifactPaths::new(dir.path(), 2);

    let cases = [
        (&paths.label_encoder, "Label encoder"),
        (&paths.fertilizer_data, "Fertilizer data"),
        (&paths.gcn, "GCN model"),
        (&paths.embedding_predictor, "Embedding Predictor"),
        (&paths.lstm, "LSTM model"),
        (&paths.rf_classifier, "Random Forest Classifier"),
    ];

    for (path, expected) in cases {
        let backup = path.with_extension("bak");
        fs::rename(path, &backup).unwrap();

        let err = ModelBundle::load(dir.path(), 2, Device::Cpu).err().unwrap();
        match &err {
            ArtifactError::NotFound { artifact, path: missing } => {
                assert_eq!(*artifact, expected);
                assert_eq!(missing, path);
            }
            other => panic!("expected NotFound for {expected}, got {other}"),
        }
        assert!(err.to_string().contains("training step"));

        fs::rename(&backup, path).unwrap();
    }
}

#[test]
fn wrong_run_id_fails_on_first_run_scoped_artifact() {
    let dir = tempfile::tempdir().unwrap();
    common::write_artifacts(dir.path(), 1);

    let err = ModelBundle::load(dir.path(), 7, Device::Cpu).err().unwrap();
    assert!(err.to_string().contains("fertilizer_data_run7.bin"), "{err}");
}

#[test]
fn corrupt_classifier_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    common::write_artifacts(dir.path(), 1);
    fs::write(ArtifactPaths::new(dir.path(), 1).rf_classifier, "{not json").unwrap();

    let err = ModelBundle::load(dir.path(), 1, Device::Cpu).err().unwrap();
    assert!(matches!(err, ArtifactError::Json { .. }), "{err}");
}

#[test]
fn recommends_three_crops_in_probability_order() {
    let dir = tempfile::tempdir().unwrap();
    common::write_artifacts(dir.path(), 1);
    let bundle = ModelBundle::load(dir.path(), 1, Device::Cpu).unwrap();

    let low = recommend_crop(&bundle, &features(20.0), "kharif").unwrap();
    assert_eq!(low.crops.len(), 3);
    assert_eq!(&low.crops[..2], &["apple".to_string(), "banana".to_string()]);
    assert!(low.crops[2] == "chickpea" || low.crops[2] == "maize");
    assert!((low.probs[0] - 0.35).abs() < 1e-5);
    assert!((low.probs[1] - 0.25).abs() < 1e-5);
    assert!((low.probs[2] - 0.15).abs() < 1e-5);

    let high = recommend_crop(&bundle, &features(80.0), "rabi").unwrap();
    assert_eq!(high.crops, vec!["rice", "maize", "chickpea"]);
    assert!(high.probs.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn yield_comes_from_lstm_head() {
    let dir = tempfile::tempdir().unwrap();
    common::write_artifacts(dir.path(), 1);
    let bundle = ModelBundle::load(dir.path(), 1, Device::Cpu).unwrap();

    let estimate = predict_yield(&bundle, &features(90.0)).unwrap();
    assert!((estimate.value - common::YIELD_BIAS).abs() < 1e-6);
}

#[test]
fn graph_model_runs_over_field_graph() {
    let dir = tempfile::tempdir().unwrap();
    common::write_artifacts(dir.path(), 1);
    let bundle = ModelBundle::load(dir.path(), 1, Device::Cpu).unwrap();

    let xs = candle_core::Tensor::zeros((3, 7), candle_core::DType::F32, &Device::Cpu).unwrap();
    let adj = agro_advisor::model::normalized_adjacency(3, &[(0, 1), (1, 2)], &Device::Cpu)
        .unwrap();
    let out = bundle.gcn.forward(&xs, &adj).unwrap();
    assert_eq!(out.dims(), &[3, common::CROPS.len()]);

    // the embedding predictor is a plain Module too
    let row = agro_advisor::embedder::feature_tensor(&features(10.0), &Device::Cpu).unwrap();
    let emb = bundle.embedding_predictor.forward(&row).unwrap();
    assert_eq!(emb.dims(), &[1, common::CROPS.len()]);
}
