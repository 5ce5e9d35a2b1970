use std::path::{Path, PathBuf};

use candle_core::Device;
use tracing::info;

use crate::encoder::LabelEncoder;
use crate::error::{ArtifactError, ArtifactResult};
use crate::fertilizer::FertilizerTable;
use crate::forest::RandomForest;
use crate::model::{EmbeddingPredictor, Gcn, LstmYieldPredictor};

/// On-disk locations of every artifact for one training run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub label_encoder: PathBuf,
    pub fertilizer_data: PathBuf,
    pub gcn: PathBuf,
    pub embedding_predictor: PathBuf,
    pub lstm: PathBuf,
    pub rf_classifier: PathBuf,
}

impl ArtifactPaths {
    pub fn new(models_dir: &Path, run_id: u32) -> Self {
        Self {
            label_encoder: models_dir.join("label_encoder.json"),
            fertilizer_data: models_dir.join(format!("fertilizer_data_run{run_id}.bin")),
            gcn: models_dir.join(format!("gcn_run{run_id}.safetensors")),
            embedding_predictor: models_dir
                .join(format!("embedding_predictor_run{run_id}.safetensors")),
            lstm: models_dir.join(format!("lstm_run{run_id}.safetensors")),
            rf_classifier: models_dir.join(format!("rf_classifier_run{run_id}.json")),
        }
    }
}

fn require(artifact: &'static str, path: &Path) -> ArtifactResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ArtifactError::NotFound { artifact, path: path.to_path_buf() })
    }
}

/// Everything the prediction endpoints need, loaded once at startup and
/// shared read-only afterwards.
pub struct ModelBundle {
    pub run_id: u32,
    pub device: Device,
    pub label_encoder: LabelEncoder,
    pub fertilizer_data: FertilizerTable,
    pub gcn: Gcn,
    pub embedding_predictor: EmbeddingPredictor,
    pub lstm: LstmYieldPredictor,
    pub rf_classifier: RandomForest,
}

impl ModelBundle {
    pub fn load(models_dir: &Path, run_id: u32, device: Device) -> ArtifactResult<Self> {
        let paths = ArtifactPaths::new(models_dir, run_id);

        require("Label encoder", &paths.label_encoder)?;
        let label_encoder = LabelEncoder::load(&paths.label_encoder)?;
        let n_classes = label_encoder.len();

        require("Fertilizer data", &paths.fertilizer_data)?;
        let fertilizer_data = FertilizerTable::load_bin(&paths.fertilizer_data)?;

        require(Gcn::ARTIFACT, &paths.gcn)?;
        let gcn = Gcn::load(&paths.gcn, n_classes, &device)?;

        require(EmbeddingPredictor::ARTIFACT, &paths.embedding_predictor)?;
        let embedding_predictor =
            EmbeddingPredictor::load(&paths.embedding_predictor, n_classes, &device)?;

        require(LstmYieldPredictor::ARTIFACT, &paths.lstm)?;
        let lstm = LstmYieldPredictor::load(&paths.lstm, &device)?;

        require("Random Forest Classifier", &paths.rf_classifier)?;
        let rf_classifier = RandomForest::load(&paths.rf_classifier)?;
        if rf_classifier.n_features != n_classes || rf_classifier.n_classes != n_classes {
            return Err(ArtifactError::Invalid {
                artifact: "Random Forest Classifier",
                reason: format!(
                    "expects {} features and {} classes, label encoder has {n_classes}",
                    rf_classifier.n_features, rf_classifier.n_classes
                ),
            });
        }

        info!(
            "Loaded run {run_id}: {n_classes} crop classes, {} fertilizer entries, {} trees",
            fertilizer_data.len(),
            rf_classifier.trees.len()
        );

        Ok(Self {
            run_id,
            device,
            label_encoder,
            fertilizer_data,
            gcn,
            embedding_predictor,
            lstm,
            rf_classifier,
        })
    }
}
