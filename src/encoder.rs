use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, ArtifactResult};

const ARTIFACT: &str = "Label encoder";

/// Smallest class count that still lets `/recommend` answer with a top 3.
pub const MIN_CLASSES: usize = 3;

#[derive(Debug, Serialize, Deserialize)]
struct EncoderFile {
    classes: Vec<String>,
}

/// Maps crop names to the dense class indices used by the models and back.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> ArtifactResult<Self> {
        if classes.len() < MIN_CLASSES {
            return Err(ArtifactError::Invalid {
                artifact: ARTIFACT,
                reason: format!(
                    "expected at least {MIN_CLASSES} classes, found {}",
                    classes.len()
                ),
            });
        }

        let mut index = HashMap::with_capacity(classes.len());
        for (idx, name) in classes.iter().enumerate() {
            if index.insert(name.clone(), idx).is_some() {
                return Err(ArtifactError::Invalid {
                    artifact: ARTIFACT,
                    reason: format!("duplicate class '{name}'"),
                });
            }
        }

        Ok(Self { classes, index })
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn transform(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn inverse_transform(&self, idx: usize) -> Option<&str> {
        self.classes.get(idx).map(String::as_str)
    }

    pub fn load(path: &Path) -> ArtifactResult<Self> {
        let file = File::open(path).map_err(|source| ArtifactError::Io {
            artifact: ARTIFACT,
            path: path.to_path_buf(),
            source,
        })?;
        let parsed: EncoderFile = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| ArtifactError::Json { artifact: ARTIFACT, source })?;
        Self::new(parsed.classes)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, &EncoderFile { classes: self.classes.clone() })?;
        Ok(())
    }
}
