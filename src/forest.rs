//! Random forest classifier.
//!
//! Trees use the flat array layout scikit-learn exposes on `tree_`: node `i`
//! splits on `feature[i] <= threshold[i]`, going to `children_left[i]` or
//! `children_right[i]`, and is a leaf when `children_left[i] == -1`.
//! `value[i]` holds the class weights seen at that node.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, ArtifactResult};
use crate::vec_ops::{add_assign, normalize_sum, scale};

const ARTIFACT: &str = "Random Forest Classifier";
const LEAF: i64 = -1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f32>>,
}

impl DecisionTree {
    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        let n = self.children_left.len();
        if n == 0 {
            return Err("tree has no nodes".into());
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err("tree arrays differ in length".into());
        }

        for i in 0..n {
            if self.value[i].len() != n_classes {
                return Err(format!(
                    "node {i} has {} class weights, expected {n_classes}",
                    self.value[i].len()
                ));
            }
            if self.children_left[i] == LEAF {
                continue;
            }
            for child in [self.children_left[i], self.children_right[i]] {
                if child <= i as i64 || child >= n as i64 {
                    return Err(format!("node {i} has invalid child {child}"));
                }
            }
            if self.feature[i] < 0 || self.feature[i] >= n_features as i64 {
                return Err(format!("node {i} splits on unknown feature {}", self.feature[i]));
            }
        }
        Ok(())
    }

    /// Class distribution of the leaf `x` falls into.
    pub fn predict_proba(&self, x: &[f32]) -> Vec<f32> {
        let mut node = 0usize;
        // Children always have larger indices than their parent (checked on
        // load), so this walk terminates.
        while self.children_left[node] != LEAF {
            let feature = self.feature[node] as usize;
            node = if f64::from(x[feature]) <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }

        let mut probs = self.value[node].clone();
        normalize_sum(&mut probs);
        probs
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    pub n_classes: usize,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn validate(&self) -> ArtifactResult<()> {
        let invalid = |reason: String| ArtifactError::Invalid { artifact: ARTIFACT, reason };

        if self.trees.is_empty() {
            return Err(invalid("forest has no trees".into()));
        }
        for (idx, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, self.n_classes)
                .map_err(|reason| invalid(format!("tree {idx}: {reason}")))?;
        }
        Ok(())
    }

    /// Mean of the per-tree leaf distributions.
    pub fn predict_proba(&self, x: &[f32]) -> Vec<f32> {
        let mut probs = self
            .trees
            .par_iter()
            .map(|tree| tree.predict_proba(x))
            .reduce(
                || vec![0.0f32; self.n_classes],
                |mut acc, p| {
                    add_assign(&mut acc, &p);
                    acc
                },
            );

        scale(&mut probs, 1.0 / self.trees.len() as f32);
        probs
    }

    pub fn load(path: &Path) -> ArtifactResult<Self> {
        let file = File::open(path).map_err(|source| ArtifactError::Io {
            artifact: ARTIFACT,
            path: path.to_path_buf(),
            source,
        })?;
        let forest: Self = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| ArtifactError::Json { artifact: ARTIFACT, source })?;
        forest.validate()?;
        Ok(forest)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }
}
