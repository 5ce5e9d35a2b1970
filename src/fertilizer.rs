use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, ArtifactResult};
use crate::types::{FertilizerRequest, FertilizerRecommendation};

const ARTIFACT: &str = "Fertilizer data";

// Target level for each nutrient, and the smallest deficit worth dosing.
const TARGET_LEVEL: f64 = 100.0;
const MIN_DOSE: f64 = 10.0;

/// Reference nutrient levels, in kg/ha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientTargets {
    pub nitrogen: f32,
    pub phosphorus: f32,
    pub potassium: f32,
}

/// Reference table keyed by crop, then season. Loaded with the models and
/// held for the lifetime of the process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FertilizerTable {
    pub crops: BTreeMap<String, BTreeMap<String, NutrientTargets>>,
}

impl FertilizerTable {
    /// Number of (crop, season) entries.
    pub fn len(&self) -> usize {
        self.crops.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn lookup(&self, crop: &str, season: &str) -> Option<&NutrientTargets> {
        self.crops.get(crop)?.get(season)
    }

    pub fn save_bin(&self, path: &Path) -> anyhow::Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(writer, self)?;
        Ok(())
    }

    pub fn load_bin(path: &Path) -> ArtifactResult<Self> {
        let file = File::open(path).map_err(|source| ArtifactError::Io {
            artifact: ARTIFACT,
            path: path.to_path_buf(),
            source,
        })?;
        bincode::deserialize_from(BufReader::new(file))
            .map_err(|source| ArtifactError::Bincode { artifact: ARTIFACT, source })
    }
}

fn dose(reading: f64) -> i64 {
    let deficit = (TARGET_LEVEL - reading).max(0.0);
    if deficit > MIN_DOSE {
        deficit as i64
    } else {
        0
    }
}

/// Dose per nutrient: the deficit below 100 kg/ha, or nothing when the
/// deficit is 10 or less.
///
/// The threshold is checked on the exact deficit and the dose is truncated
/// afterwards, so a fractional deficit just above 10 (N = 89.5) doses 10.
pub fn optimize_fertilizer(req: &FertilizerRequest) -> FertilizerRecommendation {
    FertilizerRecommendation {
        nitrogen: dose(req.nitrogen),
        phosphorus: dose(req.phosphorus),
        potassium: dose(req.potassium),
    }
}
