use serde::{Deserialize, Serialize};
use std::fmt;

pub const FEATURE_DIM: usize = 7;
pub const DEFAULT_SEASON: &str = "kharif";

/// The seven agronomic readings, in the order the models were trained on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    #[serde(rename = "N")]
    pub nitrogen: f64,
    #[serde(rename = "P")]
    pub phosphorus: f64,
    #[serde(rename = "K")]
    pub potassium: f64,
    pub temperature: f64,
    pub humidity: f64,
    #[serde(rename = "pH")]
    pub ph: f64,
    pub rainfall: f64,
}

impl FeatureVector {
    pub fn to_array(&self) -> [f32; FEATURE_DIM] {
        [
            self.nitrogen as f32,
            self.phosphorus as f32,
            self.potassium as f32,
            self.temperature as f32,
            self.humidity as f32,
            self.ph as f32,
            self.rainfall as f32,
        ]
    }
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(flatten)]
    pub features: FeatureVector,
    pub season: Option<String>,
}

impl RecommendRequest {
    pub fn season(&self) -> &str {
        self.season.as_deref().unwrap_or(DEFAULT_SEASON)
    }
}

#[derive(Debug, Deserialize)]
pub struct FertilizerRequest {
    #[serde(rename = "N")]
    pub nitrogen: f64,
    #[serde(rename = "P")]
    pub phosphorus: f64,
    #[serde(rename = "K")]
    pub potassium: f64,
}

#[derive(Debug, Deserialize)]
pub struct WeatherRequest {
    pub lat: f64,
    pub lon: f64,
}

// ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropRecommendation {
    pub crops: Vec<String>,
    pub probs: Vec<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldEstimate {
    #[serde(rename = "yield")]
    pub value: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FertilizerRecommendation {
    #[serde(rename = "Nitrogen (kg/ha)")]
    pub nitrogen: i64,
    #[serde(rename = "Phosphorus (kg/ha)")]
    pub phosphorus: i64,
    #[serde(rename = "Potassium (kg/ha)")]
    pub potassium: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub run_id: u32,
    pub classes: usize,
    pub fertilizer_entries: usize,
}

impl fmt::Display for CropRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (crop, prob)) in self.crops.iter().zip(&self.probs).enumerate() {
            writeln!(f, "Top {idx}: {crop} ({prob:.3})")?;
        }
        Ok(())
    }
}
