// Structs for the OpenWeatherMap current-weather response. Only the fields we
// read are modelled; everything is optional because error bodies carry almost
// none of them.

use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;
use crate::types::WeatherReport;

const STATUS_OK: u64 = 200;

#[derive(Debug, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub humidity: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct Precipitation {
    #[serde(rename = "1h")]
    pub one_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct OwmResponse {
    // 200 on success as a number, "404" etc. as a string on failure. Only the
    // number counts as success.
    pub cod: Option<Value>,
    pub message: Option<Value>,
    pub main: Option<MainReadings>,
    pub rain: Option<Precipitation>,
}

impl OwmResponse {
    pub fn into_report(self) -> Result<WeatherReport, AppError> {
        match &self.cod {
            Some(Value::Number(n)) if n.as_u64() == Some(STATUS_OK) => {}
            Some(_) => {
                let message = match self.message {
                    Some(Value::String(s)) => s,
                    Some(other) => other.to_string(),
                    None => "unknown error".to_string(),
                };
                return Err(AppError::Upstream(format!("API Error: {message}")));
            }
            None => {
                return Err(AppError::Upstream(
                    "malformed weather response: missing 'cod'".into(),
                ))
            }
        }

        let main = self.main.ok_or_else(|| {
            AppError::Upstream("malformed weather response: missing 'main'".into())
        })?;

        Ok(WeatherReport {
            temperature: main.temp,
            humidity: main.humidity,
            rainfall: self.rain.and_then(|r| r.one_hour).unwrap_or(0.0),
        })
    }
}
