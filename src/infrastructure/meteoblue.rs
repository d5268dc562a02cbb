//! Wind lookup via the Meteoblue `basic-day` package

use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::MeteoblueConfig;
use crate::domain::WindReading;
use crate::infrastructure::traits::{WindFailure, WindProvider};

/// Fetches today's maximum wind speed from Meteoblue.
///
/// One blocking request per call, no retries.
pub struct MeteoblueWindProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: Option<String>,
}

impl MeteoblueWindProvider {
    pub fn new(config: &MeteoblueConfig) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

impl WindProvider for MeteoblueWindProvider {
    #[instrument(skip(self))]
    fn fetch(&self, latitude: f64, longitude: f64) -> Result<WindReading, WindFailure> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| WindFailure::new("no Meteoblue API key configured"))?;

        let lat = latitude.to_string();
        let lon = longitude.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("apikey", api_key),
                ("format", "json"),
            ])
            .send()
            .map_err(|e| WindFailure::new(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| WindFailure::new(format!("cannot read response: {e}")))?;
        debug!("meteoblue response ({status}): {body}");

        if !status.is_success() {
            return Err(WindFailure::new(format!("Meteoblue answered {status}")));
        }

        parse_wind_response(&body)
    }
}

/// Extract `data_day.windspeed_max[0]` from a Meteoblue JSON body.
pub fn parse_wind_response(body: &str) -> Result<WindReading, WindFailure> {
    let data: Value = serde_json::from_str(body)
        .map_err(|e| WindFailure::new(format!("invalid JSON from Meteoblue: {e}")))?;

    let speed = data
        .get("data_day")
        .and_then(|d| d.get("windspeed_max"))
        .and_then(|w| w.get(0))
        .ok_or_else(|| WindFailure::new("field 'data_day.windspeed_max' not found"))?;

    let speed = speed
        .as_f64()
        .ok_or_else(|| WindFailure::new(format!("windspeed_max is not a number: {speed}")))?;

    Ok(WindReading::kmh(speed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_daily_package_when_parsing_then_first_day_max() {
        let body = r#"{"metadata":{},"data_day":{"time":["2025-06-01","2025-06-02"],"windspeed_max":[34.2,12.0]}}"#;
        assert_eq!(parse_wind_response(body).unwrap(), WindReading::kmh(34.2));
    }

    #[test]
    fn given_missing_field_when_parsing_then_failure_names_field() {
        let body = r#"{"data_day":{"temperature_max":[30.1]}}"#;
        let err = parse_wind_response(body).unwrap_err();
        assert!(err.reason.contains("windspeed_max"));
    }

    #[test]
    fn given_null_speed_when_parsing_then_failure() {
        let body = r#"{"data_day":{"windspeed_max":[null]}}"#;
        assert!(parse_wind_response(body).is_err());
    }

    #[test]
    fn given_garbage_when_parsing_then_failure() {
        let err = parse_wind_response("<html>quota exceeded</html>").unwrap_err();
        assert!(err.reason.starts_with("invalid JSON"));
    }

    #[test]
    fn given_no_api_key_when_fetching_then_failure_without_request() {
        let provider = MeteoblueWindProvider::new(&MeteoblueConfig {
            api_key: None,
            ..MeteoblueConfig::default()
        });
        let err = provider.fetch(-6.2, 106.8).unwrap_err();
        assert!(err.reason.contains("API key"));
    }
}
