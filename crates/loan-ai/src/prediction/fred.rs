//! FRED-backed indicator provider.
//!
//! Queries four observation series from the FRED HTTP API and reduces them
//! to the [`MacroIndicators`] set. The whole fetch is fail-open: the first
//! error of any kind aborts to [`MacroIndicators::fallback`] with a `warn`
//! diagnostic, and the caller never sees a failure.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use super::indicators::{IndicatorProvider, MacroIndicators};
use crate::config::MacroDataConfig;

const INTEREST_SERIES: &str = "FEDFUNDS";
const UNEMPLOYMENT_SERIES: &str = "UNRATE";
const INFLATION_SERIES: &str = "CPIAUCSL";
const GDP_SERIES: &str = "GDPC1";

const RATE_WINDOW_DAYS: i64 = 365;
// Roughly 18 months so the quarterly GDP series yields at least two points.
const GDP_WINDOW_DAYS: i64 = 540;

/// Indicators below this are reported as the floor itself, matching the
/// range the models were trained on.
const INDICATOR_FLOOR: f64 = 1.0;

/// Client for the FRED series-observations endpoint.
#[derive(Clone)]
pub struct FredClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum FredError {
    #[error("FRED_API_KEY is not configured")]
    MissingApiKey,
    #[error("request to FRED failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("FRED returned {status} for series {series}")]
    Status { series: String, status: StatusCode },
    #[error("series {series} returned non-numeric observation '{value}'")]
    InvalidObservation { series: String, value: String },
    #[error("series {series} has too few usable observations (need {needed}, found {found})")]
    InsufficientData {
        series: String,
        needed: usize,
        found: usize,
    },
    #[error("series {series} base observation is zero")]
    ZeroBase { series: String },
}

#[derive(Debug, Deserialize)]
struct ObservationsBody {
    #[serde(default)]
    observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    value: String,
}

impl FredClient {
    pub fn new(config: &MacroDataConfig) -> Result<Self, FredError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    async fn series_values(&self, series: &str, window_days: i64) -> Result<Vec<f64>, FredError> {
        let api_key = self.api_key.as_deref().ok_or(FredError::MissingApiKey)?;

        let end = Utc::now().date_naive();
        let start = end - Duration::days(window_days);
        let url = format!("{}/fred/series/observations", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("series_id", series),
                ("api_key", api_key),
                ("file_type", "json"),
                ("observation_start", &start.format("%Y-%m-%d").to_string()),
                ("observation_end", &end.format("%Y-%m-%d").to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FredError::Status {
                series: series.to_string(),
                status: response.status(),
            });
        }

        let body: ObservationsBody = response.json().await?;
        parse_observations(series, body)
    }

    /// Fetch and reduce all four series; any error aborts the bundle.
    pub async fn try_fetch(&self) -> Result<MacroIndicators, FredError> {
        let interest = self
            .series_values(INTEREST_SERIES, RATE_WINDOW_DAYS)
            .await?;
        let unemployment = self
            .series_values(UNEMPLOYMENT_SERIES, RATE_WINDOW_DAYS)
            .await?;
        let cpi = self
            .series_values(INFLATION_SERIES, RATE_WINDOW_DAYS)
            .await?;
        let gdp = self.series_values(GDP_SERIES, GDP_WINDOW_DAYS).await?;

        assemble_indicators(&interest, &unemployment, &cpi, &gdp)
    }
}

#[async_trait]
impl IndicatorProvider for FredClient {
    async fn fetch_indicators(&self) -> MacroIndicators {
        match self.try_fetch().await {
            Ok(indicators) => {
                debug!(?indicators, "fetched macro indicators");
                indicators
            }
            Err(err) => {
                warn!(error = %err, "macro indicator fetch failed, serving fallback set");
                MacroIndicators::fallback()
            }
        }
    }
}

/// The literal value "." marks a missing observation and is dropped; any
/// other non-numeric value poisons the series.
fn parse_observations(series: &str, body: ObservationsBody) -> Result<Vec<f64>, FredError> {
    let mut values = Vec::with_capacity(body.observations.len());
    for observation in body.observations {
        if observation.value == "." {
            continue;
        }
        let parsed =
            observation
                .value
                .parse::<f64>()
                .map_err(|_| FredError::InvalidObservation {
                    series: series.to_string(),
                    value: observation.value.clone(),
                })?;
        values.push(parsed);
    }
    Ok(values)
}

fn latest(series: &str, values: &[f64]) -> Result<f64, FredError> {
    values
        .last()
        .copied()
        .ok_or_else(|| FredError::InsufficientData {
            series: series.to_string(),
            needed: 1,
            found: 0,
        })
}

/// Percent change between the oldest and newest observation in the window.
fn window_change(series: &str, values: &[f64]) -> Result<f64, FredError> {
    let (&oldest, &newest) = match (values.first(), values.last()) {
        (Some(first), Some(last)) if values.len() >= 2 => (first, last),
        _ => {
            return Err(FredError::InsufficientData {
                series: series.to_string(),
                needed: 2,
                found: values.len(),
            })
        }
    };

    percent_change(series, oldest, newest)
}

/// Percent change between the two most recent observations.
fn latest_step_change(series: &str, values: &[f64]) -> Result<f64, FredError> {
    if values.len() < 2 {
        return Err(FredError::InsufficientData {
            series: series.to_string(),
            needed: 2,
            found: values.len(),
        });
    }

    percent_change(series, values[values.len() - 2], values[values.len() - 1])
}

fn percent_change(series: &str, old: f64, new: f64) -> Result<f64, FredError> {
    if old == 0.0 {
        return Err(FredError::ZeroBase {
            series: series.to_string(),
        });
    }
    Ok(((new - old) / old) * 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn assemble_indicators(
    interest: &[f64],
    unemployment: &[f64],
    cpi: &[f64],
    gdp: &[f64],
) -> Result<MacroIndicators, FredError> {
    let interest_rate = latest(INTEREST_SERIES, interest)?.max(INDICATOR_FLOOR);
    let employment_rate =
        (100.0 - latest(UNEMPLOYMENT_SERIES, unemployment)?).max(INDICATOR_FLOOR);
    let inflation_rate = round2(window_change(INFLATION_SERIES, cpi)?.max(INDICATOR_FLOOR));
    let gdp_growth_rate = round2(latest_step_change(GDP_SERIES, gdp)?.max(INDICATOR_FLOOR));

    Ok(MacroIndicators {
        interest_rate,
        employment_rate,
        inflation_rate,
        gdp_growth_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(values: &[&str]) -> ObservationsBody {
        ObservationsBody {
            observations: values
                .iter()
                .map(|value| Observation {
                    value: value.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn missing_observations_are_filtered() {
        let values = parse_observations("UNRATE", body(&["4.1", ".", "4.0", "."])).expect("parses");
        assert_eq!(values, vec![4.1, 4.0]);
    }

    #[test]
    fn garbage_observation_poisons_the_series() {
        let result = parse_observations("UNRATE", body(&["4.1", "n/a"]));
        assert!(matches!(
            result,
            Err(FredError::InvalidObservation { ref value, .. }) if value == "n/a"
        ));
    }

    #[test]
    fn window_change_spans_oldest_to_newest() {
        let change = window_change("CPIAUCSL", &[300.0, 301.0, 309.0]).expect("change");
        assert!((change - 3.0).abs() < 1e-9);
    }

    #[test]
    fn latest_step_change_uses_last_two_points() {
        let change = latest_step_change("GDPC1", &[20_000.0, 21_000.0, 21_420.0]).expect("change");
        assert!((change - 2.0).abs() < 1e-9);
    }

    #[test]
    fn deflation_is_floored_at_one() {
        // A computed -5% change must still be reported as the 1.0 floor.
        let indicators =
            assemble_indicators(&[4.5], &[4.0], &[300.0, 285.0], &[21_000.0, 20_580.0])
                .expect("indicators");
        assert_eq!(indicators.inflation_rate, 1.0);
        assert_eq!(indicators.gdp_growth_rate, 1.0);
    }

    #[test]
    fn rates_use_latest_observation_with_floor() {
        let indicators = assemble_indicators(
            &[5.25, 5.33, 0.25],
            &[3.9, 99.5],
            &[300.0, 309.33],
            &[20_000.0, 20_320.0],
        )
        .expect("indicators");

        assert_eq!(indicators.interest_rate, 1.0); // 0.25 floored
        assert_eq!(indicators.employment_rate, 1.0); // 100 - 99.5 floored
        assert_eq!(indicators.inflation_rate, 3.11); // rounded to 2 decimals
        assert_eq!(indicators.gdp_growth_rate, 1.6);
    }

    #[test]
    fn insufficient_series_data_is_an_error() {
        assert!(matches!(
            assemble_indicators(&[], &[4.0], &[300.0, 301.0], &[1.0, 2.0]),
            Err(FredError::InsufficientData { .. })
        ));
        assert!(matches!(
            assemble_indicators(&[5.0], &[4.0], &[300.0], &[1.0, 2.0]),
            Err(FredError::InsufficientData { .. })
        ));
    }

    #[test]
    fn zero_base_observation_is_an_error() {
        assert!(matches!(
            latest_step_change("GDPC1", &[0.0, 100.0]),
            Err(FredError::ZeroBase { .. })
        ));
    }
}
