//! Minimal FRED (St. Louis Fed) client used to resolve the risk-free rate
//! from the 10-year Treasury constant-maturity series.
//!
//! This is the one network collaborator of the valuation pipeline. Callers
//! own caching and the fallback default — the engine itself never fetches.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use valuation_core::{RiskFreeRateSource, ValuationError};

const BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";

/// 10-year Treasury constant maturity yield, percent, daily.
const SERIES_RISK_FREE: &str = "DGS10";

/// Observations requested per call. More than one because FRED publishes a
/// "." placeholder on market holidays.
const OBS_LIMIT: usize = 10;

const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(2);

#[derive(Clone)]
pub struct FredClient {
    api_key: String,
    client: Client,
}

impl FredClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { api_key, client }
    }

    /// Build a client from the `FRED_API_KEY` environment variable
    /// (`.env` files supported).
    pub fn from_env() -> Result<Self, ValuationError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("FRED_API_KEY").map_err(|_| {
            ValuationError::ApiError("Missing FRED_API_KEY in environment".to_string())
        })?;
        Ok(Self::new(api_key))
    }

    /// Latest 10-year Treasury yield as an annualized fraction, with
    /// transient failures retried before giving up.
    pub async fn latest_risk_free_rate(&self) -> Result<f64, ValuationError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.fetch_latest().await {
                Ok(rate) => {
                    tracing::debug!("Resolved risk-free rate {:.4} from FRED {}", rate, SERIES_RISK_FREE);
                    return Ok(rate);
                }
                Err(err) => {
                    if attempt >= MAX_ATTEMPTS {
                        return Err(err);
                    }
                    tracing::warn!(
                        "FRED {} fetch failed (attempt {}/{}): {}",
                        SERIES_RISK_FREE,
                        attempt,
                        MAX_ATTEMPTS,
                        err
                    );
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            }
        }
    }

    async fn fetch_latest(&self) -> Result<f64, ValuationError> {
        let limit = OBS_LIMIT.to_string();
        let response = self
            .client
            .get(BASE_URL)
            .query(&[
                ("series_id", SERIES_RISK_FREE),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
                ("sort_order", "desc"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ValuationError::ApiError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ValuationError::ApiError(format!(
                "FRED HTTP {}",
                response.status()
            )));
        }

        let body: ObservationsResponse = response
            .json()
            .await
            .map_err(|e| ValuationError::ApiError(e.to_string()))?;

        body.observations
            .iter()
            .find_map(|obs| parse_observation(&obs.value))
            .map(|pct| pct / 100.0)
            .ok_or_else(|| {
                ValuationError::InsufficientData(format!(
                    "No usable {} observation returned",
                    SERIES_RISK_FREE
                ))
            })
    }
}

#[async_trait]
impl RiskFreeRateSource for FredClient {
    async fn latest_rate(&self) -> Result<f64, ValuationError> {
        self.latest_risk_free_rate().await
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    value: String,
}

/// FRED encodes missing observations as ".".
fn parse_observation(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "." {
        return None;
    }
    let value = trimmed.parse::<f64>().ok()?;
    if value.is_finite() {
        Some(value)
    } else {
        None
    }
}
