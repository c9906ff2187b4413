//! Twelve Data HTTP market data adapter.
//!
//! Requests the daily `time_series` endpoint. The provider answers with the
//! newest observation first and reports failures in the JSON body as
//! `{"status": "error", "message": ...}`.

use crate::domain::error::CompounderError;
use crate::domain::price_series::PriceObservation;
use crate::ports::config_port::ConfigPort;
use crate::ports::market_data_port::MarketDataPort;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.twelvedata.com";
pub const DEFAULT_OUTPUT_SIZE: u32 = 1300;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const API_KEY_ENV: &str = "TWELVE_DATA_API_KEY";
const INTERVAL: &str = "1day";
const FALLBACK_ERROR: &str = "Error fetching data.";

#[derive(Clone)]
pub struct TwelveDataConfig {
    pub api_key: String,
    pub base_url: String,
    pub output_size: u32,
    pub timeout: Duration,
}

impl std::fmt::Debug for TwelveDataConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwelveDataConfig")
            .field("base_url", &self.base_url)
            .field("output_size", &self.output_size)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl TwelveDataConfig {
    /// Read `[market_data]`; the API key falls back to `TWELVE_DATA_API_KEY`.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, CompounderError> {
        let api_key = config
            .get_string("market_data", "api_key")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .ok_or_else(|| CompounderError::ConfigMissing {
                section: "market_data".to_string(),
                key: "api_key".to_string(),
            })?;

        let output_size = config.get_int("market_data", "output_size", DEFAULT_OUTPUT_SIZE as i64);
        let timeout_secs =
            config.get_int("market_data", "timeout_secs", DEFAULT_TIMEOUT_SECS as i64);

        Ok(Self {
            api_key,
            base_url: config.get_string_or("market_data", "base_url", DEFAULT_BASE_URL),
            output_size: u32::try_from(output_size).unwrap_or(DEFAULT_OUTPUT_SIZE),
            timeout: Duration::from_secs(u64::try_from(timeout_secs).unwrap_or(DEFAULT_TIMEOUT_SECS)),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    status: Option<String>,
    message: Option<String>,
    #[serde(default)]
    values: Vec<TimeSeriesValue>,
}

#[derive(Debug, Deserialize)]
struct TimeSeriesValue {
    datetime: String,
    close: String,
}

/// Decode a `time_series` response body.
pub fn parse_time_series(
    symbol: &str,
    body: &str,
) -> Result<Vec<PriceObservation>, CompounderError> {
    let response: TimeSeriesResponse =
        serde_json::from_str(body).map_err(|e| CompounderError::DataSource {
            reason: format!("malformed response for {symbol}: {e}"),
        })?;

    if response.status.as_deref() == Some("error") {
        return Err(CompounderError::Upstream {
            symbol: symbol.to_string(),
            message: response
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| FALLBACK_ERROR.to_string()),
        });
    }

    response
        .values
        .into_iter()
        .map(|v| {
            let close = v
                .close
                .trim()
                .parse::<f64>()
                .map_err(|e| CompounderError::DataSource {
                    reason: format!("invalid close '{}' on {}: {}", v.close, v.datetime, e),
                })?;
            Ok(PriceObservation::new(v.datetime, close))
        })
        .collect()
}

pub struct TwelveDataAdapter {
    config: TwelveDataConfig,
    http: Client,
}

impl TwelveDataAdapter {
    pub fn new(config: TwelveDataConfig) -> Result<Self, CompounderError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CompounderError::DataSource {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { config, http })
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, CompounderError> {
        Self::new(TwelveDataConfig::from_config(config)?)
    }

    fn endpoint(&self) -> String {
        format!("{}/time_series", self.config.base_url.trim_end_matches('/'))
    }

    async fn request(&self, symbol: &str) -> Result<Vec<PriceObservation>, CompounderError> {
        let output_size = self.config.output_size.to_string();
        let response = self
            .http
            .get(self.endpoint())
            .query(&[
                ("symbol", symbol),
                ("interval", INTERVAL),
                ("outputsize", output_size.as_str()),
                ("apikey", self.config.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompounderError::Timeout {
                        symbol: symbol.to_string(),
                        seconds: self.config.timeout.as_secs(),
                    }
                } else {
                    CompounderError::DataSource {
                        reason: format!("request for {symbol} failed: {e}"),
                    }
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| CompounderError::DataSource {
            reason: format!("failed to read response for {symbol}: {e}"),
        })?;

        if !status.is_success() {
            // Prefer the provider's own message when the body carries one.
            return match parse_time_series(symbol, &body) {
                Err(err @ CompounderError::Upstream { .. }) => Err(err),
                _ => Err(CompounderError::Upstream {
                    symbol: symbol.to_string(),
                    message: format!("HTTP {status}"),
                }),
            };
        }

        parse_time_series(symbol, &body)
    }
}

impl MarketDataPort for TwelveDataAdapter {
    async fn fetch_daily_closes(
        &self,
        symbol: &str,
    ) -> Result<Vec<PriceObservation>, CompounderError> {
        log::debug!("requesting {} daily closes for {}", self.config.output_size, symbol);
        let observations = self.request(symbol).await?;
        log::info!("fetched {} closes for {}", observations.len(), symbol);
        Ok(observations)
    }
}
