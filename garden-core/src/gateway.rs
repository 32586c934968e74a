//! Weather gateway: the one outbound call this system makes.
//!
//! A gateway turns a city name into a normalized [`WeatherReading`]. The
//! advisory engine never sees provider JSON, only the four readings.

use crate::model::WeatherReading;
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// How a weather lookup can fail. There are no retries anywhere; a failed
/// fetch is reported to the caller as-is.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The provider answered with a non-2xx status. The front door propagates
    /// the status code and the provider's body text.
    #[error("weather provider returned status {status}")]
    Upstream { status: u16, detail: String },

    /// Network failure, including the 8-second request timeout.
    #[error("failed to reach weather provider: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider sent a 2xx response we could not decode.
    #[error("failed to parse weather provider response: {0}")]
    Parse(#[from] serde_json::Error),
}

#[async_trait]
pub trait WeatherGateway: Send + Sync + Debug {
    /// Fetch current conditions for a city and normalize them.
    async fn fetch_reading(&self, city: &str) -> Result<WeatherReading, GatewayError>;
}
