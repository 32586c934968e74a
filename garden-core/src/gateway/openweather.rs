use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::model::WeatherReading;

use super::{GatewayError, WeatherGateway};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Description used when the provider omits the weather text entirely.
const UNKNOWN_DESCRIPTION: &str = "unbekannt";

/// Gateway against the OpenWeather "current weather" endpoint.
///
/// The API key is injected at construction; the gateway never reads process
/// environment, so tests can run it against a local mock server.
#[derive(Debug, Clone)]
pub struct OpenWeatherGateway {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherGateway {
    pub fn new(api_key: String) -> Result<Self, GatewayError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Same as [`Self::new`] but against an explicit base URL (tests point
    /// this at a wiremock server).
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, GatewayError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { api_key, base_url, http })
    }
}

#[async_trait]
impl WeatherGateway for OpenWeatherGateway {
    async fn fetch_reading(&self, city: &str) -> Result<WeatherReading, GatewayError> {
        let url = format!("{}/data/2.5/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("units", "metric"),
                ("lang", "de"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        tracing::debug!(%city, %status, "openweather response");

        if !status.is_success() {
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                detail: truncate_body(&body),
            });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;

        Ok(normalize(parsed))
    }
}

/// Flatten the provider response into the four readings.
///
/// Missing fields default to zero readings and an "unbekannt" description
/// instead of failing; wind speed arrives in m/s and leaves in km/h.
fn normalize(parsed: OwCurrentResponse) -> WeatherReading {
    let sky_description = parsed
        .weather
        .into_iter()
        .next()
        .and_then(|w| w.description)
        .unwrap_or_else(|| UNKNOWN_DESCRIPTION.to_string());

    WeatherReading {
        temperature_c: parsed.main.temp,
        humidity_pct: parsed.main.humidity,
        wind_speed_kmh: parsed.wind.speed.unwrap_or(0.0) * 3.6,
        sky_description,
    }
}

#[derive(Debug, Default, Deserialize)]
struct OwMain {
    #[serde(default)]
    temp: f64,
    #[serde(default)]
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OwWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut cut = MAX;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(server: &MockServer) -> OpenWeatherGateway {
        OpenWeatherGateway::with_base_url("TESTKEY".to_string(), server.uri())
            .expect("build gateway")
    }

    #[tokio::test]
    async fn normalizes_a_full_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "Berlin"))
            .and(query_param("units", "metric"))
            .and(query_param("lang", "de"))
            .and(query_param("appid", "TESTKEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "main": { "temp": 21.5, "humidity": 56 },
                "wind": { "speed": 2.5 },
                "weather": [ { "description": "klarer Himmel" } ],
            })))
            .mount(&server)
            .await;

        let reading = gateway(&server).fetch_reading("Berlin").await.expect("fetch");

        assert_eq!(reading.temperature_c, 21.5);
        assert_eq!(reading.humidity_pct, 56.0);
        assert!((reading.wind_speed_kmh - 9.0).abs() < 1e-9);
        assert_eq!(reading.sky_description, "klarer Himmel");
    }

    #[tokio::test]
    async fn missing_fields_default_instead_of_failing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let reading = gateway(&server).fetch_reading("Nirgendwo").await.expect("fetch");

        assert_eq!(reading.temperature_c, 0.0);
        assert_eq!(reading.humidity_pct, 0.0);
        assert_eq!(reading.wind_speed_kmh, 0.0);
        assert_eq!(reading.sky_description, "unbekannt");
    }

    #[tokio::test]
    async fn empty_weather_array_gets_placeholder_description() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "main": { "temp": 3.0, "humidity": 70 },
                "weather": [],
            })))
            .mount(&server)
            .await;

        let reading = gateway(&server).fetch_reading("Berlin").await.expect("fetch");
        assert_eq!(reading.sky_description, "unbekannt");
    }

    #[tokio::test]
    async fn upstream_error_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_string(r#"{"cod":"404","message":"city not found"}"#),
            )
            .mount(&server)
            .await;

        let err = gateway(&server).fetch_reading("Atlantis").await.unwrap_err();
        match err {
            GatewayError::Upstream { status, detail } => {
                assert_eq!(status, 404);
                assert!(detail.contains("city not found"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn undecodable_success_body_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = gateway(&server).fetch_reading("Berlin").await.unwrap_err();
        assert!(matches!(err, GatewayError::Parse(_)));
    }
}
