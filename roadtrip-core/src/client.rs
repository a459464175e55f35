use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::DomainError,
    model::{TripRequest, WeatherReading},
};

const BASE_URL: &str = "https://api.shecodes.io";

const WEATHER_TIMEOUT: Duration = Duration::from_secs(30);
// Generation is noticeably slower than a weather lookup.
const GENERATE_TIMEOUT: Duration = Duration::from_secs(60);

const PLANNER_CONTEXT: &str =
    "You are a specialist travel planner and know the best tourist spots worldwide.";

/// Client for the SheCodes weather and AI generation endpoints.
///
/// Both operations are single-shot request/response calls: no retries, no
/// pagination, no streaming. Every failure is mapped to a [`DomainError`];
/// no raw transport or parse error escapes to the caller.
#[derive(Debug, Clone)]
pub struct ShecodesClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl ShecodesClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BASE_URL)
    }

    /// Point the client at a different host, e.g. a local mock server.
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self { api_key, base_url: base_url.into(), http: Client::new() }
    }

    /// Current weather for a single city, in metric units.
    pub async fn current_weather(&self, location: &str) -> Result<WeatherReading, DomainError> {
        let url = format!("{}/weather/v1/current", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("query", location), ("key", self.api_key.as_str()), ("units", "metric")])
            .timeout(WEATHER_TIMEOUT)
            .send()
            .await
            .map_err(|err| DomainError::Network(err.to_string()))?;

        let status = res.status();
        let body = res.text().await.map_err(|err| DomainError::Network(err.to_string()))?;

        if !status.is_success() {
            return Err(DomainError::HttpStatus {
                api: "Weather API",
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: ScWeatherResponse = serde_json::from_str(&body)
            .map_err(|err| DomainError::ResponseFormat(format!("Unexpected weather error: {err}")))?;

        Ok(WeatherReading {
            temperature_c: parsed.temperature.current.round() as i32,
            condition: parsed.condition.description,
        })
    }

    /// Day-by-day itinerary markdown for the requested trip.
    ///
    /// The answer text is returned verbatim; its contents are opaque here.
    pub async fn generate_itinerary(&self, request: &TripRequest) -> Result<String, DomainError> {
        let url = format!("{}/ai/v1/generate", self.base_url);
        let prompt = itinerary_prompt(request);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("prompt", prompt.as_str()),
                ("context", PLANNER_CONTEXT),
                ("key", self.api_key.as_str()),
            ])
            .timeout(GENERATE_TIMEOUT)
            .send()
            .await
            .map_err(|err| DomainError::Network(err.to_string()))?;

        let status = res.status();
        let body = res.text().await.map_err(|err| DomainError::Network(err.to_string()))?;

        if !status.is_success() {
            return Err(DomainError::HttpStatus {
                api: "AI API",
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: ScGenerateResponse = serde_json::from_str(&body).map_err(|err| {
            DomainError::ResponseFormat(format!("AI response format unexpected: {err}"))
        })?;

        parsed.answer.ok_or_else(|| {
            DomainError::ResponseFormat(
                "AI response format unexpected (missing 'answer').".to_string(),
            )
        })
    }
}

fn itinerary_prompt(request: &TripRequest) -> String {
    format!(
        "Generate an itinerary for a road trip from {} to {} in {} days. \
         Keep it short (<= 15 lines). Use <= 5 emojis. \
         Include a per-day estimated price in South African Rands.",
        request.origin, request.destination, request.duration_days,
    )
}

#[derive(Debug, Deserialize)]
struct ScTemperature {
    current: f64,
}

#[derive(Debug, Deserialize)]
struct ScCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct ScWeatherResponse {
    temperature: ScTemperature,
    condition: ScCondition,
}

#[derive(Debug, Deserialize)]
struct ScGenerateResponse {
    answer: Option<String>,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server, ServerGuard};

    const WEATHER_BODY: &str =
        r#"{"temperature":{"current":21.6},"condition":{"description":"partly cloudy"}}"#;

    fn client_for(server: &ServerGuard) -> ShecodesClient {
        ShecodesClient::with_base_url("TEST_KEY".to_string(), server.url())
    }

    fn trip() -> TripRequest {
        TripRequest {
            origin: "Johannesburg".to_string(),
            destination: "Durban".to_string(),
            duration_days: 5,
        }
    }

    #[tokio::test]
    async fn weather_parses_and_rounds_temperature() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/weather/v1/current")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("query".into(), "Durban".into()),
                Matcher::UrlEncoded("key".into(), "TEST_KEY".into()),
                Matcher::UrlEncoded("units".into(), "metric".into()),
            ]))
            .with_status(200)
            .with_body(WEATHER_BODY)
            .create_async()
            .await;

        let reading =
            client_for(&server).current_weather("Durban").await.expect("weather must parse");

        assert_eq!(
            reading,
            WeatherReading { temperature_c: 22, condition: "partly cloudy".to_string() }
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn weather_rounds_half_away_from_zero_at_the_boundary() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/weather/v1/current")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"temperature":{"current":21.5},"condition":{"description":"clear"}}"#)
            .create_async()
            .await;

        let reading =
            client_for(&server).current_weather("Durban").await.expect("weather must parse");

        assert_eq!(reading.temperature_c, 22);
    }

    #[tokio::test]
    async fn weather_repeats_identically_for_identical_responses() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/weather/v1/current")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(WEATHER_BODY)
            .create_async()
            .await;

        let client = client_for(&server);
        let first = client.current_weather("Durban").await.expect("first call must succeed");
        let second = client.current_weather("Durban").await.expect("second call must succeed");

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn weather_surfaces_status_and_body_on_http_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/weather/v1/current")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let err = client_for(&server).current_weather("Nowhere").await.unwrap_err();

        assert!(matches!(err, DomainError::HttpStatus { .. }));
        assert_eq!(err.to_string(), "Weather API error: 404 - not found");
    }

    #[tokio::test]
    async fn weather_maps_malformed_payload_to_response_format_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/weather/v1/current")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"condition":{"description":"clear"}}"#)
            .create_async()
            .await;

        let err = client_for(&server).current_weather("Durban").await.unwrap_err();

        assert!(matches!(err, DomainError::ResponseFormat(_)));
        assert!(err.to_string().starts_with("Unexpected weather error"));
    }

    #[tokio::test]
    async fn weather_maps_connection_refused_to_network_error() {
        // Nothing listens on port 1.
        let client = ShecodesClient::with_base_url("TEST_KEY".to_string(), "http://127.0.0.1:1");

        let err = client.current_weather("Durban").await.unwrap_err();

        assert!(matches!(err, DomainError::Network(_)));
        assert!(err.to_string().starts_with("Network error: "));
    }

    #[tokio::test]
    async fn itinerary_passes_answer_through_verbatim() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/ai/v1/generate")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded(
                    "prompt".into(),
                    "Generate an itinerary for a road trip from Johannesburg to Durban \
                     in 5 days. Keep it short (<= 15 lines). Use <= 5 emojis. \
                     Include a per-day estimated price in South African Rands."
                        .into(),
                ),
                Matcher::UrlEncoded("context".into(), PLANNER_CONTEXT.into()),
                Matcher::UrlEncoded("key".into(), "TEST_KEY".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"answer": "Day 1: ..."}"#)
            .create_async()
            .await;

        let answer =
            client_for(&server).generate_itinerary(&trip()).await.expect("itinerary must parse");

        assert_eq!(answer, "Day 1: ...");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn itinerary_reports_missing_answer_field() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/ai/v1/generate")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let err = client_for(&server).generate_itinerary(&trip()).await.unwrap_err();

        assert!(matches!(err, DomainError::ResponseFormat(_)));
        assert_eq!(err.to_string(), "AI response format unexpected (missing 'answer').");
    }

    #[tokio::test]
    async fn itinerary_surfaces_status_and_body_on_http_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/ai/v1/generate")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("generation backend down")
            .create_async()
            .await;

        let err = client_for(&server).generate_itinerary(&trip()).await.unwrap_err();

        assert_eq!(err.to_string(), "AI API error: 500 - generation backend down");
    }

    #[test]
    fn truncate_body_keeps_short_bodies_intact() {
        assert_eq!(truncate_body("not found"), "not found");
    }

    #[test]
    fn truncate_body_caps_long_bodies() {
        let body = "x".repeat(500);
        let truncated = truncate_body(&body);

        assert_eq!(truncated.len(), 203);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        // 100 three-byte chars; the 200-byte cap lands mid-char.
        let body = "€".repeat(100);
        let truncated = truncate_body(&body);

        assert!(truncated.ends_with("..."));
        assert!(truncated.len() < body.len());
    }
}
