//! Address to coordinates lookup.

use crate::model::Location;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

pub const GOOGLE_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
pub const DEFAULT_GEOCODE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("no location found for address")]
    NotFound,
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("geocoding service returned status {0}")]
    Service(String),
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn coordinates(&self, address: &str) -> Result<Location, GeocodeError>;
}

/// Google Geocoding API client.
pub struct GoogleGeocoder {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl GoogleGeocoder {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, GeocodeError> {
        Self::with_endpoint(api_key, GOOGLE_GEOCODE_URL, timeout)
    }

    /// `timeout` bounds the whole request, connect through body.
    pub fn with_endpoint(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(GoogleGeocoder {
            client,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn coordinates(&self, address: &str) -> Result<Location, GeocodeError> {
        tracing::debug!(%address, "geocoding");
        let response: GeocodeResponse = self
            .client
            .get(&self.endpoint)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        location_from_response(response)
    }
}

/// Returns the same coordinates for every address. Used when no API key is configured.
pub struct StaticGeocoder {
    location: Location,
}

impl StaticGeocoder {
    pub fn new(location: Location) -> Self {
        StaticGeocoder { location }
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn coordinates(&self, _address: &str) -> Result<Location, GeocodeError> {
        Ok(self.location)
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

fn location_from_response(response: GeocodeResponse) -> Result<Location, GeocodeError> {
    match response.status.as_str() {
        "OK" => response
            .results
            .into_iter()
            .next()
            .map(|r| r.geometry.location)
            .ok_or(GeocodeError::NotFound),
        "ZERO_RESULTS" => Err(GeocodeError::NotFound),
        other => Err(GeocodeError::Service(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<Location, GeocodeError> {
        location_from_response(serde_json::from_str(body).unwrap())
    }

    #[test]
    fn first_result_is_used() {
        let loc = parse(
            r#"{"status":"OK","results":[
                {"geometry":{"location":{"lat":40.7484405,"lng":-73.9878584}}},
                {"geometry":{"location":{"lat":1.0,"lng":2.0}}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(loc, Location { lat: 40.7484405, lng: -73.9878584 });
    }

    #[test]
    fn zero_results_is_not_found() {
        assert!(matches!(
            parse(r#"{"status":"ZERO_RESULTS","results":[]}"#),
            Err(GeocodeError::NotFound)
        ));
    }

    #[test]
    fn ok_without_results_is_not_found() {
        assert!(matches!(parse(r#"{"status":"OK"}"#), Err(GeocodeError::NotFound)));
    }

    #[test]
    fn other_status_is_service_error() {
        match parse(r#"{"status":"REQUEST_DENIED","error_message":"bad key"}"#) {
            Err(GeocodeError::Service(status)) => assert_eq!(status, "REQUEST_DENIED"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn stalled_service_times_out() {
        // accepts connections but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let geocoder =
            GoogleGeocoder::with_endpoint("key", format!("http://{}/geocode/json", addr), Duration::from_millis(200))
                .unwrap();
        let started = std::time::Instant::now();
        match geocoder.coordinates("20 W 34th St").await {
            Err(GeocodeError::Http(e)) => assert!(e.is_timeout(), "{}", e),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(started.elapsed() < Duration::from_secs(5));
        server.abort();
    }

    #[tokio::test]
    async fn static_geocoder_ignores_address() {
        let loc = Location { lat: 1.5, lng: -2.5 };
        let geocoder = StaticGeocoder::new(loc);
        assert_eq!(geocoder.coordinates("anywhere").await.unwrap(), loc);
    }
}
