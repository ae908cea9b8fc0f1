// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Nominatim geocoding client with an in-memory result cache.
//!
//! Nominatim's usage policy is one request per second, so every resolved
//! address is cached for the lifetime of the process. The cache is shared
//! across concurrent requests via a `DashMap`.

use dashmap::DashMap;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

const USER_AGENT: &str = concat!("silent-stride/", env!("CARGO_PKG_VERSION"));

/// A geocoded position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// One entry of a Nominatim search response.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

/// Nominatim geocoding client.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    http: reqwest::Client,
    base_url: String,
    cache: Arc<DashMap<String, GeoPoint>>,
}

impl GeocodeClient {
    pub fn new(base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache: Arc::new(DashMap::new()),
        }
    }

    /// Resolve an address to a lat/lon position.
    pub async fn geocode(&self, address: &str) -> Result<GeoPoint, GeocodeError> {
        let query = address.trim();
        if query.is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }

        if let Some(hit) = self.cache.get(query) {
            tracing::debug!(address = query, "Geocode cache hit");
            return Ok(*hit);
        }

        let url = format!("{}/search", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| GeocodeError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Status(status.as_u16(), body));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| GeocodeError::Decode(e.to_string()))?;

        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NoMatch(query.to_string()))?;

        let point = GeoPoint {
            lat: place
                .lat
                .parse()
                .map_err(|_| GeocodeError::Decode(format!("bad latitude: {}", place.lat)))?,
            lon: place
                .lon
                .parse()
                .map_err(|_| GeocodeError::Decode(format!("bad longitude: {}", place.lon)))?,
        };

        tracing::info!(
            address = query,
            lat = point.lat,
            lon = point.lon,
            resolved = %place.display_name,
            "Geocoded address"
        );
        self.cache.insert(query.to_string(), point);
        Ok(point)
    }

    /// Number of cached addresses (for diagnostics).
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}

/// Errors from geocoding.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("Address is empty")]
    EmptyQuery,

    #[error("Geocoding request failed: {0}")]
    Http(String),

    #[error("Geocoder returned HTTP {0}: {1}")]
    Status(u16, String),

    #[error("Could not geocode address: {0}")]
    NoMatch(String),

    #[error("Failed to decode geocoder response: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_address_rejected_without_network() {
        let client = GeocodeClient::new("http://127.0.0.1:0");
        let result = client.geocode("   ").await;
        assert!(matches!(result, Err(GeocodeError::EmptyQuery)));
    }

    #[test]
    fn test_nominatim_place_parses() {
        let raw = r#"[{"lat": "40.7579747", "lon": "-73.9855426",
                       "display_name": "Times Square, Manhattan"}]"#;
        let places: Vec<NominatimPlace> = serde_json::from_str(raw).unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].lat, "40.7579747");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = GeocodeClient::new("https://nominatim.openstreetmap.org/");
        assert_eq!(client.base_url, "https://nominatim.openstreetmap.org");
    }
}
