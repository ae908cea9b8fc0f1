// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Overpass API client for fetching the raw street network and park data.
//!
//! Handles:
//! - Street way + node download for a named area
//! - Park polygon download
//! - Rate limit detection (Overpass throttles aggressively)

use crate::models::OverpassResponse;
use std::time::Duration;

/// Highway classes included in the routable network. Matches a drivable
/// street network; footways are excluded because the noise model is
/// road-class based.
const HIGHWAY_FILTER: &str =
    "motorway|trunk|primary|secondary|tertiary|unclassified|residential|living_street|service";

const USER_AGENT: &str = concat!("silent-stride/", env!("CARGO_PKG_VERSION"));

/// Overpass API client.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    http: reqwest::Client,
    endpoint: String,
}

impl OverpassClient {
    pub fn new(endpoint: &str) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(300))
            .build()
            .unwrap_or_default();
        Self {
            http,
            endpoint: endpoint.to_string(),
        }
    }

    /// Fetch the street network (ways plus all their nodes) for a place.
    pub async fn fetch_streets(&self, place: &str) -> Result<OverpassResponse, OverpassError> {
        let query = format!(
            r#"[out:json][timeout:180];
area["name"="{place}"]->.searchArea;
(
  way(area.searchArea)["highway"~"^({filter})$"];
);
out body;
>;
out skel qt;"#,
            place = escape_area_name(place),
            filter = HIGHWAY_FILTER,
        );

        tracing::info!(place, "Fetching street network from Overpass");
        self.run_query(&query).await
    }

    /// Fetch park ways (closed ways tagged leisure=park) for a place.
    pub async fn fetch_parks(&self, place: &str) -> Result<OverpassResponse, OverpassError> {
        let query = format!(
            r#"[out:json][timeout:180];
area["name"="{place}"]->.searchArea;
(
  way(area.searchArea)["leisure"="park"];
);
out body;
>;
out skel qt;"#,
            place = escape_area_name(place),
        );

        tracing::info!(place, "Fetching park polygons from Overpass");
        self.run_query(&query).await
    }

    /// POST a query to the interpreter endpoint and decode the JSON body.
    async fn run_query(&self, query: &str) -> Result<OverpassResponse, OverpassError> {
        let response = self
            .http
            .post(&self.endpoint)
            .form(&[("data", query)])
            .send()
            .await
            .map_err(|e| OverpassError::Http(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json(
        &self,
        response: reqwest::Response,
    ) -> Result<OverpassResponse, OverpassError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            // 429/504 mean the public instance is throttling us
            if status.as_u16() == 429 || status.as_u16() == 504 {
                tracing::warn!(status = status.as_u16(), "Overpass throttled the request");
                return Err(OverpassError::RateLimited);
            }

            return Err(OverpassError::Status(status.as_u16(), body));
        }

        let parsed: OverpassResponse = response
            .json()
            .await
            .map_err(|e| OverpassError::Decode(e.to_string()))?;

        tracing::debug!(elements = parsed.elements.len(), "Overpass response decoded");
        Ok(parsed)
    }
}

/// Escape a place name for interpolation into a quoted Overpass filter.
fn escape_area_name(place: &str) -> String {
    place.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Errors from the Overpass API.
#[derive(Debug, thiserror::Error)]
pub enum OverpassError {
    #[error("Overpass request failed: {0}")]
    Http(String),

    #[error("Overpass rate limit hit, retry later")]
    RateLimited,

    #[error("Overpass returned HTTP {0}: {1}")]
    Status(u16, String),

    #[error("Failed to decode Overpass response: {0}")]
    Decode(String),
}
