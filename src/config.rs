// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Everything has a workable default so a bare `silent-stride` invocation
//! brings up the service for the default city.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Place name passed to Overpass area queries and reported in the API
    pub place: String,
    /// Fallback speed (km/h) for edges without a usable maxspeed tag
    pub default_speed_kph: f64,
    /// Path of the processed-graph cache file
    pub graph_cache_path: String,
    /// Path the HTML route map is written to
    pub map_output_path: String,
    /// Overpass API endpoint
    pub overpass_url: String,
    /// Nominatim endpoint for geocoding
    pub nominatim_url: String,
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let default_speed_kph: f64 = env::var("STRIDE_DEFAULT_SPEED_KPH")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30.0);
        if default_speed_kph <= 0.0 {
            return Err(ConfigError::Invalid(
                "STRIDE_DEFAULT_SPEED_KPH",
                "must be positive".to_string(),
            ));
        }

        Ok(Self {
            place: env::var("STRIDE_PLACE")
                .unwrap_or_else(|_| "Manhattan, New York City".to_string()),
            default_speed_kph,
            graph_cache_path: env::var("STRIDE_GRAPH_CACHE")
                .unwrap_or_else(|_| "data/city_graph.json".to_string()),
            map_output_path: env::var("STRIDE_MAP_FILE")
                .unwrap_or_else(|_| "route.html".to_string()),
            overpass_url: env::var("STRIDE_OVERPASS_URL")
                .unwrap_or_else(|_| "https://overpass-api.de/api/interpreter".to_string()),
            nominatim_url: env::var("STRIDE_NOMINATIM_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        })
    }

    /// Offline config for tests. No network endpoints are reachable.
    pub fn test_default() -> Self {
        Self {
            place: "Testville".to_string(),
            default_speed_kph: 30.0,
            graph_cache_path: "/nonexistent/city_graph.json".to_string(),
            map_output_path: "route.html".to_string(),
            overpass_url: "http://127.0.0.1:0/api/interpreter".to_string(),
            nominatim_url: "http://127.0.0.1:0".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
