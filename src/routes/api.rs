// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for route computation and graph introspection.

use crate::error::{AppError, Result};
use crate::models::route::{RouteAnalytics, RoutePreferences};
use crate::services::map_export;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use geo::Coord;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Maximum address length accepted for geocoding.
const MAX_ADDRESS_LEN: usize = 200;

/// API routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/route", post(compute_route))
        .route("/api/graph", get(graph_summary))
}

// ─── Route Computation ───────────────────────────────────────

/// A route endpoint: a free-form address (geocoded) or explicit
/// coordinates (snapped directly to the graph).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LocationRef {
    Address(String),
    Point { lat: f64, lon: f64 },
}

/// Route computation request.
#[derive(Debug, Deserialize, Validate)]
pub struct RouteRequest {
    pub start: LocationRef,
    pub end: LocationRef,
    /// Profile slider: 0 = pure speed, 100 = pure peace
    #[validate(range(max = 100))]
    #[serde(default)]
    pub peace: u8,
    #[serde(default)]
    pub prefer_parks: bool,
    #[serde(default)]
    pub avoid_junctions: bool,
    /// Hour override for the quiet-hours logic (0-23)
    #[validate(range(max = 23))]
    pub hour: Option<u32>,
    /// Also write the standalone HTML map file
    #[serde(default)]
    pub render_map: bool,
}

/// Resolved start location echoed back to the client.
#[derive(Serialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// Route computation response.
#[derive(Serialize)]
pub struct RouteResponse {
    pub analytics: RouteAnalytics,
    /// Route geometry as a GeoJSON Feature (LineString, lon/lat)
    pub route: geojson::Feature,
    /// Route geometry as an encoded polyline (precision 5)
    pub polyline: String,
    pub start_location: LatLon,
    /// [min_lon, min_lat, max_lon, max_lat]
    pub bounds: [f64; 4],
    /// Hour the weight selection was based on
    pub hour: u32,
    pub quiet_hours: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_file: Option<String>,
}

/// Compute a route between two locations.
async fn compute_route(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RouteRequest>,
) -> Result<Json<RouteResponse>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let start = resolve_location(&state, &req.start).await?;
    let end = resolve_location(&state, &req.end).await?;

    let prefs = RoutePreferences {
        peace: req.peace,
        prefer_parks: req.prefer_parks,
        avoid_junctions: req.avoid_junctions,
    };

    let route = state
        .engine
        .find_route(start, end, &prefs, req.hour)?;

    let line = geo::LineString::from(
        route
            .geometry
            .iter()
            .map(|p| Coord { x: p[0], y: p[1] })
            .collect::<Vec<_>>(),
    );
    let encoded = polyline::encode_coordinates(line, 5)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Polyline encoding failed: {}", e)))?;

    let map_file = if req.render_map {
        let path = map_export::render_route_map(&route, &state.config.map_output_path)?;
        Some(path.display().to_string())
    } else {
        None
    };

    Ok(Json(RouteResponse {
        analytics: route.analytics,
        route: map_export::route_feature(&route),
        polyline: encoded,
        start_location: LatLon {
            lat: route.start_location.0,
            lon: route.start_location.1,
        },
        bounds: route.bounds,
        hour: route.hour,
        quiet_hours: route.quiet_hours,
        map_file,
    }))
}

/// Turn a location reference into a (lat, lon) pair, geocoding when
/// needed.
async fn resolve_location(state: &AppState, location: &LocationRef) -> Result<(f64, f64)> {
    match location {
        LocationRef::Address(address) => {
            let trimmed = address.trim();
            if trimmed.is_empty() {
                return Err(AppError::BadRequest(
                    "Start and end addresses are required".to_string(),
                ));
            }
            if trimmed.len() > MAX_ADDRESS_LEN {
                return Err(AppError::BadRequest(format!(
                    "Address exceeds {} characters",
                    MAX_ADDRESS_LEN
                )));
            }
            let point = state.geocoder.geocode(trimmed).await?;
            Ok((point.lat, point.lon))
        }
        LocationRef::Point { lat, lon } => {
            if !(-90.0..=90.0).contains(lat) || !(-180.0..=180.0).contains(lon) {
                return Err(AppError::BadRequest(format!(
                    "Coordinates out of range: ({}, {})",
                    lat, lon
                )));
            }
            Ok((*lat, *lon))
        }
    }
}

// ─── Graph Introspection ─────────────────────────────────────

/// Summary of the active graph.
#[derive(Serialize)]
pub struct GraphSummaryResponse {
    pub place: String,
    pub nodes: usize,
    pub edges: usize,
    pub built_at: String,
}

/// Describe the loaded street graph.
async fn graph_summary(State(state): State<Arc<AppState>>) -> Json<GraphSummaryResponse> {
    let graph = state.engine.graph();
    Json(GraphSummaryResponse {
        place: graph.place.clone(),
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        built_at: state.graph_built_at.clone(),
    })
}
