// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Standalone HTML route map writer.
//!
//! Produces a single self-contained file (Leaflet from CDN, route
//! embedded as GeoJSON) so the result can be opened directly in a
//! browser or served as-is.

use crate::models::route::ComputedRoute;
use geojson::{Feature, GeoJson, Geometry, Value};
use std::fs;
use std::path::{Path, PathBuf};

const MAP_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Silent Stride Route</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>html, body, #map { height: 100%; margin: 0; }</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map('map').setView([__CENTER_LAT__, __CENTER_LON__], 14);
L.tileLayer('https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png', {
  attribution: '&copy; OpenStreetMap contributors &copy; CARTO'
}).addTo(map);
var route = __GEOJSON__;
L.geoJSON(route, {
  style: { color: 'blue', weight: 5, opacity: 0.7 }
}).addTo(map);
map.fitBounds([[__SOUTH__, __WEST__], [__NORTH__, __EAST__]]);
</script>
</body>
</html>
"#;

/// Route geometry as a GeoJSON feature (shared with the API response).
pub fn route_feature(route: &ComputedRoute) -> Feature {
    let coords: Vec<Vec<f64>> = route.geometry.iter().map(|p| vec![p[0], p[1]]).collect();
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::LineString(coords))),
        id: None,
        properties: None,
        foreign_members: None,
    }
}

/// Write the route map HTML file and return its absolute path.
pub fn render_route_map<P: AsRef<Path>>(
    route: &ComputedRoute,
    path: P,
) -> Result<PathBuf, MapExportError> {
    let geojson = GeoJson::Feature(route_feature(route)).to_string();
    let [west, south, east, north] = route.bounds;

    let html = MAP_TEMPLATE
        .replace("__CENTER_LAT__", &route.start_location.0.to_string())
        .replace("__CENTER_LON__", &route.start_location.1.to_string())
        .replace("__GEOJSON__", &geojson)
        .replace("__SOUTH__", &south.to_string())
        .replace("__WEST__", &west.to_string())
        .replace("__NORTH__", &north.to_string())
        .replace("__EAST__", &east.to_string());

    fs::write(path.as_ref(), html).map_err(|e| MapExportError::Io(e.to_string()))?;

    let absolute =
        fs::canonicalize(path.as_ref()).map_err(|e| MapExportError::Io(e.to_string()))?;
    tracing::info!(path = %absolute.display(), "Route map written");
    Ok(absolute)
}

/// Errors from map export.
#[derive(Debug, thiserror::Error)]
pub enum MapExportError {
    #[error("Failed to write map file: {0}")]
    Io(String),
}
