// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Park loading and green-cover detection service.
//!
//! Parks are held in projected (meter) coordinates so the 20 m corridor
//! test is a plain Euclidean distance.

use crate::models::graph::LocalProjection;
use crate::models::OsmElement;
use geo::{BoundingRect, Coord, Distance, Euclidean, Intersects, LineString, MultiPolygon, Polygon, Rect};
use geojson::GeoJson;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A street edge within this distance of a park polygon counts as green.
pub const GREEN_BUFFER_METERS: f64 = 20.0;

/// A park with its boundary geometry in projected coordinates.
#[derive(Debug, Clone)]
pub struct Park {
    pub name: String,
    pub geometry: ParkGeometry,
    /// Cached bounding rectangle of the geometry
    bounds: Rect<f64>,
}

/// Park geometry - either a simple polygon or multi-polygon.
#[derive(Debug, Clone)]
pub enum ParkGeometry {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl ParkGeometry {
    /// Check if a line string comes within `max_dist` of this geometry.
    pub fn within_distance(&self, line: &LineString<f64>, max_dist: f64) -> bool {
        match self {
            ParkGeometry::Polygon(p) => polygon_within_distance(p, line, max_dist),
            ParkGeometry::MultiPolygon(mp) => mp
                .0
                .iter()
                .any(|p| polygon_within_distance(p, line, max_dist)),
        }
    }

    fn bounding_rect(&self) -> Option<Rect<f64>> {
        match self {
            ParkGeometry::Polygon(p) => p.bounding_rect(),
            ParkGeometry::MultiPolygon(mp) => mp.bounding_rect(),
        }
    }
}

fn polygon_within_distance(poly: &Polygon<f64>, line: &LineString<f64>, max_dist: f64) -> bool {
    line.intersects(poly) || Euclidean::distance(line, poly) <= max_dist
}

/// Service for loading parks and testing street edges for green cover.
#[derive(Debug, Default, Clone)]
pub struct ParkIndex {
    parks: Vec<Park>,
}

impl ParkIndex {
    /// Build the index from Overpass elements. Only closed ways tagged
    /// leisure=park become polygons; open ways and degenerate rings are
    /// skipped.
    pub fn from_osm(elements: &[OsmElement], projection: &LocalProjection) -> Self {
        let node_coords: HashMap<i64, (f64, f64)> = elements
            .iter()
            .filter(|e| e.is_node())
            .filter_map(|e| Some((e.id, (e.lon?, e.lat?))))
            .collect();

        let mut parks = Vec::new();
        for way in elements.iter().filter(|e| e.is_closed_way()) {
            if way.tag("leisure") != Some("park") {
                continue;
            }

            let ring: Vec<Coord<f64>> = way
                .nodes
                .iter()
                .filter_map(|id| node_coords.get(id))
                .map(|&(lon, lat)| {
                    let (x, y) = projection.project(lon, lat);
                    Coord { x, y }
                })
                .collect();

            // A ring that lost nodes to the filter above may no longer close
            if ring.len() < 4 {
                tracing::debug!(way_id = way.id, "Skipping degenerate park ring");
                continue;
            }

            let name = way.tag("name").unwrap_or("Unknown").to_string();
            if let Some(park) = Park::new(name, ParkGeometry::Polygon(Polygon::new(LineString::from(ring), vec![]))) {
                parks.push(park);
            }
        }

        tracing::info!(count = parks.len(), "Built park index from OSM data");
        Self { parks }
    }

    /// Load parks from a GeoJSON file (geographic coordinates).
    pub fn load_from_file<P: AsRef<Path>>(
        path: P,
        projection: &LocalProjection,
    ) -> Result<Self, ParkError> {
        let json_data =
            fs::read_to_string(path.as_ref()).map_err(|e| ParkError::IoError(e.to_string()))?;
        Self::load_from_geojson(&json_data, projection)
    }

    /// Load parks from a GeoJSON string (geographic coordinates).
    pub fn load_from_geojson(
        json_data: &str,
        projection: &LocalProjection,
    ) -> Result<Self, ParkError> {
        let geojson: GeoJson = json_data
            .parse()
            .map_err(|e: geojson::Error| ParkError::ParseError(e.to_string()))?;

        let mut parks = Vec::new();

        if let GeoJson::FeatureCollection(collection) = geojson {
            for feature in collection.features {
                let name = feature
                    .property("name")
                    .and_then(|v| v.as_str())
                    .unwrap_or("Unknown")
                    .to_string();

                if let Some(geom) = feature.geometry {
                    let geometry = Self::convert_geometry(geom.value, projection)?;
                    if let Some(park) = Park::new(name, geometry) {
                        parks.push(park);
                    }
                }
            }
        }

        tracing::info!(count = parks.len(), "Loaded parks from GeoJSON");
        Ok(Self { parks })
    }

    /// Convert GeoJSON geometry to our internal projected format.
    fn convert_geometry(
        value: geojson::Value,
        projection: &LocalProjection,
    ) -> Result<ParkGeometry, ParkError> {
        use std::convert::TryInto;

        // Try as Polygon first
        let poly_result: Result<Polygon<f64>, _> = value.clone().try_into();
        if let Ok(poly) = poly_result {
            return Ok(ParkGeometry::Polygon(project_polygon(&poly, projection)));
        }

        // Try as MultiPolygon
        let multi_result: Result<MultiPolygon<f64>, _> = value.try_into();
        if let Ok(multi) = multi_result {
            let projected = MultiPolygon::new(
                multi
                    .0
                    .iter()
                    .map(|p| project_polygon(p, projection))
                    .collect(),
            );
            return Ok(ParkGeometry::MultiPolygon(projected));
        }

        Err(ParkError::UnsupportedGeometry)
    }

    /// Get the list of parks.
    pub fn parks(&self) -> &[Park] {
        &self.parks
    }

    /// True when the projected line runs within the green buffer of any
    /// park. Bounding rectangles are checked first so most edges never
    /// reach the exact distance test.
    pub fn covers(&self, line: &LineString<f64>) -> bool {
        let Some(line_bounds) = line.bounding_rect() else {
            return false;
        };
        let query = expand_rect(&line_bounds, GREEN_BUFFER_METERS);

        self.parks
            .iter()
            .filter(|park| rects_overlap(&query, &park.bounds))
            .any(|park| park.geometry.within_distance(line, GREEN_BUFFER_METERS))
    }
}

impl Park {
    fn new(name: String, geometry: ParkGeometry) -> Option<Self> {
        let bounds = geometry.bounding_rect()?;
        Some(Self {
            name,
            geometry,
            bounds,
        })
    }
}

fn project_polygon(poly: &Polygon<f64>, projection: &LocalProjection) -> Polygon<f64> {
    let project_ring = |ring: &LineString<f64>| {
        LineString::from(
            ring.coords()
                .map(|c| {
                    let (x, y) = projection.project(c.x, c.y);
                    Coord { x, y }
                })
                .collect::<Vec<_>>(),
        )
    };

    Polygon::new(
        project_ring(poly.exterior()),
        poly.interiors().iter().map(project_ring).collect(),
    )
}

fn expand_rect(rect: &Rect<f64>, margin: f64) -> Rect<f64> {
    Rect::new(
        Coord {
            x: rect.min().x - margin,
            y: rect.min().y - margin,
        },
        Coord {
            x: rect.max().x + margin,
            y: rect.max().y + margin,
        },
    )
}

fn rects_overlap(a: &Rect<f64>, b: &Rect<f64>) -> bool {
    a.min().x <= b.max().x && b.min().x <= a.max().x && a.min().y <= b.max().y && b.min().y <= a.max().y
}

/// Errors from park operations.
#[derive(Debug, thiserror::Error)]
pub enum ParkError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse GeoJSON: {0}")]
    ParseError(String),

    #[error("Unsupported geometry type (expected Polygon or MultiPolygon)")]
    UnsupportedGeometry,
}
