// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! The processed street graph and its local meter projection.

use geo::{Coord, LineString};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

/// Meters per degree of latitude (WGS84 mean).
const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// Equirectangular projection centered on the network, accurate to meters
/// at city scale. Plays the role of the original data pipeline's UTM
/// projection: all cost and distance math happens in projected coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LocalProjection {
    pub origin_lon: f64,
    pub origin_lat: f64,
}

impl LocalProjection {
    pub fn centered_on(lon: f64, lat: f64) -> Self {
        Self {
            origin_lon: lon,
            origin_lat: lat,
        }
    }

    fn meters_per_degree_lon(&self) -> f64 {
        METERS_PER_DEGREE_LAT * self.origin_lat.to_radians().cos()
    }

    /// Project lon/lat (degrees) to x/y (meters east/north of the origin).
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        (
            (lon - self.origin_lon) * self.meters_per_degree_lon(),
            (lat - self.origin_lat) * METERS_PER_DEGREE_LAT,
        )
    }

    /// Inverse of [`project`](Self::project).
    pub fn unproject(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.origin_lon + x / self.meters_per_degree_lon(),
            self.origin_lat + y / METERS_PER_DEGREE_LAT,
        )
    }
}

/// A graph node: an OSM street-network node with both geographic and
/// projected coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub osm_id: i64,
    pub lon: f64,
    pub lat: f64,
    /// Projected meters east of the origin
    pub x: f64,
    /// Projected meters north of the origin
    pub y: f64,
    /// Node is tagged highway=traffic_signals
    pub traffic_signals: bool,
}

/// A street segment between two graph nodes, annotated with routing costs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreetEdge {
    pub osm_way_id: i64,
    /// OSM highway class (residential, primary, ...)
    pub highway: String,
    pub length_m: f64,
    /// Traversal time in seconds; +inf for impassable (zero-speed) edges.
    /// serde_json has no representation for infinity, so null stands in.
    #[serde(with = "maybe_infinite")]
    pub time_cost: f64,
    /// Road-class noise score scaled by length
    pub noise_cost: f64,
    /// Time cost scaled to [0, 1] across the network
    pub time_cost_norm: f64,
    /// Noise cost scaled to [0, 1] across the network
    pub noise_cost_norm: f64,
    /// Edge runs within 20 m of a park polygon
    pub green_cover: bool,
    /// Edge touches a signalled junction
    pub is_junction: bool,
    /// Projected polyline of the segment
    pub geometry: Vec<[f64; 2]>,
}

impl StreetEdge {
    /// Segment geometry as a projected `geo` line string.
    pub fn projected_line(&self) -> LineString<f64> {
        LineString::from(
            self.geometry
                .iter()
                .map(|p| Coord { x: p[0], y: p[1] })
                .collect::<Vec<_>>(),
        )
    }
}

/// The processed, cost-annotated street graph for one place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrideGraph {
    pub place: String,
    pub projection: LocalProjection,
    pub graph: DiGraph<GraphNode, StreetEdge>,
}

impl StrideGraph {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Snap a projected point to the closest graph node.
    pub fn nearest_node(&self, x: f64, y: f64) -> Option<NodeIndex> {
        self.graph.node_indices().min_by(|&a, &b| {
            let da = Self::sq_dist(&self.graph[a], x, y);
            let db = Self::sq_dist(&self.graph[b], x, y);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// Snap a lon/lat point to the closest graph node.
    pub fn nearest_node_lonlat(&self, lon: f64, lat: f64) -> Option<NodeIndex> {
        let (x, y) = self.projection.project(lon, lat);
        self.nearest_node(x, y)
    }

    fn sq_dist(node: &GraphNode, x: f64, y: f64) -> f64 {
        let dx = node.x - x;
        let dy = node.y - y;
        dx * dx + dy * dy
    }
}

/// serde shim: non-finite floats become JSON null and come back as +inf.
mod maybe_infinite {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_some(value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}
