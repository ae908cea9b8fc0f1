// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Street-graph construction, cost annotation, and the on-disk cache.
//!
//! Handles the full processing pipeline:
//! 1. Raw Overpass elements → directed graph with projected coordinates
//! 2. Per-edge costs: travel time, road-class noise, green cover, junctions
//! 3. Min/max normalization of time and noise costs
//! 4. JSON cache with a version check (load-or-build on startup)

use crate::config::Config;
use crate::models::graph::{GraphNode, LocalProjection, StreetEdge, StrideGraph};
use crate::models::OsmElement;
use crate::services::overpass::{OverpassClient, OverpassError};
use crate::services::parks::ParkIndex;
use crate::time_utils::format_utc_rfc3339;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Cache format version. Bump when `StrideGraph` changes shape; stale
/// caches are rebuilt, mirroring how a schema migration would behave.
pub const CACHE_VERSION: u32 = 1;

/// Noise score for a road class. Louder road classes score higher;
/// the per-edge noise cost is this score scaled by edge length.
pub fn noise_score(highway: &str) -> f64 {
    match highway {
        "motorway" | "primary" | "trunk" => 10.0,
        "secondary" | "tertiary" => 7.0,
        "residential" | "living_street" | "unclassified" => 3.0,
        _ => 5.0,
    }
}

/// Parse an OSM maxspeed tag into km/h. Handles plain numbers and
/// "NN mph"; non-numeric values ("walk", "none") yield `None` so the
/// caller falls back to the configured default.
pub fn parse_maxspeed(tag: &str) -> Option<f64> {
    let tag = tag.trim();
    if let Some(mph) = tag.strip_suffix("mph") {
        return mph.trim().parse::<f64>().ok().map(|v| v * 1.609_344);
    }
    tag.parse::<f64>().ok()
}

/// Builds a [`StrideGraph`] from raw Overpass data.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    default_speed_kph: f64,
}

impl GraphBuilder {
    pub fn new(default_speed_kph: f64) -> Self {
        Self { default_speed_kph }
    }

    /// Process street and park elements into a cost-annotated graph.
    pub fn build(
        &self,
        place: &str,
        streets: &[OsmElement],
        park_elements: &[OsmElement],
    ) -> Result<StrideGraph, GraphError> {
        let street_nodes: Vec<&OsmElement> = streets.iter().filter(|e| e.is_node()).collect();
        if street_nodes.is_empty() {
            return Err(GraphError::EmptyNetwork(place.to_string()));
        }

        // Projection origin at the network centroid keeps projected
        // coordinates small and locally meter-accurate
        let (sum_lon, sum_lat) = street_nodes
            .iter()
            .filter_map(|n| Some((n.lon?, n.lat?)))
            .fold((0.0, 0.0), |(slon, slat), (lon, lat)| {
                (slon + lon, slat + lat)
            });
        let count = street_nodes.len() as f64;
        let projection = LocalProjection::centered_on(sum_lon / count, sum_lat / count);

        let parks = ParkIndex::from_osm(park_elements, &projection);
        self.build_with_parks(place, streets, &parks, projection)
    }

    /// Processing core, parameterized over an already-built park index.
    pub fn build_with_parks(
        &self,
        place: &str,
        streets: &[OsmElement],
        parks: &ParkIndex,
        projection: LocalProjection,
    ) -> Result<StrideGraph, GraphError> {
        let mut graph: DiGraph<GraphNode, StreetEdge> = DiGraph::new();
        let mut node_lookup: HashMap<i64, NodeIndex> = HashMap::new();

        for element in streets.iter().filter(|e| e.is_node()) {
            let (Some(lon), Some(lat)) = (element.lon, element.lat) else {
                continue;
            };
            let (x, y) = projection.project(lon, lat);
            let idx = graph.add_node(GraphNode {
                osm_id: element.id,
                lon,
                lat,
                x,
                y,
                traffic_signals: element.is_traffic_signal(),
            });
            node_lookup.insert(element.id, idx);
        }

        tracing::info!(
            nodes = graph.node_count(),
            signals = graph
                .node_weights()
                .filter(|n| n.traffic_signals)
                .count(),
            "Street nodes loaded"
        );

        let mut skipped_segments = 0usize;
        for way in streets.iter().filter(|e| e.is_way()) {
            let Some(highway) = way.tag("highway").map(str::to_string) else {
                continue;
            };

            let speed_kph = way
                .tag("maxspeed")
                .and_then(parse_maxspeed)
                .unwrap_or(self.default_speed_kph);
            let two_way = way.tag("oneway") != Some("yes");
            let way_is_junction = way.tag("junction").is_some();

            for pair in way.nodes.windows(2) {
                let (Some(&a), Some(&b)) =
                    (node_lookup.get(&pair[0]), node_lookup.get(&pair[1]))
                else {
                    skipped_segments += 1;
                    continue;
                };

                let edge = self.make_edge(
                    &graph[a],
                    &graph[b],
                    way.id,
                    &highway,
                    speed_kph,
                    way_is_junction,
                    parks,
                );
                let reverse = two_way.then(|| self.make_edge(
                    &graph[b],
                    &graph[a],
                    way.id,
                    &highway,
                    speed_kph,
                    way_is_junction,
                    parks,
                ));

                graph.add_edge(a, b, edge);
                if let Some(reverse) = reverse {
                    graph.add_edge(b, a, reverse);
                }
            }
        }

        if skipped_segments > 0 {
            tracing::warn!(skipped_segments, "Way segments referenced missing nodes");
        }
        if graph.edge_count() == 0 {
            return Err(GraphError::EmptyNetwork(place.to_string()));
        }

        normalize_costs(&mut graph);
        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Graph processing complete"
        );

        Ok(StrideGraph {
            place: place.to_string(),
            projection,
            graph,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn make_edge(
        &self,
        from: &GraphNode,
        to: &GraphNode,
        way_id: i64,
        highway: &str,
        speed_kph: f64,
        way_is_junction: bool,
        parks: &ParkIndex,
    ) -> StreetEdge {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let length_m = (dx * dx + dy * dy).sqrt();

        // Zero or negative maxspeed marks the edge impassable
        let time_cost = if speed_kph <= 0.0 {
            f64::INFINITY
        } else {
            (length_m / 1000.0) / speed_kph * 3600.0
        };

        let geometry = vec![[from.x, from.y], [to.x, to.y]];
        let edge = StreetEdge {
            osm_way_id: way_id,
            highway: highway.to_string(),
            length_m,
            time_cost,
            noise_cost: noise_score(highway) * length_m,
            time_cost_norm: 0.0,
            noise_cost_norm: 0.0,
            green_cover: false,
            is_junction: from.traffic_signals || to.traffic_signals || way_is_junction,
            geometry,
        };

        StreetEdge {
            green_cover: parks.covers(&edge.projected_line()),
            ..edge
        }
    }
}

/// Scale time and noise costs to [0, 1] across the whole network.
/// Infinite time costs (impassable edges) normalize to 1.0, and a
/// degenerate range falls back to 1.0 so division stays defined.
pub fn normalize_costs(graph: &mut DiGraph<GraphNode, StreetEdge>) {
    let finite_times: Vec<f64> = graph
        .edge_weights()
        .map(|e| e.time_cost)
        .filter(|t| t.is_finite())
        .collect();
    let noises: Vec<f64> = graph.edge_weights().map(|e| e.noise_cost).collect();

    let (min_time, max_time) = min_max(&finite_times);
    let (min_noise, max_noise) = min_max(&noises);

    let range_time = if max_time - min_time > 0.0 {
        max_time - min_time
    } else {
        1.0
    };
    let range_noise = if max_noise - min_noise > 0.0 {
        max_noise - min_noise
    } else {
        1.0
    };

    for edge in graph.edge_weights_mut() {
        edge.time_cost_norm = if edge.time_cost.is_finite() {
            (edge.time_cost - min_time) / range_time
        } else {
            1.0
        };
        edge.noise_cost_norm = (edge.noise_cost - min_noise) / range_noise;
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values.iter().fold((f64::MAX, f64::MIN), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    })
}

// ─── Cache ───────────────────────────────────────────────────

/// Versioned JSON envelope persisted to disk.
#[derive(Serialize, Deserialize)]
struct CacheEnvelope {
    version: u32,
    built_at: String,
    graph: StrideGraph,
}

/// Save/load the processed graph.
pub struct GraphStore;

impl GraphStore {
    /// Persist the graph, creating parent directories as needed.
    pub fn save<P: AsRef<Path>>(graph: &StrideGraph, path: P) -> Result<String, CacheError> {
        let built_at = format_utc_rfc3339(chrono::Utc::now());
        let envelope = CacheEnvelope {
            version: CACHE_VERSION,
            built_at: built_at.clone(),
            graph: graph.clone(),
        };

        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| CacheError::Io(e.to_string()))?;
            }
        }

        let data =
            serde_json::to_vec(&envelope).map_err(|e| CacheError::Encode(e.to_string()))?;
        fs::write(path.as_ref(), data).map_err(|e| CacheError::Io(e.to_string()))?;

        tracing::info!(path = %path.as_ref().display(), "Processed graph saved");
        Ok(built_at)
    }

    /// Load a previously saved graph. Rejects unknown cache versions.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<(StrideGraph, String), CacheError> {
        let data = fs::read(path.as_ref()).map_err(|e| CacheError::Io(e.to_string()))?;
        let envelope: CacheEnvelope =
            serde_json::from_slice(&data).map_err(|e| CacheError::Decode(e.to_string()))?;

        if envelope.version != CACHE_VERSION {
            return Err(CacheError::VersionMismatch {
                found: envelope.version,
                expected: CACHE_VERSION,
            });
        }

        Ok((envelope.graph, envelope.built_at))
    }
}

/// A processed graph plus its provenance.
#[derive(Debug, Clone)]
pub struct LoadedGraph {
    pub graph: StrideGraph,
    pub built_at: String,
    pub from_cache: bool,
}

/// Load the graph from the cache if present and valid, otherwise fetch
/// the raw data and build it, saving the result for next time.
pub async fn get_graph(config: &Config) -> Result<LoadedGraph, GraphError> {
    let cache_path = &config.graph_cache_path;

    if Path::new(cache_path).exists() {
        tracing::info!(path = %cache_path, "Loading pre-processed graph from cache");
        match GraphStore::load(cache_path) {
            Ok((graph, built_at)) => {
                tracing::info!(
                    nodes = graph.node_count(),
                    edges = graph.edge_count(),
                    "Graph loaded from cache"
                );
                return Ok(LoadedGraph {
                    graph,
                    built_at,
                    from_cache: true,
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "Graph cache unusable, rebuilding");
            }
        }
    } else {
        tracing::info!("No pre-processed graph cache found");
    }

    let client = OverpassClient::new(&config.overpass_url);
    let streets = client.fetch_streets(&config.place).await?;
    let parks = client.fetch_parks(&config.place).await?;

    let builder = GraphBuilder::new(config.default_speed_kph);
    let graph = builder.build(&config.place, &streets.elements, &parks.elements)?;
    let built_at = GraphStore::save(&graph, cache_path)?;

    Ok(LoadedGraph {
        graph,
        built_at,
        from_cache: false,
    })
}

/// Errors from graph construction and caching.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Street network is empty for place: {0}")]
    EmptyNetwork(String),

    #[error(transparent)]
    Overpass(#[from] OverpassError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Errors from the graph cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache I/O error: {0}")]
    Io(String),

    #[error("Failed to encode cache: {0}")]
    Encode(String),

    #[error("Failed to decode cache: {0}")]
    Decode(String),

    #[error("Cache version {found} does not match expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },
}
