// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Core routing logic: weight selection, A* search, and route analytics.

use crate::models::graph::{StreetEdge, StrideGraph};
use crate::models::route::{ComputedRoute, RouteAnalytics, RoutePreferences};
use crate::time_utils::{effective_hour, is_quiet_hour};
use petgraph::algo::astar;
use petgraph::graph::NodeIndex;
use std::sync::Arc;

/// Multiplicative discount on blended cost for green-cover edges.
const PARK_DISCOUNT: f64 = 0.7;
/// Multiplicative penalty on blended cost for junction edges.
const JUNCTION_PENALTY: f64 = 2.0;
/// At or above this time weight the fastest route is used outright.
const FAST_PROFILE_THRESHOLD: f64 = 0.70;
/// Noise reduction applied to reported analytics during quiet hours.
const QUIET_NOISE_MULTIPLIER: f64 = 0.7;
/// Floor for a blended cost that rounds to zero on a non-free edge,
/// keeping A* edge costs positive.
const MIN_EDGE_COST: f64 = 1e-9;

/// How edge costs are computed for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightMode {
    /// Raw traversal seconds. Quiet hours, or a speed-heavy profile.
    FastestRaw,
    /// Preference-blended normalized cost.
    Blended,
}

/// Pick the weight mode from the preferences and time of day.
pub fn select_weight_mode(prefs: &RoutePreferences, quiet_hours: bool) -> WeightMode {
    if quiet_hours || prefs.w_time() >= FAST_PROFILE_THRESHOLD {
        WeightMode::FastestRaw
    } else {
        WeightMode::Blended
    }
}

/// Cost of one edge under the given mode and preferences.
pub fn edge_cost(edge: &StreetEdge, prefs: &RoutePreferences, mode: WeightMode) -> f64 {
    match mode {
        WeightMode::FastestRaw => edge.time_cost,
        WeightMode::Blended => blended_cost(edge, prefs),
    }
}

fn blended_cost(edge: &StreetEdge, prefs: &RoutePreferences) -> f64 {
    let base = if prefs.w_noise() == 1.0 {
        // 100% peace ignores time entirely
        edge.noise_cost_norm
    } else {
        prefs.w_time() * edge.time_cost_norm + prefs.w_noise() * edge.noise_cost_norm
    };

    let mut cost = base;
    if prefs.prefer_parks && edge.green_cover {
        cost *= PARK_DISCOUNT;
    }
    if prefs.avoid_junctions && edge.is_junction {
        cost *= JUNCTION_PENALTY;
    }

    if cost == 0.0 && (edge.time_cost_norm > 0.0 || edge.noise_cost_norm > 0.0) {
        return MIN_EDGE_COST;
    }
    cost
}

/// The routing engine: owns the processed graph and answers route queries.
#[derive(Clone)]
pub struct RoutingEngine {
    graph: Arc<StrideGraph>,
    /// Tightest seconds-per-meter over the network, for an admissible
    /// A* heuristic in fastest mode.
    min_secs_per_meter: f64,
}

impl RoutingEngine {
    pub fn new(graph: StrideGraph) -> Self {
        let min_secs_per_meter = graph
            .graph
            .edge_weights()
            .filter(|e| e.time_cost.is_finite() && e.length_m > 0.0)
            .map(|e| e.time_cost / e.length_m)
            .fold(f64::MAX, f64::min);
        let min_secs_per_meter = if min_secs_per_meter == f64::MAX {
            0.0
        } else {
            min_secs_per_meter
        };

        Self {
            graph: Arc::new(graph),
            min_secs_per_meter,
        }
    }

    pub fn graph(&self) -> &StrideGraph {
        &self.graph
    }

    /// Compute a route between two geographic points.
    ///
    /// Endpoints are snapped to their nearest graph nodes; the search
    /// weight is chosen from the preferences and the (possibly
    /// overridden) hour of day.
    pub fn find_route(
        &self,
        start: (f64, f64), // (lat, lon)
        end: (f64, f64),
        prefs: &RoutePreferences,
        requested_hour: Option<u32>,
    ) -> Result<ComputedRoute, RouteError> {
        let g = &self.graph.graph;

        let start_node = self
            .graph
            .nearest_node_lonlat(start.1, start.0)
            .ok_or(RouteError::EmptyGraph)?;
        let end_node = self
            .graph
            .nearest_node_lonlat(end.1, end.0)
            .ok_or(RouteError::EmptyGraph)?;

        let hour = effective_hour(requested_hour);
        let quiet_hours = is_quiet_hour(hour);
        let mode = select_weight_mode(prefs, quiet_hours);
        tracing::info!(
            hour,
            quiet_hours,
            mode = ?mode,
            peace = prefs.peace,
            prefer_parks = prefs.prefer_parks,
            avoid_junctions = prefs.avoid_junctions,
            "Route search"
        );

        let goal = &g[end_node];
        let (gx, gy) = (goal.x, goal.y);

        // Straight-line distance scaled so the heuristic never
        // overestimates: seconds at the network's best pace in fastest
        // mode, nothing in blended mode (normalized costs carry no
        // usable distance bound).
        let heuristic_scale = match mode {
            WeightMode::FastestRaw => self.min_secs_per_meter,
            WeightMode::Blended => 0.0,
        };

        let result = astar(
            g,
            start_node,
            |n| n == end_node,
            |e| edge_cost(e.weight(), prefs, mode),
            |n| {
                let node = &g[n];
                let dx = node.x - gx;
                let dy = node.y - gy;
                (dx * dx + dy * dy).sqrt() * heuristic_scale
            },
        );

        let (_, path) = result.ok_or(RouteError::NoPath)?;
        self.assemble(path, prefs, mode, hour, quiet_hours)
    }

    /// Build analytics and geometry for a found node path.
    fn assemble(
        &self,
        path: Vec<NodeIndex>,
        prefs: &RoutePreferences,
        mode: WeightMode,
        hour: u32,
        quiet_hours: bool,
    ) -> Result<ComputedRoute, RouteError> {
        let g = &self.graph.graph;

        let mut total_time_secs = 0.0;
        let mut total_noise_weighted = 0.0;
        let mut total_length_m = 0.0;
        let mut time_in_green = 0.0;
        let mut geometry: Vec<[f64; 2]> = Vec::new();

        // Reported noise drops during quiet hours; route costs do not
        let noise_multiplier = if quiet_hours {
            QUIET_NOISE_MULTIPLIER
        } else {
            1.0
        };

        for pair in path.windows(2) {
            let (u, v) = (pair[0], pair[1]);
            // Parallel edges are possible; take the one the search used
            let edge = g
                .edges_connecting(u, v)
                .min_by(|a, b| {
                    let ca = edge_cost(a.weight(), prefs, mode);
                    let cb = edge_cost(b.weight(), prefs, mode);
                    ca.partial_cmp(&cb).unwrap_or(std::cmp::Ordering::Equal)
                })
                .ok_or(RouteError::NoPath)?;
            let edge = edge.weight();

            total_time_secs += edge.time_cost;
            total_noise_weighted += edge.noise_cost * noise_multiplier;
            total_length_m += edge.length_m;
            if edge.green_cover {
                time_in_green += edge.time_cost;
            }

            for (i, point) in edge.geometry.iter().enumerate() {
                // Consecutive edges share their junction vertex
                if i == 0 && !geometry.is_empty() {
                    continue;
                }
                let (lon, lat) = self.graph.projection.unproject(point[0], point[1]);
                geometry.push([lon, lat]);
            }
        }

        if geometry.is_empty() {
            // Start and end snapped to the same node
            let node = &g[*path.first().ok_or(RouteError::NoPath)?];
            geometry.push([node.lon, node.lat]);
        }

        let avg_noise = if total_length_m > 0.0 {
            total_noise_weighted / total_length_m
        } else {
            0.0
        };
        let green_percent = if total_time_secs > 0.0 {
            (time_in_green / total_time_secs) * 100.0
        } else {
            0.0
        };

        let bounds = geometry.iter().fold(
            [f64::MAX, f64::MAX, f64::MIN, f64::MIN],
            |[min_lon, min_lat, max_lon, max_lat], p| {
                [
                    min_lon.min(p[0]),
                    min_lat.min(p[1]),
                    max_lon.max(p[0]),
                    max_lat.max(p[1]),
                ]
            },
        );

        let start_node = &g[path[0]];
        Ok(ComputedRoute {
            analytics: RouteAnalytics {
                time_secs: total_time_secs,
                distance_meters: total_length_m,
                avg_noise,
                green_percent,
            },
            geometry,
            start_location: (start_node.lat, start_node.lon),
            bounds,
            hour,
            quiet_hours,
        })
    }
}

/// Errors from route computation.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("Routing graph is empty")]
    EmptyGraph,

    #[error("No path between the selected points")]
    NoPath,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(time_norm: f64, noise_norm: f64, green: bool, junction: bool) -> StreetEdge {
        StreetEdge {
            osm_way_id: 1,
            highway: "residential".to_string(),
            length_m: 100.0,
            time_cost: 12.0,
            noise_cost: 300.0,
            time_cost_norm: time_norm,
            noise_cost_norm: noise_norm,
            green_cover: green,
            is_junction: junction,
            geometry: vec![[0.0, 0.0], [100.0, 0.0]],
        }
    }

    #[test]
    fn test_quiet_hours_force_fastest() {
        let prefs = RoutePreferences {
            peace: 100,
            ..Default::default()
        };
        assert_eq!(select_weight_mode(&prefs, true), WeightMode::FastestRaw);
    }

    #[test]
    fn test_speed_heavy_profile_uses_fastest() {
        // peace=30 means w_time=0.7, right at the threshold
        let prefs = RoutePreferences {
            peace: 30,
            ..Default::default()
        };
        assert_eq!(select_weight_mode(&prefs, false), WeightMode::FastestRaw);
    }

    #[test]
    fn test_balanced_profile_uses_blended() {
        let prefs = RoutePreferences {
            peace: 31,
            ..Default::default()
        };
        assert_eq!(select_weight_mode(&prefs, false), WeightMode::Blended);
    }

    #[test]
    fn test_blended_cost_mixes_weights() {
        let prefs = RoutePreferences {
            peace: 50,
            ..Default::default()
        };
        let e = edge(0.4, 0.8, false, false);
        let cost = edge_cost(&e, &prefs, WeightMode::Blended);
        assert!((cost - (0.5 * 0.4 + 0.5 * 0.8)).abs() < 1e-12);
    }

    #[test]
    fn test_full_peace_ignores_time() {
        let prefs = RoutePreferences {
            peace: 100,
            ..Default::default()
        };
        let e = edge(0.9, 0.2, false, false);
        let cost = edge_cost(&e, &prefs, WeightMode::Blended);
        assert!((cost - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_park_discount_applies() {
        let prefs = RoutePreferences {
            peace: 50,
            prefer_parks: true,
            ..Default::default()
        };
        let plain = edge_cost(&edge(0.4, 0.4, false, false), &prefs, WeightMode::Blended);
        let green = edge_cost(&edge(0.4, 0.4, true, false), &prefs, WeightMode::Blended);
        assert!((green - plain * 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_junction_penalty_applies() {
        let prefs = RoutePreferences {
            peace: 50,
            avoid_junctions: true,
            ..Default::default()
        };
        let plain = edge_cost(&edge(0.4, 0.4, false, false), &prefs, WeightMode::Blended);
        let junction = edge_cost(&edge(0.4, 0.4, false, true), &prefs, WeightMode::Blended);
        assert!((junction - plain * 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_cost_floor() {
        // Normalized costs can be exactly zero for the cheapest edge;
        // the floor keeps the search weight positive
        let prefs = RoutePreferences {
            peace: 50,
            ..Default::default()
        };
        let e = edge(0.0, 0.0, false, false);
        let cost = edge_cost(&e, &prefs, WeightMode::Blended);
        assert_eq!(cost, 0.0); // genuinely free edge stays free

        let e2 = StreetEdge {
            noise_cost_norm: 0.5,
            ..e
        };
        let prefs_full_time = RoutePreferences {
            peace: 0,
            ..Default::default()
        };
        // w_noise = 0 and time_norm = 0 would produce 0 despite noise
        let cost2 = edge_cost(&e2, &prefs_full_time, WeightMode::Blended);
        assert_eq!(cost2, MIN_EDGE_COST);
    }

    #[test]
    fn test_fastest_mode_uses_raw_seconds() {
        let prefs = RoutePreferences::default();
        let e = edge(0.4, 0.8, true, true);
        assert_eq!(edge_cost(&e, &prefs, WeightMode::FastestRaw), 12.0);
    }
}
