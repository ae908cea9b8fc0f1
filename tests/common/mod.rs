// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use silent_stride::config::Config;
use silent_stride::models::OsmElement;
use silent_stride::routes::create_router;
use silent_stride::services::{GeocodeClient, GraphBuilder, RoutingEngine};
use silent_stride::AppState;
use std::collections::HashMap;
use std::sync::Arc;

/// Build a bare OSM node.
#[allow(dead_code)]
pub fn node(id: i64, lon: f64, lat: f64) -> OsmElement {
    OsmElement {
        element_type: "node".to_string(),
        id,
        lat: Some(lat),
        lon: Some(lon),
        nodes: vec![],
        tags: HashMap::new(),
    }
}

/// Build an OSM node with tags.
#[allow(dead_code)]
pub fn tagged_node(id: i64, lon: f64, lat: f64, tags: &[(&str, &str)]) -> OsmElement {
    let mut n = node(id, lon, lat);
    n.tags = tags
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    n
}

/// Build an OSM way.
#[allow(dead_code)]
pub fn way(id: i64, nodes: &[i64], tags: &[(&str, &str)]) -> OsmElement {
    OsmElement {
        element_type: "way".to_string(),
        id,
        lat: None,
        lon: None,
        nodes: nodes.to_vec(),
        tags: tags
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

/// Street-network fixture near the equator so degrees scale simply:
/// 0.001 degrees of longitude is about 111.3 m.
///
/// ```text
///   4 ──────── 5 ──────── 6     residential (quiet detour, park alongside)
///   │                     │
///   1 ───[2]── 2 ───────── 3     primary (noisy direct road, signal at 2)
/// ```
///
/// Plus a disconnected chain 7-8-9-10 used for no-route, zero-speed,
/// and oneway cases.
#[allow(dead_code)]
pub fn street_elements() -> Vec<OsmElement> {
    vec![
        node(1, 0.0, 0.0),
        tagged_node(2, 0.001, 0.0, &[("highway", "traffic_signals")]),
        node(3, 0.002, 0.0),
        node(4, 0.0, 0.0005),
        node(5, 0.001, 0.0005),
        node(6, 0.002, 0.0005),
        node(7, 0.005, 0.005),
        node(8, 0.006, 0.005),
        node(9, 0.007, 0.005),
        node(10, 0.008, 0.005),
        way(100, &[1, 2, 3], &[("highway", "primary"), ("maxspeed", "50")]),
        way(101, &[4, 5, 6], &[("highway", "residential")]),
        way(102, &[1, 4], &[("highway", "residential")]),
        way(103, &[3, 6], &[("highway", "residential")]),
        way(104, &[7, 8], &[("highway", "residential")]),
        way(105, &[8, 9], &[("highway", "residential"), ("maxspeed", "0")]),
        way(106, &[9, 10], &[("highway", "residential"), ("oneway", "yes")]),
    ]
}

/// Park fixture: a rectangle hugging the residential detour from the
/// north, within 20 m of segments 4-5 and 5-6 but more than 20 m from
/// everything else.
#[allow(dead_code)]
pub fn park_elements() -> Vec<OsmElement> {
    vec![
        node(21, 0.0002, 0.00055),
        node(22, 0.0018, 0.00055),
        node(23, 0.0018, 0.0008),
        node(24, 0.0002, 0.0008),
        way(
            200,
            &[21, 22, 23, 24, 21],
            &[("leisure", "park"), ("name", "Test Green")],
        ),
    ]
}

/// Build the processed fixture graph.
#[allow(dead_code)]
pub fn build_fixture_graph() -> silent_stride::models::StrideGraph {
    GraphBuilder::new(30.0)
        .build("Testville", &street_elements(), &park_elements())
        .expect("fixture graph should build")
}

/// Create a test app over the fixture graph, with offline endpoints.
/// Route requests must use coordinate locations; geocoding would
/// require network access.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let engine = RoutingEngine::new(build_fixture_graph());
    let geocoder = GeocodeClient::new(&config.nominatim_url);

    let state = Arc::new(AppState {
        config,
        engine,
        geocoder,
        graph_built_at: "2026-01-01T00:00:00Z".to_string(),
    });

    (create_router(state.clone()), state)
}
