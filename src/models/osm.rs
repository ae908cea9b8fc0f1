// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! OpenStreetMap wire models for the Overpass API JSON format.

use serde::Deserialize;
use std::collections::HashMap;

/// Top-level Overpass API response.
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OsmElement>,
}

/// A single OSM element (node or way) from an Overpass response.
///
/// Relations are not requested by our queries; an unknown `type` is kept
/// so deserialization never fails on them.
#[derive(Debug, Clone, Deserialize)]
pub struct OsmElement {
    #[serde(rename = "type")]
    pub element_type: String,
    pub id: i64,
    /// Node latitude (nodes only)
    pub lat: Option<f64>,
    /// Node longitude (nodes only)
    pub lon: Option<f64>,
    /// Ordered member node ids (ways only)
    #[serde(default)]
    pub nodes: Vec<i64>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl OsmElement {
    pub fn is_node(&self) -> bool {
        self.element_type == "node"
    }

    pub fn is_way(&self) -> bool {
        self.element_type == "way"
    }

    /// Tag accessor.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Whether this node carries a traffic signal.
    pub fn is_traffic_signal(&self) -> bool {
        self.is_node() && self.tag("highway") == Some("traffic_signals")
    }

    /// Whether this way is closed (first node id equals last).
    pub fn is_closed_way(&self) -> bool {
        self.is_way() && self.nodes.len() >= 4 && self.nodes.first() == self.nodes.last()
    }
}
