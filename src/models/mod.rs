// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod graph;
pub mod osm;
pub mod route;

pub use graph::{GraphNode, LocalProjection, StreetEdge, StrideGraph};
pub use osm::{OsmElement, OverpassResponse};
pub use route::{ComputedRoute, RouteAnalytics, RoutePreferences};
