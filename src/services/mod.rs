// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod geocode;
pub mod graph_builder;
pub mod map_export;
pub mod overpass;
pub mod parks;
pub mod router;

pub use geocode::{GeocodeClient, GeocodeError};
pub use graph_builder::{get_graph, GraphBuilder, GraphStore};
pub use overpass::{OverpassClient, OverpassError};
pub use parks::{ParkError, ParkIndex};
pub use router::{RouteError, RoutingEngine};
