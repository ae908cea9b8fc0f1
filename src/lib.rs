// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Silent Stride: quiet walking routes through a city street network.
//!
//! This crate provides the backend API for computing routes that trade
//! travel time against noise, green surroundings, and junction avoidance.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::{GeocodeClient, RoutingEngine};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub engine: RoutingEngine,
    pub geocoder: GeocodeClient,
    /// When the active graph was processed (RFC3339)
    pub graph_built_at: String,
}
