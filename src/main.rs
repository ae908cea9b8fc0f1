// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Silent Stride API Server
//!
//! Computes peaceful walking routes by blending travel time with noise,
//! green cover, and junction avoidance over an OpenStreetMap street graph.

use silent_stride::{
    config::Config,
    services::{get_graph, GeocodeClient, RoutingEngine},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, place = %config.place, "Starting Silent Stride API");

    // Load or build the processed street graph
    let loaded = get_graph(&config)
        .await
        .expect("Failed to load or build the street graph");
    tracing::info!(
        nodes = loaded.graph.node_count(),
        edges = loaded.graph.edge_count(),
        from_cache = loaded.from_cache,
        "Street graph ready"
    );

    // Initialize the routing engine and geocoder
    let engine = RoutingEngine::new(loaded.graph);
    let geocoder = GeocodeClient::new(&config.nominatim_url);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        engine,
        geocoder,
        graph_built_at: loaded.built_at,
    });

    // Build router
    let app = silent_stride::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("silent_stride=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
