// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Route preferences, analytics, and computed-route results.

use serde::{Deserialize, Serialize};

/// User routing preferences.
///
/// `peace` is the profile slider position: 0 means pure speed, 100 means
/// pure peace. The two weights always sum to 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RoutePreferences {
    pub peace: u8,
    pub prefer_parks: bool,
    pub avoid_junctions: bool,
}

impl Default for RoutePreferences {
    fn default() -> Self {
        Self {
            peace: 0,
            prefer_parks: false,
            avoid_junctions: false,
        }
    }
}

impl RoutePreferences {
    /// Weight on the normalized noise cost.
    pub fn w_noise(&self) -> f64 {
        f64::from(self.peace.min(100)) / 100.0
    }

    /// Weight on the normalized time cost.
    pub fn w_time(&self) -> f64 {
        1.0 - self.w_noise()
    }
}

/// Aggregate figures for a computed route.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RouteAnalytics {
    /// Total traversal time in seconds
    pub time_secs: f64,
    /// Total route length in meters
    pub distance_meters: f64,
    /// Noise score per meter (quiet-hours reduction already applied)
    pub avg_noise: f64,
    /// Share of traversal time spent on green-cover edges, 0-100
    pub green_percent: f64,
}

/// Result of a route computation, in geographic coordinates.
#[derive(Debug, Clone)]
pub struct ComputedRoute {
    pub analytics: RouteAnalytics,
    /// Route geometry as lon/lat pairs
    pub geometry: Vec<[f64; 2]>,
    /// Start of the route as (lat, lon)
    pub start_location: (f64, f64),
    /// Geometry bounds as [min_lon, min_lat, max_lon, max_lat]
    pub bounds: [f64; 4],
    /// Hour the weight selection was based on
    pub hour: u32,
    /// Whether quiet-hours logic was in effect
    pub quiet_hours: bool,
}
