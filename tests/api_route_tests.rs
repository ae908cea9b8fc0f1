// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API surface tests: validation failures and coordinate-based routing.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

fn route_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/route")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_graph_summary() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/graph")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["place"], "Testville");
    assert_eq!(body["nodes"], 10);
    assert_eq!(body["edges"], 17);
}

#[tokio::test]
async fn test_peace_out_of_range_rejected() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(route_request(serde_json::json!({
            "start": {"lat": 0.0, "lon": 0.0},
            "end": {"lat": 0.0, "lon": 0.002},
            "peace": 150
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_hour_out_of_range_rejected() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(route_request(serde_json::json!({
            "start": {"lat": 0.0, "lon": 0.0},
            "end": {"lat": 0.0, "lon": 0.002},
            "hour": 99
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_address_rejected() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(route_request(serde_json::json!({
            "start": "   ",
            "end": {"lat": 0.0, "lon": 0.002}
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_coordinates_out_of_range_rejected() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(route_request(serde_json::json!({
            "start": {"lat": 95.0, "lon": 0.0},
            "end": {"lat": 0.0, "lon": 0.002}
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_coordinate_route_fastest() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(route_request(serde_json::json!({
            "start": {"lat": 0.0, "lon": 0.0},
            "end": {"lat": 0.0, "lon": 0.002},
            "peace": 0,
            "hour": 13
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;

    let distance = body["analytics"]["distance_meters"].as_f64().unwrap();
    assert!((distance - 222.6).abs() < 1.0);
    assert_eq!(body["quiet_hours"], false);
    assert_eq!(body["hour"], 13);
    assert_eq!(body["route"]["geometry"]["type"], "LineString");
    assert!(!body["polyline"].as_str().unwrap().is_empty());
    assert!(body["map_file"].is_null());
}

#[tokio::test]
async fn test_peace_profile_changes_route() {
    let (app, _state) = common::create_test_app();

    let quiet_response = app
        .oneshot(route_request(serde_json::json!({
            "start": {"lat": 0.0, "lon": 0.0},
            "end": {"lat": 0.0, "lon": 0.002},
            "peace": 100,
            "hour": 13
        })))
        .await
        .unwrap();

    assert_eq!(quiet_response.status(), StatusCode::OK);
    let body = response_json(quiet_response).await;

    // Full peace takes the longer residential detour
    let distance = body["analytics"]["distance_meters"].as_f64().unwrap();
    assert!((distance - 334.0).abs() < 1.0);

    let green = body["analytics"]["green_percent"].as_f64().unwrap();
    assert!(green > 50.0);
}

#[tokio::test]
async fn test_disconnected_route_is_not_found() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(route_request(serde_json::json!({
            "start": {"lat": 0.0, "lon": 0.0},
            "end": {"lat": 0.005, "lon": 0.005}
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["error"], "no_route");
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/route")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"start\": 5}"))
                .unwrap(),
        )
        .await
        .unwrap();

    // Neither an address string nor a coordinate object
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
