//! Fake catalog and optimizer services bound to ephemeral local ports.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{extract::State, http::StatusCode, routing::get, routing::post, Json, Router};
use serde_json::{json, Value};

/// Serve `app` on 127.0.0.1 and return its base URL.
pub async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake upstream");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Fake upstream crashed");
    });
    format!("http://{}", addr)
}

/// A URL nothing is listening on.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read local addr");
    drop(listener);
    format!("http://{}", addr)
}

pub fn sample_catalog() -> Value {
    json!([
        {
            "uuid": "0b7d8f0e-3f0a-4c59-8a53-7a1d2f6c9e01",
            "activity_type": "quiz",
            "title": "Quiz A",
            "description": "Ten questions",
            "tags": ["math"],
            "config": { "questions": [] },
            "parent_id": "act-17"
        },
        {
            "uuid": "5c2a9e44-1b6d-4f1e-9d0c-0e4b2a7f3c02",
            "title": "Debate",
            "description": "Two teams",
            "tags": ["speech"],
            "config": {}
        },
        {
            "uuid": "9e1f4c33-7a2b-4d8e-b6f0-3c5d1a2e4f03",
            "activity_type": "ac-video",
            "title": "Lecture",
            "description": "Watch the clip",
            "tags": [],
            "config": { "url": "https://example.org/v.mp4" }
        }
    ])
}

/// Catalog serving `entries` at `/activities`.
pub async fn spawn_catalog(entries: Value) -> String {
    let app = Router::new().route(
        "/activities",
        get(move || {
            let entries = entries.clone();
            async move { Json(entries) }
        }),
    );
    spawn(app).await
}

/// Catalog that always fails with `status`.
pub async fn spawn_failing_catalog(status: StatusCode) -> String {
    let app = Router::new().route(
        "/activities",
        get(move || async move { (status, "catalog down") }),
    );
    spawn(app).await
}

/// Bodies received by a fake optimizer.
pub type Received = Arc<Mutex<Vec<Value>>>;

/// Optimizer that records each posted body and answers `(status, reply)`.
pub async fn spawn_optimizer(status: StatusCode, reply: &'static str) -> (String, Received) {
    let received: Received = Arc::default();
    let app = Router::new()
        .route(
            "/",
            post(
                move |State(received): State<Received>, Json(body): Json<Value>| async move {
                    received.lock().unwrap().push(body);
                    (status, reply)
                },
            ),
        )
        .with_state(received.clone());
    (spawn(app).await, received)
}
