//! In-process stand-in for the track backend.

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;

fn catalog() -> Value {
    json!([
        {"id": 1, "title": "Midnight Study", "artist": "Cozy Beats",
         "url": "/music/midnight-study.mp3", "cover": "/covers/1.jpg"},
        {"id": 2, "title": "", "artist": "LoFi Vibes",
         "url": "/music/chill-horizon.mp3", "album_cover": "/covers/2.jpg"}
    ])
}

async fn tracks() -> Json<Value> {
    Json(catalog())
}

async fn random_track() -> Json<Value> {
    Json(catalog()[0].clone())
}

async fn search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let q = params.get("q").cloned().unwrap_or_default();
    // echo the decoded query back so tests can check encoding
    Json(json!([
        {"id": "yt-001", "title": q, "artist": "Kyoto Loops",
         "thumbnail": "https://i.example/yt-001.jpg"}
    ]))
}

async fn stream(Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    match id.as_str() {
        "missing" => Err(StatusCode::NOT_FOUND),
        "broken" => Ok(Json(json!({"no_url_here": true}))),
        _ => Ok(Json(json!({
            "url": format!("https://cdn.example/{}.m4a", id),
            "title": "Resolved Title",
            "artist": "",
            "thumbnail": format!("https://i.example/{}.jpg", id),
        }))),
    }
}

/// Serve the mock on an ephemeral port and return its base URL.
pub async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/tracks", get(tracks))
        .route("/random-track", get(random_track))
        .route("/search", get(search))
        .route("/stream/:id", get(stream));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().expect("mock backend address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{}", addr)
}
