mod common;

use lofi_proto::gateway::{GatewayError, TrackGateway, TrackSource};
use lofi_proto::track::{TrackId, UNKNOWN_TITLE};

#[tokio::test]
async fn list_tracks_applies_placeholders_and_artwork() {
    let gw = TrackGateway::new(common::spawn_backend().await);
    let tracks = gw.list_tracks().await.expect("list should succeed");

    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].id, Some(TrackId::Num(1)));
    assert_eq!(tracks[0].artwork(), "/covers/1.jpg");
    assert_eq!(tracks[1].title, UNKNOWN_TITLE);
    assert_eq!(tracks[1].artwork(), "/covers/2.jpg");
}

#[tokio::test]
async fn search_encodes_query_and_maps_thumbnail() {
    let gw = TrackGateway::new(common::spawn_backend().await);
    let hits = gw
        .search_tracks("rain & coffee #1")
        .await
        .expect("search should succeed");

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "rain & coffee #1");
    assert_eq!(hits[0].id, Some(TrackId::Text("yt-001".into())));
    assert_eq!(hits[0].artwork(), "https://i.example/yt-001.jpg");
    assert!(hits[0].stream_url().is_none());
}

#[tokio::test]
async fn resolve_stream_merges_over_track() {
    let gw = TrackGateway::new(common::spawn_backend().await);
    let hits = gw.search_tracks("anything").await.unwrap();
    let id = hits[0].resolvable_id().cloned().unwrap();

    let stream = gw.resolve_stream(&id).await.expect("resolve should succeed");
    assert_eq!(stream.url, "https://cdn.example/yt-001.m4a");

    let merged = hits[0].with_stream(stream);
    assert_eq!(merged.stream_url(), Some("https://cdn.example/yt-001.m4a"));
    assert_eq!(merged.title, "Resolved Title");
    // blank artist in the descriptor keeps the track's own
    assert_eq!(merged.artist, "Kyoto Loops");
}

#[tokio::test]
async fn non_success_status_is_request_failed() {
    let gw = TrackGateway::new(common::spawn_backend().await);
    let err = gw
        .resolve_stream(&TrackId::from("missing"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, GatewayError::RequestFailed { status: 404, .. }),
        "got {:?}",
        err
    );
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let gw = TrackGateway::new(common::spawn_backend().await);
    let err = gw
        .resolve_stream(&TrackId::from("broken"))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Decode { .. }), "got {:?}", err);
}

#[tokio::test]
async fn random_track_and_unreachable_backend() {
    let gw = TrackGateway::new(common::spawn_backend().await);
    let track = gw.random_track().await.expect("random should succeed");
    assert_eq!(track.title, "Midnight Study");

    // port 9 (discard) on localhost is not listening in test environments
    let dead = TrackGateway::new("http://127.0.0.1:9");
    let err = dead.list_tracks().await.unwrap_err();
    assert!(matches!(err, GatewayError::Transport { .. }), "got {:?}", err);
}
