mod action;
mod app;
mod app_state;
mod component;
mod components;
mod core;
mod focus;
mod layout;
mod mpv;
mod queue;
mod theme;
mod tracks;
mod widgets;

use anyhow::Context;
use tokio::sync::{broadcast, mpsc};

use lofi_proto::catalog::load_catalog;
use lofi_proto::config::Config;
use lofi_proto::favorites::Favorites;
use lofi_proto::gateway::TrackGateway;
use lofi_proto::session::Session;
use lofi_proto::store::LocalStore;
use lofi_proto::track::Track;

/// What the PlayerCore broadcasts.
#[derive(Debug, Clone)]
pub enum BroadcastMessage {
    /// The PlayerState changed; receivers read it from the shared handle.
    StateUpdated,
    /// A skip or end of track picked this one; it still needs resolving.
    TrackChangeRequested(Track),
    /// A log message from the core event loop.
    Log(String),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = lofi_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating {}", data_dir.display()))?;

    let log_path = lofi_proto::platform::log_file();
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; keep HTTP client internals quiet by default.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so it can be tailed immediately.
    eprintln!("lofichill log: {}", log_path.display());

    tracing::info!("lofichill starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("config: {:#}; using defaults", e);
        Config::default()
    });

    // ── Local data ───────────────────────────────────────────────────────────
    let store = LocalStore::open(config.paths.store_dir.clone());
    let favorites = Favorites::new(store.clone());
    let session = Session::new(store);
    let fallback = load_catalog(&config.paths.fallback_tracks);
    let gateway = TrackGateway::new(config.api.base_url.clone());

    // ── Broadcast channel (PlayerCore → TUI) ─────────────────────────────────
    let (broadcast_tx, broadcast_rx) = broadcast::channel::<BroadcastMessage>(1024);

    // ── CoreEvent channel (TUI + mpv → PlayerCore) ───────────────────────────
    let (core_tx, core_rx) = mpsc::channel::<core::CoreEvent>(1024);

    // ── Build PlayerCore ─────────────────────────────────────────────────────
    let output = mpv::MpvOutput::new(core_tx.clone());
    let player_core = core::PlayerCore::new(
        output,
        config.player.default_volume,
        broadcast_tx,
        Some(session.clone()),
    );
    let player_state = player_core.state_handle();

    let core_task = tokio::spawn(async move {
        if let Err(e) = player_core.run(core_rx).await {
            tracing::error!("PlayerCore exited with error: {:#}", e);
        }
    });

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let app = app::App::new(
        &config,
        gateway,
        fallback,
        favorites,
        session,
        core_tx.clone(),
        player_state,
    );
    let result = app.run(broadcast_rx).await;

    // ── Teardown: stop the core so mpv is released ───────────────────────────
    let _ = core_tx.send(core::CoreEvent::Shutdown).await;
    if let Err(e) = core_task.await {
        tracing::warn!("PlayerCore task failed: {}", e);
    }
    tracing::info!("lofichill stopped");

    result
}
