/// PlayerCore — single-owner event loop for playback.
///
/// Owns the media output and the authoritative `PlayerState` exclusively.
/// Player commands from the UI and media events from the output both arrive
/// as `CoreEvent`s on one mpsc channel.  After each change the core bumps
/// `rev` and broadcasts `BroadcastMessage::StateUpdated`; receivers read the
/// snapshot from the shared handle.
///
/// Skips never load anything themselves: the chosen track is broadcast as
/// `TrackChangeRequested` and comes back as a `Load` once its stream has
/// been resolved.
use std::future::Future;
use std::sync::Arc;

use lofi_proto::protocol::{PlaybackStatus, PlayerCommand, PlayerState, SkipDirection};
use lofi_proto::session::Session;
use lofi_proto::track::Track;
use tokio::sync::{broadcast, mpsc, RwLock};
use tracing::{debug, info, warn};

use crate::queue;
use crate::BroadcastMessage;

/// Durations at or below this are not trusted for resuming.
const RESUME_MIN_DURATION_SECS: f64 = 5.0;

// ── Media output ──────────────────────────────────────────────────────────────

/// What the output reports back, asynchronously, through the core channel.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    TimeUpdate(f64),
    DurationChanged(f64),
    Paused(bool),
    Ended,
    Failed(String),
}

/// The sink audio is played through.  Errors mean the output refused the
/// operation (the `PlaybackRejected` case); the core logs them and carries on.
pub trait MediaOutput: Send + 'static {
    fn load(&mut self, url: &str, volume: f32) -> impl Future<Output = anyhow::Result<()>> + Send;
    fn play(&mut self) -> impl Future<Output = anyhow::Result<()>> + Send;
    fn pause(&mut self) -> impl Future<Output = anyhow::Result<()>> + Send;
    fn seek_to(&mut self, secs: f64) -> impl Future<Output = anyhow::Result<()>> + Send;
    fn set_volume(&mut self, volume: f32) -> impl Future<Output = anyhow::Result<()>> + Send;
    /// Tear the output down.  Called once when the core stops.
    fn release(&mut self) -> impl Future<Output = ()> + Send;
}

// ── CoreEvent ─────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum CoreEvent {
    Command(PlayerCommand),
    Media(MediaEvent),
    Shutdown,
}

pub type SharedPlayerState = Arc<RwLock<PlayerState>>;

// ── PlayerCore ────────────────────────────────────────────────────────────────

pub struct PlayerCore<M: MediaOutput> {
    output: M,
    state: SharedPlayerState,
    broadcast_tx: broadcast::Sender<BroadcastMessage>,
    session: Option<Session>,
    /// Position to jump to once a usable duration is known.
    pending_resume: Option<f64>,
    /// Whole second last written to the session, to keep writes to one per second.
    last_saved_second: Option<u64>,
}

impl<M: MediaOutput> PlayerCore<M> {
    pub fn new(
        output: M,
        initial_volume: f32,
        broadcast_tx: broadcast::Sender<BroadcastMessage>,
        session: Option<Session>,
    ) -> Self {
        Self {
            output,
            state: Arc::new(RwLock::new(PlayerState::new(initial_volume))),
            broadcast_tx,
            session,
            pending_resume: None,
            last_saved_second: None,
        }
    }

    /// Read handle for the UI.
    pub fn state_handle(&self) -> SharedPlayerState {
        Arc::clone(&self.state)
    }

    /// Run until `Shutdown` arrives or every sender is gone, then release the output.
    pub async fn run(mut self, mut event_rx: mpsc::Receiver<CoreEvent>) -> anyhow::Result<()> {
        info!("PlayerCore: starting event loop");
        loop {
            match event_rx.recv().await {
                None => {
                    info!("PlayerCore: event channel closed, shutting down");
                    break;
                }
                Some(CoreEvent::Shutdown) => {
                    info!("PlayerCore: shutdown requested");
                    break;
                }
                Some(CoreEvent::Command(cmd)) => {
                    debug!("PlayerCore: command {:?}", cmd);
                    self.handle_command(cmd).await;
                }
                Some(CoreEvent::Media(evt)) => {
                    self.handle_media_event(evt).await;
                }
            }
        }
        self.shutdown().await;
        Ok(())
    }

    pub async fn shutdown(&mut self) {
        self.output.release().await;
        info!("PlayerCore: output released");
    }

    // ── command handlers ──────────────────────────────────────────────────────

    pub async fn handle_command(&mut self, cmd: PlayerCommand) {
        match cmd {
            PlayerCommand::Load { track, resume_at } => self.load(track, resume_at).await,
            PlayerCommand::TogglePlay => self.toggle_play().await,
            PlayerCommand::Seek { seconds } => self.seek(seconds).await,
            PlayerCommand::SeekRelative { seconds } => {
                let target = self.state.read().await.position_secs + seconds;
                self.seek(target).await;
            }
            PlayerCommand::SetVolume { value } => self.set_volume(value).await,
            PlayerCommand::Skip { direction } => self.skip(direction).await,
            PlayerCommand::SetPlaylist { tracks } => {
                self.update(|s| s.playlist = tracks).await;
            }
            PlayerCommand::ToggleRepeat => {
                self.update(|s| s.repeat = !s.repeat).await;
            }
            PlayerCommand::ToggleShuffle => {
                self.update(|s| s.shuffle = !s.shuffle).await;
            }
        }
    }

    async fn load(&mut self, track: Track, resume_at: Option<f64>) {
        info!("PlayerCore: load {}", track.label());
        self.pending_resume = resume_at.filter(|secs| *secs > 0.0);
        self.last_saved_second = None;
        if let Some(session) = &self.session {
            session.save_current_track(&track);
        }

        let url = track.stream_url().map(str::to_string);
        let volume = self.state.read().await.volume;
        self.update(|s| {
            s.current = Some(track);
            s.position_secs = 0.0;
            s.duration_secs = 0.0;
            s.status = PlaybackStatus::Paused;
        })
        .await;

        let Some(url) = url else {
            self.reject("track has no playable url").await;
            return;
        };
        if let Err(e) = self.output.load(&url, volume).await {
            self.reject(&format!("load failed: {:#}", e)).await;
            return;
        }
        match self.output.play().await {
            Ok(()) => self.set_status(PlaybackStatus::Playing).await,
            Err(e) => self.reject(&format!("autoplay rejected: {:#}", e)).await,
        }
    }

    async fn toggle_play(&mut self) {
        let status = self.state.read().await.status;
        match status {
            PlaybackStatus::Empty => {}
            PlaybackStatus::Playing => match self.output.pause().await {
                Ok(()) => self.set_status(PlaybackStatus::Paused).await,
                Err(e) => warn!("PlayerCore: pause failed: {:#}", e),
            },
            PlaybackStatus::Paused => match self.output.play().await {
                Ok(()) => self.set_status(PlaybackStatus::Playing).await,
                Err(e) => self.reject(&format!("play rejected: {:#}", e)).await,
            },
        }
    }

    async fn seek(&mut self, seconds: f64) {
        let (has_track, duration) = {
            let s = self.state.read().await;
            (s.has_track(), s.duration_secs)
        };
        if !has_track {
            return;
        }
        let target = seconds.clamp(0.0, duration.max(0.0));
        if let Err(e) = self.output.seek_to(target).await {
            warn!("PlayerCore: seek to {:.1}s failed: {:#}", target, e);
            return;
        }
        self.update(|s| s.position_secs = target).await;
        self.save_progress(target, true);
    }

    async fn set_volume(&mut self, value: f32) {
        let volume = value.clamp(0.0, 1.0);
        if let Err(e) = self.output.set_volume(volume).await {
            warn!("PlayerCore: set volume failed: {:#}", e);
        }
        self.update(|s| s.volume = volume).await;
    }

    async fn skip(&mut self, direction: SkipDirection) {
        let target = {
            let s = self.state.read().await;
            queue::skip_target(&s.playlist, s.current.as_ref(), direction, s.shuffle)
        };
        match target {
            Some(track) => {
                debug!("PlayerCore: skip {:?} → {}", direction, track.label());
                let _ = self
                    .broadcast_tx
                    .send(BroadcastMessage::TrackChangeRequested(track));
            }
            None => debug!("PlayerCore: skip {:?} is a no-op", direction),
        }
    }

    // ── media event handler ───────────────────────────────────────────────────

    pub async fn handle_media_event(&mut self, evt: MediaEvent) {
        if !self.state.read().await.has_track() {
            debug!("PlayerCore: ignoring {:?} with no track", evt);
            return;
        }
        match evt {
            MediaEvent::TimeUpdate(secs) => {
                self.update(|s| s.position_secs = secs.max(0.0)).await;
                self.save_progress(secs, false);
            }
            MediaEvent::DurationChanged(secs) => {
                self.update(|s| s.duration_secs = secs.max(0.0)).await;
                if secs > RESUME_MIN_DURATION_SECS {
                    if let Some(resume) = self.pending_resume.take() {
                        info!("PlayerCore: resuming at {:.1}s", resume);
                        self.seek(resume).await;
                    }
                }
            }
            MediaEvent::Paused(paused) => {
                let status = if paused {
                    PlaybackStatus::Paused
                } else {
                    PlaybackStatus::Playing
                };
                self.set_status(status).await;
            }
            MediaEvent::Ended => self.on_ended().await,
            MediaEvent::Failed(reason) => {
                self.reject(&format!("playback failed: {}", reason)).await;
                let _ = self.output.pause().await;
            }
        }
    }

    async fn on_ended(&mut self) {
        let repeat = self.state.read().await.repeat;
        if !repeat {
            self.skip(SkipDirection::Next).await;
            return;
        }
        debug!("PlayerCore: repeat, restarting track");
        if let Err(e) = self.output.seek_to(0.0).await {
            warn!("PlayerCore: restart seek failed: {:#}", e);
        }
        self.update(|s| s.position_secs = 0.0).await;
        match self.output.play().await {
            Ok(()) => self.set_status(PlaybackStatus::Playing).await,
            Err(e) => self.reject(&format!("replay rejected: {:#}", e)).await,
        }
    }

    // ── state helpers ─────────────────────────────────────────────────────────

    async fn update(&self, f: impl FnOnce(&mut PlayerState)) {
        {
            let mut state = self.state.write().await;
            f(&mut state);
            state.rev += 1;
        }
        let _ = self.broadcast_tx.send(BroadcastMessage::StateUpdated);
    }

    async fn set_status(&self, status: PlaybackStatus) {
        if self.state.read().await.status != status {
            debug!("PlayerCore: status → {:?}", status);
            self.update(|s| s.status = status).await;
        }
    }

    /// The output refused: settle in `Paused` and tell the UI.
    async fn reject(&self, reason: &str) {
        warn!("PlayerCore: {}", reason);
        if self.state.read().await.has_track() {
            self.set_status(PlaybackStatus::Paused).await;
        }
        let _ = self
            .broadcast_tx
            .send(BroadcastMessage::Log(format!("Playback: {}", reason)));
    }

    fn save_progress(&mut self, secs: f64, force: bool) {
        let Some(session) = &self.session else {
            return;
        };
        let second = secs.max(0.0) as u64;
        if force || self.last_saved_second != Some(second) {
            self.last_saved_second = Some(second);
            session.save_progress(secs);
        }
    }
}
