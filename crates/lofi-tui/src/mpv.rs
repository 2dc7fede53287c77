/// mpv IPC driver with separated reader/writer tasks, and the `MediaOutput`
/// built on it.
///
/// ```text
///   MpvDriver::spawn_and_connect()
///         │
///         ├── writer_task   ← receives PendingRequest via mpsc, writes JSON lines
///         └── reader_task   ← reads JSON lines from the socket
///                                ├── response (has request_id) → matched oneshot::Sender
///                                └── event / property-change   → event_tx channel
/// ```
///
/// mpv runs with `--keep-open=yes`, so reaching the end of a file pauses on
/// the last frame instead of unloading it.  That keeps "seek to 0 and play"
/// valid for repeat, and end-of-track is observed through `eof-reached`.
///
/// Platform notes:
/// - Unix:   Unix domain sockets
/// - Windows: Named pipes  \\.\pipe\<name>
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{debug, info, warn};

#[cfg(unix)]
use tokio::net::UnixStream;

#[cfg(windows)]
use tokio::net::windows::named_pipe::ClientOptions;

use crate::core::{CoreEvent, MediaEvent, MediaOutput};

static NEXT_REQ_ID: AtomicU64 = AtomicU64::new(1);

// observe_property ids
pub const OBS_TIME_POS: u64 = 1;
pub const OBS_DURATION: u64 = 2;
pub const OBS_PAUSE: u64 = 3;
pub const OBS_EOF_REACHED: u64 = 4;

type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<anyhow::Result<Value>>>>>;

struct PendingRequest {
    req_id: u64,
    payload: String,
    reply: oneshot::Sender<anyhow::Result<Value>>,
}

/// An unsolicited mpv message (no request_id).
#[derive(Debug, Clone)]
pub struct MpvEvent {
    pub raw: Value,
}

impl MpvEvent {
    pub fn as_property_change(&self) -> Option<(u64, &Value)> {
        if self.raw.get("event")?.as_str()? == "property-change" {
            let id = self.raw.get("id")?.as_u64()?;
            let data = self.raw.get("data").unwrap_or(&Value::Null);
            Some((id, data))
        } else {
            None
        }
    }

    pub fn event_name(&self) -> Option<&str> {
        self.raw.get("event")?.as_str()
    }

    /// Translate into what the player core cares about.
    pub fn to_media_event(&self) -> Option<MediaEvent> {
        if let Some((id, data)) = self.as_property_change() {
            return match id {
                OBS_TIME_POS => data.as_f64().map(MediaEvent::TimeUpdate),
                OBS_DURATION => data.as_f64().map(MediaEvent::DurationChanged),
                OBS_PAUSE => data.as_bool().map(MediaEvent::Paused),
                OBS_EOF_REACHED => (data.as_bool() == Some(true)).then_some(MediaEvent::Ended),
                _ => None,
            };
        }
        match self.event_name()? {
            "end-file" => {
                let reason = self.raw.get("reason").and_then(|v| v.as_str())?;
                match reason {
                    "eof" => Some(MediaEvent::Ended),
                    "error" => {
                        let detail = self
                            .raw
                            .get("file_error")
                            .and_then(|v| v.as_str())
                            .unwrap_or("unknown error");
                        Some(MediaEvent::Failed(detail.to_string()))
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

// ── handle ────────────────────────────────────────────────────────────────────

/// Cloneable handle to the mpv writer task.
#[derive(Clone)]
pub struct MpvHandle {
    tx: mpsc::Sender<PendingRequest>,
}

impl MpvHandle {
    pub async fn send(&self, command: Value) -> anyhow::Result<Value> {
        let req_id = NEXT_REQ_ID.fetch_add(1, Ordering::Relaxed);
        let msg = json!({ "command": command, "request_id": req_id });
        let mut raw = serde_json::to_string(&msg)?;
        raw.push('\n');

        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(PendingRequest {
                req_id,
                payload: raw,
                reply: reply_tx,
            })
            .await
            .map_err(|_| anyhow::anyhow!("mpv writer task gone"))?;

        tokio::time::timeout(tokio::time::Duration::from_secs(5), reply_rx)
            .await
            .map_err(|_| anyhow::anyhow!("mpv IPC timeout for req={}", req_id))?
            .map_err(|_| anyhow::anyhow!("mpv reply channel dropped req={}", req_id))?
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub async fn load_file(&self, url: &str) -> anyhow::Result<()> {
        self.send(json!(["loadfile", url, "replace"])).await?;
        Ok(())
    }

    pub async fn set_pause(&self, paused: bool) -> anyhow::Result<()> {
        self.send(json!(["set_property", "pause", paused])).await?;
        Ok(())
    }

    pub async fn seek_to(&self, secs: f64) -> anyhow::Result<()> {
        self.send(json!(["seek", secs, "absolute"])).await?;
        Ok(())
    }

    pub async fn set_volume(&self, volume: f32) -> anyhow::Result<()> {
        let pct = (volume * 100.0).clamp(0.0, 100.0);
        self.send(json!(["set_property", "volume", pct])).await?;
        Ok(())
    }

    /// Register the property observations the core relies on.  mpv then
    /// pushes a `property-change` whenever one of them changes.
    pub async fn observe_all_properties(&self) {
        let props = [
            (OBS_TIME_POS, "time-pos"),
            (OBS_DURATION, "duration"),
            (OBS_PAUSE, "pause"),
            (OBS_EOF_REACHED, "eof-reached"),
        ];
        for (id, name) in &props {
            match self.send(json!(["observe_property", id, name])).await {
                Ok(_) => debug!("mpv: observe_property id={} name={}", id, name),
                Err(e) => warn!("mpv: observe_property {} failed: {}", name, e),
            }
        }
    }
}

// ── driver ────────────────────────────────────────────────────────────────────

/// Owns the mpv child process.
pub struct MpvDriver {
    socket_name: String,
    process: Option<tokio::process::Child>,
}

impl MpvDriver {
    pub fn new() -> Self {
        Self {
            socket_name: lofi_proto::platform::mpv_socket_name(),
            process: None,
        }
    }

    pub fn process_alive(&mut self) -> bool {
        let Some(child) = self.process.as_mut() else {
            return false;
        };
        match child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                warn!("mpv process exited: {}", status);
                false
            }
            Err(e) => {
                warn!("mpv process_alive check failed: {}", e);
                false
            }
        }
    }

    pub async fn kill(&mut self) {
        if let Some(mut p) = self.process.take() {
            let _ = p.kill().await;
        }
        #[cfg(unix)]
        {
            let _ = tokio::fs::remove_file(&self.socket_name).await;
        }
    }

    fn spawn_process(&mut self, volume: f32) -> anyhow::Result<()> {
        let mpv_binary = lofi_proto::platform::find_mpv_binary()
            .ok_or_else(|| anyhow::anyhow!("mpv binary not found"))?;
        let vol_arg = format!(
            "--volume={}",
            (volume * 100.0).clamp(0.0, 100.0).round() as i64
        );

        let data_dir = lofi_proto::platform::data_dir();
        std::fs::create_dir_all(&data_dir)?;
        let stderr_path = data_dir.join("mpv-stderr.log");
        let stderr_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&stderr_path)?;

        let child = tokio::process::Command::new(&mpv_binary)
            .arg("--no-video")
            .arg("--idle=yes")
            .arg("--keep-open=yes")
            .arg("--quiet")
            .arg(lofi_proto::platform::mpv_socket_arg())
            .arg(vol_arg)
            .stdout(std::process::Stdio::null())
            .stderr(stderr_file)
            .kill_on_drop(true)
            .spawn()?;
        info!(
            "mpv: spawned {} pid {:?}, stderr → {}",
            mpv_binary.display(),
            child.id(),
            stderr_path.display()
        );
        self.process = Some(child);
        Ok(())
    }

    #[cfg(unix)]
    pub async fn spawn_and_connect(
        &mut self,
        volume: f32,
        event_tx: mpsc::Sender<MpvEvent>,
    ) -> anyhow::Result<MpvHandle> {
        self.kill().await;
        let socket_path = std::path::PathBuf::from(&self.socket_name);
        self.spawn_process(volume)?;

        for _ in 0..50 {
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
            if socket_path.exists() {
                break;
            }
        }
        if !socket_path.exists() {
            anyhow::bail!("mpv IPC socket did not appear");
        }

        let stream = UnixStream::connect(&socket_path).await?;
        info!("mpv: connected to IPC socket");
        let (read_half, write_half) = stream.into_split();
        Ok(start_io_tasks(read_half, write_half, event_tx))
    }

    #[cfg(windows)]
    pub async fn spawn_and_connect(
        &mut self,
        volume: f32,
        event_tx: mpsc::Sender<MpvEvent>,
    ) -> anyhow::Result<MpvHandle> {
        self.kill().await;
        self.spawn_process(volume)?;

        let pipe_path = format!(r"\\.\pipe\{}", self.socket_name);
        for _ in 0..50 {
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
            if let Ok(client) = ClientOptions::new().open(&pipe_path) {
                info!("mpv: connected to named pipe");
                let (read_half, write_half) = tokio::io::split(client);
                return Ok(start_io_tasks(read_half, write_half, event_tx));
            }
        }
        anyhow::bail!("mpv named pipe did not appear")
    }
}

impl Default for MpvDriver {
    fn default() -> Self {
        Self::new()
    }
}

fn start_io_tasks<R, W>(read_half: R, write_half: W, event_tx: mpsc::Sender<MpvEvent>) -> MpvHandle
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
    W: tokio::io::AsyncWrite + Unpin + Send + 'static,
{
    let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
    let (cmd_tx, cmd_rx) = mpsc::channel::<PendingRequest>(64);
    tokio::spawn(writer_task(write_half, cmd_rx, pending.clone()));
    tokio::spawn(reader_task(BufReader::new(read_half), pending, event_tx));
    MpvHandle { tx: cmd_tx }
}

async fn fail_all(pending: &PendingMap, reason: &str) {
    let mut map = pending.lock().await;
    for (_, tx) in map.drain() {
        let _ = tx.send(Err(anyhow::anyhow!("{}", reason)));
    }
}

async fn reader_task<R>(mut reader: BufReader<R>, pending: PendingMap, event_tx: mpsc::Sender<MpvEvent>)
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                debug!("mpv reader: connection closed");
                fail_all(&pending, "mpv IPC connection closed").await;
                break;
            }
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let val: Value = match serde_json::from_str(trimmed) {
                    Ok(v) => v,
                    Err(e) => {
                        debug!("mpv reader: invalid json '{}': {}", trimmed, e);
                        continue;
                    }
                };

                if let Some(req_id) = val.get("request_id").and_then(|v| v.as_u64()) {
                    let reply = pending.lock().await.remove(&req_id);
                    match reply {
                        Some(tx) => {
                            let result = if val["error"].as_str() == Some("success") {
                                Ok(val)
                            } else {
                                let err = val["error"].as_str().unwrap_or("unknown error");
                                Err(anyhow::anyhow!("mpv error: {}", err))
                            };
                            let _ = tx.send(result);
                        }
                        None => debug!("mpv reader: response for unknown req={}", req_id),
                    }
                } else if event_tx.send(MpvEvent { raw: val }).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!("mpv reader: read error: {}", e);
                fail_all(&pending, "mpv IPC read error").await;
                break;
            }
        }
    }
}

async fn writer_task<W>(mut writer: W, mut rx: mpsc::Receiver<PendingRequest>, pending: PendingMap)
where
    W: tokio::io::AsyncWrite + Unpin,
{
    while let Some(req) = rx.recv().await {
        // register before writing so the reader can always match the reply
        pending.lock().await.insert(req.req_id, req.reply);
        debug!("mpv writer: req={} {}", req.req_id, req.payload.trim());
        if let Err(e) = writer.write_all(req.payload.as_bytes()).await {
            warn!("mpv writer: write error: {}", e);
            if let Some(tx) = pending.lock().await.remove(&req.req_id) {
                let _ = tx.send(Err(anyhow::anyhow!("mpv write error: {}", e)));
            }
            break;
        }
    }
    debug!("mpv writer: task exiting");
}

// ── MediaOutput ───────────────────────────────────────────────────────────────

/// mpv-backed output.  The process is started on the first load and
/// restarted on the next load if it has died.
pub struct MpvOutput {
    driver: MpvDriver,
    handle: Option<MpvHandle>,
    core_tx: mpsc::Sender<CoreEvent>,
}

impl MpvOutput {
    pub fn new(core_tx: mpsc::Sender<CoreEvent>) -> Self {
        Self {
            driver: MpvDriver::new(),
            handle: None,
            core_tx,
        }
    }

    async fn ensure_handle(&mut self, volume: f32) -> anyhow::Result<MpvHandle> {
        if let Some(handle) = &self.handle {
            if !handle.is_closed() && self.driver.process_alive() {
                return Ok(handle.clone());
            }
            warn!("mpv: process gone, respawning");
            self.handle = None;
        }

        let (event_tx, mut event_rx) = mpsc::channel::<MpvEvent>(64);
        let core_tx = self.core_tx.clone();
        tokio::spawn(async move {
            while let Some(evt) = event_rx.recv().await {
                let Some(media) = evt.to_media_event() else {
                    continue;
                };
                if core_tx.send(CoreEvent::Media(media)).await.is_err() {
                    break;
                }
            }
        });

        let handle = self.driver.spawn_and_connect(volume, event_tx).await?;
        handle.observe_all_properties().await;
        self.handle = Some(handle.clone());
        Ok(handle)
    }

    fn connected(&self) -> anyhow::Result<&MpvHandle> {
        self.handle
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("mpv is not running"))
    }
}

impl MediaOutput for MpvOutput {
    async fn load(&mut self, url: &str, volume: f32) -> anyhow::Result<()> {
        let handle = self.ensure_handle(volume).await?;
        handle.load_file(url).await?;
        handle.set_volume(volume).await
    }

    async fn play(&mut self) -> anyhow::Result<()> {
        self.connected()?.set_pause(false).await
    }

    async fn pause(&mut self) -> anyhow::Result<()> {
        self.connected()?.set_pause(true).await
    }

    async fn seek_to(&mut self, secs: f64) -> anyhow::Result<()> {
        self.connected()?.seek_to(secs).await
    }

    async fn set_volume(&mut self, volume: f32) -> anyhow::Result<()> {
        match &self.handle {
            Some(handle) => handle.set_volume(volume).await,
            // applied on the next load
            None => Ok(()),
        }
    }

    async fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.send(json!(["quit"])).await;
        }
        self.driver.kill().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evt(raw: Value) -> MpvEvent {
        MpvEvent { raw }
    }

    #[test]
    fn test_property_changes_map_to_media_events() {
        let time = evt(json!({"event": "property-change", "id": OBS_TIME_POS, "name": "time-pos", "data": 12.5}));
        assert_eq!(time.to_media_event(), Some(MediaEvent::TimeUpdate(12.5)));

        let dur = evt(json!({"event": "property-change", "id": OBS_DURATION, "data": 184.0}));
        assert_eq!(dur.to_media_event(), Some(MediaEvent::DurationChanged(184.0)));

        let pause = evt(json!({"event": "property-change", "id": OBS_PAUSE, "data": true}));
        assert_eq!(pause.to_media_event(), Some(MediaEvent::Paused(true)));

        let eof = evt(json!({"event": "property-change", "id": OBS_EOF_REACHED, "data": true}));
        assert_eq!(eof.to_media_event(), Some(MediaEvent::Ended));

        let not_eof = evt(json!({"event": "property-change", "id": OBS_EOF_REACHED, "data": false}));
        assert_eq!(not_eof.to_media_event(), None);

        // unavailable properties arrive without data
        let unset = evt(json!({"event": "property-change", "id": OBS_TIME_POS}));
        assert_eq!(unset.to_media_event(), None);
    }

    #[test]
    fn test_end_file_reasons() {
        let eof = evt(json!({"event": "end-file", "reason": "eof"}));
        assert_eq!(eof.to_media_event(), Some(MediaEvent::Ended));

        let err = evt(json!({"event": "end-file", "reason": "error", "file_error": "loading failed"}));
        assert_eq!(
            err.to_media_event(),
            Some(MediaEvent::Failed("loading failed".into()))
        );

        let stop = evt(json!({"event": "end-file", "reason": "stop"}));
        assert_eq!(stop.to_media_event(), None);
        assert_eq!(evt(json!({"event": "file-loaded"})).to_media_event(), None);
    }

    #[tokio::test]
    async fn test_io_tasks_match_replies_and_forward_events() {
        let (client, server) = tokio::io::duplex(4096);
        let (client_read, client_write) = tokio::io::split(client);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        let handle = start_io_tasks(client_read, client_write, event_tx);

        // fake mpv: answer every request, emitting an event first
        tokio::spawn(async move {
            let (server_read, mut server_write) = tokio::io::split(server);
            let mut lines = BufReader::new(server_read).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let req: Value = serde_json::from_str(&line).unwrap();
                let id = req["request_id"].as_u64().unwrap();
                let event = json!({"event": "property-change", "id": OBS_PAUSE, "data": false});
                let reply = if req["command"][0] == "bogus" {
                    json!({"request_id": id, "error": "invalid parameter"})
                } else {
                    json!({"request_id": id, "error": "success", "data": null})
                };
                let out = format!("{}\n{}\n", event, reply);
                server_write.write_all(out.as_bytes()).await.unwrap();
            }
        });

        handle.set_pause(false).await.unwrap();
        assert!(handle.send(json!(["bogus"])).await.is_err());

        let forwarded = event_rx.recv().await.unwrap();
        assert_eq!(forwarded.to_media_event(), Some(MediaEvent::Paused(false)));
    }
}
