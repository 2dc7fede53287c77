//! TrackQuery — fetches track lists and resolves streams for the UI.
//!
//! Every fetch runs on its own task and reports back as a [`QueryOutcome`]
//! through the channel given to [`TrackQuery::new`].  The App feeds outcomes
//! into [`TrackQuery::apply`] on its own loop, so all state lives on one task.
//!
//! Each concern (trending, search, random, change) has its own ticket
//! counter.  An outcome is applied only when its ticket is still the latest
//! issued for that concern; anything older is dropped.

use std::sync::Arc;

use lofi_proto::gateway::{GatewayResult, TrackSource};
use lofi_proto::track::{StreamDescriptor, Track};
use rand::Rng;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub const TRENDING_ERROR_NOTE: &str = "error fetching tracks";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Concern {
    Trending,
    Search,
    Random,
    Change,
}

const CONCERNS: usize = 4;

impl Concern {
    fn slot(self) -> usize {
        match self {
            Concern::Trending => 0,
            Concern::Search => 1,
            Concern::Random => 2,
            Concern::Change => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
}

/// A finished fetch, tagged with the ticket it was issued under.
#[derive(Debug)]
pub enum QueryOutcome {
    Trending {
        ticket: u64,
        result: GatewayResult<Vec<Track>>,
    },
    Search {
        ticket: u64,
        query: String,
        result: GatewayResult<Vec<Track>>,
    },
    Random {
        ticket: u64,
        result: GatewayResult<Track>,
    },
    Resolved {
        ticket: u64,
        track: Track,
        resume_at: Option<f64>,
        result: GatewayResult<StreamDescriptor>,
    },
}

impl QueryOutcome {
    fn ticket(&self) -> (Concern, u64) {
        match self {
            QueryOutcome::Trending { ticket, .. } => (Concern::Trending, *ticket),
            QueryOutcome::Search { ticket, .. } => (Concern::Search, *ticket),
            QueryOutcome::Random { ticket, .. } => (Concern::Random, *ticket),
            QueryOutcome::Resolved { ticket, .. } => (Concern::Change, *ticket),
        }
    }
}

/// What the App should do after a call or an applied outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryEvent {
    /// Hand the track to the player.
    Publish {
        track: Track,
        resume_at: Option<f64>,
    },
    /// The list the next skips should walk.
    SetPlaylist(Vec<Track>),
    /// Something degraded; show it to the user.
    Warn(String),
    /// Lists or load states changed.
    Updated,
}

pub struct TrackQuery<S: TrackSource> {
    source: Arc<S>,
    outcome_tx: mpsc::Sender<QueryOutcome>,
    fallback: Vec<Track>,

    trending: Vec<Track>,
    trending_note: Option<String>,
    search_results: Vec<Track>,
    last_query: String,

    tickets: [u64; CONCERNS],
    states: [LoadState; CONCERNS],
}

impl<S: TrackSource> TrackQuery<S> {
    pub fn new(source: S, fallback: Vec<Track>, outcome_tx: mpsc::Sender<QueryOutcome>) -> Self {
        Self {
            source: Arc::new(source),
            outcome_tx,
            fallback,
            trending: Vec::new(),
            trending_note: None,
            search_results: Vec::new(),
            last_query: String::new(),
            tickets: [0; CONCERNS],
            states: [LoadState::Idle; CONCERNS],
        }
    }

    // ── accessors ─────────────────────────────────────────────────────────────

    pub fn trending(&self) -> &[Track] {
        &self.trending
    }

    pub fn trending_note(&self) -> Option<&str> {
        self.trending_note.as_deref()
    }

    pub fn search_results(&self) -> &[Track] {
        &self.search_results
    }

    pub fn last_query(&self) -> &str {
        &self.last_query
    }

    pub fn state(&self, concern: Concern) -> LoadState {
        self.states[concern.slot()]
    }

    pub fn is_loading(&self) -> bool {
        self.states.contains(&LoadState::Loading)
    }

    /// What the Home view lists: trending, else search results, else the
    /// fallback catalog.
    pub fn home_tracks(&self) -> &[Track] {
        if !self.trending.is_empty() {
            &self.trending
        } else if !self.search_results.is_empty() {
            &self.search_results
        } else {
            &self.fallback
        }
    }

    /// Pool for random play: search results when there are any, else trending.
    pub fn random_pool(&self) -> &[Track] {
        if !self.search_results.is_empty() {
            &self.search_results
        } else {
            &self.trending
        }
    }

    // ── requests ──────────────────────────────────────────────────────────────

    fn issue(&mut self, concern: Concern) -> u64 {
        let slot = concern.slot();
        self.tickets[slot] += 1;
        self.states[slot] = LoadState::Loading;
        self.tickets[slot]
    }

    fn is_current(&self, concern: Concern, ticket: u64) -> bool {
        self.tickets[concern.slot()] == ticket
    }

    fn finish(&mut self, concern: Concern) {
        self.states[concern.slot()] = LoadState::Ready;
    }

    /// A newer selection wins over a random fetch still in flight.
    fn supersede_random(&mut self) {
        let slot = Concern::Random.slot();
        self.tickets[slot] += 1;
        if self.states[slot] == LoadState::Loading {
            self.states[slot] = LoadState::Idle;
        }
    }

    pub fn load_trending(&mut self) {
        let ticket = self.issue(Concern::Trending);
        let source = Arc::clone(&self.source);
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = source.list_tracks().await;
            let _ = tx.send(QueryOutcome::Trending { ticket, result }).await;
        });
    }

    /// Search for `query`.  A blank query clears the results without a request.
    pub fn search(&mut self, query: &str) -> Vec<QueryEvent> {
        let query = query.trim().to_string();
        if query.is_empty() {
            // still advance the ticket so an in-flight search cannot land afterwards
            self.issue(Concern::Search);
            self.states[Concern::Search.slot()] = LoadState::Idle;
            self.search_results.clear();
            self.last_query.clear();
            return vec![QueryEvent::Updated];
        }

        let ticket = self.issue(Concern::Search);
        self.last_query = query.clone();
        let source = Arc::clone(&self.source);
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = source.search_tracks(&query).await;
            let _ = tx
                .send(QueryOutcome::Search {
                    ticket,
                    query,
                    result,
                })
                .await;
        });
        vec![QueryEvent::Updated]
    }

    /// Make `track` current.  Tracks with a resolvable id get their stream
    /// resolved first; anything else is published as-is.
    pub fn change_track(&mut self, track: Track, resume_at: Option<f64>) -> Vec<QueryEvent> {
        self.supersede_random();
        let ticket = self.issue(Concern::Change);
        let Some(id) = track.resolvable_id().cloned() else {
            self.finish(Concern::Change);
            return vec![QueryEvent::Publish { track, resume_at }];
        };

        debug!("tracks: resolving stream for {} (id {})", track.label(), id);
        let source = Arc::clone(&self.source);
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = source.resolve_stream(&id).await;
            let _ = tx
                .send(QueryOutcome::Resolved {
                    ticket,
                    track,
                    resume_at,
                    result,
                })
                .await;
        });
        vec![QueryEvent::Updated]
    }

    /// Play something at random from what is on screen, asking the backend
    /// when nothing is.
    pub fn play_random(&mut self) -> Vec<QueryEvent> {
        let pool = self.random_pool().to_vec();
        if pool.is_empty() {
            let ticket = self.issue(Concern::Random);
            let source = Arc::clone(&self.source);
            let tx = self.outcome_tx.clone();
            tokio::spawn(async move {
                let result = source.random_track().await;
                let _ = tx.send(QueryOutcome::Random { ticket, result }).await;
            });
            return vec![QueryEvent::Updated];
        }

        let track = pool[rand::thread_rng().gen_range(0..pool.len())].clone();
        info!("tracks: random pick {}", track.label());
        let mut events = vec![QueryEvent::SetPlaylist(pool)];
        events.extend(self.change_track(track, None));
        events
    }

    // ── outcomes ──────────────────────────────────────────────────────────────

    pub fn apply(&mut self, outcome: QueryOutcome) -> Vec<QueryEvent> {
        let (concern, ticket) = outcome.ticket();
        if !self.is_current(concern, ticket) {
            debug!(
                "tracks: dropping stale {:?} outcome (ticket {} < {})",
                concern,
                ticket,
                self.tickets[concern.slot()]
            );
            return Vec::new();
        }
        self.finish(concern);

        match outcome {
            QueryOutcome::Trending { result, .. } => self.on_trending(result),
            QueryOutcome::Search { query, result, .. } => self.on_search(query, result),
            QueryOutcome::Random { result, .. } => match result {
                Ok(track) => self.change_track(track, None),
                Err(e) => {
                    warn!("tracks: random track failed: {}", e);
                    vec![
                        QueryEvent::Warn("Could not fetch a random track".to_string()),
                        QueryEvent::Updated,
                    ]
                }
            },
            QueryOutcome::Resolved {
                track,
                resume_at,
                result,
                ..
            } => Self::on_resolved(track, resume_at, result),
        }
    }

    fn on_trending(&mut self, result: GatewayResult<Vec<Track>>) -> Vec<QueryEvent> {
        match result {
            Ok(tracks) if !tracks.is_empty() => {
                info!("tracks: {} trending tracks", tracks.len());
                self.trending = tracks;
                self.trending_note = None;
                vec![QueryEvent::Updated]
            }
            other => {
                match other {
                    Err(e) => warn!("tracks: trending failed: {}", e),
                    Ok(_) => warn!("tracks: backend returned no trending tracks"),
                }
                self.trending = self.fallback.clone();
                self.trending_note = Some(TRENDING_ERROR_NOTE.to_string());
                vec![
                    QueryEvent::Warn("Showing offline tracks".to_string()),
                    QueryEvent::Updated,
                ]
            }
        }
    }

    fn on_search(&mut self, query: String, result: GatewayResult<Vec<Track>>) -> Vec<QueryEvent> {
        match result {
            Ok(tracks) => {
                debug!("tracks: {} results for {:?}", tracks.len(), query);
                self.search_results = tracks;
                vec![QueryEvent::Updated]
            }
            Err(e) => {
                warn!("tracks: search {:?} failed: {}", query, e);
                self.search_results.clear();
                vec![
                    QueryEvent::Warn("Search failed".to_string()),
                    QueryEvent::Updated,
                ]
            }
        }
    }

    fn on_resolved(
        track: Track,
        resume_at: Option<f64>,
        result: GatewayResult<StreamDescriptor>,
    ) -> Vec<QueryEvent> {
        match result {
            Ok(stream) => vec![QueryEvent::Publish {
                track: track.with_stream(stream),
                resume_at,
            }],
            Err(e) if track.stream_url().is_some() => {
                warn!("tracks: resolve failed, using stored url: {}", e);
                vec![QueryEvent::Publish { track, resume_at }]
            }
            Err(e) => {
                warn!("tracks: resolve failed for {}: {}", track.label(), e);
                vec![QueryEvent::Warn("Could not load stream".to_string())]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lofi_proto::gateway::GatewayError;
    use lofi_proto::track::TrackId;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeSource {
        trending: Vec<Track>,
        fail_trending: bool,
        fail_resolve: bool,
        calls: Mutex<Vec<String>>,
    }

    fn failure(path: &str) -> GatewayError {
        GatewayError::RequestFailed {
            url: format!("http://fake{}", path),
            status: 500,
        }
    }

    impl TrackSource for FakeSource {
        async fn list_tracks(&self) -> GatewayResult<Vec<Track>> {
            self.calls.lock().unwrap().push("tracks".into());
            if self.fail_trending {
                return Err(failure("/tracks"));
            }
            Ok(self.trending.clone())
        }

        async fn random_track(&self) -> GatewayResult<Track> {
            self.calls.lock().unwrap().push("random".into());
            Ok(Track::new("Server Pick", "Backend").with_id(77i64))
        }

        async fn search_tracks(&self, query: &str) -> GatewayResult<Vec<Track>> {
            self.calls.lock().unwrap().push(format!("search:{}", query));
            Ok(vec![Track::new(query, "Search Artist").with_id(query)])
        }

        async fn resolve_stream(&self, id: &TrackId) -> GatewayResult<StreamDescriptor> {
            self.calls.lock().unwrap().push(format!("stream:{}", id));
            if self.fail_resolve {
                return Err(failure("/stream"));
            }
            Ok(StreamDescriptor {
                url: format!("https://cdn/{}.m4a", id),
                title: Some("Resolved".into()),
                artist: None,
                thumbnail: None,
            })
        }
    }

    fn query(
        source: FakeSource,
        fallback: Vec<Track>,
    ) -> (TrackQuery<FakeSource>, mpsc::Receiver<QueryOutcome>) {
        let (tx, rx) = mpsc::channel(16);
        (TrackQuery::new(source, fallback, tx), rx)
    }

    fn calls(q: &TrackQuery<FakeSource>) -> Vec<String> {
        q.source.calls.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_blank_search_makes_no_request() {
        let (mut q, mut rx) = query(FakeSource::default(), Vec::new());
        assert_eq!(q.search("   "), vec![QueryEvent::Updated]);
        assert!(q.search_results().is_empty());
        assert_eq!(q.state(Concern::Search), LoadState::Idle);
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
        assert!(calls(&q).is_empty());
    }

    #[tokio::test]
    async fn test_stale_search_is_discarded() {
        let (mut q, mut rx) = query(FakeSource::default(), Vec::new());
        q.search("rain");
        q.search("coffee");
        assert_eq!(q.last_query(), "coffee");

        for _ in 0..2 {
            let outcome = rx.recv().await.unwrap();
            q.apply(outcome);
        }
        assert_eq!(q.search_results().len(), 1);
        assert_eq!(q.search_results()[0].title, "coffee");
        assert_eq!(q.state(Concern::Search), LoadState::Ready);
    }

    #[tokio::test]
    async fn test_clearing_search_drops_in_flight_results() {
        let (mut q, mut rx) = query(FakeSource::default(), Vec::new());
        q.search("rain");
        q.search("");
        let outcome = rx.recv().await.unwrap();
        assert!(q.apply(outcome).is_empty());
        assert!(q.search_results().is_empty());
    }

    #[tokio::test]
    async fn test_trending_failure_degrades_to_fallback() {
        let source = FakeSource {
            fail_trending: true,
            ..Default::default()
        };
        let fallback = vec![Track::new("Midnight Study", "Cozy Beats").with_url("/music/1.mp3")];
        let (mut q, mut rx) = query(source, fallback.clone());

        q.load_trending();
        assert!(q.is_loading());
        let events = q.apply(rx.recv().await.unwrap());

        assert!(!q.is_loading());
        assert_eq!(q.trending(), fallback.as_slice());
        assert_eq!(q.trending_note(), Some(TRENDING_ERROR_NOTE));
        assert!(events.iter().any(|e| matches!(e, QueryEvent::Warn(_))));
    }

    #[tokio::test]
    async fn test_empty_trending_also_degrades() {
        let fallback = vec![Track::new("Offline", "Cozy Beats")];
        let (mut q, mut rx) = query(FakeSource::default(), fallback.clone());
        q.load_trending();
        q.apply(rx.recv().await.unwrap());
        assert_eq!(q.home_tracks(), fallback.as_slice());
        assert!(q.trending_note().is_some());
    }

    #[tokio::test]
    async fn test_change_track_without_id_publishes_immediately() {
        let (mut q, mut rx) = query(FakeSource::default(), Vec::new());
        let local = Track::new("Local", "Me").with_url("/music/local.mp3");
        let events = q.change_track(local.clone(), Some(12.0));
        assert_eq!(
            events,
            vec![QueryEvent::Publish {
                track: local,
                resume_at: Some(12.0)
            }]
        );
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_resolved_stream_is_merged() {
        let (mut q, mut rx) = query(FakeSource::default(), Vec::new());
        let hit = Track::new("Golden Hour", "Kyoto Loops").with_id("abc");
        q.change_track(hit, None);
        let events = q.apply(rx.recv().await.unwrap());
        let [QueryEvent::Publish { track, .. }] = events.as_slice() else {
            panic!("expected one publish, got {:?}", events);
        };
        assert_eq!(track.url.as_deref(), Some("https://cdn/abc.m4a"));
        assert_eq!(track.title, "Resolved");
        assert_eq!(track.artist, "Kyoto Loops");
    }

    #[tokio::test]
    async fn test_direct_publish_supersedes_in_flight_resolve() {
        let (mut q, mut rx) = query(FakeSource::default(), Vec::new());
        q.change_track(Track::new("Slow", "x").with_id("slow"), None);
        q.change_track(Track::new("Local", "x").with_url("/a.mp3"), None);
        assert!(q.apply(rx.recv().await.unwrap()).is_empty());
    }

    #[tokio::test]
    async fn test_resolve_failure_falls_back_to_stored_url() {
        let source = FakeSource {
            fail_resolve: true,
            ..Default::default()
        };
        let (mut q, mut rx) = query(source, Vec::new());

        let with_url = Track::new("Stored", "x").with_id(3i64).with_url("/music/3.mp3");
        q.change_track(with_url.clone(), None);
        assert_eq!(
            q.apply(rx.recv().await.unwrap()),
            vec![QueryEvent::Publish {
                track: with_url,
                resume_at: None
            }]
        );

        q.change_track(Track::new("No url", "x").with_id("yt"), None);
        assert_eq!(
            q.apply(rx.recv().await.unwrap()),
            vec![QueryEvent::Warn("Could not load stream".into())]
        );
    }

    #[tokio::test]
    async fn test_random_prefers_search_results() {
        let source = FakeSource {
            trending: vec![Track::new("Trending", "x").with_url("/t.mp3")],
            ..Default::default()
        };
        let (mut q, mut rx) = query(source, Vec::new());
        q.load_trending();
        q.apply(rx.recv().await.unwrap());
        q.search("lofi");
        q.apply(rx.recv().await.unwrap());

        let events = q.play_random();
        assert_eq!(
            events[0],
            QueryEvent::SetPlaylist(q.search_results().to_vec())
        );
        // the search hit has a text id, so it goes through resolution
        let QueryOutcome::Resolved { track, .. } = rx.recv().await.unwrap() else {
            panic!("expected a resolve");
        };
        assert_eq!(track.title, "lofi");
    }

    #[tokio::test]
    async fn test_random_with_nothing_listed_asks_backend() {
        let (mut q, mut rx) = query(FakeSource::default(), Vec::new());
        assert_eq!(q.play_random(), vec![QueryEvent::Updated]);
        let outcome = rx.recv().await.unwrap();
        assert!(matches!(outcome, QueryOutcome::Random { .. }));
        // the backend pick has a numeric id, so it is resolved next
        assert_eq!(q.apply(outcome), vec![QueryEvent::Updated]);
        let QueryOutcome::Resolved { track, .. } = rx.recv().await.unwrap() else {
            panic!("expected a resolve");
        };
        assert_eq!(track.title, "Server Pick");
        assert_eq!(calls(&q), vec!["random".to_string(), "stream:77".to_string()]);
    }

    #[tokio::test]
    async fn test_explicit_pick_supersedes_pending_random() {
        let (mut q, mut rx) = query(FakeSource::default(), Vec::new());
        assert_eq!(q.play_random(), vec![QueryEvent::Updated]);
        assert_eq!(q.state(Concern::Random), LoadState::Loading);

        let pick = Track::new("User Pick", "x").with_url("/pick.mp3");
        assert_eq!(
            q.change_track(pick.clone(), None),
            vec![QueryEvent::Publish {
                track: pick,
                resume_at: None
            }]
        );
        assert_eq!(q.state(Concern::Random), LoadState::Idle);

        // the backend's answer arrives late and must not replace the pick
        let outcome = rx.recv().await.unwrap();
        assert!(matches!(outcome, QueryOutcome::Random { .. }));
        assert!(q.apply(outcome).is_empty());
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
        assert_eq!(calls(&q), vec!["random".to_string()]);
    }
}
