//! Scripted fakes shared by the orchestrator integration tests.
//!
//! These drive the flows without network or a browser: the metadata fake
//! resolves canned responses after configurable delays (so paused-clock
//! tests can interleave fetches deterministically), the trending fake records
//! calls, and the player runtime fake counts widget usage.

// Each test binary compiles this module separately and uses its own subset.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use cinescout::error::{AppError, AppResult};
use cinescout::models::{MovieDetail, MovieSummary, Trailer, VideoEntry};
use cinescout::services::player::{EmbedPlayer, PlayerError, PlayerRuntime};
use cinescout::services::providers::MetadataProvider;
use cinescout::services::trending::TrendingStore;

pub fn movie(id: u64, title: &str) -> MovieSummary {
    MovieSummary {
        id,
        title: title.to_string(),
        poster_path: Some(format!("/poster-{}.jpg", id)),
        release_date: None,
        vote_average: None,
        original_language: None,
    }
}

pub fn detail(id: u64, title: &str) -> MovieDetail {
    MovieDetail {
        id,
        title: title.to_string(),
        poster_path: None,
        backdrop_path: None,
        release_date: None,
        vote_average: None,
        vote_count: 0,
        popularity: 0.0,
        original_language: None,
        runtime: Some(120),
        genres: vec![],
        overview: None,
        budget: 0,
        revenue: 0,
        production_countries: vec![],
        production_companies: vec![],
        spoken_languages: vec![],
        status: None,
        tagline: None,
        homepage: None,
        trailer: None,
    }
}

pub fn official_trailer(key: &str) -> VideoEntry {
    VideoEntry {
        key: key.to_string(),
        name: "Official Trailer".to_string(),
        site: "YouTube".to_string(),
        kind: "Trailer".to_string(),
    }
}

pub fn expected_trailer(key: &str, seconds: u64, formatted: &str) -> Trailer {
    Trailer {
        key: key.to_string(),
        url: format!("https://www.youtube.com/watch?v={}", key),
        duration_seconds: Some(seconds),
        duration_formatted: Some(formatted.to_string()),
    }
}

struct Scripted<T> {
    delay: Duration,
    result: Result<T, String>,
}

impl<T: Clone> Scripted<T> {
    async fn resolve(&self) -> AppResult<T> {
        tokio::time::sleep(self.delay).await;
        self.result
            .clone()
            .map_err(|message| AppError::Transport(message))
    }
}

/// Metadata provider resolving canned responses after scripted delays.
#[derive(Default)]
pub struct ScriptedMetadata {
    searches: HashMap<String, Scripted<Vec<MovieSummary>>>,
    details: HashMap<u64, Scripted<MovieDetail>>,
    videos: HashMap<u64, Scripted<Vec<VideoEntry>>>,
    pub search_calls: Mutex<Vec<String>>,
}

impl ScriptedMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(
        mut self,
        term: &str,
        delay: Duration,
        result: Result<Vec<MovieSummary>, &str>,
    ) -> Self {
        self.searches.insert(
            term.to_string(),
            Scripted {
                delay,
                result: result.map_err(str::to_string),
            },
        );
        self
    }

    pub fn with_detail(
        mut self,
        movie_id: u64,
        delay: Duration,
        result: Result<MovieDetail, &str>,
    ) -> Self {
        self.details.insert(
            movie_id,
            Scripted {
                delay,
                result: result.map_err(str::to_string),
            },
        );
        self
    }

    pub fn with_videos(
        mut self,
        movie_id: u64,
        delay: Duration,
        result: Result<Vec<VideoEntry>, &str>,
    ) -> Self {
        self.videos.insert(
            movie_id,
            Scripted {
                delay,
                result: result.map_err(str::to_string),
            },
        );
        self
    }
}

#[async_trait]
impl MetadataProvider for ScriptedMetadata {
    async fn search_movies(&self, term: &str) -> AppResult<Vec<MovieSummary>> {
        if let Ok(mut calls) = self.search_calls.lock() {
            calls.push(term.to_string());
        }
        match self.searches.get(term) {
            Some(scripted) => scripted.resolve().await,
            None => Err(AppError::Transport(format!("unscripted term: {}", term))),
        }
    }

    async fn movie_detail(&self, movie_id: u64) -> AppResult<MovieDetail> {
        match self.details.get(&movie_id) {
            Some(scripted) => scripted.resolve().await,
            None => Err(AppError::Transport(format!("unscripted movie: {}", movie_id))),
        }
    }

    async fn movie_videos(&self, movie_id: u64) -> AppResult<Vec<VideoEntry>> {
        match self.videos.get(&movie_id) {
            Some(scripted) => scripted.resolve().await,
            None => Ok(vec![]),
        }
    }
}

/// Trending store that records calls instead of talking to a backend.
#[derive(Default)]
pub struct RecordingTrending {
    pub records: Mutex<Vec<(String, u64)>>,
    pub fail: bool,
}

impl RecordingTrending {
    pub fn recorded(&self) -> Vec<(String, u64)> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TrendingStore for RecordingTrending {
    async fn record_search(&self, term: &str, top_result: &MovieSummary) -> AppResult<()> {
        if self.fail {
            return Err(AppError::Transport("trending store down".to_string()));
        }
        if let Ok(mut records) = self.records.lock() {
            records.push((term.to_string(), top_result.id));
        }
        Ok(())
    }

    async fn top_trending(&self, _limit: usize) -> AppResult<Vec<cinescout::models::TrendingEntry>> {
        Ok(vec![])
    }
}

/// Player runtime that resolves every player with one scripted signal and
/// counts how often the widget is touched.
pub struct CountingRuntime {
    outcome: Result<f64, i32>,
    pub load_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub created_keys: Mutex<Vec<String>>,
}

impl CountingRuntime {
    pub fn ready(duration_seconds: f64) -> Self {
        Self::new(Ok(duration_seconds))
    }

    pub fn erroring(code: i32) -> Self {
        Self::new(Err(code))
    }

    fn new(outcome: Result<f64, i32>) -> Self {
        Self {
            outcome,
            load_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            created_keys: Mutex::new(vec![]),
        }
    }
}

struct CountingPlayer {
    outcome: Result<f64, i32>,
}

#[async_trait]
impl EmbedPlayer for CountingPlayer {
    async fn duration_seconds(self: Box<Self>) -> Result<f64, PlayerError> {
        self.outcome.map_err(PlayerError::Playback)
    }
}

#[async_trait]
impl PlayerRuntime for CountingRuntime {
    async fn ensure_loaded(&self) -> Result<(), PlayerError> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn create_player(&self, video_key: &str) -> Result<Box<dyn EmbedPlayer>, PlayerError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut keys) = self.created_keys.lock() {
            keys.push(video_key.to_string());
        }
        Ok(Box::new(CountingPlayer {
            outcome: self.outcome,
        }))
    }
}

/// Lets detached tasks spawned by the orchestrators run to completion.
pub async fn drain_tasks() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}
