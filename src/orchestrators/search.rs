//! Search flow orchestration
//!
//! Glues the debouncer, the metadata provider, and the trending counter into
//! one state machine per search box. Raw input arrives over an mpsc channel;
//! observable state goes out over a watch channel. Supersession discipline:
//! when a new debounced term fires, the previous fetch task is aborted
//! (best-effort transport abort) and its cancel handle invalidated, so a
//! result that slips past the abort is still discarded before it can touch
//! visible state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    flow::{CancelHandle, Debouncer, RequestCanceller},
    models::MovieSummary,
    services::providers::MetadataProvider,
    services::trending::{self, TrendingStore},
};

/// Observable state of the search flow
#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    Idle,
    /// Input changed; waiting out the quiet period.
    Debouncing,
    /// A fetch for the debounced term is in flight.
    Fetching { term: String },
    Settled(SearchOutcome),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Results {
        term: String,
        movies: Vec<MovieSummary>,
    },
    Empty {
        term: String,
    },
    Failed {
        message: String,
    },
}

/// Tuning knobs for the search flow
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub quiet_period: Duration,
    pub emit_first_eagerly: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            quiet_period: Duration::from_millis(800),
            emit_first_eagerly: false,
        }
    }
}

impl SearchOptions {
    /// Builds options with the configured quiet period.
    pub fn from_config(config: &Config) -> Self {
        Self {
            quiet_period: Duration::from_millis(config.debounce_ms),
            ..Self::default()
        }
    }
}

struct FetchOutcome {
    term: String,
    handle: CancelHandle,
    result: AppResult<Vec<MovieSummary>>,
}

pub struct SearchOrchestrator {
    input_tx: mpsc::UnboundedSender<String>,
    state_rx: watch::Receiver<SearchState>,
    task: JoinHandle<()>,
}

impl SearchOrchestrator {
    /// Spawns the orchestrator's run loop.
    pub fn spawn(
        metadata: Arc<dyn MetadataProvider>,
        trending_store: Arc<dyn TrendingStore>,
        options: SearchOptions,
    ) -> Self {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(SearchState::Idle);
        let task = tokio::spawn(run(metadata, trending_store, options, input_rx, state_tx));

        Self {
            input_tx,
            state_rx,
            task,
        }
    }

    /// Feeds a raw search-term change into the flow.
    pub fn set_query(&self, term: impl Into<String>) {
        let _ = self.input_tx.send(term.into());
    }

    /// Returns a receiver observing the flow's state transitions.
    pub fn watch_state(&self) -> watch::Receiver<SearchState> {
        self.state_rx.clone()
    }
}

impl Drop for SearchOrchestrator {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    metadata: Arc<dyn MetadataProvider>,
    trending_store: Arc<dyn TrendingStore>,
    options: SearchOptions,
    mut input_rx: mpsc::UnboundedReceiver<String>,
    state_tx: watch::Sender<SearchState>,
) {
    let mut debouncer = Debouncer::new(options.quiet_period, options.emit_first_eagerly);
    let canceller = RequestCanceller::new();
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<FetchOutcome>();
    let mut in_flight: Option<JoinHandle<()>> = None;

    loop {
        tokio::select! {
            raw = input_rx.recv() => match raw {
                Some(term) => {
                    debouncer.push(term);
                    let _ = state_tx.send(SearchState::Debouncing);
                }
                None => break,
            },

            term = debouncer.settled() => {
                if let Some(task) = in_flight.take() {
                    task.abort();
                }
                let handle = canceller.begin();
                let _ = state_tx.send(SearchState::Fetching { term: term.clone() });

                let metadata = Arc::clone(&metadata);
                let outcome_tx = outcome_tx.clone();
                in_flight = Some(tokio::spawn(async move {
                    let result = metadata.search_movies(&term).await;
                    let _ = outcome_tx.send(FetchOutcome {
                        term,
                        handle,
                        result,
                    });
                }));
            },

            Some(outcome) = outcome_rx.recv() => {
                if outcome.handle.is_cancelled() {
                    tracing::debug!(term = %outcome.term, "Discarding superseded search result");
                    continue;
                }
                in_flight = None;
                settle(&state_tx, &trending_store, outcome);
            }
        }
    }
}

fn settle(
    state_tx: &watch::Sender<SearchState>,
    trending_store: &Arc<dyn TrendingStore>,
    outcome: FetchOutcome,
) {
    match outcome.result {
        Ok(movies) if movies.is_empty() => {
            let _ = state_tx.send(SearchState::Settled(SearchOutcome::Empty {
                term: outcome.term,
            }));
        }
        Ok(movies) => {
            // Trending only counts real searches that found something.
            if !outcome.term.is_empty() {
                if let Some(top) = movies.first() {
                    trending::record_search_detached(
                        Arc::clone(trending_store),
                        outcome.term.clone(),
                        top.clone(),
                    );
                }
            }
            let _ = state_tx.send(SearchState::Settled(SearchOutcome::Results {
                term: outcome.term,
                movies,
            }));
        }
        Err(AppError::Cancelled) => {
            tracing::debug!(term = %outcome.term, "Search fetch cancelled");
        }
        Err(e) => {
            let _ = state_tx.send(SearchState::Settled(SearchOutcome::Failed {
                message: e.to_string(),
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_debounce(ms: &str) -> Config {
        envy::from_iter([
            ("MOVIE_API_KEY".to_string(), "token".to_string()),
            ("APPWRITE_PROJECT_ID".to_string(), "proj".to_string()),
            ("APPWRITE_DATABASE_ID".to_string(), "db".to_string()),
            ("APPWRITE_COLLECTION_ID".to_string(), "col".to_string()),
            ("DEBOUNCE_MS".to_string(), ms.to_string()),
        ])
        .unwrap()
    }

    #[test]
    fn options_take_the_quiet_period_from_config() {
        let options = SearchOptions::from_config(&config_with_debounce("300"));
        assert_eq!(options.quiet_period, Duration::from_millis(300));
        assert!(!options.emit_first_eagerly);
    }

    #[test]
    fn options_default_to_the_product_quiet_period() {
        let options = SearchOptions::default();
        assert_eq!(options.quiet_period, Duration::from_millis(800));
    }
}
