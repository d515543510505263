//! Detail-page flow orchestration
//!
//! On every movie-id change: cancel the prior detail fetch, fetch the full
//! record, then attempt trailer enrichment. Enrichment failures degrade to a
//! detail without a trailer; only the metadata fetch itself can fail the
//! load. The cancellation discipline matches the search flow so rapid
//! navigation between movies never lets a stale fetch (or its enrichment
//! side effects) reach visible state.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::{
    error::{AppError, AppResult},
    flow::{CancelHandle, RequestCanceller},
    models::MovieDetail,
    services::{enrichment::TrailerEnricher, providers::MetadataProvider},
};

/// Observable state of the detail flow
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Idle,
    Fetching { movie_id: u64 },
    Settled(DetailOutcome),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailOutcome {
    Loaded(Box<MovieDetail>),
    Failed { movie_id: u64, message: String },
}

struct FetchOutcome {
    movie_id: u64,
    handle: CancelHandle,
    result: AppResult<MovieDetail>,
}

pub struct DetailOrchestrator {
    input_tx: mpsc::UnboundedSender<u64>,
    state_rx: watch::Receiver<DetailState>,
    task: JoinHandle<()>,
}

impl DetailOrchestrator {
    /// Spawns the orchestrator's run loop.
    pub fn spawn(metadata: Arc<dyn MetadataProvider>, enricher: Arc<TrailerEnricher>) -> Self {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(DetailState::Idle);
        let task = tokio::spawn(run(metadata, enricher, input_rx, state_tx));

        Self {
            input_tx,
            state_rx,
            task,
        }
    }

    /// Navigates to a movie, superseding any in-flight detail fetch.
    pub fn set_movie(&self, movie_id: u64) {
        let _ = self.input_tx.send(movie_id);
    }

    /// Returns a receiver observing the flow's state transitions.
    pub fn watch_state(&self) -> watch::Receiver<DetailState> {
        self.state_rx.clone()
    }
}

impl Drop for DetailOrchestrator {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    metadata: Arc<dyn MetadataProvider>,
    enricher: Arc<TrailerEnricher>,
    mut input_rx: mpsc::UnboundedReceiver<u64>,
    state_tx: watch::Sender<DetailState>,
) {
    let canceller = RequestCanceller::new();
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<FetchOutcome>();
    let mut in_flight: Option<JoinHandle<()>> = None;

    loop {
        tokio::select! {
            raw = input_rx.recv() => match raw {
                Some(movie_id) => {
                    if let Some(task) = in_flight.take() {
                        task.abort();
                    }
                    let handle = canceller.begin();
                    let _ = state_tx.send(DetailState::Fetching { movie_id });

                    let metadata = Arc::clone(&metadata);
                    let enricher = Arc::clone(&enricher);
                    let outcome_tx = outcome_tx.clone();
                    in_flight = Some(tokio::spawn(async move {
                        let result =
                            load_detail(metadata.as_ref(), &enricher, movie_id, &handle).await;
                        let _ = outcome_tx.send(FetchOutcome {
                            movie_id,
                            handle,
                            result,
                        });
                    }));
                }
                None => break,
            },

            Some(outcome) = outcome_rx.recv() => {
                if outcome.handle.is_cancelled() {
                    tracing::debug!(
                        movie_id = outcome.movie_id,
                        "Discarding superseded detail result"
                    );
                    continue;
                }
                in_flight = None;
                match outcome.result {
                    Ok(detail) => {
                        let _ = state_tx.send(DetailState::Settled(DetailOutcome::Loaded(
                            Box::new(detail),
                        )));
                    }
                    Err(AppError::Cancelled) => {
                        tracing::debug!(movie_id = outcome.movie_id, "Detail fetch cancelled");
                    }
                    Err(e) => {
                        let _ = state_tx.send(DetailState::Settled(DetailOutcome::Failed {
                            movie_id: outcome.movie_id,
                            message: e.to_string(),
                        }));
                    }
                }
            }
        }
    }
}

async fn load_detail(
    metadata: &dyn MetadataProvider,
    enricher: &TrailerEnricher,
    movie_id: u64,
    handle: &CancelHandle,
) -> AppResult<MovieDetail> {
    let mut detail = metadata.movie_detail(movie_id).await?;

    // Superseded while the metadata call was in flight: bail before the
    // enrichment stage can load the widget script or create a player.
    handle.ensure_current()?;

    match enricher.enrich(movie_id).await {
        Ok(trailer) => detail.trailer = trailer,
        Err(e) => {
            // Degraded: the detail view still renders, just without a trailer.
            tracing::warn!(movie_id, error = %e, "Trailer enrichment failed");
        }
    }

    Ok(detail)
}
