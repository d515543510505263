//! Video embed widget seam
//!
//! The embeddable player only exists inside a browser document, so this
//! module exposes it as a pair of traits plus a channel bridge to whatever
//! host environment owns the real DOM players. The integration contract is
//! the widget's own: construct against a node with a video id, wait for
//! exactly one of the ready/error signals, read the duration inside ready,
//! and destroy the player exactly once.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{mpsc, oneshot, OnceCell};

/// Errors from the embed-player integration
///
/// These never reach the user; the enricher downgrades them to a trailer
/// without a duration.
#[derive(thiserror::Error, Debug)]
pub enum PlayerError {
    /// The player fired its error signal instead of ready.
    #[error("player reported error code {0}")]
    Playback(i32),

    /// The embed script could not be loaded.
    #[error("embed script failed to load: {0}")]
    ScriptLoad(String),

    /// The host side of the bridge is gone.
    #[error("player host disconnected")]
    HostGone,
}

/// Runtime that can load the embed script and create off-screen players
#[async_trait::async_trait]
pub trait PlayerRuntime: Send + Sync {
    /// Ensures the embed script is loaded.
    ///
    /// The first successful load is cached for the life of the process;
    /// concurrent callers share a single load. A failed load is not cached,
    /// so a later enrichment may retry.
    async fn ensure_loaded(&self) -> Result<(), PlayerError>;

    /// Creates an invisible player bound to `video_key`.
    async fn create_player(&self, video_key: &str) -> Result<Box<dyn EmbedPlayer>, PlayerError>;
}

/// One off-screen player instance, scoped to a single duration measurement
#[async_trait::async_trait]
pub trait EmbedPlayer: Send {
    /// Suspends until the player signals ready or error.
    ///
    /// Resolves with the reported duration in seconds on ready. The player
    /// and its container are torn down before this returns, on either path;
    /// dropping the future without awaiting it tears them down too.
    async fn duration_seconds(self: Box<Self>) -> Result<f64, PlayerError>;
}

/// Identifier the bridge uses to address one hosted player
pub type PlayerId = u64;

/// Commands the bridge sends to the host environment
#[derive(Debug)]
pub enum HostCommand {
    /// Inject the embed script into the document. Acknowledge once the
    /// widget's global constructor is available.
    LoadScript {
        ack: oneshot::Sender<Result<(), String>>,
    },
    /// Construct an off-screen player for the video and report its first
    /// ready/error signal.
    CreatePlayer {
        player_id: PlayerId,
        video_key: String,
        signal: oneshot::Sender<PlayerSignal>,
    },
    /// Destroy the player and remove its container. Sent at most once per
    /// created player.
    DestroyPlayer { player_id: PlayerId },
}

/// The first signal a hosted player fires
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerSignal {
    Ready { duration_seconds: f64 },
    Error { code: i32 },
}

/// Production [`PlayerRuntime`] bridging to a host over a command channel
pub struct BridgedPlayerRuntime {
    commands: mpsc::UnboundedSender<HostCommand>,
    loaded: OnceCell<()>,
    next_player_id: AtomicU64,
}

impl BridgedPlayerRuntime {
    /// Creates the runtime and the command stream the host must consume.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<HostCommand>) {
        let (commands, command_rx) = mpsc::unbounded_channel();
        (
            Self {
                commands,
                loaded: OnceCell::new(),
                next_player_id: AtomicU64::new(0),
            },
            command_rx,
        )
    }
}

#[async_trait::async_trait]
impl PlayerRuntime for BridgedPlayerRuntime {
    async fn ensure_loaded(&self) -> Result<(), PlayerError> {
        self.loaded
            .get_or_try_init(|| async {
                let (ack, ack_rx) = oneshot::channel();
                self.commands
                    .send(HostCommand::LoadScript { ack })
                    .map_err(|_| PlayerError::HostGone)?;
                ack_rx
                    .await
                    .map_err(|_| PlayerError::HostGone)?
                    .map_err(PlayerError::ScriptLoad)
            })
            .await
            .copied()
    }

    async fn create_player(&self, video_key: &str) -> Result<Box<dyn EmbedPlayer>, PlayerError> {
        let player_id = self.next_player_id.fetch_add(1, Ordering::Relaxed);
        let (signal_tx, signal_rx) = oneshot::channel();

        self.commands
            .send(HostCommand::CreatePlayer {
                player_id,
                video_key: video_key.to_string(),
                signal: signal_tx,
            })
            .map_err(|_| PlayerError::HostGone)?;

        Ok(Box::new(BridgedPlayer {
            player_id,
            signal: Some(signal_rx),
            commands: self.commands.clone(),
            destroyed: false,
        }))
    }
}

struct BridgedPlayer {
    player_id: PlayerId,
    signal: Option<oneshot::Receiver<PlayerSignal>>,
    commands: mpsc::UnboundedSender<HostCommand>,
    destroyed: bool,
}

impl BridgedPlayer {
    fn teardown(&mut self) {
        if !self.destroyed {
            self.destroyed = true;
            let _ = self.commands.send(HostCommand::DestroyPlayer {
                player_id: self.player_id,
            });
        }
    }
}

#[async_trait::async_trait]
impl EmbedPlayer for BridgedPlayer {
    async fn duration_seconds(mut self: Box<Self>) -> Result<f64, PlayerError> {
        let outcome = match self.signal.take() {
            Some(signal) => match signal.await {
                Ok(PlayerSignal::Ready { duration_seconds }) => Ok(duration_seconds),
                Ok(PlayerSignal::Error { code }) => Err(PlayerError::Playback(code)),
                Err(_) => Err(PlayerError::HostGone),
            },
            None => Err(PlayerError::HostGone),
        };
        self.teardown();
        outcome
    }
}

// Covers the path where the measurement future is dropped mid-flight: the
// hosted player must still be destroyed.
impl Drop for BridgedPlayer {
    fn drop(&mut self) {
        self.teardown();
    }
}
