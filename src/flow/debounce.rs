use std::future::pending;
use std::pin::Pin;
use std::time::Duration;

use tokio::time::{sleep, Instant, Sleep};

/// Trailing debouncer for a stream of raw input values
///
/// Push-style so it composes with `tokio::select!`: `push` records the latest
/// value and restarts the quiet-period timer, `settled` resolves with that
/// value once the timer elapses without interruption. Only the most recent
/// value within a quiet window survives; there is no queue.
pub struct Debouncer<T> {
    quiet_period: Duration,
    emit_first_eagerly: bool,
    pushed_any: bool,
    pending_value: Option<T>,
    deadline: Pin<Box<Sleep>>,
}

impl<T> Debouncer<T> {
    /// Creates a debouncer with the given quiet period.
    ///
    /// With `emit_first_eagerly`, the very first value ever pushed fires
    /// without waiting out the quiet period; every later value waits.
    pub fn new(quiet_period: Duration, emit_first_eagerly: bool) -> Self {
        Self {
            quiet_period,
            emit_first_eagerly,
            pushed_any: false,
            pending_value: None,
            deadline: Box::pin(sleep(Duration::ZERO)),
        }
    }

    /// Records a new raw value, discarding any pending one, and restarts the
    /// quiet-period timer.
    pub fn push(&mut self, value: T) {
        // The eager window covers only the very first value; a second push
        // before anything settles already waits the full quiet period.
        let wait = if self.emit_first_eagerly && !self.pushed_any {
            Duration::ZERO
        } else {
            self.quiet_period
        };
        self.pushed_any = true;
        self.pending_value = Some(value);
        self.deadline.as_mut().reset(Instant::now() + wait);
    }

    /// Resolves with the pending value once the quiet period has elapsed.
    ///
    /// Pends forever while no value is pending, so it is safe to keep this
    /// future in a `select!` arm even between inputs.
    pub async fn settled(&mut self) -> T {
        loop {
            if self.pending_value.is_none() {
                pending::<()>().await;
            }
            self.deadline.as_mut().await;
            if let Some(value) = self.pending_value.take() {
                return value;
            }
        }
    }
}
