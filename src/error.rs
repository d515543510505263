/// Application-level errors
///
/// Three outcomes cover every remote interaction: the transport failed, the
/// provider answered with a well-formed error payload, or the request was
/// superseded by a newer one. Cancellation is deliberately its own variant so
/// callers can swallow it without ever mistaking it for a user-facing error.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Non-2xx response or a network-level failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider rejected the request with an error payload.
    #[error("{0}")]
    Api(String),

    /// A newer request for the same logical stream has started. Never shown
    /// to the user.
    #[error("request superseded")]
    Cancelled,
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}

impl AppError {
    /// True for outcomes that must be discarded silently rather than surfaced.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::Cancelled)
    }
}

pub type AppResult<T> = Result<T, AppError>;
