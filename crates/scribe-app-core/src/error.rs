use thiserror::Error;

/// Failures talking to the backend chat / Drive service.
#[derive(Debug, Error)]
pub enum BackendError {
    /// `BACKEND_URL` was not configured.
    #[error("BACKEND_URL is not configured")]
    NotConfigured,

    /// The request never produced a response (connect, DNS, TLS, body read).
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The backend answered 2xx with a body we could not interpret.
    #[error("unexpected backend response: {0}")]
    Decode(String),

    /// A chat id that is not a single URL path segment.
    #[error("invalid chat id: {0:?}")]
    InvalidChatId(String),
}

/// Failures of the social platform integrations.
#[derive(Debug, Error)]
pub enum SocialError {
    /// A required credential or setting is missing; the message names it.
    #[error("{0}")]
    NotConfigured(&'static str),

    /// The graph API reported an error object.
    #[error("{0}")]
    Graph(String),

    /// The platform answered with a non-2xx status.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("{0}")]
    NotFound(&'static str),

    #[error("social platform request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected platform response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid platform URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Failures of the session storage medium. Callers treat these as
/// "no saved state" on load and "best effort" on save.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session storage unavailable: {0}")]
    Unavailable(String),
}

/// The chat gateway could not produce any reply, demo or otherwise.
#[derive(Debug, Error)]
#[error("chat gateway failed: {0}")]
pub struct GatewayError(pub String);

/// Rejected chat-controller operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no session with id {0}")]
    UnknownSession(String),
}
