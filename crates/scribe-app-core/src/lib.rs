//! Application core for scribe.
//!
//! - [`backend`]: client for the external backend chat / Drive service.
//! - [`chat`]: chat proxy with the typed demo-mode fallback.
//! - [`session`]: persisted chat sessions and the chat controller that owns
//!   them (including the one-shot retry of an interrupted exchange).
//! - [`social`]: read-only aggregation over the Meta graph API and the
//!   YouTube Data API, plus the Meta OAuth code exchange.
//!
//! Every client here is constructed from configuration plus a shared
//! [`reqwest::Client`] and carries no per-call state, so the server can
//! build them once and inject them into its handlers.

pub mod backend;
pub mod chat;
pub mod error;
pub mod session;
pub mod social;

pub use backend::BackendClient;
pub use chat::{ChatReply, ChatRequest, ChatService, Fallback};
pub use error::{BackendError, GatewayError, SessionError, SocialError, StoreError};
