//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use axum_extra::extract::cookie::Key;
use scribe_app_core::social::{MetaGraphClient, YouTubeClient};
use scribe_app_core::{BackendClient, ChatService};
use tracing::warn;

use crate::clients::ClientSessions;
use crate::config::Config;

/// State shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    pub backend: BackendClient,
    pub chat: ChatService,
    pub meta: MetaGraphClient,
    pub youtube: YouTubeClient,
    /// One chat controller per client cookie.
    pub sessions: Arc<ClientSessions>,
    /// Signs the client, OAuth state and access-token cookies.
    pub cookie_key: Key,
}

impl AppState {
    /// Build every client from `config` around one shared HTTP client.
    /// Session histories are loaded lazily, per client.
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("scribe-server/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let backend = BackendClient::new(config.backend_url.clone(), http.clone());
        let chat = ChatService::new(backend.clone());
        let meta = MetaGraphClient::new(config.meta.clone(), http.clone());
        let youtube = YouTubeClient::new(config.youtube.clone(), http);
        let sessions = ClientSessions::new(config.sessions_dir.clone(), chat.clone());
        let cookie_key = cookie_key(config.cookie_secret.as_deref());

        Ok(Self {
            config: Arc::new(config),
            backend,
            chat,
            meta,
            youtube,
            sessions: Arc::new(sessions),
            cookie_key,
        })
    }

    pub fn secure_cookies(&self) -> bool {
        self.config.production
    }
}

fn cookie_key(secret: Option<&str>) -> Key {
    match secret.map(|s| Key::try_from(s.as_bytes())) {
        Some(Ok(key)) => key,
        Some(Err(_)) => {
            warn!("SCRIBE_COOKIE_SECRET is shorter than 64 bytes; using a random per-process key");
            Key::generate()
        }
        None => {
            warn!("SCRIBE_COOKIE_SECRET not set; Meta sessions will not survive a restart");
            Key::generate()
        }
    }
}
