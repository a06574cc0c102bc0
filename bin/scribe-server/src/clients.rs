//! Per-client chat controllers.
//!
//! Every browser carries a random id in the signed `scribe_client` cookie
//! and owns one controller, persisted to `<sessions_dir>/<id>.json`. A
//! controller is built and hydrated the first time its client shows up; a
//! message that client left unanswered is then resent once in the
//! background.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use scribe_app_core::ChatService;
use scribe_app_core::session::{ChatController, JsonFileStorage};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

pub const CLIENT_COOKIE: &str = "scribe_client";

const CLIENT_COOKIE_MAX_AGE: time::Duration = time::Duration::days(365);

pub type SessionController = ChatController<JsonFileStorage, ChatService>;

/// One client's controller; each operation runs under one lock acquisition.
pub type SharedController = Arc<Mutex<SessionController>>;

/// Always a UUID, so it is safe to use as a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(Uuid);

impl ClientId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw).ok().map(Self)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_simple())
    }
}

pub struct ClientSessions {
    dir: PathBuf,
    chat: ChatService,
    controllers: Mutex<HashMap<ClientId, SharedController>>,
}

impl ClientSessions {
    pub fn new(dir: PathBuf, chat: ChatService) -> Self {
        Self {
            dir,
            chat,
            controllers: Mutex::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn snapshot_path(&self, id: ClientId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// The client named by the jar's cookie. A missing or unreadable cookie
    /// gets a fresh id, added to the returned jar.
    pub fn identify(&self, jar: SignedCookieJar, secure: bool) -> (SignedCookieJar, ClientId) {
        if let Some(id) = jar.get(CLIENT_COOKIE).and_then(|c| ClientId::parse(c.value())) {
            return (jar, id);
        }
        let id = ClientId::generate();
        debug!(client = %id, "issuing client cookie");
        let cookie = Cookie::build((CLIENT_COOKIE, id.to_string()))
            .http_only(true)
            .secure(secure)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(CLIENT_COOKIE_MAX_AGE)
            .build();
        (jar.add(cookie), id)
    }

    /// The controller for `id`, hydrated from its snapshot on first use.
    pub async fn controller(&self, id: ClientId) -> SharedController {
        let mut controllers = self.controllers.lock().await;
        if let Some(existing) = controllers.get(&id) {
            return Arc::clone(existing);
        }

        let shared: SharedController = Arc::new(Mutex::new(ChatController::new(
            JsonFileStorage::new(self.snapshot_path(id)),
            self.chat.clone(),
        )));
        // Held before the registry lock is released, so other requests for
        // this client wait for hydration instead of seeing an empty history.
        let mut fresh = Arc::clone(&shared).lock_owned().await;
        controllers.insert(id, Arc::clone(&shared));
        drop(controllers);

        fresh.hydrate().await;
        info!(client = %id, sessions = fresh.sessions().len(), "client history loaded");
        drop(fresh);

        let resume = Arc::clone(&shared);
        tokio::spawn(async move {
            if resume.lock().await.resume_interrupted().await {
                info!(client = %id, "interrupted message resent");
            }
        });
        shared
    }
}
