use std::future::Future;

use scribe_types::session::NEW_CHAT_TITLE;
use scribe_types::{ChatSession, ContentType, Message};
use serde::Serialize;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use super::snapshot::Snapshot;
use super::storage::SessionStorage;
use crate::chat::fallback::{DEFAULT_GREETING, DEMO_MODE_NOTICE, INTERRUPTED_NOTICE};
use crate::chat::{ChatReply, ChatRequest, ChatService, HistoryEntry};
use crate::error::{GatewayError, SessionError};

/// Where the controller sends chat requests.
pub trait ChatGateway: Send + Sync + 'static {
    fn send(&self, request: ChatRequest) -> impl Future<Output = Result<ChatReply, GatewayError>> + Send;
}

/// The in-process chat service never fails outright: a backend failure
/// already comes back as a demo reply.
impl ChatGateway for ChatService {
    async fn send(&self, request: ChatRequest) -> Result<ChatReply, GatewayError> {
        Ok(self.respond(&request).await.unwrap_or_else(|fallback| fallback.reply))
    }
}

/// Serializable state of the controller as the chat page renders it.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ControllerView {
    pub sessions: Vec<ChatSession>,
    pub current_id: Option<String>,
    pub messages: Vec<Message>,
    pub content_type: ContentType,
}

/// Owns the chat sessions, the current-session pointer and the selected
/// content type.
///
/// The visible message list is never stored separately: [`messages`]
/// borrows the current session's list, so deleting or switching the current
/// session changes both in one step.
///
/// [`messages`]: ChatController::messages
pub struct ChatController<S, G> {
    storage: S,
    gateway: G,
    sessions: Vec<ChatSession>,
    current_id: Option<String>,
    content_type: ContentType,
    hydrated: bool,
    retry_armed: bool,
}

impl<S: SessionStorage, G: ChatGateway> ChatController<S, G> {
    pub fn new(storage: S, gateway: G) -> Self {
        Self {
            storage,
            gateway,
            sessions: Vec::new(),
            current_id: None,
            content_type: ContentType::General,
            hydrated: false,
            retry_armed: false,
        }
    }

    /// Load the persisted snapshot. Any storage or decode failure leaves an
    /// empty history.
    pub async fn hydrate(&mut self) {
        let snapshot = match self.storage.load().await {
            Ok(Some(document)) => Snapshot::decode(&document).unwrap_or_else(|e| {
                warn!(error = %e, "discarding unreadable session snapshot");
                Snapshot::default()
            }),
            Ok(None) => Snapshot::default(),
            Err(e) => {
                warn!(error = %e, "session storage unavailable; starting with empty history");
                Snapshot::default()
            }
        };

        self.sessions = snapshot.sessions;
        self.current_id = snapshot
            .current_id
            .filter(|id| self.sessions.iter().any(|s| &s.id == id));
        self.content_type = ContentType::General;
        self.retry_armed = false;

        if let Some((content_type, awaits_reply)) = self
            .current_session()
            .map(|current| (current.content_type, current.awaits_reply()))
        {
            self.content_type = content_type;
            self.retry_armed = awaits_reply;
        }
        self.hydrated = true;
        info!(
            sessions = self.sessions.len(),
            retry = self.retry_armed,
            "session history loaded"
        );
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// `true` while an interrupted exchange is waiting to be resent.
    pub fn retry_pending(&self) -> bool {
        self.retry_armed
    }

    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    pub fn current_session(&self) -> Option<&ChatSession> {
        let id = self.current_id.as_deref()?;
        self.sessions.iter().find(|s| s.id == id)
    }

    fn current_session_mut(&mut self) -> Option<&mut ChatSession> {
        let id = self.current_id.as_deref()?;
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    /// Messages shown on the chat page.
    pub fn messages(&self) -> &[Message] {
        self.current_session().map(|s| s.messages.as_slice()).unwrap_or(&[])
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn view(&self) -> ControllerView {
        ControllerView {
            sessions: self.sessions.clone(),
            current_id: self.current_id.clone(),
            messages: self.messages().to_vec(),
            content_type: self.content_type,
        }
    }

    /// Start an empty session and make it current.
    pub async fn new_chat(&mut self) -> &ChatSession {
        let session = ChatSession::new(NEW_CHAT_TITLE, ContentType::General);
        debug!(session_id = %session.id, "new chat");
        self.current_id = Some(session.id.clone());
        self.sessions.insert(0, session);
        self.content_type = ContentType::General;
        self.retry_armed = false;
        self.persist().await;
        &self.sessions[0]
    }

    pub async fn select_session(&mut self, id: &str) -> Result<(), SessionError> {
        let session = self
            .sessions
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| SessionError::UnknownSession(id.to_owned()))?;
        self.content_type = session.content_type;
        self.current_id = Some(session.id.clone());
        self.retry_armed = false;
        self.persist().await;
        Ok(())
    }

    pub async fn delete_session(&mut self, id: &str) -> Result<(), SessionError> {
        let index = self
            .sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| SessionError::UnknownSession(id.to_owned()))?;
        self.sessions.remove(index);
        if self.current_id.as_deref() == Some(id) {
            self.current_id = None;
            self.retry_armed = false;
        }
        self.persist().await;
        Ok(())
    }

    /// Change the type used for new sessions and outgoing messages. The
    /// selection is not part of the snapshot.
    pub fn set_content_type(&mut self, content_type: ContentType) {
        self.content_type = content_type;
    }

    /// Send `input` in the current session, creating one when there is none.
    /// Blank input is ignored.
    pub async fn submit(&mut self, input: &str, summary_file_id: Option<&str>) {
        if input.trim().is_empty() {
            return;
        }

        if self.current_session().is_none() {
            let session = ChatSession::new(
                input.chars().take(scribe_types::session::TITLE_MAX_CHARS).collect::<String>(),
                self.content_type,
            );
            self.current_id = Some(session.id.clone());
            self.sessions.insert(0, session);
        }

        let history = self.history(self.messages().len());
        if let Some(session) = self.current_session_mut() {
            session.push(Message::user(input));
        }
        self.persist().await;

        self.exchange(input, history, summary_file_id, DEMO_MODE_NOTICE)
            .await;
    }

    /// Resend the last user message of the current session if the previous
    /// process stopped before its reply arrived. Fires at most once per
    /// [`hydrate`](Self::hydrate), and never before it.
    pub async fn resume_interrupted(&mut self) -> bool {
        if !self.hydrated || !self.retry_armed {
            return false;
        }
        self.retry_armed = false;

        let Some(last) = self.current_session().and_then(|s| s.last_message()).cloned() else {
            return false;
        };
        if last.role != scribe_types::Role::User {
            return false;
        }

        info!(message_id = %last.id, "resending interrupted message");
        let history = self.history(self.messages().len() - 1);
        self.exchange(&last.content, history, None, INTERRUPTED_NOTICE)
            .await;
        true
    }

    fn history(&self, upto: usize) -> Vec<HistoryEntry> {
        self.messages()[..upto]
            .iter()
            .map(|m| HistoryEntry { role: m.role, content: m.content.clone() })
            .collect()
    }

    /// Send one message through the gateway and append whatever comes back.
    /// `notice` is appended when the gateway produces nothing at all.
    async fn exchange(
        &mut self,
        message: &str,
        history: Vec<HistoryEntry>,
        summary_file_id: Option<&str>,
        notice: &str,
    ) {
        let request = ChatRequest {
            message: message.to_owned(),
            content_type: self.content_type.to_string(),
            history,
            chat_id: self.current_session().and_then(|s| s.backend_chat_id.clone()),
            summary_file_id: summary_file_id.map(str::to_owned),
        };

        let reply = match self.gateway.send(request).await {
            Ok(reply) => Some(reply),
            Err(e) => {
                warn!(error = %e, "chat request failed");
                None
            }
        };

        if let Some(session) = self.current_session_mut() {
            match reply {
                Some(reply) => {
                    if !reply.demo && !reply.chat_id.is_empty() {
                        session.backend_chat_id = Some(reply.chat_id);
                    }
                    let text = if reply.message.is_empty() { DEFAULT_GREETING.to_owned() } else { reply.message };
                    session.push(Message::assistant(text));
                }
                None => session.push(Message::assistant(notice)),
            }
        }
        self.persist().await;
    }

    /// Save the snapshot; failures are logged and otherwise ignored.
    async fn persist(&self) {
        let document = match Snapshot::encode(&self.sessions, self.current_id.as_deref()) {
            Ok(document) => document,
            Err(e) => {
                warn!(error = %e, "failed to encode session snapshot");
                return;
            }
        };
        if let Err(e) = self.storage.save(document).await {
            warn!(error = %e, "failed to save session snapshot");
        }
    }
}
