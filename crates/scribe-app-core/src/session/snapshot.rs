//! Wire form of the persisted `{sessions, currentId}` document.
//!
//! Decoding is lenient: documents written by older builds (or edited by
//! hand) may lack dates or carry content-type tags this build does not
//! know. Missing session dates become "now", missing message timestamps
//! become the Unix epoch, and unknown tags become `general`. A message
//! whose role is missing or unknown is dropped on its own; the rest of the
//! session survives.

use chrono::{DateTime, Utc};
use scribe_types::session::derive_title;
use scribe_types::{ChatSession, ContentType, Message, Role};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub sessions: Vec<ChatSession>,
    pub current_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRef<'a> {
    sessions: &'a [ChatSession],
    current_id: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSnapshot {
    #[serde(default)]
    sessions: Vec<StoredSession>,
    #[serde(default)]
    current_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    messages: Vec<StoredMessage>,
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default)]
    created_at: Option<Value>,
    #[serde(default)]
    updated_at: Option<Value>,
    #[serde(default)]
    backend_chat_id: Option<String>,
}

#[derive(Deserialize)]
struct StoredMessage {
    #[serde(default)]
    id: String,
    #[serde(default)]
    role: Option<Value>,
    #[serde(default)]
    content: String,
    #[serde(default)]
    timestamp: Option<Value>,
}

fn parse_date(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let text = value?.as_str()?;
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

fn non_empty_or_new(id: String) -> String {
    if id.is_empty() { Uuid::new_v4().to_string() } else { id }
}

impl StoredMessage {
    fn into_message(self) -> Option<Message> {
        let role = Role::deserialize(self.role?).ok()?;
        Some(Message {
            id: non_empty_or_new(self.id),
            role,
            content: self.content,
            timestamp: parse_date(self.timestamp.as_ref()).unwrap_or_default(),
        })
    }
}

impl From<StoredSession> for ChatSession {
    fn from(s: StoredSession) -> Self {
        let now = Utc::now();
        let messages: Vec<Message> = s
            .messages
            .into_iter()
            .filter_map(StoredMessage::into_message)
            .collect();
        let title = s
            .title
            .unwrap_or_else(|| derive_title(messages.first().map(|m| m.content.as_str())));
        ChatSession {
            id: non_empty_or_new(s.id),
            title,
            messages,
            content_type: s
                .content_type
                .as_deref()
                .map(ContentType::parse_lenient)
                .unwrap_or_default(),
            created_at: parse_date(s.created_at.as_ref()).unwrap_or(now),
            updated_at: parse_date(s.updated_at.as_ref()).unwrap_or(now),
            backend_chat_id: s.backend_chat_id.filter(|id| !id.is_empty()),
        }
    }
}

impl Snapshot {
    pub fn decode(document: &str) -> Result<Self, serde_json::Error> {
        let stored: StoredSnapshot = serde_json::from_str(document)?;
        Ok(Self {
            sessions: stored.sessions.into_iter().map(ChatSession::from).collect(),
            current_id: stored.current_id.filter(|id| !id.is_empty()),
        })
    }

    pub fn encode(sessions: &[ChatSession], current_id: Option<&str>) -> Result<String, serde_json::Error> {
        serde_json::to_string(&SnapshotRef { sessions, current_id })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_dates_get_defaults() {
        let before = Utc::now();
        let doc = json!({
            "sessions": [{
                "id": "s1",
                "title": "Gala recap",
                "messages": [{ "id": "m1", "role": "user", "content": "hi" }],
                "contentType": "newsletter"
            }],
            "currentId": "s1"
        })
        .to_string();

        let snap = Snapshot::decode(&doc).unwrap();
        let session = &snap.sessions[0];
        assert!(session.created_at >= before);
        assert!(session.updated_at >= before);
        assert_eq!(session.messages[0].timestamp, DateTime::<Utc>::default());
        assert_eq!(session.content_type, ContentType::Newsletter);
        assert_eq!(snap.current_id.as_deref(), Some("s1"));
    }

    #[test]
    fn unknown_content_type_and_empty_current_id() {
        let doc = json!({
            "sessions": [{ "id": "s1", "contentType": "press-release", "messages": [] }],
            "currentId": ""
        })
        .to_string();

        let snap = Snapshot::decode(&doc).unwrap();
        assert_eq!(snap.sessions[0].content_type, ContentType::General);
        assert_eq!(snap.sessions[0].title, "New Chat");
        assert_eq!(snap.current_id, None);
    }

    #[test]
    fn encoded_snapshot_decodes_to_same_sessions() {
        let mut session = ChatSession::new("New Chat", ContentType::DonorEmail);
        session.push(Message::user("Thank our spring donors"));
        session.backend_chat_id = Some("c-1".into());

        let doc = Snapshot::encode(std::slice::from_ref(&session), Some(&session.id)).unwrap();
        let value: Value = serde_json::from_str(&doc).unwrap();
        assert_eq!(value["currentId"], session.id.as_str());

        let snap = Snapshot::decode(&doc).unwrap();
        assert_eq!(snap.sessions, vec![session]);
    }

    #[test]
    fn message_with_unknown_role_is_dropped_alone() {
        let doc = json!({
            "sessions": [{
                "id": "s1",
                "title": "Volunteer drive",
                "messages": [
                    { "id": "m1", "role": "user", "content": "recruit volunteers" },
                    { "id": "m2", "role": "system", "content": "internal" },
                    { "id": "m3", "content": "no role" },
                    { "id": "m4", "role": "assistant", "content": "Here is a draft" }
                ]
            }],
            "currentId": "s1"
        })
        .to_string();

        let snap = Snapshot::decode(&doc).unwrap();
        let ids: Vec<&str> = snap.sessions[0].messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["m1", "m4"]);
        assert_eq!(snap.sessions[0].messages[1].role, Role::Assistant);
        assert_eq!(snap.current_id.as_deref(), Some("s1"));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(Snapshot::decode("not json").is_err());
    }
}
