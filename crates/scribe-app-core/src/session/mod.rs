//! Chat session history.
//!
//! [`ChatController`] keeps every session, the current-session pointer and
//! the selected content type in memory, and writes the whole
//! `{sessions, currentId}` snapshot through a [`SessionStorage`] after each
//! state change. Storage problems never reach the caller: a failed load
//! starts from an empty history, a failed save is logged.

mod controller;
mod snapshot;
mod storage;

pub use controller::{ChatController, ChatGateway, ControllerView};
pub use snapshot::Snapshot;
#[cfg(test)]
pub use storage::MemoryStorage;
pub use storage::{JsonFileStorage, SessionStorage};
