//! Shared types for scribe.
//!
//! Everything here is plain data: the chat session model persisted by the
//! session store, the content-type tags exchanged with the backend chat
//! service, and the static prompt option catalogs together with the pure
//! prompt composer.

pub mod content_type;
pub mod prompt;
pub mod session;
pub mod summary;

pub use content_type::{ContentType, to_backend_content_type, to_frontend_content_type};
pub use prompt::{
    PhraseSet, PromptCatalog, PromptChoices, PromptOption, PromptSelections,
    build_prompt_from_selections,
};
pub use session::{ChatSession, Message, Role};
pub use summary::SummaryItem;
