//! Request / response bodies of the `/api` routes that are not core types.

pub mod content;
pub mod drive;
pub mod meta;
pub mod prompt;
pub mod session;
