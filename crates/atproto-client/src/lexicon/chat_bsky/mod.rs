//! `chat.bsky.*` lexicons

pub mod actor;
pub mod convo;
