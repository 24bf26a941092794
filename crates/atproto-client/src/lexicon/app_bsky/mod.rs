//! `app.bsky.*` lexicons

pub mod actor;
pub mod embed;
pub mod graph;
pub mod richtext;
