//! `com.atproto.*` lexicons

pub mod admin;
pub mod server;
