//! Endpoint wrappers
//!
//! Each wrapper is a method on [`AtpAgent`](crate::AtpAgent) that fills in an
//! [`XrpcRequest`](crate::XrpcRequest) for one NSID and decodes the typed
//! output. Grouped by namespace:
//!
//! - [`server`]: `com.atproto.server.*` (sessions, app passwords)
//! - [`graph`]: `app.bsky.graph.*` (follows, followers, lists)
//! - [`admin`]: `com.atproto.admin.*`
//! - [`convo`]: `chat.bsky.convo.*`, proxied to the chat service

pub mod admin;
pub mod convo;
pub mod graph;
pub mod server;
