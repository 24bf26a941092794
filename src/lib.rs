//! atproto-kit
//!
//! Typed client for the AT Protocol (Bluesky). This crate re-exports
//! [`atproto_client`], which holds the XRPC request pipeline, lexicon models,
//! wire codecs, sessions and the [`AtpAgent`] endpoint wrappers.
//!
//! # Example
//!
//! ```rust,no_run
//! use atproto_kit::{AtpAgent, SessionHandle};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let agent = AtpAgent::new("https://bsky.social", SessionHandle::new())?;
//!     agent.login("alice.bsky.social", "app-password").await?;
//!
//!     let lists = agent.get_lists("alice.bsky.social", Some(50), None).await?;
//!     for list in lists.lists {
//!         println!("{} ({})", list.name, list.purpose);
//!     }
//!     Ok(())
//! }
//! ```

pub use atproto_client::*;
