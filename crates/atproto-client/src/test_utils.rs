//! Test utilities and fixtures for AT Protocol client testing
//!
//! This module provides common test helpers, canned response bodies, and
//! agents wired to a mocked transport.

#![allow(dead_code)] // Test utilities may not all be used by every module

use crate::agent::{AgentConfig, AtpAgent};
use crate::session::{Session, SessionHandle};
use crate::xrpc::{MockHttpTransport, RawResponse, RequestDescriptor};
use serde_json::{json, Value};

/// Service the agent is configured with
pub const SERVICE: &str = "https://entryway.example";
/// PDS recorded in the test session
pub const PDS: &str = "https://pds.example";

/// Test DIDs for use in tests
pub mod dids {
    /// Alice's DID (PLC method)
    pub const ALICE: &str = "did:plc:alice123456789abc";
    /// Bob's DID (PLC method)
    pub const BOB: &str = "did:plc:bob123456789defg";
    /// Carol's DID (Web method)
    pub const CAROL: &str = "did:web:carol.example.com";
}

/// Logged-in session for Alice on [`PDS`]
pub fn session() -> Session {
    Session::new(PDS, dids::ALICE, "alice.test", "access-1", "refresh-1")
}

/// Agent with Alice logged in
pub fn agent(transport: MockHttpTransport) -> AtpAgent<MockHttpTransport> {
    AtpAgent::with_transport(
        AgentConfig::new(SERVICE),
        SessionHandle::with_session(session()),
        transport,
    )
}

/// Agent with no session
pub fn anonymous_agent(transport: MockHttpTransport) -> AtpAgent<MockHttpTransport> {
    AtpAgent::with_transport(AgentConfig::new(SERVICE), SessionHandle::new(), transport)
}

/// 200 response with a JSON body
pub fn ok(body: Value) -> RawResponse {
    RawResponse::json(200, body.to_string())
}

/// Error response with an XRPC error body
pub fn xrpc_error(status: u16, error: &str, message: &str) -> RawResponse {
    RawResponse::json(status, json!({ "error": error, "message": message }).to_string())
}

/// Request body parsed as JSON
pub fn body_json(request: &RequestDescriptor) -> Value {
    request
        .body
        .as_deref()
        .map(|body| serde_json::from_slice(body).unwrap())
        .unwrap_or(Value::Null)
}

/// Canned lexicon payloads
pub mod fixtures {
    use super::*;

    /// `app.bsky.actor.defs#profileView`
    pub fn profile(did: &str, handle: &str) -> Value {
        json!({
            "did": did,
            "handle": handle,
            "displayName": handle.split('.').next().unwrap_or(handle),
            "indexedAt": "2024-01-01T00:00:00.000Z"
        })
    }

    /// `app.bsky.graph.getFollows` output
    pub fn follows_page(cursor: Option<&str>) -> Value {
        let mut page = json!({
            "subject": profile(dids::ALICE, "alice.test"),
            "follows": [profile(dids::BOB, "bob.test"), profile(dids::CAROL, "carol.example.com")]
        });
        if let Some(cursor) = cursor {
            page["cursor"] = json!(cursor);
        }
        page
    }

    /// `chat.bsky.convo.defs#messageView`
    pub fn message_view(id: &str, text: &str) -> Value {
        json!({
            "$type": "chat.bsky.convo.defs#messageView",
            "id": id,
            "rev": format!("rev-{id}"),
            "text": text,
            "sender": { "did": dids::ALICE },
            "sentAt": "2024-05-01T09:00:00.000Z"
        })
    }

    /// `chat.bsky.convo.defs#convoView`
    pub fn convo_view(id: &str) -> Value {
        json!({
            "id": id,
            "rev": "rev-9",
            "members": [
                { "did": dids::ALICE, "handle": "alice.test" },
                { "did": dids::BOB, "handle": "bob.test" }
            ],
            "lastMessage": message_view("m9", "see you"),
            "muted": false,
            "unreadCount": 2
        })
    }

    /// `com.atproto.admin.defs#accountView`
    pub fn account_view(did: &str) -> Value {
        json!({
            "did": did,
            "handle": "bob.test",
            "email": "bob@example.com",
            "indexedAt": "2023-11-05T08:00:00.000Z",
            "invitesDisabled": false,
            "emailConfirmedAt": "2023-11-05T09:30:00.000Z"
        })
    }

    /// `com.atproto.server.createSession` output with a DID document
    pub fn create_session_output(pds: &str) -> Value {
        json!({
            "accessJwt": "access-1",
            "refreshJwt": "refresh-1",
            "handle": "alice.test",
            "did": dids::ALICE,
            "email": "alice@example.com",
            "emailConfirmed": true,
            "didDoc": {
                "id": dids::ALICE,
                "service": [{
                    "id": "#atproto_pds",
                    "type": "AtprotoPersonalDataServer",
                    "serviceEndpoint": pds
                }]
            }
        })
    }

    /// `com.atproto.server.refreshSession` output
    pub fn refresh_session_output(access: &str, refresh: &str) -> Value {
        json!({
            "accessJwt": access,
            "refreshJwt": refresh,
            "handle": "alice.test",
            "did": dids::ALICE
        })
    }
}
