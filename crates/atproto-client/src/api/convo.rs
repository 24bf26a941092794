//! `chat.bsky.convo.*` endpoints
//!
//! Chat lives on a separate service. Calls go to the user's PDS, which
//! forwards them to the service named in the `atproto-proxy` header (see
//! [`AgentConfig::chat_service`](crate::AgentConfig::chat_service)).

use crate::agent::AtpAgent;
use crate::lexicon::chat_bsky::convo::{
    ConvoView, GetConvoOutput, GetLogOutput, GetMessagesOutput, MessageInput, MessageView,
    SendMessageInput,
};
use crate::xrpc::{HttpTransport, LimitRange, XrpcRequest};
use crate::Result;

const GET_CONVO: &str = "chat.bsky.convo.getConvo";
const GET_MESSAGES: &str = "chat.bsky.convo.getMessages";
const SEND_MESSAGE: &str = "chat.bsky.convo.sendMessage";
const GET_LOG: &str = "chat.bsky.convo.getLog";

impl<T: HttpTransport> AtpAgent<T> {
    /// A conversation the viewer is a member of
    pub async fn get_convo(&self, convo_id: impl Into<String>) -> Result<ConvoView> {
        let request = self.chat(XrpcRequest::query(GET_CONVO).param("convoId", convo_id));
        let output: GetConvoOutput = self.query(request).await?;
        Ok(output.convo)
    }

    /// Messages of a conversation, newest first
    ///
    /// `limit` is clamped to 1..=100.
    pub async fn get_messages(
        &self,
        convo_id: impl Into<String>,
        limit: Option<u32>,
        cursor: Option<String>,
    ) -> Result<GetMessagesOutput> {
        let request = self.chat(
            XrpcRequest::query(GET_MESSAGES)
                .param("convoId", convo_id)
                .limit(limit, LimitRange::STANDARD)
                .param_opt("cursor", cursor),
        );
        self.query(request).await
    }

    /// Send a message
    ///
    /// Text longer than the lexicon allows is truncated before sending.
    pub async fn send_message(
        &self,
        convo_id: impl Into<String>,
        message: MessageInput,
    ) -> Result<MessageView> {
        let input = SendMessageInput {
            convo_id: convo_id.into(),
            message,
        };
        let request = self.chat(XrpcRequest::procedure(SEND_MESSAGE).json_body(&input)?);
        self.procedure(request).await
    }

    /// Conversation events since `cursor`
    pub async fn get_log(&self, cursor: Option<String>) -> Result<GetLogOutput> {
        let request = self.chat(XrpcRequest::query(GET_LOG).param_opt("cursor", cursor));
        self.query(request).await
    }
}

#[cfg(test)]
mod tests {
    use crate::codec::grapheme_count;
    use crate::lexicon::chat_bsky::convo::{ConvoLogEntry, ConvoMessage, MessageInput};
    use crate::test_utils::{self, body_json, fixtures, ok, PDS};
    use crate::xrpc::MockHttpTransport;
    use crate::Error;
    use serde_json::json;

    const PROXY: &str = "did:web:api.bsky.chat#bsky_chat";

    #[tokio::test]
    async fn test_get_convo() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_execute()
            .withf(|req| {
                req.url.as_str() == format!("{PDS}/xrpc/chat.bsky.convo.getConvo?convoId=c1")
                    && req.header("atproto-proxy") == Some(PROXY)
                    && req.header("Authorization") == Some("Bearer access-1")
            })
            .times(1)
            .returning(|_| Ok(ok(json!({ "convo": fixtures::convo_view("c1") }))));

        let agent = test_utils::agent(transport);
        let convo = agent.get_convo("c1").await.unwrap();

        assert_eq!(convo.id, "c1");
        assert_eq!(convo.unread_count, 2);
        assert!(matches!(convo.last_message, Some(ConvoMessage::Message(_))));
    }

    #[tokio::test]
    async fn test_get_messages_with_unknown_member() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_execute()
            .withf(|req| req.url.query() == Some("convoId=c1&limit=100&cursor=prev"))
            .times(1)
            .returning(|_| {
                Ok(ok(json!({
                    "cursor": "older",
                    "messages": [
                        fixtures::message_view("m2", "hello"),
                        { "$type": "chat.bsky.convo.defs#futureMessageView", "id": "m1" }
                    ]
                })))
            });

        let agent = test_utils::agent(transport);
        let output = agent
            .get_messages("c1", Some(250), Some("prev".to_string()))
            .await
            .unwrap();

        assert_eq!(output.cursor.as_deref(), Some("older"));
        assert!(matches!(output.messages[0], ConvoMessage::Message(_)));
        assert!(output.messages[1].is_unknown());
        assert_eq!(
            output.messages[1].type_name(),
            Some("chat.bsky.convo.defs#futureMessageView")
        );
    }

    #[tokio::test]
    async fn test_send_message_truncates_text() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_execute()
            .withf(|req| {
                let body = body_json(req);
                req.url.path() == "/xrpc/chat.bsky.convo.sendMessage"
                    && req.header("atproto-proxy") == Some(PROXY)
                    && body["convoId"] == "c1"
                    && body["message"]["text"]
                        .as_str()
                        .map(|text| grapheme_count(text) == 1000)
                        .unwrap_or(false)
            })
            .times(1)
            .returning(|_| Ok(ok(fixtures::message_view("m3", "ok"))));

        let agent = test_utils::agent(transport);
        let sent = agent
            .send_message("c1", MessageInput::new("x".repeat(1200)))
            .await
            .unwrap();
        assert_eq!(sent.id, "m3");
    }

    #[tokio::test]
    async fn test_get_log() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_execute()
            .withf(|req| req.url.path() == "/xrpc/chat.bsky.convo.getLog" && req.url.query().is_none())
            .times(1)
            .returning(|_| {
                Ok(ok(json!({
                    "cursor": "rev-2",
                    "logs": [
                        { "$type": "chat.bsky.convo.defs#logBeginConvo", "rev": "rev-1", "convoId": "c1" },
                        {
                            "$type": "chat.bsky.convo.defs#logDeleteMessage",
                            "rev": "rev-2",
                            "convoId": "c1",
                            "message": {
                                "$type": "chat.bsky.convo.defs#deletedMessageView",
                                "id": "m1",
                                "rev": "rev-2",
                                "sender": { "did": "did:plc:bob" },
                                "sentAt": "2024-05-01T09:00:00.000Z"
                            }
                        }
                    ]
                })))
            });

        let agent = test_utils::agent(transport);
        let output = agent.get_log(None).await.unwrap();

        assert_eq!(output.logs.len(), 2);
        assert!(matches!(output.logs[0], ConvoLogEntry::BeginConvo(_)));
        match &output.logs[1] {
            ConvoLogEntry::DeleteMessage(entry) => {
                assert!(matches!(entry.message, ConvoMessage::Deleted(_)))
            }
            other => panic!("unexpected entry: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_chat_requires_session() {
        let mut transport = MockHttpTransport::new();
        transport.expect_execute().never();

        let agent = test_utils::anonymous_agent(transport);
        assert!(matches!(agent.get_log(None).await, Err(Error::MissingSession)));
        assert!(matches!(
            agent.send_message("c1", MessageInput::new("hi")).await,
            Err(Error::MissingSession)
        ));
    }
}
