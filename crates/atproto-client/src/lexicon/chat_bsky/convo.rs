//! `chat.bsky.convo.*` models
//!
//! Direct-message conversations. Messages and log entries are unions: a
//! conversation can hold live and deleted messages, and the log interleaves
//! several event kinds.

use super::actor::ProfileViewBasic;
use crate::codec::truncate;
use crate::lexicon::app_bsky::embed::{EmbedRecord, EmbedRecordView};
use crate::lexicon::app_bsky::richtext::Facet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Longest message text, in graphemes
pub const MAX_MESSAGE_GRAPHEMES: usize = 1000;
/// Longest message text, in UTF-8 bytes
pub const MAX_MESSAGE_BYTES: usize = 10000;

// =============================================================================
// Messages
// =============================================================================

/// Reference to a message in a conversation (`chat.bsky.convo.defs#messageRef`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    /// Sender DID
    pub did: String,
    /// Conversation ID
    pub convo_id: String,
    /// Message ID
    pub message_id: String,
}

/// A message to send (`chat.bsky.convo.defs#messageInput`)
///
/// `text` is cut to [`MAX_MESSAGE_GRAPHEMES`] graphemes and
/// [`MAX_MESSAGE_BYTES`] bytes when encoded. Facet offsets past the cut are not
/// adjusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageInput {
    /// Message text
    #[serde(serialize_with = "message_text")]
    pub text: String,
    /// Rich text annotations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facets: Option<Vec<Facet>>,
    /// Embedded record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed: Option<MessageInputEmbed>,
}

impl MessageInput {
    /// Plain-text message
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            facets: None,
            embed: None,
        }
    }

    /// Attach facets
    pub fn with_facets(mut self, facets: Vec<Facet>) -> Self {
        self.facets = Some(facets);
        self
    }

    /// Attach an embed
    pub fn with_embed(mut self, embed: MessageInputEmbed) -> Self {
        self.embed = Some(embed);
        self
    }
}

fn message_text<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
    truncate::serialize_with_bytes(value, MAX_MESSAGE_GRAPHEMES, MAX_MESSAGE_BYTES, serializer)
}

crate::lexicon_union! {
    /// Embed accepted in a [`MessageInput`]
    pub enum MessageInputEmbed {
        /// Quoted record
        Record(EmbedRecord) = "app.bsky.embed.record",
    }
}

crate::lexicon_union! {
    /// Embed returned in a [`MessageView`]
    pub enum MessageViewEmbed {
        /// Hydrated quoted record
        RecordView(EmbedRecordView) = "app.bsky.embed.record#view",
    }
}

/// Sender of a message (`chat.bsky.convo.defs#messageViewSender`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageViewSender {
    /// Sender DID
    pub did: String,
}

/// A delivered message (`chat.bsky.convo.defs#messageView`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    /// Message ID
    pub id: String,
    /// Revision of the conversation when the message was sent
    pub rev: String,
    /// Message text
    pub text: String,
    /// Rich text annotations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facets: Option<Vec<Facet>>,
    /// Embedded record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed: Option<MessageViewEmbed>,
    /// Sender
    pub sender: MessageViewSender,
    /// Send time
    #[serde(with = "crate::codec::datetime")]
    pub sent_at: DateTime<Utc>,
}

/// A message that was deleted (`chat.bsky.convo.defs#deletedMessageView`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedMessageView {
    /// Message ID
    pub id: String,
    /// Revision of the conversation when the message was sent
    pub rev: String,
    /// Sender
    pub sender: MessageViewSender,
    /// Send time
    #[serde(with = "crate::codec::datetime")]
    pub sent_at: DateTime<Utc>,
}

crate::lexicon_union! {
    /// Message slot in a conversation: live or deleted
    pub enum ConvoMessage {
        /// Live message
        Message(MessageView) = "chat.bsky.convo.defs#messageView",
        /// Deleted message
        Deleted(DeletedMessageView) = "chat.bsky.convo.defs#deletedMessageView",
    }
}

impl ConvoMessage {
    /// Message ID, when the member is known
    pub fn id(&self) -> Option<&str> {
        match self {
            ConvoMessage::Message(view) => Some(&view.id),
            ConvoMessage::Deleted(view) => Some(&view.id),
            ConvoMessage::Unknown(_) => None,
        }
    }
}

// =============================================================================
// Conversations
// =============================================================================

/// A conversation (`chat.bsky.convo.defs#convoView`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvoView {
    /// Conversation ID
    pub id: String,
    /// Current revision
    pub rev: String,
    /// Participants
    pub members: Vec<ProfileViewBasic>,
    /// Most recent message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<ConvoMessage>,
    /// Viewer muted the conversation
    pub muted: bool,
    /// Messages the viewer has not read
    pub unread_count: u64,
}

// =============================================================================
// Log
// =============================================================================

/// A conversation started (`chat.bsky.convo.defs#logBeginConvo`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogBeginConvo {
    /// Revision of the event
    pub rev: String,
    /// Conversation ID
    pub convo_id: String,
}

/// The viewer left a conversation (`chat.bsky.convo.defs#logLeaveConvo`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogLeaveConvo {
    /// Revision of the event
    pub rev: String,
    /// Conversation ID
    pub convo_id: String,
}

/// A message was sent (`chat.bsky.convo.defs#logCreateMessage`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogCreateMessage {
    /// Revision of the event
    pub rev: String,
    /// Conversation ID
    pub convo_id: String,
    /// The message
    pub message: ConvoMessage,
}

/// A message was deleted (`chat.bsky.convo.defs#logDeleteMessage`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogDeleteMessage {
    /// Revision of the event
    pub rev: String,
    /// Conversation ID
    pub convo_id: String,
    /// The message
    pub message: ConvoMessage,
}

crate::lexicon_union! {
    /// Entry in the conversation event log
    pub enum ConvoLogEntry {
        /// Message sent
        CreateMessage(LogCreateMessage) = "chat.bsky.convo.defs#logCreateMessage",
        /// Message deleted
        DeleteMessage(LogDeleteMessage) = "chat.bsky.convo.defs#logDeleteMessage",
        /// Conversation started
        BeginConvo(LogBeginConvo) = "chat.bsky.convo.defs#logBeginConvo",
        /// Conversation left
        LeaveConvo(LogLeaveConvo) = "chat.bsky.convo.defs#logLeaveConvo",
    }
}

impl ConvoLogEntry {
    /// Revision of the event, when the member is known
    pub fn rev(&self) -> Option<&str> {
        match self {
            ConvoLogEntry::CreateMessage(entry) => Some(&entry.rev),
            ConvoLogEntry::DeleteMessage(entry) => Some(&entry.rev),
            ConvoLogEntry::BeginConvo(entry) => Some(&entry.rev),
            ConvoLogEntry::LeaveConvo(entry) => Some(&entry.rev),
            ConvoLogEntry::Unknown(_) => None,
        }
    }
}

// =============================================================================
// Endpoint inputs and outputs
// =============================================================================

/// Output of `chat.bsky.convo.getConvo`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetConvoOutput {
    /// The conversation
    pub convo: ConvoView,
}

/// Output of `chat.bsky.convo.getMessages`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetMessagesOutput {
    /// Pagination cursor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    /// Messages, newest first
    pub messages: Vec<ConvoMessage>,
}

/// Input for `chat.bsky.convo.sendMessage`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageInput {
    /// Target conversation
    pub convo_id: String,
    /// Message to send
    pub message: MessageInput,
}

/// Output of `chat.bsky.convo.getLog`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetLogOutput {
    /// Cursor to resume the log from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    /// Log entries
    pub logs: Vec<ConvoLogEntry>,
}
