// ── Readtrack Atoms: Pure Data Types ──────────────────────────────────────
// Plain struct/enum definitions with no logic.
// Atoms layer rule: no I/O, no side effects, no imports from engine/.

use serde::{Deserialize, Serialize};

/// Sentinel group id for messages received outside any group (direct chat).
pub const PRIVATE_GROUP: &str = "private";

/// Transport-level payload classification of an inbound event.
/// Anything that is not `Text` bypasses text analysis entirely — a non-text
/// reaction (sticker, photo…) is itself treated as evidence the sender saw
/// the announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadKind {
    Text,
    Image,
    Sticker,
    Link,
    Video,
    /// Unknown transport type code, carried for the message-log placeholder.
    Other(i64),
}

impl PayloadKind {
    /// Synthetic content recorded in the message log for non-text payloads.
    pub fn placeholder(&self) -> String {
        match self {
            PayloadKind::Text => String::new(),
            PayloadKind::Image => "[image]".to_string(),
            PayloadKind::Sticker => "[sticker]".to_string(),
            PayloadKind::Link => "[link]".to_string(),
            PayloadKind::Video => "[video]".to_string(),
            PayloadKind::Other(code) => format!("[unsupported: {}]", code),
        }
    }
}

/// The inbound-message shape the hosting runtime hands us.
/// Group context carries the real group id; direct chats use [`PRIVATE_GROUP`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    pub text: String,
    pub sender_display_name: String,
    pub group_id: String,
    /// Best-effort group title as seen by the transport; we log it so reports
    /// can show a human name later (there is no group-name registry).
    pub group_display_name: Option<String>,
    pub is_group: bool,
    pub payload: PayloadKind,
}

/// What the handler wants the host to do after processing an event.
/// `consumed = true` is the "stop further processing of this event" signal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandleOutcome {
    pub reply: Option<String>,
    pub consumed: bool,
}

impl HandleOutcome {
    pub fn ignored() -> Self {
        HandleOutcome { reply: None, consumed: false }
    }

    pub fn reply(text: impl Into<String>) -> Self {
        HandleOutcome { reply: Some(text.into()), consumed: true }
    }
}

/// One row of the read-status table: member X acknowledged in group G on day D.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadRecord {
    pub group_id: String,
    pub member_name: String,
    /// `%Y-%m-%d %H:%M:%S`, local time.
    pub read_time: String,
    /// `%Y-%m-%d`, the local calendar day used as partition key.
    pub record_date: String,
}

/// A (group id, display name) pair from the message log, used by
/// whitelist-by-name resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMatch {
    pub group_id: String,
    pub display_name: String,
}
