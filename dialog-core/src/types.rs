use serde::{Deserialize, Serialize};

/// Result of an operation as observed by the completion handler.
///
/// `None` is the single failure marker: transport failure and undecodable
/// payloads are not distinguished.
pub type Outcome<T> = Option<T>;

/// One dialog script stored by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DialogSummary {
    #[serde(rename = "dialog_id")]
    pub id: String,
    pub name: String,
}

impl DialogSummary {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Dialogs in the order the service returned them. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogList {
    pub dialogs: Vec<DialogSummary>,
}

impl DialogList {
    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub dialog_id: String,
}

/// Identifies an ongoing conversation.
///
/// Zero means "not set": a zero `conversation_id` starts a new conversation
/// and a zero `client_id` lets the service assign one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationContext {
    pub conversation_id: i64,
    pub client_id: i64,
}

impl ConversationContext {
    pub fn new(conversation_id: i64, client_id: i64) -> Self {
        Self {
            conversation_id,
            client_id,
        }
    }
}

/// One input/response exchange, as decoded from the service's wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    #[serde(rename = "response")]
    pub utterances: Vec<String>,
    #[serde(rename = "input")]
    pub input_echo: String,
    pub conversation_id: i64,
    pub confidence: f64,
    pub client_id: i64,
}

impl ConversationTurn {
    /// Context to pass to the next turn of the same conversation.
    pub fn context(&self) -> ConversationContext {
        ConversationContext::new(self.conversation_id, self.client_id)
    }

    /// Utterances joined with newlines.
    pub fn text(&self) -> String {
        self.utterances.join("\n")
    }
}
