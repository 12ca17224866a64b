//! Request payloads sent to the report and chat endpoints.
//!
//! # Design
//! Every field defaults to an empty string so partially filled forms still
//! serialize; the backend decides what to do with blanks. Wire names follow
//! the mobile app's form state (`dateISO`, `locationText`, ...), not Rust
//! naming.

use serde::{Deserialize, Serialize};

/// Incident details collected by the "New Report" form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReportPayload {
    pub category: String,
    #[serde(rename = "dateISO")]
    pub date_iso: String,
    #[serde(rename = "timeISO")]
    pub time_iso: String,
    #[serde(rename = "locationText")]
    pub location_text: String,
    pub description: String,
}

impl ReportPayload {
    pub fn new(category: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            description: description.into(),
            ..Self::default()
        }
    }
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Ordered conversation history, oldest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChatPayload {
    pub messages: Vec<ChatMessage>,
}

impl ChatPayload {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }
}

/// The two logical operations served by the candidate prober.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GenerateReport,
    SendMessage,
}

impl Operation {
    /// Path suffixes tried after any configured override, in order.
    pub fn default_paths(self) -> &'static [&'static str] {
        match self {
            Operation::GenerateReport => {
                &["/report", "/api/report", "/v1/report", "/generate", "/api/generate"]
            }
            Operation::SendMessage => &[
                "/chat",
                "/api/chat",
                "/v1/chat",
                "/messages",
                "/api/messages",
                "/respond",
            ],
        }
    }

    /// Response fields holding the result text, highest priority first.
    pub fn result_fields(self) -> &'static [&'static str] {
        match self {
            Operation::GenerateReport => &["report", "summary", "text", "message"],
            Operation::SendMessage => &["reply", "text", "message", "output", "answer"],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::GenerateReport => "generate_report",
            Operation::SendMessage => "send_message",
        }
    }
}
