//! Content tools
//!
//! The four tools share one shape: take user input, ask the content service
//! for a result, fall back to a local placeholder when that fails, and keep
//! the outcome in the tool's history. This module holds what the tools have
//! in common: their identity, their history payloads and the provenance tag.
//!
//! - `client`: HTTP client for the content service
//! - `fallback`: deterministic local placeholder generators

pub mod client;
pub mod fallback;

use crate::types::{RecordId, StorageKey};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Summaries keep this many characters of the input
pub const SUMMARY_INPUT_PREVIEW: usize = 100;

/// Identifies a tool and its history collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// Text summarizer
    Summarizer,
    /// Idea generator
    Ideas,
    /// Content refiner
    Refiner,
    /// Chatbot
    Chatbot,
}

impl ToolKind {
    pub const ALL: [ToolKind; 4] = [
        ToolKind::Summarizer,
        ToolKind::Ideas,
        ToolKind::Refiner,
        ToolKind::Chatbot,
    ];

    /// Short machine name
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Summarizer => "summarizer",
            ToolKind::Ideas => "ideas",
            ToolKind::Refiner => "refiner",
            ToolKind::Chatbot => "chatbot",
        }
    }

    /// Human-facing title
    pub fn title(self) -> &'static str {
        match self {
            ToolKind::Summarizer => "Text Summarizer",
            ToolKind::Ideas => "Idea Generator",
            ToolKind::Refiner => "Content Refiner",
            ToolKind::Chatbot => "AI Chatbot",
        }
    }

    /// Namespace of the tool's history collection
    pub fn storage_key(self) -> StorageKey {
        StorageKey::from_static(match self {
            ToolKind::Summarizer => "text-summarizer-history",
            ToolKind::Ideas => "idea-generator-history",
            ToolKind::Refiner => "content-refiner-history",
            ToolKind::Chatbot => "ai-chatbot-history",
        })
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Where a tool result came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum Provenance {
    /// Produced by the content service
    Live,
    /// Produced locally because the service could not be used
    Fallback { reason: String },
}

impl Provenance {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Provenance::Fallback { .. })
    }
}

/// A tool result tagged with its provenance
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput<V> {
    pub value: V,
    pub provenance: Provenance,
    /// Id of the history record the result was stored under
    pub record_id: RecordId,
}

/// Prompt/response view of a history record
pub trait HistoryDetail {
    fn prompt(&self) -> String;
    fn response(&self) -> String;
}

/// Summarizer history payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub input: String,
    pub output: String,
}

impl SummaryRequest {
    /// Keep a short preview of the input alongside the summary
    pub fn new(input: &str, output: String) -> Self {
        Self {
            input: preview(input, SUMMARY_INPUT_PREVIEW),
            output,
        }
    }
}

impl HistoryDetail for SummaryRequest {
    fn prompt(&self) -> String {
        self.input.clone()
    }

    fn response(&self) -> String {
        self.output.clone()
    }
}

/// Idea generator history payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaRequest {
    pub topic: String,
    pub ideas: Vec<String>,
}

impl HistoryDetail for IdeaRequest {
    fn prompt(&self) -> String {
        self.topic.clone()
    }

    fn response(&self) -> String {
        self.ideas
            .iter()
            .enumerate()
            .map(|(i, idea)| format!("{}. {}", i + 1, idea))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Content refiner history payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineRequest {
    pub original_text: String,
    pub instruction: String,
    pub refined_text: String,
}

impl HistoryDetail for RefineRequest {
    fn prompt(&self) -> String {
        format!("{}\n\nInstruction: {}", self.original_text, self.instruction)
    }

    fn response(&self) -> String {
        self.refined_text.clone()
    }
}

/// Who sent a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in a chat session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: RecordId,
    pub content: String,
    pub role: Role,
    pub timestamp: DateTime<Utc>,
}

/// Chatbot history payload: a whole conversation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatSession {
    pub title: String,
    pub messages: Vec<ChatMessage>,
}

impl ChatSession {
    fn last_content(&self, role: Role) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == role)
            .map(|m| m.content.as_str())
    }

    /// Title from the first user message
    pub fn title_from(messages: &[ChatMessage], max_chars: usize) -> String {
        messages
            .iter()
            .find(|m| m.role == Role::User)
            .map(|m| preview(&m.content, max_chars))
            .unwrap_or_default()
    }
}

impl HistoryDetail for ChatSession {
    fn prompt(&self) -> String {
        self.last_content(Role::User).unwrap_or_default().to_string()
    }

    fn response(&self) -> String {
        self.last_content(Role::Assistant)
            .unwrap_or_default()
            .to_string()
    }
}

/// First `max_chars` characters, with "..." when something was cut
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let mut cut: String = text.chars().take(max_chars).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::Record;

    fn message(role: Role, content: &str) -> ChatMessage {
        ChatMessage {
            id: RecordId::from(content),
            content: content.to_string(),
            role,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_storage_keys_are_distinct() {
        let keys: std::collections::HashSet<_> =
            ToolKind::ALL.iter().map(|t| t.storage_key()).collect();
        assert_eq!(keys.len(), 4);
        assert_eq!(
            ToolKind::Summarizer.storage_key().as_str(),
            "text-summarizer-history"
        );
    }

    #[test]
    fn test_preview_truncates_on_chars() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("ééééé", 2), "éé...");
    }

    #[test]
    fn test_summary_request_keeps_preview() {
        let long = "x".repeat(150);
        let req = SummaryRequest::new(&long, "sum".to_string());
        assert_eq!(req.input.chars().count(), SUMMARY_INPUT_PREVIEW + 3);
    }

    #[test]
    fn test_refine_record_uses_camel_case() {
        let record = Record {
            id: RecordId::from("1"),
            timestamp: Utc::now(),
            payload: RefineRequest {
                original_text: "a".to_string(),
                instruction: "b".to_string(),
                refined_text: "c".to_string(),
            },
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["originalText"], "a");
        assert_eq!(json["refinedText"], "c");
        assert_eq!(json["id"], "1");
    }

    #[test]
    fn test_chat_session_detail_uses_last_exchange() {
        let session = ChatSession {
            title: "hi".to_string(),
            messages: vec![
                message(Role::User, "first"),
                message(Role::Assistant, "reply one"),
                message(Role::User, "second"),
                message(Role::Assistant, "reply two"),
            ],
        };
        assert_eq!(session.prompt(), "second");
        assert_eq!(session.response(), "reply two");
        assert_eq!(ChatSession::title_from(&session.messages, 3), "fir...");
    }

    #[test]
    fn test_idea_detail_is_numbered() {
        let req = IdeaRequest {
            topic: "tea".to_string(),
            ideas: vec!["One".to_string(), "Two".to_string()],
        };
        assert_eq!(req.response(), "1. One\n2. Two");
    }

    #[test]
    fn test_provenance_serializes_source_tag() {
        let json = serde_json::to_value(Provenance::Fallback {
            reason: "offline".to_string(),
        })
        .unwrap();
        assert_eq!(json["source"], "fallback");
        assert!(!Provenance::Live.is_fallback());
    }
}
