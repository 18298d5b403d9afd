//! The content studio
//!
//! [`Studio`] ties the pieces together: it gates every operation on a
//! signed-in principal, sends tool requests to the content service,
//! substitutes local placeholders when that fails and records each outcome
//! in the tool's bounded history.

use crate::auth::{Identity, Principal};
use crate::config::{Config, IdFormat};
use crate::error::{Error, Result};
use crate::export::DownloadSink;
use crate::history::{HistoryStore, Record};
use crate::storage::{KeyValueStore, open_store};
use crate::tools::client::{ContentClient, Reply};
use crate::tools::{
    ChatMessage, ChatSession, HistoryDetail, IdeaRequest, Provenance, RefineRequest, Role,
    SummaryRequest, ToolKind, ToolOutput, fallback,
};
use crate::types::{IdGenerator, RecordId, TimestampIds, UuidIds};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Reason recorded when the service itself answered with a placeholder
const SERVICE_PLACEHOLDER: &str = "content service returned a placeholder";

/// One history record seen through its prompt/response view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub tool: ToolKind,
    pub id: RecordId,
    pub timestamp: DateTime<Utc>,
    pub prompt: String,
    pub response: String,
}

impl Activity {
    fn from_record<T: HistoryDetail>(tool: ToolKind, record: &Record<T>) -> Self {
        Self {
            tool,
            id: record.id.clone(),
            timestamp: record.timestamp,
            prompt: record.payload.prompt(),
            response: record.payload.response(),
        }
    }
}

/// Result of probing the content service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendStatus {
    pub url: String,
    pub connected: bool,
}

/// Main studio
pub struct Studio {
    config: Config,
    client: ContentClient,
    identity: Identity,
    ids: Arc<dyn IdGenerator>,
    summaries: HistoryStore<SummaryRequest>,
    ideas: HistoryStore<IdeaRequest>,
    refinements: HistoryStore<RefineRequest>,
    chats: HistoryStore<ChatSession>,
}

impl Studio {
    /// Create a studio on the storage backend named in the configuration
    pub fn new(config: Config) -> Result<Self> {
        let storage = open_store(&config)?;
        Self::with_storage(config, storage)
    }

    /// Create a studio on an explicit storage backend
    pub fn with_storage(config: Config, storage: Arc<dyn KeyValueStore>) -> Result<Self> {
        config.validate()?;
        let client = ContentClient::new(&config.backend)?;
        let ids: Arc<dyn IdGenerator> = match config.history.id_format {
            IdFormat::Timestamp => Arc::new(TimestampIds::new()),
            IdFormat::Uuid => Arc::new(UuidIds),
        };

        let open = |tool: ToolKind| (tool.storage_key(), config.max_items(tool));
        let (key, max) = open(ToolKind::Summarizer);
        let summaries = HistoryStore::open(key, max, storage.clone(), ids.clone());
        let (key, max) = open(ToolKind::Ideas);
        let ideas = HistoryStore::open(key, max, storage.clone(), ids.clone());
        let (key, max) = open(ToolKind::Refiner);
        let refinements = HistoryStore::open(key, max, storage.clone(), ids.clone());
        let (key, max) = open(ToolKind::Chatbot);
        let chats = HistoryStore::open(key, max, storage.clone(), ids.clone());

        Ok(Self {
            identity: Identity::new(storage),
            config,
            client,
            ids,
            summaries,
            ideas,
            refinements,
            chats,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// The signed-in principal, if any
    pub fn principal(&self) -> Option<Principal> {
        self.identity.current()
    }

    fn require_principal(&self) -> Result<Principal> {
        self.identity.require()
    }

    /// Summarize `text`
    pub async fn summarize(&mut self, text: &str) -> Result<ToolOutput<String>> {
        self.require_principal()?;
        require_text("text", text)?;

        let result = self.client.summarize(text).await;
        let (summary, provenance) =
            resolve(ToolKind::Summarizer, result, || Ok(fallback::summary(text)))?;

        let record_id = self
            .summaries
            .add(SummaryRequest::new(text, summary.clone()), None)?;
        Ok(ToolOutput {
            value: summary,
            provenance,
            record_id,
        })
    }

    /// Generate content ideas for `topic`
    pub async fn generate_ideas(&mut self, topic: &str) -> Result<ToolOutput<Vec<String>>> {
        self.require_principal()?;
        require_text("topic", topic)?;

        let result = self.client.generate_ideas(topic).await;
        let (ideas, provenance) = resolve(ToolKind::Ideas, result, || Ok(fallback::ideas(topic)))?;

        let record_id = self.ideas.add(
            IdeaRequest {
                topic: topic.to_string(),
                ideas: ideas.clone(),
            },
            None,
        )?;
        Ok(ToolOutput {
            value: ideas,
            provenance,
            record_id,
        })
    }

    /// Rewrite `text` following `instruction`
    pub async fn refine(&mut self, text: &str, instruction: &str) -> Result<ToolOutput<String>> {
        self.require_principal()?;
        require_text("text", text)?;
        require_text("instruction", instruction)?;

        let result = self.client.refine_content(text, instruction).await;
        let (refined, provenance) = resolve(ToolKind::Refiner, result, || {
            fallback::refinement(text, instruction)
        })?;

        let record_id = self.refinements.add(
            RefineRequest {
                original_text: text.to_string(),
                instruction: instruction.to_string(),
                refined_text: refined.clone(),
            },
            None,
        )?;
        Ok(ToolOutput {
            value: refined,
            provenance,
            record_id,
        })
    }

    /// Send `message` in a new session or continue an existing one
    ///
    /// The session is saved after the reply arrives and moves to the front
    /// of the chat history. The output's `record_id` is the session id.
    pub async fn chat(
        &mut self,
        session_id: Option<&RecordId>,
        message: &str,
    ) -> Result<ToolOutput<String>> {
        self.require_principal()?;
        require_text("message", message)?;

        let (session_id, mut session) = match session_id {
            Some(id) => {
                let record = self.chats.get(id).ok_or_else(|| Error::RecordNotFound {
                    key: ToolKind::Chatbot.storage_key().to_string(),
                    id: id.to_string(),
                })?;
                (record.id.clone(), record.payload.clone())
            }
            None => (self.ids.next_id(), ChatSession::default()),
        };

        let context_len = self.config.chat.context_messages;
        let context_start = session.messages.len().saturating_sub(context_len);
        let context = session.messages[context_start..].to_vec();

        session.messages.push(ChatMessage {
            id: self.ids.next_id(),
            content: message.to_string(),
            role: Role::User,
            timestamp: Utc::now(),
        });

        let result = self.client.chat(message, &context).await;
        let (response, provenance) = resolve(ToolKind::Chatbot, result, || {
            Ok(fallback::chat_reply(message, &context))
        })?;

        session.messages.push(ChatMessage {
            id: self.ids.next_id(),
            content: response.clone(),
            role: Role::Assistant,
            timestamp: Utc::now(),
        });
        session.title = ChatSession::title_from(&session.messages, self.config.chat.title_length);

        let record_id = self.chats.add(session, Some(session_id))?;
        debug!(session = %record_id, "saved chat session");
        Ok(ToolOutput {
            value: response,
            provenance,
            record_id,
        })
    }

    /// A stored chat session with its full transcript
    pub fn chat_session(&self, id: &RecordId) -> Result<&Record<ChatSession>> {
        self.require_principal()?;
        self.chats.get(id).ok_or_else(|| Error::RecordNotFound {
            key: ToolKind::Chatbot.storage_key().to_string(),
            id: id.to_string(),
        })
    }

    /// A tool's history, most recent first
    pub fn history(&self, tool: ToolKind) -> Result<Vec<Activity>> {
        self.require_principal()?;
        Ok(self.activities(tool))
    }

    fn activities(&self, tool: ToolKind) -> Vec<Activity> {
        fn collect<T: HistoryDetail>(tool: ToolKind, records: &[Record<T>]) -> Vec<Activity> {
            records
                .iter()
                .map(|record| Activity::from_record(tool, record))
                .collect()
        }

        match tool {
            ToolKind::Summarizer => collect(tool, self.summaries.entries()),
            ToolKind::Ideas => collect(tool, self.ideas.entries()),
            ToolKind::Refiner => collect(tool, self.refinements.entries()),
            ToolKind::Chatbot => collect(tool, self.chats.entries()),
        }
    }

    /// One record of a tool's history
    pub fn detail(&self, tool: ToolKind, id: &RecordId) -> Result<Activity> {
        self.history(tool)?
            .into_iter()
            .find(|activity| &activity.id == id)
            .ok_or_else(|| Error::RecordNotFound {
                key: tool.storage_key().to_string(),
                id: id.to_string(),
            })
    }

    /// Newest records across every tool
    pub fn recent_activity(&self, limit: usize) -> Result<Vec<Activity>> {
        self.require_principal()?;
        let mut all: Vec<Activity> = ToolKind::ALL
            .iter()
            .flat_map(|&tool| self.activities(tool))
            .collect();
        all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        all.truncate(limit);
        Ok(all)
    }

    /// Delete one record; returns whether it existed
    pub fn remove(&mut self, tool: ToolKind, id: &RecordId) -> Result<bool> {
        self.require_principal()?;
        Ok(match tool {
            ToolKind::Summarizer => self.summaries.remove(id),
            ToolKind::Ideas => self.ideas.remove(id),
            ToolKind::Refiner => self.refinements.remove(id),
            ToolKind::Chatbot => self.chats.remove(id),
        })
    }

    /// Drop a tool's whole history
    pub fn clear(&mut self, tool: ToolKind) -> Result<()> {
        self.require_principal()?;
        match tool {
            ToolKind::Summarizer => self.summaries.clear(),
            ToolKind::Ideas => self.ideas.clear(),
            ToolKind::Refiner => self.refinements.clear(),
            ToolKind::Chatbot => self.chats.clear(),
        }
        info!(tool = %tool, "cleared history");
        Ok(())
    }

    /// Hand a tool's history to `sink`; returns the offered file name
    pub fn export(&self, tool: ToolKind, sink: &dyn DownloadSink) -> Result<String> {
        self.require_principal()?;
        Ok(match tool {
            ToolKind::Summarizer => self.summaries.export(sink),
            ToolKind::Ideas => self.ideas.export(sink),
            ToolKind::Refiner => self.refinements.export(sink),
            ToolKind::Chatbot => self.chats.export(sink),
        })
    }

    /// Number of records and bound for a tool
    pub fn usage(&self, tool: ToolKind) -> (usize, usize) {
        match tool {
            ToolKind::Summarizer => (self.summaries.len(), self.summaries.max_items()),
            ToolKind::Ideas => (self.ideas.len(), self.ideas.max_items()),
            ToolKind::Refiner => (self.refinements.len(), self.refinements.max_items()),
            ToolKind::Chatbot => (self.chats.len(), self.chats.max_items()),
        }
    }

    /// Probe the content service
    pub async fn status(&self) -> BackendStatus {
        BackendStatus {
            url: self.client.base_url().to_string(),
            connected: self.client.probe().await,
        }
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid_input(field, "must not be empty"));
    }
    Ok(())
}

/// Pick the live value or compute the local placeholder
fn resolve<V>(
    tool: ToolKind,
    result: Result<Reply<V>>,
    fallback: impl FnOnce() -> Result<V>,
) -> Result<(V, Provenance)> {
    match result {
        Ok(Reply {
            value,
            fallback: false,
        }) => Ok((value, Provenance::Live)),
        Ok(Reply {
            value,
            fallback: true,
        }) => Ok((
            value,
            Provenance::Fallback {
                reason: SERVICE_PLACEHOLDER.to_string(),
            },
        )),
        Err(e) => {
            info!(tool = %tool, error = %e, "content service unavailable, using local fallback");
            Ok((
                fallback()?,
                Provenance::Fallback {
                    reason: e.to_string(),
                },
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{DirectorySink, MemorySink};
    use crate::storage::MemoryStore;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn principal() -> Principal {
        Principal {
            display_name: Some("Grace".to_string()),
            email: "grace@example.com".to_string(),
            photo_url: None,
        }
    }

    fn offline_config() -> Config {
        let mut config = Config::default();
        config.backend.base_url = "http://127.0.0.1:9".to_string();
        config.backend.connect_timeout_secs = 1;
        config.backend.timeout_secs = 2;
        config
    }

    fn signed_in(config: Config, storage: Arc<MemoryStore>) -> Studio {
        let studio = Studio::with_storage(config, storage).unwrap();
        studio.identity().sign_in(&principal()).unwrap();
        studio
    }

    #[tokio::test]
    async fn test_tools_require_sign_in() {
        let mut studio = Studio::with_storage(offline_config(), Arc::new(MemoryStore::new())).unwrap();

        assert!(matches!(
            studio.summarize("text").await,
            Err(Error::NotSignedIn)
        ));
        assert!(matches!(
            studio.history(ToolKind::Ideas),
            Err(Error::NotSignedIn)
        ));
    }

    #[tokio::test]
    async fn test_empty_input_rejected() {
        let mut studio = signed_in(offline_config(), Arc::new(MemoryStore::new()));
        let err = studio.refine("text", "  ").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
        assert!(studio.history(ToolKind::Refiner).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_live_summary_is_recorded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/summarize"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "summary": "Short." })))
            .mount(&server)
            .await;

        let mut config = Config::default();
        config.backend.base_url = server.uri();
        let mut studio = signed_in(config, Arc::new(MemoryStore::new()));

        let out = studio.summarize("Some long text").await.unwrap();
        assert_eq!(out.value, "Short.");
        assert_eq!(out.provenance, Provenance::Live);

        let history = studio.history(ToolKind::Summarizer).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, out.record_id);
        assert_eq!(history[0].prompt, "Some long text");
        assert_eq!(history[0].response, "Short.");
    }

    #[tokio::test]
    async fn test_unreachable_backend_uses_fallback() {
        let mut studio = signed_in(offline_config(), Arc::new(MemoryStore::new()));

        let out = studio.generate_ideas("Gardening").await.unwrap();
        assert!(out.provenance.is_fallback());
        assert_eq!(out.value, fallback::ideas("Gardening"));

        let out = studio.refine("I can't", "formal please").await.unwrap();
        assert_eq!(out.value, "I cannot");
        assert!(out.provenance.is_fallback());
    }

    #[tokio::test]
    async fn test_server_error_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/summarize"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut config = Config::default();
        config.backend.base_url = server.uri();
        let mut studio = signed_in(config, Arc::new(MemoryStore::new()));

        let out = studio.summarize("tiny").await.unwrap();
        assert_eq!(out.value, fallback::CONCISE_TEXT_MESSAGE);
        match out.provenance {
            Provenance::Fallback { reason } => assert!(reason.contains("500")),
            Provenance::Live => panic!("expected fallback"),
        }
    }

    #[tokio::test]
    async fn test_chat_session_continues_and_promotes() {
        let mut studio = signed_in(offline_config(), Arc::new(MemoryStore::new()));

        let first = studio.chat(None, "hello there").await.unwrap();
        let other = studio.chat(None, "thanks").await.unwrap();
        assert_ne!(first.record_id, other.record_id);

        let again = studio
            .chat(Some(&first.record_id), "can you help")
            .await
            .unwrap();
        assert_eq!(again.record_id, first.record_id);

        let history = studio.history(ToolKind::Chatbot).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, first.record_id);

        let session = studio.chat_session(&first.record_id).unwrap();
        assert_eq!(session.payload.messages.len(), 4);
        assert_eq!(session.payload.title, "hello there");
        assert_eq!(session.payload.messages[2].content, "can you help");
        assert_eq!(session.payload.messages[3].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_chat_sends_recent_context() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "ok" })))
            .mount(&server)
            .await;

        let mut config = Config::default();
        config.backend.base_url = server.uri();
        config.chat.context_messages = 3;
        let mut studio = signed_in(config, Arc::new(MemoryStore::new()));

        let first = studio.chat(None, "one").await.unwrap();
        studio.chat(Some(&first.record_id), "two").await.unwrap();
        studio.chat(Some(&first.record_id), "three").await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let last: serde_json::Value = serde_json::from_slice(&requests[2].body).unwrap();
        let history = last["history"].as_array().unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0]["content"], "ok");
        assert_eq!(history[1]["content"], "two");
        assert_eq!(last["message"], "three");
    }

    #[tokio::test]
    async fn test_chat_unknown_session() {
        let mut studio = signed_in(offline_config(), Arc::new(MemoryStore::new()));
        let err = studio
            .chat(Some(&RecordId::from("missing")), "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::RecordNotFound { .. }));
    }

    #[tokio::test]
    async fn test_history_bound_and_persistence() {
        let storage = Arc::new(MemoryStore::new());
        let mut config = offline_config();
        config.history.ideas_max = 2;
        let mut studio = signed_in(config.clone(), storage.clone());

        for topic in ["a", "b", "c"] {
            studio.generate_ideas(topic).await.unwrap();
        }
        assert_eq!(studio.usage(ToolKind::Ideas), (2, 2));

        let reopened = Studio::with_storage(config, storage).unwrap();
        let topics: Vec<String> = reopened
            .history(ToolKind::Ideas)
            .unwrap()
            .into_iter()
            .map(|a| a.prompt)
            .collect();
        assert_eq!(topics, vec!["c".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_recent_activity_spans_tools() {
        let mut studio = signed_in(offline_config(), Arc::new(MemoryStore::new()));
        studio.summarize("first").await.unwrap();
        studio.generate_ideas("second").await.unwrap();
        studio.refine("third", "casual").await.unwrap();

        let recent = studio.recent_activity(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].tool, ToolKind::Refiner);
        assert_eq!(recent[1].tool, ToolKind::Ideas);
    }

    #[tokio::test]
    async fn test_remove_clear_export() {
        let storage = Arc::new(MemoryStore::new());
        let mut studio = signed_in(offline_config(), storage.clone());
        let a = studio.summarize("alpha").await.unwrap();
        studio.summarize("beta").await.unwrap();

        assert!(studio.remove(ToolKind::Summarizer, &a.record_id).unwrap());
        assert!(!studio.remove(ToolKind::Summarizer, &a.record_id).unwrap());
        assert!(studio.detail(ToolKind::Summarizer, &a.record_id).is_err());

        let sink = MemorySink::new();
        let name = studio.export(ToolKind::Summarizer, &sink).unwrap();
        assert_eq!(sink.files().len(), 1);
        assert_eq!(sink.files()[0].0, name);
        assert!(name.starts_with("text-summarizer-history-history-"));

        studio.clear(ToolKind::Summarizer).unwrap();
        assert!(studio.history(ToolKind::Summarizer).unwrap().is_empty());
        assert!(!storage.contains(&ToolKind::Summarizer.storage_key()));
    }

    #[tokio::test]
    async fn test_failed_directory_export_leaves_no_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let mut studio = signed_in(offline_config(), Arc::new(MemoryStore::new()));
        studio.summarize("alpha").await.unwrap();

        let sink = DirectorySink::new(&blocker);
        let name = studio.export(ToolKind::Summarizer, &sink).unwrap();
        assert_eq!(sink.written(&name), None);
    }

    #[tokio::test]
    async fn test_status_reports_disconnected() {
        let studio = Studio::with_storage(offline_config(), Arc::new(MemoryStore::new())).unwrap();
        let status = studio.status().await;
        assert!(!status.connected);
        assert_eq!(status.url, "http://127.0.0.1:9");
    }
}
