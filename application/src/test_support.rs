//! Scripted port implementations shared by the use case tests.

use crate::ports::assistant_client::{
    AssistantClient, AssistantSession, ClientError, EventHandler, SubscriptionId,
};
use crate::ports::progress::{DetectionMiss, RecipeProgress, RepoSource};
use crate::ports::prompt_input::{InputError, PromptInputPort};
use crate::ports::remote_detector::RemoteDetectorPort;
use async_trait::async_trait;
use recipes_domain::{MessageOptions, Model, SessionConfig, SessionEvent, SessionSummary};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Ordered record of everything the fakes observed, shared between them
/// so tests can assert on interleaving.
pub(crate) type Journal = Arc<Mutex<Vec<String>>>;

pub(crate) fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub(crate) fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

type ReplyFn = Arc<dyn Fn(&str) -> Vec<SessionEvent> + Send + Sync>;

/// Default reply: echo the prompt back, then go idle
fn echo_reply(prompt: &str) -> Vec<SessionEvent> {
    vec![
        SessionEvent::AssistantMessage {
            message_id: None,
            content: format!("echo: {}", prompt),
        },
        SessionEvent::SessionIdle,
    ]
}

#[derive(Default)]
struct ClientState {
    /// Persisted sessions (survive destroy, erased by delete)
    store: HashMap<String, Model>,
    destroyed: HashSet<String>,
    sent: Vec<(String, String)>,
    next_id: u64,
    next_message: u64,
}

/// In-memory assistant client with scripted replies
pub(crate) struct ScriptedClient {
    state: Arc<Mutex<ClientState>>,
    reply: ReplyFn,
    started: AtomicBool,
    start_count: AtomicUsize,
    stop_count: AtomicUsize,
    fail_start: bool,
    fail_stop: bool,
    fail_create: bool,
    fail_send: bool,
}

impl ScriptedClient {
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ClientState::default())),
            reply: Arc::new(echo_reply),
            started: AtomicBool::new(false),
            start_count: AtomicUsize::new(0),
            stop_count: AtomicUsize::new(0),
            fail_start: false,
            fail_stop: false,
            fail_create: false,
            fail_send: false,
        }
    }

    pub(crate) fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    pub(crate) fn failing_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    pub(crate) fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub(crate) fn failing_send(mut self) -> Self {
        self.fail_send = true;
        self
    }

    pub(crate) fn with_reply(
        mut self,
        reply: impl Fn(&str) -> Vec<SessionEvent> + Send + Sync + 'static,
    ) -> Self {
        self.reply = Arc::new(reply);
        self
    }

    pub(crate) fn start_count(&self) -> usize {
        self.start_count.load(Ordering::SeqCst)
    }

    pub(crate) fn stop_count(&self) -> usize {
        self.stop_count.load(Ordering::SeqCst)
    }

    pub(crate) fn is_destroyed(&self, session_id: &str) -> bool {
        self.state.lock().unwrap().destroyed.contains(session_id)
    }

    /// `(session_id, prompt)` pairs in send order
    pub(crate) fn sent_prompts(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().sent.clone()
    }

    pub(crate) fn stored_ids(&self) -> HashSet<String> {
        self.state.lock().unwrap().store.keys().cloned().collect()
    }

    fn session(&self, session_id: String, model: Option<Model>) -> ScriptedSession {
        let (idle_tx, _) = watch::channel(true);
        ScriptedSession {
            session_id,
            model,
            state: Arc::clone(&self.state),
            reply: Arc::clone(&self.reply),
            fail_send: self.fail_send,
            handlers: Arc::new(Mutex::new(Vec::new())),
            next_subscription: AtomicU64::new(1),
            destroyed: AtomicBool::new(false),
            idle_tx: Arc::new(idle_tx),
        }
    }

    fn ensure_started(&self) -> Result<(), ClientError> {
        if self.started.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ClientError::NotStarted)
        }
    }
}

#[async_trait]
impl AssistantClient for ScriptedClient {
    async fn start(&self) -> Result<(), ClientError> {
        self.start_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_start {
            return Err(ClientError::StartFailed("copilot not found".to_string()));
        }
        self.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<(), ClientError> {
        self.stop_count.fetch_add(1, Ordering::SeqCst);
        self.started.store(false, Ordering::SeqCst);
        if self.fail_stop {
            return Err(ClientError::StopFailed("process already gone".to_string()));
        }
        Ok(())
    }

    async fn create_session(
        &self,
        config: SessionConfig,
    ) -> Result<Box<dyn AssistantSession>, ClientError> {
        self.ensure_started()?;
        if self.fail_create {
            return Err(ClientError::SessionUnavailable("no capacity".to_string()));
        }
        let session_id = {
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            let id = config
                .session_id
                .clone()
                .unwrap_or_else(|| format!("session-{}", state.next_id));
            state.store.insert(id.clone(), config.model.clone());
            state.destroyed.remove(&id);
            id
        };
        Ok(Box::new(self.session(session_id, Some(config.model))))
    }

    async fn resume_session(
        &self,
        session_id: &str,
    ) -> Result<Box<dyn AssistantSession>, ClientError> {
        self.ensure_started()?;
        let model = {
            let mut state = self.state.lock().unwrap();
            let model = state
                .store
                .get(session_id)
                .cloned()
                .ok_or_else(|| ClientError::SessionNotFound(session_id.to_string()))?;
            state.destroyed.remove(session_id);
            model
        };
        Ok(Box::new(self.session(session_id.to_string(), Some(model))))
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, ClientError> {
        self.ensure_started()?;
        let state = self.state.lock().unwrap();
        Ok(state.store.keys().map(SessionSummary::new).collect())
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), ClientError> {
        self.ensure_started()?;
        let mut state = self.state.lock().unwrap();
        state
            .store
            .remove(session_id)
            .map(|_| ())
            .ok_or_else(|| ClientError::SessionNotFound(session_id.to_string()))
    }
}

/// Session whose replies are delivered from a spawned task, like the real
/// client's dispatch task.
pub(crate) struct ScriptedSession {
    session_id: String,
    model: Option<Model>,
    state: Arc<Mutex<ClientState>>,
    reply: ReplyFn,
    fail_send: bool,
    handlers: Arc<Mutex<Vec<(SubscriptionId, EventHandler)>>>,
    next_subscription: AtomicU64,
    destroyed: AtomicBool,
    idle_tx: Arc<watch::Sender<bool>>,
}

#[async_trait]
impl AssistantSession for ScriptedSession {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    fn on(&self, handler: EventHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::SeqCst));
        self.handlers.lock().unwrap().push((id, handler));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.lock().unwrap();
        let before = handlers.len();
        handlers.retain(|(existing, _)| *existing != id);
        handlers.len() != before
    }

    async fn send(&self, options: MessageOptions) -> Result<String, ClientError> {
        if self.destroyed.load(Ordering::SeqCst) {
            return Err(ClientError::SendFailed(format!(
                "session {} has been destroyed",
                self.session_id
            )));
        }
        if self.fail_send {
            return Err(ClientError::SendFailed("transport unavailable".to_string()));
        }

        let message_id = {
            let mut state = self.state.lock().unwrap();
            state.next_message += 1;
            state
                .sent
                .push((self.session_id.clone(), options.prompt.clone()));
            format!("msg-{}", state.next_message)
        };

        self.idle_tx.send_replace(false);
        let events = (self.reply)(&options.prompt);
        let handlers = Arc::clone(&self.handlers);
        let idle_tx = Arc::clone(&self.idle_tx);
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            for event in events {
                let snapshot: Vec<EventHandler> = handlers
                    .lock()
                    .unwrap()
                    .iter()
                    .map(|(_, h)| Arc::clone(h))
                    .collect();
                for handler in snapshot {
                    handler(&event);
                }
                if event.ends_turn() {
                    idle_tx.send_replace(true);
                }
            }
            idle_tx.send_replace(true);
        });

        Ok(message_id)
    }

    async fn wait_for_idle(&self) -> Result<(), ClientError> {
        let mut rx = self.idle_tx.subscribe();
        rx.wait_for(|idle| *idle)
            .await
            .map(|_| ())
            .map_err(|_| ClientError::TransportClosed)
    }

    async fn destroy(&self) -> Result<(), ClientError> {
        self.destroyed.store(true, Ordering::SeqCst);
        self.handlers.lock().unwrap().clear();
        self.state
            .lock()
            .unwrap()
            .destroyed
            .insert(self.session_id.clone());
        Ok(())
    }
}

/// Progress notifier that writes every callback to a [`Journal`]
pub(crate) struct RecordingProgress {
    journal: Journal,
}

impl RecordingProgress {
    pub(crate) fn new(journal: Journal) -> Self {
        Self { journal }
    }

    fn push(&self, entry: String) {
        self.journal.lock().unwrap().push(entry);
    }
}

impl RecipeProgress for RecordingProgress {
    fn on_event(&self, event: &SessionEvent) {
        match event {
            SessionEvent::AssistantMessage { content, .. } => {
                self.push(format!("event:assistant.message:{}", content))
            }
            SessionEvent::ToolExecutionStart { tool_name, .. }
            | SessionEvent::ToolExecutionComplete { tool_name, .. } => {
                self.push(format!("event:{}:{}", event.event_type(), tool_name))
            }
            other => self.push(format!("event:{}", other.event_type())),
        }
    }

    fn on_response(&self, content: &str) {
        self.push(format!("response:{}", content));
    }

    fn on_session_created(&self, session_id: &str) {
        self.push(format!("created:{}", session_id));
    }

    fn on_session_destroyed(&self, session_id: &str) {
        self.push(format!("destroyed:{}", session_id));
    }

    fn on_session_resumed(&self, session_id: &str) {
        self.push(format!("resumed:{}", session_id));
    }

    fn on_sessions_listed(&self, session_ids: &[String]) {
        self.push(format!("listed:{}", session_ids.len()));
    }

    fn on_session_deleted(&self, session_id: &str) {
        self.push(format!("deleted:{}", session_id));
    }

    fn on_sessions_ready(&self, count: usize) {
        self.push(format!("ready:{}", count));
    }

    fn on_context_sent(&self) {
        self.push("context_sent".to_string());
    }

    fn on_follow_ups_sent(&self) {
        self.push("follow_ups_sent".to_string());
    }

    fn on_sessions_released(&self) {
        self.push("released".to_string());
    }

    fn on_send_failed(&self, session_id: &str, _error: &ClientError) {
        self.push(format!("send_failed:{}", session_id));
    }

    fn on_repo_resolved(&self, repo: &str, source: RepoSource) {
        self.push(format!("repo:{:?}:{}", source, repo));
    }

    fn on_repo_detection_missed(&self, miss: DetectionMiss) {
        self.push(format!("miss:{:?}", miss));
    }

    fn on_analysis_start(&self) {
        self.push("analysis_start".to_string());
    }

    fn on_follow_up_intro(&self, examples: &[&str]) {
        self.push(format!("intro:{}", examples.len()));
    }

    fn on_goodbye(&self) {
        self.push("goodbye".to_string());
    }
}

/// Prompt input that replays fixed lines, then reports end of input
pub(crate) struct ScriptedInput {
    lines: Mutex<VecDeque<String>>,
    journal: Journal,
}

impl ScriptedInput {
    pub(crate) fn new(lines: &[&str], journal: Journal) -> Self {
        Self {
            lines: Mutex::new(lines.iter().map(|l| l.to_string()).collect()),
            journal,
        }
    }
}

#[async_trait]
impl PromptInputPort for ScriptedInput {
    async fn read_line(&self, prompt: &str) -> Result<Option<String>, InputError> {
        self.journal
            .lock()
            .unwrap()
            .push(format!("read:{}", prompt.trim()));
        Ok(self.lines.lock().unwrap().pop_front())
    }
}

/// Remote detector with fixed answers
pub(crate) struct FixedRemoteDetector {
    pub(crate) git_repo: bool,
    pub(crate) origin: Option<String>,
}

#[async_trait]
impl RemoteDetectorPort for FixedRemoteDetector {
    async fn is_git_repo(&self) -> bool {
        self.git_repo
    }

    async fn origin_url(&self) -> Option<String> {
        self.origin.clone()
    }
}
