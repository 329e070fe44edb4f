//! Scripted collaborators shared by the use case tests.

use crate::ports::actor_store::{ActorStore, StoreError};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::progress::ProgressNotifier;
use crate::ports::random::RandomSource;
use async_trait::async_trait;
use legion_domain::{
    ActionVote, ActorSnapshot, BehaviorKind, JudgeVote, LedgerRecord, Message, Model, Speaker,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

struct Rule {
    needle: String,
    replies: VecDeque<Result<String, GatewayError>>,
}

/// Gateway answering by substring rules over the whole request.
///
/// Rules are checked in insertion order against every message's content.
/// A rule with several replies hands them out in turn and then repeats the
/// last one. Requests no rule matches get `(default response)`.
pub(crate) struct ScriptedGateway {
    model: Model,
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedGateway {
    pub(crate) fn new() -> Self {
        Self {
            model: Model::default(),
            rules: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn on(self, needle: &str, reply: &str) -> Self {
        self.on_seq(needle, vec![Ok(reply.to_string())])
    }

    pub(crate) fn fail_on(self, needle: &str) -> Self {
        self.on_seq(
            needle,
            vec![Err(GatewayError::ConnectionError("scripted".to_string()))],
        )
    }

    pub(crate) fn on_seq(self, needle: &str, replies: Vec<Result<String, GatewayError>>) -> Self {
        self.rules.lock().unwrap().push(Rule {
            needle: needle.to_string(),
            replies: replies.into(),
        });
        self
    }

    pub(crate) fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of requests containing `needle`
    pub(crate) fn calls_containing(&self, needle: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|messages| messages.iter().any(|m| m.content.contains(needle)))
            .count()
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn complete(&self, messages: &[Message]) -> Result<String, GatewayError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        let mut rules = self.rules.lock().unwrap();
        for rule in rules.iter_mut() {
            if messages.iter().any(|m| m.content.contains(&rule.needle)) {
                return if rule.replies.len() > 1 {
                    rule.replies
                        .pop_front()
                        .unwrap_or_else(|| Ok(String::new()))
                } else {
                    rule.replies
                        .front()
                        .cloned()
                        .unwrap_or_else(|| Ok(String::new()))
                };
            }
        }
        Ok("(default response)".to_string())
    }

    fn model(&self) -> &Model {
        &self.model
    }
}

/// Replies with the content of the last message
pub(crate) struct EchoGateway {
    model: Model,
}

impl EchoGateway {
    pub(crate) fn new() -> Self {
        Self {
            model: Model::default(),
        }
    }
}

#[async_trait]
impl LlmGateway for EchoGateway {
    async fn complete(&self, messages: &[Message]) -> Result<String, GatewayError> {
        Ok(messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default())
    }

    fn model(&self) -> &Model {
        &self.model
    }
}

/// Never answers successfully
pub(crate) struct FailingGateway {
    model: Model,
}

impl FailingGateway {
    pub(crate) fn new() -> Self {
        Self {
            model: Model::default(),
        }
    }
}

#[async_trait]
impl LlmGateway for FailingGateway {
    async fn complete(&self, _messages: &[Message]) -> Result<String, GatewayError> {
        Err(GatewayError::ConnectionError("backend down".to_string()))
    }

    fn model(&self) -> &Model {
        &self.model
    }
}

/// In-memory actor store
#[derive(Default)]
pub(crate) struct MemoryStore {
    actors: Mutex<HashMap<String, ActorSnapshot>>,
    ledger: Mutex<Option<LedgerRecord>>,
    actor_saves: Mutex<Vec<String>>,
    ledger_saves: Mutex<usize>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_actor(self, snapshot: ActorSnapshot) -> Self {
        self.actors
            .lock()
            .unwrap()
            .insert(snapshot.real_name.clone(), snapshot);
        self
    }

    pub(crate) fn with_ledger(self, record: LedgerRecord) -> Self {
        *self.ledger.lock().unwrap() = Some(record);
        self
    }

    pub(crate) fn stored(&self, real_name: &str) -> Option<ActorSnapshot> {
        self.actors.lock().unwrap().get(real_name).cloned()
    }

    pub(crate) fn actor_saves(&self) -> Vec<String> {
        self.actor_saves.lock().unwrap().clone()
    }

    pub(crate) fn ledger_saves(&self) -> usize {
        *self.ledger_saves.lock().unwrap()
    }

    pub(crate) fn saved_ledger(&self) -> Option<LedgerRecord> {
        self.ledger.lock().unwrap().clone()
    }
}

impl ActorStore for MemoryStore {
    fn load_actor(&self, real_name: &str) -> Result<ActorSnapshot, StoreError> {
        self.stored(real_name)
            .ok_or_else(|| StoreError::NotFound(real_name.to_string()))
    }

    fn save_actor(&self, snapshot: &ActorSnapshot) -> Result<(), StoreError> {
        self.actor_saves
            .lock()
            .unwrap()
            .push(snapshot.real_name.clone());
        self.actors
            .lock()
            .unwrap()
            .insert(snapshot.real_name.clone(), snapshot.clone());
        Ok(())
    }

    fn load_ledger(&self) -> Result<LedgerRecord, StoreError> {
        self.saved_ledger()
            .ok_or_else(|| StoreError::NotFound("ledger".to_string()))
    }

    fn save_ledger(&self, record: &LedgerRecord) -> Result<(), StoreError> {
        *self.ledger_saves.lock().unwrap() += 1;
        *self.ledger.lock().unwrap() = Some(record.clone());
        Ok(())
    }
}

/// Random source replaying scripted draws.
///
/// Rolls default to 50 (speak) and picks to 0 once the scripts run out.
#[derive(Default)]
pub(crate) struct ScriptedRandom {
    rolls: VecDeque<f64>,
    picks: VecDeque<usize>,
}

impl ScriptedRandom {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn rolls(mut self, rolls: &[f64]) -> Self {
        self.rolls.extend(rolls.iter().copied());
        self
    }

    pub(crate) fn picks(mut self, picks: &[usize]) -> Self {
        self.picks.extend(picks.iter().copied());
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn roll_percent(&mut self) -> f64 {
        self.rolls.pop_front().unwrap_or(50.0)
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0).min(len.saturating_sub(1))
    }
}

/// Records every notification as a short line
#[derive(Default)]
pub(crate) struct RecordingProgress {
    pub(crate) events: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, line: String) {
        self.events.lock().unwrap().push(line);
    }
}

impl ProgressNotifier for RecordingProgress {
    fn on_judging_start(&self, judges: usize) {
        self.push(format!("judging:{}", judges));
    }

    fn on_vote_cast(&self, vote: &JudgeVote) {
        self.push(format!("vote:{}:{}", vote.judge, vote.vote));
    }

    fn on_action_applied(&self, action: &ActionVote, _events: &[String]) {
        self.push(format!("applied:{}", action));
    }

    fn on_turn(&self, speaker: &Speaker, text: &str) {
        self.push(format!("turn:{}:{}", speaker.label(), text));
    }

    fn on_behavior(&self, actor: &str, kind: BehaviorKind) {
        self.push(format!("behavior:{}:{}", actor, kind));
    }

    fn on_warning(&self, message: &str) {
        self.push(format!("warning:{}", message));
    }

    fn on_panel_response(&self, judge: &str, _text: &str) {
        self.push(format!("panel:{}", judge));
    }
}
