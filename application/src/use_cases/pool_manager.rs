//! Pool manager use case
//!
//! Owns the active pool and its ledger, applies the judge panel's decision,
//! invents or recalls actors, and persists them through the [`ActorStore`].

use crate::ports::actor_store::{ActorStore, StoreError};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::random::{RandomSource, sample_indices, shuffle};
use crate::use_cases::actor_runtime::ActorRuntime;
use crate::use_cases::session::SessionError;
use crate::use_cases::shared::complete_with_timeout;
use legion_domain::{
    ActionVote, Actor, ActorPool, Conversation, Message, PromptTemplate, default_personas,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What applying an action did to the pool
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolChange {
    pub action: ActionVote,
    /// Announcements broadcast to the members
    pub events: Vec<String>,
    /// Real names that entered the pool
    pub joined: Vec<String>,
    /// Real names that left the pool
    pub left: Vec<String>,
    /// Why the action was not carried out, if it wasn't
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refused: Option<String>,
}

impl PoolChange {
    fn new(action: &ActionVote) -> Self {
        Self {
            action: action.clone(),
            events: Vec::new(),
            joined: Vec::new(),
            left: Vec::new(),
            refused: None,
        }
    }

    fn refused(action: &ActionVote, reason: impl Into<String>) -> Self {
        let mut change = Self::new(action);
        change.refused = Some(reason.into());
        change
    }

    /// Whether membership changed
    pub fn mutated(&self) -> bool {
        !self.joined.is_empty() || !self.left.is_empty()
    }
}

pub struct PoolManager<G: LlmGateway + 'static> {
    runtime: ActorRuntime<G>,
    store: Arc<dyn ActorStore>,
    pool: ActorPool,
    recall_size: usize,
    recall_pool: usize,
}

impl<G: LlmGateway + 'static> PoolManager<G> {
    pub fn new(runtime: ActorRuntime<G>, store: Arc<dyn ActorStore>, pool_limit: usize) -> Self {
        Self {
            runtime,
            store,
            pool: ActorPool::new(pool_limit),
            recall_size: 2,
            recall_pool: 5,
        }
    }

    /// Invite `size` actors drawn from the top `pool` ledger entries on recall
    pub fn with_recall(mut self, size: usize, pool: usize) -> Self {
        self.recall_size = size;
        self.recall_pool = pool;
        self
    }

    pub fn pool(&self) -> &ActorPool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut ActorPool {
        &mut self.pool
    }

    pub fn runtime(&self) -> &ActorRuntime<G> {
        &self.runtime
    }

    /// Seed the pool with `size` random roster personas and merge the
    /// persisted ledger.
    pub fn bootstrap(&mut self, size: usize, rng: &mut dyn RandomSource) {
        let roster = default_personas();
        let size = size.min(self.pool.limit());
        for index in sample_indices(rng, roster.len(), size) {
            let actor = self.hydrate(roster[index].clone());
            if let Err(e) = self.pool.admit(actor) {
                warn!("Could not seed pool: {}", e);
            }
        }

        match self.store.load_ledger() {
            Ok(record) => {
                self.pool.ledger_mut().merge_record(&record);
                debug!("Merged ledger with {} entries", record.len());
            }
            Err(StoreError::NotFound(_)) => debug!("No persisted ledger"),
            Err(e) => warn!("Could not load ledger: {}", e),
        }

        info!(
            "Pool seeded with {}",
            self.pool.active_ids().join(", ")
        );
    }

    /// Prefer the stored version of `fresh`; otherwise store `fresh` now.
    pub fn hydrate(&self, fresh: Actor) -> Actor {
        match self.load_stored(fresh.real_name()) {
            Some(stored) => stored,
            None => {
                if let Err(e) = self.store.save_actor(&fresh.to_snapshot()) {
                    warn!("Could not persist {}: {}", fresh.real_name(), e);
                }
                fresh
            }
        }
    }

    fn load_stored(&self, real_name: &str) -> Option<Actor> {
        match self.store.load_actor(real_name) {
            Ok(snapshot) => match Actor::from_snapshot(snapshot) {
                Ok(actor) => {
                    debug!("Loaded {} from store", real_name);
                    Some(actor)
                }
                Err(e) => {
                    warn!("Stored record for {} is unusable: {}", real_name, e);
                    None
                }
            },
            Err(StoreError::NotFound(_)) => None,
            Err(e) => {
                warn!("Could not load {}: {}", real_name, e);
                None
            }
        }
    }

    /// Fold the actor's last conversation into memory and store it
    async fn persist(runtime: &ActorRuntime<G>, store: &dyn ActorStore, actor: &mut Actor) {
        runtime.consolidate_memory(actor, Conversation::new()).await;
        match store.save_actor(&actor.to_snapshot()) {
            Ok(()) => debug!("Saved {}", actor.real_name()),
            Err(e) => warn!("Could not save {}: {}", actor.real_name(), e),
        }
    }

    /// Persist one active member
    pub async fn persist_actor(&mut self, real_name: &str) {
        if let Some(actor) = self.pool.actor_mut(real_name) {
            Self::persist(&self.runtime, self.store.as_ref(), actor).await;
        }
    }

    /// Persist every active member
    pub async fn persist_members(&mut self) {
        let ids = self.pool.active_ids().to_vec();
        for id in ids {
            self.persist_actor(&id).await;
        }
    }

    pub fn save_ledger(&self) {
        match self.store.save_ledger(&self.pool.ledger().to_record()) {
            Ok(()) => debug!("Saved ledger"),
            Err(e) => warn!("Could not save ledger: {}", e),
        }
    }

    /// Persist every member and the ledger
    pub async fn save_all(&mut self) {
        self.persist_members().await;
        self.save_ledger();
    }

    /// Ask the backend for the best persona for `input` and build it.
    ///
    /// A persona that was stored before is loaded instead of drafted anew.
    pub async fn invent_actor(&self, input: &str) -> Result<Actor, GatewayError> {
        let timeout = self.runtime.timeout();
        let gateway = self.runtime.gateway().as_ref();

        let answer = complete_with_timeout(
            gateway,
            &[Message::user(PromptTemplate::pick_persona(input))],
            timeout,
        )
        .await?;
        let name = clean_persona_name(&answer);
        if name.is_empty() {
            return Err(GatewayError::InvalidResponse(
                "empty persona name".to_string(),
            ));
        }

        if let Some(stored) = self.load_stored(&name) {
            info!("Recalled {} from store", name);
            return Ok(stored);
        }

        let instructions = complete_with_timeout(
            gateway,
            &[Message::user(PromptTemplate::draft_instructions(&name))],
            timeout,
        )
        .await?;
        let actor = Actor::ordinary(&name, instructions.trim())
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        info!("Invented {}", name);
        Ok(self.hydrate(actor))
    }

    /// Up to `k` ids drawn uniformly from the `pool_size` most popular
    /// actors that are resident or can be loaded from the store.
    pub fn select_popular(
        &mut self,
        k: usize,
        pool_size: usize,
        rng: &mut dyn RandomSource,
    ) -> Vec<String> {
        let top: Vec<String> = self
            .pool
            .ledger()
            .top_k(pool_size)
            .into_iter()
            .map(|e| e.real_name.clone())
            .collect();

        let mut candidates: Vec<String> = top
            .iter()
            .filter(|id| self.pool.is_resident(id))
            .cloned()
            .collect();

        for id in &top {
            if candidates.len() >= pool_size {
                break;
            }
            if self.pool.is_resident(id) {
                continue;
            }
            if let Some(actor) = self.load_stored(id) {
                self.pool.insert_resident(actor);
                candidates.push(id.clone());
            }
        }

        sample_indices(rng, candidates.len(), k)
            .into_iter()
            .map(|i| candidates[i].clone())
            .collect()
    }

    /// Replace the pool with popular actors, padded from the roster
    pub fn invite_popular(
        &mut self,
        k: usize,
        pool_size: usize,
        rng: &mut dyn RandomSource,
    ) -> Vec<String> {
        let mut chosen = self.select_popular(k, pool_size, rng);

        if chosen.len() < k {
            let roster: Vec<Actor> = default_personas()
                .into_iter()
                .filter(|p| !chosen.iter().any(|id| id == p.real_name()))
                .collect();
            for index in sample_indices(rng, roster.len(), k - chosen.len()) {
                let persona = &roster[index];
                if !self.pool.is_resident(persona.real_name()) {
                    let actor = self.hydrate(persona.clone());
                    self.pool.insert_resident(actor);
                }
                chosen.push(persona.real_name().to_string());
            }
        }

        let dropped = self.pool.replace_active(&chosen);
        debug!("Recall released {} residents", dropped.len());

        let names: Vec<String> = self
            .pool
            .members()
            .iter()
            .map(|a| a.display_name().to_string())
            .collect();
        self.pool.announce(&PromptTemplate::popular_joined(&names));
        info!("Invited {}", self.pool.active_ids().join(", "));
        self.pool.active_ids().to_vec()
    }

    /// Carry out the panel's decision.
    ///
    /// Only an emptied pool that cannot be refilled is an error.
    pub async fn apply(
        &mut self,
        action: &ActionVote,
        input: &str,
        rng: &mut dyn RandomSource,
    ) -> Result<PoolChange, SessionError> {
        let mut change = PoolChange::new(action);

        match action {
            ActionVote::Keep => {}
            ActionVote::Shuffle => {
                shuffle(rng, self.pool.order_mut());
                debug!("Pool reordered: {}", self.pool.active_ids().join(", "));
            }
            ActionVote::Remove { targets } => {
                self.remove(targets, input, &mut change).await?;
            }
            ActionVote::AddNew => {
                if self.pool.is_full() {
                    warn!("Pool is full, not adding a member");
                    return Ok(PoolChange::refused(action, "pool is full"));
                }
                let actor = match self.invent_actor(input).await {
                    Ok(actor) => actor,
                    Err(e) => {
                        warn!("Could not invent a member: {}", e);
                        return Ok(PoolChange::refused(action, e.to_string()));
                    }
                };
                let id = actor.real_name().to_string();
                let display = actor.display_name().to_string();
                if let Err(e) = self.pool.admit(actor) {
                    warn!("Not adding {}: {}", id, e);
                    return Ok(PoolChange::refused(action, e.to_string()));
                }
                self.save_ledger();
                let event = PromptTemplate::member_joined(&display);
                self.pool.announce(&event);
                change.joined.push(id);
                change.events.push(event);
            }
            ActionVote::RecallPopular => {
                let before: Vec<String> = self.pool.active_ids().to_vec();
                self.persist_members().await;
                let after = self.invite_popular(self.recall_size, self.recall_pool, rng);
                self.save_ledger();

                change.left = before.iter().filter(|id| !after.contains(id)).cloned().collect();
                change.joined = after.iter().filter(|id| !before.contains(id)).cloned().collect();
                let names: Vec<String> = self
                    .pool
                    .members()
                    .iter()
                    .map(|a| a.display_name().to_string())
                    .collect();
                change.events.push(PromptTemplate::popular_joined(&names));
            }
        }

        Ok(change)
    }

    async fn remove(
        &mut self,
        targets: &BTreeSet<String>,
        input: &str,
        change: &mut PoolChange,
    ) -> Result<(), SessionError> {
        let ids: Vec<String> = self
            .pool
            .active_ids()
            .iter()
            .filter(|id| targets.contains(*id))
            .cloned()
            .collect();

        let mut names = Vec::new();
        for id in ids {
            if let Some(mut actor) = self.pool.evict(&id) {
                Self::persist(&self.runtime, self.store.as_ref(), &mut actor).await;
                names.push(actor.display_name().to_string());
                change.left.push(id);
            }
        }

        if !names.is_empty() {
            change.events.push(PromptTemplate::members_left(&names));
        }

        if self.pool.is_empty() {
            info!("Pool emptied, inventing a replacement");
            let actor = self
                .invent_actor(input)
                .await
                .map_err(|e| SessionError::PoolExhausted(e.to_string()))?;
            let id = actor.real_name().to_string();
            let display = actor.display_name().to_string();
            self.pool
                .admit(actor)
                .map_err(|e| SessionError::PoolExhausted(e.to_string()))?;
            self.save_ledger();
            change.joined.push(id);
            change.events.push(PromptTemplate::member_joined(&display));
        }

        // Residents hear every note, including a replacement admitted above
        for event in &change.events {
            self.pool.announce(event);
        }
        Ok(())
    }

    /// Count one more appearance
    pub fn record_occurrence(&mut self, real_name: &str) -> u64 {
        self.pool.record_occurrence(real_name)
    }
}

/// First line of a persona answer with quotes and trailing dots removed
fn clean_persona_name(answer: &str) -> String {
    answer
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '*' || c == '.')
        .trim()
        .to_string()
}
