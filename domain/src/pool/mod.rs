//! Pool domain
//!
//! The active pool is an ordered list of ordinary actor ids. Slot 0 is the
//! primary, which must answer every round. Alongside it sit the resident
//! actors loaded in memory and the popularity ledger.
//!
//! Every active id has both a resident actor and a ledger entry. Ledger
//! entries outlive membership; residents do not.

use crate::actor::{Actor, ActorRole};
use crate::conversation::Speaker;
use crate::core::error::DomainError;
use crate::ledger::PopularityLedger;
use std::collections::HashMap;

/// Default upper bound on active members
pub const DEFAULT_POOL_LIMIT: usize = 5;

#[derive(Debug, Clone)]
pub struct ActorPool {
    active: Vec<String>,
    residents: HashMap<String, Actor>,
    ledger: PopularityLedger,
    limit: usize,
}

impl Default for ActorPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_LIMIT)
    }
}

impl ActorPool {
    pub fn new(limit: usize) -> Self {
        Self {
            active: Vec::new(),
            residents: HashMap::new(),
            ledger: PopularityLedger::new(),
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.active.len() >= self.limit
    }

    /// Active ids in speaking order
    pub fn active_ids(&self) -> &[String] {
        &self.active
    }

    pub fn primary(&self) -> Option<&Actor> {
        self.active.first().and_then(|id| self.residents.get(id))
    }

    /// Active actors in speaking order
    pub fn members(&self) -> Vec<&Actor> {
        self.active
            .iter()
            .filter_map(|id| self.residents.get(id))
            .collect()
    }

    /// Identity snapshots of the active members
    pub fn speakers(&self) -> Vec<Speaker> {
        self.members().into_iter().map(Actor::speaker).collect()
    }

    pub fn actor(&self, real_name: &str) -> Option<&Actor> {
        self.residents.get(real_name)
    }

    pub fn actor_mut(&mut self, real_name: &str) -> Option<&mut Actor> {
        self.residents.get_mut(real_name)
    }

    pub fn is_active(&self, real_name: &str) -> bool {
        self.active.iter().any(|id| id == real_name)
    }

    pub fn is_resident(&self, real_name: &str) -> bool {
        self.residents.contains_key(real_name)
    }

    /// Add an actor at the end of the speaking order
    pub fn admit(&mut self, actor: Actor) -> Result<(), DomainError> {
        if actor.role() != ActorRole::Ordinary {
            return Err(DomainError::NotPoolEligible(
                actor.real_name().to_string(),
                actor.role().to_string(),
            ));
        }
        if self.is_active(actor.real_name()) {
            return Err(DomainError::AlreadyActive(actor.real_name().to_string()));
        }
        if self.is_full() {
            return Err(DomainError::PoolFull(self.limit));
        }

        let id = actor.real_name().to_string();
        self.ledger.register(&id, actor.display_name());
        self.residents.insert(id.clone(), actor);
        self.active.push(id);
        Ok(())
    }

    /// Remove a member from the pool, returning its resident actor.
    ///
    /// The ledger entry stays.
    pub fn evict(&mut self, real_name: &str) -> Option<Actor> {
        let position = self.active.iter().position(|id| id == real_name)?;
        self.active.remove(position);
        self.residents.remove(real_name)
    }

    /// Load an actor into memory without activating it
    pub fn insert_resident(&mut self, actor: Actor) {
        if !self.is_active(actor.real_name()) {
            self.residents
                .insert(actor.real_name().to_string(), actor);
        }
    }

    /// Replace the whole active pool with resident actors.
    ///
    /// Unknown, non-ordinary and duplicate ids are ignored and the list is
    /// truncated to the limit. Residents that end up inactive are dropped
    /// and returned.
    pub fn replace_active(&mut self, ids: &[String]) -> Vec<Actor> {
        let mut next: Vec<String> = Vec::new();
        for id in ids {
            if next.len() >= self.limit || next.contains(id) {
                continue;
            }
            match self.residents.get(id) {
                Some(actor) if actor.role() == ActorRole::Ordinary => {
                    self.ledger.register(id, actor.display_name());
                    next.push(id.clone());
                }
                _ => {}
            }
        }
        self.active = next;

        let stale: Vec<String> = self
            .residents
            .keys()
            .filter(|id| !self.active.contains(id))
            .cloned()
            .collect();
        stale
            .iter()
            .filter_map(|id| self.residents.remove(id))
            .collect()
    }

    /// Speaking order, for in-place permutation
    pub fn order_mut(&mut self) -> &mut [String] {
        &mut self.active
    }

    pub fn ledger(&self) -> &PopularityLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut PopularityLedger {
        &mut self.ledger
    }

    /// Count one more appearance for `real_name`
    pub fn record_occurrence(&mut self, real_name: &str) -> u64 {
        self.ledger.increment(real_name)
    }

    /// Broadcast a membership event to every active member
    pub fn announce(&mut self, events: &str) {
        for id in &self.active {
            if let Some(actor) = self.residents.get_mut(id) {
                actor.note_event(events);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(name: &str) -> Actor {
        Actor::ordinary(name, format!("You are {}.", name)).unwrap()
    }

    fn pool_of(names: &[&str]) -> ActorPool {
        let mut pool = ActorPool::new(5);
        for name in names {
            pool.admit(actor(name)).unwrap();
        }
        pool
    }

    #[test]
    fn test_admit_registers_ledger_and_resident() {
        let pool = pool_of(&["A", "B"]);
        assert_eq!(pool.active_ids(), ["A".to_string(), "B".to_string()]);
        assert_eq!(pool.primary().unwrap().real_name(), "A");
        assert!(pool.ledger().contains("B"));
        assert!(pool.is_resident("B"));
    }

    #[test]
    fn test_admit_refusals() {
        let mut pool = pool_of(&["A"]);
        assert_eq!(
            pool.admit(actor("A")).unwrap_err(),
            DomainError::AlreadyActive("A".to_string())
        );

        let judge = crate::actor::judges().remove(0);
        assert!(matches!(
            pool.admit(judge),
            Err(DomainError::NotPoolEligible(_, _))
        ));

        let mut small = ActorPool::new(1);
        small.admit(actor("A")).unwrap();
        assert_eq!(small.admit(actor("B")), Err(DomainError::PoolFull(1)));
    }

    #[test]
    fn test_evict_keeps_ledger_entry() {
        let mut pool = pool_of(&["A", "B"]);
        pool.record_occurrence("B");
        let evicted = pool.evict("B").unwrap();
        assert_eq!(evicted.real_name(), "B");
        assert!(!pool.is_active("B"));
        assert!(!pool.is_resident("B"));
        assert_eq!(pool.ledger().count("B"), 1);
        assert!(pool.evict("B").is_none());
    }

    #[test]
    fn test_replace_active_drops_stale_residents() {
        let mut pool = pool_of(&["A", "B"]);
        pool.insert_resident(actor("C"));
        let dropped = pool.replace_active(&["C".to_string(), "A".to_string(), "C".to_string()]);
        assert_eq!(pool.active_ids(), ["C".to_string(), "A".to_string()]);
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].real_name(), "B");
        assert!(pool.ledger().contains("C"));
    }

    #[test]
    fn test_replace_active_respects_limit() {
        let mut pool = ActorPool::new(1);
        pool.insert_resident(actor("A"));
        pool.insert_resident(actor("B"));
        pool.replace_active(&["A".to_string(), "B".to_string()]);
        assert_eq!(pool.len(), 1);
        assert!(!pool.is_resident("B"));
    }

    #[test]
    fn test_order_mut_permutes_in_place() {
        let mut pool = pool_of(&["A", "B", "C"]);
        pool.order_mut().reverse();
        assert_eq!(pool.primary().unwrap().real_name(), "C");
        assert_eq!(pool.members().len(), 3);
    }

    #[test]
    fn test_announce_reaches_every_member() {
        let mut pool = pool_of(&["A", "B"]);
        pool.announce("C joined the conversation.");
        for member in pool.members() {
            let last = member.last_conversation().unwrap();
            assert!(last.turns()[0].text.contains("C joined"));
        }
    }
}
