//! Actor domain
//!
//! Actors are the stateful participants of a session: ordinary pool members,
//! the judge panel, and the human at the keyboard.

pub mod behavior;
pub mod entities;
pub mod roster;

pub use behavior::{Behavior, BehaviorKind};
pub use entities::{Actor, ActorRole, ActorSnapshot, DEFAULT_OPENING};
pub use roster::{default_personas, judges};
