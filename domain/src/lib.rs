//! Domain layer for legion
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Actors and the pool
//!
//! - **Actor**: an independently identified persona with instructions, a
//!   running memory and a display identity that may differ from its real name
//! - **Pool**: the ordered set of ordinary actors taking part in rounds; slot 0
//!   is the primary and always answers the human
//! - **Ledger**: how often each actor has spoken, used to recall popular ones
//!
//! ## Judges
//!
//! A fixed panel of judges votes before every round on how the pool should
//! change. The majority category wins, ties go to the first seen.

pub mod actor;
pub mod conversation;
pub mod core;
pub mod ledger;
pub mod panel;
pub mod pool;
pub mod prompt;
pub mod session;
pub mod util;

// Re-export commonly used types
pub use actor::{
    Actor, ActorRole, ActorSnapshot, Behavior, BehaviorKind, default_personas, judges,
};
pub use conversation::{Conversation, ConversationTurn, Speaker};
pub use core::{error::DomainError, model::Model};
pub use ledger::{LedgerEntry, LedgerRecord, LedgerRecordEntry, PopularityLedger};
pub use panel::{
    ActionVote, JudgeVote, VoteCategory, VoteParseError, VoteTally, parse_judge_answer,
};
pub use pool::{ActorPool, DEFAULT_POOL_LIMIT};
pub use prompt::PromptTemplate;
pub use session::entities::{Message, Role};
