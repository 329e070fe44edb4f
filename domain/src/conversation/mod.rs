//! Conversation domain
//!
//! A [`Conversation`] lives for exactly one round. Once the round closes it is
//! handed to every participant for memory consolidation and then survives
//! only as an audit record.

pub mod entities;

pub use entities::{Conversation, ConversationTurn, Speaker};
