//! Interactive chat module
//!
//! Provides a readline-based interactive session with the pool.

mod repl;

pub use repl::{LegionRepl, ReplCommand, parse_command};
