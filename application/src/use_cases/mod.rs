//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod actor_runtime;
pub mod judge_panel;
pub mod pool_manager;
pub mod run_panel_summary;
pub mod run_round;
pub mod session;
pub(crate) mod shared;

#[cfg(test)]
pub(crate) mod test_support;
