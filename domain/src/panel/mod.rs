//! Judge panel domain
//!
//! Votes, majority aggregation and answer parsing for the fixed panel of
//! judges that decides how the pool changes before each round.

pub mod parsing;
pub mod tally;
pub mod vote;

pub use parsing::{VoteParseError, parse_judge_answer};
pub use tally::VoteTally;
pub use vote::{ActionVote, JudgeVote, VoteCategory};
