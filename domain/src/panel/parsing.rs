//! Judge answer parsing.
//!
//! Turns a judge's free-form reply into an [`ActionVote`]. Pure text matching,
//! no I/O. Callers fall back to [`ActionVote::Keep`] on error.

use super::vote::ActionVote;
use crate::conversation::Speaker;
use std::collections::BTreeSet;
use thiserror::Error;

/// Why a judge answer could not be understood
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoteParseError {
    #[error("Empty judge answer")]
    Empty,

    #[error("Unrecognised judge answer: {0}")]
    Unrecognised(String),
}

/// Parse a judge answer against the current pool.
///
/// Matching is case-insensitive on the trimmed answer:
///
/// | Answer | Vote |
/// |--------|------|
/// | `KEEP` | [`ActionVote::Keep`] |
/// | `SHUFFLE` | [`ActionVote::Shuffle`] |
/// | `ADD_NEW...` | [`ActionVote::AddNew`] |
/// | `FIND_POPULAR` / `RECALL_POPULAR` | [`ActionVote::RecallPopular`] |
/// | `REMOVE: names` | [`ActionVote::Remove`], or Keep when no member is named |
///
/// Removal targets are the pool members whose real or display name appears
/// in the tail of the answer; they are reported by real name.
///
/// ```
/// use legion_domain::actor::ActorRole;
/// use legion_domain::conversation::Speaker;
/// use legion_domain::panel::{ActionVote, parse_judge_answer};
///
/// let pool = vec![Speaker::new("Wade Wilson", "Deadpool", ActorRole::Ordinary)];
/// let vote = parse_judge_answer("REMOVE: Deadpool", &pool).unwrap();
/// assert_eq!(vote, ActionVote::remove(["Wade Wilson"]));
/// ```
pub fn parse_judge_answer(answer: &str, pool: &[Speaker]) -> Result<ActionVote, VoteParseError> {
    let cleaned = answer
        .trim()
        .trim_matches(|c: char| c == '"' || c == '*' || c == '`' || c == '.')
        .trim();
    if cleaned.is_empty() {
        return Err(VoteParseError::Empty);
    }
    let upper = cleaned.to_uppercase();

    if let Some(tail) = upper.strip_prefix("REMOVE") {
        let tail = tail.trim_start_matches(':').trim();
        let targets: BTreeSet<String> = pool
            .iter()
            .filter(|member| {
                tail.contains(&member.real_name.to_uppercase())
                    || tail.contains(&member.display_name.to_uppercase())
            })
            .map(|member| member.real_name.clone())
            .collect();
        return Ok(if targets.is_empty() {
            ActionVote::Keep
        } else {
            ActionVote::Remove { targets }
        });
    }

    match upper.as_str() {
        "KEEP" => Ok(ActionVote::Keep),
        "SHUFFLE" => Ok(ActionVote::Shuffle),
        "FIND_POPULAR" | "RECALL_POPULAR" => Ok(ActionVote::RecallPopular),
        s if s.starts_with("ADD_NEW") => Ok(ActionVote::AddNew),
        _ => Err(VoteParseError::Unrecognised(cleaned.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorRole;

    fn pool() -> Vec<Speaker> {
        vec![
            Speaker::new("Jake Peralta", "Jake Peralta", ActorRole::Ordinary),
            Speaker::new("Yoda", "Master Yoda", ActorRole::Ordinary),
            Speaker::new("Karlach", "Karlach", ActorRole::Ordinary),
        ]
    }

    #[test]
    fn test_simple_keywords() {
        assert_eq!(parse_judge_answer("KEEP", &pool()), Ok(ActionVote::Keep));
        assert_eq!(parse_judge_answer("  shuffle\n", &pool()), Ok(ActionVote::Shuffle));
        assert_eq!(
            parse_judge_answer("FIND_POPULAR", &pool()),
            Ok(ActionVote::RecallPopular)
        );
        assert_eq!(
            parse_judge_answer("recall_popular", &pool()),
            Ok(ActionVote::RecallPopular)
        );
    }

    #[test]
    fn test_add_new_is_prefix_match() {
        assert_eq!(
            parse_judge_answer("ADD_NEW: a detective", &pool()),
            Ok(ActionVote::AddNew)
        );
        assert_eq!(parse_judge_answer("**ADD_NEW**", &pool()), Ok(ActionVote::AddNew));
    }

    #[test]
    fn test_remove_matches_real_or_display_name() {
        let vote = parse_judge_answer("REMOVE: master yoda, Karlach", &pool()).unwrap();
        assert_eq!(vote, ActionVote::remove(["Karlach", "Yoda"]));
    }

    #[test]
    fn test_remove_without_match_keeps() {
        assert_eq!(
            parse_judge_answer("REMOVE: Gandalf", &pool()),
            Ok(ActionVote::Keep)
        );
    }

    #[test]
    fn test_unrecognised_answer() {
        assert_eq!(
            parse_judge_answer("I think we should keep going.", &pool()),
            Err(VoteParseError::Unrecognised(
                "I think we should keep going".to_string()
            ))
        );
        assert_eq!(parse_judge_answer("   ", &pool()), Err(VoteParseError::Empty));
    }
}
