//! Console output formatter for legion sessions

use colored::Colorize;
use legion_application::{PanelDecision, PanelVerdict, PoolChange, RoundReport, SessionReply};
use serde_json::{Value, json};
use legion_domain::{ActorPool, BehaviorKind, JudgeVote, Speaker};

/// Ledger rows shown by [`ConsoleFormatter::format_pool`]
const LEDGER_ROWS: usize = 10;

/// Formats session output for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// One line of conversation
    pub fn format_turn(speaker: &Speaker, text: &str) -> String {
        let label = if speaker.display_name == speaker.real_name {
            speaker.label().yellow().bold()
        } else {
            speaker.label().magenta().bold()
        };
        let text = if text.is_empty() {
            "(no answer)".dimmed().to_string()
        } else {
            text.trim().to_string()
        };
        format!("{}: {}", label, text)
    }

    pub fn format_vote(vote: &JudgeVote) -> String {
        let line = format!("  {} {} {}", "*".cyan(), vote.judge.bold(), vote.vote);
        match &vote.warning {
            Some(_) => format!("{} {}", line, "(fallback)".dimmed()),
            None => line,
        }
    }

    /// The winning action with its tally
    pub fn format_decision(decision: &PanelDecision) -> String {
        format!(
            "{} {} {}",
            "Judges:".cyan().bold(),
            decision.action.to_string().bold(),
            format!("({})", decision.tally).dimmed()
        )
    }

    /// Pool announcements, one per line
    pub fn format_events(events: &[String]) -> String {
        events
            .iter()
            .map(|event| format!("{} {}\n", "~".green(), event.italic()))
            .collect()
    }

    /// Announcements and refusals from applying an action
    pub fn format_change(change: &PoolChange) -> String {
        let mut output = Self::format_events(&change.events);
        if let Some(reason) = &change.refused {
            output.push_str(&format!(
                "{} {} not applied: {}\n",
                "!".yellow(),
                change.action,
                reason
            ));
        }
        output
    }

    pub fn format_behavior(actor: &str, kind: BehaviorKind) -> String {
        let kind = match kind {
            BehaviorKind::Skip => kind.as_str().dimmed(),
            BehaviorKind::Noop => kind.as_str().normal(),
            BehaviorKind::Speak => kind.as_str().green(),
            BehaviorKind::Impersonate => kind.as_str().magenta(),
        };
        format!("  {} {} rolled {}", "-".dimmed(), actor, kind)
    }

    pub fn format_warning(message: &str) -> String {
        format!("{} {}", "warning:".yellow().bold(), message)
    }

    /// Verbose recap after a round: who took part and the true transcript
    pub fn format_round_summary(report: &RoundReport) -> String {
        let mut output = Self::section_header(&format!("Round {}", report.round));
        output.push_str(&format!(
            "{} {}\n",
            "Participants:".cyan(),
            report.outcome.participants.join(", ")
        ));
        output.push_str(&format!("{}\n", "Transcript:".cyan()));
        for line in report.outcome.conversation.audit_transcript().lines() {
            output.push_str(&format!("  {}\n", line));
        }
        output
    }

    /// Judges' answers followed by the combined verdict
    pub fn format_verdict(verdict: &PanelVerdict) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("MAGI"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Q:".bold(), verdict.question));

        for (judge, answer) in &verdict.answers {
            output.push_str(&format!(
                "\n{}\n{}\n",
                format!("── {} ──", judge).yellow().bold(),
                answer.trim()
            ));
        }

        output.push_str(&Self::section_header("Verdict"));
        output.push_str(verdict.verdict.trim());
        output.push('\n');
        output
    }

    /// Active members in speaking order, then the most popular actors
    pub fn format_pool(pool: &ActorPool) -> String {
        let mut output = Self::section_header("Current characters");
        if pool.is_empty() {
            output.push_str(&format!("  {}\n", "(nobody)".dimmed()));
        }
        for (slot, actor) in pool.members().into_iter().enumerate() {
            let marker = if slot == 0 { "primary".dimmed().to_string() } else { String::new() };
            output.push_str(&format!(
                "  {}. {} {}\n",
                slot + 1,
                actor.speaker().label().bold(),
                marker
            ));
        }

        let ledger = pool.ledger();
        if !ledger.is_empty() {
            output.push_str(&Self::section_header("Popularity"));
            for entry in ledger.top_k(LEDGER_ROWS) {
                output.push_str(&format!(
                    "  {:>4}  {}\n",
                    entry.count,
                    entry.display_name
                ));
            }
        }
        output
    }

    /// Machine-readable form of a reply, uncolored
    pub fn format_json(reply: &SessionReply) -> String {
        let value = match reply {
            SessionReply::Round(report) => Self::round_json(report),
            SessionReply::Panel(verdict) => json!({ "panel": verdict }),
        };
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
    }

    fn round_json(report: &RoundReport) -> Value {
        let turns: Vec<Value> = report
            .outcome
            .conversation
            .turns()
            .iter()
            .map(|t| {
                json!({
                    "speaker": t.speaker.real_name,
                    "display_name": t.speaker.display_name,
                    "text": t.text,
                })
            })
            .collect();
        let behaviors: Vec<Value> = report
            .outcome
            .behaviors
            .iter()
            .map(|(actor, kind)| json!({ "actor": actor, "behavior": kind }))
            .collect();

        json!({
            "round": report.round,
            "votes": report.decision.votes,
            "action": report.decision.action.to_string(),
            "tally": report.decision.tally,
            "change": report.change,
            "behaviors": behaviors,
            "participants": report.outcome.participants,
            "turns": turns,
        })
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use legion_domain::{ActionVote, Actor, ActorRole};

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_format_turn_labels() {
        plain();
        let yoda = Speaker::new("Yoda", "Yoda", ActorRole::Ordinary);
        assert_eq!(ConsoleFormatter::format_turn(&yoda, " Hmm. "), "Yoda: Hmm.");

        let masked = Speaker::new("Yoda", "Ellie", ActorRole::Ordinary);
        assert_eq!(
            ConsoleFormatter::format_turn(&masked, "hey"),
            "Ellie (Yoda): hey"
        );
        assert_eq!(
            ConsoleFormatter::format_turn(&yoda, ""),
            "Yoda: (no answer)"
        );
    }

    #[test]
    fn test_format_vote_marks_fallback() {
        plain();
        let vote = JudgeVote::new("MELCHIOR", ActionVote::remove(["Yoda"]));
        assert_eq!(ConsoleFormatter::format_vote(&vote), "  * MELCHIOR remove(Yoda)");

        let fallback = JudgeVote::fallback("CASPAR", "unparseable");
        assert!(ConsoleFormatter::format_vote(&fallback).ends_with("keep (fallback)"));
    }

    #[test]
    fn test_format_pool() {
        plain();
        let mut pool = ActorPool::new(5);
        pool.admit(Actor::ordinary("Karlach", "x").unwrap()).unwrap();
        pool.admit(Actor::ordinary("Yoda", "y").unwrap()).unwrap();
        pool.record_occurrence("Yoda");

        let output = ConsoleFormatter::format_pool(&pool);
        assert!(output.contains("1. Karlach primary"));
        assert!(output.contains("2. Yoda"));
        let popularity = output.split("Popularity").nth(1).unwrap();
        let yoda = popularity.find("Yoda").unwrap();
        let karlach = popularity.find("Karlach").unwrap();
        assert!(yoda < karlach);
    }

    #[test]
    fn test_format_empty_pool() {
        plain();
        let output = ConsoleFormatter::format_pool(&ActorPool::new(5));
        assert!(output.contains("(nobody)"));
        assert!(!output.contains("Popularity"));
    }

    #[test]
    fn test_format_json_panel() {
        let reply = SessionReply::Panel(PanelVerdict {
            question: "Deploy?".to_string(),
            answers: vec![],
            verdict: "DENIED".to_string(),
        });
        let value: Value = serde_json::from_str(&ConsoleFormatter::format_json(&reply)).unwrap();
        assert_eq!(value["panel"]["verdict"], "DENIED");
        assert_eq!(value["panel"]["question"], "Deploy?");
    }

    #[test]
    fn test_format_verdict() {
        plain();
        let verdict = PanelVerdict {
            question: "Deploy?".to_string(),
            answers: vec![("MELCHIOR".to_string(), "Yes.".to_string())],
            verdict: "APPROVED".to_string(),
        };
        let output = ConsoleFormatter::format_verdict(&verdict);
        assert!(output.contains("Q: Deploy?"));
        assert!(output.contains("── MELCHIOR ──\nYes."));
        assert!(output.trim_end().ends_with("APPROVED"));
    }
}
